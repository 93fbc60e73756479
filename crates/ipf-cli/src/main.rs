mod config;
mod input;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use ipf_core::shape::round_to;
use ipf_core::{
    ChunkConfig, Evaluation, GREAT_CIRCLE, Hemisphere, PointGroup, Projection, Symmetry, Vector3d,
    VectorBatch, VectorKey,
};
use ndarray::aview0;
use serde::Serialize;

use crate::config::Config;
use crate::input::{
    ArrayJson, collect_vectors, number, parse_vector, print_json, print_vectors, read_vectors,
    row_text,
};

#[derive(Parser)]
#[command(name = "ipf", about = "Vector geometry and fundamental sector reduction")]
struct Cli {
    /// TOML config file; falls back to $IPF_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Vectors as `x,y,z` arguments and/or a JSON file.
#[derive(Args)]
struct VectorArgs {
    /// Vectors as x,y,z; put options first or use `--` before negative values
    #[arg(allow_hyphen_values = true)]
    vectors: Vec<String>,

    /// JSON file with an array of [x, y, z]
    #[arg(long)]
    input: Option<PathBuf>,
}

impl VectorArgs {
    fn load(&self) -> Result<Vector3d> {
        collect_vectors(&self.vectors, self.input.as_deref())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Map vectors into the fundamental sector of a point group
    Reduce {
        /// Point group, e.g. m-3m, 6/mmm or Oh
        #[arg(long, short)]
        symmetry: String,

        /// Drop repeated results
        #[arg(long)]
        unique: bool,

        #[command(flatten)]
        vectors: VectorArgs,
    },

    /// Print azimuth, polar angle and length of each vector
    Polar {
        /// Angles in degrees
        #[arg(long)]
        degrees: bool,

        /// Only vectors on this hemisphere: upper, lower or both
        #[arg(long)]
        hemisphere: Option<String>,

        /// Mirror vectors on the other hemisphere onto the selected one
        /// (upper unless --hemisphere says otherwise; ignored for both)
        #[arg(long)]
        reproject: bool,

        #[command(flatten)]
        vectors: VectorArgs,
    },

    /// Angle between one vector and each of the others
    Angle {
        /// Angles in degrees
        #[arg(long)]
        degrees: bool,

        /// Reference vector x,y,z
        #[arg(allow_hyphen_values = true)]
        reference: String,

        #[command(flatten)]
        others: VectorArgs,
    },

    /// Pick the candidate best aligned with a target vector
    Nearest {
        /// Target vector x,y,z
        #[arg(long, allow_hyphen_values = true)]
        target: String,

        /// Accept candidates parallel or antiparallel to the target
        #[arg(long)]
        inclusive: bool,

        /// Direction ranking candidates first (default 0,0,1)
        #[arg(long, allow_hyphen_values = true)]
        tiebreak: Option<String>,

        #[command(flatten)]
        candidates: VectorArgs,
    },

    /// Stereographic coordinates of each vector
    Project {
        /// stereographic, or ipf to reduce into a fundamental sector first
        #[arg(long, default_value = "stereographic")]
        projection: String,

        /// Point group for the ipf projection
        #[arg(long, short)]
        symmetry: Option<String>,

        /// upper, lower or both
        #[arg(long, default_value = "upper")]
        hemisphere: String,

        #[command(flatten)]
        vectors: VectorArgs,
    },

    /// Trace a circle around each vector
    Circle {
        /// Half-angle of the circle in degrees
        #[arg(long, default_value_t = GREAT_CIRCLE.to_degrees())]
        opening_angle: f64,

        /// Vectors per circle
        #[arg(long)]
        steps: Option<usize>,

        #[command(flatten)]
        vectors: VectorArgs,
    },

    /// Pairwise dot products between two vector files
    Outer {
        /// JSON file with the left batch
        #[arg(long)]
        left: PathBuf,

        /// JSON file with the right batch
        #[arg(long)]
        right: PathBuf,

        /// Evaluate block by block
        #[arg(long)]
        chunked: bool,

        /// Vectors per block
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Show a progress bar on stderr
        #[arg(long)]
        progress: bool,
    },

    /// List the supported point groups
    Groups,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::resolve(cli.config.as_deref())?;

    match &cli.command {
        Commands::Reduce {
            symmetry,
            unique,
            vectors,
        } => cmd_reduce(&cli, symmetry, *unique, vectors),
        Commands::Polar {
            degrees,
            hemisphere,
            reproject,
            vectors,
        } => cmd_polar(
            &cli,
            *degrees || config.degrees,
            hemisphere.as_deref(),
            *reproject,
            vectors,
        ),
        Commands::Angle {
            degrees,
            reference,
            others,
        } => cmd_angle(&cli, *degrees || config.degrees, reference, others),
        Commands::Nearest {
            target,
            inclusive,
            tiebreak,
            candidates,
        } => cmd_nearest(&cli, target, *inclusive, tiebreak.as_deref(), candidates),
        Commands::Project {
            projection,
            symmetry,
            hemisphere,
            vectors,
        } => cmd_project(&cli, projection, symmetry.as_deref(), hemisphere, vectors),
        Commands::Circle {
            opening_angle,
            steps,
            vectors,
        } => cmd_circle(
            &cli,
            *opening_angle,
            steps.unwrap_or(config.circle.steps),
            vectors,
        ),
        Commands::Outer {
            left,
            right,
            chunked,
            chunk_size,
            progress,
        } => {
            let evaluation = if *chunked || chunk_size.is_some() || *progress {
                let base = config.outer.chunk;
                Evaluation::Chunked(ChunkConfig {
                    chunk_size: chunk_size.unwrap_or(base.chunk_size),
                    progress: *progress || base.progress,
                })
            } else {
                config.evaluation()
            };
            cmd_outer(&cli, left, right, &evaluation)
        }
        Commands::Groups => cmd_groups(&cli),
    }
}

fn cmd_reduce(cli: &Cli, symmetry: &str, unique: bool, args: &VectorArgs) -> Result<()> {
    let group: PointGroup = symmetry.parse()?;
    let vectors = args.load()?;
    let reduced = vectors
        .in_fundamental_sector(&Symmetry::new(group))
        .with_context(|| format!("failed to reduce vectors with {group}"))?;

    let reduced = if unique {
        let mut seen = HashSet::new();
        let rows: Vec<[f64; 3]> = reduced
            .rows()
            .filter(|&r| seen.insert(VectorKey::from(r.map(|c| round_to(c, 10)))))
            .collect();
        Vector3d::from_rows(&[rows.len()], &rows)?
    } else {
        reduced
    };
    print_vectors(&reduced, cli.json)
}

#[derive(Serialize)]
struct PolarRow {
    azimuth: f64,
    polar: f64,
    radial: f64,
}

fn cmd_polar(
    cli: &Cli,
    degrees: bool,
    hemisphere: Option<&str>,
    reproject: bool,
    args: &VectorArgs,
) -> Result<()> {
    let mut vectors = args.load()?;
    let hemisphere: Option<Hemisphere> = match hemisphere {
        Some(name) => Some(name.parse()?),
        None if reproject => Some(Hemisphere::default()),
        None => None,
    };
    if let Some(hemisphere) = hemisphere {
        if reproject && hemisphere != Hemisphere::Both {
            vectors = reproject_onto(&vectors, hemisphere)?;
        }
        vectors = keep_visible(&vectors, hemisphere)?;
    }

    let (azimuth, polar, radial) = vectors.to_polar(degrees);
    let rows: Vec<PolarRow> = azimuth
        .iter()
        .zip(polar.iter())
        .zip(radial.iter())
        .map(|((&azimuth, &polar), &radial)| PolarRow {
            azimuth,
            polar,
            radial,
        })
        .collect();

    if cli.json {
        return print_json(&rows);
    }
    for row in &rows {
        println!(
            "{} {} {}",
            number(row.azimuth),
            number(row.polar),
            number(row.radial)
        );
    }
    Ok(())
}

/// The vectors drawn on `hemisphere`, as a flat batch.
fn keep_visible(vectors: &Vector3d, hemisphere: Hemisphere) -> Result<Vector3d> {
    let visible = vectors.visible(hemisphere);
    let rows: Vec<[f64; 3]> = vectors
        .rows()
        .zip(visible.iter())
        .filter_map(|(r, &keep)| keep.then_some(r))
        .collect();
    Ok(Vector3d::from_rows(&[rows.len()], &rows)?)
}

/// Mirror z of every vector not visible on `hemisphere`.
fn reproject_onto(vectors: &Vector3d, hemisphere: Hemisphere) -> Result<Vector3d> {
    let visible = vectors.visible(hemisphere);
    let mirrored = vectors.reprojected();
    let rows: Vec<[f64; 3]> = vectors
        .rows()
        .zip(mirrored.rows())
        .zip(visible.iter())
        .map(|((r, m), &seen)| if seen { r } else { m })
        .collect();
    Ok(Vector3d::from_rows(vectors.batch_shape(), &rows)?)
}

#[derive(Serialize)]
struct ProjectedRow {
    x: f64,
    y: f64,
}

fn cmd_project(
    cli: &Cli,
    projection: &str,
    symmetry: Option<&str>,
    hemisphere: &str,
    args: &VectorArgs,
) -> Result<()> {
    let projection: Projection = projection.parse()?;
    let hemisphere: Hemisphere = hemisphere.parse()?;
    let mut vectors = args.load()?;
    if projection == Projection::Ipf {
        let Some(symmetry) = symmetry else {
            bail!("the ipf projection needs --symmetry");
        };
        let group: PointGroup = symmetry.parse()?;
        vectors = vectors
            .in_fundamental_sector(&Symmetry::new(group))
            .with_context(|| format!("failed to reduce vectors with {group}"))?;
    }
    let vectors = keep_visible(&vectors, hemisphere)?;

    let (x, y) = vectors.stereographic(hemisphere);
    let rows: Vec<ProjectedRow> = x
        .iter()
        .zip(y.iter())
        .map(|(&x, &y)| ProjectedRow { x, y })
        .collect();
    if cli.json {
        return print_json(&rows);
    }
    for row in &rows {
        println!("{} {}", number(row.x), number(row.y));
    }
    Ok(())
}

fn cmd_angle(cli: &Cli, degrees: bool, reference: &str, others: &VectorArgs) -> Result<()> {
    let reference = Vector3d::from_xyz(parse_vector(reference)?);
    let others = others.load()?;
    let angles = reference.angle_with(&others, degrees)?;
    if cli.json {
        return print_json(&ArrayJson::from(&angles));
    }
    for angle in angles.iter() {
        println!("{}", number(*angle));
    }
    Ok(())
}

fn cmd_nearest(
    cli: &Cli,
    target: &str,
    inclusive: bool,
    tiebreak: Option<&str>,
    candidates: &VectorArgs,
) -> Result<()> {
    let target = Vector3d::from_xyz(parse_vector(target)?);
    let tiebreak = tiebreak
        .map(|t| parse_vector(t).map(Vector3d::from_xyz))
        .transpose()?;
    let candidates = candidates.load()?;
    let nearest = target.get_nearest(&candidates, inclusive, tiebreak.as_ref())?;

    if nearest.is_empty() && !cli.json {
        println!("(no eligible candidate)");
        return Ok(());
    }
    print_vectors(&nearest, cli.json)
}

fn cmd_circle(cli: &Cli, opening_angle: f64, steps: usize, args: &VectorArgs) -> Result<()> {
    if steps < 2 {
        bail!("a circle needs at least 2 steps, got {steps}");
    }
    let vectors = args.load()?;
    let circles = vectors
        .get_circle(aview0(&opening_angle.to_radians()).into_dyn(), steps)
        .context("failed to trace circles")?;
    if cli.json {
        return print_vectors(&circles, true);
    }
    for (i, r) in circles.rows().enumerate() {
        if i > 0 && i % steps == 0 {
            println!();
        }
        println!("{}", row_text(r));
    }
    Ok(())
}

fn cmd_outer(cli: &Cli, left: &Path, right: &Path, evaluation: &Evaluation) -> Result<()> {
    let left = read_vectors(left)?;
    let right = read_vectors(right)?;
    let products = left
        .dot_outer(&right, evaluation)
        .context("failed to compute outer dot products")?;
    if cli.json {
        return print_json(&ArrayJson::from(&products));
    }
    for row in products.outer_iter() {
        let line: Vec<String> = row.iter().map(|&x| number(x)).collect();
        println!("{}", line.join(" "));
    }
    Ok(())
}

#[derive(Serialize)]
struct GroupRow {
    name: &'static str,
    schoenflies: &'static str,
    order: usize,
}

fn cmd_groups(cli: &Cli) -> Result<()> {
    let rows: Vec<GroupRow> = PointGroup::all()
        .iter()
        .map(|&g| GroupRow {
            name: g.name(),
            schoenflies: g.schoenflies(),
            order: g.elements().len(),
        })
        .collect();
    if cli.json {
        return print_json(&rows);
    }
    for row in &rows {
        println!("{:<6} {:<4} {}", row.name, row.schoenflies, row.order);
    }
    Ok(())
}
