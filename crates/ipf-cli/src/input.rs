//! Reading vectors from arguments and files, and printing results.

use std::path::Path;

use anyhow::{Context, Result, bail};
use ipf_core::Vector3d;
use ndarray::ArrayD;
use serde::Serialize;

/// Parse `x,y,z` (spaces allowed around the commas).
pub fn parse_vector(text: &str) -> Result<[f64; 3]> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        bail!("expected x,y,z but got \"{text}\"");
    }
    let mut v = [0.0; 3];
    for (slot, part) in v.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .with_context(|| format!("invalid component \"{part}\" in \"{text}\""))?;
    }
    Ok(v)
}

/// A batch from a JSON file holding an array of `[x, y, z]`.
pub fn read_vectors(path: &Path) -> Result<Vector3d> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let rows: Vec<[f64; 3]> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of [x, y, z]", path.display()))?;
    Ok(Vector3d::from_rows(&[rows.len()], &rows)?)
}

/// Positional vectors followed by the contents of `--input`, as one batch.
pub fn collect_vectors(args: &[String], input: Option<&Path>) -> Result<Vector3d> {
    let mut rows = args
        .iter()
        .map(|a| parse_vector(a))
        .collect::<Result<Vec<_>>>()?;
    if let Some(path) = input {
        rows.extend(read_vectors(path)?.rows());
    }
    if rows.is_empty() {
        bail!("no vectors given: pass x,y,z arguments or --input <file>");
    }
    Ok(Vector3d::from_rows(&[rows.len()], &rows)?)
}

/// Fixed six decimals, without negative zero.
pub fn number(x: f64) -> String {
    let x = if x.abs() < 5e-7 { 0.0 } else { x };
    format!("{x:.6}")
}

pub fn row_text(r: [f64; 3]) -> String {
    format!("{} {} {}", number(r[0]), number(r[1]), number(r[2]))
}

#[derive(Serialize)]
pub struct VectorsJson {
    pub shape: Vec<usize>,
    pub vectors: Vec<[f64; 3]>,
}

impl From<&Vector3d> for VectorsJson {
    fn from(v: &Vector3d) -> Self {
        Self {
            shape: v.batch_shape().to_vec(),
            vectors: v.rows().collect(),
        }
    }
}

#[derive(Serialize)]
pub struct ArrayJson {
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
}

impl From<&ArrayD<f64>> for ArrayJson {
    fn from(a: &ArrayD<f64>) -> Self {
        Self {
            shape: a.shape().to_vec(),
            values: a.iter().copied().collect(),
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_vectors(v: &Vector3d, json: bool) -> Result<()> {
    if json {
        return print_json(&VectorsJson::from(v));
    }
    for r in v.rows() {
        println!("{}", row_text(r));
    }
    Ok(())
}
