//! Pairwise dot products between two vector batches.
//!
//! Both evaluation modes contract the trailing component axis and return an
//! array of shape `S1 ++ S2`. The chunked mode splits both flattened batches
//! into blocks of `chunk_size` vectors and fills the result block by block,
//! with the row blocks running on the rayon pool. It never changes the
//! numbers, only how much intermediate memory one block needs.

use indicatif::{ProgressBar, ProgressStyle};
use ndarray::{Array2, ArrayD, Axis, IxDyn, s};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::DEFAULT_CHUNK_SIZE;
use crate::error::{Result, VectorError};
use crate::vector::Vector3d;

/// Settings of the chunked evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Vectors per block along each batch.
    pub chunk_size: usize,
    /// Draw a progress bar on stderr.
    pub progress: bool,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            progress: false,
        }
    }
}

/// How `dot_outer` evaluates the contraction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Evaluation {
    /// One dense matrix product.
    #[default]
    Eager,
    /// Block-wise accumulation with bounded working memory.
    Chunked(ChunkConfig),
}

impl Evaluation {
    pub fn chunked(chunk_size: usize) -> Self {
        Evaluation::Chunked(ChunkConfig {
            chunk_size,
            ..ChunkConfig::default()
        })
    }
}

pub fn dot_outer(
    left: &Vector3d,
    right: &Vector3d,
    evaluation: &Evaluation,
) -> Result<ArrayD<f64>> {
    let a = left.to_rows();
    let b = right.to_rows();
    let product = match evaluation {
        Evaluation::Eager => a.dot(&b.t()),
        Evaluation::Chunked(config) => chunked(&a, &b, config)?,
    };

    let mut shape = left.batch_shape().to_vec();
    shape.extend_from_slice(right.batch_shape());
    Ok(product.into_shape_with_order(IxDyn(&shape))?)
}

fn chunked(a: &Array2<f64>, b: &Array2<f64>, config: &ChunkConfig) -> Result<Array2<f64>> {
    let size = config.chunk_size;
    if size == 0 {
        return Err(VectorError::InvalidChunkSize);
    }
    let row_blocks = a.nrows().div_ceil(size);
    let col_blocks = b.nrows().div_ceil(size);
    debug!(
        rows = a.nrows(),
        cols = b.nrows(),
        chunk_size = size,
        row_blocks,
        col_blocks,
        "chunked dot_outer"
    );

    let progress = if config.progress {
        let bar = ProgressBar::new(row_blocks as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} blocks {elapsed}") {
            bar.set_style(style);
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut out = Array2::zeros((a.nrows(), b.nrows()));
    let blocks: Vec<_> = a
        .axis_chunks_iter(Axis(0), size)
        .zip(out.axis_chunks_iter_mut(Axis(0), size))
        .collect();
    blocks.into_par_iter().for_each(|(lhs, mut target)| {
        for (j, rhs) in b.axis_chunks_iter(Axis(0), size).enumerate() {
            let start = j * size;
            target
                .slice_mut(s![.., start..start + rhs.nrows()])
                .assign(&lhs.dot(&rhs.t()));
        }
        progress.inc(1);
    });
    progress.finish_and_clear();

    Ok(out)
}
