use std::ops::Range;

use burn::prelude::*;
use burn::tensor::TensorData;
use rand::{seq::SliceRandom, Rng};

use crate::error::{Result, ValueFunctionError};

/// Observations and their return targets, kept row aligned.
#[derive(Clone, Debug)]
pub struct Batch<B: Backend> {
    pub observations: Tensor<B, 2>,
    pub targets: Tensor<B, 1>,
}

impl<B: Backend> Batch<B> {
    pub fn new(observations: Tensor<B, 2>, targets: Tensor<B, 1>) -> Result<Self> {
        let [rows, _] = observations.dims();
        let [n_targets] = targets.dims();
        if rows != n_targets {
            return Err(ValueFunctionError::DimensionMismatch {
                expected: rows,
                actual: n_targets,
            });
        }
        if rows == 0 {
            return Err(ValueFunctionError::EmptyBatch);
        }
        Ok(Batch {
            observations,
            targets,
        })
    }

    pub fn len(&self) -> usize {
        self.observations.dims()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn obs_dim(&self) -> usize {
        self.observations.dims()[1]
    }

    /// Stacks batches row-wise, in the order given.
    pub fn cat(batches: Vec<Self>) -> Self {
        let (observations, targets): (Vec<_>, Vec<_>) = batches
            .into_iter()
            .map(|batch| (batch.observations, batch.targets))
            .unzip();
        Batch {
            observations: Tensor::cat(observations, 0),
            targets: Tensor::cat(targets, 0),
        }
    }

    /// Applies one random permutation to observations and targets alike.
    pub fn shuffle<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let n = self.len();
        let mut permutation: Vec<i32> = (0..n as i32).collect();
        permutation.shuffle(rng);

        let device = self.observations.device();
        let indices = Tensor::<B, 1, Int>::from_data(
            TensorData::new(permutation, [n]).convert::<B::IntElem>(),
            &device,
        );
        Batch {
            observations: self.observations.select(0, indices.clone()),
            targets: self.targets.select(0, indices),
        }
    }

    pub fn slice(&self, rows: Range<usize>) -> Self {
        Batch {
            observations: self.observations.clone().slice([rows.clone()]),
            targets: self.targets.clone().slice([rows]),
        }
    }

    /// `num_batches` contiguous slices of `batch_size` rows from the front.
    pub fn minibatches(
        &self,
        num_batches: usize,
        batch_size: usize,
    ) -> impl Iterator<Item = Self> + '_ {
        (0..num_batches).map(move |j| self.slice(j * batch_size..(j + 1) * batch_size))
    }
}

/// Splits `rows` into `(num_batches, batch_size)` with roughly
/// `minibatch_rows` rows per minibatch. Rows past `num_batches * batch_size`
/// are not covered.
pub fn minibatch_layout(rows: usize, minibatch_rows: usize) -> (usize, usize) {
    let num_batches = (rows / minibatch_rows).max(1);
    (num_batches, rows / num_batches)
}

/// Copies a 1-D tensor back to the host as `f32`.
pub fn to_host<B: Backend>(tensor: Tensor<B, 1>) -> Result<Vec<f32>> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|err| ValueFunctionError::TensorData(format!("{err:?}")))
}
