use burn::{prelude::Backend, tensor::Tensor};

/// State-value estimator V(s) over a batch of observations.
pub trait Value<B: Backend> {
    type OBatch;

    fn v_batch(&self, observations: &Self::OBatch) -> Tensor<B, 1>;
}
