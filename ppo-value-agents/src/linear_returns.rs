use burn::config::Config;
use burn::optim::Optimizer;
use burn::prelude::*;
use burn::tensor::{backend::AutodiffBackend, TensorData};
use ppo_value::{
    module::nn::multi_layer_perceptron::MultiLayerPerceptron, MetricLogger, ValueFunction,
    ValueFunctionError,
};
use rand::Rng;
use tqdm::tqdm;

/// Synthetic returns `y = sum(x)` over observations uniform in [-1, 1].
#[derive(Config)]
pub struct LinearReturnsConfig {
    #[config(default = 3)]
    pub obs_dim: usize,
    #[config(default = 10)]
    pub batch_rows: usize,
    #[config(default = 200)]
    pub iterations: usize,
    #[config(default = 0)]
    pub seed: u64,
}

pub struct LinearReturnsAlgorithm<B, O, R>
where
    B: AutodiffBackend,
    O: Optimizer<MultiLayerPerceptron<B>, B>,
    R: Rng,
{
    cfg: LinearReturnsConfig,
    value_function: ValueFunction<B, O>,
    rng: R,
    device: B::Device,
}

impl LinearReturnsConfig {
    pub fn sample<B: Backend, R: Rng>(
        &self,
        rng: &mut R,
        device: &B::Device,
    ) -> (Tensor<B, 2>, Tensor<B, 1>) {
        let observations: Vec<f32> = (0..self.batch_rows * self.obs_dim)
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect();
        let returns: Vec<f32> = observations
            .chunks(self.obs_dim)
            .map(|row| row.iter().sum())
            .collect();
        (
            Tensor::from_data(
                TensorData::new(observations, [self.batch_rows, self.obs_dim]),
                device,
            ),
            Tensor::from_data(TensorData::new(returns, [self.batch_rows]), device),
        )
    }

    pub fn init<B, O, R>(
        &self,
        value_function: ValueFunction<B, O>,
        rng: R,
        device: B::Device,
    ) -> ppo_value::Result<LinearReturnsAlgorithm<B, O, R>>
    where
        B: AutodiffBackend,
        O: Optimizer<MultiLayerPerceptron<B>, B>,
        R: Rng,
    {
        let expected = value_function.config().obs_dim;
        if expected != self.obs_dim {
            return Err(ValueFunctionError::DimensionMismatch {
                expected,
                actual: self.obs_dim,
            });
        }
        Ok(LinearReturnsAlgorithm {
            cfg: self.clone(),
            value_function,
            rng,
            device,
        })
    }
}

impl<B, O, R> LinearReturnsAlgorithm<B, O, R>
where
    B: AutodiffBackend,
    O: Optimizer<MultiLayerPerceptron<B>, B>,
    R: Rng,
{
    /// Fits one fresh batch per iteration and hands back the trained model.
    pub fn train<L: MetricLogger + ?Sized>(
        mut self,
        logger: &mut L,
    ) -> ppo_value::Result<ValueFunction<B, O>> {
        for step in tqdm(0..self.cfg.iterations) {
            let (observations, returns) = self.cfg.sample::<B, R>(&mut self.rng, &self.device);
            let report = self.value_function.fit(observations, returns, logger)?;

            if step % 50 == 0 {
                log::info!(
                    "Step {step}: loss {:.4}, explained variance {:.3} -> {:.3}",
                    report.loss,
                    report.explained_var_old,
                    report.explained_var_new
                );
            }
        }
        Ok(self.value_function)
    }
}
