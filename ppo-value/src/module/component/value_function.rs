use std::iter;

use burn::{
    module::AutodiffModule,
    nn::loss::{MseLoss, Reduction},
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    data::{
        batch::{minibatch_layout, to_host, Batch},
        memory::ReplayMemory,
    },
    error::{self, ValueFunctionError},
    logging::{MetricLogger, Metrics},
    module::{
        component::abc::Value,
        nn::multi_layer_perceptron::{MultiLayerPerceptron, MultiLayerPerceptronConfig},
    },
    objective::explained_variance::{explained_variance, mean_squared_error, variance},
};

pub const VAL_FUNC_LOSS: &str = "ValFuncLoss";
pub const EXPLAINED_VAR_NEW: &str = "ExplainedVarNew";
pub const EXPLAINED_VAR_OLD: &str = "ExplainedVarOld";

const HID3_SIZE: usize = 5;

#[derive(Config, Debug)]
pub struct ValueFunctionConfig {
    pub obs_dim: usize,
    /// First hidden layer width as a multiple of `obs_dim`.
    #[config(default = 10)]
    pub hid1_mult: usize,
    #[config(default = 10)]
    pub epochs: usize,
    /// Target rows per minibatch; the actual size is derived per `fit` call.
    #[config(default = 256)]
    pub minibatch_rows: usize,
    /// Seed for minibatch shuffling.
    #[config(default = 0)]
    pub seed: u64,
}

impl ValueFunctionConfig {
    /// `[hid1, hid2, hid3]`, where hid2 is the truncated geometric mean of
    /// hid1 and hid3.
    pub fn hidden_sizes(&self) -> [usize; 3] {
        let hid1 = self.obs_dim * self.hid1_mult;
        let hid2 = ((hid1 * HID3_SIZE) as f64).sqrt() as usize;
        [hid1, hid2, HID3_SIZE]
    }

    pub fn learning_rate(&self) -> f64 {
        1e-2 / (self.hidden_sizes()[1] as f64).sqrt()
    }

    /// Builds the value function with an Adam optimizer.
    pub fn init<B: AutodiffBackend>(
        &self,
        device: &B::Device,
    ) -> error::Result<ValueFunction<B, impl Optimizer<MultiLayerPerceptron<B>, B>>> {
        let optim = AdamConfig::new()
            .with_epsilon(1e-8)
            .init::<B, MultiLayerPerceptron<B>>();
        ValueFunction::new(self.clone(), optim, device)
    }

    fn assertions(&self) -> error::Result<()> {
        let positive = [
            ("obs_dim", self.obs_dim),
            ("hid1_mult", self.hid1_mult),
            ("epochs", self.epochs),
            ("minibatch_rows", self.minibatch_rows),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ValueFunctionError::InvalidConfig(format!(
                    "{name} should be positive"
                )));
            }
        }
        Ok(())
    }
}

/// Diagnostics of one `fit` call, identical to what was logged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitReport {
    /// Mean squared error on the fitted batch after the update.
    pub loss: f64,
    pub explained_var_new: f64,
    /// Explained variance of the parameters before this call's update.
    pub explained_var_old: f64,
}

impl FitReport {
    pub fn to_metrics(&self) -> Metrics {
        Metrics::from([
            (VAL_FUNC_LOSS.to_string(), self.loss),
            (EXPLAINED_VAR_NEW.to_string(), self.explained_var_new),
            (EXPLAINED_VAR_OLD.to_string(), self.explained_var_old),
        ])
    }
}

/// State-value approximator retrained on each new batch of returns, with the
/// previous batch replayed once.
pub struct ValueFunction<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<MultiLayerPerceptron<B>, B>,
{
    config: ValueFunctionConfig,
    model: MultiLayerPerceptron<B>,
    optim: O,
    learning_rate: f64,
    replay: ReplayMemory<Batch<B>>,
    rng: StdRng,
}

impl<B, O> ValueFunction<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<MultiLayerPerceptron<B>, B>,
{
    pub fn new(config: ValueFunctionConfig, optim: O, device: &B::Device) -> error::Result<Self> {
        config.assertions()?;
        let [hid1, hid2, hid3] = config.hidden_sizes();
        let model = MultiLayerPerceptronConfig::new(vec![config.obs_dim, hid1, hid2, hid3, 1])
            .init(device)?;
        let learning_rate = config.learning_rate();
        log::debug!(
            "Value function layers: {} -> {hid1} -> {hid2} -> {hid3} -> 1, learning rate {learning_rate:.3e}",
            config.obs_dim
        );

        Ok(Self {
            model,
            optim,
            learning_rate,
            replay: ReplayMemory::new(1)?,
            rng: StdRng::seed_from_u64(config.seed),
            config,
        })
    }

    pub fn config(&self) -> &ValueFunctionConfig {
        &self.config
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// The batch that the next `fit` call will replay.
    pub fn replay(&self) -> Option<&Batch<B>> {
        self.replay.latest()
    }

    /// Differentiable value estimates, one per observation row.
    pub fn forward(&self, observations: Tensor<B, 2>) -> Tensor<B, 1> {
        self.model.forward(observations).squeeze(1)
    }

    /// Value estimates copied to the host. Never tracks gradients.
    pub fn predict(&self, observations: Tensor<B, 2>) -> error::Result<Vec<f32>> {
        self.check_obs_dim(&observations)?;
        let values = self
            .model
            .valid()
            .forward(observations.inner())
            .squeeze::<1>(1);
        to_host(values)
    }

    /// Retrains on `(observations, targets)` plus the previously fitted
    /// batch and reports loss and explained variance to `logger`.
    pub fn fit<L: MetricLogger + ?Sized>(
        &mut self,
        observations: Tensor<B, 2>,
        targets: Tensor<B, 1>,
        logger: &mut L,
    ) -> error::Result<FitReport> {
        let batch = Batch::new(observations, targets)?;
        let targets = to_host(batch.targets.clone())?;
        let (num_batches, batch_size) = minibatch_layout(batch.len(), self.config.minibatch_rows);

        let old_predictions = self.predict(batch.observations.clone())?;
        let explained_var_old = explained_variance(&targets, &old_predictions);

        let mut train_set = self.assemble_training_set(batch.clone());
        for _ in 0..self.config.epochs {
            train_set = train_set.shuffle(&mut self.rng);
            for minibatch in train_set.minibatches(num_batches, batch_size) {
                self.train_step(minibatch);
            }
        }

        let new_predictions = self.predict(batch.observations)?;
        let report = FitReport {
            loss: mean_squared_error(&targets, &new_predictions),
            explained_var_new: explained_variance(&targets, &new_predictions),
            explained_var_old,
        };

        if variance(&targets) == 0.0 {
            log::warn!("Value targets have zero variance, explained variance is undefined");
        }
        log::debug!(
            "Fitted {} rows ({num_batches} x {batch_size} per epoch): {report:?}",
            train_set.len()
        );
        logger.log(&report.to_metrics());
        Ok(report)
    }

    /// Current batch followed by the replayed one; the current batch then
    /// replaces the replay.
    fn assemble_training_set(&mut self, batch: Batch<B>) -> Batch<B> {
        let train_set = if self.replay.is_empty() {
            batch.clone()
        } else {
            Batch::cat(
                iter::once(batch.clone())
                    .chain(self.replay.iter().cloned())
                    .collect(),
            )
        };
        self.replay.push(batch);
        train_set
    }

    fn train_step(&mut self, batch: Batch<B>) {
        let predictions = self.forward(batch.observations);
        let loss = MseLoss::new().forward(predictions, batch.targets, Reduction::Mean);
        let grads = GradientsParams::from_grads(loss.backward(), &self.model);
        self.model = self
            .optim
            .step(self.learning_rate, self.model.clone(), grads);
    }

    fn check_obs_dim(&self, observations: &Tensor<B, 2>) -> error::Result<()> {
        let [_, obs_dim] = observations.dims();
        if obs_dim != self.config.obs_dim {
            return Err(ValueFunctionError::DimensionMismatch {
                expected: self.config.obs_dim,
                actual: obs_dim,
            });
        }
        Ok(())
    }
}

impl<B, O> Value<B> for ValueFunction<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<MultiLayerPerceptron<B>, B>,
{
    type OBatch = Tensor<B, 2>;

    fn v_batch(&self, observations: &Self::OBatch) -> Tensor<B, 1> {
        self.forward(observations.clone())
    }
}
