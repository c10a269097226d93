//! State-value function approximator for PPO: a small tanh MLP refit on
//! each batch of empirical returns, replaying the previous batch once.

pub mod data;
pub mod error;
pub mod logging;
pub mod module;
pub mod objective;

pub use error::{Result, ValueFunctionError};
pub use logging::{LogMetricLogger, MetricHistory, MetricLogger, Metrics};
pub use module::component::{FitReport, Value, ValueFunction, ValueFunctionConfig};
