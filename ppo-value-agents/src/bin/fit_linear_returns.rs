use burn::backend::{Autodiff, NdArray};
use flexi_logger::Logger;
use ppo_value::{LogMetricLogger, ValueFunctionConfig};
use ppo_value_agents::linear_returns::LinearReturnsConfig;
use rand::{rngs::StdRng, SeedableRng};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _logger = Logger::try_with_env_or_str("info")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    log::info!("Fitting value function to linear returns");
    type B = Autodiff<NdArray>;
    let device = Default::default();

    let cfg = LinearReturnsConfig::new();
    let value_function = ValueFunctionConfig::new(cfg.obs_dim).init::<B>(&device)?;
    let algorithm = cfg.init(value_function, StdRng::seed_from_u64(cfg.seed), device)?;

    // Per-fit records only show up with RUST_LOG=metrics=debug.
    let mut metrics = LogMetricLogger::new(log::Level::Debug);
    let value_function = algorithm.train(&mut metrics)?;
    log::info!("Done, learning rate was {:.3e}", value_function.learning_rate());
    Ok(())
}
