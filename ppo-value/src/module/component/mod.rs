pub mod abc;
pub mod value_function;

pub use abc::Value;
pub use value_function::{FitReport, ValueFunction, ValueFunctionConfig};
