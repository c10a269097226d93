pub mod batch;
pub mod memory;
