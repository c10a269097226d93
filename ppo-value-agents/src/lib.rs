pub mod linear_returns;
