pub mod explained_variance;
