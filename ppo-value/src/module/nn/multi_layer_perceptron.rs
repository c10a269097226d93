use std::fmt::Debug;

use burn::module::{Module, Param};
use burn::nn::{Initializer, Linear, LinearConfig};
use burn::prelude::*;
use burn::tensor::activation::tanh;

use crate::error::{self, ValueFunctionError};

/// Tanh network with a linear output layer.
#[derive(Config)]
pub struct MultiLayerPerceptronConfig {
    /// (input size, hidden size, ..., output size)
    sizes: Vec<usize>,
}

#[derive(Module, Debug)]
pub struct MultiLayerPerceptron<B: Backend> {
    linear_layers: Vec<Linear<B>>,
}

/// Weights drawn from N(0, 1 / fan_in), biases zeroed.
fn create_linear_layer<B: Backend>(
    input_size: usize,
    output_size: usize,
    device: &B::Device,
) -> Linear<B> {
    let mut layer = LinearConfig::new(input_size, output_size)
        .with_initializer(Initializer::Normal {
            mean: 0.0,
            std: (1.0 / input_size as f64).sqrt(),
        })
        .init(device);
    layer.bias = Some(Param::from_tensor(Tensor::zeros([output_size], device)));
    layer
}

impl MultiLayerPerceptronConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> error::Result<MultiLayerPerceptron<B>> {
        self.assertions()?;
        let linear_layers = self
            .sizes
            .windows(2)
            .map(|pair| create_linear_layer(pair[0], pair[1], device))
            .collect();
        Ok(MultiLayerPerceptron { linear_layers })
    }

    fn assertions(&self) -> error::Result<()> {
        if self.sizes.len() < 2 {
            return Err(ValueFunctionError::InvalidConfig(format!(
                "Unable to construct MLP. Expected (input size, hidden size, ..., output size), got {:?}",
                self.sizes
            )));
        }
        if self.sizes.contains(&0) {
            return Err(ValueFunctionError::InvalidConfig(format!(
                "MLP layer sizes should be positive, got {:?}",
                self.sizes
            )));
        }
        Ok(())
    }
}

impl<B: Backend> MultiLayerPerceptron<B> {
    pub fn forward<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        let mut x = input;

        match self.linear_layers.split_last() {
            Some((output, hidden)) => {
                for layer in hidden {
                    x = tanh(layer.forward(x));
                }
                output.forward(x)
            }
            None => x,
        }
    }
}
