//! Neural controller for vehicles.
//!
//! A [`Brain`] is an ordered stack of fully-connected sigmoid layers. Its
//! parameters can be flattened into a genotype (a flat `Vec<f32>`) and restored
//! from one, which is how the genetic algorithm reads and writes controllers.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::BrainError;

pub mod mlp;

pub use mlp::{Mlp, sigmoid};

/// Neural network brain mapping sensor readings to control outputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    /// Ordered layers from input to output.
    layers: Vec<Mlp>,
}

impl Brain {
    /// Creates a brain with the given layer sizes and all parameters set to zero.
    ///
    /// `layer_sizes` lists the input size followed by each layer's output size,
    /// so `[5, 4, 3, 2]` builds three layers.
    pub fn new(layer_sizes: &[usize]) -> Result<Self, BrainError> {
        if layer_sizes.len() < 2 {
            return Err(BrainError::TooFewSizes(layer_sizes.len()));
        }

        let mut brain = Self::default();
        for pair in layer_sizes.windows(2) {
            brain.add_layer(pair[0], pair[1])?;
        }
        Ok(brain)
    }

    /// Creates a new brain with weights drawn uniformly from `[min, max]`.
    pub fn new_random<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        min: f32,
        max: f32,
        rng: &mut R,
    ) -> Result<Self, BrainError> {
        let mut brain = Self::new(layer_sizes)?;
        brain.randomize(min, max, rng);
        Ok(brain)
    }

    /// Appends a zero-initialized layer.
    ///
    /// The layer's input size must match the previous layer's output size.
    pub fn add_layer(&mut self, input_size: usize, output_size: usize) -> Result<(), BrainError> {
        let index = self.layers.len();
        if input_size == 0 || output_size == 0 {
            return Err(BrainError::ZeroSizedLayer { index });
        }
        if let Some(previous) = self.layers.last() {
            if previous.output_size() != input_size {
                return Err(BrainError::MismatchedTopology {
                    index,
                    expected: previous.output_size(),
                    actual: input_size,
                });
            }
        }

        self.layers.push(Mlp::zeros(input_size, output_size));
        Ok(())
    }

    /// Layers from input to output.
    pub fn layers(&self) -> &[Mlp] {
        &self.layers
    }

    /// Input size followed by each layer's output size.
    pub fn topology(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.layers.len() + 1);
        if let Some(first) = self.layers.first() {
            sizes.push(first.input_size());
        }
        sizes.extend(self.layers.iter().map(Mlp::output_size));
        sizes
    }

    /// Total number of weights and biases, which is also the genotype length.
    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(Mlp::parameter_count).sum()
    }

    /// Runs a forward pass through every layer.
    pub fn think(&self, inputs: &Array1<f32>) -> Result<Array1<f32>, BrainError> {
        let first = self.layers.first().ok_or(BrainError::Empty)?;
        if inputs.len() != first.input_size() {
            return Err(BrainError::InputSize {
                expected: first.input_size(),
                actual: inputs.len(),
            });
        }

        let mut output = inputs.clone();
        for layer in &self.layers {
            output = layer.forward(&output);
        }
        Ok(output)
    }

    /// Replaces every weight and bias with an independent draw from `[min, max]`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, min: f32, max: f32, rng: &mut R) {
        for layer in &mut self.layers {
            layer.randomize(min, max, rng);
        }
    }

    /// Flattens all weights and biases into a single genotype vector.
    pub fn to_flat_vector(&self) -> Vec<f32> {
        let mut flat = Vec::with_capacity(self.parameter_count());
        for layer in &self.layers {
            layer.write_genes(&mut flat);
        }
        flat
    }

    /// Restores all weights and biases from a genotype produced by [`Brain::to_flat_vector`].
    pub fn set_weights(&mut self, genes: &[f32]) -> Result<(), BrainError> {
        let expected = self.parameter_count();
        if genes.len() != expected {
            return Err(BrainError::GenotypeLength {
                expected,
                actual: genes.len(),
            });
        }

        let mut offset = 0;
        for layer in &mut self.layers {
            let count = layer.parameter_count();
            layer.read_genes(&genes[offset..offset + count]);
            offset += count;
        }
        Ok(())
    }
}
