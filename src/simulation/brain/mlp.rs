//! Single fully-connected layer with sigmoid activation.

use ndarray::{Array1, Array2, ArrayView1};
use ndarray_rand::RandomExt;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand::rngs::SmallRng;
use ndarray_rand::rand_distr::Uniform;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Logistic sigmoid, `1 / (1 + e^-x)`.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// A single layer of a multi-layer perceptron.
///
/// Together `weights` and `biases` form an `output × (input + 1)` matrix whose
/// trailing column is the bias of each output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Mlp {
    /// Creates a layer with all weights and biases set to zero.
    pub fn zeros(input_size: usize, output_size: usize) -> Self {
        Self {
            weights: Array2::zeros((output_size, input_size)),
            biases: Array1::zeros(output_size),
        }
    }

    /// Number of inputs this layer accepts.
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of outputs this layer produces.
    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of genes this layer contributes to a genotype.
    pub fn parameter_count(&self) -> usize {
        self.output_size() * (self.input_size() + 1)
    }

    /// Performs forward pass with sigmoid activation.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;
        output.mapv_inplace(sigmoid);
        output
    }

    /// Replaces every weight and bias with an independent draw from `[min, max]`.
    ///
    /// The draws are seeded from `rng`, so a seeded caller gets the same layer.
    pub fn randomize<R: Rng + ?Sized>(&mut self, min: f32, max: f32, rng: &mut R) {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        let distribution = Uniform::new_inclusive(low, high);
        let mut draws = SmallRng::seed_from_u64(rng.random::<u64>());
        self.weights = Array2::random_using(self.weights.dim(), distribution, &mut draws);
        self.biases = Array1::random_using(self.biases.len(), distribution, &mut draws);
    }

    /// Appends this layer's genes, row by row: the output's weights followed by its bias.
    pub fn write_genes(&self, genes: &mut Vec<f32>) {
        for (row, bias) in self.weights.rows().into_iter().zip(self.biases.iter()) {
            genes.extend(row.iter().copied());
            genes.push(*bias);
        }
    }

    /// Reads this layer's genes in the order produced by [`Mlp::write_genes`].
    ///
    /// `genes` must hold exactly [`Mlp::parameter_count`] values.
    pub fn read_genes(&mut self, genes: &[f32]) {
        debug_assert_eq!(genes.len(), self.parameter_count());
        let inputs = self.input_size();

        for (j, row) in genes.chunks_exact(inputs + 1).enumerate() {
            self.weights
                .row_mut(j)
                .assign(&ArrayView1::from(&row[..inputs]));
            self.biases[j] = row[inputs];
        }
    }
}
