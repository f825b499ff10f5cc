//! Error types.
//!
//! Every error here is fatal for the run that produced it. Vehicle death is a
//! normal lifecycle state and never appears as an error.

use thiserror::Error;

/// Configuration errors raised while building or running a neural controller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BrainError {
    /// The network has no layers to evaluate.
    #[error("network has no layers")]
    Empty,
    /// A topology needs at least an input and an output size.
    #[error("topology needs at least 2 layer sizes, got {0}")]
    TooFewSizes(usize),
    /// A layer was declared with zero inputs or zero outputs.
    #[error("layer {index} has zero-sized dimensions")]
    ZeroSizedLayer {
        /// Index of the offending layer.
        index: usize,
    },
    /// A layer's input arity does not match the previous layer's output arity.
    #[error("layer {index} input {actual} does not match previous output {expected}")]
    MismatchedTopology {
        /// Index of the offending layer.
        index: usize,
        /// Output count of the previous layer.
        expected: usize,
        /// Input count of the offending layer.
        actual: usize,
    },
    /// The input vector length does not match the first layer's arity.
    #[error("expected {expected} inputs, got {actual}")]
    InputSize {
        /// Input arity of the first layer.
        expected: usize,
        /// Length of the supplied input vector.
        actual: usize,
    },
    /// The network produces fewer outputs than the vehicle controls need.
    #[error("expected at least {expected} outputs, got {actual}")]
    OutputSize {
        /// Number of outputs required.
        expected: usize,
        /// Number of outputs produced.
        actual: usize,
    },
    /// A genotype does not have exactly one gene per network parameter.
    #[error("genotype has {actual} genes, network expects {expected}")]
    GenotypeLength {
        /// Total parameter count of the network.
        expected: usize,
        /// Length of the supplied genotype.
        actual: usize,
    },
}

/// Errors raised while parsing a track image.
#[derive(Debug, Error)]
pub enum TrackError {
    /// The image could not be opened or decoded.
    #[error("failed to decode track image: {0}")]
    Image(#[from] image::ImageError),
    /// The image has no pixels.
    #[error("track image is empty")]
    EmptyImage,
    /// No start marker region was found.
    #[error("no start marker detected")]
    NoStart,
    /// More than one start marker region was found.
    #[error("expected exactly one start marker, found {0}")]
    MultipleStarts(usize),
    /// No waypoint marker region was found.
    #[error("no waypoints detected")]
    NoWaypoints,
}

/// Errors raised by the genetic operators and population construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeneticsError {
    /// Two genotypes taking part in crossover differ in length.
    #[error("genotype lengths must match ({left} != {right})")]
    GenotypeLength {
        /// Length of the first genotype.
        left: usize,
        /// Length of the second genotype.
        right: usize,
    },
    /// Breeding needs both parents but at least one is missing.
    #[error("expecting both parents for the new generation")]
    MissingParent,
    /// Populations must contain at least two vehicles.
    #[error("new generation must contain at least 2 vehicles, got {0}")]
    PopulationTooSmall(usize),
    /// Populations are bred in pairs and must have an even size.
    #[error("new generation size must be even, got {0}")]
    OddPopulation(usize),
    /// Random recombination needs at least two previous vehicles to draw from.
    #[error("random recombination needs at least 2 previous vehicles, got {0}")]
    NotEnoughCandidates(usize),
    /// A bred genotype could not be applied to a controller.
    #[error(transparent)]
    Brain(#[from] BrainError),
}

/// Top-level error for running a simulation end to end.
#[derive(Debug, Error)]
pub enum Error {
    /// Neural controller configuration error.
    #[error(transparent)]
    Brain(#[from] BrainError),
    /// Track parsing error.
    #[error(transparent)]
    Track(#[from] TrackError),
    /// Breeding error.
    #[error(transparent)]
    Genetics(#[from] GeneticsError),
    /// Invalid simulation parameters.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// File access failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
