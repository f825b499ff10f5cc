#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use carsim::simulation::brain::{Brain, sigmoid};
use carsim::simulation::error::BrainError;
use ndarray::Array1;
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn rng() -> SmallRng {
    SmallRng::seed_from_u64(17)
}

#[test]
fn test_genotype_length_for_default_topology() {
    let brain = Brain::new_random(&[5, 4, 3, 2], -1.0, 1.0, &mut rng()).unwrap();

    // 4 * (5 + 1) + 3 * (4 + 1) + 2 * (3 + 1)
    assert_eq!(brain.parameter_count(), 47);
    assert_eq!(brain.to_flat_vector().len(), 47);
}

#[test]
fn test_flatten_round_trip_is_exact() {
    let original = Brain::new_random(&[5, 4, 3, 2], -3.0, 3.0, &mut rng()).unwrap();
    let genes = original.to_flat_vector();

    let mut restored = Brain::new(&[5, 4, 3, 2]).unwrap();
    restored.set_weights(&genes).unwrap();

    assert_eq!(restored, original);
    assert_eq!(restored.to_flat_vector(), genes);
}

#[test]
fn test_set_weights_rejects_wrong_length() {
    let mut brain = Brain::new(&[5, 4, 3, 2]).unwrap();

    for len in [0, 46, 48] {
        assert_eq!(
            brain.set_weights(&vec![0.0; len]),
            Err(BrainError::GenotypeLength {
                expected: 47,
                actual: len,
            })
        );
    }
}

#[test]
fn test_flat_order_follows_layers_then_rows() {
    let mut brain = Brain::new(&[2, 1, 1]).unwrap();
    // layer 0: w00, w01, b0; layer 1: w00, b0
    brain.set_weights(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

    let layers = brain.layers();
    assert_eq!(layers[0].weights[[0, 0]], 1.0);
    assert_eq!(layers[0].weights[[0, 1]], 2.0);
    assert_eq!(layers[0].biases[0], 3.0);
    assert_eq!(layers[1].weights[[0, 0]], 4.0);
    assert_eq!(layers[1].biases[0], 5.0);
}

#[test]
fn test_think_applies_sigmoid_on_every_layer() {
    let mut brain = Brain::new(&[2, 1, 1]).unwrap();
    brain.set_weights(&[1.0, 1.0, 0.0, 2.0, -1.0]).unwrap();

    let out = brain.think(&Array1::from_vec(vec![0.5, 0.5])).unwrap();
    let hidden = sigmoid(1.0);
    let expected = sigmoid(2.0 * hidden - 1.0);

    assert_eq!(out.len(), 1);
    assert!((out[0] - expected).abs() < 1e-6);
}

#[test]
fn test_zero_weights_output_half() {
    let brain = Brain::new(&[5, 4, 3, 2]).unwrap();
    let out = brain.think(&Array1::ones(5)).unwrap();

    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|&o| (o - 0.5).abs() < 1e-6));
}

#[test]
fn test_think_rejects_empty_network() {
    let brain = Brain::default();
    assert_eq!(
        brain.think(&Array1::zeros(5)),
        Err(BrainError::Empty)
    );
}

#[test]
fn test_think_rejects_wrong_input_length() {
    let brain = Brain::new(&[5, 4, 3, 2]).unwrap();
    assert_eq!(
        brain.think(&Array1::zeros(4)),
        Err(BrainError::InputSize {
            expected: 5,
            actual: 4,
        })
    );
}

#[test]
fn test_random_weights_stay_in_range() {
    let brain = Brain::new_random(&[5, 4, 3, 2], -0.25, 0.75, &mut rng()).unwrap();
    let genes = brain.to_flat_vector();

    assert!(genes.iter().all(|&g| (-0.25..=0.75).contains(&g)));
    // independent draws
    assert!(genes.iter().any(|&g| g != genes[0]));
}

#[test]
fn test_too_few_sizes() {
    assert_eq!(Brain::new(&[5]), Err(BrainError::TooFewSizes(1)));
}

#[test]
fn test_seeded_random_brains_match() {
    let a = Brain::new_random(&[5, 4, 3, 2], -1.0, 1.0, &mut rng()).unwrap();
    let b = Brain::new_random(&[5, 4, 3, 2], -1.0, 1.0, &mut rng()).unwrap();
    assert_eq!(a, b);

    let mut shared = rng();
    let first = Brain::new_random(&[5, 4, 3, 2], -1.0, 1.0, &mut shared).unwrap();
    let second = Brain::new_random(&[5, 4, 3, 2], -1.0, 1.0, &mut shared).unwrap();
    assert_ne!(first, second);
}
