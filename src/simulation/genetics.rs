//! Genetic operators and population construction.
//!
//! Genotypes are the flat weight vectors of [`Brain`](super::brain::Brain).
//! Every new generation is bred from the two leaders of the previous one:
//! their genotypes are crossed over gene by gene, both children are mutated
//! and the pair is emitted, until the population is full.

use std::f32::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::brain::Brain;
use super::error::GeneticsError;
use super::params::Params;
use super::vehicle::Vehicle;

/// How a new generation is bred from the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreedingStrategy {
    /// Every child pair comes from the two leaders.
    #[default]
    Leaders,
    /// Both leaders survive unchanged; the rest come from random pairs of the
    /// previous generation.
    RandomRecombination,
}

/// Swaps each gene between `a` and `b` with independent probability `probability`.
pub fn cross_over<R: Rng + ?Sized>(
    a: &mut [f32],
    b: &mut [f32],
    probability: f32,
    rng: &mut R,
) -> Result<(), GeneticsError> {
    if a.len() != b.len() {
        return Err(GeneticsError::GenotypeLength {
            left: a.len(),
            right: b.len(),
        });
    }

    for (gene_a, gene_b) in a.iter_mut().zip(b.iter_mut()) {
        if rng.random::<f32>() < probability {
            std::mem::swap(gene_a, gene_b);
        }
    }
    Ok(())
}

/// With probability `apply_probability`, mutates the genotype with [`mutate_genes`].
pub fn mutate_genotype<R: Rng + ?Sized>(
    genes: &mut [f32],
    apply_probability: f32,
    gene_probability: f32,
    amount: f32,
    rng: &mut R,
) {
    if rng.random::<f32>() < apply_probability {
        mutate_genes(genes, gene_probability, amount, rng);
    }
}

/// Adds a uniform value in `[-amount, amount]` to each gene with probability `probability`.
pub fn mutate_genes<R: Rng + ?Sized>(genes: &mut [f32], probability: f32, amount: f32, rng: &mut R) {
    for gene in genes.iter_mut() {
        if rng.random::<f32>() < probability {
            *gene += rng.random::<f32>() * amount * 2.0 - amount;
        }
    }
}

/// Crosses and mutates one pair of genotypes with the configured probabilities.
fn breed_pair<R: Rng + ?Sized>(
    a: &mut [f32],
    b: &mut [f32],
    params: &Params,
    rng: &mut R,
) -> Result<(), GeneticsError> {
    cross_over(a, b, params.crossover_probability, rng)?;
    for genes in [a, b] {
        mutate_genotype(
            genes,
            params.mutation_genotype_probability,
            params.mutation_gene_probability,
            params.mutation_gene_amount,
            rng,
        );
    }
    Ok(())
}

/// Breeds `count` child genotypes from two parents.
///
/// Each round takes fresh copies of both parents' genotypes, crosses them over,
/// mutates both and emits them as a pair. If `count` is odd the second child
/// of the final round is dropped.
pub fn cross_over_and_mutation<R: Rng + ?Sized>(
    parent_a: Option<&Vehicle>,
    parent_b: Option<&Vehicle>,
    count: usize,
    params: &Params,
    rng: &mut R,
) -> Result<Vec<Vec<f32>>, GeneticsError> {
    let (Some(parent_a), Some(parent_b)) = (parent_a, parent_b) else {
        return Err(GeneticsError::MissingParent);
    };

    let mut children = Vec::with_capacity(count);
    while children.len() < count {
        let mut a = parent_a.genotype();
        let mut b = parent_b.genotype();
        breed_pair(&mut a, &mut b, params, rng)?;

        children.push(a);
        if children.len() < count {
            children.push(b);
        }
    }
    Ok(children)
}

/// Breeds `count` genotypes keeping both leaders and recombining random pairs.
///
/// The first two children are exact copies of `best` and `second_best`; the
/// rest are bred from two distinct, randomly drawn members of `previous`.
pub fn random_recombination<R: Rng + ?Sized>(
    previous: &[Vehicle],
    best: Option<&Vehicle>,
    second_best: Option<&Vehicle>,
    count: usize,
    params: &Params,
    rng: &mut R,
) -> Result<Vec<Vec<f32>>, GeneticsError> {
    let (Some(best), Some(second_best)) = (best, second_best) else {
        return Err(GeneticsError::MissingParent);
    };
    if count < 2 {
        return Err(GeneticsError::PopulationTooSmall(count));
    }
    if previous.len() < 2 {
        return Err(GeneticsError::NotEnoughCandidates(previous.len()));
    }

    let mut children = Vec::with_capacity(count);
    children.push(best.genotype());
    children.push(second_best.genotype());

    while children.len() < count {
        let i = rng.random_range(0..previous.len());
        let mut j = rng.random_range(0..previous.len());
        while j == i {
            j = rng.random_range(0..previous.len());
        }

        let mut a = previous[i].genotype();
        let mut b = previous[j].genotype();
        breed_pair(&mut a, &mut b, params, rng)?;

        children.push(a);
        if children.len() < count {
            children.push(b);
        }
    }
    Ok(children)
}

fn check_population_size(size: usize) -> Result<(), GeneticsError> {
    if size < 2 {
        return Err(GeneticsError::PopulationTooSmall(size));
    }
    if size % 2 == 1 {
        return Err(GeneticsError::OddPopulation(size));
    }
    Ok(())
}

fn random_heading<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random_range(-PI..=0.0)
}

/// Builds fresh vehicles from the given genotypes, each with a random heading.
fn vehicles_from_genotypes<R: Rng + ?Sized>(
    genotypes: Vec<Vec<f32>>,
    params: &Params,
    rng: &mut R,
) -> Result<Vec<Vehicle>, GeneticsError> {
    genotypes
        .into_iter()
        .enumerate()
        .map(|(id, genes)| -> Result<Vehicle, GeneticsError> {
            let mut brain = Brain::new(&params.layer_sizes)?;
            brain.set_weights(&genes)?;
            Ok(Vehicle::from_brain(id, random_heading(rng), brain, params))
        })
        .collect()
}

/// Creates a new population of `size` vehicles.
///
/// Without parents every vehicle gets random weights. With both parents the
/// genotypes are bred by [`cross_over_and_mutation`]. Every vehicle gets an
/// independent random heading in `[-π, 0]`.
pub fn create_population<R: Rng + ?Sized>(
    size: usize,
    best: Option<&Vehicle>,
    second_best: Option<&Vehicle>,
    params: &Params,
    rng: &mut R,
) -> Result<Vec<Vehicle>, GeneticsError> {
    check_population_size(size)?;

    if best.is_none() && second_best.is_none() {
        return (0..size)
            .map(|id| -> Result<Vehicle, GeneticsError> {
                let heading = random_heading(rng);
                Ok(Vehicle::new(id, heading, params, rng)?)
            })
            .collect();
    }

    let genotypes = cross_over_and_mutation(best, second_best, size, params, rng)?;
    vehicles_from_genotypes(genotypes, params, rng)
}

/// Creates a new population using the given breeding strategy.
///
/// `previous` is the generation the leaders were selected from; it is only
/// used by [`BreedingStrategy::RandomRecombination`].
pub fn create_population_with<R: Rng + ?Sized>(
    strategy: BreedingStrategy,
    size: usize,
    previous: &[Vehicle],
    best: Option<&Vehicle>,
    second_best: Option<&Vehicle>,
    params: &Params,
    rng: &mut R,
) -> Result<Vec<Vehicle>, GeneticsError> {
    match strategy {
        BreedingStrategy::Leaders => create_population(size, best, second_best, params, rng),
        BreedingStrategy::RandomRecombination => {
            check_population_size(size)?;
            if best.is_none() && second_best.is_none() {
                return create_population(size, None, None, params, rng);
            }
            let genotypes = random_recombination(previous, best, second_best, size, params, rng)?;
            vehicles_from_genotypes(genotypes, params, rng)
        }
    }
}
