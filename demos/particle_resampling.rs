//! Particle filter resampling: plain vs permuted systematic sampling.
//!
//! Each particle carries a weight. Resampling draws `n` particles with
//! replacement, each one about `n * w / W` times. Systematic sampling does it
//! in one pass with one random number. Walking a random permutation first
//! protects against weights that repeat with the same period as the step.

use junban::{permuted_systematic_sample_with_rng, systematic_sample_with_rng, SampleConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy)]
struct Particle {
    x: f64,
    weight: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Likelihood of an observation at x = 0.3, with a bump every 4th particle.
    let particles: Vec<Particle> = (0..12)
        .map(|i| {
            let x = i as f64 / 12.0;
            let bump = if i % 4 == 0 { 2.0 } else { 0.0 };
            Particle {
                x,
                weight: (-(x - 0.3).powi(2) / 0.02).exp() + bump,
            }
        })
        .collect();
    let total: f64 = particles.iter().map(|p| p.weight).sum();
    let n = particles.len();
    let weight_of = |p: &Particle| p.weight;

    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let mut plain = systematic_sample_with_rng(&particles, n, total, weight_of, &mut rng);
    let mut plain_indices = Vec::new();
    while let Some(index) = plain.source_index() {
        plain_indices.push(index);
        plain.next();
    }

    let mut permuted =
        permuted_systematic_sample_with_rng(&particles, n, total, weight_of, &mut rng);
    let mut permuted_indices = Vec::new();
    while let Some(index) = permuted.source_index() {
        permuted_indices.push(index);
        permuted.next();
    }
    permuted_indices.sort_unstable();

    // Same thing through the validated builder; the weight is summed for us.
    let offspring: Vec<f64> = SampleConfig::new(n)
        .with_seed(7)
        .permuted(true)
        .build(&particles, weight_of)?
        .map(|p| p.x)
        .collect();

    println!("particles:");
    for (i, p) in particles.iter().enumerate() {
        let expected = n as f64 * p.weight / total;
        println!("  i={i:2}  x={:.3}  w={:.4}  expected copies={expected:.2}", p.x, p.weight);
    }
    println!();
    println!("systematic indices:          {plain_indices:?}");
    println!("permuted systematic indices: {permuted_indices:?}");
    println!("offspring positions:         {offspring:.3?}");

    Ok(())
}
