use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

pub const KOANS: [&str; 5] = [
    "Two hands clap and there is a sound; what is the sound of one hand?",
    "A monk asked: What is Buddha? — This very mind.",
    "Before enlightenment, chop wood, carry water. After enlightenment, chop wood, carry water.",
    "Joshu asked: Does a dog have Buddha-nature? — Mu.",
    "Not knowing is most intimate.",
];

/// Picks koans uniformly at random from the built-in list plus any extras.
pub struct KoanPicker {
    koans: Vec<String>,
    rng: Pcg64,
}

impl KoanPicker {
    pub fn new(extra: &[String]) -> Self {
        Self::with_rng(extra, Pcg64::from_entropy())
    }

    /// Deterministic picker for tests.
    pub fn seeded(extra: &[String], seed: u64) -> Self {
        Self::with_rng(extra, Pcg64::seed_from_u64(seed))
    }

    fn with_rng(extra: &[String], rng: Pcg64) -> Self {
        let koans = KOANS
            .iter()
            .map(|k| k.to_string())
            .chain(extra.iter().filter(|k| !k.trim().is_empty()).cloned())
            .collect();
        Self { koans, rng }
    }

    pub fn koans(&self) -> &[String] {
        &self.koans
    }

    pub fn next_koan(&mut self) -> &str {
        let i = self.rng.gen_range(0..self.koans.len());
        &self.koans[i]
    }
}
