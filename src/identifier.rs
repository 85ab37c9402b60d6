// Booking identifier generation

use rand::rngs::ThreadRng;
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

// Inclusive bounds: 900 possible suffixes
pub const SUFFIX_MIN: u16 = 100;
pub const SUFFIX_MAX: u16 = 999;

const PREFIX_LEN: usize = 3;

// Source of the numeric suffix appended when the base id is taken
pub trait SuffixSource {
    fn next_suffix(&mut self) -> u16;
}

pub struct RandomSuffix<R = ThreadRng> {
    rng: R,
}

impl RandomSuffix<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomSuffix<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomSuffix<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> SuffixSource for RandomSuffix<R> {
    fn next_suffix(&mut self) -> u16 {
        self.rng.gen_range(SUFFIX_MIN..=SUFFIX_MAX)
    }
}

fn prefix(part: &str) -> String {
    part.trim().to_uppercase().chars().take(PREFIX_LEN).collect()
}

/// Builds an id from the first three letters of the name and surname.
///
/// When that base is already in use a three digit suffix is appended, drawing
/// new suffixes until the candidate is free. Comparison ignores case.
pub fn generate<I, T, S>(name: &str, surname: &str, existing_ids: I, suffixes: &mut S) -> String
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
    S: SuffixSource + ?Sized,
{
    let taken: HashSet<String> = existing_ids
        .into_iter()
        .map(|id| id.as_ref().to_uppercase())
        .collect();

    let base = format!("{}{}", prefix(name), prefix(surname));
    let mut candidate = base.clone();
    while taken.contains(&candidate) {
        debug!("Booking id {} is taken, drawing a suffix", candidate);
        candidate = format!("{}{}", base, suffixes.next_suffix());
    }
    candidate
}
