use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use rand::RngCore;
use rand::SeedableRng;

use crate::rules::RuleTable;
use crate::types::SpriteIndex;

const MULTIPLIER: u32 = 1_664_525;
const INCREMENT: u32 = 1_013_904_223;
const MODULUS: f64 = 4_294_967_296.0;

/// A linear congruential generator over `u32` (modulus 2^32).
///
/// Every draw made by a generator goes through one `Lcg`, so two generators built with the same
/// seed, rules and dimensions make exactly the same choices.
#[derive(Clone, Debug)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// Seed the generator. Only the low 32 bits of `seed` are kept.
    pub fn new(seed: u64) -> Self {
        Lcg { state: seed as u32 }
    }

    /// Seed the generator from the current UNIX time in milliseconds.
    pub fn from_time() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        Lcg::new(millis)
    }

    /// The current internal state. Feeding it back into [`Lcg::new`] resumes the same stream.
    pub fn seed(&self) -> u32 {
        self.state
    }

    fn advance(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT);

        self.state
    }

    /// A float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.advance() as f64 / MODULUS
    }

    /// An integer in `min..=max`. The bounds are swapped if given in the wrong order.
    pub fn uniform_int(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let span = (hi - lo + 1) as f64;

        lo + (self.next_f64() * span) as i64
    }

    /// Pick one element of `set` uniformly. No draw is made for an empty set.
    pub fn pick_one<'a, T>(&mut self, set: &'a [T]) -> Option<&'a T> {
        if set.is_empty() {
            return None;
        }

        let choice = (self.next_f64() * set.len() as f64) as usize;
        set.get(choice)
    }

    /// Pick one of `candidates` with probability proportional to its rule weight.
    ///
    /// This walks cumulative weights, which lands on the same candidate as expanding every
    /// candidate into `weight` copies and drawing uniformly from the expanded list. Returns `None`
    /// when the candidates carry no weight at all.
    pub fn pick_weighted(
        &mut self,
        candidates: &[SpriteIndex],
        rules: &RuleTable,
    ) -> Option<SpriteIndex> {
        let total: u64 = candidates.iter().map(|&s| rules.weight(s) as u64).sum();
        if total == 0 {
            return None;
        }

        let mut choice = (self.next_f64() * total as f64) as u64;

        for &candidate in candidates {
            let weight = rules.weight(candidate) as u64;
            if choice < weight {
                return Some(candidate);
            }

            choice -= weight;
        }

        None
    }
}

impl RngCore for Lcg {
    fn next_u32(&mut self) -> u32 {
        self.advance()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.advance() as u64;
        let lo = self.advance() as u64;

        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.advance().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Lcg {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Lcg::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Lcg::new(state)
    }
}
