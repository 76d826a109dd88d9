use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Upcoming pieces, generated with the 7-bag randomizer.
///
/// # 7-Bag System
///
/// 1. A "bag" containing each of the 7 piece types once is shuffled
/// 2. Pieces are dequeued from the front in order
/// 3. A whole new bag is appended when the buffered pieces no longer cover the
///    preview window
///
/// Every run of 7 dequeues starting at a bag boundary contains each type exactly once.
///
/// # Example
///
/// ```
/// use duelris_engine::{MatchSeed, PieceQueue};
///
/// let mut queue = PieceQueue::with_seed(MatchSeed::from_u64(42), 5);
/// let first = queue.pop_next();
/// let upcoming: Vec<_> = queue.preview().collect();
/// assert_eq!(upcoming.len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct PieceQueue {
    rng: Pcg32,
    bag: VecDeque<PieceKind>,
    preview_len: usize,
}

impl PieceQueue {
    #[must_use]
    pub fn with_seed(seed: MatchSeed, preview_len: usize) -> Self {
        Self::with_rng(Pcg32::from_seed(seed.0), preview_len)
    }

    #[must_use]
    pub fn with_rng(rng: Pcg32, preview_len: usize) -> Self {
        let mut this = Self {
            rng,
            bag: VecDeque::with_capacity(PieceKind::LEN * 2),
            preview_len,
        };
        this.fill_bag();
        this
    }

    /// Appends shuffled bags until more pieces than the preview window are buffered.
    fn fill_bag(&mut self) {
        while self.bag.len() <= self.preview_len {
            let mut new_bag = PieceKind::ALL;
            new_bag.shuffle(&mut self.rng);
            self.bag.extend(new_bag);
        }
    }

    /// Dequeues the next piece and refills the buffer if needed.
    pub fn pop_next(&mut self) -> PieceKind {
        self.fill_bag();
        let next = self.bag.pop_front().unwrap_or(PieceKind::I);
        self.fill_bag();
        next
    }

    /// Returns the next pieces in the preview window.
    pub fn preview(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.bag.iter().copied().take(self.preview_len)
    }

    #[must_use]
    pub fn preview_len(&self) -> usize {
        self.preview_len
    }
}

/// Seed for deterministic piece generation and garbage placement.
///
/// A 128-bit seed, serialized as a 32-character hex string. Two matches created with
/// the same seed see the same piece sequence.
///
/// ```
/// use duelris_engine::MatchSeed;
/// use rand::Rng as _;
///
/// let seed: MatchSeed = rand::rng().random();
/// let parsed: MatchSeed = seed.to_string().parse().unwrap();
/// assert_eq!(parsed, seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchSeed([u8; 16]);

impl MatchSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Expands a 64-bit number into a seed.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

/// Error returned when parsing a [`MatchSeed`] from a string.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed '{input}': expected 32 hex characters")]
pub struct ParseSeedError {
    #[error(not(source))]
    input: String,
}

impl fmt::Display for MatchSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for MatchSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for MatchSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MatchSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<MatchSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> MatchSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        MatchSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_each_bag_has_every_piece_once() {
        let mut queue = PieceQueue::with_seed(MatchSeed::from_u64(1), 5);
        for _ in 0..10 {
            let bag: HashSet<_> = (0..PieceKind::LEN).map(|_| queue.pop_next()).collect();
            assert_eq!(bag.len(), PieceKind::LEN);
        }
    }

    #[test]
    fn test_preview_matches_upcoming_pops() {
        let mut queue = PieceQueue::with_seed(MatchSeed::from_u64(9), 5);
        for _ in 0..30 {
            let preview: Vec<_> = queue.preview().collect();
            assert_eq!(preview.len(), 5);
            let popped: Vec<_> = (0..5).map(|_| queue.pop_next()).collect();
            assert_eq!(preview, popped);
        }
    }

    #[test]
    fn test_long_preview_window() {
        let queue = PieceQueue::with_seed(MatchSeed::from_u64(3), 12);
        assert_eq!(queue.preview().count(), 12);
    }

    #[test]
    fn test_deterministic_piece_generation() {
        let seed = MatchSeed::from_bytes([
            0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66,
            0x77, 0x88,
        ]);
        let mut queue1 = PieceQueue::with_seed(seed, 5);
        let mut queue2 = PieceQueue::with_seed(seed, 5);
        for _ in 0..20 {
            assert_eq!(queue1.pop_next(), queue2.pop_next());
        }
    }

    #[test]
    fn test_seed_known_value_sequential_bytes() {
        let seed = MatchSeed::from_bytes([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");

        let deserialized: MatchSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, seed);
    }

    #[test]
    fn test_seed_from_u64() {
        assert_eq!(
            MatchSeed::from_u64(255).to_string(),
            "000000000000000000000000000000ff"
        );
    }

    #[test]
    fn test_seed_parse_errors() {
        assert!("".parse::<MatchSeed>().is_err());
        assert!("0123456789abcdef0123456789abcde".parse::<MatchSeed>().is_err());
        assert!(
            "ghijklmnopqrstuvwxyzghijklmnopqr"
                .parse::<MatchSeed>()
                .is_err()
        );
        let err = serde_json::from_str::<MatchSeed>("\"xyz\"").unwrap_err();
        assert!(err.to_string().contains("invalid hex seed"));
    }
}
