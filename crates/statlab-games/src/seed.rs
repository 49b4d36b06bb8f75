use std::{fmt, str::FromStr};

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for deterministic data generation.
///
/// A 128-bit (16-byte) seed that initializes the random number generator a game
/// uses to synthesize its level data. Using the same seed reproduces the same
/// point clouds and subject samples, which enables:
///
/// - Replaying a session with identical data
/// - Reproducible reports
/// - Deterministic testing
///
/// Seeds are written as 32 hexadecimal characters, both in JSON and on the
/// command line.
///
/// # Example
///
/// ```
/// use rand::Rng as _;
/// use statlab_games::GameSeed;
///
/// let seed: GameSeed = rand::rng().random();
/// let parsed: GameSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SeedParseError {
    #[display("invalid hex: expected 32 characters, got {len}")]
    Length { len: usize },
    #[display("invalid hex: {text}")]
    Digits { text: String },
}

impl GameSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Draws a fresh seed from the thread-local generator.
    #[must_use]
    pub fn random() -> Self {
        rand::rng().random()
    }

    /// Creates the generator a game draws one level's data from.
    ///
    /// Each level draws from its own stream, so a level's data does not depend
    /// on which levels were played before it.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn level_rng(self, level: usize) -> Pcg32 {
        let bits = u128::from_be_bytes(self.0);
        let state = (bits >> 64) as u64;
        let stream = bits as u64;
        let level = u64::try_from(level).unwrap_or(u64::MAX);
        Pcg32::new(state, stream.wrapping_add(level))
    }
}

impl fmt::Display for GameSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for GameSeed {
    type Err = SeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(SeedParseError::Length { len: s.len() });
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| SeedParseError::Digits {
            text: s.to_owned(),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for GameSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GameSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `GameSeed` values with `rng.random()`.
impl Distribution<GameSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GameSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GameSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use rand::RngCore as _;

    use super::*;

    #[test]
    fn test_known_value_sequential_bytes() {
        let seed = GameSeed([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");

        let deserialized: GameSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, seed);
    }

    #[test]
    fn test_leading_zeros_are_kept() {
        let seed = GameSeed([0; 16]);
        assert_eq!(seed.to_string(), "0".repeat(32));
    }

    #[test]
    fn test_uppercase_is_accepted() {
        let seed: GameSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
        assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "abc".parse::<GameSeed>(),
            Err(SeedParseError::Length { len: 3 })
        );
        let err = "ghijklmnopqrstuvwxyzghijklmnopqr"
            .parse::<GameSeed>()
            .unwrap_err();
        assert!(err.to_string().contains("invalid hex"));
        assert!(serde_json::from_str::<GameSeed>("\"1234\"").is_err());
    }

    #[test]
    fn test_same_seed_same_stream() {
        let seed = GameSeed([7; 16]);
        let mut a = seed.level_rng(3);
        let mut b = seed.level_rng(3);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_levels_use_distinct_streams() {
        let seed = GameSeed([7; 16]);
        let first = seed.level_rng(0).next_u64();
        assert_eq!(first, seed.level_rng(0).next_u64());
        assert_ne!(first, seed.level_rng(1).next_u64());
    }
}
