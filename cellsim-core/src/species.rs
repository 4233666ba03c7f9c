//! Species partition of the agent index space.
//!
//! Agents are laid out species by species: species `k` owns the contiguous
//! index range `[start(k), end(k))`. The partition can be built from
//! per-species counts or from the two threshold indices used by the
//! boundary-test classifier; both end up in the same canonical form.

use core::ops::Range;

use crate::error::ConfigError;

/// Number of species supported by the engine.
pub const SPECIES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpeciesPartition {
    /// Exclusive end index of each species; `ends[2]` is the population size.
    ends: [usize; SPECIES],
}

impl SpeciesPartition {
    /// Block policy: species `k` gets `counts[k]` consecutive agents.
    pub fn from_counts(counts: [usize; SPECIES]) -> Result<Self, ConfigError> {
        let mut ends = [0; SPECIES];
        let mut total = 0usize;
        for (end, count) in ends.iter_mut().zip(counts) {
            total = total
                .checked_add(count)
                .ok_or(ConfigError::PopulationOverflow)?;
            *end = total;
        }
        Ok(Self { ends })
    }

    /// Threshold policy over `n` agents: species 0 if `i < low`, species 2 if
    /// `i > high`, species 1 otherwise.
    ///
    /// `high` may be `-1` when species 0 and 1 are both empty. Thresholds
    /// must satisfy `0 <= low <= high + 1 <= n`.
    pub fn from_thresholds(low: i64, high: i64, n: usize) -> Result<Self, ConfigError> {
        let n_signed = i64::try_from(n).map_err(|_| ConfigError::PopulationOverflow)?;
        let first_of_last = high.checked_add(1).ok_or(ConfigError::PopulationOverflow)?;
        if low < 0 || low > first_of_last || first_of_last > n_signed {
            return Err(ConfigError::SpeciesBoundaries {
                bounds: [low, first_of_last, n_signed],
            });
        }
        Ok(Self {
            ends: [low as usize, first_of_last as usize, n],
        })
    }

    /// Total number of agents.
    pub fn len(&self) -> usize {
        self.ends[SPECIES - 1]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn start(&self, species: usize) -> usize {
        if species == 0 {
            0
        } else {
            self.ends[species - 1]
        }
    }

    pub fn end(&self, species: usize) -> usize {
        self.ends[species]
    }

    pub fn range(&self, species: usize) -> Range<usize> {
        self.start(species)..self.end(species)
    }

    pub fn count(&self, species: usize) -> usize {
        self.end(species) - self.start(species)
    }

    pub fn counts(&self) -> [usize; SPECIES] {
        [self.count(0), self.count(1), self.count(2)]
    }

    /// Species of agent `i`. Indices past the end report the last species.
    pub fn species_of(&self, i: usize) -> usize {
        if i < self.ends[0] {
            0
        } else if i < self.ends[1] {
            1
        } else {
            2
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_counts_ranges() {
        let p = SpeciesPartition::from_counts([2, 0, 3]).unwrap();
        assert_eq!(p.len(), 5);
        assert_eq!(p.range(0), 0..2);
        assert_eq!(p.range(1), 2..2);
        assert_eq!(p.range(2), 2..5);
        assert_eq!(p.counts(), [2, 0, 3]);
    }

    #[test]
    fn test_species_of_matches_ranges() {
        let p = SpeciesPartition::from_counts([3, 4, 2]).unwrap();
        for k in 0..SPECIES {
            for i in p.range(k) {
                assert_eq!(p.species_of(i), k);
            }
        }
    }

    #[test]
    fn test_thresholds_equal_blocks() {
        // species 0: [0, 3), species 1: [3, 7), species 2: [7, 9)
        let by_threshold = SpeciesPartition::from_thresholds(3, 6, 9).unwrap();
        let by_counts = SpeciesPartition::from_counts([3, 4, 2]).unwrap();
        assert_eq!(by_threshold, by_counts);
    }

    #[test]
    fn test_threshold_classification_rule() {
        let p = SpeciesPartition::from_thresholds(2, 4, 8).unwrap();
        let expected = [0, 0, 1, 1, 1, 2, 2, 2];
        for (i, k) in expected.iter().enumerate() {
            assert_eq!(p.species_of(i), *k, "agent {}", i);
        }
    }

    #[test]
    fn test_thresholds_allow_empty_leading_species() {
        let p = SpeciesPartition::from_thresholds(0, -1, 4).unwrap();
        assert_eq!(p.counts(), [0, 0, 4]);
    }

    #[test]
    fn test_thresholds_rejected_when_unordered() {
        assert!(SpeciesPartition::from_thresholds(5, 2, 9).is_err());
        assert!(SpeciesPartition::from_thresholds(-1, 2, 9).is_err());
        assert!(SpeciesPartition::from_thresholds(2, 9, 9).is_err());
    }

    #[test]
    fn test_counts_overflow() {
        assert_eq!(
            SpeciesPartition::from_counts([usize::MAX, 1, 0]),
            Err(ConfigError::PopulationOverflow)
        );
    }
}
