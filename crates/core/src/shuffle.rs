//! Answer ordering.
//!
//! Uses a uniform Fisher-Yates permutation. A random three-way comparator fed
//! to `sort_by` is not a total order and may panic, so it is not offered.

use rand::Rng;
use rand::seq::SliceRandom;

/// Permute `answers` in place. Each call draws a fresh permutation from `rng`.
pub fn shuffle_answers<R: Rng + ?Sized>(answers: &mut [String], rng: &mut R) {
    answers.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn choices() -> Vec<String> {
        ["a", "b", "c", "d"].iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn shuffle_preserves_multiset() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let mut answers = choices();
            shuffle_answers(&mut answers, &mut rng);
            answers.sort();
            assert_eq!(answers, choices());
        }
    }

    #[test]
    fn shuffle_produces_more_than_one_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let mut answers = choices();
            shuffle_answers(&mut answers, &mut rng);
            seen.insert(answers);
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn shuffle_handles_single_answer() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut answers = vec!["only".to_string()];
        shuffle_answers(&mut answers, &mut rng);
        assert_eq!(answers, vec!["only"]);
    }
}
