//! Per-match sequence dealer
//!
//! Deals sequences by difficulty tier as a repeating shuffle bag: every
//! sequence in a tier comes out once, in uniformly random order, before the
//! tier's working pool is refilled from its template. Draws are memoized by
//! round index so asking for a round already dealt returns the same content.

use std::cell::RefCell;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::strikes::catalog::{self, StrikeSequence};

/// Handle shared by both active sessions for the duration of one match
pub type SharedGenerator = Rc<RefCell<StrikeGenerator>>;

/// Stateful sequence supplier for one match
#[derive(Debug)]
pub struct StrikeGenerator {
    num_easy: usize,
    num_medium: usize,
    dealt: Vec<StrikeSequence>,
    remaining_easy: Vec<StrikeSequence>,
    remaining_medium: Vec<StrikeSequence>,
    remaining_hard: Vec<StrikeSequence>,
    rng: ChaCha8Rng,
}

impl StrikeGenerator {
    pub fn new(num_easy: usize, num_medium: usize, rng: ChaCha8Rng) -> Self {
        Self {
            num_easy,
            num_medium,
            dealt: Vec::new(),
            remaining_easy: catalog::easy_pool(),
            remaining_medium: catalog::medium_pool(),
            remaining_hard: catalog::hard_pool(),
            rng,
        }
    }

    pub fn seeded(num_easy: usize, num_medium: usize, seed: u64) -> Self {
        Self::new(num_easy, num_medium, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy(num_easy: usize, num_medium: usize) -> Self {
        Self::new(num_easy, num_medium, ChaCha8Rng::from_entropy())
    }

    pub fn shared(self) -> SharedGenerator {
        Rc::new(RefCell::new(self))
    }

    /// Sequence for the given round index
    ///
    /// Rounds `[0, num_easy)` draw easy, `[num_easy, num_easy + num_medium)`
    /// draw medium, everything beyond draws hard. Previously dealt indices
    /// return the identical sequence; callers get their own copy to consume.
    pub fn next_sequence(&mut self, index: usize) -> StrikeSequence {
        while self.dealt.len() <= index {
            let round = self.dealt.len();
            let sequence = if round < self.num_easy {
                Self::draw(&mut self.rng, &mut self.remaining_easy, catalog::easy_pool)
            } else if round < self.num_easy + self.num_medium {
                Self::draw(
                    &mut self.rng,
                    &mut self.remaining_medium,
                    catalog::medium_pool,
                )
            } else {
                Self::draw(&mut self.rng, &mut self.remaining_hard, catalog::hard_pool)
            };
            tracing::debug!(round, ?sequence, "dealt sequence");
            self.dealt.push(sequence);
        }
        self.dealt[index].clone()
    }

    /// Uniform draw without replacement, refilling from the template on
    /// exhaustion
    fn draw(
        rng: &mut ChaCha8Rng,
        remaining: &mut Vec<StrikeSequence>,
        template: fn() -> Vec<StrikeSequence>,
    ) -> StrikeSequence {
        let pick = rng.gen_range(0..remaining.len());
        let sequence = remaining.swap_remove(pick);
        if remaining.is_empty() {
            *remaining = template();
        }
        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tier_boundaries_follow_the_round_index() {
        let mut gen = StrikeGenerator::seeded(2, 3, 7);
        assert_eq!(gen.next_sequence(0).len(), 1);
        assert_eq!(gen.next_sequence(1).len(), 1);
        assert_eq!(gen.next_sequence(2).len(), 2);
        assert_eq!(gen.next_sequence(4).len(), 2);
        assert_eq!(gen.next_sequence(5).len(), 3);
        assert_eq!(gen.next_sequence(20).len(), 3);
    }

    #[test]
    fn repeated_indices_are_memoized() {
        let mut gen = StrikeGenerator::seeded(3, 3, 42);
        let first = gen.next_sequence(1);
        gen.next_sequence(9);
        assert_eq!(gen.next_sequence(1), first);
        assert_eq!(gen.next_sequence(9), gen.next_sequence(9));
    }

    #[test]
    fn out_of_order_requests_fill_the_gap() {
        let mut gen = StrikeGenerator::seeded(1, 1, 3);
        let third = gen.next_sequence(2);
        assert_eq!(third.len(), 3);
        assert_eq!(gen.next_sequence(0).len(), 1);
        assert_eq!(gen.next_sequence(2), third);
    }

    #[test]
    fn hard_tier_refills_after_exhaustion() {
        let pool_size = catalog::hard_pool().len();
        let mut gen = StrikeGenerator::seeded(0, 0, 11);
        let first_bag: Vec<_> = (0..pool_size).map(|i| gen.next_sequence(i)).collect();
        // first bag is a permutation of the template
        for template_seq in catalog::hard_pool() {
            assert_eq!(
                first_bag.iter().filter(|s| **s == template_seq).count(),
                1,
                "each template sequence dealt exactly once before refill"
            );
        }
        // the bag keeps dealing after refill
        let next = gen.next_sequence(pool_size);
        assert!(catalog::hard_pool().contains(&next));
    }

    proptest! {
        /// Shuffle-bag law: within one tier, nothing repeats before every
        /// template sequence has been dealt once.
        #[test]
        fn no_tier_repeats_before_refill(seed in any::<u64>()) {
            let easy = catalog::easy_pool().len();
            let mut gen = StrikeGenerator::seeded(easy, 0, seed);
            let dealt: Vec<_> = (0..easy).map(|i| gen.next_sequence(i)).collect();
            for (i, a) in dealt.iter().enumerate() {
                for b in dealt.iter().skip(i + 1) {
                    prop_assert_ne!(a, b);
                }
            }
        }

        /// Memoization holds for any seed and probe order.
        #[test]
        fn draws_are_idempotent(seed in any::<u64>(), probe in 0usize..12) {
            let mut gen = StrikeGenerator::seeded(4, 4, seed);
            let first = gen.next_sequence(probe);
            gen.next_sequence(11);
            prop_assert_eq!(gen.next_sequence(probe), first);
        }
    }
}
