//! Random choices for exercise generation.
//!
//! All randomness in the tutor goes through [`Chooser`], so a session can be driven by a
//! thread RNG, by a seeded RNG for reproducible drills, or by a fixed script in tests.
//!
//! # Example
//!
//! ```
//! use word_sampler::{RandomChooser, pick_weighted};
//!
//! let mut chooser = RandomChooser::seeded(7);
//! let words = [("ја", 1), ("ти", 3)];
//! let first = pick_weighted(&mut chooser, &words, None).unwrap();
//! let second = pick_weighted(&mut chooser, &words, Some(&first)).unwrap();
//! assert_ne!(first, second);
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait Chooser {
    /// A uniformly distributed index in `0..len`. `len` is never zero.
    fn index(&mut self, len: usize) -> usize;
}

impl<C: Chooser + ?Sized> Chooser for &mut C {
    fn index(&mut self, len: usize) -> usize {
        (**self).index(len)
    }
}

/// A [`Chooser`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomChooser<R> {
    rng: R,
}

impl<R: Rng> RandomChooser<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomChooser<ChaCha8Rng> {
    /// Same seed, same sequence of choices.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl RandomChooser<rand::rngs::ThreadRng> {
    pub fn thread() -> Self {
        Self::new(rand::rng())
    }
}

impl<R: Rng> Chooser for RandomChooser<R> {
    fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Replays a fixed list of indices, cycling when it runs out.
///
/// Scripted indices are reduced modulo the requested length.
#[derive(Debug, Clone)]
pub struct ScriptedChooser {
    script: VecDeque<usize>,
}

impl ScriptedChooser {
    pub fn new(script: impl IntoIterator<Item = usize>) -> Self {
        let script: VecDeque<usize> = script.into_iter().collect();
        Self { script }
    }

    /// Always picks the first option.
    pub fn first() -> Self {
        Self::new([0])
    }
}

impl Chooser for ScriptedChooser {
    fn index(&mut self, len: usize) -> usize {
        let Some(next) = self.script.pop_front() else {
            return 0;
        };
        self.script.push_back(next);
        next % len
    }
}

/// Pick one item uniformly, or `None` if there is nothing to pick from.
pub fn pick<T: Clone>(chooser: &mut impl Chooser, items: &[T]) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    Some(items[chooser.index(items.len())].clone())
}

/// Expand `(item, weight)` pairs into a pool holding each item `weight` times.
pub fn weighted_pool<T: Clone>(weighted: &[(T, u32)]) -> Vec<T> {
    weighted
        .iter()
        .flat_map(|(item, weight)| std::iter::repeat_n(item.clone(), *weight as usize))
        .collect()
}

/// Pick from the weighted pool, never returning `avoid` while anything else is in the pool.
///
/// Leaving `avoid` out of the pool gives the same distribution as redrawing until
/// something else comes up, without the unbounded loop. When `avoid` is all the pool
/// holds, it is returned anyway.
pub fn pick_weighted<T: Clone + PartialEq>(
    chooser: &mut impl Chooser,
    weighted: &[(T, u32)],
    avoid: Option<&T>,
) -> Option<T> {
    let pool = weighted_pool(weighted);
    let fresh = pool
        .iter()
        .filter(|item| Some(*item) != avoid)
        .cloned()
        .collect::<Vec<_>>();
    if fresh.is_empty() {
        pick(chooser, &pool)
    } else {
        pick(chooser, &fresh)
    }
}
