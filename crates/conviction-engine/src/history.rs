//! Fixed-window conviction history for charting.
//!
//! Every sample is re-derived from the closed form at its own block, so the
//! iterator carries no accumulated state. Cloning it restarts the window.

use std::iter::FusedIterator;

use crate::conviction::conviction_before;
use crate::event::StakeEvent;

/// Default chart window: 25 blocks either side of the current block.
pub const DEFAULT_HISTORY_WINDOW: usize = 51;

/// Lazy window of conviction samples ending at `upto_block`.
///
/// Yields oldest first. Element `i` of a window of length `n` is conviction
/// at block `upto_block - (n - 1) + i`.
#[derive(Debug, Clone)]
pub struct ConvictionHistory<'a> {
    events: &'a [StakeEvent],
    entity: Option<&'a str>,
    upto_block: u64,
    alpha: f64,
    front: usize,
    back: usize,
    window: usize,
}

impl<'a> ConvictionHistory<'a> {
    /// History of the proposal-wide conviction.
    pub fn new(events: &'a [StakeEvent], upto_block: u64, alpha: f64, window: usize) -> Self {
        Self {
            events,
            entity: None,
            upto_block,
            alpha,
            front: 0,
            back: window,
            window,
        }
    }

    /// History restricted to one entity's stake.
    pub fn for_entity(
        events: &'a [StakeEvent],
        entity: &'a str,
        upto_block: u64,
        alpha: f64,
        window: usize,
    ) -> Self {
        Self {
            entity: Some(entity),
            ..Self::new(events, upto_block, alpha, window)
        }
    }

    /// Total number of samples in the window, regardless of iteration progress.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Block of the first (oldest) sample; negative when the window reaches
    /// before block 0.
    pub fn start_block(&self) -> i128 {
        i128::from(self.upto_block) - self.window as i128 + 1
    }

    fn sample(&self, index: usize) -> f64 {
        let blocks_back = (self.window - 1 - index) as u64;
        conviction_before(self.events, self.entity, self.upto_block, blocks_back, self.alpha)
    }
}

impl Iterator for ConvictionHistory<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let value = self.sample(self.front);
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl DoubleEndedIterator for ConvictionHistory<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.sample(self.back))
    }
}

impl ExactSizeIterator for ConvictionHistory<'_> {}

impl FusedIterator for ConvictionHistory<'_> {}

/// Proposal-wide conviction history over the default window.
pub fn conviction_history(
    stake_events: &[StakeEvent],
    upto_block: u64,
    alpha: f64,
) -> ConvictionHistory<'_> {
    ConvictionHistory::new(stake_events, upto_block, alpha, DEFAULT_HISTORY_WINDOW)
}

/// One entity's conviction history over the default window.
pub fn conviction_history_by_entity<'a>(
    stake_events: &'a [StakeEvent],
    entity: &'a str,
    upto_block: u64,
    alpha: f64,
) -> ConvictionHistory<'a> {
    ConvictionHistory::for_entity(stake_events, entity, upto_block, alpha, DEFAULT_HISTORY_WINDOW)
}
