use crate::recognition::RecognitionResult;
use crate::typeset::TypesetSink;
use egui::Pos2;
use std::time::{Duration, Instant};

/// Delay before the first reveal of a batch; each later result in the same
/// batch is deferred one more unit.
pub const REVEAL_DELAY: Duration = Duration::from_secs(1);

/// Vertical spacing between stacked entries of one batch.
pub const LINE_HEIGHT: f32 = 24.0;

/// A revealed visual annotation handed to the display sink.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayEntry {
    pub markup: String,
    pub anchor: Pos2,
}

#[derive(Debug)]
struct PendingReveal {
    entry: OverlayEntry,
    due: Instant,
    generation: u64,
}

/// Schedules staged reveals of recognition results and owns the persisted
/// overlay sequence.
///
/// Reveals are one-shot deferred tasks advanced cooperatively by the UI
/// loop via `tick`. Cancellation on reset is a generation check at fire
/// time, not timer surgery: a stale pending reveal simply discards itself.
#[derive(Debug, Default)]
pub struct OverlaySequencer {
    pending: Vec<PendingReveal>,
    revealed: Vec<OverlayEntry>,
    generation: u64,
}

impl OverlaySequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation token. Bumped on every reset; effects carrying an
    /// older token are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Schedules one reveal per result: result `i` of the batch becomes due
    /// after `(i + 1)` delay units and stacks `i` line heights below the
    /// anchor.
    pub fn enqueue(&mut self, results: &[RecognitionResult], anchor: Pos2, now: Instant) {
        for (idx, result) in results.iter().enumerate() {
            let entry = OverlayEntry {
                markup: format!("\\(\\LARGE{{{} = {}}}\\)", result.expr, result.value),
                anchor: Pos2::new(anchor.x, anchor.y + idx as f32 * LINE_HEIGHT),
            };
            self.pending.push(PendingReveal {
                entry,
                due: now + REVEAL_DELAY * (idx as u32 + 1),
                generation: self.generation,
            });
        }
    }

    /// Moves every due pending reveal into the revealed sequence, in
    /// enqueue order, and notifies the sink once if the sequence grew.
    /// Pending reveals from a superseded generation are dropped here.
    pub fn tick(&mut self, now: Instant, sink: &mut dyn TypesetSink) {
        let generation = self.generation;
        let stale = self.pending.len();
        self.pending.retain(|pending| pending.generation == generation);
        let stale = stale - self.pending.len();
        if stale > 0 {
            log::debug!("discarded {stale} stale reveal(s) from before the last reset");
        }

        let mut grew = false;
        let mut idx = 0;
        while idx < self.pending.len() {
            if self.pending[idx].due <= now {
                let pending = self.pending.remove(idx);
                self.revealed.push(pending.entry);
                grew = true;
            } else {
                idx += 1;
            }
        }

        if grew {
            if let Err(err) = sink.typeset(&self.revealed) {
                log::warn!("display sink failed: {err}");
            }
        }
    }

    /// The persisted overlay sequence. Append-only between resets.
    pub fn revealed(&self) -> &[OverlayEntry] {
        &self.revealed
    }

    /// Earliest due time among live pending reveals, for scheduling the
    /// next UI wake-up.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending
            .iter()
            .filter(|pending| pending.generation == self.generation)
            .map(|pending| pending.due)
            .min()
    }

    /// Invalidates all pending reveals and drops the revealed sequence.
    /// Pending entries are left in place; the generation bump makes `tick`
    /// discard them the next time it runs.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.revealed.clear();
    }
}
