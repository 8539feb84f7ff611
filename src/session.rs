use crate::overlay::OverlaySequencer;
use crate::recognition::{RecognitionClient, RoundOutcome};
use crate::scan;
use crate::stroke::StrokeController;
use crate::surface::{Surface, ToolConfig};
use crate::typeset::TypesetSink;
use crate::vars::VariableStore;
use egui::Pos2;
use std::time::Instant;

/// Top-level owner of all drawing and recognition state.
///
/// Every component is an explicit field here rather than ambient state; the
/// UI shell holds one `Session` and drives it from the update loop. All
/// mutation happens on that loop — the only other thread is the recognition
/// worker, which communicates exclusively through `RecognitionClient`.
pub struct Session {
    surface: Surface,
    stroke: StrokeController,
    vars: VariableStore,
    overlay: OverlaySequencer,
    client: RecognitionClient,
}

impl Session {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: Surface::new(width, height),
            stroke: StrokeController::new(),
            vars: VariableStore::new(),
            overlay: OverlaySequencer::new(),
            client: RecognitionClient::new(),
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn vars(&self) -> &VariableStore {
        &self.vars
    }

    pub fn overlay(&self) -> &OverlaySequencer {
        &self.overlay
    }

    pub fn is_recognizing(&self) -> bool {
        self.client.is_in_flight()
    }

    pub fn begin_stroke(&mut self, at: Pos2, tool: ToolConfig) {
        self.stroke.begin_stroke(&mut self.surface, at, tool);
    }

    pub fn extend_stroke(&mut self, to: Pos2) {
        self.stroke.extend_stroke(&mut self.surface, to);
    }

    pub fn end_stroke(&mut self) {
        self.stroke.end_stroke();
    }

    pub fn stroke_active(&self) -> bool {
        self.stroke.is_active()
    }

    /// Viewport changed: the in-progress stroke is destroyed and the raster
    /// cleared at the new size. In-flight rounds and pending reveals are
    /// left alone; their effects land against the then-current state.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.stroke.end_stroke();
        self.surface.resize(width, height);
    }

    /// "Run" trigger: derives the anchor from the current ink, then submits
    /// the snapshot and bindings. Returns whether a round actually started.
    /// Failures are logged, never propagated — the UI state is unchanged
    /// and the user can simply re-trigger.
    pub fn run(&mut self, repaint: impl Fn() + Send + 'static) -> bool {
        // Anchor first: it must reflect the pre-submission ink state.
        let anchor = scan::scan(&self.surface);
        match self
            .client
            .submit(&self.surface, &self.vars, anchor, self.overlay.generation(), repaint)
        {
            Ok(started) => {
                if started {
                    log::info!("recognition round started, anchor ({}, {})", anchor.x, anchor.y);
                }
                started
            }
            Err(err) => {
                log::error!("run trigger failed: {err}");
                false
            }
        }
    }

    /// Per-frame pump: absorbs any completed recognition round and advances
    /// due overlay reveals.
    pub fn pump(&mut self, now: Instant, sink: &mut dyn TypesetSink) {
        if let Some(outcome) = self.client.poll() {
            self.absorb_outcome(outcome, now);
        }
        self.overlay.tick(now, sink);
    }

    /// Applies one completed round: assignments land in the variable store
    /// and every result is queued for staged reveal. A failed round changes
    /// nothing; an outcome from before the last reset is discarded unseen.
    pub fn absorb_outcome(&mut self, outcome: RoundOutcome, now: Instant) {
        if outcome.generation != self.overlay.generation() {
            log::debug!("discarding recognition outcome from a superseded generation");
            return;
        }
        match outcome.results {
            Ok(results) => {
                log::info!("recognition round returned {} result(s)", results.len());
                self.vars.apply_assignments(&results);
                self.overlay.enqueue(&results, outcome.anchor, now);
            }
            Err(err) => log::warn!("recognition round failed: {err}"),
        }
    }

    /// Atomic reset: surface, bindings, overlay queue and the display sink
    /// all clear together, and the generation bump invalidates every
    /// pending or in-flight effect.
    pub fn reset(&mut self, sink: &mut dyn TypesetSink) {
        self.stroke.end_stroke();
        self.surface.clear();
        self.vars.clear();
        self.overlay.reset();
        sink.clear();
    }
}
