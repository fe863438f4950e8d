//! The host-facing prompt editor component
//!
//! [`PromptEditor`] ties the edit engine, history and coordinate mapper
//! together behind the contract a host UI expects: a `value` in, `on_change`
//! out, keyboard and pointer events in between, and a caret overlay position
//! recomputed once per frame.

use crate::config::EditorConfig;
use crate::editable::{
    apply, EditHistory, EditIntent, EditorSelection, EditorState, Segment, SegmentPosition,
};
use crate::logging::StateSnapshot;
use crate::syntax;
use crate::view::{CaretGeometry, CoordinateMapper, Point, SegmentMeasure};

use super::frame::{FrameHandle, FrameScheduler};
use super::keymap::{map_key, KeyAction, Keystroke};

/// Deferred work run on the next frame tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameJob {
    /// Recompute the caret overlay
    Reposition,
    /// Resolve a click, then reposition
    HitTest { point: Point, extend: bool },
}

type ChangeCallback = Box<dyn FnMut(&str)>;

/// One editor instance.
pub struct PromptEditor {
    state: EditorState,
    history: EditHistory,
    mapper: CoordinateMapper,
    frames: FrameScheduler<FrameJob>,
    /// Handle of a click still waiting for its frame
    pending_click: Option<FrameHandle>,
    on_change: Option<ChangeCallback>,
    focused: bool,
    caret: Option<CaretGeometry>,
    /// Column remembered across consecutive Up/Down presses
    desired_x: Option<f64>,
}

impl PromptEditor {
    pub fn new(value: &str, config: &EditorConfig) -> Self {
        let mut frames = FrameScheduler::new();
        frames.schedule(FrameJob::Reposition);
        Self {
            state: EditorState::from_value(value),
            history: EditHistory::with_max_size(config.history_limit),
            mapper: CoordinateMapper::new(config),
            frames,
            pending_click: None,
            on_change: None,
            focused: false,
            caret: None,
            desired_x: None,
        }
    }

    /// Register the callback that receives the serialized value after every
    /// committed mutation
    pub fn on_change(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Serialized token form of the content
    pub fn value(&self) -> String {
        self.state.serialize()
    }

    /// Content with every dropdown replaced by its selected value
    pub fn get_flat_text(&self) -> String {
        self.state.flatten()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ========================================================================
    // External value
    // ========================================================================

    /// Accept a new value from the host without emitting `on_change`.
    ///
    /// Echoes of our own value are ignored. Otherwise the content is
    /// re-parsed and the caret re-anchored: after the last dropdown when the
    /// value gained its first dropdowns, at the origin when it is empty, and
    /// clamped into the new bounds otherwise.
    pub fn set_value(&mut self, value: &str) {
        if value == self.value() {
            return;
        }
        let next = self.reconcile(value);
        self.history.push(std::mem::replace(&mut self.state, next));
        self.desired_x = None;
        self.schedule(FrameJob::Reposition);
    }

    /// Replace the content as an edit: like [`set_value`](Self::set_value)
    /// but recorded as a mutation, so `on_change` fires.
    pub fn replace_value(&mut self, value: &str) {
        let next = self.reconcile(value);
        let before = std::mem::replace(&mut self.state, next);
        self.commit(before, "replace value");
    }

    fn reconcile(&self, value: &str) -> EditorState {
        let mut ids = self.state.ids().clone();
        let segments = syntax::parse(value, &mut ids);
        let mut next = EditorState::from_segments(segments, ids);

        let had_dropdowns = self.state.segments.iter().any(Segment::is_dropdown);
        let last_dropdown = next.segments.iter().rposition(Segment::is_dropdown);

        let caret = match last_dropdown {
            _ if next.is_empty() => SegmentPosition::zero(),
            // normalize guarantees a text segment after the last dropdown
            Some(index) if !had_dropdowns => SegmentPosition::new(index + 1, 0),
            _ => self.state.caret(),
        };
        next.set_caret(caret);
        next.refresh_highlight();
        tracing::debug!(segments = next.segments.len(), "reconciled external value");
        next
    }

    // ========================================================================
    // Intents
    // ========================================================================

    /// Apply one intent
    pub fn dispatch(&mut self, intent: EditIntent) {
        self.desired_x = None;
        self.apply_intent(&intent);
    }

    fn apply_intent(&mut self, intent: &EditIntent) {
        let before = self.state.clone();
        self.state = apply(std::mem::take(&mut self.state), intent);
        if tracing::enabled!(tracing::Level::DEBUG) {
            let after = StateSnapshot::from_state(&self.state);
            if let Some(diff) = StateSnapshot::from_state(&before).diff(&after) {
                tracing::debug!(?intent, "{}", diff);
            }
        }
        if before.segments != self.state.segments {
            self.record(before);
        } else {
            self.schedule(FrameJob::Reposition);
        }
    }

    /// Record a content change: push history, emit, reposition
    fn commit(&mut self, before: EditorState, reason: &str) {
        if before.segments == self.state.segments {
            return;
        }
        tracing::debug!("{}", reason);
        self.record(before);
    }

    fn record(&mut self, before: EditorState) {
        self.history.push(before);
        self.emit_change();
        self.schedule(FrameJob::Reposition);
    }

    fn emit_change(&mut self) {
        let value = self.state.serialize();
        if let Some(callback) = self.on_change.as_mut() {
            callback(&value);
        }
    }

    /// Handle a keystroke. Returns false for keys left to the host.
    pub fn handle_key(&mut self, stroke: Keystroke, measure: &dyn SegmentMeasure) -> bool {
        let Some(action) = map_key(stroke, &self.state) else {
            return false;
        };
        match action {
            KeyAction::Edit(intent) => self.dispatch(intent),
            KeyAction::Undo => {
                self.undo();
            }
            KeyAction::Redo => {
                self.redo();
            }
            KeyAction::Vertical { direction, extend } => {
                let target = self.mapper.vertical_target(
                    &self.state.segments,
                    self.state.caret(),
                    direction,
                    self.desired_x,
                    measure,
                );
                if let Some((pos, x)) = target {
                    let intent = if extend {
                        let anchor = self.state.selection.start;
                        EditIntent::SetSelection(EditorSelection::new(anchor, pos))
                    } else {
                        EditIntent::SetCaret(pos)
                    };
                    self.apply_intent(&intent);
                    self.desired_x = Some(x);
                }
            }
        }
        true
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(&self.state) else {
            return false;
        };
        self.state = previous;
        self.after_history_step();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(&self.state) else {
            return false;
        };
        self.state = next;
        self.after_history_step();
        true
    }

    fn after_history_step(&mut self) {
        self.state.refresh_highlight();
        self.desired_x = None;
        self.emit_change();
        self.schedule(FrameJob::Reposition);
    }

    // ========================================================================
    // Pointer, viewport and focus
    // ========================================================================

    /// Pointer press at a viewport point; resolved on the next frame
    pub fn click(&mut self, point: Point, extend: bool) {
        self.focused = true;
        self.desired_x = None;
        self.pending_click = Some(self.frames.schedule(FrameJob::HitTest { point, extend }));
    }

    pub fn scrolled(&mut self) {
        self.schedule(FrameJob::Reposition);
    }

    pub fn resized(&mut self) {
        self.schedule(FrameJob::Reposition);
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Lose focus. A click that has not been resolved yet is dropped.
    pub fn blur(&mut self) {
        self.focused = false;
        if let Some(handle) = self.pending_click.take() {
            if self.frames.cancel(handle) {
                tracing::debug!("dropped unresolved click on blur");
            }
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Schedule a reposition unless a pending click will reposition anyway
    fn schedule(&mut self, job: FrameJob) {
        let click_pending = matches!(self.frames.pending(), Some(FrameJob::HitTest { .. }));
        if job == FrameJob::Reposition && click_pending {
            return;
        }
        self.frames.schedule(job);
    }

    /// Run the pending frame job against the current layout. Returns whether
    /// anything ran.
    pub fn on_frame(&mut self, measure: &dyn SegmentMeasure) -> bool {
        let Some(job) = self.frames.take() else {
            return false;
        };
        self.pending_click = None;
        if let FrameJob::HitTest { point, extend } = job {
            let pos = self
                .mapper
                .hit_test(&self.state.segments, point, measure)
                .unwrap_or_else(|| SegmentPosition::document_end(&self.state.segments));
            let intent = if extend {
                EditIntent::SetSelection(EditorSelection::new(self.state.selection.start, pos))
            } else {
                EditIntent::SetCaret(pos)
            };
            self.apply_intent(&intent);
            // Applying the click scheduled a reposition; do it now instead
            self.frames.clear();
        }
        self.caret = self
            .mapper
            .caret_geometry(&self.state.segments, self.state.caret(), measure);
        true
    }

    /// Caret overlay position as of the last frame
    pub fn caret(&self) -> Option<CaretGeometry> {
        self.caret
    }

    /// The caret is drawn only while focused with a collapsed selection that
    /// isn't resting on a chip
    pub fn caret_visible(&self) -> bool {
        self.focused && self.state.selection.is_collapsed() && self.state.highlighted_chip.is_none()
    }
}
