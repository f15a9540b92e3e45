//! The focus-tracking thread viewport.
//!
//! `ThreadViewport` is one component instance. It owns the pairing, the
//! geometry observer, the resolver, the focus machine and the broadcaster,
//! and wires them to the host through three kinds of input:
//!
//! - props (`mount` / `update`): messages, visibility, waiting flag
//! - layout events (`set_layout`, `on_scroll`, `on_resize`) carrying a
//!   fresh `LayoutSnapshot`
//! - the clock (`advance`), which fires due timers
//!
//! Outputs go over the signal channel. All methods take `&mut self`, so a
//! resolution can never start while another one is running.

use super::broadcaster::{AvatarOffsets, PositionBroadcaster};
use super::debug::DebugOverlay;
use super::focus::{FocusMachine, FocusState};
use super::listeners::{Listener, Listeners};
use super::signal::{ScrollBehavior, ScrollRequest, SignalSender, ViewportSignal};
use super::timers::{Millis, TimerKind, TimerQueue};
use crate::model::{pair_messages, Message, MessageId, PairIndex, Pairing};
use crate::view_state::{
    messages_in_view, pair_emphasis, scroll_to_latest_target, CenteredPairResolver, FocusTuning,
    FocusedPosition, GeometryObserver, IntersectionWatcher, LayoutSnapshot, PairEmphasis,
    ResolverWeights, ViewportGeometry,
};
use std::collections::BTreeSet;
use std::sync::mpsc::Sender;
use tracing::debug;

/// Inputs supplied by the owner on every render.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThreadProps {
    /// The full message list, paired on every update.
    pub messages: Vec<Message>,
    /// Whether the thread is on screen.
    pub is_visible: bool,
    /// A response is pending; the focused position must not move.
    pub waiting_for_response: bool,
}

impl ThreadProps {
    /// Hidden, not waiting.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Set whether the thread is on screen.
    pub fn visible(mut self, is_visible: bool) -> Self {
        self.is_visible = is_visible;
        self
    }

    /// Set whether a response is pending.
    pub fn waiting(mut self, waiting_for_response: bool) -> Self {
        self.waiting_for_response = waiting_for_response;
        self
    }
}

/// Focus forced onto a newly completed pair, held until its scroll lands.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LatestHold {
    /// Scroll-to-latest is scheduled but not yet requested.
    Pending,
    /// The host was asked to scroll to `target`.
    Scrolling { target: f64 },
}

/// Lifecycle of one viewport instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Constructed, not yet mounted.
    #[default]
    Created,
    /// Receiving props, layouts and ticks.
    Mounted,
    /// Listeners and timers are gone; every input is ignored.
    TornDown,
}

/// Focus tracking for one message thread.
///
/// The owner feeds props, layout snapshots and clock ticks; the viewport
/// answers with [`ViewportSignal`]s over the channel passed to `new`.
#[derive(Debug)]
pub struct ThreadViewport {
    tuning: FocusTuning,
    signals: SignalSender,
    lifecycle: Lifecycle,
    props: ThreadProps,
    pairing: Pairing,
    layout: Option<LayoutSnapshot>,
    geometry: GeometryObserver,
    resolver: CenteredPairResolver,
    intersection: IntersectionWatcher,
    focus: FocusMachine,
    broadcaster: PositionBroadcaster,
    timers: TimerQueue,
    listeners: Listeners,
    /// State whose entry effects were last applied. `None` before mount.
    applied: Option<FocusState>,
    /// While set, resolutions may not move focus off the new pair.
    latest_hold: Option<LatestHold>,
    debug_visible: bool,
}

impl ThreadViewport {
    /// Viewport that sends its signals to `tx`.
    pub fn new(tuning: FocusTuning, tx: Sender<ViewportSignal>) -> Self {
        let signals = SignalSender::new(tx);
        Self {
            geometry: GeometryObserver::new(tuning.padding_modifier, tuning.padding_floor),
            resolver: CenteredPairResolver::new(ResolverWeights::from_tuning(&tuning)),
            intersection: IntersectionWatcher::new(tuning.intersection_thresholds.clone()),
            broadcaster: PositionBroadcaster::new(signals.clone(), AvatarOffsets::from_tuning(&tuning)),
            signals,
            tuning,
            lifecycle: Lifecycle::Created,
            props: ThreadProps::default(),
            pairing: Pairing::default(),
            layout: None,
            focus: FocusMachine::new(),
            timers: TimerQueue::new(),
            listeners: Listeners::new(),
            applied: None,
            latest_hold: None,
            debug_visible: false,
        }
    }

    // ===== Lifecycle =====

    /// First render. Messages present at mount are not treated as new.
    pub fn mount(&mut self, props: ThreadProps, now: Millis) {
        if self.lifecycle != Lifecycle::Created {
            debug!(lifecycle = ?self.lifecycle, "Ignoring mount");
            return;
        }
        self.lifecycle = Lifecycle::Mounted;
        debug!(
            messages = props.messages.len(),
            visible = props.is_visible,
            waiting = props.waiting_for_response,
            "Viewport mounted"
        );

        self.pairing = pair_messages(&props.messages);
        self.focus.pairs_changed(self.pairing.last_index(), false);
        self.focus.set_waiting(props.waiting_for_response);
        let visible = props.is_visible;
        self.props = props;

        if visible && self.focus.set_visible(true) {
            self.start_transition_in(now);
        }
        if visible {
            self.on_shown(now);
        }
        self.sync(now);
    }

    /// Subsequent render with new props.
    pub fn update(&mut self, props: ThreadProps, now: Millis) {
        if self.lifecycle != Lifecycle::Mounted {
            return;
        }

        let previous_len = self.props.messages.len();
        let messages_changed = props.messages != self.props.messages;
        let visibility_changed = props.is_visible != self.props.is_visible;

        // Visibility is judged against the focus held before this render.
        if visibility_changed && self.focus.set_visible(props.is_visible) {
            self.start_transition_in(now);
        }

        if messages_changed {
            self.pairing = pair_messages(&props.messages);
            let new_pair = props.messages.len() > previous_len && tail_completes_pair(&self.pairing, &props.messages);
            if self.focus.pairs_changed(self.pairing.last_index(), new_pair) {
                self.latest_hold = Some(LatestHold::Pending);
                self.timers.schedule(
                    TimerKind::ScrollToLatest,
                    now + self.tuning.scroll_to_latest_delay_ms,
                );
            }
        }

        self.focus.set_waiting(props.waiting_for_response);
        let length_changed = props.messages.len() != previous_len;
        let visible = props.is_visible;
        self.props = props;

        if visibility_changed {
            if visible {
                self.on_shown(now);
            } else {
                self.on_hidden();
            }
        } else if length_changed && visible {
            self.timers
                .schedule(TimerKind::GeometrySettle, now + self.tuning.mount_settle_ms);
            self.intersection.reset();
        }

        let before = self.applied;
        self.sync(now);
        if messages_changed && self.applied == before && before.and_then(|s| s.tracked_pair()).is_some() {
            self.timers
                .schedule(TimerKind::PositionSettle, now + self.tuning.position_settle_ms);
        }
    }

    /// Release every listener and timer. Every later call is a no-op.
    pub fn teardown(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        self.lifecycle = Lifecycle::TornDown;
        self.timers.clear();
        self.listeners.detach_all();
        self.layout = None;
        debug!("Viewport torn down");
    }

    // ===== Layout events =====

    /// Deliver the measurements of a render pass.
    pub fn set_layout(&mut self, snapshot: LayoutSnapshot, now: Millis) {
        if !self.is_mounted() {
            return;
        }
        if !self.focus.is_visible() {
            debug!("Layout ignored while hidden");
            return;
        }

        let crossed = self.listeners.is_attached(Listener::Intersection) && self.intersection.observe(&snapshot);
        self.layout = Some(snapshot);
        self.release_hold_if_landed();
        if crossed {
            self.resolve(now);
        }
    }

    /// The container scrolled; `snapshot` is the layout after scrolling.
    pub fn on_scroll(&mut self, snapshot: LayoutSnapshot, now: Millis) {
        if !self.is_mounted() {
            return;
        }
        self.set_layout(snapshot, now);

        if self.listeners.is_attached(Listener::ResolverScroll) {
            self.timers.schedule(
                TimerKind::ResolveAfterScroll,
                now + self.tuning.resolve_debounce_ms,
            );
        }
        if self.listeners.is_attached(Listener::PositionScroll) {
            self.timers.schedule(
                TimerKind::PositionAfterScroll,
                now + self.tuning.position_debounce_ms,
            );
        }
    }

    /// The window resized; `snapshot` is the layout after resizing.
    pub fn on_resize(&mut self, snapshot: LayoutSnapshot, now: Millis) {
        if !self.is_mounted() {
            return;
        }
        self.set_layout(snapshot, now);
        if self.listeners.is_attached(Listener::Resize) {
            self.measure_geometry();
        }
    }

    /// Fire every timer due at `now`.
    pub fn advance(&mut self, now: Millis) {
        if !self.is_mounted() {
            return;
        }
        while let Some(kind) = self.timers.pop_due(now) {
            debug!(?kind, %now, "Timer fired");
            self.fire(kind, now);
        }
    }

    /// Show or hide the debug overlay.
    pub fn toggle_debug(&mut self) {
        self.debug_visible = !self.debug_visible;
    }

    // ===== Accessors =====

    /// Where the viewport is in its lifecycle.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Whether the viewport is mounted.
    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    /// Current focus state.
    pub fn state(&self) -> FocusState {
        self.focus.state()
    }

    /// Pair the resolver last settled on.
    pub fn current_pair(&self) -> Option<PairIndex> {
        self.focus.current_pair()
    }

    /// Pairing of the latest props.
    pub fn pairs(&self) -> &Pairing {
        &self.pairing
    }

    /// Latest viewport measurements.
    pub fn geometry(&self) -> ViewportGeometry {
        self.geometry.geometry()
    }

    /// Bottom padding the renderer should leave below the last pair.
    pub fn bottom_padding(&self) -> f64 {
        self.geometry.padding()
    }

    /// Listeners currently attached.
    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    /// Timers currently pending.
    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// When [`ThreadViewport::advance`] next has work to do.
    pub fn next_timer_due(&self) -> Option<Millis> {
        self.timers.next_due()
    }

    /// The latest layout snapshot.
    pub fn layout(&self) -> Option<&LayoutSnapshot> {
        self.layout.as_ref()
    }

    /// Last position sent to the avatar.
    pub fn focused_position(&self) -> Option<FocusedPosition> {
        self.broadcaster.last_published()
    }

    /// Constants the viewport was built with.
    pub fn tuning(&self) -> &FocusTuning {
        &self.tuning
    }

    /// Whether focus mode is on.
    pub fn is_focus_active(&self) -> bool {
        self.focus.is_focus_active()
    }

    /// Whether the debug overlay is shown.
    pub fn is_debug_visible(&self) -> bool {
        self.debug_visible
    }

    /// What the debug overlay shows right now.
    pub fn debug_overlay(&self) -> DebugOverlay {
        DebugOverlay {
            current_pair: self.focus.current_pair(),
            total_pairs: self.pairing.len(),
            focus_active: self.focus.is_focus_active(),
        }
    }

    /// Scale and opacity to draw `pair` with.
    pub fn pair_emphasis(&self, pair: PairIndex) -> PairEmphasis {
        pair_emphasis(pair, self.pairing.len(), self.is_focus_active(), &self.tuning)
    }

    /// Messages at least 75% inside the container in the current layout.
    pub fn messages_in_view(&self) -> BTreeSet<MessageId> {
        self.layout
            .as_ref()
            .map(|layout| messages_in_view(layout, self.tuning.in_view_threshold))
            .unwrap_or_default()
    }

    // ===== Internals =====

    fn on_shown(&mut self, now: Millis) {
        self.listeners.attach(Listener::Resize);
        self.listeners.attach(Listener::ResolverScroll);
        self.listeners.attach(Listener::Intersection);
        self.timers
            .schedule(TimerKind::GeometrySettle, now + self.tuning.mount_settle_ms);
        self.resolve(now);
    }

    fn on_hidden(&mut self) {
        self.listeners.detach(Listener::Resize);
        self.listeners.detach(Listener::ResolverScroll);
        self.listeners.detach(Listener::Intersection);
        self.timers.cancel(TimerKind::GeometrySettle);
        self.timers.cancel(TimerKind::ResolveAfterScroll);
        if self.timers.cancel(TimerKind::TransitionInEnd) {
            self.signals.send(ViewportSignal::TransitioningInChanged(false));
        }
        self.layout = None;
        self.latest_hold = None;
        self.resolver.reset();
        self.intersection.reset();
    }

    fn start_transition_in(&mut self, now: Millis) {
        self.signals.send(ViewportSignal::TransitioningInChanged(true));
        self.timers
            .schedule(TimerKind::TransitionInEnd, now + self.tuning.transition_in_ms);
    }

    fn fire(&mut self, kind: TimerKind, now: Millis) {
        match kind {
            TimerKind::GeometrySettle => self.measure_geometry(),
            TimerKind::ResolveAfterScroll => {
                // scrolling settled, wherever it ended up
                if matches!(self.latest_hold, Some(LatestHold::Scrolling { .. })) {
                    self.latest_hold = None;
                }
                self.resolve(now);
            }
            TimerKind::ScrollToLatest => self.scroll_to_latest(),
            TimerKind::TransitionInEnd => {
                self.focus.finish_transition_in();
                self.signals.send(ViewportSignal::TransitioningInChanged(false));
                self.sync(now);
            }
            TimerKind::PositionSettle | TimerKind::PositionAfterScroll => self.recompute_position(),
        }
    }

    /// Apply entry effects when the derived state differs from the last
    /// applied one.
    fn sync(&mut self, now: Millis) {
        let state = self.focus.state();
        let previous = self.applied.replace(state);
        if previous == Some(state) {
            return;
        }
        debug!(from = ?previous, to = %state, "Focus state changed");

        if previous.is_some_and(|s| s.is_waiting()) && !state.is_waiting() {
            self.broadcaster.thaw();
        }

        match state {
            FocusState::WaitingForResponse(_) => {
                self.broadcaster.freeze();
                self.stop_position_tracking();
            }
            FocusState::TransitioningIn(_) => self.stop_position_tracking(),
            FocusState::Idle => {
                self.stop_position_tracking();
                self.broadcaster.clear();
            }
            FocusState::Tracking(_) => {
                self.listeners.attach(Listener::PositionScroll);
                if matches!(previous, Some(FocusState::TransitioningIn(_))) {
                    self.recompute_position();
                } else {
                    self.timers
                        .schedule(TimerKind::PositionSettle, now + self.tuning.position_settle_ms);
                }
            }
        }
    }

    fn stop_position_tracking(&mut self) {
        self.listeners.detach(Listener::PositionScroll);
        self.timers.cancel(TimerKind::PositionSettle);
        self.timers.cancel(TimerKind::PositionAfterScroll);
    }

    fn measure_geometry(&mut self) {
        if let Some(layout) = &self.layout {
            self.geometry.measure(layout);
        } else {
            debug!("Geometry measurement skipped: no layout");
        }
    }

    fn resolve(&mut self, now: Millis) {
        if self.latest_hold.is_some() {
            debug!("Resolution held until the latest pair is scrolled into place");
            return;
        }
        let Some(layout) = &self.layout else {
            return;
        };
        let Some(pair) = self.resolver.resolve(layout) else {
            return;
        };
        if self.focus.resolved(pair) {
            self.sync(now);
        }
    }

    fn recompute_position(&mut self) {
        let Some(tracked) = self.focus.state().tracked_pair() else {
            return;
        };
        let (Some(layout), Some(pair)) = (&self.layout, self.pairing.get(tracked)) else {
            debug!(pair = %tracked, "Focused pair not rendered, keeping position");
            return;
        };
        self.broadcaster.recompute(layout, pair.ai.id());
    }

    fn release_hold_if_landed(&mut self) {
        let (Some(LatestHold::Scrolling { target }), Some(top)) = (
            self.latest_hold,
            self.layout.as_ref().and_then(LayoutSnapshot::scroll_top),
        ) else {
            return;
        };
        if (top - target).abs() < 0.5 {
            debug!(top, "Latest pair scrolled into place");
            self.latest_hold = None;
        }
    }

    fn scroll_to_latest(&mut self) {
        let Some(layout) = &self.layout else {
            debug!("Scroll to latest skipped: no layout");
            self.latest_hold = None;
            return;
        };
        let (Some(top), Some(last)) = (
            scroll_to_latest_target(layout, self.tuning.scroll_target_fraction),
            layout.last_pair(),
        ) else {
            debug!("Scroll to latest skipped: last pair not rendered");
            self.latest_hold = None;
            return;
        };
        debug!(top, pair = %last.pair_index, "Scrolling to latest pair");
        self.signals.send(ViewportSignal::ScrollRequested(ScrollRequest {
            top,
            behavior: ScrollBehavior::Smooth,
            pair_index: last.pair_index,
        }));
        self.latest_hold = Some(LatestHold::Scrolling { target: top });
        self.release_hold_if_landed();
    }
}

impl Drop for ThreadViewport {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Whether the last message of `messages` is the AI half of the last pair.
fn tail_completes_pair(pairing: &Pairing, messages: &[Message]) -> bool {
    match (pairing.pairs.last(), messages.last()) {
        (Some(pair), Some(tail)) => pair.ai.id() == tail.id(),
        _ => false,
    }
}

#[cfg(test)]
#[path = "viewport_tests.rs"]
mod tests;
