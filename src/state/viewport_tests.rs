use super::*;
use crate::view_state::{Bounds, PairHeights, StackedLayout};
use chrono::Utc;
use std::sync::mpsc::{self, Receiver};

fn conversation(pairs: usize, trailing_user: bool) -> Vec<Message> {
    let mut messages = Vec::new();
    let mut next = 1;
    let mut id = || {
        let current = MessageId::new(next.to_string()).unwrap();
        next += 1;
        current
    };
    for _ in 0..pairs {
        messages.push(Message::user(id(), "question", Utc::now()));
        messages.push(Message::ai(id(), "answer", Utc::now(), false));
    }
    if trailing_user {
        messages.push(Message::user(id(), "pending", Utc::now()));
    }
    messages
}

/// Pairs of 420px (100 user + 20 gap + 300 ai) separated by 40px.
fn stacked() -> StackedLayout {
    StackedLayout::new(Bounds::new(400.0, 0.0, 800.0, 1000.0)).with_gaps(40.0, 20.0)
}

fn layout(messages: &[Message], scroll_top: f64) -> LayoutSnapshot {
    let pairing = pair_messages(messages);
    let heights = vec![PairHeights::new(100.0, 300.0); pairing.len()];
    stacked().measure(&pairing.pairs, &heights, scroll_top)
}

fn viewport() -> (ThreadViewport, Receiver<ViewportSignal>) {
    let (tx, rx) = mpsc::channel();
    (ThreadViewport::new(FocusTuning::default(), tx), rx)
}

fn drain(rx: &Receiver<ViewportSignal>) -> Vec<ViewportSignal> {
    rx.try_iter().collect()
}

fn t(ms: u64) -> Millis {
    Millis::new(ms)
}

/// Mount hidden, then open with one more pair completed at t=1000.
fn tracking_last_of_three() -> (ThreadViewport, Receiver<ViewportSignal>, Vec<Message>) {
    let (mut viewport, rx) = viewport();
    viewport.mount(ThreadProps::new(conversation(2, true)), t(0));
    let messages = conversation(3, false);
    viewport.update(ThreadProps::new(messages.clone()).visible(true), t(1000));
    // pair 2 top at 920, target scroll 920 - 200
    viewport.set_layout(layout(&messages, 720.0), t(1000));
    (viewport, rx, messages)
}

#[test]
fn mount_hidden_releases_avatar_once() {
    let (mut viewport, rx) = viewport();
    viewport.mount(ThreadProps::new(conversation(1, false)), t(0));

    assert_eq!(viewport.state(), FocusState::Idle);
    assert_eq!(drain(&rx), vec![ViewportSignal::FocusPositionChanged(None)]);
    assert!(viewport.listeners().is_empty());
}

#[test]
fn mount_is_not_a_new_pair() {
    let (mut viewport, _rx) = viewport();
    viewport.mount(ThreadProps::new(conversation(3, false)).visible(true), t(0));
    assert_eq!(viewport.current_pair(), None);
    assert!(!viewport.timers().is_pending(TimerKind::ScrollToLatest));
}

#[test]
fn second_mount_is_ignored() {
    let (mut viewport, rx) = viewport();
    viewport.mount(ThreadProps::new(conversation(1, false)), t(0));
    drain(&rx);
    viewport.mount(ThreadProps::new(conversation(2, false)).visible(true), t(10));
    assert_eq!(viewport.pairs().len(), 1);
    assert!(drain(&rx).is_empty());
}

#[test]
fn showing_attaches_geometry_and_resolver_listeners() {
    let (mut viewport, _rx) = viewport();
    viewport.mount(ThreadProps::new(conversation(1, false)).visible(true), t(0));

    let attached: Vec<_> = viewport.listeners().iter().collect();
    assert_eq!(
        attached,
        vec![Listener::Resize, Listener::ResolverScroll, Listener::Intersection]
    );
    assert_eq!(viewport.timers().due_at(TimerKind::GeometrySettle), Some(t(100)));
}

#[test]
fn hiding_detaches_listeners_and_drops_layout() {
    let (mut viewport, _rx, messages) = tracking_last_of_three();
    viewport.update(ThreadProps::new(messages), t(2000));

    assert!(viewport.listeners().is_empty());
    assert!(viewport.layout().is_none());
    assert_eq!(viewport.state(), FocusState::Idle);
}

#[test]
fn new_pair_tracks_last_and_scrolls_to_it() {
    let (mut viewport, rx, _) = tracking_last_of_three();
    assert_eq!(viewport.state(), FocusState::Tracking(PairIndex::new(2)));
    drain(&rx);

    viewport.advance(t(1050));
    assert_eq!(
        drain(&rx),
        vec![ViewportSignal::ScrollRequested(ScrollRequest {
            top: 720.0,
            behavior: ScrollBehavior::Smooth,
            pair_index: PairIndex::new(2),
        })]
    );
}

#[test]
fn position_is_published_after_settle() {
    let (mut viewport, rx, _) = tracking_last_of_three();
    drain(&rx);

    viewport.advance(t(1099));
    assert!(drain(&rx).iter().all(|s| !matches!(s, ViewportSignal::FocusPositionChanged(_))));

    viewport.advance(t(1100));
    // ai content of pair 2: top 200 + 100 + 20, height 300
    assert_eq!(
        drain(&rx),
        vec![ViewportSignal::FocusPositionChanged(Some(FocusedPosition::new(150.0, 370.0)))]
    );
    assert!(viewport.listeners().is_attached(Listener::PositionScroll));
}

#[test]
fn geometry_settles_after_mount_delay() {
    let (mut viewport, _rx, _) = tracking_last_of_three();
    assert_eq!(viewport.bottom_padding(), 100.0);

    viewport.advance(t(1100));
    // (1000 - 420) / 2 * 1.8
    assert_eq!(viewport.bottom_padding(), 522.0);
    assert_eq!(viewport.geometry().last_pair_height, 420.0);
}

#[test]
fn resize_measures_immediately() {
    let (mut viewport, _rx, messages) = tracking_last_of_three();
    viewport.on_resize(layout(&messages, 720.0), t(1001));
    assert_eq!(viewport.bottom_padding(), 522.0);
}

#[test]
fn scroll_debounces_position_updates() {
    let (mut viewport, rx, messages) = tracking_last_of_three();
    viewport.advance(t(1100));
    drain(&rx);

    viewport.on_scroll(layout(&messages, 710.0), t(1200));
    viewport.on_scroll(layout(&messages, 700.0), t(1250));
    viewport.advance(t(1300));
    assert!(drain(&rx).is_empty(), "first trigger was superseded");

    viewport.advance(t(1350));
    assert_eq!(
        drain(&rx),
        vec![ViewportSignal::FocusPositionChanged(Some(FocusedPosition::new(150.0, 390.0)))]
    );
}

#[test]
fn scrolling_away_from_last_pair_releases_avatar() {
    let (mut viewport, rx, messages) = tracking_last_of_three();
    viewport.advance(t(1100));
    drain(&rx);

    // pair 1 centered, pair 2 barely visible
    viewport.on_scroll(layout(&messages, 0.0), t(1200));
    viewport.advance(t(1230));

    assert_eq!(viewport.current_pair(), Some(PairIndex::new(1)));
    assert_eq!(viewport.state(), FocusState::Idle);
    assert!(drain(&rx).contains(&ViewportSignal::FocusPositionChanged(None)));
    assert!(!viewport.listeners().is_attached(Listener::PositionScroll));
}

#[test]
fn reopening_on_last_pair_transitions_in() {
    let (mut viewport, rx, messages) = tracking_last_of_three();
    viewport.advance(t(1100));
    viewport.update(ThreadProps::new(messages.clone()), t(2000));
    drain(&rx);

    viewport.update(ThreadProps::new(messages.clone()).visible(true), t(3000));
    assert_eq!(viewport.state(), FocusState::TransitioningIn(PairIndex::new(2)));
    assert_eq!(drain(&rx), vec![ViewportSignal::TransitioningInChanged(true)]);

    viewport.set_layout(layout(&messages, 720.0), t(3000));
    viewport.advance(t(3999));
    assert!(drain(&rx).is_empty(), "position held back during transition");

    viewport.advance(t(4000));
    assert_eq!(
        drain(&rx),
        vec![
            ViewportSignal::TransitioningInChanged(false),
            ViewportSignal::FocusPositionChanged(Some(FocusedPosition::new(150.0, 370.0))),
        ]
    );
    assert_eq!(viewport.state(), FocusState::Tracking(PairIndex::new(2)));
}

#[test]
fn hiding_during_transition_ends_it() {
    let (mut viewport, rx, messages) = tracking_last_of_three();
    viewport.update(ThreadProps::new(messages.clone()), t(2000));
    viewport.update(ThreadProps::new(messages.clone()).visible(true), t(3000));
    drain(&rx);

    viewport.update(ThreadProps::new(messages), t(3500));
    assert_eq!(drain(&rx), vec![ViewportSignal::TransitioningInChanged(false)]);
    assert!(!viewport.timers().is_pending(TimerKind::TransitionInEnd));
}

#[test]
fn waiting_freezes_position() {
    let (mut viewport, rx, messages) = tracking_last_of_three();
    viewport.advance(t(1100));
    let held = viewport.focused_position();
    drain(&rx);

    viewport.update(ThreadProps::new(messages.clone()).visible(true).waiting(true), t(1200));
    viewport.on_scroll(layout(&messages, 0.0), t(1300));
    viewport.advance(t(2000));
    viewport.update(ThreadProps::new(messages.clone()).waiting(true), t(2100));

    assert!(drain(&rx)
        .iter()
        .all(|s| !matches!(s, ViewportSignal::FocusPositionChanged(_))));
    assert_eq!(viewport.focused_position(), held);
    assert!(viewport.state().is_waiting());
}

#[test]
fn clearing_wait_resumes_tracking() {
    let (mut viewport, rx, messages) = tracking_last_of_three();
    viewport.advance(t(1100));
    viewport.update(ThreadProps::new(messages.clone()).visible(true).waiting(true), t(1200));
    drain(&rx);

    let mut grown = messages.clone();
    grown.extend(conversation(4, false).split_off(6));
    viewport.update(ThreadProps::new(grown.clone()).visible(true).waiting(true), t(1300));
    assert!(viewport.state().is_waiting());
    viewport.set_layout(layout(&grown, 1100.0), t(1300));

    viewport.update(ThreadProps::new(grown).visible(true), t(1500));
    assert_eq!(viewport.state(), FocusState::Tracking(PairIndex::new(3)));

    viewport.advance(t(1600));
    let positions: Vec<_> = drain(&rx)
        .into_iter()
        .filter(|s| matches!(s, ViewportSignal::FocusPositionChanged(_)))
        .collect();
    assert_eq!(
        positions,
        vec![ViewportSignal::FocusPositionChanged(Some(FocusedPosition::new(150.0, 450.0)))]
    );
}

#[test]
fn streaming_finish_remeasures_position() {
    let (mut viewport, rx, mut messages) = tracking_last_of_three();
    viewport.advance(t(1100));
    drain(&rx);

    if let Some(last) = messages.last_mut() {
        *last = Message::ai(last.id().clone(), "answer", Utc::now(), true);
    }
    viewport.update(ThreadProps::new(messages).visible(true), t(1200));
    assert!(viewport.timers().is_pending(TimerKind::PositionSettle));
}

#[test]
fn teardown_releases_everything() {
    let (mut viewport, rx, messages) = tracking_last_of_three();
    viewport.advance(t(1100));
    drain(&rx);

    viewport.teardown();
    assert_eq!(viewport.lifecycle(), Lifecycle::TornDown);
    assert!(viewport.listeners().is_empty());
    assert!(viewport.timers().is_empty());
    assert!(viewport.layout().is_none());

    viewport.on_scroll(layout(&messages, 0.0), t(1200));
    viewport.on_resize(layout(&messages, 0.0), t(1200));
    viewport.update(ThreadProps::new(conversation(4, false)).visible(true), t(1300));
    viewport.advance(t(10_000));
    assert!(drain(&rx).is_empty());
    assert_eq!(viewport.pairs().len(), 3, "updates after teardown are ignored");
}

#[test]
fn debug_overlay_is_observational() {
    let (mut viewport, rx, _) = tracking_last_of_three();
    drain(&rx);
    let state = viewport.state();

    viewport.toggle_debug();
    assert!(viewport.is_debug_visible());
    let overlay = viewport.debug_overlay();

    assert_eq!(overlay.current_pair, Some(PairIndex::new(2)));
    assert_eq!(overlay.total_pairs, 3);
    assert!(overlay.focus_active);
    assert_eq!(viewport.state(), state);
    assert!(drain(&rx).is_empty());
}

#[test]
fn emphasis_follows_focus_mode() {
    let (viewport, _rx, _) = tracking_last_of_three();
    assert!(viewport.pair_emphasis(PairIndex::new(2)).is_enlarged());
    assert!(viewport.pair_emphasis(PairIndex::new(0)).is_dimmed());
}

#[test]
fn messages_in_view_uses_current_layout() {
    let (viewport, _rx, messages) = tracking_last_of_three();
    let in_view = viewport.messages_in_view();
    // last pair fully visible at scroll 720
    assert!(in_view.contains(messages[4].id()));
    assert!(in_view.contains(messages[5].id()));
    assert!(!in_view.contains(messages[0].id()));
}

/// Open on two pairs at the top, then complete a third without scrolling.
fn new_pair_before_scroll() -> (ThreadViewport, Receiver<ViewportSignal>, Vec<Message>) {
    let (mut viewport, rx) = viewport();
    let opening = conversation(2, true);
    viewport.mount(ThreadProps::new(opening.clone()).visible(true), t(0));
    viewport.set_layout(layout(&opening, 0.0), t(0));
    viewport.advance(t(200));
    drain(&rx);

    let messages = conversation(3, false);
    viewport.update(ThreadProps::new(messages.clone()).visible(true), t(1000));
    viewport.set_layout(layout(&messages, 0.0), t(1000));
    (viewport, rx, messages)
}

#[test]
fn new_pair_keeps_focus_against_pre_scroll_layout() {
    let (mut viewport, rx, messages) = new_pair_before_scroll();
    assert_eq!(viewport.state(), FocusState::Tracking(PairIndex::new(2)));
    assert!(!drain(&rx).contains(&ViewportSignal::FocusPositionChanged(None)));

    viewport.advance(t(1050));
    assert_eq!(
        drain(&rx),
        vec![ViewportSignal::ScrollRequested(ScrollRequest {
            top: 720.0,
            behavior: ScrollBehavior::Smooth,
            pair_index: PairIndex::new(2),
        })]
    );

    // smooth scroll frames on the way to 720
    viewport.on_scroll(layout(&messages, 200.0), t(1060));
    viewport.on_scroll(layout(&messages, 500.0), t(1076));
    assert_eq!(viewport.state(), FocusState::Tracking(PairIndex::new(2)));

    viewport.on_scroll(layout(&messages, 720.0), t(1092));
    viewport.advance(t(1200));
    assert_eq!(viewport.state(), FocusState::Tracking(PairIndex::new(2)));
    let signals = drain(&rx);
    assert!(!signals.contains(&ViewportSignal::FocusPositionChanged(None)));
    assert_eq!(
        viewport.focused_position(),
        Some(FocusedPosition::new(150.0, 370.0))
    );
}

#[test]
fn settled_scroll_elsewhere_releases_forced_focus() {
    let (mut viewport, rx, messages) = new_pair_before_scroll();
    viewport.advance(t(1050));

    // the host scrolls back up instead of honouring the request
    viewport.on_scroll(layout(&messages, 0.0), t(1100));
    assert_eq!(viewport.state(), FocusState::Tracking(PairIndex::new(2)));

    viewport.advance(t(1130));
    assert_eq!(viewport.current_pair(), Some(PairIndex::new(1)));
    assert_eq!(viewport.state(), FocusState::Idle);
    assert!(drain(&rx).contains(&ViewportSignal::FocusPositionChanged(None)));
}
