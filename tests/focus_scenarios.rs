//! End-to-end focus scenarios driven through the public viewport API.
//!
//! Each test mounts a `ThreadViewport`, feeds it props, stacked layouts and
//! clock ticks, and checks the signals it sends to the host.

use chrono::Utc;
use coach_focus::model::{pair_messages, Message, MessageId, PairIndex};
use coach_focus::state::{
    FocusState, Listener, Millis, ScrollBehavior, ScrollRequest, ThreadProps, ThreadViewport,
    ViewportSignal,
};
use coach_focus::view_state::{
    resolve_centered_pair, Bounds, ContainerBox, FocusTuning, LayoutSnapshot, PairBox,
    PairHeights, ResolverWeights, ScrollDirection, StackedLayout,
};
use std::sync::mpsc::{self, Receiver};

// ===== Helpers =====

fn id(n: usize) -> MessageId {
    MessageId::new(n.to_string()).unwrap()
}

/// `pairs` complete pairs with ids 1..=2*pairs, optionally followed by a
/// user message still waiting for its reply.
fn conversation(pairs: usize, trailing_user: bool) -> Vec<Message> {
    let mut messages = Vec::new();
    for i in 0..pairs {
        messages.push(Message::user(id(2 * i + 1), format!("u{}", i + 1), Utc::now()));
        messages.push(Message::ai(id(2 * i + 2), format!("a{}", i + 1), Utc::now(), false));
    }
    if trailing_user {
        messages.push(Message::user(id(2 * pairs + 1), "pending", Utc::now()));
    }
    messages
}

/// 420px pairs (100 user + 20 gap + 300 ai) 40px apart in a 1000px container.
fn layout(messages: &[Message], scroll_top: f64) -> LayoutSnapshot {
    let pairing = pair_messages(messages);
    let heights = vec![PairHeights::new(100.0, 300.0); pairing.len()];
    StackedLayout::new(Bounds::new(400.0, 0.0, 800.0, 1000.0))
        .with_gaps(40.0, 20.0)
        .measure(&pairing.pairs, &heights, scroll_top)
}

fn viewport() -> (ThreadViewport, Receiver<ViewportSignal>) {
    let (tx, rx) = mpsc::channel();
    (ThreadViewport::new(FocusTuning::default(), tx), rx)
}

fn drain(rx: &Receiver<ViewportSignal>) -> Vec<ViewportSignal> {
    rx.try_iter().collect()
}

fn positions(signals: &[ViewportSignal]) -> Vec<ViewportSignal> {
    signals
        .iter()
        .filter(|s| matches!(s, ViewportSignal::FocusPositionChanged(_)))
        .cloned()
        .collect()
}

fn t(ms: u64) -> Millis {
    Millis::new(ms)
}

fn pair_box(index: usize, top: f64, height: f64) -> PairBox {
    PairBox {
        pair_index: PairIndex::new(index),
        bounds: Bounds::new(0.0, top, 800.0, height),
        offset_top: top,
    }
}

fn container_snapshot(pairs: &[PairBox]) -> LayoutSnapshot {
    let mut snapshot =
        LayoutSnapshot::with_container(ContainerBox::new(Bounds::new(0.0, 0.0, 800.0, 1000.0), 0.0));
    for pair in pairs {
        snapshot.push_pair(*pair);
    }
    snapshot
}

// ===== Scenarios =====

#[test]
fn completed_pair_on_open_is_tracked_scrolled_to_and_positioned() {
    let (mut viewport, rx) = viewport();
    viewport.mount(ThreadProps::new(conversation(2, true)), t(0));
    drain(&rx);

    let messages = conversation(3, false);
    viewport.update(ThreadProps::new(messages.clone()).visible(true), t(1000));
    viewport.set_layout(layout(&messages, 720.0), t(1000));
    assert_eq!(viewport.state(), FocusState::Tracking(PairIndex::new(2)));

    let mut signals = Vec::new();
    for ms in [1050, 1100, 1500, 2000] {
        viewport.advance(t(ms));
        signals.extend(drain(&rx));
    }

    assert!(signals.contains(&ViewportSignal::ScrollRequested(ScrollRequest {
        top: 720.0,
        behavior: ScrollBehavior::Smooth,
        pair_index: PairIndex::new(2),
    })));

    let published = positions(&signals);
    assert_eq!(published.len(), 1, "{published:?}");
    let ViewportSignal::FocusPositionChanged(Some(position)) = published[0] else {
        panic!("expected a position, got {:?}", published[0]);
    };

    // ai message of pair 2 spans 320..620 at scroll 720
    let ai = viewport
        .layout()
        .and_then(|layout| layout.message(&id(6)).copied())
        .unwrap();
    assert!(position.top >= ai.top && position.top <= ai.bottom(), "{position:?} vs {ai:?}");
}

#[test]
fn completed_pair_stays_focused_until_scroll_lands() {
    let (mut viewport, rx) = viewport();
    let opening = conversation(2, true);
    viewport.mount(ThreadProps::new(opening.clone()).visible(true), t(0));
    viewport.set_layout(layout(&opening, 0.0), t(0));
    viewport.advance(t(200));
    drain(&rx);

    // the render that adds the reply still has the old scroll offset
    let messages = conversation(3, false);
    viewport.update(ThreadProps::new(messages.clone()).visible(true), t(1000));
    viewport.set_layout(layout(&messages, 0.0), t(1000));
    viewport.advance(t(1050));
    assert_eq!(viewport.state(), FocusState::Tracking(PairIndex::new(2)));

    for (i, scroll) in [240.0, 480.0, 720.0].into_iter().enumerate() {
        viewport.on_scroll(layout(&messages, scroll), t(1066 + 16 * i as u64));
    }
    viewport.advance(t(1300));

    let signals = drain(&rx);
    assert!(!signals.contains(&ViewportSignal::FocusPositionChanged(None)), "{signals:?}");
    assert_eq!(viewport.state(), FocusState::Tracking(PairIndex::new(2)));
}

#[test]
fn hidden_single_pair_releases_avatar_without_listeners() {
    let (mut viewport, rx) = viewport();
    viewport.mount(ThreadProps::new(conversation(1, false)), t(0));

    assert_eq!(drain(&rx), vec![ViewportSignal::FocusPositionChanged(None)]);
    assert!(!viewport.listeners().is_attached(Listener::Resize));
    assert!(!viewport.listeners().is_attached(Listener::ResolverScroll));
    assert!(!viewport.listeners().is_attached(Listener::Intersection));
    assert!(viewport.timers().is_empty());
}

#[test]
fn scrolling_down_prefers_mostly_visible_pair_above() {
    // pair 0 is 90% visible, pair 1 is 40% visible
    let snapshot = container_snapshot(&[pair_box(0, -50.0, 500.0), pair_box(1, 600.0, 1000.0)]);
    let chosen = resolve_centered_pair(&snapshot, ScrollDirection::Down, &ResolverWeights::default());
    assert_eq!(chosen, Some(PairIndex::new(0)));
}

#[test]
fn downward_bias_outweighs_a_slightly_closer_pair_below() {
    // raw distances from center 500: pair 0 is 250 away, pair 1 is 230 away
    let snapshot = container_snapshot(&[pair_box(0, 100.0, 300.0), pair_box(1, 530.0, 400.0)]);
    let weights = ResolverWeights::default();

    assert_eq!(
        resolve_centered_pair(&snapshot, ScrollDirection::Down, &weights),
        Some(PairIndex::new(0))
    );

    let unbiased = ResolverWeights {
        up_bias: 1.0,
        down_bias: 1.0,
        ..weights
    };
    assert_eq!(
        resolve_centered_pair(&snapshot, ScrollDirection::Down, &unbiased),
        Some(PairIndex::new(1))
    );
}

#[test]
fn waiting_holds_avatar_until_reply_arrives() {
    let (mut viewport, rx) = viewport();
    viewport.mount(ThreadProps::new(conversation(2, true)), t(0));
    let messages = conversation(3, false);
    viewport.update(ThreadProps::new(messages.clone()).visible(true), t(1000));
    viewport.set_layout(layout(&messages, 720.0), t(1000));
    viewport.advance(t(1100));
    let held = viewport.focused_position();
    assert!(held.is_some());
    drain(&rx);

    // user sends: trailing message, waiting for the reply
    let mut sent = messages.clone();
    sent.extend(conversation(4, true).split_off(6).into_iter().take(1));
    viewport.update(ThreadProps::new(sent.clone()).visible(true).waiting(true), t(1200));
    for (i, scroll) in [600.0, 300.0, 0.0].into_iter().enumerate() {
        let now = t(1300 + i as u64 * 50);
        viewport.on_scroll(layout(&sent, scroll), now);
        viewport.advance(now);
    }
    viewport.on_resize(layout(&sent, 0.0), t(1500));
    viewport.advance(t(1900));

    assert!(positions(&drain(&rx)).is_empty());
    assert_eq!(viewport.focused_position(), held);
}

#[test]
fn teardown_stops_all_callbacks() {
    let (mut viewport, rx) = viewport();
    let messages = conversation(3, false);
    viewport.mount(ThreadProps::new(messages.clone()).visible(true), t(0));
    viewport.set_layout(layout(&messages, 0.0), t(0));
    assert!(!viewport.listeners().is_empty());
    drain(&rx);

    viewport.teardown();
    assert!(viewport.listeners().is_empty());
    assert!(viewport.timers().is_empty());

    viewport.on_scroll(layout(&messages, 500.0), t(100));
    viewport.update(ThreadProps::new(conversation(4, false)).visible(true), t(200));
    viewport.advance(t(5000));
    assert!(drain(&rx).is_empty());
}

#[test]
fn dropping_viewport_closes_channel_quietly() {
    let (mut viewport, rx) = viewport();
    viewport.mount(ThreadProps::new(conversation(1, false)).visible(true), t(0));
    drain(&rx);
    drop(viewport);

    assert!(rx.try_recv().is_err());
}
