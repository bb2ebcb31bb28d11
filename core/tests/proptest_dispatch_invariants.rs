//! Property-based invariant tests for key event routing.
//!
//! For randomly shaped trees with random handler registrations:
//!
//! 1. Capture handlers run root-to-target, bubble handlers target-to-root.
//! 2. A handler marking the event handled ends routing; nothing after it runs.
//! 3. Without any handled flag, every phase runs and the event stays unhandled.
//! 4. The target’s handler runs at most once, and only in the AtTarget phase.
//! 5. Dispatching to a view that is no longer in the tree fails and runs nothing.

use keyroute_core::error::{ConfigurationError, DispatchError};
use keyroute_core::events::{EventHandler, EventPhase, HandlerSlot};
use keyroute_core::raw_events::{KeyTransition, RawKeyEvent};
use keyroute_core::{Dispatcher, ViewId, ViewTree};
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Handler registration for one view.
#[derive(Debug, Clone, Copy)]
struct Registration {
    capture: bool,
    capture_handles: bool,
    bubble: bool,
    bubble_handles: bool,
}

#[derive(Debug, Clone)]
struct Shape {
    /// `parents[i]` is the superview index of view `i + 1`; view 0 is the root.
    parents: Vec<usize>,
    registrations: Vec<Registration>,
    target: usize,
}

type Log = Arc<Mutex<Vec<(usize, EventPhase)>>>;

fn registration_strategy(handled_weight: u32) -> impl Strategy<Value = Registration> {
    let handles = prop::bool::weighted(f64::from(handled_weight) / 100.0);
    (any::<bool>(), handles.clone(), any::<bool>(), handles).prop_map(
        |(capture, capture_handles, bubble, bubble_handles)| Registration {
            capture,
            capture_handles,
            bubble,
            bubble_handles,
        },
    )
}

fn shape_strategy(handled_weight: u32) -> impl Strategy<Value = Shape> {
    (1usize..24).prop_flat_map(move |len| {
        (
            prop::collection::vec(any::<prop::sample::Index>(), len - 1),
            prop::collection::vec(registration_strategy(handled_weight), len),
            0..len,
        )
            .prop_map(|(parent_picks, registrations, target)| Shape {
                parents: parent_picks
                    .iter()
                    .enumerate()
                    .map(|(i, pick)| pick.index(i + 1))
                    .collect(),
                registrations,
                target,
            })
    })
}

fn slots(transition: KeyTransition) -> (HandlerSlot, HandlerSlot) {
    match transition {
        KeyTransition::Down => (HandlerSlot::KeyDownCapture, HandlerSlot::KeyDown),
        KeyTransition::Up => (HandlerSlot::KeyUpCapture, HandlerSlot::KeyUp),
    }
}

fn recorder(log: &Log, index: usize, handles: bool) -> EventHandler {
    let log = Arc::clone(log);
    EventHandler::new(move |event| {
        log.lock().push((index, event.phase()));
        if handles {
            event.set_handled();
        }
    })
}

fn build(shape: &Shape, transition: KeyTransition, log: &Log) -> (ViewTree, Vec<ViewId>) {
    let mut tree = ViewTree::new();
    let mut ids = vec![tree.root()];
    for parent in &shape.parents {
        let id = tree.add_subview(ids[*parent]).unwrap();
        ids.push(id);
    }

    let (capture_slot, bubble_slot) = slots(transition);
    for (index, reg) in shape.registrations.iter().enumerate() {
        if reg.capture {
            let handler = recorder(log, index, reg.capture_handles);
            tree.set_handler(ids[index], capture_slot, Some(handler))
                .unwrap();
        }
        if reg.bubble {
            let handler = recorder(log, index, reg.bubble_handles);
            tree.set_handler(ids[index], bubble_slot, Some(handler))
                .unwrap();
        }
    }
    (tree, ids)
}

/// Root-first index path to the target.
fn chain(shape: &Shape) -> Vec<usize> {
    let mut chain = vec![shape.target];
    let mut current = shape.target;
    while current != 0 {
        current = shape.parents[current - 1];
        chain.push(current);
    }
    chain.reverse();
    chain
}

/// Every handler invocation a full pass would make, with whether it marks the event handled.
fn full_route(shape: &Shape) -> Vec<(usize, EventPhase, bool)> {
    let chain = chain(shape);
    let (ancestors, target) = chain.split_at(chain.len() - 1);
    let target = target[0];
    let mut route = Vec::new();
    for &view in ancestors {
        let reg = shape.registrations[view];
        if reg.capture {
            route.push((view, EventPhase::Capturing, reg.capture_handles));
        }
    }
    let reg = shape.registrations[target];
    if reg.bubble {
        route.push((target, EventPhase::AtTarget, reg.bubble_handles));
    }
    for &view in ancestors.iter().rev() {
        let reg = shape.registrations[view];
        if reg.bubble {
            route.push((view, EventPhase::Bubbling, reg.bubble_handles));
        }
    }
    route
}

fn transition_strategy() -> impl Strategy<Value = KeyTransition> {
    prop_oneof![Just(KeyTransition::Down), Just(KeyTransition::Up)]
}

fn raw(transition: KeyTransition) -> RawKeyEvent {
    match transition {
        KeyTransition::Down => RawKeyEvent::down("Enter"),
        KeyTransition::Up => RawKeyEvent::up("Enter"),
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1 + 2. Routing order, truncated at the first handler that handles
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn route_order_and_early_stop(
        shape in shape_strategy(15),
        transition in transition_strategy(),
    ) {
        let log = Log::default();
        let (tree, ids) = build(&shape, transition, &log);

        let event = Dispatcher::default()
            .dispatch(&tree, raw(transition), Some(ids[shape.target]))
            .unwrap()
            .unwrap();

        let full = full_route(&shape);
        let stop = full.iter().position(|(_, _, handles)| *handles);
        let expected: Vec<_> = match stop {
            Some(stop) => &full[..=stop],
            None => &full[..],
        }
        .iter()
        .map(|(view, phase, _)| (*view, *phase))
        .collect();

        prop_assert_eq!(&*log.lock(), &expected);
        prop_assert_eq!(event.is_handled(), stop.is_some());

        if let Some(stop) = stop {
            if full[stop].1 == EventPhase::Capturing {
                prop_assert!(
                    log.lock().iter().all(|(_, phase)| *phase == EventPhase::Capturing),
                    "handled during capture must suppress the other phases"
                );
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Nothing handled: all phases complete
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unhandled_runs_every_phase(
        shape in shape_strategy(0),
        transition in transition_strategy(),
    ) {
        let log = Log::default();
        let (tree, ids) = build(&shape, transition, &log);

        let event = Dispatcher::default()
            .dispatch(&tree, raw(transition), Some(ids[shape.target]))
            .unwrap()
            .unwrap();

        prop_assert!(!event.is_handled());
        prop_assert_eq!(log.lock().len(), full_route(&shape).len());
        if shape.target != 0 {
            prop_assert_eq!(event.phase(), EventPhase::Bubbling);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. The target’s handler runs once, at AtTarget only
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn target_runs_once_at_target(
        shape in shape_strategy(0),
        transition in transition_strategy(),
    ) {
        let log = Log::default();
        let (tree, ids) = build(&shape, transition, &log);

        Dispatcher::default()
            .dispatch(&tree, raw(transition), Some(ids[shape.target]))
            .unwrap();

        let target_calls: Vec<_> = log
            .lock()
            .iter()
            .filter(|(view, _)| *view == shape.target)
            .map(|(_, phase)| *phase)
            .collect();
        let expected = if shape.registrations[shape.target].bubble {
            vec![EventPhase::AtTarget]
        } else {
            Vec::new()
        };
        prop_assert_eq!(target_calls, expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Removed target: configuration error, no handlers
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn removed_target_fails_without_handlers(
        shape in shape_strategy(0),
        transition in transition_strategy(),
    ) {
        prop_assume!(shape.target != 0);

        let log = Log::default();
        let (mut tree, ids) = build(&shape, transition, &log);

        // remove some non-root ancestor of the target (possibly the target itself)
        let chain = chain(&shape);
        let removed = chain[1];
        tree.remove_view(ids[removed]).unwrap();

        let target = ids[shape.target];
        let err = Dispatcher::default()
            .dispatch(&tree, raw(transition), Some(target))
            .unwrap_err();

        match err {
            DispatchError::Configuration(ConfigurationError::NoSuchView(id)) => {
                prop_assert_eq!(id, target);
            }
            other => prop_assert!(false, "unexpected error: {:?}", other),
        }
        prop_assert!(log.lock().is_empty());
    }
}
