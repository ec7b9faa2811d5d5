#![forbid(unsafe_code)]

//! Property tests: random scroll sequences keep the window consistent.
//!
//! After every tick:
//! - the window lies inside the store and matches the materialized nodes
//! - an append keeps the top and grows the bottom by one batch, or to the end
//! - an insert keeps the bottom and grows the top by one batch, or to record 0
//! - a replace materializes `min(minimum_items, count)` records
//! - a repeated tick at the same position changes nothing (uniform heights)

use bufferlist::{
    BufferedList, ItemSource, ListConfig, ListHost, ScrollOutcome, VecStore, Window,
    WindowDecision,
};
use bufferlist_core::Px;
use bufferlist_harness::SimulatedHost;
use proptest::prelude::*;

const VIEWPORT: Px = 600;

fn template(index: usize, _: &u32) -> String {
    format!("<li>{index}</li>")
}

fn store(count: usize) -> VecStore<u32> {
    VecStore::new((0..count as u32).collect())
}

/// A tick either jumps to a fraction of the scrollable range or moves by a
/// delta from the current position.
#[derive(Debug, Clone, Copy)]
enum Tick {
    Jump(u16),
    Delta(i16),
}

fn tick_strategy() -> impl Strategy<Value = Tick> {
    prop_oneof![
        1 => any::<u16>().prop_map(Tick::Jump),
        4 => any::<i16>().prop_map(Tick::Delta),
    ]
}

fn target(host: &SimulatedHost, tick: Tick) -> Px {
    match tick {
        Tick::Jump(fraction) => host.max_scroll() * Px::from(fraction) / Px::from(u16::MAX),
        Tick::Delta(delta) => host.scroll_position() + Px::from(delta),
    }
}

fn check_window(
    list: &BufferedList<SimulatedHost>,
    count: usize,
) -> Result<Window, TestCaseError> {
    let window = list.window();
    prop_assert!(window.is_some(), "no window over {count} records");
    let window = window.unwrap_or_else(|| Window::new(0, 0));
    prop_assert!(window.bottom() < count);
    let expected: Vec<usize> = (window.top()..=window.bottom()).collect();
    prop_assert_eq!(list.host().materialized(), expected);
    let proxies = list.host().proxies();
    prop_assert!(proxies.top() >= 0 && proxies.bottom() >= 0);
    Ok(window)
}

fn check_transition(
    config: &ListConfig,
    count: usize,
    before: Window,
    after: Window,
    outcome: &ScrollOutcome,
) -> Result<(), TestCaseError> {
    let ScrollOutcome::Applied(decision) = outcome else {
        return Err(TestCaseError::fail("tick dropped on an idle list"));
    };
    match decision {
        WindowDecision::None => prop_assert_eq!(after, before),
        WindowDecision::Append(target) => {
            prop_assert_eq!(after, *target);
            prop_assert_eq!(after.top(), before.top());
            prop_assert_eq!(
                after.bottom() - before.bottom(),
                config.batch_size.min(count - 1 - before.bottom())
            );
            prop_assert!(after.bottom() > before.bottom());
        }
        WindowDecision::Insert(target) => {
            prop_assert_eq!(after, *target);
            prop_assert_eq!(after.bottom(), before.bottom());
            prop_assert_eq!(
                before.top() - after.top(),
                config.batch_size.min(before.top())
            );
            prop_assert!(after.top() < before.top());
        }
        WindowDecision::Replace(target) => {
            prop_assert_eq!(after, *target);
            prop_assert_eq!(after.len(), config.minimum_items.min(count));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn uniform_heights_keep_window_consistent(
        count in 1usize..400,
        ticks in proptest::collection::vec(tick_strategy(), 1..60),
    ) {
        let config = ListConfig::default();
        let records = store(count);
        let source = ItemSource::new(&records, &template);
        let mut list = BufferedList::new(config.clone(), SimulatedHost::new(VIEWPORT))
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        list.refresh(&source);
        check_window(&list, count)?;

        list.on_scroll_start();
        for tick in ticks {
            let before = check_window(&list, count)?;
            let y = target(list.host(), tick);
            list.host_mut().scroll_user_to(y);
            let outcome = list.on_scroll(&source);
            let after = check_window(&list, count)?;
            check_transition(&config, count, before, after, &outcome)?;

            // Items are exactly as tall as the estimate, so the top proxy
            // stands in for the records above the window without error.
            prop_assert_eq!(
                list.host().proxies().top(),
                after.top() as Px * config.max_item_height
            );

            let again = list.on_scroll(&source);
            prop_assert_eq!(again, ScrollOutcome::Applied(WindowDecision::None));
            prop_assert_eq!(list.window(), Some(after));
        }
    }

    #[test]
    fn variable_heights_keep_window_consistent(
        count in 1usize..400,
        spread in 1i64..150,
        ticks in proptest::collection::vec(tick_strategy(), 1..60),
    ) {
        let config = ListConfig::default();
        let records = store(count);
        let source = ItemSource::new(&records, &template);
        let host = SimulatedHost::new(VIEWPORT)
            .with_item_heights(move |index| 30 + (index as Px * 37) % spread);
        let mut list = BufferedList::new(config.clone(), host)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        list.refresh(&source);

        list.on_scroll_start();
        for tick in ticks {
            let before = check_window(&list, count)?;
            let y = target(list.host(), tick);
            list.host_mut().scroll_user_to(y);
            let outcome = list.on_scroll(&source);
            let after = check_window(&list, count)?;
            check_transition(&config, count, before, after, &outcome)?;
        }
    }
}
