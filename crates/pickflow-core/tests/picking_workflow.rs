//! End-to-end picking scenarios across cursor, scan handler, gate and filter.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use pickflow_core::{
    Advance, BinLocation, CursorPosition, DeliveryFilter, GatePhase, GateTransition, Order,
    OrderItem, PickingEvents, PickingSession, Progress, ScanOutcome, SessionOptions,
    SessionOutcome, StorageTrigger,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn order(id: &str, delivery: NaiveDate, quantities: &[u32]) -> Order {
    let mut order = Order::new(id, "C-1", "Acme", delivery)
        .with_bin(BinLocation::new(format!("{id}-main"), format!("{id}-MAIN"), "Shelf 1"))
        .with_bin(BinLocation::new(format!("{id}-spare"), format!("{id}-SPARE"), "Shelf 9"));
    for (n, qty) in quantities.iter().enumerate() {
        order = order.with_item(
            OrderItem::new(format!("{id}-{n}"), format!("ART-{n}"), *qty)
                .with_bins([format!("{id}-main"), format!("{id}-spare")]),
        );
    }
    order
}

#[derive(Clone, Default)]
struct Events {
    log: Arc<Mutex<Vec<String>>>,
}

impl Events {
    fn entries(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl PickingEvents for Events {
    fn on_phase_change(&self, phase: GatePhase) {
        self.log.lock().unwrap().push(format!("phase:{phase}"));
    }
    fn on_complete(&self, storage_slot: &str, _progress: &Progress) {
        self.log.lock().unwrap().push(format!("complete:{storage_slot}"));
    }
    fn on_interrupt(&self, _progress: &Progress) {
        self.log.lock().unwrap().push("interrupt".into());
    }
    fn on_close(&self) {
        self.log.lock().unwrap().push("close".into());
    }
}

fn start(orders: Vec<Order>, today: NaiveDate) -> (PickingSession, Events) {
    let events = Events::default();
    let session = PickingSession::new(
        orders,
        SessionOptions::new(today),
        Box::new(events.clone()),
    )
    .unwrap();
    (session, events)
}

/// Scans the expected bin of the current item; fires the auto-advance when
/// the item completes.
fn scan_ok(session: &mut PickingSession) -> ScanOutcome {
    let code = session.cursor().current_bin().unwrap().code.clone();
    let outcome = session.submit_scan(&code).unwrap();
    if let ScanOutcome::ItemComplete { auto_advance, .. } = &outcome {
        session.fire_auto_advance(auto_advance.token).unwrap();
    }
    outcome
}

#[test]
fn two_orders_scanned_to_completion() {
    let (mut session, events) = start(
        vec![order("A", day(2), &[1, 2]), order("B", day(2), &[1])],
        day(10),
    );

    // Item 1 of A (quantity 1): the first scan completes it, repeats are capped.
    let code = session.cursor().current_bin().unwrap().code.clone();
    let first = session.submit_scan(&code).unwrap();
    assert_eq!(session.submit_scan(&code).unwrap(), ScanOutcome::AlreadyComplete);
    assert_eq!(session.submit_scan(&code).unwrap(), ScanOutcome::AlreadyComplete);
    assert_eq!(session.cursor().picked_quantity(), 1);

    let ScanOutcome::ItemComplete { auto_advance, .. } = first else {
        panic!("first scan should complete a quantity-1 item");
    };
    assert_eq!(
        session.fire_auto_advance(auto_advance.token).unwrap(),
        Advance::NextItem
    );
    assert_eq!(session.cursor().current_item().unwrap().id.as_str(), "A-1");

    // Item 2 of A (quantity 2).
    assert!(matches!(
        scan_ok(&mut session),
        ScanOutcome::Picked { picked: 1, total: 2, .. }
    ));
    assert!(matches!(scan_ok(&mut session), ScanOutcome::ItemComplete { .. }));
    assert_eq!(session.cursor().current_order().unwrap().id.as_str(), "B");

    // B's only item finishes the run.
    assert!(matches!(scan_ok(&mut session), ScanOutcome::ItemComplete { .. }));
    assert_eq!(
        session.phase(),
        GatePhase::AwaitingStorage(StorageTrigger::PickingFinished)
    );
    assert!(events.entries().iter().all(|e| !e.starts_with("complete")));

    assert_eq!(
        session.confirm_storage("WA-12").unwrap(),
        GateTransition::Completed
    );
    let Some(SessionOutcome::Completed { storage_slot, progress }) = session.outcome() else {
        panic!("session should be complete");
    };
    assert_eq!(storage_slot, "WA-12");
    assert_eq!(progress.items_done, 3);
    assert_eq!(progress.quantity_picked, 4);

    let completions: Vec<_> = events
        .entries()
        .into_iter()
        .filter(|e| e.starts_with("complete"))
        .collect();
    assert_eq!(completions, vec!["complete:WA-12".to_string()]);
}

#[test]
fn advance_reaches_completion_after_exactly_all_items() {
    let orders = vec![
        order("A", day(2), &[1, 1, 1]),
        order("B", day(3), &[2]),
        order("C", day(4), &[1, 5]),
    ];
    let total_items: usize = orders.iter().map(|o| o.items.len()).sum();
    let (mut session, _) = start(orders, day(10));

    for step in 1..total_items {
        let result = session.advance().unwrap();
        assert_ne!(result, Advance::Exhausted, "exhausted early at step {step}");
        assert_eq!(session.phase(), GatePhase::Picking);

        let position = session.cursor().position();
        let orders = session.cursor().orders();
        assert!(position.order_index < orders.len());
        assert!(position.item_index < orders[position.order_index].items.len());
    }

    assert_eq!(session.advance().unwrap(), Advance::Exhausted);
    assert_eq!(
        session.phase(),
        GatePhase::AwaitingStorage(StorageTrigger::PickingFinished)
    );
}

#[test]
fn retreat_at_start_is_idempotent() {
    let (mut session, _) = start(vec![order("A", day(2), &[1, 1])], day(10));

    for _ in 0..3 {
        assert!(!session.retreat().unwrap());
        assert_eq!(session.cursor().position(), CursorPosition::default());
    }
}

#[test]
fn mismatched_codes_never_change_the_count() {
    let (mut session, _) = start(vec![order("A", day(2), &[3])], day(10));
    scan_ok(&mut session);

    for wrong in ["A-SPARE", "B-MAIN", "a-main", "X"] {
        let outcome = session.submit_scan(wrong).unwrap();
        assert!(matches!(outcome, ScanOutcome::Mismatch { .. }));
        assert_eq!(session.cursor().picked_quantity(), 1);
    }
}

#[test]
fn switched_bin_changes_the_expected_code() {
    let (mut session, _) = start(vec![order("A", day(2), &[2])], day(10));

    assert!(session.switch_bin().unwrap());
    assert!(matches!(
        session.submit_scan("A-MAIN").unwrap(),
        ScanOutcome::Mismatch { .. }
    ));
    assert!(matches!(
        session.submit_scan("A-SPARE").unwrap(),
        ScanOutcome::Picked { picked: 1, .. }
    ));
}

#[test]
fn switch_bin_with_single_candidate_is_noop() {
    let single = Order::new("S", "C-1", "Acme", day(2))
        .with_bin(BinLocation::new("only", "ONLY-1", ""))
        .with_item(OrderItem::new("s-0", "ART", 1).with_bins(["only"]));
    let (mut session, _) = start(vec![single], day(10));

    assert!(!session.switch_bin().unwrap());
    assert_eq!(session.cursor().position().bin_index, 0);
}

#[test]
fn filter_change_mid_pick_resets_cursor_and_asks_for_storage() {
    let orders = vec![
        order("A", day(2), &[2, 1]),
        order("B", day(5), &[1]),
        order("C", day(12), &[1, 1]),
    ];
    let (mut session, events) = start(orders, day(10));

    session.set_filter(DeliveryFilter::Past, day(10)).unwrap();
    session.confirm_storage("WA-01").unwrap();
    assert_eq!(session.cursor().orders().len(), 2);

    // Mid-pick on order A.
    scan_ok(&mut session);
    session.advance().unwrap();
    assert_eq!(session.cursor().position().item_index, 1);

    assert!(session
        .set_filter(DeliveryFilter::On(day(12)), day(10))
        .unwrap());
    assert_eq!(session.cursor().position(), CursorPosition::default());
    assert_eq!(session.cursor().current_order().unwrap().id.as_str(), "C");
    assert_eq!(
        session.phase(),
        GatePhase::AwaitingStorage(StorageTrigger::FilterChanged)
    );
    assert!(session.submit_scan("C-MAIN").is_err());

    assert_eq!(
        session.confirm_storage("WA-02").unwrap(),
        GateTransition::Resumed
    );
    assert!(matches!(
        scan_ok(&mut session),
        ScanOutcome::ItemComplete { .. }
    ));
    assert!(!session.is_ended());
    assert!(events
        .entries()
        .iter()
        .all(|e| !e.starts_with("complete") && e != "interrupt"));
}

#[test]
fn interrupt_reports_partial_progress() {
    let (mut session, events) = start(vec![order("A", day(2), &[1, 4])], day(10));
    scan_ok(&mut session);
    scan_ok(&mut session);

    let SessionOutcome::Interrupted { progress } = session.interrupt().unwrap() else {
        panic!("expected an interrupted outcome");
    };
    assert_eq!(progress.items_done, 1);
    assert_eq!(progress.quantity_picked, 2);
    assert_eq!(events.entries().last().map(String::as_str), Some("interrupt"));
}

#[test]
fn snapshot_serializes_for_the_front_end() {
    let (session, _) = start(vec![order("A", day(2), &[1])], day(10));
    let json = serde_json::to_value(session.snapshot()).unwrap();

    assert_eq!(json["phase"]["phase"], "picking");
    assert_eq!(json["filter"], "all");
    assert_eq!(json["bin"]["code"], "A-MAIN");
    assert_eq!(json["position"]["pickedQuantity"], 0);
    assert_eq!(json["deliveryDates"][0], "2026-03-02");
}
