//! Command loop driven through an in-memory pipe with a paused clock.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use pickflow_cli::commands::Clock;
use pickflow_cli::config::PickflowConfig;
use pickflow_cli::{drive, open_station};
use pickflow_core::{BinLocation, Order, OrderItem, SessionOutcome};
use pickflow_store::Preferences;
use serde_json::Value;
use tokio::io::{AsyncWriteExt, BufReader, DuplexStream};
use tokio::task::JoinHandle;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

fn two_item_order() -> Vec<Order> {
    vec![Order::new("A", "C-1", "Acme", NaiveDate::from_ymd_opt(2026, 3, 2).unwrap())
        .with_bin(BinLocation::new("a1", "A-01", "Aisle 1"))
        .with_item(OrderItem::new("a-0", "ART-1", 1).with_bins(["a1"]))
        .with_item(OrderItem::new("a-1", "ART-2", 1).with_bins(["a1"]))]
}

fn one_item_order() -> Vec<Order> {
    vec![Order::new("S", "C-9", "Solo", today())
        .with_bin(BinLocation::new("s1", "S-01", "Aisle 9"))
        .with_item(OrderItem::new("s-0", "ART-9", 1).with_bins(["s1"]))]
}

type Driver = JoinHandle<(Option<SessionOutcome>, Vec<Value>)>;

/// Starts the station on a pipe. Returns the writing end and the loop task.
fn start(orders: Vec<Order>, data_dir: &std::path::Path) -> (DuplexStream, Driver) {
    start_with_clock(orders, data_dir, Arc::new(today))
}

fn start_with_clock(
    orders: Vec<Order>,
    data_dir: &std::path::Path,
    clock: Clock,
) -> (DuplexStream, Driver) {
    let (station, mut outbox) = open_station(
        orders,
        &PickflowConfig::default(),
        Preferences::open(data_dir),
        clock,
    )
    .unwrap();

    let (client, server) = tokio::io::duplex(4096);
    let driver = tokio::spawn(async move {
        let mut output = Vec::new();
        let outcome = drive(&station, &mut outbox, BufReader::new(server), &mut output)
            .await
            .unwrap();
        let lines = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        (outcome, lines)
    });

    (client, driver)
}

fn types(lines: &[Value]) -> Vec<&str> {
    lines.iter().map(|l| l["type"].as_str().unwrap()).collect()
}

#[tokio::test(start_paused = true)]
async fn completed_item_advances_after_the_delay() {
    let dir = tempfile::tempdir().unwrap();
    let (mut client, driver) = start(two_item_order(), dir.path());

    client.write_all(b"scan A-01\n").await.unwrap();
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    client.write_all(b"status\n").await.unwrap();
    drop(client);

    let (outcome, lines) = driver.await.unwrap();
    assert_eq!(
        types(&lines),
        ["snapshot", "scan", "advanced", "snapshot", "ended"]
    );
    assert_eq!(lines[1]["outcome"]["kind"], "item_complete");
    assert_eq!(lines[2]["automatic"], true);
    assert_eq!(lines[2]["advance"], "next_item");
    assert_eq!(lines[3]["snapshot"]["item"]["id"], "a-1");
    assert_eq!(outcome, Some(SessionOutcome::Closed));
}

#[tokio::test(start_paused = true)]
async fn manual_move_cancels_pending_auto_advance() {
    let dir = tempfile::tempdir().unwrap();
    let (mut client, driver) = start(two_item_order(), dir.path());

    client.write_all(b"scan A-01\nnext\n").await.unwrap();
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    client.write_all(b"status\n").await.unwrap();
    drop(client);

    let (_, lines) = driver.await.unwrap();
    assert_eq!(
        types(&lines),
        ["snapshot", "scan", "advanced", "snapshot", "ended"]
    );
    assert_eq!(lines[2]["automatic"], false);
    // Still on the second item: the timer did not move the cursor again.
    assert_eq!(lines[3]["snapshot"]["item"]["id"], "a-1");
}

#[tokio::test(start_paused = true)]
async fn last_item_requires_storage_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let (mut client, driver) = start(one_item_order(), dir.path());

    client.write_all(b"scan S-01\n").await.unwrap();
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    client
        .write_all(b"scan S-01\nconfirm WA-12\n")
        .await
        .unwrap();

    let (outcome, lines) = driver.await.unwrap();
    assert_eq!(
        types(&lines),
        ["snapshot", "scan", "advanced", "error", "storage"]
    );
    assert_eq!(lines[2]["advance"], "exhausted");
    assert_eq!(lines[2]["snapshot"]["phase"]["phase"], "awaiting_storage");
    assert_eq!(lines[3]["code"], "INVALID_PHASE");
    assert_eq!(lines[4]["transition"], "completed");

    let Some(SessionOutcome::Completed { storage_slot, progress }) = outcome else {
        panic!("expected a completed session");
    };
    assert_eq!(storage_slot, "WA-12");
    assert_eq!(progress.items_done, 1);
}

#[tokio::test]
async fn bad_lines_are_answered_with_errors() {
    let dir = tempfile::tempdir().unwrap();
    let (mut client, driver) = start(two_item_order(), dir.path());

    client
        .write_all(b"jump\nfilter someday\nscan Z-99\nabort\n")
        .await
        .unwrap();

    let (outcome, lines) = driver.await.unwrap();
    assert_eq!(
        types(&lines),
        ["snapshot", "error", "error", "scan", "ended"]
    );
    assert_eq!(lines[1]["code"], "UNKNOWN_COMMAND");
    assert_eq!(lines[2]["code"], "VALIDATION_ERROR");
    assert_eq!(lines[3]["outcome"]["kind"], "mismatch");
    assert!(matches!(outcome, Some(SessionOutcome::Interrupted { .. })));
}

#[tokio::test]
async fn favorites_are_written_to_the_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let (mut client, driver) = start(two_item_order(), dir.path());

    client.write_all(b"fav\nfavs\nquit\n").await.unwrap();

    let (_, lines) = driver.await.unwrap();
    assert_eq!(
        types(&lines),
        ["snapshot", "favorite", "favorites", "ended"]
    );
    assert_eq!(lines[1]["key"], "ART-1");
    assert_eq!(lines[2]["keys"][0], "ART-1");
    assert!(dir.path().join("favorites.json").exists());
}

#[tokio::test(start_paused = true)]
async fn past_filter_follows_the_calendar() {
    let dir = tempfile::tempdir().unwrap();
    let day = Arc::new(AtomicU32::new(10));
    let clock: Clock = {
        let day = day.clone();
        Arc::new(move || NaiveDate::from_ymd_opt(2026, 3, day.load(Ordering::SeqCst)).unwrap())
    };
    let orders = vec![
        Order::new("A", "C-1", "Acme", NaiveDate::from_ymd_opt(2026, 3, 9).unwrap())
            .with_bin(BinLocation::new("a1", "A-01", "Aisle 1"))
            .with_item(OrderItem::new("a-0", "ART-1", 1).with_bins(["a1"])),
        Order::new("B", "C-2", "Bolt", today())
            .with_bin(BinLocation::new("b1", "B-01", "Aisle 5"))
            .with_item(OrderItem::new("b-0", "ART-2", 1).with_bins(["b1"])),
    ];
    let (mut client, driver) = start_with_clock(orders, dir.path(), clock);

    client.write_all(b"filter past
confirm WA-01
").await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    day.store(11, Ordering::SeqCst);
    client.write_all(b"filter past
").await.unwrap();
    drop(client);

    let (_, lines) = driver.await.unwrap();
    assert_eq!(
        types(&lines),
        ["snapshot", "snapshot", "storage", "snapshot", "ended"]
    );
    assert_eq!(lines[1]["snapshot"]["progress"]["ordersTotal"], 1);
    assert_eq!(lines[3]["snapshot"]["progress"]["ordersTotal"], 2);
    assert_eq!(lines[3]["snapshot"]["phase"]["trigger"], "filter_changed");
}
