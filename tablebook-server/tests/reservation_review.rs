//! Reservation board against recording fakes

mod common;

use std::sync::Arc;

use common::{Call, FakeReservations, FakeUsers, call_log, reservation};
use shared::models::{Decision, ReservationStatus};
use tablebook_server::reservations::{ReservationBoard, ReviewError};

fn board(store: Arc<FakeReservations>, samples: bool) -> ReservationBoard {
    let users = FakeUsers::with(&[("diner-1", "Dana Diner"), ("diner-2", "Sam Guest")]);
    ReservationBoard::new(store, Arc::new(users), samples)
}

#[tokio::test]
async fn no_records_shows_empty_state() {
    let store = Arc::new(FakeReservations::new(call_log(), vec![]));
    let board = board(store, false);

    let snapshot = board.load(true).await.unwrap();
    assert!(snapshot.empty);
    assert!(!snapshot.samples);
    assert!(snapshot.reservations.is_empty());
}

#[tokio::test]
async fn samples_only_when_configured() {
    let store = Arc::new(FakeReservations::new(call_log(), vec![]));
    let board = board(store, true);

    let snapshot = board.load(true).await.unwrap();
    assert!(snapshot.samples);
    assert!(!snapshot.empty);
    assert!(snapshot.reservations.iter().all(|r| r.id().starts_with("sample-")));
}

#[tokio::test]
async fn names_are_resolved_per_user() {
    let store = Arc::new(FakeReservations::new(
        call_log(),
        vec![
            reservation("a", "diner-1", ReservationStatus::Pending),
            reservation("b", "diner-2", ReservationStatus::Accepted),
            reservation("c", "diner-1", ReservationStatus::Pending),
        ],
    ));
    let board = board(store, false);

    let with_names = board.load(true).await.unwrap();
    let names: Vec<_> = with_names
        .reservations
        .iter()
        .map(|r| r.display_name.as_deref())
        .collect();
    assert_eq!(names, [Some("Dana Diner"), Some("Sam Guest"), Some("Dana Diner")]);

    let without = board.load(false).await.unwrap();
    assert!(without.reservations.iter().all(|r| r.display_name.is_none()));
}

#[tokio::test]
async fn accept_round_trip_changes_only_status() {
    let original = reservation("a", "diner-1", ReservationStatus::Pending);
    let log = call_log();
    let store = Arc::new(FakeReservations::new(log.clone(), vec![original.clone()]));
    let board = board(store.clone(), false);
    board.load(true).await.unwrap();

    let outcome = board.transition("a", Decision::Accept).await.unwrap();
    assert!(outcome.applied);
    assert_eq!(outcome.status, ReservationStatus::Accepted);

    let stored = store.rows.lock()[0].clone();
    let mut expected = original;
    expected.details.status = ReservationStatus::Accepted;
    assert_eq!(stored, expected);

    assert_eq!(
        *log.lock(),
        [Call::UpdateStatus("a".to_string(), ReservationStatus::Accepted)]
    );
}

#[tokio::test]
async fn concurrent_transitions_on_different_rows_are_independent() {
    let (store, gate) = FakeReservations::gated(
        call_log(),
        vec![
            reservation("a", "diner-1", ReservationStatus::Pending),
            reservation("b", "diner-2", ReservationStatus::Pending),
        ],
    );
    let store = Arc::new(store);
    let board = board(store.clone(), false);
    board.load(false).await.unwrap();

    let release = async {
        store.wait_started(2).await;
        let snapshot = board.snapshot();
        assert!(snapshot.reservations.iter().all(|r| r.updating));
        gate.add_permits(2);
    };
    let (accepted, rejected, ()) = tokio::join!(
        board.transition("a", Decision::Accept),
        board.transition("b", Decision::Reject),
        release,
    );

    assert!(accepted.unwrap().applied);
    assert!(rejected.unwrap().applied);
    assert_eq!(store.status_of("a"), Some(ReservationStatus::Accepted));
    assert_eq!(store.status_of("b"), Some(ReservationStatus::Rejected));

    let snapshot = board.snapshot();
    assert_eq!(snapshot.reservations[0].status(), ReservationStatus::Accepted);
    assert_eq!(snapshot.reservations[1].status(), ReservationStatus::Rejected);
    assert!(snapshot.reservations.iter().all(|r| !r.updating));
}

#[tokio::test]
async fn transition_resolving_after_close_does_not_patch() {
    let (store, gate) = FakeReservations::gated(
        call_log(),
        vec![reservation("a", "diner-1", ReservationStatus::Pending)],
    );
    let store = Arc::new(store);
    let board = board(store.clone(), false);
    board.load(false).await.unwrap();

    let close = async {
        store.wait_started(1).await;
        board.close();
        gate.add_permits(1);
    };
    let (outcome, ()) = tokio::join!(board.transition("a", Decision::Accept), close);

    let outcome = outcome.unwrap();
    assert!(!outcome.applied);
    assert!(board.snapshot().empty);
    assert!(!board.is_loaded());
    // the remote write itself still happened
    assert_eq!(store.status_of("a"), Some(ReservationStatus::Accepted));
}

#[tokio::test]
async fn second_decision_while_in_flight_is_busy() {
    let (store, gate) = FakeReservations::gated(
        call_log(),
        vec![reservation("a", "diner-1", ReservationStatus::Pending)],
    );
    let store = Arc::new(store);
    let board = board(store.clone(), false);
    board.load(false).await.unwrap();

    let contender = async {
        store.wait_started(1).await;
        let result = board.transition("a", Decision::Reject).await;
        gate.add_permits(1);
        result
    };
    let (first, second) = tokio::join!(board.transition("a", Decision::Accept), contender);

    assert!(first.unwrap().applied);
    assert!(matches!(second, Err(ReviewError::Busy(_))));
    assert_eq!(store.status_of("a"), Some(ReservationStatus::Accepted));
}

#[tokio::test]
async fn reload_during_transition_keeps_decision_final() {
    let (store, gate) = FakeReservations::gated(
        call_log(),
        vec![reservation("a", "diner-1", ReservationStatus::Pending)],
    );
    let store = Arc::new(store);
    let board = board(store.clone(), false);
    board.load(false).await.unwrap();

    let reload = async {
        store.wait_started(1).await;
        let reloaded = board.load(false).await.unwrap();
        assert_eq!(reloaded.reservations[0].status(), ReservationStatus::Pending);
        assert!(reloaded.reservations[0].updating);
        gate.add_permits(1);
    };
    let (outcome, ()) = tokio::join!(board.transition("a", Decision::Accept), reload);

    let outcome = outcome.unwrap();
    assert!(outcome.applied);
    assert_eq!(board.snapshot().reservations[0].status(), ReservationStatus::Accepted);

    let err = board.transition("a", Decision::Reject).await.unwrap_err();
    assert!(matches!(
        err,
        ReviewError::NotPending { status: ReservationStatus::Accepted, .. }
    ));
    assert_eq!(store.status_of("a"), Some(ReservationStatus::Accepted));
}

#[tokio::test]
async fn reload_that_read_before_the_write_does_not_revert_it() {
    let (store, gate, list_gate) = FakeReservations::gated_reads(
        call_log(),
        vec![reservation("a", "diner-1", ReservationStatus::Pending)],
    );
    let store = Arc::new(store);
    let board = board(store.clone(), false);
    list_gate.add_permits(1);
    board.load(false).await.unwrap();
    store.wait_listed(1).await;

    // The reload reads `pending`, the write lands, then the reload installs
    let reload = async {
        store.wait_started(1).await;
        let install = board.load(false);
        let land_write = async {
            store.wait_listed(1).await;
            gate.add_permits(1);
            while store.status_of("a") != Some(ReservationStatus::Accepted) {
                tokio::task::yield_now().await;
            }
            list_gate.add_permits(1);
        };
        let (snapshot, ()) = tokio::join!(install, land_write);
        snapshot.unwrap()
    };
    let (outcome, reloaded) = tokio::join!(board.transition("a", Decision::Accept), reload);

    assert!(outcome.unwrap().applied);
    assert_eq!(reloaded.reservations[0].status(), ReservationStatus::Accepted);
    assert_eq!(board.snapshot().reservations[0].status(), ReservationStatus::Accepted);
    assert!(matches!(
        board.transition("a", Decision::Reject).await,
        Err(ReviewError::NotPending { .. })
    ));
    assert_eq!(store.status_of("a"), Some(ReservationStatus::Accepted));
}

#[tokio::test]
async fn terminal_reservations_cannot_transition() {
    let log = call_log();
    let store = Arc::new(FakeReservations::new(
        log.clone(),
        vec![reservation("a", "diner-1", ReservationStatus::Rejected)],
    ));
    let board = board(store, false);
    board.load(false).await.unwrap();

    let err = board.transition("a", Decision::Accept).await.unwrap_err();
    assert!(matches!(
        err,
        ReviewError::NotPending { status: ReservationStatus::Rejected, .. }
    ));
    assert!(log.lock().is_empty());
}

#[tokio::test]
async fn failed_write_leaves_board_untouched() {
    let mut store = FakeReservations::new(
        call_log(),
        vec![reservation("a", "diner-1", ReservationStatus::Pending)],
    );
    store.fail_updates = true;
    let store = Arc::new(store);
    let board = board(store.clone(), false);
    let before = board.load(true).await.unwrap();

    let err = board.transition("a", Decision::Accept).await.unwrap_err();
    assert!(matches!(err, ReviewError::Update { .. }));
    assert_eq!(
        err.to_string(),
        "Failed to update reservation. Please try again."
    );

    let after = board.snapshot();
    assert_eq!(after.reservations, before.reservations);
    assert_eq!(store.status_of("a"), Some(ReservationStatus::Pending));
}
