//! Integration tests for the session registry and session actors.
//!
//! Most tests run with `start_paused = true`: Tokio's clock only advances
//! when every task is idle, so idle timeouts fire at exact, reproducible
//! moments.

use std::sync::Arc;
use std::time::Duration;

use parlor_board::BoardError;
use parlor_protocol::{
    Cell, GameStatus, ParticipantId, SessionId, Target, Variant,
};
use parlor_registry::{
    AbandonReason, Ledger, RegistryConfig, RegistryError, SessionNotice,
    SessionRegistry,
};
use parlor_session::MoveError;
use tokio::sync::mpsc;

// =========================================================================
// Test ledger
// =========================================================================

/// Forwards every credit into a channel the test can inspect.
struct RecordingLedger {
    credits: mpsc::UnboundedSender<(ParticipantId, i64)>,
}

impl Ledger for RecordingLedger {
    async fn credit(&self, participant: ParticipantId, amount: i64) {
        let _ = self.credits.send((participant, amount));
    }
}

// =========================================================================
// Helpers
// =========================================================================

const ALICE: ParticipantId = ParticipantId(1);
const BOB: ParticipantId = ParticipantId(2);

struct Harness {
    registry: Arc<SessionRegistry<RecordingLedger>>,
    credits: mpsc::UnboundedReceiver<(ParticipantId, i64)>,
    notices: mpsc::UnboundedReceiver<SessionNotice>,
}

fn harness() -> Harness {
    let (credit_tx, credits) = mpsc::unbounded_channel();
    let (notice_tx, notices) = mpsc::unbounded_channel();
    let registry = SessionRegistry::with_notices(
        RegistryConfig::default(),
        RecordingLedger { credits: credit_tx },
        notice_tx,
    );
    Harness {
        registry: Arc::new(registry),
        credits,
        notices,
    }
}

fn cell(row: usize, col: usize) -> Target {
    Target::Cell { row, col }
}

/// Drains every notice currently queued.
fn drain(rx: &mut mpsc::UnboundedReceiver<SessionNotice>) -> Vec<SessionNotice> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

// =========================================================================
// create()
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_create_self_challenge_returns_error_and_creates_nothing() {
    let h = harness();
    let result = h.registry.create(ALICE, ALICE, Variant::ConnectFour).await;
    assert_eq!(result, Err(RegistryError::SelfChallenge(ALICE)));
    assert_eq!(h.registry.live_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_create_returns_unique_ids() {
    let h = harness();
    let a = h.registry.create(ALICE, BOB, Variant::TicTacToe).await.unwrap();
    let b = h.registry.create(BOB, ALICE, Variant::TicTacToe).await.unwrap();
    assert_ne!(a, b);
    assert_eq!(h.registry.live_count().await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_open_duplicate_live_id_rejected() {
    let h = harness();
    let id = SessionId(77);
    h.registry.open(id, ALICE, BOB, Variant::TicTacToe).await.unwrap();
    assert_eq!(
        h.registry.open(id, BOB, ALICE, Variant::TicTacToe).await,
        Err(RegistryError::DuplicateSession(id))
    );
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_of_new_session_is_empty_board() {
    let h = harness();
    let id = h.registry.create(ALICE, BOB, Variant::ConnectFour).await.unwrap();
    let view = h.registry.snapshot(id).await.unwrap();
    assert_eq!(view.status, GameStatus::InProgress);
    assert_eq!(view.current_participant(), ALICE);
    assert_eq!(view.board.len(), 6);
    assert!(view.board.iter().flatten().all(|c| *c == Cell::Empty));
}

// =========================================================================
// dispatch()
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_dispatch_unknown_session_returns_error() {
    let h = harness();
    let result = h.registry.dispatch(SessionId(999), ALICE, Target::Column(0)).await;
    assert_eq!(result, Err(RegistryError::UnknownSession(SessionId(999))));
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_turn_violation_leaves_board_unchanged() {
    let h = harness();
    let id = h.registry.create(ALICE, BOB, Variant::TicTacToe).await.unwrap();
    let before = h.registry.snapshot(id).await.unwrap();

    let result = h.registry.dispatch(id, BOB, cell(1, 1)).await;

    assert_eq!(result, Err(RegistryError::Move(MoveError::NotYourTurn(BOB))));
    assert_eq!(h.registry.snapshot(id).await.unwrap(), before);
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_same_illegal_move_twice_same_error() {
    let h = harness();
    let id = h.registry.create(ALICE, BOB, Variant::TicTacToe).await.unwrap();
    h.registry.dispatch(id, ALICE, cell(0, 0)).await.unwrap();
    let before = h.registry.snapshot(id).await.unwrap();

    let expected = Err(RegistryError::Move(MoveError::IllegalMove(
        BoardError::CellOccupied(parlor_protocol::Position::new(0, 0)),
    )));
    for _ in 0..2 {
        assert_eq!(h.registry.dispatch(id, BOB, cell(0, 0)).await, expected);
        assert_eq!(h.registry.snapshot(id).await.unwrap(), before);
    }
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_connect_four_win_credits_winner_once_and_removes() {
    let mut h = harness();
    let id = h.registry.create(ALICE, BOB, Variant::ConnectFour).await.unwrap();

    for _ in 0..3 {
        h.registry.dispatch(id, ALICE, Target::Column(3)).await.unwrap();
        h.registry.dispatch(id, BOB, Target::Column(5)).await.unwrap();
    }
    let view = h.registry.dispatch(id, ALICE, Target::Column(3)).await.unwrap();

    assert_eq!(view.status, GameStatus::WonBy(ALICE));
    for row in 2..6 {
        assert_eq!(view.cell(row, 3), Some(Cell::PlayerOne));
    }
    assert!(!h.registry.contains(id).await);
    assert_eq!(
        h.registry.dispatch(id, BOB, Target::Column(0)).await,
        Err(RegistryError::UnknownSession(id))
    );

    let credit = tokio::time::timeout(Duration::from_secs(1), h.credits.recv())
        .await
        .expect("credit should arrive");
    assert_eq!(credit, Some((ALICE, 100)));
    let extra = tokio::time::timeout(Duration::from_secs(1), h.credits.recv()).await;
    assert!(extra.is_err(), "exactly one credit per win");
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_opponent_win_credits_opponent() {
    let mut h = harness();
    let id = h.registry.create(ALICE, BOB, Variant::TicTacToe).await.unwrap();
    let script = [
        (ALICE, cell(0, 0)),
        (BOB, cell(1, 0)),
        (ALICE, cell(0, 1)),
        (BOB, cell(1, 1)),
        (ALICE, cell(2, 2)),
        (BOB, cell(1, 2)),
    ];
    let mut last = None;
    for (actor, target) in script {
        last = Some(h.registry.dispatch(id, actor, target).await.unwrap());
    }

    assert_eq!(last.map(|v| v.status), Some(GameStatus::WonBy(BOB)));
    let credit = tokio::time::timeout(Duration::from_secs(1), h.credits.recv())
        .await
        .expect("credit should arrive");
    assert_eq!(credit, Some((BOB, 100)));
    let extra = tokio::time::timeout(Duration::from_secs(1), h.credits.recv()).await;
    assert!(extra.is_err(), "the challenger gets nothing");
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_draw_credits_nobody() {
    let mut h = harness();
    let id = h.registry.create(ALICE, BOB, Variant::TicTacToe).await.unwrap();
    let script = [
        (ALICE, cell(0, 0)),
        (BOB, cell(0, 1)),
        (ALICE, cell(0, 2)),
        (BOB, cell(1, 1)),
        (ALICE, cell(1, 0)),
        (BOB, cell(1, 2)),
        (ALICE, cell(2, 1)),
        (BOB, cell(2, 0)),
        (ALICE, cell(2, 2)),
    ];
    let mut last = None;
    for (actor, target) in script {
        last = Some(h.registry.dispatch(id, actor, target).await.unwrap());
    }

    assert_eq!(last.map(|v| v.status), Some(GameStatus::Drawn));
    assert!(!h.registry.contains(id).await);
    let credit = tokio::time::timeout(Duration::from_secs(1), h.credits.recv()).await;
    assert!(credit.is_err(), "draws credit nobody");
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_publishes_updated_then_finished() {
    let mut h = harness();
    let id = h.registry.create(ALICE, BOB, Variant::TicTacToe).await.unwrap();
    for (actor, target) in [
        (ALICE, cell(0, 0)),
        (BOB, cell(1, 0)),
        (ALICE, cell(0, 1)),
        (BOB, cell(1, 1)),
        (ALICE, cell(0, 2)),
    ] {
        h.registry.dispatch(id, actor, target).await.unwrap();
    }

    let notices = drain(&mut h.notices);
    assert_eq!(notices.len(), 5);
    assert!(notices[..4]
        .iter()
        .all(|n| matches!(n, SessionNotice::Updated { .. })));
    assert!(matches!(
        &notices[4],
        SessionNotice::Finished { session, view }
            if *session == id && view.status == GameStatus::WonBy(ALICE)
    ));
}

// =========================================================================
// Concurrency
// =========================================================================

#[tokio::test]
async fn test_concurrent_clicks_by_same_player_apply_once() {
    let h = harness();
    let id = h.registry.create(ALICE, BOB, Variant::TicTacToe).await.unwrap();

    let mut tasks = Vec::new();
    for col in 0..3 {
        for row in 0..3 {
            let registry = Arc::clone(&h.registry);
            tasks.push(tokio::spawn(async move {
                registry.dispatch(id, ALICE, cell(row, col)).await
            }));
        }
    }

    let mut accepted = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(e) => assert_eq!(e, RegistryError::Move(MoveError::NotYourTurn(ALICE))),
        }
    }

    assert_eq!(accepted, 1, "exactly one racing move may win");
    let view = h.registry.snapshot(id).await.unwrap();
    assert_eq!(view.moves, 1);
    assert_eq!(view.current_participant(), BOB);
}

#[tokio::test]
async fn test_concurrent_moves_by_both_players_never_double_a_turn() {
    let h = harness();
    let id = h.registry.create(ALICE, BOB, Variant::ConnectFour).await.unwrap();

    let a = {
        let registry = Arc::clone(&h.registry);
        tokio::spawn(async move { registry.dispatch(id, ALICE, Target::Column(0)).await })
    };
    let b = {
        let registry = Arc::clone(&h.registry);
        tokio::spawn(async move { registry.dispatch(id, BOB, Target::Column(1)).await })
    };
    let (a, b) = (a.await.unwrap(), b.await.unwrap());

    // Alice always gets her move. Bob either went second (accepted) or
    // arrived first (rejected); his piece is never placed out of turn.
    assert!(a.is_ok());
    let view = h.registry.snapshot(id).await.unwrap();
    match b {
        Ok(_) => {
            assert_eq!(view.moves, 2);
            assert_eq!(view.cell(5, 1), Some(Cell::PlayerTwo));
        }
        Err(e) => {
            assert_eq!(e, RegistryError::Move(MoveError::NotYourTurn(BOB)));
            assert_eq!(view.moves, 1);
            assert_eq!(view.cell(5, 1), Some(Cell::Empty));
        }
    }
    assert_eq!(view.cell(5, 0), Some(Cell::PlayerOne));
}

// =========================================================================
// Inactivity timeout
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_idle_session_is_abandoned_and_removed() {
    let mut h = harness();
    let id = h.registry.create(ALICE, BOB, Variant::ConnectFour).await.unwrap();

    tokio::time::sleep(Duration::from_secs(61)).await;

    assert!(!h.registry.contains(id).await);
    assert_eq!(h.registry.live_count().await, 0);
    assert_eq!(
        h.registry.dispatch(id, ALICE, Target::Column(0)).await,
        Err(RegistryError::UnknownSession(id))
    );

    let notices = drain(&mut h.notices);
    assert_eq!(notices.len(), 1);
    match &notices[0] {
        SessionNotice::Abandoned { session, view, reason } => {
            assert_eq!(*session, id);
            assert_eq!(*reason, AbandonReason::IdleTimeout);
            assert_eq!(view.status, GameStatus::Abandoned);
            assert!(view.board.iter().flatten().all(|c| *c == Cell::Empty));
        }
        other => panic!("expected Abandoned, got {other:?}"),
    }
    assert!(h.credits.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_idle_timeout_keeps_board_contents() {
    let mut h = harness();
    let id = h.registry.create(ALICE, BOB, Variant::TicTacToe).await.unwrap();
    h.registry.dispatch(id, ALICE, cell(1, 1)).await.unwrap();

    tokio::time::sleep(Duration::from_secs(61)).await;

    let abandoned = drain(&mut h.notices)
        .into_iter()
        .find(|n| matches!(n, SessionNotice::Abandoned { .. }))
        .expect("abandon notice");
    assert_eq!(abandoned.view().cell(1, 1), Some(Cell::PlayerOne));
    assert_eq!(abandoned.view().moves, 1);
}

#[tokio::test(start_paused = true)]
async fn test_accepted_move_restarts_idle_timer() {
    let h = harness();
    let id = h.registry.create(ALICE, BOB, Variant::TicTacToe).await.unwrap();

    tokio::time::sleep(Duration::from_secs(50)).await;
    h.registry.dispatch(id, ALICE, cell(0, 0)).await.unwrap();
    tokio::time::sleep(Duration::from_secs(50)).await;
    assert!(h.registry.contains(id).await, "move at 50s pushed deadline to 110s");

    tokio::time::sleep(Duration::from_secs(11)).await;
    assert!(!h.registry.contains(id).await);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_move_does_not_restart_idle_timer() {
    let h = harness();
    let id = h.registry.create(ALICE, BOB, Variant::TicTacToe).await.unwrap();

    tokio::time::sleep(Duration::from_secs(50)).await;
    let _ = h.registry.dispatch(id, BOB, cell(0, 0)).await;
    tokio::time::sleep(Duration::from_secs(11)).await;

    assert!(!h.registry.contains(id).await);
}

#[tokio::test(start_paused = true)]
async fn test_finished_session_never_times_out() {
    let mut h = harness();
    let id = h.registry.create(ALICE, BOB, Variant::TicTacToe).await.unwrap();
    tokio::time::sleep(Duration::from_secs(40)).await;
    for (actor, target) in [
        (ALICE, cell(0, 0)),
        (BOB, cell(1, 0)),
        (ALICE, cell(0, 1)),
        (BOB, cell(1, 1)),
        (ALICE, cell(0, 2)),
    ] {
        h.registry.dispatch(id, actor, target).await.unwrap();
    }

    tokio::time::sleep(Duration::from_secs(300)).await;

    let notices = drain(&mut h.notices);
    assert!(notices
        .iter()
        .all(|n| !matches!(n, SessionNotice::Abandoned { .. })));
    assert!(matches!(notices.last(), Some(SessionNotice::Finished { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_custom_idle_timeout_respected() {
    let (credit_tx, _credits) = mpsc::unbounded_channel();
    let registry = SessionRegistry::new(
        RegistryConfig {
            idle_timeout: Duration::from_secs(5),
            ..RegistryConfig::default()
        },
        RecordingLedger { credits: credit_tx },
    );
    let id = registry.create(ALICE, BOB, Variant::TicTacToe).await.unwrap();

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert!(registry.contains(id).await);
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(!registry.contains(id).await);
}

#[tokio::test(start_paused = true)]
async fn test_unrepresentable_idle_timeout_never_expires() {
    let (credit_tx, _credits) = mpsc::unbounded_channel();
    let registry = SessionRegistry::new(
        RegistryConfig {
            idle_timeout: Duration::MAX,
            ..RegistryConfig::default()
        },
        RecordingLedger { credits: credit_tx },
    );

    let id = registry.create(ALICE, BOB, Variant::TicTacToe).await.unwrap();
    registry.dispatch(id, ALICE, cell(0, 0)).await.unwrap();
    tokio::time::sleep(Duration::from_secs(365 * 86_400)).await;

    assert!(registry.contains(id).await);
    assert_eq!(registry.snapshot(id).await.unwrap().moves, 1);
}

#[tokio::test(start_paused = true)]
async fn test_session_ids_agree_with_contains_and_live_count() {
    let h = harness();
    let a = h.registry.create(ALICE, BOB, Variant::TicTacToe).await.unwrap();
    tokio::time::sleep(Duration::from_secs(30)).await;
    let b = h.registry.create(BOB, ALICE, Variant::TicTacToe).await.unwrap();

    let mut ids = h.registry.session_ids().await;
    ids.sort_by_key(|s| s.0);
    let mut expected = vec![a, b];
    expected.sort_by_key(|s| s.0);
    assert_eq!(ids, expected);

    // `a` times out at 60s, `b` is still live.
    tokio::time::sleep(Duration::from_secs(31)).await;
    assert_eq!(h.registry.session_ids().await, vec![b]);
    assert_eq!(h.registry.live_count().await, 1);
    assert!(!h.registry.contains(a).await);
}

// =========================================================================
// shutdown_all()
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_shutdown_all_abandons_every_session() {
    let mut h = harness();
    let a = h.registry.create(ALICE, BOB, Variant::TicTacToe).await.unwrap();
    let b = h.registry.create(BOB, ALICE, Variant::ConnectFour).await.unwrap();

    h.registry.shutdown_all().await;

    assert_eq!(h.registry.live_count().await, 0);
    let mut abandoned: Vec<SessionId> = drain(&mut h.notices)
        .into_iter()
        .filter(|n| {
            matches!(
                n,
                SessionNotice::Abandoned { reason: AbandonReason::Shutdown, .. }
            )
        })
        .map(|n| n.session())
        .collect();
    abandoned.sort_by_key(|s| s.0);
    let mut expected = vec![a, b];
    expected.sort_by_key(|s| s.0);
    assert_eq!(abandoned, expected);
}
