//! Integration tests for complete duels.
//!
//! These tests drive the engine end to end:
//! 1. A start command registers a duel and challenges both participants
//! 2. Moves arrive in any order, possibly concurrently
//! 3. The second move resolves the duel and sends exactly three notifications
//! 4. The registry forgets the duel so both participants can play again
//!
//! Uses the recording notifier to test the flow without a transport.

use std::sync::Arc;

use tokio::sync::watch;

use duel_engine::adapters::notifier::Destination;
use duel_engine::adapters::{ChannelEventSource, RecordingNotifier};
use duel_engine::application::{
    DuelEngine, EngagementPolicy, EventDispatcher, SessionRegistry, Submission,
};
use duel_engine::domain::duel::{DuelError, Outcome, Participant};
use duel_engine::domain::foundation::{ChannelId, ParticipantId, SessionStatus};
use duel_engine::ports::{InboundEvent, NotificationKind};

// =============================================================================
// Test Infrastructure
// =============================================================================

const CHANNEL: &str = "C-arena";

fn participant(id: &str) -> Participant {
    Participant::new(id, format!("@{}", id), id.to_uppercase()).unwrap()
}

fn pid(id: &str) -> ParticipantId {
    ParticipantId::new(id).unwrap()
}

fn channel() -> ChannelId {
    ChannelId::new(CHANNEL).unwrap()
}

fn setup(policy: EngagementPolicy) -> (Arc<DuelEngine>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let engine = Arc::new(DuelEngine::new(
        Arc::new(SessionRegistry::new(policy)),
        notifier.clone(),
    ));
    (engine, notifier)
}

async fn start_alice_vs_bob(engine: &DuelEngine) {
    engine
        .start_game(channel(), participant("alice"), participant("bob"))
        .await
        .unwrap();
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn rock_beats_scissors() {
    let (engine, notifier) = setup(EngagementPolicy::Reject);
    start_alice_vs_bob(&engine).await;
    notifier.clear();

    engine.submit_move(&pid("alice"), "rock").await.unwrap();
    let submission = engine.submit_move(&pid("bob"), "scissors").await.unwrap();

    let Submission::Resolved { verdict, .. } = submission else {
        panic!("second move should resolve the duel");
    };
    assert_eq!(verdict.outcome(), Outcome::FirstWins);
    assert_eq!(verdict.winner().unwrap().id(), &pid("alice"));

    let sent = notifier.sent();
    assert_eq!(sent.len(), 3);

    let announced = notifier.posted_to(CHANNEL);
    assert_eq!(announced.len(), 1);
    assert_eq!(announced[0].kind, NotificationKind::Result);
    assert_eq!(announced[0].params.get("Winner"), Some("@alice"));
    assert_eq!(announced[0].params.get("Loser"), Some("@bob"));

    assert_eq!(notifier.sent_to("alice")[0].kind, NotificationKind::Winner);
    assert_eq!(notifier.sent_to("bob")[0].kind, NotificationKind::Loser);
}

#[tokio::test]
async fn matching_paper_is_a_draw_for_everyone() {
    let (engine, notifier) = setup(EngagementPolicy::Reject);
    start_alice_vs_bob(&engine).await;
    notifier.clear();

    engine.submit_move(&pid("bob"), "paper").await.unwrap();
    let submission = engine.submit_move(&pid("alice"), "Paper").await.unwrap();

    let Submission::Resolved { verdict, .. } = submission else {
        panic!("second move should resolve the duel");
    };
    assert_eq!(verdict.outcome(), Outcome::Tie);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 3);
    for notification in &sent {
        assert_eq!(notification.kind, NotificationKind::Draw);
        assert_eq!(notification.params.get("Challenger"), Some("@alice"));
        assert_eq!(notification.params.get("Challengee"), Some("@bob"));
    }
    assert!(sent
        .iter()
        .any(|n| matches!(&n.destination, Destination::Channel(c) if c.as_str() == CHANNEL)));
}

#[tokio::test]
async fn lizard_is_rejected_and_only_bob_hears_about_it() {
    let (engine, notifier) = setup(EngagementPolicy::Reject);
    start_alice_vs_bob(&engine).await;
    notifier.clear();

    let err = engine.submit_move(&pid("bob"), "lizard").await.unwrap_err();
    assert_eq!(err, DuelError::InvalidMove("lizard".to_string()));

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::InvalidMove);
    assert_eq!(sent[0].destination, Destination::Participant(pid("bob")));

    let session = engine.registry().session_for(&pid("bob")).await.unwrap();
    assert_eq!(session.status(), SessionStatus::AwaitingMoves);
    assert_eq!(session.move_count(), 0);
}

// =============================================================================
// Registry properties
// =============================================================================

#[tokio::test]
async fn duplicate_move_does_not_change_or_re_resolve() {
    let (engine, notifier) = setup(EngagementPolicy::Reject);
    start_alice_vs_bob(&engine).await;

    engine.submit_move(&pid("alice"), "rock").await.unwrap();
    let err = engine.submit_move(&pid("alice"), "paper").await.unwrap_err();
    assert_eq!(err, DuelError::DuplicateMove(pid("alice")));

    let session = engine.registry().session_for(&pid("alice")).await.unwrap();
    assert_eq!(session.move_of(&pid("alice")).map(|m| m.to_string()), Some("rock".into()));

    engine.submit_move(&pid("bob"), "scissors").await.unwrap();
    assert_eq!(notifier.count_of(NotificationKind::Result), 1);

    let err = engine.submit_move(&pid("alice"), "rock").await.unwrap_err();
    assert_eq!(err, DuelError::NoActiveSession(pid("alice")));
    assert_eq!(notifier.count_of(NotificationKind::Result), 1);
}

#[tokio::test]
async fn engaged_participant_cannot_start_another_duel() {
    let (engine, notifier) = setup(EngagementPolicy::Reject);
    start_alice_vs_bob(&engine).await;

    let err = engine
        .start_game(channel(), participant("alice"), participant("carol"))
        .await
        .unwrap_err();

    assert_eq!(err, DuelError::AlreadyEngaged(pid("alice")));
    assert_eq!(engine.registry().active_session_count().await, 1);
    assert!(!engine.registry().is_engaged(&pid("carol")).await);
    assert!(notifier.sent_to("carol").is_empty());
    assert_eq!(
        notifier.sent_to("alice").last().unwrap().kind,
        NotificationKind::AlreadyEngaged
    );
}

#[tokio::test]
async fn finished_duel_leaves_no_trace() {
    let (engine, _notifier) = setup(EngagementPolicy::Reject);
    start_alice_vs_bob(&engine).await;
    let session_id = *engine.registry().session_for(&pid("alice")).await.unwrap().id();

    engine.submit_move(&pid("alice"), "scissors").await.unwrap();
    engine.submit_move(&pid("bob"), "rock").await.unwrap();

    assert!(engine.registry().get(&session_id).await.is_none());
    assert!(!engine.registry().is_engaged(&pid("alice")).await);
    assert!(!engine.registry().is_engaged(&pid("bob")).await);

    engine
        .start_game(channel(), participant("bob"), participant("alice"))
        .await
        .unwrap();
    engine
        .start_game(channel(), participant("carol"), participant("dave"))
        .await
        .unwrap();
    assert_eq!(engine.registry().active_session_count().await, 2);
}

#[tokio::test]
async fn supersede_policy_moves_participant_to_new_duel() {
    let (engine, notifier) = setup(EngagementPolicy::Supersede);
    start_alice_vs_bob(&engine).await;

    engine
        .start_game(channel(), participant("alice"), participant("carol"))
        .await
        .unwrap();

    assert_eq!(engine.registry().active_session_count().await, 1);
    assert!(!engine.registry().is_engaged(&pid("bob")).await);
    let to_bob = notifier.sent_to("bob");
    assert_eq!(to_bob.last().unwrap().kind, NotificationKind::Superseded);
    assert_eq!(to_bob.last().unwrap().params.get("Opponent"), Some("@alice"));

    engine.submit_move(&pid("carol"), "paper").await.unwrap();
    let submission = engine.submit_move(&pid("alice"), "scissors").await.unwrap();
    assert!(matches!(submission, Submission::Resolved { .. }));
}

#[tokio::test]
async fn notifier_failure_does_not_suppress_other_recipients() {
    let (engine, notifier) = setup(EngagementPolicy::Reject);
    start_alice_vs_bob(&engine).await;
    notifier.clear();
    notifier.fail_for("alice");
    notifier.fail_for(CHANNEL);

    engine.submit_move(&pid("alice"), "paper").await.unwrap();
    let submission = engine.submit_move(&pid("bob"), "rock").await.unwrap();

    assert!(matches!(submission, Submission::Resolved { .. }));
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::Loser);
    assert_eq!(engine.registry().active_session_count().await, 0);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_moves_resolve_exactly_once() {
    for round in 0..25 {
        let (engine, notifier) = setup(EngagementPolicy::Reject);
        start_alice_vs_bob(&engine).await;
        notifier.clear();

        let (first, second) = if round % 2 == 0 { ("alice", "bob") } else { ("bob", "alice") };

        let e1 = engine.clone();
        let t1 = tokio::spawn(async move { e1.submit_move(&pid(first), "rock").await });
        let e2 = engine.clone();
        let t2 = tokio::spawn(async move { e2.submit_move(&pid(second), "scissors").await });

        let a = t1.await.unwrap().unwrap();
        let b = t2.await.unwrap().unwrap();

        let resolved = [&a, &b]
            .iter()
            .filter(|s| matches!(s, Submission::Resolved { .. }))
            .count();
        assert_eq!(resolved, 1);
        assert_eq!(notifier.count_of(NotificationKind::Result), 1);
        assert_eq!(notifier.sent().len(), 3);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn dispatcher_runs_many_independent_duels() {
    let (engine, notifier) = setup(EngagementPolicy::Reject);
    let (tx, source) = ChannelEventSource::channel(256);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);

    let dispatcher = EventDispatcher::new(engine.clone());
    let run = tokio::spawn(async move { dispatcher.run(source, shutdown_rx).await });

    let pairs: Vec<(String, String)> = (0..20)
        .map(|i| (format!("p{}a", i), format!("p{}b", i)))
        .collect();

    for (a, b) in &pairs {
        engine
            .start_game(channel(), participant(a), participant(b))
            .await
            .unwrap();
    }
    for (a, b) in &pairs {
        tx.send(InboundEvent::Move {
            participant_id: pid(b),
            raw_text: "rock".to_string(),
        })
        .await
        .unwrap();
        tx.send(InboundEvent::Move {
            participant_id: pid(a),
            raw_text: "paper".to_string(),
        })
        .await
        .unwrap();
    }
    drop(tx);

    let dispatched = run.await.unwrap().unwrap();
    assert_eq!(dispatched, 40);
    assert_eq!(engine.registry().active_session_count().await, 0);
    assert_eq!(notifier.count_of(NotificationKind::Result), 20);
    assert_eq!(notifier.count_of(NotificationKind::Winner), 20);
    assert_eq!(notifier.count_of(NotificationKind::Loser), 20);
}
