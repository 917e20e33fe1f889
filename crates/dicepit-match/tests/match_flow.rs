//! Integration tests for the match actor, driven through `MatchHandle`.

use std::time::Duration;

use dicepit_match::{MatchConfig, MatchError, MatchHandle, MatchId, Phase, spawn_match};
use dicepit_protocol::{Command, Event};
use dicepit_rules::{Category, Dice, HoldMask, ParticipantId, SequenceDice};
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

type Inbox = mpsc::UnboundedReceiver<Event>;

fn pid(id: u32) -> ParticipantId {
    ParticipantId(id)
}

fn two_player_match(faces: Vec<u8>) -> (MatchHandle, Inbox, Inbox) {
    let (tx0, rx0) = mpsc::unbounded_channel();
    let (tx1, rx1) = mpsc::unbounded_channel();
    let handle = spawn_match(
        MatchId(1),
        MatchConfig::default(),
        vec![(pid(0), tx0), (pid(1), tx1)],
        SequenceDice::new(faces).unwrap(),
    );
    (handle, rx0, rx1)
}

async fn next(rx: &mut Inbox) -> Event {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

/// Skips events until one matches `pred`.
async fn wait_for(rx: &mut Inbox, pred: impl Fn(&Event) -> bool) -> Event {
    loop {
        let event = next(rx).await;
        if pred(&event) {
            return event;
        }
    }
}

fn roll() -> Command {
    Command::Roll {
        hold: HoldMask::NONE,
    }
}

fn mv(category: Category) -> Command {
    Command::Move {
        category,
        dice: Dice::new([1, 1, 1, 1, 1]).unwrap(),
        row: 0,
        col: 0,
    }
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_opening_announcement_reaches_everyone() {
    let (_handle, mut rx0, mut rx1) = two_player_match(vec![1]);

    for rx in [&mut rx0, &mut rx1] {
        assert_eq!(
            next(rx).await,
            Event::info("All players connected. Game starting!")
        );
        assert_eq!(next(rx).await, Event::Turn { participant: pid(0) });
    }
}

#[tokio::test]
async fn test_dice_go_only_to_roller() {
    let (handle, mut rx0, mut rx1) = two_player_match(vec![2, 3, 4, 5, 6]);

    handle.submit(pid(0), roll()).await.unwrap();
    let dice = wait_for(&mut rx0, |e| matches!(e, Event::Dice { .. })).await;
    assert_eq!(
        dice,
        Event::Dice {
            dice: Dice::new([2, 3, 4, 5, 6]).unwrap()
        }
    );

    // GetInfo is ordered after the roll, so the roll has been handled.
    let info = handle.info().await.unwrap();
    assert_eq!(info.phase, Phase::AwaitingMove);
    while let Ok(event) = rx1.try_recv() {
        assert!(!matches!(event, Event::Dice { .. }));
    }
}

#[tokio::test]
async fn test_out_of_turn_command_gets_info_only() {
    let (handle, _rx0, mut rx1) = two_player_match(vec![1]);

    handle.submit(pid(1), roll()).await.unwrap();
    let reply = wait_for(&mut rx1, |e| {
        matches!(e, Event::Info { text } if text.starts_with("not your turn"))
    })
    .await;
    assert_eq!(reply, Event::info("not your turn, waiting for player 0"));

    let info = handle.info().await.unwrap();
    assert_eq!(info.phase, Phase::AwaitingRoll);
    assert_eq!(info.current, pid(0));
}

#[tokio::test]
async fn test_full_match_and_restart() {
    let (handle, mut rx0, mut rx1) = two_player_match(vec![3, 3, 3, 3, 3]);

    for category in Category::ALL {
        for seat in [0, 1] {
            handle.submit(pid(seat), roll()).await.unwrap();
            handle.submit(pid(seat), mv(category)).await.unwrap();
        }
    }

    for rx in [&mut rx0, &mut rx1] {
        wait_for(rx, |e| *e == Event::GameOverSummary).await;
        let verdict = wait_for(rx, |e| {
            matches!(e, Event::Info { text } if text.starts_with("Tie"))
        })
        .await;
        assert!(matches!(verdict, Event::Info { text } if text.contains("players 0, 1")));
    }
    assert_eq!(handle.info().await.unwrap().phase, Phase::MatchOver);

    handle.submit(pid(1), Command::Restart).await.unwrap();
    handle.submit(pid(0), Command::Restart).await.unwrap();

    for rx in [&mut rx0, &mut rx1] {
        wait_for(rx, |e| *e == Event::info("New game starting. Please wait.")).await;
        assert_eq!(next(rx).await, Event::Turn { participant: pid(0) });
    }
    let info = handle.info().await.unwrap();
    assert_eq!(info.phase, Phase::AwaitingRoll);
    assert_eq!(info.round, 1);
    assert_eq!(info.restart_votes, 0);
}

#[tokio::test]
async fn test_disconnect_abandons_and_stops_actor() {
    let (handle, mut rx0, _rx1) = two_player_match(vec![4]);

    handle.disconnect(pid(1)).await.unwrap();

    let notice = wait_for(&mut rx0, |e| {
        matches!(e, Event::Info { text } if text.starts_with("player 1 disconnected"))
    })
    .await;
    assert!(matches!(notice, Event::Info { text } if text.contains("without a winner")));

    // The actor stops once the match is abandoned.
    let err = handle.info().await.unwrap_err();
    assert_eq!(err, MatchError::Unavailable);
    assert!(!handle.is_running());
}

#[tokio::test]
async fn test_shutdown_closes_handle() {
    let (handle, _rx0, _rx1) = two_player_match(vec![1]);
    handle.shutdown().await.unwrap();
    // Queued behind the shutdown, so it is dropped with the channel.
    assert_eq!(handle.info().await.unwrap_err(), MatchError::Unavailable);
    assert_eq!(handle.submit(pid(0), roll()).await, Err(MatchError::Unavailable));
}
