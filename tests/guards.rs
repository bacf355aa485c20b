//! Anti-cheat guards: the real components must be doing the real work.
//! These tests pin down that showdowns are decided by the evaluator, that
//! strategies are blind to unseen cards, that snapshots are isolated
//! copies, and that rollback restores state bit for bit.

use croupier::cards::card::Card;
use croupier::cards::deck::Deck;
use croupier::cards::rank::Rank;
use croupier::cards::suit::Suit;
use croupier::config::GameConfig;
use croupier::evaluation::ranking::HandRank;
use croupier::events::bus::EventBus;
use croupier::service::command::CommandService;
use croupier::snapshot::manager::SnapshotManager;
use croupier::snapshot::snapshot::Snapshot;
use croupier::state::action::PlayerAction;
use croupier::state::phase::Phase;
use croupier::state::seat::SeatStatus;
use croupier::state::table::Table;
use croupier::strategy::Strategy;
use std::sync::Arc;
use std::sync::Mutex;

fn engine(seed: u64) -> CommandService {
    CommandService::new(
        Arc::new(EventBus::new()),
        GameConfig {
            rng_seed: Some(seed),
            ..GameConfig::default()
        },
    )
}

fn card(rank: Rank, suit: Suit) -> Card {
    Card::from((rank, suit))
}

/// A river spot with known cards: p0 holds aces, p1 holds king high.
fn rigged_river() -> Table {
    let ids: Vec<String> = ["p0", "p1"].iter().map(|s| s.to_string()).collect();
    let board = vec![
        card(Rank::Two, Suit::Spade),
        card(Rank::Seven, Suit::Diamond),
        card(Rank::Nine, Suit::Club),
        card(Rank::Jack, Suit::Heart),
        card(Rank::Three, Suit::Diamond),
    ];
    let p0 = vec![card(Rank::Ace, Suit::Spade), card(Rank::Ace, Suit::Diamond)];
    let p1 = vec![card(Rank::King, Suit::Spade), card(Rank::Queen, Suit::Diamond)];
    let used: Vec<Card> = board.iter().chain(p0.iter()).chain(p1.iter()).copied().collect();
    let mut table = Table::new("g", &ids, 400, 50, 100, Deck::lacking(&used));
    table.phase = Phase::River;
    table.board = board;
    table.seats[0].hole = p0;
    table.seats[1].hole = p1;
    for seat in table.seats.iter_mut() {
        seat.spent = 100;
    }
    table.pot = 200;
    table.stake = 0;
    table.actor = Some(0);
    table.hand_number = 1;
    table
}

fn restore(service: &CommandService, table: &Table) {
    let mut manager = SnapshotManager::new();
    let snapshot = manager.capture(table, None);
    assert!(service.restore_game("g", &snapshot).success);
}

#[test]
fn showdown_is_decided_by_the_evaluator() {
    let service = engine(1);
    restore(&service, &rigged_river());
    assert!(service.execute_player_action("g", "p0", PlayerAction::check()).success);

    let end = service.queries().snapshot("g").expect("live game");
    assert_eq!(end.table.phase, Phase::Finished);
    assert_eq!(end.table.seats[0].stack, 600, "the aces must win");
    assert_eq!(end.table.seats[1].stack, 400);
    let main = end
        .table
        .awards
        .iter()
        .find(|a| a.pot == "main")
        .expect("main pot awarded");
    assert_eq!(main.player_id, "p0");
    let ranking = main.ranking.as_ref().expect("contested pots carry the hand");
    assert_eq!(ranking.rank, HandRank::OnePair);
    assert_eq!(ranking.primary, 14);
}

#[test]
fn split_pots_give_odd_chips_to_the_earliest_seat() {
    // the board plays for everyone; p0 folded a single forced chip
    let ids: Vec<String> = ["p0", "p1", "p2"].iter().map(|s| s.to_string()).collect();
    let board = vec![
        card(Rank::Ace, Suit::Spade),
        card(Rank::King, Suit::Spade),
        card(Rank::Queen, Suit::Spade),
        card(Rank::Jack, Suit::Spade),
        card(Rank::Ten, Suit::Spade),
    ];
    let holes = [
        vec![card(Rank::Four, Suit::Club), card(Rank::Five, Suit::Club)],
        vec![card(Rank::Two, Suit::Heart), card(Rank::Three, Suit::Heart)],
        vec![card(Rank::Two, Suit::Diamond), card(Rank::Three, Suit::Diamond)],
    ];
    let used: Vec<Card> = board.iter().chain(holes.iter().flatten()).copied().collect();
    let mut table = Table::new("g", &ids, 100, 5, 10, Deck::lacking(&used));
    table.phase = Phase::River;
    table.board = board;
    for (seat, hole) in table.seats.iter_mut().zip(holes.into_iter()) {
        seat.hole = hole;
    }
    table.seats[0].status = SeatStatus::Folded;
    table.seats[0].spent = 1;
    table.seats[1].spent = 50;
    table.seats[2].spent = 50;
    table.pot = 101;
    table.actor = Some(1);
    table.hand_number = 1;

    let service = engine(2);
    restore(&service, &table);
    assert!(service.execute_player_action("g", "p1", PlayerAction::check()).success);

    let end = service.queries().snapshot("g").expect("live game");
    assert_eq!(end.table.phase, Phase::Finished);
    // both live seats play the board; p1 is earlier and takes the odd chip
    assert_eq!(end.table.seats[1].stack, 151);
    assert_eq!(end.table.seats[2].stack, 150);
    assert_eq!(end.table.seats[0].stack, 100);
    assert!(
        end.table
            .awards
            .iter()
            .filter_map(|a| a.ranking.as_ref())
            .all(|r| r.rank == HandRank::RoyalFlush)
    );
}

/// Records every view it is handed, then plays like a calling machine.
struct Spy {
    seen: Arc<Mutex<Vec<(String, Snapshot)>>>,
}

impl Strategy for Spy {
    fn decide(&self, view: &Snapshot, player_id: &str) -> PlayerAction {
        self.seen
            .lock()
            .expect("spy log")
            .push((player_id.to_string(), view.clone()));
        let owed = view
            .table
            .seat(player_id)
            .map(|seat| view.table.stake.saturating_sub(seat.stake))
            .unwrap_or(0);
        match owed {
            0 => PlayerAction::check(),
            _ => PlayerAction::call(),
        }
    }
}

#[test]
fn strategies_never_see_unseen_cards() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let service = engine(3);
    assert!(service.create_game("g", &["p0", "p1", "p2"]).success);
    for id in ["p0", "p1", "p2"] {
        service.attach_strategy("g", id, Box::new(Spy { seen: Arc::clone(&seen) }));
    }
    assert!(service.start_new_hand("g").success);
    let end = service.queries().snapshot("g").expect("live game");
    assert_eq!(end.table.phase, Phase::Finished, "spies play hands out");

    let log = seen.lock().expect("spy log");
    assert!(!log.is_empty(), "strategies were consulted");
    for (player_id, view) in log.iter() {
        assert_eq!(view.table.deck.remaining(), 0, "deck order leaked");
        for seat in view.table.seats.iter() {
            match (&seat.id == player_id, seat.hole.len()) {
                (true, 2) | (false, 0) => {}
                (mine, n) => panic!("seat {} visible with {} cards (mine: {})", seat.id, n, mine),
            }
        }
    }
}

#[test]
fn snapshots_are_isolated_from_later_play() {
    let service = engine(4);
    assert!(service.create_game("g", &["p0", "p1"]).success);
    assert!(service.start_new_hand("g").success);
    let frozen = service.queries().snapshot("g").expect("live game");
    let copy = frozen.clone();

    assert!(service.execute_player_action("g", "p0", PlayerAction::fold()).success);
    assert_eq!(frozen, copy, "snapshot changed under a later command");
    assert_eq!(frozen.table.phase, Phase::PreFlop);
    let live = service.queries().snapshot("g").expect("live game");
    assert_eq!(live.table.phase, Phase::Finished);
}

#[test]
fn rollback_restores_the_table_exactly() {
    let service = engine(5);
    assert!(service.create_game("g", &["p0", "p1", "p2"]).success);
    assert!(service.start_new_hand("g").success);
    let queries = service.queries();
    let before = queries.snapshot("g").expect("live game");
    let transitions_before = queries.transition_history("g").expect("live game").len();

    // a pile of doomed commands, none of which may leave a trace
    assert!(!service.execute_player_action("g", "p2", PlayerAction::raise(101)).success);
    assert!(!service.execute_player_action("g", "p2", PlayerAction::check()).success);
    assert!(!service.execute_player_action("g", "p0", PlayerAction::call()).success);
    assert!(!service.start_new_hand("g").success);

    let after = queries.snapshot("g").expect("live game");
    assert_eq!(after.table, before.table);
    assert_eq!(
        queries.transition_history("g").expect("live game").len(),
        transitions_before,
        "failed commands must not record transitions"
    );
}

#[test]
fn full_deal_keeps_every_card_accounted_for() {
    let service = engine(6);
    assert!(service.create_game("g", &["p0", "p1", "p2", "p3"]).success);
    assert!(service.start_new_hand("g").success);
    let snapshot = service.queries().snapshot("g").expect("live game");
    assert_eq!(snapshot.table.deck.remaining(), 52 - 8);
    let mut seen = std::collections::HashSet::new();
    for c in snapshot
        .table
        .deck
        .cards()
        .iter()
        .chain(snapshot.table.seats.iter().flat_map(|s| s.hole.iter()))
    {
        assert!(seen.insert(u8::from(*c)));
    }
    assert_eq!(seen.len(), 52);
}
