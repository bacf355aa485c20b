//! The event stream as hosts observe it: one command publishes its events
//! in the order they were produced, rejected commands publish markers and
//! nothing else, and the bus counters add up.

use croupier::config::GameConfig;
use croupier::events::bus::EventBus;
use croupier::events::bus::Topic;
use croupier::events::event::EventKind;
use croupier::events::event::GameEvent;
use croupier::service::command::CommandService;
use croupier::state::action::PlayerAction;
use croupier::state::phase::Phase;
use std::sync::Arc;
use std::sync::Mutex;

fn engine(seed: u64) -> (Arc<EventBus>, CommandService) {
    let bus = Arc::new(EventBus::new());
    let service = CommandService::new(
        Arc::clone(&bus),
        GameConfig {
            rng_seed: Some(seed),
            ..GameConfig::default()
        },
    );
    (bus, service)
}

fn kinds(events: &[GameEvent]) -> Vec<EventKind> {
    events.iter().map(|e| e.kind).collect()
}

#[test]
fn each_action_speaks_its_own_event() {
    let (bus, service) = engine(11);
    assert!(service.create_game("g", &["p0", "p1", "p2"]).success);
    assert!(service.start_new_hand("g").success);
    bus.clear_history();

    assert!(service.execute_player_action("g", "p2", PlayerAction::raise(200)).success);
    let raised = bus.history(Some(EventKind::PlayerRaised), None);
    assert_eq!(raised.len(), 1);
    assert_eq!(raised[0].field("player_id"), Some("p2"));
    assert_eq!(raised[0].data["to"], serde_json::json!(200));
    assert_eq!(raised[0].source_phase, Phase::PreFlop);

    assert!(service.execute_player_action("g", "p0", PlayerAction::fold()).success);
    let folded = bus.history(Some(EventKind::PlayerFolded), None);
    assert_eq!(folded.len(), 1);
    assert_eq!(folded[0].field("player_id"), Some("p0"));

    assert!(service.execute_player_action("g", "p1", PlayerAction::call()).success);
    let called = bus.history(Some(EventKind::PlayerCalled), None);
    assert_eq!(called.len(), 1);
    assert_eq!(called[0].data["amount"], serde_json::json!(100));

    // the round closed, so the flop came out
    assert_eq!(bus.history(Some(EventKind::BettingRoundComplete), None).len(), 1);
    let revealed = bus.history(Some(EventKind::CommunityCardsRevealed), None);
    assert_eq!(revealed.len(), 1);
    assert_eq!(revealed[0].data["revealed"].as_array().map(Vec::len), Some(3));
}

#[test]
fn call_with_nothing_owed_announces_a_check() {
    let (bus, service) = engine(12);
    assert!(service.create_game("g", &["p0", "p1"]).success);
    assert!(service.start_new_hand("g").success);
    assert!(service.execute_player_action("g", "p0", PlayerAction::call()).success);
    bus.clear_history();

    // flop, nothing owed: a call is recorded as the check it really is
    assert!(service.execute_player_action("g", "p0", PlayerAction::call()).success);
    let checked = bus.history(Some(EventKind::PlayerChecked), None);
    assert_eq!(checked.len(), 1);
    assert_eq!(checked[0].field("converted_from"), Some("call"));
    assert!(bus.history(Some(EventKind::PlayerCalled), None).is_empty());
}

#[test]
fn one_command_publishes_in_production_order() {
    let (bus, service) = engine(13);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    bus.subscribe(
        Topic::Any,
        0,
        Arc::new(move |event: &GameEvent| sink.lock().unwrap().push(event.kind)),
    );
    assert!(service.create_game("g", &["p0", "p1"]).success);
    assert!(service.start_new_hand("g").success);

    let observed = seen.lock().unwrap().clone();
    let expected_prefix = [
        EventKind::GameStarted,
        EventKind::HandStarted,
        EventKind::BetPlaced,
        EventKind::BetPlaced,
        EventKind::PotUpdated,
        EventKind::PhaseChanged,
        EventKind::CardsDealt,
    ];
    assert_eq!(&observed[..expected_prefix.len()], expected_prefix.as_slice());
}

#[test]
fn events_of_one_command_share_a_correlation_id() {
    let (bus, service) = engine(17);
    assert!(service.create_game("g", &["p0", "p1"]).success);
    assert!(service.start_new_hand("g").success);
    bus.clear_history();
    assert!(service.execute_player_action("g", "p0", PlayerAction::fold()).success);

    let history = bus.history(None, None);
    assert!(history.len() > 2);
    let correlation = history[0].correlation_id.clone().expect("stamped");
    assert!(
        history
            .iter()
            .all(|e| e.correlation_id.as_deref() == Some(correlation.as_str()))
    );

    // the next command gets its own id
    assert!(service.start_new_hand("g").success);
    let later = bus.history(Some(EventKind::HandStarted), None);
    assert_ne!(later[0].correlation_id.as_deref(), Some(correlation.as_str()));
}

#[test]
fn rejected_commands_leave_only_markers() {
    let (bus, service) = engine(14);
    assert!(service.create_game("g", &["p0", "p1"]).success);
    assert!(service.start_new_hand("g").success);
    bus.clear_history();

    assert!(!service.execute_player_action("g", "p0", PlayerAction::check()).success);
    let history = bus.history(None, None);
    assert_eq!(
        kinds(&history),
        vec![EventKind::InvalidAction, EventKind::RolledBack]
    );
    // no phantom action events from the rejected command
    assert!(bus.history(Some(EventKind::PlayerActionExecuted), None).is_empty());
    assert!(bus.history(Some(EventKind::PlayerChecked), None).is_empty());
}

#[test]
fn hole_cards_never_enter_the_stream() {
    let (bus, service) = engine(15);
    assert!(service.create_game("g", &["p0", "p1"]).success);
    assert!(service.start_new_hand("g").success);
    let snapshot = service.queries().snapshot("g").expect("live game");
    let secrets: Vec<String> = snapshot
        .table
        .seats
        .iter()
        .flat_map(|s| s.hole.iter())
        .map(|c| c.to_string())
        .collect();
    assert_eq!(secrets.len(), 4);
    for event in bus.history(None, None) {
        let raw = event.data.to_string();
        for secret in &secrets {
            assert!(
                !raw.contains(secret.as_str()),
                "event {} leaked a hole card",
                event.kind
            );
        }
    }
}

#[test]
fn bus_counters_add_up() {
    let (bus, service) = engine(16);
    let counted = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&counted);
    bus.subscribe(
        Topic::Any,
        0,
        Arc::new(move |_| {
            *sink.lock().unwrap() += 1;
        }),
    );
    assert!(service.create_game("g", &["p0", "p1"]).success);
    assert!(service.start_new_hand("g").success);
    assert!(service.execute_player_action("g", "p0", PlayerAction::fold()).success);

    let stats = bus.stats();
    let delivered = *counted.lock().unwrap();
    assert_eq!(stats.published as usize, bus.history(None, None).len());
    assert_eq!(stats.handled as usize, delivered);
    assert_eq!(stats.failed, 0);
}
