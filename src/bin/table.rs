//! Sample driver: spins up the real service stack and plays hands at one
//! table. Seats are naive calling machines unless `--interactive` puts you
//! in seat p0. Demonstration only; the engine itself never prints.

use anyhow::Result;
use anyhow::ensure;
use clap::Parser;
use colored::Colorize;
use croupier::config::GameConfig;
use croupier::events::bus::EventBus;
use croupier::service::command::CommandService;
use croupier::service::query::QueryService;
use croupier::state::action::ActionKind;
use croupier::state::action::PlayerAction;
use croupier::state::phase::Phase;
use croupier::strategy::caller::Caller;
use dialoguer::Input;
use dialoguer::Select;
use std::sync::Arc;

const GAME: &str = "table";

#[derive(Parser)]
#[command(about = "play hands against calling machines")]
struct Args {
    /// number of seats
    #[arg(long, default_value_t = 3)]
    players: usize,
    /// hands to play before stopping
    #[arg(long, default_value_t = 10)]
    hands: u64,
    #[arg(long, default_value_t = 1000)]
    chips: u32,
    #[arg(long, default_value_t = 50)]
    small_blind: u32,
    #[arg(long, default_value_t = 100)]
    big_blind: u32,
    /// deck seed, for replayable sessions
    #[arg(long)]
    seed: Option<u64>,
    /// take seat p0 yourself
    #[arg(long, default_value_t = false)]
    interactive: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = GameConfig {
        initial_chips: args.chips,
        small_blind: args.small_blind,
        big_blind: args.big_blind,
        rng_seed: args.seed,
        ..GameConfig::default()
    };
    let bus = Arc::new(EventBus::bounded(config.event_history));
    let service = CommandService::new(Arc::clone(&bus), config);
    let queries = service.queries();

    let ids: Vec<String> = (0..args.players).map(|i| format!("p{}", i)).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let created = service.create_game(GAME, &id_refs);
    ensure!(created.success, "create_game: {}", created.message);
    for (index, id) in ids.iter().enumerate() {
        if args.interactive && index == 0 {
            continue;
        }
        service.attach_strategy(GAME, id, Box::new(Caller));
    }

    for _ in 0..args.hands {
        if queries.is_game_over(GAME)?.over {
            println!("{}", "not enough funded seats to continue".yellow());
            break;
        }
        let started = service.start_new_hand(GAME);
        ensure!(started.success, "start_new_hand: {}", started.message);
        if args.interactive {
            play_human_turns(&service, &queries)?;
        }
        report_hand(&queries)?;
    }

    println!("{}", "final stacks".bold());
    let snapshot = queries.snapshot(GAME)?;
    for seat in snapshot.table.seats.iter() {
        println!("  {:<6} {:>6}", seat.id, seat.stack.to_string().green());
    }
    Ok(())
}

/// Keep prompting while the hand is open and the action is on seat p0.
/// Every other seat acts on its own the moment our command commits.
fn play_human_turns(service: &CommandService, queries: &QueryService) -> Result<()> {
    loop {
        let view = queries.view_for(GAME, "p0")?;
        if !view.table.phase.is_betting() || view.table.actor_id() != Some("p0") {
            return Ok(());
        }
        let action = prompt_action(queries, &view.table.board, view.table.pot)?;
        let outcome = service.execute_player_action(GAME, "p0", action);
        if !outcome.success {
            println!("{} {}", "rejected:".red(), outcome.message);
        }
    }
}

fn prompt_action(
    queries: &QueryService,
    board: &[croupier::cards::card::Card],
    pot: u32,
) -> Result<PlayerAction> {
    let options = queries.available_actions(GAME, "p0")?;
    let board_line = board
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let labels: Vec<String> = options
        .iter()
        .map(|o| match o.kind {
            ActionKind::Fold => "fold".to_string(),
            ActionKind::Check => "check".to_string(),
            ActionKind::Call => format!("call {}", o.min),
            ActionKind::Raise => format!("raise (to {}..{})", o.min, o.max),
            ActionKind::AllIn => format!("all in ({})", o.min),
        })
        .collect();
    let picked = Select::new()
        .with_prompt(format!("board [{}] pot {}", board_line, pot))
        .items(&labels)
        .default(0)
        .interact()?;
    let choice = &options[picked];
    Ok(match choice.kind {
        ActionKind::Fold => PlayerAction::fold(),
        ActionKind::Check => PlayerAction::check(),
        ActionKind::Call => PlayerAction::call(),
        ActionKind::AllIn => PlayerAction::all_in(),
        ActionKind::Raise => {
            let (min, max) = (choice.min, choice.max);
            let target: u32 = Input::new()
                .with_prompt(format!("raise to [{}..{}]", min, max))
                .validate_with(move |input: &u32| match input {
                    n if *n < min => Err("below the minimum raise"),
                    n if *n > max => Err("beyond your stack"),
                    _ => Ok(()),
                })
                .interact()?;
            PlayerAction::raise(target)
        }
    })
}

fn report_hand(queries: &QueryService) -> Result<()> {
    let snapshot = queries.snapshot(GAME)?;
    ensure!(
        snapshot.table.phase == Phase::Finished,
        "hand {} stalled in {}",
        snapshot.hand_number,
        snapshot.table.phase
    );
    let board = snapshot
        .table
        .board
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    println!(
        "{} {}  board [{}]",
        "hand".bold(),
        snapshot.hand_number,
        board
    );
    for award in snapshot.table.awards.iter() {
        let line = match &award.ranking {
            Some(ranking) => format!("  {} wins {} from {} with {}", award.player_id, award.amount, award.pot, ranking),
            None => format!("  {} takes {} ({})", award.player_id, award.amount, award.pot),
        };
        println!("{}", line.cyan());
    }
    Ok(())
}
