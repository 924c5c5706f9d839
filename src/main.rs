//! Strike Arena - Entry Point
//!
//! Runs a scripted two-player match against the arena core: both slots are
//! occupied, every strike is answered with a perfect entry until each
//! player's scripted endurance runs out, and the host-facing output events
//! are printed as they drain.

use clap::Parser;

use strike_arena::arena::{MatchPhase, SessionPhase, StrikeWorld};
use strike_arena::core::config::GameConfig;
use strike_arena::core::error::Result;
use strike_arena::core::types::{PlayerId, Slot};
use strike_arena::detect::{TriggerZone, ZoneLayout};
use strike_arena::runtime::message::{HandSample, OutputEvent};
use strike_arena::strikes::catalog::{Hand, Target};

#[derive(Parser, Debug)]
#[command(name = "strike-arena", about = "Scripted demo match for the arena core")]
struct Args {
    /// TOML config file; defaults apply when omitted
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Deterministic sequence dealing
    #[arg(long)]
    seed: Option<u64>,

    /// Strikes the first player lands before missing
    #[arg(long, default_value_t = 12)]
    endurance_p0: u32,

    /// Strikes the second player lands before missing
    #[arg(long, default_value_t = 8)]
    endurance_p1: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "strike_arena=info".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    tracing::info!("Strike Arena starting...");
    let mut world = StrikeWorld::new(&config);
    print_outputs(&mut world);

    let players = [PlayerId::new(), PlayerId::new()];
    world.player_enter(Slot::P0, players[0]);
    world.player_enter(Slot::P1, players[1]);
    // the first player fights southpaw
    world.press_button(Slot::P0, Hand::Left, players[0]);
    print_outputs(&mut world);

    let mut landed = [0u32; 2];
    let endurance = [args.endurance_p0, args.endurance_p1];
    let idle = [HandSample::default(); 2];

    // frame loop: 100ms steps until the match resolves and resets
    while world.now_ms() < 300_000 {
        world.advance(100, idle);
        print_outputs(&mut world);

        for slot in Slot::ALL {
            if world.session_phase(slot) != SessionPhase::InGame {
                continue;
            }
            let Some((target, strike)) = [Target::Head, Target::Body]
                .into_iter()
                .find_map(|t| world.pending_strike(slot, t).map(|s| (t, s)))
            else {
                continue;
            };
            let zone = TriggerZone::canonical_for(strike);
            let miss = landed[slot.index()] >= endurance[slot.index()];
            let entered = if miss { wrong_zone(zone) } else { zone };
            // park the acting hand on the trigger, then punch
            let position = ZoneLayout::for_rig(slot, target).position(entered);
            let mut hands = idle;
            match strike.hand {
                Hand::Left => hands[slot.index()].left = position,
                Hand::Right => hands[slot.index()].right = position,
            }
            world.advance(100, hands);
            world.trigger_enter(slot, target, zone_name(entered));
            if miss {
                tracing::info!(?slot, "scripted miss");
            } else {
                landed[slot.index()] += 1;
            }
            print_outputs(&mut world);
        }

        if world.match_phase() == MatchPhase::WaitingForPlayers && landed.iter().sum::<u32>() > 0 {
            break;
        }
    }

    println!();
    for (slot, player) in Slot::ALL.into_iter().zip(players) {
        let high = world.scores().vars.get(player, &config.high_score_key);
        println!(
            "{:?}: {} strikes landed, high score {}",
            slot,
            landed[slot.index()],
            high
        );
    }
    Ok(())
}

fn wrong_zone(zone: TriggerZone) -> TriggerZone {
    match zone {
        TriggerZone::Bottom => TriggerZone::Center,
        _ => TriggerZone::Bottom,
    }
}

fn zone_name(zone: TriggerZone) -> &'static str {
    match zone {
        TriggerZone::Center => "center",
        TriggerZone::Left => "left",
        TriggerZone::Right => "right",
        TriggerZone::Bottom => "bottom",
    }
}

fn print_outputs(world: &mut StrikeWorld) {
    for event in world.drain_outputs() {
        match event {
            OutputEvent::StatusText(text) => println!("[board] {}", text),
            OutputEvent::StrikeText { slot, text } if !text.is_empty() => {
                println!("[{:?}] strike: {}", slot, text)
            }
            OutputEvent::Popup { text, .. } => println!("[popup] {}", text),
            OutputEvent::Sound { slot, cue } => match slot {
                Some(slot) => println!("[{:?}] sound: {:?}", slot, cue),
                None => println!("[arena] sound: {:?}", cue),
            },
            OutputEvent::RingShown { slot, ring, .. } => {
                println!("[{:?}] ring: {:?}", slot, ring)
            }
            // clock ticks and visibility churn are too chatty for stdout
            _ => {}
        }
    }
}
