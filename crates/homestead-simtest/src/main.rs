//! Homestead Headless Simulation Harness
//!
//! Drives the core and full game sessions with scripted input against
//! headless collaborators. No window, no renderer, no real input.
//!
//! Usage:
//!   cargo run -p homestead-simtest
//!   cargo run -p homestead-simtest -- --verbose
//!   cargo run -p homestead-simtest -- --config game.json --save-file /tmp/slot.json

use std::path::PathBuf;

use clap::Parser;
use homestead_core::catalog::Catalog;
use homestead_core::config::GameConfig;
use homestead_core::engine::{Collaborators, GameEngine, Prompt};
use homestead_core::headless::{HeadlessDialogView, HeadlessStage};
use homestead_core::persistence::{FileStorage, SaveManager};
use homestead_core::prelude::*;
use homestead_core::systems::{
    ClockModel, DialogController, LocationCore, NeedsModel, NeedsSnapshot, TransitionEvent,
};

const FRAME_MS: f32 = 1000.0 / 60.0;

#[derive(Parser)]
#[command(name = "homestead-simtest")]
#[command(about = "Headless checks for the Homestead core")]
#[command(version)]
struct Cli {
    /// Print every check, not only failures
    #[arg(long)]
    verbose: bool,

    /// Log level (-l info, -ll debug)
    #[arg(short = 'l', long = "log", action = clap::ArgAction::Count)]
    log: u8,

    /// Game config JSON; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where the file-storage check writes its save
    #[arg(long)]
    save_file: Option<PathBuf>,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

#[derive(Default)]
struct Script {
    movement: Vec2,
    interact: bool,
    advance: bool,
}

impl InputSource for Script {
    fn movement(&mut self) -> Vec2 {
        self.movement
    }
    fn interact_pressed(&mut self) -> bool {
        std::mem::take(&mut self.interact)
    }
    fn advance_pressed(&mut self) -> bool {
        std::mem::take(&mut self.advance)
    }
    fn cancel_pressed(&mut self) -> bool {
        false
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log);

    let config = match &cli.config {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Could not load config {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => GameConfig::default(),
    };

    println!("=== Homestead Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Catalog
    results.extend(validate_catalog());

    // 2. Location core
    results.extend(validate_location_core(&config));

    // 3. Needs and clock
    results.extend(validate_needs(&config));
    results.extend(validate_clock(&config));

    // 4. Dialog
    results.extend(validate_dialog());

    // 5. Full sessions
    results.extend(validate_session_walk(&config));
    results.extend(validate_npc_priority(&config));

    // 6. Persistence
    results.extend(validate_file_save(&config, cli.save_file.clone()));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || cli.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn init_logging(level: u8) {
    let filter = match level {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(filter)
        .format_timestamp(None)
        .init();
}

fn session(config: &GameConfig) -> GameEngine {
    GameEngine::new(
        config.clone(),
        Catalog::town(),
        Collaborators::headless(),
        42,
    )
}

fn settle(engine: &mut GameEngine, input: &mut Script) -> usize {
    let mut frames = 0;
    while engine.location.is_transitioning() && frames < 1_000 {
        engine.update(FRAME_MS, input);
        frames += 1;
    }
    frames
}

// ── 1. Catalog ──────────────────────────────────────────────────────────

fn validate_catalog() -> Vec<TestResult> {
    println!("--- Catalog ---");
    let town = Catalog::town();
    let mut results = Vec::new();

    let ids: Vec<&str> = town.locations().iter().map(|l| l.id.as_str()).collect();
    results.push(check(
        "town_locations",
        ["home", "street", "park", "cafe"]
            .iter()
            .all(|id| town.contains(id)),
        format!("{:?}", ids),
    ));

    let dangling: Vec<String> = town
        .locations()
        .iter()
        .flat_map(|l| l.transitions.iter().map(move |t| (l, t)))
        .filter(|(_, t)| !town.contains(&t.to))
        .map(|(l, t)| format!("{} -> {}", l.id, t.to))
        .collect();
    results.push(check(
        "transition_targets_exist",
        dangling.is_empty(),
        if dangling.is_empty() {
            "every exit leads somewhere".to_string()
        } else {
            dangling.join(", ")
        },
    ));

    let mute: Vec<&str> = town
        .npcs()
        .iter()
        .filter(|n| n.dialog.is_empty())
        .map(|n| n.id.as_str())
        .collect();
    results.push(check(
        "npcs_have_dialog",
        mute.is_empty(),
        format!("{} npcs, {} without pages", town.npcs().len(), mute.len()),
    ));

    results
}

// ── 2. Location core ────────────────────────────────────────────────────

fn validate_location_core(config: &GameConfig) -> Vec<TestResult> {
    println!("--- Location Core ---");
    let mut results = Vec::new();

    let mut once = LocationCore::new(Catalog::town(), &config.world);
    let mut once_stage = HeadlessStage::new();
    once.load_location("park", None, &mut once_stage);

    let mut twice = LocationCore::new(Catalog::town(), &config.world);
    let mut twice_stage = HeadlessStage::new();
    twice.load_location("park", None, &mut twice_stage);
    twice.load_location("park", None, &mut twice_stage);

    results.push(check(
        "reload_is_idempotent",
        once.member_count() == twice.member_count()
            && once_stage.live_count() == twice_stage.live_count()
            && twice_stage.stale_despawns == 0,
        format!(
            "members {} vs {}, visuals {} vs {}",
            once.member_count(),
            twice.member_count(),
            once_stage.live_count(),
            twice_stage.live_count()
        ),
    ));

    let mut core = LocationCore::new(Catalog::town(), &config.world);
    let mut stage = HeadlessStage::new();
    core.load_location("home", None, &mut stage);
    let radius = core.proximity_radius();
    let center = Vec2::new(750.0, 300.0);
    let inside = core
        .check_transition_proximity(Vec2::new(center.x - radius + 0.01, center.y))
        .is_some();
    let outside = core
        .check_transition_proximity(Vec2::new(center.x - radius - 0.01, center.y))
        .is_none();
    results.push(check(
        "zone_radius_edges",
        inside && outside,
        format!("R={} inside={} outside={}", radius, inside, outside),
    ));

    results.push(check(
        "unknown_location_refused",
        core.load_location("attic", None, &mut stage).is_none()
            && core.current_location_id() == Some("home"),
        "load of 'attic' returned none, home still loaded",
    ));

    let mut player = Player::new(center, config.world.player_speed, Appearance::default());
    core.transition_to_location("street", None, &mut stage);
    let mut phases = vec![core.phase()];
    let mut arrived = false;
    for _ in 0..1_000 {
        if let Some(TransitionEvent::Arrived { .. }) = core.update(FRAME_MS, &mut stage, &mut player) {
            arrived = true;
        }
        if phases.last() != Some(&core.phase()) {
            phases.push(core.phase());
        }
        if !core.is_transitioning() {
            break;
        }
    }
    results.push(check(
        "fade_sequence",
        arrived
            && phases
                == [
                    TransitionPhase::FadingOut,
                    TransitionPhase::Loading,
                    TransitionPhase::FadingIn,
                    TransitionPhase::Idle,
                ],
        format!("{:?}", phases),
    ));

    results
}

// ── 3. Needs & clock ────────────────────────────────────────────────────

fn validate_needs(config: &GameConfig) -> Vec<TestResult> {
    println!("--- Needs ---");
    let mut results = Vec::new();
    let mut player = Player::new(Vec2::ZERO, config.world.player_speed, Appearance::default());

    let penalty = config.needs.penalty;
    let table = [
        (20.0, 100.0, 1.0 - penalty),
        (100.0, 20.0, 1.0 - penalty),
        (20.0, 20.0, 1.0 - 2.0 * penalty),
        (80.0, 80.0, 1.0),
    ];
    for (hunger, energy, expected) in table {
        let mut needs = NeedsModel::new(config.needs);
        needs.restore(NeedsSnapshot { hunger, energy }, &mut player);
        let got = needs.speed_modifier();
        results.push(check(
            &format!("speed_modifier_{}_{}", hunger, energy),
            (got - expected).abs() < 1e-4,
            format!("expected {:.2}, got {:.2}", expected, got),
        ));
    }

    let mut needs = NeedsModel::new(config.needs);
    let mut in_range = true;
    for step in 0..2_000 {
        match step % 4 {
            0 => needs.update(5_000.0),
            1 => needs.add_hunger(37.0),
            2 => needs.remove_energy(55.0),
            _ => needs.remove_hunger(80.0),
        }
        in_range &= (0.0..=100.0).contains(&needs.hunger())
            && (0.0..=100.0).contains(&needs.energy());
    }
    results.push(check("needs_stay_clamped", in_range, "2000 mixed mutations"));

    results
}

fn validate_clock(config: &GameConfig) -> Vec<TestResult> {
    println!("--- Clock ---");
    let rate = config.clock.game_minutes_per_real_second;
    if rate <= 0.0 {
        return vec![check("midnight_rollover", true, "clock stopped by config, skipped")];
    }
    let mut clock = ClockModel::new(config.clock);
    clock.set_time(1, 23, 30);
    let sixty_minutes_ms = (60.0 / rate * 1000.0) as f32;
    clock.update(sixty_minutes_ms);
    let reading = clock.reading();
    vec![check(
        "midnight_rollover",
        (reading.day, reading.hour, reading.minute) == (2, 0, 30),
        reading.display(),
    )]
}

// ── 4. Dialog ───────────────────────────────────────────────────────────

fn validate_dialog() -> Vec<TestResult> {
    println!("--- Dialog ---");
    let town = Catalog::town();
    let mut results = Vec::new();
    let Some(mia) = town.npcs().iter().find(|n| n.id == "mia") else {
        return vec![check("dialog_mia", false, "mia missing from town")];
    };

    let mut dialog = DialogController::new();
    let mut view = HeadlessDialogView::default();
    let mut player = Player::new(Vec2::ZERO, 160.0, Appearance::default());
    dialog.show(&mia.name, &mia.dialog, &mut player, &mut view);

    let mut closed = 0;
    for _ in 0..mia.dialog.len() + 2 {
        if dialog.advance(&mut view) == Some(DialogOutcome::Closed) {
            closed += 1;
        }
    }
    results.push(check(
        "dialog_closes_once",
        closed == 1 && !dialog.is_active() && view.transcript.len() == mia.dialog.len(),
        format!("{} pages shown, closed {} time(s)", view.transcript.len(), closed),
    ));

    results
}

// ── 5. Sessions ─────────────────────────────────────────────────────────

fn validate_session_walk(config: &GameConfig) -> Vec<TestResult> {
    println!("--- Session: home to street ---");
    let mut results = Vec::new();
    let mut engine = session(config);
    let mut input = Script::default();
    engine.new_game();

    input.movement = Vec2::new(1.0, 0.0);
    let mut frames = 0;
    while engine.player.position.x < 720.0 && frames < 2_000 {
        engine.update(FRAME_MS, &mut input);
        frames += 1;
    }
    input.movement = Vec2::ZERO;
    engine.update(FRAME_MS, &mut input);

    let offered = matches!(engine.prompt(), Some(Prompt::Transition { .. }));
    results.push(check(
        "exit_prompt_near_door",
        offered,
        format!(
            "walked {} frames to ({:.0}, {:.0})",
            frames, engine.player.position.x, engine.player.position.y
        ),
    ));

    input.interact = true;
    engine.update(FRAME_MS, &mut input);
    let started = engine.location.is_transitioning();
    let frames = settle(&mut engine, &mut input);
    results.push(check(
        "arrive_on_street",
        started && engine.location.current_location_id() == Some("street"),
        format!("transition took {} frames", frames),
    ));

    results
}

fn validate_npc_priority(config: &GameConfig) -> Vec<TestResult> {
    println!("--- Session: NPC priority ---");
    let mut engine = session(config);
    let mut input = Script::default();
    engine.new_game();
    engine.request_transition("cafe", None);
    settle(&mut engine, &mut input);

    // Mia stands behind the counter; walk up to her
    engine.player.position = Vec2::new(300.0, 240.0);
    engine.update(FRAME_MS, &mut input);
    let talk = matches!(engine.prompt(), Some(Prompt::Talk { .. }));

    input.interact = true;
    engine.update(FRAME_MS, &mut input);
    let talking = engine.talking_to();
    while engine.dialog.is_active() {
        input.advance = true;
        engine.update(FRAME_MS, &mut input);
    }

    vec![check(
        "talk_to_mia",
        talk && talking.as_deref() == Some("mia") && engine.talking_to().is_none(),
        format!("prompt {:?}, talked to {:?}", engine.prompt().map(Prompt::text), talking),
    )]
}

// ── 6. Persistence ──────────────────────────────────────────────────────

fn validate_file_save(config: &GameConfig, path: Option<PathBuf>) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let path = path.unwrap_or_else(|| std::env::temp_dir().join("homestead-simtest-save.json"));

    let mut engine = GameEngine::new(
        config.clone(),
        Catalog::town(),
        Collaborators {
            storage: Box::new(FileStorage::new(&path)),
            ..Collaborators::headless()
        },
        7,
    );
    engine.new_game();
    engine.needs.remove_hunger(35.0);
    let saved = engine.save_game();

    let restored = SaveManager::new(Box::new(FileStorage::new(&path))).load();
    let raw = std::fs::read_to_string(&path).unwrap_or_default();
    let shape_ok = serde_json::from_str::<serde_json::Value>(&raw)
        .map(|v| v["data"]["currentLocationId"] == "home" && v["version"].is_string())
        .unwrap_or(false);

    let round_trip = restored
        .as_ref()
        .and_then(|d| d.needs)
        .map(|n| (n.hunger - engine.needs.hunger()).abs() < 0.01)
        .unwrap_or(false);

    vec![check(
        "file_save_round_trip",
        saved && shape_ok && round_trip,
        format!("{}", path.display()),
    )]
}
