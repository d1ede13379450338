//! party: a four-account party driven by the rust_cb decision engine.
//!
//! The leader buffs martial allies and hands out party-wide consumables;
//! the three followers walk to the flags the leader assigned and obey the
//! leader's item commands.  Everything runs against a deterministic
//! `SimWorld` on an in-memory bus.
//!
//! ```bash
//! RUST_LOG=cb_engine=debug cargo run -p party -- --ticks 200 --out output/party
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cb_core::{AccountId, ItemModelId, Millis, Position, Role, SkillId};
use cb_coord::{MemoryBus, SharedBus};
use cb_engine::{DecisionLoop, DecisionLoopBuilder, EngineConfig, NoopObserver, Party};
use cb_output::{CsvTraceWriter, TraceObserver};
use cb_skills::{
    AllyBuff, AllyBuffConfig, BroadcastConfig, BroadcastConsumable, FollowFlag, FollowFlagConfig,
    ObeyPartyCommands,
};
use cb_world::{MemberSpec, SimSkill, SimWorld, SimWorldBuilder};

// ── Constants ─────────────────────────────────────────────────────────────────

const FINALE: SkillId = SkillId(1);
const GRAIL: ItemModelId = ItemModelId(24_861);

const MEMBERS: [(&str, Role, (f32, f32)); 4] = [
    ("lead",   Role::Paragon, (0.0, 0.0)),
    ("war",    Role::Warrior, (-300.0, -200.0)),
    ("ranger", Role::Ranger,  (300.0, -200.0)),
    ("monk",   Role::Monk,    (0.0, -600.0)),
];

/// Flag slot and position handed to each follower at start.
const FLAGS: [(usize, &str, (f32, f32)); 3] = [
    (0, "war",    (-150.0, 500.0)),
    (1, "ranger", (150.0, 500.0)),
    (2, "monk",   (0.0, 200.0)),
];

// ── CLI and config file ───────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "party")]
#[command(about = "Run a simulated four-account party through the decision engine")]
struct Args {
    /// Number of decision ticks to run
    #[arg(long, default_value_t = 240)]
    ticks: u64,

    /// Seed of the simulated world
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Optional TOML file with `[engine]` and `[follow_flag]` tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for `candidate_scores.csv` and `tick_outcomes.csv`
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoConfig {
    engine: EngineConfig,
    follow_flag: FollowFlagConfig,
}

impl DemoConfig {
    fn load(args: &Args) -> Result<Self> {
        let Some(path) = &args.config else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let cfg: DemoConfig = toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        cfg.engine.validate()?;
        cfg.follow_flag.validate()?;
        Ok(cfg)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn account(name: &str) -> Result<AccountId> {
    Ok(AccountId::new(name)?)
}

fn build_world(seed: u64) -> Result<SimWorld> {
    let mut b = SimWorldBuilder::new(seed).sensor_noise(25.0).hostile_wander(40.0);
    for (name, role, (x, y)) in MEMBERS {
        let mut spec = MemberSpec::new(account(name)?, role, Position::new(x, y)).with_item(GRAIL, 5);
        if role == Role::Paragon {
            spec = spec.leader().with_skill(SimSkill::new(FINALE, 5.0, 250, 2_000));
        }
        b.member(spec);
    }
    for (x, y) in [(-200.0, 1_300.0), (0.0, 1_450.0), (250.0, 1_350.0), (1_800.0, 2_600.0)] {
        b.hostile(Position::new(x, y));
    }
    Ok(b.build())
}

fn build_loops(cfg: &DemoConfig) -> Result<Vec<DecisionLoop>> {
    let bus: Arc<dyn SharedBus> = Arc::new(MemoryBus::new());
    let mut loops = Vec::with_capacity(MEMBERS.len());
    for (name, role, _) in MEMBERS {
        let builder = DecisionLoopBuilder::new(account(name)?, bus.clone()).config(cfg.engine.clone());
        let builder = if role == Role::Paragon {
            let mut grail = BroadcastConfig::new("Party Grail", GRAIL);
            grail.throttle_ms = 20_000;
            builder
                .candidate(AllyBuff::new(AllyBuffConfig::blazing_finale(FINALE)))
                .candidate(BroadcastConsumable::new(grail))
        } else {
            builder
                .candidate(FollowFlag::new(cfg.follow_flag.clone())?)
                .candidate(ObeyPartyCommands::default())
        };
        loops.push(builder.build()?);
    }

    if let Some(lead) = loops.first_mut() {
        for (slot, owner, (x, y)) in FLAGS {
            lead.coord_mut().assign_flag(slot, account(owner)?, Position::new(x, y), Millis::ZERO);
        }
    }
    Ok(loops)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let cfg = DemoConfig::load(&args)?;

    info!(ticks = args.ticks, seed = args.seed, tick_ms = cfg.engine.tick_duration_ms, "starting party");

    let world = build_world(args.seed)?;
    let loops = build_loops(&cfg)?;
    let mut party = Party::new(world, loops, cfg.engine.tick_duration_ms)?;

    let t0 = Instant::now();
    match &args.out {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let mut obs = TraceObserver::new(CsvTraceWriter::new(dir)?);
            party.run(args.ticks, &mut obs);
            if let Some(e) = obs.take_error() {
                eprintln!("trace error: {e}");
            }
            println!("Trace: {} rows in {}", obs.rows_written(), dir.display());
        }
        None => party.run(args.ticks, &mut NoopObserver),
    }
    println!("Ran {} ticks in {:.3} s", args.ticks, t0.elapsed().as_secs_f64());
    println!();

    let world = party.world();
    println!("{:<8} {:<9} {:>16} {:>7} {:>6} {:>6}", "Account", "Role", "Position", "Energy", "Grails", "Buffs");
    println!("{}", "-".repeat(57));
    for (i, (name, role, _)) in MEMBERS.iter().enumerate() {
        println!(
            "{:<8} {:<9} {:>16} {:>7.1} {:>6} {:>6}",
            name,
            role.as_str(),
            world.position_of(i).map(|p| p.to_string()).unwrap_or_default(),
            world.energy_of(i).unwrap_or_default(),
            world.items_used(i, GRAIL),
            world.buffs_received(i),
        );
    }
    Ok(())
}
