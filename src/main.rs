// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use combat_labs::access::university;
use combat_labs::arena::{Arena, ArenaFighter};
use combat_labs::battle::Campaign;
use combat_labs::config::Config;
use combat_labs::console::{self, Console};
use combat_labs::demos::{run_lab, Lab};

#[derive(Parser)]
#[command(name = "combat-labs", version, about = "Console RPG labs: campaign, arena and access control")]
struct Cli {
    /// JSON config file; defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play the turn-based campaign
    Campaign {
        /// Hero name; asked for when omitted
        #[arg(long)]
        name: Option<String>,
    },
    /// University access-control menu
    Access,
    /// Let the hero fight spawning monsters until it falls
    Arena {
        /// Override the configured battle limit
        #[arg(long)]
        battles: Option<usize>,
    },
    /// Run one scripted lab, or all of them
    Demo {
        #[arg(value_enum)]
        lab: Option<Lab>,
    },
    /// Browse the access registry in a terminal UI
    Roster,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "combat_labs=info".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Command::Campaign { name } => run_campaign_mode(&config, name),
        Command::Access => run_access_mode(&config),
        Command::Arena { battles } => run_arena_mode(&config, battles),
        Command::Demo { lab } => run_demo_mode(&config, lab),
        Command::Roster => run_ui_mode(&config),
    }
}

fn run_campaign_mode(config: &Config, name: Option<String>) -> Result<()> {
    let mut console = Console::stdio();

    let name = match name {
        Some(name) => name,
        None => match console.prompt("Enter your character name: ")? {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => "Hero".to_string(),
        },
    };

    let mut campaign = Campaign::new(&name, config)
        .with_context(|| format!("when opening journal at {:?}", config.journal_path))?;

    match console::run_campaign(&mut console, &mut campaign) {
        Ok(()) => Ok(()),
        Err(e) if e.is_fatal() => {
            console.say("Game over!")?;
            tracing::info!(error = %e, "campaign ended");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

fn run_access_mode(config: &Config) -> Result<()> {
    let mut system = university()?;
    let mut console = Console::stdio();
    console::run_access(&mut console, &mut system, &config.users_path, &config.resources_path)?;
    Ok(())
}

fn run_arena_mode(config: &Config, battles: Option<usize>) -> Result<()> {
    let mut arena_config = config.arena.clone();
    if let Some(battles) = battles {
        arena_config.max_battles = battles;
    }

    let rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let arena = Arena::new(ArenaFighter::hero(), arena_config);
    let summary = arena.run(rng, |line| println!("{}", line))?;

    println!();
    println!("Battles fought: {}", summary.battles);
    println!("Monsters defeated: {}", summary.monsters_defeated);
    println!("Monsters spawned: {}", summary.spawned);
    if summary.hero_survived {
        println!("{} survived the arena!", arena.hero().name());
    } else {
        println!("{} has fallen. Game over!", arena.hero().name());
    }
    Ok(())
}

fn run_demo_mode(config: &Config, lab: Option<Lab>) -> Result<()> {
    let labs = match lab {
        Some(lab) => vec![lab],
        None => Lab::ALL.to_vec(),
    };

    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut out = io::stdout().lock();

    for lab in labs {
        writeln!(out, "━━━━━━━━━━━━ {} ━━━━━━━━━━━━", lab)?;
        run_lab(lab, &mut out, &mut rng, &config.roster_path)
            .with_context(|| format!("when running the {} lab", lab))?;
    }
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    let mut system = university()?;
    if config.users_path.exists() && config.resources_path.exists() {
        if let Err(e) = system.load(&config.users_path, &config.resources_path) {
            eprintln!("Could not load saved registry, showing defaults: {}", e);
        }
    }

    let mut app = ui::App::new(system);
    ui::run_ui(&mut app)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("Roster viewer not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    Err(combat_labs::GameError::InvalidArgument("tui feature disabled".to_string()).into())
}
