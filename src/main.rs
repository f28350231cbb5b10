use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::error;

use plugin_upgrade_guard::backend::{BackendKind, select};
use plugin_upgrade_guard::config::{EngineConfig, log_path};
use plugin_upgrade_guard::engine::PluginEngine;
use plugin_upgrade_guard::lifecycle::SchemaMigrator;
use plugin_upgrade_guard::logging;
use plugin_upgrade_guard::upgrade::{SqliteHistoryStore, UpgradeHistoryStore};
use plugin_upgrade_guard::version::{HostVersion, StaticVersionSource};

#[derive(Parser)]
#[command(name = "plugin-upgrade-guard")]
#[command(version, about = "Upgrade history and initialisation guard for hosted plugins")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the startup sequence against the configured databases
    Start {
        #[arg(long)]
        host_version: String,
    },
    /// List recorded upgrade runs
    History {
        #[arg(long)]
        json: bool,
    },
    /// Show which cache backend a host version gets
    Backend {
        #[arg(long)]
        host_version: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let _guard = logging::init(&config.log, &log_path())?;

    match cli.command {
        Command::Start { host_version } => start(&config, host_version),
        Command::History { json } => history(&config, json),
        Command::Backend { host_version } => {
            let version = HostVersion::parse(&host_version)?;
            println!("{}", select(version, config.backend_threshold));
            Ok(())
        }
    }
}

fn start(config: &EngineConfig, host_version: String) -> anyhow::Result<()> {
    let history = open_history(config)?;
    let engine = PluginEngine::start(
        config,
        &StaticVersionSource::new(host_version),
        SchemaMigrator::new(config.data_db_path()),
        history,
        &|kind: BackendKind| kind,
    )?;

    println!("host version: {}", engine.host_version());
    println!("cache backend: {}", engine.backend());

    if let Err(e) = engine.initialise() {
        error!("Startup aborted: {}", e);
        println!("lifecycle: {}", engine.lifecycle().state_name());
        return Err(e.into());
    }

    let db = engine.handle()?;
    println!("lifecycle: {}", engine.lifecycle().state_name());
    println!("schema version: {}", db.schema_version());

    if let Some(transition) = engine.lifecycle().history().last_transition()? {
        match transition.previous_version {
            Some(previous) => println!(
                "last run: {} -> {}",
                previous, transition.current_version
            ),
            None => println!("last run: fresh install on {}", transition.current_version),
        }
    }

    Ok(())
}

fn history(config: &EngineConfig, json: bool) -> anyhow::Result<()> {
    let store = UpgradeHistoryStore::new(open_history(config)?);
    let records = store.records()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for record in records {
        println!(
            "{}  host {:<8} plugin {:<10} change {:<12} took {}{}",
            record.ran_on_display,
            record.build_number,
            record.plugin_version,
            record.change_set,
            record.time_taken,
            if record.is_start_record { "  (start)" } else { "" }
        );
    }
    Ok(())
}

fn open_history(config: &EngineConfig) -> anyhow::Result<SqliteHistoryStore> {
    let path = config.history_db_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {dir:?}"))?;
    }
    Ok(SqliteHistoryStore::open(&path)?)
}
