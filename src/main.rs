use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mstgraph::db::{migrate, Db};
use mstgraph::model::AiScope;
use mstgraph::store::MASTER_TABLES;
use mstgraph::{
    collect_ai_chain, quest_stage_enemies, CachedReverseIndex, Config, EntityGraph, EntityKind,
    ExpansionEngine, MasterStore, MstgraphError, ReverseDepth, ReverseIndex, SqliteReverseIndex,
};
use serde::Serialize;
use std::path::Path;

#[derive(Parser)]
#[command(name = "mstgraph", version, about = "Resolve master-data reference graphs")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Apply migrations and check the database schema
    Verify,
    /// Resolve an entity, optionally with the entities that use it
    Resolve {
        /// buff, function, skill, np, servant, mc or cc
        kind: EntityKind,
        id: i64,
        /// Include parents up to --depth
        #[arg(long)]
        reverse: bool,
        /// function, skill-np or servant
        #[arg(long)]
        depth: Option<ReverseDepth>,
    },
    /// Collect an AI and every AI it chains into
    Ai {
        id: i64,
        /// Read battlefield AI instead of servant AI
        #[arg(long)]
        field: bool,
    },
    /// List every enemy that can appear in each stage of a quest phase
    StageEnemies { quest_id: i64, phase: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    // Logs go to stderr so stdout stays pure JSON
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.mstgraph.log_level.as_str()),
    )
    .init();

    log::info!("Starting mstgraph v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Database path: {}", config.db_path().display());

    let db = Db::new(config.db_path());
    let command = cli.command.unwrap_or(Command::Verify);

    // Only `verify` creates tables; the other commands read an existing dataset
    if !matches!(command, Command::Verify) {
        db.with_connection(|conn| migrate::ensure_schema(conn)).await?;
    }
    let store = MasterStore::new(db.clone());

    match command {
        Command::Verify => {
            let report = verify_database_schema(&db).await?;
            print_json(&report)?;
        }
        Command::Resolve { kind, id, reverse, depth } => {
            let depth = depth.unwrap_or_else(|| kind.default_reverse_depth());
            let index = SqliteReverseIndex::new(db.clone());
            let capacity = config.cache.reverse_capacity;
            let graph = if capacity > 0 {
                resolve(&config, store, CachedReverseIndex::new(index, capacity), kind, id, reverse, depth).await?
            } else {
                resolve(&config, store, index, kind, id, reverse, depth).await?
            };
            print_json(&graph)?;
        }
        Command::Ai { id, field } => {
            let scope = if field { AiScope::Field } else { AiScope::Servant };
            let collection = collect_ai_chain(&store, id, scope).await?;
            log::info!(
                "AI {}: {} main, {} related in {} wave(s)",
                id,
                collection.main_ais.len(),
                collection.related_ais.len(),
                collection.waves
            );
            print_json(&collection)?;
        }
        Command::StageEnemies { quest_id, phase } => {
            let stages = quest_stage_enemies(&store, quest_id, phase).await?;
            print_json(&stages)?;
        }
    }

    Ok(())
}

async fn resolve<R: ReverseIndex>(
    config: &Config,
    store: MasterStore,
    index: R,
    kind: EntityKind,
    id: i64,
    reverse: bool,
    depth: ReverseDepth,
) -> Result<EntityGraph> {
    let engine = ExpansionEngine::new(store, index, config.region())
        .with_options(config.expansion.options());
    log::info!(
        "Resolving {} {} (reverse: {}, depth: {:?}, region: {})",
        kind.label(),
        id,
        reverse,
        depth,
        engine.region()
    );
    let graph = engine.resolve(kind, id, reverse, depth).await?;
    Ok(graph)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SchemaReport {
    newly_applied: Vec<String>,
    migrations: Vec<String>,
    journal_mode: String,
    integrity: String,
}

/// Create any missing tables, then check pragmas and integrity
async fn verify_database_schema(db: &Db) -> Result<SchemaReport> {
    let report = db
        .with_connection(|conn| {
            let outcome = migrate::migrate_master_schema(conn, Path::new("migrations"))?;
            log::debug!("✓ {} master and index tables present", MASTER_TABLES.len() + 1);

            let migrations = migrate::get_applied_migrations(conn)?;
            log::debug!("✓ {} migrations applied", migrations.len());

            let journal_mode: String = conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?;
            if journal_mode.to_uppercase() != "WAL" {
                return Err(MstgraphError::Config(format!("Journal mode is not WAL: {}", journal_mode)));
            }

            let integrity: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
            if integrity != "ok" {
                return Err(MstgraphError::Config(format!(
                    "Database integrity check failed: {}",
                    integrity
                )));
            }
            log::info!("✓ Database integrity: OK");

            Ok(SchemaReport {
                newly_applied: outcome.applied,
                migrations,
                journal_mode,
                integrity,
            })
        })
        .await?;

    log::info!("✓ Database schema verification complete");
    Ok(report)
}
