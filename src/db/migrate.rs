//! Schema setup for the master dataset.
//!
//! Each `NNN_name.sql` file in the migrations directory is applied once, in
//! version order, and recorded in `schema_migrations`. Only tables are created
//! here; rows come from the data loader.

use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MstgraphError, Result};
use crate::store::MASTER_TABLES;

/// Tables every read path expects besides the master tables.
const INDEX_TABLES: [&str; 1] = ["reverseIndex"];

/// A numbered schema file
#[derive(Debug)]
struct SchemaFile {
    version: u32,
    name: String,
    path: PathBuf,
}

impl SchemaFile {
    /// `None` for anything that is not a `.sql` file.
    fn parse(path: PathBuf) -> Result<Option<Self>> {
        if path.extension().and_then(|ext| ext.to_str()) != Some("sql") {
            return Ok(None);
        }
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| MstgraphError::Config(format!("Unreadable migration name: {}", path.display())))?
            .to_string();
        let version = name
            .split_once('_')
            .and_then(|(prefix, _)| prefix.parse::<u32>().ok())
            .ok_or_else(|| MstgraphError::Config(format!("Migration {} lacks an NNN_ version prefix", name)))?;
        Ok(Some(Self { version, name, path }))
    }
}

/// What a migration run changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationOutcome {
    /// Names applied by this run, in order
    pub applied: Vec<String>,
    /// Files skipped because an earlier run recorded them
    pub already_applied: usize,
}

fn schema_files(migrations_dir: &Path) -> Result<Vec<SchemaFile>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(migrations_dir)? {
        if let Some(file) = SchemaFile::parse(entry?.path())? {
            files.push(file);
        }
    }
    files.sort_by_key(|file| file.version);

    if let Some(pair) = files.windows(2).find(|pair| pair[0].version == pair[1].version) {
        return Err(MstgraphError::Config(format!(
            "Migrations {} and {} share version {}",
            pair[0].name, pair[1].name, pair[0].version
        )));
    }
    Ok(files)
}

fn recorded_versions(conn: &Connection) -> Result<HashSet<u32>> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
    )?;
    let mut stmt = conn.prepare("SELECT version FROM schema_migrations")?;
    let versions = stmt
        .query_map([], |row| row.get::<_, u32>(0))?
        .collect::<std::result::Result<HashSet<_>, _>>()?;
    Ok(versions)
}

/// Names of migrations already applied, in version order
pub fn get_applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    recorded_versions(conn)?;
    let mut stmt = conn.prepare("SELECT name FROM schema_migrations ORDER BY version")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(names)
}

/// Apply every schema file not yet recorded.
///
/// Each file runs in its own transaction together with its bookkeeping row,
/// so a failing file leaves no trace.
pub fn run_migrations(conn: &mut Connection, migrations_dir: &Path) -> Result<MigrationOutcome> {
    let recorded = recorded_versions(conn)?;
    let mut outcome = MigrationOutcome::default();

    for file in schema_files(migrations_dir)? {
        if recorded.contains(&file.version) {
            log::debug!("Migration {} already applied, skipping", file.name);
            outcome.already_applied += 1;
            continue;
        }

        let sql = fs::read_to_string(&file.path)?;
        log::info!("Applying migration: {} (version {})", file.name, file.version);

        let tx = conn.transaction()?;
        tx.execute_batch(&sql).map_err(|source| MstgraphError::Migration {
            name: file.name.clone(),
            source,
        })?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
            params![file.version, file.name],
        )?;
        tx.commit()?;
        outcome.applied.push(file.name);
    }

    log::info!(
        "Migrations: {} applied, {} already present",
        outcome.applied.len(),
        outcome.already_applied
    );
    Ok(outcome)
}

/// Master and index tables absent from the database
pub fn missing_tables(conn: &Connection) -> Result<Vec<&'static str>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<HashSet<_>, _>>()?;
    Ok(MASTER_TABLES
        .iter()
        .chain(INDEX_TABLES.iter())
        .copied()
        .filter(|table| !present.contains(*table))
        .collect())
}

/// Fail unless every table the resolvers read exists. Issues no DDL.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    let missing = missing_tables(conn)?;
    if missing.is_empty() {
        return Ok(());
    }
    for table in &missing {
        log::error!("Missing table: {}", table);
    }
    Err(MstgraphError::Config(format!(
        "Master dataset is missing tables: {}. Run `mstgraph verify` to create the schema.",
        missing.join(", ")
    )))
}

/// Apply the master-data migrations and confirm the resulting schema is complete.
pub fn migrate_master_schema(conn: &mut Connection, migrations_dir: &Path) -> Result<MigrationOutcome> {
    let outcome = run_migrations(conn, migrations_dir)?;
    ensure_schema(conn)?;
    Ok(outcome)
}
