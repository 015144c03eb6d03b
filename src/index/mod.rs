//! Reverse adjacency lookups: "which ids point at this one?".
//!
//! The index is produced by the data loader alongside the master tables and
//! is only read here. An id nobody points at has no entry and reads as an
//! empty list.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use rusqlite::OptionalExtension;
use serde::Serialize;

use crate::cache::ReverseLookupCache;
use crate::db::Db;
use crate::error::{MstgraphError, Result};
use crate::model::Region;

/// Edge kinds kept in the reverse index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReverseKind {
    BuffToFunc,
    FuncToSkill,
    FuncToTd,
    TdToSvt,
    ActiveSkillToSvt,
    PassiveSkillToSvt,
    SkillToMc,
    SkillToCc,
}

impl ReverseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReverseKind::BuffToFunc => "buff_to_func",
            ReverseKind::FuncToSkill => "func_to_skill",
            ReverseKind::FuncToTd => "func_to_td",
            ReverseKind::TdToSvt => "td_to_svt",
            ReverseKind::ActiveSkillToSvt => "active_skill_to_svt",
            ReverseKind::PassiveSkillToSvt => "passive_skill_to_svt",
            ReverseKind::SkillToMc => "skill_to_mc",
            ReverseKind::SkillToCc => "skill_to_cc",
        }
    }
}

impl fmt::Display for ReverseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query side of the reverse index.
pub trait ReverseIndex: Send + Sync {
    /// Ids referring to `id` through `kind`, or empty when there are none.
    fn lookup(
        &self,
        region: Region,
        kind: ReverseKind,
        id: i64,
    ) -> impl Future<Output = Result<Vec<i64>>> + Send;
}

impl<R: ReverseIndex> ReverseIndex for Arc<R> {
    fn lookup(
        &self,
        region: Region,
        kind: ReverseKind,
        id: i64,
    ) -> impl Future<Output = Result<Vec<i64>>> + Send {
        self.as_ref().lookup(region, kind, id)
    }
}

/// Reverse index stored in the `reverseIndex` table as JSON id lists.
#[derive(Debug, Clone)]
pub struct SqliteReverseIndex {
    db: Db,
}

impl SqliteReverseIndex {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

impl ReverseIndex for SqliteReverseIndex {
    async fn lookup(&self, region: Region, kind: ReverseKind, id: i64) -> Result<Vec<i64>> {
        let stored: Option<String> = self
            .db
            .with_connection(move |conn| {
                conn.query_row(
                    "SELECT refIds FROM reverseIndex WHERE region = ?1 AND kind = ?2 AND itemId = ?3",
                    rusqlite::params![region.as_str(), kind.as_str(), id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(MstgraphError::from)
            })
            .await?;

        match stored {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(Vec::new()),
        }
    }
}

/// Memoizes lookups of an inner index in an LRU cache.
///
/// The index is a read-only snapshot, so entries never go stale while the
/// process serves the same dataset.
pub struct CachedReverseIndex<R> {
    inner: R,
    cache: ReverseLookupCache,
}

impl<R: ReverseIndex> CachedReverseIndex<R> {
    pub fn new(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            cache: ReverseLookupCache::new(capacity),
        }
    }

    pub fn cache(&self) -> &ReverseLookupCache {
        &self.cache
    }
}

impl<R: ReverseIndex> ReverseIndex for CachedReverseIndex<R> {
    async fn lookup(&self, region: Region, kind: ReverseKind, id: i64) -> Result<Vec<i64>> {
        if let Some(ids) = self.cache.get(region, kind, id) {
            return Ok(ids);
        }
        let ids = self.inner.lookup(region, kind, id).await?;
        self.cache.put(region, kind, id, ids.clone());
        Ok(ids)
    }
}
