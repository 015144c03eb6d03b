//! Read primitives over the master dataset.
//!
//! Every table the resolvers touch implements [`MasterRecord`], which gives
//! the generic `fetch_one` / `fetch_all` / `fetch_many` / `fetch_by` queries
//! their table, key and parent columns. AI chains, stages and quest details
//! have bespoke queries below.

mod tables;

use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::db::Db;
use crate::error::{MstgraphError, Result};
use crate::model::{AiEntity, AiScope, MstAi, MstAiAct, MstStage, QuestDetail, StageQuestRef};

/// Tables created by the master-data migrations.
pub const MASTER_TABLES: [&str; 20] = [
    "mstBuff",
    "mstFunc",
    "mstFuncGroup",
    "mstSkill",
    "mstSkillLv",
    "mstTreasureDevice",
    "mstTreasureDeviceLv",
    "mstSvt",
    "mstSvtSkill",
    "mstSvtPassiveSkill",
    "mstSvtTreasureDevice",
    "mstEquip",
    "mstEquipSkill",
    "mstCommandCode",
    "mstCommandCodeSkill",
    "mstAi",
    "mstAiField",
    "mstAiAct",
    "mstStage",
    "questDetail",
];

/// A row type stored in one master table.
pub trait MasterRecord: Sized + Send + 'static {
    /// Label used in `NotFound` errors.
    const KIND: &'static str;
    const TABLE: &'static str;
    /// Comma-separated select list, in `from_row` order.
    const COLUMNS: &'static str;
    /// Column matched by `fetch_one` and `fetch_many`.
    const KEY: &'static str;
    /// Column matched by `fetch_all`.
    const PARENT: &'static str;
    const ORDER_BY: &'static str;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Value of the `KEY` column.
    fn key(&self) -> i64;
}

/// Master dataset backed by SQLite.
#[derive(Debug, Clone)]
pub struct MasterStore {
    db: Db,
}

impl MasterStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Record by key, or `None`.
    pub async fn fetch_one<T: MasterRecord>(&self, id: i64) -> Result<Option<T>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1 ORDER BY {} LIMIT 1",
            T::COLUMNS, T::TABLE, T::KEY, T::ORDER_BY
        );
        Ok(self.query::<T>(sql, vec![id]).await?.into_iter().next())
    }

    /// Record by key, failing with `NotFound` when absent.
    pub async fn get_one<T: MasterRecord>(&self, id: i64) -> Result<T> {
        self.fetch_one::<T>(id)
            .await?
            .ok_or(MstgraphError::NotFound { kind: T::KIND, id })
    }

    /// All rows owned by `parent_id`.
    pub async fn fetch_all<T: MasterRecord>(&self, parent_id: i64) -> Result<Vec<T>> {
        self.fetch_by::<T>(T::PARENT, parent_id).await
    }

    /// All rows whose `column` equals `value`.
    ///
    /// `column` must be one of the table's own column names.
    pub async fn fetch_by<T: MasterRecord>(&self, column: &'static str, value: i64) -> Result<Vec<T>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1 ORDER BY {}",
            T::COLUMNS, T::TABLE, column, T::ORDER_BY
        );
        self.query::<T>(sql, vec![value]).await
    }

    /// Records for `ids`, ordered by first position in `ids`.
    ///
    /// Ids with no record are left out.
    pub async fn fetch_many<T: MasterRecord>(&self, ids: &[i64]) -> Result<Vec<T>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let sql = format!(
            "SELECT {} FROM {} WHERE {} IN ({}) ORDER BY {}",
            T::COLUMNS, T::TABLE, T::KEY, placeholders, T::ORDER_BY
        );
        let mut records = self.query::<T>(sql, ids.to_vec()).await?;
        records.sort_by_key(|record| {
            ids.iter().position(|&id| id == record.key()).unwrap_or(usize::MAX)
        });
        Ok(records)
    }

    async fn query<T: MasterRecord>(&self, sql: String, params: Vec<i64>) -> Result<Vec<T>> {
        self.db
            .with_connection(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| T::from_row(row))?;
                let mut out = Vec::new();
                for row in rows {
                    out.push(row?);
                }
                Ok(out)
            })
            .await
    }

    /// AI rows for `ai_id` in `scope`, each joined with its action, ordered by idx.
    pub async fn ai_entities(&self, scope: AiScope, ai_id: i64) -> Result<Vec<AiEntity>> {
        let sql = format!(
            "SELECT a.id, a.idx, a.actNum, a.priority, a.probability, a.cond, a.vals, \
                    a.aiActId, a.avals, a.infoText, a.timing, \
                    act.id, act.type, act.target, act.targetIndividuality, act.skillVals \
             FROM {} a LEFT JOIN mstAiAct act ON act.id = a.aiActId \
             WHERE a.id = ?1 \
             ORDER BY a.idx",
            scope.table()
        );
        self.db
            .with_connection(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([ai_id], |row| {
                    let mst_ai = MstAi {
                        id: row.get(0)?,
                        idx: row.get(1)?,
                        act_num: row.get(2)?,
                        priority: row.get(3)?,
                        probability: row.get(4)?,
                        cond: row.get(5)?,
                        vals: json_column(row, 6)?,
                        ai_act_id: row.get(7)?,
                        avals: json_column(row, 8)?,
                        info_text: row.get(9)?,
                        timing: row.get(10)?,
                    };
                    let mst_ai_act = match row.get::<_, Option<i64>>(11)? {
                        Some(id) => Some(MstAiAct {
                            id,
                            act_type: row.get(12)?,
                            target: row.get(13)?,
                            target_individuality: json_column(row, 14)?,
                            skill_vals: json_column(row, 15)?,
                        }),
                        None => None,
                    };
                    Ok(AiEntity { mst_ai, mst_ai_act })
                })?;
                let mut out = Vec::new();
                for row in rows {
                    out.push(row?);
                }
                Ok(out)
            })
            .await
    }

    /// Quest phases with a stage whose script lists `ai_id` under `aiFieldIds`.
    pub async fn quests_using_field_ai(&self, ai_id: i64) -> Result<Vec<StageQuestRef>> {
        self.db
            .with_connection(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT DISTINCT s.questId, s.questPhase \
                     FROM mstStage s, \
                          json_each(CASE WHEN json_valid(s.script) THEN s.script ELSE '{}' END, '$.aiFieldIds') j \
                     WHERE j.value = ?1 \
                     ORDER BY s.questId, s.questPhase",
                )?;
                let rows = stmt.query_map([ai_id], |row| {
                    Ok(StageQuestRef {
                        quest_id: row.get(0)?,
                        quest_phase: row.get(1)?,
                    })
                })?;
                let mut out = Vec::new();
                for row in rows {
                    out.push(row?);
                }
                Ok(out)
            })
            .await
    }

    /// Stages of a quest phase ordered by wave.
    pub async fn stages(&self, quest_id: i64, phase: i64) -> Result<Vec<MstStage>> {
        self.db
            .with_connection(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT questId, questPhase, wave, name, script FROM mstStage \
                     WHERE questId = ?1 AND questPhase = ?2 \
                     ORDER BY wave",
                )?;
                let rows = stmt.query_map([quest_id, phase], |row| {
                    Ok(MstStage {
                        quest_id: row.get(0)?,
                        quest_phase: row.get(1)?,
                        wave: row.get(2)?,
                        name: row.get(3)?,
                        script: script_column(row, 4)?,
                    })
                })?;
                let mut out = Vec::new();
                for row in rows {
                    out.push(row?);
                }
                Ok(out)
            })
            .await
    }

    /// Captured deck lists of a quest phase.
    pub async fn quest_detail(&self, quest_id: i64, phase: i64) -> Result<Option<QuestDetail>> {
        let detail: Option<String> = self
            .db
            .with_connection(move |conn| {
                conn.query_row(
                    "SELECT detail FROM questDetail WHERE questId = ?1 AND phase = ?2",
                    [quest_id, phase],
                    |row| row.get(0),
                )
                .optional()
                .map_err(MstgraphError::from)
            })
            .await?;
        detail
            .map(|text| serde_json::from_str(&text).map_err(MstgraphError::from))
            .transpose()
    }
}

/// Decode a JSON text column that must be well formed (id and value lists).
pub(crate) fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Decode a free-form script column; malformed payloads read as `null`.
pub(crate) fn script_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Value> {
    let text: Option<String> = row.get(idx)?;
    Ok(match text {
        Some(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
            log::warn!("Malformed script payload ignored: {}", e);
            Value::Null
        }),
        None => Value::Null,
    })
}
