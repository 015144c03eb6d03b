//! AI action records.

use serde::{Deserialize, Serialize};

/// Which AI table a chain lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AiScope {
    /// Per-servant AI (`mstAi`).
    Servant,
    /// Battlefield AI (`mstAiField`).
    Field,
}

impl AiScope {
    pub fn table(&self) -> &'static str {
        match self {
            AiScope::Servant => "mstAi",
            AiScope::Field => "mstAiField",
        }
    }
}

/// One row of `mstAi` or `mstAiField`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstAi {
    pub id: i64,
    pub idx: i64,
    pub act_num: i64,
    pub priority: i64,
    pub probability: i64,
    pub cond: i64,
    pub vals: Vec<i64>,
    pub ai_act_id: i64,
    pub avals: Vec<i64>,
    pub info_text: String,
    /// Only set for field AI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<i64>,
}

impl MstAi {
    /// AI id this row chains to, if any.
    pub fn chain_target(&self) -> Option<i64> {
        self.avals.first().copied().filter(|&id| id > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstAiAct {
    pub id: i64,
    #[serde(rename = "type")]
    pub act_type: i64,
    pub target: i64,
    pub target_individuality: Vec<i64>,
    pub skill_vals: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiEntity {
    pub mst_ai: MstAi,
    pub mst_ai_act: Option<MstAiAct>,
}

impl AiEntity {
    pub fn chain_target(&self) -> Option<i64> {
        self.mst_ai.chain_target()
    }
}

/// A quest phase whose stages run a given field AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageQuestRef {
    pub quest_id: i64,
    pub quest_phase: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiCollection {
    pub main_ais: Vec<AiEntity>,
    pub related_ais: Vec<AiEntity>,
    pub related_quests: Vec<StageQuestRef>,
    /// Fetch rounds after the root; never more than the distinct chained ids.
    #[serde(skip)]
    pub waves: usize,
}
