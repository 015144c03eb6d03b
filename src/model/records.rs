//! Row types for the layered effect tables.
//!
//! Field names follow the stored camelCase columns when serialized.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstBuff {
    pub id: i64,
    pub buff_group: i64,
    #[serde(rename = "type")]
    pub buff_type: i64,
    pub name: String,
    pub detail: String,
    pub icon_id: i64,
    pub max_rate: i64,
    pub vals: Vec<i64>,
    pub tvals: Vec<i64>,
    pub ck_self_indv: Vec<i64>,
    pub ck_op_indv: Vec<i64>,
    pub script: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstFunc {
    pub id: i64,
    pub func_type: i64,
    pub target_type: i64,
    pub apply_target: i64,
    pub popup_text: String,
    /// Buff ids, unless the func type carries other values here.
    pub vals: Vec<i64>,
    pub tvals: Vec<i64>,
    pub quest_tvals: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstFuncGroup {
    pub func_id: i64,
    pub event_id: i64,
    pub base_func_id: i64,
    pub name: String,
    pub icon_id: i64,
    pub priority: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstSkill {
    pub id: i64,
    #[serde(rename = "type")]
    pub skill_type: i64,
    pub name: String,
    pub ruby: String,
    pub max_lv: i64,
    pub icon_id: i64,
    pub script: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstSkillLv {
    pub skill_id: i64,
    pub lv: i64,
    pub func_id: Vec<i64>,
    pub svals: Vec<String>,
    pub charge_turn: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstTreasureDevice {
    pub id: i64,
    pub name: String,
    pub ruby: String,
    pub rank: String,
    pub max_lv: i64,
    pub type_text: String,
    pub attack_attri: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstTreasureDeviceLv {
    pub treasure_device_id: i64,
    pub lv: i64,
    pub func_id: Vec<i64>,
    pub svals: Vec<String>,
    pub gauge_count: i64,
    pub td_point: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstSvt {
    pub id: i64,
    pub collection_no: i64,
    pub name: String,
    pub class_id: i64,
    #[serde(rename = "type")]
    pub svt_type: i64,
    pub cost: i64,
}

/// Active skill slot of a servant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstSvtSkill {
    pub svt_id: i64,
    pub num: i64,
    pub priority: i64,
    pub skill_id: i64,
    pub cond_quest_id: i64,
    pub cond_lv: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstSvtPassiveSkill {
    pub svt_id: i64,
    pub num: i64,
    pub priority: i64,
    pub skill_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstSvtTreasureDevice {
    pub svt_id: i64,
    pub num: i64,
    pub priority: i64,
    pub treasure_device_id: i64,
    pub card_id: i64,
}

/// Mystic Code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstEquip {
    pub id: i64,
    pub name: String,
    pub detail: String,
    pub max_lv: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstEquipSkill {
    pub equip_id: i64,
    pub num: i64,
    pub skill_id: i64,
    pub cond_lv: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstCommandCode {
    pub id: i64,
    pub collection_no: i64,
    pub name: String,
    pub rarity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstCommandCodeSkill {
    pub command_code_id: i64,
    pub num: i64,
    pub priority: i64,
    pub skill_id: i64,
}
