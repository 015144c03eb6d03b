//! Resolved entity graphs.
//!
//! Forward children are always inlined. `reverse` is `None` when reverse
//! expansion was not requested or the depth ceiling is below the layer's
//! threshold, and `Some` (possibly with empty lists) once it was performed.

use serde::Serialize;

use super::records::{
    MstBuff, MstCommandCode, MstEquip, MstFunc, MstFuncGroup, MstSkill, MstSkillLv, MstSvt,
    MstSvtSkill, MstSvtTreasureDevice, MstTreasureDevice, MstTreasureDeviceLv,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuffEntity {
    pub mst_buff: MstBuff,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<ReversedBuff>,
}

/// Functions that apply a buff.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReversedBuff {
    pub function: Vec<FunctionEntity>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEntity {
    pub mst_func: MstFunc,
    pub mst_func_group: Vec<MstFuncGroup>,
    /// Buffs named by `mst_func.vals`, in vals order.
    pub expanded_vals: Vec<BuffEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<ReversedFunction>,
}

/// Skills and NPs that use a function.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReversedFunction {
    pub skill: Vec<SkillEntity>,
    #[serde(rename = "NP")]
    pub np: Vec<TdEntity>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillLevelEntity {
    #[serde(flatten)]
    pub level: MstSkillLv,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_func_id: Option<Vec<FunctionEntity>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntity {
    pub mst_skill: MstSkill,
    pub mst_skill_lv: Vec<SkillLevelEntity>,
    pub mst_svt_skill: Vec<MstSvtSkill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<ReversedSkillTd>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TdLevelEntity {
    #[serde(flatten)]
    pub level: MstTreasureDeviceLv,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_func_id: Option<Vec<FunctionEntity>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TdEntity {
    pub mst_treasure_device: MstTreasureDevice,
    pub mst_treasure_device_lv: Vec<TdLevelEntity>,
    pub mst_svt_treasure_device: Vec<MstSvtTreasureDevice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<ReversedSkillTd>,
}

/// Owners of a skill or NP. NPs only ever fill `servant`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReversedSkillTd {
    pub servant: Vec<ServantEntity>,
    #[serde(rename = "MC")]
    pub mystic_code: Vec<MysticCodeEntity>,
    #[serde(rename = "CC")]
    pub command_code: Vec<CommandCodeEntity>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServantEntity {
    pub mst_svt: MstSvt,
    /// Active skills.
    pub mst_skill: Vec<SkillEntity>,
    pub mst_passive_skill: Vec<SkillEntity>,
    /// Own NPs, without the shared extra-attack NP.
    pub mst_treasure_device: Vec<TdEntity>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MysticCodeEntity {
    pub mst_equip: MstEquip,
    pub mst_skill: Vec<SkillEntity>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandCodeEntity {
    pub mst_command_code: MstCommandCode,
    pub mst_skill: Vec<SkillEntity>,
}

/// Result of a kind-dispatched resolve.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EntityGraph {
    Buff(BuffEntity),
    Function(FunctionEntity),
    Skill(SkillEntity),
    Np(TdEntity),
    Servant(ServantEntity),
    MysticCode(MysticCodeEntity),
    CommandCode(CommandCodeEntity),
}

impl EntityGraph {
    /// Id of the root record.
    pub fn id(&self) -> i64 {
        match self {
            EntityGraph::Buff(e) => e.mst_buff.id,
            EntityGraph::Function(e) => e.mst_func.id,
            EntityGraph::Skill(e) => e.mst_skill.id,
            EntityGraph::Np(e) => e.mst_treasure_device.id,
            EntityGraph::Servant(e) => e.mst_svt.id,
            EntityGraph::MysticCode(e) => e.mst_equip.id,
            EntityGraph::CommandCode(e) => e.mst_command_code.id,
        }
    }
}
