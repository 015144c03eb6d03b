//! Master-data records and the entity graphs assembled from them.
//!
//! `records` mirrors the stored rows one-to-one, `entity` holds the resolved
//! Buff/Function/Skill/NP/Servant graphs, `deck` the quest spawn model and
//! `ai` the AI action chain model.

pub mod ai;
pub mod deck;
pub mod entity;
pub mod records;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MstgraphError;

pub use ai::{AiCollection, AiEntity, AiScope, MstAi, MstAiAct, StageQuestRef};
pub use deck::{
    Deck, DeckKey, DeckSvt, DeckType, EnemyDeckInfo, MstStage, QuestDetail, TriggerScript,
};
pub use entity::{
    BuffEntity, CommandCodeEntity, EntityGraph, FunctionEntity, MysticCodeEntity,
    ReversedBuff, ReversedFunction, ReversedSkillTd, ServantEntity, SkillEntity,
    SkillLevelEntity, TdEntity, TdLevelEntity,
};

/// Game server region; reverse index data is kept per region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    #[default]
    JP,
    NA,
    CN,
    KR,
    TW,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::JP => "JP",
            Region::NA => "NA",
            Region::CN => "CN",
            Region::KR => "KR",
            Region::TW => "TW",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = MstgraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "JP" => Ok(Region::JP),
            "NA" => Ok(Region::NA),
            "CN" => Ok(Region::CN),
            "KR" => Ok(Region::KR),
            "TW" => Ok(Region::TW),
            other => Err(MstgraphError::InvalidInput(format!("unknown region: {}", other))),
        }
    }
}

/// How far up the layer stack reverse expansion may report parents.
///
/// This is a ceiling compared against each layer's fixed threshold, never a
/// counter: a Buff reports Functions from `Function` upward, a Function
/// reports Skills/NPs from `SkillNp` upward, and a Skill/NP reports owners
/// only at `Servant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReverseDepth {
    Function,
    SkillNp,
    Servant,
}

impl FromStr for ReverseDepth {
    type Err = MstgraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "function" => Ok(ReverseDepth::Function),
            "skillNp" | "skill-np" | "skill_np" => Ok(ReverseDepth::SkillNp),
            "servant" => Ok(ReverseDepth::Servant),
            other => Err(MstgraphError::InvalidInput(format!("unknown reverse depth: {}", other))),
        }
    }
}

/// Entity kinds that can be requested by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Buff,
    Function,
    Skill,
    Np,
    Servant,
    MysticCode,
    CommandCode,
}

impl EntityKind {
    /// Name used in `NotFound` errors.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Buff => "Buff",
            EntityKind::Function => "Function",
            EntityKind::Skill => "Skill",
            EntityKind::Np => "NP",
            EntityKind::Servant => "Servant",
            EntityKind::MysticCode => "Mystic Code",
            EntityKind::CommandCode => "Command Code",
        }
    }

    /// Default reverse depth for a request that does not name one.
    pub fn default_reverse_depth(&self) -> ReverseDepth {
        match self {
            EntityKind::Buff => ReverseDepth::Function,
            EntityKind::Function => ReverseDepth::SkillNp,
            _ => ReverseDepth::Servant,
        }
    }
}

impl FromStr for EntityKind {
    type Err = MstgraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buff" => Ok(EntityKind::Buff),
            "function" | "func" => Ok(EntityKind::Function),
            "skill" => Ok(EntityKind::Skill),
            "np" | "td" => Ok(EntityKind::Np),
            "servant" | "svt" => Ok(EntityKind::Servant),
            "mc" | "mystic-code" | "mysticCode" => Ok(EntityKind::MysticCode),
            "cc" | "command-code" | "commandCode" => Ok(EntityKind::CommandCode),
            other => Err(MstgraphError::InvalidInput(format!("unknown entity kind: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_depth_ordering() {
        assert!(ReverseDepth::Function < ReverseDepth::SkillNp);
        assert!(ReverseDepth::SkillNp < ReverseDepth::Servant);
        assert!(ReverseDepth::Servant >= ReverseDepth::Function);
    }

    #[test]
    fn test_reverse_depth_serde_names() {
        assert_eq!(serde_json::to_string(&ReverseDepth::SkillNp).unwrap(), "\"skillNp\"");
        let parsed: ReverseDepth = serde_json::from_str("\"servant\"").unwrap();
        assert_eq!(parsed, ReverseDepth::Servant);
        assert_eq!("skill-np".parse::<ReverseDepth>().unwrap(), ReverseDepth::SkillNp);
    }

    #[test]
    fn test_region_parse() {
        assert_eq!("na".parse::<Region>().unwrap(), Region::NA);
        assert!("EU".parse::<Region>().is_err());
        assert_eq!(Region::default().to_string(), "JP");
    }

    #[test]
    fn test_entity_kind_defaults() {
        assert_eq!(EntityKind::Buff.default_reverse_depth(), ReverseDepth::Function);
        assert_eq!(EntityKind::Function.default_reverse_depth(), ReverseDepth::SkillNp);
        assert_eq!(EntityKind::Np.default_reverse_depth(), ReverseDepth::Servant);
        assert_eq!("td".parse::<EntityKind>().unwrap(), EntityKind::Np);
    }
}
