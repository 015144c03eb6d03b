//! Quest spawn model: deck slots, trigger scripts and stages.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which deck list a placed enemy was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeckType {
    Enemy,
    Transform,
    Call,
    Shift,
    Change,
    SkillShift,
    MissionTargetSkillShift,
}

/// One slot of a deck as captured from the battle setup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeckSvt {
    pub id: i64,
    pub unique_id: i64,
    pub npc_id: i64,
    pub name: Option<String>,
    pub user_svt_id: i64,
    pub role_type: i64,
    pub enemy_script: Option<Map<String, Value>>,
    pub info_script: Option<Map<String, Value>>,
}

impl DeckSvt {
    /// Spawn triggers carried by this slot.
    pub fn triggers(&self) -> TriggerScript {
        self.enemy_script
            .as_ref()
            .map(TriggerScript::from_map)
            .unwrap_or_default()
    }

    /// Additively spawned rather than part of the organic stage roster.
    pub fn is_spawn_bonus(&self) -> bool {
        self.info_script
            .as_ref()
            .is_some_and(|script| script.contains_key("isAddition"))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Deck {
    pub svts: Vec<DeckSvt>,
}

/// Every deck list of one quest phase.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestDetail {
    /// One deck per stage, in stage order.
    pub enemy_deck: Vec<Deck>,
    pub call_deck: Vec<Deck>,
    pub shift_deck: Vec<Deck>,
    pub transform_deck: Deck,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MstStage {
    pub quest_id: i64,
    pub quest_phase: i64,
    pub wave: i64,
    pub name: String,
    pub script: Value,
}

impl MstStage {
    /// Stage-level triggers. Only `call` is honoured at stage level.
    pub fn triggers(&self) -> TriggerScript {
        TriggerScript::from_value(&self.script)
    }
}

/// Dedup identity of a placed enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckKey {
    pub deck_type: DeckType,
    pub deck_id: i64,
}

/// A placed enemy: the deck slot and the list it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyDeckInfo {
    pub deck_type: DeckType,
    pub deck: DeckSvt,
}

impl EnemyDeckInfo {
    pub fn new(deck_type: DeckType, deck: DeckSvt) -> Self {
        Self { deck_type, deck }
    }

    pub fn key(&self) -> DeckKey {
        DeckKey {
            deck_type: self.deck_type,
            deck_id: self.deck.id,
        }
    }
}

/// Spawn triggers keyed by kind.
///
/// `None` means the key is absent; `Some(vec![])` means it is present but
/// names nobody. Both spawn nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TriggerScript {
    pub call: Option<Vec<i64>>,
    pub shift: Option<Vec<i64>>,
    pub change: Option<Vec<i64>>,
    pub skill_shift: Option<Vec<i64>>,
    pub mission_target_skill_shift: Option<Vec<i64>>,
}

impl TriggerScript {
    /// Script key for each spawning deck type, in scan order.
    pub const KEYS: [(DeckType, &'static str); 5] = [
        (DeckType::Call, "call"),
        (DeckType::Shift, "shift"),
        (DeckType::Change, "change"),
        (DeckType::SkillShift, "skillShift"),
        (DeckType::MissionTargetSkillShift, "missionTargetSkillShift"),
    ];

    pub fn from_map(map: &Map<String, Value>) -> Self {
        let read = |key: &str| map.get(key).and_then(|value| npc_id_list(key, value));
        Self {
            call: read("call"),
            shift: read("shift"),
            change: read("change"),
            skill_shift: read("skillShift"),
            mission_target_skill_shift: read("missionTargetSkillShift"),
        }
    }

    /// Anything that is not a JSON object carries no triggers.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Self::default(),
        }
    }

    /// npcIds that spawn into `deck_type`, if the key is present.
    pub fn npc_ids(&self, deck_type: DeckType) -> Option<&[i64]> {
        let ids = match deck_type {
            DeckType::Call => &self.call,
            DeckType::Shift => &self.shift,
            DeckType::Change => &self.change,
            DeckType::SkillShift => &self.skill_shift,
            DeckType::MissionTargetSkillShift => &self.mission_target_skill_shift,
            DeckType::Enemy | DeckType::Transform => return None,
        };
        ids.as_deref()
    }
}

fn npc_id_list(key: &str, value: &Value) -> Option<Vec<i64>> {
    match value {
        Value::Array(items) => Some(items.iter().filter_map(Value::as_i64).collect()),
        other => {
            log::debug!("Ignoring non-list trigger {}: {}", key, other);
            None
        }
    }
}
