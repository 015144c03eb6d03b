//! Fixpoint expansion of a stage's placed enemies through spawn triggers.

use std::collections::{HashMap, HashSet};

use crate::error::{MstgraphError, Result};
use crate::model::{DeckKey, DeckSvt, DeckType, EnemyDeckInfo, QuestDetail, TriggerScript};
use crate::store::MasterStore;

/// Deck slots reachable by npcId, per deck type.
#[derive(Debug, Clone, Default)]
pub struct NpcIdMap {
    slots: HashMap<DeckType, HashMap<i64, DeckSvt>>,
}

impl NpcIdMap {
    /// Index every deck list of a quest phase.
    ///
    /// All shift-like trigger kinds draw from the shift deck. When an npcId
    /// repeats within one list the later slot wins.
    pub fn from_quest_detail(detail: &QuestDetail) -> Self {
        let mut map = Self::default();
        for svt in detail.enemy_deck.iter().flat_map(|deck| &deck.svts) {
            map.insert(DeckType::Enemy, svt.clone());
        }
        for svt in detail.call_deck.iter().flat_map(|deck| &deck.svts) {
            map.insert(DeckType::Call, svt.clone());
        }
        for svt in detail.shift_deck.iter().flat_map(|deck| &deck.svts) {
            for deck_type in [
                DeckType::Shift,
                DeckType::Change,
                DeckType::SkillShift,
                DeckType::MissionTargetSkillShift,
            ] {
                map.insert(deck_type, svt.clone());
            }
        }
        map
    }

    pub fn insert(&mut self, deck_type: DeckType, svt: DeckSvt) {
        self.slots.entry(deck_type).or_default().insert(svt.npc_id, svt);
    }

    pub fn resolve(&self, deck_type: DeckType, npc_id: i64) -> Option<EnemyDeckInfo> {
        self.slots
            .get(&deck_type)
            .and_then(|slots| slots.get(&npc_id))
            .map(|svt| EnemyDeckInfo::new(deck_type, svt.clone()))
    }
}

/// Result of [`expand_decks`].
#[derive(Debug, Clone)]
pub struct DeckExpansion {
    /// Stage decks first, then spawned decks in discovery order.
    pub decks: Vec<EnemyDeckInfo>,
    /// Widening passes that found something new.
    pub iterations: usize,
}

/// Grow `stage_decks` with everything their triggers (and the stage-level
/// `call`) can spawn, until a pass finds nothing new.
///
/// Every pass rescans the whole found set so discovery order stays the same
/// as a naive scan. Identity is [`DeckKey`], which also ends trigger cycles.
pub fn expand_decks(
    stage_decks: Vec<EnemyDeckInfo>,
    stage_script: &TriggerScript,
    npc_id_map: &NpcIdMap,
) -> DeckExpansion {
    let mut found = stage_decks;
    let mut keys: HashSet<DeckKey> = found.iter().map(EnemyDeckInfo::key).collect();
    let mut iterations = 0;

    loop {
        let mut candidate_keys = HashSet::new();
        let mut newly_found = Vec::new();
        let mut consider = |info: EnemyDeckInfo| {
            let key = info.key();
            if candidate_keys.insert(key) && !keys.contains(&key) {
                newly_found.push(info);
            }
        };

        let triggers: Vec<TriggerScript> = found.iter().map(|info| info.deck.triggers()).collect();
        for (deck_type, _) in TriggerScript::KEYS {
            for script in &triggers {
                for &npc_id in script.npc_ids(deck_type).unwrap_or_default() {
                    if let Some(info) = lookup(npc_id_map, deck_type, npc_id) {
                        consider(info);
                    }
                }
            }
        }
        for &npc_id in stage_script.npc_ids(DeckType::Call).unwrap_or_default() {
            if let Some(info) = lookup(npc_id_map, DeckType::Call, npc_id) {
                consider(info);
            }
        }

        if newly_found.is_empty() {
            break;
        }
        iterations += 1;
        log::debug!("Deck expansion pass {} found {} deck(s)", iterations, newly_found.len());
        keys.extend(newly_found.iter().map(EnemyDeckInfo::key));
        found.extend(newly_found);
    }

    DeckExpansion { decks: found, iterations }
}

fn lookup(npc_id_map: &NpcIdMap, deck_type: DeckType, npc_id: i64) -> Option<EnemyDeckInfo> {
    let info = npc_id_map.resolve(deck_type, npc_id);
    if info.is_none() {
        log::debug!("No {:?} deck slot for npcId {}", deck_type, npc_id);
    }
    info
}

/// Organic roster of every stage: its enemy deck sorted by deck id, then the
/// transform deck. Spawn-bonus slots are left out.
pub fn stage_rosters(detail: &QuestDetail) -> Vec<Vec<EnemyDeckInfo>> {
    let transforms: Vec<&DeckSvt> = detail
        .transform_deck
        .svts
        .iter()
        .filter(|svt| !svt.is_spawn_bonus())
        .collect();

    detail
        .enemy_deck
        .iter()
        .map(|deck| {
            let mut enemies: Vec<&DeckSvt> = deck.svts.iter().filter(|svt| !svt.is_spawn_bonus()).collect();
            enemies.sort_by_key(|svt| svt.id);
            enemies
                .into_iter()
                .map(|svt| EnemyDeckInfo::new(DeckType::Enemy, svt.clone()))
                .chain(
                    transforms
                        .iter()
                        .map(|svt| EnemyDeckInfo::new(DeckType::Transform, (*svt).clone())),
                )
                .collect()
        })
        .collect()
}

/// Every enemy that can appear in each stage of a quest phase, one list per
/// stage in wave order.
pub async fn quest_stage_enemies(
    store: &MasterStore,
    quest_id: i64,
    phase: i64,
) -> Result<Vec<Vec<EnemyDeckInfo>>> {
    let detail = store
        .quest_detail(quest_id, phase)
        .await?
        .ok_or(MstgraphError::NotFound { kind: "Quest detail", id: quest_id })?;
    let stages = store.stages(quest_id, phase).await?;
    let npc_id_map = NpcIdMap::from_quest_detail(&detail);
    let mut rosters = stage_rosters(&detail).into_iter();

    let result = stages
        .iter()
        .map(|stage| {
            let roster = rosters.next().unwrap_or_default();
            let expansion = expand_decks(roster, &stage.triggers(), &npc_id_map);
            log::debug!(
                "Quest {} phase {} wave {}: {} enemies after {} pass(es)",
                quest_id,
                phase,
                stage.wave,
                expansion.decks.len(),
                expansion.iterations
            );
            expansion.decks
        })
        .collect();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Deck;
    use crate::testutil::{exec, test_store};
    use serde_json::{json, Value};

    fn svt(id: i64, npc_id: i64, enemy_script: Value) -> DeckSvt {
        DeckSvt {
            id,
            npc_id,
            enemy_script: enemy_script.as_object().cloned(),
            ..Default::default()
        }
    }

    fn keys(decks: &[EnemyDeckInfo]) -> Vec<(DeckType, i64)> {
        decks.iter().map(|d| (d.deck_type, d.deck.id)).collect()
    }

    #[test]
    fn test_single_call_trigger() {
        let mut map = NpcIdMap::default();
        map.insert(DeckType::Call, svt(2, 10, json!({})));
        let stage = vec![EnemyDeckInfo::new(DeckType::Enemy, svt(1, 1, json!({"call": [10]})))];

        let expansion = expand_decks(stage, &TriggerScript::default(), &map);
        assert_eq!(keys(&expansion.decks), vec![(DeckType::Enemy, 1), (DeckType::Call, 2)]);
        assert_eq!(expansion.iterations, 1);
    }

    #[test]
    fn test_no_triggers_is_identity() {
        let stage = vec![
            EnemyDeckInfo::new(DeckType::Enemy, svt(1, 1, json!({}))),
            EnemyDeckInfo::new(DeckType::Transform, svt(5, 5, json!({"call": []}))),
        ];
        let expansion = expand_decks(stage.clone(), &TriggerScript::default(), &NpcIdMap::default());
        assert_eq!(expansion.decks, stage);
        assert_eq!(expansion.iterations, 0);
    }

    #[test]
    fn test_cyclic_triggers_terminate() {
        let mut map = NpcIdMap::default();
        map.insert(DeckType::Shift, svt(20, 200, json!({"shift": [201]})));
        map.insert(DeckType::Shift, svt(21, 201, json!({"shift": [200]})));
        let stage = vec![EnemyDeckInfo::new(DeckType::Enemy, svt(1, 1, json!({"shift": [200]})))];

        let expansion = expand_decks(stage, &TriggerScript::default(), &map);
        assert_eq!(
            keys(&expansion.decks),
            vec![(DeckType::Enemy, 1), (DeckType::Shift, 20), (DeckType::Shift, 21)]
        );
        assert_eq!(expansion.iterations, 2);
    }

    #[test]
    fn test_expansion_is_idempotent() {
        let mut map = NpcIdMap::default();
        map.insert(DeckType::Call, svt(2, 10, json!({"change": [30]})));
        map.insert(DeckType::Change, svt(3, 30, json!({})));
        let stage = vec![EnemyDeckInfo::new(DeckType::Enemy, svt(1, 1, json!({"call": [10]})))];

        let once = expand_decks(stage, &TriggerScript::default(), &map);
        let twice = expand_decks(once.decks.clone(), &TriggerScript::default(), &map);
        assert_eq!(once.decks, twice.decks);
        assert_eq!(twice.iterations, 0);
    }

    #[test]
    fn test_cyclic_expansion_repeats_exactly() {
        let mut map = NpcIdMap::default();
        map.insert(DeckType::Shift, svt(20, 200, json!({"shift": [201]})));
        map.insert(DeckType::Shift, svt(21, 201, json!({"shift": [200], "call": [10]})));
        map.insert(DeckType::Call, svt(2, 10, json!({"change": [30]})));
        map.insert(DeckType::Change, svt(3, 30, json!({"shift": [200]})));
        let stage = vec![EnemyDeckInfo::new(DeckType::Enemy, svt(1, 1, json!({"shift": [200]})))];
        let stage_script = TriggerScript::from_value(&json!({"call": [10]}));

        let first = expand_decks(stage.clone(), &stage_script, &map);
        let second = expand_decks(stage, &stage_script, &map);
        assert_eq!(first.decks, second.decks);
        assert_eq!(first.iterations, second.iterations);
        assert_eq!(first.iterations, 2);
        assert_eq!(
            keys(&first.decks),
            vec![
                (DeckType::Enemy, 1),
                (DeckType::Shift, 20),
                (DeckType::Call, 2),
                (DeckType::Shift, 21),
                (DeckType::Change, 3),
            ]
        );

        // Its output is already closed under the triggers
        let again = expand_decks(first.decks.clone(), &stage_script, &map);
        assert_eq!(again.decks, first.decks);
        assert_eq!(again.iterations, 0);
    }

    #[test]
    fn test_discovery_order_is_kind_then_deck() {
        let mut map = NpcIdMap::default();
        map.insert(DeckType::Call, svt(40, 400, json!({})));
        map.insert(DeckType::Call, svt(41, 401, json!({})));
        map.insert(DeckType::Shift, svt(50, 500, json!({})));
        map.insert(DeckType::Call, svt(42, 402, json!({})));
        let stage = vec![
            EnemyDeckInfo::new(DeckType::Enemy, svt(1, 1, json!({"shift": [500], "call": [401]}))),
            EnemyDeckInfo::new(DeckType::Enemy, svt(2, 2, json!({"call": [400, 401]}))),
        ];
        let stage_script = TriggerScript::from_value(&json!({"call": [402, 400]}));

        let expansion = expand_decks(stage, &stage_script, &map);
        assert_eq!(
            keys(&expansion.decks),
            vec![
                (DeckType::Enemy, 1),
                (DeckType::Enemy, 2),
                (DeckType::Call, 41),
                (DeckType::Call, 40),
                (DeckType::Shift, 50),
                (DeckType::Call, 42),
            ]
        );
    }

    #[test]
    fn test_same_deck_id_in_different_lists_is_distinct() {
        let mut map = NpcIdMap::default();
        map.insert(DeckType::Call, svt(1, 10, json!({})));
        let stage = vec![EnemyDeckInfo::new(DeckType::Enemy, svt(1, 1, json!({"call": [10]})))];

        let expansion = expand_decks(stage, &TriggerScript::default(), &map);
        assert_eq!(keys(&expansion.decks), vec![(DeckType::Enemy, 1), (DeckType::Call, 1)]);
    }

    #[test]
    fn test_missing_npc_id_is_skipped() {
        let mut map = NpcIdMap::default();
        map.insert(DeckType::Call, svt(2, 10, json!({})));
        let stage = vec![EnemyDeckInfo::new(DeckType::Enemy, svt(1, 1, json!({"call": [99, 10], "skillShift": [7]})))];

        let expansion = expand_decks(stage, &TriggerScript::default(), &map);
        assert_eq!(keys(&expansion.decks), vec![(DeckType::Enemy, 1), (DeckType::Call, 2)]);
    }

    #[test]
    fn test_stage_call_seeds_empty_roster() {
        let mut map = NpcIdMap::default();
        map.insert(DeckType::Call, svt(2, 10, json!({"call": [11]})));
        map.insert(DeckType::Call, svt(3, 11, json!({})));
        let stage_script = TriggerScript::from_value(&json!({"call": [10], "shift": [10]}));

        let expansion = expand_decks(Vec::new(), &stage_script, &map);
        assert_eq!(keys(&expansion.decks), vec![(DeckType::Call, 2), (DeckType::Call, 3)]);
        assert_eq!(expansion.iterations, 2);
    }

    #[test]
    fn test_npc_id_map_shift_kinds_share_shift_deck() {
        let detail = QuestDetail {
            enemy_deck: vec![Deck { svts: vec![svt(1, 100, json!({}))] }],
            call_deck: vec![Deck { svts: vec![svt(2, 200, json!({}))] }],
            shift_deck: vec![Deck { svts: vec![svt(3, 300, json!({}))] }],
            transform_deck: Deck { svts: vec![svt(4, 400, json!({}))] },
        };
        let map = NpcIdMap::from_quest_detail(&detail);

        assert_eq!(map.resolve(DeckType::Enemy, 100).unwrap().deck.id, 1);
        assert_eq!(map.resolve(DeckType::Call, 200).unwrap().deck.id, 2);
        for deck_type in [DeckType::Shift, DeckType::Change, DeckType::SkillShift, DeckType::MissionTargetSkillShift] {
            let info = map.resolve(deck_type, 300).unwrap();
            assert_eq!(info.deck_type, deck_type);
            assert_eq!(info.deck.id, 3);
        }
        assert!(map.resolve(DeckType::Call, 300).is_none());
        assert!(map.resolve(DeckType::Transform, 400).is_none());
    }

    #[test]
    fn test_stage_rosters_sort_and_drop_spawn_bonus() {
        let mut bonus = svt(5, 500, json!({}));
        bonus.info_script = json!({"isAddition": 1}).as_object().cloned();
        let detail = QuestDetail {
            enemy_deck: vec![
                Deck { svts: vec![svt(3, 30, json!({})), bonus.clone(), svt(1, 10, json!({}))] },
                Deck { svts: vec![] },
            ],
            transform_deck: Deck { svts: vec![svt(9, 90, json!({}))] },
            ..Default::default()
        };

        let rosters = stage_rosters(&detail);
        assert_eq!(rosters.len(), 2);
        assert_eq!(
            keys(&rosters[0]),
            vec![(DeckType::Enemy, 1), (DeckType::Enemy, 3), (DeckType::Transform, 9)]
        );
        assert_eq!(keys(&rosters[1]), vec![(DeckType::Transform, 9)]);

        // Still reachable through a trigger
        let map = NpcIdMap::from_quest_detail(&detail);
        assert_eq!(map.resolve(DeckType::Enemy, 500).unwrap().deck.id, 5);
    }

    #[tokio::test]
    async fn test_quest_stage_enemies() {
        let (store, _tmp) = test_store().await;
        let detail = json!({
            "enemyDeck": [
                {"svts": [{"id": 1, "npcId": 100, "enemyScript": {"call": [200]}}]},
                {"svts": [{"id": 2, "npcId": 101}]},
            ],
            "callDeck": [{"svts": [
                {"id": 1, "npcId": 200, "enemyScript": {"shift": [300]}},
                {"id": 2, "npcId": 201},
            ]}],
            "shiftDeck": [{"svts": [{"id": 1, "npcId": 300}]}],
        });
        exec(&store, &format!(
            "INSERT INTO questDetail (questId, phase, detail) VALUES (94000101, 1, '{}'); \
             INSERT INTO mstStage (questId, questPhase, wave, script) VALUES \
                (94000101, 1, 2, '{{\"call\": [201]}}'), \
                (94000101, 1, 1, '{{}}'), \
                (94000101, 1, 3, '{{\"call\": [201, 999]}}');",
            detail
        ))
        .await;

        let stages = quest_stage_enemies(&store, 94000101, 1).await.unwrap();
        assert_eq!(stages.len(), 3);
        assert_eq!(
            keys(&stages[0]),
            vec![(DeckType::Enemy, 1), (DeckType::Call, 1), (DeckType::Shift, 1)]
        );
        assert_eq!(keys(&stages[1]), vec![(DeckType::Enemy, 2), (DeckType::Call, 2)]);
        assert_eq!(keys(&stages[2]), vec![(DeckType::Call, 2)]);
    }

    #[tokio::test]
    async fn test_quest_stage_enemies_missing_detail() {
        let (store, _tmp) = test_store().await;
        let err = quest_stage_enemies(&store, 1, 1).await.unwrap_err();
        assert!(err.is_not_found("Quest detail", 1));
    }
}
