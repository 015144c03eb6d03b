//! Entity resolution with optional reverse (parent) expansion.
//!
//! Forward children are always inlined one layer down. Reverse expansion
//! walks strictly upward Buff -> Function -> Skill/NP -> Servant/MC/CC, so
//! it ends after at most four hops whatever the dataset size.

use std::collections::{BTreeSet, HashMap, HashSet};

use futures_util::future::try_join_all;

use crate::error::{MstgraphError, Result};
use crate::index::{ReverseIndex, ReverseKind};
use crate::model::records::{
    MstBuff, MstCommandCode, MstCommandCodeSkill, MstEquip, MstEquipSkill, MstFunc,
    MstFuncGroup, MstSkill, MstSkillLv, MstSvt, MstSvtPassiveSkill, MstSvtSkill,
    MstSvtTreasureDevice, MstTreasureDevice, MstTreasureDeviceLv,
};
use crate::model::{
    BuffEntity, CommandCodeEntity, EntityGraph, EntityKind, FunctionEntity, MysticCodeEntity,
    Region, ReverseDepth, ReversedBuff, ReversedFunction, ReversedSkillTd, ServantEntity,
    SkillEntity, SkillLevelEntity, TdEntity, TdLevelEntity,
};
use crate::store::{MasterRecord, MasterStore};

/// Extra-attack NP shared by every servant; never listed as a servant's own NP.
pub const EXTRA_ATTACK_TD_ID: i64 = 100;

/// Knobs for forward expansion.
#[derive(Debug, Clone)]
pub struct ExpansionOptions {
    /// Inline resolved functions into skill/NP levels.
    pub expand_functions: bool,
    /// Func types whose `vals` are not buff ids.
    pub non_buff_func_types: HashSet<i64>,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            expand_functions: true,
            non_buff_func_types: HashSet::new(),
        }
    }
}

/// Resolves entities from the store, consulting the reverse index for parents.
pub struct ExpansionEngine<R> {
    store: MasterStore,
    index: R,
    region: Region,
    options: ExpansionOptions,
}

impl<R: ReverseIndex> ExpansionEngine<R> {
    pub fn new(store: MasterStore, index: R, region: Region) -> Self {
        Self {
            store,
            index,
            region,
            options: ExpansionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExpansionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Resolve any entity kind by id.
    ///
    /// `reverse` and `depth` are ignored for Servant, Mystic Code and Command
    /// Code, which have no parents.
    pub async fn resolve(
        &self,
        kind: EntityKind,
        id: i64,
        reverse: bool,
        depth: ReverseDepth,
    ) -> Result<EntityGraph> {
        Ok(match kind {
            EntityKind::Buff => EntityGraph::Buff(self.buff(id, reverse, depth).await?),
            EntityKind::Function => EntityGraph::Function(self.function(id, reverse, depth).await?),
            EntityKind::Skill => EntityGraph::Skill(self.skill(id, reverse, depth).await?),
            EntityKind::Np => EntityGraph::Np(self.noble_phantasm(id, reverse, depth).await?),
            EntityKind::Servant => EntityGraph::Servant(self.servant(id).await?),
            EntityKind::MysticCode => EntityGraph::MysticCode(self.mystic_code(id).await?),
            EntityKind::CommandCode => EntityGraph::CommandCode(self.command_code(id).await?),
        })
    }

    /// Buff, plus the functions applying it once `depth >= Function`.
    pub async fn buff(&self, id: i64, reverse: bool, depth: ReverseDepth) -> Result<BuffEntity> {
        let mst_buff = self.store.get_one::<MstBuff>(id).await?;
        let mut entity = BuffEntity { mst_buff, reverse: None };

        if reverse && depth >= ReverseDepth::Function {
            let func_ids = self.referrers(ReverseKind::BuffToFunc, id).await?;
            let function = try_join_all(func_ids.into_iter().map(|func_id| async move {
                self.function(func_id, reverse, depth)
                    .await
                    .map_err(index_fault::<MstFunc>(ReverseKind::BuffToFunc, func_id))
            }))
            .await?;
            entity.reverse = Some(ReversedBuff { function });
        }
        Ok(entity)
    }

    /// Function with its buffs, plus the skills/NPs using it once `depth >= SkillNp`.
    pub async fn function(&self, id: i64, reverse: bool, depth: ReverseDepth) -> Result<FunctionEntity> {
        let mst_func = self.store.get_one::<MstFunc>(id).await?;
        let mut entity = self.function_forward(mst_func).await?;

        if reverse && depth >= ReverseDepth::SkillNp {
            let skill_ids = self.referrers(ReverseKind::FuncToSkill, id).await?;
            let td_ids = self.referrers(ReverseKind::FuncToTd, id).await?;

            let skill = try_join_all(skill_ids.into_iter().map(|skill_id| async move {
                self.skill(skill_id, reverse, depth)
                    .await
                    .map_err(index_fault::<MstSkill>(ReverseKind::FuncToSkill, skill_id))
            }))
            .await?;
            let np = try_join_all(td_ids.into_iter().map(|td_id| async move {
                self.noble_phantasm(td_id, reverse, depth)
                    .await
                    .map_err(index_fault::<MstTreasureDevice>(ReverseKind::FuncToTd, td_id))
            }))
            .await?;
            entity.reverse = Some(ReversedFunction { skill, np });
        }
        Ok(entity)
    }

    /// Skill with its levels, plus owning servants/MCs/CCs once `depth >= Servant`.
    pub async fn skill(&self, id: i64, reverse: bool, depth: ReverseDepth) -> Result<SkillEntity> {
        let mst_skill = self.store.get_one::<MstSkill>(id).await?;
        let mut entity = self.skill_forward(mst_skill).await?;

        if reverse && depth >= ReverseDepth::Servant {
            let mut active: BTreeSet<i64> = entity.mst_svt_skill.iter().map(|s| s.svt_id).collect();
            active.extend(self.referrers(ReverseKind::ActiveSkillToSvt, id).await?);
            let passive = self.referrers(ReverseKind::PassiveSkillToSvt, id).await?;
            let mc_ids = self.referrers(ReverseKind::SkillToMc, id).await?;
            let cc_ids = self.referrers(ReverseKind::SkillToCc, id).await?;

            let owners: BTreeSet<i64> = active.iter().copied().chain(passive).collect();
            let servant = try_join_all(owners.into_iter().map(|svt_id| {
                let index = if active.contains(&svt_id) {
                    ReverseKind::ActiveSkillToSvt
                } else {
                    ReverseKind::PassiveSkillToSvt
                };
                async move {
                    self.servant(svt_id)
                        .await
                        .map_err(index_fault::<MstSvt>(index, svt_id))
                }
            }))
            .await?;
            let mystic_code = try_join_all(mc_ids.into_iter().map(|mc_id| async move {
                self.mystic_code(mc_id)
                    .await
                    .map_err(index_fault::<MstEquip>(ReverseKind::SkillToMc, mc_id))
            }))
            .await?;
            let command_code = try_join_all(cc_ids.into_iter().map(|cc_id| async move {
                self.command_code(cc_id)
                    .await
                    .map_err(index_fault::<MstCommandCode>(ReverseKind::SkillToCc, cc_id))
            }))
            .await?;

            entity.reverse = Some(ReversedSkillTd {
                servant,
                mystic_code,
                command_code,
            });
        }
        Ok(entity)
    }

    /// NP with its levels, plus owning servants once `depth >= Servant`.
    pub async fn noble_phantasm(&self, id: i64, reverse: bool, depth: ReverseDepth) -> Result<TdEntity> {
        let mst_treasure_device = self.store.get_one::<MstTreasureDevice>(id).await?;
        let mut entity = self.td_forward(mst_treasure_device).await?;

        if reverse && depth >= ReverseDepth::Servant {
            let mut owners: BTreeSet<i64> =
                entity.mst_svt_treasure_device.iter().map(|t| t.svt_id).collect();
            owners.extend(self.referrers(ReverseKind::TdToSvt, id).await?);

            let servant = try_join_all(owners.into_iter().map(|svt_id| async move {
                self.servant(svt_id)
                    .await
                    .map_err(index_fault::<MstSvt>(ReverseKind::TdToSvt, svt_id))
            }))
            .await?;
            entity.reverse = Some(ReversedSkillTd {
                servant,
                ..Default::default()
            });
        }
        Ok(entity)
    }

    /// Servant with its skills and its own NPs.
    pub async fn servant(&self, id: i64) -> Result<ServantEntity> {
        let mst_svt = self.store.get_one::<MstSvt>(id).await?;
        let active = self.store.fetch_all::<MstSvtSkill>(id).await?;
        let passive = self.store.fetch_all::<MstSvtPassiveSkill>(id).await?;
        let tds = self.store.fetch_all::<MstSvtTreasureDevice>(id).await?;

        let skill_ids = dedup(active.iter().map(|s| s.skill_id));
        let passive_ids = dedup(passive.iter().map(|s| s.skill_id));
        let td_ids = dedup(
            tds.iter()
                .map(|t| t.treasure_device_id)
                .filter(|&td_id| td_id != EXTRA_ATTACK_TD_ID),
        );

        Ok(ServantEntity {
            mst_svt,
            mst_skill: self.skills_forward(&skill_ids).await?,
            mst_passive_skill: self.skills_forward(&passive_ids).await?,
            mst_treasure_device: self.tds_forward(&td_ids).await?,
        })
    }

    pub async fn mystic_code(&self, id: i64) -> Result<MysticCodeEntity> {
        let mst_equip = self.store.get_one::<MstEquip>(id).await?;
        let slots = self.store.fetch_all::<MstEquipSkill>(id).await?;
        let skill_ids = dedup(slots.iter().map(|s| s.skill_id));
        Ok(MysticCodeEntity {
            mst_equip,
            mst_skill: self.skills_forward(&skill_ids).await?,
        })
    }

    pub async fn command_code(&self, id: i64) -> Result<CommandCodeEntity> {
        let mst_command_code = self.store.get_one::<MstCommandCode>(id).await?;
        let slots = self.store.fetch_all::<MstCommandCodeSkill>(id).await?;
        let skill_ids = dedup(slots.iter().map(|s| s.skill_id));
        Ok(CommandCodeEntity {
            mst_command_code,
            mst_skill: self.skills_forward(&skill_ids).await?,
        })
    }

    /// Ids pointing at `id` through `kind`, first occurrence kept.
    async fn referrers(&self, kind: ReverseKind, id: i64) -> Result<Vec<i64>> {
        let ids = dedup(self.index.lookup(self.region, kind, id).await?);
        log::debug!("{} {} -> {} referrer(s)", kind, id, ids.len());
        Ok(ids)
    }

    async fn function_forward(&self, mst_func: MstFunc) -> Result<FunctionEntity> {
        let mst_func_group = self.store.fetch_all::<MstFuncGroup>(mst_func.id).await?;
        let expanded_vals = if self.options.non_buff_func_types.contains(&mst_func.func_type) {
            Vec::new()
        } else {
            let buffs = self.store.fetch_many::<MstBuff>(&mst_func.vals).await?;
            in_request_order(&mst_func.vals, buffs)
                .into_iter()
                .map(|mst_buff| BuffEntity { mst_buff, reverse: None })
                .collect()
        };
        Ok(FunctionEntity {
            mst_func,
            mst_func_group,
            expanded_vals,
            reverse: None,
        })
    }

    /// Functions of one skill/NP level, keeping `funcId` positions so they
    /// stay aligned with the level's `svals`. Unknown ids are dropped.
    async fn level_functions(&self, func_ids: &[i64]) -> Result<Option<Vec<FunctionEntity>>> {
        if !self.options.expand_functions {
            return Ok(None);
        }
        let funcs = self.store.fetch_many::<MstFunc>(func_ids).await?;
        let ordered = in_request_order(func_ids, funcs);
        let functions = try_join_all(ordered.into_iter().map(|f| self.function_forward(f))).await?;
        Ok(Some(functions))
    }

    async fn skill_forward(&self, mst_skill: MstSkill) -> Result<SkillEntity> {
        let levels = self.store.fetch_all::<MstSkillLv>(mst_skill.id).await?;
        let mst_skill_lv = try_join_all(levels.into_iter().map(|level| async move {
            let expanded_func_id = self.level_functions(&level.func_id).await?;
            Ok::<_, MstgraphError>(SkillLevelEntity { level, expanded_func_id })
        }))
        .await?;
        let mst_svt_skill = self.store.fetch_by::<MstSvtSkill>("skillId", mst_skill.id).await?;

        Ok(SkillEntity {
            mst_skill,
            mst_skill_lv,
            mst_svt_skill,
            reverse: None,
        })
    }

    async fn td_forward(&self, mst_treasure_device: MstTreasureDevice) -> Result<TdEntity> {
        let levels = self
            .store
            .fetch_all::<MstTreasureDeviceLv>(mst_treasure_device.id)
            .await?;
        let mst_treasure_device_lv = try_join_all(levels.into_iter().map(|level| async move {
            let expanded_func_id = self.level_functions(&level.func_id).await?;
            Ok::<_, MstgraphError>(TdLevelEntity { level, expanded_func_id })
        }))
        .await?;
        let mst_svt_treasure_device = self
            .store
            .fetch_by::<MstSvtTreasureDevice>("treasureDeviceId", mst_treasure_device.id)
            .await?;

        Ok(TdEntity {
            mst_treasure_device,
            mst_treasure_device_lv,
            mst_svt_treasure_device,
            reverse: None,
        })
    }

    async fn skills_forward(&self, ids: &[i64]) -> Result<Vec<SkillEntity>> {
        let skills = self.store.fetch_many::<MstSkill>(ids).await?;
        try_join_all(skills.into_iter().map(|s| self.skill_forward(s))).await
    }

    async fn tds_forward(&self, ids: &[i64]) -> Result<Vec<TdEntity>> {
        let tds = self.store.fetch_many::<MstTreasureDevice>(ids).await?;
        try_join_all(tds.into_iter().map(|t| self.td_forward(t))).await
    }
}

/// Turn a parent's own `NotFound` into an index fault: the index named it,
/// so the store must have it.
fn index_fault<T: MasterRecord>(index: ReverseKind, id: i64) -> impl FnOnce(MstgraphError) -> MstgraphError {
    move |err| {
        if err.is_not_found(T::KIND, id) {
            log::error!("Reverse index {} names missing {} {}", index, T::KIND, id);
            MstgraphError::IndexInconsistency { index, id }
        } else {
            err
        }
    }
}

fn dedup(ids: impl IntoIterator<Item = i64>) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// One record per requested id, repeating records for repeated ids.
fn in_request_order<T: MasterRecord + Clone>(ids: &[i64], records: Vec<T>) -> Vec<T> {
    let by_key: HashMap<i64, T> = records.into_iter().map(|r| (r.key(), r)).collect();
    ids.iter().filter_map(|id| by_key.get(id).cloned()).collect()
}
