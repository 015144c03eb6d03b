//! Breadth-first collection of AI chains linked through `avals[0]`.

use std::collections::BTreeSet;

use futures_util::future::try_join_all;

use crate::error::{MstgraphError, Result};
use crate::model::{AiCollection, AiEntity, AiScope};
use crate::store::MasterStore;

/// Collect the AI rows of `root_ai_id` and of every AI reachable from them.
///
/// The root must exist. Chained ids with no rows contribute nothing. Each
/// wave is fetched in ascending id order, so output is deterministic.
pub async fn collect_ai_chain(
    store: &MasterStore,
    root_ai_id: i64,
    scope: AiScope,
) -> Result<AiCollection> {
    let main_ais = store.ai_entities(scope, root_ai_id).await?;
    if main_ais.is_empty() {
        return Err(MstgraphError::NotFound {
            kind: ai_kind(scope),
            id: root_ai_id,
        });
    }

    let mut visited = BTreeSet::from([root_ai_id]);
    let mut pending = chain_targets(&main_ais, &visited);
    let mut related_ais: Vec<AiEntity> = Vec::new();
    let mut waves = 0;

    while !pending.is_empty() {
        waves += 1;
        log::debug!("AI {} chain wave {}: {:?}", root_ai_id, waves, pending);
        let rows = try_join_all(pending.iter().map(|&ai_id| async move {
            let ais = store.ai_entities(scope, ai_id).await?;
            if ais.is_empty() {
                log::debug!("Chained AI {} has no rows", ai_id);
            }
            Ok::<_, MstgraphError>(ais)
        }))
        .await?;
        related_ais.extend(rows.into_iter().flatten());
        visited.extend(pending);
        pending = chain_targets(&related_ais, &visited);
    }
    log::debug!(
        "AI {} chain closed after {} wave(s) over {} chained id(s)",
        root_ai_id,
        waves,
        visited.len() - 1
    );

    let related_quests = match scope {
        AiScope::Field => store.quests_using_field_ai(root_ai_id).await?,
        AiScope::Servant => Vec::new(),
    };

    Ok(AiCollection {
        main_ais,
        related_ais,
        related_quests,
        waves,
    })
}

fn chain_targets(ais: &[AiEntity], visited: &BTreeSet<i64>) -> BTreeSet<i64> {
    ais.iter()
        .filter_map(AiEntity::chain_target)
        .filter(|id| !visited.contains(id))
        .collect()
}

fn ai_kind(scope: AiScope) -> &'static str {
    match scope {
        AiScope::Servant => "AI",
        AiScope::Field => "Field AI",
    }
}
