//! Shared fixtures for unit tests: a migrated temp database and seed data.

use std::path::Path;

use tempfile::TempDir;

use crate::db::{migrate, Db};
use crate::error::MstgraphError;
use crate::store::MasterStore;

/// Fresh database with all migrations applied.
pub async fn test_store() -> (MasterStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db = Db::new(temp_dir.path().join("master.db"));
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    db.with_connection(move |conn| migrate::migrate_master_schema(conn, &migrations_dir))
        .await
        .unwrap();
    (MasterStore::new(db), temp_dir)
}

/// Run raw SQL against the store's database.
pub async fn exec(store: &MasterStore, sql: &str) {
    let sql = sql.to_string();
    store
        .db()
        .with_connection(move |conn| {
            conn.execute_batch(&sql)?;
            Ok::<(), MstgraphError>(())
        })
        .await
        .unwrap();
}

/// Small layered dataset used by the expansion tests.
///
/// ```text
/// buff 100 <- func 10, 11      buff 101 <- func 11, 12     buff 102 (orphan)
/// func 10, 12 <- skill 500     func 11 <- skill 501, np 600
/// skill 500 <- svt 100100 (active), cc 30
/// skill 501 <- svt 100200 (passive), mc 20
/// np 600 <- svt 100100
/// ```
pub async fn seed_layered_graph(store: &MasterStore) {
    exec(
        store,
        r#"
        INSERT INTO mstBuff (id, name, type) VALUES (100, 'ATK Up', 1), (101, 'DEF Up', 2), (102, 'Unused', 3);

        INSERT INTO mstFunc (id, funcType, vals) VALUES
            (10, 1, '[100]'),
            (11, 1, '[100, 101]'),
            (12, 99, '[101]'),
            (13, 1, '[999]');
        INSERT INTO mstFuncGroup (funcId, eventId, name, priority) VALUES (10, 80100, 'Bonus', 1);

        INSERT INTO mstSkill (id, name, maxLv) VALUES (500, 'Mana Burst', 2), (501, 'Magic Resistance', 1);
        INSERT INTO mstSkillLv (skillId, lv, funcId, svals, chargeTurn) VALUES
            (500, 1, '[10, 12]', '["[Value,100]", "[Value,5]"]', 7),
            (500, 2, '[10, 12]', '["[Value,200]", "[Value,6]"]', 6),
            (501, 1, '[11]', '["[Value,300]"]', 0);

        INSERT INTO mstTreasureDevice (id, name, rank) VALUES (600, 'Excalibur', 'A++');
        INSERT INTO mstTreasureDeviceLv (treasureDeviceId, lv, funcId, svals) VALUES
            (600, 1, '[11, 4040]', '["[Value,1000]", "[Value,1]"]');

        INSERT INTO mstSvt (id, collectionNo, name) VALUES (100100, 2, 'Altria'), (100200, 3, 'Nero');
        INSERT INTO mstSvtSkill (svtId, num, skillId) VALUES (100100, 1, 500);
        INSERT INTO mstSvtPassiveSkill (svtId, num, skillId) VALUES (100200, 1, 501);
        INSERT INTO mstSvtTreasureDevice (svtId, num, treasureDeviceId, cardId) VALUES (100100, 1, 600, 2);

        INSERT INTO mstEquip (id, name) VALUES (20, 'Chaldea Uniform');
        INSERT INTO mstEquipSkill (equipId, num, skillId) VALUES (20, 1, 501);
        INSERT INTO mstCommandCode (id, collectionNo, name) VALUES (30, 1, 'Hero Code');
        INSERT INTO mstCommandCodeSkill (commandCodeId, num, skillId) VALUES (30, 1, 500);

        INSERT INTO reverseIndex (region, kind, itemId, refIds) VALUES
            ('JP', 'buff_to_func', 100, '[10, 11]'),
            ('JP', 'buff_to_func', 101, '[11, 12]'),
            ('JP', 'func_to_skill', 10, '[500]'),
            ('JP', 'func_to_skill', 11, '[501]'),
            ('JP', 'func_to_skill', 12, '[500]'),
            ('JP', 'func_to_td', 11, '[600]'),
            ('JP', 'active_skill_to_svt', 500, '[100100]'),
            ('JP', 'passive_skill_to_svt', 501, '[100200]'),
            ('JP', 'skill_to_mc', 501, '[20]'),
            ('JP', 'skill_to_cc', 500, '[30]'),
            ('JP', 'td_to_svt', 600, '[100100]');
        "#,
    )
    .await;
}
