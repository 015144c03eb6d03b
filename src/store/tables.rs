use rusqlite::Row;

use super::{json_column, script_column, MasterRecord};
use crate::model::records::{
    MstBuff, MstCommandCode, MstCommandCodeSkill, MstEquip, MstEquipSkill, MstFunc,
    MstFuncGroup, MstSkill, MstSkillLv, MstSvt, MstSvtPassiveSkill, MstSvtSkill,
    MstSvtTreasureDevice, MstTreasureDevice, MstTreasureDeviceLv,
};

impl MasterRecord for MstBuff {
    const KIND: &'static str = "Buff";
    const TABLE: &'static str = "mstBuff";
    const COLUMNS: &'static str =
        "id, buffGroup, type, name, detail, iconId, maxRate, vals, tvals, ckSelfIndv, ckOpIndv, script";
    const KEY: &'static str = "id";
    const PARENT: &'static str = "id";
    const ORDER_BY: &'static str = "id";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            buff_group: row.get(1)?,
            buff_type: row.get(2)?,
            name: row.get(3)?,
            detail: row.get(4)?,
            icon_id: row.get(5)?,
            max_rate: row.get(6)?,
            vals: json_column(row, 7)?,
            tvals: json_column(row, 8)?,
            ck_self_indv: json_column(row, 9)?,
            ck_op_indv: json_column(row, 10)?,
            script: script_column(row, 11)?,
        })
    }

    fn key(&self) -> i64 {
        self.id
    }
}

impl MasterRecord for MstFunc {
    const KIND: &'static str = "Function";
    const TABLE: &'static str = "mstFunc";
    const COLUMNS: &'static str =
        "id, funcType, targetType, applyTarget, popupText, vals, tvals, questTvals";
    const KEY: &'static str = "id";
    const PARENT: &'static str = "id";
    const ORDER_BY: &'static str = "id";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            func_type: row.get(1)?,
            target_type: row.get(2)?,
            apply_target: row.get(3)?,
            popup_text: row.get(4)?,
            vals: json_column(row, 5)?,
            tvals: json_column(row, 6)?,
            quest_tvals: json_column(row, 7)?,
        })
    }

    fn key(&self) -> i64 {
        self.id
    }
}

impl MasterRecord for MstFuncGroup {
    const KIND: &'static str = "Function group";
    const TABLE: &'static str = "mstFuncGroup";
    const COLUMNS: &'static str = "funcId, eventId, baseFuncId, name, iconId, priority";
    const KEY: &'static str = "funcId";
    const PARENT: &'static str = "funcId";
    const ORDER_BY: &'static str = "priority, eventId";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            func_id: row.get(0)?,
            event_id: row.get(1)?,
            base_func_id: row.get(2)?,
            name: row.get(3)?,
            icon_id: row.get(4)?,
            priority: row.get(5)?,
        })
    }

    fn key(&self) -> i64 {
        self.func_id
    }
}

impl MasterRecord for MstSkill {
    const KIND: &'static str = "Skill";
    const TABLE: &'static str = "mstSkill";
    const COLUMNS: &'static str = "id, type, name, ruby, maxLv, iconId, script";
    const KEY: &'static str = "id";
    const PARENT: &'static str = "id";
    const ORDER_BY: &'static str = "id";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            skill_type: row.get(1)?,
            name: row.get(2)?,
            ruby: row.get(3)?,
            max_lv: row.get(4)?,
            icon_id: row.get(5)?,
            script: script_column(row, 6)?,
        })
    }

    fn key(&self) -> i64 {
        self.id
    }
}

impl MasterRecord for MstSkillLv {
    const KIND: &'static str = "Skill level";
    const TABLE: &'static str = "mstSkillLv";
    const COLUMNS: &'static str = "skillId, lv, funcId, svals, chargeTurn";
    const KEY: &'static str = "skillId";
    const PARENT: &'static str = "skillId";
    const ORDER_BY: &'static str = "skillId, lv";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            skill_id: row.get(0)?,
            lv: row.get(1)?,
            func_id: json_column(row, 2)?,
            svals: json_column(row, 3)?,
            charge_turn: row.get(4)?,
        })
    }

    fn key(&self) -> i64 {
        self.skill_id
    }
}

impl MasterRecord for MstTreasureDevice {
    const KIND: &'static str = "NP";
    const TABLE: &'static str = "mstTreasureDevice";
    const COLUMNS: &'static str = "id, name, ruby, rank, maxLv, typeText, attackAttri";
    const KEY: &'static str = "id";
    const PARENT: &'static str = "id";
    const ORDER_BY: &'static str = "id";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            ruby: row.get(2)?,
            rank: row.get(3)?,
            max_lv: row.get(4)?,
            type_text: row.get(5)?,
            attack_attri: row.get(6)?,
        })
    }

    fn key(&self) -> i64 {
        self.id
    }
}

impl MasterRecord for MstTreasureDeviceLv {
    const KIND: &'static str = "NP level";
    const TABLE: &'static str = "mstTreasureDeviceLv";
    const COLUMNS: &'static str = "treasureDeviceId, lv, funcId, svals, gaugeCount, tdPoint";
    const KEY: &'static str = "treasureDeviceId";
    const PARENT: &'static str = "treasureDeviceId";
    const ORDER_BY: &'static str = "treasureDeviceId, lv";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            treasure_device_id: row.get(0)?,
            lv: row.get(1)?,
            func_id: json_column(row, 2)?,
            svals: json_column(row, 3)?,
            gauge_count: row.get(4)?,
            td_point: row.get(5)?,
        })
    }

    fn key(&self) -> i64 {
        self.treasure_device_id
    }
}

impl MasterRecord for MstSvt {
    const KIND: &'static str = "Servant";
    const TABLE: &'static str = "mstSvt";
    const COLUMNS: &'static str = "id, collectionNo, name, classId, type, cost";
    const KEY: &'static str = "id";
    const PARENT: &'static str = "id";
    const ORDER_BY: &'static str = "id";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            collection_no: row.get(1)?,
            name: row.get(2)?,
            class_id: row.get(3)?,
            svt_type: row.get(4)?,
            cost: row.get(5)?,
        })
    }

    fn key(&self) -> i64 {
        self.id
    }
}

impl MasterRecord for MstSvtSkill {
    const KIND: &'static str = "Servant skill";
    const TABLE: &'static str = "mstSvtSkill";
    const COLUMNS: &'static str = "svtId, num, priority, skillId, condQuestId, condLv";
    const KEY: &'static str = "svtId";
    const PARENT: &'static str = "svtId";
    const ORDER_BY: &'static str = "svtId, num, priority";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            svt_id: row.get(0)?,
            num: row.get(1)?,
            priority: row.get(2)?,
            skill_id: row.get(3)?,
            cond_quest_id: row.get(4)?,
            cond_lv: row.get(5)?,
        })
    }

    fn key(&self) -> i64 {
        self.svt_id
    }
}

impl MasterRecord for MstSvtPassiveSkill {
    const KIND: &'static str = "Servant passive skill";
    const TABLE: &'static str = "mstSvtPassiveSkill";
    const COLUMNS: &'static str = "svtId, num, priority, skillId";
    const KEY: &'static str = "svtId";
    const PARENT: &'static str = "svtId";
    const ORDER_BY: &'static str = "svtId, num, priority";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            svt_id: row.get(0)?,
            num: row.get(1)?,
            priority: row.get(2)?,
            skill_id: row.get(3)?,
        })
    }

    fn key(&self) -> i64 {
        self.svt_id
    }
}

impl MasterRecord for MstSvtTreasureDevice {
    const KIND: &'static str = "Servant NP";
    const TABLE: &'static str = "mstSvtTreasureDevice";
    const COLUMNS: &'static str = "svtId, num, priority, treasureDeviceId, cardId";
    const KEY: &'static str = "svtId";
    const PARENT: &'static str = "svtId";
    const ORDER_BY: &'static str = "svtId, num, priority";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            svt_id: row.get(0)?,
            num: row.get(1)?,
            priority: row.get(2)?,
            treasure_device_id: row.get(3)?,
            card_id: row.get(4)?,
        })
    }

    fn key(&self) -> i64 {
        self.svt_id
    }
}

impl MasterRecord for MstEquip {
    const KIND: &'static str = "Mystic Code";
    const TABLE: &'static str = "mstEquip";
    const COLUMNS: &'static str = "id, name, detail, maxLv";
    const KEY: &'static str = "id";
    const PARENT: &'static str = "id";
    const ORDER_BY: &'static str = "id";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            detail: row.get(2)?,
            max_lv: row.get(3)?,
        })
    }

    fn key(&self) -> i64 {
        self.id
    }
}

impl MasterRecord for MstEquipSkill {
    const KIND: &'static str = "Mystic Code skill";
    const TABLE: &'static str = "mstEquipSkill";
    const COLUMNS: &'static str = "equipId, num, skillId, condLv";
    const KEY: &'static str = "equipId";
    const PARENT: &'static str = "equipId";
    const ORDER_BY: &'static str = "equipId, num";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            equip_id: row.get(0)?,
            num: row.get(1)?,
            skill_id: row.get(2)?,
            cond_lv: row.get(3)?,
        })
    }

    fn key(&self) -> i64 {
        self.equip_id
    }
}

impl MasterRecord for MstCommandCode {
    const KIND: &'static str = "Command Code";
    const TABLE: &'static str = "mstCommandCode";
    const COLUMNS: &'static str = "id, collectionNo, name, rarity";
    const KEY: &'static str = "id";
    const PARENT: &'static str = "id";
    const ORDER_BY: &'static str = "id";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            collection_no: row.get(1)?,
            name: row.get(2)?,
            rarity: row.get(3)?,
        })
    }

    fn key(&self) -> i64 {
        self.id
    }
}

impl MasterRecord for MstCommandCodeSkill {
    const KIND: &'static str = "Command Code skill";
    const TABLE: &'static str = "mstCommandCodeSkill";
    const COLUMNS: &'static str = "commandCodeId, num, priority, skillId";
    const KEY: &'static str = "commandCodeId";
    const PARENT: &'static str = "commandCodeId";
    const ORDER_BY: &'static str = "commandCodeId, num, priority";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            command_code_id: row.get(0)?,
            num: row.get(1)?,
            priority: row.get(2)?,
            skill_id: row.get(3)?,
        })
    }

    fn key(&self) -> i64 {
        self.command_code_id
    }
}
