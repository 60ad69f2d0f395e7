// ==========================================
// 裁缝店业务管理系统 - 导入对账器
// ==========================================
// 职责: 逐行决定更新已有记录或新建记录
// 模式:
// - 表头映射: 表头含 id 列时按列名取值，id 命中则更新，否则新建
// - 固定位置: 按 schema 位置顺序取值，只新建
// 红线: 单行错误只记为跳过，绝不中断整批；本模块不向外返回错误
// ==========================================

use crate::domain::customer::Customer;
use crate::domain::import::{DecodedTable, ImportOutcome, RawRow};
use crate::domain::inventory::InventoryItem;
use crate::domain::order::{Order, Payment, Requirement};
use crate::domain::supplier::{Purchase, Supplier};
use crate::domain::types::EntityKind;
use crate::importer::entity_importer::{
    create_from_values, update_with_values, ImportableEntity, RowValues,
};
use crate::importer::error::{RowError, RowResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::schema::{normalize_header, EntitySchema, ImportContext};
use crate::repository::ShopStore;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 单行处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowAction {
    Created(i64),
    Updated(i64),
}

/// 表头映射计划
struct HeaderPlan {
    id_index: usize,
    mappings: Vec<(usize, usize)>, // (表头下标, schema 列下标)
}

// ==========================================
// ImportReconciler - 导入对账器
// ==========================================
pub struct ImportReconciler<'a> {
    ctx: ImportContext<'a>,
    batch_id: String,
}

impl<'a> ImportReconciler<'a> {
    pub fn new(store: &'a ShopStore) -> Self {
        Self::with_context(ImportContext::new(store))
    }

    pub fn with_context(ctx: ImportContext<'a>) -> Self {
        Self {
            ctx,
            batch_id: Uuid::new_v4().to_string(),
        }
    }

    /// 日志关联用批次号
    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    /// 按实体种类分派
    pub fn reconcile(&self, table: &DecodedTable, kind: EntityKind) -> ImportOutcome {
        match kind {
            EntityKind::Customer => self.reconcile_as::<Customer>(table),
            EntityKind::InventoryItem => self.reconcile_as::<InventoryItem>(table),
            EntityKind::Order => self.reconcile_as::<Order>(table),
            EntityKind::Requirement => self.reconcile_as::<Requirement>(table),
            EntityKind::Payment => self.reconcile_as::<Payment>(table),
            EntityKind::Supplier => self.reconcile_as::<Supplier>(table),
            EntityKind::Purchase => self.reconcile_as::<Purchase>(table),
        }
    }

    /// 对账一张表
    pub fn reconcile_as<T: ImportableEntity>(&self, table: &DecodedTable) -> ImportOutcome {
        let schema = T::schema();
        let mut outcome = ImportOutcome::new(T::KIND);

        let plan = table
            .header
            .as_deref()
            .and_then(|header| Self::plan_header(&schema, header));

        info!(
            batch_id = %self.batch_id,
            kind = %T::KIND,
            rows = table.rows.len(),
            mode = if plan.is_some() { "header_mapped" } else { "fixed_position" },
            "开始导入"
        );

        for row in &table.rows {
            let result = match &plan {
                Some(plan) => self.process_mapped_row(&schema, plan, row),
                None => self.process_positional_row(&schema, row),
            };

            match result {
                Ok(RowAction::Created(id)) => {
                    debug!(batch_id = %self.batch_id, row = row.row_number, id, "新建记录");
                    outcome.record_created();
                }
                Ok(RowAction::Updated(id)) => {
                    debug!(batch_id = %self.batch_id, row = row.row_number, id, "更新记录");
                    outcome.record_updated();
                }
                Err(err) => {
                    warn!(batch_id = %self.batch_id, row = row.row_number, reason = %err, "跳过行");
                    outcome.record_skipped(row.row_number, err.to_string());
                }
            }
        }

        info!(
            batch_id = %self.batch_id,
            kind = %T::KIND,
            created = outcome.created,
            updated = outcome.updated,
            skipped = outcome.skipped,
            "导入完成"
        );

        outcome
    }

    /// 表头含 id 列时生成映射计划，否则返回 None（固定位置模式）
    fn plan_header<T>(schema: &EntitySchema<T>, header: &[String]) -> Option<HeaderPlan> {
        let id_index = header.iter().position(|h| normalize_header(h) == "id")?;

        let mut mappings: Vec<(usize, usize)> = Vec::new();
        for (header_idx, name) in header.iter().enumerate() {
            if header_idx == id_index {
                continue;
            }
            match schema.resolve(name) {
                Some(col) if schema.columns[col].is_settable() => {
                    if mappings.iter().any(|(_, mapped)| *mapped == col) {
                        debug!(header = %name, "重复表头，忽略");
                        continue;
                    }
                    mappings.push((header_idx, col));
                }
                _ => debug!(header = %name, "表头未映射到可写列，忽略"),
            }
        }

        Some(HeaderPlan { id_index, mappings })
    }

    fn process_mapped_row<T: ImportableEntity>(
        &self,
        schema: &EntitySchema<T>,
        plan: &HeaderPlan,
        row: &RawRow,
    ) -> RowResult<RowAction> {
        let values: RowValues<'_> = plan
            .mappings
            .iter()
            .map(|&(header_idx, col)| (col, row.cell(header_idx)))
            .collect();

        // id 为空、非数字或不存在时按新建处理
        let existing = match FieldMapper::parse_record_id(row.cell(plan.id_index)) {
            Some(id) => T::find(self.ctx.store, id)?.map(|record| (id, record)),
            None => None,
        };

        match existing {
            Some((id, record)) => {
                update_with_values(schema, &record, &values, &self.ctx)?;
                Ok(RowAction::Updated(id))
            }
            None => {
                let id = create_from_values(schema, &values, &self.ctx)?;
                Ok(RowAction::Created(id))
            }
        }
    }

    fn process_positional_row<T: ImportableEntity>(
        &self,
        schema: &EntitySchema<T>,
        row: &RawRow,
    ) -> RowResult<RowAction> {
        let positional = schema.positional_columns();
        if row.cells.len() < positional.len() {
            return Err(RowError::NotEnoughColumns {
                required: positional.len(),
                found: row.cells.len(),
            });
        }

        let values: RowValues<'_> = positional
            .iter()
            .enumerate()
            .map(|(pos, &col)| (col, row.cell(pos)))
            .collect();

        let id = create_from_values(schema, &values, &self.ctx)?;
        Ok(RowAction::Created(id))
    }
}

/// 便捷函数: 对账一张表
pub fn reconcile(table: &DecodedTable, kind: EntityKind, store: &ShopStore) -> ImportOutcome {
    ImportReconciler::new(store).reconcile(table, kind)
}
