// ==========================================
// 裁缝店业务管理系统 - 实体导入能力
// ==========================================
// TabularEntity: 可按 schema 导出的实体
// ImportableEntity: 可按 schema 新建/更新的实体
// 每种实体一个实现，见 entity_schemas.rs
// ==========================================

use crate::domain::types::EntityKind;
use crate::importer::error::{RowError, RowResult};
use crate::importer::schema::{ColumnAccess, EntitySchema, ImportContext};
use crate::repository::{RepositoryResult, ShopStore};

// ==========================================
// TabularEntity Trait
// ==========================================
pub trait TabularEntity: Sized {
    const KIND: EntityKind;

    /// 列声明
    fn schema() -> EntitySchema<Self>;

    /// 读取记录（query 为空时返回全部）
    fn load(store: &ShopStore, query: Option<&str>) -> RepositoryResult<Vec<Self>>;
}

// ==========================================
// ImportableEntity Trait
// ==========================================
pub trait ImportableEntity: TabularEntity + Clone {
    /// 新建时的初始值（各字段默认值）
    fn draft(ctx: &ImportContext<'_>) -> Self;

    fn find(store: &ShopStore, id: i64) -> RepositoryResult<Option<Self>>;

    /// 落库并回写 id
    fn insert(&mut self, store: &ShopStore) -> RepositoryResult<i64>;

    fn update(&self, store: &ShopStore) -> RepositoryResult<()>;
}

/// 行内取值: (schema 列下标, 单元格)
pub type RowValues<'r> = Vec<(usize, &'r str)>;

/// 必填校验: 缺失或空白的必填列按 schema 顺序汇总
pub fn check_required<T>(schema: &EntitySchema<T>, values: &RowValues<'_>) -> RowResult<()> {
    let missing: Vec<String> = schema
        .required_columns()
        .filter(|(idx, _)| {
            !values
                .iter()
                .any(|(col, value)| col == idx && !value.trim().is_empty())
        })
        .map(|(_, spec)| spec.meta.key.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RowError::MissingRequired(missing))
    }
}

/// 写入取值: 字段 setter → 查询型关联 → 新建型关联
///
/// 新建型关联（订单客户）排在最后，前面任一步失败时不产生写入
pub fn apply_values<T>(
    schema: &EntitySchema<T>,
    target: &mut T,
    values: &RowValues<'_>,
    ctx: &ImportContext<'_>,
) -> RowResult<()> {
    let access_of = move |idx: usize| schema.columns.get(idx).map(|c| &c.access);

    for &(idx, value) in values {
        if let Some(ColumnAccess::Field(setter)) = access_of(idx) {
            setter(target, value)?;
        }
    }
    for &(idx, value) in values {
        if let Some(ColumnAccess::Reference(setter)) = access_of(idx) {
            setter(target, value, ctx)?;
        }
    }
    for &(idx, value) in values {
        if let Some(ColumnAccess::GetOrCreate(setter)) = access_of(idx) {
            setter(target, value, ctx)?;
        }
    }
    Ok(())
}

/// 新建记录，返回新 id
pub fn create_from_values<T: ImportableEntity>(
    schema: &EntitySchema<T>,
    values: &RowValues<'_>,
    ctx: &ImportContext<'_>,
) -> RowResult<i64> {
    check_required(schema, values)?;
    let mut entity = T::draft(ctx);
    apply_values(schema, &mut entity, values, ctx)?;
    Ok(entity.insert(ctx.store)?)
}

/// 更新已有记录；任一字段失败则整行不落库
pub fn update_with_values<T: ImportableEntity>(
    schema: &EntitySchema<T>,
    existing: &T,
    values: &RowValues<'_>,
    ctx: &ImportContext<'_>,
) -> RowResult<()> {
    let mut entity = existing.clone();
    apply_values(schema, &mut entity, values, ctx)?;
    entity.update(ctx.store)?;
    Ok(())
}
