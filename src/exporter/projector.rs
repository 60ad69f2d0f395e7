// ==========================================
// 裁缝店业务管理系统 - 导出投影器
// ==========================================
// 职责: 按用户选择的列子集渲染实体，列顺序始终为 schema 顺序
// 说明: 展示转换由 schema 中各列的 getter 完成
// ==========================================

use crate::domain::import::RawRow;
use crate::exporter::error::{ExportError, ExportResult};
use crate::importer::schema::{ColumnMeta, EntitySchema};
use tracing::warn;

/// 投影结果: 选中列 + 渲染行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<RawRow>,
}

impl Projection {
    /// 表头（展示标签）
    pub fn header_labels(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.label.to_string()).collect()
    }
}

/// 解析列选择，返回 schema 顺序的列下标
///
/// # 说明
/// - 空选择 → 全部列
/// - 未知列键记录警告后忽略
/// - 没有任何已知列 → InvalidInput
pub fn select_columns(columns: &[ColumnMeta], selected: &[String]) -> ExportResult<Vec<usize>> {
    let wanted: Vec<&String> = selected.iter().filter(|s| !s.trim().is_empty()).collect();
    if wanted.is_empty() {
        return Ok((0..columns.len()).collect());
    }

    for key in &wanted {
        if !columns.iter().any(|c| c.matches(key)) {
            warn!(column = %key, "未知导出列，忽略");
        }
    }

    let indices: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| wanted.iter().any(|key| c.matches(key)))
        .map(|(idx, _)| idx)
        .collect();

    if indices.is_empty() {
        return Err(ExportError::InvalidInput(format!(
            "没有可导出的列: {}",
            wanted.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
        )));
    }
    Ok(indices)
}

/// 投影实体集合
///
/// 行号按导出文件记录号编排（表头为第 1 行）
pub fn project<T>(
    entities: &[T],
    schema: &EntitySchema<T>,
    selected: &[String],
) -> ExportResult<Projection> {
    let meta = schema.describe();
    let indices = select_columns(&meta, selected)?;

    let rows = entities
        .iter()
        .enumerate()
        .map(|(idx, entity)| {
            let cells = indices
                .iter()
                .map(|&col| (schema.columns[col].getter)(entity))
                .collect();
            RawRow::new(idx + 2, cells)
        })
        .collect();

    Ok(Projection {
        columns: indices.iter().map(|&col| meta[col].clone()).collect(),
        rows,
    })
}
