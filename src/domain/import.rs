// ==========================================
// 裁缝店业务管理系统 - 导入结果模型
// ==========================================
// 用途: 导入对账器逐行累积，调用方用于展示汇总
// 生命周期: 每次导入调用新建，返回后只读
// ==========================================

use crate::domain::types::EntityKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 默认展示的跳过原因条数
pub const DEFAULT_SKIP_PREVIEW_LIMIT: usize = 5;

// ==========================================
// RawRow - 解码后的一行原始单元格
// ==========================================
// 单元格已去除首尾空白；长度可能短于 schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub row_number: usize,  // 源文件中的记录号（1 起）
    pub cells: Vec<String>, // 单元格
}

impl RawRow {
    pub fn new(row_number: usize, cells: Vec<String>) -> Self {
        Self { row_number, cells }
    }

    /// 按下标取单元格，越界视为空串
    pub fn cell(&self, idx: usize) -> &str {
        self.cells.get(idx).map(|s| s.as_str()).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

// ==========================================
// DecodedTable - 解码结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecodedTable {
    pub header: Option<Vec<String>>,
    pub rows: Vec<RawRow>,
}

// ==========================================
// SkipReason - 单行跳过原因
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipReason {
    pub row_number: usize, // 源文件记录号（含表头时数据从 2 开始）
    pub message: String,   // 原因
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row_number, self.message)
    }
}

// ==========================================
// ImportOutcome - 导入结果
// ==========================================
// 不变量: created + updated + skipped == total_rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub kind: EntityKind,
    pub total_rows: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub skip_reasons: Vec<SkipReason>,
}

impl ImportOutcome {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            total_rows: 0,
            created: 0,
            updated: 0,
            skipped: 0,
            skip_reasons: Vec::new(),
        }
    }

    pub fn record_created(&mut self) {
        self.total_rows += 1;
        self.created += 1;
    }

    pub fn record_updated(&mut self) {
        self.total_rows += 1;
        self.updated += 1;
    }

    pub fn record_skipped(&mut self, row_number: usize, message: impl Into<String>) {
        self.total_rows += 1;
        self.skipped += 1;
        self.skip_reasons.push(SkipReason {
            row_number,
            message: message.into(),
        });
    }

    /// 前 limit 条跳过原因，以及是否被截断
    pub fn preview(&self, limit: usize) -> (&[SkipReason], bool) {
        let shown = self.skip_reasons.len().min(limit);
        (&self.skip_reasons[..shown], self.skipped > limit)
    }

    /// 一行汇总消息
    ///
    /// 格式: "Created 2 customers. Updated 1. Skipped 3 row(s). Row 2: ... . ..."
    pub fn summary_message(&self, limit: usize) -> String {
        let mut msg = format!(
            "Created {} {}. Updated {}.",
            self.created,
            self.kind.plural_label(),
            self.updated
        );
        if self.skipped > 0 {
            msg.push_str(&format!(" Skipped {} row(s).", self.skipped));
            let (shown, truncated) = self.preview(limit);
            for reason in shown {
                msg.push_str(&format!(" {}.", reason));
            }
            if truncated {
                msg.push_str(" ...");
            }
        }
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_stay_consistent() {
        let mut outcome = ImportOutcome::new(EntityKind::Customer);
        outcome.record_created();
        outcome.record_updated();
        outcome.record_skipped(4, "Not enough columns");

        assert_eq!(outcome.total_rows, 3);
        assert_eq!(
            outcome.created + outcome.updated + outcome.skipped,
            outcome.total_rows
        );
        assert_eq!(outcome.skip_reasons[0].to_string(), "Row 4: Not enough columns");
    }

    #[test]
    fn test_summary_without_skips() {
        let mut outcome = ImportOutcome::new(EntityKind::Order);
        outcome.record_created();
        outcome.record_created();

        assert_eq!(outcome.summary_message(5), "Created 2 orders. Updated 0.");
    }

    #[test]
    fn test_summary_truncates_after_limit() {
        let mut outcome = ImportOutcome::new(EntityKind::Payment);
        for row in 2..9 {
            outcome.record_skipped(row, "Order not found");
        }

        let msg = outcome.summary_message(DEFAULT_SKIP_PREVIEW_LIMIT);
        assert!(msg.starts_with("Created 0 payments. Updated 0. Skipped 7 row(s)."));
        assert!(msg.contains("Row 6: Order not found."));
        assert!(!msg.contains("Row 7:"));
        assert!(msg.ends_with(" ..."));

        let (shown, truncated) = outcome.preview(DEFAULT_SKIP_PREVIEW_LIMIT);
        assert_eq!(shown.len(), 5);
        assert!(truncated);
    }
}
