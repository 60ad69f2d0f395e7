// ==========================================
// 裁缝店业务管理系统 - 实体列 Schema
// ==========================================
// 职责: 每种实体一份有序列声明，作为以下行为的唯一依据:
// - 固定位置导入的列顺序与最少列数
// - 表头名称解析（key 或展示标签）
// - 必填校验、导出列顺序、样例模板
// - 表头映射更新的 setter 表
// ==========================================

use crate::domain::types::EntityKind;
use crate::importer::error::RowResult;
use crate::repository::ShopStore;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

// ==========================================
// ImportContext - 导入上下文
// ==========================================
// 显式传递，不使用全局状态
pub struct ImportContext<'a> {
    pub store: &'a ShopStore,
    pub today: NaiveDate, // 日期默认值（如采购日期）
}

impl<'a> ImportContext<'a> {
    pub fn new(store: &'a ShopStore) -> Self {
        Self {
            store,
            today: chrono::Local::now().date_naive(),
        }
    }
}

// ==========================================
// 列类型提示
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeHint {
    Text,
    Decimal,
    Integer,
    Boolean,
    Date,
    Timestamp,
    Choice,
    Checklist,
    Json,
    Reference,
}

/// 列元数据（与实体类型无关，供编解码与模板使用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMeta {
    pub key: &'static str,      // 列键（全 schema 唯一）
    pub label: &'static str,    // 展示标签（导出表头）
    pub type_hint: TypeHint,
    pub positional: bool,       // 是否参与固定位置导入
    pub required: bool,         // 新建时必填
    pub example: &'static str,  // 样例模板取值
}

impl ColumnMeta {
    /// 表头名称是否指向本列（key 或标签，大小写不敏感，空格、连字符与下划线等价）
    pub fn matches(&self, header: &str) -> bool {
        let wanted = normalize_header(header);
        !wanted.is_empty()
            && (wanted == normalize_header(self.key) || wanted == normalize_header(self.label))
    }
}

/// 表头规范化: 小写、去空白、空格与连字符转下划线
pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// 导出取值
pub type Getter<T> = fn(&T) -> String;
/// 纯字段 setter（仅做类型转换）
pub type FieldSetter<T> = fn(&mut T, &str) -> RowResult<()>;
/// 关联 setter（需要查询存储，晚于全部字段 setter 执行）
pub type ReferenceSetter<T> = fn(&mut T, &str, &ImportContext<'_>) -> RowResult<()>;

/// 列写入方式
pub enum ColumnAccess<T> {
    ReadOnly,
    Field(FieldSetter<T>),
    /// 只读查询的关联
    Reference(ReferenceSetter<T>),
    /// 找不到即新建的关联，最后执行
    GetOrCreate(ReferenceSetter<T>),
}

pub struct ColumnSpec<T> {
    pub meta: ColumnMeta,
    pub getter: Getter<T>,
    pub access: ColumnAccess<T>,
}

impl<T> ColumnSpec<T> {
    pub fn is_settable(&self) -> bool {
        !matches!(self.access, ColumnAccess::ReadOnly)
    }
}

// ==========================================
// EntitySchema - 实体列声明
// ==========================================
pub struct EntitySchema<T> {
    pub kind: EntityKind,
    pub columns: Vec<ColumnSpec<T>>,
}

impl<T> EntitySchema<T> {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            columns: Vec::new(),
        }
    }

    /// 只读列（id、创建时间等）
    pub fn read_only(mut self, key: &'static str, label: &'static str, type_hint: TypeHint, getter: Getter<T>) -> Self {
        self.columns.push(ColumnSpec {
            meta: ColumnMeta {
                key,
                label,
                type_hint,
                positional: false,
                required: false,
                example: "",
            },
            getter,
            access: ColumnAccess::ReadOnly,
        });
        self
    }

    /// 可写字段列
    pub fn field(mut self, meta: ColumnMeta, getter: Getter<T>, setter: FieldSetter<T>) -> Self {
        self.columns.push(ColumnSpec {
            meta,
            getter,
            access: ColumnAccess::Field(setter),
        });
        self
    }

    /// 关联列
    pub fn reference(mut self, meta: ColumnMeta, getter: Getter<T>, setter: ReferenceSetter<T>) -> Self {
        self.columns.push(ColumnSpec {
            meta,
            getter,
            access: ColumnAccess::Reference(setter),
        });
        self
    }

    /// 找不到即新建的关联列（在其余关联全部解析成功后才执行）
    pub fn get_or_create_reference(
        mut self,
        meta: ColumnMeta,
        getter: Getter<T>,
        setter: ReferenceSetter<T>,
    ) -> Self {
        self.columns.push(ColumnSpec {
            meta,
            getter,
            access: ColumnAccess::GetOrCreate(setter),
        });
        self
    }

    /// 列元数据（schema 顺序）
    pub fn describe(&self) -> Vec<ColumnMeta> {
        self.columns.iter().map(|c| c.meta.clone()).collect()
    }

    /// 固定位置导入的列（schema 顺序）
    pub fn positional_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.meta.positional)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// 固定位置导入的最少列数
    pub fn min_columns(&self) -> usize {
        self.columns.iter().filter(|c| c.meta.positional).count()
    }

    /// 按表头名称解析列下标
    pub fn resolve(&self, header: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.meta.matches(header))
    }

    /// 必填列
    pub fn required_columns(&self) -> impl Iterator<Item = (usize, &ColumnSpec<T>)> {
        self.columns.iter().enumerate().filter(|(_, c)| c.meta.required)
    }
}

/// 列元数据构造器
pub fn column(key: &'static str, label: &'static str, type_hint: TypeHint) -> ColumnMeta {
    ColumnMeta {
        key,
        label,
        type_hint,
        positional: true,
        required: false,
        example: "",
    }
}

impl ColumnMeta {
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// 仅表头映射可写，不参与固定位置导入
    pub fn header_only(mut self) -> Self {
        self.positional = false;
        self
    }

    pub fn example(mut self, example: &'static str) -> Self {
        self.example = example;
        self
    }
}

// ==========================================
// 展示转换（导出取值使用）
// ==========================================

/// 小数保留两位
pub fn fmt_decimal(value: f64) -> String {
    format!("{:.2}", value)
}

/// 布尔: Yes / No
pub fn fmt_bool(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}

/// 日期: YYYY-MM-DD
pub fn fmt_date(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// 可选日期: 空值为空串
pub fn fmt_optional_date(value: Option<NaiveDate>) -> String {
    value.map(fmt_date).unwrap_or_default()
}

/// 时间戳: YYYY-MM-DD HH:MM:SS
pub fn fmt_timestamp(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// 工序清单: "; " 连接
pub fn fmt_checklist(items: &[String]) -> String {
    items.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_matching_is_lenient() {
        let meta = column("cost_per_meter", "Cost Per Meter", TypeHint::Decimal);
        assert!(meta.matches("cost_per_meter"));
        assert!(meta.matches("Cost Per Meter"));
        assert!(meta.matches(" COST per_meter "));
        assert!(meta.matches("cost-per-meter"));
        assert!(!meta.matches("cost"));
        assert!(!meta.matches(""));
    }

    #[test]
    fn test_display_transforms() {
        assert_eq!(fmt_decimal(12.5), "12.50");
        assert_eq!(fmt_bool(true), "Yes");
        assert_eq!(fmt_bool(false), "No");
        assert_eq!(fmt_checklist(&["cut".to_string(), "hem".to_string()]), "cut; hem");
        assert_eq!(fmt_optional_date(None), "");
        assert_eq!(
            fmt_date(NaiveDate::from_ymd_opt(2024, 2, 9).unwrap()),
            "2024-02-09"
        );
    }
}
