// ==========================================
// 裁缝店业务管理系统 - 字段转换器
// ==========================================
// 职责: 单元格文本 → 类型化字段值
// 约定: 输入已去除首尾空白；失败返回 RowError（行级可恢复）
// ==========================================

use crate::domain::types::ItemType;
use crate::importer::error::{RowError, RowResult};
use chrono::NaiveDate;

pub struct FieldMapper;

impl FieldMapper {
    /// 必填文本: 空白视为缺失
    pub fn required_text(field: &str, value: &str) -> RowResult<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(RowError::MissingRequired(vec![field.to_string()]));
        }
        Ok(trimmed.to_string())
    }

    /// 可选文本: 空白 → None
    pub fn optional_text(value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// 解析小数（金额、米数）
    pub fn parse_decimal(field: &str, value: &str) -> RowResult<f64> {
        let cleaned = value.trim().replace(',', "");
        match cleaned.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(RowError::conversion(field, value, "decimal")),
        }
    }

    /// 解析可选小数: 空白取默认值
    pub fn parse_decimal_or(field: &str, value: &str, default: f64) -> RowResult<f64> {
        if value.trim().is_empty() {
            return Ok(default);
        }
        Self::parse_decimal(field, value)
    }

    /// 解析非负整数（数量）
    ///
    /// Excel 数值单元格可能以 "5.0" 形式出现，整数值浮点同样接受
    pub fn parse_quantity(field: &str, value: &str) -> RowResult<u32> {
        let trimmed = value.trim();
        if let Ok(v) = trimmed.parse::<u32>() {
            return Ok(v);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.fract() == 0.0 && f >= 0.0 && f <= u32::MAX as f64 => Ok(f as u32),
            _ => Err(RowError::conversion(field, value, "non-negative integer")),
        }
    }

    /// 解析可选数量: 空白取默认值
    pub fn parse_quantity_or(field: &str, value: &str, default: u32) -> RowResult<u32> {
        if value.trim().is_empty() {
            return Ok(default);
        }
        Self::parse_quantity(field, value)
    }

    /// 布尔: yes / true / 1（大小写不敏感），其余为 false
    pub fn parse_bool(value: &str) -> bool {
        matches!(value.trim().to_lowercase().as_str(), "yes" | "true" | "1")
    }

    /// 解析日期（YYYY-MM-DD，兼容 YYYYMMDD 与带时间部分的时间戳）
    pub fn parse_date(field: &str, value: &str) -> RowResult<NaiveDate> {
        let trimmed = value.trim();
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y%m%d"))
            .or_else(|e| match trimmed.split_once([' ', 'T']) {
                Some((date_part, _)) => NaiveDate::parse_from_str(date_part, "%Y-%m-%d"),
                None => Err(e),
            })
            .map_err(|_| RowError::conversion(field, value, "date (YYYY-MM-DD)"))
    }

    /// 解析可选日期: 空白 → None
    pub fn parse_optional_date(field: &str, value: &str) -> RowResult<Option<NaiveDate>> {
        if value.trim().is_empty() {
            return Ok(None);
        }
        Self::parse_date(field, value).map(Some)
    }

    /// 款式类型: 合法代码直接采用，否则按首字母 s/u 推断
    pub fn parse_item_type(field: &str, value: &str) -> RowResult<ItemType> {
        if value.trim().is_empty() {
            return Err(RowError::MissingRequired(vec![field.to_string()]));
        }
        ItemType::infer(value).ok_or_else(|| RowError::InvalidChoice {
            field: field.to_string(),
            value: value.to_string(),
        })
    }

    /// 工序清单: JSON 字符串数组，或按 ';' / 换行拆分
    pub fn parse_checklist(value: &str) -> Vec<String> {
        let trimmed = value.trim();
        if trimmed.starts_with('[') {
            if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
                return items
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
        }
        trimmed
            .split([';', '\n'])
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// 记录 id: 正整数，允许前缀 '#'（"#12"）
    pub fn parse_record_id(value: &str) -> Option<i64> {
        value
            .trim()
            .trim_start_matches('#')
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
    }
}
