// ==========================================
// 裁缝店业务管理系统 - 仓储公共函数
// ==========================================
// 职责: 行映射时的日期/时间戳/枚举解析，LIKE 模式构建
// ==========================================

use crate::domain::types::ItemType;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;

/// 日期存储格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

/// 解析必填日期列
pub fn parse_date(idx: usize, raw: String) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| conversion_error(idx, format!("日期格式错误 '{}': {}", raw, e)))
}

/// 解析可空日期列（空串视为 NULL）
pub fn parse_date_opt(idx: usize, raw: Option<String>) -> rusqlite::Result<Option<NaiveDate>> {
    match raw {
        Some(s) if !s.trim().is_empty() => parse_date(idx, s).map(Some),
        _ => Ok(None),
    }
}

/// 解析 RFC3339 时间戳，损坏数据回退为当前时间
pub fn parse_timestamp(raw: String) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>().unwrap_or_else(|_| Utc::now())
}

/// 解析款式代码列
pub fn parse_item_type(idx: usize, raw: String) -> rusqlite::Result<ItemType> {
    ItemType::from_code(&raw)
        .ok_or_else(|| conversion_error(idx, format!("未知款式类型: {}", raw)))
}

/// 子串匹配模式: "%query%"
///
/// SQLite 的 LIKE 对 ASCII 大小写不敏感
pub fn like_pattern(query: &str) -> String {
    let escaped = query
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(" jane "), "%jane%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_parse_date_opt_blank_is_none() {
        assert_eq!(parse_date_opt(0, Some("  ".to_string())).unwrap(), None);
        assert_eq!(
            parse_date_opt(0, Some("2024-03-01".to_string())).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert!(parse_date(0, "03/01/2024".to_string()).is_err());
    }
}
