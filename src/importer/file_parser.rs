// ==========================================
// 裁缝店业务管理系统 - 表格解码器
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输入: 原始字节 + 声明编码 + 是否含表头
// 输出: DecodedTable（表头 + 带记录号的原始行）
// 红线: 解码失败整体报错，不做任何替换字符
// ==========================================

use crate::domain::import::{DecodedTable, RawRow};
use crate::domain::types::TabularFormat;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{Data, Reader, Xlsx};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 模板约定说明行（紧跟表头的第一行）
pub const CONVENTION_ROW: &str = "# id: leave blank to create new, or set to update existing";

/// 约定说明行识别前缀
const CONVENTION_ROW_MARKER: &str = "# id:";

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser, ExcelParser
pub trait FileParser {
    /// 解析为原始行（保留空白行与说明行，由上层过滤）
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>>;
}

/// 校验声明编码，仅接受 UTF-8
pub fn ensure_supported_encoding(encoding: &str) -> ImportResult<()> {
    let normalized = encoding.trim().to_lowercase().replace(['-', '_'], "");
    match normalized.as_str() {
        "" | "utf8" | "utf8sig" => Ok(()),
        _ => Err(ImportError::UnsupportedEncoding(encoding.to_string())),
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let text = std::str::from_utf8(bytes).map_err(|e| {
            ImportError::Decode(format!(
                "非法 UTF-8 字节序列 (偏移 {})",
                e.valid_up_to()
            ))
        })?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            // 记录号取物理行号，空行计入编号
            let row_number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 1);
            let cells = record.iter().map(|v| v.trim().to_string()).collect();
            rows.push(RawRow::new(row_number, cells));
        }

        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 单元格渲染: 整数值浮点不带小数位，日期按 ISO 格式
    fn render_cell(cell: &Data) -> String {
        match cell {
            Data::Empty => String::new(),
            Data::String(s) => s.trim().to_string(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => {
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{}", *f as i64)
                } else {
                    f.to_string()
                }
            }
            Data::Bool(b) => b.to_string(),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(ndt) if ndt.time() == chrono::NaiveTime::MIN => {
                    ndt.date().format("%Y-%m-%d").to_string()
                }
                Some(ndt) => ndt.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => dt.as_f64().to_string(),
            },
            other => other.to_string().trim().to_string(),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // Range 从首个非空单元格开始，补齐偏移
        let (first_row, first_col) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let rows = range
            .rows()
            .enumerate()
            .map(|(idx, data_row)| {
                let mut cells = vec![String::new(); first_col];
                cells.extend(data_row.iter().map(Self::render_cell));
                RawRow::new(first_row + idx + 1, cells)
            })
            .collect();

        Ok(rows)
    }
}

// ==========================================
// 通用文件解析器（根据格式选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// 解码字节为表格
    ///
    /// # 说明
    /// - has_header 为真时，第一条非空记录作为表头
    /// - 全空白行被丢弃，记录号保持不变
    /// - 仅紧跟表头的模板说明行（"# id:" 开头）被丢弃，其余 '#' 开头的行照常返回
    pub fn decode(
        &self,
        bytes: &[u8],
        format: TabularFormat,
        encoding: &str,
        has_header: bool,
    ) -> ImportResult<DecodedTable> {
        ensure_supported_encoding(encoding)?;

        let raw_rows = match format {
            TabularFormat::Csv => CsvParser.parse_bytes(bytes)?,
            TabularFormat::Xlsx => ExcelParser.parse_bytes(bytes)?,
        };

        let mut iter = raw_rows.into_iter().filter(|row| !row.is_blank());

        let header = if has_header {
            iter.next().map(|row| row.cells)
        } else {
            None
        };

        let mut rows: Vec<RawRow> = iter.collect();
        if header.is_some() && rows.first().is_some_and(Self::is_convention_row) {
            rows.remove(0);
        }

        debug!(
            format = format.extension(),
            has_header = header.is_some(),
            row_count = rows.len(),
            "表格解码完成"
        );

        Ok(DecodedTable { header, rows })
    }

    fn is_convention_row(row: &RawRow) -> bool {
        row.cell(0).starts_with(CONVENTION_ROW_MARKER)
    }

    /// 按扩展名识别格式
    pub fn detect_format(path: &Path) -> ImportResult<TabularFormat> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        TabularFormat::from_extension(ext)
            .ok_or_else(|| ImportError::UnsupportedFormat(ext.to_string()))
    }
}

/// 便捷函数: 解码字节为表格
pub fn decode(
    bytes: &[u8],
    format: TabularFormat,
    encoding: &str,
    has_header: bool,
) -> ImportResult<DecodedTable> {
    UniversalFileParser.decode(bytes, format, encoding, has_header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_decode_with_header() {
        let data = "ID,Name,Contact\n1,Jane Doe, 555-1234 \n,Bob,\n";
        let table = decode(data.as_bytes(), TabularFormat::Csv, "utf-8", true).unwrap();

        assert_eq!(
            table.header,
            Some(vec!["ID".to_string(), "Name".to_string(), "Contact".to_string()])
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].row_number, 2);
        assert_eq!(table.rows[0].cells[2], "555-1234");
        assert_eq!(table.rows[1].cell(0), "");
    }

    #[test]
    fn test_csv_skip_blank_and_convention_rows() {
        let data = "id,name\n# id: leave blank\n,\n,Alice\n";
        let table = decode(data.as_bytes(), TabularFormat::Csv, "UTF8", true).unwrap();

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].cell(1), "Alice");
        assert_eq!(table.rows[0].row_number, 4);
    }

    #[test]
    fn test_hash_leading_data_rows_are_kept() {
        let data = "#1 Tailors,555,Main St\nJane,1,2\n";
        let table = decode(data.as_bytes(), TabularFormat::Csv, "utf-8", false).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cell(0), "#1 Tailors");

        // 无表头时说明行文本也按数据行返回
        let data = format!("{}\nJane,1,2\n", CONVENTION_ROW);
        let table = decode(data.as_bytes(), TabularFormat::Csv, "utf-8", false).unwrap();
        assert_eq!(table.rows.len(), 2);

        // 说明行只在紧跟表头时丢弃
        let data = "id,name\n#12,Alice\n# id: not first,Bob\n";
        let table = decode(data.as_bytes(), TabularFormat::Csv, "utf-8", true).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cell(0), "#12");
    }

    #[test]
    fn test_csv_ragged_rows_without_header() {
        let data = "Jane Doe,555-1234,42 Elm St\nBob\n";
        let table = decode(data.as_bytes(), TabularFormat::Csv, "utf-8", false).unwrap();

        assert!(table.header.is_none());
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].row_number, 1);
        assert_eq!(table.rows[1].cells.len(), 1);
    }

    #[test]
    fn test_csv_bom_is_stripped() {
        let mut data = UTF8_BOM.to_vec();
        data.extend_from_slice(b"id,name\n1,Jane\n");
        let table = decode(&data, TabularFormat::Csv, "utf-8", true).unwrap();

        assert_eq!(table.header.unwrap()[0], "id");
    }

    #[test]
    fn test_malformed_utf8_is_fatal() {
        let data: &[u8] = b"name\n\xff\xfe\xfd\n";
        let result = decode(data, TabularFormat::Csv, "utf-8", true);
        assert!(matches!(result, Err(ImportError::Decode(_))));
    }

    #[test]
    fn test_unsupported_encoding() {
        let result = decode(b"a,b\n", TabularFormat::Csv, "latin-1", false);
        assert!(matches!(result, Err(ImportError::UnsupportedEncoding(_))));
    }

    #[test]
    fn test_garbage_xlsx_is_fatal() {
        let result = decode(b"not a zip", TabularFormat::Xlsx, "utf-8", true);
        assert!(matches!(result, Err(ImportError::ExcelParseError(_))));
    }

    #[test]
    fn test_render_integral_float() {
        assert_eq!(ExcelParser::render_cell(&Data::Float(100.0)), "100");
        assert_eq!(ExcelParser::render_cell(&Data::Float(12.5)), "12.5");
        assert_eq!(ExcelParser::render_cell(&Data::Bool(true)), "true");
        assert_eq!(ExcelParser::render_cell(&Data::Empty), "");
    }
}
