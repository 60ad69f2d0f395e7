// ==========================================
// 裁缝店业务管理系统 - 表格编码器
// ==========================================
// 支持: CSV / XLSX（单工作表）
// XLSX 列宽 = 该列最长渲染文本（含表头）+ 留白
// ==========================================

use crate::domain::import::RawRow;
use crate::domain::types::TabularFormat;
use crate::exporter::error::{ExportError, ExportResult};
use crate::importer::schema::ColumnMeta;
use csv::WriterBuilder;
use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

/// 默认列宽留白
pub const DEFAULT_COLUMN_PADDING: usize = 2;

pub struct FileWriter {
    column_padding: usize,
}

impl Default for FileWriter {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMN_PADDING)
    }
}

impl FileWriter {
    pub fn new(column_padding: usize) -> Self {
        Self { column_padding }
    }

    /// 编码投影结果: 表头为列展示标签
    pub fn encode(
        &self,
        rows: &[RawRow],
        columns: &[ColumnMeta],
        format: TabularFormat,
        sheet_name: &str,
    ) -> ExportResult<Vec<u8>> {
        let mut grid: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
        grid.push(columns.iter().map(|c| c.label.to_string()).collect());
        grid.extend(rows.iter().map(|r| r.cells.clone()));
        self.write_grid(&grid, format, sheet_name)
    }

    /// 编码二维表格（首行视为表头）
    pub fn write_grid(
        &self,
        grid: &[Vec<String>],
        format: TabularFormat,
        sheet_name: &str,
    ) -> ExportResult<Vec<u8>> {
        let bytes = match format {
            TabularFormat::Csv => Self::write_csv(grid)?,
            TabularFormat::Xlsx => self.write_xlsx(grid, sheet_name)?,
        };
        debug!(
            format = format.extension(),
            rows = grid.len(),
            bytes = bytes.len(),
            "表格编码完成"
        );
        Ok(bytes)
    }

    fn write_csv(grid: &[Vec<String>]) -> ExportResult<Vec<u8>> {
        let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());
        for row in grid {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| ExportError::CsvWriteError(e.to_string()))
    }

    fn write_xlsx(&self, grid: &[Vec<String>], sheet_name: &str) -> ExportResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name)?;

        for (row_idx, row) in grid.iter().enumerate() {
            let row_num = u32::try_from(row_idx)
                .map_err(|_| ExportError::InvalidInput("行数超出 Excel 上限".to_string()))?;
            for (col_idx, value) in row.iter().enumerate() {
                let col_num = u16::try_from(col_idx)
                    .map_err(|_| ExportError::InvalidInput("列数超出 Excel 上限".to_string()))?;
                if row_idx == 0 {
                    worksheet.write_string_with_format(row_num, col_num, value, &header_format)?;
                } else {
                    worksheet.write_string(row_num, col_num, value)?;
                }
            }
        }

        for (col_idx, width) in self.column_widths(grid).into_iter().enumerate() {
            let col_num = u16::try_from(col_idx)
                .map_err(|_| ExportError::InvalidInput("列数超出 Excel 上限".to_string()))?;
            worksheet.set_column_width(col_num, width as f64)?;
        }

        Ok(workbook.save_to_buffer()?)
    }

    /// 每列宽度: 最长字符数 + 留白
    pub fn column_widths(&self, grid: &[Vec<String>]) -> Vec<usize> {
        let columns = grid.iter().map(|r| r.len()).max().unwrap_or(0);
        (0..columns)
            .map(|col| {
                let longest = grid
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0);
                longest + self.column_padding
            })
            .collect()
    }
}

/// 便捷函数: 以默认留白编码
pub fn encode(
    rows: &[RawRow],
    columns: &[ColumnMeta],
    format: TabularFormat,
) -> ExportResult<Vec<u8>> {
    FileWriter::default().encode(rows, columns, format, "Sheet1")
}
