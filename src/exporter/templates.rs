// ==========================================
// 裁缝店业务管理系统 - 导入样例模板
// ==========================================
// 结构: 列键表头（id + 全部可写列）/ 约定说明行 / 样例行
// 说明行以 "# id:" 开头，紧跟表头时被解码器丢弃
// ==========================================

use crate::domain::customer::Customer;
use crate::domain::inventory::InventoryItem;
use crate::domain::order::{Order, Payment, Requirement};
use crate::domain::supplier::{Purchase, Supplier};
use crate::domain::types::{EntityKind, TabularFormat};
use crate::exporter::error::ExportResult;
use crate::exporter::file_writer::FileWriter;
use crate::importer::entity_importer::TabularEntity;

pub use crate::importer::file_parser::CONVENTION_ROW;

/// 按实体类型生成模板
pub fn sample_template_for<T: TabularEntity>() -> Vec<Vec<String>> {
    let schema = T::schema();
    let columns: Vec<_> = schema
        .columns
        .iter()
        .filter(|c| c.meta.key == "id" || c.is_settable())
        .map(|c| &c.meta)
        .collect();

    let header: Vec<String> = columns.iter().map(|m| m.key.to_string()).collect();

    let mut convention = vec![String::new(); header.len()];
    if let Some(first) = convention.first_mut() {
        *first = CONVENTION_ROW.to_string();
    }

    let example: Vec<String> = columns.iter().map(|m| m.example.to_string()).collect();

    vec![header, convention, example]
}

/// 按实体种类生成模板
pub fn sample_template(kind: EntityKind) -> Vec<Vec<String>> {
    match kind {
        EntityKind::Customer => sample_template_for::<Customer>(),
        EntityKind::InventoryItem => sample_template_for::<InventoryItem>(),
        EntityKind::Order => sample_template_for::<Order>(),
        EntityKind::Requirement => sample_template_for::<Requirement>(),
        EntityKind::Payment => sample_template_for::<Payment>(),
        EntityKind::Supplier => sample_template_for::<Supplier>(),
        EntityKind::Purchase => sample_template_for::<Purchase>(),
    }
}

/// 模板文件名: sample_customers.csv
pub fn template_filename(kind: EntityKind) -> String {
    format!("sample_{}.csv", kind.file_stem())
}

/// 模板 CSV 字节
pub fn sample_template_csv(kind: EntityKind) -> ExportResult<Vec<u8>> {
    FileWriter::default().write_grid(&sample_template(kind), TabularFormat::Csv, kind.file_stem())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_template_layout() {
        let grid = sample_template(EntityKind::Customer);
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], vec!["id", "name", "contact", "address"]);
        assert_eq!(grid[1][0], CONVENTION_ROW);
        assert_eq!(grid[2], vec!["", "Jane Doe", "555-1234", "42 Elm St"]);
    }

    #[test]
    fn test_order_template_includes_header_only_columns() {
        let grid = sample_template(EntityKind::Order);
        assert!(grid[0].contains(&"inventory_item".to_string()));
        assert!(grid[0].contains(&"measurements".to_string()));
        assert_eq!(grid[0].len(), grid[2].len());
    }

    #[test]
    fn test_template_filename() {
        assert_eq!(template_filename(EntityKind::Customer), "sample_customers.csv");
        assert_eq!(template_filename(EntityKind::InventoryItem), "sample_inventory.csv");
    }
}
