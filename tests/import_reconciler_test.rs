// ==========================================
// 导入对账集成测试
// ==========================================
// 测试目标: 字节 → 解码 → 对账 → 落库，汇总消息与计数
// ==========================================

mod test_helpers;

use tailor_shop::api::ApiError;
use tailor_shop::domain::{EntityKind, ImportOutcome, TabularFormat};
use tailor_shop::importer::{decode, reconcile};
use test_helpers::*;

fn assert_counts_consistent(outcome: &ImportOutcome) {
    assert_eq!(
        outcome.created + outcome.updated + outcome.skipped,
        outcome.total_rows,
        "created + updated + skipped must equal total rows"
    );
}

// ==========================================
// 固定位置模式
// ==========================================

#[test]
fn test_positional_customer_import_creates_record() {
    let (_tmp, state) = create_test_state();

    let response = state
        .import_api
        .import_bytes(
            EntityKind::Customer,
            b"Jane Doe,555-1234,42 Elm St\n",
            TabularFormat::Csv,
            None,
            false,
        )
        .unwrap();

    assert_eq!(response.outcome.created, 1);
    assert_eq!(response.outcome.skipped, 0);
    assert_eq!(response.message, "Created 1 customers. Updated 0.");

    let customer = state.store.customers.find_by_name("Jane Doe").unwrap().unwrap();
    assert_eq!(customer.contact, "555-1234");
    assert_eq!(customer.address, "42 Elm St");
}

#[test]
fn test_short_row_is_skipped_with_reason() {
    let (_tmp, state) = create_test_state();

    let response = state
        .import_api
        .import_bytes(
            EntityKind::Customer,
            b"Jane Doe,555-1234,42 Elm St\nBob,555\n",
            TabularFormat::Csv,
            None,
            false,
        )
        .unwrap();

    assert_eq!(response.outcome.created, 1);
    assert_eq!(response.outcome.skipped, 1);
    assert_eq!(response.outcome.skip_reasons[0].row_number, 2);
    assert!(response.message.contains("Row 2: Not enough columns"));
    assert_eq!(state.store.customers.count().unwrap(), 1);
}

#[test]
fn test_header_without_id_uses_fixed_positions() {
    let (_tmp, state) = create_test_state();

    let csv = "order,description,is_fulfilled,steps_done,steps_not_done,notes\n\
               999,Shorten sleeves,No,,,\n";
    let response = state
        .import_api
        .import_bytes(EntityKind::Requirement, csv.as_bytes(), TabularFormat::Csv, None, true)
        .unwrap();

    assert_eq!(response.outcome.created, 0);
    assert_eq!(response.outcome.skipped, 1);
    assert!(response.message.contains("Row 2: Order not found"));
    assert_eq!(state.store.requirements.count().unwrap(), 0);
}

#[test]
fn test_requirement_import_attaches_to_existing_order() {
    let (_tmp, state) = create_test_state();
    let customer_id = seed_customer(&state.store, "Jane Doe");
    let order_id = seed_order(&state.store, customer_id, "Pending", date(2024, 1, 15));

    let csv = format!("{},Shorten sleeves,Yes,Measure; Cut,Stitch,Rush\n", order_id);
    let response = state
        .import_api
        .import_bytes(EntityKind::Requirement, csv.as_bytes(), TabularFormat::Csv, None, false)
        .unwrap();

    assert_eq!(response.outcome.created, 1);
    let requirements = state.store.requirements.list_all().unwrap();
    assert_eq!(requirements[0].order_id, Some(order_id));
    assert!(requirements[0].is_fulfilled);
    assert_eq!(requirements[0].steps_done, vec!["Measure", "Cut"]);
    assert_eq!(requirements[0].steps_not_done, vec!["Stitch"]);
}

// ==========================================
// 表头映射模式
// ==========================================

#[test]
fn test_order_import_creates_missing_customer_by_name() {
    let (_tmp, state) = create_test_state();

    let csv = "id,customer,product_type,status,order_date\n\
               ,New Co,stitched,Pending,2024-01-15\n";
    let response = state
        .import_api
        .import_bytes(EntityKind::Order, csv.as_bytes(), TabularFormat::Csv, None, true)
        .unwrap();

    assert_eq!(response.outcome.created, 1);
    let customer = state.store.customers.find_by_name("New Co").unwrap();
    assert!(customer.is_some());

    let orders = state.store.orders.list_all().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].customer_name, "New Co");
    assert_eq!(orders[0].order_date, date(2024, 1, 15));
}

#[test]
fn test_order_import_reuses_existing_customer() {
    let (_tmp, state) = create_test_state();
    seed_customer(&state.store, "Jane Doe");

    let csv = "id,customer,product_type,status,order_date\n\
               ,Jane Doe,unstitched,Pending,2024-02-01\n\
               ,Jane Doe,stitched,Completed,2024-02-03\n";
    let response = state
        .import_api
        .import_bytes(EntityKind::Order, csv.as_bytes(), TabularFormat::Csv, None, true)
        .unwrap();

    assert_eq!(response.outcome.created, 2);
    assert_eq!(state.store.customers.count().unwrap(), 1);
}

#[test]
fn test_update_by_id_changes_only_mapped_fields() {
    let (_tmp, state) = create_test_state();
    let id = seed_customer(&state.store, "Jane Doe");

    let csv = format!("id,name,contact\n{},Jane Smith,555-9999\n", id);
    let response = state
        .import_api
        .import_bytes(EntityKind::Customer, csv.as_bytes(), TabularFormat::Csv, None, true)
        .unwrap();

    assert_eq!(response.outcome.updated, 1);
    assert_eq!(response.outcome.created, 0);
    assert_eq!(state.store.customers.count().unwrap(), 1);

    let customer = state.store.customers.find_by_id(id).unwrap().unwrap();
    assert_eq!(customer.name, "Jane Smith");
    assert_eq!(customer.contact, "555-9999");
    assert_eq!(customer.address, "1 Test St");
}

#[test]
fn test_blank_or_unknown_id_creates_new_record() {
    let (_tmp, state) = create_test_state();
    seed_customer(&state.store, "Jane Doe");

    let csv = "id,name\n,Bob\n4242,Alice\n";
    let response = state
        .import_api
        .import_bytes(EntityKind::Customer, csv.as_bytes(), TabularFormat::Csv, None, true)
        .unwrap();

    assert_eq!(response.outcome.created, 2);
    assert_eq!(response.outcome.updated, 0);
    assert_eq!(state.store.customers.count().unwrap(), 3);
}

#[test]
fn test_missing_required_field_on_create() {
    let (_tmp, state) = create_test_state();

    let csv = "id,contact\n,555-1234\n";
    let response = state
        .import_api
        .import_bytes(EntityKind::Customer, csv.as_bytes(), TabularFormat::Csv, None, true)
        .unwrap();

    assert_eq!(response.outcome.skipped, 1);
    assert_eq!(
        response.outcome.skip_reasons[0].message,
        "Missing required fields: name"
    );
}

#[test]
fn test_failed_update_leaves_record_unchanged() {
    let (_tmp, state) = create_test_state();
    let id = seed_item(&state.store, "Cotton Roll", 10);

    let csv = format!("id,item_name,stock_quantity\n{},Linen Roll,-3\n", id);
    let response = state
        .import_api
        .import_bytes(EntityKind::InventoryItem, csv.as_bytes(), TabularFormat::Csv, None, true)
        .unwrap();

    assert_eq!(response.outcome.skipped, 1);
    let item = state.store.inventory.find_by_id(id).unwrap().unwrap();
    assert_eq!(item.item_name, "Cotton Roll");
    assert_eq!(item.stock_quantity, 10);
}

#[test]
fn test_purchase_with_unknown_supplier_is_skipped() {
    let (_tmp, state) = create_test_state();
    seed_item(&state.store, "Cotton Roll", 10);
    seed_supplier(&state.store, "Acme Textiles");

    let csv = "id,supplier,item,quantity,price,date\n\
               ,Acme Textiles,Cotton Roll,20,11.75,2024-01-10\n\
               ,Nobody Ltd,Cotton Roll,5,9.00,2024-01-11\n";
    let response = state
        .import_api
        .import_bytes(EntityKind::Purchase, csv.as_bytes(), TabularFormat::Csv, None, true)
        .unwrap();

    assert_eq!(response.outcome.created, 1);
    assert_eq!(response.outcome.skipped, 1);
    assert!(response.message.contains("Row 3: Supplier not found"));

    let purchases = state.store.purchases.list_all().unwrap();
    assert_eq!(purchases[0].supplier_name, "Acme Textiles");
    assert_eq!(purchases[0].item_name, "Cotton Roll");
}

#[test]
fn test_skipped_order_row_does_not_create_customer() {
    let (_tmp, state) = create_test_state();

    let csv = "id,customer,product_type,status,order_date,inventory_item\n\
               ,Ghost Co,stitched,Pending,2024-01-15,No Such Item\n";
    let response = state
        .import_api
        .import_bytes(EntityKind::Order, csv.as_bytes(), TabularFormat::Csv, None, true)
        .unwrap();

    assert_eq!(response.outcome.skipped, 1);
    assert!(response.message.contains("Row 2: Inventory item not found"));
    assert!(state.store.customers.find_by_name("Ghost Co").unwrap().is_none());
    assert_eq!(state.store.customers.count().unwrap(), 0);
    assert_eq!(state.store.orders.count().unwrap(), 0);
}

#[test]
fn test_numeric_item_name_binds_by_name_before_id() {
    let (_tmp, state) = create_test_state();
    let cotton_id = seed_item(&state.store, "Cotton Roll", 10);
    let numeric_id = seed_item(&state.store, &cotton_id.to_string(), 5);
    assert_ne!(cotton_id, numeric_id);
    seed_supplier(&state.store, "Acme Textiles");

    let csv = format!(
        "id,supplier,item,quantity,price,date\n\
         ,Acme Textiles,{},20,11.75,2024-01-10\n\
         ,Acme Textiles,#{},5,9.00,2024-01-11\n",
        cotton_id, cotton_id
    );
    let response = state
        .import_api
        .import_bytes(EntityKind::Purchase, csv.as_bytes(), TabularFormat::Csv, None, true)
        .unwrap();

    assert_eq!(response.outcome.created, 2);
    let purchases = state.store.purchases.list_all().unwrap();
    let by_quantity = |q: u32| purchases.iter().find(|p| p.quantity == q).unwrap();
    // 纯数字按品名命中；"#id" 无同名品项时按 id 命中
    assert_eq!(by_quantity(20).item_id, numeric_id);
    assert_eq!(by_quantity(5).item_id, cotton_id);
}

#[test]
fn test_hash_leading_rows_are_imported_and_counted() {
    let (_tmp, state) = create_test_state();

    let response = state
        .import_api
        .import_bytes(
            EntityKind::Customer,
            b"#1 Tailors,555,Main St\nJane,1,2\n",
            TabularFormat::Csv,
            None,
            false,
        )
        .unwrap();

    assert_eq!(response.outcome.total_rows, 2);
    assert_eq!(response.outcome.created, 2);
    assert_counts_consistent(&response.outcome);
    assert!(state.store.customers.find_by_name("#1 Tailors").unwrap().is_some());
}

#[test]
fn test_hash_prefixed_id_updates_in_header_mode() {
    let (_tmp, state) = create_test_state();
    let id = seed_customer(&state.store, "Jane Doe");

    let csv = format!("id,name\n#{},Jane Smith\n", id);
    let response = state
        .import_api
        .import_bytes(EntityKind::Customer, csv.as_bytes(), TabularFormat::Csv, None, true)
        .unwrap();

    assert_eq!(response.outcome.updated, 1);
    assert_counts_consistent(&response.outcome);
    let customer = state.store.customers.find_by_id(id).unwrap().unwrap();
    assert_eq!(customer.name, "Jane Smith");
}

// ==========================================
// 汇总与不变量
// ==========================================

#[test]
fn test_mixed_rows_keep_counts_consistent() {
    let (_tmp, state) = create_test_state();
    let customer_id = seed_customer(&state.store, "Jane Doe");
    let order_id = seed_order(&state.store, customer_id, "Pending", date(2024, 1, 15));

    let csv = format!(
        "{o},150.00,Paid,2024-01-20,\n{o},abc,Paid,2024-01-20,\n999,10,Pending,,\n{o},75,Pending\n",
        o = order_id
    );
    let response = state
        .import_api
        .import_bytes(EntityKind::Payment, csv.as_bytes(), TabularFormat::Csv, None, false)
        .unwrap();

    let outcome = &response.outcome;
    assert_counts_consistent(outcome);
    assert_eq!(outcome.total_rows, 4);
    assert_eq!(outcome.created, 1);
    assert_eq!(outcome.skipped, 3);
    assert_eq!(
        outcome.skip_reasons.iter().map(|r| r.row_number).collect::<Vec<_>>(),
        vec![2, 3, 4]
    );
    assert!(outcome.skip_reasons[0].message.contains("amount"));
    assert_eq!(outcome.skip_reasons[1].message, "Order not found");
}

#[test]
fn test_summary_is_truncated_after_preview_limit() {
    let (_tmp, state) = create_test_state();

    let csv: String = (0..7).map(|_| "only-one-cell\n").collect();
    let response = state
        .import_api
        .import_bytes(EntityKind::Customer, csv.as_bytes(), TabularFormat::Csv, None, false)
        .unwrap();

    assert_eq!(response.outcome.skipped, 7);
    assert_eq!(response.preview.len(), 5);
    assert!(response.truncated);
    assert!(response.message.ends_with(" ..."));
    assert!(response.message.contains("Row 5:"));
    assert!(!response.message.contains("Row 6:"));
}

#[test]
fn test_preview_limit_follows_config() {
    let (_tmp, state) = create_test_state();
    state
        .config
        .set_global_config_value("import.skip_reason_preview_limit", "2")
        .unwrap();
    assert_eq!(
        state
            .config
            .get_global_config_value("import.skip_reason_preview_limit")
            .unwrap()
            .as_deref(),
        Some("2")
    );

    let csv: String = (0..3).map(|_| "x\n").collect();
    let response = state
        .import_api
        .import_bytes(EntityKind::Customer, csv.as_bytes(), TabularFormat::Csv, None, false)
        .unwrap();

    assert_eq!(response.preview.len(), 2);
    assert!(response.truncated);
}

// ==========================================
// 文件级错误
// ==========================================

#[test]
fn test_malformed_utf8_aborts_import() {
    let (_tmp, state) = create_test_state();

    let bytes = [0x4a, 0x61, 0xff, 0xfe, 0x2c, 0x31, 0x0a];
    let result = state.import_api.import_bytes(
        EntityKind::Customer,
        &bytes,
        TabularFormat::Csv,
        None,
        false,
    );

    assert!(matches!(result, Err(ApiError::ImportError(_))));
    assert_eq!(state.store.customers.count().unwrap(), 0);
}

#[test]
fn test_unsupported_encoding_is_rejected() {
    let (_tmp, state) = create_test_state();

    let result = state.import_api.import_bytes(
        EntityKind::Customer,
        b"Jane Doe,555,Elm\n",
        TabularFormat::Csv,
        Some("latin-1"),
        false,
    );

    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

// ==========================================
// 往返与模板
// ==========================================

#[test]
fn test_csv_export_then_import_updates_without_duplicates() {
    let (_tmp, state) = create_test_state();
    seed_customer(&state.store, "Jane Doe");
    seed_customer(&state.store, "Bob, Jr.");

    let exported = state
        .export_api
        .export(EntityKind::Customer, &[], None, TabularFormat::Csv)
        .unwrap();

    let response = state
        .import_api
        .import_bytes(EntityKind::Customer, &exported.bytes, TabularFormat::Csv, None, true)
        .unwrap();

    assert_eq!(response.outcome.updated, 2);
    assert_eq!(response.outcome.created, 0);
    assert_eq!(response.outcome.skipped, 0);
    assert_eq!(state.store.customers.count().unwrap(), 2);
    assert!(state.store.customers.find_by_name("Bob, Jr.").unwrap().is_some());
}

#[test]
fn test_xlsx_export_then_import_round_trips_inventory() {
    let (_tmp, state) = create_test_state();
    let id = seed_item(&state.store, "Cotton Roll", 10);

    let exported = state
        .export_api
        .export(EntityKind::InventoryItem, &[], None, TabularFormat::Xlsx)
        .unwrap();
    assert_eq!(exported.filename, "inventory.xlsx");

    let response = state
        .import_api
        .import_bytes(EntityKind::InventoryItem, &exported.bytes, TabularFormat::Xlsx, None, true)
        .unwrap();

    assert_eq!(response.outcome.updated, 1);
    assert_eq!(response.outcome.skipped, 0);

    let item = state.store.inventory.find_by_id(id).unwrap().unwrap();
    assert_eq!(item.stock_quantity, 10);
    assert!((item.cost_per_meter - 12.5).abs() < f64::EPSILON);
    assert!(!item.is_printed);
}

#[test]
fn test_sample_template_imports_example_row() {
    let (_tmp, state) = create_test_state();

    for kind in [EntityKind::Customer, EntityKind::Supplier, EntityKind::InventoryItem] {
        let template = state.export_api.template(kind).unwrap();
        let response = state
            .import_api
            .import_bytes(kind, &template.bytes, TabularFormat::Csv, None, true)
            .unwrap();
        assert_eq!(response.outcome.created, 1, "template for {}", kind);
        assert_eq!(response.outcome.skipped, 0, "template for {}", kind);
    }
}

#[test]
fn test_free_functions_share_pipeline() {
    let (_tmp, store) = create_test_store();

    let table = decode(
        b"Acme Textiles,John Smith,1 Mill Road,sales@acme.test,555-0100\n",
        TabularFormat::Csv,
        "utf-8",
        false,
    )
    .unwrap();
    let outcome = reconcile(&table, EntityKind::Supplier, &store);

    assert_eq!(outcome.created, 1);
    assert_counts_consistent(&outcome);
    assert!(store.suppliers.find_by_name("Acme Textiles").unwrap().is_some());
}
