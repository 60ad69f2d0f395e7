// ==========================================
// 驾驶舱集成测试
// ==========================================

mod test_helpers;

use tailor_shop::domain::{EntityKind, Payment, TabularFormat};
use test_helpers::*;

fn seed_payment(state: &tailor_shop::app::AppState, order_id: i64, amount: f64, status: &str) {
    state
        .store
        .payments
        .insert(&Payment {
            id: 0,
            order_id,
            amount,
            status: status.to_string(),
            payment_date: Some(date(2024, 1, 20)),
            notes: String::new(),
        })
        .unwrap();
}

#[test]
fn test_empty_store_summary() {
    let (_tmp, state) = create_test_state();

    let summary = state.dashboard_api.summary().unwrap();
    assert_eq!(summary.total_customers, 0);
    assert_eq!(summary.total_orders, 0);
    assert_eq!(summary.total_payments, 0.0);
    assert_eq!(summary.low_stock_threshold, 5);

    let analytics = state.dashboard_api.analytics().unwrap();
    assert!(analytics.orders_per_month.is_empty());
    assert!(analytics.top_customers.is_empty());
}

#[test]
fn test_summary_counts() {
    let (_tmp, state) = create_test_state();
    let jane = seed_customer(&state.store, "Jane Doe");
    let bob = seed_customer(&state.store, "Bob Stone");
    let o1 = seed_order(&state.store, jane, "Pending", date(2024, 1, 15));
    seed_order(&state.store, jane, "pending", date(2024, 2, 1));
    seed_order(&state.store, bob, "Completed", date(2024, 2, 3));
    seed_item(&state.store, "Cotton Roll", 3);
    seed_item(&state.store, "Silk Roll", 20);
    seed_supplier(&state.store, "Acme Textiles");
    seed_payment(&state, o1, 100.0, "Paid");
    seed_payment(&state, o1, 50.0, "Pending");

    let summary = state.dashboard_api.summary().unwrap();
    assert_eq!(summary.total_customers, 2);
    assert_eq!(summary.total_orders, 3);
    assert_eq!(summary.pending_orders, 2);
    assert_eq!(summary.inventory_items, 2);
    assert_eq!(summary.low_stock_items, 1);
    assert!((summary.total_payments - 150.0).abs() < 1e-9);
    assert!((summary.outstanding_payments - 50.0).abs() < 1e-9);
    assert_eq!(summary.total_suppliers, 1);
    assert_eq!(summary.total_purchases, 0);
}

#[test]
fn test_low_stock_threshold_from_config() {
    let (_tmp, state) = create_test_state();
    seed_item(&state.store, "Cotton Roll", 3);
    seed_item(&state.store, "Silk Roll", 20);

    state
        .config
        .set_global_config_value("dashboard.low_stock_threshold", "25")
        .unwrap();

    let summary = state.dashboard_api.summary().unwrap();
    assert_eq!(summary.low_stock_threshold, 25);
    assert_eq!(summary.low_stock_items, 2);
}

#[test]
fn test_analytics_after_import() {
    let (_tmp, state) = create_test_state();

    let csv = "Jane Doe,stitched,Pending,2024-01-15,,\n\
               Jane Doe,stitched,Pending,2024-01-20,,\n\
               Bob Stone,unstitched,Completed,2024-02-03,,\n";
    state
        .import_api
        .import_bytes(EntityKind::Order, csv.as_bytes(), TabularFormat::Csv, None, false)
        .unwrap();
    seed_item(&state.store, "Cotton Roll", 3);
    seed_item(&state.store, "Silk Roll", 20);

    let analytics = state.dashboard_api.analytics().unwrap();
    assert_eq!(
        analytics.orders_per_month,
        vec![("2024-01".to_string(), 2), ("2024-02".to_string(), 1)]
    );
    assert_eq!(analytics.top_customers[0], ("Jane Doe".to_string(), 2));
    assert_eq!(analytics.top_stock_items[0], ("Silk Roll".to_string(), 20));
}
