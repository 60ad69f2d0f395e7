// ==========================================
// Repository 层集成测试
// ==========================================
// 测试目标: 级联删除、搜索、按名称查找与记录API
// ==========================================

mod test_helpers;

use tailor_shop::api::ApiError;
use tailor_shop::domain::{Customer, EntityKind, Payment, Purchase, Requirement};
use tailor_shop::repository::RepositoryError;
use test_helpers::*;

#[test]
fn test_deleting_customer_cascades_to_orders_and_payments() {
    let (_tmp, store) = create_test_store();
    let customer_id = seed_customer(&store, "Jane Doe");
    let order_id = seed_order(&store, customer_id, "Pending", date(2024, 1, 15));
    store
        .payments
        .insert(&Payment {
            id: 0,
            order_id,
            amount: 20.0,
            status: "Pending".to_string(),
            payment_date: None,
            notes: String::new(),
        })
        .unwrap();
    store
        .requirements
        .insert(&Requirement {
            id: 0,
            order_id: Some(order_id),
            description: "Shorten sleeves".to_string(),
            is_fulfilled: false,
            steps_done: vec![],
            steps_not_done: vec!["Stitch".to_string()],
            notes: String::new(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        })
        .unwrap();

    assert!(store.customers.delete(customer_id).unwrap());

    assert_eq!(store.orders.count().unwrap(), 0);
    assert_eq!(store.payments.count().unwrap(), 0);
    assert_eq!(store.requirements.count().unwrap(), 0);
}

#[test]
fn test_deleting_item_nulls_orders_and_removes_purchases() {
    let (_tmp, store) = create_test_store();
    let customer_id = seed_customer(&store, "Jane Doe");
    let item_id = seed_item(&store, "Cotton Roll", 5);
    let supplier_id = seed_supplier(&store, "Acme Textiles");
    let order_id = seed_order(&store, customer_id, "Pending", date(2024, 1, 15));

    let mut order = store.orders.find_by_id(order_id).unwrap().unwrap();
    order.inventory_item_id = Some(item_id);
    store.orders.update(&order).unwrap();

    store
        .purchases
        .insert(&Purchase {
            id: 0,
            supplier_id,
            supplier_name: String::new(),
            item_id,
            item_name: String::new(),
            quantity: 20,
            price: 11.75,
            date: date(2024, 1, 10),
            notes: String::new(),
        })
        .unwrap();

    assert!(store.inventory.delete(item_id).unwrap());

    let order = store.orders.find_by_id(order_id).unwrap().unwrap();
    assert_eq!(order.inventory_item_id, None);
    assert_eq!(order.inventory_item_name, None);
    assert_eq!(store.purchases.count().unwrap(), 0);
}

#[test]
fn test_search_is_case_insensitive_substring() {
    let (_tmp, store) = create_test_store();
    seed_customer(&store, "Jane Doe");
    seed_customer(&store, "Bob Stone");
    store
        .customers
        .insert(&Customer::new("Ann", "555-1111", "9 Doe Lane"))
        .unwrap();

    let found = store.customers.search("doe").unwrap();
    let names: Vec<_> = found.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Jane Doe"));
    assert!(names.contains(&"Ann"));

    // 空白查询返回全部
    assert_eq!(store.customers.search("  ").unwrap().len(), 3);
}

#[test]
fn test_search_treats_wildcards_literally() {
    let (_tmp, store) = create_test_store();
    seed_customer(&store, "50% Off Tailors");
    seed_customer(&store, "500 Club");

    let found = store.customers.search("50%").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "50% Off Tailors");
}

#[test]
fn test_get_or_create_by_name() {
    let (_tmp, store) = create_test_store();
    let existing_id = seed_customer(&store, "Jane Doe");

    let (customer, created) = store.customers.get_or_create_by_name("Jane Doe").unwrap();
    assert!(!created);
    assert_eq!(customer.id, existing_id);

    let (customer, created) = store.customers.get_or_create_by_name("jane doe").unwrap();
    assert!(created);
    assert_ne!(customer.id, existing_id);
    assert_eq!(store.customers.count().unwrap(), 2);
}

#[test]
fn test_update_missing_record_is_not_found() {
    let (_tmp, store) = create_test_store();

    let mut ghost = Customer::new("Ghost", "", "");
    ghost.id = 77;
    let result = store.customers.update(&ghost);
    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
}

#[test]
fn test_record_api_search_and_delete() {
    let (_tmp, state) = create_test_state();
    let id = seed_customer(&state.store, "Jane Doe");

    let json = state
        .record_api
        .search_json(EntityKind::Customer, Some("jane"))
        .unwrap();
    assert_eq!(json[0]["name"], "Jane Doe");

    let customer: Customer = state.record_api.get(id).unwrap();
    assert_eq!(customer.name, "Jane Doe");

    state.record_api.delete(EntityKind::Customer, id).unwrap();
    assert_eq!(state.record_api.count(EntityKind::Customer).unwrap(), 0);

    let result = state.record_api.delete(EntityKind::Customer, id);
    assert!(matches!(result, Err(ApiError::NotFound(_))));
    let result = state.record_api.get::<Customer>(id);
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}
