// ==========================================
// 裁缝店业务管理系统 - 各实体列声明与导入实现
// ==========================================
// 列顺序即固定位置导入顺序与默认导出顺序
// 关联列按名称或 id 解析，找不到则该行跳过
// （例外: 订单的客户按名称查找，不存在则创建）
// ==========================================

use crate::domain::customer::Customer;
use crate::domain::inventory::InventoryItem;
use crate::domain::order::{Order, Payment, Requirement};
use crate::domain::supplier::{Purchase, Supplier};
use crate::domain::types::{EntityKind, ItemType};
use crate::importer::entity_importer::{ImportableEntity, TabularEntity};
use crate::importer::error::{RowError, RowResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::schema::{
    column, fmt_bool, fmt_checklist, fmt_date, fmt_decimal, fmt_optional_date, fmt_timestamp,
    EntitySchema, ImportContext, TypeHint,
};
use crate::repository::{RepositoryResult, ShopStore};
use chrono::Utc;

fn required_decimal(field: &str, value: &str) -> RowResult<f64> {
    FieldMapper::required_text(field, value)?;
    FieldMapper::parse_decimal(field, value)
}

fn required_quantity(field: &str, value: &str) -> RowResult<u32> {
    FieldMapper::required_text(field, value)?;
    FieldMapper::parse_quantity(field, value)
}

fn required_date(field: &str, value: &str) -> RowResult<chrono::NaiveDate> {
    FieldMapper::required_text(field, value)?;
    FieldMapper::parse_date(field, value)
}

fn load_with<T>(
    query: Option<&str>,
    search: impl FnOnce(&str) -> RepositoryResult<Vec<T>>,
    list_all: impl FnOnce() -> RepositoryResult<Vec<T>>,
) -> RepositoryResult<Vec<T>> {
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => search(q),
        None => list_all(),
    }
}

// ==========================================
// 关联解析
// ==========================================

/// 订单: 按 id（允许 "#12"）
fn resolve_order(field: &str, value: &str, ctx: &ImportContext<'_>) -> RowResult<Order> {
    let raw = FieldMapper::required_text(field, value)?;
    let id = FieldMapper::parse_record_id(&raw)
        .ok_or_else(|| RowError::conversion(field, value, "order id"))?;
    ctx.store
        .orders
        .find_by_id(id)?
        .ok_or(RowError::OrderNotFound)
}

/// 库存项: 先按品名精确匹配，再按 id（导出写的是品名，纯数字品名优先按名称）
fn resolve_item(value: &str, ctx: &ImportContext<'_>) -> RowResult<InventoryItem> {
    if let Some(item) = ctx.store.inventory.find_by_name(value.trim())? {
        return Ok(item);
    }
    let by_id = match FieldMapper::parse_record_id(value) {
        Some(id) => ctx.store.inventory.find_by_id(id)?,
        None => None,
    };
    by_id.ok_or(RowError::InventoryItemNotFound)
}

/// 供应商: 先按名称精确匹配，再按 id
fn resolve_supplier(value: &str, ctx: &ImportContext<'_>) -> RowResult<Supplier> {
    if let Some(supplier) = ctx.store.suppliers.find_by_name(value.trim())? {
        return Ok(supplier);
    }
    let by_id = match FieldMapper::parse_record_id(value) {
        Some(id) => ctx.store.suppliers.find_by_id(id)?,
        None => None,
    };
    by_id.ok_or(RowError::SupplierNotFound)
}

// ==========================================
// Customer
// ==========================================
impl TabularEntity for Customer {
    const KIND: EntityKind = EntityKind::Customer;

    fn schema() -> EntitySchema<Self> {
        EntitySchema::<Self>::new(Self::KIND)
            .read_only("id", "ID", TypeHint::Integer, |c| c.id.to_string())
            .field(
                column("name", "Name", TypeHint::Text).required().example("Jane Doe"),
                |c| c.name.clone(),
                |c, v| {
                    c.name = FieldMapper::required_text("name", v)?;
                    Ok(())
                },
            )
            .field(
                column("contact", "Contact", TypeHint::Text).example("555-1234"),
                |c| c.contact.clone(),
                |c, v| {
                    c.contact = v.trim().to_string();
                    Ok(())
                },
            )
            .field(
                column("address", "Address", TypeHint::Text).example("42 Elm St"),
                |c| c.address.clone(),
                |c, v| {
                    c.address = v.trim().to_string();
                    Ok(())
                },
            )
            .read_only("created_at", "Created At", TypeHint::Timestamp, |c| {
                fmt_timestamp(c.created_at)
            })
    }

    fn load(store: &ShopStore, query: Option<&str>) -> RepositoryResult<Vec<Self>> {
        load_with(query, |q| store.customers.search(q), || store.customers.list_all())
    }
}

impl ImportableEntity for Customer {
    fn draft(_ctx: &ImportContext<'_>) -> Self {
        Customer::new("", "", "")
    }

    fn find(store: &ShopStore, id: i64) -> RepositoryResult<Option<Self>> {
        store.customers.find_by_id(id)
    }

    fn insert(&mut self, store: &ShopStore) -> RepositoryResult<i64> {
        self.id = store.customers.insert(self)?;
        Ok(self.id)
    }

    fn update(&self, store: &ShopStore) -> RepositoryResult<()> {
        store.customers.update(self)
    }
}

// ==========================================
// InventoryItem
// ==========================================
impl TabularEntity for InventoryItem {
    const KIND: EntityKind = EntityKind::InventoryItem;

    fn schema() -> EntitySchema<Self> {
        EntitySchema::<Self>::new(Self::KIND)
            .read_only("id", "ID", TypeHint::Integer, |i| i.id.to_string())
            .field(
                column("item_name", "Item Name", TypeHint::Text).required().example("Cotton Roll"),
                |i| i.item_name.clone(),
                |i, v| {
                    i.item_name = FieldMapper::required_text("item_name", v)?;
                    Ok(())
                },
            )
            .field(
                column("item_type", "Item Type", TypeHint::Choice).required().example("unstitched"),
                |i| i.item_type.label().to_string(),
                |i, v| {
                    i.item_type = FieldMapper::parse_item_type("item_type", v)?;
                    Ok(())
                },
            )
            .field(
                column("fabric_type", "Fabric Type", TypeHint::Text).required().example("Cotton"),
                |i| i.fabric_type.clone(),
                |i, v| {
                    i.fabric_type = FieldMapper::required_text("fabric_type", v)?;
                    Ok(())
                },
            )
            .field(
                column("cost_per_meter", "Cost Per Meter", TypeHint::Decimal).required().example("12.50"),
                |i| fmt_decimal(i.cost_per_meter),
                |i, v| {
                    i.cost_per_meter = required_decimal("cost_per_meter", v)?;
                    Ok(())
                },
            )
            .field(
                column("total_meters", "Total Meters", TypeHint::Decimal).required().example("40.00"),
                |i| fmt_decimal(i.total_meters),
                |i, v| {
                    i.total_meters = required_decimal("total_meters", v)?;
                    Ok(())
                },
            )
            .field(
                column("taxes", "Taxes", TypeHint::Decimal).example("0.00"),
                |i| fmt_decimal(i.taxes),
                |i, v| {
                    i.taxes = FieldMapper::parse_decimal_or("taxes", v, 0.0)?;
                    Ok(())
                },
            )
            .field(
                column("size", "Size", TypeHint::Text).example("M"),
                |i| i.size.clone(),
                |i, v| {
                    i.size = v.trim().to_string();
                    Ok(())
                },
            )
            .field(
                column("color", "Color", TypeHint::Text).example("White"),
                |i| i.color.clone(),
                |i, v| {
                    i.color = v.trim().to_string();
                    Ok(())
                },
            )
            .field(
                column("is_printed", "Is Printed", TypeHint::Boolean).example("No"),
                |i| fmt_bool(i.is_printed),
                |i, v| {
                    i.is_printed = FieldMapper::parse_bool(v);
                    Ok(())
                },
            )
            .field(
                column("stock_quantity", "Stock Quantity", TypeHint::Integer).example("10"),
                |i| i.stock_quantity.to_string(),
                |i, v| {
                    i.stock_quantity = FieldMapper::parse_quantity_or("stock_quantity", v, 0)?;
                    Ok(())
                },
            )
            .field(
                column("supplier", "Supplier", TypeHint::Text).example("Acme Textiles"),
                |i| i.supplier.clone(),
                |i, v| {
                    i.supplier = v.trim().to_string();
                    Ok(())
                },
            )
    }

    fn load(store: &ShopStore, query: Option<&str>) -> RepositoryResult<Vec<Self>> {
        load_with(query, |q| store.inventory.search(q), || store.inventory.list_all())
    }
}

impl ImportableEntity for InventoryItem {
    fn draft(_ctx: &ImportContext<'_>) -> Self {
        InventoryItem {
            id: 0,
            item_name: String::new(),
            item_type: ItemType::Unstitched,
            fabric_type: String::new(),
            cost_per_meter: 0.0,
            total_meters: 0.0,
            taxes: 0.0,
            size: String::new(),
            color: String::new(),
            is_printed: false,
            stock_quantity: 0,
            supplier: String::new(),
        }
    }

    fn find(store: &ShopStore, id: i64) -> RepositoryResult<Option<Self>> {
        store.inventory.find_by_id(id)
    }

    fn insert(&mut self, store: &ShopStore) -> RepositoryResult<i64> {
        self.id = store.inventory.insert(self)?;
        Ok(self.id)
    }

    fn update(&self, store: &ShopStore) -> RepositoryResult<()> {
        store.inventory.update(self)
    }
}

// ==========================================
// Order
// ==========================================
impl TabularEntity for Order {
    const KIND: EntityKind = EntityKind::Order;

    fn schema() -> EntitySchema<Self> {
        EntitySchema::<Self>::new(Self::KIND)
            .read_only("id", "ID", TypeHint::Integer, |o| o.id.to_string())
            .get_or_create_reference(
                column("customer", "Customer", TypeHint::Reference).required().example("Jane Doe"),
                |o| o.customer_name.clone(),
                |o, v, ctx| {
                    // 名称原样匹配，不做大小写或空白归一
                    let name = FieldMapper::required_text("customer", v)?;
                    let (customer, _created) = ctx.store.customers.get_or_create_by_name(&name)?;
                    o.customer_id = customer.id;
                    o.customer_name = customer.name;
                    Ok(())
                },
            )
            .field(
                column("product_type", "Product Type", TypeHint::Choice).required().example("stitched"),
                |o| o.product_type.label().to_string(),
                |o, v| {
                    o.product_type = FieldMapper::parse_item_type("product_type", v)?;
                    Ok(())
                },
            )
            .field(
                column("status", "Status", TypeHint::Text).required().example("Pending"),
                |o| o.status.clone(),
                |o, v| {
                    o.status = FieldMapper::required_text("status", v)?;
                    Ok(())
                },
            )
            .field(
                column("order_date", "Order Date", TypeHint::Date).required().example("2024-01-15"),
                |o| fmt_date(o.order_date),
                |o, v| {
                    o.order_date = required_date("order_date", v)?;
                    Ok(())
                },
            )
            .field(
                column("delivery_date", "Delivery Date", TypeHint::Date).example("2024-01-30"),
                |o| fmt_optional_date(o.delivery_date),
                |o, v| {
                    o.delivery_date = FieldMapper::parse_optional_date("delivery_date", v)?;
                    Ok(())
                },
            )
            .field(
                column("notes", "Notes", TypeHint::Text),
                |o| o.notes.clone(),
                |o, v| {
                    o.notes = v.trim().to_string();
                    Ok(())
                },
            )
            .reference(
                column("inventory_item", "Inventory Item", TypeHint::Reference)
                    .header_only()
                    .example("Cotton Roll"),
                |o| o.inventory_item_name.clone().unwrap_or_default(),
                |o, v, ctx| {
                    if v.trim().is_empty() {
                        o.inventory_item_id = None;
                        o.inventory_item_name = None;
                        return Ok(());
                    }
                    let item = resolve_item(v, ctx)?;
                    o.inventory_item_id = Some(item.id);
                    o.inventory_item_name = Some(item.item_name);
                    Ok(())
                },
            )
            .field(
                column("measurements", "Measurements", TypeHint::Json)
                    .header_only()
                    .example(r#"{"chest": 40, "waist": 34}"#),
                |o| o.measurements.clone().unwrap_or_default(),
                |o, v| {
                    o.measurements = FieldMapper::optional_text(v);
                    Ok(())
                },
            )
    }

    fn load(store: &ShopStore, query: Option<&str>) -> RepositoryResult<Vec<Self>> {
        load_with(query, |q| store.orders.search(q), || store.orders.list_all())
    }
}

impl ImportableEntity for Order {
    fn draft(ctx: &ImportContext<'_>) -> Self {
        Order {
            id: 0,
            customer_id: 0,
            customer_name: String::new(),
            inventory_item_id: None,
            inventory_item_name: None,
            product_type: ItemType::Stitched,
            measurements: None,
            status: "Pending".to_string(),
            notes: String::new(),
            order_date: ctx.today,
            delivery_date: None,
        }
    }

    fn find(store: &ShopStore, id: i64) -> RepositoryResult<Option<Self>> {
        store.orders.find_by_id(id)
    }

    fn insert(&mut self, store: &ShopStore) -> RepositoryResult<i64> {
        self.id = store.orders.insert(self)?;
        Ok(self.id)
    }

    fn update(&self, store: &ShopStore) -> RepositoryResult<()> {
        store.orders.update(self)
    }
}

// ==========================================
// Requirement
// ==========================================
impl TabularEntity for Requirement {
    const KIND: EntityKind = EntityKind::Requirement;

    fn schema() -> EntitySchema<Self> {
        EntitySchema::<Self>::new(Self::KIND)
            .read_only("id", "ID", TypeHint::Integer, |r| r.id.to_string())
            .reference(
                column("order", "Order", TypeHint::Reference).required().example("1"),
                |r| r.order_id.map(|id| id.to_string()).unwrap_or_default(),
                |r, v, ctx| {
                    r.order_id = Some(resolve_order("order", v, ctx)?.id);
                    Ok(())
                },
            )
            .field(
                column("description", "Description", TypeHint::Text)
                    .required()
                    .example("Shorten sleeves"),
                |r| r.description.clone(),
                |r, v| {
                    r.description = FieldMapper::required_text("description", v)?;
                    Ok(())
                },
            )
            .field(
                column("is_fulfilled", "Is Fulfilled", TypeHint::Boolean).example("No"),
                |r| fmt_bool(r.is_fulfilled),
                |r, v| {
                    r.is_fulfilled = FieldMapper::parse_bool(v);
                    Ok(())
                },
            )
            .field(
                column("steps_done", "Steps Done", TypeHint::Checklist).example("Measure; Cut"),
                |r| fmt_checklist(&r.steps_done),
                |r, v| {
                    r.steps_done = FieldMapper::parse_checklist(v);
                    Ok(())
                },
            )
            .field(
                column("steps_not_done", "Steps Not Done", TypeHint::Checklist).example("Stitch; Press"),
                |r| fmt_checklist(&r.steps_not_done),
                |r, v| {
                    r.steps_not_done = FieldMapper::parse_checklist(v);
                    Ok(())
                },
            )
            .field(
                column("notes", "Notes", TypeHint::Text),
                |r| r.notes.clone(),
                |r, v| {
                    r.notes = v.trim().to_string();
                    Ok(())
                },
            )
            .read_only("created_at", "Created At", TypeHint::Timestamp, |r| {
                fmt_timestamp(r.created_at)
            })
            .read_only("updated_at", "Updated At", TypeHint::Timestamp, |r| {
                fmt_timestamp(r.updated_at)
            })
    }

    fn load(store: &ShopStore, query: Option<&str>) -> RepositoryResult<Vec<Self>> {
        load_with(query, |q| store.requirements.search(q), || store.requirements.list_all())
    }
}

impl ImportableEntity for Requirement {
    fn draft(_ctx: &ImportContext<'_>) -> Self {
        let now = Utc::now();
        Requirement {
            id: 0,
            order_id: None,
            description: String::new(),
            is_fulfilled: false,
            steps_done: Vec::new(),
            steps_not_done: Vec::new(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn find(store: &ShopStore, id: i64) -> RepositoryResult<Option<Self>> {
        store.requirements.find_by_id(id)
    }

    fn insert(&mut self, store: &ShopStore) -> RepositoryResult<i64> {
        self.id = store.requirements.insert(self)?;
        Ok(self.id)
    }

    fn update(&self, store: &ShopStore) -> RepositoryResult<()> {
        store.requirements.update(self)
    }
}

// ==========================================
// Payment
// ==========================================
impl TabularEntity for Payment {
    const KIND: EntityKind = EntityKind::Payment;

    fn schema() -> EntitySchema<Self> {
        EntitySchema::<Self>::new(Self::KIND)
            .read_only("id", "ID", TypeHint::Integer, |p| p.id.to_string())
            .reference(
                column("order", "Order", TypeHint::Reference).required().example("1"),
                |p| p.order_id.to_string(),
                |p, v, ctx| {
                    p.order_id = resolve_order("order", v, ctx)?.id;
                    Ok(())
                },
            )
            .field(
                column("amount", "Amount", TypeHint::Decimal).required().example("150.00"),
                |p| fmt_decimal(p.amount),
                |p, v| {
                    p.amount = required_decimal("amount", v)?;
                    Ok(())
                },
            )
            .field(
                column("status", "Status", TypeHint::Text).required().example("Pending"),
                |p| p.status.clone(),
                |p, v| {
                    p.status = FieldMapper::required_text("status", v)?;
                    Ok(())
                },
            )
            .field(
                column("payment_date", "Payment Date", TypeHint::Date).example("2024-01-20"),
                |p| fmt_optional_date(p.payment_date),
                |p, v| {
                    p.payment_date = FieldMapper::parse_optional_date("payment_date", v)?;
                    Ok(())
                },
            )
            .field(
                column("notes", "Notes", TypeHint::Text),
                |p| p.notes.clone(),
                |p, v| {
                    p.notes = v.trim().to_string();
                    Ok(())
                },
            )
    }

    fn load(store: &ShopStore, query: Option<&str>) -> RepositoryResult<Vec<Self>> {
        load_with(query, |q| store.payments.search(q), || store.payments.list_all())
    }
}

impl ImportableEntity for Payment {
    fn draft(_ctx: &ImportContext<'_>) -> Self {
        Payment {
            id: 0,
            order_id: 0,
            amount: 0.0,
            status: "Pending".to_string(),
            payment_date: None,
            notes: String::new(),
        }
    }

    fn find(store: &ShopStore, id: i64) -> RepositoryResult<Option<Self>> {
        store.payments.find_by_id(id)
    }

    fn insert(&mut self, store: &ShopStore) -> RepositoryResult<i64> {
        self.id = store.payments.insert(self)?;
        Ok(self.id)
    }

    fn update(&self, store: &ShopStore) -> RepositoryResult<()> {
        store.payments.update(self)
    }
}

// ==========================================
// Supplier
// ==========================================
impl TabularEntity for Supplier {
    const KIND: EntityKind = EntityKind::Supplier;

    fn schema() -> EntitySchema<Self> {
        EntitySchema::<Self>::new(Self::KIND)
            .read_only("id", "ID", TypeHint::Integer, |s| s.id.to_string())
            .field(
                column("name", "Name", TypeHint::Text).required().example("Acme Textiles"),
                |s| s.name.clone(),
                |s, v| {
                    s.name = FieldMapper::required_text("name", v)?;
                    Ok(())
                },
            )
            .field(
                column("contact", "Contact", TypeHint::Text).example("John Smith"),
                |s| s.contact.clone(),
                |s, v| {
                    s.contact = v.trim().to_string();
                    Ok(())
                },
            )
            .field(
                column("address", "Address", TypeHint::Text).example("1 Mill Road"),
                |s| s.address.clone(),
                |s, v| {
                    s.address = v.trim().to_string();
                    Ok(())
                },
            )
            .field(
                column("email", "Email", TypeHint::Text).example("sales@acme.test"),
                |s| s.email.clone(),
                |s, v| {
                    s.email = v.trim().to_string();
                    Ok(())
                },
            )
            .field(
                column("phone", "Phone", TypeHint::Text).example("555-0100"),
                |s| s.phone.clone(),
                |s, v| {
                    s.phone = v.trim().to_string();
                    Ok(())
                },
            )
            .read_only("created_at", "Created At", TypeHint::Timestamp, |s| {
                fmt_timestamp(s.created_at)
            })
    }

    fn load(store: &ShopStore, query: Option<&str>) -> RepositoryResult<Vec<Self>> {
        load_with(query, |q| store.suppliers.search(q), || store.suppliers.list_all())
    }
}

impl ImportableEntity for Supplier {
    fn draft(_ctx: &ImportContext<'_>) -> Self {
        Supplier {
            id: 0,
            name: String::new(),
            contact: String::new(),
            address: String::new(),
            email: String::new(),
            phone: String::new(),
            created_at: Utc::now(),
        }
    }

    fn find(store: &ShopStore, id: i64) -> RepositoryResult<Option<Self>> {
        store.suppliers.find_by_id(id)
    }

    fn insert(&mut self, store: &ShopStore) -> RepositoryResult<i64> {
        self.id = store.suppliers.insert(self)?;
        Ok(self.id)
    }

    fn update(&self, store: &ShopStore) -> RepositoryResult<()> {
        store.suppliers.update(self)
    }
}

// ==========================================
// Purchase
// ==========================================
impl TabularEntity for Purchase {
    const KIND: EntityKind = EntityKind::Purchase;

    fn schema() -> EntitySchema<Self> {
        EntitySchema::<Self>::new(Self::KIND)
            .read_only("id", "ID", TypeHint::Integer, |p| p.id.to_string())
            .reference(
                column("supplier", "Supplier", TypeHint::Reference).required().example("Acme Textiles"),
                |p| p.supplier_name.clone(),
                |p, v, ctx| {
                    FieldMapper::required_text("supplier", v)?;
                    let supplier = resolve_supplier(v, ctx)?;
                    p.supplier_id = supplier.id;
                    p.supplier_name = supplier.name;
                    Ok(())
                },
            )
            .reference(
                column("item", "Item", TypeHint::Reference).required().example("Cotton Roll"),
                |p| p.item_name.clone(),
                |p, v, ctx| {
                    FieldMapper::required_text("item", v)?;
                    let item = resolve_item(v, ctx)?;
                    p.item_id = item.id;
                    p.item_name = item.item_name;
                    Ok(())
                },
            )
            .field(
                column("quantity", "Quantity", TypeHint::Integer).required().example("20"),
                |p| p.quantity.to_string(),
                |p, v| {
                    p.quantity = required_quantity("quantity", v)?;
                    Ok(())
                },
            )
            .field(
                column("price", "Price", TypeHint::Decimal).required().example("11.75"),
                |p| fmt_decimal(p.price),
                |p, v| {
                    p.price = required_decimal("price", v)?;
                    Ok(())
                },
            )
            .field(
                column("date", "Date", TypeHint::Date).example("2024-01-10"),
                |p| fmt_date(p.date),
                |p, v| {
                    // 空白保留当前值（新建时为当天）
                    if let Some(date) = FieldMapper::parse_optional_date("date", v)? {
                        p.date = date;
                    }
                    Ok(())
                },
            )
            .field(
                column("notes", "Notes", TypeHint::Text),
                |p| p.notes.clone(),
                |p, v| {
                    p.notes = v.trim().to_string();
                    Ok(())
                },
            )
    }

    fn load(store: &ShopStore, query: Option<&str>) -> RepositoryResult<Vec<Self>> {
        load_with(query, |q| store.purchases.search(q), || store.purchases.list_all())
    }
}

impl ImportableEntity for Purchase {
    fn draft(ctx: &ImportContext<'_>) -> Self {
        Purchase {
            id: 0,
            supplier_id: 0,
            supplier_name: String::new(),
            item_id: 0,
            item_name: String::new(),
            quantity: 0,
            price: 0.0,
            date: ctx.today,
            notes: String::new(),
        }
    }

    fn find(store: &ShopStore, id: i64) -> RepositoryResult<Option<Self>> {
        store.purchases.find_by_id(id)
    }

    fn insert(&mut self, store: &ShopStore) -> RepositoryResult<i64> {
        self.id = store.purchases.insert(self)?;
        Ok(self.id)
    }

    fn update(&self, store: &ShopStore) -> RepositoryResult<()> {
        store.purchases.update(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_column_counts() {
        assert_eq!(Customer::schema().min_columns(), 3);
        assert_eq!(InventoryItem::schema().min_columns(), 11);
        assert_eq!(Order::schema().min_columns(), 6);
        assert_eq!(Requirement::schema().min_columns(), 6);
        assert_eq!(Payment::schema().min_columns(), 5);
        assert_eq!(Supplier::schema().min_columns(), 5);
        assert_eq!(Purchase::schema().min_columns(), 6);
    }

    #[test]
    fn test_column_keys_are_unique_and_id_first() {
        fn check<T: TabularEntity>() {
            let meta = T::schema().describe();
            assert_eq!(meta[0].key, "id");
            let mut keys: Vec<_> = meta.iter().map(|m| m.key).collect();
            keys.sort();
            keys.dedup();
            assert_eq!(keys.len(), meta.len(), "duplicate key in {}", T::KIND);
        }
        check::<Customer>();
        check::<InventoryItem>();
        check::<Order>();
        check::<Requirement>();
        check::<Payment>();
        check::<Supplier>();
        check::<Purchase>();
    }

    #[test]
    fn test_order_positional_order() {
        let schema = Order::schema();
        let keys: Vec<_> = schema
            .positional_columns()
            .into_iter()
            .map(|idx| schema.columns[idx].meta.key)
            .collect();
        assert_eq!(
            keys,
            vec!["customer", "product_type", "status", "order_date", "delivery_date", "notes"]
        );
    }
}
