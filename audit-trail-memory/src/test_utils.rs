//! Sample models and store setup shared by the tests of this workspace.

use audit_trail_api::BoxError;
use audit_trail_db::models::column_type::ColumnType;
use audit_trail_db::models::entity_row::RowValues;
use audit_trail_db::models::entity_type::EntityTypeId;
use audit_trail_db::models::row_action::RowAction;
use audit_trail_db::models::table_descriptor::{PropertyDescriptor, TableDescriptor};
use audit_trail_db::models::table_model::TableModel;
use chrono::{DateTime, TimeZone, Utc};

use crate::memory_store::MemoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    Retail = 1,
    Wholesale = 2,
}

impl ProductKind {
    pub fn from_code(code: i64) -> Result<Self, BoxError> {
        match code {
            1 => Ok(ProductKind::Retail),
            2 => Ok(ProductKind::Wholesale),
            other => Err(format!("Unknown product kind {other}").into()),
        }
    }

    pub fn name(code: i64) -> Option<&'static str> {
        match code {
            1 => Some("Retail"),
            2 => Some("Wholesale"),
            _ => None,
        }
    }
}

/// An audited table model with a generated key, a computed column, an unmapped
/// property and a foreign key to [`NoteModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProductModel {
    pub id: Option<i64>,
    pub company_name: Option<String>,
    pub count: i64,
    pub created_at: DateTime<Utc>,
    pub note_id: Option<i64>,
    pub kind: ProductKind,
}

impl ProductModel {
    pub fn count_doubled(&self) -> i64 {
        self.count * 2
    }

    pub fn count_tripled(&self) -> i64 {
        self.count * 3
    }
}

impl TableModel for ProductModel {
    const ENTITY_TYPE: EntityTypeId = EntityTypeId::new("Product");

    fn table_descriptor() -> TableDescriptor {
        TableDescriptor::new(Self::ENTITY_TYPE, "products")
            .property(PropertyDescriptor::column("id", ColumnType::Int, "bigint").primary_key().generated())
            .property(
                PropertyDescriptor::column("company_name", ColumnType::Text, "varchar(100)")
                    .named("company")
                    .nullable(),
            )
            .property(PropertyDescriptor::column("count", ColumnType::Int, "integer"))
            .property(
                PropertyDescriptor::column("count_doubled", ColumnType::Int, "integer")
                    .computed("count * 2"),
            )
            .property(PropertyDescriptor::unmapped("count_tripled", ColumnType::Int))
            .property(PropertyDescriptor::column("created_at", ColumnType::Timestamp, "timestamptz"))
            .property(
                PropertyDescriptor::column("note_id", ColumnType::Int, "bigint")
                    .foreign_key()
                    .nullable(),
            )
            .property(PropertyDescriptor::column("kind", ColumnType::Int, "integer"))
    }

    fn to_row(&self) -> RowValues {
        RowValues::new()
            .with("id", self.id)
            .with("company_name", self.company_name.clone())
            .with("count", self.count)
            .with("count_doubled", self.count_doubled())
            .with("count_tripled", self.count_tripled())
            .with("created_at", self.created_at)
            .with("note_id", self.note_id)
            .with("kind", self.kind as i64)
    }

    fn from_row(row: &RowValues) -> Result<Self, BoxError> {
        Ok(ProductModel {
            id: row.try_get("id")?,
            company_name: row.try_get("company_name")?,
            count: row.try_get("count")?,
            created_at: row.try_get("created_at")?,
            note_id: row.try_get("note_id")?,
            kind: ProductKind::from_code(row.try_get("kind")?)?,
        })
    }
}

/// A table model that is never audited.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteModel {
    pub id: Option<i64>,
    pub text: String,
}

impl TableModel for NoteModel {
    const ENTITY_TYPE: EntityTypeId = EntityTypeId::new("Note");

    fn table_descriptor() -> TableDescriptor {
        TableDescriptor::new(Self::ENTITY_TYPE, "notes")
            .property(PropertyDescriptor::column("id", ColumnType::Int, "bigint").primary_key().generated())
            .property(PropertyDescriptor::column("text", ColumnType::Text, "text"))
    }

    fn to_row(&self) -> RowValues {
        RowValues::new()
            .with("id", self.id)
            .with("text", self.text.as_str())
    }

    fn from_row(row: &RowValues) -> Result<Self, BoxError> {
        Ok(NoteModel {
            id: row.try_get("id")?,
            text: row.try_get("text")?,
        })
    }
}

/// The audit-record model. `user_name` is NOT NULL, so a record without it fails to save.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditTrailModel {
    pub id: Option<i64>,
    pub reference_id: Option<String>,
    pub table_name: String,
    pub user_name: Option<String>,
    pub ip_address: Option<String>,
    pub action: RowAction,
    pub changes: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl TableModel for AuditTrailModel {
    const ENTITY_TYPE: EntityTypeId = EntityTypeId::new("AuditTrail");

    fn table_descriptor() -> TableDescriptor {
        TableDescriptor::new(Self::ENTITY_TYPE, "audit_trail")
            .property(PropertyDescriptor::column("id", ColumnType::Int, "bigint").primary_key().generated())
            .property(PropertyDescriptor::column("reference_id", ColumnType::Text, "varchar(64)").nullable())
            .property(PropertyDescriptor::column("table_name", ColumnType::Text, "varchar(63)"))
            .property(PropertyDescriptor::column("user_name", ColumnType::Text, "varchar(100)"))
            .property(PropertyDescriptor::column("ip_address", ColumnType::Text, "varchar(45)").nullable())
            .property(PropertyDescriptor::column("action", ColumnType::Text, "varchar(16)"))
            .property(PropertyDescriptor::column("changes", ColumnType::Json, "jsonb"))
            .property(PropertyDescriptor::column("created_at", ColumnType::Timestamp, "timestamptz"))
    }

    fn to_row(&self) -> RowValues {
        RowValues::new()
            .with("id", self.id)
            .with("reference_id", self.reference_id.clone())
            .with("table_name", self.table_name.as_str())
            .with("user_name", self.user_name.clone())
            .with("ip_address", self.ip_address.clone())
            .with("action", self.action.to_string())
            .with("changes", self.changes.clone())
            .with("created_at", self.created_at)
    }

    fn from_row(row: &RowValues) -> Result<Self, BoxError> {
        let action: String = row.try_get("action")?;
        Ok(AuditTrailModel {
            id: row.try_get("id")?,
            reference_id: row.try_get("reference_id")?,
            table_name: row.try_get("table_name")?,
            user_name: row.try_get("user_name")?,
            ip_address: row.try_get("ip_address")?,
            action: action
                .parse()
                .map_err(|_| format!("Unknown row action '{action}'"))?,
            changes: row.try_get("changes")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// A keyless table, such as a view.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSummaryView {
    pub name: String,
    pub total: i64,
}

impl TableModel for ProductSummaryView {
    const ENTITY_TYPE: EntityTypeId = EntityTypeId::new("ProductSummary");

    fn table_descriptor() -> TableDescriptor {
        TableDescriptor::new(Self::ENTITY_TYPE, "product_summaries")
            .property(PropertyDescriptor::column("name", ColumnType::Text, "text"))
            .property(PropertyDescriptor::column("total", ColumnType::Int, "bigint"))
    }

    fn to_row(&self) -> RowValues {
        RowValues::new()
            .with("name", self.name.as_str())
            .with("total", self.total)
    }

    fn from_row(row: &RowValues) -> Result<Self, BoxError> {
        Ok(ProductSummaryView {
            name: row.try_get("name")?,
            total: row.try_get("total")?,
        })
    }
}

/// A type known to the store that has no table of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingAddress {
    pub street: String,
}

impl TableModel for ShippingAddress {
    const ENTITY_TYPE: EntityTypeId = EntityTypeId::new("ShippingAddress");

    fn table_descriptor() -> TableDescriptor {
        TableDescriptor::without_table(Self::ENTITY_TYPE)
            .property(PropertyDescriptor::column("street", ColumnType::Text, "text"))
    }

    fn to_row(&self) -> RowValues {
        RowValues::new().with("street", self.street.as_str())
    }

    fn from_row(row: &RowValues) -> Result<Self, BoxError> {
        Ok(ShippingAddress {
            street: row.try_get("street")?,
        })
    }
}

/// Caller context handed to the audit mapping callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomAuditInfo {
    pub user_name: String,
    pub ip_address: Option<String>,
}

impl CustomAuditInfo {
    pub fn new(user_name: &str) -> Self {
        Self {
            user_name: user_name.to_string(),
            ip_address: Some("127.0.0.1".to_string()),
        }
    }
}

pub fn register_models(store: &mut MemoryStore) {
    store
        .register::<ProductModel>()
        .register::<NoteModel>()
        .register::<AuditTrailModel>()
        .register::<ProductSummaryView>()
        .register::<ShippingAddress>();
}

/// A store with every sample model registered.
pub fn setup_store() -> MemoryStore {
    let mut store = MemoryStore::default();
    register_models(&mut store);
    store
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0)
        .single()
        .unwrap_or_default()
}

pub fn sample_product(company_name: &str, count: i64) -> ProductModel {
    ProductModel {
        id: None,
        company_name: Some(company_name.to_string()),
        count,
        created_at: fixed_time(),
        note_id: None,
        kind: ProductKind::Retail,
    }
}

pub fn sample_note(text: &str) -> NoteModel {
    NoteModel {
        id: None,
        text: text.to_string(),
    }
}

pub fn sample_audit_record(table_name: &str) -> AuditTrailModel {
    AuditTrailModel {
        id: None,
        reference_id: None,
        table_name: table_name.to_string(),
        user_name: Some("tester".to_string()),
        ip_address: None,
        action: RowAction::Added,
        changes: serde_json::Value::Array(Vec::new()),
        created_at: fixed_time(),
    }
}

/// Installs a test subscriber honouring `RUST_LOG`; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
