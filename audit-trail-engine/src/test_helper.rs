//! Configured contexts and store doubles for the engine tests.

use std::sync::Arc;

use async_trait::async_trait;

use audit_trail_api::{BoxError, Cancellation};
use audit_trail_db::models::entity_row::EntityRow;
use audit_trail_db::models::entity_type::EntityTypeId;
use audit_trail_db::models::row_change::RowChange;
use audit_trail_db::models::table_descriptor::TableDescriptor;
use audit_trail_db::models::table_model::TableModel;
use audit_trail_db::store::{
    AuditStore, ChangeTracker, EntityMetadata, EntryId, Persistence, TrackedEntry, TrackedProperty, TransactionControl,
};
use audit_trail_memory::test_utils::{
    fixed_time, init_tracing, register_models, setup_store, AuditTrailModel, CustomAuditInfo, ProductModel,
};
use audit_trail_memory::{MemoryStore, MemoryStoreOptions};

use crate::context::AuditContext;

pub type TestContext = AuditContext<MemoryStore, CustomAuditInfo>;

/// Builds one audit record per row change, attributed to the caller context's user.
pub async fn audit_record_callback(
    row: RowChange,
    info: Option<Arc<CustomAuditInfo>>,
    _cancellation: Cancellation,
) -> Result<Option<AuditTrailModel>, BoxError> {
    Ok(Some(AuditTrailModel {
        id: None,
        reference_id: row.primary_key().map(ToString::to_string),
        table_name: row.audited_table_name().to_string(),
        user_name: info.as_ref().map(|i| i.user_name.clone()),
        ip_address: info.as_ref().and_then(|i| i.ip_address.clone()),
        action: row.action(),
        changes: row.changes_to_json()?,
        created_at: fixed_time(),
    }))
}

/// A context over the sample store with the audit trail set and no tables audited.
pub fn configured_context() -> TestContext {
    init_tracing();
    let mut context = TestContext::new(setup_store());
    context
        .configure_audit_trail(audit_record_callback)
        .expect("audit trail configures");
    context
}

/// A context auditing `company_name`, `count` and `kind` of products, with auditing on.
pub fn audited_context() -> TestContext {
    let mut context = configured_context();
    context
        .configure_table::<ProductModel>(None)
        .and_then(|t| t.audit_columns(&["company_name", "count", "kind"]))
        .and_then(|t| t.start_auditing())
        .expect("product auditing configures");
    context
}

/// Like [`audited_context`], over a store whose rollback leaves staged entries tracked.
pub fn audited_context_keeping_tracker() -> TestContext {
    init_tracing();
    let mut store = MemoryStore::new(MemoryStoreOptions {
        keep_tracker_on_rollback: true,
        ..MemoryStoreOptions::default()
    });
    register_models(&mut store);

    let mut context = TestContext::new(store);
    context
        .configure_audit_trail(audit_record_callback)
        .and_then(|t| t.configure_table::<ProductModel>(None))
        .and_then(|t| t.audit_columns(&["company_name", "count", "kind"]))
        .and_then(|t| t.start_auditing())
        .expect("product auditing configures");
    context
}

/// Property names of the audited product columns, in order.
pub fn product_columns<S: AuditStore, C: Send + Sync + 'static>(context: &AuditContext<S, C>) -> Vec<String> {
    context
        .registry()
        .and_then(|r| r.get(ProductModel::ENTITY_TYPE))
        .map(|s| s.columns().iter().map(|c| c.property_name().to_string()).collect())
        .unwrap_or_default()
}

pub fn audit_records(store: &MemoryStore) -> Vec<AuditTrailModel> {
    store.query::<AuditTrailModel>().expect("audit records load")
}

/// Wraps a [`MemoryStore`] and reports one row less than written from the given
/// save call on.
pub struct UnderReportingStore {
    pub inner: MemoryStore,
    pub from_call: usize,
    calls: usize,
}

impl UnderReportingStore {
    pub fn new(inner: MemoryStore, from_call: usize) -> Self {
        Self {
            inner,
            from_call,
            calls: 0,
        }
    }
}

impl EntityMetadata for UnderReportingStore {
    fn entity_types(&self) -> Vec<EntityTypeId> {
        self.inner.entity_types()
    }

    fn table_descriptor(&self, entity_type: EntityTypeId) -> Option<&TableDescriptor> {
        self.inner.table_descriptor(entity_type)
    }
}

impl ChangeTracker for UnderReportingStore {
    fn detect_changes(&mut self) {
        self.inner.detect_changes()
    }

    fn tracked_entries(&self) -> Vec<TrackedEntry> {
        self.inner.tracked_entries()
    }

    fn tracked_properties(&self, entry: EntryId) -> Vec<TrackedProperty> {
        self.inner.tracked_properties(entry)
    }
}

#[async_trait]
impl TransactionControl for UnderReportingStore {
    async fn begin_transaction(&mut self) -> Result<(), BoxError> {
        self.inner.begin_transaction().await
    }

    async fn commit_transaction(&mut self) -> Result<(), BoxError> {
        self.inner.commit_transaction().await
    }

    async fn rollback_transaction(&mut self) -> Result<(), BoxError> {
        self.inner.rollback_transaction().await
    }

    fn in_transaction(&self) -> bool {
        self.inner.in_transaction()
    }
}

#[async_trait]
impl Persistence for UnderReportingStore {
    fn add_pending(&mut self, row: EntityRow) -> Result<EntryId, BoxError> {
        self.inner.add_pending(row)
    }

    fn remove_pending(&mut self, entry: EntryId) {
        self.inner.remove_pending(entry)
    }

    async fn save_changes(&mut self) -> Result<usize, BoxError> {
        self.calls += 1;
        let count = self.inner.save_changes().await?;
        if self.calls >= self.from_call {
            Ok(count.saturating_sub(1))
        } else {
            Ok(count)
        }
    }
}
