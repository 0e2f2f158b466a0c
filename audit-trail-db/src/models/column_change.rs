use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::column_audit_setting::ColumnAuditSetting;
use super::column_value::ColumnValue;
use super::row_action::RowAction;

/// Old and new value of one audited column of a changed row.
///
/// The live tracked property is reached through the owning row's entry id and
/// [`ColumnChange::property_name`]. Values stay mutable until the change is finalized
/// after the primary commit.
#[derive(Debug, Clone)]
pub struct ColumnChange {
    setting: Arc<ColumnAuditSetting>,
    old_value: ColumnValue,
    new_value: ColumnValue,
}

impl ColumnChange {
    pub fn new(setting: Arc<ColumnAuditSetting>, old_value: ColumnValue, new_value: ColumnValue) -> Self {
        Self {
            setting,
            old_value,
            new_value,
        }
    }

    pub fn setting(&self) -> &ColumnAuditSetting {
        &self.setting
    }

    pub fn property_name(&self) -> &str {
        self.setting.property_name()
    }

    pub fn column_name(&self) -> &str {
        self.setting.column_name()
    }

    pub fn audited_column_name(&self) -> &str {
        self.setting.audited_name()
    }

    pub fn data_type_name(&self) -> &'static str {
        self.setting.data_type().name()
    }

    pub fn storage_type(&self) -> &str {
        self.setting.storage_type()
    }

    pub fn old_value(&self) -> &ColumnValue {
        &self.old_value
    }

    pub fn new_value(&self) -> &ColumnValue {
        &self.new_value
    }

    pub fn set_old_value(&mut self, value: ColumnValue) {
        self.old_value = value;
    }

    pub fn set_new_value(&mut self, value: ColumnValue) {
        self.new_value = value;
    }

    /// Replaces the values with their mapped form.
    ///
    /// The missing side of a row change stays `Null`: the old value of an added row and
    /// the new value of a deleted row are not mapped.
    pub fn apply_value_mapper(&mut self, action: RowAction) {
        if self.setting.value_mapper().is_none() {
            return;
        }
        if action != RowAction::Added {
            self.old_value = self.setting.map_value(&self.old_value);
        }
        if action != RowAction::Deleted {
            self.new_value = self.setting.map_value(&self.new_value);
        }
    }

    pub fn is_changed(&self) -> bool {
        self.old_value != self.new_value
    }
}

/// Serialized under the audited column name, which is what audit payloads record.
impl Serialize for ColumnChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ColumnChange", 3)?;
        state.serialize_field("column", self.audited_column_name())?;
        state.serialize_field("old_value", &self.old_value)?;
        state.serialize_field("new_value", &self.new_value)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::alias::alias_name;
    use crate::models::column_type::ColumnType;

    fn upper_case_setting() -> Arc<ColumnAuditSetting> {
        let mut setting = ColumnAuditSetting::new("kind", "kind", ColumnType::Text, "text");
        setting.set_value_mapper(Some(Arc::new(|value: &ColumnValue| {
            ColumnValue::Text(value.to_string().to_uppercase())
        })));
        Arc::new(setting)
    }

    #[test]
    fn test_mapper_applies_to_both_values() {
        let mut change = ColumnChange::new(
            upper_case_setting(),
            ColumnValue::from("retail"),
            ColumnValue::Null,
        );

        change.apply_value_mapper(RowAction::Modified);

        assert_eq!(change.old_value(), &ColumnValue::from("RETAIL"));
        assert_eq!(change.new_value(), &ColumnValue::from("NULL"));
        assert!(change.is_changed());
    }

    #[test]
    fn test_mapper_keeps_missing_side_null() {
        let mut added = ColumnChange::new(upper_case_setting(), ColumnValue::Null, "retail".into());
        added.apply_value_mapper(RowAction::Added);
        assert_eq!(added.old_value(), &ColumnValue::Null);
        assert_eq!(added.new_value(), &ColumnValue::from("RETAIL"));

        let mut deleted = ColumnChange::new(upper_case_setting(), "retail".into(), ColumnValue::Null);
        deleted.apply_value_mapper(RowAction::Deleted);
        assert_eq!(deleted.old_value(), &ColumnValue::from("RETAIL"));
        assert_eq!(deleted.new_value(), &ColumnValue::Null);
    }

    #[test]
    fn test_serializes_audited_name() {
        let mut setting = ColumnAuditSetting::new("count", "count", ColumnType::Int, "integer");
        setting.set_column_alias(Some(alias_name("quantity").unwrap()));
        let change = ColumnChange::new(Arc::new(setting), ColumnValue::Int(5), ColumnValue::Int(7));

        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "column": "quantity", "old_value": 5, "new_value": 7 })
        );
        assert_eq!(change.data_type_name(), ColumnType::Int.name());
    }
}
