use std::fmt;
use std::sync::Arc;

use super::alias::AliasName;
use super::column_type::ColumnType;
use super::column_value::ColumnValue;
use super::table_descriptor::PropertyDescriptor;

/// Per-column transformation applied to old and new values before they are compared
/// and handed to the mapping callback. Must accept [`ColumnValue::Null`].
pub type ValueMapper = Arc<dyn Fn(&ColumnValue) -> ColumnValue + Send + Sync>;

/// Audit settings of one column of an audited entity type.
#[derive(Clone)]
pub struct ColumnAuditSetting {
    property_name: String,
    column_name: String,
    data_type: ColumnType,
    storage_type: String,
    column_alias: Option<AliasName>,
    value_mapper: Option<ValueMapper>,
}

impl ColumnAuditSetting {
    pub fn new(
        property_name: &str,
        column_name: &str,
        data_type: ColumnType,
        storage_type: &str,
    ) -> Self {
        Self {
            property_name: property_name.to_string(),
            column_name: column_name.to_string(),
            data_type,
            storage_type: storage_type.to_string(),
            column_alias: None,
            value_mapper: None,
        }
    }

    /// Builds the settings of a column-backed property; `None` for unmapped properties.
    pub fn from_property(property: &PropertyDescriptor) -> Option<Self> {
        let column_name = property.column_name.as_deref()?;
        Some(Self::new(
            property.name,
            column_name,
            property.data_type,
            &property.storage_type,
        ))
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn data_type(&self) -> ColumnType {
        self.data_type
    }

    pub fn storage_type(&self) -> &str {
        &self.storage_type
    }

    pub fn column_alias(&self) -> Option<&str> {
        self.column_alias.as_ref().map(|a| a.as_str())
    }

    /// The alias if set, otherwise the physical column name.
    pub fn audited_name(&self) -> &str {
        self.column_alias().unwrap_or(&self.column_name)
    }

    pub fn value_mapper(&self) -> Option<&ValueMapper> {
        self.value_mapper.as_ref()
    }

    pub fn set_column_alias(&mut self, alias: Option<AliasName>) {
        self.column_alias = alias;
    }

    pub fn set_value_mapper(&mut self, mapper: Option<ValueMapper>) {
        self.value_mapper = mapper;
    }

    /// Applies the value mapper, or returns the value unchanged when none is set.
    pub fn map_value(&self, value: &ColumnValue) -> ColumnValue {
        match &self.value_mapper {
            Some(mapper) => mapper(value),
            None => value.clone(),
        }
    }
}

impl fmt::Debug for ColumnAuditSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnAuditSetting")
            .field("property_name", &self.property_name)
            .field("column_name", &self.column_name)
            .field("data_type", &self.data_type)
            .field("storage_type", &self.storage_type)
            .field("column_alias", &self.column_alias)
            .field("value_mapper", &self.value_mapper.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::alias::alias_name;

    #[test]
    fn test_from_property() {
        let property = PropertyDescriptor::column("companyName", ColumnType::Text, "varchar(100)")
            .named("company_name");
        let setting = ColumnAuditSetting::from_property(&property).unwrap();

        assert_eq!(setting.property_name(), "companyName");
        assert_eq!(setting.column_name(), "company_name");
        assert_eq!(setting.storage_type(), "varchar(100)");
        assert_eq!(setting.audited_name(), "company_name");

        let unmapped = PropertyDescriptor::unmapped("label", ColumnType::Text);
        assert!(ColumnAuditSetting::from_property(&unmapped).is_none());
    }

    #[test]
    fn test_alias_and_mapper() {
        let mut setting = ColumnAuditSetting::new("kind", "kind", ColumnType::Int, "integer");
        setting.set_column_alias(Some(alias_name("product_kind").unwrap()));
        setting.set_value_mapper(Some(Arc::new(|value: &ColumnValue| match value {
            ColumnValue::Int(i) => ColumnValue::Text(format!("kind-{i}")),
            other => other.clone(),
        })));

        assert_eq!(setting.audited_name(), "product_kind");
        assert_eq!(
            setting.map_value(&ColumnValue::Int(2)),
            ColumnValue::from("kind-2")
        );
        assert_eq!(setting.map_value(&ColumnValue::Null), ColumnValue::Null);
    }
}
