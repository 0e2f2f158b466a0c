use serde::Serialize;

use super::column_type::ColumnType;
use super::entity_type::EntityTypeId;

/// Metadata of one property of an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    /// Physical column name; `None` when the property is not mapped to a column.
    pub column_name: Option<String>,
    pub data_type: ColumnType,
    pub storage_type: String,
    pub primary_key: bool,
    pub foreign_key: bool,
    pub computed_sql: Option<String>,
    /// The store generates the value when the row is added.
    pub value_generated: bool,
    pub nullable: bool,
}

impl PropertyDescriptor {
    /// A property mapped to a column of the same name.
    pub fn column(name: &'static str, data_type: ColumnType, storage_type: &str) -> Self {
        Self {
            name,
            column_name: Some(name.to_string()),
            data_type,
            storage_type: storage_type.to_string(),
            primary_key: false,
            foreign_key: false,
            computed_sql: None,
            value_generated: false,
            nullable: false,
        }
    }

    /// A property that exists on the model but is not persisted.
    pub fn unmapped(name: &'static str, data_type: ColumnType) -> Self {
        Self {
            column_name: None,
            storage_type: String::new(),
            ..Self::column(name, data_type, "")
        }
    }

    pub fn named(mut self, column_name: &str) -> Self {
        self.column_name = Some(column_name.to_string());
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn foreign_key(mut self) -> Self {
        self.foreign_key = true;
        self
    }

    pub fn computed(mut self, sql: &str) -> Self {
        self.computed_sql = Some(sql.to_string());
        self
    }

    pub fn generated(mut self) -> Self {
        self.value_generated = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_foreign_key(&self) -> bool {
        self.foreign_key
    }

    pub fn is_computed(&self) -> bool {
        self.computed_sql.as_deref().is_some_and(|sql| !sql.is_empty())
    }

    /// Whether the property is backed by a table column.
    pub fn is_column(&self) -> bool {
        self.column_name.is_some()
    }
}

/// Metadata of one entity type: its table and its properties in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDescriptor {
    pub entity_type: EntityTypeId,
    /// Physical table name; `None` for types without their own table.
    pub table_name: Option<String>,
    pub properties: Vec<PropertyDescriptor>,
}

impl TableDescriptor {
    pub fn new(entity_type: EntityTypeId, table_name: &str) -> Self {
        Self {
            entity_type,
            table_name: Some(table_name.to_string()),
            properties: Vec::new(),
        }
    }

    /// A type known to the store that has no table of its own.
    pub fn without_table(entity_type: EntityTypeId) -> Self {
        Self {
            entity_type,
            table_name: None,
            properties: Vec::new(),
        }
    }

    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    pub fn find_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Properties backed by a table column.
    pub fn column_properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().filter(|p| p.is_column())
    }

    pub fn primary_key_properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.column_properties().filter(|p| p.is_primary_key())
    }

    pub fn has_primary_key(&self) -> bool {
        self.primary_key_properties().next().is_some()
    }
}
