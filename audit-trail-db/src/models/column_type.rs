use serde::{Deserialize, Serialize};

/// Logical data type of a property, independent of the physical storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Bool,
    Int,
    Decimal,
    Text,
    Uuid,
    Timestamp,
    Date,
    Json,
}

impl ColumnType {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Bool => "Bool",
            ColumnType::Int => "Int",
            ColumnType::Decimal => "Decimal",
            ColumnType::Text => "Text",
            ColumnType::Uuid => "Uuid",
            ColumnType::Timestamp => "Timestamp",
            ColumnType::Date => "Date",
            ColumnType::Json => "Json",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
