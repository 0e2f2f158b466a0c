pub mod alias;
pub mod column_audit_setting;
pub mod column_change;
pub mod column_type;
pub mod column_value;
pub mod entity_audit_setting;
pub mod entity_row;
pub mod entity_type;
pub mod row_action;
pub mod row_change;
pub mod table_descriptor;
pub mod table_model;

// Re-exports
pub use alias::*;
pub use column_audit_setting::*;
pub use column_change::*;
pub use column_type::*;
pub use column_value::*;
pub use entity_audit_setting::*;
pub use entity_row::*;
pub use entity_type::*;
pub use row_action::*;
pub use row_change::*;
pub use table_descriptor::*;
pub use table_model::*;
