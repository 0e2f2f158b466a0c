use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use audit_trail_db::models::table_descriptor::PropertyDescriptor;

/// Kinds of columns left out when all columns of a table are audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AutoExclude(u8);

impl AutoExclude {
    pub const NONE: AutoExclude = AutoExclude(0);
    pub const PRIMARY_KEY: AutoExclude = AutoExclude(1);
    pub const FOREIGN_KEY: AutoExclude = AutoExclude(1 << 1);
    /// Columns computed by the database.
    pub const COMPUTED: AutoExclude = AutoExclude(1 << 2);
    pub const ALL: AutoExclude = AutoExclude(0b111);

    pub fn contains(&self, other: AutoExclude) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether `property` stays audited under these exclusions.
    pub fn keeps(&self, property: &PropertyDescriptor) -> bool {
        !(self.contains(Self::PRIMARY_KEY) && property.is_primary_key()
            || self.contains(Self::FOREIGN_KEY) && property.is_foreign_key()
            || self.contains(Self::COMPUTED) && property.is_computed())
    }
}

impl BitOr for AutoExclude {
    type Output = AutoExclude;

    fn bitor(self, rhs: AutoExclude) -> AutoExclude {
        AutoExclude(self.0 | rhs.0)
    }
}

impl BitOrAssign for AutoExclude {
    fn bitor_assign(&mut self, rhs: AutoExclude) {
        self.0 |= rhs.0;
    }
}
