use audit_trail_api::ConfigurationError;
use heapless::String as HeaplessString;
use std::str::FromStr;

/// Maximum length of a table or column alias, the PostgreSQL identifier limit.
pub const MAX_ALIAS_LEN: usize = 63;

/// Bounded alias under which a table or column appears in audit records.
pub type AliasName = HeaplessString<MAX_ALIAS_LEN>;

/// Builds an [`AliasName`], rejecting aliases longer than [`MAX_ALIAS_LEN`] bytes.
pub fn alias_name(alias: &str) -> Result<AliasName, ConfigurationError> {
    AliasName::from_str(alias).map_err(|_| ConfigurationError::AliasTooLong {
        alias: alias.to_string(),
        max: MAX_ALIAS_LEN,
    })
}

/// Builds an optional [`AliasName`].
pub fn optional_alias_name(alias: Option<&str>) -> Result<Option<AliasName>, ConfigurationError> {
    alias.map(alias_name).transpose()
}
