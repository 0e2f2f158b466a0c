use audit_trail_api::{ConfigurationError, ConfigurationResult};

/// Checks that a column selector is a plain property name.
pub fn validate_selector(selector: &str) -> ConfigurationResult<()> {
    let mut chars = selector.chars();
    let valid = match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidColumnSelector {
            selector: selector.to_string(),
        })
    }
}

/// Checks a non-empty list of column selectors.
pub fn validate_selectors(selectors: &[&str]) -> ConfigurationResult<()> {
    if selectors.is_empty() {
        return Err(ConfigurationError::NoColumnsProvided);
    }
    selectors.iter().try_for_each(|s| validate_selector(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_names_pass() {
        assert!(validate_selectors(&["count", "_hidden", "createdAt2"]).is_ok());
    }

    #[test]
    fn test_rejects_expressions() {
        for selector in ["", "note.text", "count * 2", "1st", "name "] {
            assert_eq!(
                validate_selector(selector),
                Err(ConfigurationError::InvalidColumnSelector {
                    selector: selector.to_string()
                })
            );
        }
        assert_eq!(validate_selectors(&[]), Err(ConfigurationError::NoColumnsProvided));
    }
}
