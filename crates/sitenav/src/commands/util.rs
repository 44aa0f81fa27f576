//! Shared helpers for command handlers.

use std::sync::Arc;

use sitenav_core::{Category, CategoryId, WebsiteId};

use crate::error::CliError;

/// Parse a website ID argument.
pub fn parse_website_id(raw: &str) -> Result<WebsiteId, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "id".into(),
        reason: format!("expected a numeric website ID, got '{raw}'"),
    })
}

/// Resolve a category identifier (numeric ID or case-insensitive name)
/// against the loaded categories.
pub fn resolve_category(
    categories: &[Arc<Category>],
    identifier: &str,
) -> Result<CategoryId, CliError> {
    let needle = identifier.trim();
    let by_id = needle.parse::<CategoryId>().ok();
    categories
        .iter()
        .find(|c| Some(c.id) == by_id || c.name.eq_ignore_ascii_case(needle))
        .map(|c| c.id)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "category".into(),
            identifier: identifier.into(),
            list_command: "categories list".into(),
        })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn categories() -> Vec<Arc<Category>> {
        vec![
            Arc::new(Category {
                id: CategoryId(1),
                name: "Tools".into(),
            }),
            Arc::new(Category {
                id: CategoryId(2),
                name: "News".into(),
            }),
        ]
    }

    #[test]
    fn category_by_id_or_name() {
        let cats = categories();
        assert_eq!(resolve_category(&cats, "2").unwrap(), CategoryId(2));
        assert_eq!(resolve_category(&cats, "tools").unwrap(), CategoryId(1));
        assert!(matches!(
            resolve_category(&cats, "Games"),
            Err(CliError::NotFound { .. })
        ));
    }

    #[test]
    fn website_id_must_be_numeric() {
        assert_eq!(parse_website_id(" 42 ").unwrap(), WebsiteId(42));
        assert!(matches!(
            parse_website_id("abc"),
            Err(CliError::Validation { .. })
        ));
    }
}
