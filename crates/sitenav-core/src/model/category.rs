use serde::{Deserialize, Serialize};

use super::ids::CategoryId;

/// Label for entries whose category is absent or unknown.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A directory category. Read-only from the client's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    /// Resolve a category name from a loaded list, falling back to
    /// [`UNCATEGORIZED`].
    pub fn name_for<'a, I>(categories: I, id: Option<CategoryId>) -> String
    where
        I: IntoIterator<Item = &'a Category>,
    {
        id.and_then(|id| categories.into_iter().find(|c| c.id == id))
            .map_or_else(|| UNCATEGORIZED.to_owned(), |c| c.name.clone())
    }
}
