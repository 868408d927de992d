//! Category naming
//!
//! Transactions reference categories by an external id; budget rows are keyed
//! by display names. [`CategoryMapping`] resolves the former to the latter and
//! [`SubcategoryKey`] is the identity used to line everything up.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identity of a budget subcategory: parent display name plus child display name
///
/// Comparison is case-insensitive on trimmed names, while the original
/// spelling is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubcategoryKey {
    pub parent: String,
    pub child: String,
}

impl SubcategoryKey {
    pub fn new(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }

    fn normalized(&self) -> (String, String) {
        (
            self.parent.trim().to_lowercase(),
            self.child.trim().to_lowercase(),
        )
    }

    /// Stable composite row id, e.g. `sub:food:groceries`
    ///
    /// `:` and `%` inside names are percent-encoded so distinct keys never
    /// share an id.
    pub fn row_id(&self) -> String {
        let (parent, child) = self.normalized();
        format!("sub:{}:{}", escape_id_part(&parent), escape_id_part(&child))
    }
}

fn escape_id_part(part: &str) -> String {
    part.replace('%', "%25").replace(':', "%3A")
}

impl PartialEq for SubcategoryKey {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for SubcategoryKey {}

impl std::hash::Hash for SubcategoryKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl Ord for SubcategoryKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.normalized().cmp(&other.normalized())
    }
}

impl PartialOrd for SubcategoryKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SubcategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.parent, self.child)
    }
}

/// Many-to-one mapping from an external category id to display names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMapping {
    pub external_category_id: String,
    pub parent_name: String,
    pub child_name: String,
}

impl CategoryMapping {
    pub fn new(
        external_category_id: impl Into<String>,
        parent_name: impl Into<String>,
        child_name: impl Into<String>,
    ) -> Self {
        Self {
            external_category_id: external_category_id.into(),
            parent_name: parent_name.into(),
            child_name: child_name.into(),
        }
    }

    pub fn key(&self) -> SubcategoryKey {
        SubcategoryKey::new(&self.parent_name, &self.child_name)
    }
}

/// Lookup table built once per computation
#[derive(Debug, Clone, Default)]
pub struct CategoryLookup {
    by_external_id: HashMap<String, SubcategoryKey>,
}

impl CategoryLookup {
    pub fn new(mappings: &[CategoryMapping]) -> Self {
        let by_external_id = mappings
            .iter()
            .map(|m| (m.external_category_id.clone(), m.key()))
            .collect();
        Self { by_external_id }
    }

    pub fn resolve(&self, external_category_id: &str) -> Option<&SubcategoryKey> {
        self.by_external_id.get(external_category_id)
    }
}

/// A subcategory the presentation layer always wants a row for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDisplay {
    pub parent_name: String,
    pub child_name: String,
}

impl CategoryDisplay {
    pub fn key(&self) -> SubcategoryKey {
        SubcategoryKey::new(&self.parent_name, &self.child_name)
    }
}
