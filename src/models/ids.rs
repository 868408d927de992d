//! Strongly-typed ID wrappers for externally-owned entities
//!
//! Identity is assigned by the data layer; the engine only compares and
//! displays ids. Newtypes keep a goal id from being passed where an expense id
//! is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate string-backed ID newtype wrappers
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

define_id!(UserId);
define_id!(ExpenseId);
define_id!(GoalId);
define_id!(AssetId);
define_id!(TransactionId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_eq() {
        let a = GoalId::from("goal-1");
        let b = GoalId::new(String::from("goal-1"));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "goal-1");
        assert_eq!(a.as_str(), "goal-1");
    }

    #[test]
    fn test_serialization_is_transparent() {
        let id = ExpenseId::from("exp-9");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"exp-9\"");
        let parsed: ExpenseId = serde_json::from_str("\"exp-9\"").unwrap();
        assert_eq!(parsed, id);
    }
}
