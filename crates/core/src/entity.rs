//! Gated entity type tags.
//!
//! One tag per domain table the approval pipeline can target. The mapping
//! from URL resource segments to tags lives in the pipeline registry, not
//! here; this is only the closed set of identities.

use serde::{Deserialize, Serialize};

/// A domain entity type that can be the target of a pending change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Item,
    Location,
    Container,
    Category,
    Borrower,
    Loan,
    Inventory,
}

impl EntityType {
    /// The stored/wire name of this entity type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Item => "item",
            EntityType::Location => "location",
            EntityType::Container => "container",
            EntityType::Category => "category",
            EntityType::Borrower => "borrower",
            EntityType::Loan => "loan",
            EntityType::Inventory => "inventory",
        }
    }

    /// Parse a stored entity type name back into its tag.
    pub fn parse(s: &str) -> Option<EntityType> {
        match s {
            "item" => Some(EntityType::Item),
            "location" => Some(EntityType::Location),
            "container" => Some(EntityType::Container),
            "category" => Some(EntityType::Category),
            "borrower" => Some(EntityType::Borrower),
            "loan" => Some(EntityType::Loan),
            "inventory" => Some(EntityType::Inventory),
            _ => None,
        }
    }

    /// All entity types, in registration order.
    pub fn all() -> &'static [EntityType] {
        &[
            EntityType::Item,
            EntityType::Location,
            EntityType::Container,
            EntityType::Category,
            EntityType::Borrower,
            EntityType::Loan,
            EntityType::Inventory,
        ]
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_parse_round_trip() {
        for et in EntityType::all() {
            assert_eq!(EntityType::parse(et.as_str()), Some(*et));
        }
    }

    #[test]
    fn test_unknown_name_does_not_parse() {
        assert_eq!(EntityType::parse("widget"), None);
        assert_eq!(EntityType::parse(""), None);
    }

    #[test]
    fn test_serde_uses_snake_case_names() {
        let json = serde_json::to_string(&EntityType::Item).unwrap();
        assert_eq!(json, "\"item\"");
        let back: EntityType = serde_json::from_str("\"borrower\"").unwrap();
        assert_eq!(back, EntityType::Borrower);
    }
}
