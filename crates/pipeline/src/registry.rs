//! Entity type registry: the pluggable mapping from URL resource segments
//! to entity type tags and their appliers.
//!
//! Adding a gated entity type means one `register` call plus an
//! [`Applier`] implementation; the classifier and review engine never
//! change. A segment absent from the registry means "not gated", never an
//! error.

use std::collections::HashMap;
use std::sync::Arc;

use attic_core::entity::EntityType;

use crate::applier::Applier;
use crate::appliers::{
    BorrowerApplier, CategoryApplier, ContainerApplier, InventoryApplier, ItemApplier,
    LoanApplier, LocationApplier,
};

/// A registered gated entity type.
#[derive(Clone)]
pub struct RegisteredEntity {
    pub entity_type: EntityType,
    pub applier: Arc<dyn Applier>,
}

/// Maps resource segments to entity types and appliers.
#[derive(Default)]
pub struct EntityRegistry {
    by_segment: HashMap<&'static str, RegisteredEntity>,
    by_type: HashMap<EntityType, Arc<dyn Applier>>,
}

impl EntityRegistry {
    /// An empty registry; nothing is gated.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in entity type registered under its
    /// plural resource segment.
    pub fn with_default_entities() -> Self {
        let mut registry = Self::new();
        registry.register("items", EntityType::Item, Arc::new(ItemApplier));
        registry.register("locations", EntityType::Location, Arc::new(LocationApplier));
        registry.register(
            "containers",
            EntityType::Container,
            Arc::new(ContainerApplier),
        );
        registry.register("categories", EntityType::Category, Arc::new(CategoryApplier));
        registry.register("borrowers", EntityType::Borrower, Arc::new(BorrowerApplier));
        registry.register("loans", EntityType::Loan, Arc::new(LoanApplier));
        registry.register(
            "inventory",
            EntityType::Inventory,
            Arc::new(InventoryApplier),
        );
        registry
    }

    /// Register (or replace) the mapping for a resource segment.
    pub fn register(
        &mut self,
        segment: &'static str,
        entity_type: EntityType,
        applier: Arc<dyn Applier>,
    ) {
        self.by_type.insert(entity_type, Arc::clone(&applier));
        self.by_segment.insert(
            segment,
            RegisteredEntity {
                entity_type,
                applier,
            },
        );
    }

    /// Resolve a URL resource segment. `None` means the segment is not
    /// gated and the request passes through to whatever handles it.
    pub fn resolve_segment(&self, segment: &str) -> Option<&RegisteredEntity> {
        self.by_segment.get(segment)
    }

    /// Resolve the applier for a stored entity type tag (review path).
    pub fn applier_for(&self, entity_type: EntityType) -> Option<Arc<dyn Applier>> {
        self.by_type.get(&entity_type).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_covers_all_entity_types() {
        let registry = EntityRegistry::with_default_entities();
        for et in EntityType::all() {
            assert!(
                registry.applier_for(*et).is_some(),
                "no applier registered for {et}"
            );
        }
    }

    #[test]
    fn test_segments_resolve_to_their_entity_type() {
        let registry = EntityRegistry::with_default_entities();
        let cases = [
            ("items", EntityType::Item),
            ("locations", EntityType::Location),
            ("containers", EntityType::Container),
            ("categories", EntityType::Category),
            ("borrowers", EntityType::Borrower),
            ("loans", EntityType::Loan),
            ("inventory", EntityType::Inventory),
        ];
        for (segment, expected) in cases {
            let entry = registry.resolve_segment(segment).unwrap();
            assert_eq!(entry.entity_type, expected);
        }
    }

    #[test]
    fn test_unknown_segment_is_not_gated() {
        let registry = EntityRegistry::with_default_entities();
        assert!(registry.resolve_segment("widgets").is_none());
        assert!(registry.resolve_segment("pending-changes").is_none());
    }

    #[test]
    fn test_registration_is_pluggable() {
        let mut registry = EntityRegistry::new();
        assert!(registry.resolve_segment("items").is_none());

        registry.register("gadgets", EntityType::Item, Arc::new(ItemApplier));
        let entry = registry.resolve_segment("gadgets").unwrap();
        assert_eq!(entry.entity_type, EntityType::Item);
    }
}
