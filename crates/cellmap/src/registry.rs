//! The mapping registry.
//!
//! [`MappingRegistry`] owns every mapping a host has registered, keeps them
//! in registration order, and turns the core's candidate lists into a single
//! decision according to its [`AmbiguityPolicy`]. It is also where "no
//! renderer available" becomes an error instead of an empty list.
//!
//! # Example
//!
//! ```
//! use cellmap::prelude::*;
//!
//! #[derive(Default)]
//! struct NameCell {
//!     name: String,
//! }
//!
//! impl ReusableView for NameCell {
//!     fn create() -> Self {
//!         Self::default()
//!     }
//! }
//!
//! impl ModelTransfer for NameCell {
//!     type Model = String;
//!
//!     fn update(&mut self, model: &String) {
//!         self.name = model.clone();
//!     }
//! }
//!
//! let mut registry = MappingRegistry::new();
//! registry.register(ViewModelMapping::self_updating_cell_default::<NameCell>());
//!
//! let storage = SectionedStorage::new()
//!     .with_section(Section::new().with_item(String::from("Ada")));
//! let pool = ViewPool::new();
//!
//! let view = registry.cell_at(&storage, &pool, &IndexPath::new(0, 0)).unwrap();
//! assert_eq!(view.downcast_ref::<NameCell>().unwrap().name, "Ada");
//! ```

use std::any::Any;

use cellmap_core::logging::targets;
use cellmap_core::{
    AnyView, Dequeue, EventReaction, IndexPath, ModelValue, ReactionOutput, ViewContainer,
    ViewModelMapping, ViewType,
};
use slotmap::{new_key_type, SlotMap};

use crate::config::{AmbiguityPolicy, RegistryConfig};
use crate::error::{Error, Result};
use crate::storage::Storage;

new_key_type! {
    /// Identifies a mapping registered in a [`MappingRegistry`].
    ///
    /// The ID remains valid until the mapping is unregistered.
    pub struct MappingId;
}

/// Owns the ordered set of mappings for one list or grid host.
///
/// Mutation needs `&mut self` and resolution borrows `&self`, so mappings can
/// never change while a resolution is in progress.
#[derive(Default)]
pub struct MappingRegistry {
    mappings: SlotMap<MappingId, ViewModelMapping>,
    order: Vec<MappingId>,
    config: RegistryConfig,
}

impl MappingRegistry {
    /// Creates an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with the given configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Replaces the configuration.
    pub fn set_config(&mut self, config: RegistryConfig) {
        self.config = config;
    }

    /// Registers a mapping after all existing ones.
    pub fn register(&mut self, mapping: ViewModelMapping) -> MappingId {
        tracing::debug!(
            target: targets::REGISTRY,
            view_type = %mapping.view_type(),
            model = %mapping.model_tag(),
            reuse_identifier = mapping.reuse_identifier(),
            "registering mapping"
        );
        let id = self.mappings.insert(mapping);
        self.order.push(id);
        id
    }

    /// Removes a mapping. Returns it if the ID was valid.
    pub fn unregister(&mut self, id: MappingId) -> Option<ViewModelMapping> {
        let mapping = self.mappings.remove(id)?;
        self.order.retain(|other| *other != id);
        Some(mapping)
    }

    /// Removes every mapping.
    pub fn clear(&mut self) {
        self.mappings.clear();
        self.order.clear();
    }

    /// Returns the mapping with the given ID.
    pub fn mapping(&self, id: MappingId) -> Option<&ViewModelMapping> {
        self.mappings.get(id)
    }

    /// Mutable access to a mapping, for changing its condition or reactions.
    pub fn mapping_mut(&mut self, id: MappingId) -> Option<&mut ViewModelMapping> {
        self.mappings.get_mut(id)
    }

    /// Number of registered mappings.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates mappings in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (MappingId, &ViewModelMapping)> + '_ {
        self.order.iter().map(|id| (*id, &self.mappings[*id]))
    }

    /// All mappings able to render `model` as `view_type` at `index_path`, in
    /// registration order.
    pub fn candidates(
        &self,
        view_type: &ViewType,
        model: &ModelValue,
        index_path: &IndexPath,
    ) -> Vec<&ViewModelMapping> {
        view_type.mapping_candidates(self.iter().map(|(_, mapping)| mapping), model, index_path)
    }

    /// Picks the mapping that renders `model` as `view_type` at `index_path`.
    ///
    /// Zero candidates is [`Error::NoMapping`] (or [`Error::AbsentModel`] if
    /// the model is absent). Several candidates are resolved by the
    /// configured [`AmbiguityPolicy`].
    pub fn resolve(
        &self,
        view_type: &ViewType,
        model: &ModelValue,
        index_path: &IndexPath,
    ) -> Result<&ViewModelMapping> {
        let Some(unwrapped) = model.unwrapped() else {
            return Err(Error::AbsentModel {
                view_type: view_type.clone(),
                index_path: *index_path,
            });
        };
        let model_tag = unwrapped.model_tag();

        let candidates = self.candidates(view_type, model, index_path);
        let (first, last) = match candidates.as_slice() {
            [] => {
                tracing::warn!(target: targets::REGISTRY, %view_type, model = %model_tag, %index_path, "no mapping found");
                return Err(Error::NoMapping {
                    view_type: view_type.clone(),
                    model: model_tag,
                    index_path: *index_path,
                });
            }
            [only] => return Ok(*only),
            [first, .., last] => (*first, *last),
        };

        let count = candidates.len();
        if self.config.warn_on_ambiguity {
            tracing::warn!(target: targets::REGISTRY, %view_type, model = %model_tag, %index_path, count, "ambiguous mapping");
        } else {
            tracing::debug!(target: targets::REGISTRY, %view_type, model = %model_tag, %index_path, count, "ambiguous mapping");
        }

        match self.config.ambiguity {
            AmbiguityPolicy::FirstMatch => Ok(first),
            AmbiguityPolicy::LastMatch => Ok(last),
            AmbiguityPolicy::Strict => Err(Error::AmbiguousMapping {
                view_type: view_type.clone(),
                model: model_tag,
                index_path: *index_path,
                count,
            }),
        }
    }

    /// Resolves and dequeues a configured cell for `model`.
    pub fn dequeue_cell(
        &self,
        container: &dyn ViewContainer,
        model: &ModelValue,
        index_path: &IndexPath,
    ) -> Result<AnyView> {
        let view_type = ViewType::Cell;
        let mapping = self.resolve(&view_type, model, index_path)?;
        mapping
            .dequeue_configured_cell(container, model, index_path)?
            .ok_or_else(|| Self::bind_rejected(mapping, model, index_path))
    }

    /// Resolves and dequeues a configured supplementary view of `kind`.
    pub fn dequeue_supplementary_view(
        &self,
        container: &dyn ViewContainer,
        kind: &str,
        model: &ModelValue,
        index_path: &IndexPath,
    ) -> Result<AnyView> {
        let view_type = ViewType::supplementary(kind.to_owned());
        let mapping = self.resolve(&view_type, model, index_path)?;
        mapping
            .dequeue_configured_supplementary_view(container, kind, model, index_path)?
            .ok_or_else(|| Self::bind_rejected(mapping, model, index_path))
    }

    /// Reads the item at `index_path` from `storage` and dequeues its cell.
    pub fn cell_at(
        &self,
        storage: &dyn Storage,
        container: &dyn ViewContainer,
        index_path: &IndexPath,
    ) -> Result<AnyView> {
        let model = storage
            .item(index_path)
            .ok_or(Error::ItemNotFound { index_path: *index_path })?;
        self.dequeue_cell(container, &model, index_path)
    }

    /// Reads the supplementary model of `kind` for `section` from `storage`
    /// and dequeues its view.
    pub fn supplementary_at(
        &self,
        storage: &dyn Storage,
        container: &dyn ViewContainer,
        kind: &str,
        section: usize,
    ) -> Result<AnyView> {
        let index_path = IndexPath::for_section(section);
        let model = storage
            .supplementary(kind, section)
            .ok_or(Error::ItemNotFound { index_path })?;
        self.dequeue_supplementary_view(container, kind, &model, &index_path)
    }

    /// Attaches `reaction` to every mapping of its view type that accepts its
    /// model type. Returns how many mappings received it.
    pub fn append_reaction(&mut self, reaction: EventReaction) -> Result<usize> {
        let mut attached = 0;
        for id in &self.order {
            let mapping = &mut self.mappings[*id];
            if mapping.view_type() == reaction.view_type()
                && mapping.accepts_type(reaction.model_type())
            {
                mapping.append_reaction(reaction.clone());
                attached += 1;
            }
        }

        if attached == 0 {
            tracing::warn!(
                target: targets::REGISTRY,
                event = reaction.event(),
                model = %reaction.model_type().tag(),
                "no mapping for reaction"
            );
            return Err(Error::NoMappingForReaction {
                event: reaction.event().to_owned(),
                view_type: reaction.view_type().clone(),
                model: reaction.model_type().tag(),
            });
        }
        tracing::debug!(target: targets::REGISTRY, event = reaction.event(), attached, "attached reaction");
        Ok(attached)
    }

    /// Runs the `event` reaction of the mapping that renders `model`.
    ///
    /// Returns `Ok(None)` if that mapping has no reaction for the event, or if
    /// the reaction did not accept its arguments.
    pub fn perform_reaction(
        &self,
        event: &str,
        view_type: &ViewType,
        model: &ModelValue,
        index_path: &IndexPath,
        view: Option<&mut dyn Any>,
    ) -> Result<Option<ReactionOutput>> {
        let mapping = self.resolve(view_type, model, index_path)?;
        let Some(reaction) = mapping.reaction(event) else {
            tracing::trace!(target: targets::REGISTRY, event, %view_type, "mapping has no reaction for event");
            return Ok(None);
        };
        let Some(unwrapped) = model.unwrapped() else {
            return Ok(None);
        };
        Ok(reaction.perform(view, unwrapped, index_path))
    }

    /// A resolved mapping produced no view: the container handed out a view
    /// of another type under the mapping's reuse identifier.
    fn bind_rejected(mapping: &ViewModelMapping, model: &ModelValue, index_path: &IndexPath) -> Error {
        let model_tag = model
            .unwrapped()
            .map_or(mapping.model_tag(), |unwrapped| unwrapped.model_tag());
        tracing::warn!(
            target: targets::REGISTRY,
            view_type = %mapping.view_type(),
            reuse_identifier = mapping.reuse_identifier(),
            model = %model_tag,
            %index_path,
            "mapping rejected the view from its container"
        );
        Error::BindRejected {
            view_type: mapping.view_type().clone(),
            reuse_identifier: mapping.reuse_identifier().to_owned(),
            model: model_tag,
            index_path: *index_path,
        }
    }
}

impl std::fmt::Debug for MappingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingRegistry")
            .field("mappings", &self.iter().map(|(_, m)| m).collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellmap_core::{MappingCondition, ModelTag, ModelType, ReusableView};

    #[derive(Default)]
    struct Row {
        label: String,
    }

    impl ReusableView for Row {
        fn create() -> Self {
            Self::default()
        }
    }

    fn labelled(label: &'static str) -> ViewModelMapping {
        ViewModelMapping::cell::<Row, i32>(move |row, _, _| row.label = label.to_owned())
    }

    #[test]
    fn test_register_and_iterate_in_order() {
        let mut registry = MappingRegistry::new();
        let a = registry.register(labelled("a"));
        let b = registry.register(labelled("b"));
        let c = registry.register(labelled("c"));
        assert_eq!(registry.len(), 3);

        registry.unregister(b).unwrap();
        let ids: Vec<_> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);
        assert!(registry.mapping(b).is_none());
        assert!(registry.unregister(b).is_none());

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ambiguity_policies() {
        let pool = cellmap_core::ViewPool::new();
        let model = ModelValue::new(1i32);
        let path = IndexPath::default();
        let label = |registry: &MappingRegistry| {
            let view = registry.dequeue_cell(&pool, &model, &path).unwrap();
            view.downcast_ref::<Row>().unwrap().label.clone()
        };

        let mut registry = MappingRegistry::new();
        registry.register(labelled("first"));
        registry.register(labelled("second"));
        assert_eq!(label(&registry), "first");

        registry.set_config(RegistryConfig::default().with_ambiguity(AmbiguityPolicy::LastMatch));
        assert_eq!(label(&registry), "second");

        registry.set_config(RegistryConfig::default().with_ambiguity(AmbiguityPolicy::Strict));
        let err = registry.resolve(&ViewType::Cell, &model, &path).unwrap_err();
        assert!(matches!(err, Error::AmbiguousMapping { count: 2, .. }));
    }

    #[test]
    fn test_no_mapping_and_absent_model() {
        let registry = MappingRegistry::new();
        let err = registry
            .resolve(&ViewType::Cell, &ModelValue::new(1i32), &IndexPath::default())
            .unwrap_err();
        assert!(matches!(err, Error::NoMapping { model, .. } if model == i32::TAG));

        let err = registry
            .resolve(&ViewType::Cell, &ModelValue::Absent.wrapped(), &IndexPath::default())
            .unwrap_err();
        assert!(matches!(err, Error::AbsentModel { .. }));
    }

    #[test]
    fn test_mapping_mut_changes_condition() {
        let mut registry = MappingRegistry::new();
        let id = registry.register(labelled("only"));
        registry
            .mapping_mut(id)
            .unwrap()
            .set_condition(MappingCondition::Section(2));

        let model = ModelValue::new(1i32);
        assert!(registry
            .candidates(&ViewType::Cell, &model, &IndexPath::new(0, 0))
            .is_empty());
        assert_eq!(
            registry
                .candidates(&ViewType::Cell, &model, &IndexPath::new(2, 0))
                .len(),
            1
        );
    }

    #[test]
    fn test_append_reaction_uses_type_token() {
        const SHAPE: ModelTag = ModelTag::new("Shape");

        struct Square;

        impl ModelType for Square {
            const TAG: ModelTag = ModelTag::new("Square");
            const CONFORMS_TO: &'static [ModelTag] = &[SHAPE];
        }

        let mut registry = MappingRegistry::new();
        let shape = registry.register(ViewModelMapping::manual(
            ViewType::Cell,
            SHAPE,
            "shape",
            cellmap_core::ViewTemplate::inline(|| Box::new(Row::default()) as AnyView),
            |_, _| {},
        ));
        let int = registry.register(labelled("int"));

        let attached = registry
            .append_reaction(EventReaction::model::<Square, u32>(
                "area",
                ViewType::Cell,
                |_, _| 4,
            ))
            .unwrap();
        assert_eq!(attached, 1);
        assert_eq!(registry.mapping(shape).unwrap().reactions().len(), 1);
        assert!(registry.mapping(int).unwrap().reactions().is_empty());

        let output = registry
            .perform_reaction(
                "area",
                &ViewType::Cell,
                &ModelValue::new(Square),
                &IndexPath::default(),
                None,
            )
            .unwrap()
            .unwrap();
        assert_eq!(output.downcast_ref::<u32>(), Some(&4));

        let err = registry
            .append_reaction(EventReaction::model::<u8, ()>("noop", ViewType::Cell, |_, _| ()))
            .unwrap_err();
        assert!(matches!(err, Error::NoMappingForReaction { .. }));
    }

    #[test]
    fn test_mistyped_container_view_is_bind_rejected() {
        let pool = cellmap_core::ViewPool::new();
        pool.register_template(
            &ViewType::Cell,
            "Row",
            &cellmap_core::ViewTemplate::inline(|| Box::new(String::new()) as AnyView),
        )
        .unwrap();

        let mut registry = MappingRegistry::new();
        registry.register(labelled("row"));

        let err = registry
            .dequeue_cell(&pool, &ModelValue::new(1i32), &IndexPath::new(0, 3))
            .unwrap_err();
        assert!(matches!(
            &err,
            Error::BindRejected { reuse_identifier, model, .. }
                if reuse_identifier == "Row" && *model == i32::TAG
        ));
        assert_eq!(
            err.to_string(),
            "cell mapping 'Row' rejected the view for model 'i32' at [0, 3]"
        );

        // The rejected view went back to the pool.
        let recycled = pool
            .dequeue_reusable_view(&ViewType::Cell, "Row", &IndexPath::default())
            .unwrap();
        assert!(recycled.is::<String>());
        assert_eq!(pool.created_count(), 1);
    }
}
