//! View-model mappings.
//!
//! A [`ViewModelMapping`] is one rendering rule: "models tagged `M`, shown as
//! view type `T`, are rendered by views of reuse identifier `R` and bound like
//! this". Hosts register one mapping per view/model pairing they support and
//! let the resolver pick the applicable one at render time.
//!
//! # Construction
//!
//! | constructor | view type | binding |
//! |-------------|-----------|---------|
//! | [`manual`](ViewModelMapping::manual) | any | untyped update closure |
//! | [`cell`](ViewModelMapping::cell) | cell | typed configure closure only |
//! | [`self_updating_cell`](ViewModelMapping::self_updating_cell) | cell | configure, then [`ModelTransfer::update`] |
//! | [`supplementary`](ViewModelMapping::supplementary) | supplementary | typed configure closure only |
//! | [`self_updating_supplementary`](ViewModelMapping::self_updating_supplementary) | supplementary | configure, then [`ModelTransfer::update`] |
//! | [`conforming_cell`](ViewModelMapping::conforming_cell) | cell | typed view, untyped model |
//! | [`conforming_supplementary`](ViewModelMapping::conforming_supplementary) | supplementary | typed view, untyped model |
//!
//! Typed constructors accept exactly their model type, so a mapping that
//! passes candidate resolution can always bind. Mappings that target an
//! abstraction tag (`Animal` for any conforming `Dog` or `Cat`) are built
//! with `manual` or the `conforming_*` constructors.
//!
//! Header and footer shorthands pass the section number instead of a full
//! index path.
//!
//! # Example
//!
//! ```
//! use cellmap_core::{
//!     Dequeue, IndexPath, ModelTransfer, ModelValue, ReusableView, ViewModelMapping, ViewPool,
//! };
//!
//! #[derive(Default)]
//! struct CounterCell {
//!     text: String,
//!     row: usize,
//! }
//!
//! impl ReusableView for CounterCell {
//!     fn create() -> Self {
//!         Self::default()
//!     }
//! }
//!
//! impl ModelTransfer for CounterCell {
//!     type Model = i32;
//!
//!     fn update(&mut self, model: &i32) {
//!         self.text = format!("count: {model}");
//!     }
//! }
//!
//! let mapping = ViewModelMapping::self_updating_cell::<CounterCell, _>(|cell, _, path| {
//!     cell.row = path.row();
//! });
//!
//! let pool = ViewPool::new();
//! let view = mapping
//!     .dequeue_configured_cell(&pool, &ModelValue::new(3i32), &IndexPath::new(0, 2))
//!     .unwrap()
//!     .unwrap();
//! let cell = view.downcast_ref::<CounterCell>().unwrap();
//! assert_eq!(cell.text, "count: 3");
//! assert_eq!(cell.row, 2);
//! ```

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::condition::MappingCondition;
use crate::container::{AnyView, ReusableView, ViewContainer, ViewTemplate};
use crate::error::Result;
use crate::index_path::IndexPath;
use crate::logging::targets;
use crate::model::{Model, ModelTag, ModelType, ModelTypeInfo};
use crate::reaction::EventReaction;
use crate::unwrap::ModelValue;
use crate::view_type::ViewType;

/// Binds an already produced view to a model.
pub type UpdateFn = Arc<dyn Fn(&mut dyn Any, &dyn Model) + Send + Sync>;

/// Per-dequeue configuration run before the update closure. Returns `false`
/// when the view or model is not of the type the mapping was built for.
pub type BindFn = Arc<dyn Fn(&mut dyn Any, &dyn Model, &IndexPath) -> bool + Send + Sync>;

/// A view that knows how to display its own model type.
///
/// Mappings built with the `self_updating_*` constructors derive their tag,
/// reuse identifier and update step from this trait.
pub trait ModelTransfer: ReusableView {
    /// The model type this view displays.
    type Model: ModelType;

    /// Overwrites the view's content with `model`.
    fn update(&mut self, model: &Self::Model);
}

/// Which constructor produced a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingVariant {
    /// Untyped, caller-supplied tag and update closure.
    Manual,
    /// Cell with a typed configure closure.
    CellBind,
    /// Cell whose view implements [`ModelTransfer`].
    CellSelfUpdate,
    /// Supplementary view with a typed configure closure.
    SupplementaryBind,
    /// Supplementary view whose view implements [`ModelTransfer`].
    SupplementarySelfUpdate,
}

/// Which models a mapping accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Acceptance {
    /// Any model answering to the mapping's tag.
    Conforming,
    /// Only the concrete type the mapping binds.
    Exact(TypeId),
}

/// Produces views for one mapping: the reuse key, the template to register
/// on first use, and the bind step.
#[derive(Clone)]
struct DequeueStrategy {
    reuse_identifier: String,
    template: ViewTemplate,
    bind: BindFn,
}

impl DequeueStrategy {
    fn produce(
        &self,
        container: &dyn ViewContainer,
        view_type: &ViewType,
        index_path: &IndexPath,
    ) -> Result<AnyView> {
        if !container.has_template(view_type, &self.reuse_identifier) {
            container.register_template(view_type, &self.reuse_identifier, &self.template)?;
        }
        container.dequeue_reusable_view(view_type, &self.reuse_identifier, index_path)
    }
}

/// The dequeue capability shared by every mapping variant.
pub trait Dequeue {
    /// Produces and binds a cell for `model`.
    ///
    /// Returns `Ok(None)` without touching the container when this is not a
    /// cell mapping, and `Ok(None)` when the model is absent or of the wrong
    /// type. A view of the wrong type is returned to the container and also
    /// yields `Ok(None)`.
    fn dequeue_configured_cell(
        &self,
        container: &dyn ViewContainer,
        model: &ModelValue,
        index_path: &IndexPath,
    ) -> Result<Option<AnyView>>;

    /// Produces and binds a supplementary view of `kind` for `model`.
    ///
    /// Same contract as [`dequeue_configured_cell`](Self::dequeue_configured_cell)
    /// for supplementary mappings of that kind.
    fn dequeue_configured_supplementary_view(
        &self,
        container: &dyn ViewContainer,
        kind: &str,
        model: &ModelValue,
        index_path: &IndexPath,
    ) -> Result<Option<AnyView>>;
}

/// A rule pairing a model tag and view type with a binding behavior.
pub struct ViewModelMapping {
    view_type: ViewType,
    model_tag: ModelTag,
    acceptance: Acceptance,
    variant: MappingVariant,
    strategy: DequeueStrategy,
    update: UpdateFn,
    condition: MappingCondition,
    reactions: Vec<EventReaction>,
}

static_assertions::assert_impl_all!(ViewModelMapping: Send, Sync);

fn conforming_bind<V, F>(configure: F) -> BindFn
where
    V: Any,
    F: Fn(&mut V, &dyn Model, &IndexPath) + Send + Sync + 'static,
{
    Arc::new(
        move |view: &mut dyn Any, model: &dyn Model, index_path: &IndexPath| {
            match view.downcast_mut::<V>() {
                Some(view) => {
                    configure(view, model, index_path);
                    true
                }
                None => false,
            }
        },
    )
}

fn typed_bind<V, M, F>(configure: F) -> BindFn
where
    V: Any,
    M: ModelType,
    F: Fn(&mut V, &M, &IndexPath) + Send + Sync + 'static,
{
    Arc::new(
        move |view: &mut dyn Any, model: &dyn Model, index_path: &IndexPath| {
            match (view.downcast_mut::<V>(), model.downcast_ref::<M>()) {
                (Some(view), Some(model)) => {
                    configure(view, model, index_path);
                    true
                }
                _ => false,
            }
        },
    )
}

fn self_update<V: ModelTransfer>() -> UpdateFn {
    Arc::new(|view: &mut dyn Any, model: &dyn Model| {
        if let (Some(view), Some(model)) = (view.downcast_mut::<V>(), model.downcast_ref::<V::Model>()) {
            view.update(model);
        }
    })
}

fn no_update() -> UpdateFn {
    Arc::new(|_: &mut dyn Any, _: &dyn Model| {})
}

impl ViewModelMapping {
    fn typed<V: ReusableView>(
        view_type: ViewType,
        model_tag: ModelTag,
        acceptance: Acceptance,
        variant: MappingVariant,
        bind: BindFn,
        update: UpdateFn,
    ) -> Self {
        let mapping = Self {
            view_type,
            model_tag,
            acceptance,
            variant,
            strategy: DequeueStrategy {
                reuse_identifier: V::reuse_identifier().into_owned(),
                template: ViewTemplate::of::<V>(),
                bind,
            },
            update,
            condition: MappingCondition::None,
            reactions: Vec::new(),
        };
        tracing::trace!(target: targets::MAPPING, ?mapping, "created mapping");
        mapping
    }

    /// Creates a mapping from untyped parts.
    ///
    /// The caller supplies the tag the mapping accepts, the reuse identifier,
    /// the view template and an update closure working on erased values. Any
    /// model conforming to `model_tag` is accepted.
    pub fn manual<F>(
        view_type: ViewType,
        model_tag: ModelTag,
        reuse_identifier: impl Into<String>,
        template: ViewTemplate,
        update: F,
    ) -> Self
    where
        F: Fn(&mut dyn Any, &dyn Model) + Send + Sync + 'static,
    {
        let mapping = Self {
            view_type,
            model_tag,
            acceptance: Acceptance::Conforming,
            variant: MappingVariant::Manual,
            strategy: DequeueStrategy {
                reuse_identifier: reuse_identifier.into(),
                template,
                bind: Arc::new(|_: &mut dyn Any, _: &dyn Model, _: &IndexPath| true),
            },
            update: Arc::new(update),
            condition: MappingCondition::None,
            reactions: Vec::new(),
        };
        tracing::trace!(target: targets::MAPPING, ?mapping, "created mapping");
        mapping
    }

    /// Creates a cell mapping bound entirely by `configure`.
    ///
    /// The view's own [`ModelTransfer`] implementation, if any, is not called.
    pub fn cell<V, M>(configure: impl Fn(&mut V, &M, &IndexPath) + Send + Sync + 'static) -> Self
    where
        V: ReusableView,
        M: ModelType,
    {
        Self::typed::<V>(
            ViewType::Cell,
            M::TAG,
            Acceptance::Exact(TypeId::of::<M>()),
            MappingVariant::CellBind,
            typed_bind(configure),
            no_update(),
        )
    }

    /// Creates a cell mapping for a self-updating view.
    ///
    /// `configure` runs first on every dequeue, then [`ModelTransfer::update`].
    pub fn self_updating_cell<V, F>(configure: F) -> Self
    where
        V: ModelTransfer,
        F: Fn(&mut V, &V::Model, &IndexPath) + Send + Sync + 'static,
    {
        Self::typed::<V>(
            ViewType::Cell,
            V::Model::TAG,
            Acceptance::Exact(TypeId::of::<V::Model>()),
            MappingVariant::CellSelfUpdate,
            typed_bind(configure),
            self_update::<V>(),
        )
    }

    /// Creates a cell mapping for a self-updating view with no extra
    /// configuration.
    pub fn self_updating_cell_default<V: ModelTransfer>() -> Self {
        Self::self_updating_cell::<V, _>(|_, _, _| {})
    }

    /// Creates a supplementary view mapping bound entirely by `configure`.
    pub fn supplementary<V, M>(
        kind: impl Into<Cow<'static, str>>,
        configure: impl Fn(&mut V, &M, &IndexPath) + Send + Sync + 'static,
    ) -> Self
    where
        V: ReusableView,
        M: ModelType,
    {
        Self::typed::<V>(
            ViewType::supplementary(kind),
            M::TAG,
            Acceptance::Exact(TypeId::of::<M>()),
            MappingVariant::SupplementaryBind,
            typed_bind(configure),
            no_update(),
        )
    }

    /// Creates a supplementary view mapping for a self-updating view.
    ///
    /// `configure` runs first on every dequeue, then [`ModelTransfer::update`].
    pub fn self_updating_supplementary<V, F>(kind: impl Into<Cow<'static, str>>, configure: F) -> Self
    where
        V: ModelTransfer,
        F: Fn(&mut V, &V::Model, &IndexPath) + Send + Sync + 'static,
    {
        Self::typed::<V>(
            ViewType::supplementary(kind),
            V::Model::TAG,
            Acceptance::Exact(TypeId::of::<V::Model>()),
            MappingVariant::SupplementarySelfUpdate,
            typed_bind(configure),
            self_update::<V>(),
        )
    }

    /// Creates a cell mapping for every model conforming to `model_tag`.
    ///
    /// The view is typed; the model is handed over as `&dyn Model` for the
    /// closure to inspect or downcast.
    pub fn conforming_cell<V>(
        model_tag: ModelTag,
        configure: impl Fn(&mut V, &dyn Model, &IndexPath) + Send + Sync + 'static,
    ) -> Self
    where
        V: ReusableView,
    {
        Self::typed::<V>(
            ViewType::Cell,
            model_tag,
            Acceptance::Conforming,
            MappingVariant::CellBind,
            conforming_bind(configure),
            no_update(),
        )
    }

    /// Creates a supplementary view mapping for every model conforming to
    /// `model_tag`.
    pub fn conforming_supplementary<V>(
        kind: impl Into<Cow<'static, str>>,
        model_tag: ModelTag,
        configure: impl Fn(&mut V, &dyn Model, &IndexPath) + Send + Sync + 'static,
    ) -> Self
    where
        V: ReusableView,
    {
        Self::typed::<V>(
            ViewType::supplementary(kind),
            model_tag,
            Acceptance::Conforming,
            MappingVariant::SupplementaryBind,
            conforming_bind(configure),
            no_update(),
        )
    }

    /// Section header mapping; `configure` receives the section number.
    pub fn header<V, M>(configure: impl Fn(&mut V, &M, usize) + Send + Sync + 'static) -> Self
    where
        V: ReusableView,
        M: ModelType,
    {
        Self::supplementary::<V, M>(ViewType::HEADER, move |view, model, path| {
            configure(view, model, path.section())
        })
    }

    /// Section footer mapping; `configure` receives the section number.
    pub fn footer<V, M>(configure: impl Fn(&mut V, &M, usize) + Send + Sync + 'static) -> Self
    where
        V: ReusableView,
        M: ModelType,
    {
        Self::supplementary::<V, M>(ViewType::FOOTER, move |view, model, path| {
            configure(view, model, path.section())
        })
    }

    /// Self-updating section header mapping.
    pub fn self_updating_header<V, F>(configure: F) -> Self
    where
        V: ModelTransfer,
        F: Fn(&mut V, &V::Model, usize) + Send + Sync + 'static,
    {
        Self::self_updating_supplementary::<V, _>(ViewType::HEADER, move |view, model, path| {
            configure(view, model, path.section())
        })
    }

    /// Self-updating section footer mapping.
    pub fn self_updating_footer<V, F>(configure: F) -> Self
    where
        V: ModelTransfer,
        F: Fn(&mut V, &V::Model, usize) + Send + Sync + 'static,
    {
        Self::self_updating_supplementary::<V, _>(ViewType::FOOTER, move |view, model, path| {
            configure(view, model, path.section())
        })
    }

    /// Sets the condition and returns the mapping.
    pub fn with_condition(mut self, condition: MappingCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Replaces the condition.
    pub fn set_condition(&mut self, condition: MappingCondition) {
        self.condition = condition;
    }

    /// The condition narrowing where this mapping applies.
    #[inline]
    pub fn condition(&self) -> &MappingCondition {
        &self.condition
    }

    /// The view type this mapping renders.
    #[inline]
    pub fn view_type(&self) -> &ViewType {
        &self.view_type
    }

    /// The tag of the models this mapping accepts.
    #[inline]
    pub fn model_tag(&self) -> ModelTag {
        self.model_tag
    }

    /// Which constructor built this mapping.
    #[inline]
    pub fn variant(&self) -> MappingVariant {
        self.variant
    }

    /// The key the container pools this mapping's views under.
    #[inline]
    pub fn reuse_identifier(&self) -> &str {
        &self.strategy.reuse_identifier
    }

    /// Returns `true` if this mapping can bind `model`.
    ///
    /// Typed mappings accept their exact model type; manual and conforming
    /// mappings accept anything answering to their tag.
    #[inline]
    pub fn accepts(&self, model: &dyn Model) -> bool {
        match self.acceptance {
            Acceptance::Conforming => model.conforms_to(self.model_tag),
            Acceptance::Exact(type_id) => model.concrete_type_id() == type_id,
        }
    }

    /// Returns `true` if values of the given type would be accepted.
    #[inline]
    pub fn accepts_type(&self, model_type: &ModelTypeInfo) -> bool {
        match self.acceptance {
            Acceptance::Conforming => model_type.conforms_to(self.model_tag),
            Acceptance::Exact(type_id) => model_type.type_id() == type_id,
        }
    }

    /// Runs the update step on an already produced view.
    pub fn update(&self, view: &mut dyn Any, model: &dyn Model) {
        (self.update)(view, model)
    }

    /// Appends an event reaction.
    pub fn append_reaction(&mut self, reaction: EventReaction) {
        self.reactions.push(reaction);
    }

    /// All reactions in the order they were appended.
    pub fn reactions(&self) -> &[EventReaction] {
        &self.reactions
    }

    /// The first reaction registered for `event`.
    pub fn reaction(&self, event: &str) -> Option<&EventReaction> {
        self.reactions.iter().find(|reaction| reaction.event() == event)
    }

    fn dequeue(
        &self,
        container: &dyn ViewContainer,
        model: &ModelValue,
        index_path: &IndexPath,
    ) -> Result<Option<AnyView>> {
        let Some(unwrapped) = model.unwrapped() else {
            tracing::trace!(target: targets::MAPPING, %index_path, "absent model, no view");
            return Ok(None);
        };
        if !self.accepts(unwrapped) {
            tracing::trace!(
                target: targets::MAPPING,
                expected = %self.model_tag,
                found = %unwrapped.model_tag(),
                "model type mismatch, no view"
            );
            return Ok(None);
        }

        let mut view = self.strategy.produce(container, &self.view_type, index_path)?;
        if !(self.strategy.bind)(&mut *view, unwrapped, index_path) {
            // The container handed out a view of another type under this
            // identifier; it goes back untouched.
            tracing::debug!(
                target: targets::MAPPING,
                reuse_identifier = %self.strategy.reuse_identifier,
                "bind rejected view, returning it to the container"
            );
            container.enqueue_reusable_view(&self.view_type, &self.strategy.reuse_identifier, view);
            return Ok(None);
        }
        (self.update)(&mut *view, unwrapped);
        Ok(Some(view))
    }
}

impl Dequeue for ViewModelMapping {
    fn dequeue_configured_cell(
        &self,
        container: &dyn ViewContainer,
        model: &ModelValue,
        index_path: &IndexPath,
    ) -> Result<Option<AnyView>> {
        if !self.view_type.is_cell() {
            return Ok(None);
        }
        self.dequeue(container, model, index_path)
    }

    fn dequeue_configured_supplementary_view(
        &self,
        container: &dyn ViewContainer,
        kind: &str,
        model: &ModelValue,
        index_path: &IndexPath,
    ) -> Result<Option<AnyView>> {
        if self.view_type.supplementary_kind() != Some(kind) {
            return Ok(None);
        }
        self.dequeue(container, model, index_path)
    }
}

impl fmt::Debug for ViewModelMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModelMapping")
            .field("view_type", &self.view_type)
            .field("model_tag", &self.model_tag)
            .field("acceptance", &self.acceptance)
            .field("variant", &self.variant)
            .field("reuse_identifier", &self.strategy.reuse_identifier)
            .field("condition", &self.condition)
            .field("reactions", &self.reactions.len())
            .finish()
    }
}
