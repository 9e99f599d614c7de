//! Event reactions attached to mappings.
//!
//! Hosts forward location-scoped events (selection, moves, size queries) to
//! the mapping that rendered the item. A reaction is a typed closure keyed by
//! an event name, a view type and a model type. It returns an arbitrary
//! value the host can downcast (a row height, a "should highlight" flag).

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::index_path::IndexPath;
use crate::logging::targets;
use crate::model::{Model, ModelType, ModelTypeInfo};
use crate::view_type::ViewType;

/// The value produced by a reaction.
pub type ReactionOutput = Box<dyn Any + Send>;

type ReactionFn =
    Arc<dyn Fn(Option<&mut dyn Any>, &dyn Model, &IndexPath) -> Option<ReactionOutput> + Send + Sync>;

/// A closure run for a named event on items rendered by a mapping.
///
/// # Example
///
/// ```
/// use cellmap_core::{EventReaction, IndexPath, ViewType};
///
/// let height = EventReaction::model::<String, f32>(
///     "height_for_row",
///     ViewType::Cell,
///     |title, _| if title.len() > 20 { 64.0 } else { 44.0 },
/// );
///
/// let output = height
///     .perform(None, &String::from("short"), &IndexPath::default())
///     .unwrap();
/// assert_eq!(output.downcast_ref::<f32>(), Some(&44.0));
/// ```
#[derive(Clone)]
pub struct EventReaction {
    event: Cow<'static, str>,
    view_type: ViewType,
    model_type: ModelTypeInfo,
    requires_view: bool,
    reaction: ReactionFn,
}

impl EventReaction {
    /// Creates a reaction that needs only the model and its index path.
    pub fn model<M, R>(
        event: impl Into<Cow<'static, str>>,
        view_type: ViewType,
        reaction: impl Fn(&M, &IndexPath) -> R + Send + Sync + 'static,
    ) -> Self
    where
        M: ModelType,
        R: Send + 'static,
    {
        Self {
            event: event.into(),
            view_type,
            model_type: ModelTypeInfo::of::<M>(),
            requires_view: false,
            reaction: Arc::new(
                move |_: Option<&mut dyn Any>, model: &dyn Model, index_path: &IndexPath| {
                    let model = model.downcast_ref::<M>()?;
                    Some(Box::new(reaction(model, index_path)) as ReactionOutput)
                },
            ),
        }
    }

    /// Creates a reaction that also receives the rendered view.
    pub fn view_model<V, M, R>(
        event: impl Into<Cow<'static, str>>,
        view_type: ViewType,
        reaction: impl Fn(&mut V, &M, &IndexPath) -> R + Send + Sync + 'static,
    ) -> Self
    where
        V: Any,
        M: ModelType,
        R: Send + 'static,
    {
        Self {
            event: event.into(),
            view_type,
            model_type: ModelTypeInfo::of::<M>(),
            requires_view: true,
            reaction: Arc::new(
                move |view: Option<&mut dyn Any>, model: &dyn Model, index_path: &IndexPath| {
                    let view = view?.downcast_mut::<V>()?;
                    let model = model.downcast_ref::<M>()?;
                    Some(Box::new(reaction(view, model, index_path)) as ReactionOutput)
                },
            ),
        }
    }

    /// The event name this reaction answers.
    #[inline]
    pub fn event(&self) -> &str {
        &self.event
    }

    /// The view type of the items this reaction applies to.
    #[inline]
    pub fn view_type(&self) -> &ViewType {
        &self.view_type
    }

    /// The model type this reaction was written for.
    #[inline]
    pub fn model_type(&self) -> &ModelTypeInfo {
        &self.model_type
    }

    /// Returns `true` if the reaction needs the rendered view.
    #[inline]
    pub fn requires_view(&self) -> bool {
        self.requires_view
    }

    /// Runs the reaction.
    ///
    /// Returns `None` when the model is not of the reaction's type, or when
    /// the view is required but missing or of another type.
    pub fn perform(
        &self,
        view: Option<&mut dyn Any>,
        model: &dyn Model,
        index_path: &IndexPath,
    ) -> Option<ReactionOutput> {
        let output = (self.reaction)(view, model, index_path);
        if output.is_none() {
            tracing::trace!(
                target: targets::REACTION,
                event = %self.event,
                model = %model.model_tag(),
                "reaction did not accept its arguments"
            );
        }
        output
    }
}

impl fmt::Debug for EventReaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventReaction")
            .field("event", &self.event)
            .field("view_type", &self.view_type)
            .field("model_type", &self.model_type.tag())
            .field("requires_view", &self.requires_view)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Badge {
        taps: u32,
    }

    #[test]
    fn test_model_reaction() {
        let reaction = EventReaction::model::<i32, i32>("double", ViewType::Cell, |n, path| {
            n * 2 + path.item() as i32
        });
        assert_eq!(reaction.event(), "double");
        assert!(!reaction.requires_view());
        assert_eq!(reaction.model_type().tag(), i32::TAG);

        let output = reaction.perform(None, &10i32, &IndexPath::new(0, 1)).unwrap();
        assert_eq!(*output.downcast::<i32>().unwrap(), 21);
    }

    #[test]
    fn test_model_reaction_rejects_other_types() {
        let reaction = EventReaction::model::<i32, ()>("noop", ViewType::Cell, |_, _| ());
        assert!(reaction.perform(None, &1u64, &IndexPath::default()).is_none());
    }

    #[test]
    fn test_view_model_reaction() {
        let reaction = EventReaction::view_model::<Badge, String, u32>(
            "did_select",
            ViewType::Cell,
            |badge, _, _| {
                badge.taps += 1;
                badge.taps
            },
        );
        assert!(reaction.requires_view());

        let mut badge = Badge::default();
        let model = String::from("inbox");
        reaction.perform(Some(&mut badge), &model, &IndexPath::default());
        let output = reaction
            .perform(Some(&mut badge), &model, &IndexPath::default())
            .unwrap();
        assert_eq!(output.downcast_ref::<u32>(), Some(&2));
        assert_eq!(badge.taps, 2);
    }

    #[test]
    fn test_view_model_reaction_needs_view() {
        let reaction =
            EventReaction::view_model::<Badge, String, ()>("did_select", ViewType::Cell, |_, _, _| ());
        assert!(reaction.perform(None, &String::new(), &IndexPath::default()).is_none());

        let mut wrong_view = 0u8;
        assert!(reaction
            .perform(Some(&mut wrong_view), &String::new(), &IndexPath::default())
            .is_none());
    }
}
