//! View containers and reuse pooling.
//!
//! The host's list or grid control owns the views. Mappings only ask it for a
//! view under a reuse identifier and configure whatever comes back. This
//! module defines that contract ([`ViewContainer`]) and [`ViewPool`], an
//! in-memory container for headless hosts and tests.

use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::index_path::IndexPath;
use crate::logging::targets;
use crate::view_type::ViewType;

/// A type-erased view produced by a container.
pub type AnyView = Box<dyn Any + Send>;

/// Creates a fresh view instance.
pub type ViewFactory = Arc<dyn Fn() -> AnyView + Send + Sync>;

/// How a container builds new views for a reuse identifier.
#[derive(Clone)]
pub enum ViewTemplate {
    /// The view is built in code by the factory.
    Inline(ViewFactory),
    /// The view is described by an external resource the container loads by
    /// name.
    Resource(String),
}

impl ViewTemplate {
    /// Creates an inline template from a closure.
    pub fn inline<F>(factory: F) -> Self
    where
        F: Fn() -> AnyView + Send + Sync + 'static,
    {
        Self::Inline(Arc::new(factory))
    }

    /// Returns the inline template for a [`ReusableView`], or its resource
    /// template when it declares one.
    pub fn of<V: ReusableView>() -> Self {
        match V::resource_name() {
            Some(name) => Self::Resource(name.to_owned()),
            None => Self::inline(|| Box::new(V::create())),
        }
    }
}

impl fmt::Debug for ViewTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(_) => write!(f, "Inline(..)"),
            Self::Resource(name) => f.debug_tuple("Resource").field(name).finish(),
        }
    }
}

/// A view type that typed mappings can create and pool.
///
/// # Example
///
/// ```
/// use cellmap_core::ReusableView;
///
/// #[derive(Default)]
/// struct TitleCell {
///     title: String,
/// }
///
/// impl ReusableView for TitleCell {
///     fn create() -> Self {
///         Self::default()
///     }
/// }
///
/// assert_eq!(TitleCell::reuse_identifier(), "TitleCell");
/// ```
pub trait ReusableView: Any + Send + Sized {
    /// Builds a new, unconfigured instance.
    fn create() -> Self;

    /// The pooling key. Defaults to the type name without module paths,
    /// generic arguments included (`Labeled<String>`).
    fn reuse_identifier() -> Cow<'static, str> {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Name of an external resource describing this view, if the view is not
    /// built in code.
    fn resource_name() -> Option<&'static str> {
        None
    }
}

/// Strips module paths from every path segment of a type name.
fn short_type_name(name: &'static str) -> Cow<'static, str> {
    fn last_segment(path: &str) -> &str {
        path.rsplit("::").next().unwrap_or(path)
    }

    if !name.contains('<') {
        return Cow::Borrowed(last_segment(name));
    }

    let mut short = String::with_capacity(name.len());
    let mut start = 0;
    for (i, c) in name.char_indices() {
        if matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' | '*') {
            short.push_str(last_segment(&name[start..i]));
            short.push(c);
            start = i + c.len_utf8();
        }
    }
    short.push_str(last_segment(&name[start..]));
    Cow::Owned(short)
}

/// The pooling primitive of a list or grid control.
///
/// Methods take `&self`: containers are shared handles owned by the UI
/// framework.
pub trait ViewContainer {
    /// Returns `true` if a template is registered for the identifier.
    fn has_template(&self, view_type: &ViewType, reuse_identifier: &str) -> bool;

    /// Registers the template used to build views for the identifier.
    fn register_template(
        &self,
        view_type: &ViewType,
        reuse_identifier: &str,
        template: &ViewTemplate,
    ) -> Result<()>;

    /// Produces a recycled or fresh view for the identifier.
    fn dequeue_reusable_view(
        &self,
        view_type: &ViewType,
        reuse_identifier: &str,
        index_path: &IndexPath,
    ) -> Result<AnyView>;

    /// Takes back a view for later reuse under the identifier.
    fn enqueue_reusable_view(&self, view_type: &ViewType, reuse_identifier: &str, view: AnyView);
}

type PoolKey = (ViewType, String);

#[derive(Default)]
struct PoolState {
    templates: HashMap<PoolKey, ViewFactory>,
    recycled: HashMap<PoolKey, Vec<AnyView>>,
    created: usize,
}

/// An in-memory [`ViewContainer`].
///
/// Resource templates are resolved against factories added with
/// [`with_resource`](Self::with_resource). Views handed back through
/// [`enqueue_reusable_view`](ViewContainer::enqueue_reusable_view) are reused before
/// new ones are built.
#[derive(Default)]
pub struct ViewPool {
    resources: HashMap<String, ViewFactory>,
    state: Mutex<PoolState>,
}

impl ViewPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named resource that [`ViewTemplate::Resource`] can refer to.
    pub fn with_resource<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> AnyView + Send + Sync + 'static,
    {
        self.resources.insert(name.into(), Arc::new(factory));
        self
    }

    /// Number of views built so far (recycled views are not counted twice).
    pub fn created_count(&self) -> usize {
        self.state.lock().created
    }

    /// Number of registered templates.
    pub fn template_count(&self) -> usize {
        self.state.lock().templates.len()
    }
}

impl ViewContainer for ViewPool {
    fn has_template(&self, view_type: &ViewType, reuse_identifier: &str) -> bool {
        self.state
            .lock()
            .templates
            .contains_key(&(view_type.clone(), reuse_identifier.to_owned()))
    }

    fn register_template(
        &self,
        view_type: &ViewType,
        reuse_identifier: &str,
        template: &ViewTemplate,
    ) -> Result<()> {
        let factory = match template {
            ViewTemplate::Inline(factory) => Arc::clone(factory),
            ViewTemplate::Resource(name) => self
                .resources
                .get(name)
                .cloned()
                .ok_or_else(|| Error::resource_not_found(name.as_str()))?,
        };
        tracing::trace!(target: targets::CONTAINER, %view_type, reuse_identifier, ?template, "registered view template");
        self.state
            .lock()
            .templates
            .insert((view_type.clone(), reuse_identifier.to_owned()), factory);
        Ok(())
    }

    fn dequeue_reusable_view(
        &self,
        view_type: &ViewType,
        reuse_identifier: &str,
        index_path: &IndexPath,
    ) -> Result<AnyView> {
        let key = (view_type.clone(), reuse_identifier.to_owned());
        let mut state = self.state.lock();

        if let Some(view) = state.recycled.get_mut(&key).and_then(Vec::pop) {
            tracing::trace!(target: targets::CONTAINER, %view_type, reuse_identifier, %index_path, "reusing view");
            return Ok(view);
        }

        let factory = state
            .templates
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::template_not_registered(view_type, reuse_identifier))?;
        state.created += 1;
        drop(state);

        tracing::trace!(target: targets::CONTAINER, %view_type, reuse_identifier, %index_path, "creating view");
        Ok(factory())
    }

    fn enqueue_reusable_view(&self, view_type: &ViewType, reuse_identifier: &str, view: AnyView) {
        self.state
            .lock()
            .recycled
            .entry((view_type.clone(), reuse_identifier.to_owned()))
            .or_default()
            .push(view);
    }
}
