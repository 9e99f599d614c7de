//! Section storage.
//!
//! The registry reads models from a [`Storage`]. Real hosts back it with
//! their own data layer; [`SectionedStorage`] is the plain in-memory version.
//! Storage here is read-only from the registry's point of view: it does not
//! compute diffs or emit change notifications.

use std::collections::HashMap;

use cellmap_core::{IndexPath, ModelType, ModelValue};

/// A supplier of ordered sections of model values.
pub trait Storage {
    /// Number of sections.
    fn number_of_sections(&self) -> usize;

    /// Number of items in `section`, or 0 if the section does not exist.
    fn number_of_items(&self, section: usize) -> usize;

    /// The item at `index_path`, if it exists.
    fn item(&self, index_path: &IndexPath) -> Option<ModelValue>;

    /// The supplementary model of `kind` for `section`, if any.
    fn supplementary(&self, kind: &str, section: usize) -> Option<ModelValue>;
}

/// One section: items plus supplementary models keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct Section {
    items: Vec<ModelValue>,
    supplementaries: HashMap<String, ModelValue>,
}

impl Section {
    /// Creates an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a section from model values.
    pub fn from_items(items: impl IntoIterator<Item = ModelValue>) -> Self {
        Self {
            items: items.into_iter().collect(),
            supplementaries: HashMap::new(),
        }
    }

    /// Appends a model and returns the section.
    pub fn with_item<M: ModelType>(mut self, model: M) -> Self {
        self.items.push(ModelValue::new(model));
        self
    }

    /// Sets the supplementary model of `kind` and returns the section.
    pub fn with_supplementary<M: ModelType>(mut self, kind: impl Into<String>, model: M) -> Self {
        self.supplementaries.insert(kind.into(), ModelValue::new(model));
        self
    }

    /// Appends a model value.
    pub fn push(&mut self, value: ModelValue) {
        self.items.push(value);
    }

    /// Sets the supplementary value of `kind`.
    pub fn set_supplementary(&mut self, kind: impl Into<String>, value: ModelValue) {
        self.supplementaries.insert(kind.into(), value);
    }

    /// The items of this section.
    pub fn items(&self) -> &[ModelValue] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the section has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// In-memory [`Storage`] over a list of sections.
#[derive(Debug, Clone, Default)]
pub struct SectionedStorage {
    sections: Vec<Section>,
}

impl SectionedStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a section and returns the storage.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Appends a section.
    pub fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Mutable access to a section.
    pub fn section_mut(&mut self, section: usize) -> Option<&mut Section> {
        self.sections.get_mut(section)
    }

    /// Replaces every section.
    pub fn set_sections(&mut self, sections: Vec<Section>) {
        self.sections = sections;
    }

    /// The sections.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}

impl Storage for SectionedStorage {
    fn number_of_sections(&self) -> usize {
        self.sections.len()
    }

    fn number_of_items(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, Section::len)
    }

    fn item(&self, index_path: &IndexPath) -> Option<ModelValue> {
        self.sections
            .get(index_path.section())?
            .items
            .get(index_path.item())
            .cloned()
    }

    fn supplementary(&self, kind: &str, section: usize) -> Option<ModelValue> {
        self.sections.get(section)?.supplementaries.get(kind).cloned()
    }
}
