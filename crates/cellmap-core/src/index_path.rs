//! Index paths for addressing items in sectioned collections.
//!
//! An `IndexPath` is the location of a model inside the ordered sections a
//! storage provides: a section number and an item number within it.

use std::fmt;

/// Represents a position within a sectioned collection.
///
/// Index paths are passed to mapping conditions, bind closures and event
/// reactions so they can act on where a model sits, not only on what it is.
///
/// # Example
///
/// ```
/// use cellmap_core::IndexPath;
///
/// let path = IndexPath::new(1, 4);
/// assert_eq!(path.section(), 1);
/// assert_eq!(path.row(), 4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPath {
    section: usize,
    item: usize,
}

impl IndexPath {
    /// Creates an index path for `item` within `section`.
    #[inline]
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }

    /// Creates the index path used for section-level views such as headers
    /// and footers. The item component is always 0.
    #[inline]
    pub const fn for_section(section: usize) -> Self {
        Self { section, item: 0 }
    }

    /// Returns the section number.
    #[inline]
    pub fn section(&self) -> usize {
        self.section
    }

    /// Returns the item number within the section.
    #[inline]
    pub fn item(&self) -> usize {
        self.item
    }

    /// Alias of [`item`](Self::item) for table-style hosts.
    #[inline]
    pub fn row(&self) -> usize {
        self.item
    }

    /// Creates a sibling at another item in the same section.
    #[inline]
    pub fn sibling(&self, item: usize) -> Self {
        Self::new(self.section, item)
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

impl From<(usize, usize)> for IndexPath {
    fn from((section, item): (usize, usize)) -> Self {
        Self::new(section, item)
    }
}
