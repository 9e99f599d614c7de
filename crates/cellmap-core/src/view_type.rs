//! The rendering context a mapping targets.

use std::borrow::Cow;
use std::fmt;

/// Distinguishes cells from supplementary views (headers, footers, badges).
///
/// Two supplementary view types are equal only when their kinds are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewType {
    /// A regular item cell.
    Cell,
    /// A supplementary view of the given kind.
    SupplementaryView(Cow<'static, str>),
}

impl ViewType {
    /// Kind used for section headers.
    pub const HEADER: &'static str = "header";
    /// Kind used for section footers.
    pub const FOOTER: &'static str = "footer";

    /// Creates a supplementary view type of the given kind.
    pub fn supplementary(kind: impl Into<Cow<'static, str>>) -> Self {
        Self::SupplementaryView(kind.into())
    }

    /// The section header view type.
    pub const fn header() -> Self {
        Self::SupplementaryView(Cow::Borrowed(Self::HEADER))
    }

    /// The section footer view type.
    pub const fn footer() -> Self {
        Self::SupplementaryView(Cow::Borrowed(Self::FOOTER))
    }

    /// Returns the supplementary kind, or `None` for cells.
    pub fn supplementary_kind(&self) -> Option<&str> {
        match self {
            Self::Cell => None,
            Self::SupplementaryView(kind) => Some(kind),
        }
    }

    /// Returns `true` for [`ViewType::Cell`].
    #[inline]
    pub fn is_cell(&self) -> bool {
        matches!(self, Self::Cell)
    }

    /// Returns `true` for any supplementary view type.
    #[inline]
    pub fn is_supplementary(&self) -> bool {
        matches!(self, Self::SupplementaryView(_))
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell => write!(f, "cell"),
            Self::SupplementaryView(kind) => write!(f, "supplementary({kind})"),
        }
    }
}
