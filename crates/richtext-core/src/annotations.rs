//! Annotation flags and annotation sets.
//!
//! Every run carries exactly one [`AnnotationSet`]: a closed set of boolean style flags
//! plus a color. The flag set is fixed at compile time, so equality (used when merging
//! runs) and "does every covered run have this flag" checks are total functions.

use crate::error::EngineError;
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

/// A single toggleable style flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationFlag {
    /// Bold weight.
    Bold,
    /// Italic style.
    Italic,
    /// Line through the text.
    Strikethrough,
    /// Underline decoration.
    Underline,
    /// Text is attached to a comment.
    Comment,
}

impl AnnotationFlag {
    /// All flags, in declaration order.
    pub const ALL: [AnnotationFlag; 5] = [
        AnnotationFlag::Bold,
        AnnotationFlag::Italic,
        AnnotationFlag::Strikethrough,
        AnnotationFlag::Underline,
        AnnotationFlag::Comment,
    ];

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            AnnotationFlag::Bold => "bold",
            AnnotationFlag::Italic => "italic",
            AnnotationFlag::Strikethrough => "strikethrough",
            AnnotationFlag::Underline => "underline",
            AnnotationFlag::Comment => "comment",
        }
    }

    const fn bit(self) -> AnnotationFlags {
        match self {
            AnnotationFlag::Bold => AnnotationFlags::BOLD,
            AnnotationFlag::Italic => AnnotationFlags::ITALIC,
            AnnotationFlag::Strikethrough => AnnotationFlags::STRIKETHROUGH,
            AnnotationFlag::Underline => AnnotationFlags::UNDERLINE,
            AnnotationFlag::Comment => AnnotationFlags::COMMENT,
        }
    }
}

impl fmt::Display for AnnotationFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnnotationFlag {
    type Err = EngineError;

    /// Parses a flag name, ignoring ASCII case. `lineThrough` and `line-through` are
    /// accepted for [`AnnotationFlag::Strikethrough`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bold" => Ok(AnnotationFlag::Bold),
            "italic" => Ok(AnnotationFlag::Italic),
            "strikethrough" | "linethrough" | "line-through" => Ok(AnnotationFlag::Strikethrough),
            "underline" => Ok(AnnotationFlag::Underline),
            "comment" => Ok(AnnotationFlag::Comment),
            _ => Err(EngineError::UnknownAnnotationType(s.to_string())),
        }
    }
}

bitflags! {
    /// Bitset of active [`AnnotationFlag`]s.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AnnotationFlags: u8 {
        /// [`AnnotationFlag::Bold`]
        const BOLD = 1 << 0;
        /// [`AnnotationFlag::Italic`]
        const ITALIC = 1 << 1;
        /// [`AnnotationFlag::Strikethrough`]
        const STRIKETHROUGH = 1 << 2;
        /// [`AnnotationFlag::Underline`]
        const UNDERLINE = 1 << 3;
        /// [`AnnotationFlag::Comment`]
        const COMMENT = 1 << 4;
    }
}

impl From<AnnotationFlag> for AnnotationFlags {
    fn from(flag: AnnotationFlag) -> Self {
        flag.bit()
    }
}

/// Text color, stored by name (e.g. `"black"`, `"#ff0000"`).
///
/// The engine never interprets the value; two colors are equal iff their names are.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
    /// Name of the default color.
    pub const DEFAULT_NAME: &'static str = "black";

    /// Create a color from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The color name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}

impl From<&str> for Color {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The style attached to one run.
///
/// Immutable in use: every modifier consumes `&self` and returns a new set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AnnotationSet {
    flags: AnnotationFlags,
    color: Color,
}

impl AnnotationSet {
    /// Unstyled set (no flags, default color).
    pub fn plain() -> Self {
        Self::default()
    }

    /// Set with the given flags and the default color.
    pub fn from_flags(flags: AnnotationFlags) -> Self {
        Self {
            flags,
            color: Color::default(),
        }
    }

    /// Returns `true` if `flag` is set.
    pub fn contains(&self, flag: AnnotationFlag) -> bool {
        self.flags.contains(flag.bit())
    }

    /// Copy of this set with `flag` forced to `value`.
    pub fn with(&self, flag: AnnotationFlag, value: bool) -> Self {
        let mut flags = self.flags;
        flags.set(flag.bit(), value);
        Self {
            flags,
            color: self.color.clone(),
        }
    }

    /// Copy of this set with `flag` flipped.
    pub fn toggled(&self, flag: AnnotationFlag) -> Self {
        Self {
            flags: self.flags ^ flag.bit(),
            color: self.color.clone(),
        }
    }

    /// Copy of this set with a different color.
    pub fn with_color(&self, color: Color) -> Self {
        Self {
            flags: self.flags,
            color,
        }
    }

    /// Raw flag bits.
    pub fn flags(&self) -> AnnotationFlags {
        self.flags
    }

    /// The color.
    pub fn color(&self) -> &Color {
        &self.color
    }

    /// Iterate over the active flags in declaration order.
    pub fn active(&self) -> impl Iterator<Item = AnnotationFlag> + '_ {
        AnnotationFlag::ALL
            .into_iter()
            .filter(|flag| self.contains(*flag))
    }

    /// Returns `true` if no flag is set and the color is the default one.
    pub fn is_plain(&self) -> bool {
        self.flags.is_empty() && self.color == Color::default()
    }
}

impl From<AnnotationFlag> for AnnotationSet {
    fn from(flag: AnnotationFlag) -> Self {
        Self::from_flags(flag.bit())
    }
}
