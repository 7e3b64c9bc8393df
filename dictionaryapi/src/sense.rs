//! Word senses
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::text::normalize_leading_colon;

/// A single sense of a word, possibly subdivided into sub-senses.
///
/// Empty and absent fields are left out when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Sense {
    /// The outline label of the sense
    ///
    /// Examples: `1`, `b`, `(2)`
    ///
    /// Parsed from `<sn>`. Compound labels such as `1 a` are split into nested senses.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub label: Option<String>,
    /// Verb transitivity that applies to this sense
    ///
    /// Examples: `transitive verb`, `intransitive verb`
    ///
    /// Parsed from the closest preceding `<vt>`
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub transitivity: Option<String>,
    /// Subject/status label, e.g. `often capitalized`
    ///
    /// Parsed from `<ssl>`
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub status: Option<String>,
    /// The defining texts of the sense
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub meanings: Vec<String>,
    /// Synonymous cross-references
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub synonyms: Vec<String>,
    /// Antonyms (thesaurus only)
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub antonyms: Vec<String>,
    /// Verbal illustrations, i.e. example usages
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub illustrations: Vec<String>,
    /// Nested sub-senses
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<Sense>,
}

/// A sense under construction.
///
/// Builders are filled in while walking a definition and rearranged by
/// [`fold`](crate::hierarchy::fold) before they are frozen with [`SenseBuilder::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenseBuilder {
    pub(crate) label: Option<String>,
    pub(crate) transitivity: Option<String>,
    pub(crate) status: Option<String>,
    pub(crate) meanings: Vec<String>,
    pub(crate) synonyms: Vec<String>,
    pub(crate) antonyms: Vec<String>,
    pub(crate) illustrations: Vec<String>,
    pub(crate) children: Vec<SenseBuilder>,
}

impl SenseBuilder {
    /// Creates an empty sense.
    #[must_use]
    pub fn new() -> SenseBuilder {
        SenseBuilder::default()
    }

    /// Creates a sense with the given outline label.
    ///
    /// An empty label is treated as no label.
    #[must_use]
    pub fn with_label(label: impl Into<String>) -> SenseBuilder {
        let label = label.into();

        SenseBuilder {
            label: (!label.is_empty()).then_some(label),
            ..SenseBuilder::default()
        }
    }

    /// Returns the outline label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the sub-senses.
    #[must_use]
    pub fn children(&self) -> &[SenseBuilder] {
        &self.children
    }

    /// Returns whether any defining text has been added.
    #[must_use]
    pub fn has_meanings(&self) -> bool {
        !self.meanings.is_empty()
    }

    /// Sets the transitivity.
    pub fn set_transitivity(&mut self, transitivity: Option<String>) {
        self.transitivity = transitivity;
    }

    /// Sets the status label.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Adds a defining text, normalizing a leading `":word"` to `": word"`.
    pub fn add_meaning(&mut self, meaning: &str) {
        self.meanings.push(normalize_leading_colon(meaning));
    }

    /// Adds a synonym.
    pub fn add_synonym(&mut self, synonym: impl Into<String>) {
        self.synonyms.push(synonym.into());
    }

    /// Adds an antonym.
    pub fn add_antonym(&mut self, antonym: impl Into<String>) {
        self.antonyms.push(antonym.into());
    }

    /// Adds a verbal illustration.
    pub fn add_illustration(&mut self, illustration: impl Into<String>) {
        self.illustrations.push(illustration.into());
    }

    /// Appends a sub-sense.
    pub fn add_child(&mut self, child: SenseBuilder) {
        self.children.push(child);
    }

    /// Merges a later sense carrying the same label into this one.
    ///
    /// Lists are appended in order. Status and transitivity are only taken from `other` when this
    /// sense has none.
    pub(crate) fn absorb(&mut self, other: SenseBuilder) {
        self.transitivity = self.transitivity.take().or(other.transitivity);
        self.status = self.status.take().or(other.status);
        self.meanings.extend(other.meanings);
        self.synonyms.extend(other.synonyms);
        self.antonyms.extend(other.antonyms);
        self.illustrations.extend(other.illustrations);
        self.children.extend(other.children);
    }

    /// Freezes this sense and all of its sub-senses.
    #[must_use]
    pub fn build(self) -> Sense {
        Sense {
            label: self.label,
            transitivity: self.transitivity,
            status: self.status,
            meanings: self.meanings,
            synonyms: self.synonyms,
            antonyms: self.antonyms,
            illustrations: self.illustrations,
            children: self.children.into_iter().map(SenseBuilder::build).collect(),
        }
    }
}
