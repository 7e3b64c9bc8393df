//! Structured entries
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::hierarchy::fold;
use crate::markup::{Child, Document, Markup, Tag};
use crate::sense::{Sense, SenseBuilder};
use crate::text::{audio_url, format_etymology};
use crate::walker::{walk_definition, walk_thesaurus_sense};

/// A dictionary entry from the Collegiate or Learner's dictionary.
///
/// # XML Source
/// Parsed from `<entry>` elements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entry {
    /// The entry word
    ///
    /// Parsed from `<ew>`, falls back to the word that was looked up
    pub word: String,

    /// Part of speech
    ///
    /// Examples: `noun`, `transitive verb`
    ///
    /// Parsed from `<fl>`
    pub functional_label: String,

    /// URLs of the pronunciation audio files
    ///
    /// Derived from the `<wav>` elements in `<sound>`
    pub pronunciation: Vec<String>,

    /// Word origin, with italic words in square brackets
    ///
    /// Examples: `Yiddish [beygl,] from Middle High German [*böugel] ring`
    ///
    /// Parsed from `<et>`
    pub etymology: String,

    /// The top-level senses of the word
    ///
    /// Parsed from `<def>`
    pub definition: Vec<Sense>,

    /// How popular the word is among lookups, e.g. `Top 30% of lookups`
    ///
    /// Only set for entries whose word is the one that was looked up
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub popularity: Option<String>,

    /// Senses that were dropped from the definition because they had no parent
    ///
    /// Only collected by a [`Strictness::Strict`] parser
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub warnings: Vec<String>,
}

/// A thesaurus entry.
///
/// # XML Source
/// Parsed from `<entry>` elements of the thesaurus reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThesaurusEntry {
    /// The headword
    ///
    /// Parsed from `<term>`, falls back to the word that was looked up
    pub word: String,

    /// Part of speech
    ///
    /// Parsed from `<fl>`
    pub functional_label: String,

    /// One sense per `<sens>` group, never nested
    pub definition: Vec<Sense>,

    /// How popular the word is among lookups
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub popularity: Option<String>,
}

/// Defines how the parser treats senses it cannot place in the outline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Dropped senses are reported in [`Entry::warnings`]
    Strict,
    /// Dropped senses are silently ignored
    #[default]
    Lenient,
}

/// Entry parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    strictness: Strictness,
}

impl Parser {
    /// Creates a parser with the given strictness.
    #[must_use]
    pub const fn new(strictness: Strictness) -> Parser {
        Parser { strictness }
    }

    /// Creates a lenient parser.
    #[must_use]
    pub const fn lenient() -> Parser {
        Parser::new(Strictness::Lenient)
    }

    /// Creates a strict parser.
    #[must_use]
    pub const fn strict() -> Parser {
        Parser::new(Strictness::Strict)
    }

    /// Parses a Collegiate or Learner's dictionary response for `word`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] with the reference's suggestions when the response has no
    /// entries.
    pub fn parse_dictionary(&self, body: &str, word: &str) -> Result<Vec<Entry>, Error> {
        let document = Document::parse(body);
        let root = document.root();

        ensure_entries(root)?;

        Ok(root
            .find_all(Tag::Entry)
            .map(|entry| self.entry(entry, word))
            .collect())
    }

    /// Parses a thesaurus response for `word`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] with the reference's suggestions when the response has no
    /// entries.
    pub fn parse_thesaurus(&self, body: &str, word: &str) -> Result<Vec<ThesaurusEntry>, Error> {
        let document = Document::parse(body);
        let root = document.root();

        ensure_entries(root)?;

        Ok(root
            .find_all(Tag::Entry)
            .map(|entry| thesaurus_entry(entry, word))
            .collect())
    }

    /// Assembles a single dictionary entry.
    fn entry<'a, M: Markup<'a>>(&self, entry: M, word: &str) -> Entry {
        let headword = entry
            .find(Tag::EntryWord)
            .map(Markup::text_content)
            .unwrap_or_default();
        let pronunciation: Vec<String> = entry
            .find(Tag::Sound)
            .map(|sound| {
                sound
                    .find_all(Tag::Wav)
                    .map(|wav| audio_url(&wav.text_content()))
                    .collect()
            })
            .unwrap_or_default();
        let etymology = entry
            .find(Tag::Etymology)
            .map(format_etymology)
            .unwrap_or_default();
        let folded = fold(
            entry
                .find(Tag::Definition)
                .map(walk_definition)
                .unwrap_or_default(),
        );
        let warnings: Vec<String> = if self.strictness == Strictness::Strict {
            folded.orphans.iter().map(orphan_warning).collect()
        } else {
            vec![]
        };

        #[cfg(feature = "log")]
        for warning in &warnings {
            tracing::warn!(%word, %warning, "malformed sense outline");
        }

        Entry {
            word: if headword.is_empty() {
                word.to_string()
            } else {
                headword
            },
            functional_label: functional_label(entry),
            pronunciation,
            etymology,
            definition: folded.roots.into_iter().map(SenseBuilder::build).collect(),
            popularity: None,
            warnings,
        }
    }
}

/// Parses a dictionary response for `word` with a lenient [`Parser`].
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the response has no entries.
pub fn parse_dictionary(body: &str, word: &str) -> Result<Vec<Entry>, Error> {
    Parser::lenient().parse_dictionary(body, word)
}

/// Parses a thesaurus response for `word` with a lenient [`Parser`].
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the response has no entries.
pub fn parse_thesaurus(body: &str, word: &str) -> Result<Vec<ThesaurusEntry>, Error> {
    Parser::lenient().parse_thesaurus(body, word)
}

/// Fails with the document's suggestions if it has no entries.
fn ensure_entries<'a, M: Markup<'a>>(root: M) -> Result<(), Error> {
    if root.find(Tag::Entry).is_some() {
        return Ok(());
    }

    let suggestions = root
        .find_all(Tag::Suggestion)
        .map(Markup::text_content)
        .collect();

    Err(Error::NotFound { suggestions })
}

fn functional_label<'a, M: Markup<'a>>(entry: M) -> String {
    entry
        .find(Tag::FunctionalLabel)
        .map(Markup::text_content)
        .unwrap_or_default()
}

fn thesaurus_entry<'a, M: Markup<'a>>(entry: M, word: &str) -> ThesaurusEntry {
    let term = entry
        .find(Tag::Term)
        .map(|term| {
            term.child_nodes()
                .map(Child::text_content)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();
    let definition = entry
        .elements()
        .filter(|node| node.tag() == Tag::Sense)
        .map(|node| walk_thesaurus_sense(node).build())
        .collect();

    ThesaurusEntry {
        word: if term.is_empty() {
            word.to_string()
        } else {
            term
        },
        functional_label: functional_label(entry),
        definition,
        popularity: None,
    }
}

fn orphan_warning(sense: &SenseBuilder) -> String {
    match sense.label() {
        Some(label) => format!("dropped sense `{label}` without a parent sense"),
        None => "dropped unnumbered sense without a parent sense".to_string(),
    }
}
