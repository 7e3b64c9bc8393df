//! A client and parser for Merriam-Webster's dictionaryapi.com XML references.
//!
//! Definitions in the XML references are a flat run of `<sn>` sense numbers and `<dt>` defining
//! texts. This crate reconstructs the outline they describe (`1`, `1 a`, `1 a (1)`, ...) into
//! nested [`Sense`]s.
//!
//! ```
//! let body = "<entry_list><entry><ew>bagel</ew><fl>noun</fl><def>\
//!             <dt>:a firm doughnut-shaped roll</dt></def></entry></entry_list>";
//! let entries = dictionaryapi::parse_dictionary(body, "bagel")?;
//!
//! assert_eq!(entries[0].definition[0].meanings, [": a firm doughnut-shaped roll"]);
//! # Ok::<(), dictionaryapi::Error>(())
//! ```

// Allow repetition of structure name instead of replacing with self as the output from
// rust-analyzer becomes more readable
#![allow(clippy::use_self)]

#[cfg(feature = "client")]
pub mod client;
pub mod entry;
mod error;
pub mod hierarchy;
pub mod markup;
pub mod sense;
pub mod text;
pub mod walker;

#[cfg(feature = "client")]
pub use client::{Client, Reference};
pub use entry::{Entry, Parser, Strictness, ThesaurusEntry, parse_dictionary, parse_thesaurus};
pub use error::Error;
pub use sense::{Sense, SenseBuilder};
