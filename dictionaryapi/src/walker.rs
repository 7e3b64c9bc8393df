//! Definition walkers
//!
//! The walkers turn the children of a `<def>` or a thesaurus `<sens>` element into senses. They
//! never fail: markup they don't recognize is skipped.

use crate::markup::{Markup, Tag};
use crate::sense::SenseBuilder;

/// Child tags of a defining text that are not part of the meaning itself.
const DEFINING_TEXT_EXCLUDES: &[Tag] = &[Tag::SynonymousCrossReference, Tag::VerbalIllustration];

/// Walks the children of a `<def>` element and returns the senses in document order.
///
/// The senses are not nested yet, see [`fold`](crate::hierarchy::fold).
pub fn walk_definition<'a, M: Markup<'a>>(definition: M) -> Vec<SenseBuilder> {
    let mut senses: Vec<SenseBuilder> = vec![];
    // Index of the sense currently being filled in.
    let mut current: Option<usize> = None;
    let mut transitivity: Option<String> = None;

    for node in definition.elements() {
        match node.tag() {
            Tag::SenseNumber => {
                let label = node.text_content();
                let mut sense = SenseBuilder::with_label(label);

                if sense
                    .label()
                    .is_some_and(|label| label.starts_with(|c: char| c.is_ascii_digit()))
                {
                    sense.set_transitivity(transitivity.clone());
                }

                current = Some(senses.len());
                senses.push(sense);
            }
            Tag::StatusLabel => {
                if let Some(sense) = current.and_then(|index| senses.get_mut(index)) {
                    sense.set_status(node.text_content());
                }
            }
            Tag::DefiningText | Tag::SenseDivider | Tag::SenseSet => {
                let index = *current.get_or_insert_with(|| {
                    let mut sense = SenseBuilder::new();
                    sense.set_transitivity(transitivity.clone());
                    senses.push(sense);

                    senses.len() - 1
                });

                if let Some(sense) = senses.get_mut(index) {
                    walk_defining_text(node, sense);
                }
            }
            Tag::Transitivity => {
                transitivity = Some(node.text_content());
            }
            _ => {}
        }
    }

    senses
}

/// Adds the meaning of a defining text to `sense`, along with the synonyms and verbal
/// illustrations nested inside it.
pub fn walk_defining_text<'a, M: Markup<'a>>(defining_text: M, sense: &mut SenseBuilder) {
    sense.add_meaning(&defining_text.text_content_excluding(DEFINING_TEXT_EXCLUDES));

    for node in defining_text.elements() {
        match node.tag() {
            Tag::SynonymousCrossReference => {
                sense.add_synonym(node.text_content_excluding(&[Tag::CrossReferenceNumber]));
            }
            Tag::VerbalIllustration => {
                sense.add_illustration(node.text_content());
            }
            _ => {}
        }
    }
}

/// Walks a thesaurus `<sens>` element into a single sense without sub-senses.
pub fn walk_thesaurus_sense<'a, M: Markup<'a>>(sense_group: M) -> SenseBuilder {
    let mut sense = SenseBuilder::new();

    for node in sense_group.elements() {
        match node.tag() {
            Tag::SenseNumber => {
                sense.label = Some(node.text_content()).filter(|label| !label.is_empty());
            }
            Tag::MeaningCore => {
                sense.add_meaning(node.text_content().trim());
            }
            Tag::VerbalIllustration => {
                sense.add_illustration(node.text_content());
            }
            Tag::Synonyms => {
                for synonym in node.text_content().split(',') {
                    sense.add_synonym(synonym.trim());
                }
            }
            Tag::Antonyms => {
                for antonym in node.text_content().split(',') {
                    sense.add_antonym(antonym.trim());
                }
            }
            _ => {}
        }
    }

    sense
}
