//! Sense outline reconstruction
//!
//! A definition arrives as a flat list of senses in document order. The nesting is only encoded
//! in the shape of each sense's label:
//!
//! ```text
//! 1 a      <- "1" is implied, "a" is this sense
//! b
//! 2 a (1)  <- "2" and "a" are implied, "(1)" is this sense
//! (2)
//! b
//! 3
//! ```
//!
//! Labels are not unique (every number reuses `a`, `b`, ...), so the outline is recovered by
//! walking the list backwards: deeper senses are parked on a stack until the closest preceding
//! shallower sense picks them up.

use crate::sense::SenseBuilder;
use crate::text::{Bullet, classify_bullet, is_numeric};

/// The result of folding a flat list of senses.
#[derive(Debug, Default)]
pub struct Folded {
    /// Top-level senses in document order.
    pub roots: Vec<SenseBuilder>,
    /// Senses that could not be attached to a parent and were dropped from the outline.
    pub orphans: Vec<SenseBuilder>,
}

/// Senses waiting for their parent, latest in document order at the bottom.
#[derive(Debug, Default)]
struct PendingSenses {
    stack: Vec<(Bullet, SenseBuilder)>,
}

impl PendingSenses {
    fn push(&mut self, bullet: Bullet, sense: SenseBuilder) {
        self.stack.push((bullet, sense));
    }

    /// Pops the run of senses at the top of the stack that share the bullet kind of the topmost
    /// one.
    fn pop_run(&mut self) -> Vec<SenseBuilder> {
        match self.stack.last() {
            Some(&(bullet, _)) => self.pop_run_of(bullet),
            None => vec![],
        }
    }

    /// Pops the run of senses at the top of the stack with the given bullet kind.
    fn pop_run_of(&mut self, bullet: Bullet) -> Vec<SenseBuilder> {
        let mut run = vec![];

        while let Some((top, _)) = self.stack.last() {
            if *top != bullet {
                break;
            }

            if let Some((_, sense)) = self.stack.pop() {
                run.push(sense);
            }
        }

        run
    }

    fn into_senses(self) -> impl Iterator<Item = SenseBuilder> {
        self.stack.into_iter().rev().map(|(_, sense)| sense)
    }
}

/// Returns whether the sense belongs at the top of the outline.
fn is_root(sense: &SenseBuilder) -> bool {
    match sense.label() {
        Some(label) => is_numeric(label),
        None => sense.has_meanings(),
    }
}

/// Parks `sense` on the stack if it is a sub-sense, or returns it if it may be top-level.
///
/// A sense first adopts the senses directly below it in the outline, so `1, a, b` folds the same
/// way as `1 a, b` does.
fn settle(mut sense: SenseBuilder, pending: &mut PendingSenses) -> Option<SenseBuilder> {
    let bullet = sense.label().and_then(classify_bullet);

    if let Some(child) = bullet.and_then(Bullet::child) {
        sense.children.extend(pending.pop_run_of(child));
    }

    match bullet {
        Some(bullet @ (Bullet::Letter | Bullet::Parenthesized)) => {
            pending.push(bullet, sense);
            None
        }
        _ => Some(sense),
    }
}

/// Folds a flat list of senses into an outline.
///
/// Both the top-level senses and the senses that were dropped because they had no parent to be
/// attached to are returned.
#[must_use]
pub fn fold(senses: Vec<SenseBuilder>) -> Folded {
    let mut pending = PendingSenses::default();
    // Top-level candidates, paired with whether they were implied by a compound label.
    let mut slots: Vec<(SenseBuilder, bool)> = Vec::with_capacity(senses.len());
    let mut orphans = vec![];

    for mut sense in senses.into_iter().rev() {
        let Some(label) = sense.label.take() else {
            if sense.has_meanings() {
                sense.children = pending.pop_run();
                slots.push((sense, false));
            }

            continue;
        };

        let mut tokens: Vec<&str> = label.split(' ').collect();
        let own = tokens.pop().unwrap_or_default();
        // The implied top-level sense carries the transitivity, not its first sub-sense.
        let transitivity = if tokens.is_empty() {
            None
        } else {
            sense.transitivity.take()
        };

        sense.label = Some(own.to_string());
        let mut slot = settle(sense, &mut pending);
        let mut implied_slot = false;

        for token in tokens.into_iter().rev() {
            let mut implied = SenseBuilder::with_label(token);
            implied.children = pending.pop_run();

            match implied.label().and_then(classify_bullet) {
                Some(bullet @ (Bullet::Letter | Bullet::Parenthesized)) => {
                    pending.push(bullet, implied);
                }
                bullet => {
                    if bullet == Some(Bullet::Numeric) {
                        implied.transitivity.clone_from(&transitivity);
                    }

                    if let Some(replaced) = slot.replace(implied) {
                        orphans.push(replaced);
                    }

                    implied_slot = true;
                }
            }
        }

        slots.extend(slot.map(|sense| (sense, implied_slot)));
    }

    slots.reverse();

    let mut roots: Vec<SenseBuilder> = vec![];

    for (sense, implied) in slots {
        if !is_root(&sense) {
            orphans.push(sense);
            continue;
        }

        // `1 a, 1 b` both imply `1`; a sense that merely reuses a number starts a new one.
        match roots.last_mut() {
            Some(previous)
                if implied
                    && previous.label == sense.label
                    && previous.transitivity == sense.transitivity =>
            {
                previous.absorb(sense);
            }
            _ => roots.push(sense),
        }
    }

    orphans.extend(pending.into_senses());

    Folded { roots, orphans }
}

/// Folds a flat list of senses into an outline, dropping senses that have no parent.
#[must_use]
pub fn build_hierarchy(senses: Vec<SenseBuilder>) -> Vec<SenseBuilder> {
    fold(senses).roots
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Creates a sense with a label and a single meaning derived from it.
    fn sense(label: &str) -> SenseBuilder {
        let mut sense = SenseBuilder::with_label(label);
        sense.add_meaning(&format!("meaning of {label}"));
        sense
    }

    fn senses(labels: &[&str]) -> Vec<SenseBuilder> {
        labels.iter().copied().map(sense).collect()
    }

    fn labels(senses: &[SenseBuilder]) -> Vec<&str> {
        senses.iter().filter_map(SenseBuilder::label).collect()
    }

    /// Renders an outline as `label{children}` for compact comparisons.
    fn outline(senses: &[SenseBuilder]) -> String {
        senses
            .iter()
            .map(|sense| {
                let label = sense.label().unwrap_or("_");

                if sense.children().is_empty() {
                    label.to_string()
                } else {
                    format!("{label}{{{}}}", outline(sense.children()))
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Flattens an outline back into a list with plain labels.
    fn flatten(senses: Vec<SenseBuilder>) -> Vec<SenseBuilder> {
        senses
            .into_iter()
            .flat_map(|mut sense| {
                let children = std::mem::take(&mut sense.children);

                std::iter::once(sense).chain(flatten(children))
            })
            .collect()
    }

    /// Flattens an outline into compound labels the way the reference encodes them: the first
    /// sub-sense of a sense without meanings carries the labels of its ancestors.
    fn flatten_compound(senses: Vec<SenseBuilder>, prefix: &str) -> Vec<SenseBuilder> {
        let mut flat = vec![];

        for (index, mut sense) in senses.into_iter().enumerate() {
            let children = std::mem::take(&mut sense.children);
            let label = sense.label.take().unwrap_or_default();
            let label = if index == 0 && !prefix.is_empty() {
                format!("{prefix} {label}")
            } else {
                label
            };

            if sense.has_meanings() || children.is_empty() {
                sense.label = Some(label);
                flat.push(sense);
                flat.extend(flatten(children));
            } else {
                flat.extend(flatten_compound(children, &label));
            }
        }

        flat
    }

    #[test]
    fn test_numeric_senses_stay_flat() {
        let folded = build_hierarchy(senses(&["1", "2", "3", "4"]));

        assert_eq!(labels(&folded), vec!["1", "2", "3", "4"]);
        assert!(folded.iter().all(|sense| sense.children().is_empty()));
    }

    #[test]
    fn test_plain_letters_nest_under_preceding_number() {
        let folded = build_hierarchy(senses(&["1", "a", "b", "2"]));

        assert_eq!(outline(&folded), "1{a b} 2");
    }

    #[test]
    fn test_compound_labels_with_shared_number_merge() {
        let folded = build_hierarchy(senses(&["1 a", "1 b"]));

        assert_eq!(outline(&folded), "1{a b}");
        assert!(!folded[0].has_meanings());
        assert_eq!(folded[0].children()[1].meanings, vec!["meaning of 1 b"]);
    }

    #[test]
    fn test_repeated_plain_numbers_stay_separate() {
        let folded = build_hierarchy(senses(&["1", "2", "1"]));

        assert_eq!(outline(&folded), "1 2 1");
    }

    #[test]
    fn test_numbering_restarts_after_transitivity_change() {
        let mut transitive = sense("1");
        transitive.set_transitivity(Some("transitive verb".to_string()));
        let mut intransitive = sense("1");
        intransitive.set_transitivity(Some("intransitive verb".to_string()));

        let folded = build_hierarchy(vec![transitive, intransitive]);

        assert_eq!(labels(&folded), vec!["1", "1"]);
        assert_eq!(folded[0].transitivity.as_deref(), Some("transitive verb"));
        assert_eq!(folded[0].meanings, vec!["meaning of 1"]);
        assert_eq!(folded[1].transitivity.as_deref(), Some("intransitive verb"));
        assert_eq!(folded[1].meanings, vec!["meaning of 1"]);
    }

    #[test]
    fn test_compound_labels_with_different_transitivity_stay_separate() {
        let mut transitive = sense("1 a");
        transitive.set_transitivity(Some("transitive verb".to_string()));
        let mut intransitive = sense("1 a");
        intransitive.set_transitivity(Some("intransitive verb".to_string()));

        let folded = build_hierarchy(vec![transitive, sense("b"), intransitive]);

        assert_eq!(outline(&folded), "1{a b} 1{a}");
        assert_eq!(folded[1].transitivity.as_deref(), Some("intransitive verb"));
    }

    #[test]
    fn test_compound_labels_nest() {
        let folded = build_hierarchy(senses(&["1 a", "b", "2 a (1)", "(2)", "b", "3"]));

        assert_eq!(outline(&folded), "1{a b} 2{a{(1) (2)} b} 3");
    }

    #[test]
    fn test_letter_compound() {
        let folded =
            build_hierarchy(senses(&["1 a (1)", "(2)", "b (1)", "(2)", "(3)", "c", "2"]));

        assert_eq!(outline(&folded), "1{a{(1) (2)} b{(1) (2) (3)} c} 2");
    }

    #[test]
    fn test_letter_adopts_following_parenthesized_run() {
        let folded = build_hierarchy(senses(&["1 a", "(1)", "(2)", "2"]));

        assert_eq!(outline(&folded), "1{a{(1) (2)}} 2");
    }

    #[test]
    fn test_compound_pop_stops_at_bullet_mismatch() {
        let mut pending = PendingSenses::default();
        pending.push(Bullet::Parenthesized, sense("(1)"));
        pending.push(Bullet::Letter, sense("b"));
        pending.push(Bullet::Letter, sense("a"));

        assert_eq!(labels(&pending.pop_run()), vec!["a", "b"]);
        assert_eq!(labels(&pending.pop_run()), vec!["(1)"]);
        assert!(pending.pop_run().is_empty());
    }

    #[test]
    fn test_unlabeled_sense_with_meanings_adopts_run() {
        let mut unlabeled = SenseBuilder::new();
        unlabeled.add_meaning("a meaning without a number");
        let mut flat = vec![unlabeled];
        flat.extend(senses(&["a", "b"]));

        let folded = build_hierarchy(flat);

        assert_eq!(outline(&folded), "_{a b}");
    }

    #[test]
    fn test_unlabeled_sense_without_meanings_is_dropped() {
        let folded = fold(vec![SenseBuilder::new(), sense("1")]);

        assert_eq!(labels(&folded.roots), vec!["1"]);
        assert!(folded.orphans.is_empty());
    }

    #[test]
    fn test_parenthesized_without_letter_is_dropped() {
        let folded = fold(senses(&["1", "(1)", "(2)", "2"]));

        assert_eq!(outline(&folded.roots), "1 2");
        assert_eq!(labels(&folded.orphans), vec!["(1)", "(2)"]);
    }

    #[test]
    fn test_leading_letters_are_orphans() {
        let folded = fold(senses(&["a", "b", "1"]));

        assert_eq!(outline(&folded.roots), "1");
        assert_eq!(labels(&folded.orphans), vec!["a", "b"]);
    }

    #[test]
    fn test_transitivity_moves_to_implied_number() {
        let mut first = sense("1 a");
        first.set_transitivity(Some("transitive verb".to_string()));
        let folded = build_hierarchy(vec![first, sense("b")]);

        assert_eq!(folded[0].transitivity.as_deref(), Some("transitive verb"));
        assert_eq!(folded[0].children()[0].transitivity, None);
    }

    #[test]
    fn test_fold_of_flattened_outline_is_identity() {
        let folded = build_hierarchy(senses(&["1 a (1)", "(2)", "b", "2", "3 a", "b"]));
        let expected = outline(&folded);

        assert_eq!(expected, "1{a{(1) (2)} b} 2 3{a b}");
        assert_eq!(outline(&build_hierarchy(flatten(folded.clone()))), expected);
        assert_eq!(outline(&build_hierarchy(flatten_compound(folded, ""))), expected);
    }
}
