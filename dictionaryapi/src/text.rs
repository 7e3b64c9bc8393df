//! Text normalization
use std::sync::LazyLock;

use regex::Regex;

use crate::markup::{Child, Markup, Tag};

/// The base URL of the pronunciation audio files.
pub const SOUND_URL: &str = "http://media.merriam-webster.com/soundc11";

/// Matches a defining text that starts with a colon that isn't followed by whitespace.
static LEADING_COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*:(\S)").expect("invalid regex"));

/// The outline level a sense label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bullet {
    /// A top-level sense number, e.g. `2`.
    Numeric,
    /// A single lowercase letter, e.g. `b`.
    Letter,
    /// A parenthesized number, e.g. `(3)`.
    Parenthesized,
}

impl Bullet {
    /// Returns the bullet kind one level below this one, if any.
    #[must_use]
    pub const fn child(self) -> Option<Bullet> {
        match self {
            Bullet::Numeric => Some(Bullet::Letter),
            Bullet::Letter => Some(Bullet::Parenthesized),
            Bullet::Parenthesized => None,
        }
    }
}

/// Rewrites a defining text of the form `":word"` to `": word"`.
///
/// Whitespace in front of the colon is consumed; text that already has a space after the colon is
/// returned unchanged.
#[must_use]
pub fn normalize_leading_colon(text: &str) -> String {
    LEADING_COLON.replace(text, ": ${1}").into_owned()
}

/// Returns whether the label is a plain base-10 integer.
#[must_use]
pub fn is_numeric(label: &str) -> bool {
    !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit())
}

/// Classifies a single label token by its shape.
///
/// Compound labels such as `"1 a"` are not classified; they must be split first.
#[must_use]
pub fn classify_bullet(label: &str) -> Option<Bullet> {
    let mut chars = label.chars();

    if is_numeric(label) {
        Some(Bullet::Numeric)
    } else if matches!((chars.next(), chars.next()), (Some('a'..='z'), None)) {
        Some(Bullet::Letter)
    } else if label.starts_with('(') {
        Some(Bullet::Parenthesized)
    } else {
        None
    }
}

/// Returns the subdirectory a pronunciation file is stored in.
///
/// Files starting with a number live in a directory named after that number, files starting with
/// `bix` or `gg` live in `bix` and `gg` respectively, and everything else is stored under its first
/// character.
#[must_use]
pub fn audio_subdirectory(filename: &str) -> &str {
    let digits = filename.bytes().take_while(u8::is_ascii_digit).count();

    if digits > 0 {
        &filename[..digits]
    } else if filename.starts_with("bix") {
        "bix"
    } else if filename.starts_with("gg") {
        "gg"
    } else {
        filename
            .chars()
            .next()
            .map_or("", |c| &filename[..c.len_utf8()])
    }
}

/// Returns the full URL of a pronunciation file.
#[must_use]
pub fn audio_url(filename: &str) -> String {
    let subdirectory = audio_subdirectory(filename);

    format!("{SOUND_URL}/{subdirectory}/{filename}")
}

/// Formats an `<et>` element.
///
/// Text children are kept as-is and italic children are wrapped in square brackets. Other elements
/// are left out.
pub fn format_etymology<'a, M: Markup<'a>>(etymology: M) -> String {
    etymology
        .child_nodes()
        .filter_map(|child| match child {
            Child::Text(text) => Some(text.trim().to_string()),
            Child::Element(elem) if elem.tag() == Tag::Italic => {
                Some(format!("[{}]", elem.text_content().trim()))
            }
            Child::Element(_) => None,
        })
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::markup::Document;

    #[rstest]
    #[case(":foo", ": foo")]
    #[case(": foo", ": foo")]
    #[case("  :a round roll", ": a round roll")]
    #[case(":", ":")]
    #[case("a: b", "a: b")]
    #[case(" : spaced", " : spaced")]
    fn test_normalize_leading_colon(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_leading_colon(input), expected);
    }

    #[rstest]
    #[case("1", Some(Bullet::Numeric))]
    #[case("12", Some(Bullet::Numeric))]
    #[case("a", Some(Bullet::Letter))]
    #[case("z", Some(Bullet::Letter))]
    #[case("(1)", Some(Bullet::Parenthesized))]
    #[case("(12)", Some(Bullet::Parenthesized))]
    #[case("A", None)]
    #[case("ab", None)]
    #[case("1 a", None)]
    #[case("", None)]
    fn test_classify_bullet(#[case] label: &str, #[case] expected: Option<Bullet>) {
        assert_eq!(classify_bullet(label), expected);
    }

    #[rstest]
    #[case("00001.wav", "00001")]
    #[case("bixby.wav", "bix")]
    #[case("ggg00001.wav", "gg")]
    #[case("gong.wav", "g")]
    #[case("pizza001.wav", "p")]
    #[case("", "")]
    fn test_audio_subdirectory(#[case] filename: &str, #[case] expected: &str) {
        assert_eq!(audio_subdirectory(filename), expected);
    }

    #[test]
    fn test_audio_url() {
        assert_eq!(
            audio_url("bagel001.wav"),
            "http://media.merriam-webster.com/soundc11/b/bagel001.wav"
        );
    }

    #[test]
    fn test_format_etymology() {
        let document = Document::parse(
            "<et>Yiddish <it>beygl,</it> from Middle High German <it>*böugel</it> ring, \
             bracelet, from Old High German <it>boug</it> ring; akin to Old English \
             <it>bēag</it> ring, <it>būgan</it> to bend <ma>bow</ma></et>",
        );
        let etymology = document.root().find(Tag::Etymology).expect("et element");
        let formatted = format_etymology(etymology);

        assert!(formatted.starts_with("Yiddish [beygl,] from Middle High German [*böugel] ring"));
        assert!(formatted.ends_with("[būgan] to bend"));
        assert!(!formatted.contains("bow"));
    }
}
