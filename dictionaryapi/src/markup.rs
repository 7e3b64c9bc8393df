//! Access to the parsed reference markup.
//!
//! The parsing core only ever talks to the [`Markup`] trait, so it does not care which markup
//! library produced the tree. [`Document`] reads a response body with `quick_xml` into an owned
//! tree and the trait is implemented for its [`Element`] handles.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// The tags recognized by the parser.
///
/// See the [collegiate tag description] and the [thesaurus tag description] for the full set of
/// tags the reference may emit.
///
/// [collegiate tag description]: http://www.dictionaryapi.com/content/products/documentation/collegiate-tag-description.txt
/// [thesaurus tag description]: https://www.dictionaryapi.com/content/products/documentation/thesaurus-tag-description.txt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `<entry>` - a single headword record.
    Entry,
    /// `<suggestion>` - an alternate headword offered when nothing matched.
    Suggestion,
    /// `<ew>` - the entry word.
    EntryWord,
    /// `<fl>` - the functional label (part of speech).
    FunctionalLabel,
    /// `<sound>` - container of pronunciation files.
    Sound,
    /// `<wav>` - a pronunciation file name.
    Wav,
    /// `<et>` - etymology.
    Etymology,
    /// `<it>` - italic text.
    Italic,
    /// `<def>` - the definition section.
    Definition,
    /// `<sn>` - sense number.
    SenseNumber,
    /// `<ssl>` - subject/status label.
    StatusLabel,
    /// `<dt>` - defining text.
    DefiningText,
    /// `<sd>` - sense divider.
    SenseDivider,
    /// `<set>` - a set of related senses.
    SenseSet,
    /// `<vt>` - verb transitivity.
    Transitivity,
    /// `<sx>` - synonymous cross-reference.
    SynonymousCrossReference,
    /// `<sxn>` - sense number within a synonymous cross-reference.
    CrossReferenceNumber,
    /// `<vi>` - verbal illustration.
    VerbalIllustration,
    /// `<term>` - the thesaurus headword.
    Term,
    /// `<sens>` - a thesaurus sense group.
    Sense,
    /// `<mc>` - thesaurus meaning core.
    MeaningCore,
    /// `<syn>` - thesaurus synonym list.
    Synonyms,
    /// `<ant>` - thesaurus antonym list.
    Antonyms,
    /// Anything else.
    Unrecognized,
}

impl Tag {
    /// Maps a tag name to its [`Tag`].
    #[must_use]
    pub fn from_name(name: &str) -> Tag {
        match name {
            "entry" => Tag::Entry,
            "suggestion" => Tag::Suggestion,
            "ew" => Tag::EntryWord,
            "fl" => Tag::FunctionalLabel,
            "sound" => Tag::Sound,
            "wav" => Tag::Wav,
            "et" => Tag::Etymology,
            "it" => Tag::Italic,
            "def" => Tag::Definition,
            "sn" => Tag::SenseNumber,
            "ssl" => Tag::StatusLabel,
            "dt" => Tag::DefiningText,
            "sd" => Tag::SenseDivider,
            "set" => Tag::SenseSet,
            "vt" => Tag::Transitivity,
            "sx" => Tag::SynonymousCrossReference,
            "sxn" => Tag::CrossReferenceNumber,
            "vi" => Tag::VerbalIllustration,
            "term" => Tag::Term,
            "sens" => Tag::Sense,
            "mc" => Tag::MeaningCore,
            "syn" => Tag::Synonyms,
            "ant" => Tag::Antonyms,
            _ => Tag::Unrecognized,
        }
    }
}

/// A child of a markup element.
#[derive(Debug, Clone, Copy)]
pub enum Child<'a, M> {
    /// A text node.
    Text(&'a str),
    /// An element node.
    Element(M),
}

impl<'a, M: Markup<'a>> Child<'a, M> {
    /// Returns the text content of this child.
    pub fn text_content(self) -> String {
        match self {
            Child::Text(text) => text.to_string(),
            Child::Element(elem) => elem.text_content(),
        }
    }
}

/// A read-only view of an element in a parsed markup tree.
pub trait Markup<'a>: Copy + Sized {
    /// Returns the element's tag name.
    fn tag_name(self) -> &'a str;

    /// Returns the element's children in document order, text nodes included.
    fn child_nodes(self) -> impl Iterator<Item = Child<'a, Self>>;

    /// Returns the next sibling that is an element, skipping text nodes.
    fn next_element(self) -> Option<Self>;

    /// Returns every descendant element with the given tag, in document order.
    fn find_all(self, tag: Tag) -> impl Iterator<Item = Self>;

    /// Returns the element's tag.
    fn tag(self) -> Tag {
        Tag::from_name(self.tag_name())
    }

    /// Returns the element children in document order.
    fn elements(self) -> impl Iterator<Item = Self> {
        let mut next = self.child_nodes().find_map(|child| match child {
            Child::Element(elem) => Some(elem),
            Child::Text(_) => None,
        });

        std::iter::from_fn(move || {
            let current = next?;
            next = current.next_element();

            Some(current)
        })
    }

    /// Returns the first descendant element with the given tag.
    fn find(self, tag: Tag) -> Option<Self> {
        self.find_all(tag).next()
    }

    /// Returns the concatenated text of all descendant text nodes.
    fn text_content(self) -> String {
        self.text_content_excluding(&[])
    }

    /// Returns the concatenated text of the element's children, leaving out child elements whose
    /// tag is in `excluded`.
    fn text_content_excluding(self, excluded: &[Tag]) -> String {
        self.child_nodes()
            .filter(|child| match child {
                Child::Element(elem) => !excluded.contains(&elem.tag()),
                Child::Text(_) => true,
            })
            .map(Child::text_content)
            .collect()
    }
}

/// A node of a parsed [`Document`].
#[derive(Debug)]
enum NodeKind {
    Element(String),
    Text(String),
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    children: Vec<usize>,
    next_sibling: Option<usize>,
    /// One past the last descendant. Nodes are stored in document order, so the descendants of a
    /// node are the ids between its own id and `end`.
    end: usize,
}

/// A parsed response body.
#[derive(Debug)]
pub struct Document {
    /// The nodes in document order. Node `0` is the document itself.
    nodes: Vec<Node>,
}

impl Document {
    /// Parses the given response body.
    ///
    /// The parser is forgiving: malformed markup never fails. Mismatched end tags close the
    /// innermost open element, and a syntax error ends the document at that point with
    /// everything read so far.
    pub fn parse(body: impl AsRef<str>) -> Document {
        let mut document = Document {
            nodes: vec![Node {
                kind: NodeKind::Element(String::new()),
                children: vec![],
                next_sibling: None,
                end: 1,
            }],
        };
        let mut reader = Reader::from_str(body.as_ref());
        reader.config_mut().trim_text(false);
        reader.config_mut().check_end_names = false;

        // Ids of the open elements, innermost last.
        let mut open = vec![0];

        loop {
            let parent = open.last().copied().unwrap_or_default();

            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let id = document.append(parent, NodeKind::Element(element_name(e)));
                    open.push(id);
                }
                Ok(Event::Empty(ref e)) => {
                    let id = document.append(parent, NodeKind::Element(element_name(e)));
                    document.close(id);
                }
                Ok(Event::End(_)) => {
                    if open.len() > 1
                        && let Some(id) = open.pop()
                    {
                        document.close(id);
                    }
                }
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map(Cow::into_owned)
                        .unwrap_or_else(|_| String::from_utf8_lossy(e).into_owned());
                    document.append(parent, NodeKind::Text(text));
                }
                Ok(Event::CData(ref e)) => {
                    let text = String::from_utf8_lossy(e).into_owned();
                    document.append(parent, NodeKind::Text(text));
                }
                Ok(Event::Eof) | Err(_) => break,
                Ok(_) => {}
            }
        }

        for id in open.into_iter().rev() {
            document.close(id);
        }

        document
    }

    /// Returns the document's root element.
    ///
    /// The root has no tag name; the top-level elements of the body are its children.
    #[must_use]
    pub const fn root(&self) -> Element<'_> {
        Element {
            document: self,
            id: 0,
        }
    }

    /// Appends a node as the last child of `parent` and returns its id.
    fn append(&mut self, parent: usize, kind: NodeKind) -> usize {
        let id = self.nodes.len();

        self.nodes.push(Node {
            kind,
            children: vec![],
            next_sibling: None,
            end: id + 1,
        });

        if let Some(&previous) = self.nodes[parent].children.last() {
            self.nodes[previous].next_sibling = Some(id);
        }

        self.nodes[parent].children.push(id);

        id
    }

    /// Marks every node appended so far as a descendant of `id`.
    fn close(&mut self, id: usize) {
        self.nodes[id].end = self.nodes.len();
    }
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

/// An element of a parsed [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    document: &'a Document,
    id: usize,
}

impl<'a> Element<'a> {
    fn node(self) -> &'a Node {
        &self.document.nodes[self.id]
    }

    /// Returns the element with the given node id, if the node is an element.
    fn at(self, id: usize) -> Option<Element<'a>> {
        match self.document.nodes[id].kind {
            NodeKind::Element(_) => Some(Element {
                document: self.document,
                id,
            }),
            NodeKind::Text(_) => None,
        }
    }
}

impl<'a> Markup<'a> for Element<'a> {
    fn tag_name(self) -> &'a str {
        match &self.node().kind {
            NodeKind::Element(name) => name,
            NodeKind::Text(_) => "",
        }
    }

    fn child_nodes(self) -> impl Iterator<Item = Child<'a, Self>> {
        let nodes = &self.document.nodes;

        self.node()
            .children
            .iter()
            .map(move |&id| match &nodes[id].kind {
                NodeKind::Text(text) => Child::Text(text.as_str()),
                NodeKind::Element(_) => Child::Element(Element {
                    document: self.document,
                    id,
                }),
            })
    }

    fn next_element(self) -> Option<Self> {
        let mut next = self.node().next_sibling;

        while let Some(id) = next {
            if let Some(elem) = self.at(id) {
                return Some(elem);
            }

            next = self.document.nodes[id].next_sibling;
        }

        None
    }

    fn find_all(self, tag: Tag) -> impl Iterator<Item = Self> {
        (self.id + 1..self.node().end)
            .filter_map(move |id| self.at(id))
            .filter(move |elem| elem.tag() == tag)
    }
}
