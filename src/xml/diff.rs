//! Structural comparison of two XML documents.
//!
//! Both documents are reduced to element trees: qualified names, attributes
//! (order-insensitive), children in document order, and text kept per
//! position: the text before the first child and the tail after each child.
//! Comments, processing instructions, the XML declaration and DOCTYPE are not
//! part of the structure, nor is whitespace-only text between tags. Any other
//! text is compared exactly.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed XML: {0}")]
    Parse(#[from] quick_xml::Error),
    #[error("unknown entity reference &{0};")]
    UnknownEntity(String),
    #[error("document has no root element")]
    NoRoot,
    #[error("document has more than one root element")]
    MultipleRoots,
    #[error("unclosed element <{0}>")]
    Unclosed(String),
}

/// One element of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    /// Text before the first child.
    pub text: String,
    /// Text after this element's end tag, up to the next sibling or the parent's end tag.
    pub tail: String,
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DifferenceKind {
    Renamed { expected: String, actual: String },
    AttributeMissing { name: String, expected: String },
    AttributeUnexpected { name: String, actual: String },
    AttributeChanged { name: String, expected: String, actual: String },
    TextChanged { expected: String, actual: String },
    ChildMissing { name: String },
    ChildUnexpected { name: String },
}

/// A single structural difference, located by element path
/// (e.g. `/root/device/serviceList/service[2]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    pub path: String,
    pub kind: DifferenceKind,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.path)?;
        match &self.kind {
            DifferenceKind::Renamed { expected, actual } => {
                write!(f, "expected <{expected}>, found <{actual}>")
            }
            DifferenceKind::AttributeMissing { name, expected } => {
                write!(f, "missing attribute {name}=\"{expected}\"")
            }
            DifferenceKind::AttributeUnexpected { name, actual } => {
                write!(f, "unexpected attribute {name}=\"{actual}\"")
            }
            DifferenceKind::AttributeChanged { name, expected, actual } => {
                write!(f, "attribute {name}: expected \"{expected}\", found \"{actual}\"")
            }
            DifferenceKind::TextChanged { expected, actual } => {
                write!(f, "text: expected {expected:?}, found {actual:?}")
            }
            DifferenceKind::ChildMissing { name } => write!(f, "missing child <{name}>"),
            DifferenceKind::ChildUnexpected { name } => write!(f, "unexpected child <{name}>"),
        }
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

fn open_element(start: &BytesStart<'_>) -> Result<Element, DiffError> {
    let mut attributes = BTreeMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::InvalidAttr)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.insert(key, value);
    }
    Ok(Element {
        name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        attributes,
        ..Element::default()
    })
}

/// Move accumulated character data into its slot: the open element's text
/// while it has no children yet, else the tail of its last child.
/// Text is only split at element boundaries, so entity references stay joined
/// with their surrounding characters.
fn flush_text(stack: &mut [Element], pending: &mut String) {
    if !pending.chars().all(char::is_whitespace) {
        if let Some(open) = stack.last_mut() {
            match open.children.last_mut() {
                Some(previous) => previous.tail.push_str(pending),
                None => open.text.push_str(pending),
            }
        }
    }
    pending.clear();
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<(), DiffError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(DiffError::MultipleRoots),
    }
    Ok(())
}

/// Parse a document into its root element.
pub fn parse(xml: &str) -> Result<Element, DiffError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut pending = String::new();
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                flush_text(&mut stack, &mut pending);
                stack.push(open_element(&e)?);
            }
            Event::Empty(e) => {
                flush_text(&mut stack, &mut pending);
                let element = open_element(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                flush_text(&mut stack, &mut pending);
                // quick-xml rejects mismatched end tags, so the stack is never empty here
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element)?;
                }
            }
            Event::Text(e) => {
                pending.push_str(&e.decode().map_err(quick_xml::Error::Encoding)?);
            }
            Event::CData(e) => {
                pending.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Event::GeneralRef(e) => {
                if let Some(ch) = e.resolve_char_ref()? {
                    pending.push(ch);
                } else {
                    let name = e.decode().map_err(quick_xml::Error::Encoding)?;
                    match quick_xml::escape::resolve_predefined_entity(&name) {
                        Some(text) => pending.push_str(text),
                        None => return Err(DiffError::UnknownEntity(name.into_owned())),
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(element) = stack.pop() {
        return Err(DiffError::Unclosed(element.name));
    }
    root.ok_or(DiffError::NoRoot)
}

// ── Comparison ────────────────────────────────────────────────────────────────

/// Appended to a child's path when the difference is in the text following it.
pub const TAIL_SUFFIX: &str = " (tail)";

/// Path label for `children[index]`: the bare name when it is the only sibling
/// with that name, `name[n]` (1-based) otherwise.
fn child_label(children: &[Element], index: usize) -> String {
    let name = &children[index].name;
    let same_named = children.iter().filter(|c| &c.name == name).count();
    if same_named == 1 {
        name.clone()
    } else {
        let position = children[..index].iter().filter(|c| &c.name == name).count() + 1;
        format!("{name}[{position}]")
    }
}

fn compare(path: &str, reference: &Element, candidate: &Element, out: &mut Vec<Difference>) {
    let mut push = |kind| {
        out.push(Difference {
            path: path.to_string(),
            kind,
        })
    };

    if reference.name != candidate.name {
        push(DifferenceKind::Renamed {
            expected: reference.name.clone(),
            actual: candidate.name.clone(),
        });
        return;
    }

    for (name, expected) in &reference.attributes {
        match candidate.attributes.get(name) {
            None => push(DifferenceKind::AttributeMissing {
                name: name.clone(),
                expected: expected.clone(),
            }),
            Some(actual) if actual != expected => push(DifferenceKind::AttributeChanged {
                name: name.clone(),
                expected: expected.clone(),
                actual: actual.clone(),
            }),
            Some(_) => {}
        }
    }
    for (name, actual) in &candidate.attributes {
        if !reference.attributes.contains_key(name) {
            push(DifferenceKind::AttributeUnexpected {
                name: name.clone(),
                actual: actual.clone(),
            });
        }
    }

    if reference.text != candidate.text {
        push(DifferenceKind::TextChanged {
            expected: reference.text.clone(),
            actual: candidate.text.clone(),
        });
    }

    let paired = reference.children.len().min(candidate.children.len());
    for i in 0..paired {
        let child_path = format!("{path}/{}", child_label(&reference.children, i));
        let (expected, actual) = (&reference.children[i], &candidate.children[i]);
        compare(&child_path, expected, actual, out);
        if expected.tail != actual.tail {
            out.push(Difference {
                path: format!("{child_path}{TAIL_SUFFIX}"),
                kind: DifferenceKind::TextChanged {
                    expected: expected.tail.clone(),
                    actual: actual.tail.clone(),
                },
            });
        }
    }
    for (i, missing) in reference.children.iter().enumerate().skip(paired) {
        out.push(Difference {
            path: format!("{path}/{}", child_label(&reference.children, i)),
            kind: DifferenceKind::ChildMissing {
                name: missing.name.clone(),
            },
        });
    }
    for (i, extra) in candidate.children.iter().enumerate().skip(paired) {
        out.push(Difference {
            path: format!("{path}/{}", child_label(&candidate.children, i)),
            kind: DifferenceKind::ChildUnexpected {
                name: extra.name.clone(),
            },
        });
    }
}

/// All structural differences of `candidate` against `reference`.
/// Empty iff the two documents are structurally identical.
pub fn diff(reference: &str, candidate: &str) -> Result<Vec<Difference>, DiffError> {
    let reference = parse(reference)?;
    let candidate = parse(candidate)?;
    let mut out = Vec::new();
    compare(&format!("/{}", reference.name), &reference, &candidate, &mut out);
    Ok(out)
}

pub fn diff_files(reference: &Path, candidate: &Path) -> Result<Vec<Difference>, DiffError> {
    let read = |path: &Path| {
        std::fs::read_to_string(path).map_err(|source| DiffError::Read {
            path: path.display().to_string(),
            source,
        })
    };
    diff(&read(reference)?, &read(candidate)?)
}
