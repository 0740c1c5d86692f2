//! Small CSS-ish selector matcher for target enumeration.
//!
//! Supports what `requestTargets` callers actually send: tag names, `*`,
//! `#id`, `.class`, `[attr]` / `[attr=value]`, compound combinations of
//! those, the descendant combinator (whitespace), and comma-separated
//! selector lists. Anything fancier is an [`DomError::InvalidSelector`].

use crate::document::Document;
use crate::error::DomError;
use crate::node::NodeId;

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    alternatives: Vec<ComplexSelector>,
}

/// Descendant chain, leftmost ancestor constraint first.
#[derive(Debug, Clone, PartialEq)]
struct ComplexSelector {
    compounds: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq)]
struct Compound {
    parts: Vec<SimplePart>,
}

#[derive(Debug, Clone, PartialEq)]
enum SimplePart {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attr { name: String, value: Option<String> },
}

impl Selector {
    pub fn parse(text: &str) -> Result<Self, DomError> {
        let mut alternatives = Vec::new();
        for alt in text.split(',') {
            let alt = alt.trim();
            if alt.is_empty() {
                return Err(DomError::InvalidSelector(text.to_string()));
            }
            let compounds = alt
                .split_whitespace()
                .map(parse_compound)
                .collect::<Result<Vec<_>, _>>()?;
            alternatives.push(ComplexSelector { compounds });
        }
        if alternatives.is_empty() {
            return Err(DomError::InvalidSelector(text.to_string()));
        }
        Ok(Self { alternatives })
    }

    /// Does `id` match any alternative of this selector?
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(doc, id))
    }

    /// All matching elements, in document order.
    pub fn query(&self, doc: &Document) -> Vec<NodeId> {
        doc.iter()
            .into_iter()
            .filter(|&id| self.matches(doc, id))
            .collect()
    }
}

impl ComplexSelector {
    fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some((rightmost, ancestors)) = self.compounds.split_last() else {
            return false;
        };
        if !rightmost.matches(doc, id) {
            return false;
        }

        // Remaining compounds must match ancestors, inside-out
        let mut cursor = doc.parent(id);
        for compound in ancestors.iter().rev() {
            loop {
                let Some(current) = cursor else { return false };
                cursor = doc.parent(current);
                if compound.matches(doc, current) {
                    break;
                }
            }
        }
        true
    }
}

impl Compound {
    fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some(node) = doc.get(id) else { return false };
        self.parts.iter().all(|part| match part {
            SimplePart::Universal => true,
            SimplePart::Tag(tag) => node.tag.eq_ignore_ascii_case(tag),
            SimplePart::Id(want) => node.attr("id") == Some(want.as_str()),
            SimplePart::Class(class) => node.classes().contains(&class.as_str()),
            SimplePart::Attr { name, value } => match value {
                Some(want) => node.attr(name) == Some(want.as_str()),
                None => node.has_attr(name),
            },
        })
    }
}

fn parse_compound(text: &str) -> Result<Compound, DomError> {
    let bytes: Vec<char> = text.chars().collect();
    let mut parts = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            '*' => {
                parts.push(SimplePart::Universal);
                i += 1;
            }
            '#' => {
                let (name, next) = read_ident(&bytes, i + 1);
                if name.is_empty() {
                    return Err(DomError::InvalidSelector(text.to_string()));
                }
                parts.push(SimplePart::Id(name));
                i = next;
            }
            '.' => {
                let (name, next) = read_ident(&bytes, i + 1);
                if name.is_empty() {
                    return Err(DomError::InvalidSelector(text.to_string()));
                }
                parts.push(SimplePart::Class(name));
                i = next;
            }
            '[' => {
                let close = bytes[i..]
                    .iter()
                    .position(|&c| c == ']')
                    .map(|p| p + i)
                    .ok_or_else(|| DomError::InvalidSelector(text.to_string()))?;
                let inner: String = bytes[i + 1..close].iter().collect();
                let part = match inner.split_once('=') {
                    Some((name, value)) => SimplePart::Attr {
                        name: name.trim().to_string(),
                        value: Some(value.trim().trim_matches(['"', '\'']).to_string()),
                    },
                    None => SimplePart::Attr {
                        name: inner.trim().to_string(),
                        value: None,
                    },
                };
                parts.push(part);
                i = close + 1;
            }
            c if is_ident_char(c) => {
                let (name, next) = read_ident(&bytes, i);
                parts.push(SimplePart::Tag(name));
                i = next;
            }
            _ => return Err(DomError::InvalidSelector(text.to_string())),
        }
    }

    if parts.is_empty() {
        return Err(DomError::InvalidSelector(text.to_string()));
    }
    Ok(Compound { parts })
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len() && is_ident_char(chars[end]) {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}
