//! Minimal element tree built on the quick-xml pull parser.
//!
//! Every element remembers where it sits in the source so callers can take
//! either its character data or its raw inner/outer markup.

use crate::error::DecodeError;
use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;
use std::ops::Range;

#[derive(Debug, Default)]
pub(crate) struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Direct character data (entities unescaped, CDATA included).
    pub text: String,
    inner: Range<usize>,
    outer: Range<usize>,
}

impl Element {
    pub fn attr(&self, key: &str) -> Option<String> {
        self.attrs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Last child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().rev().find(|c| c.name == name)
    }

    /// Character data of the last child with the given name.
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(|c| c.text.clone())
    }

    /// Raw inner markup of the last child with the given name.
    pub fn child_inner(&self, name: &str, src: &str) -> Option<String> {
        self.child(name).map(|c| c.inner_xml(src).to_string())
    }

    /// Everything between the start and end tag, byte for byte.
    pub fn inner_xml<'s>(&self, src: &'s str) -> &'s str {
        src.get(self.inner.clone()).unwrap_or_default()
    }

    /// The element including its own tags.
    pub fn outer_xml<'s>(&self, src: &'s str) -> &'s str {
        src.get(self.outer.clone()).unwrap_or_default()
    }
}

/// Parse the first root element of `src`, ignoring anything after it closes.
///
/// `expect_root` is checked as soon as the root's start tag is seen so a
/// wrong document is rejected without reading the rest of it.
pub(crate) fn parse_root(src: &str, expect_root: &str) -> Result<Element, DecodeError> {
    let mut reader = Reader::from_str(src);
    let mut stack: Vec<Element> = Vec::new();

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|source| DecodeError::Xml {
            position: reader.error_position() as u64,
            source,
        })?;
        let after = reader.buffer_position() as usize;

        match event {
            XmlEvent::Start(e) => {
                let el = open_element(&e, &reader, before..after)?;
                if stack.is_empty() && el.name != expect_root {
                    return Err(DecodeError::UnexpectedRoot { found: el.name });
                }
                stack.push(el);
            }
            XmlEvent::Empty(e) => {
                let mut el = open_element(&e, &reader, before..after)?;
                el.inner = after..after;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(el),
                    None if el.name == expect_root => return Ok(el),
                    None => return Err(DecodeError::UnexpectedRoot { found: el.name }),
                }
            }
            XmlEvent::End(_) => {
                let Some(mut el) = stack.pop() else {
                    return Err(DecodeError::MissingRoot);
                };
                el.inner.end = before;
                el.outer.end = after;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(el),
                    None => return Ok(el),
                }
            }
            XmlEvent::Text(e) => {
                if let Some(top) = stack.last_mut() {
                    let text = e.unescape().map_err(|source| DecodeError::Xml {
                        position: before as u64,
                        source,
                    })?;
                    top.text.push_str(&text);
                }
            }
            XmlEvent::CData(e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            XmlEvent::Eof => {
                return Err(match stack.pop() {
                    Some(open) => DecodeError::Truncated { open: open.name },
                    None => DecodeError::MissingRoot,
                });
            }
            // Declarations, comments, processing instructions, doctypes.
            _ => {}
        }
    }
}

fn open_element(
    start: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
    span: Range<usize>,
) -> Result<Element, DecodeError> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|source| DecodeError::Attribute {
            position: reader.buffer_position() as u64,
            source,
        })?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|source| DecodeError::Xml {
            position: reader.buffer_position() as u64,
            source,
        })?;
        attrs.push((key, value.into_owned()));
    }
    Ok(Element {
        name,
        attrs,
        children: Vec::new(),
        text: String::new(),
        inner: span.end..span.end,
        outer: span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_tree_with_spans() {
        let src = r#"<event id="7"><path>/a&amp;b</path><x/></event>"#;
        let root = parse_root(src, "event").unwrap();
        assert_eq!(root.attr("id").as_deref(), Some("7"));
        assert_eq!(root.children.len(), 2);
        let path = root.child("path").unwrap();
        assert_eq!(path.text, "/a&b");
        assert_eq!(path.inner_xml(src), "/a&amp;b");
        assert_eq!(root.child("x").unwrap().outer_xml(src), "<x/>");
    }

    #[test]
    fn ignores_content_after_root() {
        let root = parse_root("<event/>\n<junk", "event").unwrap();
        assert!(root.children.is_empty());
    }

    #[test]
    fn unclosed_root_is_truncated() {
        let err = parse_root("<event><page>", "event").unwrap_err();
        assert!(
            matches!(err, DecodeError::Truncated { .. } | DecodeError::Xml { .. }),
            "{err:?}"
        );
    }

    #[test]
    fn whitespace_only_is_missing_root() {
        let err = parse_root("\n  ", "event").unwrap_err();
        assert!(matches!(err, DecodeError::MissingRoot), "{err:?}");
    }
}
