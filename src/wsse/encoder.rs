//! Structured-to-markup encoding of a finished [`SecurityFragment`].
//!
//! The header builder never writes XML itself; it hands the merged
//! fragment to a [`MarkupEncoder`]. The built-in [`XmlEncoder`] (feature
//! `xml-encoder`) writes one `<wsse:Security>` element with quick-xml:
//!
//! - children appear in their element's `order`
//! - each child carries the attributes recorded for it in its parent
//! - an element without children is written as an empty tag
//! - text and attribute values are XML-escaped

use crate::wsse::error::WsseError;
use crate::wsse::fragment::SecurityFragment;

/// Turns a security fragment into markup text.
pub trait MarkupEncoder {
    /// Serializes `fragment` as a single `wsse:Security` element.
    fn encode(&self, fragment: &SecurityFragment) -> Result<String, WsseError>;
}

#[cfg(feature = "xml-encoder")]
pub use xml::XmlEncoder;

#[cfg(feature = "xml-encoder")]
mod xml {
    use super::MarkupEncoder;
    use crate::wsse::error::WsseError;
    use crate::wsse::fragment::{Element, Node, SecurityFragment};
    use quick_xml::Writer;
    use quick_xml::events::BytesText;
    use std::io::{self, Write};

    /// quick-xml backed [`MarkupEncoder`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use wsse_header::{Element, MarkupEncoder, SecurityFragment, XmlEncoder};
    ///
    /// let fragment = SecurityFragment::new(
    ///     Element::new().with_child(
    ///         "wsse:UsernameToken",
    ///         Element::new().with_text("wsse:Username", "alice"),
    ///     ),
    /// );
    ///
    /// let xml = XmlEncoder::new().encode(&fragment)?;
    /// assert!(xml.starts_with("<wsse:Security xmlns:wsse="));
    /// assert!(xml.contains("<wsse:Username>alice</wsse:Username>"));
    /// # Ok::<(), wsse_header::WsseError>(())
    /// ```
    #[derive(Debug, Clone, Copy, Default)]
    pub struct XmlEncoder {
        indent: Option<usize>,
    }

    impl XmlEncoder {
        /// Creates an encoder producing compact output.
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates an encoder indenting nested elements by `spaces`.
        pub fn pretty(spaces: usize) -> Self {
            Self {
                indent: Some(spaces),
            }
        }
    }

    impl MarkupEncoder for XmlEncoder {
        fn encode(&self, fragment: &SecurityFragment) -> Result<String, WsseError> {
            let mut buf = Vec::with_capacity(512);
            let mut writer = match self.indent {
                Some(spaces) => Writer::new_with_indent(&mut buf, b' ', spaces),
                None => Writer::new(&mut buf),
            };

            writer
                .create_element(fragment.root_key())
                .with_attributes(
                    fragment
                        .attributes()
                        .iter()
                        .map(|(name, value)| (name.as_str(), value.as_str())),
                )
                .write_inner_content(|w| write_children(w, fragment.content()))?;

            String::from_utf8(buf).map_err(|e| WsseError::Encoding(e.to_string()))
        }
    }

    /// Writes the children of `element` in order.
    fn write_children<W: Write>(writer: &mut Writer<W>, element: &Element) -> io::Result<()> {
        for (key, node) in element.iter() {
            let start = writer.create_element(key).with_attributes(
                element
                    .attributes(key)
                    .into_iter()
                    .flatten()
                    .map(|(name, value)| (name.as_str(), value.as_str())),
            );
            match node {
                Node::Text(text) => {
                    start.write_text_content(BytesText::new(text))?;
                }
                Node::Element(child) if child.is_empty() => {
                    start.write_empty()?;
                }
                Node::Element(child) => {
                    start.write_inner_content(|w| write_children(w, child))?;
                }
            }
        }
        Ok(())
    }

}
