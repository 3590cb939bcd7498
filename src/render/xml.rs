//! A small typed XML tree and its serializer.

use std::fmt::Display;
use std::io::{self, Cursor};

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

type XmlWriter = Cursor<Vec<u8>>;

/// An element with ordered attributes and children. Text content is never
/// needed by the GenCase grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlNode {
    pub name: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Display) -> Self {
        self.attributes.push((name, value.to_string()));
        self
    }

    /// Shorthand for the common `<name value="..."/>` element.
    pub fn value(name: &'static str, value: impl Display) -> Self {
        Self::new(name).attr("value", value)
    }

    pub fn child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = XmlNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn push(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    fn write(&self, writer: &mut Writer<XmlWriter>) -> io::Result<()> {
        let mut elem = BytesStart::new(self.name);
        for (key, value) in &self.attributes {
            elem.push_attribute((*key, value.as_str()));
        }

        if self.children.is_empty() {
            return writer.write_event(Event::Empty(elem));
        }

        writer.write_event(Event::Start(elem))?;
        for child in &self.children {
            child.write(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name)))
    }
}

/// Serializes `root` with four-space indentation.
pub fn to_string(root: &XmlNode) -> io::Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 4);
    root.write(&mut writer)?;
    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

/// Numbers as GenCase reads them: integral values without a fraction.
pub fn num(value: f64) -> String {
    if value == 0.0 {
        // Avoid "-0".
        return "0".to_string();
    }
    value.to_string()
}
