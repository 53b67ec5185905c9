//! `.rels` part parsing and serialization

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::document::models::{Relationship, PACKAGE_RELATIONSHIPS_NS};
use crate::error::Result;

/// The relationships of one package part
#[derive(Debug, Clone, Default)]
pub(crate) struct Relationships {
    items: Vec<Relationship>,
    /// Set once an entry is added; untouched parts are saved byte for byte
    modified: bool,
}

impl Relationships {
    pub(crate) fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut items = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(ref e) | Event::Empty(ref e)
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut relationship = Relationship {
                        id: String::new(),
                        rel_type: String::new(),
                        target: String::new(),
                        external: false,
                    };
                    for attr in e.attributes() {
                        let attr = attr.map_err(quick_xml::Error::from)?;
                        let value = attr.unescape_value()?.into_owned();
                        match attr.key.as_ref() {
                            b"Id" => relationship.id = value,
                            b"Type" => relationship.rel_type = value,
                            b"Target" => relationship.target = value,
                            b"TargetMode" => relationship.external = value == "External",
                            _ => {}
                        }
                    }
                    items.push(relationship);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self {
            items,
            modified: false,
        })
    }

    pub(crate) fn to_xml(&self) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
        );
        xml.push_str(&format!("<Relationships xmlns=\"{PACKAGE_RELATIONSHIPS_NS}\">"));
        for rel in &self.items {
            xml.push_str(&format!(
                "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"",
                escape(rel.id.as_str()),
                escape(rel.rel_type.as_str()),
                escape(rel.target.as_str())
            ));
            if rel.external {
                xml.push_str(" TargetMode=\"External\"");
            }
            xml.push_str("/>");
        }
        xml.push_str("</Relationships>");
        xml
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Relationship> {
        self.items.iter().find(|rel| rel.id == id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter()
    }

    /// First relationship of the given type
    pub(crate) fn find_by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.items.iter().find(|rel| rel.rel_type == rel_type)
    }

    pub(crate) fn push(&mut self, relationship: Relationship) {
        self.items.push(relationship);
        self.modified = true;
    }

    /// Next free `rIdN` id
    pub(crate) fn next_id(&self) -> String {
        let highest = self
            .items
            .iter()
            .filter_map(|rel| rel.id.strip_prefix("rId"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);

        let mut n = highest + 1;
        loop {
            let id = format!("rId{n}");
            if self.get(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }

    pub(crate) fn is_modified(&self) -> bool {
        self.modified
    }
}
