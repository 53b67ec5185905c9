//! Copying body elements between packages
//!
//! Elements that point at other parts through relationship ids (images,
//! charts, hyperlinks, embedded objects) only make sense next to those parts.
//! When an element moves into another document the referenced parts are
//! copied under fresh names, new relationships are added and the ids inside
//! the element are rewritten.

use std::collections::HashMap;

use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use super::loader::DocxDocument;
use super::models::{BodyElement, Relationship};
use super::package::{relative_target, rels_path_for, resolve_target, split_part_name};
use super::parsing::relationships::Relationships;
use crate::error::Result;

impl DocxDocument {
    /// Append all body elements of `source`, bringing along the parts they reference
    pub fn append_document(&mut self, source: &DocxDocument) -> Result<usize> {
        Importer::new(self, source)?.import_all()
    }
}

/// Copies elements of one source document into a target document
pub(crate) struct Importer<'a> {
    target: &'a mut DocxDocument,
    source: &'a DocxDocument,
    source_prefix: String,
    /// Source relationship id -> target relationship id
    ids: HashMap<String, String>,
    /// Source part name -> target part name
    parts: HashMap<String, String>,
}

impl<'a> Importer<'a> {
    pub(crate) fn new(target: &'a mut DocxDocument, source: &'a DocxDocument) -> Result<Self> {
        let source_prefix = source.main.relationship_prefix()?;
        let mut importer = Self {
            target,
            source,
            source_prefix,
            ids: HashMap::new(),
            parts: HashMap::new(),
        };
        importer.import_namespaces()?;
        Ok(importer)
    }

    /// Append every body element of the source, returning how many were added
    pub(crate) fn import_all(&mut self) -> Result<usize> {
        let source = self.source;
        for element in source.elements() {
            let element = self.import_element(element)?;
            self.target.push(element);
        }
        Ok(source.elements().len())
    }

    fn import_element(&mut self, element: &BodyElement) -> Result<BodyElement> {
        let referenced = referenced_ids(element.xml(), &self.source_prefix)?;
        if referenced.is_empty() {
            return Ok(element.clone());
        }

        for id in &referenced {
            if !self.ids.contains_key(id) {
                if let Some(new_id) = self.import_relationship(id)? {
                    self.ids.insert(id.clone(), new_id);
                }
            }
        }

        let xml = rewrite_ids(element.xml(), &self.source_prefix, &self.ids)?;
        Ok(element.with_xml(xml))
    }

    /// Declare on the target root every namespace prefix the source declares
    fn import_namespaces(&mut self) -> Result<()> {
        let declared = self.target.main.namespace_declarations()?;
        for (name, value) in self.source.main.namespace_declarations()? {
            match declared.iter().find(|(existing, _)| *existing == name) {
                None => self.target.main.add_namespace_declaration(&name, &value),
                Some((_, existing)) if *existing != value => {
                    warn!("Namespace prefix {name} is bound differently in the merged documents");
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    fn import_relationship(&mut self, id: &str) -> Result<Option<String>> {
        let source = self.source;
        let Some(rel) = source.relationships.get(id) else {
            warn!("Relationship {id} is referenced but not defined; left as is");
            return Ok(None);
        };

        let target = if rel.external {
            rel.target.clone()
        } else {
            let source_part = resolve_target(source.main_dir(), &rel.target);
            if !source.package.contains(&source_part) {
                warn!("Relationship {id} points at missing part {source_part}; left as is");
                return Ok(None);
            }
            let new_part = self.copy_part(&source_part)?;
            relative_target(self.target.main_dir(), &new_part)
        };

        let new_id = self.target.relationships.next_id();
        debug!("Relationship {id} -> {new_id} ({target})");
        self.target.relationships.push(Relationship {
            id: new_id.clone(),
            rel_type: rel.rel_type.clone(),
            target,
            external: rel.external,
        });
        Ok(Some(new_id))
    }

    /// Copy a source part, and the parts it references, into the target package
    fn copy_part(&mut self, source_part: &str) -> Result<String> {
        let source = self.source;
        if let Some(copied) = self.parts.get(source_part) {
            return Ok(copied.clone());
        }
        if source_part == source.main_part {
            return Ok(self.target.main_part.clone());
        }

        let new_part = self.target.package.unique_part_name(source_part);
        self.parts.insert(source_part.to_string(), new_part.clone());

        let data = source.package.part(source_part).unwrap_or_default().to_vec();
        self.target.package.set_part(&new_part, data);
        if let Some(content_type) = source.content_types.content_type_for(source_part) {
            self.target.content_types.ensure(&new_part, content_type);
        }
        debug!("Copied part {source_part} -> {new_part}");

        let Some(rels_data) = source.package.part(&rels_path_for(source_part)) else {
            return Ok(new_part);
        };
        let source_rels = Relationships::parse(&String::from_utf8_lossy(rels_data))?;
        let source_dir = split_part_name(source_part).0;
        let new_dir = split_part_name(&new_part).0.to_string();

        let mut new_rels = Relationships::default();
        for rel in source_rels.iter() {
            let mut rel = rel.clone();
            if !rel.external {
                let nested = resolve_target(source_dir, &rel.target);
                if source.package.contains(&nested) {
                    let copied = self.copy_part(&nested)?;
                    rel.target = relative_target(&new_dir, &copied);
                }
            }
            new_rels.push(rel);
        }
        self.target
            .package
            .set_part(&rels_path_for(&new_part), new_rels.to_xml().into_bytes());

        Ok(new_part)
    }
}

/// Relationship ids referenced by attributes in the `prefix` namespace
pub(crate) fn referenced_ids(fragment: &str, prefix: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(fragment);
    let mut ids = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e) => {
                for attr in e.attributes() {
                    let attr = attr.map_err(quick_xml::Error::from)?;
                    let in_prefix = attr
                        .key
                        .prefix()
                        .is_some_and(|p| p.as_ref() == prefix.as_bytes());
                    if in_prefix {
                        let id = attr.unescape_value()?.into_owned();
                        if !ids.contains(&id) {
                            ids.push(id);
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ids)
}

/// Rewrite relationship id attributes through `mapping`; everything else is copied as is
pub(crate) fn rewrite_ids(
    fragment: &str,
    prefix: &str,
    mapping: &HashMap<String, String>,
) -> Result<String> {
    let mut reader = Reader::from_str(fragment);
    reader.config_mut().trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(fragment.len()));

    loop {
        match reader.read_event()? {
            Event::Start(e) => writer.write_event(Event::Start(remap(&e, prefix, mapping)?))?,
            Event::Empty(e) => writer.write_event(Event::Empty(remap(&e, prefix, mapping)?))?,
            Event::Eof => break,
            event => writer.write_event(event)?,
        }
    }

    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn remap(
    e: &BytesStart,
    prefix: &str,
    mapping: &HashMap<String, String>,
) -> Result<BytesStart<'static>> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut remapped = BytesStart::new(name);

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let in_prefix = attr
            .key
            .prefix()
            .is_some_and(|p| p.as_ref() == prefix.as_bytes());
        let new_id = if in_prefix {
            mapping.get(&*attr.unescape_value()?)
        } else {
            None
        };

        match new_id {
            Some(new_id) => {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                remapped.push_attribute((key.as_str(), new_id.as_str()));
            }
            None => remapped.push_attribute(attr),
        }
    }

    Ok(remapped)
}
