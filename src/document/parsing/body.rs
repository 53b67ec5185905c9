//! Main document part parsing
//!
//! Splits `word/document.xml` into the raw markup around the body and the
//! ordered list of body-level elements, classifying each one. Elements are
//! sliced out of the source text untouched so formatting survives a round
//! trip byte for byte.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::document::models::{BodyElement, ElementKind, RELATIONSHIPS_NS};
use crate::error::{Error, Result};

/// Markup that makes a paragraph more than a bare page break
const CONTENT_ELEMENTS: &[&[u8]] = &[
    b"drawing",
    b"pict",
    b"object",
    b"sym",
    b"tab",
    b"ptab",
    b"cr",
    b"instrText",
    b"fldSimple",
    b"footnoteReference",
    b"endnoteReference",
    b"commentRangeStart",
    b"commentReference",
    // A section break ends the previous section's page setup
    b"sectPr",
];

/// Parsed main document part
#[derive(Debug, Clone)]
pub(crate) struct MainDocument {
    /// Everything before the root start tag (XML declaration, comments)
    prolog: String,
    root_open: String,
    root_name: String,
    /// Markup between the root start tag and `w:body` (e.g. `w:background`)
    preamble: String,
    body_open: String,
    body_name: String,
    pub(crate) elements: Vec<BodyElement>,
    /// Body-level `w:sectPr`, page setup for the whole document
    pub(crate) section: Option<String>,
}

impl MainDocument {
    pub(crate) fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false); // Whitespace is sliced, never re-emitted

        let mut prolog = None;
        let mut root_open = String::new();
        let mut root_name = String::new();
        let mut root_end = 0;
        let mut preamble = String::new();
        let mut body_open = None;
        let mut body_name = String::new();
        let mut in_body = false;
        let mut elements = Vec::new();
        let mut section = None;

        let mut depth = 0usize;
        let mut element_start = 0;

        loop {
            let start = reader.buffer_position() as usize;
            let event = reader.read_event()?;
            let end = reader.buffer_position() as usize;

            match event {
                Event::Start(ref e) => {
                    match depth {
                        0 => {
                            prolog = Some(xml[..start].to_string());
                            root_open = xml[start..end].to_string();
                            root_name = qualified_name(e);
                            root_end = end;
                        }
                        1 if body_open.is_none() && e.local_name().as_ref() == b"body" => {
                            preamble = xml[root_end..start].to_string();
                            body_open = Some(xml[start..end].to_string());
                            body_name = qualified_name(e);
                            in_body = true;
                        }
                        2 if in_body => element_start = start,
                        _ => {}
                    }
                    depth += 1;
                }
                Event::End(ref e) => {
                    depth = depth.saturating_sub(1);
                    match depth {
                        2 if in_body => {
                            let fragment = &xml[element_start..end];
                            push_element(
                                &mut elements,
                                &mut section,
                                e.local_name().as_ref(),
                                fragment,
                            )?;
                        }
                        1 if in_body => in_body = false,
                        _ => {}
                    }
                }
                Event::Empty(ref e) => match depth {
                    0 => {
                        return Err(Error::InvalidPackage(
                            "main document part has no body".to_string(),
                        ));
                    }
                    1 if body_open.is_none() && e.local_name().as_ref() == b"body" => {
                        preamble = xml[root_end..start].to_string();
                        let raw = xml[start..end].trim_end_matches("/>").trim_end();
                        body_open = Some(format!("{raw}>"));
                        body_name = qualified_name(e);
                    }
                    2 if in_body => {
                        push_element(
                            &mut elements,
                            &mut section,
                            e.local_name().as_ref(),
                            &xml[start..end],
                        )?;
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        let (Some(prolog), Some(body_open)) = (prolog, body_open) else {
            return Err(Error::InvalidPackage(
                "main document part has no body".to_string(),
            ));
        };

        Ok(Self {
            prolog,
            root_open,
            root_name,
            preamble,
            body_open,
            body_name,
            elements,
            section,
        })
    }

    /// Serialize back to the XML text of the main document part
    pub(crate) fn to_xml(&self) -> String {
        let body_len: usize = self.elements.iter().map(|e| e.xml().len()).sum();
        let mut xml =
            String::with_capacity(self.prolog.len() + self.root_open.len() + body_len + 256);

        xml.push_str(&self.prolog);
        xml.push_str(&self.root_open);
        xml.push_str(&self.preamble);
        xml.push_str(&self.body_open);
        for element in &self.elements {
            xml.push_str(element.xml());
        }
        if let Some(section) = &self.section {
            xml.push_str(section);
        }
        xml.push_str("</");
        xml.push_str(&self.body_name);
        xml.push_str("></");
        xml.push_str(&self.root_name);
        xml.push('>');
        xml
    }

    /// Prefix bound to the WordprocessingML namespace, taken from the root element
    pub(crate) fn main_prefix(&self) -> &str {
        self.root_name
            .split_once(':')
            .map(|(prefix, _)| prefix)
            .unwrap_or("")
    }

    /// Prefix bound to the relationships namespace, `r` in everything Word writes
    pub(crate) fn relationship_prefix(&self) -> Result<String> {
        let prefix = self
            .namespace_declarations()?
            .into_iter()
            .find(|(_, uri)| uri == RELATIONSHIPS_NS)
            .map(|(name, _)| name.trim_start_matches("xmlns:").to_string())
            .unwrap_or_else(|| "r".to_string());
        Ok(prefix)
    }

    /// `xmlns:*` attributes declared on the root element, as (attribute name, raw value)
    pub(crate) fn namespace_declarations(&self) -> Result<Vec<(String, String)>> {
        let mut reader = Reader::from_str(&self.root_open);
        let mut declarations = Vec::new();

        if let Event::Start(e) = reader.read_event()? {
            for attr in e.attributes() {
                let attr = attr.map_err(quick_xml::Error::from)?;
                let key = String::from_utf8_lossy(attr.key.as_ref());
                if key.starts_with("xmlns:") {
                    declarations.push((
                        key.into_owned(),
                        String::from_utf8_lossy(&attr.value).into_owned(),
                    ));
                }
            }
        }

        Ok(declarations)
    }

    /// Declare an extra namespace on the root element
    pub(crate) fn add_namespace_declaration(&mut self, name: &str, raw_value: &str) {
        let insert_at = self.root_open.len() - 1;
        self.root_open
            .insert_str(insert_at, &format!(" {name}=\"{raw_value}\""));
    }

    /// A page-break paragraph in this document's own prefix
    pub(crate) fn page_break(&self) -> BodyElement {
        BodyElement::page_break(self.main_prefix())
    }
}

fn qualified_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn push_element(
    elements: &mut Vec<BodyElement>,
    section: &mut Option<String>,
    local_name: &[u8],
    fragment: &str,
) -> Result<()> {
    let kind = match local_name {
        b"sectPr" => {
            *section = Some(fragment.to_string());
            return Ok(());
        }
        b"p" if is_page_break_paragraph(fragment)? => {
            elements.push(BodyElement::break_paragraph(fragment));
            return Ok(());
        }
        b"p" => ElementKind::Paragraph,
        b"tbl" => ElementKind::Table,
        b"br" => ElementKind::Break,
        _ => ElementKind::Other,
    };
    elements.push(BodyElement::new(kind, fragment));
    Ok(())
}

/// True for a paragraph that holds page breaks and nothing else
pub(crate) fn is_page_break_paragraph(fragment: &str) -> Result<bool> {
    let mut reader = Reader::from_str(fragment);
    reader.config_mut().trim_text(false);

    let mut has_page_break = false;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(ref e) if e.local_name().as_ref() == b"t" => in_text = false,
            Event::Text(ref e) if in_text => {
                if !e.is_empty() {
                    return Ok(false);
                }
            }
            Event::Start(ref e) | Event::Empty(ref e) => {
                let local = e.local_name();
                if local.as_ref() == b"br" {
                    if !is_page_type(e)? {
                        return Ok(false); // Line and column breaks are content
                    }
                    has_page_break = true;
                } else if CONTENT_ELEMENTS.contains(&local.as_ref()) {
                    return Ok(false);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(has_page_break)
}

fn is_page_type(e: &BytesStart) -> Result<bool> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.local_name().as_ref() == b"type" {
            return Ok(attr.value.as_ref() == b"page");
        }
    }
    Ok(false)
}
