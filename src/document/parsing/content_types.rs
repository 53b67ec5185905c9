//! `[Content_Types].xml` parsing and serialization

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::document::models::{ContentTypeEntry, CONTENT_TYPES_NS};
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub(crate) struct ContentTypes {
    entries: Vec<ContentTypeEntry>,
    modified: bool,
}

impl ContentTypes {
    pub(crate) fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut entries = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let local = e.local_name();
                    if local.as_ref() != b"Default" && local.as_ref() != b"Override" {
                        continue;
                    }

                    let mut key = String::new();
                    let mut content_type = String::new();
                    for attr in e.attributes() {
                        let attr = attr.map_err(quick_xml::Error::from)?;
                        let value = attr.unescape_value()?.into_owned();
                        match attr.key.as_ref() {
                            b"Extension" | b"PartName" => key = value,
                            b"ContentType" => content_type = value,
                            _ => {}
                        }
                    }

                    if local.as_ref() == b"Default" {
                        entries.push(ContentTypeEntry::Default {
                            extension: key,
                            content_type,
                        });
                    } else {
                        entries.push(ContentTypeEntry::Override {
                            part_name: key,
                            content_type,
                        });
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self {
            entries,
            modified: false,
        })
    }

    pub(crate) fn to_xml(&self) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
        );
        xml.push_str(&format!("<Types xmlns=\"{CONTENT_TYPES_NS}\">"));
        for entry in &self.entries {
            match entry {
                ContentTypeEntry::Default {
                    extension,
                    content_type,
                } => xml.push_str(&format!(
                    "<Default Extension=\"{}\" ContentType=\"{}\"/>",
                    escape(extension.as_str()),
                    escape(content_type.as_str())
                )),
                ContentTypeEntry::Override {
                    part_name,
                    content_type,
                } => xml.push_str(&format!(
                    "<Override PartName=\"{}\" ContentType=\"{}\"/>",
                    escape(part_name.as_str()),
                    escape(content_type.as_str())
                )),
            }
        }
        xml.push_str("</Types>");
        xml
    }

    /// Content type of a part (zip name, no leading slash): override first, then extension default
    pub(crate) fn content_type_for(&self, part: &str) -> Option<&str> {
        let part_uri = format!("/{part}");
        let overridden = self.entries.iter().find_map(|entry| match entry {
            ContentTypeEntry::Override {
                part_name,
                content_type,
            } if part_name.eq_ignore_ascii_case(&part_uri) => Some(content_type.as_str()),
            _ => None,
        });

        overridden.or_else(|| {
            let extension = extension_of(part)?;
            self.default_for(extension)
        })
    }

    fn default_for(&self, wanted: &str) -> Option<&str> {
        self.entries.iter().find_map(|entry| match entry {
            ContentTypeEntry::Default {
                extension,
                content_type,
            } if extension.eq_ignore_ascii_case(wanted) => Some(content_type.as_str()),
            _ => None,
        })
    }

    /// Make `part` resolve to `content_type`, preferring an extension default
    pub(crate) fn ensure(&mut self, part: &str, content_type: &str) {
        if self.content_type_for(part) == Some(content_type) {
            return;
        }

        match extension_of(part) {
            Some(extension) if self.default_for(extension).is_none() => {
                self.entries.push(ContentTypeEntry::Default {
                    extension: extension.to_ascii_lowercase(),
                    content_type: content_type.to_string(),
                });
            }
            _ => {
                self.entries.push(ContentTypeEntry::Override {
                    part_name: format!("/{part}"),
                    content_type: content_type.to_string(),
                });
            }
        }
        self.modified = true;
    }

    pub(crate) fn is_modified(&self) -> bool {
        self.modified
    }
}

fn extension_of(part: &str) -> Option<&str> {
    let file_name = part.rsplit('/').next()?;
    file_name.rsplit_once('.').map(|(_, extension)| extension)
}
