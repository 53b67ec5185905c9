//! Builds small .docx fixtures on the fly

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const PAGE_BREAK: &str = r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#;
pub const SECTION: &str = r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440"/></w:sectPr>"#;

const IMAGE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const HYPERLINK_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
const CHART_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart";
pub const CHART_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.drawingml.chart+xml";

pub fn paragraph(text: &str) -> String {
    format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
}

pub fn table(text: &str) -> String {
    format!("<w:tbl><w:tr><w:tc>{}</w:tc></w:tr></w:tbl>", paragraph(text))
}

pub fn image_paragraph(rel_id: &str) -> String {
    format!(
        r#"<w:p><w:r><w:drawing><wp:inline><a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="{rel_id}"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#
    )
}

pub fn chart_paragraph(rel_id: &str) -> String {
    format!(
        r#"<w:p><w:r><w:drawing><wp:inline><a:graphic><a:graphicData><c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="{rel_id}"/></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#
    )
}

pub fn hyperlink_paragraph(rel_id: &str, text: &str) -> String {
    format!(r#"<w:p><w:hyperlink r:id="{rel_id}"><w:r><w:t>{text}</w:t></w:r></w:hyperlink></w:p>"#)
}

#[derive(Default)]
pub struct DocxBuilder {
    body: Vec<String>,
    relationships: Vec<(String, String, String, bool)>,
    parts: Vec<(String, Vec<u8>)>,
    overrides: Vec<(String, String)>,
    namespaces: Vec<(String, String)>,
    without_section: bool,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paragraph(mut self, text: &str) -> Self {
        self.body.push(paragraph(text));
        self
    }

    pub fn table(mut self, text: &str) -> Self {
        self.body.push(table(text));
        self
    }

    pub fn page_break(mut self) -> Self {
        self.body.push(PAGE_BREAK.to_string());
        self
    }

    pub fn raw(mut self, xml: &str) -> Self {
        self.body.push(xml.to_string());
        self
    }

    /// A paragraph showing `media/<file_name>` through relationship `rel_id`
    pub fn image(mut self, rel_id: &str, file_name: &str, data: &[u8]) -> Self {
        self.relationships.push((
            rel_id.to_string(),
            IMAGE_REL.to_string(),
            format!("media/{file_name}"),
            false,
        ));
        self.parts
            .push((format!("word/media/{file_name}"), data.to_vec()));
        self.body.push(image_paragraph(rel_id));
        self
    }

    /// A chart part `charts/<chart_file>` whose own relationships point at `media/<image_file>`
    pub fn chart(mut self, rel_id: &str, chart_file: &str, image_file: &str, data: &[u8]) -> Self {
        let chart_part = format!("word/charts/{chart_file}");
        self.relationships.push((
            rel_id.to_string(),
            CHART_REL.to_string(),
            format!("charts/{chart_file}"),
            false,
        ));
        self.parts.push((
            chart_part.clone(),
            br#"<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><c:userShapes r:id="rId1"/></c:chartSpace>"#.to_vec(),
        ));
        self.parts.push((
            format!("word/charts/_rels/{chart_file}.rels"),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{IMAGE_REL}" Target="../media/{image_file}"/></Relationships>"#
            )
            .into_bytes(),
        ));
        self.parts
            .push((format!("word/media/{image_file}"), data.to_vec()));
        self.overrides
            .push((format!("/{chart_part}"), CHART_CONTENT_TYPE.to_string()));
        self.body.push(chart_paragraph(rel_id));
        self
    }

    /// Declare an extra namespace on the document root
    pub fn namespace(mut self, prefix: &str, uri: &str) -> Self {
        self.namespaces.push((prefix.to_string(), uri.to_string()));
        self
    }

    pub fn hyperlink(mut self, rel_id: &str, url: &str, text: &str) -> Self {
        self.relationships.push((
            rel_id.to_string(),
            HYPERLINK_REL.to_string(),
            url.to_string(),
            true,
        ));
        self.body.push(hyperlink_paragraph(rel_id, text));
        self
    }

    pub fn without_section(mut self) -> Self {
        self.without_section = true;
        self
    }

    pub fn write(self, path: &Path) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        let mut types = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>"#,
        );
        if self.parts.iter().any(|(name, _)| name.ends_with(".png")) {
            types.push_str(r#"<Default Extension="png" ContentType="image/png"/>"#);
        }
        types.push_str(r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#);
        for (part_name, content_type) in &self.overrides {
            types.push_str(&format!(
                r#"<Override PartName="{part_name}" ContentType="{content_type}"/>"#
            ));
        }
        types.push_str("</Types>");
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(types.as_bytes()).unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#).unwrap();

        let section = if self.without_section { "" } else { SECTION };
        let extra: String = self
            .namespaces
            .iter()
            .map(|(prefix, uri)| format!(r#" xmlns:{prefix}="{uri}""#))
            .collect();
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"{extra}><w:body>{}{section}</w:body></w:document>"#,
            self.body.concat()
        );
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(document.as_bytes()).unwrap();

        let mut rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (id, rel_type, target, external) in &self.relationships {
            let mode = if *external { r#" TargetMode="External""# } else { "" };
            rels.push_str(&format!(
                r#"<Relationship Id="{id}" Type="{rel_type}" Target="{target}"{mode}/>"#
            ));
        }
        rels.push_str("</Relationships>");
        zip.start_file("word/_rels/document.xml.rels", options).unwrap();
        zip.write_all(rels.as_bytes()).unwrap();

        for (name, data) in &self.parts {
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(data).unwrap();
        }

        zip.finish().unwrap();
    }
}

/// Raw XML of every body element, in order
pub fn element_xml(path: &Path) -> Vec<String> {
    docx_splice::DocxDocument::open(path)
        .unwrap()
        .elements()
        .iter()
        .map(|e| e.xml().to_string())
        .collect()
}

/// Value of the first `r:embed` / `r:id` attribute in an element
pub fn relationship_id(xml: &str) -> String {
    let start = xml
        .find("r:embed=\"")
        .map(|i| i + "r:embed=\"".len())
        .or_else(|| xml.find("r:id=\"").map(|i| i + "r:id=\"".len()))
        .unwrap();
    let end = xml[start..].find('"').unwrap();
    xml[start..start + end].to_string()
}
