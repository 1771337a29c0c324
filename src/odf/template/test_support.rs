//! Fixtures shared by the template unit tests.

use crate::odf::elements::{NodeId, TEXTNS, XmlTree};
use std::io::{Cursor, Write};
use zip::write::{SimpleFileOptions, ZipWriter};

const HEAD: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" "#,
    r#"xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" "#,
    r#"xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" office:version="1.3">"#,
    r#"<office:body><office:text>"#
);
const TAIL: &str = "</office:text></office:body></office:document-content>";

/// A content.xml document whose `office:text` holds `body`
pub fn content(body: &str) -> Vec<u8> {
    format!("{HEAD}{body}{TAIL}").into_bytes()
}

/// The serialized children of `office:text`
pub fn body(tree: &XmlTree) -> String {
    let text = office_text(tree);
    tree.children(text)
        .iter()
        .map(|&c| tree.to_xml_string(c))
        .collect()
}

pub fn office_text(tree: &XmlTree) -> NodeId {
    tree.find_elements(crate::odf::elements::OFFICENS, "text")[0]
}

/// First `text:p` in the document
pub fn first_paragraph(tree: &XmlTree) -> NodeId {
    tree.find_elements(TEXTNS, "p")[0]
}

/// An ODT archive with the given entries after a stored mimetype
pub fn odt(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    writer.start_file("mimetype", stored).unwrap();
    writer
        .write_all(b"application/vnd.oasis.opendocument.text")
        .unwrap();
    for (name, data) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
