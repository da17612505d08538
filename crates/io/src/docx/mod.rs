// Word (.docx) packages: zip archives of XML parts

pub mod compose;
pub mod package;
pub mod render;

use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

/// Main document part.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Paragraph holding a single page break.
pub const PAGE_BREAK_PARAGRAPH: &str = r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#;

/// Pages in a document as delimited by explicit page breaks.
pub fn page_count(path: &Path) -> Result<usize, String> {
    let xml = package::read_part(path, DOCUMENT_PART)?
        .ok_or_else(|| format!("{} has no {DOCUMENT_PART}", path.display()))?;
    Ok(1 + count_page_breaks(&xml)?)
}

fn count_page_breaks(xml: &str) -> Result<usize, String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut breaks = 0;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"br" => {
                let is_page = e.attributes().flatten().any(|attr| {
                    attr.key.local_name().as_ref() == b"type" && attr.value.as_ref() == b"page"
                });
                if is_page {
                    breaks += 1;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
        buf.clear();
    }
    Ok(breaks)
}

/// Text of every paragraph in document order.
pub fn paragraph_texts(path: &Path) -> Result<Vec<String>, String> {
    let xml = package::read_part(path, DOCUMENT_PART)?
        .ok_or_else(|| format!("{} has no {DOCUMENT_PART}", path.display()))?;

    let mut reader = Reader::from_str(&xml);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => current.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"br" => {
                let typed = e
                    .attributes()
                    .flatten()
                    .any(|attr| attr.key.local_name().as_ref() == b"type");
                if !typed {
                    current.push('\n');
                }
            }
            Ok(Event::Text(ref e)) if in_text => {
                current.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::GeneralRef(ref r)) if in_text => {
                let entity = String::from_utf8_lossy(r);
                current.push_str(match entity.as_ref() {
                    "amp" => "&",
                    "lt" => "<",
                    "gt" => ">",
                    "quot" => "\"",
                    "apos" => "'",
                    _ => "",
                });
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
        buf.clear();
    }
    Ok(paragraphs)
}
