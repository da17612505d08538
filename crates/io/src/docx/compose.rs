//! Combining several Word documents into one, each source on its own page.
//!
//! The first source is the base: its package (styles, numbering, media,
//! relationships) and final section properties carry over unchanged. Every
//! later source contributes only the top-level block content of its body,
//! preceded by a page break. Relationship ids inside appended content are
//! not remapped, so sources should come from the same template.

use std::collections::HashMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::package;
use super::{DOCUMENT_PART, PAGE_BREAK_PARAGRAPH};
use crate::error::DocumentMergeError;

/// Byte layout of a `document.xml`.
#[derive(Debug, Default)]
struct BodyLayout {
    /// Span of the root start tag, `<w:document ...>`.
    root_tag: Range<usize>,
    /// `xmlns` and `xmlns:*` declarations on the root, as raw (key, value).
    namespaces: Vec<(String, String)>,
    /// Span between `<w:body>` and `</w:body>`.
    body: Range<usize>,
    /// Top-level body children other than the final `w:sectPr`.
    blocks: Vec<Range<usize>>,
    sect_pr: Option<Range<usize>>,
}

fn scan(xml: &str) -> Result<Option<BodyLayout>, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();

    let mut layout = BodyLayout::default();
    let mut depth = 0usize;
    let mut body_start = None;
    let mut body_end = None;
    let mut block_start = 0usize;
    let mut block_is_sect = false;

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event_into(&mut buf).map_err(|e| e.to_string())?;
        let after = reader.buffer_position() as usize;
        let in_body = body_start.is_some() && body_end.is_none();

        match event {
            Event::Start(ref e) => {
                match depth {
                    0 => {
                        layout.root_tag = before..after;
                        layout.namespaces = namespaces(e);
                    }
                    1 if e.local_name().as_ref() == b"body" && body_start.is_none() => {
                        body_start = Some(after);
                    }
                    2 if in_body => {
                        block_start = before;
                        block_is_sect = e.local_name().as_ref() == b"sectPr";
                    }
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(ref e) => match depth {
                0 => return Ok(None),
                1 if e.local_name().as_ref() == b"body" && body_start.is_none() => {
                    body_start = Some(after);
                    body_end = Some(after);
                }
                2 if in_body => {
                    if e.local_name().as_ref() == b"sectPr" {
                        layout.sect_pr = Some(before..after);
                    } else {
                        layout.blocks.push(before..after);
                    }
                }
                _ => {}
            },
            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                match depth {
                    1 if in_body && e.local_name().as_ref() == b"body" => {
                        body_end = Some(before);
                    }
                    2 if in_body => {
                        if block_is_sect {
                            layout.sect_pr = Some(block_start..after);
                        } else {
                            layout.blocks.push(block_start..after);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    match (body_start, body_end) {
        (Some(start), Some(end)) => {
            layout.body = start..end;
            Ok(Some(layout))
        }
        _ => Ok(None),
    }
}

fn namespaces(tag: &BytesStart<'_>) -> Vec<(String, String)> {
    tag.attributes()
        .flatten()
        .filter_map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            if key == "xmlns" || key.starts_with("xmlns:") {
                Some((key, String::from_utf8_lossy(&attr.value).to_string()))
            } else {
                None
            }
        })
        .collect()
}

struct Source {
    path: PathBuf,
    xml: String,
    layout: BodyLayout,
}

fn load(path: &Path) -> Result<Source, DocumentMergeError> {
    let xml = package::read_part(path, DOCUMENT_PART)
        .map_err(|message| DocumentMergeError::Open {
            path: path.to_path_buf(),
            message,
        })?
        .ok_or_else(|| DocumentMergeError::MissingPart {
            path: path.to_path_buf(),
            part: DOCUMENT_PART.to_string(),
        })?;
    let layout = scan(&xml)
        .map_err(|message| DocumentMergeError::Xml {
            path: path.to_path_buf(),
            message,
        })?
        .ok_or_else(|| DocumentMergeError::MissingBody {
            path: path.to_path_buf(),
        })?;
    Ok(Source {
        path: path.to_path_buf(),
        xml,
        layout,
    })
}

/// Merged `document.xml` text: base blocks, then each later source's
/// blocks after a page break, then the base section properties.
fn merge(sources: &[Source]) -> String {
    let base = &sources[0];
    let layout = &base.layout;

    let mut extra_ns: Vec<&(String, String)> = Vec::new();
    for source in &sources[1..] {
        for ns in &source.layout.namespaces {
            let declared = layout.namespaces.iter().any(|(k, _)| *k == ns.0)
                || extra_ns.iter().any(|(k, _)| *k == ns.0);
            if !declared {
                extra_ns.push(ns);
            }
        }
    }

    let mut out = String::with_capacity(sources.iter().map(|s| s.xml.len()).sum());

    // Root start tag ends in '>' and may carry extra declarations.
    let tag_close = layout.root_tag.end.saturating_sub(1);
    out.push_str(&base.xml[..tag_close]);
    for (key, value) in extra_ns {
        out.push_str(&format!(" {key}=\"{value}\""));
    }
    out.push_str(&base.xml[tag_close..layout.body.start]);

    for block in &layout.blocks {
        out.push_str(&base.xml[block.clone()]);
    }
    for source in &sources[1..] {
        out.push_str(PAGE_BREAK_PARAGRAPH);
        for block in &source.layout.blocks {
            out.push_str(&source.xml[block.clone()]);
        }
    }
    if let Some(sect) = &layout.sect_pr {
        out.push_str(&base.xml[sect.clone()]);
    }

    out.push_str(&base.xml[layout.body.end..]);
    out
}

/// Combines `sources` in order into `output`.
///
/// Every source is read and validated before anything is written; on error
/// no output file is created.
pub fn combine(sources: &[PathBuf], output: &Path) -> Result<(), DocumentMergeError> {
    if sources.is_empty() {
        return Err(DocumentMergeError::EmptyInput);
    }

    let loaded = sources
        .iter()
        .map(|path| load(path))
        .collect::<Result<Vec<_>, _>>()?;

    let merged = merge(&loaded);
    let mut parts = HashMap::new();
    parts.insert(DOCUMENT_PART.to_string(), merged);

    package::write_package(&loaded[0].path, output, &parts).map_err(|message| {
        DocumentMergeError::Write {
            path: output.to_path_buf(),
            message,
        }
    })?;

    log::info!(
        "combined {} document(s) into {}",
        loaded.len(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::testing::{document_xml, write_docx, NS_W};
    use crate::docx::{page_count, paragraph_texts};

    #[test]
    fn scan_finds_blocks_and_section() {
        let xml = document_xml(&["a", "b"]);
        let layout = scan(&xml).unwrap().unwrap();
        assert_eq!(layout.blocks.len(), 2);
        assert!(xml[layout.sect_pr.clone().unwrap()].starts_with("<w:sectPr>"));
        assert!(xml[layout.blocks[0].clone()].contains(">a<"));
        assert_eq!(layout.namespaces, vec![("xmlns:w".to_string(), NS_W.to_string())]);
    }

    #[test]
    fn scan_without_body_is_none() {
        let xml = format!(r#"<w:document xmlns:w="{NS_W}"><w:other/></w:document>"#);
        assert!(scan(&xml).unwrap().is_none());
    }

    #[test]
    fn scan_rejects_broken_xml() {
        assert!(scan("<w:document><w:body></w:document>").is_err());
    }

    #[test]
    fn combines_in_order_with_page_breaks() {
        let dir = tempfile::tempdir().unwrap();
        let mut sources = Vec::new();
        for (i, text) in ["primero", "segundo", "tercero"].iter().enumerate() {
            let path = dir.path().join(format!("{i}.docx"));
            write_docx(&path, &document_xml(&[text]), &[]);
            sources.push(path);
        }
        let output = dir.path().join("combined.docx");
        combine(&sources, &output).unwrap();

        assert_eq!(page_count(&output).unwrap(), 3);
        let texts: Vec<String> = paragraph_texts(&output)
            .unwrap()
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect();
        assert_eq!(texts, vec!["primero", "segundo", "tercero"]);

        let xml = package::read_part(&output, DOCUMENT_PART).unwrap().unwrap();
        assert_eq!(xml.matches("<w:sectPr>").count(), 1);
        assert!(xml.trim_end().ends_with("</w:body></w:document>"));
    }

    #[test]
    fn single_source_is_copied() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("only.docx");
        write_docx(&source, &document_xml(&["solo"]), &[]);
        let output = dir.path().join("out.docx");
        combine(&[source], &output).unwrap();
        assert_eq!(page_count(&output).unwrap(), 1);
    }

    #[test]
    fn missing_namespaces_are_declared_on_root() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.docx");
        write_docx(&a, &document_xml(&["a"]), &[]);
        let b = dir.path().join("b.docx");
        let xml = format!(
            r#"<w:document xmlns:w="{NS_W}" xmlns:w14="urn:w14"><w:body><w:p w14:paraId="1"/></w:body></w:document>"#
        );
        write_docx(&b, &xml, &[]);

        let output = dir.path().join("out.docx");
        combine(&[a, b], &output).unwrap();
        let merged = package::read_part(&output, DOCUMENT_PART).unwrap().unwrap();
        assert!(merged.contains(r#"xmlns:w14="urn:w14""#));
        assert!(merged.contains(r#"w14:paraId="1""#));
    }

    #[test]
    fn empty_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = combine(&[], &dir.path().join("x.docx")).unwrap_err();
        assert!(matches!(err, DocumentMergeError::EmptyInput));
    }

    #[test]
    fn source_without_body_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.docx");
        write_docx(&a, &document_xml(&["a"]), &[]);
        let b = dir.path().join("b.docx");
        write_docx(&b, &format!(r#"<w:document xmlns:w="{NS_W}"/>"#), &[]);

        let output = dir.path().join("out.docx");
        let err = combine(&[a, b.clone()], &output).unwrap_err();
        match err {
            DocumentMergeError::MissingBody { path } => assert_eq!(path, b),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!output.exists());
    }
}
