//! `.docx` paragraph extraction.
//!
//! A `.docx` file is a zip archive; its body lives in `word/document.xml`.
//! Each top-level `<w:p>` paragraph becomes one text line built from its
//! `<w:t>` runs, with `<w:tab/>` rendered as `\t` and `<w:br/>`/`<w:cr/>` as
//! `\n`. Paragraphs nested in tables (`<w:tbl>`) or text boxes
//! (`<w:txbxContent>`) are skipped, along with their text. Tab-stop
//! definitions (`<w:tab w:val=... />` inside paragraph properties) carry
//! attributes and are not text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

use super::ensure_exists;
use crate::error::{LoadError, LoadResult};

const DOCUMENT_PART: &str = "word/document.xml";

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"<w:t(?:\s[^>]*)?>(?P<text>[^<]*)</w:t>",
        r"|(?P<tab><w:tab\s*/>)",
        r"|(?P<br><w:(?:br|cr)(?:\s[^>]*)?/>)",
        r"|(?P<open><w:(?:tbl|txbxContent)(?:\s[^>]*)?>)",
        r"|(?P<close></w:(?:tbl|txbxContent)>)",
        r"|(?P<end></w:p>|<w:p(?:\s[^>]*)?/>)",
    ))
    .expect("static regex")
});

static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#x[0-9A-Fa-f]+|#[0-9]+|[a-z]+);").expect("static regex"));

/// Read every paragraph of a `.docx` file as a line of text.
pub fn read_docx_lines(path: &Path) -> LoadResult<Vec<String>> {
    ensure_exists(path)?;

    let document_err = |message: String| LoadError::Document {
        path: path.to_path_buf(),
        message,
    };

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| document_err(e.to_string()))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| document_err(format!("{}: {}", DOCUMENT_PART, e)))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| document_err(e.to_string()))?;

    Ok(docx_paragraphs(&xml))
}

/// Split WordprocessingML body XML into paragraph text lines.
pub fn docx_paragraphs(xml: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    // Depth of enclosing tables and text boxes.
    let mut nested = 0usize;

    for caps in TOKEN.captures_iter(xml) {
        if let Some(open) = caps.name("open") {
            if !open.as_str().ends_with("/>") {
                nested += 1;
            }
        } else if caps.name("close").is_some() {
            nested = nested.saturating_sub(1);
        } else if nested > 0 {
            continue;
        } else if let Some(text) = caps.name("text") {
            current.push_str(&unescape(text.as_str()));
        } else if caps.name("tab").is_some() {
            current.push('\t');
        } else if let Some(br) = caps.name("br") {
            if is_line_break(br.as_str()) {
                current.push('\n');
            }
        } else {
            lines.push(std::mem::take(&mut current));
        }
    }

    lines
}

/// `<w:cr/>` and text-wrapping `<w:br/>` break the line; page and column
/// breaks do not.
fn is_line_break(tag: &str) -> bool {
    !tag.contains("w:type=") || tag.contains("textWrapping")
}

fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITY
        .replace_all(text, |caps: &regex::Captures| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ if name.starts_with("#x") => u32::from_str_radix(&name[2..], 16)
                    .ok()
                    .and_then(char::from_u32),
                _ if name.starts_with('#') => name[1..].parse().ok().and_then(char::from_u32),
                _ => None,
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
