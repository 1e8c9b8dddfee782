//! Text Extractor — converts an uploaded résumé file into plain text.
//!
//! Dispatch is by declared file extension. Unsupported or corrupt input
//! yields an empty string, never an error: callers treat empty extraction
//! as "no signal" and report it as missing input at the request boundary.

use std::io::Read;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, warn};

use crate::config::RetentionPolicy;
use crate::errors::AppError;

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Plain UTF-8 text.
    Txt,
    /// Page-oriented: per-page text, image-only pages skipped.
    Pdf,
    /// Paragraph-oriented: paragraph texts joined by separators.
    Docx,
}

/// An uploaded file: its (client-supplied) name plus raw bytes.
/// Discarded after processing; only the derived text flows onward.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadedDocument {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Classifies by extension, case-insensitive. `None` means unsupported.
    pub fn kind(&self) -> Option<DocumentKind> {
        let name = self.file_name.to_lowercase();
        if name.ends_with(".txt") {
            Some(DocumentKind::Txt)
        } else if name.ends_with(".pdf") {
            Some(DocumentKind::Pdf)
        } else if name.ends_with(".docx") {
            Some(DocumentKind::Docx)
        } else {
            None
        }
    }
}

/// Extracts plain text from an uploaded document.
/// Unsupported extension or unreadable content yields `""`.
pub fn extract(document: &UploadedDocument) -> String {
    match document.kind() {
        Some(DocumentKind::Txt) => extract_txt(&document.bytes),
        Some(DocumentKind::Pdf) => extract_pdf(&document.bytes),
        Some(DocumentKind::Docx) => extract_docx(&document.bytes),
        None => {
            debug!("Unsupported upload '{}', no text extracted", document.file_name);
            String::new()
        }
    }
}

fn extract_txt(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => String::new(),
    }
}

/// Per-page text with empty (scanned/image) pages skipped is handled inside
/// `pdf-extract`; a document it cannot read yields empty text here.
fn extract_pdf(bytes: &[u8]) -> String {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("PDF extraction failed: {e}");
            String::new()
        }
    }
}

/// A `.docx` is a zip archive with the body in `word/document.xml`.
/// Paragraph text nodes are pulled out and joined with newlines between
/// paragraphs; anything that fails to parse yields empty text.
fn extract_docx(bytes: &[u8]) -> String {
    let mut archive = match zip::ZipArchive::new(std::io::Cursor::new(bytes)) {
        Ok(archive) => archive,
        Err(e) => {
            warn!("DOCX is not a readable archive: {e}");
            return String::new();
        }
    };

    let mut xml = String::new();
    match archive.by_name("word/document.xml") {
        Ok(mut entry) => {
            if entry.read_to_string(&mut xml).is_err() {
                return String::new();
            }
        }
        Err(_) => return String::new(),
    }

    let text_node = Regex::new(r"<w:t[^>]*>([^<]*)</w:t>").expect("static docx pattern");
    let mut paragraphs = Vec::new();
    for paragraph_xml in xml.split("</w:p>") {
        let paragraph: String = text_node
            .captures_iter(paragraph_xml)
            .map(|c| c[1].to_string())
            .collect();
        if !paragraph.is_empty() {
            paragraphs.push(unescape_xml(&paragraph));
        }
    }
    paragraphs.join("\n")
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Writes the upload into `dir` (created on demand) under its base file
/// name, stripping any client-supplied path components.
pub fn save_upload(dir: &Path, document: &UploadedDocument) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir)?;
    let base_name = Path::new(&document.file_name)
        .file_name()
        .ok_or_else(|| AppError::Validation("Upload has no usable file name".to_string()))?;
    let path = dir.join(base_name);
    std::fs::write(&path, &document.bytes)?;
    debug!("Saved upload to {}", path.display());
    Ok(path)
}

/// Applies the configured retention policy to a saved upload.
pub fn apply_retention(path: &Path, policy: RetentionPolicy) -> Result<(), AppError> {
    if policy == RetentionPolicy::Delete {
        std::fs::remove_file(path)?;
        debug!("Removed processed upload {}", path.display());
    }
    Ok(())
}
