//! Content-type sniffing from magic bytes.
//!
//! The indexer does not trust file extensions: a file is admitted only when
//! its first bytes carry the JPEG signature. Classification looks at no more
//! than the first [`SNIFF_LEN`] bytes and follows the usual content-sniffing
//! order:
//!
//! 1. Markup (`<!DOCTYPE HTML`, `<html`, `<?xml`, ...), after leading whitespace
//! 2. Exact signatures (PDF, byte-order marks, images, audio/video, archives)
//! 3. Plain text, when no binary control bytes are present
//! 4. `application/octet-stream` otherwise
//!
//! Unknown content is a normal result, never an error. Only failing to open or
//! read the file is reported as [`SniffError`].

use serde::{Serialize, Serializer};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum number of leading bytes considered.
pub const SNIFF_LEN: usize = 512;

#[derive(Error, Debug)]
pub enum SniffError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A sniffed content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Html,
    Xml,
    Pdf,
    PostScript,
    TextUtf8,
    TextUtf16Be,
    TextUtf16Le,
    Icon,
    Bmp,
    Gif,
    WebP,
    Png,
    Jpeg,
    Ogg,
    Midi,
    Mp3,
    Wave,
    Avi,
    Zip,
    Gzip,
    Rar,
    Wasm,
    OctetStream,
}

impl ContentType {
    /// The MIME string for this type.
    pub fn mime(self) -> &'static str {
        match self {
            ContentType::Html => "text/html; charset=utf-8",
            ContentType::Xml => "text/xml; charset=utf-8",
            ContentType::Pdf => "application/pdf",
            ContentType::PostScript => "application/postscript",
            ContentType::TextUtf8 => "text/plain; charset=utf-8",
            ContentType::TextUtf16Be => "text/plain; charset=utf-16be",
            ContentType::TextUtf16Le => "text/plain; charset=utf-16le",
            ContentType::Icon => "image/x-icon",
            ContentType::Bmp => "image/bmp",
            ContentType::Gif => "image/gif",
            ContentType::WebP => "image/webp",
            ContentType::Png => "image/png",
            ContentType::Jpeg => "image/jpeg",
            ContentType::Ogg => "application/ogg",
            ContentType::Midi => "audio/midi",
            ContentType::Mp3 => "audio/mpeg",
            ContentType::Wave => "audio/wave",
            ContentType::Avi => "video/avi",
            ContentType::Zip => "application/zip",
            ContentType::Gzip => "application/x-gzip",
            ContentType::Rar => "application/x-rar-compressed",
            ContentType::Wasm => "application/wasm",
            ContentType::OctetStream => "application/octet-stream",
        }
    }

    /// Whether the indexer's admission gate accepts this type.
    pub fn is_jpeg(self) -> bool {
        self == ContentType::Jpeg
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

impl Serialize for ContentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.mime())
    }
}

/// Markup prefixes, matched case-insensitively and followed by a space or `>`.
const HTML_TAGS: &[&[u8]] = &[
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<SCRIPT",
    b"<IFRAME",
    b"<H1",
    b"<DIV",
    b"<FONT",
    b"<TABLE",
    b"<A",
    b"<STYLE",
    b"<TITLE",
    b"<B",
    b"<BODY",
    b"<BR",
    b"<P",
    b"<!--",
];

/// Exact prefixes, tested in order.
const PREFIXES: &[(&[u8], ContentType)] = &[
    (b"%PDF-", ContentType::Pdf),
    (b"%!PS-Adobe-", ContentType::PostScript),
    (b"\xFE\xFF", ContentType::TextUtf16Be),
    (b"\xFF\xFE", ContentType::TextUtf16Le),
    (b"\xEF\xBB\xBF", ContentType::TextUtf8),
    (b"\x00\x00\x01\x00", ContentType::Icon),
    (b"\x00\x00\x02\x00", ContentType::Icon),
    (b"BM", ContentType::Bmp),
    (b"GIF87a", ContentType::Gif),
    (b"GIF89a", ContentType::Gif),
    (b"\x89PNG\x0D\x0A\x1A\x0A", ContentType::Png),
    (b"\xFF\xD8\xFF", ContentType::Jpeg),
    (b"OggS\x00", ContentType::Ogg),
    (b"MThd\x00\x00\x00\x06", ContentType::Midi),
    (b"ID3", ContentType::Mp3),
    (b"PK\x03\x04", ContentType::Zip),
    (b"\x1F\x8B\x08", ContentType::Gzip),
    (b"Rar!\x1A\x07\x00", ContentType::Rar),
    (b"Rar!\x1A\x07\x01\x00", ContentType::Rar),
    (b"\x00asm", ContentType::Wasm),
];

/// `RIFF????<form>` containers, keyed on the form type at offset 8.
const RIFF_FORMS: &[(&[u8], ContentType)] = &[
    (b"WEBPVP", ContentType::WebP),
    (b"WAVE", ContentType::Wave),
    (b"AVI ", ContentType::Avi),
];

fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | 0x0C | b'\r' | b' ')
}

/// Bytes that never appear in plain text.
fn is_binary(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

/// Uppercase letters in a tag match either case; everything else is exact.
fn tag_byte_matches(data: u8, tag: u8) -> bool {
    if tag.is_ascii_uppercase() {
        data.to_ascii_uppercase() == tag
    } else {
        data == tag
    }
}

fn matches_html_tag(data: &[u8], tag: &[u8]) -> bool {
    if data.len() < tag.len() + 1 {
        return false;
    }
    let head_matches = data.iter().zip(tag).all(|(&d, &t)| tag_byte_matches(d, t));
    head_matches && matches!(data[tag.len()], b' ' | b'>')
}

/// Classify a byte buffer. Only the first [`SNIFF_LEN`] bytes are examined.
pub fn sniff_bytes(data: &[u8]) -> ContentType {
    let data = &data[..data.len().min(SNIFF_LEN)];

    let start = data
        .iter()
        .position(|&b| !is_whitespace(b))
        .unwrap_or(data.len());
    let markup = &data[start..];
    if HTML_TAGS.iter().any(|tag| matches_html_tag(markup, tag)) {
        return ContentType::Html;
    }
    if markup.starts_with(b"<?xml") {
        return ContentType::Xml;
    }

    if let Some((_, content_type)) = PREFIXES.iter().find(|(sig, _)| data.starts_with(sig)) {
        return *content_type;
    }

    if data.len() >= 12 && data.starts_with(b"RIFF") {
        let form = &data[8..];
        if let Some((_, content_type)) = RIFF_FORMS.iter().find(|(sig, _)| form.starts_with(sig)) {
            return *content_type;
        }
    }

    if data.iter().any(|&b| is_binary(b)) {
        ContentType::OctetStream
    } else {
        ContentType::TextUtf8
    }
}

/// Read at most [`SNIFF_LEN`] bytes of `path` and classify them.
pub fn sniff_file(path: &Path) -> Result<ContentType, SniffError> {
    let file = File::open(path).map_err(|source| SniffError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut buffer = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64)
        .read_to_end(&mut buffer)
        .map_err(|source| SniffError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(sniff_bytes(&buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{create_test_jpeg, write_file};
    use tempfile::TempDir;

    #[test]
    fn jpeg_signature() {
        assert_eq!(sniff_bytes(b"\xFF\xD8\xFF\xE0\x00\x10JFIF\x00"), ContentType::Jpeg);
        assert_eq!(sniff_bytes(b"\xFF\xD8\xFF"), ContentType::Jpeg);
    }

    #[test]
    fn truncated_jpeg_signature_is_not_jpeg() {
        assert_ne!(sniff_bytes(b"\xFF\xD8"), ContentType::Jpeg);
    }

    #[test]
    fn other_images() {
        assert_eq!(sniff_bytes(b"\x89PNG\r\n\x1A\n\x00\x00"), ContentType::Png);
        assert_eq!(sniff_bytes(b"GIF89a\x01\x00"), ContentType::Gif);
        assert_eq!(sniff_bytes(b"BM\x00\x00\x00"), ContentType::Bmp);
        assert_eq!(sniff_bytes(b"RIFF\x10\x00\x00\x00WEBPVP8 "), ContentType::WebP);
    }

    #[test]
    fn riff_needs_full_header() {
        assert_eq!(sniff_bytes(b"RIFF\x10\x00\x00\x00WAVEfmt "), ContentType::Wave);
        assert_eq!(sniff_bytes(b"RIFF\x10\x00"), ContentType::OctetStream);
    }

    #[test]
    fn html_is_case_insensitive_and_skips_whitespace() {
        assert_eq!(sniff_bytes(b"  \n<html><body>"), ContentType::Html);
        assert_eq!(sniff_bytes(b"<!doctype html>"), ContentType::Html);
        // Tag must be terminated by space or '>'
        assert_eq!(sniff_bytes(b"<htmlx"), ContentType::TextUtf8);
    }

    #[test]
    fn xml_and_pdf() {
        assert_eq!(sniff_bytes(b"<?xml version=\"1.0\"?>"), ContentType::Xml);
        assert_eq!(sniff_bytes(b"%PDF-1.7\n"), ContentType::Pdf);
    }

    #[test]
    fn plain_text_vs_binary() {
        assert_eq!(sniff_bytes(b"shopping list\n- eggs\n"), ContentType::TextUtf8);
        assert_eq!(sniff_bytes(b"\x01\x02\x03garbage"), ContentType::OctetStream);
    }

    #[test]
    fn empty_buffer_is_text() {
        assert_eq!(sniff_bytes(b""), ContentType::TextUtf8);
    }

    #[test]
    fn only_first_512_bytes_count() {
        let mut data = vec![b'a'; SNIFF_LEN];
        data.push(0x00);
        assert_eq!(sniff_bytes(&data), ContentType::TextUtf8);
    }

    #[test]
    fn mime_strings() {
        assert_eq!(ContentType::Jpeg.mime(), "image/jpeg");
        assert_eq!(ContentType::OctetStream.to_string(), "application/octet-stream");
        assert_eq!(
            serde_json::to_string(&ContentType::Png).unwrap(),
            "\"image/png\""
        );
    }

    #[test]
    fn sniff_file_ignores_extension() {
        let tmp = TempDir::new().unwrap();

        let disguised = tmp.path().join("photo.dat");
        create_test_jpeg(&disguised, 32, 16);
        assert_eq!(sniff_file(&disguised).unwrap(), ContentType::Jpeg);

        let fake = tmp.path().join("notes.jpg");
        write_file(&fake, "definitely not a photo\n");
        let sniffed = sniff_file(&fake).unwrap();
        assert_eq!(sniffed, ContentType::TextUtf8);
        assert!(!sniffed.is_jpeg());
    }

    #[test]
    fn sniff_file_short_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tiny");
        std::fs::write(&path, b"\xFF\xD8\xFF").unwrap();
        assert_eq!(sniff_file(&path).unwrap(), ContentType::Jpeg);
    }

    #[test]
    fn sniff_missing_file_is_open_error() {
        let result = sniff_file(Path::new("/nonexistent/gibtsnet.jpg"));
        assert!(matches!(result, Err(SniffError::Open { .. })));
    }
}
