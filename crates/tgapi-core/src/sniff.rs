//! Content-type sniffing for attachments without a filename.
//!
//! Follows the signature tables of the WHATWG MIME Sniffing standard, limited
//! to the first [`SNIFF_LEN`] bytes. Only signature matches count: plain text
//! and unrecognized binary are reported as inconclusive.

/// Maximum number of leading bytes inspected.
pub const SNIFF_LEN: usize = 512;

enum Signature {
    /// Exact prefix match.
    Exact(&'static [u8], &'static str),
    /// Prefix match under a mask (`0xFF` = must match, `0x00` = wildcard).
    Masked {
        mask: &'static [u8],
        pattern: &'static [u8],
        mime: &'static str,
    },
    /// HTML tag, case-insensitive, after optional leading whitespace and
    /// followed by a space or `>`.
    Html(&'static [u8]),
    /// ISO base media file with an `mp4` brand.
    Mp4,
}

const HTML_MIME: &str = "text/html";

static SIGNATURES: &[Signature] = &[
    Signature::Html(b"<!DOCTYPE HTML"),
    Signature::Html(b"<HTML"),
    Signature::Html(b"<HEAD"),
    Signature::Html(b"<SCRIPT"),
    Signature::Html(b"<IFRAME"),
    Signature::Html(b"<H1"),
    Signature::Html(b"<DIV"),
    Signature::Html(b"<FONT"),
    Signature::Html(b"<TABLE"),
    Signature::Html(b"<A"),
    Signature::Html(b"<STYLE"),
    Signature::Html(b"<TITLE"),
    Signature::Html(b"<B"),
    Signature::Html(b"<BODY"),
    Signature::Html(b"<BR"),
    Signature::Html(b"<P"),
    Signature::Html(b"<!--"),
    Signature::Exact(b"<?xml", "text/xml"),
    Signature::Exact(b"%PDF-", "application/pdf"),
    Signature::Exact(b"%!PS-Adobe-", "application/postscript"),
    // images
    Signature::Exact(b"\x00\x00\x01\x00", "image/x-icon"),
    Signature::Exact(b"\x00\x00\x02\x00", "image/x-icon"),
    Signature::Exact(b"BM", "image/bmp"),
    Signature::Exact(b"GIF87a", "image/gif"),
    Signature::Exact(b"GIF89a", "image/gif"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00WEBPVP",
        mime: "image/webp",
    },
    Signature::Exact(b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    Signature::Exact(b"\xFF\xD8\xFF", "image/jpeg"),
    // audio and video
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"FORM\x00\x00\x00\x00AIFF",
        mime: "audio/aiff",
    },
    Signature::Exact(b"ID3", "audio/mpeg"),
    Signature::Exact(b"OggS\x00", "application/ogg"),
    Signature::Exact(b"MThd\x00\x00\x00\x06", "audio/midi"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00AVI ",
        mime: "video/avi",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00WAVE",
        mime: "audio/wave",
    },
    Signature::Mp4,
    Signature::Exact(b"\x1A\x45\xDF\xA3", "video/webm"),
    // fonts
    Signature::Exact(b"wOFF", "font/woff"),
    Signature::Exact(b"wOF2", "font/woff2"),
    // archives
    Signature::Exact(b"\x1F\x8B\x08", "application/x-gzip"),
    Signature::Exact(b"PK\x03\x04", "application/zip"),
    Signature::Exact(b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    Signature::Exact(b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    Signature::Exact(b"\x00asm", "application/wasm"),
];

impl Signature {
    fn matches(&self, data: &[u8]) -> Option<&'static str> {
        match self {
            Self::Exact(prefix, mime) => data.starts_with(prefix).then_some(*mime),
            Self::Masked {
                mask,
                pattern,
                mime,
            } => {
                if data.len() < pattern.len() {
                    return None;
                }
                let hit = pattern
                    .iter()
                    .zip(mask.iter())
                    .zip(data.iter())
                    .all(|((p, m), d)| d & m == *p);
                hit.then_some(*mime)
            }
            Self::Html(tag) => {
                let data = skip_whitespace(data);
                if data.len() < tag.len() + 1 {
                    return None;
                }
                let (head, rest) = data.split_at(tag.len());
                let same = head
                    .iter()
                    .zip(tag.iter())
                    .all(|(d, t)| d.to_ascii_uppercase() == *t);
                (same && matches!(rest[0], b' ' | b'>')).then_some(HTML_MIME)
            }
            Self::Mp4 => is_mp4(data).then_some("video/mp4"),
        }
    }
}

fn skip_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' '))
        .unwrap_or(data.len());
    &data[start..]
}

fn is_mp4(data: &[u8]) -> bool {
    if data.len() < 12 {
        return false;
    }
    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if box_size % 4 != 0 || data.len() < box_size || &data[4..8] != b"ftyp" {
        return false;
    }
    (8..box_size)
        .step_by(4)
        // bytes 12..16 hold the minor version, not a brand
        .filter(|&start| start != 12)
        .any(|start| data.get(start..start + 3) == Some(&b"mp4"[..]))
}

/// Returns the MIME type matched by the leading bytes of `data`, if any.
pub fn sniff(data: &[u8]) -> Option<&'static str> {
    let data = &data[..data.len().min(SNIFF_LEN)];
    SIGNATURES.iter().find_map(|sig| sig.matches(data))
}

/// Returns the MIME subtype of `data` for use as a file extension
/// (`"jpeg"` for `image/jpeg`), or an empty string when inconclusive.
pub fn extension(data: &[u8]) -> &'static str {
    sniff(data)
        .and_then(|mime| mime.split_once('/'))
        .map(|(_, subtype)| subtype)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = b"\x89PNG\x0D\x0A\x1A\x0A\x00\x00\x00\x0DIHDR";

    #[test]
    fn test_png() {
        assert_eq!(sniff(PNG), Some("image/png"));
        assert_eq!(extension(PNG), "png");
    }

    #[test]
    fn test_jpeg_and_gif() {
        assert_eq!(extension(b"\xFF\xD8\xFF\xE0\x00\x10JFIF"), "jpeg");
        assert_eq!(extension(b"GIF89a\x01\x00\x01\x00"), "gif");
    }

    #[test]
    fn test_webp_masked() {
        assert_eq!(extension(b"RIFF\x24\x00\x00\x00WEBPVP8 "), "webp");
        assert_eq!(extension(b"RIFF\x24\x00\x00\x00WAVEfmt "), "wave");
    }

    #[test]
    fn test_html_case_insensitive_after_whitespace() {
        assert_eq!(extension(b"  \n<html><body>hi</body></html>"), "html");
        assert_eq!(extension(b"<!doctype html>"), "html");
        // tag must be terminated by space or '>'
        assert_eq!(extension(b"<bogus>"), "");
    }

    #[test]
    fn test_mp4_brand() {
        let mut data = Vec::new();
        data.extend_from_slice(&24u32.to_be_bytes());
        data.extend_from_slice(b"ftypisom\x00\x00\x02\x00isommp41");
        assert_eq!(extension(&data), "mp4");
    }

    #[test]
    fn test_unrecognized_is_empty() {
        assert_eq!(extension(b"\x01\x02\x03\x04\x05"), "");
        assert_eq!(extension(b"just some plain text"), "");
        assert_eq!(extension(b""), "");
    }

    #[test]
    fn test_signature_beyond_limit_ignored() {
        let mut data = vec![b' '; SNIFF_LEN];
        data.extend_from_slice(b"<html>");
        assert_eq!(extension(&data), "");
    }
}
