//! Local filename derivation for downloaded assets

use sha2::{Digest, Sha256};
use url::Url;

/// Names longer than this are replaced by a synthesized one
pub const MAX_FILENAME_LEN: usize = 50;

/// Longest extension accepted as plausible, dot included
pub const MAX_EXTENSION_LEN: usize = 5;

/// Extensions that content-type inference can produce
pub const KNOWN_EXTENSIONS: [&str; 4] = [".jpg", ".png", ".gif", ".webp"];

/// Derives a filename from the last path segment of a URL
///
/// The segment is percent-decoded and reduced to characters that are safe both
/// on disk and inside a Markdown link target. Returns `None` when the segment is
/// missing, empty, or longer than `MAX_FILENAME_LEN`.
pub fn filename_from_url(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.next_back()?;
    let decoded = urlencoding::decode(segment)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    let sanitized: String = decoded
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_start_matches('.').to_string();

    if sanitized.is_empty() || sanitized.chars().count() > MAX_FILENAME_LEN {
        return None;
    }
    Some(sanitized)
}

/// Builds a stable name for an asset whose URL yields no usable filename
///
/// The name is derived from a hash of the URL: unrelated assets never share a
/// name, and a rerun derives the same name for the same URL.
pub fn synthesize_filename(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    format!("image_{}", &hex::encode(digest)[..16])
}

/// Splits a filename into stem and plausible extension
///
/// An extension is plausible when it has 1 to 4 alphanumeric characters after
/// the dot. Anything else is treated as part of the stem.
pub fn split_extension(filename: &str) -> (&str, Option<&str>) {
    match filename.rfind('.') {
        Some(pos) if pos > 0 => {
            let ext = &filename[pos..];
            let plausible = ext.len() >= 2
                && ext.len() <= MAX_EXTENSION_LEN
                && ext[1..].chars().all(|c| c.is_ascii_alphanumeric());
            if plausible {
                (&filename[..pos], Some(ext))
            } else {
                (filename, None)
            }
        }
        _ => (filename, None),
    }
}

/// Maps a Content-Type header value to a file extension
pub fn extension_for_content_type(content_type: &str) -> &'static str {
    let content_type = content_type.to_ascii_lowercase();
    if content_type.contains("image/jpeg") || content_type.contains("image/jpg") {
        ".jpg"
    } else if content_type.contains("image/png") {
        ".png"
    } else if content_type.contains("image/gif") {
        ".gif"
    } else if content_type.contains("image/webp") {
        ".webp"
    } else {
        ".jpg"
    }
}

/// `photo.jpg` with counter 2 becomes `photo_2.jpg`; counter 0 is the bare name
pub fn candidate_name(stem: &str, counter: usize, ext: &str) -> String {
    if counter == 0 {
        format!("{}{}", stem, ext)
    } else {
        format!("{}_{}{}", stem, counter, ext)
    }
}
