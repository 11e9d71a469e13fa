// Zip archive decoding
//
// An export archive holds many files (media, HTML, metadata). Only the
// `.json` entries can carry relationship lists, so everything else is
// skipped without comment.

use std::io::{Cursor, Read};

use crate::error::IntakeError;

/// Upper bound on the buffer reserved up front for one entry. The size in
/// the entry header is untrusted.
const MAX_PREALLOC: u64 = 1 << 20;

/// One JSON file pulled out of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub text: String,
}

/// True if `name` ends in `.json`, ignoring case.
pub fn is_json_name(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".json")
}

/// Decode bytes as UTF-8 text: strip a BOM, replace invalid sequences.
pub fn decode_text(bytes: &[u8]) -> String {
    let (text, _) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    text.into_owned()
}

/// Extract every `.json` entry of a zip archive as text, in archive order.
///
/// `label` names the archive in the error if the bytes are not a zip.
pub fn extract_json_entries(bytes: &[u8], label: &str) -> Result<Vec<ArchiveEntry>, IntakeError> {
    let decode_err = |source: zip::result::ZipError| IntakeError::Decode {
        name: label.to_string(),
        source,
    };

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(decode_err)?;
    let mut entries = Vec::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(decode_err)?;
        if file.is_dir() || !is_json_name(file.name()) {
            continue;
        }

        let name = file.name().to_string();
        let mut buf = Vec::with_capacity(file.size().min(MAX_PREALLOC) as usize);
        file.read_to_end(&mut buf).map_err(|e| decode_err(e.into()))?;

        log::debug!("archive {label}: entry {name} ({} bytes)", buf.len());
        entries.push(ArchiveEntry {
            name,
            text: decode_text(&buf),
        });
    }

    Ok(entries)
}
