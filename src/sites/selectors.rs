//! Selector list loading.

use std::path::Path;

use super::normalize::dedup_preserving_order;
use crate::error_handling::InputError;

/// Returns the selectors to scan.
///
/// Inline selectors win; otherwise the file is read, one selector per line.
/// Entries are trimmed, blank lines and `#` comments are skipped, and
/// duplicates are removed keeping their first position.
///
/// # Errors
///
/// Returns `InputError::Io` if the file is needed but unreadable and
/// `InputError::Empty` if no selector remains.
pub fn load_selectors(inline: &[String], file: &Path) -> Result<Vec<String>, InputError> {
    let raw: Vec<String> = if inline.is_empty() {
        std::fs::read_to_string(file)
            .map_err(|e| InputError::Io {
                path: file.display().to_string(),
                source: e,
            })?
            .lines()
            .map(String::from)
            .collect()
    } else {
        inline.to_vec()
    };

    let selectors = dedup_preserving_order(
        raw.iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty() && !s.starts_with('#'))
            .map(String::from),
    );
    if selectors.is_empty() {
        return Err(InputError::Empty("selector list"));
    }
    Ok(selectors)
}
