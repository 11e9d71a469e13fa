use std::cmp::Ordering;

/// Fold text for comparison: transliterate to ASCII, then lowercase.
///
/// "Élodie" and "elodie" fold to the same key, so they compare equal.
pub fn fold(text: &str) -> String {
    if text.is_ascii() {
        return text.to_ascii_lowercase();
    }
    deunicode::deunicode(text).to_lowercase()
}

/// Case- and accent-insensitive ordering. Equal folds compare `Equal`,
/// so stable sorts keep their input order for them.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b))
}
