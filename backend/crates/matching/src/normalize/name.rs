use super::collapse_whitespace;

/// Normalize one name part: lower-case, drop punctuation, collapse whitespace.
///
/// Lower-casing happens before punctuation is stripped so that characters
/// whose lower-case form carries a combining mark (e.g. `İ`) settle in one pass.
pub fn normalize_name(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    collapse_whitespace(&cleaned)
}

/// Build the comparable "first last" name for a record.
pub fn normalize_full_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let first = first.and_then(normalize_name);
    let last = last.and_then(normalize_name);
    match (first, last) {
        (Some(f), Some(l)) => Some(format!("{f} {l}")),
        (Some(f), None) => Some(f),
        (None, Some(l)) => Some(l),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_case() {
        assert_eq!(normalize_name("  O'Brien-Smith, Jr. "), Some("obriensmith jr".to_string()));
    }

    #[test]
    fn empty_and_punctuation_only_are_absent() {
        assert_eq!(normalize_name(""), None);
        assert_eq!(normalize_name("   "), None);
        assert_eq!(normalize_name("..."), None);
    }

    #[test]
    fn idempotent() {
        for raw in ["Mary  Ann", "JOSÉ", "İstanbul", "d'Artagnan", "  Lynn\tRyan "] {
            let once = normalize_name(raw).expect("name should normalize");
            assert_eq!(normalize_name(&once), Some(once.clone()), "raw={raw:?}");
        }
    }

    #[test]
    fn full_name_joins_present_parts() {
        assert_eq!(
            normalize_full_name(Some("Lynn"), Some("Ryan")),
            Some("lynn ryan".to_string())
        );
        assert_eq!(normalize_full_name(None, Some("Ryan")), Some("ryan".to_string()));
        assert_eq!(normalize_full_name(Some("Lynn"), Some("  ")), Some("lynn".to_string()));
        assert_eq!(normalize_full_name(Some(""), None), None);
    }
}
