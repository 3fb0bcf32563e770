/// Map a lower-cased address token to its canonical spelling.
///
/// Canonical tokens map to themselves.
fn canonical_token(token: &str) -> &str {
    match token {
        "street" | "str" | "st" => "st",
        "avenue" | "av" | "ave" => "ave",
        "road" | "rd" => "rd",
        "boulevard" | "blvd" => "blvd",
        "drive" | "drv" | "dr" => "dr",
        "lane" | "ln" => "ln",
        "court" | "ct" => "ct",
        "place" | "pl" => "pl",
        "terrace" | "ter" => "ter",
        "circle" | "cir" => "cir",
        "highway" | "hwy" => "hwy",
        "parkway" | "pkwy" => "pkwy",
        "square" | "sq" => "sq",
        "trail" | "trl" => "trl",
        "route" | "rte" => "rte",
        "apartment" | "apt" => "apt",
        "suite" | "ste" => "ste",
        "building" | "bldg" => "bldg",
        "floor" | "fl" => "fl",
        "north" | "n" => "n",
        "south" | "s" => "s",
        "east" | "e" => "e",
        "west" | "w" => "w",
        "northeast" | "ne" => "ne",
        "northwest" | "nw" => "nw",
        "southeast" | "se" => "se",
        "southwest" | "sw" => "sw",
        other => other,
    }
}

/// Normalize one address component (street line, city, state or postal code).
pub fn normalize_address(raw: &str) -> Option<String> {
    let lowered = raw.to_lowercase();
    let canonical: Vec<&str> = lowered
        .split_whitespace()
        .flat_map(|token| token.split([',', '.']))
        .filter(|piece| !piece.is_empty())
        .map(canonical_token)
        .collect();

    if canonical.is_empty() {
        None
    } else {
        Some(canonical.join(" "))
    }
}

/// Concatenate the normalized address components, skipping absent ones.
pub fn normalize_address_parts(
    line_1: Option<&str>,
    city: Option<&str>,
    state: Option<&str>,
    postal_code: Option<&str>,
) -> Option<String> {
    let parts: Vec<String> = [line_1, city, state, postal_code]
        .into_iter()
        .flatten()
        .filter_map(normalize_address)
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviation_variants_are_equal() {
        assert_eq!(
            normalize_address("123 Main Street"),
            normalize_address("123  main st.")
        );
        assert_eq!(
            normalize_address("42 North Elm Avenue, Apartment 4"),
            Some("42 n elm ave apt 4".to_string())
        );
    }

    #[test]
    fn interior_separators_split_tokens() {
        assert_eq!(
            normalize_address("12 Oak St.,Apt 3"),
            Some("12 oak st apt 3".to_string())
        );
    }

    #[test]
    fn unknown_tokens_pass_through() {
        assert_eq!(
            normalize_address("PO Box 77"),
            Some("po box 77".to_string())
        );
    }

    #[test]
    fn blank_is_absent() {
        assert_eq!(normalize_address(""), None);
        assert_eq!(normalize_address(" ., "), None);
    }

    #[test]
    fn canonical_tokens_are_fixed_points() {
        let variants = [
            "street", "avenue", "road", "boulevard", "drive", "lane", "court", "place",
            "terrace", "circle", "highway", "parkway", "square", "trail", "route",
            "apartment", "suite", "building", "floor", "north", "south", "east", "west",
            "northeast", "northwest", "southeast", "southwest",
        ];
        for variant in variants {
            let canonical = canonical_token(variant);
            assert_eq!(canonical_token(canonical), canonical, "variant={variant}");
        }
    }

    #[test]
    fn idempotent() {
        for raw in ["1600 Pennsylvania Avenue NW", "  Suite 200, 9 West Road ", "12 Oak St.,Apt 3"] {
            let once = normalize_address(raw).unwrap();
            assert_eq!(normalize_address(&once), Some(once.clone()), "raw={raw:?}");
        }
    }

    #[test]
    fn parts_skip_absent_components() {
        assert_eq!(
            normalize_address_parts(Some("10 Downing Street"), None, Some("  "), Some("02139")),
            Some("10 downing st 02139".to_string())
        );
        assert_eq!(normalize_address_parts(None, None, None, None), None);
        assert_eq!(normalize_address_parts(Some(""), Some(" "), None, None), None);
    }
}
