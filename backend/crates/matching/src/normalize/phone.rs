/// Keep digits only, drop a leading US country code, require ten digits.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = match digits.strip_prefix('1') {
        Some(rest) if digits.len() == 11 => rest.to_string(),
        _ => digits,
    };
    if digits.len() < 10 {
        None
    } else {
        Some(digits)
    }
}
