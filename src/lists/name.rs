//! List name normalization and canonical paths

/// Normalize a requested list name: first character upper-cased, the rest kept as given.
pub fn normalize_list_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Canonical URL path for a custom list
pub fn list_path(name: &str) -> String {
    format!("/{}", urlencoding::encode(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_capitalizes_first_letter() {
        assert_eq!(normalize_list_name("groceries"), "Groceries");
        assert_eq!(normalize_list_name("Groceries"), "Groceries");
        assert_eq!(normalize_list_name("today"), "Today");
    }

    #[test]
    fn test_normalize_keeps_rest() {
        assert_eq!(normalize_list_name("weekEND plans"), "WeekEND plans");
    }

    #[test]
    fn test_normalize_unicode_and_empty() {
        assert_eq!(normalize_list_name("élan"), "Élan");
        assert_eq!(normalize_list_name("   "), "");
        assert_eq!(normalize_list_name(""), "");
    }

    #[test]
    fn test_list_path_is_encoded() {
        assert_eq!(list_path("Groceries"), "/Groceries");
        assert_eq!(list_path("Weekend plans"), "/Weekend%20plans");
    }
}
