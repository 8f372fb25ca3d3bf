const SEPARATOR: char = '_';

/// Turns a bulk-corpus identifier such as `1037_The_Curious_Case` into a
/// display title. A leading all-digit prefix is dropped once; every remaining
/// underscore becomes a space.
pub fn normalize_title(raw: &str) -> String {
    if let Some((prefix, rest)) = raw.split_once(SEPARATOR) {
        if !prefix.is_empty() && prefix.chars().all(|ch| ch.is_ascii_digit()) {
            return rest.replace(SEPARATOR, " ");
        }
    }
    raw.replace(SEPARATOR, " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_numeric_prefix() {
        assert_eq!(normalize_title("1037_The_Curious_Case"), "The Curious Case");
    }

    #[test]
    fn replaces_separators_without_prefix() {
        assert_eq!(normalize_title("No_Prefix_Title"), "No Prefix Title");
        assert_eq!(normalize_title("Avatar"), "Avatar");
        assert_eq!(normalize_title(""), "");
    }

    #[test]
    fn strips_only_one_prefix() {
        assert_eq!(normalize_title("12_34_Heat"), "34 Heat");
        assert_eq!(normalize_title("_Leading"), " Leading");
    }

    #[test]
    fn is_idempotent() {
        for raw in [
            "1037_The_Curious_Case",
            "No_Prefix_Title",
            "12_34_Heat",
            "Spider-Man2",
            "1037_",
            "_Leading",
        ] {
            let once = normalize_title(raw);
            assert_eq!(normalize_title(&once), once, "input {raw}");
        }
    }
}
