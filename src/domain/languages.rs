//! ISO 639-1 language codes accepted on job records.

/// `(code, English name)` pairs.
const LANGUAGES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("bn", "Bengali"),
    ("bg", "Bulgarian"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("ms", "Malay"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("sr", "Serbian"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("th", "Thai"),
    ("tl", "Tagalog"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese"),
];

pub fn language_name(code: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

/// Normalize `"English (en)"`, `"en"` or `"English"` into a lowercase code.
pub fn normalize_language(value: &str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some((_, rest)) = trimmed.rsplit_once('(')
        && let Some(code) = rest.strip_suffix(')')
        && let Some(found) = lookup_code(code.trim())
    {
        return Some(found);
    }

    if trimmed.len() == 2
        && let Some(found) = lookup_code(trimmed)
    {
        return Some(found);
    }

    LANGUAGES
        .iter()
        .find(|(_, name)| name.eq_ignore_ascii_case(trimmed))
        .map(|(code, _)| *code)
}

fn lookup_code(code: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code))
        .map(|(known, _)| *known)
}

/// Normalize a list of source values, dropping unknown entries and duplicates.
pub fn normalize_languages<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut codes: Vec<String> = Vec::new();
    for value in values {
        if let Some(code) = normalize_language(value.as_ref())
            && !codes.iter().any(|existing| existing == code)
        {
            codes.push(code.to_string());
        }
    }
    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_labelled_codes_and_names() {
        assert_eq!(normalize_language("English (en)"), Some("en"));
        assert_eq!(normalize_language("FR"), Some("fr"));
        assert_eq!(normalize_language("german"), Some("de"));
        assert_eq!(normalize_language("Klingon"), None);
        assert_eq!(normalize_language(""), None);
    }

    #[test]
    fn list_normalization_deduplicates() {
        assert_eq!(
            normalize_languages(["English (en)", "en", "Spanish", "??"]),
            vec!["en".to_string(), "es".to_string()]
        );
    }

    #[test]
    fn names_resolve_from_codes() {
        assert_eq!(language_name("ja"), Some("Japanese"));
        assert_eq!(language_name("xx"), None);
    }
}
