//! Language token normalization.
//!
//! Scraped release names and provider labels spell languages every way
//! imaginable: full names ("French"), ISO-639-2 codes ("fre", "fra"),
//! bare 2-letter codes, regional variants. Everything funnels through
//! [`normalize_language`] into a canonical short code so the scorer can
//! compare apples to apples.

/// Full language names mapped to their canonical 2-letter code.
///
/// "brazilian" deliberately maps to the compound `pt-br`; Brazilian
/// Portuguese audiences reject European Portuguese dubs, so the two must
/// never collapse into plain `pt`.
const FULL_NAMES: &[(&str, &str)] = &[
    ("english", "en"),
    ("french", "fr"),
    ("spanish", "es"),
    ("german", "de"),
    ("italian", "it"),
    ("portuguese", "pt"),
    ("brazilian", "pt-br"),
    ("russian", "ru"),
    ("japanese", "ja"),
    ("korean", "ko"),
    ("chinese", "zh"),
    ("mandarin", "zh"),
    ("hindi", "hi"),
    ("arabic", "ar"),
    ("turkish", "tr"),
    ("dutch", "nl"),
    ("polish", "pl"),
    ("swedish", "sv"),
    ("norwegian", "no"),
    ("danish", "da"),
    ("finnish", "fi"),
    ("greek", "el"),
    ("hebrew", "he"),
    ("czech", "cs"),
    ("hungarian", "hu"),
    ("romanian", "ro"),
    ("ukrainian", "uk"),
    ("vietnamese", "vi"),
    ("thai", "th"),
    ("indonesian", "id"),
];

/// ISO-639-2 (3-letter) codes mapped to 2-letter codes. Both the
/// bibliographic and terminological spellings appear in the wild.
const ISO_639_2: &[(&str, &str)] = &[
    ("eng", "en"),
    ("fre", "fr"),
    ("fra", "fr"),
    ("spa", "es"),
    ("ger", "de"),
    ("deu", "de"),
    ("ita", "it"),
    ("por", "pt"),
    ("rus", "ru"),
    ("jpn", "ja"),
    ("kor", "ko"),
    ("chi", "zh"),
    ("zho", "zh"),
    ("hin", "hi"),
    ("ara", "ar"),
    ("tur", "tr"),
    ("dut", "nl"),
    ("nld", "nl"),
    ("pol", "pl"),
    ("swe", "sv"),
    ("nor", "no"),
    ("dan", "da"),
    ("fin", "fi"),
    ("gre", "el"),
    ("ell", "el"),
    ("heb", "he"),
    ("cze", "cs"),
    ("ces", "cs"),
    ("hun", "hu"),
    ("rum", "ro"),
    ("ron", "ro"),
    ("ukr", "uk"),
    ("vie", "vi"),
    ("tha", "th"),
    ("ind", "id"),
];

/// The closed set of codes the scorer recognizes as an actual language tag.
///
/// Membership here is what separates "this release is tagged French" from
/// "this token happens to normalize to something code-shaped".
pub const KNOWN_LANGUAGE_CODES: &[&str] = &[
    "en", "fr", "es", "de", "it", "pt", "pt-br", "ru", "ja", "ko", "zh", "hi", "ar", "tr", "nl",
    "pl", "sv", "no", "da", "fi", "el", "he", "cs", "hu", "ro", "uk", "vi", "th", "id",
];

/// Whether `code` is in the closed recognized-language set.
pub fn is_known_code(code: &str) -> bool {
    KNOWN_LANGUAGE_CODES.contains(&code)
}

/// Normalize a free-text language token to a canonical short code.
///
/// Resolution order: the compound `pt-br` spellings, exact full name,
/// ISO-639-2 code, 2-letter passthrough, then prefix match against full
/// names. Unrecognized input comes back lowercased and otherwise unchanged;
/// callers treat unknown codes as non-matching rather than as errors.
pub fn normalize_language(text: &str) -> String {
    let token = text.trim().to_lowercase();
    if token.is_empty() {
        return token;
    }

    if token == "pt-br" || token == "ptbr" || token == "pt_br" {
        return "pt-br".to_string();
    }

    for (name, code) in FULL_NAMES {
        if token == *name {
            return (*code).to_string();
        }
    }

    for (iso, code) in ISO_639_2 {
        if token == *iso {
            return (*code).to_string();
        }
    }

    if token.len() == 2 && token.chars().all(|c| c.is_ascii_alphabetic()) {
        return token;
    }

    if token.len() >= 3 {
        for (name, code) in FULL_NAMES {
            if name.starts_with(&token) {
                return (*code).to_string();
            }
        }
    }

    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_names() {
        assert_eq!(normalize_language("English"), "en");
        assert_eq!(normalize_language("  french "), "fr");
        assert_eq!(normalize_language("GERMAN"), "de");
    }

    #[test]
    fn test_iso_639_2_codes() {
        assert_eq!(normalize_language("eng"), "en");
        assert_eq!(normalize_language("fre"), "fr");
        assert_eq!(normalize_language("fra"), "fr");
        assert_eq!(normalize_language("jpn"), "ja");
        assert_eq!(normalize_language("ell"), "el");
    }

    #[test]
    fn test_two_letter_passthrough() {
        assert_eq!(normalize_language("en"), "en");
        assert_eq!(normalize_language("ES"), "es");
        // Passthrough applies even to codes outside the known set.
        assert_eq!(normalize_language("xx"), "xx");
    }

    #[test]
    fn test_brazilian_portuguese_never_collapses() {
        assert_eq!(normalize_language("pt-br"), "pt-br");
        assert_eq!(normalize_language("PTBR"), "pt-br");
        assert_eq!(normalize_language("pt_br"), "pt-br");
        assert_eq!(normalize_language("brazilian"), "pt-br");
        assert_ne!(normalize_language("brazilian"), "pt");
    }

    #[test]
    fn test_prefix_match_against_full_names() {
        assert_eq!(normalize_language("portug"), "pt");
        assert_eq!(normalize_language("span"), "es");
        assert_eq!(normalize_language("ukrain"), "uk");
    }

    #[test]
    fn test_unknown_passes_through_lowercased() {
        assert_eq!(normalize_language("Klingon"), "klingon");
        assert_eq!(normalize_language("latino"), "latino");
    }

    #[test]
    fn test_known_code_membership() {
        assert!(is_known_code("en"));
        assert!(is_known_code("pt-br"));
        assert!(!is_known_code("xx"));
        assert!(!is_known_code("klingon"));
    }
}
