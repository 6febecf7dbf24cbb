//! Static UI string table.
//!
//! Lookup falls back to English, then to the key itself, so a missing
//! translation degrades to readable text instead of an error.

const EN: &[(&str, &str)] = &[
    ("title", "Sarkari Saathi"),
    ("subtitle", "Your Government Scheme Navigator"),
    ("language", "Language"),
    ("profileTitle", "Your Profile"),
    ("you", "You"),
    ("age", "Age"),
    ("income", "Annual Income (₹)"),
    ("state", "State"),
    ("district", "District"),
    ("occupation", "Occupation"),
    ("category", "Category"),
    ("listening", "Listening..."),
    ("notListening", "Not listening"),
    ("thinking", "Thinking..."),
    ("voiceOut", "Voice Output"),
    ("voiceUnsupported", "Voice input is not available on this system."),
    ("matchedSchemes", "Matched Schemes"),
    ("noSchemes", "No schemes matched yet. Tell me about yourself!"),
    ("open", "Open"),
    (
        "welcomeMessage",
        "Hello! I'm Sarkari Saathi. I'll help you discover government schemes you're eligible for. Tell me about yourself or ask about any scheme!",
    ),
    ("info", "Info"),
];

const HI: &[(&str, &str)] = &[
    ("title", "सरकारी साथी"),
    ("subtitle", "आपका सरकारी योजना सहायक"),
    ("language", "भाषा"),
    ("profileTitle", "आपकी प्रोफाइल"),
    ("you", "आप"),
    ("age", "उम्र"),
    ("income", "वार्षिक आय (₹)"),
    ("state", "राज्य"),
    ("district", "जिला"),
    ("occupation", "पेशा"),
    ("category", "श्रेणी"),
    ("listening", "सुन रहा हूँ..."),
    ("voiceOut", "वॉइस आउटपुट"),
    ("matchedSchemes", "मिलान योजनाएं"),
    ("noSchemes", "अभी तक कोई योजना नहीं मिली। मुझे अपने बारे में बताएं!"),
    (
        "welcomeMessage",
        "नमस्ते! मैं सरकारी साथी हूँ। मैं आपको सरकारी योजनाओं के बारे में जानकारी देने में मदद करूँगा। मुझे अपने बारे में बताएं या किसी योजना के बारे में पूछें!",
    ),
];

fn table(lang: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match lang {
        "en" => Some(EN),
        "hi" => Some(HI),
        _ => None,
    }
}

fn lookup(entries: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    entries.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Translate `key` for `lang`.
pub fn t<'a>(lang: &str, key: &'a str) -> &'a str {
    table(lang)
        .and_then(|entries| lookup(entries, key))
        .or_else(|| lookup(EN, key))
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_lookup() {
        assert_eq!(t("en", "title"), "Sarkari Saathi");
        assert_eq!(t("en", "you"), "You");
    }

    #[test]
    fn test_hindi_lookup() {
        assert_eq!(t("hi", "title"), "सरकारी साथी");
        assert_eq!(t("hi", "you"), "आप");
    }

    #[test]
    fn test_missing_translation_falls_back_to_english() {
        assert_eq!(t("hi", "thinking"), "Thinking...");
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        assert_eq!(t("fr", "matchedSchemes"), "Matched Schemes");
        assert_eq!(t("", "age"), "Age");
    }

    #[test]
    fn test_unknown_key_returns_key() {
        assert_eq!(t("en", "doesNotExist"), "doesNotExist");
        assert_eq!(t("hi", "doesNotExist"), "doesNotExist");
    }

    #[test]
    fn test_profile_labels_have_english_entries() {
        for field in crate::profile::ProfileField::ALL {
            assert!(lookup(EN, field.label_key()).is_some(), "missing label for {:?}", field);
        }
    }

    #[test]
    fn test_every_hindi_key_exists_in_english() {
        for (key, _) in HI {
            assert!(lookup(EN, key).is_some(), "missing English entry for {}", key);
        }
    }
}
