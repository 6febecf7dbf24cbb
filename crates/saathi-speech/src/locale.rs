//! UI language code to speech locale.

/// Locale used for any language without its own entry.
pub const DEFAULT_SPEECH_LOCALE: &str = "en-IN";

const LOCALES: &[(&str, &str)] = &[("hi", "hi-IN"), ("mr", "mr-IN")];

/// Map a UI language code ("hi") to a speech locale ("hi-IN").
pub fn speech_locale(language: &str) -> &'static str {
    LOCALES
        .iter()
        .find(|(code, _)| *code == language)
        .map(|(_, locale)| *locale)
        .unwrap_or(DEFAULT_SPEECH_LOCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_languages() {
        assert_eq!(speech_locale("hi"), "hi-IN");
        assert_eq!(speech_locale("mr"), "mr-IN");
        assert_eq!(speech_locale("en"), "en-IN");
    }

    #[test]
    fn test_unknown_defaults_to_base_locale() {
        assert_eq!(speech_locale("fr"), DEFAULT_SPEECH_LOCALE);
        assert_eq!(speech_locale(""), DEFAULT_SPEECH_LOCALE);
        assert_eq!(speech_locale("HI"), DEFAULT_SPEECH_LOCALE);
    }
}
