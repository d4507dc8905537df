//! Language-dependent rules for plain-text export.

use std::borrow::Cow;

use crate::model::BreakHint;

/// How a language lays out text, derived from its code.
///
/// CJK languages get no word spacing from break hints and keep their
/// hyphens; languages written without spaces also get full-width
/// punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LanguageRules {
    pub cjk: bool,
    pub no_space: bool,
}

impl LanguageRules {
    /// Rules for a language code such as `en`, `zh-Hant` or `ja_JP`.
    /// Unknown or absent codes get the space-separated defaults.
    pub fn for_code(code: Option<&str>) -> Self {
        let primary = code
            .and_then(|c| c.split(['-', '_']).next())
            .map(str::to_ascii_lowercase);
        match primary.as_deref() {
            Some("zh" | "ja") => Self {
                cjk: true,
                no_space: true,
            },
            Some("ko") => Self {
                cjk: true,
                no_space: false,
            },
            _ => Self::default(),
        }
    }

    /// Text to emit for one symbol, and whether a space follows it.
    pub fn symbol_text<'a>(&self, text: &'a str, hint: Option<BreakHint>) -> (Cow<'a, str>, bool) {
        let text = match self.no_space.then(|| full_width(text)).flatten() {
            Some(c) => Cow::Owned(c.to_string()),
            None => Cow::Borrowed(text),
        };
        let space = !self.cjk && matches!(hint, Some(BreakHint::Space | BreakHint::EolSureSpace));
        (text, space)
    }

    /// True for a line-ending hyphen in a spaced language, which paragraph
    /// export joins away.
    pub fn skips(&self, text: &str, hint: Option<BreakHint>) -> bool {
        !self.cjk
            && text == "-"
            && matches!(hint, Some(BreakHint::Hyphen | BreakHint::EolSureSpace))
    }
}

fn full_width(text: &str) -> Option<char> {
    let mapped = match text {
        "," => '，',
        "-" => '—',
        ";" => '；',
        "!" => '！',
        "?" => '？',
        ":" => '：',
        "(" => '（',
        ")" => '）',
        "[" => '【',
        "]" => '】',
        "/" => '／',
        "\\" => '＼',
        "." => '。',
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            LanguageRules::for_code(Some("zh-Hant")),
            LanguageRules {
                cjk: true,
                no_space: true
            }
        );
        assert!(LanguageRules::for_code(Some("JA_jp")).no_space);
        assert!(!LanguageRules::for_code(Some("ko")).no_space);
        assert_eq!(LanguageRules::for_code(Some("en")), LanguageRules::default());
        assert_eq!(LanguageRules::for_code(None), LanguageRules::default());
    }

    #[test]
    fn test_punctuation_only_without_spaces() {
        let zh = LanguageRules::for_code(Some("zh"));
        assert_eq!(zh.symbol_text(",", None).0, "，");
        assert_eq!(zh.symbol_text("字", Some(BreakHint::Space)), (Cow::Borrowed("字"), false));

        let ko = LanguageRules::for_code(Some("ko"));
        assert_eq!(ko.symbol_text(",", Some(BreakHint::Space)), (Cow::Borrowed(","), false));

        let en = LanguageRules::default();
        assert_eq!(en.symbol_text(".", Some(BreakHint::EolSureSpace)), (Cow::Borrowed("."), true));
    }

    #[test]
    fn test_hyphen_skipping() {
        let en = LanguageRules::default();
        assert!(en.skips("-", Some(BreakHint::Hyphen)));
        assert!(en.skips("-", Some(BreakHint::EolSureSpace)));
        assert!(!en.skips("-", Some(BreakHint::Space)));
        assert!(!en.skips("a", Some(BreakHint::Hyphen)));
        assert!(!LanguageRules::for_code(Some("ja")).skips("-", Some(BreakHint::Hyphen)));
    }
}
