//! Stripping of legacy `&`-style formatting codes from waypoint text.
//!
//! Display names and lore lines carry inline formatting escapes (`&7`, `&l`,
//! `&r`, ...) that must not take part in substring matching.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

static MARKUP_RE: OnceLock<Regex> = OnceLock::new();

/// Pattern for one escape: `&` followed by a color digit (0-9, a-f), a style
/// code (k-o), or the reset code (r). The code character matches either case.
fn markup_re() -> &'static Regex {
    MARKUP_RE.get_or_init(|| Regex::new("&[0-9a-fk-orA-FK-OR]").unwrap())
}

/// Remove every formatting escape from `text`.
///
/// Re-applied until a fixed point: removing a pair can bring a stray `&` next
/// to a code character (`"&&aa"`), and the result must contain no escape at
/// all so that `strip_markup` is idempotent.
pub fn strip_markup(text: &str) -> String {
    let re = markup_re();
    let mut out = match re.replace_all(text, "") {
        Cow::Borrowed(_) => return text.to_string(),
        Cow::Owned(stripped) => stripped,
    };
    loop {
        match re.replace_all(&out, "") {
            Cow::Borrowed(_) => return out,
            Cow::Owned(stripped) => out = stripped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(strip_markup("Main area"), "Main area");
        assert_eq!(strip_markup(""), "");
    }

    #[test]
    fn strips_color_codes() {
        assert_eq!(strip_markup("&7Main area"), "Main area");
        assert_eq!(strip_markup("&aGreen &bBlue"), "Green Blue");
    }

    #[test]
    fn strips_style_and_reset_codes() {
        assert_eq!(strip_markup("&lBold&r plain"), "Bold plain");
        assert_eq!(strip_markup("&k&o&n"), "");
    }

    #[test]
    fn code_character_is_case_insensitive() {
        assert_eq!(strip_markup("&AUpper"), "Upper");
        assert_eq!(strip_markup("&Rreset"), "reset");
    }

    #[test]
    fn unknown_codes_are_kept() {
        // 'z' is not in the escape alphabet, neither is '&' itself at the end
        assert_eq!(strip_markup("&zText&"), "&zText&");
        assert_eq!(strip_markup("a & b"), "a & b");
    }

    #[test]
    fn idempotent_even_when_stripping_exposes_new_pairs() {
        // Single-pass removal of "&a" in "&&aa" would leave "&a" behind
        assert_eq!(strip_markup("&&aa"), "");
        assert_eq!(strip_markup(strip_markup("&&aa").as_str()), "");

        for input in ["&7Main area", "&&77", "x&&rry", "&"] {
            let once = strip_markup(input);
            assert_eq!(strip_markup(&once), once, "not idempotent for {input:?}");
        }
    }
}
