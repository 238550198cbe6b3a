// Collapses raw Tesseract output into the single line the field rules read.
//
// Rule order matters: structural punctuation (hyphens included) is stripped
// first and spaced dates are rebuilt afterwards. Field rules depend on dates
// coming out as dd-mm-yyyy.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DECORATIVE: Regex = Regex::new(r#"[“”‘’`"–—]+"#).unwrap();
    static ref STRUCTURAL: Regex = Regex::new(r"[._/\-\\]+").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    // OCR reads the hyphen in "22-02:2017" as a colon
    static ref DIGIT_COLON: Regex = Regex::new(r"(\d):(\d)").unwrap();
    static ref SPACED_DATE: Regex = Regex::new(r"(\d{2})\s+(\d{2})\s+(\d{4})").unwrap();
    static ref STRAY_DIGIT_DATE: Regex = Regex::new(r"\b(\d)\s+(\d{2})-(\d{2}-\d{4})\b").unwrap();
}

pub struct TextCanonicalizer;

impl TextCanonicalizer {
    pub fn canonicalize(text: &str) -> String {
        let text = DECORATIVE.replace_all(text, " ");
        let text = STRUCTURAL.replace_all(&text, " ");
        let text = WHITESPACE.replace_all(&text, " ");
        let text = DIGIT_COLON.replace_all(text.trim(), "$1-$2");

        let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let line = Self::unify_spaced_dates(&line);

        log::debug!("Canonical line: {}", line);
        line
    }

    /// Rewrite `DD MM YYYY` as `DD-MM-YYYY`, then drop one stray digit that
    /// OCR put in front of a date (`1 22-02-2017` becomes `22-02-2017`).
    pub fn unify_spaced_dates(line: &str) -> String {
        let mut unified = SPACED_DATE.replace_all(line, "$1-$2-$3").into_owned();

        let repaired = STRAY_DIGIT_DATE
            .captures(&unified)
            .map(|caps| (caps.get(0).map(|m| m.range()), format!("{}-{}", &caps[2], &caps[3])));
        if let Some((Some(range), corrected)) = repaired {
            unified.replace_range(range, &corrected);
        }

        if unified != line {
            log::debug!("Unified dates: {:?} -> {:?}", line, unified);
        }
        unified
    }
}
