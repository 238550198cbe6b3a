// Field rules for the canonical KTP line.
//
// Each field gets one labelled pattern and optionally a label-free fallback.
// Rules run in card order so later fallbacks can look at earlier results
// (Berlaku Hingga skips the birth date).

use crate::models::{Field, FieldRecord};
use lazy_static::lazy_static;
use regex::Regex;

type Fallback = fn(&str, &FieldRecord) -> Option<String>;

struct FieldRule {
    field: Field,
    pattern: Regex,
    fallback: Option<Fallback>,
    finish: fn(&str) -> String,
}

impl FieldRule {
    fn new(field: Field, pattern: &str) -> Self {
        FieldRule {
            field,
            pattern: Regex::new(pattern).unwrap(),
            fallback: None,
            finish: |value| value.trim().to_string(),
        }
    }

    fn or_else(mut self, fallback: Fallback) -> Self {
        self.fallback = Some(fallback);
        self
    }

    fn finish_with(mut self, finish: fn(&str) -> String) -> Self {
        self.finish = finish;
        self
    }

    fn apply(&self, line: &str, record: &FieldRecord) -> Option<String> {
        let primary = self
            .pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| (self.finish)(m.as_str()));

        primary
            .filter(|value| !value.is_empty())
            .or_else(|| self.fallback.and_then(|fallback| fallback(line, record)))
    }
}

// Label sequences that start another field. Single words such as "desa"
// or "gol" also occur in values, so only whole labels end a free-text run.
const FIELD_LABELS: &[&[&str]] = &[
    &["nik"],
    &["nama"],
    &["tempat", "tgl", "lahir"],
    &["jenis", "kelamin"],
    &["gol", "darah"],
    &["alamat"],
    &["rt", "rw"],
    &["rturw"],
    &["kel", "desa"],
    &["keldesa"],
    &["kecamatan"],
    &["agama"],
    &["status", "perkawinan"],
    &["pekerjaan"],
    &["kewarganegaraan"],
    &["berlaku", "hingga"],
];

lazy_static! {
    static ref RULES: Vec<FieldRule> = vec![
        FieldRule::new(Field::Nik, r"(?i)\bnik\s*:?\s*(\d{16})\b").or_else(bare_nik),
        FieldRule::new(Field::Nama, r"(?i)nama\s*:?\s*([A-Z\s]+)").finish_with(free_text),
        FieldRule::new(
            Field::TempatTglLahir,
            r"(?i)tempat\s*\S*\s*lahir\s*:?\s*([A-Za-z]+,\s*\d{2}-\d{2}-\d{4})",
        )
        .or_else(bare_birth),
        FieldRule::new(Field::JenisKelamin, r"(?i)jenis\s*kelamin\s*:?\s*([A-Za-z]+)"),
        FieldRule::new(Field::GolDarah, r"(?i)gol\s*\.?\s*darah\s*:?\s*([ABO]{1,2})\b")
            .finish_with(|value| value.trim().to_uppercase()),
        FieldRule::new(Field::Alamat, r"(?i)alamat\s*:?\s*([A-Za-z0-9\s]+)")
            .finish_with(|value| truncate(&free_text(value), 60)),
        FieldRule::new(
            Field::RtRw,
            r"(?i)\b(?:rt\s*/?\s*rw|rturw)\s*:?\s*(\d{1,3}(?:\s*[/-]\s*|\s+)\d{1,3})\b",
        )
        .finish_with(|value| RT_RW_SEPARATOR.replace(value.trim(), "/").into_owned()),
        FieldRule::new(Field::KelDesa, r"(?i)kel\S*\s*desa\s*:?\s*([A-Za-z]+)"),
        FieldRule::new(Field::Kecamatan, r"(?i)kecamatan\s*:?\s*([A-Za-z]+)"),
        FieldRule::new(Field::Agama, r"(?i)agama\s*:?\s*.{0,20}?([A-Za-z]+)"),
        FieldRule::new(Field::StatusPerkawinan, r"(?i)status\s*perkawinan\s*:?\s*([A-Za-z]+)"),
        FieldRule::new(Field::Pekerjaan, r"(?i)pekerjaan\W*([A-Za-z\s]+)")
            .finish_with(|value| truncate(&free_text(value), 30)),
        FieldRule::new(Field::Kewarganegaraan, r"(?i)kewarganegaraan\s*:?\s*([A-Za-z]+)"),
        FieldRule::new(
            Field::BerlakuHingga,
            r"(?i)berlaku\W*hingga\W*(\d{1,2}[\s-]\d{2}[\s-]\d{4})",
        )
        .finish_with(normalize_date)
        .or_else(distinct_date),
    ];

    static ref BARE_NIK: Regex = Regex::new(r"\b(\d{16})\b").unwrap();
    static ref BARE_BIRTH: Regex = Regex::new(r"([A-Za-z]+,\s*\d{2}-\d{2}-\d{4})").unwrap();
    static ref BARE_DATE: Regex = Regex::new(r"\b\d{2}-\d{2}-\d{4}\b").unwrap();
    static ref DATE_GROUPS: Regex = Regex::new(r"(\d{1,2})[\s-](\d{2})[\s-](\d{4})").unwrap();
    static ref RT_RW_SEPARATOR: Regex = Regex::new(r"\s*[/-]\s*|\s+").unwrap();
}

pub struct FieldExtractor;

impl FieldExtractor {
    /// Run every rule over a canonical line. Never fails: a field whose
    /// patterns do not match stays empty.
    pub fn extract_fields(line: &str) -> FieldRecord {
        let mut record = FieldRecord::new();
        for rule in RULES.iter() {
            if let Some(value) = rule.apply(line, &record) {
                record.set(rule.field, value);
            }
        }

        for (field, value) in record.iter() {
            log::debug!("{}: {}", field, value);
        }
        record
    }
}

fn bare_nik(line: &str, _: &FieldRecord) -> Option<String> {
    BARE_NIK.captures(line).map(|caps| caps[1].to_string())
}

fn bare_birth(line: &str, _: &FieldRecord) -> Option<String> {
    BARE_BIRTH.captures(line).map(|caps| caps[1].trim().to_string())
}

/// First standalone dd-mm-yyyy that is not the birth date.
fn distinct_date(line: &str, record: &FieldRecord) -> Option<String> {
    let birth = BARE_DATE
        .find(record.get(Field::TempatTglLahir))
        .map(|m| m.as_str());

    BARE_DATE
        .find_iter(line)
        .map(|m| m.as_str())
        .find(|date| Some(*date) != birth)
        .map(str::to_string)
}

fn normalize_date(value: &str) -> String {
    match DATE_GROUPS.captures(value.trim()) {
        Some(caps) => format!("{:0>2}-{}-{}", &caps[1], &caps[2], &caps[3]),
        None => value.trim().to_string(),
    }
}

/// Keep the words of a free-text run up to the next field label.
fn free_text(value: &str) -> String {
    let words: Vec<&str> = value.split_whitespace().collect();
    let end = (0..words.len())
        .find(|&i| starts_with_label(&words[i..]))
        .unwrap_or(words.len());
    words[..end].join(" ")
}

fn starts_with_label(words: &[&str]) -> bool {
    FIELD_LABELS.iter().any(|label| {
        label.len() <= words.len()
            && label
                .iter()
                .zip(words)
                .all(|(expected, word)| word.eq_ignore_ascii_case(expected))
    })
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect::<String>().trim_end().to_string()
}
