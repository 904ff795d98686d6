//! Per-provider language code tables. Providers disagree on a few codes
//! (Chinese in particular), so each adapter normalizes the caller's code
//! through its own table before building a request.

/// Languages that get the extra specialized attempts in the chain.
pub const SPECIALIZED_LANGUAGES: &[&str] = &["zh-CN", "ja", "ko", "ru"];

pub const MYMEMORY_CODES: &[(&str, &str)] = &[
    ("en", "en"),
    ("fr", "fr"),
    ("es", "es"),
    ("it", "it"),
    ("de", "de"),
    ("zh-CN", "zh"),
    ("ja", "ja"),
    ("ko", "ko"),
    ("ru", "ru"),
];

pub const GOOGLE_CODES: &[(&str, &str)] = &[
    ("en", "en"),
    ("fr", "fr"),
    ("es", "es"),
    ("it", "it"),
    ("de", "de"),
    ("zh-CN", "zh"),
    ("ja", "ja"),
    ("ko", "ko"),
    ("ru", "ru"),
];

pub const LINGOJAM_NAMES: &[(&str, &str)] = &[
    ("en", "english"),
    ("fr", "french"),
    ("es", "spanish"),
    ("it", "italian"),
    ("de", "german"),
    ("zh-CN", "chinese"),
    ("ja", "japanese"),
    ("ko", "korean"),
    ("ru", "russian"),
];

/// How an adapter turns the caller's code into its own.
#[derive(Debug, Clone, Copy)]
pub enum LanguageMap {
    /// Look the code up; unknown codes pass through unchanged.
    Table(&'static [(&'static str, &'static str)]),
    /// Look the code up; unknown codes are unsupported.
    Strict(&'static [(&'static str, &'static str)]),
    /// Drop any region suffix (`zh-CN` -> `zh`).
    BaseCode,
    /// Use the code as given.
    Identity,
}

impl LanguageMap {
    pub fn normalize(&self, code: &str) -> Option<String> {
        match self {
            LanguageMap::Table(table) => Some(lookup(table, code).unwrap_or(code).to_string()),
            LanguageMap::Strict(table) => lookup(table, code).map(str::to_string),
            LanguageMap::BaseCode => code.split('-').next().map(str::to_string),
            LanguageMap::Identity => Some(code.to_string()),
        }
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], code: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == code).map(|(_, v)| *v)
}
