//! Catalog languages.
//!
//! The remote catalog keys translations by the upper-case language name
//! (`"ZULU"`, `"SWAHILI"`, ...). The same form is used for storage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A language the catalog can be browsed in.
///
/// `English` is the default-language of entity fields; every other language
/// is a sparse translation overlay.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
    #[default]
    English,
    French,
    Amharic,
    Arabic,
    Swahili,
    Yoruba,
    Igbo,
    Hausa,
    Zulu,
    Xhosa,
    Afrikaans,
    Sesotho,
    Setswana,
    Lingala,
    Kinyarwanda,
    Wolof,
    Somali,
    Oromo,
    Malagasy,
    Bambara,
    Fulfulde,
    Tigrinya,
}

/// Error returned when parsing an unknown language name or code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown language: {0}")]
pub struct UnknownLanguage(pub String);

impl Language {
    /// Every supported language, default first.
    pub const ALL: [Self; 22] = [
        Self::English,
        Self::French,
        Self::Amharic,
        Self::Arabic,
        Self::Swahili,
        Self::Yoruba,
        Self::Igbo,
        Self::Hausa,
        Self::Zulu,
        Self::Xhosa,
        Self::Afrikaans,
        Self::Sesotho,
        Self::Setswana,
        Self::Lingala,
        Self::Kinyarwanda,
        Self::Wolof,
        Self::Somali,
        Self::Oromo,
        Self::Malagasy,
        Self::Bambara,
        Self::Fulfulde,
        Self::Tigrinya,
    ];

    /// Wire and storage name (`"ZULU"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::English => "ENGLISH",
            Self::French => "FRENCH",
            Self::Amharic => "AMHARIC",
            Self::Arabic => "ARABIC",
            Self::Swahili => "SWAHILI",
            Self::Yoruba => "YORUBA",
            Self::Igbo => "IGBO",
            Self::Hausa => "HAUSA",
            Self::Zulu => "ZULU",
            Self::Xhosa => "XHOSA",
            Self::Afrikaans => "AFRIKAANS",
            Self::Sesotho => "SESOTHO",
            Self::Setswana => "SETSWANA",
            Self::Lingala => "LINGALA",
            Self::Kinyarwanda => "KINYARWANDA",
            Self::Wolof => "WOLOF",
            Self::Somali => "SOMALI",
            Self::Oromo => "OROMO",
            Self::Malagasy => "MALAGASY",
            Self::Bambara => "BAMBARA",
            Self::Fulfulde => "FULFULDE",
            Self::Tigrinya => "TIGRINYA",
        }
    }

    /// ISO 639-1 code, used for the `Accept-Language` header.
    pub const fn iso_code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::French => "fr",
            Self::Amharic => "am",
            Self::Arabic => "ar",
            Self::Swahili => "sw",
            Self::Yoruba => "yo",
            Self::Igbo => "ig",
            Self::Hausa => "ha",
            Self::Zulu => "zu",
            Self::Xhosa => "xh",
            Self::Afrikaans => "af",
            Self::Sesotho => "st",
            Self::Setswana => "tn",
            Self::Lingala => "ln",
            Self::Kinyarwanda => "rw",
            Self::Wolof => "wo",
            Self::Somali => "so",
            Self::Oromo => "om",
            Self::Malagasy => "mg",
            Self::Bambara => "bm",
            Self::Fulfulde => "ff",
            Self::Tigrinya => "ti",
        }
    }

    /// Whether this is the language entity default fields are written in.
    pub const fn is_default(self) -> bool {
        matches!(self, Self::English)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    /// Accepts the wire name in any case or the ISO code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|lang| {
                lang.as_str().eq_ignore_ascii_case(trimmed)
                    || lang.iso_code().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}
