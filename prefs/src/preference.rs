//! Preference keys and values.
//!
//! DESIGN
//! ======
//! Both preferences are two-valued enums. The flip cycle lives here on the
//! types (`Theme::flipped`, `Language::flipped`) so no caller ever spells out
//! `light -> dark -> light` itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "preference_test.rs"]
mod tests;

/// Color theme applied through the root `data-theme` attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Site language applied through the root `lang` attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    De,
    En,
}

impl Language {
    /// BCP 47 code written to the `lang` attribute.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }

    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::De => Self::En,
            Self::En => Self::De,
        }
    }
}

/// Which preference an operation addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceKey {
    Theme,
    Language,
}

impl PreferenceKey {
    /// Key used in the backing [`Storage`](crate::Storage).
    #[must_use]
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Theme => "theme",
            Self::Language => "language",
        }
    }
}

/// A value for one of the two preference keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Theme(Theme),
    Language(Language),
}

impl PreferenceValue {
    #[must_use]
    pub fn key(self) -> PreferenceKey {
        match self {
            Self::Theme(_) => PreferenceKey::Theme,
            Self::Language(_) => PreferenceKey::Language,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Theme(theme) => theme.as_str(),
            Self::Language(language) => language.code(),
        }
    }

    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Theme(theme) => Self::Theme(theme.flipped()),
            Self::Language(language) => Self::Language(language.flipped()),
        }
    }

    /// Parse a raw stored or user-supplied string for `key`.
    pub fn parse(key: PreferenceKey, raw: &str) -> Result<Self, UnknownValue> {
        match key {
            PreferenceKey::Theme => raw.parse().map(Self::Theme),
            PreferenceKey::Language => raw.parse().map(Self::Language),
        }
    }
}

impl From<Theme> for PreferenceValue {
    fn from(theme: Theme) -> Self {
        Self::Theme(theme)
    }
}

impl From<Language> for PreferenceValue {
    fn from(language: Language) -> Self {
        Self::Language(language)
    }
}

/// Both preferences as currently resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub theme: Theme,
    pub language: Language,
}

/// A string that names no known key or value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownValue {
    fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_owned() }
    }
}

impl FromStr for Theme {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(UnknownValue::new("theme", s)),
        }
    }
}

impl FromStr for Language {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "de" => Ok(Self::De),
            "en" => Ok(Self::En),
            _ => Err(UnknownValue::new("language", s)),
        }
    }
}

impl FromStr for PreferenceKey {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "theme" => Ok(Self::Theme),
            "language" | "lang" => Ok(Self::Language),
            _ => Err(UnknownValue::new("preference key", s)),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_key())
    }
}

impl fmt::Display for PreferenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
