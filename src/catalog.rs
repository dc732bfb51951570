// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Language-keyed catalog of extra words.
//!
//! Each clock face language ships its own set of auxiliary words that can be
//! lit independently of the time. The catalog maps a language name to the
//! ordered list of those words. Unknown languages fall back to the default
//! language instead of failing.
//!
//! # Examples
//!
//! ```
//! use wordclock_lib::catalog::WordCatalog;
//!
//! let catalog = WordCatalog::builtin();
//! let words = catalog.lookup("German");
//! assert_eq!(words.len(), 12);
//! assert_eq!(words[2].display_name(), "MÜLL RAUS BRINGEN");
//!
//! // Unknown languages fall back to German
//! assert_eq!(catalog.lookup("Klingon"), words);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "German";

const GERMAN_WORDS: [(u32, &str); 12] = [
    (1, "ALARM"),
    (2, "GEBURTSTAG"),
    (3, "MÜLL RAUS BRINGEN"),
    (4, "AUTO"),
    (5, "FEIERTAG"),
    (6, "FORMEL1"),
    (7, "GELBER SACK"),
    (8, "URLAUB"),
    (9, "WERKSTATT"),
    (10, "ZEIT ZUM ZOCKEN"),
    (11, "FRISEUR"),
    (12, "TERMIN"),
];

/// One extra word on the clock face.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordCatalogEntry {
    word_id: u32,
    display_name: String,
}

impl WordCatalogEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(word_id: u32, display_name: impl Into<String>) -> Self {
        Self {
            word_id,
            display_name: display_name.into(),
        }
    }

    /// Returns the identifier used in `ew<id>` requests.
    #[must_use]
    pub fn word_id(&self) -> u32 {
        self.word_id
    }

    /// Returns the text printed on the clock face.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Static mapping of language to extra words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCatalog {
    default_language: String,
    languages: HashMap<String, Vec<WordCatalogEntry>>,
}

impl WordCatalog {
    /// Creates an empty catalog with the given fallback language.
    #[must_use]
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            default_language: default_language.into(),
            languages: HashMap::new(),
        }
    }

    /// Returns the catalog of words known to ship with the clock.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(DEFAULT_LANGUAGE).with_language(
            DEFAULT_LANGUAGE,
            GERMAN_WORDS
                .iter()
                .map(|&(id, name)| WordCatalogEntry::new(id, name)),
        )
    }

    /// Loads a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if the document does not describe a
    /// catalog, or if a word id is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use wordclock_lib::catalog::WordCatalog;
    ///
    /// let catalog = WordCatalog::from_json(r#"{
    ///     "default_language": "English",
    ///     "languages": {
    ///         "English": [{ "word_id": 1, "display_name": "ALARM" }]
    ///     }
    /// }"#).unwrap();
    /// assert_eq!(catalog.lookup("English")[0].word_id(), 1);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let catalog: Self = serde_json::from_str(json).map_err(|e| ParseError::InvalidValue {
            field: "catalog".to_string(),
            message: e.to_string(),
        })?;

        let zero_id = catalog
            .languages
            .iter()
            .find(|(_, words)| words.iter().any(|w| w.word_id == 0));
        if let Some((language, _)) = zero_id {
            return Err(ParseError::InvalidValue {
                field: format!("languages.{language}"),
                message: "word ids must be positive".to_string(),
            });
        }

        Ok(catalog)
    }

    /// Adds or replaces a language.
    #[must_use]
    pub fn with_language(
        mut self,
        language: impl Into<String>,
        words: impl IntoIterator<Item = WordCatalogEntry>,
    ) -> Self {
        self.languages
            .insert(language.into(), words.into_iter().collect());
        self
    }

    /// Returns the fallback language.
    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Returns `true` if the language has its own word list.
    #[must_use]
    pub fn contains(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    /// Returns the known languages, sorted.
    #[must_use]
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }

    /// Returns the words for `language`, falling back to the default language.
    ///
    /// Never fails: if even the default language is missing the result is
    /// empty.
    #[must_use]
    pub fn lookup(&self, language: &str) -> &[WordCatalogEntry] {
        if let Some(words) = self.languages.get(language) {
            return words;
        }

        tracing::warn!(
            language = %language,
            fallback = %self.default_language,
            "Unknown language, falling back to default word set"
        );

        self.languages
            .get(&self.default_language)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl Default for WordCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
