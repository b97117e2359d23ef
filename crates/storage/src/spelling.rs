#![forbid(unsafe_code)]

//! Spell checking with a file-backed custom dictionary.
//!
//! The checker is an ordinary value: build it once at startup and pass it to whatever needs it.

use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DICTIONARY_HEADER: &str = "# Custom dictionary file for Reading Tracker";
const MAX_SUGGESTIONS: usize = 5;
const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Error)]
pub enum SpellError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("word pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug)]
pub struct SpellChecker {
    known: HashSet<String>,
    custom_path: Option<PathBuf>,
    word_pattern: Regex,
}

impl SpellChecker {
    /// Builds a checker from `base_words` plus the custom dictionary at `custom_path`, which is
    /// created with a header line when missing.
    pub fn new<I, S>(base_words: I, custom_path: Option<&Path>) -> Result<Self, SpellError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut known: HashSet<String> = base_words
            .into_iter()
            .map(|word| word.as_ref().trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();

        if let Some(path) = custom_path {
            let custom = load_custom_dictionary(path)?;
            tracing::debug!(path = %path.display(), words = custom.len(), "custom dictionary loaded");
            known.extend(custom);
        }

        Ok(Self {
            known,
            custom_path: custom_path.map(Path::to_path_buf),
            word_pattern: Regex::new(r"\b[A-Za-z']{2,}\b")?,
        })
    }

    /// Reads the base word list from a file with one word per line.
    pub fn from_word_list(
        word_list: impl AsRef<Path>,
        custom_path: Option<&Path>,
    ) -> Result<Self, SpellError> {
        let raw = std::fs::read_to_string(word_list.as_ref())?;
        Self::new(dictionary_words(&raw), custom_path)
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Words containing anything but letters are never reported.
    pub fn is_misspelled(&self, word: &str) -> bool {
        if word.is_empty() || !word.chars().all(char::is_alphabetic) {
            return false;
        }
        !self.known.contains(&word.to_lowercase())
    }

    /// Up to five known words one edit away, or two edits away when none are one away.
    pub fn suggest(&self, word: &str) -> Vec<String> {
        if !self.is_misspelled(word) {
            return Vec::new();
        }
        let lowered = word.to_lowercase();
        let first = edits(&lowered);
        let mut found: BTreeSet<&str> = first
            .iter()
            .filter_map(|candidate| self.known.get(candidate).map(String::as_str))
            .collect();
        if found.is_empty() {
            found = first
                .iter()
                .flat_map(|candidate| edits(candidate))
                .filter_map(|candidate| self.known.get(&candidate).map(String::as_str))
                .collect();
        }
        found
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(str::to_string)
            .collect()
    }

    /// Adds the word in memory and appends it to the custom dictionary file. Returns `false`
    /// when the word is blank or already known.
    pub fn add_to_dictionary(&mut self, word: &str) -> Result<bool, SpellError> {
        let cleaned = word.trim().to_lowercase();
        if cleaned.is_empty() || self.known.contains(&cleaned) {
            return Ok(false);
        }
        if let Some(path) = &self.custom_path {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "{cleaned}")?;
        }
        tracing::info!(word = %cleaned, "word added to dictionary");
        self.known.insert(cleaned);
        Ok(true)
    }

    /// Word tokens of `text`: runs of two or more ASCII letters or apostrophes.
    pub fn words<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.word_pattern
            .find_iter(text)
            .map(|found| found.as_str())
            .collect()
    }

    /// Tokens of `text` that are misspelled, in order of appearance.
    pub fn misspelled_words<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.words(text)
            .into_iter()
            .filter(|word| self.is_misspelled(word))
            .collect()
    }
}

fn dictionary_words(raw: &str) -> impl Iterator<Item = &str> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

fn load_custom_dictionary(path: &Path) -> Result<Vec<String>, SpellError> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, format!("{DICTIONARY_HEADER}\n"))?;
        tracing::info!(path = %path.display(), "custom dictionary created");
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(dictionary_words(&raw).map(str::to_lowercase).collect())
}

/// Deletes, transposes, replacements and inserts one step away from `word`.
fn edits(word: &str) -> HashSet<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut out = HashSet::new();
    for split in 0..=chars.len() {
        let (left, right) = chars.split_at(split);
        let left: String = left.iter().collect();
        if let Some((first, rest)) = right.split_first() {
            let rest: String = rest.iter().collect();
            out.insert(format!("{left}{rest}"));
            if let Some((second, tail)) = rest.chars().next().map(|c| (c, &rest[c.len_utf8()..])) {
                out.insert(format!("{left}{second}{first}{tail}"));
            }
            for letter in ALPHABET.chars() {
                out.insert(format!("{left}{letter}{rest}"));
            }
        }
        let right: String = right.iter().collect();
        for letter in ALPHABET.chars() {
            out.insert(format!("{left}{letter}{right}"));
        }
    }
    out.remove(word);
    out
}
