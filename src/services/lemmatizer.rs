//! Verb lemmatization backed by the WordNet verb lexicon.
//!
//! The lexicon (`index.verb`) and the irregular-form list (`verb.exc`) are
//! read once at startup, by default from the curated copy under
//! `data/wordnet`. When they cannot be loaded the service runs without
//! a lemmatizer and the usage validator falls back to literal matching.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

const INDEX_FILE: &str = "index.verb";
const EXCEPTIONS_FILE: &str = "verb.exc";

/// Longest word run through the detachment rules. Nothing in the WordNet verb
/// lexicon comes close, and longer input comes back unchanged.
pub const MAX_WORD_LEN: usize = 64;

/// WordNet detachment rules for verbs, applied in this order.
const VERB_SUBSTITUTIONS: [(&str, &str); 8] = [
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];

pub trait Lemmatizer: Send + Sync {
    /// Base form of `word` read as a verb. Unknown words come back unchanged.
    fn lemmatize_verb(&self, word: &str) -> String;
}

#[derive(Debug, Error)]
pub enum LemmatizerError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status} while fetching {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("verb lexicon is empty")]
    EmptyLexicon,
}

/// Location of the WordNet verb files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LemmaSource {
    Http(String),
    Directory(PathBuf),
}

impl LemmaSource {
    pub fn from_location(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Http(trimmed.trim_end_matches('/').to_string())
        } else {
            Self::Directory(PathBuf::from(trimmed))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Http(base) => base.clone(),
            Self::Directory(dir) => dir.display().to_string(),
        }
    }

    async fn read(&self, client: &reqwest::Client, file: &str) -> Result<String, LemmatizerError> {
        match self {
            Self::Http(base) => {
                let url = format!("{base}/{file}");
                let response = client.get(&url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LemmatizerError::HttpStatus { status, url });
                }
                Ok(response.text().await?)
            }
            Self::Directory(dir) => {
                let path = dir.join(file);
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|source| LemmatizerError::Io { path, source })
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WordNetLemmatizer {
    lexicon: HashSet<String>,
    exceptions: HashMap<String, Vec<String>>,
}

impl WordNetLemmatizer {
    pub async fn load(
        source: &LemmaSource,
        client: &reqwest::Client,
    ) -> Result<Self, LemmatizerError> {
        let index = source.read(client, INDEX_FILE).await?;
        let exceptions = source.read(client, EXCEPTIONS_FILE).await?;
        let lemmatizer = Self::from_wordnet(&index, &exceptions)?;
        info!(
            source = %source.describe(),
            lemmas = lemmatizer.lexicon.len(),
            exceptions = lemmatizer.exceptions.len(),
            "verb lemmatizer ready"
        );
        Ok(lemmatizer)
    }

    /// Build from the text of `index.verb` and `verb.exc`.
    pub fn from_wordnet(index: &str, exceptions: &str) -> Result<Self, LemmatizerError> {
        let lexicon: HashSet<String> = index
            .lines()
            .filter(|line| !line.starts_with(' '))
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string)
            .collect();
        if lexicon.is_empty() {
            return Err(LemmatizerError::EmptyLexicon);
        }

        let mut exception_map: HashMap<String, Vec<String>> = HashMap::new();
        for line in exceptions.lines() {
            let mut fields = line.split_whitespace();
            let Some(inflected) = fields.next() else {
                continue;
            };
            exception_map
                .entry(inflected.to_string())
                .or_default()
                .extend(fields.map(str::to_string));
        }

        Ok(Self {
            lexicon,
            exceptions: exception_map,
        })
    }

    fn known(&self, forms: impl IntoIterator<Item = String>) -> Vec<String> {
        let mut seen = HashSet::new();
        forms
            .into_iter()
            .filter(|form| self.lexicon.contains(form))
            .filter(|form| seen.insert(form.clone()))
            .collect()
    }

    /// Every lexicon form `word` may be an inflection of.
    fn morphy(&self, word: &str) -> Vec<String> {
        if let Some(bases) = self.exceptions.get(word) {
            return self.known(std::iter::once(word.to_string()).chain(bases.iter().cloned()));
        }

        let mut forms = apply_rules(&[word.to_string()]);
        let found = self.known(std::iter::once(word.to_string()).chain(forms.iter().cloned()));
        if !found.is_empty() {
            return found;
        }

        while !forms.is_empty() {
            forms = apply_rules(&forms);
            let found = self.known(forms.iter().cloned());
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }
}

fn apply_rules(forms: &[String]) -> Vec<String> {
    forms
        .iter()
        .flat_map(|form| {
            VERB_SUBSTITUTIONS
                .iter()
                .filter(move |(suffix, _)| form.ends_with(suffix))
                .map(move |(suffix, replacement)| {
                    format!("{}{}", &form[..form.len() - suffix.len()], replacement)
                })
        })
        .collect()
}

impl Lemmatizer for WordNetLemmatizer {
    fn lemmatize_verb(&self, word: &str) -> String {
        if word.len() > MAX_WORD_LEN {
            return word.to_string();
        }
        self.morphy(word)
            .into_iter()
            .reduce(|shortest, candidate| {
                if candidate.len() < shortest.len() {
                    candidate
                } else {
                    shortest
                }
            })
            .unwrap_or_else(|| word.to_string())
    }
}
