use std::path::PathBuf;
use std::sync::Arc;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

const COLUMN_PHRASE: &str = "PhrasalVerb";
const COLUMN_DEFINITION: &str = "Definition";
const COLUMN_EXAMPLE: &str = "Example";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhrasalVerbEntry {
    pub phrase: String,
    pub definition: String,
    pub example: String,
    pub category: Option<String>,
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {0} while fetching dataset")]
    HttpStatus(reqwest::StatusCode),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column {0:?}")]
    MissingColumn(&'static str),
    #[error("dataset is empty")]
    EmptyDataset,
}

/// Where the phrasal verb table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Http(String),
    File(PathBuf),
    Inline(String),
}

impl DataSource {
    /// `http://` and `https://` locations are fetched, anything else is a file path.
    pub fn from_location(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Http(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Http(url) => url.clone(),
            Self::File(path) => path.display().to_string(),
            Self::Inline(_) => "<inline>".to_string(),
        }
    }

    async fn fetch(&self, client: &reqwest::Client) -> Result<String, DataError> {
        match self {
            Self::Http(url) => {
                let response = client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(DataError::HttpStatus(status));
                }
                Ok(response.text().await?)
            }
            Self::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| DataError::Io {
                        path: path.clone(),
                        source,
                    })
            }
            Self::Inline(text) => Ok(text.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "PhrasalVerb", default)]
    phrase: Option<String>,
    #[serde(rename = "Definition", default)]
    definition: Option<String>,
    #[serde(rename = "Example", default)]
    example: Option<String>,
    #[serde(rename = "Category", default)]
    category: Option<String>,
}

impl RawRow {
    fn into_entry(self) -> Option<PhrasalVerbEntry> {
        Some(PhrasalVerbEntry {
            phrase: non_empty(self.phrase)?,
            definition: non_empty(self.definition)?,
            example: non_empty(self.example)?,
            category: non_empty(self.category),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Fetch and parse the whole table.
pub async fn load(
    source: &DataSource,
    client: &reqwest::Client,
) -> Result<Vec<PhrasalVerbEntry>, DataError> {
    let body = source.fetch(client).await?;
    let entries = parse_csv(&body)?;
    info!(
        source = %source.describe(),
        entries = entries.len(),
        "phrasal verb dataset loaded"
    );
    Ok(entries)
}

/// Parse CSV text with a header line. Rows missing a required field are
/// skipped and counted, never loaded half-filled.
pub fn parse_csv(content: &str) -> Result<Vec<PhrasalVerbEntry>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    for required in [COLUMN_PHRASE, COLUMN_DEFINITION, COLUMN_EXAMPLE] {
        if !headers.iter().any(|h| h == required) {
            return Err(DataError::MissingColumn(required));
        }
    }

    let mut entries = Vec::new();
    let mut quarantined = 0usize;
    for (row_idx, result) in reader.deserialize::<RawRow>().enumerate() {
        match result.map(RawRow::into_entry) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {
                quarantined += 1;
                debug!(row = row_idx + 1, "row missing a required field");
            }
            Err(err) => {
                quarantined += 1;
                debug!(row = row_idx + 1, error = %err, "unreadable row");
            }
        }
    }

    if quarantined > 0 {
        warn!(quarantined, kept = entries.len(), "skipped incomplete dataset rows");
    }

    Ok(entries)
}

/// Uniform random pick.
pub fn sample_one<'a, R: Rng + ?Sized>(
    entries: &'a [PhrasalVerbEntry],
    rng: &mut R,
) -> Result<&'a PhrasalVerbEntry, DataError> {
    entries.choose(rng).ok_or(DataError::EmptyDataset)
}

/// Dictionary page for a phrase: spaces become hyphens, case is kept.
pub fn dictionary_url(base_url: &str, phrase: &str) -> String {
    format!("{base_url}{}", phrase.replace(' ', "-"))
}

/// The loaded dataset, fetched on first use and kept for the process lifetime.
pub struct Catalog {
    source: DataSource,
    client: reqwest::Client,
    entries: RwLock<Option<Arc<Vec<PhrasalVerbEntry>>>>,
}

impl Catalog {
    pub fn new(source: DataSource, client: reqwest::Client) -> Self {
        Self {
            source,
            client,
            entries: RwLock::new(None),
        }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Cached entries, loading them when nothing is cached yet. A failed or
    /// empty load is not cached, so the next caller tries again.
    pub async fn entries(&self) -> Result<Arc<Vec<PhrasalVerbEntry>>, DataError> {
        if let Some(entries) = self.entries.read().await.as_ref() {
            return Ok(Arc::clone(entries));
        }

        let mut guard = self.entries.write().await;
        if let Some(entries) = guard.as_ref() {
            return Ok(Arc::clone(entries));
        }

        let loaded = match load(&self.source, &self.client).await {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!(source = %self.source.describe(), error = %err, "dataset load failed");
                return Err(err);
            }
        };
        if loaded.is_empty() {
            return Err(DataError::EmptyDataset);
        }

        let loaded = Arc::new(loaded);
        *guard = Some(Arc::clone(&loaded));
        Ok(loaded)
    }

    pub async fn loaded_len(&self) -> Option<usize> {
        self.entries.read().await.as_ref().map(|e| e.len())
    }
}
