use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::services::lemmatizer::LemmaSource;
use crate::services::phrasal_verbs::DataSource;

pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/henrypamo-dotcom/TeoriaFCE/refs/heads/main/phrasal_verbs.csv";
pub const DEFAULT_LEMMA_SOURCE: &str = "data/wordnet";
pub const DEFAULT_DICTIONARY_BASE_URL: &str = "https://dictionary.cambridge.org/dictionary/english/";
const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 30 * 60;
const DEFAULT_SESSION_CLEANUP_SCHEDULE: &str = "0 * * * * *";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub data_source: DataSource,
    pub fetch_timeout: Option<Duration>,
    pub lemma_source: LemmaSource,
    pub dictionary_base_url: String,
    pub session_idle_ttl: Duration,
    pub session_cleanup_schedule: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env_string("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = env_string("HOST")
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let data_source = DataSource::from_location(
            &env_string("PHRASAL_DATA_URL").unwrap_or_else(|| DEFAULT_DATA_URL.to_string()),
        );
        let fetch_timeout = env_u64("DATA_FETCH_TIMEOUT_MS").map(Duration::from_millis);
        let lemma_source = lemma_source_from(
            &env_string("LEMMA_SOURCE").unwrap_or_else(|| DEFAULT_LEMMA_SOURCE.to_string()),
        );
        let dictionary_base_url = env_string("DICTIONARY_BASE_URL")
            .unwrap_or_else(|| DEFAULT_DICTIONARY_BASE_URL.to_string());
        let session_idle_ttl = Duration::from_secs(
            env_u64("SESSION_IDLE_TTL_SECS").unwrap_or(DEFAULT_SESSION_IDLE_TTL_SECS),
        );
        let session_cleanup_schedule = env_string("SESSION_CLEANUP_SCHEDULE")
            .unwrap_or_else(|| DEFAULT_SESSION_CLEANUP_SCHEDULE.to_string());

        Self {
            host,
            port,
            log_level,
            data_source,
            fetch_timeout,
            lemma_source,
            dictionary_base_url,
            session_idle_ttl,
            session_cleanup_schedule,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn http_client(&self) -> reqwest::Client {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.fetch_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().unwrap_or_else(|_| reqwest::Client::new())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3000,
            log_level: "info".to_string(),
            data_source: DataSource::from_location(DEFAULT_DATA_URL),
            fetch_timeout: None,
            lemma_source: lemma_source_from(DEFAULT_LEMMA_SOURCE),
            dictionary_base_url: DEFAULT_DICTIONARY_BASE_URL.to_string(),
            session_idle_ttl: Duration::from_secs(DEFAULT_SESSION_IDLE_TTL_SECS),
            session_cleanup_schedule: DEFAULT_SESSION_CLEANUP_SCHEDULE.to_string(),
        }
    }
}

/// Relative lemma directories resolve against the crate root, where the
/// bundled lexicon lives.
fn lemma_source_from(location: &str) -> LemmaSource {
    match LemmaSource::from_location(location) {
        LemmaSource::Directory(dir) => {
            LemmaSource::Directory(resolve_path_relative_to_manifest_dir(&dir))
        }
        remote => remote,
    }
}

fn resolve_path_relative_to_manifest_dir(raw: &Path) -> PathBuf {
    if raw.is_absolute() {
        return raw.to_path_buf();
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(raw)
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_u64(key: &str) -> Option<u64> {
    env_string(key)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_remote_dataset() {
        let config = Config::default();
        assert!(matches!(config.data_source, DataSource::Http(_)));
        assert_eq!(config.bind_addr().port(), 3000);
        assert!(config.fetch_timeout.is_none());
    }

    #[test]
    fn default_lemma_source_is_the_bundled_lexicon() {
        let LemmaSource::Directory(dir) = Config::default().lemma_source else {
            panic!("expected a directory lemma source");
        };
        assert!(dir.join("index.verb").is_file());
        assert!(dir.join("verb.exc").is_file());
    }

    #[test]
    fn absolute_and_remote_lemma_sources_are_kept() {
        assert_eq!(
            lemma_source_from("/srv/wordnet/dict"),
            LemmaSource::Directory(PathBuf::from("/srv/wordnet/dict"))
        );
        assert_eq!(
            lemma_source_from("https://example.org/wordnet/"),
            LemmaSource::Http("https://example.org/wordnet".to_string())
        );
    }
}
