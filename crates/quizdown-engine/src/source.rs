//! Loading the questionnaire definition.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::ids;
use crate::models::{Page, QuizConfig};
use crate::parsing::parse_questionnaire;

const USER_AGENT_VALUE: &str = concat!("quizdown/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP error fetching questionnaire: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Questionnaire request to {url} failed with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("Failed to read questionnaire {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that can turn a configured source into questionnaire XML.
pub trait SourceLoader {
    fn load(&self, source: &str) -> Result<String, SourceError>;
}

/// Loads sources the way a page served from `root` would: URLs are fetched,
/// site-absolute paths like `/questions.xml` resolve under `root`.
#[derive(Debug, Clone)]
pub struct SiteLoader {
    root: PathBuf,
}

impl SiteLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path a non-URL source refers to.
    pub fn resolve(&self, source: &str) -> PathBuf {
        let source = source.strip_prefix("file://").unwrap_or(source);
        let path = Path::new(source);
        if path.is_absolute() && path.exists() {
            return path.to_path_buf();
        }
        self.root.join(source.trim_start_matches('/'))
    }

    fn fetch(&self, url: &str) -> Result<String, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(FETCH_TIMEOUT)
            .build()?;

        log::debug!("Fetching questionnaire from {url}");
        let response = client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.text()?)
    }
}

impl SourceLoader for SiteLoader {
    fn load(&self, source: &str) -> Result<String, SourceError> {
        if source.starts_with("http://") || source.starts_with("https://") {
            return self.fetch(source);
        }

        let path = self.resolve(source);
        log::debug!("Reading questionnaire from {}", path.display());
        fs::read_to_string(&path).map_err(|source| SourceError::Io { path, source })
    }
}

/// Load and parse the configured questionnaire.
///
/// Fills in `config.submission_id` from the source filename when the host
/// did not set one. Failures are returned as they are, without retry.
pub fn load_questionnaire(
    config: &mut QuizConfig,
    loader: &dyn SourceLoader,
) -> Result<Vec<Page>, SourceError> {
    if config.submission_id.is_none() {
        config.submission_id = Some(ids::submission_id_for(&config.source));
    }

    let xml = loader.load(&config.source).inspect_err(|e| {
        log::error!("Failed to load questionnaire {}: {e}", config.source);
    })?;

    let pages = parse_questionnaire(&xml);
    log::info!("Loaded {} page(s) from {}", pages.len(), config.source);
    Ok(pages)
}
