//! Waitlist endpoint resolution and persistence.

use std::{fmt, fs, io::Write, path::Path};

use tempfile::NamedTempFile;
use thiserror::Error;
use url::Url;

use crate::{AnoraConfig, ConfigError};

/// Runtime override for the waitlist endpoint.
pub const ENDPOINT_ENV_VAR: &str = "CONVEX_URL";

/// Endpoint captured from `CONVEX_URL` when the binary was built.
pub const BUILD_TIME_ENDPOINT: Option<&str> = option_env!("CONVEX_URL");

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error("invalid endpoint URL {url:?}: {reason}")]
    Invalid { url: String, reason: String },
    #[error("endpoint URL must use http or https, got {scheme:?}")]
    UnsupportedScheme { scheme: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSource {
    Environment,
    ConfigFile,
    BuildTime,
    Unset,
}

impl EndpointSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Environment => "environment (CONVEX_URL)",
            Self::ConfigFile => "config file",
            Self::BuildTime => "build time (CONVEX_URL)",
            Self::Unset => "unset",
        }
    }
}

impl fmt::Display for EndpointSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The endpoint the waitlist collaborator talks to, and where it came from.
///
/// An empty URL means submissions are only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub url: String,
    pub source: EndpointSource,
}

impl ResolvedEndpoint {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }

    /// First non-blank candidate wins: environment, config file, build time.
    #[must_use]
    pub fn from_candidates(
        environment: Option<&str>,
        config_file: Option<&str>,
        build_time: Option<&str>,
    ) -> Self {
        [
            (environment, EndpointSource::Environment),
            (config_file, EndpointSource::ConfigFile),
            (build_time, EndpointSource::BuildTime),
        ]
        .into_iter()
        .find_map(|(candidate, source)| {
            let url = candidate?.trim();
            (!url.is_empty()).then(|| Self {
                url: url.trim_end_matches('/').to_string(),
                source,
            })
        })
        .unwrap_or(Self {
            url: String::new(),
            source: EndpointSource::Unset,
        })
    }
}

#[must_use]
pub fn resolve_endpoint(config: Option<&AnoraConfig>) -> ResolvedEndpoint {
    let environment = std::env::var(ENDPOINT_ENV_VAR).ok();
    ResolvedEndpoint::from_candidates(
        environment.as_deref(),
        config.and_then(AnoraConfig::convex_url),
        BUILD_TIME_ENDPOINT,
    )
}

/// Accepts absolute http(s) URLs and returns them without a trailing slash.
pub fn validate_endpoint(raw: &str) -> Result<String, EndpointError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| EndpointError::Invalid {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(EndpointError::UnsupportedScheme {
                scheme: other.to_string(),
            });
        }
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(EndpointError::Invalid {
            url: trimmed.to_string(),
            reason: "missing host".to_string(),
        });
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Write `[waitlist] convex_url` into the config file at `path`.
///
/// Uses `toml_edit` so comments and unrelated settings survive. Creates the file
/// and its parent directory when missing. Returns the normalized URL.
pub fn persist_endpoint(path: &Path, raw_url: &str) -> Result<String, ConfigError> {
    let url = validate_endpoint(raw_url)?;

    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(write_err)?;

    let content = if path.exists() {
        fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        String::new()
    };

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|source| ConfigError::Edit {
            path: path.to_path_buf(),
            source,
        })?;

    let waitlist = doc
        .entry("waitlist")
        .or_insert(toml_edit::table())
        .as_table_like_mut()
        .ok_or_else(|| ConfigError::NotATable {
            path: path.to_path_buf(),
            key: "waitlist",
        })?;
    waitlist.insert("convex_url", toml_edit::value(url.as_str()));

    let mut tmp = NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(doc.to_string().as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    tracing::info!(path = %path.display(), endpoint = %url, "Persisted waitlist endpoint");
    Ok(url)
}
