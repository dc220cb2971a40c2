//! Dataset acquisition from the remote host.
//!
//! Authenticates with a username/key pair and downloads a dataset archive,
//! then unpacks it into the raw directory.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use statrefresh::acquire::DatasetClient;
//!
//! let client = DatasetClient::from_env()?;
//! let files = client.fetch_into("owner/slug", Path::new("data/raw"))?;
//! ```

use serde::Deserialize;
use std::env;
use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use crate::config::DEFAULT_API_BASE;
use crate::error::{AcquisitionError, AcquisitionResult};
use crate::logs::{log_info, log_success};

pub const USERNAME_VAR: &str = "KAGGLE_USERNAME";
pub const KEY_VAR: &str = "KAGGLE_KEY";

/// Username/key pair for the dataset host.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("key", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            key: key.into(),
        }
    }

    /// Read a `kaggle.json` style credentials file.
    pub fn from_file(path: &Path) -> AcquisitionResult<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| AcquisitionError::InvalidCredentials {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve credentials: both environment values win, otherwise
    /// `<home>/.kaggle/kaggle.json` is read if it exists.
    pub fn resolve(
        env_username: Option<String>,
        env_key: Option<String>,
        home: Option<&Path>,
    ) -> AcquisitionResult<Self> {
        if let (Some(username), Some(key)) = (env_username, env_key) {
            if !username.is_empty() && !key.is_empty() {
                return Ok(Self::new(username, key));
            }
        }

        if let Some(home) = home {
            let path = home.join(".kaggle").join("kaggle.json");
            if path.is_file() {
                return Self::from_file(&path);
            }
        }

        Err(AcquisitionError::MissingCredentials(format!(
            "set {} and {} or provide ~/.kaggle/kaggle.json",
            USERNAME_VAR, KEY_VAR
        )))
    }

    /// Resolve from the process environment (a `.env` file is honored).
    pub fn from_env() -> AcquisitionResult<Self> {
        let _ = dotenvy::dotenv();

        let home = env::var_os("HOME")
            .or_else(|| env::var_os("USERPROFILE"))
            .map(PathBuf::from);
        Self::resolve(env::var(USERNAME_VAR).ok(), env::var(KEY_VAR).ok(), home.as_deref())
    }
}

/// Host error response body
#[derive(Debug, Deserialize)]
struct HostError {
    message: String,
}

/// Blocking client for the dataset host
#[derive(Clone)]
pub struct DatasetClient {
    credentials: Credentials,
    api_base: String,
    http: reqwest::blocking::Client,
}

impl DatasetClient {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_base: DEFAULT_API_BASE.to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    pub fn from_env() -> AcquisitionResult<Self> {
        Ok(Self::new(Credentials::from_env()?))
    }

    /// Point the client at another API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn download_url(&self, dataset_id: &str) -> String {
        format!(
            "{}/datasets/download/{}",
            self.api_base.trim_end_matches('/'),
            dataset_id.trim_matches('/')
        )
    }

    /// Download the dataset archive bytes.
    pub fn download_archive(&self, dataset_id: &str) -> AcquisitionResult<Vec<u8>> {
        let url = self.download_url(dataset_id);
        log_info(format!("Downloading dataset '{}'", dataset_id));

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.key))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<HostError>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(AcquisitionError::Status {
                dataset: dataset_id.to_string(),
                status: status.as_u16(),
                body: message,
            });
        }

        let bytes = response.bytes()?;
        log_success(format!("Received {} bytes", bytes.len()));
        Ok(bytes.to_vec())
    }

    /// Download and unpack the dataset into `dest_dir`.
    pub fn fetch_into(&self, dataset_id: &str, dest_dir: &Path) -> AcquisitionResult<Vec<PathBuf>> {
        let bytes = self.download_archive(dataset_id)?;
        let files = unpack_archive(&bytes, dest_dir)?;
        log_success(format!("Unpacked {} files into {}", files.len(), dest_dir.display()));
        Ok(files)
    }
}

/// Extract a zip archive into `dest_dir`, returning the written file paths.
///
/// Entries whose names would land outside `dest_dir` are rejected.
pub fn unpack_archive(bytes: &[u8], dest_dir: &Path) -> AcquisitionResult<Vec<PathBuf>> {
    fs::create_dir_all(dest_dir)?;

    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut written = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| AcquisitionError::UnsafeEntry(entry.name().to_string()))?;
        let target = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        written.push(target);
    }

    Ok(written)
}
