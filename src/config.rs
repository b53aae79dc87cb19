//! Credentials and paths, loaded from `trackline.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::student::fields;

/// Everything the pipeline needs to know about the outside world: API
/// credentials, the roster files, the scan folders, and the cache documents.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub api: ApiCredentials,
    pub roster: RosterConfig,
    pub folders: FolderConfig,
    pub caches: CacheConfig,
    /// Template copied for each new assessment.
    pub assessment_template: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCredentials {
    pub geoclient: GeoclientCredentials,
    pub open_data: OpenDataCredentials,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoclientCredentials {
    pub app_id: String,
    pub secret_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenDataCredentials {
    pub app_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterConfig {
    /// The roster CSV.
    pub sheet: PathBuf,
    /// The TOML sidecar naming its columns.
    pub columns: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FolderConfig {
    pub assessments: PathBuf,
    pub photo_id: PathBuf,
    pub completion_certificate: PathBuf,
    pub osha30_card: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub photo_id: PathBuf,
    pub completion_certificate: PathBuf,
    pub osha30_card: PathBuf,
}

impl Credentials {
    /// Load credentials from an explicit path, or from `trackline.toml` in
    /// the user's config directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_config_path(),
        };
        if !path.exists() {
            return Err(AppError::MissingConfig(path));
        }
        let content = fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }
}

fn default_config_path() -> PathBuf {
    ProjectDirs::from("", "", "trackline")
        .map(|dirs| dirs.config_dir().join("trackline.toml"))
        .unwrap_or_else(|| PathBuf::from("trackline.toml"))
}

/// The three scan folders students hand documents into, each with its roster
/// column and its cache document.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StudentFolder {
    PhotoId,
    CompletionCertificate,
    Osha30Card,
}

impl StudentFolder {
    pub const ALL: [StudentFolder; 3] = [
        StudentFolder::PhotoId,
        StudentFolder::CompletionCertificate,
        StudentFolder::Osha30Card,
    ];

    pub fn parse(name: &str) -> Option<StudentFolder> {
        match name {
            "photo-id" => Some(StudentFolder::PhotoId),
            "completion-certificate" => Some(StudentFolder::CompletionCertificate),
            "osha30-card" => Some(StudentFolder::Osha30Card),
            _ => None,
        }
    }

    /// The roster column this folder's links live in.
    pub fn field(self) -> &'static str {
        match self {
            StudentFolder::PhotoId => fields::PHOTO_ID,
            StudentFolder::CompletionCertificate => fields::COMPLETION_CERTIFICATE,
            StudentFolder::Osha30Card => fields::OSHA30_CARD,
        }
    }

    pub fn dir(self, creds: &Credentials) -> &Path {
        match self {
            StudentFolder::PhotoId => &creds.folders.photo_id,
            StudentFolder::CompletionCertificate => &creds.folders.completion_certificate,
            StudentFolder::Osha30Card => &creds.folders.osha30_card,
        }
    }

    pub fn cache_path(self, creds: &Credentials) -> &Path {
        match self {
            StudentFolder::PhotoId => &creds.caches.photo_id,
            StudentFolder::CompletionCertificate => &creds.caches.completion_certificate,
            StudentFolder::Osha30Card => &creds.caches.osha30_card,
        }
    }
}
