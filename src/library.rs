//! Photo library persistence with a permission gate.
//!
//! Saving is a linear sequence: ask for authorization, then (only if granted)
//! write. Every path ends in a user-facing status message; nothing here is
//! fatal to the caller.
//!
//! | Authorization | Result |
//! |---|---|
//! | authorized, limited | write the photo |
//! | denied, restricted | [`MSG_ACCESS_DENIED`] |
//! | not determined | [`MSG_NOT_DETERMINED`] |
//! | anything else | [`MSG_ACCESS_ERROR`] |
//!
//! The production library is [`DirectoryLibrary`]: a directory on disk whose
//! assets are named by a content hash of the encoded bytes, so saving the same
//! photo twice yields the same asset.

use crate::imaging::{ImageBackend, OutputFormat, Quality};
use image::RgbaImage;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

pub const MSG_ACCESS_DENIED: &str = "Photo library access denied. Please enable it in Settings.";
pub const MSG_NOT_DETERMINED: &str = "Photo library access not determined.";
pub const MSG_ACCESS_ERROR: &str = "Photo library access error.";
pub const MSG_SAVED: &str = "Photo saved to your photo library!";

/// Number of hex characters of the SHA-256 used as an asset id.
const ASSET_ID_LEN: usize = 16;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Encode(#[from] crate::imaging::BackendError),
}

/// Authorization states of a photo library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorizationStatus {
    Authorized,
    Limited,
    Denied,
    Restricted,
    NotDetermined,
    /// A state this build does not know about.
    #[serde(other)]
    Unknown,
}

impl AuthorizationStatus {
    pub fn allows_write(self) -> bool {
        matches!(
            self,
            AuthorizationStatus::Authorized | AuthorizationStatus::Limited
        )
    }

    /// Message shown when this status blocks a save.
    pub fn denial_message(self) -> Option<&'static str> {
        match self {
            AuthorizationStatus::Authorized | AuthorizationStatus::Limited => None,
            AuthorizationStatus::Denied | AuthorizationStatus::Restricted => {
                Some(MSG_ACCESS_DENIED)
            }
            AuthorizationStatus::NotDetermined => Some(MSG_NOT_DETERMINED),
            AuthorizationStatus::Unknown => Some(MSG_ACCESS_ERROR),
        }
    }
}

/// A written asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedAsset {
    pub id: String,
    pub path: PathBuf,
}

/// Outcome of a save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(SavedAsset),
    /// Permission was not granted; no write was attempted.
    NotPermitted(AuthorizationStatus),
    /// The write was attempted and failed.
    Failed(Option<String>),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }

    /// The status message to show the user.
    pub fn message(&self) -> String {
        match self {
            SaveOutcome::Saved(_) => MSG_SAVED.to_string(),
            SaveOutcome::NotPermitted(status) => status
                .denial_message()
                .unwrap_or(MSG_ACCESS_ERROR)
                .to_string(),
            SaveOutcome::Failed(description) => format!(
                "Failed to save photo: {}",
                description.as_deref().unwrap_or("Unknown error")
            ),
        }
    }
}

impl fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// A place photos can be written to, behind an authorization check.
pub trait PhotoLibrary {
    /// Ask for add-only access. May prompt (e.g. create the library).
    fn request_authorization(&self) -> AuthorizationStatus;

    /// Write one photo. Only called after authorization allowed it.
    fn perform_save(&self, image: &RgbaImage) -> Result<SavedAsset, LibraryError>;
}

/// Request authorization, then write if allowed.
pub fn save_photo(library: &impl PhotoLibrary, image: &RgbaImage) -> SaveOutcome {
    let status = library.request_authorization();
    debug!("photo library authorization: {status:?}");
    if !status.allows_write() {
        warn!("save blocked: {status:?}");
        return SaveOutcome::NotPermitted(status);
    }

    match library.perform_save(image) {
        Ok(asset) => {
            info!("saved {}", asset.path.display());
            SaveOutcome::Saved(asset)
        }
        Err(e) => {
            warn!("save failed: {e}");
            SaveOutcome::Failed(Some(e.to_string()))
        }
    }
}

/// Settings for a [`DirectoryLibrary`].
#[derive(Debug, Clone)]
pub struct DirectoryLibraryOptions {
    pub format: OutputFormat,
    pub quality: Quality,
    pub create_if_missing: bool,
    /// Fixed answer to authorization requests, bypassing the filesystem probe.
    pub access: Option<AuthorizationStatus>,
}

impl Default for DirectoryLibraryOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            quality: Quality::default(),
            create_if_missing: true,
            access: None,
        }
    }
}

/// A photo library stored as a flat directory of encoded images.
pub struct DirectoryLibrary<B: ImageBackend> {
    root: PathBuf,
    backend: B,
    options: DirectoryLibraryOptions,
}

impl<B: ImageBackend> DirectoryLibrary<B> {
    pub fn new(root: impl Into<PathBuf>, backend: B, options: DirectoryLibraryOptions) -> Self {
        Self {
            root: root.into(),
            backend,
            options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Saved assets, sorted by file name.
    pub fn assets(&self) -> Result<Vec<SavedAsset>, LibraryError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut assets = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"))
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !crate::imaging::is_supported_image(path) {
                continue;
            }
            let id = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            assets.push(SavedAsset {
                id,
                path: path.to_path_buf(),
            });
        }
        Ok(assets)
    }

    fn probe(&self) -> AuthorizationStatus {
        match std::fs::metadata(&self.root) {
            Ok(meta) if !meta.is_dir() => AuthorizationStatus::Unknown,
            Ok(meta) if meta.permissions().readonly() => AuthorizationStatus::Denied,
            Ok(_) => AuthorizationStatus::Authorized,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if !self.options.create_if_missing {
                    return AuthorizationStatus::NotDetermined;
                }
                match std::fs::create_dir_all(&self.root) {
                    Ok(()) => AuthorizationStatus::Authorized,
                    Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                        AuthorizationStatus::Denied
                    }
                    Err(_) => AuthorizationStatus::Unknown,
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                AuthorizationStatus::Denied
            }
            Err(_) => AuthorizationStatus::Unknown,
        }
    }
}

/// First [`ASSET_ID_LEN`] hex chars of the SHA-256 of `bytes`.
pub fn asset_id(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..ASSET_ID_LEN].to_string()
}

impl<B: ImageBackend> PhotoLibrary for DirectoryLibrary<B> {
    fn request_authorization(&self) -> AuthorizationStatus {
        self.options.access.unwrap_or_else(|| self.probe())
    }

    fn perform_save(&self, image: &RgbaImage) -> Result<SavedAsset, LibraryError> {
        let bytes = self
            .backend
            .encode(image, self.options.format, self.options.quality)?;
        let id = asset_id(&bytes);
        let path = self
            .root
            .join(format!("{id}.{}", self.options.format.extension()));
        std::fs::write(&path, &bytes)?;
        Ok(SavedAsset { id, path })
    }
}
