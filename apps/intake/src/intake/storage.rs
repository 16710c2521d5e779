use std::path::{Path, PathBuf};

use anyhow::bail;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

/// URL prefix (and record path prefix) under which stored resumes are served.
pub const UPLOADS_PREFIX: &str = "uploads";

/// A resume type the service knows how to accept.
#[derive(Debug)]
pub struct ResumeType {
    pub extension: &'static str,
    pub mime_types: &'static [&'static str],
}

const KNOWN_TYPES: &[ResumeType] = &[
    ResumeType {
        extension: "pdf",
        mime_types: &["application/pdf"],
    },
    ResumeType {
        extension: "doc",
        mime_types: &["application/msword"],
    },
    ResumeType {
        extension: "docx",
        mime_types: &["application/vnd.openxmlformats-officedocument.wordprocessingml.document"],
    },
];

/// File-type allow-list and size cap for uploaded resumes.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    allowed: Vec<&'static ResumeType>,
    pub max_bytes: usize,
}

impl UploadPolicy {
    /// Builds a policy from configured extensions. Unknown extensions are a
    /// configuration error.
    pub fn new(extensions: &[String], max_bytes: usize) -> anyhow::Result<Self> {
        let mut allowed = Vec::with_capacity(extensions.len());
        for ext in extensions {
            match KNOWN_TYPES.iter().find(|t| t.extension == ext.as_str()) {
                Some(t) => allowed.push(t),
                None => bail!(
                    "unsupported resume type '{ext}'; known types: {}",
                    KNOWN_TYPES
                        .iter()
                        .map(|t| t.extension)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            }
        }
        if allowed.is_empty() {
            bail!("at least one resume type must be allowed");
        }
        Ok(Self { allowed, max_bytes })
    }

    /// Both the extension and the declared content type must belong to the
    /// same allowed type.
    pub fn check_type(&self, file_name: &str, content_type: Option<&str>) -> Result<(), AppError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();
        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_lowercase())
            .unwrap_or_default();

        let accepted = self
            .allowed
            .iter()
            .any(|t| t.extension == extension && t.mime_types.contains(&mime.as_str()));

        if accepted {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Only {} files are allowed!",
                self.describe_allowed()
            )))
        }
    }

    pub fn check_size(&self, size: usize) -> Result<(), AppError> {
        if size > self.max_bytes {
            return Err(AppError::Validation(format!(
                "Resume exceeds the maximum allowed size of {} bytes",
                self.max_bytes
            )));
        }
        Ok(())
    }

    /// ".pdf, .doc, and .docx"
    fn describe_allowed(&self) -> String {
        let names: Vec<String> = self
            .allowed
            .iter()
            .map(|t| format!(".{}", t.extension))
            .collect();
        match names.as_slice() {
            [] => String::new(),
            [one] => one.clone(),
            [a, b] => format!("{a} and {b}"),
            [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
        }
    }
}

/// Reduces an uploaded file name to a safe final path component.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "resume".to_string()
    } else {
        cleaned
    }
}

/// `<unix millis>-<8 hex nonce>-<sanitized name>`
pub fn stored_file_name(original: &str, received_at: DateTime<Utc>, nonce: Uuid) -> String {
    let nonce = nonce.simple().to_string();
    format!(
        "{}-{}-{}",
        received_at.timestamp_millis(),
        &nonce[..8],
        sanitize_file_name(original)
    )
}

pub fn destination_path(
    root: &Path,
    original: &str,
    received_at: DateTime<Utc>,
    nonce: Uuid,
) -> PathBuf {
    root.join(stored_file_name(original, received_at, nonce))
}

#[derive(Debug, Clone)]
pub struct StoredResume {
    /// Location on disk.
    pub path: PathBuf,
    /// Storage-relative path recorded with the application.
    pub resume_path: String,
}

/// Local directory holding uploaded resumes.
#[derive(Debug, Clone)]
pub struct ResumeStorage {
    root: PathBuf,
}

impl ResumeStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the upload directory if it does not exist yet.
    pub async fn ensure_root(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Writes the resume under a fresh name. Never overwrites an existing file.
    pub async fn persist(
        &self,
        original_name: &str,
        contents: &[u8],
        received_at: DateTime<Utc>,
    ) -> Result<StoredResume, AppError> {
        let path = destination_path(&self.root, original_name, received_at, Uuid::new_v4());

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create {}: {e}", path.display())))?;
        file.write_all(contents)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {e}", path.display())))?;
        file.flush()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to flush {}: {e}", path.display())))?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        info!(path = %path.display(), bytes = contents.len(), "Resume saved");

        Ok(StoredResume {
            resume_path: format!("{UPLOADS_PREFIX}/{file_name}"),
            path,
        })
    }
}
