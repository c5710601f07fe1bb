use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use url::Url;

use crate::error::AppError;
use crate::ports::{SoundStorage, UploadFile};

/// Route prefix under which bucket objects are served.
pub const PUBLIC_OBJECT_PREFIX: &str = "/storage/v1/object/public";

/// Namespace holding curated clips. Objects under it are never deleted.
pub const SHARED_NAMESPACE: &str = "shared";

pub const ALLOWED_AUDIO_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/x-wav",
    "audio/wave",
    "audio/ogg",
    "audio/webm",
    "audio/aac",
    "audio/mp4",
    "audio/x-m4a",
    "audio/flac",
];

/// Object path relative to `bucket` for a URL shaped like
/// `.../public/<bucket>/<namespace>/<path>`.
///
/// Returns `Ok(None)` for well-formed URLs that don't follow that layout.
pub fn object_path_in_bucket(public_url: &str, bucket: &str) -> Result<Option<String>, AppError> {
    let parsed = Url::parse(public_url)
        .map_err(|e| AppError::BadRequest(format!("malformed storage url {public_url:?}: {e}")))?;
    let marker = format!("/public/{bucket}/");
    Ok(parsed
        .path()
        .split_once(&marker)
        .map(|(_, rest)| rest.to_string())
        .filter(|rest| !rest.is_empty()))
}

/// First segment of an object path, the namespace that owns it.
pub fn object_namespace(object_path: &str) -> &str {
    object_path.split('/').next().unwrap_or(object_path)
}

pub fn is_shared_object(object_path: &str) -> bool {
    object_namespace(object_path) == SHARED_NAMESPACE
}

/// Namespace a user's uploads are stored under.
pub fn user_namespace(user_id: &str) -> String {
    sanitize_segment(user_id)
}

/// Whether `object_path` lives in `user_id`'s own namespace.
pub fn is_owned_object(object_path: &str, user_id: &str) -> bool {
    object_namespace(object_path) == user_namespace(user_id)
}

/// Public URL of an object in the shared namespace.
pub fn shared_object_url(public_url: &str, bucket: &str, file_name: &str) -> String {
    format!("{public_url}{PUBLIC_OBJECT_PREFIX}/{bucket}/{SHARED_NAMESPACE}/{file_name}")
}

pub fn is_allowed_audio_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase();
    ALLOWED_AUDIO_TYPES.contains(&essence.as_str())
}

/// Keep names URL- and filesystem-safe so a published URL maps straight
/// back to its file.
fn sanitize_segment(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "sound".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Bucket kept on the local filesystem at `<root>/<bucket>/<namespace>/<file>`.
#[derive(Debug, Clone)]
pub struct LocalSoundStorage {
    root: PathBuf,
    bucket: String,
    public_url: String,
}

impl LocalSoundStorage {
    pub fn new(root: impl Into<PathBuf>, bucket: &str, public_url: &str) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.to_string(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the bucket and shared namespace directories.
    pub async fn ensure_layout(&self) -> Result<(), AppError> {
        let dir = self.root.join(&self.bucket).join(SHARED_NAMESPACE);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(format!("failed to create storage directory: {e}")))
    }

    fn resolve(&self, object_path: &str) -> Result<PathBuf, AppError> {
        let relative = Path::new(object_path);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AppError::BadRequest(format!(
                "invalid object path: {object_path}"
            )));
        }
        Ok(self.root.join(&self.bucket).join(relative))
    }
}

#[async_trait]
impl SoundStorage for LocalSoundStorage {
    async fn upload_and_get_public_url(
        &self,
        user_id: &str,
        file: &UploadFile,
    ) -> Result<String, AppError> {
        let namespace = user_namespace(user_id);
        let dir = self.root.join(&self.bucket).join(&namespace);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(format!("failed to create sounds directory: {e}")))?;

        let prefix = uuid::Uuid::new_v4().simple().to_string();
        let filename = format!("{}-{}", &prefix[..8], sanitize_segment(&file.name));
        tokio::fs::write(dir.join(&filename), &file.bytes)
            .await
            .map_err(|e| AppError::Internal(format!("failed to write sound file: {e}")))?;

        tracing::debug!(user_id, filename = %filename, size = file.size(), "stored sound object");
        Ok(format!(
            "{}{PUBLIC_OBJECT_PREFIX}/{}/{namespace}/{filename}",
            self.public_url, self.bucket
        ))
    }

    async fn remove_by_public_url(&self, public_url: &str) -> Result<(), AppError> {
        let object_path = object_path_in_bucket(public_url, &self.bucket)?.ok_or_else(|| {
            AppError::BadRequest(format!("url is not in bucket {}: {public_url}", self.bucket))
        })?;
        let file_path = self.resolve(&object_path)?;
        if file_path.exists() {
            tokio::fs::remove_file(&file_path)
                .await
                .map_err(|e| AppError::Internal(format!("failed to delete file: {e}")))?;
        }
        Ok(())
    }
}
