//! Starter pack of clips every new user can be given. The files live in the
//! bucket's shared namespace, so removing one of these sounds never deletes
//! the underlying object.

use std::sync::Arc;

use crate::error::AppError;
use crate::ports::{SoundRepository, StreamDeckKeyRepository};
use crate::services::{new_id, ImportedSound, UploadOutcome, UploadRequest, UploadSound};
use crate::storage::shared_object_url;

pub struct StarterClip {
    pub name: &'static str,
    pub file_name: &'static str,
    pub duration: f64,
}

pub const STARTER_PACK: &[StarterClip] = &[
    StarterClip {
        name: "Glass Break",
        file_name: "glass-break.mp3",
        duration: 3.5,
    },
    StarterClip {
        name: "Cinematic Hit 3",
        file_name: "cinematic-hit-3.mp3",
        duration: 2.8,
    },
    StarterClip {
        name: "Police Siren",
        file_name: "police-siren.mp3",
        duration: 1.2,
    },
];

/// Imports every starter clip the user doesn't already have and gives each
/// one a key. Clips already present (same URL) are skipped.
pub async fn provision_starter_pack(
    sounds: Arc<dyn SoundRepository>,
    keys: Arc<dyn StreamDeckKeyRepository>,
    public_url: &str,
    bucket: &str,
    user_id: &str,
) -> Result<Vec<UploadOutcome>, AppError> {
    let existing = sounds.list_by_user(user_id).await?;
    let upload = UploadSound::new(sounds, keys);

    let mut provisioned = Vec::new();
    for clip in STARTER_PACK {
        let url = shared_object_url(public_url, bucket, clip.file_name);
        if existing.iter().any(|s| s.url() == url) {
            tracing::debug!(user_id, clip = clip.name, "starter clip already present");
            continue;
        }

        let outcome = upload
            .execute(UploadRequest::Record(ImportedSound {
                id: new_id(),
                user_id: user_id.to_string(),
                name: clip.name.to_string(),
                url,
                duration: clip.duration,
            }))
            .await?;
        provisioned.push(outcome);
    }

    tracing::info!(user_id, count = provisioned.len(), "provisioned starter pack");
    Ok(provisioned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemorySoundRepository, InMemoryStreamDeckKeyRepository};
    use crate::storage::{is_shared_object, object_path_in_bucket};

    #[tokio::test]
    async fn test_starter_pack_is_shared_and_idempotent() {
        let sounds = Arc::new(InMemorySoundRepository::new());
        let keys = Arc::new(InMemoryStreamDeckKeyRepository::new());

        let first = provision_starter_pack(
            sounds.clone(),
            keys.clone(),
            "http://localhost:39100",
            "vsd-bucket",
            "u1",
        )
        .await
        .unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].sound.name(), "Glass Break");
        assert_eq!(first[2].sound.duration(), 1.2);

        let positions: Vec<i64> = first.iter().map(|o| o.key.position()).collect();
        assert_eq!(positions, [0, 1, 2]);

        for outcome in &first {
            let path = object_path_in_bucket(outcome.sound.url(), "vsd-bucket")
                .unwrap()
                .unwrap();
            assert!(is_shared_object(&path));
        }

        let second = provision_starter_pack(
            sounds.clone(),
            keys,
            "http://localhost:39100",
            "vsd-bucket",
            "u1",
        )
        .await
        .unwrap();
        assert!(second.is_empty());
        assert_eq!(sounds.len(), 3);
    }
}
