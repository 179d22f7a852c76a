// Storage layer (S3-compatible)
//
// Clients never receive credentials: they ask for a presigned PUT URL for a
// server-generated key and upload straight to the bucket. Nothing here checks
// that the upload ever happens.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::types::{AppError, AppResult};

pub mod s3_client;

pub use s3_client::*;

/// Signs a single-object write for an exact key.
#[async_trait]
pub trait ObjectSigner: Send + Sync {
    async fn presign_put(&self, key: &str, expiry_secs: u32) -> AppResult<String>;
}

/// A signed URL and the key it is scoped to.
#[derive(Debug, Clone)]
pub struct IssuedUpload {
    pub url: String,
    pub key: String,
}

pub struct UploadUrlIssuer {
    signer: Arc<dyn ObjectSigner>,
    allowed_extensions: Vec<String>,
    expiry_secs: u32,
}

impl UploadUrlIssuer {
    pub fn new(
        signer: Arc<dyn ObjectSigner>,
        allowed_extensions: Vec<String>,
        expiry_secs: u32,
    ) -> Self {
        Self { signer, allowed_extensions, expiry_secs }
    }

    pub fn from_config(signer: Arc<dyn ObjectSigner>, config: &StorageConfig) -> Self {
        Self::new(
            signer,
            config.allowed_extensions.clone(),
            config.upload_url_expiry_secs,
        )
    }

    /// Generates `<uuid>.<ext>` for the given media-type hint and signs a PUT
    /// URL for it.
    pub async fn issue(&self, mime_hint: &str) -> AppResult<IssuedUpload> {
        let extension = self.resolve_extension(mime_hint)?;
        let key = generate_key(&extension);
        let url = self.signer.presign_put(&key, self.expiry_secs).await?;

        debug!("Issued upload URL for {} (expires in {}s)", key, self.expiry_secs);
        Ok(IssuedUpload { url, key })
    }

    fn resolve_extension(&self, mime_hint: &str) -> AppResult<String> {
        let extension = normalize_extension(mime_hint).ok_or_else(|| {
            AppError::Validation(format!("unrecognised media type: {:?}", mime_hint))
        })?;

        if !self.allowed_extensions.iter().any(|allowed| *allowed == extension) {
            warn!("Rejected upload with extension {:?}", extension);
            return Err(AppError::Validation(format!(
                "file type .{} is not accepted (allowed: {})",
                extension,
                self.allowed_extensions.join(", ")
            )));
        }

        Ok(extension)
    }
}

/// A fresh, globally unique object key.
pub fn generate_key(extension: &str) -> String {
    format!("{}.{}", Uuid::new_v4(), extension)
}

/// Turns a client hint into a bare lower-case extension.
///
/// Accepts either an extension (`png`, `.PNG`) or a full media type
/// (`image/png`), which is mapped through the `mime_guess` table. Anything
/// that is not plain ASCII alphanumerics after normalization is refused so
/// client text never leaks into the key structure.
pub fn normalize_extension(hint: &str) -> Option<String> {
    let hint = hint.trim().to_ascii_lowercase();

    let extension = if hint.contains('/') {
        let media_type: mime::Mime = hint.parse().ok()?;
        canonical_extension(&media_type)?
    } else {
        hint.trim_start_matches('.').to_string()
    };

    if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(extension)
}

fn canonical_extension(media_type: &mime::Mime) -> Option<String> {
    if media_type.type_() == mime::IMAGE && media_type.subtype() == mime::JPEG {
        return Some("jpg".to_string());
    }
    let essence = media_type.essence_str();
    mime_guess::get_mime_extensions_str(essence)?
        .first()
        .map(|ext| ext.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Records the keys it was asked to sign.
    #[derive(Default)]
    struct RecordingSigner {
        keys: Mutex<Vec<(String, u32)>>,
    }

    #[async_trait]
    impl ObjectSigner for RecordingSigner {
        async fn presign_put(&self, key: &str, expiry_secs: u32) -> AppResult<String> {
            self.keys.lock().unwrap().push((key.to_string(), expiry_secs));
            Ok(format!("https://bucket.example.com/{}?X-Amz-Expires={}", key, expiry_secs))
        }
    }

    struct FailingSigner;

    #[async_trait]
    impl ObjectSigner for FailingSigner {
        async fn presign_put(&self, _key: &str, _expiry_secs: u32) -> AppResult<String> {
            Err(AppError::Storage("credentials rejected".into()))
        }
    }

    fn issuer(signer: Arc<dyn ObjectSigner>) -> UploadUrlIssuer {
        UploadUrlIssuer::new(
            signer,
            vec!["jpg".into(), "jpeg".into(), "png".into(), "webp".into()],
            3600,
        )
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("png").as_deref(), Some("png"));
        assert_eq!(normalize_extension(" .PNG ").as_deref(), Some("png"));
        assert_eq!(normalize_extension("image/png").as_deref(), Some("png"));
        assert_eq!(normalize_extension("image/jpeg").as_deref(), Some("jpg"));
        assert_eq!(normalize_extension("../../etc/passwd"), None);
        assert_eq!(normalize_extension("png?x=1"), None);
        assert_eq!(normalize_extension(""), None);
    }

    #[tokio::test]
    async fn test_issue_signs_generated_key() {
        let signer = Arc::new(RecordingSigner::default());
        let issued = issuer(signer.clone()).issue("png").await.unwrap();

        assert!(issued.key.ends_with(".png"));
        let stem = issued.key.trim_end_matches(".png");
        assert!(Uuid::parse_str(stem).is_ok());
        assert!(issued.url.contains(&issued.key));

        let keys = signer.keys.lock().unwrap();
        assert_eq!(keys.as_slice(), &[(issued.key.clone(), 3600)]);
    }

    #[tokio::test]
    async fn test_keys_are_unique() {
        let issuer = issuer(Arc::new(RecordingSigner::default()));
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let issued = issuer.issue("jpg").await.unwrap();
            assert!(seen.insert(issued.key));
        }
    }

    #[tokio::test]
    async fn test_disallowed_extension_is_rejected_before_signing() {
        let signer = Arc::new(RecordingSigner::default());
        let result = issuer(signer.clone()).issue("exe").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(signer.keys.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_signer_failure_is_a_storage_error() {
        let result = issuer(Arc::new(FailingSigner)).issue("png").await;
        assert!(matches!(result, Err(AppError::Storage(_))));
    }
}
