// S3 presigning via rust-s3

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::region::Region;
use s3::Bucket;
use tracing::{error, info};

use super::ObjectSigner;
use crate::config::StorageConfig;
use crate::types::{AppError, AppResult};

pub struct S3Signer {
    bucket: Bucket,
}

impl S3Signer {
    pub fn new(config: &StorageConfig) -> AppResult<Self> {
        let region = match &config.s3_endpoint {
            Some(endpoint) => Region::Custom {
                region: config.s3_region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config.s3_region.parse::<Region>().map_err(|e| {
                AppError::Config(format!("invalid S3 region {:?}: {}", config.s3_region, e))
            })?,
        };

        // Without explicit keys rust-s3 falls back to its own provider chain.
        let credentials = Credentials::new(
            config.s3_access_key_id.as_deref(),
            config.s3_secret_access_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Config(format!("invalid S3 credentials: {}", e)))?;

        let mut bucket = Bucket::new(&config.s3_bucket, region, credentials)
            .map_err(|e| AppError::Config(format!("invalid S3 bucket: {}", e)))?;

        if config.s3_path_style {
            bucket = bucket.with_path_style();
        }

        info!("S3 signer ready for bucket {}", config.s3_bucket);
        Ok(Self { bucket })
    }
}

#[async_trait]
impl ObjectSigner for S3Signer {
    async fn presign_put(&self, key: &str, expiry_secs: u32) -> AppResult<String> {
        self.bucket
            .presign_put(key, expiry_secs, None)
            .await
            .map_err(|e| {
                error!("Failed to presign PUT for {}: {}", key, e);
                AppError::Storage(e.to_string())
            })
    }
}
