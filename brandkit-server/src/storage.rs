//! S3 object storage for logos and generated assets

use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use thiserror::Error;
use uuid::Uuid;

/// S3 user metadata is sent as headers; keep values short and ASCII.
const MAX_METADATA_CHARS: usize = 1024;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload of {key} failed: {message}")]
    PutFailed { key: String, message: String },
}

/// Where an uploaded object ended up
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StoredObject {
    pub url: String,
    pub key: String,
    pub bucket: String,
}

#[derive(Clone)]
pub struct Storage {
    client: S3Client,
    bucket: String,
    public_base_url: String,
}

/// `logos/{millis}-{random}{ext}`; `ext` includes the leading dot
pub fn logo_key(millis: i64, suffix: u32, ext: &str) -> String {
    format!("logos/{millis}-{suffix}{ext}")
}

/// `marketing-assets/{uuid}.png`
pub fn generated_key(id: Uuid) -> String {
    format!("marketing-assets/{id}.png")
}

fn metadata_value(value: &str) -> String {
    value
        .chars()
        .take(MAX_METADATA_CHARS)
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

impl Storage {
    /// `public_base_url` defaults to the bucket's virtual-hosted S3 endpoint.
    pub fn new(
        client: S3Client,
        bucket: impl Into<String>,
        region: Option<&str>,
        public_base_url: Option<String>,
    ) -> Self {
        let bucket = bucket.into();
        let public_base_url = public_base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| match region {
                Some(region) => format!("https://{bucket}.s3.{region}.amazonaws.com"),
                None => format!("https://{bucket}.s3.amazonaws.com"),
            });
        Self {
            client,
            bucket,
            public_base_url,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }

    async fn put(
        &self,
        key: String,
        body: Vec<u8>,
        content_type: &str,
        metadata: &[(&str, String)],
    ) -> Result<StoredObject, StorageError> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type(content_type);
        for (name, value) in metadata {
            request = request.metadata(*name, metadata_value(value));
        }

        request.send().await.map_err(|e| StorageError::PutFailed {
            key: key.clone(),
            message: DisplayErrorContext(&e).to_string(),
        })?;

        tracing::info!(bucket = %self.bucket, key = %key, "Object uploaded to S3");

        Ok(StoredObject {
            url: self.public_url(&key),
            bucket: self.bucket.clone(),
            key,
        })
    }

    /// Store a brand logo; `ext` is the lowercased extension with its dot
    pub async fn upload_logo(
        &self,
        body: Vec<u8>,
        ext: &str,
        content_type: &str,
        original_name: &str,
    ) -> Result<StoredObject, StorageError> {
        let key = logo_key(
            shared::util::now_millis(),
            crate::util::random_suffix(),
            ext,
        );
        self.put(
            key,
            body,
            content_type,
            &[("original-name", original_name.to_string())],
        )
        .await
    }

    /// Store a generated PNG with its prompt as metadata
    pub async fn upload_generated(
        &self,
        body: Vec<u8>,
        prompt: &str,
    ) -> Result<StoredObject, StorageError> {
        let key = generated_key(Uuid::new_v4());
        self.put(
            key,
            body,
            "image/png",
            &[
                ("prompt", prompt.to_string()),
                ("generated-at", chrono::Utc::now().to_rfc3339()),
            ],
        )
        .await
    }
}

#[cfg(test)]
pub(crate) fn test_storage(public_base_url: Option<String>) -> Storage {
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
        .region(aws_sdk_s3::config::Region::new("us-east-1"))
        .build();
    Storage::new(
        S3Client::from_conf(config),
        "brandkit-test",
        Some("us-east-1"),
        public_base_url,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(logo_key(1700000000000, 42, ".png"), "logos/1700000000000-42.png");
        let id = Uuid::nil();
        assert_eq!(
            generated_key(id),
            "marketing-assets/00000000-0000-0000-0000-000000000000.png"
        );
    }

    #[test]
    fn test_public_url_defaults_to_bucket_endpoint() {
        let storage = test_storage(None);
        assert_eq!(
            storage.public_url("logos/a.png"),
            "https://brandkit-test.s3.us-east-1.amazonaws.com/logos/a.png"
        );
        assert_eq!(storage.bucket(), "brandkit-test");
    }

    #[test]
    fn test_public_url_override() {
        let storage = test_storage(Some("https://cdn.example.com/".into()));
        assert_eq!(
            storage.public_url("logos/a.png"),
            "https://cdn.example.com/logos/a.png"
        );
    }

    #[test]
    fn test_metadata_value_is_ascii() {
        assert_eq!(metadata_value("café\nbar"), "caf??bar");
        assert_eq!(metadata_value(&"x".repeat(5000)).len(), MAX_METADATA_CHARS);
    }
}
