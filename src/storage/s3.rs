//! S3 tag store backed by `aws-sdk-s3`.

use async_trait::async_trait;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::Client;

use super::{StorageError, TagStore};
use crate::config::StorageConfig;
use crate::scan::Tag;

const GET_OBJECT_TAGGING: &str = "GetObjectTagging";

/// Provider name reported by the SDK for credentials taken from our config
const STATIC_PROVIDER_NAME: &str = "scanwatch-config";

/// Reads object tags from a single S3 bucket.
#[derive(Clone, Debug)]
pub struct S3TagStore {
    client: Client,
    bucket: String,
}

impl S3TagStore {
    /// Wrap an already configured client.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build the SDK client from configuration.
    ///
    /// Region and credentials from `config` take precedence; anything left unset
    /// falls through to the SDK's default provider chain.
    pub async fn connect(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }

        if let Some(creds) = &config.credentials {
            loader = loader.credentials_provider(Credentials::new(
                creds.access_key_id.clone(),
                creds.secret_access_key.clone(),
                creds.session_token.clone(),
                None,
                STATIC_PROVIDER_NAME,
            ));
        }

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint.clone());
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        Self::new(Client::from_conf(s3_config), config.bucket.clone())
    }
}

#[async_trait]
impl TagStore for S3TagStore {
    #[tracing::instrument(name = "s3::object_tags", skip(self), fields(bucket = %self.bucket))]
    async fn object_tags(&self, key: &str) -> Result<Vec<Tag>, StorageError> {
        let output = self
            .client
            .get_object_tagging()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(key, e))?;

        let tags = convert_tag_set(output.tag_set());
        tracing::debug!(count = tags.len(), "Fetched object tags");
        Ok(tags)
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}

fn convert_tag_set(tag_set: &[aws_sdk_s3::types::Tag]) -> Vec<Tag> {
    tag_set
        .iter()
        .map(|t| Tag::new(t.key(), t.value()))
        .collect()
}

fn map_sdk_error<E, R>(key: &str, err: SdkError<E, R>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err
        .as_service_error()
        .and_then(|se| se.code())
        .map(str::to_string);

    match code {
        Some(code) => StorageError::Service {
            operation: GET_OBJECT_TAGGING,
            key: key.to_string(),
            code,
            message: DisplayErrorContext(&err).to_string(),
        },
        None => StorageError::Request {
            operation: GET_OBJECT_TAGGING,
            key: key.to_string(),
            message: DisplayErrorContext(&err).to_string(),
        },
    }
}
