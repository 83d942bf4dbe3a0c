//! [`ObjectStore`] backed by Amazon S3

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    operation::get_object::GetObjectError,
    Client,
};
use tracing::debug;

use crate::{
    config::FetchConfig,
    store::{FetchOutcome, ObjectStore},
};

pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        S3Store { client }
    }

    /// Build a client from the default credential and region chains,
    /// honoring the configured region override.
    pub async fn from_config(config: &FetchConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared_config = loader.load().await;
        S3Store::new(Client::new(&shared_config))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get_object(&self, bucket: Option<&str>, key: Option<&str>) -> FetchOutcome {
        debug!(?bucket, ?key, "requesting object");
        let result = self
            .client
            .get_object()
            .set_bucket(bucket.map(str::to_owned))
            .set_key(key.map(str::to_owned))
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => return classify(err),
        };

        let content_type = output.content_type().map(str::to_owned);
        match output.body.collect().await {
            Ok(data) => FetchOutcome::Found {
                bytes: data.into_bytes(),
                content_type,
            },
            Err(err) => FetchOutcome::OtherError(DisplayErrorContext(&err).to_string()),
        }
    }
}

fn classify(err: SdkError<GetObjectError>) -> FetchOutcome {
    match err.as_service_error() {
        Some(service) if service.is_no_such_key() => FetchOutcome::NotFound,
        Some(service) => FetchOutcome::ServiceError(
            service
                .message()
                .map(str::to_owned)
                .unwrap_or_else(|| service.to_string()),
        ),
        None => FetchOutcome::OtherError(DisplayErrorContext(&err).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::{
        config::{Credentials, Region},
        error::ErrorMetadata,
        types::error::NoSuchKey,
        Config,
    };
    use aws_smithy_runtime_api::http::{Response as HttpResponse, StatusCode};
    use aws_smithy_types::body::SdkBody;
    use std::convert::TryFrom;

    fn raw(status: u16) -> HttpResponse {
        HttpResponse::new(StatusCode::try_from(status).expect("valid status"), SdkBody::empty())
    }

    // never reaches the network: requests without a key fail while being built
    fn offline_store() -> S3Store {
        let config = Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("AKIDEXAMPLE", "secret", None, None, "test"))
            .build();
        S3Store::new(Client::from_conf(config))
    }

    #[test]
    fn no_such_key_is_not_found() {
        let err: SdkError<GetObjectError> = SdkError::service_error(GetObjectError::NoSuchKey(NoSuchKey::builder().build()), raw(404));
        assert_eq!(classify(err), FetchOutcome::NotFound);
    }

    #[test]
    fn other_service_errors_keep_their_message() {
        let err: SdkError<GetObjectError> = SdkError::service_error(
            GetObjectError::generic(
                ErrorMetadata::builder()
                    .code("AccessDenied")
                    .message("Access Denied")
                    .build(),
            ),
            raw(403),
        );
        assert_eq!(classify(err), FetchOutcome::ServiceError("Access Denied".to_string()));
    }

    #[test]
    fn construction_failures_are_unclassified() {
        let err: SdkError<GetObjectError> = SdkError::construction_failure("key cannot be empty or unset");
        match classify(err) {
            FetchOutcome::OtherError(detail) => assert!(detail.contains("key cannot be empty")),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_key_is_rejected_before_sending() {
        let outcome = offline_store().get_object(Some("assets"), None).await;
        assert!(matches!(outcome, FetchOutcome::OtherError(_)), "{:?}", outcome);
    }
}
