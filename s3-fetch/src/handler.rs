use std::sync::Arc;

use bytes::Bytes;
use http::{header::CONTENT_TYPE, StatusCode};
use proxy_http::{Body, ProxyRequest, ProxyResponse, RequestOrigin, Response};
use tracing::{error, info};

use crate::{
    config::FetchConfig,
    error::FetchError,
    store::{FetchOutcome, ObjectStore},
};

/// Path parameter naming the object to serve
pub const OBJECT_KEY_PARAM: &str = "objectKey";
/// Content type used when the store does not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
/// Content type of the fallback document
pub const FALLBACK_CONTENT_TYPE: &str = "text/html";
/// Served whenever the object cannot be retrieved
pub const FALLBACK_HTML: &str =
    "<!DOCTYPE html><html><head><title>403</title></head><body><h1>403 Forbidden</h1></body></html>";
/// Body of the 500 response
pub const INTERNAL_ERROR_BODY: &str = r#"{"error":"Internal server error"}"#;

/// Serves objects from a bucket through API Gateway.
///
/// The store is shared between invocations; nothing else outlives a call to
/// [`handle`](FetchHandler::handle).
pub struct FetchHandler {
    config: FetchConfig,
    store: Arc<dyn ObjectStore>,
}

impl FetchHandler {
    pub fn new(config: FetchConfig, store: Arc<dyn ObjectStore>) -> Self {
        FetchHandler { config, store }
    }

    /// Fetch the object named by the `objectKey` path parameter.
    ///
    /// Never fails: storage failures become a 403 with the fallback
    /// document, anything else becomes a 500 with a JSON error body.
    pub async fn handle(&self, request: ProxyRequest) -> ProxyResponse {
        let origin = request.request_origin();
        match self.try_handle(&request).await {
            Ok(response) => ProxyResponse::from_response(origin, response),
            Err(err) => {
                error!(error = %err, "unexpected error while serving object");
                internal_error(origin)
            }
        }
    }

    async fn try_handle(&self, request: &ProxyRequest) -> Result<Response<Body>, FetchError> {
        let mut status = StatusCode::OK;
        let mut body = Bytes::from_static(FALLBACK_HTML.as_bytes());
        let mut content_type = DEFAULT_CONTENT_TYPE.to_string();

        let key = request.path_parameter(OBJECT_KEY_PARAM);
        let bucket = self.config.bucket.as_deref();

        let mut fetched = false;
        match self.store.get_object(bucket, key).await {
            FetchOutcome::Found {
                bytes,
                content_type: declared,
            } => {
                fetched = true;
                body = bytes;
                if let Some(declared) = declared {
                    content_type = declared;
                }
            }
            FetchOutcome::NotFound => info!(?bucket, ?key, "object does not exist in bucket"),
            FetchOutcome::ServiceError(message) => error!(%message, "S3 service error"),
            FetchOutcome::OtherError(detail) => error!(%detail, "unexpected error fetching object"),
        }

        if !fetched {
            status = StatusCode::FORBIDDEN;
            content_type = FALLBACK_CONTENT_TYPE.to_string();
        }

        let response = Response::builder()
            .status(status)
            .header(CONTENT_TYPE, content_type)
            .body(Body::Binary(body.to_vec()))?;
        Ok(response)
    }
}

fn internal_error(origin: RequestOrigin) -> ProxyResponse {
    let mut response = Response::new(Body::from(INTERNAL_ERROR_BODY));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    ProxyResponse::from_response(origin, response)
}
