#![warn(missing_docs)]
//! API Gateway proxy integration types shared by the demo Lambda handlers.
//!
//! Handlers deserialize the inbound event as a [`ProxyRequest`], build an
//! ordinary [`http::Response`] and hand it to [`ProxyResponse::from_response`],
//! which encodes binary bodies as base64 and picks the REST API or HTTP API
//! response shape from the request's payload version.
//!
//! ```rust
//! use proxy_http::{IntoResponse, ProxyResponse};
//! use serde_json::json;
//!
//! let request = proxy_http::request::from_str(r#"{"pathParameters": {"name": "lambda"}}"#).unwrap();
//! let name = request.path_parameter("name").unwrap_or("world");
//! let response = ProxyResponse::from_response(
//!     request.request_origin(),
//!     json!({ "message": format!("Hello, {}!", name) }).into_response(),
//! );
//! assert_eq!(response.body(), Some(r#"{"message":"Hello, lambda!"}"#));
//! ```

pub use aws_lambda_events::encodings::Body;
pub use http::{self, Response, StatusCode};

pub mod request;
pub mod response;

pub use crate::{
    request::{ProxyRequest, RequestContext, RequestOrigin},
    response::{IntoResponse, ProxyResponse},
};
