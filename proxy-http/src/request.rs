//! API Gateway proxy request adaptations
//!
//! Both REST API (payload v1) and HTTP API (payload v2) proxy integrations
//! deliver `pathParameters` and `requestContext.requestId` under the same
//! names, so a single [`ProxyRequest`] covers them. Fields the handlers do
//! not read are ignored during deserialization.
use serde::{Deserialize, Deserializer};
use serde_json::error::Error as JsonError;
use std::collections::HashMap;

/// Inbound API Gateway proxy event
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    /// Payload format version. Only HTTP API events carry one (`"2.0"`).
    #[serde(default)]
    pub version: Option<String>,
    /// REST API http method. HTTP API events carry it in the request context instead.
    #[serde(default)]
    pub http_method: Option<String>,
    /// Request path as seen by API Gateway
    #[serde(default, alias = "rawPath")]
    pub path: Option<String>,
    /// Route path parameters. API Gateway sends `null` when the route has none.
    #[serde(default, deserialize_with = "nullable")]
    pub path_parameters: HashMap<String, String>,
    /// Single valued query string parameters
    #[serde(default, deserialize_with = "nullable")]
    pub query_string_parameters: HashMap<String, String>,
    /// Request context
    #[serde(default, deserialize_with = "nullable")]
    pub request_context: RequestContext,
}

/// The subset of the API Gateway request context the handlers use
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// API Gateway request id
    #[serde(default)]
    pub request_id: Option<String>,
    /// Deployment stage
    #[serde(default)]
    pub stage: Option<String>,
}

/// Represents the origin from which the lambda was requested from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RequestOrigin {
    /// API Gateway REST proxy request origin
    ApiGatewayV1,
    /// API Gateway HTTP API request origin
    ApiGatewayV2,
}

impl ProxyRequest {
    /// Return the `RequestOrigin` of the request so that the response can be
    /// shaped the way that origin expects.
    pub fn request_origin(&self) -> RequestOrigin {
        match self.version.as_deref() {
            Some("2.0") => RequestOrigin::ApiGatewayV2,
            _ => RequestOrigin::ApiGatewayV1,
        }
    }

    /// Value of the named path parameter, if the route captured one
    pub fn path_parameter(&self, name: &str) -> Option<&str> {
        self.path_parameters.get(name).map(String::as_str)
    }

    /// Value of the named query string parameter
    pub fn query_parameter(&self, name: &str) -> Option<&str> {
        self.query_string_parameters.get(name).map(String::as_str)
    }

    /// API Gateway request id, when the event carried a request context
    pub fn request_id(&self) -> Option<&str> {
        self.request_context.request_id.as_deref()
    }
}

// API Gateway serializes empty maps and contexts as `null` rather than omitting them
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes a `ProxyRequest` from a string of JSON text.
pub fn from_str(s: &str) -> Result<ProxyRequest, JsonError> {
    serde_json::from_str(s)
}
