//! Response types

use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayProxyResponse, ApiGatewayV2httpResponse};
use http::{header::CONTENT_TYPE, HeaderMap, Response};
use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::request::RequestOrigin;

/// Representation of a Lambda proxy response
///
/// Binary bodies are carried as base64 text with `isBase64Encoded` set, text
/// bodies are carried verbatim. Header names go over the wire in canonical
/// case (`Content-Type`).
#[derive(Debug)]
pub enum ProxyResponse {
    /// HTTP API (payload v2) response
    ApiGatewayV2(ApiGatewayV2httpResponse),
    /// REST API (payload v1) response
    ApiGatewayV1(ApiGatewayProxyResponse),
}

/// tranformation from http type to the wire type
impl ProxyResponse {
    /// Convert an `http::Response` into the response shape `request_origin` expects
    pub fn from_response<T>(request_origin: RequestOrigin, value: Response<T>) -> Self
    where
        T: Into<Body>,
    {
        let (parts, bod) = value.into_parts();
        let (is_base64_encoded, body) = match bod.into() {
            Body::Empty => (false, None),
            b @ Body::Text(_) => (false, Some(b)),
            Body::Binary(bytes) => (true, Some(Body::Text(base64::encode(&bytes)))),
        };

        let headers = parts.headers;
        let status_code = parts.status.as_u16() as i64;

        match request_origin {
            RequestOrigin::ApiGatewayV2 => ProxyResponse::ApiGatewayV2(ApiGatewayV2httpResponse {
                body,
                status_code,
                is_base64_encoded: Some(is_base64_encoded),
                cookies: Vec::new(),
                headers: headers.clone(),
                multi_value_headers: headers,
            }),
            RequestOrigin::ApiGatewayV1 => ProxyResponse::ApiGatewayV1(ApiGatewayProxyResponse {
                body,
                status_code,
                is_base64_encoded: Some(is_base64_encoded),
                headers: headers.clone(),
                multi_value_headers: headers,
            }),
        }
    }

    /// HTTP status code
    pub fn status_code(&self) -> i64 {
        match self {
            ProxyResponse::ApiGatewayV2(res) => res.status_code,
            ProxyResponse::ApiGatewayV1(res) => res.status_code,
        }
    }

    /// Whether [`body`](ProxyResponse::body) is base64 text
    pub fn is_base64_encoded(&self) -> bool {
        match self {
            ProxyResponse::ApiGatewayV2(res) => res.is_base64_encoded.unwrap_or_default(),
            ProxyResponse::ApiGatewayV1(res) => res.is_base64_encoded.unwrap_or_default(),
        }
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        match self {
            ProxyResponse::ApiGatewayV2(res) => &res.headers,
            ProxyResponse::ApiGatewayV1(res) => &res.headers,
        }
    }

    /// Value of the `content-type` header, if set and printable
    pub fn content_type(&self) -> Option<&str> {
        self.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Body text exactly as it goes over the wire
    pub fn body(&self) -> Option<&str> {
        let body = match self {
            ProxyResponse::ApiGatewayV2(res) => res.body.as_ref(),
            ProxyResponse::ApiGatewayV1(res) => res.body.as_ref(),
        };
        match body {
            Some(Body::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }
}

impl Serialize for ProxyResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let (status_code, headers, multi_value_headers, body, is_base64_encoded, cookies) = match self {
            ProxyResponse::ApiGatewayV2(res) => (
                res.status_code,
                &res.headers,
                &res.multi_value_headers,
                &res.body,
                res.is_base64_encoded,
                Some(&res.cookies),
            ),
            ProxyResponse::ApiGatewayV1(res) => (
                res.status_code,
                &res.headers,
                &res.multi_value_headers,
                &res.body,
                res.is_base64_encoded,
                None,
            ),
        };

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("statusCode", &status_code)?;
        map.serialize_entry("headers", &CanonicalHeaders(headers))?;
        map.serialize_entry("multiValueHeaders", &CanonicalMultiValueHeaders(multi_value_headers))?;
        if let Some(body) = body {
            map.serialize_entry("body", body)?;
        }
        if let Some(is_base64_encoded) = is_base64_encoded {
            map.serialize_entry("isBase64Encoded", &is_base64_encoded)?;
        }
        if let Some(cookies) = cookies {
            map.serialize_entry("cookies", cookies)?;
        }
        map.end()
    }
}

struct CanonicalHeaders<'a>(&'a HeaderMap);

impl Serialize for CanonicalHeaders<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.keys_len()))?;
        for name in self.0.keys() {
            if let Some(value) = self.0.get(name) {
                map.serialize_entry(&canonical_name(name.as_str()), &String::from_utf8_lossy(value.as_bytes()))?;
            }
        }
        map.end()
    }
}

struct CanonicalMultiValueHeaders<'a>(&'a HeaderMap);

impl Serialize for CanonicalMultiValueHeaders<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.keys_len()))?;
        for name in self.0.keys() {
            let values: Vec<_> = self
                .0
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()))
                .collect();
            map.serialize_entry(&canonical_name(name.as_str()), &values)?;
        }
        map.end()
    }
}

/// `content-type` -> `Content-Type`
fn canonical_name(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// A conversion of a handler's answer into a `Response<Body>`.
///
/// Plain text becomes a text body with no content type, JSON values become
/// an `application/json` text body.
pub trait IntoResponse {
    /// Return a translation of `self` into a `Response<Body>`
    fn into_response(self) -> Response<Body>;
}

impl IntoResponse for String {
    fn into_response(self) -> Response<Body> {
        Response::new(Body::from(self))
    }
}

impl IntoResponse for serde_json::Value {
    fn into_response(self) -> Response<Body> {
        let mut response = Response::new(Body::from(self.to_string()));
        response
            .headers_mut()
            .insert(CONTENT_TYPE, http::HeaderValue::from_static("application/json"));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::{Body, IntoResponse, ProxyResponse, RequestOrigin};
    use http::{header::CONTENT_TYPE, Response, StatusCode};
    use serde_json::{self, json};

    #[test]
    fn json_into_response() {
        let response = json!({ "hello": "lambda"}).into_response();
        match response.body() {
            Body::Text(json) => assert_eq!(json, r#"{"hello":"lambda"}"#),
            _ => panic!("invalid body"),
        }
        assert_eq!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .map(|h| h.to_str().expect("invalid header")),
            Some("application/json")
        )
    }

    #[test]
    fn text_into_response() {
        let response = String::from("text").into_response();
        match response.body() {
            Body::Text(text) => assert_eq!(text, "text"),
            _ => panic!("invalid body"),
        }
    }

    #[test]
    fn binary_bodies_are_base64_encoded() {
        let res = ProxyResponse::from_response(
            RequestOrigin::ApiGatewayV1,
            Response::builder()
                .header(CONTENT_TYPE, "application/pdf")
                .body(Body::Binary(b"%PDF-1.4".to_vec()))
                .expect("failed to create response"),
        );
        assert_eq!(res.status_code(), 200);
        assert!(res.is_base64_encoded());
        assert_eq!(res.body(), Some("JVBERi0xLjQ="));
        assert_eq!(res.content_type(), Some("application/pdf"));
    }

    #[test]
    fn text_bodies_are_not_encoded() {
        let res = ProxyResponse::from_response(
            RequestOrigin::ApiGatewayV1,
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::from(r#"{"error":"Internal server error"}"#))
                .expect("failed to create response"),
        );
        assert_eq!(res.status_code(), 500);
        assert!(!res.is_base64_encoded());
        assert_eq!(res.body(), Some(r#"{"error":"Internal server error"}"#));
    }

    #[test]
    fn serialize_binary_for_api_gateway() {
        let res = ProxyResponse::from_response(
            RequestOrigin::ApiGatewayV1,
            Response::builder()
                .status(StatusCode::FORBIDDEN)
                .header(CONTENT_TYPE, "text/html")
                .body(Body::Binary(b"403".to_vec()))
                .expect("failed to create response"),
        );
        let json = serde_json::to_string(&res).expect("failed to serialize to json");
        assert_eq!(
            json,
            r#"{"statusCode":403,"headers":{"Content-Type":"text/html"},"multiValueHeaders":{"Content-Type":["text/html"]},"body":"NDAz","isBase64Encoded":true}"#
        )
    }

    #[test]
    fn serialize_binary_for_http_api() {
        let res = ProxyResponse::from_response(
            RequestOrigin::ApiGatewayV2,
            Response::builder()
                .status(StatusCode::FORBIDDEN)
                .header(CONTENT_TYPE, "text/html")
                .body(Body::Binary(b"403".to_vec()))
                .expect("failed to create response"),
        );
        let json = serde_json::to_string(&res).expect("failed to serialize to json");
        assert_eq!(
            json,
            r#"{"statusCode":403,"headers":{"Content-Type":"text/html"},"multiValueHeaders":{"Content-Type":["text/html"]},"body":"NDAz","isBase64Encoded":true,"cookies":[]}"#
        )
    }

    #[test]
    fn serialize_json_error_for_http_api() {
        let mut response = json!({ "error": "Internal server error" }).into_response();
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        let res = ProxyResponse::from_response(RequestOrigin::ApiGatewayV2, response);
        let json = serde_json::to_string(&res).expect("failed to serialize to json");
        assert_eq!(
            json,
            r#"{"statusCode":500,"headers":{"Content-Type":"application/json"},"multiValueHeaders":{"Content-Type":["application/json"]},"body":"{\"error\":\"Internal server error\"}","isBase64Encoded":false,"cookies":[]}"#
        )
    }

    #[test]
    fn header_names_are_canonical() {
        assert_eq!(super::canonical_name("content-type"), "Content-Type");
        assert_eq!(super::canonical_name("x-amz-request-id"), "X-Amz-Request-Id");
        assert_eq!(super::canonical_name("etag"), "Etag");
    }
}
