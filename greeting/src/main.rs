use lamedh_runtime::{handler_fn, run, Context, Error};
use proxy_http::{IntoResponse, ProxyRequest, ProxyResponse};
use serde_json::json;
use tracing::{info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .without_time()
        .init();

    run(handler_fn(func)).await?;
    Ok(())
}

async fn func(event: ProxyRequest, context: Context) -> Result<ProxyResponse, Error> {
    let span = info_span!("invocation", request_id = %context.request_id);
    let response = async { greet(&event) }.instrument(span).await;
    Ok(response)
}

fn greet(event: &ProxyRequest) -> ProxyResponse {
    info!(request_id = ?event.request_id(), "greeting");
    ProxyResponse::from_response(
        event.request_origin(),
        json!({
            "message": "Hello from Lambda!",
            "requestId": event.request_id(),
        })
        .into_response(),
    )
}

#[cfg(test)]
mod tests {
    use super::greet;
    use proxy_http::request::from_str;

    #[test]
    fn echoes_request_id() {
        let event = from_str(r#"{"requestContext": {"requestId": "abc-123"}}"#).expect("failed to parse request");
        let response = greet(&event);
        assert_eq!(response.status_code(), 200);
        assert!(!response.is_base64_encoded());
        assert_eq!(response.content_type(), Some("application/json"));
        assert_eq!(
            response.body(),
            Some(r#"{"message":"Hello from Lambda!","requestId":"abc-123"}"#)
        );
    }

    #[test]
    fn tolerates_missing_request_context() {
        let response = greet(&Default::default());
        assert_eq!(
            response.body(),
            Some(r#"{"message":"Hello from Lambda!","requestId":null}"#)
        );
    }
}
