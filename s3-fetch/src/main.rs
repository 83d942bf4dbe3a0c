use lamedh_runtime::{handler_fn, run, Context, Error};
use proxy_http::ProxyRequest;
use s3_fetch::{FetchConfig, FetchHandler, S3Store};
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // CloudWatch timestamps every line already
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .without_time()
        .init();

    let config = FetchConfig::from_env();
    // the client outlives invocations, it holds no per-request state
    let store = S3Store::from_config(&config).await;
    let handler = Arc::new(FetchHandler::new(config, Arc::new(store)));

    run(handler_fn(move |event: ProxyRequest, context: Context| {
        let handler = Arc::clone(&handler);
        let span = info_span!("invocation", request_id = %context.request_id);
        async move {
            let response = handler.handle(event).await;
            info!(status = response.status_code(), "request served");
            Ok::<_, Error>(response)
        }
        .instrument(span)
    }))
    .await?;
    Ok(())
}
