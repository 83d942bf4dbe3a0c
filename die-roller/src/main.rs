use lamedh_runtime::{handler_fn, run, Context, Error};
use proxy_http::{ProxyRequest, ProxyResponse};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{info_span, Instrument};
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
    let response = async {
        let mut rng = StdRng::from_entropy();
        die_roller::handle(&event, &mut rng)
    }
    .instrument(span)
    .await?;
    Ok(response)
}
