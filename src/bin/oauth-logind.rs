use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{event, Level};
use tracing_subscriber::EnvFilter;

use oauth_login::flow::{HttpIdentityProvider, OAuthLoginFlow};
use oauth_login::http::encoding::CookieSettings;
use oauth_login::http::server::Server;
use oauth_login::store::MemoryStore;
use oauth_login::util::cli::Options;

const CLEAN_UP_PERIOD: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Options::parse();
    let config = opts.provider_config()?;
    let provider = HttpIdentityProvider::new(opts.http_timeout()?)?;

    event!(
        Level::INFO,
        client_id = ?config.client_id,
        redirect_uri = %config.redirect_uri.0,
        auth_endpoint = %config.auth_endpoint,
        "Starting login service"
    );

    let flow = Arc::new(OAuthLoginFlow::new(config, provider, MemoryStore::new()));

    let worker = Arc::clone(&flow);
    tokio::spawn(async move {
        if let Err(e) = worker.run_clean_up_worker(CLEAN_UP_PERIOD).await {
            event!(Level::ERROR, error = %e, "Attempt clean-up stopped");
        }
    });

    let cookies = CookieSettings {
        secure: opts.secure_cookies,
    };
    event!(Level::INFO, bind = %opts.bind, "Listening");
    Server::new(flow, cookies).serve(opts.bind).await;

    Ok(())
}
