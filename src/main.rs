use std::error::Error;

use ai_llm_service::telemetry;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; a malformed one is not.
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.into()),
    }

    telemetry::init(telemetry::DEFAULT_FILTER)?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting civic-rag-backend");

    if let Err(e) = api::start().await {
        error!(error = %e, "backend stopped with an error");
        return Err(e.into());
    }

    Ok(())
}
