use std::sync::Arc;

use cartoon_core::{config::Config, ports::TransformPort};
use cartoon_qq::CartoonClient;

#[tokio::main]
async fn main() -> Result<(), cartoon_core::Error> {
    cartoon_core::logging::init("cartoon")?;

    let cfg = Arc::new(Config::load()?);
    let transform: Arc<dyn TransformPort> = Arc::new(CartoonClient::new());

    cartoon_telegram::router::run_polling(cfg, transform)
        .await
        .map_err(|e| cartoon_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
