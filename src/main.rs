use anyhow::{Context, Result};
use docsum::{bot::DocSumBot, config::Config, logging};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(error = %error, "Bot cannot start without a complete configuration");
            return Ok(());
        }
    };
    if !config.has_completion_credential() {
        tracing::warn!("OPENAI_API_KEY is not set; document summaries will fail");
    }

    let bot = Arc::new(DocSumBot::new(&config).context("failed to initialize bot")?);
    bot.run().await;

    Ok(())
}
