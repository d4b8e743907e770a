use anyhow::Result;

use crate::chat::ChatServiceClient;
use crate::core::AppConfig;

pub async fn run(config: &AppConfig, text: &str) -> Result<()> {
    let client = ChatServiceClient::new(config);

    let verdict = client.check_scam(text).await?;
    let label = if verdict.is_scam { "SCAM" } else { "LOOKS OK" };
    println!("{} (score {:.2})", label, verdict.score);
    println!("{}", verdict.reason);

    Ok(())
}
