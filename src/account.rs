use anyhow::{anyhow, Context};
use aws_config::SdkConfig;
use tracing::info;

/// The account the adapters serve. A configured ID wins over asking STS.
pub async fn resolve_account_id(
    config: &SdkConfig,
    configured: Option<String>,
) -> anyhow::Result<String> {
    if let Some(account_id) = configured {
        return Ok(account_id);
    }

    let identity = aws_sdk_sts::Client::new(config)
        .get_caller_identity()
        .send()
        .await
        .context("Failed to get the caller identity from STS")?;

    let account_id = identity
        .account
        .ok_or_else(|| anyhow!("STS returned no account for the caller identity"))?;
    info!("resolved account {account_id} from STS");

    Ok(account_id)
}

/// The region the SDK was configured with.
pub fn region(config: &SdkConfig) -> anyhow::Result<String> {
    config
        .region()
        .map(|region| region.to_string())
        .ok_or_else(|| anyhow!("No AWS region is configured"))
}
