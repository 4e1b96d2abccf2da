use anyhow::Result;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Fixed timeout for archive downloads. Anything slower is treated as a
/// failed year by the retrieval loop.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Download the given archive URL and return the raw body bytes.
pub async fn download(client: &Client, url: &Url) -> Result<Vec<u8>> {
    let resp = client
        .get(url.clone())
        .timeout(DOWNLOAD_TIMEOUT)
        .send()
        .await?
        .error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}
