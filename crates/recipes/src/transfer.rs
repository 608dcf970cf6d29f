use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::prelude::*;
use recipes_core::download::{image_extension, image_file_name};
use reqwest::header::CONTENT_TYPE;

/// Body and media type of a fetched resource
#[derive(Debug, Clone)]
pub struct Fetched {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Downloads raw resources such as images.
#[allow(async_fn_in_trait)]
pub trait Transfer {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Fetched>;
}

pub struct HttpTransfer {
    client: reqwest::Client,
}

impl HttpTransfer {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self { client })
    }
}

impl Transfer for HttpTransfer {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Fetched> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(eyre!("Download failed with status: {}", response.status()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Fetched {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

/// Download `url` into `out_dir`, naming the file after `topic`.
///
/// Returns the path that was written.
pub async fn save_image<T: Transfer>(
    transfer: &T,
    url: &str,
    out_dir: &Path,
    topic: &str,
    timeout: Duration,
) -> Result<PathBuf> {
    let fetched = transfer.fetch(url, timeout).await?;

    let ext = image_extension(url, fetched.content_type.as_deref());
    let path = out_dir.join(image_file_name(topic, &ext));

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create directory {}", out_dir.display()))?;
    fs::write(&path, &fetched.bytes)
        .with_context(|| format!("Error saving file {}", path.display()))?;

    log::debug!("wrote {} bytes to {}", fetched.bytes.len(), path.display());

    Ok(path)
}
