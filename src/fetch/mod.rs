mod basic;
mod client;
mod headers;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use headers::WithHeaders;

use crate::error::ImportError;

/// Downloads `url` and returns the body, failing on any non-success status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>, ImportError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| ImportError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client.execute(req).await?;
    if !resp.status().is_success() {
        return Err(ImportError::Status {
            url: url.to_string(),
            status: resp.status().as_u16(),
        });
    }

    Ok(resp.bytes().await?.to_vec())
}
