use std::time::Duration;

use crate::engine::error::SupplyError;
use crate::generator::{WordEntry, WordSource};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub fn words_url(base: &str, count: usize, level: u32) -> String {
    format!(
        "{}/api/words?count={}&level={}",
        base.trim_end_matches('/'),
        count.clamp(1, 10),
        level.max(1)
    )
}

/// Word service reached over HTTP: `GET /api/words` answering `[{"text": ..}]`.
pub struct HttpWordSource {
    base_url: String,
    #[cfg(feature = "network")]
    client: Option<reqwest::blocking::Client>,
}

impl HttpWordSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            #[cfg(feature = "network")]
            client: reqwest::blocking::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .ok(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(feature = "network")]
impl WordSource for HttpWordSource {
    fn fetch_words(&self, count: usize, level: u32) -> Result<Vec<WordEntry>, SupplyError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| SupplyError::Unavailable("http client not built".to_string()))?;
        let url = words_url(&self.base_url, count, level);
        let response = client
            .get(&url)
            .send()
            .map_err(|e| SupplyError::Unavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SupplyError::Status(response.status().as_u16()));
        }
        let entries: Vec<WordEntry> = response
            .json()
            .map_err(|e| SupplyError::Malformed(e.to_string()))?;
        usable(entries)
    }
}

#[cfg(not(feature = "network"))]
impl WordSource for HttpWordSource {
    fn fetch_words(&self, _count: usize, _level: u32) -> Result<Vec<WordEntry>, SupplyError> {
        Err(SupplyError::Unavailable(
            "built without the network feature".to_string(),
        ))
    }
}

#[cfg_attr(not(feature = "network"), allow(dead_code))]
fn usable(entries: Vec<WordEntry>) -> Result<Vec<WordEntry>, SupplyError> {
    let entries: Vec<WordEntry> = entries
        .into_iter()
        .filter(|e| !e.text.trim().is_empty())
        .collect();
    if entries.is_empty() {
        Err(SupplyError::Empty)
    } else {
        Ok(entries)
    }
}
