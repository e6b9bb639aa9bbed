//! Fetches pages over HTTP, relative to a base URL.

use async_trait::async_trait;
use log::{debug, info};

use super::{FetchError, PageSource, check_page_id};

pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("HttpSource initialized with base URL: {}", base_url);
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn page_url(&self, page_id: &str) -> String {
        format!("{}/{}", self.base_url, page_id)
    }
}

#[async_trait]
impl PageSource for HttpSource {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn fetch_text(&self, page_id: &str) -> Result<String, FetchError> {
        check_page_id(page_id)?;
        let url = self.page_url(page_id);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalized() {
        let source = HttpSource::new("http://localhost:8000/src/");
        assert_eq!(source.page_url("docs.js"), "http://localhost:8000/src/docs.js");
        assert_eq!(source.name(), "http://localhost:8000/src");
    }
}
