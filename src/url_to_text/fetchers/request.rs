use crate::error::{ExtractionError, ImportError};
use crate::utils::with_deadline;
use log::debug;
use reqwest::Client;
use std::time::Duration;

/// Plain HTTP page fetcher. Does not retry; callers wrap it in a retry policy.
pub struct RequestFetcher {
    client: Client,
    timeout: Duration,
    probe_timeout: Duration,
}

impl RequestFetcher {
    pub fn new(
        user_agent: &str,
        timeout: Duration,
        probe_timeout: Duration,
    ) -> Result<Self, ImportError> {
        let client = Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client,
            timeout,
            probe_timeout,
        })
    }

    /// GET `url` and return the body. Non-2xx responses are errors that carry
    /// the status.
    pub async fn fetch(&self, url: &str) -> Result<String, ExtractionError> {
        debug!("Fetching {}", url);
        with_deadline(self.timeout, format!("Fetching {url} timed out"), async {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ExtractionError::from_status(
                    status.as_u16(),
                    "Could not load the page",
                ));
            }
            let html = response.text().await?;
            Ok::<_, ExtractionError>(html)
        })
        .await
        .map_err(|e| e.with_source_url(url))
    }

    /// Whether `url` answers a HEAD request with a success or redirect status
    /// within the probe deadline
    pub async fn probe(&self, url: &str) -> bool {
        let result = with_deadline(self.probe_timeout, "Probe timed out", async {
            Ok::<_, ExtractionError>(self.client.head(url).send().await?)
        })
        .await;

        match result {
            Ok(response) => {
                let status = response.status();
                debug!("Probe of {} returned {}", url, status);
                status.is_success() || status.is_redirection()
            }
            Err(e) => {
                debug!("Probe of {} failed: {}", url, e);
                false
            }
        }
    }
}
