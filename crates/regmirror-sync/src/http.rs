use async_trait::async_trait;
use regmirror_types::EntryNumber;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Url};
use tracing::debug;

use crate::error::{SyncError, SyncResult};
use crate::transport::RemoteTransport;
use crate::types::RegisterProof;

const PROOF_PATH: &str = "proof/register/merkle:sha-256";

/// Transport for a register served over HTTP.
///
/// Segments come from `GET <base>/download-rsf/<after>` and the proof from
/// `GET <base>/proof/register/merkle:sha-256`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: &str, user_agent: &str, api_key: Option<String>) -> SyncResult<Self> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| SyncError::Transport(format!("invalid register URL {base}: {e}")))?;
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client, base_url, api_key })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> SyncResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| SyncError::Transport(format!("invalid request path {path}: {e}")))
    }

    async fn get_text(&self, path: &str) -> SyncResult<String> {
        let url = self.url(path)?;
        debug!(%url, "register request");
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header(AUTHORIZATION, key);
        }
        let response = request.send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl RemoteTransport for HttpTransport {
    async fn fetch_segment(&self, after: EntryNumber) -> SyncResult<String> {
        self.get_text(&format!("download-rsf/{after}")).await
    }

    async fn fetch_proof(&self) -> SyncResult<RegisterProof> {
        let body = self.get_text(PROOF_PATH).await?;
        serde_json::from_str(&body).map_err(|e| SyncError::InvalidProof(e.to_string()))
    }
}
