//! HTTP client for the dashboard API. Attaches the session credential to every
//! request and turns a 401 into a forced logout.

use std::{path::Path, time::Duration};

use futures::StreamExt;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use url::Url;

use crate::credential::CredentialStore;
use crate::error::Failure;
use crate::types::{
    AiStatusResponse, AiUsage, FilePage, FileReadResponse, ProjectInfo, StatusSnapshot,
    SuccessResponse, TranslateResponse,
};

pub const AUTH: &str = "/api/auth";
pub const STATUS: &str = "/api/status";
pub const HEARTBEAT_UPDATE: &str = "/api/heartbeat/update";
pub const FILE_READ: &str = "/api/files/read";
pub const TRANSLATE: &str = "/api/translate";
pub const AI_STATUS: &str = "/api/ai/status";
pub const AI_STATUS_LIVE: &str = "/api/ai/status/live";
pub const PROJECTS: &str = "/api/projects";
pub const PROJECT_DOWNLOAD: &str = "/api/projects/download";
pub const SYSTEM_BACKUP: &str = "/api/system/backup";

#[derive(Clone, Debug)]
pub struct RemoteClient {
    base: Url,
    http: reqwest::Client,
    credential: CredentialStore,
}

impl RemoteClient {
    pub fn new(base_url: &str, credential: CredentialStore) -> Result<Self, Failure> {
        let base = Url::parse(base_url)
            .map_err(|e| Failure::Transport(format!("invalid base url {base_url}: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base,
            http,
            credential,
        })
    }

    pub fn credential(&self) -> &CredentialStore {
        &self.credential
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Issue one authenticated request and return the decoded JSON body.
    ///
    /// With a body the token is embedded as a `token` field; without one it
    /// is appended as a query parameter.
    pub async fn call(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value, Failure> {
        let resp = self.send(endpoint, method, body).await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            // structured errors still count as content failures
            if let Some(msg) = error_field(&text) {
                return Err(Failure::Content(msg));
            }
            return Err(Failure::Transport(format!("HTTP {status}")));
        }
        serde_json::from_str(&text).map_err(|e| Failure::Transport(format!("parse error: {e}")))
    }

    async fn call_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<T, Failure> {
        let v = self.call(endpoint, method, body).await?;
        serde_json::from_value(v).map_err(|e| Failure::Transport(format!("parse error: {e}")))
    }

    async fn send(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<reqwest::Response, Failure> {
        let token = self.credential.get();
        let mut url = self.url_for(endpoint)?;
        let mut req = match body {
            Some(mut b) => {
                if let (Some(obj), Some(t)) = (b.as_object_mut(), token.as_ref()) {
                    obj.insert("token".into(), Value::String(t.clone()));
                }
                self.http.request(method.clone(), url).json(&b)
            }
            None => {
                if let Some(t) = token.as_ref() {
                    url.query_pairs_mut().append_pair("token", t);
                }
                self.http.request(method.clone(), url)
            }
        };
        req = req.header("Accept", "application/json");
        debug!(%method, endpoint, "request");
        let resp = req.send().await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            if endpoint_path(endpoint) != AUTH {
                warn!(endpoint, "unauthorized, dropping stored credential");
                self.credential.clear();
            }
            return Err(Failure::Auth);
        }
        Ok(resp)
    }

    fn url_for(&self, endpoint: &str) -> Result<Url, Failure> {
        self.base
            .join(endpoint)
            .map_err(|e| Failure::Transport(format!("bad endpoint {endpoint}: {e}")))
    }

    /// Check a candidate token. Never clears the stored credential.
    pub async fn check_auth(&self, token: &str) -> Result<(), Failure> {
        let url = self.url_for(AUTH)?;
        let resp = self
            .http
            .post(url)
            .json(&json!({ "token": token }))
            .send()
            .await?;
        match resp.status() {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Err(Failure::Auth),
            s => Err(Failure::Transport(format!("HTTP {s}"))),
        }
    }

    pub async fn status(&self) -> Result<StatusSnapshot, Failure> {
        self.call_as(STATUS, Method::GET, None).await
    }

    pub async fn update_heartbeat(&self, content: &str) -> Result<bool, Failure> {
        let r: SuccessResponse = self
            .call_as(
                HEARTBEAT_UPDATE,
                Method::POST,
                Some(json!({ "content": content })),
            )
            .await?;
        Ok(r.success)
    }

    pub async fn read_file(&self, path: &str, page: u32) -> Result<FilePage, Failure> {
        let endpoint = with_query(FILE_READ, &[("path", path), ("page", &page.to_string())]);
        let r: FileReadResponse = self.call_as(&endpoint, Method::GET, None).await?;
        r.into_page(page)
    }

    pub async fn translate(&self, text: &str) -> Result<String, Failure> {
        let r: TranslateResponse = self
            .call_as(TRANSLATE, Method::POST, Some(json!({ "text": text })))
            .await?;
        r.into_text()
    }

    pub async fn ai_status(&self, live: bool) -> Result<AiUsage, Failure> {
        let endpoint = if live { AI_STATUS_LIVE } else { AI_STATUS };
        let r: AiStatusResponse = self.call_as(endpoint, Method::GET, None).await?;
        r.into_usage()
    }

    pub async fn projects(&self) -> Result<Vec<ProjectInfo>, Failure> {
        self.call_as(PROJECTS, Method::GET, None).await
    }

    /// Stream a zip from `endpoint` into `dest`. Returns bytes written.
    pub async fn download(&self, endpoint: &str, dest: &Path) -> Result<u64, Failure> {
        let resp = self.send(endpoint, Method::GET, None).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Failure::Transport(format!("HTTP {status}")));
        }
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk: bytes::Bytes = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }
}

pub fn project_download_endpoint(name: &str) -> String {
    with_query(PROJECT_DOWNLOAD, &[("name", name)])
}

fn with_query(endpoint: &str, pairs: &[(&str, &str)]) -> String {
    let q = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("{endpoint}?{q}")
}

fn endpoint_path(endpoint: &str) -> &str {
    endpoint.split('?').next().unwrap_or(endpoint)
}

fn error_field(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    v.get("error").and_then(Value::as_str).map(str::to_string)
}

/// Split a one-time `token` query parameter off a base URL.
///
/// Returns the URL with the parameter removed and the token if present.
pub fn split_magic_token(raw: &str) -> Result<(String, Option<String>), Failure> {
    let mut url =
        Url::parse(raw).map_err(|e| Failure::Transport(format!("invalid url {raw}: {e}")))?;
    let mut token = None;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter_map(|(k, v)| {
            if k == "token" {
                token = Some(v.into_owned());
                None
            } else {
                Some((k.into_owned(), v.into_owned()))
            }
        })
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    Ok((url.to_string(), token.filter(|t| !t.is_empty())))
}
