// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the document repository API.
//!
//! Every authenticated request carries `Authorization: Bearer <token>`.
//! HTTP 401 maps to [`Error::Unauthorized`], 403 to [`Error::Forbidden`], and
//! any other non-success status to [`Error::Api`] with the server's detail.

mod types;

pub use types::{
    ComponentHealth, HealthReport, RemoteFile, SearchHit, SearchResponse, TextSearchRequest,
    TokenResponse, UploadResponse, UserInfo,
};

use std::time::Duration;

use ragq_core::{FilePart, FileType};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Client for one repository server.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Creates an unauthenticated client for `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("invalid api_url '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("invalid api_url '{}'", base_url)));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ragq/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(ApiClient {
            client,
            base_url,
            token: None,
        })
    }

    /// Attaches a bearer token to every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds a URL from path segments, percent-encoding each one.
    pub fn url_for(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("invalid api_url '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a request and maps error statuses.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.apply_auth(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_detail(status, &body);
        tracing::debug!(status = status.as_u16(), %message, "API request failed");
        match status {
            StatusCode::UNAUTHORIZED => Err(Error::Unauthorized),
            StatusCode::FORBIDDEN => Err(Error::Forbidden(message)),
            _ => Err(Error::Api {
                status: status.as_u16(),
                message,
            }),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.url_for(segments)?;
        let response = self.send(self.client.get(url)).await?;
        Ok(response.json().await?)
    }

    async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T> {
        let url = self.url_for(segments)?;
        let response = self.send(self.client.post(url).json(body)).await?;
        Ok(response.json().await?)
    }

    async fn post_multipart<T: DeserializeOwned>(&self, segments: &[&str], form: Form) -> Result<T> {
        let url = self.url_for(segments)?;
        let response = self.send(self.client.post(url).multipart(form)).await?;
        Ok(response.json().await?)
    }

    /// Exchanges a username and password for an access token.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let url = self.url_for(&["auth", "token"])?;
        let request = self
            .client
            .post(url)
            .form(&[("username", username), ("password", password)]);
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    /// The account behind the current token.
    pub async fn me(&self) -> Result<UserInfo> {
        self.get_json(&["auth", "me"]).await
    }

    /// Uploads one file to the endpoint for its type.
    pub async fn upload(&self, file_type: FileType, file: FilePart<'_>) -> Result<UploadResponse> {
        let form = Form::new().part("file", file_part(file)?);
        let segments = match file_type {
            FileType::Document => ["documents", "upload"],
            FileType::Image => ["images", "upload"],
        };
        self.post_multipart(&segments, form).await
    }

    /// Text query over indexed documents.
    pub async fn search_text(&self, query: &str, top_k: usize) -> Result<SearchResponse> {
        self.post_json(&["search", "text"], &TextSearchRequest { query, top_k })
            .await
    }

    /// Visual similarity query with an example image.
    pub async fn search_image(&self, file: FilePart<'_>, top_k: usize) -> Result<SearchResponse> {
        let form = Form::new()
            .part("file", file_part(file)?)
            .text("top_k", top_k.to_string());
        self.post_multipart(&["search", "image"], form).await
    }

    /// Assets owned by the current user.
    pub async fn list_files(&self) -> Result<Vec<RemoteFile>> {
        self.get_json(&["files"]).await
    }

    /// Assets of every user. Requires an admin account.
    pub async fn admin_files(&self) -> Result<Vec<RemoteFile>> {
        self.get_json(&["admin", "files"]).await
    }

    /// Raw content of a stored asset.
    pub async fn download_file(&self, file_type: FileType, file_name: &str) -> Result<Vec<u8>> {
        let url = self.url_for(&["files", file_type.as_str(), file_name])?;
        let response = self.send(self.client.get(url)).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Deletes a stored asset.
    pub async fn delete_file(&self, file_type: FileType, file_name: &str) -> Result<()> {
        let url = self.url_for(&["files", file_type.as_str(), file_name])?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    /// Backend and component health.
    pub async fn health(&self) -> Result<HealthReport> {
        self.get_json(&["health"]).await
    }
}

fn file_part(file: FilePart<'_>) -> Result<Part> {
    Ok(Part::bytes(file.payload.to_vec())
        .file_name(file.file_name.to_string())
        .mime_str(file.content_type)?)
}

/// Pulls a readable message out of an error body.
///
/// Prefers a JSON `detail` or `message` field, then the raw text, then the
/// status reason.
pub fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}

#[cfg(test)]
#[path = "../api_tests.rs"]
mod tests;
