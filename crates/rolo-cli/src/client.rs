//! Async HTTP client wrapping the Rolo JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder, Response};
use rolo_core::contact::{Contact, ContactId, NewContact};
use serde::de::DeserializeOwned;

/// Connection settings for the Rolo API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the Rolo JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/contacts{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// Send `req` and decode a JSON body, surfacing the server's `error`
  /// message on non-2xx responses.
  async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T> {
    let resp = req.send().await.with_context(|| format!("{what} failed"))?;
    let resp = check_status(resp, what).await?;
    resp.json().await.with_context(|| format!("deserialising {what} response"))
  }

  /// `GET /contacts/[?q=..]&skip=..&limit=..`
  pub async fn list(&self, query: Option<&str>, skip: u64, limit: u64) -> Result<Vec<Contact>> {
    let mut params = vec![("skip", skip.to_string()), ("limit", limit.to_string())];
    if let Some(q) = query {
      params.push(("q", q.to_owned()));
    }
    self
      .send(self.client.get(self.url("/")).query(&params), "GET /contacts")
      .await
  }

  /// `GET /contacts/:id`
  pub async fn get(&self, id: ContactId) -> Result<Contact> {
    self
      .send(self.client.get(self.url(&format!("/{id}"))), "GET /contacts/:id")
      .await
  }

  /// `POST /contacts/`
  pub async fn create(&self, contact: &NewContact) -> Result<Contact> {
    self
      .send(self.client.post(self.url("/")).json(contact), "POST /contacts")
      .await
  }

  /// `PUT /contacts/:id`
  pub async fn update(&self, id: ContactId, contact: &NewContact) -> Result<Contact> {
    self
      .send(
        self.client.put(self.url(&format!("/{id}"))).json(contact),
        "PUT /contacts/:id",
      )
      .await
  }

  /// `DELETE /contacts/:id`
  pub async fn delete(&self, id: ContactId) -> Result<Contact> {
    self
      .send(self.client.delete(self.url(&format!("/{id}"))), "DELETE /contacts/:id")
      .await
  }

  /// `GET /contacts/birthdays/[?days=..]`
  pub async fn birthdays(&self, days: Option<u32>) -> Result<Vec<Contact>> {
    let mut req = self.client.get(self.url("/birthdays/"));
    if let Some(days) = days {
      req = req.query(&[("days", days)]);
    }
    self.send(req, "GET /contacts/birthdays").await
  }
}

async fn check_status(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body: serde_json::Value = resp.json().await.unwrap_or_default();
  match body.get("error").and_then(|e| e.as_str()) {
    Some(message) => Err(anyhow!("{what} → {status}: {message}")),
    None => Err(anyhow!("{what} → {status}")),
  }
}
