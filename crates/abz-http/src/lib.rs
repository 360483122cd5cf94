use std::time::Duration;

use abz_config::ServerConfig;
use abz_core::domain::editor::{eval_job_path, eval_jobs_path, load_path};
use abz_core::domain::{DatasetId, EvalJobId};
use abz_core::ports::{DatasetGateway, GatewayError};
use abz_core::wire::{DeleteResponse, SaveResponse, SubmissionPayload};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::debug;

/// Header the dataset service reads the CSRF token from.
const CSRF_HEADER: &str = "X-CSRFToken";

/// `DatasetGateway` implementation that talks JSON over HTTP to the dataset service.
#[derive(Debug, Clone)]
pub struct HttpGateway {
  base_url: String,
  client: reqwest::Client,
}

impl HttpGateway {
  pub fn new(cfg: &ServerConfig) -> Result<Self, GatewayError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(cfg.timeout_secs))
      .build()
      .map_err(|e| GatewayError::Transport(e.to_string()))?;

    Ok(Self { base_url: cfg.base_url.trim_end_matches('/').to_string(), client })
  }

  /// Absolute URL for a service path such as `/datasets/service/create`.
  pub fn url(&self, path: &str) -> String {
    format!("{}/{}", self.base_url, path.trim_start_matches('/'))
  }

  fn submit_request(&self, path: &str, payload: &SubmissionPayload, csrf_token: Option<&str>) -> RequestBuilder {
    with_csrf(self.client.post(self.url(path)).json(payload), csrf_token)
  }

  fn delete_request(&self, dataset: DatasetId, job: EvalJobId, csrf_token: Option<&str>) -> RequestBuilder {
    with_csrf(self.client.delete(self.url(&eval_job_path(dataset, job))), csrf_token)
  }

  async fn get_json(&self, path: &str) -> Result<Value, GatewayError> {
    let url = self.url(path);
    let response = self.client.get(&url).send().await.map_err(transport)?;

    match response.status() {
      StatusCode::NOT_FOUND => Err(GatewayError::NotFound),
      status if !status.is_success() => Err(GatewayError::Protocol(format!("GET {url} returned {status}"))),
      _ => response.json::<Value>().await.map_err(|e| GatewayError::Protocol(e.to_string())),
    }
  }
}

fn with_csrf(request: RequestBuilder, csrf_token: Option<&str>) -> RequestBuilder {
  match csrf_token {
    Some(token) => request.header(CSRF_HEADER, token),
    None => request,
  }
}

fn transport(e: reqwest::Error) -> GatewayError {
  GatewayError::Transport(e.to_string())
}

/// Error bodies are application JSON and get surfaced verbatim.
fn save_response_from(status: StatusCode, body: Value) -> SaveResponse {
  if status.is_success() { SaveResponse::from_success_body(body) } else { SaveResponse::Rejected(body) }
}

/// The service answers 404/401/400 with `{"success": false, "error": ...}`; those are rejections too.
fn delete_response_from(status: StatusCode, body: Value) -> DeleteResponse {
  if status.is_success() { DeleteResponse::from_body(body) } else { DeleteResponse::Rejected(body) }
}

/// Reads a JSON body whatever the status; a non-JSON body is a protocol error.
async fn json_body(response: reqwest::Response, what: &str) -> Result<(StatusCode, Value), GatewayError> {
  let status = response.status();
  let body = response
    .json::<Value>()
    .await
    .map_err(|e| GatewayError::Protocol(format!("{what} returned {status} without a JSON body: {e}")))?;
  Ok((status, body))
}

#[async_trait]
impl DatasetGateway for HttpGateway {
  async fn fetch(&self, id: DatasetId) -> Result<Value, GatewayError> {
    debug!(%id, "fetching dataset");
    self.get_json(&load_path(id)).await
  }

  async fn submit(
    &self,
    path: &str,
    payload: &SubmissionPayload,
    csrf_token: Option<&str>,
  ) -> Result<SaveResponse, GatewayError> {
    debug!(%path, classes = payload.classes.len(), "submitting dataset");

    let response = self.submit_request(path, payload, csrf_token).send().await.map_err(transport)?;
    let (status, body) = json_body(response, &format!("POST {path}")).await?;
    Ok(save_response_from(status, body))
  }

  async fn eval_jobs(&self, dataset: DatasetId) -> Result<Value, GatewayError> {
    debug!(%dataset, "fetching evaluation jobs");
    self.get_json(&eval_jobs_path(dataset)).await
  }

  async fn delete_eval_job(
    &self,
    dataset: DatasetId,
    job: EvalJobId,
    csrf_token: Option<&str>,
  ) -> Result<DeleteResponse, GatewayError> {
    debug!(%dataset, %job, "deleting evaluation job");

    let response = self.delete_request(dataset, job, csrf_token).send().await.map_err(transport)?;
    let (status, body) = json_body(response, &format!("DELETE {}", eval_job_path(dataset, job))).await?;
    Ok(delete_response_from(status, body))
  }
}
