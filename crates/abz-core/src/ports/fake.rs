//! Gateway en memoria para los tests de los servicios.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{DatasetId, EvalJobId};
use crate::ports::{DatasetGateway, GatewayError};
use crate::wire::{DeleteResponse, SaveResponse, SubmissionPayload};

/// Sin respuesta configurada, `fetch` y `eval_jobs` dan `NotFound` y los
/// envíos dan un error de transporte.
#[derive(Default)]
pub(crate) struct FakeGateway {
  pub doc: Option<Value>,
  pub response: Option<SaveResponse>,
  pub jobs: Option<Value>,
  pub delete_response: Option<DeleteResponse>,
  pub submitted: Mutex<Vec<(String, SubmissionPayload, Option<String>)>>,
  pub deleted: Mutex<Vec<(DatasetId, EvalJobId, Option<String>)>>,
}

#[async_trait]
impl DatasetGateway for FakeGateway {
  async fn fetch(&self, _id: DatasetId) -> Result<Value, GatewayError> {
    self.doc.clone().ok_or(GatewayError::NotFound)
  }

  async fn submit(
    &self,
    path: &str,
    payload: &SubmissionPayload,
    csrf_token: Option<&str>,
  ) -> Result<SaveResponse, GatewayError> {
    self.submitted.lock().unwrap().push((path.to_string(), payload.clone(), csrf_token.map(str::to_string)));
    self.response.clone().ok_or_else(|| GatewayError::Transport("connection refused".into()))
  }

  async fn eval_jobs(&self, _dataset: DatasetId) -> Result<Value, GatewayError> {
    self.jobs.clone().ok_or(GatewayError::NotFound)
  }

  async fn delete_eval_job(
    &self,
    dataset: DatasetId,
    job: EvalJobId,
    csrf_token: Option<&str>,
  ) -> Result<DeleteResponse, GatewayError> {
    self.deleted.lock().unwrap().push((dataset, job, csrf_token.map(str::to_string)));
    self.delete_response.clone().ok_or_else(|| GatewayError::Transport("connection refused".into()))
  }
}
