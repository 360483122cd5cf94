use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{DatasetId, EvalJobId};
use crate::wire::{DeleteResponse, SaveResponse, SubmissionPayload};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
  #[error("transport error: {0}")]
  Transport(String),

  #[error("dataset not found")]
  NotFound,

  #[error("unexpected response: {0}")]
  Protocol(String),
}

/// Port hacia el servicio que guarda los datasets.
///
/// El núcleo no sabe nada de HTTP: el adapter decide cómo hablar con el
/// servidor. Cada operación se lanza una sola vez, sin reintentos.
#[async_trait]
pub trait DatasetGateway: Send + Sync {
  /// Documento JSON del dataset tal cual lo devuelve el servidor.
  async fn fetch(&self, id: DatasetId) -> Result<Value, GatewayError>;

  /// Envía el dataset a `path`. Un rechazo de la aplicación es
  /// `Ok(SaveResponse::Rejected)`, no un error de transporte.
  async fn submit(
    &self,
    path: &str,
    payload: &SubmissionPayload,
    csrf_token: Option<&str>,
  ) -> Result<SaveResponse, GatewayError>;

  /// Documento con los trabajos de evaluación del dataset.
  async fn eval_jobs(&self, dataset: DatasetId) -> Result<Value, GatewayError>;

  /// Borra un trabajo de evaluación. Igual que en `submit`, un rechazo de la
  /// aplicación es `Ok(DeleteResponse::Rejected)`.
  async fn delete_eval_job(
    &self,
    dataset: DatasetId,
    job: EvalJobId,
    csrf_token: Option<&str>,
  ) -> Result<DeleteResponse, GatewayError>;
}
