use tracing::{info, warn};

use crate::domain::{DatasetId, EvalJobId};
use crate::errors::CoreError;
use crate::ports::{DatasetGateway, GatewayError};
use crate::wire::{self, DeleteResponse, EvalJob, JobStatus, SaveResponse};

/// Consulta y cancelación de los trabajos de evaluación de un dataset.
pub struct EvalJobService<G>
where
  G: DatasetGateway,
{
  gateway: G,
  csrf_token: Option<String>,
}

impl<G> EvalJobService<G>
where
  G: DatasetGateway,
{
  pub fn new(gateway: G, csrf_token: Option<String>) -> Self {
    Self { gateway, csrf_token }
  }

  /// Trabajos del dataset en el orden en que los devuelve el servidor.
  pub async fn list(&self, dataset: DatasetId) -> Result<Vec<EvalJob>, CoreError> {
    let doc = self.gateway.eval_jobs(dataset).await?;
    let jobs = wire::decode_eval_jobs(doc).map_err(|e| GatewayError::Protocol(e.to_string()))?;
    info!(%dataset, jobs = jobs.len(), "evaluation jobs listed");
    Ok(jobs)
  }

  /// Quita de la cola un trabajo pendiente. Los que ya están en marcha o
  /// terminados no se tocan.
  pub async fn delete_pending(&self, dataset: DatasetId, job: EvalJobId) -> Result<(), CoreError> {
    let current = self.list(dataset).await?.into_iter().find(|j| j.id == job).ok_or(CoreError::JobNotFound(job))?;
    if current.status != JobStatus::Pending {
      return Err(CoreError::JobNotPending { job, status: current.status });
    }

    match self.gateway.delete_eval_job(dataset, job, self.csrf_token.as_deref()).await? {
      DeleteResponse::Deleted => {
        info!(%dataset, %job, "evaluation job removed from queue");
        Ok(())
      }
      DeleteResponse::Rejected(body) => {
        let msg = SaveResponse::rejection_message(&body);
        warn!(%dataset, %job, error = %msg, "evaluation job deletion rejected");
        Err(CoreError::Rejected(msg))
      }
    }
  }
}
