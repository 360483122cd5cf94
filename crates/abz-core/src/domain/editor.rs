use serde::{Deserialize, Serialize};

use crate::domain::ids::{DatasetId, EvalJobId};

/// Modo del editor: crear un dataset nuevo o editar uno existente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
  #[default]
  Create,
  Edit,
}

/// Configuración explícita de una sesión de edición.
///
/// Se construye en el host y se pasa a la sesión; el núcleo no lee
/// configuración ambiental.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorConfig {
  pub mode: EditorMode,
  /// Obligatorio en modo `Edit`.
  pub dataset_id: Option<DatasetId>,
  pub csrf_token: Option<String>,
}

impl EditorConfig {
  pub fn create() -> Self {
    EditorConfig { mode: EditorMode::Create, dataset_id: None, csrf_token: None }
  }

  pub fn edit(dataset_id: DatasetId) -> Self {
    EditorConfig { mode: EditorMode::Edit, dataset_id: Some(dataset_id), csrf_token: None }
  }

  pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
    self.csrf_token = Some(token.into());
    self
  }

  /// Ruta del documento JSON del dataset a editar.
  pub fn load_path(&self) -> Option<String> {
    self.dataset_id.map(load_path)
  }

  /// Ruta a la que se envía el dataset según el modo.
  pub fn submit_path(&self) -> Option<String> {
    match (self.mode, self.dataset_id) {
      (EditorMode::Create, _) => Some("/datasets/service/create".to_string()),
      (EditorMode::Edit, Some(id)) => Some(format!("/datasets/service/{id}/edit")),
      (EditorMode::Edit, None) => None,
    }
  }
}

pub fn load_path(id: DatasetId) -> String {
  format!("/datasets/service/{id}/json")
}

/// Lista de trabajos de evaluación del dataset.
pub fn eval_jobs_path(id: DatasetId) -> String {
  format!("/datasets/{id}/evaluation/json")
}

/// Recurso de un trabajo concreto (solo admite `DELETE`).
pub fn eval_job_path(id: DatasetId, job: EvalJobId) -> String {
  format!("/datasets/{id}/{job}")
}
