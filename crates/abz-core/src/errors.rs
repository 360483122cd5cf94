// crates/abz-core/src/errors.rs
use thiserror::Error;

use crate::domain::{ClassKey, EvalJobId, Mbid};
use crate::ports::GatewayError;
use crate::wire::JobStatus;

/// Errores de edición del borrador.
///
/// `InvalidIdentifier`, `DuplicateIdentifier` y `MalformedDocument` vienen de
/// datos del usuario o del servidor. `IndexOutOfRange` y `UnknownClass` son
/// errores de lógica del llamador (posición o clave obsoleta).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
  #[error("malformed dataset document at `{path}`: {reason}")]
  MalformedDocument { path: String, reason: String },

  #[error("class index {index} out of range (dataset has {len} classes)")]
  IndexOutOfRange { index: usize, len: usize },

  #[error("unknown class {0}")]
  UnknownClass(ClassKey),

  #[error("\"{0}\" is not a valid recording MBID")]
  InvalidIdentifier(String),

  #[error("recording {0} is already in this class")]
  DuplicateIdentifier(Mbid),
}

impl DraftError {
  pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
    DraftError::MalformedDocument { path: path.into(), reason: reason.into() }
  }

  /// `true` para errores causados por la entrada del usuario o del servidor,
  /// `false` para usos incorrectos de posiciones o claves.
  pub fn is_user_input(&self) -> bool {
    !matches!(self, DraftError::IndexOutOfRange { .. } | DraftError::UnknownClass(_))
  }
}

/// Problemas detectados al validar el dataset antes de enviarlo o evaluarlo.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("dataset name is required")]
  NameRequired,

  #[error("dataset name must be at most {max} characters (got {actual})")]
  NameTooLong { max: usize, actual: usize },

  #[error("dataset needs at least {min} classes (has {actual})")]
  NotEnoughClasses { min: usize, actual: usize },

  #[error("class #{position} needs at least {min} recordings (has {actual})")]
  NotEnoughRecordings { position: usize, min: usize, actual: usize },

  #[error("class #{position} has no name")]
  UnnamedClass { position: usize },

  #[error("class #{position} name must be at most {max} characters")]
  ClassNameTooLong { position: usize, max: usize },
}

/// Error genérico del núcleo.
///
/// Las capas superiores (CLI, UI) deberían mapear este error a mensajes de
/// usuario o logs.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error(transparent)]
  Draft(#[from] DraftError),

  #[error("dataset is not valid: {}", join_errors(.0))]
  Invalid(Vec<ValidationError>),

  #[error("gateway error: {0}")]
  Gateway(#[from] GatewayError),

  /// Respuesta de error del servidor, tal cual la devolvió.
  #[error("server rejected dataset: {0}")]
  Rejected(String),

  #[error("edit mode requires a dataset id")]
  MissingDatasetId,

  #[error("evaluation job {0} not found for this dataset")]
  JobNotFound(EvalJobId),

  /// Solo se pueden borrar trabajos que aún no han empezado.
  #[error("evaluation job {job} is {} and can no longer be removed", .status.as_str())]
  JobNotPending { job: EvalJobId, status: JobStatus },
}

fn join_errors(errors: &[ValidationError]) -> String {
  errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}
