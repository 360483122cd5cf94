use crate::domain::Dataset;
use crate::errors::ValidationError;
use crate::services::draft_store::NAME_MAX_LEN;

pub const MIN_CLASSES: usize = 2;
pub const MIN_RECORDINGS_IN_CLASS: usize = 2;

/// Reglas de un dataset "completo", el mínimo que necesita el servidor para
/// lanzar una evaluación.
///
/// Es independiente de `validate_for_submit`: un dataset se puede guardar sin
/// cumplir esto.
pub fn check_complete(dataset: &Dataset) -> Result<(), Vec<ValidationError>> {
  let mut errors = Vec::new();

  if dataset.classes.len() < MIN_CLASSES {
    errors.push(ValidationError::NotEnoughClasses { min: MIN_CLASSES, actual: dataset.classes.len() });
  }

  for (i, cls) in dataset.classes.iter().enumerate() {
    let position = i + 1;
    let name = cls.name.trim();
    if name.is_empty() {
      errors.push(ValidationError::UnnamedClass { position });
    } else if name.chars().count() > NAME_MAX_LEN {
      errors.push(ValidationError::ClassNameTooLong { position, max: NAME_MAX_LEN });
    }

    if cls.recordings.len() < MIN_RECORDINGS_IN_CLASS {
      errors.push(ValidationError::NotEnoughRecordings {
        position,
        min: MIN_RECORDINGS_IN_CLASS,
        actual: cls.recordings.len(),
      });
    }
  }

  if errors.is_empty() { Ok(()) } else { Err(errors) }
}
