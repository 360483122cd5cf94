use serde_json::Value;
use tracing::debug;

use crate::domain::{ClassKey, ClassKeys, Dataset, DatasetClass, DatasetId, Mbid};
use crate::errors::{DraftError, ValidationError};
use crate::wire::{self, SubmissionPayload};

/// Longitud máxima del nombre del dataset y de cada clase (la misma que
/// acepta el servidor).
pub const NAME_MAX_LEN: usize = 100;

/// Copia de trabajo de un dataset, editada en memoria.
///
/// Cada operación valida todo antes de tocar el estado: o se aplica entera o
/// devuelve un error y el borrador queda igual.
///
/// Las clases se pueden direccionar por posición (lo que ve la UI) o por
/// [`ClassKey`]. Una posición obtenida antes de un `delete_class*` deja de ser
/// válida; la clave no. Las claves solo son únicas dentro de un mismo
/// borrador.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatasetDraftStore {
  dataset: Dataset,
  keys: ClassKeys,
}

impl DatasetDraftStore {
  /// Borrador vacío para el modo creación.
  pub fn create_empty() -> Self {
    Self { dataset: Dataset::default(), keys: ClassKeys::new() }
  }

  /// Hidrata el borrador a partir del documento JSON del servidor.
  pub fn load_from(doc: &Value) -> Result<Self, DraftError> {
    let mut keys = ClassKeys::new();
    let dataset = wire::decode_dataset(doc, &mut keys)?;
    debug!(classes = dataset.classes.len(), recordings = dataset.recording_count(), "draft loaded");
    Ok(Self { dataset, keys })
  }

  pub fn load_from_str(doc: &str) -> Result<Self, DraftError> {
    let value: Value = serde_json::from_str(doc).map_err(|e| DraftError::malformed("$", e.to_string()))?;
    Self::load_from(&value)
  }

  /// `keys` debe ser el contador que repartió las claves de `dataset`.
  pub(crate) fn from_parts(dataset: Dataset, keys: ClassKeys) -> Self {
    Self { dataset, keys }
  }

  // -------- QUERY --------

  pub fn dataset(&self) -> &Dataset {
    &self.dataset
  }

  pub fn into_dataset(self) -> Dataset {
    self.dataset
  }

  pub fn classes(&self) -> &[DatasetClass] {
    &self.dataset.classes
  }

  pub fn len(&self) -> usize {
    self.dataset.classes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.dataset.classes.is_empty()
  }

  pub fn class(&self, index: usize) -> Result<&DatasetClass, DraftError> {
    let len = self.len();
    self.dataset.classes.get(index).ok_or(DraftError::IndexOutOfRange { index, len })
  }

  pub fn class_by_key(&self, key: ClassKey) -> Result<&DatasetClass, DraftError> {
    self.dataset.classes.iter().find(|c| c.key == key).ok_or(DraftError::UnknownClass(key))
  }

  /// Posición actual de la clase con esa clave.
  pub fn position_of(&self, key: ClassKey) -> Option<usize> {
    self.dataset.classes.iter().position(|c| c.key == key)
  }

  pub fn key_at(&self, index: usize) -> Result<ClassKey, DraftError> {
    self.class(index).map(|c| c.key)
  }

  // -------- COMMAND --------

  /// Sin validación: el nombre vacío se permite hasta el envío.
  pub fn update_details(&mut self, name: impl Into<String>, description: impl Into<String>) {
    self.dataset.name = name.into();
    self.dataset.description = description.into();
  }

  pub fn set_public(&mut self, is_public: bool) {
    self.dataset.is_public = is_public;
  }

  /// Guarda el id asignado por el servidor. Una vez asignado no cambia:
  /// devuelve `false` si ya había uno.
  pub fn assign_id(&mut self, id: DatasetId) -> bool {
    if self.dataset.id.is_some() {
      return false;
    }
    self.dataset.id = Some(id);
    true
  }

  /// Añade una clase vacía al final y devuelve su clave.
  pub fn add_class(&mut self) -> ClassKey {
    let key = self.keys.next_key();
    self.dataset.classes.push(DatasetClass::new(key));
    debug!(%key, position = self.len() - 1, "class added");
    key
  }

  /// Reemplaza nombre, descripción y grabaciones de la clase en `index`.
  pub fn update_class<I, S>(
    &mut self,
    index: usize,
    name: impl Into<String>,
    description: impl Into<String>,
    recordings: I,
  ) -> Result<(), DraftError>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let key = self.key_at(index)?;
    self.update_class_by_key(key, name, description, recordings)
  }

  pub fn update_class_by_key<I, S>(
    &mut self,
    key: ClassKey,
    name: impl Into<String>,
    description: impl Into<String>,
    recordings: I,
  ) -> Result<(), DraftError>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let position = self.position_of(key).ok_or(DraftError::UnknownClass(key))?;
    let recordings = parse_unique(recordings)?;

    let cls = &mut self.dataset.classes[position];
    cls.name = name.into();
    cls.description = description.into();
    cls.recordings = recordings;
    debug!(%key, position, recordings = cls.recordings.len(), "class updated");
    Ok(())
  }

  /// Borra la clase en `index`; las siguientes bajan una posición.
  pub fn delete_class(&mut self, index: usize) -> Result<DatasetClass, DraftError> {
    let key = self.key_at(index)?;
    self.delete_class_by_key(key)
  }

  pub fn delete_class_by_key(&mut self, key: ClassKey) -> Result<DatasetClass, DraftError> {
    let position = self.position_of(key).ok_or(DraftError::UnknownClass(key))?;
    let removed = self.dataset.classes.remove(position);
    debug!(%key, position, "class deleted");
    Ok(removed)
  }

  /// Interpreta `raw` (MBID o URL de MusicBrainz) y lo añade al final de la clase.
  pub fn add_recording(&mut self, class_index: usize, raw: &str) -> Result<Mbid, DraftError> {
    let key = self.key_at(class_index)?;
    self.add_recording_by_key(key, raw)
  }

  pub fn add_recording_by_key(&mut self, key: ClassKey, raw: &str) -> Result<Mbid, DraftError> {
    let position = self.position_of(key).ok_or(DraftError::UnknownClass(key))?;
    let mbid = Mbid::parse(raw)?;

    let cls = &mut self.dataset.classes[position];
    if cls.contains(&mbid) {
      return Err(DraftError::DuplicateIdentifier(mbid));
    }
    cls.recordings.push(mbid.clone());
    debug!(%key, %mbid, "recording added");
    Ok(mbid)
  }

  /// Quita la primera aparición de `mbid`. Si no está, no hace nada y
  /// devuelve `Ok(false)`.
  pub fn remove_recording(&mut self, class_index: usize, mbid: &str) -> Result<bool, DraftError> {
    let key = self.key_at(class_index)?;
    self.remove_recording_by_key(key, mbid)
  }

  pub fn remove_recording_by_key(&mut self, key: ClassKey, mbid: &str) -> Result<bool, DraftError> {
    let position = self.position_of(key).ok_or(DraftError::UnknownClass(key))?;
    let Ok(mbid) = Mbid::parse(mbid) else {
      return Ok(false);
    };

    let cls = &mut self.dataset.classes[position];
    match cls.recordings.iter().position(|r| *r == mbid) {
      Some(i) => {
        cls.recordings.remove(i);
        debug!(%key, %mbid, "recording removed");
        Ok(true)
      }
      None => Ok(false),
    }
  }

  // -------- SUBMIT --------

  /// Comprobaciones previas al envío: solo el nombre del dataset.
  ///
  /// No exige grabaciones en cada clase; eso lo decide el servidor o
  /// [`check_complete`](crate::services::readiness::check_complete).
  pub fn validate_for_submit(&self) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let name = &self.dataset.name;
    if name.trim().is_empty() {
      errors.push(ValidationError::NameRequired);
    } else {
      // el payload lleva el nombre sin recortar
      let actual = name.chars().count();
      if actual > NAME_MAX_LEN {
        errors.push(ValidationError::NameTooLong { max: NAME_MAX_LEN, actual });
      }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
  }

  pub fn to_submission_payload(&self) -> SubmissionPayload {
    SubmissionPayload::from(&self.dataset)
  }
}

/// Valida y normaliza una lista de grabaciones, rechazando repetidas.
fn parse_unique<I, S>(raw: I) -> Result<Vec<Mbid>, DraftError>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut out: Vec<Mbid> = Vec::new();
  for r in raw {
    let mbid = Mbid::parse(r.as_ref())?;
    if out.contains(&mbid) {
      return Err(DraftError::DuplicateIdentifier(mbid));
    }
    out.push(mbid);
  }
  Ok(out)
}
