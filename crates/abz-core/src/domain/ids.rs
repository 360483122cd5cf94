use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identificador de un dataset persistido.
///
/// Lo asigna el servidor en el primer guardado; un borrador nuevo no lo tiene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(Uuid);

impl DatasetId {
  /// Construye un `DatasetId` a partir de un `Uuid` existente.
  pub fn from_uuid(u: Uuid) -> Self {
    DatasetId(u)
  }

  /// Devuelve el `Uuid` interno.
  pub fn as_uuid(&self) -> Uuid {
    self.0
  }

  /// Interpreta un texto como UUID (cualquier versión, sin normalizar mayúsculas).
  pub fn parse(s: &str) -> Option<Self> {
    Uuid::parse_str(s.trim()).ok().map(DatasetId)
  }
}

impl From<Uuid> for DatasetId {
  fn from(u: Uuid) -> Self {
    DatasetId(u)
  }
}

impl From<DatasetId> for Uuid {
  fn from(id: DatasetId) -> Self {
    id.0
  }
}

impl fmt::Display for DatasetId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Clave estable de una clase dentro de un borrador.
///
/// A diferencia de la posición en `classes`, la clave no cambia cuando se
/// borran o reordenan otras clases. Solo vive en memoria: nunca se serializa
/// en el payload de guardado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassKey(u64);

impl ClassKey {
  pub fn get(&self) -> u64 {
    self.0
  }
}

impl fmt::Display for ClassKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "class#{}", self.0)
  }
}

/// Contador de claves de un borrador. Cada borrador tiene el suyo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassKeys {
  next: u64,
}

impl ClassKeys {
  pub fn new() -> Self {
    ClassKeys { next: 1 }
  }

  pub fn next_key(&mut self) -> ClassKey {
    let key = ClassKey(self.next);
    self.next += 1;
    key
  }
}

impl Default for ClassKeys {
  fn default() -> Self {
    Self::new()
  }
}

/// Identificador de un trabajo de evaluación.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvalJobId(Uuid);

impl EvalJobId {
  pub fn parse(s: &str) -> Option<Self> {
    Uuid::parse_str(s.trim()).ok().map(EvalJobId)
  }

  pub fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl fmt::Display for EvalJobId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}
