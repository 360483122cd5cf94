use crate::domain::ids::{ClassKey, DatasetId};
use crate::domain::mbid::Mbid;

/// Copia de trabajo de un dataset (creación o edición).
///
/// El orden de `classes` es significativo: se refleja en la UI y en el
/// payload de guardado.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
  /// Presente solo si el dataset ya existe en el servidor.
  pub id: Option<DatasetId>,
  /// Puede estar vacío mientras se edita; se exige al enviar.
  pub name: String,
  pub description: String,
  pub is_public: bool,
  pub classes: Vec<DatasetClass>,
}

impl Default for Dataset {
  fn default() -> Self {
    Dataset { id: None, name: String::new(), description: String::new(), is_public: true, classes: Vec::new() }
  }
}

impl Dataset {
  /// Total de grabaciones sumando todas las clases.
  pub fn recording_count(&self) -> usize {
    self.classes.iter().map(|c| c.recordings.len()).sum()
  }
}

/// Una etiqueta del dataset con las grabaciones que la ejemplifican.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetClass {
  pub key: ClassKey,
  pub name: String,
  pub description: String,
  /// Sin duplicados; se mantiene el orden de inserción.
  pub recordings: Vec<Mbid>,
}

impl DatasetClass {
  /// Clase vacía. La clave la reparte el borrador ([`ClassKeys`](crate::domain::ClassKeys)).
  pub fn new(key: ClassKey) -> Self {
    DatasetClass { key, name: String::new(), description: String::new(), recordings: Vec::new() }
  }

  /// Nombre a mostrar: el propio, o "Unnamed class #N" (N empieza en 1).
  pub fn display_name(&self, position: usize) -> String {
    if self.name.is_empty() { format!("Unnamed class #{}", position + 1) } else { self.name.clone() }
  }

  pub fn contains(&self, mbid: &Mbid) -> bool {
    self.recordings.contains(mbid)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_dataset_is_public() {
    let ds = Dataset::default();
    assert!(ds.is_public);
    assert!(ds.id.is_none());
    assert!(ds.classes.is_empty());
  }

  #[test]
  fn unnamed_class_uses_one_based_position() {
    let mut cls = DatasetClass::new(crate::domain::ClassKeys::new().next_key());
    assert_eq!(cls.display_name(0), "Unnamed class #1");
    assert_eq!(cls.display_name(4), "Unnamed class #5");
    cls.name = "Rock".into();
    assert_eq!(cls.display_name(4), "Rock");
  }
}
