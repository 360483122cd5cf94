use std::io::BufRead;

use thiserror::Error;
use tracing::info;

use crate::domain::{ClassKeys, Dataset, DatasetClass, Mbid};
use crate::services::DatasetDraftStore;

#[derive(Debug, Error)]
pub enum ImportError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("line {line}: each row must contain one <MBID, class name> pair")]
  BadRow { line: usize },

  #[error("line {line}: \"{input}\" is not a valid recording MBID")]
  InvalidIdentifier { line: usize, input: String },

  #[error("line {line}: recording {mbid} is already in class \"{class}\"")]
  DuplicateIdentifier { line: usize, mbid: Mbid, class: String },
}

/// Crea un borrador a partir de un CSV de filas `<mbid>,<nombre de clase>`.
///
/// Las clases aparecen en el orden en que se ven por primera vez; las
/// grabaciones, en el orden de las filas. Las líneas vacías se ignoran.
/// Los campos pueden ir entre comillas dobles (`""` escapa una comilla), pero
/// no pueden ocupar varias líneas.
pub fn import_csv<R: BufRead>(
  name: impl Into<String>,
  description: impl Into<String>,
  reader: R,
) -> Result<DatasetDraftStore, ImportError> {
  let mut keys = ClassKeys::new();
  let mut classes: Vec<DatasetClass> = Vec::new();

  for (i, line) in reader.lines().enumerate() {
    let line_no = i + 1;
    let line = line?;
    if line.trim().is_empty() {
      continue;
    }

    let fields = split_row(&line).ok_or(ImportError::BadRow { line: line_no })?;
    let [raw_mbid, class_name] = <[String; 2]>::try_from(fields).map_err(|_| ImportError::BadRow { line: line_no })?;

    let mbid = Mbid::parse(&raw_mbid).map_err(|_| ImportError::InvalidIdentifier { line: line_no, input: raw_mbid })?;

    let pos = match classes.iter().position(|c| c.name == class_name) {
      Some(pos) => pos,
      None => {
        let mut cls = DatasetClass::new(keys.next_key());
        cls.name = class_name;
        classes.push(cls);
        classes.len() - 1
      }
    };

    let cls = &mut classes[pos];
    if cls.contains(&mbid) {
      return Err(ImportError::DuplicateIdentifier { line: line_no, mbid, class: cls.name.clone() });
    }
    cls.recordings.push(mbid);
  }

  let dataset = Dataset { name: name.into(), description: description.into(), classes, ..Default::default() };
  info!(classes = dataset.classes.len(), recordings = dataset.recording_count(), "csv imported");
  Ok(DatasetDraftStore::from_parts(dataset, keys))
}

/// Separa una fila en campos. `None` si hay comillas sin cerrar.
fn split_row(line: &str) -> Option<Vec<String>> {
  let mut fields = Vec::new();
  let mut current = String::new();
  let mut quoted = false;
  let mut was_quoted = false;
  let mut chars = line.trim_end_matches('\r').chars().peekable();

  while let Some(c) = chars.next() {
    match c {
      '"' if quoted => {
        if chars.peek() == Some(&'"') {
          chars.next();
          current.push('"');
        } else {
          quoted = false;
        }
      }
      '"' if current.trim().is_empty() && !was_quoted => {
        current.clear();
        quoted = true;
        was_quoted = true;
      }
      ',' if !quoted => {
        fields.push(finish_field(&mut current, was_quoted));
        was_quoted = false;
      }
      _ => current.push(c),
    }
  }

  if quoted {
    return None;
  }
  fields.push(finish_field(&mut current, was_quoted));
  Some(fields)
}

fn finish_field(current: &mut String, was_quoted: bool) -> String {
  let field = std::mem::take(current);
  if was_quoted { field } else { field.trim().to_string() }
}
