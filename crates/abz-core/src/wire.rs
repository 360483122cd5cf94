//! Documentos JSON que se intercambian con el servicio de datasets.
//!
//! - lectura: `GET /datasets/service/{id}/json`
//! - guardado: `POST /datasets/service/create` o `/datasets/service/{id}/edit`
//! - trabajos de evaluación: `GET /datasets/{id}/evaluation/json` y
//!   `DELETE /datasets/{id}/{job_id}`
//!
//! El documento de lectura se valida una sola vez aquí; a partir de ese punto
//! el resto del núcleo trabaja con [`Dataset`] ya tipado.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{ClassKeys, Dataset, DatasetClass, DatasetId, EvalJobId, Mbid};
use crate::errors::DraftError;

/// Cuerpo del `POST` de guardado.
///
/// Solo lleva campos del dataset: nada de claves internas ni estado de la UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub id: Option<DatasetId>,
  pub name: String,
  pub description: String,
  pub classes: Vec<SubmittedClass>,
  pub public: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedClass {
  pub name: String,
  pub description: String,
  pub recordings: Vec<Mbid>,
}

impl From<&Dataset> for SubmissionPayload {
  fn from(ds: &Dataset) -> Self {
    SubmissionPayload {
      id: ds.id,
      name: ds.name.clone(),
      description: ds.description.clone(),
      classes: ds
        .classes
        .iter()
        .map(|c| SubmittedClass {
          name: c.name.clone(),
          description: c.description.clone(),
          recordings: c.recordings.clone(),
        })
        .collect(),
      public: ds.is_public,
    }
  }
}

/// Resultado de un guardado.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveResponse {
  Saved(DatasetId),
  /// Cuerpo de error de la aplicación, sin tocar.
  Rejected(Value),
}

impl SaveResponse {
  /// Interpreta la respuesta de éxito (`{"success": true, "dataset_id": ...}`).
  ///
  /// Si no hay `dataset_id` válido o `success` es `false`, se trata como rechazo.
  pub fn from_success_body(body: Value) -> Self {
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(true);
    let id = body.get("dataset_id").and_then(Value::as_str).and_then(DatasetId::parse);

    match (success, id) {
      (true, Some(id)) => SaveResponse::Saved(id),
      _ => SaveResponse::Rejected(body),
    }
  }

  /// Mensaje legible de un rechazo: el campo `error` si existe, si no el JSON entero.
  pub fn rejection_message(body: &Value) -> String {
    match body.get("error") {
      Some(Value::String(msg)) => msg.clone(),
      _ => body.to_string(),
    }
  }
}

/// Convierte el documento del servidor en un [`Dataset`]. Las claves de las
/// clases salen de `keys`, el contador del borrador que lo va a contener.
pub fn decode_dataset(doc: &Value, keys: &mut ClassKeys) -> Result<Dataset, DraftError> {
  let obj = doc.as_object().ok_or_else(|| DraftError::malformed("$", "expected an object"))?;

  let id = match obj.get("id") {
    None | Some(Value::Null) => None,
    Some(Value::String(s)) => {
      Some(DatasetId::parse(s).ok_or_else(|| DraftError::malformed("$.id", "not a UUID"))?)
    }
    Some(_) => return Err(DraftError::malformed("$.id", "expected a string")),
  };

  let name = required_str(obj, "name", "$")?;
  let description = optional_str(obj, "description", "$")?;

  let is_public = match obj.get("public") {
    None | Some(Value::Null) => true,
    Some(Value::Bool(b)) => *b,
    Some(_) => return Err(DraftError::malformed("$.public", "expected a boolean")),
  };

  let classes = obj
    .get("classes")
    .ok_or_else(|| DraftError::malformed("$.classes", "missing field"))?
    .as_array()
    .ok_or_else(|| DraftError::malformed("$.classes", "expected an array"))?
    .iter()
    .enumerate()
    .map(|(i, cls)| decode_class(cls, i, keys))
    .collect::<Result<Vec<_>, _>>()?;

  Ok(Dataset { id, name, description, is_public, classes })
}

fn decode_class(value: &Value, index: usize, keys: &mut ClassKeys) -> Result<DatasetClass, DraftError> {
  let path = format!("$.classes[{index}]");
  let obj = value.as_object().ok_or_else(|| DraftError::malformed(&path, "expected an object"))?;

  let name = required_str(obj, "name", &path)?;
  let description = optional_str(obj, "description", &path)?;

  let raw = obj
    .get("recordings")
    .ok_or_else(|| DraftError::malformed(format!("{path}.recordings"), "missing field"))?
    .as_array()
    .ok_or_else(|| DraftError::malformed(format!("{path}.recordings"), "expected an array"))?;

  let mut recordings: Vec<Mbid> = Vec::with_capacity(raw.len());
  for (j, rec) in raw.iter().enumerate() {
    let rec_path = format!("{path}.recordings[{j}]");
    let s = rec.as_str().ok_or_else(|| DraftError::malformed(&rec_path, "expected a string"))?;
    let mbid = Mbid::from_server(s).map_err(|_| DraftError::malformed(&rec_path, "not a UUID"))?;
    if recordings.contains(&mbid) {
      return Err(DraftError::malformed(&rec_path, format!("duplicate recording {mbid}")));
    }
    recordings.push(mbid);
  }

  let mut cls = DatasetClass::new(keys.next_key());
  cls.name = name;
  cls.description = description;
  cls.recordings = recordings;
  Ok(cls)
}

/// Estado de un trabajo de evaluación.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
  Pending,
  Running,
  Done,
  Failed,
}

impl JobStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      JobStatus::Pending => "pending",
      JobStatus::Running => "running",
      JobStatus::Done => "done",
      JobStatus::Failed => "failed",
    }
  }
}

/// Un trabajo de evaluación tal como lo lista el servidor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvalJob {
  pub id: EvalJobId,
  pub dataset_id: DatasetId,
  pub status: JobStatus,
  /// Mensaje de error cuando `status` es `failed`.
  #[serde(default)]
  pub status_msg: Option<String>,
  #[serde(default)]
  pub result: Option<EvalResult>,
  pub created: String,
  pub updated: String,
  /// El dataset se editó después de crear el trabajo. Solo viene con resultado.
  #[serde(default)]
  pub outdated: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvalResult {
  pub accuracy: f64,
  /// Matriz de confusión ya preparada por el servidor.
  #[serde(default)]
  pub table: Option<ResultTable>,
}

/// Filas = clase real, columnas = clase predicha, ambas en el orden de `classes`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultTable {
  pub classes: Vec<String>,
  pub rows: Vec<ResultRow>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultRow {
  pub total: u64,
  /// Porcentaje del dataset que ocupa la clase (0..100).
  pub proportion: f64,
  pub predicted: Vec<PredictedCell>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictedCell {
  pub count: u64,
  pub percentage: f64,
}

#[derive(Deserialize)]
struct EvalJobsDocument {
  jobs: Vec<EvalJob>,
}

/// Lista de trabajos de `GET /datasets/{id}/evaluation/json`. El resto del
/// documento (autor del dataset) se ignora.
pub fn decode_eval_jobs(doc: Value) -> Result<Vec<EvalJob>, serde_json::Error> {
  serde_json::from_value::<EvalJobsDocument>(doc).map(|d| d.jobs)
}

/// Resultado de borrar un trabajo de evaluación.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteResponse {
  Deleted,
  Rejected(Value),
}

impl DeleteResponse {
  /// `{"success": true}` es el único cuerpo que cuenta como borrado.
  pub fn from_body(body: Value) -> Self {
    match body.get("success").and_then(Value::as_bool) {
      Some(true) => DeleteResponse::Deleted,
      _ => DeleteResponse::Rejected(body),
    }
  }
}

fn required_str(obj: &Map<String, Value>, field: &str, parent: &str) -> Result<String, DraftError> {
  match obj.get(field) {
    Some(Value::String(s)) => Ok(s.clone()),
    Some(_) => Err(DraftError::malformed(format!("{parent}.{field}"), "expected a string")),
    None => Err(DraftError::malformed(format!("{parent}.{field}"), "missing field")),
  }
}

/// `null` o ausente se toma como descripción vacía.
fn optional_str(obj: &Map<String, Value>, field: &str, parent: &str) -> Result<String, DraftError> {
  match obj.get(field) {
    None | Some(Value::Null) => Ok(String::new()),
    Some(Value::String(s)) => Ok(s.clone()),
    Some(_) => Err(DraftError::malformed(format!("{parent}.{field}"), "expected a string")),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  const A: &str = "110e8400-e29b-41d4-a716-446655440000";
  const B: &str = "7d0f6a3e-1b2c-4d5e-8f90-a1b2c3d4e5f6";

  #[test]
  fn decodes_a_full_document() {
    let doc = json!({
      "id": "6f1c2b9e-8a4e-4c3d-9f7a-0b1e2d3c4f5a",
      "name": "Moods",
      "description": null,
      "public": false,
      "classes": [
        {"name": "happy", "description": "upbeat", "recordings": [A, B]},
        {"name": "sad", "recordings": []}
      ]
    });

    let ds = decode_dataset(&doc, &mut ClassKeys::new()).unwrap();
    assert_eq!(ds.id.unwrap().to_string(), "6f1c2b9e-8a4e-4c3d-9f7a-0b1e2d3c4f5a");
    assert_eq!(ds.name, "Moods");
    assert_eq!(ds.description, "");
    assert!(!ds.is_public);
    assert_eq!(ds.classes.len(), 2);
    assert_eq!(ds.classes[0].recordings.len(), 2);
    assert_eq!(ds.classes[1].description, "");
    assert_ne!(ds.classes[0].key, ds.classes[1].key);
  }

  #[test]
  fn public_defaults_to_true() {
    let ds = decode_dataset(&json!({"name": "x", "description": "", "classes": []}), &mut ClassKeys::new()).unwrap();
    assert!(ds.is_public);
    assert!(ds.id.is_none());
  }

  #[test]
  fn reports_path_of_the_problem() {
    let cases = [
      (json!([]), "$"),
      (json!({"classes": []}), "$.name"),
      (json!({"name": 3, "classes": []}), "$.name"),
      (json!({"name": "x"}), "$.classes"),
      (json!({"name": "x", "classes": {}}), "$.classes"),
      (json!({"name": "x", "classes": [], "public": "yes"}), "$.public"),
      (json!({"name": "x", "classes": [{"recordings": []}]}), "$.classes[0].name"),
      (json!({"name": "x", "classes": [{"name": "a"}]}), "$.classes[0].recordings"),
      (json!({"name": "x", "classes": [{"name": "a", "recordings": [1]}]}), "$.classes[0].recordings[0]"),
      (json!({"name": "x", "classes": [{"name": "a", "recordings": ["zz"]}]}), "$.classes[0].recordings[0]"),
      (json!({"name": "x", "classes": [{"name": "a", "recordings": [A, A]}]}), "$.classes[0].recordings[1]"),
    ];

    for (doc, expected) in cases {
      match decode_dataset(&doc, &mut ClassKeys::new()) {
        Err(DraftError::MalformedDocument { path, .. }) => assert_eq!(path, expected, "doc: {doc}"),
        other => panic!("expected MalformedDocument for {doc}, got {other:?}"),
      }
    }
  }

  #[test]
  fn accepts_any_uuid_the_server_stored() {
    // versión 0, variante 0: el servidor lo guarda aunque el editor no lo acepte
    let odd = "110E8400-E29B-01D4-0716-446655440000";
    let doc = json!({"name": "x", "classes": [{"name": "a", "recordings": [odd, A]}]});

    let ds = decode_dataset(&doc, &mut ClassKeys::new()).unwrap();
    assert_eq!(ds.classes[0].recordings[0].as_str(), odd.to_lowercase());

    let payload = serde_json::to_value(SubmissionPayload::from(&ds)).unwrap();
    assert_eq!(payload["classes"][0]["recordings"], json!([odd.to_lowercase(), A]));
  }

  #[test]
  fn class_keys_come_from_the_given_counter() {
    let mut keys = ClassKeys::new();
    let first = keys.next_key();
    let doc = json!({"name": "x", "classes": [{"name": "a", "recordings": []}]});

    let ds = decode_dataset(&doc, &mut keys).unwrap();
    assert!(ds.classes[0].key > first);
    assert!(keys.next_key() > ds.classes[0].key);
  }

  #[test]
  fn decodes_eval_jobs() {
    let doc = json!({
      "jobs": [
        {
          "id": "0f3c1a2b-4d5e-4f60-8a7b-9c0d1e2f3a4b",
          "dataset_id": "6f1c2b9e-8a4e-4c3d-9f7a-0b1e2d3c4f5a",
          "status": "done",
          "status_msg": null,
          "created": "Tue, 01 Mar 2016 10:00:00 GMT",
          "updated": "Tue, 01 Mar 2016 10:05:00 GMT",
          "outdated": true,
          "result": {
            "accuracy": 87.5,
            "confusion_matrix": {"happy": {"happy": 7, "sad": 1}},
            "table": {
              "classes": ["happy", "sad"],
              "rows": [
                {"total": 8, "proportion": 50.0, "predicted": [
                  {"count": 7, "percentage": 87.5}, {"count": 1, "percentage": 12.5}
                ]},
                {"total": 8, "proportion": 50.0, "predicted": [
                  {"count": 1, "percentage": 12.5}, {"count": 7, "percentage": 87.5}
                ]}
              ]
            }
          }
        },
        {
          "id": "1a2b3c4d-5e6f-4a7b-8c9d-0e1f2a3b4c5d",
          "dataset_id": "6f1c2b9e-8a4e-4c3d-9f7a-0b1e2d3c4f5a",
          "status": "pending",
          "status_msg": null,
          "result": null,
          "created": "Wed, 02 Mar 2016 10:00:00 GMT",
          "updated": "Wed, 02 Mar 2016 10:00:00 GMT"
        }
      ],
      "dataset": {"author": {"id": 1, "musicbrainz_id": "someone"}}
    });

    let jobs = decode_eval_jobs(doc).unwrap();
    assert_eq!(jobs.len(), 2);

    let done = &jobs[0];
    assert_eq!(done.status, JobStatus::Done);
    assert!(done.outdated);
    let result = done.result.as_ref().unwrap();
    assert_eq!(result.accuracy, 87.5);
    let table = result.table.as_ref().unwrap();
    assert_eq!(table.classes, vec!["happy", "sad"]);
    assert_eq!(table.rows[0].predicted[1].count, 1);

    let pending = &jobs[1];
    assert_eq!(pending.status, JobStatus::Pending);
    assert!(pending.result.is_none());
    assert!(!pending.outdated);
  }

  #[test]
  fn eval_jobs_reject_unknown_status() {
    let doc = json!({"jobs": [{
      "id": "1a2b3c4d-5e6f-4a7b-8c9d-0e1f2a3b4c5d",
      "dataset_id": "6f1c2b9e-8a4e-4c3d-9f7a-0b1e2d3c4f5a",
      "status": "exploded",
      "created": "", "updated": ""
    }]});
    assert!(decode_eval_jobs(doc).is_err());
  }

  #[test]
  fn delete_response_parsing() {
    assert_eq!(DeleteResponse::from_body(json!({"success": true})), DeleteResponse::Deleted);
    let body = json!({"success": false, "error": "You are not allowed to delete this evaluation job."});
    assert_eq!(DeleteResponse::from_body(body.clone()), DeleteResponse::Rejected(body));
    assert!(matches!(DeleteResponse::from_body(json!({})), DeleteResponse::Rejected(_)));
  }

  #[test]
  fn payload_omits_missing_id() {
    let ds = Dataset { name: "x".into(), ..Default::default() };
    let value = serde_json::to_value(SubmissionPayload::from(&ds)).unwrap();
    assert_eq!(value, json!({"name": "x", "description": "", "classes": [], "public": true}));
  }

  #[test]
  fn save_response_parsing() {
    let ok = SaveResponse::from_success_body(
      json!({"success": true, "dataset_id": "6f1c2b9e-8a4e-4c3d-9f7a-0b1e2d3c4f5a"}),
    );
    assert!(matches!(ok, SaveResponse::Saved(_)));

    let body = json!({"success": false, "error": "Dataset must have a name."});
    match SaveResponse::from_success_body(body) {
      SaveResponse::Rejected(b) => assert_eq!(SaveResponse::rejection_message(&b), "Dataset must have a name."),
      other => panic!("unexpected {other:?}"),
    }

    assert_eq!(SaveResponse::rejection_message(&json!({"code": 1})), r#"{"code":1}"#);
  }
}
