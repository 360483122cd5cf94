use tracing::{info, warn};

use crate::domain::{DatasetId, EditorConfig, EditorMode};
use crate::errors::CoreError;
use crate::ports::DatasetGateway;
use crate::services::DatasetDraftStore;
use crate::wire::SaveResponse;

/// Una sesión de edición: configuración explícita + borrador + gateway.
///
/// Carga (modo edición) y envío son operaciones únicas, sin reintentos. Si el
/// envío falla, el borrador queda intacto y se puede volver a llamar a
/// [`EditorSession::submit`].
pub struct EditorSession<G>
where
  G: DatasetGateway,
{
  config: EditorConfig,
  gateway: G,
  store: DatasetDraftStore,
}

impl<G> EditorSession<G>
where
  G: DatasetGateway,
{
  /// Abre la sesión: borrador vacío en creación, documento del servidor en edición.
  pub async fn open(config: EditorConfig, gateway: G) -> Result<Self, CoreError> {
    let store = match config.mode {
      EditorMode::Create => DatasetDraftStore::create_empty(),
      EditorMode::Edit => {
        let id = config.dataset_id.ok_or(CoreError::MissingDatasetId)?;
        let doc = gateway.fetch(id).await?;
        let mut store = DatasetDraftStore::load_from(&doc)?;
        // El documento de lectura no siempre trae `id`.
        store.assign_id(id);
        info!(%id, classes = store.len(), "dataset opened for editing");
        store
      }
    };

    Ok(Self { config, gateway, store })
  }

  /// Sesión de creación a partir de un borrador ya construido (p. ej. importado de CSV).
  pub fn with_draft(config: EditorConfig, gateway: G, store: DatasetDraftStore) -> Self {
    Self { config, gateway, store }
  }

  pub fn config(&self) -> &EditorConfig {
    &self.config
  }

  pub fn store(&self) -> &DatasetDraftStore {
    &self.store
  }

  pub fn store_mut(&mut self) -> &mut DatasetDraftStore {
    &mut self.store
  }

  pub fn into_store(self) -> DatasetDraftStore {
    self.store
  }

  /// Valida y envía el borrador. Devuelve el id con el que quedó guardado.
  pub async fn submit(&mut self) -> Result<DatasetId, CoreError> {
    self.store.validate_for_submit().map_err(CoreError::Invalid)?;

    let path = self.config.submit_path().ok_or(CoreError::MissingDatasetId)?;
    let payload = self.store.to_submission_payload();

    match self.gateway.submit(&path, &payload, self.config.csrf_token.as_deref()).await? {
      SaveResponse::Saved(id) => {
        self.store.assign_id(id);
        info!(%id, %path, "dataset saved");
        Ok(id)
      }
      SaveResponse::Rejected(body) => {
        let msg = SaveResponse::rejection_message(&body);
        warn!(%path, error = %msg, "dataset rejected by server");
        Err(CoreError::Rejected(msg))
      }
    }
  }
}
