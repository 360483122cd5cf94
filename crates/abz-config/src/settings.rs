use serde::{Deserialize, Serialize};

use crate::backend::ConfigBackend;
use crate::paths::ConfigError;

/// Sección `[server]`: dónde vive el servicio de datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_base_url")]
  pub base_url: String,

  /// Tiempo máximo por petición, en segundos.
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,

  /// Token CSRF de la sesión web, si el servidor lo exige.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub csrf_token: Option<String>,
}

fn default_base_url() -> String {
  "https://acousticbrainz.org".to_string()
}

fn default_timeout_secs() -> u64 {
  30
}

impl Default for ServerConfig {
  fn default() -> Self {
    ServerConfig { base_url: default_base_url(), timeout_secs: default_timeout_secs(), csrf_token: None }
  }
}

/// Sección `[editor]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSettings {
  /// Visibilidad de los datasets nuevos.
  #[serde(default = "default_true")]
  pub default_public: bool,

  /// Comprobar las reglas de evaluación antes de enviar (solo avisa).
  #[serde(default)]
  pub check_readiness_on_submit: bool,
}

fn default_true() -> bool {
  true
}

impl Default for EditorSettings {
  fn default() -> Self {
    EditorSettings { default_public: true, check_readiness_on_submit: false }
  }
}

/// Sección `[logging]`. `RUST_LOG` tiene prioridad sobre `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
  #[serde(default = "default_level")]
  pub level: String,
}

fn default_level() -> String {
  "info".to_string()
}

impl Default for LoggingConfig {
  fn default() -> Self {
    LoggingConfig { level: default_level() }
  }
}

/// Todas las secciones que usa el editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
  pub server: ServerConfig,
  pub editor: EditorSettings,
  pub logging: LoggingConfig,
}

impl AppConfig {
  /// Carga cada sección (o su valor por defecto) y vuelve a escribirlas para
  /// que el fichero muestre todas las claves disponibles.
  pub fn load_or_init<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    let cfg = Self::load_from(backend)?;
    cfg.save(backend)?;
    Ok(cfg)
  }

  /// Variante sin escritura.
  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    Ok(AppConfig {
      server: backend.load_section_with_default("server")?,
      editor: backend.load_section_with_default("editor")?,
      logging: backend.load_section_with_default("logging")?,
    })
  }

  pub fn save<B: ConfigBackend>(&self, backend: &B) -> Result<(), ConfigError> {
    backend.save_section("server", &self.server)?;
    backend.save_section("editor", &self.editor)?;
    backend.save_section("logging", &self.logging)
  }
}
