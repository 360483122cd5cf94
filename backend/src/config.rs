use std::path::PathBuf;

use abz_config::ServerConfig;
use abz_core::domain::{DatasetId, EditorConfig, EvalJobId};
use clap::{Parser, Subcommand};

/// Command-line arguments for abz-editor
#[derive(Parser, Debug)]
#[command(name = "abz-editor")]
#[command(about = "Create and edit AcousticBrainz datasets from the command line")]
#[command(version)]
pub struct Cli {
  /// Dataset service URL (overrides `[server] base_url`)
  #[arg(long, global = true, env = "ABZ_BASE_URL")]
  pub base_url: Option<String>,

  /// CSRF token sent with save requests (overrides `[server] csrf_token`)
  #[arg(long, global = true, env = "ABZ_CSRF_TOKEN")]
  pub csrf_token: Option<String>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Print a dataset's classes and recording counts
  Show {
    #[arg(value_parser = parse_dataset_id)]
    dataset: DatasetId,
  },

  /// Create a dataset from a CSV file of `<mbid>,<class name>` rows
  Import {
    csv: PathBuf,

    #[arg(long)]
    name: String,

    #[arg(long, default_value = "")]
    description: String,

    /// Create the dataset as private
    #[arg(long)]
    private: bool,

    /// Print the payload instead of sending it
    #[arg(long)]
    dry_run: bool,
  },

  /// Add recordings (MBIDs or MusicBrainz URLs) to a class of an existing dataset
  AddRecordings {
    #[arg(value_parser = parse_dataset_id)]
    dataset: DatasetId,

    /// Class position, starting at 1 as shown by `show`
    #[arg(long = "class")]
    class: usize,

    #[arg(required = true)]
    recordings: Vec<String>,
  },

  /// Check whether a dataset meets the evaluation requirements
  Check {
    #[arg(value_parser = parse_dataset_id)]
    dataset: DatasetId,
  },

  /// List a dataset's evaluation jobs, or remove a pending one
  Jobs {
    #[arg(value_parser = parse_dataset_id)]
    dataset: DatasetId,

    /// Remove this job from the evaluation queue (pending jobs only)
    #[arg(long, value_parser = parse_job_id)]
    delete: Option<EvalJobId>,
  },
}

fn parse_dataset_id(s: &str) -> Result<DatasetId, String> {
  DatasetId::parse(s).ok_or_else(|| format!("\"{s}\" is not a dataset id"))
}

fn parse_job_id(s: &str) -> Result<EvalJobId, String> {
  EvalJobId::parse(s).ok_or_else(|| format!("\"{s}\" is not a job id"))
}

impl Cli {
  /// Applies command-line overrides on top of the `[server]` section.
  pub fn server_config(&self, mut cfg: ServerConfig) -> ServerConfig {
    if let Some(url) = &self.base_url {
      cfg.base_url = url.clone();
    }
    if let Some(token) = &self.csrf_token {
      cfg.csrf_token = Some(token.clone());
    }
    cfg
  }
}

/// Builds the explicit session configuration for a command.
pub fn editor_config(dataset: Option<DatasetId>, server: &ServerConfig) -> EditorConfig {
  let cfg = match dataset {
    Some(id) => EditorConfig::edit(id),
    None => EditorConfig::create(),
  };
  match &server.csrf_token {
    Some(token) => cfg.with_csrf_token(token.clone()),
    None => cfg,
  }
}
