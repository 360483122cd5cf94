pub mod config;
mod infrastructure;

use std::fmt::Write as _;
use std::fs::File;
use std::io::BufReader;

use abz_config::{AbzPaths, AppConfig, TomlConfigBackend};
use abz_core::domain::Dataset;
use abz_core::ports::DatasetGateway;
use abz_core::services::{EditorSession, EvalJobService, check_complete, import_csv};
use abz_core::wire::EvalJob;
use abz_http::HttpGateway;
use anyhow::{Context, bail};
use tracing::{info, warn};

use crate::config::{Cli, Command, editor_config};

/// Runs one command against the dataset service.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
  // --- Configuration ---
  // The config file lives under ABZ_BASE_DIR or the platform config dir.
  let backend = TomlConfigBackend::new(AbzPaths::detect()?);
  let app_cfg = AppConfig::load_or_init(&backend).context("failed to load configuration")?;

  infrastructure::logging::init(&app_cfg.logging);

  let server = cli.server_config(app_cfg.server.clone());
  info!(base_url = %server.base_url, "using dataset service");

  // --- Gateway adapter (HTTP) ---
  let gateway = HttpGateway::new(&server)?;

  match cli.command {
    Command::Show { dataset } => {
      let session = EditorSession::open(editor_config(Some(dataset), &server), gateway).await?;
      print!("{}", summarize(session.store().dataset()));
    }

    Command::Import { csv, name, description, private, dry_run } => {
      let file = File::open(&csv).with_context(|| format!("cannot open {}", csv.display()))?;
      let mut store = import_csv(name, description, BufReader::new(file))?;
      store.set_public(app_cfg.editor.default_public && !private);

      if dry_run {
        println!("{}", serde_json::to_string_pretty(&store.to_submission_payload())?);
        return Ok(());
      }

      let mut session = EditorSession::with_draft(editor_config(None, &server), gateway, store);
      submit(&mut session, app_cfg.editor.check_readiness_on_submit).await?;
    }

    Command::AddRecordings { dataset, class, recordings } => {
      if class == 0 {
        bail!("class positions start at 1");
      }

      let mut session = EditorSession::open(editor_config(Some(dataset), &server), gateway).await?;
      let mut added = 0usize;
      for raw in &recordings {
        match session.store_mut().add_recording(class - 1, raw) {
          Ok(mbid) => {
            added += 1;
            info!(%mbid, "recording added");
          }
          // Bad input is skipped; a bad class position aborts.
          Err(e) if e.is_user_input() => warn!(input = %raw, error = %e, "recording skipped"),
          Err(e) => return Err(e.into()),
        }
      }

      if added == 0 {
        bail!("no recordings were added");
      }
      submit(&mut session, app_cfg.editor.check_readiness_on_submit).await?;
    }

    Command::Check { dataset } => {
      let session = EditorSession::open(editor_config(Some(dataset), &server), gateway).await?;
      match check_complete(session.store().dataset()) {
        Ok(()) => println!("Dataset is ready for evaluation."),
        Err(errors) => {
          for e in &errors {
            println!("- {e}");
          }
          bail!("dataset is not ready for evaluation ({} problems)", errors.len());
        }
      }
    }

    Command::Jobs { dataset, delete } => {
      let service = EvalJobService::new(gateway, server.csrf_token.clone());
      match delete {
        Some(job) => {
          service.delete_pending(dataset, job).await?;
          println!("Evaluation job {job} removed from the queue.");
        }
        None => print!("{}", describe_jobs(&service.list(dataset).await?)),
      }
    }
  }

  Ok(())
}

async fn submit<G: DatasetGateway>(session: &mut EditorSession<G>, check_readiness: bool) -> anyhow::Result<()> {
  if check_readiness {
    if let Err(errors) = check_complete(session.store().dataset()) {
      for e in errors {
        warn!(problem = %e, "dataset cannot be evaluated yet");
      }
    }
  }

  let id = session.submit().await?;
  println!("Dataset saved: {id}");
  Ok(())
}

/// Human-readable listing used by `show`.
fn summarize(ds: &Dataset) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{} ({})", ds.name, if ds.is_public { "public" } else { "private" });
  if !ds.description.is_empty() {
    let _ = writeln!(out, "{}", ds.description);
  }
  for (i, cls) in ds.classes.iter().enumerate() {
    let _ = writeln!(out, "  {}. {} [{} recordings]", i + 1, cls.display_name(i), cls.recordings.len());
  }
  out
}

/// Listing used by `jobs`, one line per job plus its failure message.
fn describe_jobs(jobs: &[EvalJob]) -> String {
  if jobs.is_empty() {
    return "No evaluation jobs.\n".to_string();
  }

  let mut out = String::new();
  for job in jobs {
    let _ = write!(out, "{} {:<8} created {}", job.id, job.status.as_str(), job.created);
    if let Some(result) = &job.result {
      let _ = write!(out, ", accuracy {:.2}%", result.accuracy);
      if job.outdated {
        out.push_str(" (dataset changed since)");
      }
    }
    out.push('\n');
    if let Some(msg) = job.status_msg.as_deref().filter(|m| !m.is_empty()) {
      let _ = writeln!(out, "    {msg}");
    }
  }
  out
}
