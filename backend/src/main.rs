use clap::Parser;

use abz_editor_lib::config::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  abz_editor_lib::run(Cli::parse()).await
}
