use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod action;
mod cli;
mod date;
mod locator;
mod util;

use crate::cli::{Cli, normalize};
use crate::locator::DumpRoot;

fn main() {
  // Usage errors exit 2 from inside clap.
  let cli = Cli::parse();
  init_tracing();

  if let Err(err) = run(cli) {
    eprintln!("yesterday: {err:#}");
    std::process::exit(1);
  }
}

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .without_time()
    .with_target(false)
    .try_init();
}

fn run(cli: Cli) -> Result<()> {
  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;
  debug!(config = %serde_json::to_string(&cfg)?, "effective config");

  // Phase 2: resolve the reference date
  let now = util::effective_now(util::parse_now_override(cfg.now_override.as_deref())?);
  let date = date::resolve(now.date_naive(), &cfg.mode)?;
  debug!(%date, "reference date");

  // Phase 3: locate the dump
  let cwd = std::env::current_dir().context("getting working directory")?;
  let hostname = gethostname::gethostname();
  let root = DumpRoot::open(&cfg.dump_base, &hostname)?;
  let dated = root.locate(date, &cfg.mode)?;
  debug!(root = %root.path().display(), dated = %dated.display(), "dump directory");

  // Phase 4: one action per file, in order; the first failure stops the run
  let stdout = io::stdout();
  let mut out = stdout.lock();
  for f in &cfg.files {
    let live = util::absolutize(&cwd, f);
    let archived = locator::archived_path(&dated, &live);
    action::apply(cfg.action, &archived, &live, &mut out)?;
    out.flush()?;
  }

  Ok(())
}
