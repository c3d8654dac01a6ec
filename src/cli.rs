use anyhow::{Result, bail};
use clap::{ArgGroup, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::action::Action;
use crate::date::SelectionMode;

pub const USAGE: &str = "yesterday [-c | -C | -d] [-n daysago | -t [[yy]yy]mm]dd] file...";

#[derive(Parser, Debug)]
#[command(
    name = "yesterday",
    version,
    about = "Print the names of files from the most recent dump",
    long_about = "Print the names of files from the most recent dump.\n\n\
      Dumps are taken early in the morning, so yesterday's files live in today's dump \
      under /dump/<host>/<year>/<mmdd>. By default the freshest dump of the current \
      year is used; the printed name need not exist.",
    override_usage = USAGE,
    group(ArgGroup::new("action").args(["copy", "copy_if_different", "diff"]).multiple(false)),
)]
pub struct Cli {
  /// Copy the dump files over the named files
  #[arg(short = 'c')]
  pub copy: bool,

  /// Copy the dump files over the named files only when they differ
  #[arg(short = 'C')]
  pub copy_if_different: bool,

  /// Run `diff -c` to compare the dump files with the named files
  #[arg(short = 'd')]
  pub diff: bool,

  /// Select the dump DAYSAGO days prior to the current day
  #[arg(short = 'n', value_name = "DAYSAGO", conflicts_with = "date")]
  pub days_ago: Option<u32>,

  /// Select another day's dump: d, dd, mmdd, yymmdd, or yyyymmdd
  #[arg(short = 't', value_name = "DATE")]
  pub date: Option<String>,

  /// Files to look up in the dump
  #[arg(value_name = "FILE", required_unless_present = "gen_man")]
  pub files: Vec<PathBuf>,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,

  /// Directory holding per-host dumps (hidden; tests only)
  #[arg(long = "dump-base", hide = true, default_value = "/dump")]
  pub dump_base: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EffectiveConfig {
  pub mode: SelectionMode,
  pub action: Action,
  pub files: Vec<PathBuf>,
  pub dump_base: PathBuf,
  pub now_override: Option<String>,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  // -n 0 means "no offset", same as leaving -n off.
  let mode = match (cli.days_ago.filter(|n| *n > 0), cli.date) {
    (None, None) => SelectionMode::MostRecent,
    (Some(n), None) => SelectionMode::DaysAgo(n),
    (None, Some(d)) => SelectionMode::ExplicitDate(d),
    (Some(_), Some(_)) => bail!("-n and -t are mutually exclusive"),
  };

  let action = match (cli.copy, cli.copy_if_different, cli.diff) {
    (false, false, false) => Action::Print,
    (true, false, false) => Action::Copy,
    (false, true, false) => Action::CopyIfDifferent,
    (false, false, true) => Action::Diff,
    _ => bail!("-c, -C and -d are mutually exclusive"),
  };

  Ok(EffectiveConfig {
    mode,
    action,
    files: cli.files,
    dump_base: cli.dump_base,
    now_override: cli.now_override,
  })
}
