// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Locate the dated dump directory under /dump/<host> and map live paths into it
// role: archive path resolution
// inputs: dump base + hostname; resolved NaiveDate; SelectionMode; absolute live paths
// outputs: DumpRoot handle; dated directory PathBuf; archived PathBuf per file
// side_effects: reads directory listings under <root>/<year> in most-recent mode; never writes
// invariants:
// - explicit modes build <root>/YYYY/MMDD without touching the filesystem
// - most-recent mode considers directories only and ranks strictly by mtime
// - mtime ties go to the entry scanned last; scan order is the listing sorted by name
// - archived path keeps the full absolute structure of the live path
// errors: missing root and unreadable year directory bubble the io error with the path; empty year dir is an error
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::date::SelectionMode;

/// `<base>/<hostname>`, checked to exist when opened.
#[derive(Debug, Clone)]
pub struct DumpRoot {
  path: PathBuf,
}

impl DumpRoot {
  pub fn open(base: &Path, hostname: &OsStr) -> Result<Self> {
    let path = base.join(hostname);
    let meta = std::fs::metadata(&path).with_context(|| format!("stat {}", path.display()))?;
    if !meta.is_dir() {
      bail!("{} is not a directory", path.display());
    }

    Ok(Self { path })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Pick the dated directory for `date`.
  ///
  /// Explicit modes name the directory from the date alone. `MostRecent`
  /// scans the year directory and returns the freshest dump; nightly dumps
  /// finish after midnight, so the newest mtime is the last complete dump
  /// regardless of what its name says.
  pub fn locate(&self, date: NaiveDate, mode: &SelectionMode) -> Result<PathBuf> {
    let year_dir = self.path.join(format!("{:04}", date.year()));

    if mode.is_explicit() {
      return Ok(year_dir.join(format!("{:02}{:02}", date.month(), date.day())));
    }

    let candidates = list_candidates(&year_dir)?;
    match most_recent(candidates) {
      Some(best) => Ok(year_dir.join(best.name)),
      None => bail!("no directory entries in {}", year_dir.display()),
    }
  }
}

/// A subdirectory of a year directory, as seen by the freshness scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
  pub name: OsString,
  pub modified: SystemTime,
}

/// Newest candidate by mtime; on equal mtimes the later one wins.
pub fn most_recent<I>(candidates: I) -> Option<Candidate>
where
  I: IntoIterator<Item = Candidate>,
{
  candidates.into_iter().fold(None, |best, c| match best {
    Some(b) if b.modified > c.modified => Some(b),
    _ => Some(c),
  })
}

fn list_candidates(year_dir: &Path) -> Result<Vec<Candidate>> {
  let entries = std::fs::read_dir(year_dir).with_context(|| format!("reading {}", year_dir.display()))?;

  let mut out = Vec::new();
  for entry in entries {
    let entry = entry.with_context(|| format!("reading {}", year_dir.display()))?;

    match entry.file_type() {
      Ok(ft) if ft.is_dir() => {}
      Ok(_) => continue,
      Err(err) => {
        debug!(entry = %entry.path().display(), %err, "skipping entry without file type");
        continue;
      }
    }

    let modified = match entry.metadata().and_then(|m| m.modified()) {
      Ok(t) => t,
      Err(err) => {
        debug!(entry = %entry.path().display(), %err, "skipping entry without mtime");
        continue;
      }
    };

    debug!(entry = %entry.path().display(), ?modified, "dump candidate");
    out.push(Candidate {
      name: entry.file_name(),
      modified,
    });
  }

  out.sort_by(|a, b| a.name.cmp(&b.name));
  Ok(out)
}

/// Mirror an absolute live path underneath the dated directory.
pub fn archived_path(dated: &Path, live: &Path) -> PathBuf {
  let rel: PathBuf = live
    .components()
    .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
    .collect();

  dated.join(rel)
}
