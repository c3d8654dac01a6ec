// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for lexical path absolutization, the effective "now", and man page rendering
// role: utilities/helpers
// inputs: working directory and user paths; optional now override string; clap CommandFactory
// outputs: absolute cleaned PathBuf; DateTime<Local>; man page text
// side_effects: none
// invariants:
// - absolutize never touches the filesystem (no symlink resolution)
// - absolutize output is absolute with no "." or ".." components
// errors: unparseable --now-override is an error rather than silently ignored
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Component, Path, PathBuf};

use anyhow::{Result, anyhow};
use chrono::{DateTime, Local};
use clap::CommandFactory;

/// Join `p` onto `cwd` when relative, then clean it lexically.
///
/// `..` at the root stays at the root, matching how the kernel treats `/..`.
pub fn absolutize(cwd: &Path, p: &Path) -> PathBuf {
  let joined = if p.is_absolute() { p.to_path_buf() } else { cwd.join(p) };

  let mut out = PathBuf::new();
  for comp in joined.components() {
    match comp {
      Component::CurDir => {}
      Component::ParentDir => {
        if out.parent().is_some() {
          out.pop();
        }
      }
      other => out.push(other.as_os_str()),
    }
  }
  out
}

/// Returns the effective "now" given an optional override.
pub fn effective_now(override_now: Option<DateTime<Local>>) -> DateTime<Local> {
  override_now.unwrap_or_else(Local::now)
}

/// Parse a `--now-override` string into a local DateTime.
/// Accepts RFC3339 (e.g. 2025-08-15T12:00:00Z) or a naive local timestamp
/// formatted as `%Y-%m-%dT%H:%M:%S`.
pub fn parse_now_override(s: Option<&str>) -> Result<Option<DateTime<Local>>> {
  let Some(raw) = s else {
    return Ok(None);
  };

  chrono::DateTime::parse_from_rfc3339(raw)
    .ok()
    .map(|dt| dt.with_timezone(&Local))
    .or_else(|| {
      chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .and_then(|ndt| ndt.and_local_timezone(Local).single())
    })
    .map(Some)
    .ok_or_else(|| anyhow!("invalid --now-override: {raw}"))
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
