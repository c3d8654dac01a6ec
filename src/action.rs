// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Apply the selected action (print, copy, copy-if-different, diff) to an (archived, live) pair
// role: file actions
// inputs: Action; archived path; absolute live path; output sink
// outputs: text on the sink (archived path, "cp" echo, diff output); live file contents
// side_effects: creates/overwrites live files; spawns `diff -c`
// invariants:
// - nothing is ever written under the archived path
// - copy-if-different writes only when SHA-512 digests differ and leaves live == archived afterwards
// - file handles are dropped before returning
// errors: open/create/copy/hash failures carry the path; diff spawn failure is an error, diff exit status is not
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use tracing::{debug, info};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
  Print,
  Copy,
  CopyIfDifferent,
  Diff,
}

pub fn apply<W: Write>(action: Action, archived: &Path, live: &Path, out: &mut W) -> Result<()> {
  debug!(?action, archived = %archived.display(), live = %live.display(), "file pair");

  match action {
    Action::Print => writeln!(out, "{}", archived.display())?,
    Action::Copy => copy_file(archived, live, out)?,
    Action::CopyIfDifferent => {
      copy_if_different(archived, live, out)?;
    }
    Action::Diff => diff_files(archived, live, out)?,
  }

  Ok(())
}

/// Copy `src` over `dst`, creating or truncating `dst`.
pub fn copy_file<W: Write>(src: &Path, dst: &Path, out: &mut W) -> Result<()> {
  let mut src_file = File::open(src).with_context(|| format!("open {}", src.display()))?;
  let mut dst_file = File::create(dst).with_context(|| format!("create {}", dst.display()))?;

  writeln!(out, "cp {} {}", src.display(), dst.display())?;
  let n = io::copy(&mut src_file, &mut dst_file)
    .with_context(|| format!("copying {} to {}", src.display(), dst.display()))?;
  info!(src = %src.display(), dst = %dst.display(), bytes = n, "copied");

  Ok(())
}

/// Copy `src` over `dst` only when their contents differ. Returns whether a copy happened.
///
/// `dst` is created empty when missing, so a missing live file always
/// differs from a non-empty dump file.
pub fn copy_if_different<W: Write>(src: &Path, dst: &Path, out: &mut W) -> Result<bool> {
  let mut src_file = File::open(src).with_context(|| format!("open {}", src.display()))?;
  let src_sum = sha512_of(&mut src_file).with_context(|| format!("hashing {}", src.display()))?;

  let mut dst_file = OpenOptions::new()
    .read(true)
    .write(true)
    .create(true)
    .truncate(false)
    .open(dst)
    .with_context(|| format!("open {}", dst.display()))?;
  let dst_sum = sha512_of(&mut dst_file).with_context(|| format!("hashing {}", dst.display()))?;

  if src_sum == dst_sum {
    info!(src = %src.display(), dst = %dst.display(), "identical, not copying");
    return Ok(false);
  }

  src_file.seek(SeekFrom::Start(0))?;
  dst_file.seek(SeekFrom::Start(0))?;

  writeln!(out, "cp {} {}", src.display(), dst.display())?;
  let n = io::copy(&mut src_file, &mut dst_file)
    .with_context(|| format!("copying {} to {}", src.display(), dst.display()))?;
  // Drop any tail left over from a longer live file.
  dst_file
    .set_len(n)
    .with_context(|| format!("truncating {}", dst.display()))?;
  info!(src = %src.display(), dst = %dst.display(), bytes = n, "copied");

  Ok(true)
}

fn sha512_of<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
  let mut hasher = Sha512::new();
  io::copy(reader, &mut hasher)?;
  Ok(hasher.finalize().to_vec())
}

/// Run `diff -c archived live` and print its output.
pub fn diff_files<W: Write>(archived: &Path, live: &Path, out: &mut W) -> Result<()> {
  diff_with("diff", archived, live, out)
}

fn diff_with<W: Write>(program: &str, archived: &Path, live: &Path, out: &mut W) -> Result<()> {
  let mut cmd = Command::new(program);
  cmd.arg("-c").arg(archived).arg(live);
  writeln!(out, "{} -c {} {}", program, archived.display(), live.display())?;

  let output = cmd.output().with_context(|| format!("spawning {program}"))?;
  // diff exits 1 when the inputs differ; only a missing binary is fatal.
  debug!(status = ?output.status, "diff finished");

  out.write_all(&output.stdout)?;
  out.write_all(&output.stderr)?;

  Ok(())
}
