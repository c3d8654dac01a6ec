// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Turn a selection mode (most recent, days ago, partial date digits) into a calendar date
// role: date resolution
// inputs: reference "now" as NaiveDate; SelectionMode
// outputs: NaiveDate
// side_effects: none
// invariants:
// - overlay always produces an 8-character YYYYMMDD candidate for lengths 1, 2, 4, 6, 8
// - a single digit replaces the whole day field as 0d (never keeps the tens digit of now)
// - MostRecent returns now unchanged; the dump scan decides the real directory
// errors: "invalid date: <digits>" for bad lengths/non-digits; calendar errors carry the candidate string
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

const LAYOUT: &str = "%Y%m%d";

/// How the user picked a dump.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum SelectionMode {
  MostRecent,
  DaysAgo(u32),
  ExplicitDate(String),
}

impl SelectionMode {
  /// Explicit modes name a dump directly; only `MostRecent` needs a scan.
  pub fn is_explicit(&self) -> bool {
    !matches!(self, SelectionMode::MostRecent)
  }
}

pub fn resolve(now: NaiveDate, mode: &SelectionMode) -> Result<NaiveDate> {
  match mode {
    SelectionMode::MostRecent => Ok(now),
    SelectionMode::DaysAgo(n) => now
      .checked_sub_days(Days::new(u64::from(*n)))
      .ok_or_else(|| anyhow!("{n} days before {now} is out of range")),
    SelectionMode::ExplicitDate(digits) => {
      let candidate = overlay(now, digits)?;
      parse_yyyymmdd(&candidate)
    }
  }
}

/// Right-align `digits` over `now` rendered as YYYYMMDD.
pub fn overlay(now: NaiveDate, digits: &str) -> Result<String> {
  if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
    bail!("invalid date: {digits}");
  }

  let reference = now.format(LAYOUT).to_string();

  match digits.len() {
    1 => Ok(format!("{}0{}", &reference[..6], digits)),
    2 | 4 | 6 | 8 => Ok(format!("{}{}", &reference[..8 - digits.len()], digits)),
    _ => bail!("invalid date: {digits}"),
  }
}

fn parse_yyyymmdd(candidate: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(candidate, LAYOUT).with_context(|| format!("parsing date {candidate:?}"))
}
