use predicates::prelude::*;
use test_support::{DumpFixture, cmd_bin};

#[test]
fn no_files_is_a_usage_error() {
  cmd_bin("yesterday")
    .arg("-c")
    .assert()
    .code(2)
    .stderr(predicate::str::contains("yesterday [-c | -C | -d] [-n daysago | -t [[yy]yy]mm]dd] file..."));
}

#[test]
fn days_ago_with_date_is_a_usage_error() {
  cmd_bin("yesterday").args(["-n", "1", "-t", "11", "f"]).assert().code(2);
}

#[test]
fn two_actions_is_a_usage_error() {
  cmd_bin("yesterday").args(["-C", "-d", "f"]).assert().code(2);
}

#[test]
fn missing_host_root_is_fatal() {
  let base = DumpFixture::without_host();
  cmd_bin("yesterday")
    .arg("--dump-base")
    .arg(base.path())
    .arg("/etc/motd")
    .assert()
    .code(1)
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::starts_with("yesterday: stat "));
}

#[test]
fn malformed_date_digits_are_fatal() {
  let fx = DumpFixture::new();
  cmd_bin("yesterday")
    .arg("--dump-base")
    .arg(fx.base())
    .args(["-t", "123", "/etc/motd"])
    .assert()
    .code(1)
    .stderr(predicate::eq("yesterday: invalid date: 123\n"));
}

#[test]
fn impossible_day_is_fatal() {
  let fx = DumpFixture::new();
  cmd_bin("yesterday")
    .arg("--dump-base")
    .arg(fx.base())
    .args(["--now-override", "2024-02-18T09:00:00", "-t", "32", "/etc/motd"])
    .assert()
    .code(1)
    .stderr(predicate::str::starts_with("yesterday: parsing date \"20240232\""));
}

#[test]
fn empty_year_directory_is_fatal() {
  let fx = DumpFixture::new();
  std::fs::create_dir_all(fx.host_root().join("2024")).unwrap();
  cmd_bin("yesterday")
    .arg("--dump-base")
    .arg(fx.base())
    .args(["--now-override", "2024-02-18T09:00:00", "/etc/motd"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("no directory entries in"));
}

#[test]
fn missing_year_directory_is_fatal() {
  let fx = DumpFixture::new();
  cmd_bin("yesterday")
    .arg("--dump-base")
    .arg(fx.base())
    .args(["--now-override", "2024-02-18T09:00:00", "/etc/motd"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("reading ").and(predicate::str::contains("2024")));
}
