//! test-support: helpers for robust, nextest-friendly tests.
//!
//! Add as a dev-dependency in your top-level `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test_support = { path = "tests/support" }
//! ```
//!
//! Then in tests:
//! ```no_run
//! use test_support::{init_tracing, DumpFixture};
//!
//! init_tracing();
//! let fx = DumpFixture::new();
//! let dir = fx.dump_dir(2003, "0211");
//! assert!(dir.ends_with("2003/0211"));
//! ```

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

use std::fs::File;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Initialize `tracing` once, honoring `RUST_LOG` and writing via the test writer.
///
/// Safe to call from multiple tests; only the first call configures the global subscriber.
pub fn init_tracing() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("warn,test=info"))
            .unwrap();
        // with_test_writer() causes logs to appear alongside failing tests only (cargo/nextest)
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
    Lazy::force(&INIT);
}

/// Create a temp directory that deletes on drop.
pub fn tempdir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create tempdir")
}

/// Run a binary target with `assert_cmd`, returning the ready-to-run `Command`.
pub fn cmd_bin(bin: &str) -> assert_cmd::Command {
    init_tracing();
    assert_cmd::Command::cargo_bin(bin).expect("binary target not found")
}

/// Set the modification time of a file or directory.
pub fn set_mtime(path: &Path, when: SystemTime) {
    let f = File::open(path).unwrap_or_else(|e| panic!("failed to open {}: {e}", path.display()));
    f.set_modified(when)
        .unwrap_or_else(|e| panic!("failed to set mtime on {}: {e}", path.display()));
}

/// Seconds since the epoch as a `SystemTime`.
pub fn epoch_secs(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

/// A throwaway dump base laid out as `<base>/<this host>/<year>/<mmdd>/...`.
///
/// Pass [`DumpFixture::base`] to the binary's hidden `--dump-base` flag.
pub struct DumpFixture {
    dir: tempfile::TempDir,
    host_root: PathBuf,
}

impl DumpFixture {
    pub fn new() -> Self {
        let dir = tempdir();
        let host_root = dir.path().join(gethostname::gethostname());
        std::fs::create_dir_all(&host_root).expect("create host root");
        Self { dir, host_root }
    }

    /// A base directory with no host directory inside.
    pub fn without_host() -> tempfile::TempDir {
        tempdir()
    }

    pub fn base(&self) -> &Path {
        self.dir.path()
    }

    pub fn host_root(&self) -> &Path {
        &self.host_root
    }

    /// Create (if needed) and return `<host>/<year>/<mmdd>`.
    pub fn dump_dir(&self, year: i32, mmdd: &str) -> PathBuf {
        let d = self.host_root.join(format!("{year:04}")).join(mmdd);
        std::fs::create_dir_all(&d).expect("create dump dir");
        d
    }

    /// Write `contents` where the dump for `year/mmdd` keeps the absolute `live` path.
    pub fn put(&self, year: i32, mmdd: &str, live: &Path, contents: &[u8]) -> PathBuf {
        let rel: PathBuf = live
            .components()
            .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
            .collect();
        let p = self.dump_dir(year, mmdd).join(rel);
        if let Some(parent) = p.parent() {
            std::fs::create_dir_all(parent).expect("create archived parent");
        }
        std::fs::write(&p, contents).expect("write archived file");
        p
    }

    /// Pin the mtime of `<host>/<year>/<mmdd>`.
    pub fn stamp(&self, year: i32, mmdd: &str, secs: u64) {
        set_mtime(&self.dump_dir(year, mmdd), epoch_secs(secs));
    }
}

impl Default for DumpFixture {
    fn default() -> Self {
        Self::new()
    }
}
