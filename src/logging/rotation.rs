//! Size-based log file rotation.
//!
//! The active file is renamed to `<name>.<timestamp>` once the next write
//! would push it past the size limit. Rotated siblings older than the
//! retention window are deleted after each rotation.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::Utc;

/// Log file writer that rotates by size.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    retention: Option<Duration>,
}

impl RotatingFile {
    /// Open `path` for appending, creating parent directories as needed.
    ///
    /// `max_bytes` of zero disables rotation; `retention_days` below one keeps
    /// every rotated file.
    pub fn open(path: impl AsRef<Path>, max_bytes: u64, retention_days: i64) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = open_append(&path)?;
        let written = file.metadata()?.len();
        let retention = u64::try_from(retention_days)
            .ok()
            .filter(|days| *days > 0)
            .map(|days| Duration::from_secs(days * 24 * 60 * 60));

        Ok(Self {
            path,
            file,
            written,
            max_bytes,
            retention,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let timestamp = Utc::now().format("%Y%m%d_%H%M%S%.3f");
        let rotated = self
            .path
            .with_file_name(format!("{}.{}", self.file_name(), timestamp));
        fs::rename(&self.path, &rotated)?;

        self.file = open_append(&self.path)?;
        self.written = 0;

        // Runs inside the subscriber's writer, so it must not log through tracing.
        if let Err(e) = self.prune() {
            eprintln!("failed to prune rotated logs for {}: {}", self.path.display(), e);
        }

        Ok(())
    }

    /// Delete rotated files whose modification time is outside the retention window.
    fn prune(&self) -> io::Result<()> {
        let Some(retention) = self.retention else {
            return Ok(());
        };
        let Some(cutoff) = SystemTime::now().checked_sub(retention) else {
            return Ok(());
        };

        let prefix = format!("{}.", self.file_name());
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if !name.to_string_lossy().starts_with(&prefix) {
                continue;
            }

            let modified = entry.metadata()?.modified()?;
            if modified < cutoff {
                fs::remove_file(entry.path())?;
            }
        }

        Ok(())
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.max_bytes > 0
            && self.written > 0
            && self.written + buf.len() as u64 > self.max_bytes
        {
            self.rotate()?;
        }

        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Parse a size like "10MB", "512kb" or "1024" into bytes (binary multiples).
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty size".to_string());
    }

    let num_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (num_str, unit) = s.split_at(num_end);
    let num: u64 = num_str
        .parse()
        .map_err(|_| format!("invalid size number: {}", num_str))?;

    let multiplier: u64 = match unit.trim().to_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" => 1024,
        "m" | "mb" => 1024 * 1024,
        "g" | "gb" => 1024 * 1024 * 1024,
        other => return Err(format!("unknown size unit: {}", other)),
    };

    num.checked_mul(multiplier)
        .ok_or_else(|| format!("size too large: {}", s))
}
