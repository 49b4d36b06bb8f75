//! Logger setup.
//!
//! Log records never go straight to the terminal while the TUI owns it: they
//! are either written to a file or held back until the terminal is restored.

use std::{
    fs::File,
    io::{self, Write},
    path::Path,
    sync::{Arc, Mutex},
};

use anyhow::Context;
use env_logger::{Builder, Env, Target};

fn builder() -> Builder {
    Builder::from_env(Env::default().default_filter_or("warn"))
}

/// Logs to stderr, filtered by `RUST_LOG` (default `warn`).
pub fn init_stderr() {
    builder().init();
}

/// Appends log records to `path`.
pub fn init_file(path: &Path) -> anyhow::Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;
    builder()
        .format_timestamp_millis()
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Collects log records in memory until [`HeldLog::release`] is called.
pub fn init_held() -> HeldLog {
    let held = HeldLog::default();
    builder()
        .target(Target::Pipe(Box::new(held.clone())))
        .init();
    held
}

#[derive(Debug, Clone, Default)]
pub struct HeldLog {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl HeldLog {
    /// Writes the collected records to stderr.
    pub fn release(&self) -> io::Result<()> {
        self.release_to(io::stderr().lock())
    }

    /// Writes the collected records to `writer` and empties the buffer.
    pub fn release_to<W>(&self, mut writer: W) -> io::Result<()>
    where
        W: Write,
    {
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| io::Error::other("log buffer lock poisoned"))?;
        writer.write_all(&buffer)?;
        buffer.clear();
        Ok(())
    }
}

impl Write for HeldLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| io::Error::other("log buffer lock poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_log_collects_writes() {
        let held = HeldLog::default();
        let mut writer = held.clone();
        writer.write_all(b"[WARN] one\n").unwrap();
        writer.write_all(b"[WARN] two\n").unwrap();
        assert_eq!(
            held.buffer.lock().unwrap().as_slice(),
            b"[WARN] one\n[WARN] two\n"
        );
    }

    #[test]
    fn test_release_drains_buffer() {
        let held = HeldLog::default();
        held.clone().write_all(b"[WARN] once\n").unwrap();
        let mut out = Vec::new();
        held.release_to(&mut out).unwrap();
        held.release_to(&mut out).unwrap();
        assert_eq!(out, b"[WARN] once\n");
    }
}
