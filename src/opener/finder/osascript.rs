use std::io::{ErrorKind as IoErrorKind, Read};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::constants::timing::SCRIPT_POLL_INTERVAL;
use crate::constants::OSASCRIPT_EXECUTABLE;
use crate::error::{AppError, Result};

/// Executes AppleScript source.
pub trait ScriptRunner: Send + Sync {
    /// Run `script` to completion, blocking for at most `timeout`.
    /// Returns trimmed stdout on exit status 0.
    fn run(&self, script: &str, timeout: Duration) -> Result<String>;

    /// Start `script` without waiting for it.
    fn spawn(&self, script: &str) -> Result<()>;
}

/// [`ScriptRunner`] backed by the system `osascript` binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsaScript;

fn spawn_error(e: std::io::Error) -> AppError {
    if e.kind() == IoErrorKind::NotFound {
        AppError::Script("osascript not found (not macOS?)".to_string())
    } else {
        AppError::Io(e)
    }
}

/// Read a child pipe to the end on its own thread, so the script never
/// stalls on a full pipe buffer while we poll for exit.
fn drain<P: Read + Send + 'static>(pipe: Option<P>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            if let Err(e) = pipe.read_to_end(&mut buf) {
                log::debug!("osascript pipe read failed: {}", e);
            }
            buf
        })
    })
}

fn collect_output(reader: Option<JoinHandle<Vec<u8>>>) -> String {
    let bytes = reader.and_then(|r| r.join().ok()).unwrap_or_default();
    String::from_utf8_lossy(&bytes).trim().to_string()
}

impl ScriptRunner for OsaScript {
    fn run(&self, script: &str, timeout: Duration) -> Result<String> {
        let mut child = Command::new(OSASCRIPT_EXECUTABLE)
            .arg("-e")
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if started.elapsed() >= timeout {
                log::warn!("osascript exceeded {:?}, killing it", timeout);
                let _ = child.kill();
                let _ = child.wait();
                return Err(AppError::ScriptTimeout {
                    secs: timeout.as_secs(),
                });
            }
            thread::sleep(SCRIPT_POLL_INTERVAL);
        };

        if status.success() {
            Ok(collect_output(stdout))
        } else {
            Err(AppError::Script(collect_output(stderr)))
        }
    }

    fn spawn(&self, script: &str) -> Result<()> {
        let mut child = Command::new(OSASCRIPT_EXECUTABLE)
            .arg("-e")
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(spawn_error)?;

        // Reap the child in the background so it does not linger as a zombie.
        thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}
