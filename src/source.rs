//! External configuration lookups.
//!
//! The adapters never invoke OS tooling directly; they go through the
//! [`ConfigSource`] capability so tests can substitute deterministic
//! fixture text for real command output.

use crate::error::{AuditError, Result};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Raw configuration text, one fetch per origin.
///
/// Every method returns the tool's stdout verbatim; parsing is the
/// adapters' job. Errors are per-call and recoverable: the adapters
/// swallow them and move on to the next interface.
pub trait ConfigSource {
    /// The manually configured DNS servers for a network *service*
    /// (`networksetup -getdnsservers <service>` on macOS). Note this is
    /// keyed by service name ("Wi-Fi"), not interface name ("en0").
    fn custom_dns_servers(&self, service: &str) -> Result<String>;

    /// The DHCP lease packet for an interface
    /// (`ipconfig getpacket <interface>` on macOS).
    fn dhcp_lease(&self, interface: &str) -> Result<String>;

    /// The full resolver configuration dump, scoped section included
    /// (`scutil --dns` on macOS). One blob for the whole host.
    fn scoped_dns(&self) -> Result<String>;
}

/// Production [`ConfigSource`] shelling out to the macOS tools.
///
/// Each command runs under a bounded timeout; expiry kills the child
/// and surfaces [`AuditError::CommandTimeout`]. A hung `scutil` must
/// not hang the audit.
#[derive(Debug, Clone)]
pub struct SystemConfigSource {
    timeout: Duration,
}

impl SystemConfigSource {
    /// Default per-command timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a source with the default timeout.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Creates a source with a custom per-command timeout.
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SystemConfigSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for SystemConfigSource {
    fn custom_dns_servers(&self, service: &str) -> Result<String> {
        run_with_timeout("networksetup", &["-getdnsservers", service], self.timeout)
    }

    fn dhcp_lease(&self, interface: &str) -> Result<String> {
        run_with_timeout("ipconfig", &["getpacket", interface], self.timeout)
    }

    fn scoped_dns(&self) -> Result<String> {
        run_with_timeout("scutil", &["--dns"], self.timeout)
    }
}

/// Runs a command, capturing stdout, enforcing `timeout` wall-clock.
///
/// The child is reaped on a helper thread so the caller can give up
/// waiting; on timeout the child is killed by PID and the thread reaps
/// it shortly after.
fn run_with_timeout(program: &str, args: &[&str], timeout: Duration) -> Result<String> {
    let command = format!("{program} {}", args.join(" "));
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    let pid = child.id();

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // Receiver may be gone after a timeout; that's fine.
        let _ = tx.send(child.wait_with_output());
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => {
            let output = result?;
            if !output.status.success() {
                return Err(AuditError::CommandFailed {
                    command,
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }
            String::from_utf8(output.stdout).map_err(|_| AuditError::NonUtf8Output { command })
        }
        Err(_) => {
            // SAFETY: signalling a PID we spawned ourselves; if it
            // already exited the kill is a harmless ESRCH.
            #[allow(clippy::cast_possible_wrap)]
            unsafe {
                libc::kill(pid as libc::pid_t, libc::SIGKILL);
            }
            Err(AuditError::CommandTimeout {
                command,
                timeout_secs: timeout.as_secs(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout() {
        let out = run_with_timeout("sh", &["-c", "printf '8.8.8.8\\n'"], Duration::from_secs(5))
            .unwrap();
        assert_eq!(out, "8.8.8.8\n");
    }

    #[test]
    fn nonzero_exit_is_command_failed() {
        let err = run_with_timeout(
            "sh",
            &["-c", "echo oops >&2; exit 3"],
            Duration::from_secs(5),
        )
        .unwrap_err();
        match err {
            AuditError::CommandFailed { command, stderr } => {
                assert!(command.starts_with("sh"));
                assert_eq!(stderr, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(
            run_with_timeout("sh", &["-c", "exit 3"], Duration::from_secs(5))
                .unwrap_err()
                .is_lookup_failure()
        );
    }

    #[test]
    fn missing_program_is_io_error() {
        let err = run_with_timeout(
            "definitely-not-a-real-program",
            &[],
            Duration::from_secs(5),
        )
        .unwrap_err();
        assert!(matches!(err, AuditError::Io(_)));
        assert!(err.is_lookup_failure());
    }

    #[test]
    fn slow_command_times_out() {
        let err =
            run_with_timeout("sh", &["-c", "sleep 30"], Duration::from_millis(100)).unwrap_err();
        assert!(matches!(err, AuditError::CommandTimeout { .. }));
        assert!(err.is_lookup_failure());
    }
}
