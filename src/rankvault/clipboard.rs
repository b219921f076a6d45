use crate::error::{Result, VaultError};
use std::io::Write;
use std::process::{Command, Stdio};

/// Overrides the clipboard command, e.g. `RANKVAULT_CLIPBOARD="xclip -selection primary"`.
pub const CLIPBOARD_ENV: &str = "RANKVAULT_CLIPBOARD";

#[cfg(target_os = "macos")]
const CANDIDATES: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "linux")]
const CANDIDATES: &[(&str, &[&str])] = &[
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

#[cfg(target_os = "windows")]
const CANDIDATES: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const CANDIDATES: &[(&str, &[&str])] = &[];

/// Copies text to the system clipboard.
/// - macOS: pbcopy
/// - Linux: xclip, then xsel
/// - Windows: clip
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    if let Ok(custom) = std::env::var(CLIPBOARD_ENV) {
        let mut parts = custom.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| VaultError::Api(format!("{} is empty", CLIPBOARD_ENV)))?;
        let args: Vec<&str> = parts.collect();
        return pipe_to(program, &args, text);
    }

    let mut last_error = None;
    for (program, args) in CANDIDATES {
        match pipe_to(program, args, text) {
            Ok(()) => return Ok(()),
            Err(e) => {
                log::debug!("clipboard via {} failed: {}", program, e);
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| {
        VaultError::Api("Clipboard not supported on this platform".to_string())
    }))
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .map_err(|e| VaultError::Api(format!("Failed to spawn {}: {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| VaultError::Api(format!("Failed to write to {}: {}", program, e)))?;
    }

    let status = child
        .wait()
        .map_err(|e| VaultError::Api(format!("Failed to wait for {}: {}", program, e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(VaultError::Api(format!("{} exited with {}", program, status)))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn pipe_to_succeeding_command() {
        assert!(pipe_to("cat", &[], "secret").is_ok());
    }

    #[test]
    fn pipe_to_failing_command() {
        assert!(matches!(pipe_to("false", &[], "x"), Err(VaultError::Api(_))));
    }

    #[test]
    fn pipe_to_missing_program() {
        let err = pipe_to("rankvault-no-such-clipboard", &[], "x").unwrap_err();
        assert!(err.to_string().contains("Failed to spawn"));
    }
}
