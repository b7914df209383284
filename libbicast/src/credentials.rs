//! Encrypted credentials handling
//!
//! The credentials file lives on disk encrypted (GPG by default). Loading
//! shells out to the decryption tool, parses the transient plaintext, and
//! removes the plaintext again on every exit path, parse failures included.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::config::{plaintext_path, Credentials};
use crate::error::{CredentialError, Result};

/// Wrapper around the external decryption tool
///
/// The subprocess inherits stdio so a passphrase prompt stays interactive
/// on the invoking terminal.
pub struct Decryptor {
    program: String,
}

impl Decryptor {
    /// Decryptor using the tool named by `BICAST_GPG`, defaulting to `gpg`
    pub fn new() -> Self {
        let program = std::env::var("BICAST_GPG").unwrap_or_else(|_| "gpg".to_string());
        Self { program }
    }

    /// Decryptor using an explicit tool, mainly for tests
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Decrypt `encrypted` into `dest`
    pub fn decrypt(&self, encrypted: &Path, dest: &Path) -> Result<()> {
        debug!("Decrypting {} with {}", encrypted.display(), self.program);

        let status = Command::new(&self.program)
            .arg("--quiet")
            .arg("--decrypt")
            .arg("--output")
            .arg(dest)
            .arg(encrypted)
            .status()
            .map_err(|e| CredentialError::Decrypt {
                tool: self.program.clone(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(CredentialError::Decrypt {
                tool: self.program.clone(),
                message: format!("exited with {}", status),
            }
            .into());
        }

        Ok(())
    }
}

impl Default for Decryptor {
    fn default() -> Self {
        Self::new()
    }
}

/// Removes the transient plaintext when dropped
///
/// Removal failure is logged and swallowed; the plaintext never outlives
/// the load call on any path the guard covers.
struct PlaintextGuard {
    path: PathBuf,
}

impl Drop for PlaintextGuard {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(
                "Failed to remove decrypted credentials file {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

/// Decrypt and parse the credentials file
///
/// Fatal on a missing encrypted file (the tool is never invoked), on a
/// failing decryption tool (the parser is never reached), and on a parse
/// error. The plaintext sibling file is removed before returning in both
/// the success and parse-failure cases.
pub fn load_encrypted(encrypted: &Path, decryptor: &Decryptor) -> Result<Credentials> {
    if !encrypted.exists() {
        return Err(CredentialError::MissingFile(encrypted.to_path_buf()).into());
    }

    let plaintext = plaintext_path(encrypted);
    decryptor.decrypt(encrypted, &plaintext)?;

    let _guard = PlaintextGuard {
        path: plaintext.clone(),
    };
    Credentials::load_from_path(&plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BicastError;

    #[cfg(unix)]
    fn write_stub_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    // Argument order matches the gpg invocation:
    // --quiet --decrypt --output <dest> <encrypted>, so $4 is the
    // destination and $5 the source.
    #[cfg(unix)]
    fn copying_stub(dir: &Path) -> PathBuf {
        write_stub_tool(dir, "stub-gpg", "cp \"$5\" \"$4\"")
    }

    #[test]
    fn test_missing_file_skips_decryption_tool() {
        let dir = tempfile::tempdir().unwrap();
        let sentinel = dir.path().join("tool-was-invoked");

        #[cfg(unix)]
        let decryptor = Decryptor::with_program(
            write_stub_tool(
                dir.path(),
                "sentinel-gpg",
                &format!("touch {}", sentinel.display()),
            )
            .display()
            .to_string(),
        );
        #[cfg(not(unix))]
        let decryptor = Decryptor::with_program("gpg");

        let result = load_encrypted(&dir.path().join("nope.toml.gpg"), &decryptor);
        assert!(matches!(
            result,
            Err(BicastError::Credential(CredentialError::MissingFile(_)))
        ));
        assert!(!sentinel.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_tool_is_fatal_before_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let encrypted = dir.path().join("credentials.toml.gpg");
        std::fs::write(&encrypted, "ciphertext").unwrap();

        let decryptor =
            Decryptor::with_program(write_stub_tool(dir.path(), "bad-gpg", "exit 2").display().to_string());

        let result = load_encrypted(&encrypted, &decryptor);
        match result {
            Err(BicastError::Credential(CredentialError::Decrypt { message, .. })) => {
                assert!(message.contains("exited with"));
            }
            other => panic!("Expected decrypt error, got {:?}", other.map(|_| ())),
        }
        // The tool never produced a plaintext, and nothing else did either
        assert!(!plaintext_path(&encrypted).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_plaintext_removed_after_successful_load() {
        let dir = tempfile::tempdir().unwrap();
        let encrypted = dir.path().join("credentials.toml.gpg");
        std::fs::write(&encrypted, "[twitter]\napi_key = \"ck\"\n").unwrap();

        let decryptor = Decryptor::with_program(copying_stub(dir.path()).display().to_string());

        let creds = load_encrypted(&encrypted, &decryptor).unwrap();
        assert_eq!(creds.twitter.unwrap().api_key.as_deref(), Some("ck"));
        assert!(!plaintext_path(&encrypted).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_plaintext_removed_after_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let encrypted = dir.path().join("credentials.toml.gpg");
        std::fs::write(&encrypted, "this is [[ not toml").unwrap();

        let decryptor = Decryptor::with_program(copying_stub(dir.path()).display().to_string());

        let result = load_encrypted(&encrypted, &decryptor);
        assert!(matches!(
            result,
            Err(BicastError::Credential(CredentialError::Parse(_)))
        ));
        assert!(!plaintext_path(&encrypted).exists());
    }

    #[test]
    fn test_spawn_failure_reports_tool_name() {
        let dir = tempfile::tempdir().unwrap();
        let encrypted = dir.path().join("credentials.toml.gpg");
        std::fs::write(&encrypted, "ciphertext").unwrap();

        let decryptor = Decryptor::with_program("/nonexistent/decryption-tool");
        let result = load_encrypted(&encrypted, &decryptor);
        match result {
            Err(BicastError::Credential(CredentialError::Decrypt { tool, .. })) => {
                assert_eq!(tool, "/nonexistent/decryption-tool");
            }
            other => panic!("Expected decrypt error, got {:?}", other.map(|_| ())),
        }
    }
}
