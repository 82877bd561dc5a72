//! External Hack-to-PHP transpiler invoked as a subprocess.
//!
//! Sources beginning with the `<?hh` marker cannot be handled by the PHP
//! grammar directly; they are piped through an external compiler first. The
//! collaborator sits behind a trait so scanning code and tests never touch
//! process spawning.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

pub const HACK_MARKER: &str = "<?hh";

pub trait Transpile {
    /// Converts Hack source text to plain PHP, or fails with the compiler's
    /// captured diagnostics.
    fn transpile(&self, path: &Path, source: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct HackCompiler {
    bin: PathBuf,
}

impl HackCompiler {
    pub fn new(bin: PathBuf) -> Self {
        Self { bin }
    }

    /// Resolves the compiler binary from `AUTOLOAD_GEN_HACK_BIN`, falling
    /// back to `h2tp` on the PATH.
    pub fn from_env() -> Self {
        let bin = std::env::var("AUTOLOAD_GEN_HACK_BIN").unwrap_or_else(|_| "h2tp".to_string());
        Self::new(PathBuf::from(bin))
    }
}

impl Transpile for HackCompiler {
    fn transpile(&self, path: &Path, source: &str) -> Result<String> {
        let io_err = |source: std::io::Error| Error::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut child = Command::new(&self.bin)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(io_err)?;

        if let Some(stdin) = child.stdin.take() {
            let mut stdin = stdin;
            stdin.write_all(source.as_bytes()).map_err(io_err)?;
        }

        let output = child.wait_with_output().map_err(io_err)?;
        if !output.status.success() {
            return Err(Error::Compile {
                path: path.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
