use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tokio::process::Command;

use super::error::GitError;
use crate::config::ClientConfig;
use crate::env::AmbientEnv;

/// Captured output of a successful subprocess.
///
/// `stdout` is exactly what the process wrote, trailing newline included.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    /// Progress and hint text git/hub print even when they succeed
    /// (e.g. `Cloning into ...`).
    pub stderr: String,
}

/// Low-level git/hub runner bound to one working directory and environment.
///
/// Every command is spawned through `tokio::process::Command` with the
/// argument vector passed as-is (no shell), the working directory set to
/// `working_dir`, and the environment replaced by `env`. Subprocesses are
/// killed on drop via `kill_on_drop(true)`.
#[derive(Debug, Clone)]
pub struct Git {
    working_dir: PathBuf,
    env: HashMap<String, String>,
    git_program: String,
    hub_path: PathBuf,
}

impl Git {
    /// Creates a client for `working_dir` using the default configuration and
    /// the current process's `HOME`/`PATH`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self::with_config(working_dir, &ClientConfig::default())
    }

    pub fn with_config(working_dir: impl Into<PathBuf>, config: &ClientConfig) -> Self {
        Self::with_ambient(working_dir, config, &AmbientEnv::from_process())
    }

    /// Creates a client from an explicit config and ambient snapshot.
    ///
    /// The environment is fixed here: config overrides first, then `HOME` and
    /// `PATH` from `ambient`.
    pub fn with_ambient(
        working_dir: impl Into<PathBuf>,
        config: &ClientConfig,
        ambient: &AmbientEnv,
    ) -> Self {
        Self {
            working_dir: working_dir.into(),
            env: ambient.build(&config.overrides()),
            git_program: config.git_program.clone(),
            hub_path: config.hub_path.clone(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn env(&self) -> &HashMap<String, String> {
        &self.env
    }

    pub fn hub_path(&self) -> &Path {
        &self.hub_path
    }

    /// Executes a git subcommand and returns its captured output.
    pub async fn run(&self, args: &[&str]) -> Result<CommandOutput, GitError> {
        self.run_program(&self.git_program, args).await
    }

    /// Executes a hub subcommand using the configured hub path.
    pub async fn run_hub(&self, args: &[&str]) -> Result<CommandOutput, GitError> {
        self.run_program(&self.hub_path, args).await
    }

    /// Executes `program` with `args` in this client's directory and
    /// environment.
    ///
    /// Returns `ProgramNotFound` if the executable is missing,
    /// `WorkingDirNotFound` if the directory is, `SpawnError` for other I/O
    /// failures, and `CommandFailed` (raw stderr, unclassified) for non-zero
    /// exits. Waits for the process with no timeout.
    pub async fn run_program(
        &self,
        program: impl AsRef<OsStr>,
        args: &[&str],
    ) -> Result<CommandOutput, GitError> {
        let program = program.as_ref();
        let mut cmd = Command::new(program);
        cmd.current_dir(&self.working_dir)
            .args(args)
            .env_clear()
            .envs(&self.env)
            .kill_on_drop(true);

        let command_str = format!("{} {}", program.to_string_lossy(), args.join(" "));
        log::debug!(
            "running `{}` in {} (env keys: {:?})",
            command_str,
            self.working_dir.display(),
            self.env.keys().collect::<Vec<_>>()
        );

        let output = cmd.output().await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                if !self.working_dir.is_dir() {
                    GitError::WorkingDirNotFound {
                        path: self.working_dir.clone(),
                    }
                } else {
                    GitError::ProgramNotFound {
                        program: program.to_string_lossy().into_owned(),
                    }
                }
            } else {
                GitError::SpawnError {
                    source,
                    command: command_str.clone(),
                }
            }
        })?;

        // stderr may echo non-UTF-8 paths; it must survive a failed run.
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            log::debug!("`{}` exited with code {}", command_str, code);
            return Err(GitError::CommandFailed {
                code,
                stderr,
                command: command_str,
            });
        }

        let stdout = String::from_utf8(output.stdout)?;
        Ok(CommandOutput { stdout, stderr })
    }
}
