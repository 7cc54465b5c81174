use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::classify::classify;
use crate::config::ConfigError;

/// Symbolic classification of a failed git or hub invocation.
///
/// The set is closed. Text that matches no known pattern stays raw as
/// [`GitFailure::Unclassified`] instead of being forced into one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    BadConfigFile,
    AuthenticationFailed,
    NoUserNameConfigured,
    NoUserEmailConfigured,
    NoRemoteRepositorySpecified,
    NotAGitRepository,
    NotAtRepositoryRoot,
    Conflict,
    StashConflict,
    UnmergedChanges,
    PushRejected,
    RemoteConnectionError,
    DirtyWorkTree,
    CantOpenResource,
    GitNotFound,
    CantCreatePipe,
    CantAccessRemote,
    RepositoryNotFound,
    RepositoryIsLocked,
    BranchNotFullyMerged,
    NoRemoteReference,
    InvalidBranchName,
    BranchAlreadyExists,
    NoLocalChanges,
    NoStashFound,
    LocalChangesOverwritten,
    NoUpstreamBranch,
    IsInSubmodule,
    WrongCase,
    CantLockRef,
    CantRebaseMultipleBranches,
    PatchDoesNotApply,
    NoPathFound,
}

impl ErrorKind {
    /// Stable string code, identical to the variant name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadConfigFile => "BadConfigFile",
            ErrorKind::AuthenticationFailed => "AuthenticationFailed",
            ErrorKind::NoUserNameConfigured => "NoUserNameConfigured",
            ErrorKind::NoUserEmailConfigured => "NoUserEmailConfigured",
            ErrorKind::NoRemoteRepositorySpecified => "NoRemoteRepositorySpecified",
            ErrorKind::NotAGitRepository => "NotAGitRepository",
            ErrorKind::NotAtRepositoryRoot => "NotAtRepositoryRoot",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::StashConflict => "StashConflict",
            ErrorKind::UnmergedChanges => "UnmergedChanges",
            ErrorKind::PushRejected => "PushRejected",
            ErrorKind::RemoteConnectionError => "RemoteConnectionError",
            ErrorKind::DirtyWorkTree => "DirtyWorkTree",
            ErrorKind::CantOpenResource => "CantOpenResource",
            ErrorKind::GitNotFound => "GitNotFound",
            ErrorKind::CantCreatePipe => "CantCreatePipe",
            ErrorKind::CantAccessRemote => "CantAccessRemote",
            ErrorKind::RepositoryNotFound => "RepositoryNotFound",
            ErrorKind::RepositoryIsLocked => "RepositoryIsLocked",
            ErrorKind::BranchNotFullyMerged => "BranchNotFullyMerged",
            ErrorKind::NoRemoteReference => "NoRemoteReference",
            ErrorKind::InvalidBranchName => "InvalidBranchName",
            ErrorKind::BranchAlreadyExists => "BranchAlreadyExists",
            ErrorKind::NoLocalChanges => "NoLocalChanges",
            ErrorKind::NoStashFound => "NoStashFound",
            ErrorKind::LocalChangesOverwritten => "LocalChangesOverwritten",
            ErrorKind::NoUpstreamBranch => "NoUpstreamBranch",
            ErrorKind::IsInSubmodule => "IsInSubmodule",
            ErrorKind::WrongCase => "WrongCase",
            ErrorKind::CantLockRef => "CantLockRef",
            ErrorKind::CantRebaseMultipleBranches => "CantRebaseMultipleBranches",
            ErrorKind::PatchDoesNotApply => "PatchDoesNotApply",
            ErrorKind::NoPathFound => "NoPathFound",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying stderr: either a known kind or the untouched text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum GitFailure {
    Known(ErrorKind),
    Unclassified(String),
}

impl GitFailure {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            GitFailure::Known(kind) => Some(*kind),
            GitFailure::Unclassified(_) => None,
        }
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == Some(kind)
    }
}

impl fmt::Display for GitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitFailure::Known(kind) => write!(f, "{}", kind),
            GitFailure::Unclassified(text) => f.write_str(text),
        }
    }
}

/// All possible errors from running git or hub, serialized as a string via the
/// custom `Serialize` impl below.
///
/// `CommandFailed` keeps the raw stderr. Call [`GitError::failure`] to run it
/// through the classifier.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    /// The executable was not found (not on `$PATH`, or bad explicit path).
    #[error("{program} executable not found. Is it installed?")]
    ProgramNotFound { program: String },

    /// The working directory the client is bound to does not exist.
    #[error("working directory not found: {path}")]
    WorkingDirNotFound { path: PathBuf },

    /// The process could not be spawned (e.g., permission denied).
    #[error("failed to spawn process: {source}")]
    SpawnError {
        source: std::io::Error,
        command: String,
    },

    /// The command exited with a non-zero status code.
    #[error("command failed (exit code {code}): {stderr}")]
    CommandFailed {
        code: i32,
        stderr: String,
        command: String,
    },

    /// The process produced output that is not valid UTF-8.
    #[error("invalid UTF-8 in command output")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// `git branch` listed no line carrying the current-branch marker.
    #[error("no current branch (empty repository?)")]
    NoCurrentBranch,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GitError {
    /// Classifies the stderr of a failed command.
    ///
    /// Returns `None` for errors that never reached a process exit status.
    pub fn failure(&self) -> Option<GitFailure> {
        match self {
            GitError::CommandFailed { stderr, .. } => Some(classify(stderr)),
            _ => None,
        }
    }

    /// Shortcut for the known kind of a failed command, if any.
    ///
    /// A missing executable reports `GitNotFound` for the hub binary as well
    /// as for git, matching the `hub: command not found` classifier rule.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            GitError::ProgramNotFound { .. } => Some(ErrorKind::GitNotFound),
            _ => self.failure().and_then(|f| f.kind()),
        }
    }
}

/// Serializes the error as its `Display` string so consumers receive a single
/// human-readable message rather than a tagged enum structure.
impl Serialize for GitError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(stderr: &str) -> GitError {
        GitError::CommandFailed {
            code: 128,
            stderr: stderr.to_string(),
            command: "git push".to_string(),
        }
    }

    #[test]
    fn test_error_kind_code_matches_serde_name() {
        let json = serde_json::to_string(&ErrorKind::BranchAlreadyExists).unwrap();
        assert_eq!(json, "\"BranchAlreadyExists\"");
        assert_eq!(ErrorKind::BranchAlreadyExists.to_string(), "BranchAlreadyExists");
    }

    #[test]
    fn test_failure_classifies_command_failed() {
        let err = failed("fatal: Authentication failed for 'https://github.com/o/r.git/'");
        assert_eq!(err.failure(), Some(GitFailure::Known(ErrorKind::AuthenticationFailed)));
        assert_eq!(err.kind(), Some(ErrorKind::AuthenticationFailed));
    }

    #[test]
    fn test_failure_keeps_unknown_text() {
        let err = failed("error: something new");
        assert_eq!(
            err.failure(),
            Some(GitFailure::Unclassified("error: something new".to_string()))
        );
        assert_eq!(err.kind(), None);
    }

    #[test]
    fn test_non_exit_errors_have_no_failure() {
        assert!(GitError::NoCurrentBranch.failure().is_none());
        let missing = GitError::ProgramNotFound {
            program: "git".to_string(),
        };
        assert!(missing.failure().is_none());
        assert_eq!(missing.kind(), Some(ErrorKind::GitNotFound));
    }

    #[test]
    fn test_missing_hub_reports_git_not_found() {
        let missing = GitError::ProgramNotFound {
            program: "/opt/tools/hub".to_string(),
        };
        assert_eq!(missing.kind(), Some(ErrorKind::GitNotFound));
    }

    #[test]
    fn test_git_error_serialization() {
        let err = GitError::ProgramNotFound {
            program: "hub".to_string(),
        };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"hub executable not found. Is it installed?\"");
    }

    #[test]
    fn test_git_failure_serialization() {
        let known = serde_json::to_value(GitFailure::Known(ErrorKind::PushRejected)).unwrap();
        assert_eq!(known["type"], "known");
        assert_eq!(known["value"], "PushRejected");

        let raw = serde_json::to_value(GitFailure::Unclassified("boom".to_string())).unwrap();
        assert_eq!(raw["type"], "unclassified");
        assert_eq!(raw["value"], "boom");
    }
}
