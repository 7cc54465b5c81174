//! Maps free-form git/hub stderr onto [`ErrorKind`].
//!
//! Rules are tried top to bottom and the first regex that matches anywhere in
//! the text wins, so a more specific message must sit above any general rule
//! it overlaps with. A kind may appear in more than one rule. New kinds are
//! added by appending rows to [`PATTERNS`].

use std::sync::OnceLock;

use regex::Regex;

use super::error::{ErrorKind, GitFailure};

const PATTERNS: &[(&str, ErrorKind)] = &[
    (
        r"Another git process seems to be running in this repository|If no other git process is currently running",
        ErrorKind::RepositoryIsLocked,
    ),
    (r"Authentication failed", ErrorKind::AuthenticationFailed),
    // Capitalization differs between git versions.
    (r"(?i)Not a git repository", ErrorKind::NotAGitRepository),
    (r"bad config file", ErrorKind::BadConfigFile),
    (
        r"cannot make pipe for command substitution|cannot create standard input pipe",
        ErrorKind::CantCreatePipe,
    ),
    (r"Repository not found", ErrorKind::RepositoryNotFound),
    (r"unable to access", ErrorKind::CantAccessRemote),
    (r"branch '.+' is not fully merged", ErrorKind::BranchNotFullyMerged),
    (r"Couldn't find remote ref", ErrorKind::NoRemoteReference),
    (r"[Aa] branch named '.+' already exists", ErrorKind::BranchAlreadyExists),
    (r"'.+' is not a valid branch name", ErrorKind::InvalidBranchName),
    (r"Please,? commit your changes or stash them", ErrorKind::DirtyWorkTree),
    (r"bad config line \d+ in", ErrorKind::BadConfigFile),
    (r"repository '.+' does not exist", ErrorKind::RepositoryNotFound),
    (r"Permission denied \(publickey", ErrorKind::AuthenticationFailed),
    (r"empty ident name \(for <.*>\) not allowed", ErrorKind::NoUserNameConfigured),
    (r"unable to auto-detect email address", ErrorKind::NoUserEmailConfigured),
    (
        r"No remote repository specified|No configured push destination|does not appear to be a git repository",
        ErrorKind::NoRemoteRepositorySpecified,
    ),
    (
        r"must be run in a work tree|cannot be used without a working tree",
        ErrorKind::NotAtRepositoryRoot,
    ),
    (r"is in submodule '.+'", ErrorKind::IsInSubmodule),
    // `stash pop` also prints CONFLICT lines.
    (r"The stash entry is kept in case you need it again", ErrorKind::StashConflict),
    (
        r"CONFLICT \(.+\):|Automatic merge failed; fix conflicts",
        ErrorKind::Conflict,
    ),
    (
        r"you need to resolve your current index first|because you have unmerged files",
        ErrorKind::UnmergedChanges,
    ),
    (r"would be overwritten by", ErrorKind::LocalChangesOverwritten),
    // Above PushRejected: lock failures are reported as `[remote rejected]`.
    (r"cannot lock ref '.+'", ErrorKind::CantLockRef),
    (
        r"! \[(?:remote )?rejected\]|Updates were rejected",
        ErrorKind::PushRejected,
    ),
    (
        r"Could not read from remote repository|Could not resolve hostname|ssh: connect to host .+: Connection refused",
        ErrorKind::RemoteConnectionError,
    ),
    (r"(?:could not|unable to|cannot) open '.+'", ErrorKind::CantOpenResource),
    (
        r"(?:git|hub): (?:command )?not found|Unable to find git",
        ErrorKind::GitNotFound,
    ),
    (r"No local changes to save", ErrorKind::NoLocalChanges),
    (r"No stash entries found|No stash found", ErrorKind::NoStashFound),
    (
        r"has no upstream branch|There is no tracking information for the current branch",
        ErrorKind::NoUpstreamBranch,
    ),
    (r"the following paths have collided", ErrorKind::WrongCase),
    (r"Cannot rebase onto multiple branches", ErrorKind::CantRebaseMultipleBranches),
    (r"patch does not apply|patch failed", ErrorKind::PatchDoesNotApply),
    (r"pathspec '.+' did not match any file", ErrorKind::NoPathFound),
];

static RULES: OnceLock<Vec<(Regex, ErrorKind)>> = OnceLock::new();

fn rules() -> &'static [(Regex, ErrorKind)] {
    RULES.get_or_init(|| {
        PATTERNS
            .iter()
            .map(|(pattern, kind)| {
                let re = Regex::new(pattern).expect("classifier patterns are valid regexes");
                (re, *kind)
            })
            .collect()
    })
}

/// Classifies stderr from a failed git or hub run.
///
/// Returns [`GitFailure::Unclassified`] holding the text unchanged when no
/// rule matches.
pub fn classify(stderr: &str) -> GitFailure {
    rules()
        .iter()
        .find(|(re, _)| re.is_match(stderr))
        .map(|(_, kind)| GitFailure::Known(*kind))
        .unwrap_or_else(|| GitFailure::Unclassified(stderr.to_string()))
}
