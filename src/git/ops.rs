use std::path::PathBuf;

use super::error::GitError;
use super::runner::Git;
use crate::config::ClientConfig;

/// Marker `git branch` puts in front of the checked-out branch.
const CURRENT_MARKER: char = '*';

/// Strips the current-branch marker and every whitespace character.
fn clean_branch_line(line: &str) -> String {
    line.chars()
        .filter(|c| *c != CURRENT_MARKER && !c.is_whitespace())
        .collect()
}

/// Parses `git branch --all` output into branch names, in listing order.
pub fn parse_branch_list(stdout: &str) -> Vec<String> {
    stdout
        .split('\n')
        .map(clean_branch_line)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Picks the first line carrying the current-branch marker, cleaned.
pub fn parse_current_branch(stdout: &str) -> Option<String> {
    stdout
        .split('\n')
        .find(|line| line.contains(CURRENT_MARKER))
        .map(clean_branch_line)
}

/// Splits `git log` output into lines after trimming surrounding whitespace.
///
/// Empty output yields a single empty string, not an empty list.
pub fn parse_graph(stdout: &str) -> Vec<String> {
    stdout.trim().split('\n').map(str::to_string).collect()
}

impl Git {
    /// Builds a client from the config file in the platform config directory.
    pub fn from_default_config(working_dir: impl Into<PathBuf>) -> Result<Self, GitError> {
        let config = ClientConfig::load_default()?;
        Ok(Self::with_config(working_dir, &config))
    }

    /// Runs an arbitrary git command and returns its stdout.
    pub async fn exec(&self, args: &[&str]) -> Result<String, GitError> {
        Ok(self.run(args).await?.stdout)
    }

    /// Lists local and remote-tracking branches from `git branch --all`.
    ///
    /// The `*` marker and all whitespace are removed from each line, so a
    /// symbolic ref shows up as e.g. `remotes/origin/HEAD->origin/main`.
    pub async fn list_branches(&self) -> Result<Vec<String>, GitError> {
        let output = self.run(&["branch", "--all"]).await?;
        Ok(parse_branch_list(&output.stdout))
    }

    /// Returns the name of the checked-out branch.
    ///
    /// Fails with `NoCurrentBranch` when the listing has no marked line,
    /// which is the case in a repository without commits.
    pub async fn current_branch(&self) -> Result<String, GitError> {
        let output = self.run(&["branch", "--all"]).await?;
        parse_current_branch(&output.stdout).ok_or(GitError::NoCurrentBranch)
    }

    pub async fn create_branch(&self, name: &str) -> Result<(), GitError> {
        self.run(&["branch", name]).await?;
        Ok(())
    }

    /// Deletes a branch. `force` also deletes branches that are not merged.
    pub async fn delete_branch(&self, name: &str, force: bool) -> Result<(), GitError> {
        let mut args = vec!["branch", name, "--delete"];
        if force {
            args.push("--force");
        }
        self.run(&args).await?;
        Ok(())
    }

    /// Commits the index with `title` as subject.
    ///
    /// A non-blank `body` becomes a second `-m` paragraph. Both are passed as
    /// single arguments, so newlines and quotes reach git untouched.
    pub async fn commit(&self, title: &str, body: Option<&str>) -> Result<(), GitError> {
        let mut args = vec!["commit", "-m", title];
        if let Some(body) = body.filter(|b| !b.trim().is_empty()) {
            args.push("-m");
            args.push(body);
        }
        self.run(&args).await?;
        Ok(())
    }

    /// Stages `files`, or everything under the working directory when empty.
    pub async fn add(&self, files: &[&str]) -> Result<(), GitError> {
        let mut args = vec!["add"];
        if files.is_empty() {
            args.push(".");
        } else {
            args.extend_from_slice(files);
        }
        self.run(&args).await?;
        Ok(())
    }

    pub async fn push(&self) -> Result<(), GitError> {
        self.run(&["push"]).await?;
        Ok(())
    }

    /// `git push --set-upstream origin <branch>`, defaulting to the current
    /// branch when `name` is `None` or empty.
    pub async fn push_upstream(&self, name: Option<&str>) -> Result<(), GitError> {
        let branch = match name.filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None => self.current_branch().await?,
        };
        self.run(&["push", "--set-upstream", "origin", &branch]).await?;
        Ok(())
    }

    /// Checks out `name`, creating it first with `-b` when `create` is set.
    pub async fn checkout(&self, name: &str, create: bool) -> Result<(), GitError> {
        let mut args = vec!["checkout"];
        if create {
            args.push("-b");
        }
        args.push(name);
        self.run(&args).await?;
        Ok(())
    }

    /// Full `git log` across all refs in date order, one output line per entry.
    pub async fn graph(&self) -> Result<Vec<String>, GitError> {
        let output = self
            .run(&["log", "--all", "--date-order", "--source"])
            .await?;
        Ok(parse_graph(&output.stdout))
    }
}
