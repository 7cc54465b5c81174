//! Operations that go through the `hub` executable instead of git.
//!
//! hub reads its GitHub credentials from the environment (`GITHUB_TOKEN`),
//! which is why clients are usually built from a tokens file.

use crate::git::{Git, GitError};

impl Git {
    /// Runs an arbitrary hub command and returns its stdout.
    pub async fn exec_hub(&self, args: &[&str]) -> Result<String, GitError> {
        Ok(self.run_hub(args).await?.stdout)
    }

    /// Opens a pull request for the current branch.
    ///
    /// hub takes the first line of `text` as the title and the rest as the
    /// body. Returns hub's stdout, normally the PR URL.
    pub async fn create_pull_request(&self, text: &str) -> Result<String, GitError> {
        self.exec_hub(&["pull-request", "-m", text]).await
    }

    /// `hub clone <url>`; accepts `owner/repo` shorthand as well as URLs.
    pub async fn clone_repo(&self, url: &str) -> Result<String, GitError> {
        self.exec_hub(&["clone", url]).await
    }

    /// Forks the current repository on GitHub and adds it as `remote_name`.
    pub async fn fork(&self, remote_name: &str) -> Result<String, GitError> {
        let flag = format!("--remote-name={}", remote_name);
        self.exec_hub(&["fork", &flag]).await
    }

    /// Creates a GitHub repository for the current directory.
    pub async fn create_repo(&self, description: Option<&str>) -> Result<String, GitError> {
        self.exec_hub(&["create", "-d", description.unwrap_or("")])
            .await
    }
}
