pub mod classify;
pub mod error;
pub mod ops;
pub mod runner;

pub use classify::classify;
pub use error::{ErrorKind, GitError, GitFailure};
pub use ops::{parse_branch_list, parse_current_branch, parse_graph};
pub use runner::{CommandOutput, Git};
