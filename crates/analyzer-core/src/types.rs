//! ============================================================================
//! Core Types for Gramscope
//! ============================================================================
//! Defines the domain types shared across the pipeline and the error
//! taxonomy every stage reports through.
//! ============================================================================

use std::fmt;
use std::path::PathBuf;

/// Normalized account identifier: leading `@` stripped, case preserved
/// as the service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().trim_start_matches('@').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Login credentials. Used once, never persisted.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    // The password must never reach logs or debug output
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Read-only profile summary, fetched once after resolution.
/// `id` is the provider's opaque identifier needed for list pagination.
#[derive(Debug, Clone)]
pub struct ProfileSnapshot {
    pub id: String,
    pub username: Username,
    pub full_name: String,
    pub followers: u64,
    pub following: u64,
    pub is_private: bool,
}

/// The two friendship enumerations a profile exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowList {
    Followers,
    Following,
}

impl FollowList {
    /// Capitalized label for progress lines
    pub fn label(&self) -> &'static str {
        match self {
            FollowList::Followers => "Followers",
            FollowList::Following => "Following",
        }
    }
}

impl fmt::Display for FollowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FollowList::Followers => "followers",
            FollowList::Following => "following",
        })
    }
}

/// Final counts and report location returned by a completed run
#[derive(Debug, Clone)]
pub struct AnalysisSummary {
    pub target: Username,
    pub following: usize,
    pub followers: usize,
    pub mutual: usize,
    pub report_path: PathBuf,
}

/// Error taxonomy for the whole pipeline. Every variant is terminal:
/// no stage retries or degrades, the process exits non-zero.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Input error: {0}")]
    Input(String),

    #[error("Invalid username or password")]
    BadCredentials,

    #[error("Two-factor authentication failed: {0}")]
    TwoFactorFailed(String),

    #[error("Login error: {0}")]
    Login(String),

    #[error("Profile @{0} does not exist")]
    ProfileNotFound(String),

    #[error("Profile @{0} is private. Login is required and you must follow this account")]
    PrivateProfile(String),

    /// Raw mid-stream signal from the provider; the fetcher contextualizes
    /// it into `FetchAccess`
    #[error("Login required")]
    LoginRequired,

    #[error("Login required to fetch the {list} list")]
    FetchAccess { list: FollowList },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected Instagram response: {0}")]
    Api(String),

    #[error("Failed to write report: {0}")]
    ReportWrite(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_normalization() {
        assert_eq!(Username::new("@alice").as_str(), "alice");
        assert_eq!(Username::new("  @Bob_123  ").as_str(), "Bob_123");
        assert_eq!(Username::new("@@nested").as_str(), "nested");
        assert_eq!(Username::new("plain").as_str(), "plain");
        // Case is preserved exactly as provided
        assert_eq!(Username::new("MixedCase").as_str(), "MixedCase");
    }

    #[test]
    fn test_username_empty_after_normalization() {
        assert!(Username::new("").is_empty());
        assert!(Username::new("   ").is_empty());
        assert!(Username::new("@").is_empty());
        assert!(!Username::new("a").is_empty());
    }

    #[test]
    fn test_username_ordering_is_lexicographic() {
        let mut names = vec![
            Username::new("carol"),
            Username::new("alice"),
            Username::new("bob"),
        ];
        names.sort();
        let sorted: Vec<&str> = names.iter().map(|u| u.as_str()).collect();
        assert_eq!(sorted, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials {
            username: "viewer".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("viewer"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AnalyzerError::EmptyUsername.to_string(),
            "Username cannot be empty"
        );
        assert_eq!(
            AnalyzerError::ProfileNotFound("ghost".into()).to_string(),
            "Profile @ghost does not exist"
        );
        assert_eq!(
            AnalyzerError::FetchAccess {
                list: FollowList::Followers
            }
            .to_string(),
            "Login required to fetch the followers list"
        );
    }
}
