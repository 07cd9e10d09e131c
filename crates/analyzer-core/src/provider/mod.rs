//! ============================================================================
//! Provider Module - Profile/Session Service Contract
//! ============================================================================
//! The remote service is a black box behind this minimal contract:
//! - login / two-factor completion / logout
//! - profile lookup by username
//! - paginated follower/following enumeration in bounded batches
//! ============================================================================

pub mod instagram;

pub use instagram::InstagramProvider;

use async_trait::async_trait;

use crate::types::{AnalyzerError, Credentials, FollowList, ProfileSnapshot, Username};

/// Result of a password login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn,
    TwoFactorRequired,
}

/// One bounded batch from a paginated enumeration
#[derive(Debug, Clone)]
pub struct FollowPage {
    pub usernames: Vec<Username>,
    /// Continuation cursor; `None` when the enumeration is exhausted
    pub next: Option<String>,
}

/// Minimal contract over the remote profile/session service. The concrete
/// implementation owns rate limiting, cookies, and protocol details.
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    /// Attempt a password login. Invalid credentials fail with
    /// `BadCredentials`; a pending challenge returns `TwoFactorRequired`.
    async fn login(&mut self, credentials: &Credentials) -> Result<LoginOutcome, AnalyzerError>;

    /// Complete a pending two-factor challenge with a one-time code.
    async fn two_factor_login(&mut self, code: &str) -> Result<(), AnalyzerError>;

    /// Invalidate the session. Safe to call on an unauthenticated provider.
    async fn logout(&mut self) -> Result<(), AnalyzerError>;

    /// Resolve a profile by username.
    async fn profile_by_username(
        &self,
        username: &Username,
    ) -> Result<ProfileSnapshot, AnalyzerError>;

    /// Fetch one page of a friendship list. Starts from the beginning when
    /// `cursor` is `None`; raises `LoginRequired` if access is revoked
    /// mid-enumeration.
    async fn follow_page(
        &self,
        profile: &ProfileSnapshot,
        list: FollowList,
        cursor: Option<&str>,
    ) -> Result<FollowPage, AnalyzerError>;
}
