//! ============================================================================
//! ANALYZER-CORE: Gramscope's Engine
//! ============================================================================
//! This crate handles all backend logic for the Gramscope analyzer:
//! - Instagram web API client (login, two-factor, profile, pagination)
//! - Credential-source and progress-sink seams for console-free testing
//! - Follower/following set analysis
//! - Timestamped text report generation
//! ============================================================================

pub mod analysis;
pub mod auth;
pub mod config;
pub mod fetch;
pub mod pipeline;
pub mod provider;
pub mod report;
pub mod types;

// Re-export main types for convenience
pub use auth::{authenticate, CredentialSource};
pub use config::ClientConfig;
pub use fetch::{collect_follow_list, NullProgress, ProgressSink};
pub use provider::{FollowPage, InstagramProvider, LoginOutcome, ProfileProvider};
pub use report::{write_report, ReportOutcome, ReportRenderer};
pub use types::*;
