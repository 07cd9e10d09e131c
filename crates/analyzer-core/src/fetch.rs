//! ============================================================================
//! List Fetcher
//! ============================================================================
//! Drains a paginated friendship enumeration into a set. Forward-only and
//! non-restartable; a mid-stream access revocation aborts the whole fetch
//! with no partial result.
//! ============================================================================

use std::collections::HashSet;

use tracing::info;

use crate::provider::ProfileProvider;
use crate::types::{AnalyzerError, FollowList, ProfileSnapshot, Username};

/// Observer for pipeline milestones and enumeration progress. Counts are
/// cumulative ("so far"), reported after every page.
pub trait ProgressSink: Send + Sync {
    fn stage(&self, _message: &str) {}
    fn profile(&self, _profile: &ProfileSnapshot) {}
    fn update(&self, _list: FollowList, _count: usize) {}
    fn done(&self, _list: FollowList, _count: usize) {}
}

/// Sink that swallows every progress event
pub struct NullProgress;

impl ProgressSink for NullProgress {}

/// Collect one friendship list in full. Uniqueness is enforced by the set;
/// a `LoginRequired` raised mid-enumeration becomes `FetchAccess` for the
/// list being fetched.
pub async fn collect_follow_list(
    provider: &dyn ProfileProvider,
    profile: &ProfileSnapshot,
    list: FollowList,
    progress: &dyn ProgressSink,
) -> Result<HashSet<Username>, AnalyzerError> {
    let mut collected: HashSet<Username> = HashSet::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = provider
            .follow_page(profile, list, cursor.as_deref())
            .await
            .map_err(|err| match err {
                AnalyzerError::LoginRequired => AnalyzerError::FetchAccess { list },
                other => other,
            })?;

        for username in page.usernames {
            collected.insert(username);
        }
        progress.update(list, collected.len());

        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    info!("{} enumeration complete: {} accounts", list, collected.len());
    progress.done(list, collected.len());
    Ok(collected)
}
