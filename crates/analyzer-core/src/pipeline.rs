//! ============================================================================
//! Analysis Pipeline
//! ============================================================================
//! Whole-program sequence, strictly ordered with no overlap:
//! authenticate -> resolve profile -> fetch following -> fetch followers
//! -> analyze -> write report. Every failure is terminal; the report is
//! written only after both enumerations complete in full.
//! ============================================================================

use std::path::Path;

use tracing::{debug, info};

use crate::auth::{self, CredentialSource};
use crate::fetch::{self, ProgressSink};
use crate::provider::ProfileProvider;
use crate::report;
use crate::types::{AnalysisSummary, AnalyzerError, FollowList, Username};

/// Run the full analysis for `target`, writing the report into `out_dir`.
/// An empty target fails before any provider call. The session is logged
/// out best-effort on every exit path.
pub async fn run(
    provider: &mut dyn ProfileProvider,
    credentials: &dyn CredentialSource,
    progress: &dyn ProgressSink,
    target: &str,
    out_dir: &Path,
) -> Result<AnalysisSummary, AnalyzerError> {
    let target = Username::new(target);
    if target.is_empty() {
        return Err(AnalyzerError::EmptyUsername);
    }

    let result = run_stages(provider, credentials, progress, &target, out_dir).await;

    // Session teardown is best-effort on every exit path
    if let Err(err) = provider.logout().await {
        debug!("logout failed: {err}");
    }

    result
}

async fn run_stages(
    provider: &mut dyn ProfileProvider,
    credentials: &dyn CredentialSource,
    progress: &dyn ProgressSink,
    target: &Username,
    out_dir: &Path,
) -> Result<AnalysisSummary, AnalyzerError> {
    auth::authenticate(provider, credentials, progress).await?;

    progress.stage(&format!("Fetching profile: @{target}"));
    let profile = provider.profile_by_username(target).await?;
    info!(
        "resolved profile {} ({} followers, {} following)",
        profile.username, profile.followers, profile.following
    );
    progress.profile(&profile);

    progress.stage("Fetching following list...");
    let following =
        fetch::collect_follow_list(&*provider, &profile, FollowList::Following, progress).await?;

    progress.stage("Fetching followers list...");
    let followers =
        fetch::collect_follow_list(&*provider, &profile, FollowList::Followers, progress).await?;

    progress.stage("Writing report...");
    let outcome = report::write_report(out_dir, target, &followers, &following)?;

    Ok(AnalysisSummary {
        target: target.clone(),
        following: outcome.following,
        followers: outcome.followers,
        mutual: outcome.mutual,
        report_path: outcome.path,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::auth::FixedCredentials;
    use crate::fetch::NullProgress;
    use crate::provider::fake::{page, snapshot, FakeProvider};

    fn report_files(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_empty_target_makes_no_provider_calls() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = FakeProvider::default();
        let credentials = FixedCredentials::new(None);

        let result = run(&mut provider, &credentials, &NullProgress, "  ", dir.path()).await;

        assert!(matches!(result, Err(AnalyzerError::EmptyUsername)));
        assert_eq!(provider.calls.load(Ordering::Relaxed), 0);
        assert_eq!(credentials.requests.load(Ordering::Relaxed), 0);
        assert_eq!(report_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_profile_not_found_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = FakeProvider {
            profile: None,
            ..FakeProvider::default()
        };
        let credentials = FixedCredentials::new(None);

        let result = run(
            &mut provider,
            &credentials,
            &NullProgress,
            "ghost",
            dir.path(),
        )
        .await;

        assert!(matches!(result, Err(AnalyzerError::ProfileNotFound(_))));
        assert_eq!(report_files(dir.path()), 0);
        assert!(provider.logged_out.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_private_profile_is_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = FakeProvider {
            private_profile: true,
            ..FakeProvider::default()
        };
        let credentials = FixedCredentials::new(None);

        let result = run(
            &mut provider,
            &credentials,
            &NullProgress,
            "hidden",
            dir.path(),
        )
        .await;

        assert!(matches!(result, Err(AnalyzerError::PrivateProfile(_))));
        assert_eq!(report_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_login_required_during_followers_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = FakeProvider {
            profile: Some(snapshot("target", 2, 2)),
            following_pages: vec![page(&["alice", "bob"])],
            followers_pages: vec![page(&["bob", "carol"])],
            fail_followers_page: Some(0),
            ..FakeProvider::default()
        };
        let credentials = FixedCredentials::new(None);

        let result = run(
            &mut provider,
            &credentials,
            &NullProgress,
            "target",
            dir.path(),
        )
        .await;

        assert!(matches!(
            result,
            Err(AnalyzerError::FetchAccess {
                list: FollowList::Followers
            })
        ));
        assert_eq!(report_files(dir.path()), 0);
        assert!(provider.logged_out.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_two_factor_run_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = FakeProvider {
            require_two_factor: true,
            accept_code: Some("123456".to_string()),
            profile: Some(snapshot("target", 2, 2)),
            following_pages: vec![page(&["alice", "bob"])],
            followers_pages: vec![page(&["bob", "carol"])],
            ..FakeProvider::default()
        };
        let credentials = FixedCredentials::new(Some("123456"));

        let summary = run(
            &mut provider,
            &credentials,
            &NullProgress,
            "@target",
            dir.path(),
        )
        .await
        .unwrap();

        assert_eq!(summary.target.as_str(), "target");
        assert_eq!(summary.following, 2);
        assert_eq!(summary.followers, 2);
        assert_eq!(summary.mutual, 1);
        assert!(summary.report_path.exists());
        assert!(provider.logged_out.load(Ordering::Relaxed));

        let contents = std::fs::read_to_string(&summary.report_path).unwrap();
        assert!(contents.contains("MUTUAL FOLLOWS - Both follow each other (1)"));
        assert!(contents.contains("@bob"));
    }
}
