//! ============================================================================
//! Authentication Flow
//! ============================================================================
//! Drives login against the provider: password first, then the two-factor
//! challenge if the provider issues one. Credentials come from an injectable
//! source so tests never touch a console.
//! ============================================================================

use tracing::debug;

use crate::fetch::ProgressSink;
use crate::provider::{LoginOutcome, ProfileProvider};
use crate::types::{AnalyzerError, Credentials};

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

/// Supplies login credentials and, on demand, a two-factor code.
pub trait CredentialSource: Send + Sync {
    fn credentials(&self) -> Result<Credentials, AnalyzerError>;
    fn two_factor_code(&self) -> Result<String, AnalyzerError>;
}

/// Obtain a session on the provider. Invalid credentials and a failed
/// two-factor code are surfaced as-is; anything else the provider raises
/// during login is wrapped as a generic login error. Transient failures are
/// not retried.
pub async fn authenticate(
    provider: &mut dyn ProfileProvider,
    source: &dyn CredentialSource,
    progress: &dyn ProgressSink,
) -> Result<(), AnalyzerError> {
    let credentials = source.credentials()?;
    progress.stage("Logging in...");

    match provider.login(&credentials).await {
        Ok(LoginOutcome::LoggedIn) => {
            progress.stage("Login successful.");
            Ok(())
        }
        Ok(LoginOutcome::TwoFactorRequired) => {
            debug!("provider issued a two-factor challenge");
            let code = source.two_factor_code()?;
            provider.two_factor_login(code.trim()).await?;
            progress.stage("Login successful.");
            Ok(())
        }
        Err(err @ (AnalyzerError::BadCredentials | AnalyzerError::TwoFactorFailed(_))) => Err(err),
        Err(AnalyzerError::Network(message)) | Err(AnalyzerError::Api(message)) => {
            Err(AnalyzerError::Login(message))
        }
        Err(other) => Err(other),
    }
}

#[cfg(test)]
pub(crate) struct FixedCredentials {
    pub code: Option<&'static str>,
    pub requests: AtomicUsize,
}

#[cfg(test)]
impl FixedCredentials {
    pub(crate) fn new(code: Option<&'static str>) -> Self {
        Self {
            code,
            requests: AtomicUsize::new(0),
        }
    }
}

#[cfg(test)]
impl CredentialSource for FixedCredentials {
    fn credentials(&self) -> Result<Credentials, AnalyzerError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        Ok(Credentials {
            username: "viewer".to_string(),
            password: "hunter2".to_string(),
        })
    }

    fn two_factor_code(&self) -> Result<String, AnalyzerError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.code
            .map(str::to_string)
            .ok_or_else(|| AnalyzerError::Input("no two-factor code available".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::NullProgress;
    use crate::provider::fake::FakeProvider;

    #[tokio::test]
    async fn test_password_login_succeeds() {
        let mut provider = FakeProvider::default();
        let source = FixedCredentials::new(None);
        let result = authenticate(&mut provider, &source, &NullProgress).await;
        assert!(result.is_ok());
        assert_eq!(source.requests.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_bad_credentials_pass_through() {
        let mut provider = FakeProvider {
            accept_password: false,
            ..FakeProvider::default()
        };
        let source = FixedCredentials::new(None);
        let result = authenticate(&mut provider, &source, &NullProgress).await;
        assert!(matches!(result, Err(AnalyzerError::BadCredentials)));
    }

    #[tokio::test]
    async fn test_two_factor_happy_path() {
        let mut provider = FakeProvider {
            require_two_factor: true,
            accept_code: Some("123456".to_string()),
            ..FakeProvider::default()
        };
        let source = FixedCredentials::new(Some("123456"));
        let result = authenticate(&mut provider, &source, &NullProgress).await;
        assert!(result.is_ok());
        // Credentials once, then the code
        assert_eq!(source.requests.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn test_two_factor_code_is_trimmed() {
        let mut provider = FakeProvider {
            require_two_factor: true,
            accept_code: Some("123456".to_string()),
            ..FakeProvider::default()
        };
        let source = FixedCredentials::new(Some("  123456\n"));
        let result = authenticate(&mut provider, &source, &NullProgress).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_two_factor_rejection() {
        let mut provider = FakeProvider {
            require_two_factor: true,
            accept_code: Some("123456".to_string()),
            ..FakeProvider::default()
        };
        let source = FixedCredentials::new(Some("000000"));
        let result = authenticate(&mut provider, &source, &NullProgress).await;
        assert!(matches!(result, Err(AnalyzerError::TwoFactorFailed(_))));
    }

    #[tokio::test]
    async fn test_unclassified_failure_wrapped_as_login_error() {
        let mut provider = FakeProvider {
            login_network_failure: Some("connection reset".to_string()),
            ..FakeProvider::default()
        };
        let source = FixedCredentials::new(None);
        let result = authenticate(&mut provider, &source, &NullProgress).await;
        match result {
            Err(AnalyzerError::Login(message)) => assert_eq!(message, "connection reset"),
            other => panic!("expected Login error, got {other:?}"),
        }
    }
}
