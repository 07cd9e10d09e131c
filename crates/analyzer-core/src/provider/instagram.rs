//! ============================================================================
//! Instagram Provider - Web API Client
//! ============================================================================
//! Speaks Instagram's browser-facing endpoints over HTTPS:
//! - Session bootstrap with cookie/CSRF handling
//! - Login, two-factor completion, logout
//! - Profile lookup by username
//! - Paginated follower/following enumeration via GraphQL
//! ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, info};

use super::{FollowPage, LoginOutcome, ProfileProvider};
use crate::config::ClientConfig;
use crate::types::{AnalyzerError, Credentials, FollowList, ProfileSnapshot, Username};

/// Instagram web origin
const BASE_URL: &str = "https://www.instagram.com";

/// App id the official web client sends with every API request
const IG_APP_ID: &str = "936619743392459";

/// GraphQL query hashes for the two friendship edges
const FOLLOWERS_QUERY_HASH: &str = "c76146de99bb02f6415203be841dd25a";
const FOLLOWING_QUERY_HASH: &str = "d04b0a864b4b54837c0d870b0e77e076";

/// Accounts requested per GraphQL page, matching the web client
const PAGE_SIZE: u32 = 50;

/// `ProfileProvider` backed by Instagram's web API. The cookie jar carries
/// the authenticated session for the life of the process.
pub struct InstagramProvider {
    client: Client,
    jar: Arc<Jar>,
    config: ClientConfig,
    session_user: Option<String>,
    authenticated: bool,
    pending_two_factor: Option<PendingTwoFactor>,
}

struct PendingTwoFactor {
    username: String,
    identifier: String,
}

impl InstagramProvider {
    pub fn new(config: ClientConfig) -> Result<Self, AnalyzerError> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;

        Ok(Self {
            client,
            jar,
            config,
            session_user: None,
            authenticated: false,
            pending_two_factor: None,
        })
    }

    /// GET the landing page so the cookie jar holds a csrftoken before login
    async fn prime_session(&self) -> Result<(), AnalyzerError> {
        debug!("priming session cookies");
        self.client
            .get(format!("{BASE_URL}/"))
            .header("X-IG-App-ID", IG_APP_ID)
            .send()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;
        Ok(())
    }

    fn csrf_token(&self) -> String {
        let Ok(url) = Url::parse(BASE_URL) else {
            return String::new();
        };
        let Some(cookies) = self.jar.cookies(&url) else {
            return String::new();
        };
        cookies
            .to_str()
            .ok()
            .and_then(csrf_from_cookie_header)
            .unwrap_or_default()
    }
}

/// Extract the csrftoken value from a `Cookie` header line
fn csrf_from_cookie_header(header: &str) -> Option<String> {
    header
        .split("; ")
        .find_map(|pair| pair.strip_prefix("csrftoken=").map(str::to_string))
}

/// Password envelope the web login endpoint expects
fn enc_password(password: &str, timestamp: i64) -> String {
    format!("#PWD_INSTAGRAM_BROWSER:0:{timestamp}:{password}")
}

fn graphql_url(query_hash: &str, user_id: &str, cursor: Option<&str>) -> String {
    let variables = serde_json::json!({
        "id": user_id,
        "first": PAGE_SIZE,
        "after": cursor,
    });
    format!(
        "{BASE_URL}/graphql/query/?query_hash={query_hash}&variables={}",
        urlencoding::encode(&variables.to_string())
    )
}

#[async_trait]
impl ProfileProvider for InstagramProvider {
    async fn login(&mut self, credentials: &Credentials) -> Result<LoginOutcome, AnalyzerError> {
        self.prime_session().await?;
        info!("logging in as {}", credentials.username);

        let enc = enc_password(&credentials.password, chrono::Utc::now().timestamp());
        let form = [
            ("username", credentials.username.as_str()),
            ("enc_password", enc.as_str()),
            ("optIntoOneTap", "false"),
        ];
        let response = self
            .client
            .post(format!("{BASE_URL}/api/v1/web/accounts/login/ajax/"))
            .header("X-CSRFToken", self.csrf_token())
            .header("X-IG-App-ID", IG_APP_ID)
            .header("Referer", format!("{BASE_URL}/"))
            .form(&form)
            .send()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;
        let body: LoginResponse = serde_json::from_str(&text)
            .map_err(|_| AnalyzerError::Api(format!("login returned {status}")))?;

        if body.two_factor_required {
            let challenge = body.two_factor_info.ok_or_else(|| {
                AnalyzerError::Api("two-factor challenge without identifier".to_string())
            })?;
            self.pending_two_factor = Some(PendingTwoFactor {
                username: credentials.username.clone(),
                identifier: challenge.two_factor_identifier,
            });
            info!("two-factor challenge issued");
            return Ok(LoginOutcome::TwoFactorRequired);
        }

        if body.authenticated {
            self.session_user = Some(credentials.username.clone());
            self.authenticated = true;
            info!("login successful");
            return Ok(LoginOutcome::LoggedIn);
        }

        match body.message.as_deref() {
            Some("checkpoint_required") | Some("challenge_required") => Err(AnalyzerError::Api(
                "login challenge required; complete it in a browser first".to_string(),
            )),
            // "user" is true when the account exists but the password failed
            _ if body.user => Err(AnalyzerError::BadCredentials),
            Some(message) => Err(AnalyzerError::Api(message.to_string())),
            None => Err(AnalyzerError::BadCredentials),
        }
    }

    async fn two_factor_login(&mut self, code: &str) -> Result<(), AnalyzerError> {
        let pending = self.pending_two_factor.take().ok_or_else(|| {
            AnalyzerError::TwoFactorFailed("no two-factor challenge is pending".to_string())
        })?;

        let form = [
            ("username", pending.username.as_str()),
            ("verificationCode", code),
            ("identifier", pending.identifier.as_str()),
        ];
        let response = self
            .client
            .post(format!("{BASE_URL}/accounts/login/ajax/two_factor/"))
            .header("X-CSRFToken", self.csrf_token())
            .header("X-IG-App-ID", IG_APP_ID)
            .header("Referer", format!("{BASE_URL}/"))
            .form(&form)
            .send()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;
        let body: LoginResponse = serde_json::from_str(&text)
            .map_err(|_| AnalyzerError::TwoFactorFailed(format!("unexpected response ({status})")))?;

        if body.authenticated {
            self.session_user = Some(pending.username);
            self.authenticated = true;
            info!("two-factor login successful");
            Ok(())
        } else {
            Err(AnalyzerError::TwoFactorFailed(
                body.message.unwrap_or_else(|| "code rejected".to_string()),
            ))
        }
    }

    async fn logout(&mut self) -> Result<(), AnalyzerError> {
        if !self.authenticated {
            return Ok(());
        }
        debug!("logging out");
        self.client
            .post(format!("{BASE_URL}/accounts/logout/ajax/"))
            .header("X-CSRFToken", self.csrf_token())
            .header("Referer", format!("{BASE_URL}/"))
            .form(&[("one_tap_app_login", "0")])
            .send()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;
        self.authenticated = false;
        self.session_user = None;
        Ok(())
    }

    async fn profile_by_username(
        &self,
        username: &Username,
    ) -> Result<ProfileSnapshot, AnalyzerError> {
        let url = format!(
            "{BASE_URL}/api/v1/users/web_profile_info/?username={}",
            urlencoding::encode(username.as_str())
        );
        let response = self
            .client
            .get(url)
            .header("X-IG-App-ID", IG_APP_ID)
            .send()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => {
                return Err(AnalyzerError::ProfileNotFound(username.to_string()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AnalyzerError::LoginRequired)
            }
            _ => {}
        }

        let text = response
            .text()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;
        let body: WebProfileResponse = serde_json::from_str(&text)
            .map_err(|_| AnalyzerError::Api(format!("profile lookup returned {status}")))?;

        // Instagram reports missing profiles as data.user = null
        let user = body
            .data
            .and_then(|data| data.user)
            .ok_or_else(|| AnalyzerError::ProfileNotFound(username.to_string()))?;

        let viewer_is_target = self.session_user.as_deref() == Some(user.username.as_str());
        if user.is_private && !user.followed_by_viewer && !viewer_is_target {
            return Err(AnalyzerError::PrivateProfile(username.to_string()));
        }

        debug!(
            "resolved profile {} (id {}, {} followers, {} following)",
            user.username, user.id, user.edge_followed_by.count, user.edge_follow.count
        );

        Ok(ProfileSnapshot {
            id: user.id,
            username: Username::new(&user.username),
            full_name: user.full_name,
            followers: user.edge_followed_by.count,
            following: user.edge_follow.count,
            is_private: user.is_private,
        })
    }

    async fn follow_page(
        &self,
        profile: &ProfileSnapshot,
        list: FollowList,
        cursor: Option<&str>,
    ) -> Result<FollowPage, AnalyzerError> {
        // Fixed pacing between pages; the service throttles eager clients
        if cursor.is_some() {
            tokio::time::sleep(self.config.page_delay).await;
        }

        let query_hash = match list {
            FollowList::Followers => FOLLOWERS_QUERY_HASH,
            FollowList::Following => FOLLOWING_QUERY_HASH,
        };
        let url = graphql_url(query_hash, &profile.id, cursor);
        let response = self
            .client
            .get(url)
            .header("X-IG-App-ID", IG_APP_ID)
            .send()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AnalyzerError::LoginRequired);
        }

        let text = response
            .text()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;
        let body: GraphqlResponse = serde_json::from_str(&text)
            .map_err(|_| AnalyzerError::Api(format!("{list} page returned {status}")))?;

        if body.message.as_deref() == Some("login_required") {
            return Err(AnalyzerError::LoginRequired);
        }

        let user = body
            .data
            .and_then(|data| data.user)
            .ok_or_else(|| AnalyzerError::Api(format!("{list} page missing user data")))?;
        let connection = match list {
            FollowList::Followers => user.edge_followed_by,
            FollowList::Following => user.edge_follow,
        }
        .ok_or_else(|| AnalyzerError::Api(format!("{list} edge missing from response")))?;

        let usernames: Vec<Username> = connection
            .edges
            .into_iter()
            .map(|edge| Username::new(&edge.node.username))
            .collect();
        let next = if connection.page_info.has_next_page {
            connection.page_info.end_cursor
        } else {
            None
        };

        debug!("{list} page yielded {} accounts", usernames.len());
        Ok(FollowPage { usernames, next })
    }
}

// ============================================================================
// Instagram API Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    authenticated: bool,
    #[serde(default)]
    user: bool,
    #[serde(default)]
    two_factor_required: bool,
    two_factor_info: Option<TwoFactorInfo>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TwoFactorInfo {
    two_factor_identifier: String,
}

#[derive(Debug, Deserialize)]
struct WebProfileResponse {
    data: Option<WebProfileData>,
}

#[derive(Debug, Deserialize)]
struct WebProfileData {
    user: Option<WebProfileUser>,
}

#[derive(Debug, Deserialize)]
struct WebProfileUser {
    id: String,
    username: String,
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    is_private: bool,
    #[serde(default)]
    followed_by_viewer: bool,
    edge_followed_by: EdgeCount,
    edge_follow: EdgeCount,
}

#[derive(Debug, Deserialize)]
struct EdgeCount {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<GraphqlData>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphqlData {
    user: Option<GraphqlUser>,
}

#[derive(Debug, Deserialize)]
struct GraphqlUser {
    edge_followed_by: Option<ConnectionPage>,
    edge_follow: Option<ConnectionPage>,
}

#[derive(Debug, Deserialize)]
struct ConnectionPage {
    page_info: PageInfo,
    #[serde(default)]
    edges: Vec<ConnectionEdge>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConnectionEdge {
    node: ConnectionNode,
}

#[derive(Debug, Deserialize)]
struct ConnectionNode {
    username: String,
}
