use serde::Deserialize;
use url::Url;

use crate::error::AppError;

pub const LOGIN_REQUIRED_MESSAGE: &str = "LINEログイン後にアクセスしてください";

// Fixed identity used outside production when the LINE call fails, so the
// rest of the flow stays exercisable without a real LIFF session.
pub const PLACEHOLDER_USER_ID: &str = "dummy-line-user-id";
pub const PLACEHOLDER_DISPLAY_NAME: &str = "テストユーザー";

const VERIFY_URL: &str = "https://api.line.me/oauth2/v2.1/verify";
const PROFILE_URL: &str = "https://api.line.me/v2/profile";

#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub line_user_id: String,
    pub display_name: String,
    pub picture_url: Option<String>,
}

/// Outcome of the session bootstrap, decided once per request.
#[derive(Debug, Clone, PartialEq)]
pub enum Bootstrap {
    Ready(Identity),
    /// No usable token; the webview must run the login redirect.
    LoginRequired,
    Failed(String),
}

/// `sub` is the stable user id; `name`/`picture` are present when the token
/// was issued with the profile scope.
#[derive(Debug, Clone, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineProfile {
    pub user_id: String,
    pub display_name: String,
    pub picture_url: Option<String>,
}

/// LINE Platform client verifying LIFF tokens sent up by the webview.
pub struct LineAuth {
    http: reqwest::Client,
    channel_id: String,
}

impl LineAuth {
    pub fn new(channel_id: &str) -> Self {
        LineAuth {
            http: reqwest::Client::new(),
            channel_id: channel_id.to_string(),
        }
    }

    /// Resolves the session. The verified token subject is preferred over
    /// the raw profile id; a failure outside production degrades to the
    /// placeholder identity instead of blocking the page.
    pub async fn bootstrap(
        &self,
        id_token: Option<&str>,
        access_token: Option<&str>,
        production: bool,
    ) -> Bootstrap {
        match self.resolve(id_token, access_token).await {
            Ok(Some(identity)) => Bootstrap::Ready(identity),
            Ok(None) => Bootstrap::LoginRequired,
            Err(e) => {
                error!("LIFF session bootstrap failed: {e}");
                fallback_on_error(e.user_message(), production)
            }
        }
    }

    async fn resolve(
        &self,
        id_token: Option<&str>,
        access_token: Option<&str>,
    ) -> Result<Option<Identity>, AppError> {
        let claims = match id_token {
            Some(token) => Some(self.verify_id_token(token).await?),
            None => None,
        };
        let profile = match access_token {
            Some(token) => Some(self.get_profile(token).await?),
            None => None,
        };
        Ok(identity_from(claims, profile))
    }

    async fn verify_id_token(&self, id_token: &str) -> Result<IdTokenClaims, AppError> {
        let params = [
            ("id_token", id_token),
            ("client_id", self.channel_id.as_str()),
        ];
        let response = self.http.post(VERIFY_URL).form(&params).send().await?;
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Line(format!("IDトークンの検証に失敗しました: {body}")));
        }
        Ok(response.json::<IdTokenClaims>().await?)
    }

    async fn get_profile(&self, access_token: &str) -> Result<LineProfile, AppError> {
        let response = self
            .http
            .get(PROFILE_URL)
            .bearer_auth(access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::Line("プロフィールの取得に失敗しました".to_string()));
        }
        Ok(response.json::<LineProfile>().await?)
    }
}

/// Combines the verified claims and the raw profile into one identity,
/// preferring the token subject claim. Invalid avatar URLs are dropped.
pub fn identity_from(
    claims: Option<IdTokenClaims>,
    profile: Option<LineProfile>,
) -> Option<Identity> {
    let line_user_id = match (&claims, &profile) {
        (Some(c), _) => c.sub.clone(),
        (None, Some(p)) => p.user_id.clone(),
        (None, None) => return None,
    };
    let display_name = profile
        .as_ref()
        .map(|p| p.display_name.clone())
        .or_else(|| claims.as_ref().and_then(|c| c.name.clone()))
        .unwrap_or_default();
    let picture_url = profile
        .as_ref()
        .and_then(|p| p.picture_url.clone())
        .or_else(|| claims.as_ref().and_then(|c| c.picture.clone()))
        .filter(|u| Url::parse(u).is_ok());
    Some(Identity {
        line_user_id,
        display_name,
        picture_url,
    })
}

pub fn fallback_on_error(message: String, production: bool) -> Bootstrap {
    if production {
        Bootstrap::Failed(message)
    } else {
        warn!("Development mode: continuing with placeholder identity");
        Bootstrap::Ready(placeholder_identity())
    }
}

pub fn placeholder_identity() -> Identity {
    Identity {
        line_user_id: PLACEHOLDER_USER_ID.to_string(),
        display_name: PLACEHOLDER_DISPLAY_NAME.to_string(),
        picture_url: None,
    }
}
