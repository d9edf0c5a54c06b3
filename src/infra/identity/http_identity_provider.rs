use crate::domain::{
    models::auth::{AuthFailure, VerifiedIdentity},
    ports::IdentityProvider,
};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, warn};

/// Verifies provider access tokens against an OpenID Connect userinfo endpoint.
pub struct HttpIdentityProvider {
    client: Client,
    userinfo_url: String,
}

impl HttpIdentityProvider {
    pub fn new(userinfo_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            userinfo_url,
        }
    }
}

#[derive(Deserialize)]
struct UserInfo {
    email: Option<String>,
    email_verified: Option<bool>,
    name: Option<String>,
    picture: Option<String>,
}

impl UserInfo {
    fn into_identity(self) -> Option<VerifiedIdentity> {
        if self.email_verified == Some(false) {
            return None;
        }
        let email = self.email.filter(|e| !e.is_empty())?;
        let name = self.name.filter(|n| !n.is_empty()).unwrap_or_else(|| email.clone());
        Some(VerifiedIdentity { email, name, picture: self.picture })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify(&self, access_token: &str) -> Result<VerifiedIdentity, AppError> {
        let res = self.client.get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Identity provider connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            warn!("Identity provider rejected token. Status: {}", res.status());
            return Err(AuthFailure::IdentityRejected.into());
        }

        let info: UserInfo = res.json().await.map_err(|e| {
            error!("Failed to parse userinfo response: {:?}", e);
            AppError::Internal
        })?;

        info.into_identity().ok_or_else(|| AuthFailure::IdentityRejected.into())
    }
}
