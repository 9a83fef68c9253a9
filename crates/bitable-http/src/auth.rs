//! Tenant access token acquisition.

use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, instrument};

use bitable_core::error::AuthError;
use bitable_core::{AccessToken, BaseUrl, Credentials, Result};

use crate::endpoints::{TENANT_ACCESS_TOKEN, TenantAccessTokenRequest, TenantAccessTokenResponse};

/// Tokens are renewed this long before the provider says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(300);

/// A freshly minted tenant token and its lifetime.
#[derive(Debug, Clone)]
pub struct TenantToken {
    pub token: AccessToken,
    pub expires_in: Duration,
}

/// Request a new tenant access token.
///
/// Succeeds only on HTTP 200 with provider code 0 and a non-empty token.
#[instrument(skip(http, credentials), fields(base = %base, app_id = %credentials.app_id()))]
pub async fn fetch_tenant_access_token(
    http: &reqwest::Client,
    base: &BaseUrl,
    credentials: &Credentials,
) -> Result<TenantToken> {
    debug!("Requesting tenant access token");

    let request = TenantAccessTokenRequest {
        app_id: credentials.app_id(),
        app_secret: credentials.app_secret(),
    };

    let response = http
        .post(base.api_url(TENANT_ACCESS_TOKEN))
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(AuthError::HttpStatus {
            status: status.as_u16(),
        }
        .into());
    }

    let body: TenantAccessTokenResponse = response.json().await?;
    if body.code != 0 {
        return Err(AuthError::Rejected {
            code: body.code,
            message: body.msg,
        }
        .into());
    }

    let token = AccessToken::new(body.tenant_access_token).ok_or(AuthError::MissingToken)?;
    Ok(TenantToken {
        token,
        expires_in: Duration::from_secs(body.expire),
    })
}

/// Caches the tenant token for Open API calls until shortly before expiry.
#[derive(Debug, Default)]
pub(crate) struct TokenCache {
    slot: RwLock<Option<CachedToken>>,
}

#[derive(Debug)]
struct CachedToken {
    token: AccessToken,
    renew_at: Instant,
}

impl TokenCache {
    /// Return the cached token, fetching a new one if it is missing or stale.
    pub(crate) async fn get(
        &self,
        http: &reqwest::Client,
        base: &BaseUrl,
        credentials: &Credentials,
    ) -> Result<AccessToken> {
        if let Some(token) = self.current().await {
            return Ok(token);
        }

        let mut slot = self.slot.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if let Some(cached) = slot.as_ref().filter(|c| c.renew_at > Instant::now()) {
            return Ok(cached.token.clone());
        }

        let fresh = fetch_tenant_access_token(http, base, credentials).await?;
        let renew_at = Instant::now() + fresh.expires_in.saturating_sub(EXPIRY_MARGIN);
        *slot = Some(CachedToken {
            token: fresh.token.clone(),
            renew_at,
        });
        debug!(expires_in = ?fresh.expires_in, "Tenant access token cached");

        Ok(fresh.token)
    }

    async fn current(&self) -> Option<AccessToken> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|c| c.renew_at > Instant::now())
            .map(|c| c.token.clone())
    }
}
