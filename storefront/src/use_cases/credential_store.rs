//! One logical access token mirrored across three storage tiers.
//!
//! Reads prefer the session-scoped tier, then the cookie. The backup tier
//! is written on every `set` but only read back by [`CredentialStore::restore`].
//! No tier failure ever escapes as an error: writes report per-tier outcomes
//! in a [`WriteReport`] and reads degrade to "absent".

use tracing::{debug, info, warn};

use crate::domain::{
    CookiePolicy, CookieTier, KeyValueTier, Session, SessionProvider, StorageError,
};

pub const DEFAULT_AUTH_KEY: &str = "sb-access-token";
const BACKUP_SUFFIX: &str = "_backup";

// Key under which the durable tier mirrors `key`.
pub fn backup_key(key: &str) -> String {
    format!("{key}{BACKUP_SUFFIX}")
}

/// Per-tier outcome of a mirrored write or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub session: Result<(), StorageError>,
    pub cookie: Result<(), StorageError>,
    pub backup: Result<(), StorageError>,
}

impl WriteReport {
    // True when every tier accepted the operation.
    pub fn is_complete(&self) -> bool {
        self.session.is_ok() && self.cookie.is_ok() && self.backup.is_ok()
    }

    // True when at least one tier accepted the operation.
    pub fn any_succeeded(&self) -> bool {
        self.session.is_ok() || self.cookie.is_ok() || self.backup.is_ok()
    }
}

// Credential store with injected tier backends.
pub struct CredentialStore<S, K, B> {
    pub session: S,
    pub cookies: K,
    pub backup: B,
    pub policy: CookiePolicy,
    // Key that `restore` reads and re-seeds.
    pub auth_key: String,
}

impl<S, K, B> CredentialStore<S, K, B>
where
    S: KeyValueTier,
    K: CookieTier,
    B: KeyValueTier,
{
    pub fn new(session: S, cookies: K, backup: B) -> Self {
        Self {
            session,
            cookies,
            backup,
            policy: CookiePolicy::default(),
            auth_key: DEFAULT_AUTH_KEY.to_string(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        match self.session.get(key).await {
            Ok(Some(token)) if !token.is_empty() => return Some(token),
            Ok(_) => {}
            Err(err) => warn!(key, error = %err, "session tier read failed"),
        }

        match self.cookies.get(key).await {
            Ok(Some(token)) if !token.is_empty() => Some(token),
            Ok(_) => None,
            Err(err) => {
                warn!(key, error = %err, "cookie tier read failed");
                None
            }
        }
    }

    pub async fn set(&self, key: &str, token: &str) -> WriteReport {
        let report = WriteReport {
            session: self.session.set(key, token).await,
            cookie: self.cookies.set(key, token, &self.policy).await,
            backup: self.backup.set(&backup_key(key), token).await,
        };
        log_report("set", key, &report);
        report
    }

    pub async fn remove(&self, key: &str) -> WriteReport {
        let report = WriteReport {
            session: self.session.remove(key).await,
            cookie: self.cookies.clear(key, &self.policy).await,
            backup: self.backup.remove(&backup_key(key)).await,
        };
        log_report("remove", key, &report);
        report
    }

    /// Recovers a live session, falling back to the backup token.
    ///
    /// The provider is asked once with the current token. If that yields
    /// nothing, a backup token (when present) re-seeds the session tier and
    /// cookie, and the provider is asked exactly once more.
    pub async fn restore<P>(&self, provider: &P) -> Option<Session>
    where
        P: SessionProvider + ?Sized,
    {
        let current = self.get(&self.auth_key).await;
        match provider.fetch_session(current.as_deref()).await {
            Ok(Some(session)) => return Some(session),
            Ok(None) => debug!(key = %self.auth_key, "no live session"),
            Err(err) => warn!(key = %self.auth_key, error = %err, "live session lookup failed"),
        }

        let backup = match self.backup.get(&backup_key(&self.auth_key)).await {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return None,
            Err(err) => {
                warn!(key = %self.auth_key, error = %err, "backup tier read failed");
                return None;
            }
        };

        if let Err(err) = self.session.set(&self.auth_key, &backup).await {
            warn!(key = %self.auth_key, error = %err, "failed to re-seed session tier");
        }
        if let Err(err) = self.cookies.set(&self.auth_key, &backup, &self.policy).await {
            warn!(key = %self.auth_key, error = %err, "failed to re-seed cookie tier");
        }

        match provider.fetch_session(Some(backup.as_str())).await {
            Ok(Some(session)) => {
                info!(key = %self.auth_key, "session restored from backup token");
                Some(session)
            }
            Ok(None) => None,
            Err(err) => {
                warn!(key = %self.auth_key, error = %err, "session retry after restore failed");
                None
            }
        }
    }
}

fn log_report(operation: &'static str, key: &str, report: &WriteReport) {
    let tiers = [
        ("session", &report.session),
        ("cookie", &report.cookie),
        ("backup", &report.backup),
    ];
    for (tier, outcome) in tiers {
        if let Err(err) = outcome {
            warn!(operation, key, tier, error = %err, "storage tier write failed");
        }
    }
}
