use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{
    CookiePolicy, CookieTier, KeyValueTier, PlatformError, Session, SessionProvider, StorageError,
};

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub get: bool,
    pub set: bool,
    pub remove: bool,
}

// Key/value tier fake with switchable failures.
#[derive(Clone)]
pub(crate) struct RecordingTier {
    entries: Arc<Mutex<HashMap<String, String>>>,
    failures: FailureFlags,
}

impl RecordingTier {
    pub(crate) fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    // Writes directly, bypassing failure flags.
    pub(crate) fn seed(&self, key: &str, value: &str) {
        let mut guard = self.entries.lock().expect("entries mutex poisoned");
        guard.insert(key.to_string(), value.to_string());
    }

    pub(crate) fn value(&self, key: &str) -> Option<String> {
        let guard = self.entries.lock().expect("entries mutex poisoned");
        guard.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueTier for RecordingTier {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.failures.get {
            return Err(StorageError::Unavailable("get failed".to_string()));
        }
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failures.set {
            return Err(StorageError::QuotaExceeded);
        }
        self.seed(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.failures.remove {
            return Err(StorageError::Unavailable("remove failed".to_string()));
        }
        let mut guard = self.entries.lock().expect("entries mutex poisoned");
        guard.remove(key);
        Ok(())
    }
}

#[derive(Default)]
struct CookieState {
    values: HashMap<String, String>,
    writes: HashMap<String, (String, CookiePolicy)>,
    cleared: Vec<(String, CookiePolicy)>,
}

// Cookie tier fake that records the policy of every write.
#[derive(Clone)]
pub(crate) struct FakeCookies {
    state: Arc<Mutex<CookieState>>,
    failures: FailureFlags,
}

impl FakeCookies {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(CookieState::default())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn seed(&self, name: &str, value: &str) {
        let mut guard = self.state.lock().expect("cookie mutex poisoned");
        guard.values.insert(name.to_string(), value.to_string());
    }

    pub(crate) fn written(&self, name: &str) -> Option<(String, CookiePolicy)> {
        let guard = self.state.lock().expect("cookie mutex poisoned");
        guard.writes.get(name).cloned()
    }

    pub(crate) fn was_cleared(&self, name: &str) -> bool {
        let guard = self.state.lock().expect("cookie mutex poisoned");
        guard.cleared.iter().any(|(cleared, _)| cleared == name) && !guard.values.contains_key(name)
    }

    pub(crate) fn cleared_with(&self, name: &str) -> Option<CookiePolicy> {
        let guard = self.state.lock().expect("cookie mutex poisoned");
        guard
            .cleared
            .iter()
            .rev()
            .find(|(cleared, _)| cleared == name)
            .map(|(_, policy)| policy.clone())
    }
}

#[async_trait]
impl CookieTier for FakeCookies {
    async fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        if self.failures.get {
            return Err(StorageError::Unavailable("cookies disabled".to_string()));
        }
        let guard = self.state.lock().expect("cookie mutex poisoned");
        Ok(guard.values.get(name).cloned())
    }

    async fn set(
        &self,
        name: &str,
        value: &str,
        policy: &CookiePolicy,
    ) -> Result<(), StorageError> {
        if self.failures.set {
            return Err(StorageError::Unavailable("cookies disabled".to_string()));
        }
        let mut guard = self.state.lock().expect("cookie mutex poisoned");
        guard.values.insert(name.to_string(), value.to_string());
        guard
            .writes
            .insert(name.to_string(), (value.to_string(), policy.clone()));
        Ok(())
    }

    async fn clear(&self, name: &str, policy: &CookiePolicy) -> Result<(), StorageError> {
        if self.failures.remove {
            return Err(StorageError::Unavailable("cookies disabled".to_string()));
        }
        let mut guard = self.state.lock().expect("cookie mutex poisoned");
        guard.values.remove(name);
        guard.cleared.push((name.to_string(), policy.clone()));
        Ok(())
    }
}

// Session provider fake: accepts known tokens, optionally fails the first call.
pub(crate) struct ScriptedProvider {
    accepted: HashMap<String, Session>,
    fail_first: bool,
    calls: Mutex<Vec<Option<String>>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self {
            accepted: HashMap::new(),
            fail_first: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn accepting(mut self, token: &str, session: Session) -> Self {
        self.accepted.insert(token.to_string(), session);
        self
    }

    pub(crate) fn failing_first(mut self) -> Self {
        self.fail_first = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Option<String>> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

#[async_trait]
impl SessionProvider for ScriptedProvider {
    async fn fetch_session(
        &self,
        access_token: Option<&str>,
    ) -> Result<Option<Session>, PlatformError> {
        let call_index = {
            let mut calls = self.calls.lock().expect("calls mutex poisoned");
            calls.push(access_token.map(str::to_string));
            calls.len()
        };
        if self.fail_first && call_index == 1 {
            return Err(PlatformError::Timeout);
        }
        Ok(access_token.and_then(|token| self.accepted.get(token).cloned()))
    }
}
