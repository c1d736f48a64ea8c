//! Deterministic in-memory management API.
//!
//! Appliances and management nodes are scripted per address: which key a
//! credential exchange grants, what each command returns, and which
//! addresses are unreachable. Commands presented with anything other than
//! the currently granted key are refused as unauthorized.

use crate::collection::domain::{ApiKey, ApplianceAddress, Credentials, OperationalCommand};
use crate::collection::ports::{DeviceApi, DeviceApiError, DeviceApiResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// Scripted management API for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDeviceApi {
    state: Arc<RwLock<ScriptState>>,
}

#[derive(Debug, Default)]
struct ScriptState {
    keygen: HashMap<ApplianceAddress, String>,
    granted: HashMap<ApplianceAddress, String>,
    responses: HashMap<(ApplianceAddress, OperationalCommand), Result<String, DeviceApiError>>,
    unreachable: HashSet<ApplianceAddress>,
    key_requests: HashMap<ApplianceAddress, usize>,
    commands: Vec<(ApplianceAddress, OperationalCommand)>,
    latency: Option<Duration>,
}

impl ScriptedDeviceApi {
    /// Creates an API with nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps `inner` in a success envelope with a `result` node.
    #[must_use]
    pub fn success_envelope(inner: &str) -> String {
        format!(r#"<response status="success"><result>{inner}</result></response>"#)
    }

    /// Wraps `message` in a vendor error envelope.
    #[must_use]
    pub fn error_envelope(message: &str) -> String {
        format!(r#"<response status="error"><msg><line>{message}</line></msg></response>"#)
    }

    /// Makes credential exchanges against `address` grant `key`.
    ///
    /// Replaces any previously granted key, which stops being accepted.
    pub fn grant_key(&self, address: &ApplianceAddress, key: &str) {
        let mut state = self.write();
        state.keygen.insert(
            address.clone(),
            Self::success_envelope(&format!("<key>{key}</key>")),
        );
        state.granted.insert(address.clone(), key.to_owned());
    }

    /// Makes credential exchanges against `address` return a refusal.
    pub fn refuse_key(&self, address: &ApplianceAddress, message: &str) {
        let mut state = self.write();
        state
            .keygen
            .insert(address.clone(), Self::error_envelope(message));
        state.granted.remove(address);
    }

    /// Scripts the body returned for `command` on `address`.
    pub fn respond(&self, address: &ApplianceAddress, command: OperationalCommand, body: &str) {
        self.write()
            .responses
            .insert((address.clone(), command), Ok(body.to_owned()));
    }

    /// Scripts a failure for `command` on `address`.
    pub fn fail(
        &self,
        address: &ApplianceAddress,
        command: OperationalCommand,
        error: DeviceApiError,
    ) {
        self.write()
            .responses
            .insert((address.clone(), command), Err(error));
    }

    /// Makes every request to `address` fail at the connection level.
    pub fn mark_unreachable(&self, address: &ApplianceAddress) {
        self.write().unreachable.insert(address.clone());
    }

    /// Delays every response by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.write().latency = Some(latency);
    }

    /// Returns how many credential exchanges targeted `address`.
    #[must_use]
    pub fn key_requests(&self, address: &ApplianceAddress) -> usize {
        self.read().key_requests.get(address).copied().unwrap_or(0)
    }

    /// Returns the commands issued against `address`, in order.
    #[must_use]
    pub fn commands_for(&self, address: &ApplianceAddress) -> Vec<OperationalCommand> {
        self.read()
            .commands
            .iter()
            .filter(|(target, _)| target == address)
            .map(|(_, command)| *command)
            .collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, ScriptState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, ScriptState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    async fn pause(&self) {
        let latency = self.read().latency;
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }
    }
}

fn unreachable_error(address: &ApplianceAddress) -> DeviceApiError {
    DeviceApiError::transport(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        format!("{address} is unreachable"),
    ))
}

#[async_trait]
impl DeviceApi for ScriptedDeviceApi {
    async fn request_key(
        &self,
        address: &ApplianceAddress,
        _credentials: &Credentials,
    ) -> DeviceApiResult<String> {
        self.pause().await;
        let mut state = self.write();
        *state.key_requests.entry(address.clone()).or_insert(0) += 1;
        if state.unreachable.contains(address) {
            return Err(unreachable_error(address));
        }
        state
            .keygen
            .get(address)
            .cloned()
            .ok_or_else(|| DeviceApiError::Status {
                address: address.clone(),
                status: 403,
            })
    }

    async fn run_command(
        &self,
        address: &ApplianceAddress,
        key: &ApiKey,
        command: OperationalCommand,
    ) -> DeviceApiResult<String> {
        self.pause().await;
        let mut state = self.write();
        state.commands.push((address.clone(), command));
        if state.unreachable.contains(address) {
            return Err(unreachable_error(address));
        }
        if state.granted.get(address).map(String::as_str) != Some(key.expose()) {
            return Err(DeviceApiError::Unauthorized {
                address: address.clone(),
                status: 403,
            });
        }
        match state.responses.get(&(address.clone(), command)) {
            Some(scripted) => scripted.clone(),
            None => Err(DeviceApiError::Rejected {
                address: address.clone(),
                message: format!("no scripted response for {command}"),
            }),
        }
    }
}
