//! Adapter implementations for collection ports.

pub mod http;
pub mod scripted;

pub use http::{ApiScheme, HttpDeviceApi, HttpDeviceApiSettings};
pub use scripted::ScriptedDeviceApi;
