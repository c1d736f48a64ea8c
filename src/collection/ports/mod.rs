//! Port contracts for fleet health collection.

pub mod device_api;

pub use device_api::{DeviceApi, DeviceApiError, DeviceApiResult};
