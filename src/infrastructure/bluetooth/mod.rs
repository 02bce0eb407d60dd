//! Bluetooth Module
//!
//! Carries joystick commands to the paired device.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────┐  try_send   ┌──────────────────┐
//! │ CommandEmitter │ ──────────▶ │  outbound queue  │ (bounded)
//! └────────────────┘             └────────┬─────────┘
//!                                         │
//!        UI ── TransportCommand ──▶ ┌─────▼───────────┐
//!                                   │ TransportWorker │
//!                                   └─────┬───────────┘
//!                                         │ Transport
//!                                   ┌─────▼───────────┐
//!                                   │ BLE serial link │
//!                                   └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`protocol`] - UUIDs, address parsing and payload chunking
//! - [`transport`] - `Transport` trait, error type and shared connection flag
//! - [`outbound`] - bounded fire-and-forget queue
//! - [`service`] - worker that owns the transport
//! - `connection` - Windows BLE implementation

#[cfg(windows)]
pub mod connection;
pub mod outbound;
pub mod protocol;
pub mod service;
pub mod transport;

pub use service::TransportWorker;
pub use transport::{ConnectionState, Transport};

#[cfg(windows)]
pub type PlatformTransport = connection::BleSerialTransport;
#[cfg(not(windows))]
pub type PlatformTransport = transport::UnsupportedTransport;

/// Build the transport for the current platform
#[cfg(windows)]
pub fn platform_transport(service_uuid: &str, write_char_uuid: &str) -> PlatformTransport {
    connection::BleSerialTransport::new(connection::ConnectionConfig {
        service_uuid: service_uuid.to_string(),
        write_char_uuid: write_char_uuid.to_string(),
    })
}

#[cfg(not(windows))]
pub fn platform_transport(_service_uuid: &str, _write_char_uuid: &str) -> PlatformTransport {
    transport::UnsupportedTransport
}
