//! Transport abstraction
//!
//! The joystick core only needs three things from a Bluetooth link: connect
//! to an address, report whether it is connected, and push a message.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid Bluetooth address: {0}")]
    InvalidAddress(String),
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),
    #[error("not connected")]
    NotConnected,
    #[error("serial service not found on device")]
    ServiceNotFound,
    #[error("write characteristic not found on device")]
    CharacteristicNotFound,
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("Bluetooth transport is not supported on this platform")]
    Unsupported,
    #[cfg(windows)]
    #[error("platform error: {0}")]
    Platform(#[from] windows::core::Error),
}

/// A link to a paired device.
///
/// Implementations are driven from a single worker task, so methods take
/// `&mut self` and need not be thread safe.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Connect to `address`. `Ok(false)` means the device was reachable but
    /// refused the link.
    async fn connect(&mut self, address: &str) -> Result<bool, TransportError>;

    fn is_connected(&self) -> bool;

    async fn send_message(&mut self, message: &str) -> Result<(), TransportError>;

    fn disconnect(&mut self);
}

/// Connection flag readable from any thread
#[derive(Debug, Clone, Default)]
pub struct ConnectionState(Arc<AtomicBool>);

impl ConnectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, connected: bool) {
        self.0.store(connected, Ordering::Release);
    }
}

/// Stand-in used where no Bluetooth stack is available
#[derive(Debug, Default)]
pub struct UnsupportedTransport;

impl Transport for UnsupportedTransport {
    async fn connect(&mut self, address: &str) -> Result<bool, TransportError> {
        tracing::warn!("Cannot connect to {}: no Bluetooth support", address);
        Err(TransportError::Unsupported)
    }

    fn is_connected(&self) -> bool {
        false
    }

    async fn send_message(&mut self, _message: &str) -> Result<(), TransportError> {
        Err(TransportError::NotConnected)
    }

    fn disconnect(&mut self) {}
}
