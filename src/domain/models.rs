use serde::{Deserialize, Serialize};

/// Identifier of a touch contact as reported by the input layer
pub type ContactId = i64;

/// A position in viewport space (origin at the top-left of the joystick surface)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchContact {
    pub id: ContactId,
    pub position: TouchPoint,
}

/// Size of the joystick surface. Zero in either dimension means "not measured yet".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub const UNMEASURED: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Auxiliary up/down signal driven by the two lift buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiftState {
    Up,
    #[default]
    Neutral,
    Down,
}

impl LiftState {
    pub fn value(self) -> i8 {
        match self {
            LiftState::Up => 1,
            LiftState::Neutral => 0,
            LiftState::Down => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiftButton {
    Up,
    Down,
}

/// How the primary contact is picked out of the active touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PrimarySelection {
    /// Oldest contact that is still touching
    #[default]
    FirstSurviving,
    /// Always the contact with this identifier, if present
    FixedId(ContactId),
}

/// Which emission branches require a live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionGating {
    /// Neutral commands go out regardless of connection, positional ones only when connected
    #[default]
    Legacy,
    /// Every command requires a live connection
    Always,
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    ConnectionStatus(ConnectionStatus),
    LogMessage(StatusMessage),
    MessageSent(String),
}

/// Requests for the transport worker
#[derive(Debug, Clone)]
pub enum TransportCommand {
    Connect { address: String, name: String },
    Disconnect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub severity: MessageSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSeverity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Joystick,
    Settings,
}
