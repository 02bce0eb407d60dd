//! Transport Worker
//!
//! Single consumer of the outbound queue. Owns the transport, serves
//! connect/disconnect requests from the UI and reports outcomes back as
//! [`AppEvent`]s.

use crate::domain::models::{
    AppEvent, ConnectionStatus, MessageSeverity, StatusMessage, TransportCommand,
};
use crate::infrastructure::bluetooth::transport::{ConnectionState, Transport, TransportError};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub struct TransportWorker<T: Transport> {
    transport: T,
    commands: mpsc::UnboundedReceiver<TransportCommand>,
    outbound: mpsc::Receiver<String>,
    event_sender: mpsc::UnboundedSender<AppEvent>,
    connection: ConnectionState,
}

impl<T: Transport> TransportWorker<T> {
    pub fn new(
        transport: T,
        commands: mpsc::UnboundedReceiver<TransportCommand>,
        outbound: mpsc::Receiver<String>,
        event_sender: mpsc::UnboundedSender<AppEvent>,
        connection: ConnectionState,
    ) -> Self {
        Self {
            transport,
            commands,
            outbound,
            event_sender,
            connection,
        }
    }

    /// Run until both the command channel and the outbound queue are closed
    pub async fn run(mut self) -> T {
        let mut commands_open = true;
        let mut outbound_open = true;

        while commands_open || outbound_open {
            tokio::select! {
                cmd = self.commands.recv(), if commands_open => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => commands_open = false,
                },
                msg = self.outbound.recv(), if outbound_open => match msg {
                    Some(msg) => self.deliver(&msg).await,
                    None => outbound_open = false,
                },
            }
        }

        debug!("Transport worker stopped");
        self.transport
    }

    async fn handle_command(&mut self, cmd: TransportCommand) {
        match cmd {
            TransportCommand::Connect { address, name } => self.connect(&address, &name).await,
            TransportCommand::Disconnect => {
                if self.transport.is_connected() {
                    self.transport.disconnect();
                    info!("Disconnected from device");
                    self.send_log("Disconnected from device", MessageSeverity::Info);
                }
                self.connection.set(false);
                self.send_status(ConnectionStatus::Disconnected);
            }
        }
    }

    async fn connect(&mut self, address: &str, name: &str) {
        info!("Connecting to {} ({})", name, address);
        self.send_status(ConnectionStatus::Connecting);

        let connected = match self.transport.connect(address).await {
            Ok(connected) => connected,
            Err(e) => {
                error!("Connection to {} failed: {}", address, e);
                false
            }
        };
        self.connection.set(connected);

        if connected {
            self.send_log(&format!("Connected to {}", name), MessageSeverity::Success);
            self.send_status(ConnectionStatus::Connected);
        } else {
            self.send_log(&format!("Cannot connect to {}!", name), MessageSeverity::Error);
            self.send_status(ConnectionStatus::Disconnected);
        }
    }

    async fn deliver(&mut self, message: &str) {
        match self.transport.send_message(message).await {
            Ok(()) => {
                let _ = self
                    .event_sender
                    .send(AppEvent::MessageSent(message.to_string()));
            }
            Err(TransportError::NotConnected) => {
                debug!("Dropped {:?}: not connected", message);
            }
            Err(e) => {
                warn!("Failed to send {:?}: {}", message, e);
            }
        }

        let connected = self.transport.is_connected();
        if connected == self.connection.is_connected() {
            return;
        }
        self.connection.set(connected);
        if connected {
            info!("Link re-established");
            self.send_log("Connection restored", MessageSeverity::Success);
            self.send_status(ConnectionStatus::Connected);
        } else {
            warn!("Link lost");
            self.send_log("Connection to device lost", MessageSeverity::Warning);
            self.send_status(ConnectionStatus::Disconnected);
        }
    }

    fn send_status(&self, status: ConnectionStatus) {
        let _ = self.event_sender.send(AppEvent::ConnectionStatus(status));
    }

    fn send_log(&self, message: &str, severity: MessageSeverity) {
        let _ = self.event_sender.send(AppEvent::LogMessage(StatusMessage {
            message: message.to_string(),
            severity,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::bluetooth::outbound::outbound_channel;

    /// Transport double that records everything written to it
    #[derive(Debug, Default)]
    struct RecordingTransport {
        pub accept: bool,
        pub connected: bool,
        /// Number of upcoming writes that fail and drop the link
        pub failing_writes: usize,
        /// A write on a dropped link brings it back up, like a GATT write does
        pub reconnect_on_write: bool,
        pub addresses: Vec<String>,
        pub sent: Vec<String>,
    }

    impl RecordingTransport {
        pub fn accepting() -> Self {
            Self {
                accept: true,
                ..Default::default()
            }
        }
    }

    impl Transport for RecordingTransport {
        async fn connect(&mut self, address: &str) -> Result<bool, TransportError> {
            self.addresses.push(address.to_string());
            self.connected = self.accept;
            Ok(self.accept)
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        async fn send_message(&mut self, message: &str) -> Result<(), TransportError> {
            if !self.connected {
                if !self.reconnect_on_write {
                    return Err(TransportError::NotConnected);
                }
                self.connected = true;
            }
            if self.failing_writes > 0 {
                self.failing_writes -= 1;
                self.connected = false;
                return Err(TransportError::WriteFailed("link dropped".into()));
            }
            self.sent.push(message.to_string());
            Ok(())
        }

        fn disconnect(&mut self) {
            self.connected = false;
        }
    }

    struct Harness {
        commands: mpsc::UnboundedSender<TransportCommand>,
        outbound: crate::infrastructure::bluetooth::outbound::OutboundSender,
        events: mpsc::UnboundedReceiver<AppEvent>,
        connection: ConnectionState,
        worker: TransportWorker<RecordingTransport>,
    }

    fn harness(transport: RecordingTransport) -> Harness {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (outbound, outbound_rx) = outbound_channel(8);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let connection = ConnectionState::new();
        let worker = TransportWorker::new(
            transport,
            cmd_rx,
            outbound_rx,
            event_tx,
            connection.clone(),
        );
        Harness {
            commands: cmd_tx,
            outbound,
            events: event_rx,
            connection,
            worker,
        }
    }

    fn connect_cmd() -> TransportCommand {
        TransportCommand::Connect {
            address: "00:11:22:33:44:55".into(),
            name: "Rover".into(),
        }
    }

    fn drain(events: &mut mpsc::UnboundedReceiver<AppEvent>) -> Vec<AppEvent> {
        let mut out = Vec::new();
        while let Ok(event) = events.try_recv() {
            out.push(event);
        }
        out
    }

    #[tokio::test]
    async fn test_connect_success_reports_status() {
        let mut h = harness(RecordingTransport::accepting());
        h.commands.send(connect_cmd()).unwrap();
        drop(h.commands);
        drop(h.outbound);

        let transport = h.worker.run().await;
        assert_eq!(transport.addresses, vec!["00:11:22:33:44:55"]);
        assert!(h.connection.is_connected());

        let events = drain(&mut h.events);
        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::LogMessage(m) if m.message == "Connected to Rover"
        )));
        assert!(matches!(
            events.last(),
            Some(AppEvent::ConnectionStatus(ConnectionStatus::Connected))
        ));
    }

    #[tokio::test]
    async fn test_connect_failure_is_not_retried() {
        let mut h = harness(RecordingTransport::default());
        h.commands.send(connect_cmd()).unwrap();
        drop(h.commands);
        drop(h.outbound);

        let transport = h.worker.run().await;
        assert_eq!(transport.addresses.len(), 1);
        assert!(!h.connection.is_connected());

        let events = drain(&mut h.events);
        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::LogMessage(m)
                if m.message == "Cannot connect to Rover!" && m.severity == MessageSeverity::Error
        )));
    }

    #[tokio::test]
    async fn test_messages_delivered_in_order() {
        let mut transport = RecordingTransport::accepting();
        transport.connected = true;
        let mut h = harness(transport);
        h.outbound.dispatch("10,10,0|".into());
        h.outbound.dispatch("20,20,1|".into());
        drop(h.commands);
        drop(h.outbound);

        let transport = h.worker.run().await;
        assert_eq!(transport.sent, vec!["10,10,0|", "20,20,1|"]);
        let sent: Vec<_> = drain(&mut h.events)
            .into_iter()
            .filter_map(|e| match e {
                AppEvent::MessageSent(m) => Some(m),
                _ => None,
            })
            .collect();
        assert_eq!(sent, vec!["10,10,0|", "20,20,1|"]);
    }

    #[tokio::test]
    async fn test_send_while_disconnected_is_swallowed() {
        let h = harness(RecordingTransport::default());
        h.outbound.dispatch("50,50,0|".into());
        drop(h.commands);
        drop(h.outbound);

        let transport = h.worker.run().await;
        assert!(transport.sent.is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_clears_connection() {
        let mut transport = RecordingTransport::accepting();
        transport.failing_writes = 1;
        let Harness {
            commands,
            outbound,
            mut events,
            connection,
            worker,
        } = harness(transport);
        commands.send(connect_cmd()).unwrap();
        drop(commands);

        let driver = async {
            // Wait for the connect to land before queueing
            while let Some(event) = events.recv().await {
                if let AppEvent::ConnectionStatus(ConnectionStatus::Connected) = event {
                    break;
                }
            }
            outbound.dispatch("50,50,0|".into());
            drop(outbound);
        };

        let (transport, ()) = tokio::join!(worker.run(), driver);
        assert!(transport.sent.is_empty());
        assert!(!connection.is_connected());
        let events = drain(&mut events);
        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::ConnectionStatus(ConnectionStatus::Disconnected)
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::LogMessage(m) if m.severity == MessageSeverity::Warning
        )));
    }

    #[tokio::test]
    async fn test_link_recovery_reports_connected() {
        let mut transport = RecordingTransport::accepting();
        transport.failing_writes = 1;
        transport.reconnect_on_write = true;
        let Harness {
            commands,
            outbound,
            mut events,
            connection,
            worker,
        } = harness(transport);
        commands.send(connect_cmd()).unwrap();
        drop(commands);

        let driver = async {
            while let Some(event) = events.recv().await {
                if let AppEvent::ConnectionStatus(ConnectionStatus::Connected) = event {
                    break;
                }
            }
            outbound.dispatch("50,50,0|".into());
            outbound.dispatch("40,60,1|".into());
            drop(outbound);
        };

        let (transport, ()) = tokio::join!(worker.run(), driver);
        assert_eq!(transport.sent, vec!["40,60,1|"]);
        assert!(connection.is_connected());

        let statuses: Vec<_> = drain(&mut events)
            .into_iter()
            .filter_map(|e| match e {
                AppEvent::ConnectionStatus(status) => Some(status),
                _ => None,
            })
            .collect();
        assert_eq!(
            statuses,
            vec![ConnectionStatus::Disconnected, ConnectionStatus::Connected]
        );
    }

    #[tokio::test]
    async fn test_disconnect() {
        let mut h = harness(RecordingTransport::accepting());
        h.commands.send(connect_cmd()).unwrap();
        h.commands.send(TransportCommand::Disconnect).unwrap();
        drop(h.commands);
        drop(h.outbound);

        let transport = h.worker.run().await;
        assert!(!transport.connected);
        assert!(!h.connection.is_connected());
        assert!(matches!(
            drain(&mut h.events).last(),
            Some(AppEvent::ConnectionStatus(ConnectionStatus::Disconnected))
        ));
    }
}
