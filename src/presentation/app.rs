use crate::domain::models::{
    AppEvent, ConnectionStatus, MessageSeverity, StatusMessage, Tab, TransportCommand,
};
use crate::domain::settings::SettingsService;
use crate::domain::touch::ActiveTouchRegistry;
use crate::domain::translator::{SharedTranslator, TouchCommandTranslator};
use crate::infrastructure::bluetooth::{
    outbound::outbound_channel, platform_transport, ConnectionState, TransportWorker,
};
use crate::infrastructure::emitter::CommandEmitter;
use crate::presentation::joystick::JoystickPad;
use eframe::egui;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

pub struct JoystickApp {
    // Services
    pub(crate) settings: Arc<Mutex<SettingsService>>,
    pub(crate) translator: SharedTranslator,

    // Bluetooth
    pub(crate) transport_tx: mpsc::UnboundedSender<TransportCommand>,
    pub(crate) event_rx: mpsc::UnboundedReceiver<AppEvent>,

    // State
    pub(crate) connection_status: ConnectionStatus,
    pub(crate) bluetooth_status: String,
    pub(crate) bluetooth_severity: MessageSeverity,
    pub(crate) touch_message: String,
    pub(crate) last_sent: Option<String>,

    // UI State
    pub(crate) pad: JoystickPad,
    pub(crate) selected_tab: Tab,
    pub(crate) address_input: String,
    pub(crate) name_input: String,
    pub(crate) is_dark_mode: bool,

    // Logging guard
    pub(crate) _logging_guard: Option<crate::infrastructure::logging::LoggingGuard>,
}

impl JoystickApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        crate::presentation::theme::configure_style(&cc.egui_ctx, false);

        let settings_service = SettingsService::new().unwrap_or_else(|e| {
            eprintln!("Failed to locate settings directory: {}", e);
            SettingsService::with_path(PathBuf::from("settings.json"))
        });

        let logging_guard =
            crate::infrastructure::logging::init_logger(&settings_service.get().log_settings)
                .map_err(|e| eprintln!("Failed to initialize logging: {}", e))
                .ok();

        info!("Starting Bluetooth joystick remote");

        let s = settings_service.get().clone();
        let translator = TouchCommandTranslator::new(
            ActiveTouchRegistry::new(s.max_contacts, s.primary_selection),
            s.connection_gating,
        )
        .into_shared();

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (transport_tx, transport_rx) = mpsc::unbounded_channel();
        let (outbound, outbound_rx) = outbound_channel(s.outbound_queue_capacity);
        let connection = ConnectionState::new();

        let emitter = CommandEmitter::new(
            translator.clone(),
            connection.clone(),
            outbound,
            Duration::from_millis(s.tick_interval_ms),
        );
        let service_uuid = s.ble_service_uuid.clone();
        let write_uuid = s.ble_write_char_uuid.clone();

        let spawned = std::thread::Builder::new()
            .name("bluetooth".to_string())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        error!("Failed to create tokio runtime for Bluetooth: {}", e);
                        return;
                    }
                };

                rt.block_on(async move {
                    let emitter_task = tokio::spawn(emitter.run());
                    let worker = TransportWorker::new(
                        platform_transport(&service_uuid, &write_uuid),
                        transport_rx,
                        outbound_rx,
                        event_tx,
                        connection,
                    );
                    worker.run().await;
                    emitter_task.abort();
                });
            });
        if let Err(e) = spawned {
            error!("Failed to start Bluetooth thread: {}", e);
        }

        let mut app = Self {
            settings: Arc::new(Mutex::new(settings_service)),
            translator,
            transport_tx,
            event_rx,
            connection_status: ConnectionStatus::Disconnected,
            bluetooth_status: String::new(),
            bluetooth_severity: MessageSeverity::Info,
            touch_message: String::new(),
            last_sent: None,
            pad: JoystickPad::default(),
            selected_tab: Tab::Joystick,
            address_input: s.device_address.clone().unwrap_or_default(),
            name_input: s.device_name.clone(),
            is_dark_mode: false,
            _logging_guard: logging_guard,
        };

        match s.device_address {
            Some(address) => app.connect(address, s.device_name),
            None => app.bluetooth_status = "No Bluetooth device found.".to_string(),
        }

        app
    }

    pub(crate) fn connect(&mut self, address: String, name: String) {
        self.connection_status = ConnectionStatus::Connecting;
        self.bluetooth_status = format!("Connecting to {}...", name);
        self.bluetooth_severity = MessageSeverity::Info;
        if self
            .transport_tx
            .send(TransportCommand::Connect { address, name })
            .is_err()
        {
            error!("Bluetooth worker is not running");
            self.connection_status = ConnectionStatus::Error;
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ConnectionStatus(status) => self.connection_status = status,
            AppEvent::LogMessage(StatusMessage { message, severity }) => {
                self.bluetooth_status = message;
                self.bluetooth_severity = severity;
            }
            AppEvent::MessageSent(message) => self.last_sent = Some(message),
        }
    }
}

impl eframe::App for JoystickApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }

        // Keep polling worker events while idle
        ctx.request_repaint_after(Duration::from_millis(50));

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.selectable_value(&mut self.selected_tab, Tab::Joystick, "Joystick");
                ui.selectable_value(&mut self.selected_tab, Tab::Settings, "Settings");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let switch_icon = if self.is_dark_mode {
                        "☀ Light"
                    } else {
                        "🌙 Dark"
                    };
                    if ui.button(switch_icon).clicked() {
                        self.is_dark_mode = !self.is_dark_mode;
                        crate::presentation::theme::configure_style(ctx, self.is_dark_mode);
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            use crate::presentation::tabs;
            match self.selected_tab {
                Tab::Joystick => tabs::home::render(self, ui),
                Tab::Settings => {
                    egui::ScrollArea::vertical().show(ui, |ui| tabs::settings::render(self, ui));
                }
            }
        });
    }
}
