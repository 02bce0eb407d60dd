use crate::domain::models::{ConnectionStatus, MessageSeverity, TransportCommand};
use crate::presentation::app::JoystickApp;
use crate::presentation::components::Components;
use crate::presentation::theme::Palette;
use eframe::egui;
use tracing::error;

pub fn render(app: &mut JoystickApp, ui: &mut egui::Ui) {
    ui_connection_panel(app, ui);
    ui_status_labels(app, ui);

    let (radius, remeasure) = match app.settings.lock() {
        Ok(settings) => (
            settings.get().joystick_radius,
            settings.get().remeasure_on_resize,
        ),
        Err(_) => (60.0, false),
    };
    let palette = Palette::new(app.is_dark_mode);

    egui::TopBottomPanel::bottom("lift_buttons")
        .resizable(false)
        .show_inside(ui, |ui| {
            ui.vertical_centered(|ui| app.pad.lift_buttons(ui, &app.translator));
        });

    egui::CentralPanel::default().show_inside(ui, |ui| {
        let frame = app
            .pad
            .show(ui, &app.translator, radius, remeasure, &palette);

        if let Some(id) = frame.removed.last() {
            app.touch_message = format!("Removed {}", id);
        }
        if let Some(primary) = frame.primary {
            app.touch_message = format!("Last: {}, {}", primary.x, primary.y);
        }
    });
}

fn ui_connection_panel(app: &mut JoystickApp, ui: &mut egui::Ui) {
    ui.horizontal_wrapped(|ui| {
        Components::status_banner(ui, app.connection_status);

        ui.label("Address:");
        ui.add(egui::TextEdit::singleline(&mut app.address_input).desired_width(160.0));
        ui.label("Name:");
        ui.add(egui::TextEdit::singleline(&mut app.name_input).desired_width(100.0));

        match app.connection_status {
            ConnectionStatus::Connected => {
                if ui.button("Disconnect").clicked()
                    && app.transport_tx.send(TransportCommand::Disconnect).is_err()
                {
                    error!("Bluetooth worker is not running");
                    app.connection_status = ConnectionStatus::Error;
                }
            }
            ConnectionStatus::Connecting => {
                ui.spinner();
            }
            ConnectionStatus::Disconnected | ConnectionStatus::Error => {
                if ui.button("Connect").clicked() {
                    connect_to_input(app);
                }
            }
        }
    });
}

fn connect_to_input(app: &mut JoystickApp) {
    let address = app.address_input.trim().to_string();
    if address.is_empty() {
        app.bluetooth_status = "No Bluetooth device found.".to_string();
        return;
    }
    let name = match app.name_input.trim() {
        "" => address.clone(),
        name => name.to_string(),
    };

    if let Ok(mut settings) = app.settings.lock() {
        if let Err(e) = settings.set_device(address.clone(), name.clone()) {
            error!("Failed to remember device: {}", e);
        }
    }
    app.connect(address, name);
}

fn ui_status_labels(app: &JoystickApp, ui: &mut egui::Ui) {
    ui.horizontal_wrapped(|ui| {
        let color = match app.bluetooth_severity {
            MessageSeverity::Success => egui::Color32::from_rgb(0, 150, 0),
            MessageSeverity::Error => egui::Color32::from_rgb(220, 40, 40),
            MessageSeverity::Warning => egui::Color32::from_rgb(200, 140, 0),
            MessageSeverity::Info => ui.visuals().text_color(),
        };
        ui.label(egui::RichText::new(&app.bluetooth_status).color(color).strong());
        ui.separator();
        ui.label(&app.touch_message);
        if let Some(sent) = &app.last_sent {
            ui.separator();
            ui.label(egui::RichText::new(format!("Sent: {}", sent)).monospace());
        }
    });
}
