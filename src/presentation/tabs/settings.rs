use crate::domain::models::{ConnectionGating, PrimarySelection};
use crate::presentation::app::JoystickApp;
use crate::presentation::components::Components;
use eframe::egui;
use tracing::{error, info};

pub fn render(app: &mut JoystickApp, ui: &mut egui::Ui) {
    Components::heading(ui, "Settings");
    ui.add_space(10.0);

    let Ok(mut settings) = app.settings.lock() else {
        ui.label("Settings unavailable");
        return;
    };
    let settings_mut = settings.get_mut();

    Components::card(ui, "Joystick", |ui| {
        ui.label("Primary contact:");
        let mut selection = settings_mut.primary_selection;
        ui.radio_value(
            &mut selection,
            PrimarySelection::FirstSurviving,
            "First finger still touching",
        );
        ui.radio_value(
            &mut selection,
            PrimarySelection::FixedId(0),
            "Contact id 0 only (legacy)",
        );

        ui.separator();
        ui.label("Connection gating:");
        let mut gating = settings_mut.connection_gating;
        ui.radio_value(
            &mut gating,
            ConnectionGating::Legacy,
            "Send center position even when disconnected",
        );
        ui.radio_value(
            &mut gating,
            ConnectionGating::Always,
            "Only send while connected",
        );

        if selection != settings_mut.primary_selection || gating != settings_mut.connection_gating
        {
            settings_mut.primary_selection = selection;
            settings_mut.connection_gating = gating;
            if let Ok(mut translator) = app.translator.lock() {
                translator.set_primary_selection(selection);
                translator.set_gating(gating);
            }
        }

        ui.separator();
        ui.checkbox(
            &mut settings_mut.remeasure_on_resize,
            "Re-measure surface when the window is resized",
        );
        ui.horizontal(|ui| {
            ui.label("Marker radius:");
            ui.add(egui::Slider::new(&mut settings_mut.joystick_radius, 10.0..=120.0));
        });

        if let Ok(mut translator) = app.translator.lock() {
            let viewport = translator.viewport();
            ui.horizontal(|ui| {
                ui.label(format!(
                    "Surface: {:.0} x {:.0}",
                    viewport.width, viewport.height
                ));
                if ui.button("Re-measure").clicked() {
                    translator.reset_viewport();
                }
            });
        }
    });

    ui.add_space(10.0);

    Components::card(ui, "Bluetooth", |ui| {
        ui.horizontal(|ui| {
            ui.label("Send interval (ms):");
            ui.add(egui::DragValue::new(&mut settings_mut.tick_interval_ms).range(20..=5000));
        });
        ui.horizontal(|ui| {
            ui.label("Outbound queue:");
            ui.add(egui::DragValue::new(&mut settings_mut.outbound_queue_capacity).range(1..=64));
        });

        ui.collapsing("Serial service UUIDs", |ui| {
            egui::Grid::new("ble_uuids")
                .spacing([10.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Service:");
                    ui.text_edit_singleline(&mut settings_mut.ble_service_uuid);
                    ui.end_row();
                    ui.label("Write:");
                    ui.text_edit_singleline(&mut settings_mut.ble_write_char_uuid);
                    ui.end_row();
                });
        });
    });

    ui.add_space(10.0);

    Components::card(ui, "Logging", |ui| {
        ui.horizontal(|ui| {
            ui.label("Level:");
            egui::ComboBox::from_id_salt("log_level")
                .selected_text(&settings_mut.log_settings.level)
                .show_ui(ui, |ui| {
                    for level in &["trace", "debug", "info", "warn", "error"] {
                        ui.selectable_value(
                            &mut settings_mut.log_settings.level,
                            level.to_string(),
                            *level,
                        );
                    }
                });
        });
        ui.checkbox(
            &mut settings_mut.log_settings.file_logging_enabled,
            "Write log files",
        );
        if settings_mut.log_settings.file_logging_enabled {
            ui.horizontal(|ui| {
                ui.label("Directory:");
                ui.text_edit_singleline(&mut settings_mut.log_settings.log_dir);
            });
        }
    });

    ui.label(
        egui::RichText::new("Interval, queue, UUID and log changes apply after restart.")
            .italics()
            .size(12.0),
    );

    if ui.button("Save").clicked() {
        match settings.save() {
            Ok(()) => info!("Settings saved to {}", settings.path().display()),
            Err(e) => error!("Failed to save settings: {}", e),
        }
    }
}
