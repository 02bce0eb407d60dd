use eframe::egui;

/// Colors of the joystick surface
pub struct Palette {
    pub bg: egui::Color32,
    /// Filled joystick marker
    pub marker: egui::Color32,
    /// Dashed center lines
    pub crosshair: egui::Color32,
    /// Fill of a held lift button
    pub pressed: egui::Color32,
}

impl Palette {
    pub fn new(is_dark: bool) -> Self {
        if is_dark {
            Self {
                bg: egui::Color32::from_rgb(25, 25, 25),
                marker: egui::Color32::from_rgb(123, 104, 238),
                crosshair: egui::Color32::from_rgb(218, 112, 214),
                pressed: egui::Color32::from_rgb(90, 80, 170),
            }
        } else {
            Self {
                bg: egui::Color32::from_rgb(245, 245, 245),
                marker: egui::Color32::from_rgb(72, 61, 139), // dark slate blue
                crosshair: egui::Color32::from_rgb(128, 0, 128), // purple
                pressed: egui::Color32::from_rgb(180, 170, 240),
            }
        }
    }
}

/// Stock light/dark visuals with finger-sized controls
pub fn configure_style(ctx: &egui::Context, is_dark: bool) {
    let palette = Palette::new(is_dark);
    let mut style = (*ctx.style()).clone();
    style.visuals = if is_dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };

    for (text_style, font_id) in style.text_styles.iter_mut() {
        match text_style {
            egui::TextStyle::Heading => font_id.size = 24.0,
            egui::TextStyle::Body | egui::TextStyle::Button => font_id.size = 18.0,
            _ => {}
        }
    }
    style.spacing.interact_size = egui::vec2(48.0, 40.0);
    style.spacing.button_padding = egui::vec2(16.0, 12.0);
    style.spacing.item_spacing = egui::vec2(10.0, 10.0);

    style.visuals.panel_fill = palette.bg;
    style.visuals.widgets.active.bg_fill = palette.pressed;
    style.visuals.widgets.active.weak_bg_fill = palette.pressed;
    style.visuals.selection.bg_fill = palette.marker;

    ctx.set_style(style);
}
