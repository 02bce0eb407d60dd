//! Joystick Surface
//!
//! Draws the virtual stick and forwards touch, mouse and lift-button input
//! to the translator.

use crate::domain::models::{ContactId, LiftButton, TouchPoint, ViewportSize};
use crate::domain::touch::PressOutcome;
use crate::domain::translator::{SharedTranslator, TouchCommandTranslator};
use crate::presentation::theme::Palette;
use eframe::egui::{self, Pos2, Rect, Shape, Stroke};
use tracing::{error, trace};

/// Contact id used for the mouse on desktops
pub const MOUSE_CONTACT_ID: ContactId = 0;

const DASH_LENGTH: f32 = 7.0;
const GAP_LENGTH: f32 = 7.0;

/// Convert a screen position to joystick surface coordinates
pub fn to_local(rect: Rect, pos: Pos2) -> TouchPoint {
    TouchPoint::new(pos.x - rect.min.x, pos.y - rect.min.y)
}

/// Apply raw touch events to the translator. Returns the ids that were released.
pub fn route_touch_events(
    events: &[egui::Event],
    rect: Rect,
    translator: &mut TouchCommandTranslator,
) -> Vec<ContactId> {
    let mut removed = Vec::new();

    for event in events {
        let egui::Event::Touch { id, phase, pos, .. } = event else {
            continue;
        };
        let contact = id.0 as ContactId;
        let local = to_local(rect, *pos);

        match phase {
            egui::TouchPhase::Start => {
                // Presses that land on the lift buttons are not joystick contacts
                if rect.contains(*pos)
                    && translator.on_press(contact, local) == PressOutcome::Rejected
                {
                    trace!("Touch {} not tracked", contact);
                }
            }
            egui::TouchPhase::Move => translator.on_move(contact, local),
            egui::TouchPhase::End => {
                if let Some(c) = translator.on_release(contact) {
                    removed.push(c.id);
                }
            }
            egui::TouchPhase::Cancel => {
                if let Some(c) = translator.on_cancel(contact) {
                    removed.push(c.id);
                }
            }
        }
    }

    removed
}

/// Turns a held/not-held flag into press and release edges
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeTracker {
    held: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Pressed,
    Released,
}

impl EdgeTracker {
    pub fn update(&mut self, held: bool) -> Option<Edge> {
        let edge = match (self.held, held) {
            (false, true) => Some(Edge::Pressed),
            (true, false) => Some(Edge::Released),
            _ => None,
        };
        self.held = held;
        edge
    }
}

/// Which touch, if any, is holding each lift button.
///
/// egui only turns the first finger into pointer events, so a button pressed
/// while another finger steers is seen through raw touch events alone.
#[derive(Debug, Default)]
pub struct ButtonTouches {
    up: Option<egui::TouchId>,
    down: Option<egui::TouchId>,
}

impl ButtonTouches {
    pub fn route(&mut self, events: &[egui::Event], up_rect: Rect, down_rect: Rect) {
        for event in events {
            let egui::Event::Touch { id, phase, pos, .. } = event else {
                continue;
            };
            match phase {
                egui::TouchPhase::Start => {
                    if up_rect.contains(*pos) {
                        self.up = Some(*id);
                    } else if down_rect.contains(*pos) {
                        self.down = Some(*id);
                    }
                }
                egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                    if self.up == Some(*id) {
                        self.up = None;
                    }
                    if self.down == Some(*id) {
                        self.down = None;
                    }
                }
                // A finger sliding off a button keeps holding it
                egui::TouchPhase::Move => {}
            }
        }
    }

    pub fn holds(&self, button: LiftButton) -> bool {
        match button {
            LiftButton::Up => self.up.is_some(),
            LiftButton::Down => self.down.is_some(),
        }
    }
}

/// Per-frame input state of the joystick screen
#[derive(Debug, Default)]
pub struct JoystickPad {
    saw_touch: bool,
    mouse: EdgeTracker,
    up_button: EdgeTracker,
    down_button: EdgeTracker,
    button_touches: ButtonTouches,
    last_size: Option<egui::Vec2>,
}

/// Lift button areas and whether the pointer is down on each this frame
#[derive(Debug, Clone, Copy)]
pub struct LiftButtonsFrame {
    pub up_rect: Rect,
    pub down_rect: Rect,
    pub up_pointer: bool,
    pub down_pointer: bool,
}

#[derive(Debug, Default)]
pub struct PadFrame {
    pub removed: Vec<ContactId>,
    pub primary: Option<TouchPoint>,
}

impl JoystickPad {
    /// Draw the surface into all remaining space and feed it this frame's input
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        translator: &SharedTranslator,
        radius: f32,
        remeasure_on_resize: bool,
        palette: &Palette,
    ) -> PadFrame {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;

        let Ok(mut translator) = translator.lock() else {
            error!("Translator lock poisoned");
            return PadFrame::default();
        };

        if remeasure_on_resize && self.last_size.is_some_and(|s| s != rect.size()) {
            translator.reset_viewport();
        }
        self.last_size = Some(rect.size());
        translator.report_viewport(ViewportSize::new(rect.width(), rect.height()));

        let events = ui.input(|i| i.events.clone());
        if events
            .iter()
            .any(|e| matches!(e, egui::Event::Touch { .. }))
        {
            self.saw_touch = true;
        }
        let mut removed = route_touch_events(&events, rect, &mut translator);

        // egui also synthesizes pointer events from touches, so the mouse
        // path only runs until a real touch shows up
        if !self.saw_touch {
            let held = response.is_pointer_button_down_on();
            let pointer = response.interact_pointer_pos();
            match (self.mouse.update(held), pointer) {
                (Some(Edge::Pressed), Some(pos)) => {
                    translator.on_press(MOUSE_CONTACT_ID, to_local(rect, pos));
                }
                (None, Some(pos)) if held => {
                    translator.on_move(MOUSE_CONTACT_ID, to_local(rect, pos));
                }
                (Some(Edge::Released), _) => {
                    if let Some(c) = translator.on_release(MOUSE_CONTACT_ID) {
                        removed.push(c.id);
                    }
                }
                _ => {}
            }
        }

        self.paint(&painter, rect, &translator, radius, palette);

        PadFrame {
            removed,
            primary: translator.primary_contact().map(|c| c.position),
        }
    }

    fn paint(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        translator: &TouchCommandTranslator,
        radius: f32,
        palette: &Palette,
    ) {
        painter.rect_filled(rect, 0.0, palette.bg);

        let center = rect.center();
        let dash = Stroke::new(1.0, palette.crosshair);
        painter.extend(Shape::dashed_line(
            &[
                Pos2::new(center.x, rect.top()),
                Pos2::new(center.x, rect.bottom()),
            ],
            dash,
            DASH_LENGTH,
            GAP_LENGTH,
        ));
        painter.extend(Shape::dashed_line(
            &[
                Pos2::new(rect.left(), center.y),
                Pos2::new(rect.right(), center.y),
            ],
            dash,
            DASH_LENGTH,
            GAP_LENGTH,
        ));

        if translator.active_contacts() == 0 {
            painter.circle_filled(center, radius, palette.marker);
        }
        for contact in translator.contacts() {
            let pos = rect.min + egui::vec2(contact.position.x, contact.position.y);
            painter.circle_filled(pos, radius, palette.marker);
        }
    }

    /// Momentary Up/Down buttons driving the lift state
    pub fn lift_buttons(&mut self, ui: &mut egui::Ui, translator: &SharedTranslator) {
        let size = egui::vec2(140.0, 64.0);
        let (up, down) = ui
            .horizontal(|ui| {
                let up = ui.add_sized(size, egui::Button::new("▲ Up"));
                let down = ui.add_sized(size, egui::Button::new("▼ Down"));
                (up, down)
            })
            .inner;

        let events = ui.input(|i| i.events.clone());
        let buttons = LiftButtonsFrame {
            up_rect: up.rect,
            down_rect: down.rect,
            up_pointer: up.is_pointer_button_down_on(),
            down_pointer: down.is_pointer_button_down_on(),
        };
        self.update_lift(&events, buttons, translator);
    }

    /// Combine pointer and raw touch input into lift press/release edges
    pub fn update_lift(
        &mut self,
        events: &[egui::Event],
        buttons: LiftButtonsFrame,
        translator: &SharedTranslator,
    ) {
        self.button_touches
            .route(events, buttons.up_rect, buttons.down_rect);
        let up_held = buttons.up_pointer || self.button_touches.holds(LiftButton::Up);
        let down_held = buttons.down_pointer || self.button_touches.holds(LiftButton::Down);

        let edges = [
            (LiftButton::Up, self.up_button.update(up_held)),
            (LiftButton::Down, self.down_button.update(down_held)),
        ];
        if edges.iter().all(|(_, edge)| edge.is_none()) {
            return;
        }

        let Ok(mut translator) = translator.lock() else {
            error!("Translator lock poisoned");
            return;
        };
        for (button, edge) in edges {
            match edge {
                Some(Edge::Pressed) => translator.on_lift_pressed(button),
                Some(Edge::Released) => translator.on_lift_released(button),
                None => {}
            }
        }
        trace!("Lift now {:?}", translator.lift());
    }
}
