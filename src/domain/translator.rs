//! Touch Command Translator
//!
//! Owns the joystick's input state (active touches, measured viewport and
//! lift buttons) and turns it into at most one [`JoystickCommand`] per
//! timer tick.

use crate::domain::command::JoystickCommand;
use crate::domain::models::{
    ConnectionGating, ContactId, LiftButton, LiftState, PrimarySelection, TouchContact,
    TouchPoint, ViewportSize,
};
use crate::domain::normalizer;
use crate::domain::touch::{ActiveTouchRegistry, PressOutcome};
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

/// Translator shared between the UI thread and the emitter task
pub type SharedTranslator = Arc<Mutex<TouchCommandTranslator>>;

#[derive(Debug, Clone)]
pub struct TouchCommandTranslator {
    registry: ActiveTouchRegistry,
    viewport: ViewportSize,
    lift: LiftState,
    gating: ConnectionGating,
}

impl Default for TouchCommandTranslator {
    fn default() -> Self {
        Self::new(ActiveTouchRegistry::default(), ConnectionGating::default())
    }
}

impl TouchCommandTranslator {
    pub fn new(registry: ActiveTouchRegistry, gating: ConnectionGating) -> Self {
        Self {
            registry,
            viewport: ViewportSize::UNMEASURED,
            lift: LiftState::Neutral,
            gating,
        }
    }

    pub fn into_shared(self) -> SharedTranslator {
        Arc::new(Mutex::new(self))
    }

    // Touch events

    pub fn on_press(&mut self, id: ContactId, position: TouchPoint) -> PressOutcome {
        self.registry.on_press(id, position)
    }

    pub fn on_move(&mut self, id: ContactId, position: TouchPoint) {
        self.registry.on_move(id, position);
    }

    pub fn on_release(&mut self, id: ContactId) -> Option<TouchContact> {
        let released = self.registry.on_release(id);
        self.log_if_idle(released);
        released
    }

    pub fn on_cancel(&mut self, id: ContactId) -> Option<TouchContact> {
        let cancelled = self.registry.on_cancel(id);
        self.log_if_idle(cancelled);
        cancelled
    }

    fn log_if_idle(&self, removed: Option<TouchContact>) {
        if removed.is_some() && self.registry.is_empty() {
            debug!("Last contact lifted, stick back to center");
        }
    }

    pub fn primary_contact(&self) -> Option<TouchContact> {
        self.registry.primary_contact()
    }

    pub fn contacts(&self) -> impl Iterator<Item = &TouchContact> {
        self.registry.contacts()
    }

    pub fn active_contacts(&self) -> usize {
        self.registry.len()
    }

    // Lift buttons

    pub fn on_lift_pressed(&mut self, button: LiftButton) {
        self.lift = match button {
            LiftButton::Up => LiftState::Up,
            LiftButton::Down => LiftState::Down,
        };
        debug!("Lift button {:?} pressed", button);
    }

    /// Releasing either button returns the lift to neutral
    pub fn on_lift_released(&mut self, button: LiftButton) {
        self.lift = LiftState::Neutral;
        debug!("Lift button {:?} released", button);
    }

    pub fn lift(&self) -> LiftState {
        self.lift
    }

    // Viewport

    /// Record the surface size. Only the first measurement sticks until
    /// [`reset_viewport`](Self::reset_viewport) is called.
    pub fn report_viewport(&mut self, size: ViewportSize) -> bool {
        if self.viewport.height as i32 != 0 {
            return false;
        }
        self.viewport = size;
        debug!(
            "Viewport captured: {}x{}",
            self.viewport.width, self.viewport.height
        );
        true
    }

    pub fn reset_viewport(&mut self) {
        debug!("Viewport measurement re-armed");
        self.viewport = ViewportSize::UNMEASURED;
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    // Settings

    pub fn set_gating(&mut self, gating: ConnectionGating) {
        self.gating = gating;
    }

    pub fn set_primary_selection(&mut self, selection: PrimarySelection) {
        self.registry.set_selection(selection);
    }

    /// Produce the command for one timer tick, or `None` when this tick
    /// should stay silent.
    pub fn tick(&self, connected: bool) -> Option<JoystickCommand> {
        let Some(primary) = self.registry.primary_contact() else {
            if self.gating == ConnectionGating::Always && !connected {
                trace!("Neutral command skipped: not connected");
                return None;
            }
            return Some(JoystickCommand::neutral(self.lift));
        };

        if !connected {
            trace!("Command skipped: not connected");
            return None;
        }

        match normalizer::normalize(primary.position, self.viewport) {
            Some(position) => Some(JoystickCommand::at(position, self.lift)),
            None => {
                trace!("Command skipped: viewport not measured");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(w: f32, h: f32) -> TouchCommandTranslator {
        let mut translator = TouchCommandTranslator::default();
        translator.report_viewport(ViewportSize::new(w, h));
        translator
    }

    fn emitted(translator: &TouchCommandTranslator, connected: bool) -> Option<String> {
        translator.tick(connected).map(|c| c.to_string())
    }

    #[test]
    fn test_press_on_square_viewport() {
        let mut translator = measured(120.0, 120.0);
        translator.on_press(0, TouchPoint::new(30.0, 60.0));
        assert_eq!(emitted(&translator, true).as_deref(), Some("25,50,0|"));
    }

    #[test]
    fn test_no_touch_sends_neutral_regardless_of_connection() {
        let mut translator = TouchCommandTranslator::default();
        for (button, expected) in [
            (None, "50,50,0|"),
            (Some(LiftButton::Up), "50,50,1|"),
            (Some(LiftButton::Down), "50,50,-1|"),
        ] {
            if let Some(button) = button {
                translator.on_lift_pressed(button);
            }
            assert_eq!(emitted(&translator, true).as_deref(), Some(expected));
            assert_eq!(emitted(&translator, false).as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_active_touch_requires_connection() {
        let mut translator = measured(100.0, 100.0);
        translator.on_press(1, TouchPoint::new(10.0, 20.0));
        assert_eq!(emitted(&translator, false), None);
        assert_eq!(emitted(&translator, true).as_deref(), Some("10,20,0|"));
    }

    #[test]
    fn test_active_touch_requires_viewport() {
        let mut translator = TouchCommandTranslator::default();
        translator.on_press(1, TouchPoint::new(10.0, 20.0));
        assert_eq!(emitted(&translator, true), None);

        translator.report_viewport(ViewportSize::new(200.0, 200.0));
        assert_eq!(emitted(&translator, true).as_deref(), Some("5,10,0|"));
    }

    #[test]
    fn test_always_gating_silences_neutral_when_disconnected() {
        let mut translator = TouchCommandTranslator::default();
        translator.set_gating(ConnectionGating::Always);
        assert_eq!(emitted(&translator, false), None);
        assert_eq!(emitted(&translator, true).as_deref(), Some("50,50,0|"));
    }

    #[test]
    fn test_repeated_move_is_idempotent() {
        let mut translator = measured(100.0, 100.0);
        translator.on_press(3, TouchPoint::new(0.0, 0.0));
        translator.on_move(3, TouchPoint::new(40.0, 70.0));
        let first = emitted(&translator, true);
        translator.on_move(3, TouchPoint::new(40.0, 70.0));
        translator.on_move(3, TouchPoint::new(40.0, 70.0));
        assert_eq!(emitted(&translator, true), first);
        assert_eq!(first.as_deref(), Some("40,70,0|"));
    }

    #[test]
    fn test_release_returns_to_neutral() {
        let mut translator = measured(100.0, 100.0);
        translator.on_press(0, TouchPoint::new(90.0, 10.0));
        translator.on_lift_pressed(LiftButton::Up);
        assert_eq!(emitted(&translator, true).as_deref(), Some("90,10,1|"));

        let removed = translator.on_release(0).unwrap();
        assert_eq!(removed.id, 0);
        translator.on_lift_released(LiftButton::Up);
        assert_eq!(emitted(&translator, true).as_deref(), Some("50,50,0|"));
    }

    #[test]
    fn test_lift_release_of_either_button_neutralizes() {
        let mut translator = TouchCommandTranslator::default();
        translator.on_lift_pressed(LiftButton::Down);
        translator.on_lift_released(LiftButton::Up);
        assert_eq!(translator.lift(), LiftState::Neutral);
    }

    #[test]
    fn test_viewport_captured_once() {
        let mut translator = TouchCommandTranslator::default();
        assert!(translator.report_viewport(ViewportSize::new(100.0, 200.0)));
        assert!(!translator.report_viewport(ViewportSize::new(300.0, 400.0)));
        assert_eq!(translator.viewport(), ViewportSize::new(100.0, 200.0));

        translator.reset_viewport();
        assert!(translator.report_viewport(ViewportSize::new(300.0, 400.0)));
        assert_eq!(translator.viewport(), ViewportSize::new(300.0, 400.0));
    }

    #[test]
    fn test_sub_pixel_height_does_not_lock_viewport() {
        // Heights below one pixel still count as unmeasured for capture
        let mut translator = TouchCommandTranslator::default();
        assert!(translator.report_viewport(ViewportSize::new(100.0, 0.5)));
        assert!(translator.report_viewport(ViewportSize::new(100.0, 80.0)));
        assert_eq!(translator.viewport().height, 80.0);
    }

    #[test]
    fn test_fixed_id_selection() {
        let mut translator = measured(100.0, 100.0);
        translator.set_primary_selection(PrimarySelection::FixedId(0));
        translator.on_press(5, TouchPoint::new(10.0, 10.0));
        // Contact 5 is live but not primary, so the stick reads as centered
        assert_eq!(emitted(&translator, true).as_deref(), Some("50,50,0|"));

        translator.set_primary_selection(PrimarySelection::FirstSurviving);
        assert_eq!(emitted(&translator, true).as_deref(), Some("10,10,0|"));
    }
}
