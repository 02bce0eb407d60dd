//! Active touch registry
//!
//! Tracks every finger currently on the joystick surface and picks the one
//! that drives the outbound command.

use crate::domain::models::{ContactId, PrimarySelection, TouchContact, TouchPoint};
use indexmap::IndexMap;
use tracing::{debug, trace};

/// Default number of simultaneous contacts accepted
pub const DEFAULT_MAX_CONTACTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    Inserted,
    /// The id was already live; its position was overwritten
    Replaced,
    /// The registry is full
    Rejected,
}

/// Insertion-ordered map of live contacts
#[derive(Debug, Clone)]
pub struct ActiveTouchRegistry {
    contacts: IndexMap<ContactId, TouchContact>,
    max_contacts: usize,
    selection: PrimarySelection,
}

impl Default for ActiveTouchRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTACTS, PrimarySelection::default())
    }
}

impl ActiveTouchRegistry {
    pub fn new(max_contacts: usize, selection: PrimarySelection) -> Self {
        Self {
            contacts: IndexMap::with_capacity(max_contacts),
            max_contacts: max_contacts.max(1),
            selection,
        }
    }

    pub fn set_selection(&mut self, selection: PrimarySelection) {
        self.selection = selection;
    }

    pub fn on_press(&mut self, id: ContactId, position: TouchPoint) -> PressOutcome {
        if let Some(contact) = self.contacts.get_mut(&id) {
            debug!("Duplicate press for contact {}, overwriting position", id);
            contact.position = position;
            return PressOutcome::Replaced;
        }

        if self.contacts.len() >= self.max_contacts {
            debug!(
                "Ignoring press for contact {}: {} contacts already active",
                id, self.max_contacts
            );
            return PressOutcome::Rejected;
        }

        trace!("Contact {} pressed at ({}, {})", id, position.x, position.y);
        self.contacts.insert(id, TouchContact { id, position });
        PressOutcome::Inserted
    }

    pub fn on_move(&mut self, id: ContactId, position: TouchPoint) {
        if let Some(contact) = self.contacts.get_mut(&id) {
            contact.position = position;
        }
    }

    /// Returns the removed contact, if it was live
    pub fn on_release(&mut self, id: ContactId) -> Option<TouchContact> {
        // shift_remove keeps the survivors in press order
        self.contacts.shift_remove(&id)
    }

    pub fn on_cancel(&mut self, id: ContactId) -> Option<TouchContact> {
        self.on_release(id)
    }

    pub fn primary_contact(&self) -> Option<TouchContact> {
        match self.selection {
            PrimarySelection::FirstSurviving => self.contacts.first().map(|(_, c)| *c),
            PrimarySelection::FixedId(id) => self.contacts.get(&id).copied(),
        }
    }

    pub fn contacts(&self) -> impl Iterator<Item = &TouchContact> {
        self.contacts.values()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}
