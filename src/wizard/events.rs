use crate::currency::Currency;
use crate::projection::DerivedProjection;

use super::field::Field;

/// Notifications emitted by a [`super::Wizard`] as its state moves.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    FieldChanged { field: Field },
    DefaultsApplied { currency: Currency, fields: Vec<Field> },
    ProjectionUpdated(DerivedProjection),
    ProjectionCleared,
    StepChanged { from: usize, to: usize },
    SubmissionStarted,
    SubmissionFinished { success: bool },
}

type Listener = Box<dyn FnMut(&WizardEvent)>;

/// Ordered list of subscribers; each receives every event.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn subscribe(&mut self, listener: impl FnMut(&WizardEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, event: &WizardEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
