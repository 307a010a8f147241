//! Modal orchestration
//!
//! One [`ModalHost`] owns the registry of requested modals. The rest of the
//! application talks to it through a cloned [`ModalContext`]:
//!
//! - [`ModalContext::show_modal()`] - open a caller-supplied component
//! - [`ModalContext::show_confirmation_modal()`] - open the built-in confirm dialog
//! - [`ModalContext::hide_modal()`] - close by id
//!
//! Requests are queued and applied by [`ModalHost::sync()`] once per frame.

mod component;
mod confirmation;
mod context;
mod dialog;
mod host;
mod registry;

pub use component::{ModalComponent, ModalControl};
pub use confirmation::{
    ConfirmAction, ConfirmKind, ConfirmOutcome, ConfirmVariant, ConfirmationExecutor,
    ConfirmationProps, DialogButton, ExecutorState, Settlement,
};
pub use context::{IdGenerator, ModalConfig, ModalContext, ModalHandle};
pub use host::ModalHost;
pub use registry::{ModalAction, ModalRegistry, RetentionPolicy, Transition};

use crate::focus::FocusTarget;
use std::fmt;

/// Identity of a modal record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModalId(String);

impl ModalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModalId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ModalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Render and behavior strategy of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalVariant {
    /// Caller-supplied component
    Component,
    /// Built-in confirm/cancel dialog
    Confirmation,
}

/// What a record displays
pub enum ModalPayload {
    Component(Box<dyn ModalComponent>),
    Confirmation(ConfirmationProps),
}

impl ModalPayload {
    pub fn variant(&self) -> ModalVariant {
        match self {
            ModalPayload::Component(_) => ModalVariant::Component,
            ModalPayload::Confirmation(_) => ModalVariant::Confirmation,
        }
    }
}

impl fmt::Debug for ModalPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModalPayload::Component(component) => f
                .debug_tuple("Component")
                .field(&component.name())
                .finish(),
            ModalPayload::Confirmation(props) => {
                f.debug_tuple("Confirmation").field(props).finish()
            }
        }
    }
}

/// One requested overlay
#[derive(Debug)]
pub struct ModalRecord {
    id: ModalId,
    open: bool,
    payload: ModalPayload,
    focus_target: Option<FocusTarget>,
}

impl ModalRecord {
    pub fn id(&self) -> &ModalId {
        &self.id
    }

    pub fn variant(&self) -> ModalVariant {
        self.payload.variant()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn payload(&self) -> &ModalPayload {
        &self.payload
    }

    pub fn focus_target(&self) -> Option<&FocusTarget> {
        self.focus_target.as_ref()
    }

    /// Confirmation props, if this is a confirmation record
    pub fn confirmation(&self) -> Option<&ConfirmationProps> {
        match &self.payload {
            ModalPayload::Confirmation(props) => Some(props),
            ModalPayload::Component(_) => None,
        }
    }
}
