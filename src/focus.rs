//! Focus restoration
//!
//! Callers can hand a modal a [`FocusTarget`]: a weak handle to whatever
//! should regain focus once the modal closes. The modal never keeps the
//! target alive; if it is gone by then, the application's default applies.

use crate::modal::ModalId;
use std::fmt;
use std::sync::{Arc, Weak};

/// Something that can take keyboard focus
pub trait Focusable: Send + Sync {
    fn focus(&self);
}

/// Weak reference to a focusable element
#[derive(Clone)]
pub struct FocusTarget(Weak<dyn Focusable>);

impl FocusTarget {
    pub fn new<T: Focusable + 'static>(target: &Arc<T>) -> Self {
        let weak: Weak<dyn Focusable> = Arc::downgrade(target) as Weak<dyn Focusable>;
        Self(weak)
    }

    pub fn upgrade(&self) -> Option<Arc<dyn Focusable>> {
        self.0.upgrade()
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl fmt::Debug for FocusTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusTarget")
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Raised when a modal finishes closing
///
/// Preventing the default stops the application from returning focus to
/// the element that opened the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseAutoFocus {
    id: ModalId,
    default_prevented: bool,
}

impl CloseAutoFocus {
    pub fn new(id: ModalId) -> Self {
        Self {
            id,
            default_prevented: false,
        }
    }

    pub fn id(&self) -> &ModalId {
        &self.id
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// A closed modal whose focus should go back to its opener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusReturn {
    pub id: ModalId,
}


#[cfg(test)]
mod tests {
    use super::testing::CountingTarget;
    use super::*;

    #[test]
    fn test_target_does_not_keep_element_alive() {
        let element = Arc::new(CountingTarget::default());
        let target = FocusTarget::new(&element);
        assert!(target.is_alive());

        target.upgrade().unwrap().focus();
        assert_eq!(element.hits(), 1);

        drop(element);
        assert!(!target.is_alive());
        assert!(target.upgrade().is_none());
    }
}
