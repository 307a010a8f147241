//! Registration API
//!
//! [`ModalContext`] is what the rest of the application holds. It queues
//! transitions for the host; nothing is applied until the next
//! [`ModalHost::sync()`](super::ModalHost::sync).

use super::{ConfirmationProps, ModalAction, ModalComponent, ModalId, ModalPayload};
use crate::focus::{FocusTarget, Focusable};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Source of generated modal ids
///
/// Counts up from 1 and wraps at `u64::MAX`. Each host owns its own
/// generator, so two hosts in one process never share id state.
#[derive(Debug, Default)]
pub struct IdGenerator {
    count: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> ModalId {
        let n = self.count.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        ModalId::from(n.to_string())
    }
}

/// Optional settings for a `show*` call
#[derive(Debug, Clone, Default)]
pub struct ModalConfig {
    /// Stable id; reusing it updates the existing record in place
    pub id: Option<ModalId>,
    /// Element to focus once the modal closes
    pub focus_target: Option<FocusTarget>,
}

impl ModalConfig {
    #[must_use]
    pub fn with_id(mut self, id: impl Into<ModalId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn restore_focus_to<T: Focusable + 'static>(mut self, target: &Arc<T>) -> Self {
        self.focus_target = Some(FocusTarget::new(target));
        self
    }

    #[must_use]
    pub fn focus_target(mut self, target: Option<FocusTarget>) -> Self {
        self.focus_target = target;
        self
    }
}

/// Handle returned by every `show*` call
#[derive(Debug, Clone)]
pub struct ModalHandle {
    id: ModalId,
    actions: mpsc::UnboundedSender<ModalAction>,
}

impl ModalHandle {
    pub fn id(&self) -> &ModalId {
        &self.id
    }

    /// Close the modal this handle was returned for
    pub fn close(&self) {
        send(&self.actions, ModalAction::Close {
            id: self.id.clone(),
        });
    }
}

/// Cloneable entry point for showing and hiding modals
#[derive(Debug, Clone)]
pub struct ModalContext {
    actions: mpsc::UnboundedSender<ModalAction>,
    ids: Arc<IdGenerator>,
}

impl ModalContext {
    pub(crate) fn new(actions: mpsc::UnboundedSender<ModalAction>, ids: Arc<IdGenerator>) -> Self {
        Self { actions, ids }
    }

    /// Show a caller-supplied component
    pub fn show_modal<C>(&self, component: C, config: ModalConfig) -> ModalHandle
    where
        C: ModalComponent + 'static,
    {
        self.open(ModalPayload::Component(Box::new(component)), config)
    }

    /// Show the built-in confirmation dialog
    pub fn show_confirmation_modal(
        &self,
        props: ConfirmationProps,
        config: ModalConfig,
    ) -> ModalHandle {
        self.open(ModalPayload::Confirmation(props), config)
    }

    /// Close the modal with this id; unknown ids are ignored
    pub fn hide_modal(&self, id: impl Into<ModalId>) {
        send(&self.actions, ModalAction::Close { id: id.into() });
    }

    fn open(&self, payload: ModalPayload, config: ModalConfig) -> ModalHandle {
        let id = config.id.unwrap_or_else(|| self.ids.next_id());
        send(&self.actions, ModalAction::Open {
            id: id.clone(),
            payload,
            focus_target: config.focus_target,
        });
        ModalHandle {
            id,
            actions: self.actions.clone(),
        }
    }
}

fn send(actions: &mpsc::UnboundedSender<ModalAction>, action: ModalAction) {
    if let Err(e) = actions.send(action) {
        tracing::debug!(id = %e.0.id(), "Modal host gone, request dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_count_from_one() {
        let ids = IdGenerator::new();
        assert_eq!(ids.next_id().as_str(), "1");
        assert_eq!(ids.next_id().as_str(), "2");
        assert_eq!(ids.next_id().as_str(), "3");
    }

    #[test]
    fn test_ids_wrap_instead_of_overflowing() {
        let ids = IdGenerator {
            count: AtomicU64::new(u64::MAX - 1),
        };
        assert_eq!(ids.next_id().as_str(), u64::MAX.to_string());
        assert_eq!(ids.next_id().as_str(), "0");
        assert_eq!(ids.next_id().as_str(), "1");
    }

    #[test]
    fn test_dropped_host_does_not_panic() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let context = ModalContext::new(tx, Arc::new(IdGenerator::new()));

        context.hide_modal("gone");
        let handle = context.show_confirmation_modal(
            ConfirmationProps::new("Delete?", super::super::ConfirmOutcome::done),
            ModalConfig::default().with_id("x"),
        );
        handle.close();
        assert_eq!(handle.id().as_str(), "x");
    }
}
