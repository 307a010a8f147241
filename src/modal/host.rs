//! Render host
//!
//! The host owns the registry. Once per frame the application calls
//! [`ModalHost::sync()`] to apply queued requests, then
//! [`ModalHost::render()`] to draw every open record in order. Keys go to
//! [`ModalHost::handle_key()`] first; completed confirm actions come back
//! through [`ModalHost::next_settlement()`] and [`ModalHost::settle()`].

use super::dialog::{self, DialogCommand};
use super::{
    ConfirmOutcome, ConfirmationExecutor, DialogButton, IdGenerator, ModalAction, ModalContext,
    ModalControl, ModalId, ModalPayload, ModalRecord, ModalRegistry, ModalVariant,
    RetentionPolicy, Settlement, Transition,
};
use crate::errors::CurtainError;
use crate::focus::{CloseAutoFocus, FocusReturn, FocusTarget};
use crate::notify::{Notification, Notifier};
use crossterm::event::KeyEvent;
use futures_util::future::{BoxFuture, FutureExt};
use ratatui::Frame;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Owner of the modal registry and its per-record runtime state
pub struct ModalHost {
    registry: ModalRegistry,
    context: ModalContext,
    actions: mpsc::UnboundedReceiver<ModalAction>,
    settle_tx: mpsc::UnboundedSender<Settlement>,
    settle_rx: mpsc::UnboundedReceiver<Settlement>,
    /// Keyed by record id so unrelated updates never reset a dialog
    executors: HashMap<ModalId, ConfirmationExecutor>,
    next_epoch: u64,
    notifier: Box<dyn Notifier>,
}

impl ModalHost {
    pub fn new(notifier: impl Notifier + 'static) -> Self {
        let (actions_tx, actions) = mpsc::unbounded_channel();
        let (settle_tx, settle_rx) = mpsc::unbounded_channel();
        Self {
            registry: ModalRegistry::new(),
            context: ModalContext::new(actions_tx, Arc::new(IdGenerator::new())),
            actions,
            settle_tx,
            settle_rx,
            executors: HashMap::new(),
            next_epoch: 0,
            notifier: Box::new(notifier),
        }
    }

    #[must_use]
    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.registry = ModalRegistry::with_retention(retention);
        self
    }

    /// Registration API handle for the rest of the application
    pub fn context(&self) -> ModalContext {
        self.context.clone()
    }

    pub fn registry(&self) -> &ModalRegistry {
        &self.registry
    }

    pub fn executor(&self, id: &ModalId) -> Option<&ConfirmationExecutor> {
        self.executors.get(id)
    }

    pub fn has_open(&self) -> bool {
        self.registry.has_open()
    }

    /// Apply every queued request in order
    ///
    /// Returns the closed modals whose focus should go back to their opener.
    pub fn sync(&mut self) -> Vec<FocusReturn> {
        let mut returns = Vec::new();
        while let Ok(action) = self.actions.try_recv() {
            match self.registry.apply(action) {
                Transition::Opened { id, evicted, .. } => {
                    for gone in &evicted {
                        self.executors.remove(gone);
                    }
                    self.attach_executor(&id);
                }
                Transition::Closed { id } => returns.extend(self.close_auto_focus(&id)),
                Transition::Unchanged => {}
            }
        }
        returns
    }

    fn attach_executor(&mut self, id: &ModalId) {
        let is_confirmation = self
            .registry
            .get(id)
            .is_some_and(|r| r.variant() == ModalVariant::Confirmation);
        if !is_confirmation {
            self.executors.remove(id);
            return;
        }

        if let Some(executor) = self.executors.get_mut(id) {
            executor.reopen();
        } else {
            self.next_epoch += 1;
            self.executors
                .insert(id.clone(), ConfirmationExecutor::new(self.next_epoch));
        }
    }

    fn close_auto_focus(&mut self, id: &ModalId) -> Option<FocusReturn> {
        let mut event = CloseAutoFocus::new(id.clone());

        let target = self
            .registry
            .get(id)
            .and_then(ModalRecord::focus_target)
            .and_then(FocusTarget::upgrade);
        if let Some(target) = target {
            event.prevent_default();
            target.focus();
            tracing::debug!(id = %id, "Focus restored to caller target");
        }

        if let Some(component) = self.registry.component_mut(id) {
            component.on_close_auto_focus(&mut event);
        }

        (!event.default_prevented()).then(|| FocusReturn { id: id.clone() })
    }

    /// Draw every open record, later records on top
    pub fn render(&mut self, f: &mut Frame) {
        let area = f.area();
        for record in self.registry.records_mut() {
            if !record.open {
                continue;
            }
            match &mut record.payload {
                ModalPayload::Component(component) => component.render(f, area),
                ModalPayload::Confirmation(props) => {
                    if let Some(executor) = self.executors.get(&record.id) {
                        dialog::render_confirmation(f, area, props, executor);
                    }
                }
            }
        }
    }

    /// Route a key to the topmost open modal
    ///
    /// Returns false when no modal is open; otherwise the key is consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(record) = self.registry.topmost_open() else {
            return false;
        };
        let id = record.id().clone();

        match record.variant() {
            ModalVariant::Component => self.component_key(&id, key),
            ModalVariant::Confirmation => self.confirmation_key(&id, key),
        }
        true
    }

    fn component_key(&mut self, id: &ModalId, key: KeyEvent) {
        let Some(component) = self.registry.component_mut(id) else {
            return;
        };

        let mut control = ModalControl::new(true);
        component.handle_key(key, &mut control);
        if control.close_requested() {
            self.context.hide_modal(id.clone());
            component.on_close();
        }
    }

    fn confirmation_key(&mut self, id: &ModalId, key: KeyEvent) {
        let Some(command) = dialog::command_for(key) else {
            return;
        };

        match command {
            DialogCommand::Confirm => {
                if let Some(executor) = self.executors.get_mut(id) {
                    if executor.controls_enabled() {
                        executor.focus(DialogButton::Confirm);
                    }
                }
                self.confirm(id);
            }
            DialogCommand::Cancel => {
                self.cancel(id);
            }
            DialogCommand::ToggleFocus => {
                if let Some(executor) = self.executors.get_mut(id) {
                    if executor.controls_enabled() {
                        executor.toggle_focus();
                    }
                }
            }
            DialogCommand::Activate => match self.executors.get(id).map(|e| e.focused()) {
                Some(DialogButton::Confirm) => {
                    self.confirm(id);
                }
                Some(DialogButton::Cancel) => {
                    self.cancel(id);
                }
                None => {}
            },
        }
    }

    /// Press confirm on an open confirmation dialog
    ///
    /// Returns false if the dialog is not open or is already submitting.
    pub fn confirm(&mut self, id: &ModalId) -> bool {
        let Some(on_confirm) = self
            .registry
            .get(id)
            .filter(|r| r.is_open())
            .and_then(ModalRecord::confirmation)
            .map(|props| Arc::clone(&props.on_confirm))
        else {
            return false;
        };
        let Some(executor) = self.executors.get_mut(id) else {
            return false;
        };
        if !executor.begin_confirm() {
            tracing::debug!(id = %id, "Confirm ignored, dialog busy");
            return false;
        }
        let epoch = executor.epoch();

        tracing::debug!(id = %id, "Confirm action started");
        match std::panic::catch_unwind(AssertUnwindSafe(|| on_confirm())) {
            Ok(ConfirmOutcome::Ready(result)) => self.settle(Settlement {
                id: id.clone(),
                epoch,
                outcome: result.map_err(|e| e.to_string()),
            }),
            Ok(ConfirmOutcome::Pending(future)) => self.spawn_pending(id.clone(), epoch, future),
            Err(_) => {
                tracing::error!(id = %id, "Confirm action panicked");
                self.settle(Settlement {
                    id: id.clone(),
                    epoch,
                    outcome: Err(CurtainError::ConfirmPanicked.to_string()),
                });
            }
        }
        true
    }

    fn spawn_pending(
        &mut self,
        id: ModalId,
        epoch: u64,
        future: BoxFuture<'static, color_eyre::Result<()>>,
    ) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            self.settle(Settlement {
                id,
                epoch,
                outcome: Err(CurtainError::NoRuntime.to_string()),
            });
            return;
        };

        let settle_tx = self.settle_tx.clone();
        runtime.spawn(async move {
            let outcome = match AssertUnwindSafe(future).catch_unwind().await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(_) => Err(CurtainError::ConfirmPanicked.to_string()),
            };
            // Host dropped means nobody is left to show the result
            let _ = settle_tx.send(Settlement { id, epoch, outcome });
        });
    }

    /// Press cancel on an open confirmation dialog
    ///
    /// Returns false if the dialog is not open or is submitting.
    pub fn cancel(&mut self, id: &ModalId) -> bool {
        let Some(on_cancel) = self
            .registry
            .get(id)
            .filter(|r| r.is_open())
            .and_then(ModalRecord::confirmation)
            .map(|props| props.on_cancel.clone())
        else {
            return false;
        };
        let Some(executor) = self.executors.get_mut(id) else {
            return false;
        };
        if !executor.cancel() {
            tracing::debug!(id = %id, "Cancel ignored, dialog busy");
            return false;
        }

        if let Some(on_cancel) = on_cancel {
            on_cancel();
        }
        self.context.hide_modal(id.clone());
        true
    }

    /// Wait for the next pending confirm action to finish
    pub async fn next_settlement(&mut self) -> Option<Settlement> {
        self.settle_rx.recv().await
    }

    /// Apply the result of a confirm action
    pub fn settle(&mut self, settlement: Settlement) {
        let Settlement { id, epoch, outcome } = settlement;

        let current = match self.executors.get_mut(&id) {
            Some(executor) if executor.epoch() == epoch && executor.is_submitting() => {
                executor.finish(&outcome);
                true
            }
            _ => false,
        };

        match outcome {
            Ok(()) if current => {
                tracing::info!(id = %id, "Confirm action succeeded");
                self.context.hide_modal(id);
            }
            Ok(()) => {
                tracing::debug!(id = %id, epoch, "Stale confirm settlement ignored");
            }
            Err(message) => {
                tracing::warn!(id = %id, error = %message, "Confirm action failed");
                self.notifier.notify(Notification::error(message));
            }
        }
    }
}
