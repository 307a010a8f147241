//! Confirmation dialogs
//!
//! [`ConfirmationProps`] describes what the built-in dialog asks, and
//! [`ConfirmationExecutor`] drives one dialog instance through its
//! confirm/cancel life cycle:
//!
//! ```text
//! Idle ──confirm──▶ Submitting ──ok──▶ Closed
//!  │  ▲                  │
//!  │  └──── Failed ◀─err─┘
//!  └──cancel──▶ Closed
//! ```
//!
//! While Submitting both buttons are disabled, so a slow confirm action runs
//! exactly once no matter how often the user presses Enter.

use super::ModalId;
use futures_util::future::{BoxFuture, FutureExt};
use ratatui::text::{Line, Text};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Callback run when the user confirms
pub type ConfirmAction = Arc<dyn Fn() -> ConfirmOutcome + Send + Sync>;

/// Callback run when the user cancels
pub type CancelAction = Arc<dyn Fn() + Send + Sync>;

/// Result of invoking a confirm action
pub enum ConfirmOutcome {
    /// The action finished synchronously
    Ready(color_eyre::Result<()>),
    /// The action continues in the background
    Pending(BoxFuture<'static, color_eyre::Result<()>>),
}

impl ConfirmOutcome {
    pub fn done() -> Self {
        Self::Ready(Ok(()))
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = color_eyre::Result<()>> + Send + 'static,
    {
        Self::Pending(future.boxed())
    }
}

impl From<color_eyre::Result<()>> for ConfirmOutcome {
    fn from(result: color_eyre::Result<()>) -> Self {
        Self::Ready(result)
    }
}

/// Visual style of the confirm button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmVariant {
    #[default]
    Default,
    Destructive,
}

/// Picks the default confirm label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmKind {
    #[default]
    Confirm,
    Delete,
    Remove,
}

impl ConfirmKind {
    pub fn default_label(self) -> &'static str {
        match self {
            ConfirmKind::Confirm => "Confirm",
            ConfirmKind::Delete => "Delete",
            ConfirmKind::Remove => "Remove",
        }
    }
}

/// Everything the built-in confirmation dialog shows and calls
#[derive(Clone)]
pub struct ConfirmationProps {
    pub title: String,
    pub description: Option<Text<'static>>,
    /// Extra muted content under the description
    pub body: Option<Text<'static>>,
    pub variant: ConfirmVariant,
    pub kind: ConfirmKind,
    pub on_confirm: ConfirmAction,
    pub on_cancel: Option<CancelAction>,
    pub confirm_label: Option<Line<'static>>,
    pub cancel_label: Option<Line<'static>>,
}

impl ConfirmationProps {
    pub fn new<F>(title: impl Into<String>, on_confirm: F) -> Self
    where
        F: Fn() -> ConfirmOutcome + Send + Sync + 'static,
    {
        Self {
            title: title.into(),
            description: None,
            body: None,
            variant: ConfirmVariant::Default,
            kind: ConfirmKind::Confirm,
            on_confirm: Arc::new(on_confirm),
            on_cancel: None,
            confirm_label: None,
            cancel_label: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<Text<'static>>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Text<'static>>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn variant(mut self, variant: ConfirmVariant) -> Self {
        self.variant = variant;
        self
    }

    #[must_use]
    pub fn destructive(self) -> Self {
        self.variant(ConfirmVariant::Destructive)
    }

    #[must_use]
    pub fn kind(mut self, kind: ConfirmKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn on_cancel<F>(mut self, on_cancel: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_cancel = Some(Arc::new(on_cancel));
        self
    }

    #[must_use]
    pub fn confirm_label(mut self, label: impl Into<Line<'static>>) -> Self {
        self.confirm_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn cancel_label(mut self, label: impl Into<Line<'static>>) -> Self {
        self.cancel_label = Some(label.into());
        self
    }

    pub fn confirm_text(&self) -> Line<'static> {
        self.confirm_label
            .clone()
            .unwrap_or_else(|| Line::from(self.kind.default_label()))
    }

    pub fn cancel_text(&self) -> Line<'static> {
        self.cancel_label
            .clone()
            .unwrap_or_else(|| Line::from("Cancel"))
    }
}

impl fmt::Debug for ConfirmationProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationProps")
            .field("title", &self.title)
            .field("variant", &self.variant)
            .field("kind", &self.kind)
            .field("has_on_cancel", &self.on_cancel.is_some())
            .finish_non_exhaustive()
    }
}

/// Where a confirmation dialog is in its life cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutorState {
    Idle,
    Submitting,
    /// Idle again after the confirm action failed
    Failed(String),
    Closed,
}

/// Which button has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogButton {
    /// Cancel is focused first so a stray Enter never confirms
    #[default]
    Cancel,
    Confirm,
}

/// State machine for one confirmation dialog instance
#[derive(Debug)]
pub struct ConfirmationExecutor {
    state: ExecutorState,
    focused: DialogButton,
    epoch: u64,
}

impl ConfirmationExecutor {
    pub fn new(epoch: u64) -> Self {
        Self {
            state: ExecutorState::Idle,
            focused: DialogButton::default(),
            epoch,
        }
    }

    pub fn state(&self) -> &ExecutorState {
        &self.state
    }

    /// Identifies this instance in settlements
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn focused(&self) -> DialogButton {
        self.focused
    }

    pub fn is_submitting(&self) -> bool {
        self.state == ExecutorState::Submitting
    }

    /// Confirm and cancel are usable
    pub fn controls_enabled(&self) -> bool {
        matches!(self.state, ExecutorState::Idle | ExecutorState::Failed(_))
    }

    pub fn toggle_focus(&mut self) {
        self.focused = match self.focused {
            DialogButton::Cancel => DialogButton::Confirm,
            DialogButton::Confirm => DialogButton::Cancel,
        };
    }

    pub fn focus(&mut self, button: DialogButton) {
        self.focused = button;
    }

    /// Enter Submitting; false if the controls are disabled
    pub fn begin_confirm(&mut self) -> bool {
        if !self.controls_enabled() {
            return false;
        }
        self.state = ExecutorState::Submitting;
        true
    }

    /// Move to Closed via cancel; false if the controls are disabled
    pub fn cancel(&mut self) -> bool {
        if !self.controls_enabled() {
            return false;
        }
        self.state = ExecutorState::Closed;
        true
    }

    /// Leave Submitting with the action's outcome
    pub fn finish(&mut self, outcome: &Result<(), String>) {
        self.state = match outcome {
            Ok(()) => ExecutorState::Closed,
            Err(message) => ExecutorState::Failed(message.clone()),
        };
    }

    /// The record was opened again
    pub fn reopen(&mut self) {
        if self.state == ExecutorState::Closed {
            self.state = ExecutorState::Idle;
            self.focused = DialogButton::default();
        }
    }
}

/// Completion of a confirm action, delivered back to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub id: ModalId,
    pub epoch: u64,
    /// Error message on failure
    pub outcome: Result<(), String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_guard_rejects_reentry() {
        let mut executor = ConfirmationExecutor::new(1);
        assert!(executor.begin_confirm());
        assert!(executor.is_submitting());

        assert!(!executor.begin_confirm());
        assert!(!executor.cancel());
        assert_eq!(executor.state(), &ExecutorState::Submitting);
    }

    #[test]
    fn test_failure_returns_to_usable_state() {
        let mut executor = ConfirmationExecutor::new(1);
        assert!(executor.begin_confirm());
        executor.finish(&Err("fail".to_string()));

        assert_eq!(executor.state(), &ExecutorState::Failed("fail".to_string()));
        assert!(executor.controls_enabled());
        assert!(executor.begin_confirm());
    }

    #[test]
    fn test_reopen_resets_only_closed() {
        let mut executor = ConfirmationExecutor::new(1);
        executor.toggle_focus();
        assert!(executor.cancel());
        executor.reopen();
        assert_eq!(executor.state(), &ExecutorState::Idle);
        assert_eq!(executor.focused(), DialogButton::Cancel);

        assert!(executor.begin_confirm());
        executor.reopen();
        assert!(executor.is_submitting());
    }

    #[test]
    fn test_default_labels_follow_kind() {
        let props = ConfirmationProps::new("Delete?", ConfirmOutcome::done).kind(ConfirmKind::Delete);
        assert_eq!(props.confirm_text(), Line::from("Delete"));
        assert_eq!(props.cancel_text(), Line::from("Cancel"));

        let props = props.confirm_label("Refund");
        assert_eq!(props.confirm_text(), Line::from("Refund"));
    }
}
