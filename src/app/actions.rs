//! Row actions for a transaction
//!
//! Builds the list shown in the row actions menu. Each action only ever
//! talks to the modal host through a [`ModalContext`] and to the app
//! through the event channel.

use super::ledger::{self, RefundRequest, Transaction, TxId};
use super::reject::RejectModal;
use crate::event::Event;
use curtain::focus::FocusTarget;
use curtain::modal::{ConfirmOutcome, ConfirmationProps, ModalConfig, ModalContext};
use curtain::notify::Notification;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Where an action is listed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Refund,
    Reject,
    ViewRelated,
    Download,
}

/// One entry in the row actions menu
#[derive(Clone)]
pub struct Action {
    pub kind: ActionKind,
    pub action_type: ActionType,
    pub label: String,
    on_select: Arc<dyn Fn() + Send + Sync>,
}

impl Action {
    fn new<F>(kind: ActionKind, action_type: ActionType, label: impl Into<String>, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            kind,
            action_type,
            label: label.into(),
            on_select: Arc::new(f),
        }
    }

    pub fn run(&self) {
        tracing::debug!(action = %self.label, "Running row action");
        (self.on_select)();
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Handles every action closure needs
#[derive(Debug, Clone)]
pub struct ActionDeps {
    pub modals: ModalContext,
    pub events: mpsc::Sender<Event>,
    pub refund_latency: Duration,
    pub receipts_dir: PathBuf,
}

/// Reject modals are keyed per transaction so repeated requests reuse one record
pub fn reject_modal_id(id: TxId) -> String {
    format!("reject-transaction-{id}")
}

/// Actions available for `tx`, filtered by its permissions
pub fn transaction_actions(
    tx: &Transaction,
    focus_target: Option<FocusTarget>,
    deps: &ActionDeps,
) -> Vec<Action> {
    let mut actions = Vec::new();
    let can_refund = tx.permissions.can_refund && !tx.is_refunded();

    if can_refund {
        actions.push(refund_action(tx, focus_target.clone(), deps));
    }

    if tx.permissions.can_reject {
        let deps = deps.clone();
        let id = tx.id;
        let target = focus_target.clone();
        actions.push(Action::new(
            ActionKind::Reject,
            ActionType::Primary,
            "Reject",
            move || {
                let _ = deps.modals.show_modal(
                    RejectModal::new(id, can_refund, deps.events.clone()),
                    ModalConfig::default()
                        .with_id(reject_modal_id(id))
                        .focus_target(target.clone()),
                );
            },
        ));
    }

    if let Some(group) = tx.group.clone() {
        let events = deps.events.clone();
        actions.push(Action::new(
            ActionKind::ViewRelated,
            ActionType::Secondary,
            "View related transactions",
            move || post(&events, Event::FilterGroup(group.clone())),
        ));
    }

    if tx.permissions.can_download_invoice {
        let label = if tx.has_expense {
            "Download Invoice"
        } else {
            "Download Receipt"
        };
        let events = deps.events.clone();
        let dir = deps.receipts_dir.clone();
        let tx = tx.clone();
        actions.push(Action::new(
            ActionKind::Download,
            ActionType::Secondary,
            label,
            move || {
                let notification = match ledger::save_receipt(&tx, &dir) {
                    Ok(path) => Notification::success(format!("Saved {}", path.display())),
                    Err(e) => Notification::error(format!("{e:#}")),
                };
                post(&events, Event::Notify(notification));
            },
        ));
    }

    actions
}

fn refund_action(tx: &Transaction, focus_target: Option<FocusTarget>, deps: &ActionDeps) -> Action {
    let deps = deps.clone();
    let request = RefundRequest::for_transaction(tx, deps.refund_latency);

    Action::new(ActionKind::Refund, ActionType::Primary, "Refund", move || {
        let events = deps.events.clone();
        let request = request.clone();
        let props = ConfirmationProps::new(
            "Are you sure you want to refund this transaction?",
            move || {
                let events = events.clone();
                let request = request.clone();
                ConfirmOutcome::pending(async move {
                    let id = request.id;
                    ledger::process_refund(request).await?;
                    // The refund went through even if the app stopped listening
                    for event in [
                        Event::Refunded(id),
                        Event::Notify(Notification::success("Transaction refunded")),
                    ] {
                        if let Err(e) = events.send(event).await {
                            tracing::warn!(tx = id, error = %e, "Dropped refund event");
                        }
                    }
                    Ok(())
                })
            },
        )
        .description(
            "Refunding will reimburse the full amount back to your contributor. \
             They can contribute again in the future.",
        )
        .destructive()
        .confirm_label("Refund");

        let _ = deps.modals.show_confirmation_modal(
            props,
            ModalConfig::default().focus_target(focus_target.clone()),
        );
    })
}

fn post(events: &mpsc::Sender<Event>, event: Event) {
    if let Err(e) = events.try_send(event) {
        tracing::warn!(error = %e, "Dropped app event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ledger::Ledger;
    use chrono::Utc;
    use curtain::modal::{ModalHost, ModalVariant};
    use curtain::notify::Notifier;

    struct Quiet;

    impl Notifier for Quiet {
        fn notify(&self, _: Notification) {}
    }

    fn deps(host: &ModalHost) -> (ActionDeps, mpsc::Receiver<Event>) {
        let (events, rx) = mpsc::channel(16);
        let deps = ActionDeps {
            modals: host.context(),
            events,
            refund_latency: Duration::ZERO,
            receipts_dir: std::env::temp_dir(),
        };
        (deps, rx)
    }

    fn kinds(actions: &[Action]) -> Vec<ActionKind> {
        actions.iter().map(|a| a.kind).collect()
    }

    #[test]
    fn test_actions_follow_permissions() {
        let host = ModalHost::new(Quiet);
        let (deps, _rx) = deps(&host);
        let mut ledger = Ledger::seed(Utc::now());

        let cases = [
            (
                1041,
                vec![
                    ActionKind::Refund,
                    ActionKind::Reject,
                    ActionKind::ViewRelated,
                    ActionKind::Download,
                ],
            ),
            // Large contribution: no reject, no group
            (1036, vec![ActionKind::Refund, ActionKind::ViewRelated, ActionKind::Download]),
            // Expense without invoice permission
            (1037, vec![ActionKind::Reject]),
        ];
        for (id, expected) in cases {
            let tx = ledger.get(id).unwrap();
            assert_eq!(kinds(&transaction_actions(tx, None, &deps)), expected, "tx {id}");
        }

        ledger.mark_refunded(1041);
        let refunded = transaction_actions(ledger.get(1041).unwrap(), None, &deps);
        assert!(!kinds(&refunded).contains(&ActionKind::Refund));
    }

    #[test]
    fn test_primary_actions_come_first() {
        let host = ModalHost::new(Quiet);
        let (deps, _rx) = deps(&host);
        let ledger = Ledger::seed(Utc::now());

        let actions = transaction_actions(ledger.get(1041).unwrap(), None, &deps);
        let types: Vec<ActionType> = actions.iter().map(|a| a.action_type).collect();
        assert_eq!(
            types,
            vec![
                ActionType::Primary,
                ActionType::Primary,
                ActionType::Secondary,
                ActionType::Secondary
            ]
        );
        assert_eq!(actions[3].label, "Download Receipt");
    }

    #[test]
    fn test_reject_reuses_stable_id() {
        let mut host = ModalHost::new(Quiet);
        let (deps, _rx) = deps(&host);
        let ledger = Ledger::seed(Utc::now());

        let actions = transaction_actions(ledger.get(1039).unwrap(), None, &deps);
        let reject = actions.iter().find(|a| a.kind == ActionKind::Reject).unwrap();
        reject.run();
        reject.run();
        let _ = host.sync();

        let registry = host.registry();
        assert_eq!(registry.len(), 1);
        let record = registry.get(&reject_modal_id(1039).into()).unwrap();
        assert_eq!(record.variant(), ModalVariant::Component);
        assert!(record.is_open());
    }

    #[test]
    fn test_refund_opens_destructive_confirmation() {
        let mut host = ModalHost::new(Quiet);
        let (deps, _rx) = deps(&host);
        let ledger = Ledger::seed(Utc::now());

        let actions = transaction_actions(ledger.get(1041).unwrap(), None, &deps);
        actions[0].run();
        let _ = host.sync();

        let props = host.registry().records()[0].confirmation().unwrap();
        assert_eq!(props.title, "Are you sure you want to refund this transaction?");
        assert_eq!(props.confirm_text().to_string(), "Refund");
        assert_eq!(props.variant, curtain::modal::ConfirmVariant::Destructive);
    }

    #[tokio::test]
    async fn test_refund_posts_result_and_survives_closed_channel() {
        let mut host = ModalHost::new(Quiet);
        let (deps, mut rx) = deps(&host);
        let ledger = Ledger::seed(Utc::now());

        let actions = transaction_actions(ledger.get(1041).unwrap(), None, &deps);
        actions[0].run();
        let _ = host.sync();
        let props = host.registry().records()[0].confirmation().unwrap();
        let on_confirm = Arc::clone(&props.on_confirm);

        let ConfirmOutcome::Pending(refund) = on_confirm() else {
            panic!("refund should be asynchronous");
        };
        refund.await.unwrap();
        assert!(matches!(rx.recv().await, Some(Event::Refunded(1041))));
        match rx.recv().await {
            Some(Event::Notify(n)) => assert_eq!(n, Notification::success("Transaction refunded")),
            other => panic!("unexpected event {other:?}"),
        }

        drop(rx);
        let ConfirmOutcome::Pending(refund) = on_confirm() else {
            panic!("refund should be asynchronous");
        };
        assert!(refund.await.is_ok());
    }

    #[test]
    fn test_view_related_posts_filter() {
        let host = ModalHost::new(Quiet);
        let (deps, mut rx) = deps(&host);
        let ledger = Ledger::seed(Utc::now());

        let actions = transaction_actions(ledger.get(1040).unwrap(), None, &deps);
        let related = actions
            .iter()
            .find(|a| a.kind == ActionKind::ViewRelated)
            .unwrap();
        related.run();

        match rx.try_recv().unwrap() {
            Event::FilterGroup(group) => assert_eq!(group, "g-hosting"),
            other => panic!("unexpected event {other:?}"),
        }
    }
}
