//! Application state and logic
//!
//! The dashboard owns the ledger, the row selection and focus, footer
//! toasts, and the [`ModalHost`]. Keyboard handling lives in `keyboard`.

pub mod actions;
mod keyboard;
pub mod ledger;
pub mod menu;
pub mod reject;

use crate::event::Event;
use actions::{ActionDeps, ActionKind};
use curtain::config::CurtainConfig;
use curtain::focus::{FocusReturn, FocusTarget, Focusable};
use curtain::modal::{ModalConfig, ModalHost, Settlement};
use curtain::notify::{DesktopNotifier, Notification, Notifier};
use ledger::{Ledger, TxId};
use menu::{ActionsMenu, MENU_ID};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Which element has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The ledger table itself
    #[default]
    Ledger,
    /// A row's actions trigger
    Trigger(TxId),
}

/// A row's actions trigger, handed to modals as their focus target
#[derive(Debug)]
pub struct RowTrigger {
    tx_id: TxId,
    events: mpsc::Sender<Event>,
}

impl Focusable for RowTrigger {
    fn focus(&self) {
        if let Err(e) = self.events.try_send(Event::FocusTrigger(self.tx_id)) {
            tracing::debug!(tx = self.tx_id, error = %e, "Focus request dropped");
        }
    }
}

/// Delivers modal notifications to the app as toasts
#[derive(Debug, Clone)]
pub struct EventNotifier(mpsc::Sender<Event>);

impl Notifier for EventNotifier {
    fn notify(&self, notification: Notification) {
        if let Err(e) = self.0.try_send(Event::Notify(notification)) {
            tracing::warn!(error = %e, "Notification dropped");
        }
    }
}

/// Footer message
#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

/// Application state and logic
pub struct App {
    pub ledger: Ledger,
    /// Index into the visible rows
    pub selected: usize,
    pub focus: Focus,
    pub toasts: Vec<Toast>,
    pub modals: ModalHost,
    pub should_quit: bool,
    /// Dirty flag: true if UI needs re-render
    pub needs_render: bool,
    toast_ttl: Duration,
    desktop: Option<DesktopNotifier>,
    /// Kept alive here; modals only hold weak references
    triggers: HashMap<TxId, Arc<RowTrigger>>,
    deps: ActionDeps,
}

impl App {
    pub fn new(config: &CurtainConfig, events: mpsc::Sender<Event>, desktop: bool) -> Self {
        let ledger = Ledger::seed(chrono::Utc::now());
        let modals = ModalHost::new(EventNotifier(events.clone()))
            .with_retention(config.modals.retention());

        let triggers = ledger
            .all()
            .iter()
            .map(|tx| {
                let trigger = RowTrigger {
                    tx_id: tx.id,
                    events: events.clone(),
                };
                (tx.id, Arc::new(trigger))
            })
            .collect();

        let deps = ActionDeps {
            modals: modals.context(),
            events,
            refund_latency: Duration::from_millis(config.demo.refund_latency_ms),
            receipts_dir: receipts_dir(),
        };

        Self {
            ledger,
            selected: 0,
            focus: Focus::Ledger,
            toasts: Vec::new(),
            modals,
            should_quit: false,
            needs_render: true, // Always render first frame
            toast_ttl: Duration::from_secs(config.notifications.toast_seconds),
            desktop: (desktop || config.notifications.desktop)
                .then(|| DesktopNotifier::new("curtain")),
            triggers,
            deps,
        }
    }

    /// Id of the selected row, if any
    pub fn selected_id(&self) -> Option<TxId> {
        self.ledger.visible().get(self.selected).map(|t| t.id)
    }

    /// Handle incoming events
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Notify(notification) => self.show_toast(notification),
            Event::Refunded(id) => {
                if self.ledger.mark_refunded(id) {
                    tracing::info!(tx = id, "Transaction refunded");
                }
            }
            Event::Rejected { tx_id, reason, refund } => {
                if self.ledger.mark_rejected(tx_id, &reason, refund) {
                    tracing::info!(tx = tx_id, %reason, refund, "Transaction rejected");
                    let message = if refund {
                        "Transaction rejected and refunded"
                    } else {
                        "Transaction rejected"
                    };
                    self.show_toast(Notification::success(message));
                }
            }
            Event::FilterGroup(group) => {
                tracing::debug!(%group, "Showing related transactions");
                self.ledger.set_group_filter(group);
                self.selected = 0;
                self.focus = Focus::Ledger;
            }
            Event::FocusTrigger(id) => self.focus_trigger(id),
        }
        self.needs_render = true;
    }

    /// Apply queued modal requests; call once before each frame
    pub fn sync_modals(&mut self) {
        let returns = self.modals.sync();
        if !returns.is_empty() {
            self.needs_render = true;
        }
        for FocusReturn { id } in returns {
            // No live opener: fall back to the table
            tracing::debug!(modal = %id, "Focus returned to ledger");
            self.focus = Focus::Ledger;
        }
    }

    /// Apply a finished confirm action
    pub fn settle(&mut self, settlement: Settlement) {
        self.modals.settle(settlement);
        self.needs_render = true;
    }

    /// Expire old toasts
    pub fn tick(&mut self) {
        let ttl = self.toast_ttl;
        self.toasts.retain(|t| t.shown_at.elapsed() < ttl);
        // Tick triggers re-render for the submitting indicator
        self.needs_render = true;
    }

    /// Called after render to reset dirty flag
    pub fn rendered(&mut self) {
        self.needs_render = false;
    }

    pub fn show_toast(&mut self, notification: Notification) {
        if let Some(desktop) = &self.desktop {
            desktop.notify(notification.clone());
        }
        self.toasts.push(Toast {
            notification,
            shown_at: Instant::now(),
        });
        self.needs_render = true;
    }

    fn focus_trigger(&mut self, id: TxId) {
        if let Some(index) = self.ledger.visible().iter().position(|t| t.id == id) {
            self.selected = index;
            self.focus = Focus::Trigger(id);
        }
    }

    fn trigger_target(&self, id: TxId) -> Option<FocusTarget> {
        self.triggers.get(&id).map(FocusTarget::new)
    }

    /// Open the row actions menu for the selected transaction
    fn open_actions_menu(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(tx) = self.ledger.get(id) else {
            return;
        };

        let target = self.trigger_target(id);
        let actions = actions::transaction_actions(tx, target.clone(), &self.deps);
        let menu = ActionsMenu::new(format!("Transaction #{id}"), actions);
        self.focus = Focus::Trigger(id);

        let _ = self.modals.context().show_modal(
            menu,
            ModalConfig::default().with_id(MENU_ID).focus_target(target),
        );
    }

    /// Run one action on the selected row directly
    fn run_action(&mut self, kind: ActionKind) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(tx) = self.ledger.get(id) else {
            return;
        };

        let target = self.trigger_target(id);
        let action = actions::transaction_actions(tx, target, &self.deps)
            .into_iter()
            .find(|a| a.kind == kind);
        match action {
            Some(action) => {
                self.focus = Focus::Trigger(id);
                action.run();
            }
            None => self.show_toast(Notification::info(format!(
                "{kind:?} is not available for transaction #{id}"
            ))),
        }
    }
}

/// Receipts land next to the logs in the user cache dir
fn receipts_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || std::env::temp_dir().join("curtain").join("receipts"),
        |dirs| dirs.cache_dir().join("curtain").join("receipts"),
    )
}
