//! Application events
//!
//! Everything that reaches the main loop goes through one channel: keys from
//! the input listener, and results posted back by modals and background
//! work (refunds, rejections, focus requests, toasts).

pub mod input;

use crate::app::ledger::TxId;
use curtain::notify::Notification;

/// Application events
#[derive(Debug)]
pub enum Event {
    /// Keyboard input
    Key(crossterm::event::KeyEvent),
    /// Show a toast (and mirror it to the desktop when enabled)
    Notify(Notification),
    /// The payment processor accepted a refund
    Refunded(TxId),
    /// The reject modal was submitted
    Rejected {
        tx_id: TxId,
        reason: String,
        /// Refund the contributor as part of the rejection
        refund: bool,
    },
    /// Show only transactions in this group
    FilterGroup(String),
    /// A row's actions trigger asked for focus
    FocusTrigger(TxId),
}
