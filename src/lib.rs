#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)] // ModalHost in modal is fine
#![allow(clippy::doc_markdown)]
#![allow(clippy::redundant_closure_for_method_calls)] // Sometimes closures are clearer

//! Curtain - modal orchestration for ratatui applications
//!
//! A single [`ModalHost`](modal::ModalHost) tracks which overlays are
//! requested, draws them in a stable order, and drives the guarded
//! confirm/cancel flow of the built-in confirmation dialog:
//!
//! ```ignore
//! let mut host = ModalHost::new(DesktopNotifier::new("curtain"));
//! let modals = host.context();
//!
//! modals.show_confirmation_modal(
//!     ConfirmationProps::new("Delete?", || ConfirmOutcome::done()).destructive(),
//!     ModalConfig::default(),
//! );
//!
//! // once per frame
//! for ret in host.sync() { /* focus the opener */ }
//! terminal.draw(|f| host.render(f))?;
//! ```

pub mod config;
pub mod errors;
pub mod focus;
pub mod helpers;
pub mod modal;
pub mod notify;
