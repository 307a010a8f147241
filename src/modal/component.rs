//! Contract for caller-supplied modal components

use crate::focus::CloseAutoFocus;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// A dialog the host can show
///
/// The component value carries its own typed props. The host only adds the
/// open/close contract on top: it renders the component while its record is
/// open and hands it a [`ModalControl`] for key handling.
pub trait ModalComponent: Send {
    /// Short name for logs
    fn name(&self) -> &str {
        "component"
    }

    /// Draw the dialog; `area` is the full frame
    fn render(&mut self, f: &mut Frame, area: Rect);

    /// Handle a key while this is the topmost open modal
    ///
    /// Call `modal.set_open(false)` to close.
    fn handle_key(&mut self, key: KeyEvent, modal: &mut ModalControl);

    /// Side effect run after the component closed itself via `set_open(false)`
    fn on_close(&mut self) {}

    /// Observes the close-auto-focus event after the host handled it
    fn on_close_auto_focus(&mut self, _event: &mut CloseAutoFocus) {}
}

/// Open/close capability handed to a component during key handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalControl {
    open: bool,
    requested: Option<bool>,
}

impl ModalControl {
    pub fn new(open: bool) -> Self {
        Self {
            open,
            requested: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.requested = Some(open);
    }

    /// True if the component asked to be closed
    pub fn close_requested(&self) -> bool {
        self.requested == Some(false)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{ModalComponent, ModalControl};
    use crossterm::event::{KeyCode, KeyEvent};
    use ratatui::{layout::Rect, widgets::Paragraph, Frame};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Component that prints its name and closes on Esc
    pub struct Stub {
        name: &'static str,
        closed: Arc<AtomicUsize>,
    }

    impl Stub {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                closed: Arc::default(),
            }
        }

        /// Shares a counter bumped by `on_close`
        pub fn counting(name: &'static str, closed: &Arc<AtomicUsize>) -> Self {
            Self {
                name,
                closed: Arc::clone(closed),
            }
        }
    }

    impl ModalComponent for Stub {
        fn name(&self) -> &str {
            self.name
        }

        fn render(&mut self, f: &mut Frame, area: Rect) {
            f.render_widget(Paragraph::new(self.name), area);
        }

        fn handle_key(&mut self, key: KeyEvent, modal: &mut ModalControl) {
            if key.code == KeyCode::Esc {
                modal.set_open(false);
            }
        }

        fn on_close(&mut self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}
