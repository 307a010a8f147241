//! Modal registry and its reducer
//!
//! The registry is the ordered collection of modal records. It changes only
//! through [`ModalRegistry::apply()`] with one of the two [`ModalAction`]s.

use super::{ModalComponent, ModalId, ModalPayload, ModalRecord};
use crate::focus::FocusTarget;

/// Transitions the registry understands
#[derive(Debug)]
pub enum ModalAction {
    /// Insert or update in place, forcing the record open
    Open {
        id: ModalId,
        payload: ModalPayload,
        focus_target: Option<FocusTarget>,
    },
    /// Mark the record closed; unknown ids are ignored
    Close { id: ModalId },
}

impl ModalAction {
    pub fn id(&self) -> &ModalId {
        match self {
            ModalAction::Open { id, .. } | ModalAction::Close { id } => id,
        }
    }
}

/// What applying an action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Opened {
        id: ModalId,
        /// False when an existing record was updated in place
        created: bool,
        /// Closed records dropped by the retention policy
        evicted: Vec<ModalId>,
    },
    /// The record went from open to closed
    Closed { id: ModalId },
    Unchanged,
}

/// How long closed records stay in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetentionPolicy {
    /// Never evict
    #[default]
    Unbounded,
    /// When a new id is opened, drop the oldest closed records beyond this count
    KeepClosed(usize),
}

/// Ordered collection of modal records
#[derive(Debug, Default)]
pub struct ModalRegistry {
    records: Vec<ModalRecord>,
    retention: RetentionPolicy,
}

impl ModalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: RetentionPolicy) -> Self {
        Self {
            records: Vec::new(),
            retention,
        }
    }

    /// Apply one transition
    pub fn apply(&mut self, action: ModalAction) -> Transition {
        match action {
            ModalAction::Open {
                id,
                payload,
                focus_target,
            } => {
                if let Some(record) = self.records.iter_mut().find(|r| r.id == id) {
                    record.payload = payload;
                    record.open = true;
                    // A re-open without a focus target keeps the previous one
                    if focus_target.is_some() {
                        record.focus_target = focus_target;
                    }
                    tracing::debug!(id = %id, variant = ?record.variant(), "Modal updated in place");
                    return Transition::Opened {
                        id,
                        created: false,
                        evicted: Vec::new(),
                    };
                }

                let evicted = self.evict_closed();
                tracing::debug!(id = %id, variant = ?payload.variant(), "Modal opened");
                self.records.push(ModalRecord {
                    id: id.clone(),
                    open: true,
                    payload,
                    focus_target,
                });
                Transition::Opened {
                    id,
                    created: true,
                    evicted,
                }
            }
            ModalAction::Close { id } => match self.records.iter_mut().find(|r| r.id == id) {
                Some(record) if record.open => {
                    record.open = false;
                    tracing::debug!(id = %id, "Modal closed");
                    Transition::Closed { id }
                }
                Some(_) => Transition::Unchanged,
                None => {
                    tracing::trace!(id = %id, "Close for unknown modal ignored");
                    Transition::Unchanged
                }
            },
        }
    }

    fn evict_closed(&mut self) -> Vec<ModalId> {
        let RetentionPolicy::KeepClosed(keep) = self.retention else {
            return Vec::new();
        };

        let closed = self.records.iter().filter(|r| !r.open).count();
        let mut excess = closed.saturating_sub(keep);
        let mut evicted = Vec::new();
        self.records.retain(|r| {
            if excess > 0 && !r.open {
                excess -= 1;
                evicted.push(r.id.clone());
                false
            } else {
                true
            }
        });
        if !evicted.is_empty() {
            tracing::debug!(count = evicted.len(), "Evicted closed modals");
        }
        evicted
    }

    pub fn records(&self) -> &[ModalRecord] {
        &self.records
    }

    pub fn get(&self, id: &ModalId) -> Option<&ModalRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn position(&self, id: &ModalId) -> Option<usize> {
        self.records.iter().position(|r| &r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_open(&self) -> bool {
        self.records.iter().any(|r| r.open)
    }

    /// The last open record in order, which receives input
    pub fn topmost_open(&self) -> Option<&ModalRecord> {
        self.records.iter().rev().find(|r| r.open)
    }

    /// Mutable access to a component instance for rendering and input
    pub(crate) fn component_mut(&mut self, id: &ModalId) -> Option<&mut Box<dyn ModalComponent>> {
        match self.records.iter_mut().find(|r| &r.id == id) {
            Some(ModalRecord {
                payload: ModalPayload::Component(component),
                ..
            }) => Some(component),
            _ => None,
        }
    }

    pub(crate) fn records_mut(&mut self) -> std::slice::IterMut<'_, ModalRecord> {
        self.records.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::testing::CountingTarget;
    use crate::modal::component::testing::Stub;
    use crate::modal::{ConfirmOutcome, ConfirmationProps, ModalVariant};
    use std::collections::HashSet;
    use std::sync::Arc;

    fn open(id: &str, name: &'static str) -> ModalAction {
        ModalAction::Open {
            id: id.into(),
            payload: ModalPayload::Component(Box::new(Stub::new(name))),
            focus_target: None,
        }
    }

    fn close(id: &str) -> ModalAction {
        ModalAction::Close { id: id.into() }
    }

    fn names(registry: &ModalRegistry) -> Vec<String> {
        registry
            .records()
            .iter()
            .map(|r| match r.payload() {
                ModalPayload::Component(c) => c.name().to_string(),
                ModalPayload::Confirmation(p) => p.title.clone(),
            })
            .collect()
    }

    #[test]
    fn test_open_appends_in_order() {
        let mut registry = ModalRegistry::new();
        let _ = registry.apply(open("a", "A"));
        let _ = registry.apply(open("b", "B"));

        assert_eq!(names(&registry), vec!["A", "B"]);
        assert!(registry.records().iter().all(ModalRecord::is_open));
        assert_eq!(registry.topmost_open().unwrap().id().as_str(), "b");
    }

    #[test]
    fn test_reopen_same_id_updates_in_place() {
        let mut registry = ModalRegistry::new();
        let _ = registry.apply(open("x", "A"));
        let _ = registry.apply(open("y", "other"));
        let _ = registry.apply(close("x"));

        let transition = registry.apply(open("x", "B"));

        assert_eq!(
            transition,
            Transition::Opened {
                id: "x".into(),
                created: false,
                evicted: vec![]
            }
        );
        assert_eq!(registry.len(), 2);
        assert_eq!(names(&registry), vec!["B", "other"]);
        assert_eq!(registry.position(&"x".into()), Some(0));
        assert!(registry.get(&"x".into()).unwrap().is_open());
    }

    #[test]
    fn test_reopen_can_switch_variant() {
        let mut registry = ModalRegistry::new();
        let _ = registry.apply(open("x", "A"));
        let _ = registry.apply(ModalAction::Open {
            id: "x".into(),
            payload: ModalPayload::Confirmation(ConfirmationProps::new("Delete?", || {
                ConfirmOutcome::Ready(Ok(()))
            })),
            focus_target: None,
        });

        let record = registry.get(&"x".into()).unwrap();
        assert_eq!(record.variant(), ModalVariant::Confirmation);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reopen_without_target_keeps_previous_target() {
        let element = Arc::new(CountingTarget::default());
        let mut registry = ModalRegistry::new();
        let _ = registry.apply(ModalAction::Open {
            id: "x".into(),
            payload: ModalPayload::Component(Box::new(Stub::new("A"))),
            focus_target: Some(FocusTarget::new(&element)),
        });
        let _ = registry.apply(open("x", "B"));

        assert!(registry.get(&"x".into()).unwrap().focus_target().is_some());
    }

    #[test]
    fn test_close_unknown_is_noop() {
        let mut registry = ModalRegistry::new();
        let _ = registry.apply(open("a", "A"));

        assert_eq!(registry.apply(close("missing")), Transition::Unchanged);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&"a".into()).unwrap().is_open());
    }

    #[test]
    fn test_close_keeps_record() {
        let mut registry = ModalRegistry::new();
        let _ = registry.apply(open("a", "A"));

        assert_eq!(
            registry.apply(close("a")),
            Transition::Closed { id: "a".into() }
        );
        assert_eq!(registry.len(), 1);
        assert!(!registry.get(&"a".into()).unwrap().is_open());
        assert!(!registry.has_open());

        // Closing twice reports nothing new
        assert_eq!(registry.apply(close("a")), Transition::Unchanged);
    }

    #[test]
    fn test_ids_stay_unique_over_mixed_sequences() {
        let mut registry = ModalRegistry::new();
        let ids = ["a", "b", "c", "d", "e"];

        // Small LCG so the sequence is long but deterministic
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..2_000 {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let id = ids[(seed >> 33) as usize % ids.len()];
            if (seed >> 20) % 3 == 0 {
                let _ = registry.apply(close(id));
            } else {
                let _ = registry.apply(open(id, "stub"));
            }

            let unique: HashSet<_> = registry.records().iter().map(ModalRecord::id).collect();
            assert_eq!(unique.len(), registry.len());
        }
        assert!(registry.len() <= ids.len());
    }

    #[test]
    fn test_keep_closed_evicts_oldest_closed_on_new_id() {
        let mut registry = ModalRegistry::with_retention(RetentionPolicy::KeepClosed(1));
        for id in ["a", "b", "c"] {
            let _ = registry.apply(open(id, "stub"));
            let _ = registry.apply(close(id));
        }

        // Reopening an existing id never evicts
        let _ = registry.apply(open("c", "stub"));
        let _ = registry.apply(close("c"));
        assert_eq!(registry.len(), 2);

        let transition = registry.apply(open("d", "stub"));
        assert_eq!(
            transition,
            Transition::Opened {
                id: "d".into(),
                created: true,
                evicted: vec!["b".into()],
            }
        );
        let ids: Vec<_> = registry.records().iter().map(|r| r.id().as_str()).collect();
        assert_eq!(ids, vec!["c", "d"]);
    }

    #[test]
    fn test_keep_closed_never_evicts_open_records() {
        let mut registry = ModalRegistry::with_retention(RetentionPolicy::KeepClosed(0));
        let _ = registry.apply(open("a", "stub"));
        let _ = registry.apply(open("b", "stub"));
        let _ = registry.apply(open("c", "stub"));
        assert_eq!(registry.len(), 3);
    }
}
