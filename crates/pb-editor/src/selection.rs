//! Single-element selection.

use pb_core::id::ElementId;

/// At most one selected element. Selecting replaces the previous one in a
/// single step, so two elements are never selected at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id`, returning the previously selected element (if different).
    pub fn select(&mut self, id: ElementId) -> Option<ElementId> {
        self.current.replace(id).filter(|prev| *prev != id)
    }

    /// Clear the selection, returning what was selected.
    pub fn clear(&mut self) -> Option<ElementId> {
        self.current.take()
    }

    pub fn current(&self) -> Option<ElementId> {
        self.current
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.current == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_replaces_previous() {
        let a = ElementId::intern("sel_a");
        let b = ElementId::intern("sel_b");
        let mut sel = Selection::new();

        assert_eq!(sel.select(a), None);
        assert_eq!(sel.select(b), Some(a));
        assert!(sel.is_selected(b));
        assert!(!sel.is_selected(a));
    }

    #[test]
    fn reselect_same_reports_nothing() {
        let a = ElementId::intern("sel_same");
        let mut sel = Selection::new();
        sel.select(a);
        assert_eq!(sel.select(a), None);
        assert_eq!(sel.current(), Some(a));
    }

    #[test]
    fn clear_empties() {
        let mut sel = Selection::new();
        sel.select(ElementId::intern("sel_c"));
        assert!(sel.clear().is_some());
        assert_eq!(sel.current(), None);
        assert_eq!(sel.clear(), None);
    }
}
