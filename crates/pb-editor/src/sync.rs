//! Sync engine: page model ↔ visible tree.
//!
//! The engine owns the authoritative `PageGraph` and keeps two derived views
//! in step with it:
//!
//! - **Bounds**: where every zone and element sits vertically. Computed by
//!   the stacking layout, optionally overridden per element by bounds the
//!   host measured from the live DOM.
//! - **Dirty zones**: which zones need re-rendering after mutations. The host
//!   drains them and replaces only those zones' markup.

use pb_core::NodeIndex;
use pb_core::error::BuilderError;
use pb_core::id::ElementId;
use pb_core::model::*;
use pb_core::{LayoutConfig, resolve_layout};
use smallvec::SmallVec;
use std::collections::HashMap;

/// The engine holds the page model and its derived layout.
pub struct SyncEngine {
    /// The current page (single source of truth).
    pub page: PageGraph,

    /// Layout metrics for computed bounds.
    pub layout: LayoutConfig,

    /// Computed bounds (recomputed after mutations).
    bounds: HashMap<NodeIndex, ResolvedBounds>,

    /// Host-measured bounds; take precedence over computed ones until the
    /// owning zone's layout changes.
    measured: HashMap<NodeIndex, ResolvedBounds>,

    dirty_zones: SmallVec<[ElementId; 4]>,
}

impl SyncEngine {
    /// Create an engine with the given drop zones and no elements.
    pub fn new<'a>(zones: impl IntoIterator<Item = &'a str>, layout: LayoutConfig) -> Self {
        let page = PageGraph::with_zones(zones);
        let bounds = resolve_layout(&page, &layout);
        Self {
            page,
            layout,
            bounds,
            measured: HashMap::new(),
            dirty_zones: SmallVec::new(),
        }
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Apply a mutation to the page, then re-resolve layout.
    /// Returns `Ok(true)` if anything visible changed.
    ///
    /// # Errors
    /// `UnknownZone` / `UnknownElement` when the mutation names something
    /// that isn't on the page. The page is left untouched.
    pub fn apply_mutation(&mut self, mutation: PageMutation) -> Result<bool, BuilderError> {
        log::debug!("apply {mutation:?}");
        let (zone, changed) = match mutation {
            PageMutation::AddElement { zone, element } => {
                let zone_idx = self
                    .page
                    .zone_index(zone)
                    .ok_or_else(|| BuilderError::UnknownZone(zone.to_string()))?;
                let id = element.id;
                self.page
                    .append_element(zone_idx, *element)
                    .ok_or_else(|| BuilderError::DuplicateId(id.to_string()))?;
                (zone, true)
            }
            PageMutation::MoveElement { id, before } => {
                let idx = self.element_index(id)?;
                let zone = self.owning_zone(id)?;
                let before_idx = match before {
                    Some(b) => Some(self.element_index(b)?),
                    None => None,
                };
                (zone, self.page.move_before(idx, before_idx))
            }
            PageMutation::RemoveElement { id } => {
                let idx = self.element_index(id)?;
                let zone = self.owning_zone(id)?;
                self.measured.remove(&idx);
                self.page.remove_node(idx);
                (zone, true)
            }
            PageMutation::SetContent { id, content } => {
                let zone = self.owning_zone(id)?;
                let element = self
                    .page
                    .element_mut(id)
                    .ok_or_else(|| BuilderError::UnknownElement(id.to_string()))?;
                let changed = element.content != content;
                element.content = content;
                (zone, changed)
            }
            PageMutation::SetStyle { id, style } => {
                let zone = self.owning_zone(id)?;
                let element = self
                    .page
                    .element_mut(id)
                    .ok_or_else(|| BuilderError::UnknownElement(id.to_string()))?;
                let changed = element.style != style;
                element.style = style;
                (zone, changed)
            }
        };

        if changed {
            self.invalidate_zone(zone);
            self.resolve();
        }
        Ok(changed)
    }

    fn element_index(&self, id: ElementId) -> Result<NodeIndex, BuilderError> {
        self.page
            .element(id)
            .and_then(|_| self.page.index_of(id))
            .ok_or_else(|| BuilderError::UnknownElement(id.to_string()))
    }

    fn owning_zone(&self, id: ElementId) -> Result<ElementId, BuilderError> {
        self.page
            .zone_of(id)
            .ok_or_else(|| BuilderError::UnknownElement(id.to_string()))
    }

    /// Mark a zone for re-render and drop its stale measurements.
    fn invalidate_zone(&mut self, zone: ElementId) {
        if let Some(zone_idx) = self.page.zone_index(zone) {
            for child in self.page.children(zone_idx) {
                self.measured.remove(child);
            }
        }
        if !self.dirty_zones.contains(&zone) {
            self.dirty_zones.push(zone);
        }
    }

    /// Re-resolve computed layout.
    pub fn resolve(&mut self) {
        self.bounds = resolve_layout(&self.page, &self.layout);
    }

    // ─── Measured bounds ─────────────────────────────────────────────────

    /// Record bounds the host measured for an element.
    /// Returns false if the element isn't on the page.
    pub fn set_measured_bounds(&mut self, id: ElementId, bounds: ResolvedBounds) -> bool {
        match self.element_index(id) {
            Ok(idx) => {
                self.measured.insert(idx, bounds);
                true
            }
            Err(_) => false,
        }
    }

    pub fn clear_measured_bounds(&mut self) {
        self.measured.clear();
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Effective bounds of a node: measured if present, otherwise computed.
    pub fn bounds_of(&self, id: ElementId) -> Option<ResolvedBounds> {
        let idx = self.page.index_of(id)?;
        self.measured
            .get(&idx)
            .or_else(|| self.bounds.get(&idx))
            .copied()
    }

    /// Elements of `zone` with their effective bounds, in visible order.
    pub fn zone_elements_with_bounds(&self, zone: ElementId) -> Vec<(ElementId, ResolvedBounds)> {
        self.page
            .element_ids(zone)
            .into_iter()
            .filter_map(|id| self.bounds_of(id).map(|b| (id, b)))
            .collect()
    }

    /// Computed bounds for all nodes.
    pub fn current_bounds(&self) -> &HashMap<NodeIndex, ResolvedBounds> {
        &self.bounds
    }

    /// Drain the set of zones changed since the last call.
    pub fn take_dirty_zones(&mut self) -> Vec<ElementId> {
        self.dirty_zones.drain(..).collect()
    }

    /// Mark a zone for re-render without changing the model (e.g. highlight
    /// or selection marker changes).
    pub fn touch_zone(&mut self, zone: ElementId) {
        if !self.dirty_zones.contains(&zone) {
            self.dirty_zones.push(zone);
        }
    }
}

/// A mutation that can be applied to the page from editor interactions.
#[derive(Debug, Clone, PartialEq)]
pub enum PageMutation {
    /// Append a new element at the end of `zone`.
    AddElement {
        zone: ElementId,
        element: Box<CanvasElement>,
    },
    /// Reorder within the element's current zone: before `before`, or last.
    MoveElement {
        id: ElementId,
        before: Option<ElementId>,
    },
    RemoveElement {
        id: ElementId,
    },
    SetContent {
        id: ElementId,
        content: Content,
    },
    SetStyle {
        id: ElementId,
        style: ElementStyle,
    },
}
