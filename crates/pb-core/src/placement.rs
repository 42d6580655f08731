//! Reorder placement: pointer Y → insertion point among siblings.
//!
//! Scans siblings top-to-bottom and keeps the one whose vertical midpoint is
//! below the pointer by the smallest margin. That sibling is the first one
//! the pointer has not yet passed; the dragged element goes right before it.
//! If every sibling has been passed (or there are none), the element is
//! appended.

use crate::id::ElementId;
use crate::model::ResolvedBounds;

/// Where a dragged element should land in its zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before(ElementId),
    Append,
}

impl Placement {
    pub fn anchor(self) -> Option<ElementId> {
        match self {
            Self::Before(id) => Some(id),
            Self::Append => None,
        }
    }
}

/// Compute the insertion point for `dragged` at `pointer_y`.
///
/// `siblings` are the zone's elements with their bounds, in any order;
/// the dragged element itself is skipped if present.
pub fn drag_after_element<I>(siblings: I, dragged: ElementId, pointer_y: f32) -> Placement
where
    I: IntoIterator<Item = (ElementId, ResolvedBounds)>,
{
    let mut closest: Option<(f32, ElementId)> = None;

    for (id, bounds) in siblings {
        if id == dragged {
            continue;
        }
        let offset = pointer_y - bounds.mid_y();
        if offset >= 0.0 {
            continue;
        }
        match closest {
            Some((best, _)) if offset <= best => {}
            _ => closest = Some((offset, id)),
        }
    }

    match closest {
        Some((offset, id)) => {
            log::trace!("placement: before {id} (offset {offset})");
            Placement::Before(id)
        }
        None => Placement::Append,
    }
}
