//! Stacking layout solver.
//!
//! Zones are laid out top-to-bottom at full width; elements are stacked
//! top-to-bottom inside their zone in model order. This gives reorder
//! placement a bounding box for every element when the host has not
//! measured the live DOM.

use crate::catalog::{font_size_for, padding_for};
use crate::config::LayoutConfig;
use crate::model::*;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

/// Intrinsic height of an element under `config`.
pub fn element_height(element: &CanvasElement, config: &LayoutConfig) -> f32 {
    let default_font = f32::from(font_size_for(ElementSize::Medium));
    match element.kind() {
        ElementKind::Text => {
            let font = element.style.font_size.map_or(default_font, f32::from);
            font * config.text_line_height
        }
        ElementKind::Button => {
            let pad = element
                .style
                .padding
                .unwrap_or_else(|| padding_for(ElementSize::Medium));
            default_font * config.text_line_height + 2.0 * f32::from(pad.vertical)
        }
        ElementKind::Image => config.image_height,
        ElementKind::Divider => config.divider_height,
    }
}

/// Resolve bounds for every zone and element on the page.
pub fn resolve_layout(
    page: &PageGraph,
    config: &LayoutConfig,
) -> HashMap<NodeIndex, ResolvedBounds> {
    let mut bounds = HashMap::new();
    let mut y = 0.0;

    for &zone in page.children(page.root) {
        let zone_bounds = resolve_zone(page, zone, y, config, &mut bounds);
        y += zone_bounds.height + config.zone_gap;
        bounds.insert(zone, zone_bounds);
    }

    bounds
}

fn resolve_zone(
    page: &PageGraph,
    zone: NodeIndex,
    top: f32,
    config: &LayoutConfig,
    bounds: &mut HashMap<NodeIndex, ResolvedBounds>,
) -> ResolvedBounds {
    let inner_x = config.zone_padding;
    let inner_width = (config.zone_width - 2.0 * config.zone_padding).max(0.0);
    let mut cursor = top + config.zone_padding;

    for (i, &child) in page.children(zone).iter().enumerate() {
        let Some(element) = page.graph[child].as_element() else {
            continue;
        };
        if i > 0 {
            cursor += config.element_gap;
        }
        let height = element_height(element, config);
        bounds.insert(
            child,
            ResolvedBounds {
                x: inner_x,
                y: cursor,
                width: inner_width,
                height,
            },
        );
        cursor += height;
    }

    let content_height = cursor + config.zone_padding - top;
    ResolvedBounds {
        x: 0.0,
        y: top,
        width: config.zone_width,
        height: content_height.max(config.zone_min_height),
    }
}
