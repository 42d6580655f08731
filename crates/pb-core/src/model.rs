//! Core page model for the builder.
//!
//! The page is a shallow tree: the root owns drop zones, each zone owns an
//! ordered list of canvas elements. Containment is stored as graph edges;
//! sibling order is stored explicitly per parent so reordering never has to
//! rebuild edges. Every element has exactly one owning zone.

use crate::id::ElementId;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ─── Colors ──────────────────────────────────────────────────────────────

/// 8-bit RGBA color, as produced by `<input type="color">`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`. The `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let pair = |i: usize| -> Option<u8> { Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?) };

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => Some(Self::rgb(pair(0)?, pair(2)?, pair(4)?)),
            8 => Some(Self {
                r: pair(0)?,
                g: pair(2)?,
                b: pair(4)?,
                a: pair(6)?,
            }),
            _ => None,
        }
    }

    /// Emit as lowercase `#rrggbb` (or `#rrggbbaa` when translucent),
    /// matching what color inputs report back.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ─── Element kinds ───────────────────────────────────────────────────────

/// The closed set of palette entry types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Button,
    Divider,
}

impl ElementKind {
    pub const ALL: [ElementKind; 4] = [Self::Text, Self::Image, Self::Button, Self::Divider];

    /// The `data-type` tag used by the palette and rendered markup.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Button => "button",
            Self::Divider => "divider",
        }
    }
}

impl FromStr for ElementKind {
    type Err = crate::BuilderError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "button" => Ok(Self::Button),
            "divider" => Ok(Self::Divider),
            "" => Err(crate::BuilderError::MissingTypeTag),
            other => Err(crate::BuilderError::UnknownElementType(other.to_string())),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ─── Sizes & style ───────────────────────────────────────────────────────

/// The size choice offered by the properties form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl ElementSize {
    /// Total mapping from form input: anything unrecognised is `Medium`.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim() {
            "small" => Self::Small,
            "large" => Self::Large,
            _ => Self::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// Vertical/horizontal padding in pixels, rendered as CSS shorthand `"Vpx Hpx"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    pub vertical: u16,
    pub horizontal: u16,
}

impl Padding {
    pub const fn new(vertical: u16, horizontal: u16) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    pub fn to_css(&self) -> String {
        format!("{}px {}px", self.vertical, self.horizontal)
    }
}

/// Visual attributes of a canvas element.
///
/// `color` is the foreground for text and the background for buttons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    pub color: Option<Color>,
    /// Font size in px.
    pub font_size: Option<u16>,
    pub padding: Option<Padding>,
    /// Last size chosen in the form, if any.
    pub size: Option<ElementSize>,
}

impl ElementStyle {
    pub fn font_size_css(&self) -> Option<String> {
        self.font_size.map(|px| format!("{px}px"))
    }

    pub fn padding_css(&self) -> Option<String> {
        self.padding.map(|p| p.to_css())
    }
}

// ─── Elements ────────────────────────────────────────────────────────────

/// Type-dependent payload of a canvas element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Content {
    Text(String),
    Image { src: String, alt: String },
    Button { label: String },
    /// Horizontal rule; nothing editable.
    Rule,
}

impl Content {
    /// Editable text of this payload, if the kind has any.
    pub fn editable_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Button { label } => Some(label),
            Self::Image { .. } | Self::Rule => None,
        }
    }
}

/// A placed, editable visual unit created from a palette entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasElement {
    pub id: ElementId,
    /// Copied from the catalog entry; never changes after creation.
    kind: ElementKind,
    pub content: Content,
    pub style: ElementStyle,
}

impl CanvasElement {
    pub fn new(id: ElementId, kind: ElementKind, content: Content) -> Self {
        Self {
            id,
            kind,
            content,
            style: ElementStyle::default(),
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }
}

// ─── Page graph ──────────────────────────────────────────────────────────

/// A node in the page tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PageNode {
    Root,
    Zone { id: ElementId },
    Element(CanvasElement),
}

impl PageNode {
    pub fn id(&self) -> ElementId {
        match self {
            Self::Root => ElementId::intern(ROOT_ID),
            Self::Zone { id } => *id,
            Self::Element(el) => el.id,
        }
    }

    pub fn as_element(&self) -> Option<&CanvasElement> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_zone(&self) -> bool {
        matches!(self, Self::Zone { .. })
    }
}

/// ID of the page root; never usable as a zone name.
pub const ROOT_ID: &str = "root";

type ChildList = SmallVec<[NodeIndex; 8]>;

/// Root → zones → elements, with explicit sibling order per parent.
#[derive(Debug, Clone)]
pub struct PageGraph {
    pub graph: StableDiGraph<PageNode, ()>,
    pub root: NodeIndex,
    id_index: HashMap<ElementId, NodeIndex>,
    child_order: HashMap<NodeIndex, ChildList>,
}

impl Default for PageGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl PageGraph {
    /// Create an empty page with only a root node.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(PageNode::Root);
        let mut id_index = HashMap::new();
        id_index.insert(ElementId::intern(ROOT_ID), root);

        Self {
            graph,
            root,
            id_index,
            child_order: HashMap::new(),
        }
    }

    /// Create a page with the given drop zones, in order.
    ///
    /// A name already taken by another node (e.g. `root`) is skipped.
    pub fn with_zones<'a>(zones: impl IntoIterator<Item = &'a str>) -> Self {
        let mut page = Self::new();
        for name in zones {
            if page.add_zone(ElementId::intern(name)).is_none() {
                log::warn!("zone id `{name}` is already taken; skipped");
            }
        }
        page
    }

    /// Add a drop zone under the root. Returns the existing index if the zone
    /// already exists, or `None` if `id` belongs to a node that isn't a zone.
    pub fn add_zone(&mut self, id: ElementId) -> Option<NodeIndex> {
        if let Some(idx) = self.index_of(id) {
            return self.graph[idx].is_zone().then_some(idx);
        }
        let root = self.root;
        self.attach(root, PageNode::Zone { id })
    }

    /// Append an element at the end of `zone`. Returns the new node's index,
    /// or `None` if the element's ID is already on the page.
    pub fn append_element(
        &mut self,
        zone: NodeIndex,
        element: CanvasElement,
    ) -> Option<NodeIndex> {
        self.attach(zone, PageNode::Element(element))
    }

    fn attach(&mut self, parent: NodeIndex, node: PageNode) -> Option<NodeIndex> {
        let id = node.id();
        if self.id_index.contains_key(&id) {
            return None;
        }
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent, idx, ());
        self.id_index.insert(id, idx);
        self.child_order.entry(parent).or_default().push(idx);
        Some(idx)
    }

    /// Move `child` within its current parent so it sits immediately before
    /// `before`, or at the end when `before` is `None`.
    /// Returns true if the order changed.
    pub fn move_before(&mut self, child: NodeIndex, before: Option<NodeIndex>) -> bool {
        let Some(parent) = self.parent(child) else {
            return false;
        };
        if before == Some(child) {
            return false;
        }
        if let Some(b) = before
            && self.parent(b) != Some(parent)
        {
            return false;
        }
        let Some(order) = self.child_order.get_mut(&parent) else {
            return false;
        };
        let Some(from) = order.iter().position(|&c| c == child) else {
            return false;
        };
        let snapshot = order.clone();
        order.remove(from);
        let to = match before {
            Some(b) => order.iter().position(|&c| c == b).unwrap_or(order.len()),
            None => order.len(),
        };
        order.insert(to, child);
        *order != snapshot
    }

    /// Remove a node (and its subtree), keeping `id_index` and sibling order in sync.
    pub fn remove_node(&mut self, idx: NodeIndex) -> Option<PageNode> {
        if idx == self.root {
            return None;
        }
        let children = self.children(idx).to_vec();
        for child in children {
            self.remove_node(child);
        }
        if let Some(parent) = self.parent(idx)
            && let Some(order) = self.child_order.get_mut(&parent)
        {
            order.retain(|c| *c != idx);
        }
        self.child_order.remove(&idx);
        let removed = self.graph.remove_node(idx);
        if let Some(node) = &removed {
            self.id_index.remove(&node.id());
        }
        removed
    }

    pub fn get_by_id(&self, id: ElementId) -> Option<&PageNode> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn index_of(&self, id: ElementId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Look up a canvas element by ID. Zones and the root return `None`.
    pub fn element(&self, id: ElementId) -> Option<&CanvasElement> {
        self.get_by_id(id).and_then(PageNode::as_element)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut CanvasElement> {
        let idx = self.index_of(id)?;
        match &mut self.graph[idx] {
            PageNode::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Index of a zone by ID; `None` if the ID is unknown or not a zone.
    pub fn zone_index(&self, id: ElementId) -> Option<NodeIndex> {
        self.index_of(id).filter(|idx| self.graph[*idx].is_zone())
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Children of a node in visible order.
    pub fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.child_order.get(&idx).map_or(&[], |c| c.as_slice())
    }

    /// The zone that currently owns `id`.
    pub fn zone_of(&self, id: ElementId) -> Option<ElementId> {
        let idx = self.index_of(id)?;
        let parent = self.parent(idx)?;
        match &self.graph[parent] {
            PageNode::Zone { id } => Some(*id),
            _ => None,
        }
    }

    /// Drop zone IDs in page order.
    pub fn zones(&self) -> Vec<ElementId> {
        self.children(self.root)
            .iter()
            .map(|&idx| self.graph[idx].id())
            .collect()
    }

    /// Element IDs of `zone` in visible order.
    pub fn element_ids(&self, zone: ElementId) -> Vec<ElementId> {
        self.zone_index(zone)
            .map(|z| {
                self.children(z)
                    .iter()
                    .map(|&idx| self.graph[idx].id())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total number of canvas elements on the page.
    pub fn element_count(&self) -> usize {
        self.graph
            .node_weights()
            .filter(|n| matches!(n, PageNode::Element(_)))
            .count()
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// Resolved bounding box of a zone or element, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ResolvedBounds {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// Vertical midpoint, the reference line for reorder placement.
    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(id: &str) -> CanvasElement {
        CanvasElement::new(
            ElementId::intern(id),
            ElementKind::Text,
            Content::Text(id.to_string()),
        )
    }

    #[test]
    fn page_graph_basics() {
        let mut page = PageGraph::with_zones(["main"]);
        let zone = page.zone_index(ElementId::intern("main")).unwrap();
        page.append_element(zone, text("a"));
        page.append_element(zone, text("b"));

        assert_eq!(page.element_count(), 2);
        assert_eq!(
            page.element_ids(ElementId::intern("main")),
            vec![ElementId::intern("a"), ElementId::intern("b")]
        );
        assert_eq!(
            page.zone_of(ElementId::intern("b")),
            Some(ElementId::intern("main"))
        );
    }

    #[test]
    fn move_before_reorders_within_parent() {
        let mut page = PageGraph::with_zones(["main"]);
        let zone = page.zone_index(ElementId::intern("main")).unwrap();
        let a = page.append_element(zone, text("mb_a")).unwrap();
        let _b = page.append_element(zone, text("mb_b")).unwrap();
        let c = page.append_element(zone, text("mb_c")).unwrap();

        assert!(page.move_before(c, Some(a)));
        let main_ids = page.element_ids(ElementId::intern("main"));
        let ids: Vec<&str> = main_ids
            .iter()
            .map(|id| id.as_str())
            .collect();
        assert_eq!(ids, vec!["mb_c", "mb_a", "mb_b"]);

        // Append to end
        assert!(page.move_before(c, None));
        // Already at end: no change
        assert!(!page.move_before(c, None));
    }

    #[test]
    fn move_before_rejects_foreign_anchor() {
        let mut page = PageGraph::with_zones(["left", "right"]);
        let left = page.zone_index(ElementId::intern("left")).unwrap();
        let right = page.zone_index(ElementId::intern("right")).unwrap();
        let a = page.append_element(left, text("fa_a")).unwrap();
        let b = page.append_element(right, text("fa_b")).unwrap();

        assert!(!page.move_before(a, Some(b)));
        assert_eq!(page.zone_of(ElementId::intern("fa_a")), Some(ElementId::intern("left")));
    }

    #[test]
    fn remove_keeps_index_in_sync() {
        let mut page = PageGraph::with_zones(["main"]);
        let zone = page.zone_index(ElementId::intern("main")).unwrap();
        let a = page.append_element(zone, text("rm_a")).unwrap();
        page.append_element(zone, text("rm_b"));

        assert!(page.remove_node(a).is_some());
        assert!(page.element(ElementId::intern("rm_a")).is_none());
        assert_eq!(page.children(zone).len(), 1);
        assert!(page.remove_node(page.root).is_none());
    }

    #[test]
    fn taken_ids_are_not_reattached() {
        let mut page = PageGraph::with_zones(["dup_zone"]);
        let zone = page.zone_index(ElementId::intern("dup_zone")).unwrap();

        // An element can't shadow a zone or another element.
        let clash = CanvasElement::new(
            ElementId::intern("dup_zone"),
            ElementKind::Text,
            Content::Text(String::new()),
        );
        assert!(page.append_element(zone, clash).is_none());
        assert!(page.append_element(zone, text("dup_el")).is_some());
        assert!(page.append_element(zone, text("dup_el")).is_none());

        assert_eq!(page.zone_index(ElementId::intern("dup_zone")), Some(zone));
        assert_eq!(page.element_count(), 1);
    }

    #[test]
    fn root_is_not_a_zone_name() {
        let page = PageGraph::with_zones(["root", "after_root"]);
        assert!(page.zone_index(ElementId::intern("root")).is_none());
        assert_eq!(page.zones(), vec![ElementId::intern("after_root")]);
    }

    #[test]
    fn zone_index_ignores_elements() {
        let mut page = PageGraph::with_zones(["main"]);
        let zone = page.zone_index(ElementId::intern("main")).unwrap();
        page.append_element(zone, text("zi_a"));
        assert!(page.zone_index(ElementId::intern("zi_a")).is_none());
    }

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#4CAF50").unwrap();
        assert_eq!(c, Color::rgb(0x4c, 0xaf, 0x50));
        assert_eq!(c.to_hex(), "#4caf50");
        assert_eq!(Color::from_hex("#fff").unwrap(), Color::rgb(255, 255, 255));
        assert!(Color::from_hex("red").is_none());
        assert!(Color::from_hex("#12345").is_none());
    }

    #[test]
    fn size_parse_defaults_to_medium() {
        assert_eq!(ElementSize::parse_or_default("small"), ElementSize::Small);
        assert_eq!(ElementSize::parse_or_default("large"), ElementSize::Large);
        assert_eq!(ElementSize::parse_or_default("huge"), ElementSize::Medium);
        assert_eq!(ElementSize::parse_or_default(""), ElementSize::Medium);
    }

    #[test]
    fn kind_tags_parse() {
        for kind in ElementKind::ALL {
            assert_eq!(kind.tag().parse::<ElementKind>().unwrap(), kind);
        }
        assert_eq!(
            "video".parse::<ElementKind>(),
            Err(crate::BuilderError::UnknownElementType("video".into()))
        );
        assert_eq!("".parse::<ElementKind>(), Err(crate::BuilderError::MissingTypeTag));
    }
}
