//! Layout configuration handed to the rendering backend.
//!
//! The builders only produce semantic levels; turning levels into
//! coordinates is the renderer's job. These options tell a hierarchical
//! renderer how to space the levels.

use serde::{Deserialize, Serialize};

/// Which way the hierarchy grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Up → down (root on top).
    #[default]
    UD,
    DU,
    LR,
    RL,
}

/// How a hierarchical renderer orders nodes inside a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMethod {
    #[default]
    Hubsize,
    Directed,
}

/// Which end of the hierarchy unconstrained nodes drift towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShakeTowards {
    #[default]
    Roots,
    Leaves,
}

/// Options for a level-based renderer.
///
/// Flat on the Rust side. On the wire it takes the nested
/// `{ layout: { improvedLayout, hierarchical: { enabled, ... } } }` shape a
/// vis network reads; see [`VisOptions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "VisOptions", from = "VisOptions")]
pub struct LayoutConfig {
    pub improved_layout: bool,
    /// Place nodes by `level`. Off = free-form layout.
    pub hierarchical: bool,
    /// Distance between levels.
    pub level_separation: u32,
    /// Distance between siblings in a level.
    pub node_spacing: u32,
    /// Distance between disjoint trees.
    pub tree_spacing: u32,
    pub direction: Direction,
    pub sort_method: SortMethod,
    pub shake_towards: ShakeTowards,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            improved_layout: true,
            hierarchical: true,
            level_separation: 80,
            node_spacing: 50,
            tree_spacing: 80,
            direction: Direction::UD,
            sort_method: SortMethod::Hubsize,
            shake_towards: ShakeTowards::Roots,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Left-to-right variant, used for the state trace.
    pub fn left_to_right() -> Self {
        Self {
            direction: Direction::LR,
            sort_method: SortMethod::Directed,
            ..Self::default()
        }
    }
}

// ─── Wire shape ─────────────────────────────────────────────────────────

/// Serialized form of [`LayoutConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisOptions {
    #[serde(default)]
    pub layout: VisLayout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisLayout {
    pub improved_layout: bool,
    pub hierarchical: HierarchicalOptions,
}

/// The `layout.hierarchical` block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchicalOptions {
    pub enabled: bool,
    pub level_separation: u32,
    pub node_spacing: u32,
    pub tree_spacing: u32,
    pub direction: Direction,
    pub sort_method: SortMethod,
    pub shake_towards: ShakeTowards,
}

impl Default for VisLayout {
    fn default() -> Self {
        VisOptions::from(LayoutConfig::default()).layout
    }
}

impl From<LayoutConfig> for VisOptions {
    fn from(c: LayoutConfig) -> Self {
        Self {
            layout: VisLayout {
                improved_layout: c.improved_layout,
                hierarchical: HierarchicalOptions {
                    enabled: c.hierarchical,
                    level_separation: c.level_separation,
                    node_spacing: c.node_spacing,
                    tree_spacing: c.tree_spacing,
                    direction: c.direction,
                    sort_method: c.sort_method,
                    shake_towards: c.shake_towards,
                },
            },
        }
    }
}

impl From<VisOptions> for LayoutConfig {
    fn from(v: VisOptions) -> Self {
        let h = v.layout.hierarchical;
        Self {
            improved_layout: v.layout.improved_layout,
            hierarchical: h.enabled,
            level_separation: h.level_separation,
            node_spacing: h.node_spacing,
            tree_spacing: h.tree_spacing,
            direction: h.direction,
            sort_method: h.sort_method,
            shake_towards: h.shake_towards,
        }
    }
}
