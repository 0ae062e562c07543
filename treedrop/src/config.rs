//! Tree configuration and host overrides.

use serde::{Deserialize, Serialize};

use crate::open_ids::InitialOpen;

/// Resolved configuration for one tree.
///
/// Built from [`TreeConfig::default`] with the host's [`TreeOverrides`]
/// applied on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeConfig {
    /// Element tag used for a list of children.
    pub list_component: String,
    /// Element tag used for a single node.
    pub list_item_component: String,
    /// Element tag used for the drop placeholder.
    pub placeholder_component: String,
    /// Drag item types accepted besides tree nodes (native files, urls...).
    pub extra_accept_types: Vec<String>,
    /// When true only the parent is rewritten on drop and siblings are
    /// ordered at presentation time. When false drops reinsert by index.
    pub sort: bool,
    /// Presentation hint: list droppable nodes before leaves.
    pub insert_droppable_first: bool,
    /// Hit-test tolerance, in pixels, for "drop onto" versus "drop between".
    pub drop_target_offset: f32,
    /// Seed for the expand state.
    pub initial_open: InitialOpen,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            list_component: "ul".to_string(),
            list_item_component: "li".to_string(),
            placeholder_component: "li".to_string(),
            extra_accept_types: Vec::new(),
            sort: true,
            insert_droppable_first: true,
            drop_target_offset: 0.0,
            initial_open: InitialOpen::None,
        }
    }
}

impl TreeConfig {
    /// Apply host overrides on top of this configuration, field by field.
    pub fn merge(mut self, overrides: TreeOverrides) -> Self {
        let TreeOverrides {
            list_component,
            list_item_component,
            placeholder_component,
            extra_accept_types,
            sort,
            insert_droppable_first,
            drop_target_offset,
            initial_open,
        } = overrides;

        if let Some(v) = list_component {
            self.list_component = v;
        }
        if let Some(v) = list_item_component {
            self.list_item_component = v;
        }
        if let Some(v) = placeholder_component {
            self.placeholder_component = v;
        }
        if let Some(v) = extra_accept_types {
            self.extra_accept_types = v;
        }
        if let Some(v) = sort {
            self.sort = v;
        }
        if let Some(v) = insert_droppable_first {
            self.insert_droppable_first = v;
        }
        if let Some(v) = drop_target_offset {
            self.drop_target_offset = v;
        }
        if let Some(v) = initial_open {
            self.initial_open = v;
        }
        self
    }
}

/// Host-supplied configuration. `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeOverrides {
    pub list_component: Option<String>,
    pub list_item_component: Option<String>,
    pub placeholder_component: Option<String>,
    pub extra_accept_types: Option<Vec<String>>,
    pub sort: Option<bool>,
    pub insert_droppable_first: Option<bool>,
    pub drop_target_offset: Option<f32>,
    pub initial_open: Option<InitialOpen>,
}

impl TreeOverrides {
    /// Empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set sort mode.
    pub fn sort(mut self, sort: bool) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the initial expand state.
    pub fn initial_open(mut self, initial: InitialOpen) -> Self {
        self.initial_open = Some(initial);
        self
    }

    /// Set the hit-test tolerance.
    pub fn drop_target_offset(mut self, offset: f32) -> Self {
        self.drop_target_offset = Some(offset);
        self
    }

    /// Set the droppable-first presentation hint.
    pub fn insert_droppable_first(mut self, first: bool) -> Self {
        self.insert_droppable_first = Some(first);
        self
    }

    /// Accept additional drag item types.
    pub fn extra_accept_types(mut self, types: Vec<String>) -> Self {
        self.extra_accept_types = Some(types);
        self
    }

    /// Resolve against the built-in defaults.
    pub fn resolve(self) -> TreeConfig {
        TreeConfig::default().merge(self)
    }
}
