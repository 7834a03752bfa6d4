//! Raw and normalized index entries
//!
//! [`RawEntry`] is the wire shape a project serves; [`IndexEntry`] is the
//! normalized sidebar node with parent/children/depth metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};

/// Entry identifier (`component-a--story-1`, `design-system`, ...)
pub type EntryId = String;

/// Story args, keyed by arg name
pub type Args = Map<String, Value>;

/// Story parameters, keyed by parameter name
pub type Parameters = Map<String, Value>;

/// Kind of leaf content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Rendered story
    #[default]
    Story,
    /// Documentation page
    Docs,
}

/// Entry as served by the index endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    /// Supplied id, never re-derived from the title
    pub id: EntryId,
    /// Slash-delimited path, kept verbatim
    pub title: String,
    /// Display name, kept verbatim
    pub name: String,
    /// Story or docs
    #[serde(rename = "type", default)]
    pub entry_type: EntryType,
    /// Module the entry is imported from
    #[serde(default)]
    pub import_path: String,
    /// Parameters, present when the entry is already prepared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
    /// Args, present when the entry is already prepared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Args>,
    /// Tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Imports of the stories a docs entry references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stories_imports: Vec<String>,
}

impl RawEntry {
    /// Create a story entry
    #[must_use]
    pub fn story(id: impl Into<String>, title: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            name: name.into(),
            entry_type: EntryType::Story,
            import_path: String::new(),
            parameters: None,
            args: None,
            tags: Vec::new(),
            stories_imports: Vec::new(),
        }
    }

    /// Create a docs entry
    #[must_use]
    pub fn docs(id: impl Into<String>, title: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            entry_type: EntryType::Docs,
            ..Self::story(id, title, name)
        }
    }

    /// With import path
    #[inline]
    #[must_use]
    pub fn with_import_path(mut self, import_path: impl Into<String>) -> Self {
        self.import_path = import_path.into();
        self
    }

    /// With parameters
    #[inline]
    #[must_use]
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// With args
    #[inline]
    #[must_use]
    pub fn with_args(mut self, args: Args) -> Self {
        self.args = Some(args);
        self
    }

    /// With tags
    #[inline]
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Discriminant of [`IndexEntry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Root,
    Group,
    Component,
    Story,
    Docs,
}

impl EntryKind {
    /// Lowercase name, as used on the wire and in routes
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Group => "group",
            Self::Component => "component",
            Self::Story => "story",
            Self::Docs => "docs",
        }
    }

    /// Whether the kind holds children
    #[inline]
    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(self, Self::Root | Self::Group | Self::Component)
    }
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root, group or component node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerEntry {
    pub id: EntryId,
    /// Trimmed path segment
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntryId>,
    pub depth: usize,
    /// First-seen ordered, no duplicates
    pub children: Vec<EntryId>,
    /// Roots listed in the sidebar's collapsed roots
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub start_collapsed: bool,
}

impl ContainerEntry {
    pub(crate) fn new(id: EntryId, name: String, parent: Option<EntryId>, depth: usize) -> Self {
        Self {
            id,
            name,
            parent,
            depth,
            children: Vec::new(),
            start_collapsed: false,
        }
    }

    pub(crate) fn push_child(&mut self, child: &str) {
        if !self.children.iter().any(|c| c == child) {
            self.children.push(child.to_string());
        }
    }
}

/// Story or docs node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafEntry {
    pub id: EntryId,
    /// Untrimmed title
    pub title: String,
    pub name: String,
    #[serde(default)]
    pub import_path: String,
    pub parent: EntryId,
    pub depth: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stories_imports: Vec<String>,
    #[serde(default)]
    pub prepared: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Args>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_args: Option<Args>,
    /// Set for entries that live in a composed ref
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
}

impl LeafEntry {
    pub(crate) fn from_raw(raw: RawEntry, parent: EntryId, depth: usize) -> Self {
        Self {
            prepared: raw.parameters.is_some(),
            id: raw.id,
            title: raw.title,
            name: raw.name,
            import_path: raw.import_path,
            parent,
            depth,
            tags: raw.tags,
            stories_imports: raw.stories_imports,
            parameters: raw.parameters,
            args: raw.args,
            initial_args: None,
            ref_id: None,
        }
    }

    /// Look up a single parameter
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.as_ref().and_then(|p| p.get(name))
    }

    /// Component part of the id (`a` for `a--1`)
    #[must_use]
    pub fn kind_slug(&self) -> &str {
        kind_slug(&self.id)
    }
}

/// Component part of a story id (`a` for `a--1`)
#[must_use]
pub fn kind_slug(story_id: &str) -> &str {
    story_id.split_once("--").map_or(story_id, |(kind, _)| kind)
}

/// Normalized sidebar node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IndexEntry {
    Root(ContainerEntry),
    Group(ContainerEntry),
    Component(ContainerEntry),
    Story(LeafEntry),
    Docs(LeafEntry),
}

impl IndexEntry {
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Root(_) => EntryKind::Root,
            Self::Group(_) => EntryKind::Group,
            Self::Component(_) => EntryKind::Component,
            Self::Story(_) => EntryKind::Story,
            Self::Docs(_) => EntryKind::Docs,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Root(c) | Self::Group(c) | Self::Component(c) => &c.id,
            Self::Story(l) | Self::Docs(l) => &l.id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Root(c) | Self::Group(c) | Self::Component(c) => &c.name,
            Self::Story(l) | Self::Docs(l) => &l.name,
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        match self {
            Self::Root(c) | Self::Group(c) | Self::Component(c) => c.parent.as_deref(),
            Self::Story(l) | Self::Docs(l) => Some(&l.parent),
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Root(c) | Self::Group(c) | Self::Component(c) => c.depth,
            Self::Story(l) | Self::Docs(l) => l.depth,
        }
    }

    /// Children of a container, `None` for leaves
    #[must_use]
    pub fn children(&self) -> Option<&[EntryId]> {
        match self {
            Self::Root(c) | Self::Group(c) | Self::Component(c) => Some(&c.children),
            Self::Story(_) | Self::Docs(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !self.kind().is_container()
    }

    #[must_use]
    pub fn as_container(&self) -> Option<&ContainerEntry> {
        match self {
            Self::Root(c) | Self::Group(c) | Self::Component(c) => Some(c),
            Self::Story(_) | Self::Docs(_) => None,
        }
    }

    #[must_use]
    pub fn as_leaf(&self) -> Option<&LeafEntry> {
        match self {
            Self::Story(l) | Self::Docs(l) => Some(l),
            Self::Root(_) | Self::Group(_) | Self::Component(_) => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut LeafEntry> {
        match self {
            Self::Story(l) | Self::Docs(l) => Some(l),
            Self::Root(_) | Self::Group(_) | Self::Component(_) => None,
        }
    }

    /// Only stories carry runtime args and prepared state across re-indexing
    #[must_use]
    pub fn as_story(&self) -> Option<&LeafEntry> {
        match self {
            Self::Story(l) => Some(l),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_entry_from_wire() {
        let raw: RawEntry = serde_json::from_value(json!({
            "type": "docs",
            "id": "component-b--docs",
            "title": "Component B",
            "name": "Docs",
            "importPath": "./path/to/component-b.ts",
            "storiesImports": [],
            "tags": ["stories-mdx"],
        }))
        .unwrap();

        assert_eq!(raw.entry_type, EntryType::Docs);
        assert_eq!(raw.import_path, "./path/to/component-b.ts");
        assert_eq!(raw.tags, vec!["stories-mdx".to_string()]);
        assert!(raw.parameters.is_none());
    }

    #[test]
    fn raw_entry_defaults_to_story() {
        let raw: RawEntry =
            serde_json::from_value(json!({ "id": "a--1", "title": "a", "name": "1" })).unwrap();
        assert_eq!(raw.entry_type, EntryType::Story);
    }

    #[test]
    fn index_entry_is_tagged_by_type() {
        let entry = IndexEntry::Component(ContainerEntry::new(
            "a".to_string(),
            "a".to_string(),
            None,
            0,
        ));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "component");
        assert_eq!(value["id"], "a");
        assert!(value.get("parent").is_none());
    }

    #[test]
    fn leaf_from_prepared_raw_is_prepared() {
        let mut params = Parameters::new();
        params.insert("parameter".to_string(), json!("exists"));
        let raw = RawEntry::story("prepared--story", "Prepared", "Story").with_parameters(params);

        let leaf = LeafEntry::from_raw(raw, "prepared".to_string(), 1);
        assert!(leaf.prepared);
        assert_eq!(leaf.parameter("parameter"), Some(&json!("exists")));
    }

    #[test]
    fn kind_slug_splits_on_double_dash() {
        assert_eq!(kind_slug("a--2"), "a");
        assert_eq!(kind_slug("b-c--1"), "b-c");
        assert_eq!(kind_slug("intro"), "intro");
    }

    #[test]
    fn container_children_are_unique() {
        let mut c = ContainerEntry::new("a".to_string(), "a".to_string(), None, 0);
        c.push_child("a--1");
        c.push_child("a--1");
        c.push_child("a--2");
        assert_eq!(c.children, vec!["a--1".to_string(), "a--2".to_string()]);
    }
}
