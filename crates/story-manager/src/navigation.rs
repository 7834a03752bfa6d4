//! Routes and story resolution
//!
//! Navigation never fails: anything that cannot be resolved is reported as a
//! [`NavOutcome`] and leaves the selection alone.

use std::fmt::{self, Display, Formatter};
use story_index::{sanitize, to_id, EntryKind, IndexEntry, IndexTree};
use story_store::ViewMode;

/// Path the UI is routed to after a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub view_mode: ViewMode,
    pub story_id: String,
    /// Set when the entry lives in a composed ref
    pub ref_id: Option<String>,
}

impl Route {
    #[must_use]
    pub fn new(view_mode: impl Into<ViewMode>, story_id: impl Into<String>) -> Self {
        Self {
            view_mode: view_mode.into(),
            story_id: story_id.into(),
            ref_id: None,
        }
    }

    /// Route showing a story or docs entry; `None` for containers
    #[must_use]
    pub fn for_entry(entry: &IndexEntry) -> Option<Self> {
        let (view_mode, leaf) = match entry {
            IndexEntry::Story(leaf) => (ViewMode::Story, leaf),
            IndexEntry::Docs(leaf) => (ViewMode::Docs, leaf),
            IndexEntry::Root(_) | IndexEntry::Group(_) | IndexEntry::Component(_) => return None,
        };
        Some(Self {
            view_mode,
            story_id: leaf.id.clone(),
            ref_id: leaf.ref_id.clone(),
        })
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.ref_id {
            Some(ref_id) => write!(f, "/{}/{}_{}", self.view_mode, ref_id, self.story_id),
            None => write!(f, "/{}/{}", self.view_mode, self.story_id),
        }
    }
}

/// Result of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Selection changed and the host was routed
    Navigated(Route),
    /// Target is already selected
    Unchanged,
    /// Nothing matches the request
    NotFound,
    /// Target would lie before the first or after the last entry
    OutOfRange,
}

impl NavOutcome {
    #[inline]
    #[must_use]
    pub fn is_navigated(&self) -> bool {
        matches!(self, Self::Navigated(_))
    }

    #[must_use]
    pub fn route(&self) -> Option<&Route> {
        match self {
            Self::Navigated(route) => Some(route),
            _ => None,
        }
    }
}

/// Resolve a `select_story` request to a story or docs entry
///
/// - no name: `title_or_id` as an id, then as a slug, then (when absent) the
///   current story's component; descends to the first leaf
/// - name only: `name` within the current story's component
/// - both: the id derived from title and name, then the component
///   `sanitize(title)` child whose name equals `name`
#[must_use]
pub fn resolve_story<'a>(
    tree: &'a IndexTree,
    current: Option<&str>,
    title_or_id: Option<&str>,
    name: Option<&str>,
) -> Option<&'a IndexEntry> {
    let kind_slug = current.map(story_index::kind_slug);

    match (title_or_id, name) {
        (Some(key), None) => {
            let entry = tree.get(key).or_else(|| tree.get(&sanitize(key)))?;
            first_leaf(tree, entry)
        }
        (None, None) => first_leaf(tree, tree.get(kind_slug?)?),
        (None, Some(name)) => {
            let id = to_id(kind_slug?, name).ok()?;
            resolve_story(tree, current, Some(&id), None)
        }
        (Some(title), Some(name)) => {
            if let Ok(id) = to_id(title, name) {
                if tree.contains(&id) {
                    return resolve_story(tree, current, Some(&id), None);
                }
            }
            // legacy component permalinks
            let component = tree.get(&sanitize(title))?;
            if component.kind() != EntryKind::Component {
                return None;
            }
            let child = component
                .children()?
                .iter()
                .find(|child| tree.get(child).is_some_and(|e| e.name() == name))?;
            resolve_story(tree, current, Some(child), None)
        }
    }
}

fn first_leaf<'a>(tree: &'a IndexTree, entry: &IndexEntry) -> Option<&'a IndexEntry> {
    let leaf = tree.find_leaf_entry(entry.id())?;
    tree.get(&leaf.id)
}
