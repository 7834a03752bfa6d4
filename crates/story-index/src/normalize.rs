//! Entry normalization (first pass of tree construction)
//!
//! Walks raw entries in input order and creates the containers implied by
//! each title. The result is keyed by id in creation order; it is not yet in
//! sidebar order (see [`crate::builder::order_entries`]).

use crate::config::IndexConfig;
use crate::entry::{
    ContainerEntry, EntryId, EntryKind, EntryType, IndexEntry, LeafEntry, RawEntry,
};
use crate::error::IndexBuildError;
use crate::slug::{sanitize, split_title};
use indexmap::IndexMap;

/// Normalize raw entries into containers and leaves
///
/// # Errors
/// Returns an error if a title yields an unusable container id, if a
/// container id collides with a leaf id, or if one container id is reached
/// through two different parents.
pub fn normalize_entries<I>(
    entries: I,
    config: &IndexConfig,
) -> Result<IndexMap<EntryId, IndexEntry>, IndexBuildError>
where
    I: IntoIterator<Item = RawEntry>,
{
    let mut out: IndexMap<EntryId, IndexEntry> = IndexMap::new();

    for raw in entries {
        let names = split_title(&raw.title);
        let has_root = config.roots_enabled() && names.len() > 1;
        let paths = container_ids(&raw, &names)?;

        for (idx, id) in paths.iter().enumerate() {
            let child = paths.get(idx + 1).unwrap_or(&raw.id);
            let parent = idx.checked_sub(1).map(|p| paths[p].clone());
            let is_last = idx == paths.len() - 1;

            let requested = if has_root && idx == 0 {
                EntryKind::Root
            } else {
                match out.get(id).map(IndexEntry::kind) {
                    Some(EntryKind::Root) => EntryKind::Root,
                    Some(EntryKind::Group) => EntryKind::Group,
                    _ if is_last => EntryKind::Component,
                    _ => EntryKind::Group,
                }
            };

            upsert_container(&mut out, requested, id, &names[idx], parent, idx, config)?
                .push_child(child);
        }

        if let Some(existing) = out.get(&raw.id) {
            return Err(IndexBuildError::IdConflict {
                id: raw.id.clone(),
                existing: existing.kind(),
                requested: leaf_kind(&raw),
            });
        }

        // paths is never empty: split_title yields at least one segment
        let parent = paths[paths.len() - 1].clone();
        let kind = leaf_kind(&raw);
        let leaf = LeafEntry::from_raw(raw, parent, paths.len());
        let entry = match kind {
            EntryKind::Docs => IndexEntry::Docs(leaf),
            _ => IndexEntry::Story(leaf),
        };
        out.insert(entry.id().to_string(), entry);
    }

    Ok(out)
}

fn leaf_kind(raw: &RawEntry) -> EntryKind {
    match raw.entry_type {
        EntryType::Story => EntryKind::Story,
        EntryType::Docs => EntryKind::Docs,
    }
}

/// Container ids for each title segment: `sanitize(parent + "-" + name)`
fn container_ids(raw: &RawEntry, names: &[String]) -> Result<Vec<EntryId>, IndexBuildError> {
    let mut ids: Vec<EntryId> = Vec::with_capacity(names.len());
    for name in names {
        let id = match ids.last() {
            Some(parent) => sanitize(&format!("{parent}-{name}")),
            None => sanitize(name),
        };
        if id.is_empty() {
            return Err(IndexBuildError::EmptyPathSegment {
                entry_id: raw.id.clone(),
                title: raw.title.clone(),
            });
        }
        if ids.last() == Some(&id) {
            return Err(IndexBuildError::InvalidPathSegment {
                title: raw.title.clone(),
                segment: name.clone(),
                id,
            });
        }
        ids.push(id);
    }
    Ok(ids)
}

fn upsert_container<'a>(
    out: &'a mut IndexMap<EntryId, IndexEntry>,
    requested: EntryKind,
    id: &str,
    name: &str,
    parent: Option<EntryId>,
    depth: usize,
    config: &IndexConfig,
) -> Result<&'a mut ContainerEntry, IndexBuildError> {
    if let Some(existing) = out.get(id) {
        if existing.kind().is_container() && existing.parent() != parent.as_deref() {
            return Err(IndexBuildError::ContainerConflict {
                id: id.to_string(),
                existing: existing.kind(),
                requested,
            });
        }
    }

    let entry = out.entry(id.to_string()).or_insert_with(|| {
        let mut container = ContainerEntry::new(id.to_string(), name.to_string(), parent, depth);
        match requested {
            EntryKind::Root => {
                container.start_collapsed = config.collapsed_roots.iter().any(|r| r == id);
                IndexEntry::Root(container)
            }
            EntryKind::Group => IndexEntry::Group(container),
            _ => IndexEntry::Component(container),
        }
    });

    // a deeper title turns a component into a group, a rooted title turns a
    // top-level component or group into a root; children are kept
    let promote_to_root = match (requested, entry.kind()) {
        (EntryKind::Root, EntryKind::Component | EntryKind::Group) => true,
        (EntryKind::Group, EntryKind::Component) => false,
        _ => return into_container(entry, id, requested),
    };
    if let IndexEntry::Component(container) | IndexEntry::Group(container) = entry {
        let mut container = std::mem::take(container);
        *entry = if promote_to_root {
            container.start_collapsed = config.collapsed_roots.iter().any(|r| r == id);
            IndexEntry::Root(container)
        } else {
            IndexEntry::Group(container)
        };
    }
    into_container(entry, id, requested)
}

fn into_container<'a>(
    entry: &'a mut IndexEntry,
    id: &str,
    requested: EntryKind,
) -> Result<&'a mut ContainerEntry, IndexBuildError> {
    let existing = entry.kind();
    match entry {
        IndexEntry::Root(c) | IndexEntry::Group(c) | IndexEntry::Component(c) => Ok(c),
        IndexEntry::Story(_) | IndexEntry::Docs(_) => Err(IndexBuildError::IdConflict {
            id: id.to_string(),
            existing,
            requested,
        }),
    }
}
