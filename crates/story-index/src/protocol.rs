//! Index protocol versions
//!
//! Every payload entering the workspace goes through [`IndexPayload::from_value`]:
//! - v4 `{ v: 4, entries }` is the canonical shape
//! - v3 `{ v: 3, stories }` is upgraded to v4
//! - v2 `{ v: 2, globalParameters, kindParameters, stories }` and
//!   v1 `{ stories }` are legacy and never reach the tree builder

use crate::entry::{Args, EntryType, Parameters, RawEntry};
use crate::error::ProtocolError;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Normalized index payload
#[derive(Debug, Clone, PartialEq)]
pub enum IndexPayload {
    /// Entry mapping (v4, or v3 upgraded), keyed as served
    Entries(IndexMap<String, RawEntry>),
    /// Legacy stories payload, routed to ref updates
    Legacy(LegacyStories),
}

/// Legacy bulk stories payloads
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyStories {
    /// `{ stories }`
    V1 { stories: IndexMap<String, Value> },
    /// `{ v: 2, globalParameters, kindParameters, stories }`
    V2 {
        global_parameters: Parameters,
        kind_parameters: IndexMap<String, Parameters>,
        stories: IndexMap<String, Value>,
    },
}

#[derive(Deserialize)]
struct V4Body {
    entries: IndexMap<String, RawEntry>,
}

#[derive(Deserialize)]
struct V3Body {
    stories: IndexMap<String, V3Entry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct V3Entry {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    name: String,
    #[serde(default)]
    import_path: String,
    #[serde(default)]
    parameters: Option<Parameters>,
    #[serde(default)]
    args: Option<Args>,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct V2Body {
    #[serde(default)]
    global_parameters: Parameters,
    #[serde(default)]
    kind_parameters: IndexMap<String, Parameters>,
    stories: IndexMap<String, Value>,
}

#[derive(Deserialize)]
struct V1Body {
    stories: IndexMap<String, Value>,
}

impl IndexPayload {
    /// Parse a payload from JSON text
    ///
    /// # Errors
    /// Returns an error if the text is not JSON or matches no known version.
    pub fn from_json_str(body: &str) -> Result<Self, ProtocolError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| ProtocolError::malformed(0, &e))?;
        Self::from_value(value)
    }

    /// Detect the protocol version and normalize
    ///
    /// # Errors
    /// Returns an error if the payload matches no known version.
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        let Value::Object(object) = value else {
            return Err(ProtocolError::NotAnObject);
        };

        let version = match object.get("v") {
            Some(v) => Some(v.as_u64().ok_or(ProtocolError::MissingVersion)?),
            None => None,
        };

        match version {
            Some(4) => {
                let body: V4Body = from_object(4, object)?;
                Ok(Self::Entries(body.entries))
            }
            Some(3) => {
                let body: V3Body = from_object(3, object)?;
                Ok(Self::Entries(upgrade_v3(body.stories)?))
            }
            Some(2) => {
                let body: V2Body = from_object(2, object)?;
                Ok(Self::Legacy(LegacyStories::V2 {
                    global_parameters: body.global_parameters,
                    kind_parameters: body.kind_parameters,
                    stories: body.stories,
                }))
            }
            Some(other) => Err(ProtocolError::UnsupportedVersion(other)),
            None if object.contains_key("stories") => {
                let body: V1Body = from_object(1, object)?;
                Ok(Self::Legacy(LegacyStories::V1 {
                    stories: body.stories,
                }))
            }
            None => Err(ProtocolError::MissingVersion),
        }
    }

    /// Protocol version the payload was served with (v3 reports 4)
    #[must_use]
    pub fn version(&self) -> u64 {
        match self {
            Self::Entries(_) => 4,
            Self::Legacy(LegacyStories::V2 { .. }) => 2,
            Self::Legacy(LegacyStories::V1 { .. }) => 1,
        }
    }

    /// Whether the payload can be fed to the tree builder
    #[inline]
    #[must_use]
    pub fn is_indexable(&self) -> bool {
        matches!(self, Self::Entries(_))
    }
}

fn from_object<T: for<'de> Deserialize<'de>>(
    version: u64,
    object: Map<String, Value>,
) -> Result<T, ProtocolError> {
    serde_json::from_value(Value::Object(object)).map_err(|e| ProtocolError::malformed(version, &e))
}

/// v3 entries carry `kind` and infer docs pages from parameters
fn upgrade_v3(
    stories: IndexMap<String, V3Entry>,
) -> Result<IndexMap<String, RawEntry>, ProtocolError> {
    let mut count_by_title: HashMap<String, usize> = HashMap::new();
    for entry in stories.values() {
        if let Some(title) = entry.title.as_ref().or(entry.kind.as_ref()) {
            *count_by_title.entry(title.clone()).or_default() += 1;
        }
    }

    let mut out = IndexMap::with_capacity(stories.len());
    for (key, entry) in stories {
        let title = entry
            .title
            .or(entry.kind)
            .ok_or_else(|| ProtocolError::MissingTitle(entry.id.clone()))?;

        let docs_only = entry
            .parameters
            .as_ref()
            .and_then(|p| p.get("docsOnly"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let lone_page = entry.name == "Page" && count_by_title.get(&title) == Some(&1);
        let entry_type = if docs_only || lone_page {
            EntryType::Docs
        } else {
            EntryType::Story
        };

        let tags = match (entry.tags, entry_type) {
            (Some(tags), _) => tags,
            (None, EntryType::Docs) => vec!["stories-mdx".to_string()],
            (None, EntryType::Story) => Vec::new(),
        };

        out.insert(
            key,
            RawEntry {
                id: entry.id,
                title,
                name: entry.name,
                entry_type,
                import_path: entry.import_path,
                parameters: entry.parameters,
                args: entry.args,
                tags,
                stories_imports: Vec::new(),
            },
        );
    }
    Ok(out)
}

impl LegacyStories {
    /// Stories as a composed ref stores them
    ///
    /// v1 stories are passed through; v2 stories get their parameters
    /// combined as global, then kind, then story parameters.
    #[must_use]
    pub fn into_set_stories_data(self) -> IndexMap<String, Value> {
        match self {
            Self::V1 { stories } => stories,
            Self::V2 {
                global_parameters,
                kind_parameters,
                stories,
            } => stories
                .into_iter()
                .map(|(id, mut story)| {
                    if let Value::Object(fields) = &mut story {
                        let empty = Parameters::new();
                        let kind = fields.get("kind").and_then(Value::as_str).unwrap_or("");
                        let kind_params = kind_parameters.get(kind).unwrap_or(&empty);
                        let story_params = match fields.get("parameters") {
                            Some(Value::Object(p)) => p.clone(),
                            _ => Parameters::new(),
                        };
                        let combined =
                            combine_parameters(&[&global_parameters, kind_params, &story_params]);
                        fields.insert("parameters".to_string(), Value::Object(combined));
                    }
                    (id, story)
                })
                .collect(),
        }
    }
}

/// Deep-merge parameter layers, later layers winning
///
/// Nested objects are merged key by key; any other value replaces what was
/// there. `null` never overrides an existing value.
#[must_use]
pub fn combine_parameters(layers: &[&Parameters]) -> Parameters {
    let mut out = Parameters::new();
    for layer in layers {
        merge_into(&mut out, layer);
    }
    out
}

fn merge_into(target: &mut Parameters, layer: &Parameters) {
    for (key, value) in layer {
        if value.is_null() && target.contains_key(key) {
            continue;
        }
        if let (Some(Value::Object(existing)), Value::Object(incoming)) =
            (target.get_mut(key), value)
        {
            merge_into(existing, incoming);
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Parameters {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn parses_v4() {
        let payload = IndexPayload::from_value(json!({
            "v": 4,
            "entries": {
                "a--1": { "type": "story", "id": "a--1", "title": "a", "name": "1", "importPath": "./a.ts" }
            }
        }))
        .unwrap();

        let IndexPayload::Entries(entries) = payload else {
            panic!("expected entries");
        };
        assert_eq!(entries["a--1"].title, "a");
    }

    #[test]
    fn upgrades_v3_kind_and_docs_pages() {
        let payload = IndexPayload::from_value(json!({
            "v": 3,
            "stories": {
                "intro--page": { "id": "intro--page", "kind": "Intro", "name": "Page", "importPath": "./intro.mdx" },
                "a--1": { "id": "a--1", "title": "a", "name": "1", "importPath": "./a.ts" },
                "a--docs": { "id": "a--docs", "title": "a", "name": "Docs", "parameters": { "docsOnly": true } }
            }
        }))
        .unwrap();

        let IndexPayload::Entries(entries) = payload else {
            panic!("expected entries");
        };
        assert_eq!(entries["intro--page"].title, "Intro");
        assert_eq!(entries["intro--page"].entry_type, EntryType::Docs);
        assert_eq!(entries["intro--page"].tags, vec!["stories-mdx".to_string()]);
        assert_eq!(entries["a--1"].entry_type, EntryType::Story);
        assert_eq!(entries["a--docs"].entry_type, EntryType::Docs);
    }

    #[test]
    fn v3_page_with_siblings_stays_a_story() {
        let payload = IndexPayload::from_value(json!({
            "v": 3,
            "stories": {
                "a--page": { "id": "a--page", "title": "a", "name": "Page" },
                "a--2": { "id": "a--2", "title": "a", "name": "2" }
            }
        }))
        .unwrap();

        let IndexPayload::Entries(entries) = payload else {
            panic!("expected entries");
        };
        assert_eq!(entries["a--page"].entry_type, EntryType::Story);
    }

    #[test]
    fn v3_without_title_or_kind_is_rejected() {
        let err = IndexPayload::from_value(json!({
            "v": 3,
            "stories": { "x": { "id": "x", "name": "1" } }
        }))
        .unwrap_err();
        assert_eq!(err, ProtocolError::MissingTitle("x".to_string()));
    }

    #[test]
    fn detects_legacy_versions() {
        let v1 = IndexPayload::from_value(json!({ "stories": { "a--1": {} } })).unwrap();
        assert_eq!(v1.version(), 1);
        assert!(!v1.is_indexable());

        let v2 = IndexPayload::from_value(json!({
            "v": 2,
            "globalParameters": {},
            "kindParameters": {},
            "stories": {}
        }))
        .unwrap();
        assert_eq!(v2.version(), 2);
    }

    #[test]
    fn rejects_unknown_shapes() {
        assert_eq!(
            IndexPayload::from_value(json!([])).unwrap_err(),
            ProtocolError::NotAnObject
        );
        assert_eq!(
            IndexPayload::from_value(json!({ "entries": {} })).unwrap_err(),
            ProtocolError::MissingVersion
        );
        assert_eq!(
            IndexPayload::from_value(json!({ "v": 9, "entries": {} })).unwrap_err(),
            ProtocolError::UnsupportedVersion(9)
        );
        assert!(matches!(
            IndexPayload::from_value(json!({ "v": 4 })).unwrap_err(),
            ProtocolError::Malformed { version: 4, .. }
        ));
    }

    #[test]
    fn v2_stories_get_combined_parameters() {
        let payload = IndexPayload::from_value(json!({
            "v": 2,
            "globalParameters": { "global": "global" },
            "kindParameters": { "a": { "kind": "kind" } },
            "stories": { "a--1": { "kind": "a", "parameters": { "story": "story" } } }
        }))
        .unwrap();

        let IndexPayload::Legacy(legacy) = payload else {
            panic!("expected legacy payload");
        };
        let data = legacy.into_set_stories_data();
        assert_eq!(
            data["a--1"],
            json!({ "kind": "a", "parameters": { "global": "global", "kind": "kind", "story": "story" } })
        );
    }

    #[test]
    fn v1_stories_pass_through() {
        let payload = IndexPayload::from_value(json!({ "stories": { "a--1": {} } })).unwrap();
        let IndexPayload::Legacy(legacy) = payload else {
            panic!("expected legacy payload");
        };
        assert_eq!(legacy.into_set_stories_data()["a--1"], json!({}));
    }

    #[test]
    fn combine_parameters_merges_nested_objects() {
        let global = params(json!({ "layout": "centered", "backgrounds": { "default": "light" } }));
        let story = params(json!({ "backgrounds": { "values": [1] }, "layout": null }));

        let combined = combine_parameters(&[&global, &story]);
        assert_eq!(
            Value::Object(combined),
            json!({ "layout": "centered", "backgrounds": { "default": "light", "values": [1] } })
        );
    }
}
