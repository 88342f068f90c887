use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::error::MalformedIndexError;
use super::legacy;

/// What a documented symbol is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Package,
    Class,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Package => "package",
            EntryKind::Class => "class",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "package" => Ok(EntryKind::Package),
            "class" => Ok(EntryKind::Class),
            other => Err(format!("unknown entry type '{}'", other)),
        }
    }
}

/// One documented package or class and the page that documents it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocEntry {
    pub id: usize,
    pub label: String,
    pub link: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl DocEntry {
    /// Last segment of the label (`Rocoto` for `org.nnsoft.guice.rocoto.Rocoto`)
    pub fn simple_name(&self) -> &str {
        self.label
            .rsplit_once('.')
            .map(|(_, name)| name)
            .unwrap_or(&self.label)
    }

    /// Package a class belongs to. Packages have no parent.
    pub fn parent(&self) -> Option<&str> {
        match self.kind {
            EntryKind::Class => self.label.rsplit_once('.').map(|(pkg, _)| pkg),
            EntryKind::Package => None,
        }
    }
}

/// Ordered, validated, read-only list of doc entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocIndex {
    entries: Vec<DocEntry>,
    /// Map from label to position
    labels: HashMap<String, usize>,
}

impl DocIndex {
    /// Validate a sequence of entries and build the label lookup
    pub fn from_entries(entries: Vec<DocEntry>) -> Result<Self, MalformedIndexError> {
        let mut labels = HashMap::with_capacity(entries.len());

        {
            let mut links: HashMap<&str, usize> = HashMap::with_capacity(entries.len());

            for (position, entry) in entries.iter().enumerate() {
                if entry.id != position {
                    return Err(MalformedIndexError::IdMismatch {
                        position,
                        id: entry.id,
                    });
                }
                if entry.label.is_empty() {
                    return Err(MalformedIndexError::EmptyField {
                        id: entry.id,
                        field: "label",
                    });
                }
                if entry.link.is_empty() {
                    return Err(MalformedIndexError::EmptyField {
                        id: entry.id,
                        field: "link",
                    });
                }
                if let Some(first) = labels.insert(entry.label.clone(), position) {
                    return Err(MalformedIndexError::DuplicateLabel {
                        label: entry.label.clone(),
                        first,
                        second: position,
                    });
                }
                if let Some(first) = links.insert(entry.link.as_str(), position) {
                    return Err(MalformedIndexError::DuplicateLink {
                        link: entry.link.clone(),
                        first,
                        second: position,
                    });
                }
            }
        }

        Ok(DocIndex { entries, labels })
    }

    /// Parse a JSON array of entries
    pub fn from_json(json: &str) -> Result<Self, MalformedIndexError> {
        let entries: Vec<DocEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Load an index file. `.js` files are read as the generator's script format.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, MalformedIndexError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| MalformedIndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let index = if path.extension().is_some_and(|ext| ext == "js") {
            legacy::parse(&content)?
        } else {
            Self::from_json(&content)?
        };

        tracing::debug!(path = %path.display(), entries = index.len(), "index file loaded");
        Ok(index)
    }

    pub fn entries(&self) -> &[DocEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DocEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookup by id. Ids are positions, so this is a plain index.
    pub fn get(&self, id: usize) -> Option<&DocEntry> {
        self.entries.get(id)
    }

    /// Lookup by fully qualified label
    pub fn get_by_label(&self, label: &str) -> Option<&DocEntry> {
        self.labels.get(label).map(|&idx| &self.entries[idx])
    }

    pub fn by_kind(&self, kind: EntryKind) -> impl Iterator<Item = &DocEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    pub fn packages(&self) -> impl Iterator<Item = &DocEntry> {
        self.by_kind(EntryKind::Package)
    }

    pub fn classes(&self) -> impl Iterator<Item = &DocEntry> {
        self.by_kind(EntryKind::Class)
    }

    /// Classes declared directly in `package`, in index order
    pub fn classes_in_package(&self, package: &str) -> Vec<&DocEntry> {
        self.classes()
            .filter(|e| e.parent() == Some(package))
            .collect()
    }

    /// Package entry of a class, if the index documents that package
    pub fn package_of(&self, entry: &DocEntry) -> Option<&DocEntry> {
        entry
            .parent()
            .and_then(|pkg| self.get_by_label(pkg))
            .filter(|e| e.kind == EntryKind::Package)
    }

    /// Case-insensitive substring match over labels, in index order
    pub fn search(&self, query: &str) -> Vec<&DocEntry> {
        let query_lower = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.label.to_lowercase().contains(&query_lower))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }

    /// SHA-256 of the compact JSON form, identifying one documentation build
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_vec(&self.entries)?;
        let mut hasher = Sha256::new();
        hasher.update(json);
        Ok(format!("{:x}", hasher.finalize()))
    }
}

impl<'a> IntoIterator for &'a DocIndex {
    type Item = &'a DocEntry;
    type IntoIter = std::slice::Iter<'a, DocEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for DocIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DocIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<DocEntry>::deserialize(deserializer)?;
        DocIndex::from_entries(entries).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: usize, label: &str, link: &str, kind: EntryKind) -> DocEntry {
        DocEntry {
            id,
            label: label.to_string(),
            link: link.to_string(),
            kind,
        }
    }

    fn sample() -> DocIndex {
        DocIndex::from_entries(vec![
            entry(0, "org.acme", "org/acme/package-summary.html", EntryKind::Package),
            entry(1, "org.acme.Widget", "org/acme/Widget.html", EntryKind::Class),
            entry(2, "org.acme.util", "org/acme/util/package-summary.html", EntryKind::Package),
            entry(3, "org.acme.util.Gadget", "org/acme/util/Gadget.html", EntryKind::Class),
            entry(4, "org.acme.util.WidgetHelper", "org/acme/util/WidgetHelper.html", EntryKind::Class),
        ])
        .expect("sample index is valid")
    }

    #[test]
    fn test_empty_array() {
        let index = DocIndex::from_json("[]").unwrap();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert!(index.get(0).is_none());
    }

    #[test]
    fn test_parse_entry_fields() {
        let json = r#"[
            { "id": 0, "label": "org.acme", "link": "org/acme/package-summary.html", "type": "package" },
            { "id": 1, "label": "org.acme.Widget", "link": "org/acme/Widget.html", "type": "class" }
        ]"#;
        let index = DocIndex::from_json(json).unwrap();
        assert_eq!(index.len(), 2);

        let widget = index.get(1).unwrap();
        assert_eq!(widget.label, "org.acme.Widget");
        assert_eq!(widget.link, "org/acme/Widget.html");
        assert_eq!(widget.kind, EntryKind::Class);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let json = r#"[
            { "id": 0, "label": "a", "link": "a.html", "type": "package" },
            { "id": 0, "label": "b", "link": "b.html", "type": "class" }
        ]"#;
        let err = DocIndex::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            MalformedIndexError::IdMismatch { position: 1, id: 0 }
        ));
    }

    #[test]
    fn test_ids_must_start_at_zero() {
        let err = DocIndex::from_entries(vec![entry(1, "a", "a.html", EntryKind::Class)])
            .unwrap_err();
        assert!(matches!(
            err,
            MalformedIndexError::IdMismatch { position: 0, id: 1 }
        ));
    }

    #[test]
    fn test_empty_fields_rejected() {
        let err = DocIndex::from_entries(vec![entry(0, "", "a.html", EntryKind::Class)])
            .unwrap_err();
        assert!(matches!(
            err,
            MalformedIndexError::EmptyField { id: 0, field: "label" }
        ));

        let err = DocIndex::from_entries(vec![entry(0, "a", "", EntryKind::Class)])
            .unwrap_err();
        assert!(matches!(
            err,
            MalformedIndexError::EmptyField { id: 0, field: "link" }
        ));
    }

    #[test]
    fn test_duplicate_label_and_link_rejected() {
        let err = DocIndex::from_entries(vec![
            entry(0, "a", "a.html", EntryKind::Class),
            entry(1, "a", "b.html", EntryKind::Class),
        ])
        .unwrap_err();
        match err {
            MalformedIndexError::DuplicateLabel {
                label,
                first,
                second,
            } => {
                assert_eq!(label, "a");
                assert_eq!((first, second), (0, 1));
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = DocIndex::from_entries(vec![
            entry(0, "a", "same.html", EntryKind::Class),
            entry(1, "b", "same.html", EntryKind::Class),
        ])
        .unwrap_err();
        assert!(matches!(err, MalformedIndexError::DuplicateLink { .. }));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let json = r#"[{ "id": 0, "label": "a", "link": "a.html", "type": "method" }]"#;
        let err = DocIndex::from_json(json).unwrap_err();
        assert!(matches!(err, MalformedIndexError::Parse(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = r#"[{ "id": 0, "label": "a", "link": "a.html", "type": "class", "extra": 1 }]"#;
        assert!(matches!(
            DocIndex::from_json(json),
            Err(MalformedIndexError::Parse(_))
        ));
    }

    #[test]
    fn test_truncated_json_rejected() {
        let json = r#"[{ "id": 0, "label": "a", "link": "a.ht"#;
        assert!(matches!(
            DocIndex::from_json(json),
            Err(MalformedIndexError::Parse(_))
        ));
        assert!(DocIndex::from_json("").is_err());
        assert!(DocIndex::from_json(r#"{"id": 0}"#).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let index = sample();
        let json = index.to_json().unwrap();
        let reparsed = DocIndex::from_json(&json).unwrap();
        assert_eq!(reparsed, index);
        assert_eq!(reparsed.entries(), index.entries());

        let pretty = index.to_json_pretty().unwrap();
        assert_eq!(DocIndex::from_json(&pretty).unwrap(), index);
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let bad = r#"[{ "id": 5, "label": "a", "link": "a.html", "type": "class" }]"#;
        assert!(serde_json::from_str::<DocIndex>(bad).is_err());

        let good = serde_json::to_string(&sample()).unwrap();
        assert_eq!(serde_json::from_str::<DocIndex>(&good).unwrap(), sample());
    }

    #[test]
    fn test_lookups() {
        let index = sample();

        assert_eq!(index.get(3).unwrap().label, "org.acme.util.Gadget");
        assert_eq!(index.get_by_label("org.acme.Widget").unwrap().id, 1);
        assert!(index.get_by_label("org.acme.Missing").is_none());

        assert_eq!(index.packages().count(), 2);
        assert_eq!(index.classes().count(), 3);

        let util: Vec<_> = index
            .classes_in_package("org.acme.util")
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(util, vec![3, 4]);
        assert_eq!(index.classes_in_package("org.acme").len(), 1);
    }

    #[test]
    fn test_names_and_parents() {
        let index = sample();
        let gadget = index.get(3).unwrap();
        assert_eq!(gadget.simple_name(), "Gadget");
        assert_eq!(gadget.parent(), Some("org.acme.util"));
        assert_eq!(index.package_of(gadget).unwrap().id, 2);

        let pkg = index.get(0).unwrap();
        assert_eq!(pkg.simple_name(), "acme");
        assert_eq!(pkg.parent(), None);
        assert!(index.package_of(pkg).is_none());
    }

    #[test]
    fn test_search_is_case_insensitive_and_ordered() {
        let index = sample();
        let ids: Vec<_> = index.search("widget").iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 4]);
        assert!(index.search("nothing-like-this").is_empty());
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = sample();
        let b = sample();
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);

        let other = DocIndex::from_entries(vec![entry(0, "x", "x.html", EntryKind::Class)])
            .unwrap();
        assert_ne!(a.fingerprint().unwrap(), other.fingerprint().unwrap());
    }

    #[test]
    fn test_entry_kind_parse() {
        assert_eq!("package".parse::<EntryKind>(), Ok(EntryKind::Package));
        assert_eq!("class".parse::<EntryKind>(), Ok(EntryKind::Class));
        assert!("interface".parse::<EntryKind>().is_err());
        assert_eq!(EntryKind::Class.to_string(), "class");
    }
}
