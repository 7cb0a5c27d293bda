//! Raw and decoded event types.
//!
//! `Event` is deliberately one wide value object rather than a variant per
//! event kind: every kind is projected onto the same fixed row, so each field
//! is optional and absent fields simply flatten to an empty column.

/// One sentinel-delimited record as read from an input file.
/// This is the input to every decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Zero-based position of the record within its file
    pub index: u64,
    /// Byte offset of the first payload byte within the file
    pub offset: u64,
    /// Payload bytes, without the terminating NUL
    pub bytes: Vec<u8>,
}

impl RawRecord {
    /// Lossy UTF-8 view of the payload, used for diagnostics.
    pub fn lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// A fully decoded `<event>` record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub id: Option<String>,
    pub datetime: Option<String>,
    pub kind: Option<String>,
    pub cascading: Option<String>,
    pub wiki_id: Option<String>,
    pub journaled: Option<String>,
    pub version: Option<String>,

    pub request: Option<Request>,

    pub is_image: Option<String>,
    pub page: Option<PageRef>,
    pub file: Option<FileRef>,
    pub data: Option<Data>,
    pub diff: Option<Diff>,
    pub create_reason: Option<String>,
    pub create_reason_detail: Option<String>,
    pub user: Option<User>,

    pub descendant_page: Option<PageRef>,
    pub root_copy_page: Option<PageRef>,
    pub root_delete_page: Option<PageRef>,
    pub root_page: Option<PageRef>,
    pub source_page: Option<PageRef>,

    pub from: Option<String>,
    pub to: Option<String>,
    pub revision: Option<String>,
    pub revision_previous: Option<String>,
    pub revision_reverted: Option<String>,

    pub comment: Option<Comment>,
    /// Tags in document order
    pub tags_added: Vec<Tag>,
    /// Tags in document order
    pub tags_removed: Vec<Tag>,
    pub property: Option<Property>,
    pub restriction_id: Option<String>,
    pub previous_restriction_id: Option<String>,
    pub score: Option<String>,
    pub grant: Option<Grant>,

    pub auth_method_password: Option<String>,
    pub auth_method_apikey: Option<String>,
    pub origin: Option<String>,
    pub reason_type: Option<String>,
    pub display_name_previous: Option<String>,
    pub display_name_current: Option<String>,
    pub content_type_previous: Option<String>,
    pub content_type_current: Option<String>,
    pub change_comment: Option<String>,
    pub title_segment_previous: Option<String>,
    pub title_segment_current: Option<String>,
    pub workflow: Option<Workflow>,
    /// Decoded but not part of the output header.
    pub update_reason: Option<String>,

    /// Raw XML of every `<event>` child that matched no known field,
    /// concatenated in document order.
    pub unmapped: Option<String>,
}

impl Event {
    /// Returns `true` if the record carried content outside the known schema.
    pub fn has_drift(&self) -> bool {
        self.unmapped.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// The `<request>` block attached to most events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub id: Option<String>,
    pub seq: Option<String>,
    pub count: Option<String>,
    pub signature: Option<String>,
    pub ip: Option<String>,
    pub session_id: Option<String>,
    /// `<parameters><param name="..">..</param></parameters>` in document order
    pub parameters: Vec<Parameter>,
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A user reference. Request users carry `id`/`anonymous`; event users
/// carry `id`/`username`/`name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub id: Option<String>,
    pub anonymous: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
}

/// A page reference. The same shape appears under several roles
/// (`page`, `root.page`, `source.page`, ...), each stored independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRef {
    pub id: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRef {
    pub id: Option<String>,
    pub res_id: Option<String>,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Data {
    pub uri_host: Option<String>,
    pub uri_scheme: Option<String>,
    pub uri_query: Option<String>,
    pub query: Option<String>,
    pub constraint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    pub added: Option<String>,
    pub removed: Option<String>,
    pub attributes: Option<String>,
    pub structural: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub id: Option<String>,
    pub content_type: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub kind: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Property {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grant {
    pub id: Option<String>,
    pub kind: Option<String>,
    pub role_id: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workflow {
    pub name: Option<String>,
    pub uri_next: Option<String>,
    pub data: Option<WorkflowData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowData {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub customer_activity_id: Option<String>,
    pub request_id: Option<String>,
    pub email: Option<String>,
    pub search: Option<String>,
    pub path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drift_requires_non_empty_unmapped() {
        let mut ev = Event::default();
        assert!(!ev.has_drift());
        ev.unmapped = Some(String::new());
        assert!(!ev.has_drift());
        ev.unmapped = Some("<mystery/>".into());
        assert!(ev.has_drift());
    }

    #[test]
    fn raw_record_lossy_view() {
        let rec = RawRecord {
            index: 0,
            offset: 0,
            bytes: b"<event id=\"1\"/>".to_vec(),
        };
        assert_eq!(rec.lossy(), "<event id=\"1\"/>");
    }
}
