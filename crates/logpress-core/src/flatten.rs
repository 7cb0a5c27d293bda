//! `RowFlattener`: projects an [`Event`] onto the fixed output schema.
//!
//! Flattening is total: any absent field or sub-entity becomes an empty
//! column, so every row has exactly [`COLUMN_COUNT`] values.

use crate::event::{Event, PageRef, Parameter, Tag};
use crate::schema::COLUMN_COUNT;

/// Separator between entries of a multi-valued column.
pub const ENTRY_SEPARATOR: char = ';';
/// Separator between a parameter's name and value.
pub const PARAM_SEPARATOR: char = ':';
/// Separator between a tag's name and type.
pub const TAG_SEPARATOR: char = '^';

/// One output row, positionally aligned with [`crate::schema::HEADER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedRow([String; COLUMN_COUNT]);

impl FlattenedRow {
    pub fn values(&self) -> &[String] {
        &self.0
    }

    /// Value of the named column, if the column exists.
    pub fn get(&self, column: &str) -> Option<&str> {
        crate::schema::column_index(column).map(|i| self.0[i].as_str())
    }
}

impl AsRef<[String]> for FlattenedRow {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}

/// Join request parameters as `name:value;name:value`.
pub fn join_parameters(params: &[Parameter]) -> String {
    join_pairs(params.iter().map(|p| (&p.name, &p.value)), PARAM_SEPARATOR)
}

/// Join tags as `name^type;name^type`.
pub fn join_tags(tags: &[Tag]) -> String {
    join_pairs(tags.iter().map(|t| (&t.name, &t.kind)), TAG_SEPARATOR)
}

fn join_pairs<'a>(pairs: impl Iterator<Item = (&'a String, &'a String)>, sep: char) -> String {
    let mut out = String::new();
    for (i, (left, right)) in pairs.enumerate() {
        if i > 0 {
            out.push(ENTRY_SEPARATOR);
        }
        out.push_str(left);
        out.push(sep);
        out.push_str(right);
    }
    out
}

fn s(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

fn sub<T, F>(entity: Option<&T>, field: F) -> String
where
    F: Fn(&T) -> &Option<String>,
{
    entity.and_then(|e| field(e).clone()).unwrap_or_default()
}

fn page_id(page: &Option<PageRef>) -> String {
    sub(page.as_ref(), |p| &p.id)
}

fn page_path(page: &Option<PageRef>) -> String {
    sub(page.as_ref(), |p| &p.path)
}

/// Flatten one event into a row. Never fails.
pub fn flatten(ev: &Event) -> FlattenedRow {
    let req = ev.request.as_ref();
    let req_user = req.and_then(|r| r.user.as_ref());
    let workflow_data = ev.workflow.as_ref().and_then(|w| w.data.as_ref());

    FlattenedRow([
        s(&ev.id),
        s(&ev.datetime),
        s(&ev.kind),
        s(&ev.cascading),
        s(&ev.wiki_id),
        s(&ev.journaled),
        s(&ev.version),
        sub(req, |r| &r.id),
        sub(req, |r| &r.seq),
        sub(req, |r| &r.count),
        sub(req, |r| &r.signature),
        sub(req, |r| &r.ip),
        sub(req, |r| &r.session_id),
        req.map(|r| join_parameters(&r.parameters)).unwrap_or_default(),
        sub(req_user, |u| &u.id),
        sub(req_user, |u| &u.anonymous),
        s(&ev.is_image),
        page_id(&ev.page),
        page_path(&ev.page),
        sub(ev.file.as_ref(), |f| &f.id),
        sub(ev.file.as_ref(), |f| &f.res_id),
        sub(ev.file.as_ref(), |f| &f.filename),
        sub(ev.data.as_ref(), |d| &d.uri_host),
        sub(ev.data.as_ref(), |d| &d.uri_scheme),
        sub(ev.data.as_ref(), |d| &d.uri_query),
        sub(ev.diff.as_ref(), |d| &d.added),
        sub(ev.diff.as_ref(), |d| &d.removed),
        sub(ev.diff.as_ref(), |d| &d.attributes),
        sub(ev.diff.as_ref(), |d| &d.structural),
        s(&ev.create_reason),
        sub(ev.user.as_ref(), |u| &u.id),
        sub(ev.user.as_ref(), |u| &u.name),
        s(&ev.create_reason_detail),
        page_id(&ev.descendant_page),
        page_path(&ev.descendant_page),
        page_id(&ev.root_copy_page),
        page_path(&ev.root_copy_page),
        page_id(&ev.root_delete_page),
        page_path(&ev.root_delete_page),
        page_id(&ev.root_page),
        page_path(&ev.root_page),
        page_id(&ev.source_page),
        page_path(&ev.source_page),
        s(&ev.from),
        s(&ev.to),
        s(&ev.revision),
        s(&ev.revision_previous),
        s(&ev.revision_reverted),
        sub(ev.comment.as_ref(), |c| &c.id),
        sub(ev.comment.as_ref(), |c| &c.content_type),
        sub(ev.comment.as_ref(), |c| &c.content),
        join_tags(&ev.tags_added),
        join_tags(&ev.tags_removed),
        sub(ev.property.as_ref(), |p| &p.id),
        sub(ev.property.as_ref(), |p| &p.name),
        s(&ev.restriction_id),
        s(&ev.previous_restriction_id),
        s(&ev.score),
        sub(ev.grant.as_ref(), |g| &g.id),
        sub(ev.grant.as_ref(), |g| &g.kind),
        sub(ev.grant.as_ref(), |g| &g.role_id),
        sub(ev.grant.as_ref(), |g| &g.user_id),
        s(&ev.unmapped),
        sub(ev.user.as_ref(), |u| &u.username),
        s(&ev.auth_method_password),
        s(&ev.auth_method_apikey),
        s(&ev.origin),
        s(&ev.reason_type),
        s(&ev.display_name_previous),
        s(&ev.display_name_current),
        s(&ev.content_type_previous),
        s(&ev.content_type_current),
        s(&ev.change_comment),
        s(&ev.title_segment_previous),
        s(&ev.title_segment_current),
        sub(ev.data.as_ref(), |d| &d.query),
        sub(ev.data.as_ref(), |d| &d.constraint),
        sub(ev.workflow.as_ref(), |w| &w.name),
        sub(ev.workflow.as_ref(), |w| &w.uri_next),
        sub(workflow_data, |d| &d.user_id),
        sub(workflow_data, |d| &d.username),
        sub(workflow_data, |d| &d.customer_activity_id),
        sub(workflow_data, |d| &d.request_id),
        sub(workflow_data, |d| &d.email),
        sub(workflow_data, |d| &d.search),
        sub(workflow_data, |d| &d.path),
    ])
}
