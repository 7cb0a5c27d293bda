//! The fixed output column schema.
//!
//! `HEADER` is the contract between the flattener and the CSV sink: every
//! output file starts with it and every row is positionally aligned with it.

/// Number of columns in every output row.
pub const COLUMN_COUNT: usize = 86;

/// Column names, in output order.
pub const HEADER: [&str; COLUMN_COUNT] = [
    "id",
    "datetime",
    "type",
    "cascading",
    "wikiid",
    "journaled",
    "version",
    "request.id",
    "request.seq",
    "request.count",
    "request.signature",
    "request.ip",
    "request.sessionid",
    "request.parameters",
    "request.user.id",
    "request.user.anonymous",
    "isimage",
    "page.id",
    "page.path",
    "file.id",
    "file.resid",
    "file.filename",
    "data._urihost",
    "data._urischeme",
    "data._uriquery",
    "diff.added",
    "diff.removed",
    "diff.attributes",
    "diff.structural",
    "createreason",
    "user.id",
    "user.name",
    "createreasondetail",
    "descendant.page.id",
    "descendant.page.path",
    "root.copy.page.id",
    "root.copy.page.path",
    "root.delete.page.id",
    "root.delete.page.path",
    "root.page.id",
    "root.page.path",
    "source.page.id",
    "source.page.path",
    "from",
    "to",
    "revision",
    "revision.previous",
    "revision.reverted",
    "comment.id",
    "comment.content.type",
    "comment.content",
    "tags.added",
    "tags.removed",
    "property.id",
    "property.name",
    "restriction.id",
    "previous.restriction.id",
    "score",
    "grant.id",
    "grant.type",
    "grant.role.id",
    "grant.user.id",
    "any",
    "user.username",
    "authmethodpassword",
    "authmethodapikey",
    "origin",
    "reasontype",
    "displayname.previous",
    "displayname.current",
    "contenttype.previous",
    "contenttype.current",
    "change-comment",
    "titlesegment.previous",
    "titlesegment.current",
    "data.query",
    "data.constraint",
    "workflow.name",
    "workflow.urinext",
    "workflow.data._userid",
    "workflow.data._username",
    "workflow.data._customeractivityid",
    "workflow.data._requestid",
    "workflow.data._email",
    "workflow.data._search",
    "workflow.data._path",
];

/// Position of the named column in `HEADER`.
pub fn column_index(name: &str) -> Option<usize> {
    HEADER.iter().position(|c| *c == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn column_names_are_unique() {
        let unique: HashSet<_> = HEADER.iter().collect();
        assert_eq!(unique.len(), COLUMN_COUNT);
    }

    #[test]
    fn header_bounds() {
        assert_eq!(HEADER[0], "id");
        assert_eq!(HEADER[COLUMN_COUNT - 1], "workflow.data._path");
        assert_eq!(column_index("request.parameters"), Some(13));
        assert_eq!(column_index("tags.added"), Some(51));
        assert_eq!(column_index("tags.removed"), Some(52));
        assert_eq!(column_index("any"), Some(62));
        assert_eq!(column_index("nope"), None);
    }
}
