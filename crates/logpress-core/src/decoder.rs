//! The `RecordDecoder` trait and the XML event decoder.
//!
//! The trait is object-safe so the batch engine can share one decoder
//! across worker tasks as `Arc<dyn RecordDecoder>`.

use crate::error::DecodeError;
use crate::event::{
    Comment, Data, Diff, Event, FileRef, Grant, PageRef, Parameter, Property, Request, Tag,
    User, Workflow, WorkflowData,
};
use crate::xml::{parse_root, Element};

/// Turns one raw record payload into an [`Event`].
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; one instance serves every
/// concurrently processed file.
pub trait RecordDecoder: Send + Sync {
    fn decode(&self, payload: &[u8]) -> Result<Event, DecodeError>;
}

/// Decodes `<event>` XML documents.
///
/// Known elements are mapped onto [`Event`] fields. Direct children of
/// `<event>` that match nothing are kept verbatim in `Event::unmapped`
/// instead of failing the record.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlEventDecoder;

impl XmlEventDecoder {
    pub const ROOT: &'static str = "event";

    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for XmlEventDecoder {
    fn decode(&self, payload: &[u8]) -> Result<Event, DecodeError> {
        let src = std::str::from_utf8(payload)?;
        let root = parse_root(src, Self::ROOT)?;
        Ok(event_from(&root, src))
    }
}

// ─── Element → Event mapping ─────────────────────────────────────────────────

fn event_from(root: &Element, src: &str) -> Event {
    let mut ev = Event {
        id: root.attr("id"),
        datetime: root.attr("datetime"),
        kind: root.attr("type"),
        cascading: root.attr("cascading"),
        wiki_id: root.attr("wikiid"),
        journaled: root.attr("journaled"),
        version: root.attr("version"),
        ..Event::default()
    };
    let mut unmapped = String::new();

    for child in &root.children {
        let text = || Some(child.text.clone());
        match child.name.as_str() {
            "request" => ev.request = Some(request_from(child, src)),
            "isimage" => ev.is_image = text(),
            "page" => ev.page = Some(page_from(child, src)),
            "file" => ev.file = Some(file_from(child)),
            "data" => ev.data = Some(data_from(child)),
            "diff" => ev.diff = Some(diff_from(child)),
            "create-reason" => ev.create_reason = text(),
            "create-reason-detail" => ev.create_reason_detail = text(),
            "user" => ev.user = Some(user_from(child)),
            "descendant.page" => ev.descendant_page = Some(page_from(child, src)),
            "root.copy.page" => ev.root_copy_page = Some(page_from(child, src)),
            "root.delete.page" => ev.root_delete_page = Some(page_from(child, src)),
            "root.page" => ev.root_page = Some(page_from(child, src)),
            "source.page" => ev.source_page = Some(page_from(child, src)),
            "from" => ev.from = text(),
            "to" => ev.to = text(),
            "revision" => ev.revision = text(),
            "revision.previous" => ev.revision_previous = text(),
            "revision.reverted" => ev.revision_reverted = text(),
            "comment" => ev.comment = Some(comment_from(child, src)),
            "tags-added" => ev.tags_added.extend(tags_from(child)),
            "tags-removed" => ev.tags_removed.extend(tags_from(child)),
            "property" => ev.property = Some(property_from(child)),
            "restriction-id" => ev.restriction_id = text(),
            "previous.restriction-id" => ev.previous_restriction_id = text(),
            "score" => ev.score = text(),
            "grant" => ev.grant = Some(grant_from(child)),
            "authmethod-password" => ev.auth_method_password = text(),
            "authmethod-apikey" => ev.auth_method_apikey = text(),
            "origin" => ev.origin = text(),
            "reason-type" => ev.reason_type = text(),
            "displayname.previous" => ev.display_name_previous = text(),
            "displayname.current" => ev.display_name_current = text(),
            "contenttype.previous" => ev.content_type_previous = text(),
            "contenttype.current" => ev.content_type_current = text(),
            "change-comment" => ev.change_comment = text(),
            "titlesegment.previous" => ev.title_segment_previous = text(),
            "titlesegment.current" => ev.title_segment_current = text(),
            "workflow" => ev.workflow = Some(workflow_from(child)),
            "update-reason" => ev.update_reason = text(),
            _ => unmapped.push_str(child.outer_xml(src)),
        }
    }

    if !unmapped.is_empty() {
        ev.unmapped = Some(unmapped);
    }
    ev
}

fn request_from(el: &Element, src: &str) -> Request {
    let parameters = el
        .children
        .iter()
        .filter(|c| c.name == "parameters")
        .flat_map(|p| p.children.iter().filter(|c| c.name == "param"))
        .map(|param| Parameter {
            name: param.attr("name").unwrap_or_default(),
            value: param.inner_xml(src).to_string(),
        })
        .collect();

    Request {
        id: el.attr("id"),
        seq: el.attr("seq"),
        count: el.attr("count"),
        signature: el.child_inner("signature", src),
        ip: el.child_inner("ip", src),
        session_id: el.child_inner("session-id", src),
        parameters,
        user: el.child("user").map(user_from),
    }
}

fn user_from(el: &Element) -> User {
    User {
        id: el.attr("id"),
        anonymous: el.attr("anonymous"),
        username: el.attr("username"),
        name: el.child_text("name"),
    }
}

fn page_from(el: &Element, src: &str) -> PageRef {
    PageRef {
        id: el.attr("id"),
        path: el.child_inner("path", src),
    }
}

fn file_from(el: &Element) -> FileRef {
    FileRef {
        id: el.attr("id"),
        res_id: el.attr("res-id"),
        filename: el.child_text("filename"),
    }
}

fn data_from(el: &Element) -> Data {
    Data {
        uri_host: el.child_text("_uri.host"),
        uri_scheme: el.child_text("_uri.scheme"),
        uri_query: el.child_text("_uri.query"),
        query: el.child_text("query"),
        constraint: el.child_text("constraint"),
    }
}

fn diff_from(el: &Element) -> Diff {
    Diff {
        added: el.child_text("added"),
        removed: el.child_text("removed"),
        attributes: el.child_text("attributes"),
        structural: el.child_text("structural"),
    }
}

fn comment_from(el: &Element, src: &str) -> Comment {
    let content = el.child("content");
    Comment {
        id: el.attr("id"),
        content_type: content.and_then(|c| c.attr("type")),
        content: content.map(|c| c.inner_xml(src).to_string()),
    }
}

fn tags_from(el: &Element) -> impl Iterator<Item = Tag> + '_ {
    el.children.iter().filter(|c| c.name == "tag").map(|tag| Tag {
        name: tag.child_text("name").unwrap_or_default(),
        kind: tag.child_text("type").unwrap_or_default(),
    })
}

fn property_from(el: &Element) -> Property {
    Property {
        id: el.child_text("id"),
        name: el.child_text("name"),
    }
}

fn grant_from(el: &Element) -> Grant {
    Grant {
        id: el.child_text("id"),
        kind: el.child_text("type"),
        role_id: el.child("role").and_then(|r| r.attr("id")),
        user_id: el.child("user").and_then(|u| u.attr("id")),
    }
}

fn workflow_from(el: &Element) -> Workflow {
    Workflow {
        name: el.attr("name"),
        uri_next: el.child_text("uri.next"),
        data: el.child("data").map(|d| WorkflowData {
            user_id: d.child_text("_userid"),
            username: d.child_text("_username"),
            customer_activity_id: d.child_text("_customeractivityid"),
            request_id: d.child_text("_requestid"),
            email: d.child_text("_email"),
            search: d.child_text("_search"),
            path: d.child_text("_path"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(src: &str) -> Result<Event, DecodeError> {
        XmlEventDecoder::new().decode(src.as_bytes())
    }

    const PAGE_EDIT: &str = r#"<event id="e1" datetime="2014-02-06T10:00:00Z" type="page:edit" cascading="false" wikiid="site_1" journaled="true" version="2">
  <request id="r1" seq="3" count="4">
    <signature>POST:pages/*/contents</signature>
    <ip>10.0.0.1</ip>
    <session-id>abc</session-id>
    <parameters><param name="edittime">20140206</param><param name="section">2</param></parameters>
    <user id="42" anonymous="false"/>
  </request>
  <page id="100"><path>Docs/Intro</path></page>
  <root.page id="1"><path>Docs</path></root.page>
  <revision>17</revision>
  <revision.previous>16</revision.previous>
</event>"#;

    #[test]
    fn decodes_page_edit() {
        let ev = decode(PAGE_EDIT).unwrap();
        assert_eq!(ev.id.as_deref(), Some("e1"));
        assert_eq!(ev.kind.as_deref(), Some("page:edit"));
        assert_eq!(ev.wiki_id.as_deref(), Some("site_1"));

        let req = ev.request.as_ref().unwrap();
        assert_eq!(req.seq.as_deref(), Some("3"));
        assert_eq!(req.signature.as_deref(), Some("POST:pages/*/contents"));
        assert_eq!(
            req.parameters,
            vec![Parameter::new("edittime", "20140206"), Parameter::new("section", "2")]
        );
        assert_eq!(req.user.as_ref().unwrap().id.as_deref(), Some("42"));

        assert_eq!(ev.page.as_ref().unwrap().path.as_deref(), Some("Docs/Intro"));
        assert_eq!(ev.root_page.as_ref().unwrap().id.as_deref(), Some("1"));
        assert!(ev.source_page.is_none());
        assert_eq!(ev.revision_previous.as_deref(), Some("16"));
        assert!(!ev.has_drift());
    }

    #[test]
    fn decodes_grant_and_tags() {
        let ev = decode(
            r#"<event id="g" type="grant:added">
                <grant><id>9</id><type>user</type><role id="4"/><user id="77"/></grant>
                <tags-added><tag><name>x</name><type>page</type></tag><tag><name>y</name><type>page</type></tag></tags-added>
                <tags-removed><tag><name>z</name><type>define</type></tag></tags-removed>
            </event>"#,
        )
        .unwrap();
        let grant = ev.grant.unwrap();
        assert_eq!(grant.kind.as_deref(), Some("user"));
        assert_eq!(grant.role_id.as_deref(), Some("4"));
        assert_eq!(grant.user_id.as_deref(), Some("77"));
        assert_eq!(ev.tags_added, vec![Tag::new("x", "page"), Tag::new("y", "page")]);
        assert_eq!(ev.tags_removed, vec![Tag::new("z", "define")]);
    }

    #[test]
    fn decodes_workflow_and_user() {
        let ev = decode(
            r#"<event type="workflow:submit">
                <user id="5" username="jo"><name>Jo</name></user>
                <workflow name="contact-us"><uri.next>/thanks</uri.next>
                  <data><_userid>5</_userid><_email>jo@example.com</_email><_path>/contact</_path></data>
                </workflow>
                <authmethod-password>true</authmethod-password>
            </event>"#,
        )
        .unwrap();
        let user = ev.user.unwrap();
        assert_eq!(user.username.as_deref(), Some("jo"));
        assert_eq!(user.name.as_deref(), Some("Jo"));
        let wf = ev.workflow.unwrap();
        assert_eq!(wf.name.as_deref(), Some("contact-us"));
        assert_eq!(wf.uri_next.as_deref(), Some("/thanks"));
        let data = wf.data.unwrap();
        assert_eq!(data.email.as_deref(), Some("jo@example.com"));
        assert_eq!(data.path.as_deref(), Some("/contact"));
        assert!(data.search.is_none());
        assert_eq!(ev.auth_method_password.as_deref(), Some("true"));
    }

    #[test]
    fn comment_content_keeps_inner_markup() {
        let ev = decode(
            r#"<event><comment id="3"><content type="text/html"><p>hi &amp; bye</p></content></comment></event>"#,
        )
        .unwrap();
        let comment = ev.comment.unwrap();
        assert_eq!(comment.content_type.as_deref(), Some("text/html"));
        assert_eq!(comment.content.as_deref(), Some("<p>hi &amp; bye</p>"));
    }

    #[test]
    fn scalar_text_is_unescaped_and_cdata_included() {
        let ev = decode(r#"<event><from>a &lt; b</from><to><![CDATA[x>y]]></to></event>"#).unwrap();
        assert_eq!(ev.from.as_deref(), Some("a < b"));
        assert_eq!(ev.to.as_deref(), Some("x>y"));
    }

    #[test]
    fn unknown_children_are_captured() {
        let ev = decode(r#"<event id="1"><mystery a="b">?</mystery><score>3</score><other/></event>"#)
            .unwrap();
        assert!(ev.has_drift());
        assert_eq!(
            ev.unmapped.as_deref(),
            Some(r#"<mystery a="b">?</mystery><other/>"#)
        );
        assert_eq!(ev.score.as_deref(), Some("3"));
    }

    #[test]
    fn update_reason_is_not_drift() {
        let ev = decode("<event><update-reason>moved</update-reason></event>").unwrap();
        assert_eq!(ev.update_reason.as_deref(), Some("moved"));
        assert!(!ev.has_drift());
    }

    #[test]
    fn prolog_is_skipped() {
        let ev = decode("<?xml version=\"1.0\"?>\n<!-- hi --><event id=\"p\"/>").unwrap();
        assert_eq!(ev.id.as_deref(), Some("p"));
    }

    #[test]
    fn wrong_root_is_rejected() {
        let err = decode("<page id=\"1\"/>").unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedRoot { ref found } if found == "page"));
    }

    #[test]
    fn malformed_xml_is_rejected() {
        assert!(decode("<event><page></event>").is_err());
        assert!(decode("not xml at all").is_err());
        assert!(decode("<event id=\"1></event>").is_err());
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = XmlEventDecoder::new()
            .decode(b"<event id=\"\xff\"/>")
            .unwrap_err();
        assert!(matches!(err, DecodeError::InvalidUtf8(_)));
    }
}
