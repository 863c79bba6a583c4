use roxmltree::{Document, Node};

use crate::client::CatalogError;
use crate::request::ApiMethod;

/// Message used when the API reports failure without a comment, and for
/// 200 responses that are not parseable XML.
const NO_ERROR_MESSAGE: &str = "no error message provided";

/// Validate the API envelope.
///
/// A non-200 status is an error regardless of the body. A 200 body that
/// is not XML is reported as an API error with the default message (the
/// remote occasionally serves HTML error pages with a 200). A parsed
/// document whose top-level `result` field is `failure` is an API error
/// carrying the quoted `comment` text when one is present; any other
/// `result` value, or none at all, is success.
pub fn validate(status: u16, body: &str) -> Result<Document<'_>, CatalogError> {
    if status != 200 {
        return Err(CatalogError::RequestUnsuccessful);
    }

    let doc = Document::parse(body).map_err(|_| CatalogError::Api {
        message: NO_ERROR_MESSAGE.to_string(),
    })?;

    if let Some("failure") = top_level_text(&doc, "result").as_deref() {
        let message = match top_level_text(&doc, "comment") {
            Some(comment) if !comment.is_empty() => format!("\"{comment}\""),
            _ => NO_ERROR_MESSAGE.to_string(),
        };
        return Err(CatalogError::Api { message });
    }

    Ok(doc)
}

fn top_level_text(doc: &Document<'_>, tag: &str) -> Option<String> {
    let root = doc.root_element();
    let node = if root.has_tag_name(tag) {
        Some(root)
    } else {
        root.children().find(|n| n.has_tag_name(tag))
    };
    node.and_then(|n| n.text()).map(|t| t.trim().to_string())
}

/// One catalog entry, kept as an opaque attribute bag since the per-type
/// schema is owned by the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    /// Element name of the record (`video`, `playlist`, or `channel`).
    pub name: String,
    /// XML attributes of the record element, in document order.
    pub attributes: Vec<(String, String)>,
    /// Direct child elements with their text content, in document order.
    pub fields: Vec<(String, String)>,
}

impl ResultRecord {
    fn from_node(node: Node<'_, '_>) -> Self {
        let attributes = node
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect();
        let fields = node
            .children()
            .filter(Node::is_element)
            .map(|child| {
                (
                    child.tag_name().name().to_string(),
                    child.text().unwrap_or_default().trim().to_string(),
                )
            })
            .collect();
        Self {
            name: node.tag_name().name().to_string(),
            attributes,
            fields,
        }
    }

    /// Text of the first child element with the given name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Value of the first attribute with the given name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Pull the result records for a method out of a validated document.
///
/// Routing on [`ApiMethod`] is exhaustive, so every reachable method has
/// a node set. A missing `params` container means the API returned zero
/// results, not an error.
pub fn extract(method: ApiMethod, doc: &Document<'_>) -> Vec<ResultRecord> {
    // Playlists share the video_list container with videos. That is the
    // actual API shape, not a typo.
    let (container, record) = match method {
        ApiMethod::ListVideos => ("video_list", "video"),
        ApiMethod::ListPlaylists => ("video_list", "playlist"),
        ApiMethod::ListEmbeddableChannels => ("channel_list", "channel"),
    };

    doc.descendants()
        .filter(|n| n.has_tag_name("params"))
        .flat_map(move |params| params.children().filter(move |n| n.has_tag_name(container)))
        .flat_map(move |list| list.children().filter(move |n| n.has_tag_name(record)))
        .map(ResultRecord::from_node)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_200_is_request_unsuccessful() {
        let err = validate(500, "<response><result>ok</result></response>").unwrap_err();
        assert!(matches!(err, CatalogError::RequestUnsuccessful));
        assert_eq!(err.to_string(), "there was an error contacting the API");
    }

    #[test]
    fn unparsable_200_is_generic_api_error() {
        let err = validate(200, "<html>502 Bad Gateway").unwrap_err();
        match err {
            CatalogError::Api { message } => assert_eq!(message, NO_ERROR_MESSAGE),
            other => panic!("expected Api, got: {other}"),
        }
    }

    #[test]
    fn failure_with_comment_quotes_the_comment() {
        let body =
            "<response><result>failure</result><comment>Bad signature</comment></response>";
        match validate(200, body).unwrap_err() {
            CatalogError::Api { message } => assert_eq!(message, "\"Bad signature\""),
            other => panic!("expected Api, got: {other}"),
        }
    }

    #[test]
    fn failure_without_comment_uses_default_message() {
        let body = "<response><result>failure</result></response>";
        match validate(200, body).unwrap_err() {
            CatalogError::Api { message } => assert_eq!(message, "no error message provided"),
            other => panic!("expected Api, got: {other}"),
        }
    }

    #[test]
    fn failure_with_empty_comment_uses_default_message() {
        let body = "<response><result>failure</result><comment></comment></response>";
        match validate(200, body).unwrap_err() {
            CatalogError::Api { message } => assert_eq!(message, "no error message provided"),
            other => panic!("expected Api, got: {other}"),
        }
    }

    #[test]
    fn missing_result_is_success() {
        assert!(validate(200, "<response><params></params></response>").is_ok());
    }

    #[test]
    fn other_result_value_is_success() {
        assert!(validate(200, "<response><result>success</result></response>").is_ok());
    }

    const LISTING: &str = r#"<response><result>success</result><params>
        <video_list>
            <video id="1"><title>First</title></video>
            <video id="2"><title>Second</title></video>
            <playlist id="9"><title>Morning</title></playlist>
        </video_list>
        <channel_list>
            <channel id="7"><name>News 24</name></channel>
        </channel_list>
    </params></response>"#;

    #[test]
    fn extracts_videos_in_document_order() {
        let doc = Document::parse(LISTING).unwrap();
        let records = extract(ApiMethod::ListVideos, &doc);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].attribute("id"), Some("1"));
        assert_eq!(records[0].field("title"), Some("First"));
        assert_eq!(records[1].attribute("id"), Some("2"));
    }

    #[test]
    fn playlists_come_from_the_shared_container() {
        let doc = Document::parse(LISTING).unwrap();
        let records = extract(ApiMethod::ListPlaylists, &doc);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "playlist");
        assert_eq!(records[0].field("title"), Some("Morning"));
    }

    #[test]
    fn channels_come_from_channel_list() {
        let doc = Document::parse(LISTING).unwrap();
        let records = extract(ApiMethod::ListEmbeddableChannels, &doc);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field("name"), Some("News 24"));
    }

    #[test]
    fn missing_params_yields_empty_set() {
        let doc = Document::parse("<response><result>success</result></response>").unwrap();
        assert!(extract(ApiMethod::ListVideos, &doc).is_empty());
    }
}
