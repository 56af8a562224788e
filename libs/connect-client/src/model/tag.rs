use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTagsForResourceRequest {
    pub resource_arn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListTagsForResourceResponse {
    #[serde(rename = "tags")]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagResourceRequest {
    pub resource_arn: String,
    /// Sent as lowercase `tags`, unlike the other members.
    #[serde(rename = "tags")]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UntagResourceRequest {
    pub resource_arn: String,
    pub tag_keys: Vec<String>,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::model::wire::{request, response};
    use http::Method;
    use serde_json::json;

    const ARN: &str = "arn:aws:connect:us-east-1:123456789012:instance/inst-1";
    const ARN_LABEL: &str = "arn%3Aaws%3Aconnect%3Aus-east-1%3A123456789012%3Ainstance%2Finst-1";

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn list_tags_for_resource_wire() {
        let (method, path, body) = request(&ListTagsForResourceRequest {
            resource_arn: ARN.to_owned(),
        });
        assert_eq!(method, Method::GET);
        assert_eq!(path, format!("/tags/{ARN_LABEL}"));
        assert_eq!(body, None);

        let out = response::<ListTagsForResourceRequest>(&json!({
            "tags": {"team": "blue", "cost center": "42"}
        }));
        assert_eq!(out.tags, tags(&[("team", "blue"), ("cost center", "42")]));
    }

    #[test]
    fn tag_resource_wire() {
        let (method, path, body) = request(&TagResourceRequest {
            resource_arn: ARN.to_owned(),
            tags: tags(&[("team", "blue"), ("tier", "gold")]),
        });
        assert_eq!(method, Method::POST);
        assert_eq!(path, format!("/tags/{ARN_LABEL}"));
        assert_eq!(body, Some(json!({"tags": {"team": "blue", "tier": "gold"}})));

        response::<TagResourceRequest>(&json!({}));
    }

    #[test]
    fn untag_resource_wire() {
        let (method, path, body) = request(&UntagResourceRequest {
            resource_arn: ARN.to_owned(),
            tag_keys: vec!["team".to_owned(), "cost center".to_owned()],
        });
        assert_eq!(method, Method::DELETE);
        assert_eq!(
            path,
            format!("/tags/{ARN_LABEL}?tagKeys=team&tagKeys=cost%20center")
        );
        assert_eq!(body, None);

        response::<UntagResourceRequest>(&json!({}));
    }
}
