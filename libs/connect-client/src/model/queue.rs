use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum QueueStatus {
    Enabled,
    Disabled,
    #[serde(other)]
    Unknown,
}

/// Caller id shown on outbound calls placed from a queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OutboundCallerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbound_caller_id_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbound_caller_id_number_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbound_flow_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Queue {
    pub name: Option<String>,
    pub queue_arn: Option<String>,
    pub queue_id: Option<String>,
    pub description: Option<String>,
    pub outbound_caller_config: Option<OutboundCallerConfig>,
    pub hours_of_operation_id: Option<String>,
    pub max_contacts: Option<i32>,
    pub status: Option<QueueStatus>,
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateQueueRequest {
    pub instance_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbound_caller_config: Option<OutboundCallerConfig>,
    pub hours_of_operation_id: String,
    /// Maximum contacts waiting in the queue before it counts as full.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_contacts: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub quick_connect_ids: Vec<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreateQueueResponse {
    pub queue_arn: Option<String>,
    pub queue_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeQueueRequest {
    pub instance_id: String,
    pub queue_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeQueueResponse {
    pub queue: Option<Queue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteQueueRequest {
    pub instance_id: String,
    pub queue_id: String,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::model::wire::{request, response};
    use http::Method;
    use serde_json::json;

    #[test]
    fn create_queue_wire() {
        let (method, path, body) = request(&CreateQueueRequest {
            instance_id: "inst-1".to_owned(),
            name: "Support".to_owned(),
            description: Some("Tier 1".to_owned()),
            outbound_caller_config: Some(OutboundCallerConfig {
                outbound_caller_id_name: Some("Acme".to_owned()),
                outbound_flow_id: Some("cf-out".to_owned()),
                ..OutboundCallerConfig::default()
            }),
            hours_of_operation_id: "hoo-1".to_owned(),
            max_contacts: Some(50),
            quick_connect_ids: vec!["qc-1".to_owned()],
            tags: HashMap::from([("team".to_owned(), "blue".to_owned())]),
        });
        assert_eq!(method, Method::PUT);
        assert_eq!(path, "/queues/inst-1");
        assert_eq!(
            body,
            Some(json!({
                "Name": "Support",
                "Description": "Tier 1",
                "OutboundCallerConfig": {"OutboundCallerIdName": "Acme", "OutboundFlowId": "cf-out"},
                "HoursOfOperationId": "hoo-1",
                "MaxContacts": 50,
                "QuickConnectIds": ["qc-1"],
                "Tags": {"team": "blue"}
            }))
        );

        let out = response::<CreateQueueRequest>(&json!({
            "QueueArn": "arn:aws:connect:us-east-1:1:instance/inst-1/queue/q-1",
            "QueueId": "q-1"
        }));
        assert_eq!(
            out,
            CreateQueueResponse {
                queue_arn: Some("arn:aws:connect:us-east-1:1:instance/inst-1/queue/q-1".to_owned()),
                queue_id: Some("q-1".to_owned()),
            }
        );
    }

    #[test]
    fn describe_queue_wire() {
        let (method, path, body) = request(&DescribeQueueRequest {
            instance_id: "inst-1".to_owned(),
            queue_id: "q-1".to_owned(),
        });
        assert_eq!(method, Method::GET);
        assert_eq!(path, "/queues/inst-1/q-1");
        assert_eq!(body, None);

        let out = response::<DescribeQueueRequest>(&json!({
            "Queue": {
                "Name": "Support",
                "QueueArn": "arn:q-1",
                "QueueId": "q-1",
                "Description": "Tier 1",
                "HoursOfOperationId": "hoo-1",
                "MaxContacts": 50,
                "Status": "DISABLED",
                "Tags": {"team": "blue"}
            }
        }));
        assert_eq!(
            out.queue,
            Some(Queue {
                name: Some("Support".to_owned()),
                queue_arn: Some("arn:q-1".to_owned()),
                queue_id: Some("q-1".to_owned()),
                description: Some("Tier 1".to_owned()),
                outbound_caller_config: None,
                hours_of_operation_id: Some("hoo-1".to_owned()),
                max_contacts: Some(50),
                status: Some(QueueStatus::Disabled),
                tags: HashMap::from([("team".to_owned(), "blue".to_owned())]),
            })
        );
    }

    #[test]
    fn delete_queue_wire() {
        let (method, path, body) = request(&DeleteQueueRequest {
            instance_id: "inst-1".to_owned(),
            queue_id: "q 1".to_owned(),
        });
        assert_eq!(method, Method::DELETE);
        assert_eq!(path, "/queues/inst-1/q%201");
        assert_eq!(body, None);

        response::<DeleteQueueRequest>(&json!({}));
    }

    #[test]
    fn describe_queue_decodes_status_and_caller_config() {
        let out: DescribeQueueResponse = serde_json::from_value(json!({
            "Queue": {
                "Name": "Support",
                "QueueId": "q-1",
                "Status": "ENABLED",
                "MaxContacts": 50,
                "OutboundCallerConfig": {"OutboundCallerIdName": "Acme"}
            }
        }))
        .unwrap();

        let queue = out.queue.unwrap();
        assert_eq!(queue.status, Some(QueueStatus::Enabled));
        assert_eq!(queue.max_contacts, Some(50));
        assert_eq!(
            queue
                .outbound_caller_config
                .and_then(|c| c.outbound_caller_id_name)
                .as_deref(),
            Some("Acme")
        );
    }
}
