//! Real-time and historical metric queries.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum Channel {
    Voice,
    Chat,
    Task,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum Grouping {
    Queue,
    Channel,
    RoutingProfile,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum Unit {
    Seconds,
    Count,
    Percent,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum Statistic {
    Sum,
    Max,
    Avg,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum Comparison {
    Lt,
    #[serde(other)]
    Unknown,
}

/// Resources to restrict a metric query to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Filters {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub queues: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<Channel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub routing_profiles: Vec<String>,
}

/// A real-time metric, such as `AGENTS_ONLINE` or `CONTACTS_IN_QUEUE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CurrentMetric {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Threshold {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_value: Option<f64>,
}

/// A historical metric, such as `CONTACTS_HANDLED` or `SERVICE_LEVEL`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HistoricalMetric {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Threshold>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistic: Option<Statistic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct QueueReference {
    pub id: Option<String>,
    pub arn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RoutingProfileReference {
    pub id: Option<String>,
    pub arn: Option<String>,
}

/// The grouping values a metric result belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Dimensions {
    pub queue: Option<QueueReference>,
    pub channel: Option<Channel>,
    pub routing_profile: Option<RoutingProfileReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetCurrentMetricDataRequest {
    pub instance_id: String,
    pub filters: Option<Filters>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groupings: Vec<Grouping>,
    pub current_metrics: Vec<CurrentMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CurrentMetricData {
    pub metric: Option<CurrentMetric>,
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CurrentMetricResult {
    pub dimensions: Option<Dimensions>,
    pub collections: Vec<CurrentMetricData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GetCurrentMetricDataResponse {
    pub next_token: Option<String>,
    pub metric_results: Vec<CurrentMetricResult>,
    #[serde(with = "crate::timestamp::option")]
    pub data_snapshot_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetMetricDataRequest {
    pub instance_id: String,
    /// Must fall on a 5 minute boundary within the last 24 hours.
    #[serde(with = "crate::timestamp::option")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(with = "crate::timestamp::option")]
    pub end_time: Option<DateTime<Utc>>,
    pub filters: Option<Filters>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groupings: Vec<Grouping>,
    pub historical_metrics: Vec<HistoricalMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HistoricalMetricData {
    pub metric: Option<HistoricalMetric>,
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HistoricalMetricResult {
    pub dimensions: Option<Dimensions>,
    pub collections: Vec<HistoricalMetricData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GetMetricDataResponse {
    pub next_token: Option<String>,
    pub metric_results: Vec<HistoricalMetricResult>,
}

/// Filter key (`QUEUE`, `ROUTING_PROFILE`, `AGENT`, `CHANNEL`, ...) and its values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FilterV2 {
    pub filter_key: Option<String>,
    pub filter_values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ThresholdV2 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MetricFilterV2 {
    pub metric_filter_key: Option<String>,
    pub metric_filter_values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MetricV2 {
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub threshold: Vec<ThresholdV2>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metric_filters: Vec<MetricFilterV2>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetMetricDataV2Request {
    /// ARN of the instance.
    pub resource_arn: String,
    #[serde(with = "crate::timestamp::option")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(with = "crate::timestamp::option")]
    pub end_time: Option<DateTime<Utc>>,
    pub filters: Vec<FilterV2>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groupings: Vec<String>,
    pub metrics: Vec<MetricV2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MetricDataV2 {
    pub metric: Option<MetricV2>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MetricResultV2 {
    /// Grouping key to value, for example `QUEUE` to a queue id.
    pub dimensions: HashMap<String, String>,
    pub collections: Vec<MetricDataV2>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GetMetricDataV2Response {
    pub next_token: Option<String>,
    pub metric_results: Vec<MetricResultV2>,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::model::wire::{request, response};
    use chrono::TimeZone;
    use http::Method;
    use serde_json::json;

    fn at(secs: i64) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(secs, 0).single()
    }

    #[test]
    fn get_current_metric_data_wire() {
        let (method, path, body) = request(&GetCurrentMetricDataRequest {
            instance_id: "inst-1".to_owned(),
            filters: Some(Filters {
                queues: vec!["q-1".to_owned()],
                channels: vec![Channel::Voice, Channel::Chat],
                ..Filters::default()
            }),
            groupings: vec![Grouping::Queue],
            current_metrics: vec![CurrentMetric {
                name: "AGENTS_ONLINE".to_owned(),
                unit: Some(Unit::Count),
            }],
            next_token: Some("t1".to_owned()),
            max_results: Some(10),
        });
        assert_eq!(method, Method::POST);
        assert_eq!(path, "/metrics/current/inst-1");
        assert_eq!(
            body,
            Some(json!({
                "Filters": {"Queues": ["q-1"], "Channels": ["VOICE", "CHAT"]},
                "Groupings": ["QUEUE"],
                "CurrentMetrics": [{"Name": "AGENTS_ONLINE", "Unit": "COUNT"}],
                "NextToken": "t1",
                "MaxResults": 10
            }))
        );

        let out = response::<GetCurrentMetricDataRequest>(&json!({
            "MetricResults": [{
                "Dimensions": {"Queue": {"Id": "q-1", "Arn": "arn:q-1"}},
                "Collections": [{"Metric": {"Name": "AGENTS_ONLINE", "Unit": "COUNT"}, "Value": 3.0}]
            }],
            "DataSnapshotTime": 1_700_000_000
        }));
        assert_eq!(
            out,
            GetCurrentMetricDataResponse {
                next_token: None,
                metric_results: vec![CurrentMetricResult {
                    dimensions: Some(Dimensions {
                        queue: Some(QueueReference {
                            id: Some("q-1".to_owned()),
                            arn: Some("arn:q-1".to_owned()),
                        }),
                        ..Dimensions::default()
                    }),
                    collections: vec![CurrentMetricData {
                        metric: Some(CurrentMetric {
                            name: "AGENTS_ONLINE".to_owned(),
                            unit: Some(Unit::Count),
                        }),
                        value: Some(3.0),
                    }],
                }],
                data_snapshot_time: at(1_700_000_000),
            }
        );
    }

    #[test]
    fn get_metric_data_wire() {
        let (method, path, body) = request(&GetMetricDataRequest {
            instance_id: "inst-1".to_owned(),
            start_time: at(1_700_000_100),
            end_time: at(1_700_003_700),
            filters: Some(Filters {
                routing_profiles: vec!["rp-1".to_owned()],
                ..Filters::default()
            }),
            groupings: vec![Grouping::RoutingProfile],
            historical_metrics: vec![HistoricalMetric {
                name: "CONTACTS_HANDLED".to_owned(),
                threshold: None,
                statistic: Some(Statistic::Sum),
                unit: Some(Unit::Count),
            }],
            next_token: None,
            max_results: Some(100),
        });
        assert_eq!(method, Method::POST);
        assert_eq!(path, "/metrics/historical/inst-1");
        assert_eq!(
            body,
            Some(json!({
                "StartTime": 1_700_000_100,
                "EndTime": 1_700_003_700,
                "Filters": {"RoutingProfiles": ["rp-1"]},
                "Groupings": ["ROUTING_PROFILE"],
                "HistoricalMetrics": [{"Name": "CONTACTS_HANDLED", "Statistic": "SUM", "Unit": "COUNT"}],
                "MaxResults": 100
            }))
        );

        let out = response::<GetMetricDataRequest>(&json!({
            "NextToken": "t2",
            "MetricResults": [{
                "Dimensions": {"RoutingProfile": {"Id": "rp-1"}},
                "Collections": [{
                    "Metric": {"Name": "CONTACTS_HANDLED", "Statistic": "SUM", "Unit": "COUNT"},
                    "Value": 42.0
                }]
            }]
        }));
        assert_eq!(
            out,
            GetMetricDataResponse {
                next_token: Some("t2".to_owned()),
                metric_results: vec![HistoricalMetricResult {
                    dimensions: Some(Dimensions {
                        routing_profile: Some(RoutingProfileReference {
                            id: Some("rp-1".to_owned()),
                            arn: None,
                        }),
                        ..Dimensions::default()
                    }),
                    collections: vec![HistoricalMetricData {
                        metric: Some(HistoricalMetric {
                            name: "CONTACTS_HANDLED".to_owned(),
                            threshold: None,
                            statistic: Some(Statistic::Sum),
                            unit: Some(Unit::Count),
                        }),
                        value: Some(42.0),
                    }],
                }],
            }
        );
    }

    #[test]
    fn get_metric_data_v2_wire() {
        let (method, path, body) = request(&GetMetricDataV2Request {
            resource_arn: "arn:aws:connect:us-east-1:1:instance/inst-1".to_owned(),
            start_time: at(1_700_000_000),
            end_time: at(1_700_086_400),
            filters: vec![FilterV2 {
                filter_key: Some("QUEUE".to_owned()),
                filter_values: vec!["q-1".to_owned()],
            }],
            groupings: vec!["QUEUE".to_owned()],
            metrics: vec![MetricV2 {
                name: Some("SERVICE_LEVEL".to_owned()),
                threshold: vec![ThresholdV2 {
                    comparison: Some("LT".to_owned()),
                    threshold_value: Some(60.0),
                }],
                metric_filters: Vec::new(),
            }],
            next_token: None,
            max_results: None,
        });
        assert_eq!(method, Method::POST);
        assert_eq!(path, "/metrics/data");
        assert_eq!(
            body,
            Some(json!({
                "ResourceArn": "arn:aws:connect:us-east-1:1:instance/inst-1",
                "StartTime": 1_700_000_000,
                "EndTime": 1_700_086_400,
                "Filters": [{"FilterKey": "QUEUE", "FilterValues": ["q-1"]}],
                "Groupings": ["QUEUE"],
                "Metrics": [{
                    "Name": "SERVICE_LEVEL",
                    "Threshold": [{"Comparison": "LT", "ThresholdValue": 60.0}]
                }]
            }))
        );

        let out = response::<GetMetricDataV2Request>(&json!({
            "MetricResults": [{
                "Dimensions": {"QUEUE": "q-1"},
                "Collections": [{"Metric": {"Name": "SERVICE_LEVEL"}, "Value": 87.5}]
            }]
        }));
        assert_eq!(
            out,
            GetMetricDataV2Response {
                next_token: None,
                metric_results: vec![MetricResultV2 {
                    dimensions: HashMap::from([("QUEUE".to_owned(), "q-1".to_owned())]),
                    collections: vec![MetricDataV2 {
                        metric: Some(MetricV2 {
                            name: Some("SERVICE_LEVEL".to_owned()),
                            ..MetricV2::default()
                        }),
                        value: Some(87.5),
                    }],
                }],
            }
        );
    }

    #[test]
    fn historical_request_sends_epoch_seconds() {
        let req = GetMetricDataRequest {
            instance_id: "inst-1".to_owned(),
            start_time: Utc.timestamp_opt(1_700_000_100, 0).single(),
            end_time: Utc.timestamp_opt(1_700_003_700, 0).single(),
            filters: Some(Filters {
                channels: vec![Channel::Voice],
                ..Filters::default()
            }),
            groupings: vec![Grouping::Queue],
            historical_metrics: vec![HistoricalMetric {
                name: "SERVICE_LEVEL".to_owned(),
                threshold: Some(Threshold {
                    comparison: Some(Comparison::Lt),
                    threshold_value: Some(60.0),
                }),
                statistic: Some(Statistic::Avg),
                unit: Some(Unit::Percent),
            }],
            ..GetMetricDataRequest::default()
        };

        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["StartTime"], 1_700_000_100);
        assert_eq!(v["Filters"], json!({"Channels": ["VOICE"]}));
        assert_eq!(v["Groupings"], json!(["QUEUE"]));
        assert_eq!(v["HistoricalMetrics"][0]["Threshold"]["Comparison"], "LT");
        assert!(v.get("NextToken").is_none());
    }

    #[test]
    fn current_metric_results_decode() {
        let out: GetCurrentMetricDataResponse = serde_json::from_value(json!({
            "MetricResults": [{
                "Dimensions": {"Queue": {"Id": "q-1"}, "Channel": "VOICE"},
                "Collections": [{"Metric": {"Name": "AGENTS_ONLINE", "Unit": "COUNT"}, "Value": 4.0}]
            }],
            "DataSnapshotTime": 1_700_000_000.25
        }))
        .unwrap();

        let result = &out.metric_results[0];
        assert_eq!(
            result.dimensions.as_ref().and_then(|d| d.channel),
            Some(Channel::Voice)
        );
        let value = result.collections[0].value.unwrap();
        assert!((value - 4.0).abs() < f64::EPSILON);
        assert!(out.data_snapshot_time.is_some());
    }

    #[test]
    fn v2_results_keep_dimension_map() {
        let out: GetMetricDataV2Response = serde_json::from_value(json!({
            "NextToken": "t",
            "MetricResults": [{
                "Dimensions": {"QUEUE": "q-1"},
                "Collections": [{"Metric": {"Name": "CONTACTS_HANDLED"}, "Value": 12.0}]
            }]
        }))
        .unwrap();
        assert_eq!(out.metric_results[0].dimensions["QUEUE"], "q-1");
        assert_eq!(out.next_token.as_deref(), Some("t"));
    }
}
