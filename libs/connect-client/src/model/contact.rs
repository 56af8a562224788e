use std::collections::HashMap;

use chrono::{DateTime, Utc};
use connect_auth::SecretString;
use serde::{Deserialize, Serialize};

use super::EmptyResponse;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetContactAttributesRequest {
    pub instance_id: String,
    pub initial_contact_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GetContactAttributesResponse {
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartOutboundVoiceContactRequest {
    /// E.164 number to call.
    pub destination_phone_number: String,
    pub contact_flow_id: String,
    pub instance_id: String,
    /// Idempotency token, valid for 7 days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_phone_number: Option<String>,
    /// Required unless `source_phone_number` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_id: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StartOutboundVoiceContactResponse {
    pub contact_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StopContactRequest {
    pub contact_id: String,
    pub instance_id: String,
}

pub type StopContactResponse = EmptyResponse;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateContactAttributesRequest {
    pub initial_contact_id: String,
    pub instance_id: String,
    /// Merged into the contact's attributes; an empty value clears a key.
    pub attributes: HashMap<String, String>,
}

pub type UpdateContactAttributesResponse = EmptyResponse;

/// How much of the source contact's history a persistent chat restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum RehydrationType {
    EntirePastSession,
    FromSegment,
    /// A value this client does not know; never sent.
    #[serde(other, skip_serializing)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatePersistentContactAssociationRequest {
    pub instance_id: String,
    pub initial_contact_id: String,
    /// Required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rehydration_type: Option<RehydrationType>,
    pub source_contact_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreatePersistentContactAssociationResponse {
    pub continued_from_contact_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetFederationTokenRequest {
    pub instance_id: String,
}

/// Short-lived tokens for the agent web client.
#[derive(Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FederationCredentials {
    pub access_token: SecretString,
    #[serde(with = "crate::timestamp::option")]
    pub access_token_expiration: Option<DateTime<Utc>>,
    pub refresh_token: SecretString,
    #[serde(with = "crate::timestamp::option")]
    pub refresh_token_expiration: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for FederationCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FederationCredentials")
            .field("access_token", &"[REDACTED]")
            .field("access_token_expiration", &self.access_token_expiration)
            .field("refresh_token", &"[REDACTED]")
            .field("refresh_token_expiration", &self.refresh_token_expiration)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GetFederationTokenResponse {
    pub credentials: Option<FederationCredentials>,
}
