use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Phone type of an agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum PhoneType {
    #[default]
    SoftPhone,
    DeskPhone,
    #[serde(other)]
    Unknown,
}

/// Personal details of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserIdentityInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Phone settings of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserPhoneConfig {
    pub phone_type: PhoneType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_accept: Option<bool>,
    /// After-contact work limit, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_contact_work_time_limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desk_phone_number: Option<String>,
}

/// A user account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct User {
    pub id: Option<String>,
    pub arn: Option<String>,
    pub username: Option<String>,
    pub identity_info: Option<UserIdentityInfo>,
    pub phone_config: Option<UserPhoneConfig>,
    pub directory_user_id: Option<String>,
    pub security_profile_ids: Vec<String>,
    pub routing_profile_id: Option<String>,
    pub hierarchy_group_id: Option<String>,
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserSummary {
    pub id: Option<String>,
    pub arn: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateUserRequest {
    pub instance_id: String,
    pub username: String,
    /// Required unless the instance uses SAML or a directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_info: Option<UserIdentityInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_config: Option<UserPhoneConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory_user_id: Option<String>,
    pub security_profile_ids: Vec<String>,
    pub routing_profile_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hierarchy_group_id: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CreateUserResponse {
    pub user_id: Option<String>,
    pub user_arn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteUserRequest {
    pub instance_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeUserRequest {
    pub instance_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeUserResponse {
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListUsersRequest {
    pub instance_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListUsersResponse {
    pub user_summary_list: Vec<UserSummary>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateUserHierarchyRequest {
    pub instance_id: String,
    pub user_id: String,
    /// `None` removes the user from any hierarchy group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hierarchy_group_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateUserIdentityInfoRequest {
    pub instance_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_info: Option<UserIdentityInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateUserPhoneConfigRequest {
    pub instance_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_config: Option<UserPhoneConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateUserRoutingProfileRequest {
    pub instance_id: String,
    pub user_id: String,
    pub routing_profile_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateUserSecurityProfilesRequest {
    pub instance_id: String,
    pub user_id: String,
    pub security_profile_ids: Vec<String>,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::model::wire::{request, response};
    use http::Method;
    use serde_json::json;

    fn identity() -> UserIdentityInfo {
        UserIdentityInfo {
            first_name: Some("Jane".to_owned()),
            last_name: Some("Doe".to_owned()),
            email: Some("jdoe@example.com".to_owned()),
        }
    }

    fn soft_phone() -> UserPhoneConfig {
        UserPhoneConfig {
            phone_type: PhoneType::SoftPhone,
            auto_accept: Some(true),
            after_contact_work_time_limit: Some(30),
            desk_phone_number: None,
        }
    }

    fn summary(id: &str, username: &str) -> UserSummary {
        UserSummary {
            id: Some(id.to_owned()),
            arn: None,
            username: Some(username.to_owned()),
        }
    }

    #[test]
    fn create_user_wire() {
        let (method, path, body) = request(&CreateUserRequest {
            instance_id: "inst-1".to_owned(),
            username: "jdoe".to_owned(),
            password: Some("Passw0rd!".to_owned()),
            identity_info: Some(identity()),
            phone_config: Some(soft_phone()),
            directory_user_id: None,
            security_profile_ids: vec!["sp-1".to_owned(), "sp-2".to_owned()],
            routing_profile_id: "rp-1".to_owned(),
            hierarchy_group_id: Some("g-1".to_owned()),
            tags: HashMap::from([("team".to_owned(), "blue".to_owned())]),
        });
        assert_eq!(method, Method::PUT);
        assert_eq!(path, "/users/inst-1");
        assert_eq!(
            body,
            Some(json!({
                "Username": "jdoe",
                "Password": "Passw0rd!",
                "IdentityInfo": {"FirstName": "Jane", "LastName": "Doe", "Email": "jdoe@example.com"},
                "PhoneConfig": {"PhoneType": "SOFT_PHONE", "AutoAccept": true, "AfterContactWorkTimeLimit": 30},
                "SecurityProfileIds": ["sp-1", "sp-2"],
                "RoutingProfileId": "rp-1",
                "HierarchyGroupId": "g-1",
                "Tags": {"team": "blue"}
            }))
        );

        let out = response::<CreateUserRequest>(&json!({"UserId": "u-1", "UserArn": "arn:u-1"}));
        assert_eq!(
            out,
            CreateUserResponse {
                user_id: Some("u-1".to_owned()),
                user_arn: Some("arn:u-1".to_owned()),
            }
        );
    }

    #[test]
    fn delete_user_wire() {
        let (method, path, body) = request(&DeleteUserRequest {
            instance_id: "inst-1".to_owned(),
            user_id: "u-1".to_owned(),
        });
        assert_eq!(method, Method::DELETE);
        assert_eq!(path, "/users/inst-1/u-1");
        assert_eq!(body, None);

        response::<DeleteUserRequest>(&json!({}));
    }

    #[test]
    fn describe_user_wire() {
        let (method, path, body) = request(&DescribeUserRequest {
            instance_id: "inst-1".to_owned(),
            user_id: "u-1".to_owned(),
        });
        assert_eq!(method, Method::GET);
        assert_eq!(path, "/users/inst-1/u-1");
        assert_eq!(body, None);

        let out = response::<DescribeUserRequest>(&json!({
            "User": {
                "Id": "u-1",
                "Arn": "arn:u-1",
                "Username": "jdoe",
                "IdentityInfo": {"FirstName": "Jane", "LastName": "Doe", "Email": "jdoe@example.com"},
                "PhoneConfig": {"PhoneType": "SOFT_PHONE", "AutoAccept": true, "AfterContactWorkTimeLimit": 30},
                "SecurityProfileIds": ["sp-1"],
                "RoutingProfileId": "rp-1",
                "HierarchyGroupId": "g-1",
                "Tags": {"team": "blue"}
            }
        }));
        assert_eq!(
            out.user,
            Some(User {
                id: Some("u-1".to_owned()),
                arn: Some("arn:u-1".to_owned()),
                username: Some("jdoe".to_owned()),
                identity_info: Some(identity()),
                phone_config: Some(soft_phone()),
                directory_user_id: None,
                security_profile_ids: vec!["sp-1".to_owned()],
                routing_profile_id: Some("rp-1".to_owned()),
                hierarchy_group_id: Some("g-1".to_owned()),
                tags: HashMap::from([("team".to_owned(), "blue".to_owned())]),
            })
        );
    }

    #[test]
    fn list_users_wire() {
        let (method, path, body) = request(&ListUsersRequest {
            instance_id: "inst-1".to_owned(),
            next_token: Some("t1".to_owned()),
            max_results: Some(100),
        });
        assert_eq!(method, Method::GET);
        assert_eq!(path, "/users-summary/inst-1?nextToken=t1&maxResults=100");
        assert_eq!(body, None);

        let out = response::<ListUsersRequest>(&json!({
            "UserSummaryList": [{"Id": "u-1", "Username": "jdoe"}, {"Id": "u-2", "Username": "asmith"}]
        }));
        assert_eq!(
            out,
            ListUsersResponse {
                user_summary_list: vec![summary("u-1", "jdoe"), summary("u-2", "asmith")],
                next_token: None,
            }
        );
    }

    #[test]
    fn update_user_hierarchy_wire() {
        let (method, path, body) = request(&UpdateUserHierarchyRequest {
            instance_id: "inst-1".to_owned(),
            user_id: "u-1".to_owned(),
            hierarchy_group_id: Some("g-2".to_owned()),
        });
        assert_eq!(method, Method::POST);
        assert_eq!(path, "/users/inst-1/u-1/hierarchy");
        assert_eq!(body, Some(json!({"HierarchyGroupId": "g-2"})));

        response::<UpdateUserHierarchyRequest>(&json!({}));
    }

    #[test]
    fn update_user_identity_info_wire() {
        let (method, path, body) = request(&UpdateUserIdentityInfoRequest {
            instance_id: "inst-1".to_owned(),
            user_id: "u-1".to_owned(),
            identity_info: Some(UserIdentityInfo {
                email: Some("jane@example.com".to_owned()),
                ..UserIdentityInfo::default()
            }),
        });
        assert_eq!(method, Method::POST);
        assert_eq!(path, "/users/inst-1/u-1/identity-info");
        assert_eq!(
            body,
            Some(json!({"IdentityInfo": {"Email": "jane@example.com"}}))
        );

        response::<UpdateUserIdentityInfoRequest>(&json!({}));
    }

    #[test]
    fn update_user_phone_config_wire() {
        let (method, path, body) = request(&UpdateUserPhoneConfigRequest {
            instance_id: "inst-1".to_owned(),
            user_id: "u-1".to_owned(),
            phone_config: Some(UserPhoneConfig {
                phone_type: PhoneType::DeskPhone,
                desk_phone_number: Some("+15550100".to_owned()),
                ..UserPhoneConfig::default()
            }),
        });
        assert_eq!(method, Method::POST);
        assert_eq!(path, "/users/inst-1/u-1/phone-config");
        assert_eq!(
            body,
            Some(json!({"PhoneConfig": {"PhoneType": "DESK_PHONE", "DeskPhoneNumber": "+15550100"}}))
        );

        response::<UpdateUserPhoneConfigRequest>(&json!({}));
    }

    #[test]
    fn update_user_routing_profile_wire() {
        let (method, path, body) = request(&UpdateUserRoutingProfileRequest {
            instance_id: "inst-1".to_owned(),
            user_id: "u-1".to_owned(),
            routing_profile_id: "rp-2".to_owned(),
        });
        assert_eq!(method, Method::POST);
        assert_eq!(path, "/users/inst-1/u-1/routing-profile");
        assert_eq!(body, Some(json!({"RoutingProfileId": "rp-2"})));

        response::<UpdateUserRoutingProfileRequest>(&json!({}));
    }

    #[test]
    fn update_user_security_profiles_wire() {
        let (method, path, body) = request(&UpdateUserSecurityProfilesRequest {
            instance_id: "inst-1".to_owned(),
            user_id: "u-1".to_owned(),
            security_profile_ids: vec!["sp-1".to_owned(), "sp-3".to_owned()],
        });
        assert_eq!(method, Method::POST);
        assert_eq!(path, "/users/inst-1/u-1/security-profiles");
        assert_eq!(body, Some(json!({"SecurityProfileIds": ["sp-1", "sp-3"]})));

        response::<UpdateUserSecurityProfilesRequest>(&json!({}));
    }

    #[test]
    fn create_user_uses_wire_names_and_omits_absent_members() {
        let req = CreateUserRequest {
            instance_id: "inst-1".to_owned(),
            username: "jdoe".to_owned(),
            phone_config: Some(UserPhoneConfig {
                phone_type: PhoneType::DeskPhone,
                desk_phone_number: Some("+15550100".to_owned()),
                ..UserPhoneConfig::default()
            }),
            security_profile_ids: vec!["sp-1".to_owned()],
            routing_profile_id: "rp-1".to_owned(),
            ..CreateUserRequest::default()
        };

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "InstanceId": "inst-1",
                "Username": "jdoe",
                "PhoneConfig": {"PhoneType": "DESK_PHONE", "DeskPhoneNumber": "+15550100"},
                "SecurityProfileIds": ["sp-1"],
                "RoutingProfileId": "rp-1"
            })
        );
    }

    #[test]
    fn describe_user_tolerates_unknown_members_and_values() {
        let out: DescribeUserResponse = serde_json::from_value(json!({
            "User": {
                "Id": "u-1",
                "Username": "jdoe",
                "PhoneConfig": {"PhoneType": "HOLO_PHONE"},
                "Tags": {"team": "blue"},
                "BrandNewField": true
            }
        }))
        .unwrap();

        let user = out.user.unwrap();
        assert_eq!(user.id.as_deref(), Some("u-1"));
        assert_eq!(user.phone_config.unwrap().phone_type, PhoneType::Unknown);
        assert_eq!(user.tags["team"], "blue");
        assert!(user.security_profile_ids.is_empty());
    }
}
