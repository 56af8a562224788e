//! The service model: wire binding of every operation.

use crate::model::{
    CreatePersistentContactAssociationRequest, CreatePersistentContactAssociationResponse,
    CreateQueueRequest, CreateQueueResponse, CreateUserRequest, CreateUserResponse,
    DeleteQueueRequest, DeleteUserRequest, DescribeQueueRequest, DescribeQueueResponse,
    DescribeUserHierarchyGroupRequest, DescribeUserHierarchyGroupResponse,
    DescribeUserHierarchyStructureRequest, DescribeUserHierarchyStructureResponse,
    DescribeUserRequest, DescribeUserResponse, GetContactAttributesRequest,
    GetContactAttributesResponse, GetCurrentMetricDataRequest, GetCurrentMetricDataResponse,
    GetFederationTokenRequest, GetFederationTokenResponse, GetMetricDataRequest,
    GetMetricDataResponse, GetMetricDataV2Request, GetMetricDataV2Response,
    ListContactFlowsRequest, ListContactFlowsResponse, ListHoursOfOperationsRequest,
    ListHoursOfOperationsResponse, ListPhoneNumbersRequest, ListPhoneNumbersResponse,
    ListQueuesRequest, ListQueuesResponse, ListRoutingProfilesRequest, ListRoutingProfilesResponse,
    ListSecurityProfilesRequest, ListSecurityProfilesResponse, ListTagsForResourceRequest,
    ListTagsForResourceResponse, ListUserHierarchyGroupsRequest, ListUserHierarchyGroupsResponse,
    ListUsersRequest, ListUsersResponse, StartOutboundVoiceContactRequest,
    StartOutboundVoiceContactResponse, StopContactRequest, StopContactResponse, TagResourceRequest,
    UntagResourceRequest, UpdateContactAttributesRequest, UpdateContactAttributesResponse,
    UpdateUserHierarchyRequest, UpdateUserIdentityInfoRequest, UpdateUserPhoneConfigRequest,
    UpdateUserRoutingProfileRequest, UpdateUserSecurityProfilesRequest,
};
use crate::operation::service_model;

service_model! {
    /// Creates a user account in an instance.
    create_user / CREATE_USER: CreateUserRequest => CreateUserResponse {
        name: "CreateUser",
        method: PUT,
        uri: "/users/{InstanceId}",
        query: [],
        required: ["InstanceId", "Username", "PhoneConfig", "SecurityProfileIds", "RoutingProfileId"],
        errors: [InvalidRequest, InvalidParameter, LimitExceeded, DuplicateResource, ResourceNotFound, Throttling, InternalService],
        idempotent: false,
        has_output: true,
    }

    /// Deletes a user account.
    delete_user / DELETE_USER: DeleteUserRequest => () {
        name: "DeleteUser",
        method: DELETE,
        uri: "/users/{InstanceId}/{UserId}",
        query: [],
        required: ["InstanceId", "UserId"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: false,
    }

    describe_user / DESCRIBE_USER: DescribeUserRequest => DescribeUserResponse {
        name: "DescribeUser",
        method: GET,
        uri: "/users/{InstanceId}/{UserId}",
        query: [],
        required: ["InstanceId", "UserId"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: true,
    }

    describe_user_hierarchy_group / DESCRIBE_USER_HIERARCHY_GROUP:
        DescribeUserHierarchyGroupRequest => DescribeUserHierarchyGroupResponse {
        name: "DescribeUserHierarchyGroup",
        method: GET,
        uri: "/user-hierarchy-groups/{InstanceId}/{HierarchyGroupId}",
        query: [],
        required: ["InstanceId", "HierarchyGroupId"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: true,
    }

    describe_user_hierarchy_structure / DESCRIBE_USER_HIERARCHY_STRUCTURE:
        DescribeUserHierarchyStructureRequest => DescribeUserHierarchyStructureResponse {
        name: "DescribeUserHierarchyStructure",
        method: GET,
        uri: "/user-hierarchy-structure/{InstanceId}",
        query: [],
        required: ["InstanceId"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: true,
    }

    /// Reads the attributes set on a contact.
    get_contact_attributes / GET_CONTACT_ATTRIBUTES:
        GetContactAttributesRequest => GetContactAttributesResponse {
        name: "GetContactAttributes",
        method: GET,
        uri: "/contact/attributes/{InstanceId}/{InitialContactId}",
        query: [],
        required: ["InstanceId", "InitialContactId"],
        errors: [InvalidRequest, ResourceNotFound, InternalService],
        has_output: true,
    }

    /// Real-time metric snapshot.
    get_current_metric_data / GET_CURRENT_METRIC_DATA:
        GetCurrentMetricDataRequest => GetCurrentMetricDataResponse {
        name: "GetCurrentMetricData",
        method: POST,
        uri: "/metrics/current/{InstanceId}",
        query: [],
        required: ["InstanceId", "Filters", "CurrentMetrics"],
        errors: [InvalidRequest, InvalidParameter, InternalService, Throttling, ResourceNotFound],
        has_output: true,
    }

    /// Issues tokens for the agent web client.
    get_federation_token / GET_FEDERATION_TOKEN: GetFederationTokenRequest => GetFederationTokenResponse {
        name: "GetFederationToken",
        method: GET,
        uri: "/user/federate/{InstanceId}",
        query: [],
        required: ["InstanceId"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, UserNotFound, InternalService, DuplicateResource],
        has_output: true,
    }

    /// Historical metrics in 5 minute intervals over the last 24 hours.
    get_metric_data / GET_METRIC_DATA: GetMetricDataRequest => GetMetricDataResponse {
        name: "GetMetricData",
        method: POST,
        uri: "/metrics/historical/{InstanceId}",
        query: [],
        required: ["InstanceId", "StartTime", "EndTime", "Filters", "HistoricalMetrics"],
        errors: [InvalidRequest, InvalidParameter, InternalService, Throttling, ResourceNotFound],
        has_output: true,
    }

    get_metric_data_v2 / GET_METRIC_DATA_V2: GetMetricDataV2Request => GetMetricDataV2Response {
        name: "GetMetricDataV2",
        method: POST,
        uri: "/metrics/data",
        query: [],
        required: ["ResourceArn", "StartTime", "EndTime", "Filters", "Metrics"],
        errors: [InvalidParameter, InvalidRequest, ResourceNotFound, Throttling, InternalService],
        has_output: true,
    }

    list_contact_flows / LIST_CONTACT_FLOWS: ListContactFlowsRequest => ListContactFlowsResponse {
        name: "ListContactFlows",
        method: GET,
        uri: "/contact-flows-summary/{InstanceId}",
        query: ["ContactFlowTypes" => "contactFlowTypes", "NextToken" => "nextToken", "MaxResults" => "maxResults"],
        required: ["InstanceId"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: true,
    }

    list_hours_of_operations / LIST_HOURS_OF_OPERATIONS:
        ListHoursOfOperationsRequest => ListHoursOfOperationsResponse {
        name: "ListHoursOfOperations",
        method: GET,
        uri: "/hours-of-operations-summary/{InstanceId}",
        query: ["NextToken" => "nextToken", "MaxResults" => "maxResults"],
        required: ["InstanceId"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: true,
    }

    list_phone_numbers / LIST_PHONE_NUMBERS: ListPhoneNumbersRequest => ListPhoneNumbersResponse {
        name: "ListPhoneNumbers",
        method: GET,
        uri: "/phone-numbers-summary/{InstanceId}",
        query: [
            "PhoneNumberTypes" => "phoneNumberTypes",
            "PhoneNumberCountryCodes" => "phoneNumberCountryCodes",
            "NextToken" => "nextToken",
            "MaxResults" => "maxResults",
        ],
        required: ["InstanceId"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: true,
    }

    list_queues / LIST_QUEUES: ListQueuesRequest => ListQueuesResponse {
        name: "ListQueues",
        method: GET,
        uri: "/queues-summary/{InstanceId}",
        query: ["QueueTypes" => "queueTypes", "NextToken" => "nextToken", "MaxResults" => "maxResults"],
        required: ["InstanceId"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: true,
    }

    list_routing_profiles / LIST_ROUTING_PROFILES:
        ListRoutingProfilesRequest => ListRoutingProfilesResponse {
        name: "ListRoutingProfiles",
        method: GET,
        uri: "/routing-profiles-summary/{InstanceId}",
        query: ["NextToken" => "nextToken", "MaxResults" => "maxResults"],
        required: ["InstanceId"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: true,
    }

    list_security_profiles / LIST_SECURITY_PROFILES:
        ListSecurityProfilesRequest => ListSecurityProfilesResponse {
        name: "ListSecurityProfiles",
        method: GET,
        uri: "/security-profiles-summary/{InstanceId}",
        query: ["NextToken" => "nextToken", "MaxResults" => "maxResults"],
        required: ["InstanceId"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: true,
    }

    list_tags_for_resource / LIST_TAGS_FOR_RESOURCE:
        ListTagsForResourceRequest => ListTagsForResourceResponse {
        name: "ListTagsForResource",
        method: GET,
        uri: "/tags/{ResourceArn}",
        query: [],
        required: ["ResourceArn"],
        errors: [InvalidRequest, InvalidParameter, InternalService, ResourceNotFound, Throttling],
        has_output: true,
    }

    list_user_hierarchy_groups / LIST_USER_HIERARCHY_GROUPS:
        ListUserHierarchyGroupsRequest => ListUserHierarchyGroupsResponse {
        name: "ListUserHierarchyGroups",
        method: GET,
        uri: "/user-hierarchy-groups-summary/{InstanceId}",
        query: ["NextToken" => "nextToken", "MaxResults" => "maxResults"],
        required: ["InstanceId"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: true,
    }

    list_users / LIST_USERS: ListUsersRequest => ListUsersResponse {
        name: "ListUsers",
        method: GET,
        uri: "/users-summary/{InstanceId}",
        query: ["NextToken" => "nextToken", "MaxResults" => "maxResults"],
        required: ["InstanceId"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: true,
    }

    /// Places an outbound call to a customer and connects it to a flow.
    start_outbound_voice_contact / START_OUTBOUND_VOICE_CONTACT:
        StartOutboundVoiceContactRequest => StartOutboundVoiceContactResponse {
        name: "StartOutboundVoiceContact",
        method: PUT,
        uri: "/contact/outbound-voice",
        query: [],
        required: ["DestinationPhoneNumber", "ContactFlowId", "InstanceId"],
        errors: [
            InvalidRequest, InvalidParameter, ResourceNotFound, InternalService, LimitExceeded,
            DestinationNotAllowed, OutboundContactNotPermitted,
        ],
        idempotency_token: "ClientToken",
        has_output: true,
    }

    /// Ends a contact started by `start_outbound_voice_contact`.
    stop_contact / STOP_CONTACT: StopContactRequest => StopContactResponse {
        name: "StopContact",
        method: POST,
        uri: "/contact/stop",
        query: [],
        required: ["ContactId", "InstanceId"],
        errors: [InvalidRequest, ContactNotFound, InvalidParameter, ResourceNotFound, InternalService],
        has_output: true,
    }

    tag_resource / TAG_RESOURCE: TagResourceRequest => () {
        name: "TagResource",
        method: POST,
        uri: "/tags/{ResourceArn}",
        query: [],
        required: ["ResourceArn", "tags"],
        errors: [InvalidRequest, InvalidParameter, InternalService, ResourceNotFound, Throttling],
        has_output: false,
    }

    untag_resource / UNTAG_RESOURCE: UntagResourceRequest => () {
        name: "UntagResource",
        method: DELETE,
        uri: "/tags/{ResourceArn}",
        query: ["TagKeys" => "tagKeys"],
        required: ["ResourceArn", "TagKeys"],
        errors: [InvalidRequest, InvalidParameter, InternalService, ResourceNotFound, Throttling],
        has_output: false,
    }

    /// Creates or updates attributes on a contact.
    update_contact_attributes / UPDATE_CONTACT_ATTRIBUTES:
        UpdateContactAttributesRequest => UpdateContactAttributesResponse {
        name: "UpdateContactAttributes",
        method: POST,
        uri: "/contact/attributes",
        query: [],
        required: ["InitialContactId", "InstanceId", "Attributes"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, InternalService],
        has_output: true,
    }

    update_user_hierarchy / UPDATE_USER_HIERARCHY: UpdateUserHierarchyRequest => () {
        name: "UpdateUserHierarchy",
        method: POST,
        uri: "/users/{InstanceId}/{UserId}/hierarchy",
        query: [],
        required: ["InstanceId", "UserId"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: false,
    }

    update_user_identity_info / UPDATE_USER_IDENTITY_INFO: UpdateUserIdentityInfoRequest => () {
        name: "UpdateUserIdentityInfo",
        method: POST,
        uri: "/users/{InstanceId}/{UserId}/identity-info",
        query: [],
        required: ["InstanceId", "UserId", "IdentityInfo"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: false,
    }

    update_user_phone_config / UPDATE_USER_PHONE_CONFIG: UpdateUserPhoneConfigRequest => () {
        name: "UpdateUserPhoneConfig",
        method: POST,
        uri: "/users/{InstanceId}/{UserId}/phone-config",
        query: [],
        required: ["InstanceId", "UserId", "PhoneConfig"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: false,
    }

    update_user_routing_profile / UPDATE_USER_ROUTING_PROFILE: UpdateUserRoutingProfileRequest => () {
        name: "UpdateUserRoutingProfile",
        method: POST,
        uri: "/users/{InstanceId}/{UserId}/routing-profile",
        query: [],
        required: ["InstanceId", "UserId", "RoutingProfileId"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: false,
    }

    update_user_security_profiles / UPDATE_USER_SECURITY_PROFILES:
        UpdateUserSecurityProfilesRequest => () {
        name: "UpdateUserSecurityProfiles",
        method: POST,
        uri: "/users/{InstanceId}/{UserId}/security-profiles",
        query: [],
        required: ["InstanceId", "UserId", "SecurityProfileIds"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: false,
    }

    /// Creates an inbound queue.
    create_queue / CREATE_QUEUE: CreateQueueRequest => CreateQueueResponse {
        name: "CreateQueue",
        method: PUT,
        uri: "/queues/{InstanceId}",
        query: [],
        required: ["InstanceId", "Name", "HoursOfOperationId"],
        errors: [
            DuplicateResource, InvalidRequest, InvalidParameter, LimitExceeded, ResourceNotFound,
            Throttling, InternalService, ServiceQuotaExceeded,
        ],
        idempotent: false,
        has_output: true,
    }

    describe_queue / DESCRIBE_QUEUE: DescribeQueueRequest => DescribeQueueResponse {
        name: "DescribeQueue",
        method: GET,
        uri: "/queues/{InstanceId}/{QueueId}",
        query: [],
        required: ["InstanceId", "QueueId"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, Throttling, InternalService],
        has_output: true,
    }

    /// Deletes a queue. Fails with `ResourceInUse` while the queue is referenced.
    delete_queue / DELETE_QUEUE: DeleteQueueRequest => () {
        name: "DeleteQueue",
        method: DELETE,
        uri: "/queues/{InstanceId}/{QueueId}",
        query: [],
        required: ["InstanceId", "QueueId"],
        errors: [InvalidRequest, InvalidParameter, ResourceNotFound, ResourceInUse, Throttling, InternalService],
        has_output: false,
    }

    /// Links a new chat contact to a past one so the transcript carries over.
    create_persistent_contact_association / CREATE_PERSISTENT_CONTACT_ASSOCIATION:
        CreatePersistentContactAssociationRequest => CreatePersistentContactAssociationResponse {
        name: "CreatePersistentContactAssociation",
        method: POST,
        uri: "/contact/persistent-contact-association/{InstanceId}/{InitialContactId}",
        query: [],
        required: ["InstanceId", "InitialContactId", "RehydrationType", "SourceContactId"],
        errors: [
            AccessDenied, InvalidRequest, InvalidParameter, ResourceNotFound, Throttling,
            InternalService,
        ],
        idempotency_token: "ClientToken",
        has_output: true,
    }
}
