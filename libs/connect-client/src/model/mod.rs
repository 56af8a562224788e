//! Request and response shapes of every operation.
//!
//! Members use the service's PascalCase wire names. Absent optional members
//! are left off the wire; unknown response members are ignored and unknown
//! enum values decode as `Unknown`.

use serde::{Deserialize, Deserializer};

mod contact;
mod hierarchy;
mod listing;
mod metrics;
mod queue;
mod tag;
mod user;

pub use contact::*;
pub use hierarchy::*;
pub use listing::*;
pub use metrics::*;
pub use queue::*;
pub use tag::*;
pub use user::*;

/// Response of operations whose body has no members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyResponse;

impl<'de> Deserialize<'de> for EmptyResponse {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde::de::IgnoredAny::deserialize(d)?;
        Ok(Self)
    }
}

/// Implements [`Paginated`](crate::Paginated) and [`Page`](crate::Page)
/// for a request/response pair carrying `NextToken`.
macro_rules! paginated {
    ($($input:ty => $output:ty { $items:ident: $item:ty }),* $(,)?) => {
        $(
            impl $crate::paginator::Paginated for $input {
                fn next_token(&self) -> Option<&str> {
                    self.next_token.as_deref()
                }

                fn set_next_token(&mut self, token: Option<String>) {
                    self.next_token = token;
                }
            }

            impl $crate::paginator::Page for $output {
                type Item = $item;

                fn next_token(&self) -> Option<&str> {
                    self.next_token.as_deref()
                }

                fn into_items(self) -> Vec<$item> {
                    self.$items
                }
            }
        )*
    };
}

paginated! {
    ListContactFlowsRequest => ListContactFlowsResponse { contact_flow_summary_list: ContactFlowSummary },
    ListHoursOfOperationsRequest => ListHoursOfOperationsResponse { hours_of_operation_summary_list: HoursOfOperationSummary },
    ListPhoneNumbersRequest => ListPhoneNumbersResponse { phone_number_summary_list: PhoneNumberSummary },
    ListQueuesRequest => ListQueuesResponse { queue_summary_list: QueueSummary },
    ListRoutingProfilesRequest => ListRoutingProfilesResponse { routing_profile_summary_list: RoutingProfileSummary },
    ListSecurityProfilesRequest => ListSecurityProfilesResponse { security_profile_summary_list: SecurityProfileSummary },
    ListUserHierarchyGroupsRequest => ListUserHierarchyGroupsResponse { user_hierarchy_group_summary_list: HierarchyGroupSummary },
    ListUsersRequest => ListUsersResponse { user_summary_list: UserSummary },
    GetCurrentMetricDataRequest => GetCurrentMetricDataResponse { metric_results: CurrentMetricResult },
    GetMetricDataRequest => GetMetricDataResponse { metric_results: HistoricalMetricResult },
    GetMetricDataV2Request => GetMetricDataV2Response { metric_results: MetricResultV2 },
}
