use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HierarchyGroupSummary {
    pub id: Option<String>,
    pub arn: Option<String>,
    pub name: Option<String>,
}

/// Groups from the top level down to a group's own level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HierarchyPath {
    pub level_one: Option<HierarchyGroupSummary>,
    pub level_two: Option<HierarchyGroupSummary>,
    pub level_three: Option<HierarchyGroupSummary>,
    pub level_four: Option<HierarchyGroupSummary>,
    pub level_five: Option<HierarchyGroupSummary>,
}

impl HierarchyPath {
    /// Present levels, top first.
    pub fn levels(&self) -> impl Iterator<Item = &HierarchyGroupSummary> {
        [
            &self.level_one,
            &self.level_two,
            &self.level_three,
            &self.level_four,
            &self.level_five,
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HierarchyGroup {
    pub id: Option<String>,
    pub arn: Option<String>,
    pub name: Option<String>,
    pub level_id: Option<String>,
    pub hierarchy_path: Option<HierarchyPath>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HierarchyLevel {
    pub id: Option<String>,
    pub arn: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct HierarchyStructure {
    pub level_one: Option<HierarchyLevel>,
    pub level_two: Option<HierarchyLevel>,
    pub level_three: Option<HierarchyLevel>,
    pub level_four: Option<HierarchyLevel>,
    pub level_five: Option<HierarchyLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeUserHierarchyGroupRequest {
    pub instance_id: String,
    pub hierarchy_group_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeUserHierarchyGroupResponse {
    pub hierarchy_group: Option<HierarchyGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeUserHierarchyStructureRequest {
    pub instance_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeUserHierarchyStructureResponse {
    pub hierarchy_structure: Option<HierarchyStructure>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListUserHierarchyGroupsRequest {
    pub instance_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListUserHierarchyGroupsResponse {
    pub user_hierarchy_group_summary_list: Vec<HierarchyGroupSummary>,
    pub next_token: Option<String>,
}
