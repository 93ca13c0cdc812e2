use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// `{uid, name}` projection shared by employees, principals, roles and warehouses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct NamedEntity {
    pub uid: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct JobPosition {
    pub uid: String,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub emp_uid: Option<String>,
}

/// Reference lists the wizard loads once when it opens.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ReferenceLists {
    pub principals: Vec<NamedEntity>,
    pub roles: Vec<NamedEntity>,
    pub employees: Vec<NamedEntity>,
    pub warehouses: Vec<NamedEntity>,
    pub job_positions: Vec<JobPosition>,
}
