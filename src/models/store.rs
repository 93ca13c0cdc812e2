use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A store that can be picked as a route customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Store {
    pub uid: String,
    pub name: Option<String>,
    pub alias_name: Option<String>,
    pub legal_name: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub store_type: Option<String>,
    pub status: Option<String>,
    pub city_uid: Option<String>,
    pub state_uid: Option<String>,
    pub country_uid: Option<String>,
}
