//! Directory users
//!
//! Fetches the full user list with the attributes the reports group on, plus
//! each user's manager reduced to its id.

use crate::config::Config;
use crate::error::Result;
use crate::graph::GraphClient;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

/// Attributes requested through `$select`
pub const USER_SELECT: &[&str] = &[
    "id",
    "displayName",
    "jobTitle",
    "officeLocation",
    "city",
    "country",
    "department",
];

/// Manager expansion limited to the manager's id
pub const MANAGER_EXPAND: &str = "manager($select=id)";

/// A directory user as returned by `GET /users`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub display_name: String,

    #[serde(default)]
    pub job_title: Option<String>,

    #[serde(default)]
    pub department: Option<String>,

    #[serde(default)]
    pub office_location: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub country: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<ManagerRef>,
}

/// Expanded `manager` navigation property
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerRef {
    pub id: String,
}

impl User {
    pub fn manager_id(&self) -> Option<&str> {
        self.manager.as_ref().map(|m| m.id.as_str())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Query options for the users listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub page_size: Option<u32>,
    pub filter: Option<String>,
}

impl UserQuery {
    pub fn from_config(config: &Config) -> Self {
        Self {
            page_size: config.page_size,
            filter: config.filter.clone(),
        }
    }

    /// OData query parameters for the first page
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("$select", USER_SELECT.join(",")),
            ("$expand", MANAGER_EXPAND.to_string()),
        ];
        if let Some(top) = self.page_size {
            params.push(("$top", top.to_string()));
        }
        if let Some(filter) = &self.filter {
            params.push(("$filter", filter.clone()));
        }
        params
    }
}

/// Fetch every user visible to the caller, in server order
pub async fn fetch_all_users(client: &GraphClient, query: &UserQuery) -> Result<Vec<User>> {
    fetch_all_users_with_progress(client, query, |_| {}).await
}

/// Fetch every user, reporting the running count after each page
pub async fn fetch_all_users_with_progress<F>(
    client: &GraphClient,
    query: &UserQuery,
    on_page: F,
) -> Result<Vec<User>>
where
    F: FnMut(usize),
{
    let url = client.endpoint_url("users", &query.params())?;
    let users: Vec<User> = client.get_all_pages_with_progress(url, on_page).await?;
    info!("Fetched {} user(s)", users.len());
    Ok(users)
}
