//! Shared fixtures for the integration tests

#![allow(dead_code)]

use orgmap::config::Config;
use serde_json::{json, Value};
use wiremock::MockServer;

/// Config pointing Graph and the identity provider at the mock server
pub fn mock_config(server: &MockServer) -> Config {
    Config {
        graph_base_url: format!("{}/v1.0", server.uri()),
        authority_host: server.uri(),
        ..Config::default()
    }
}

/// A Graph user with every selected attribute
pub fn graph_user(id: &str, name: &str, manager: Option<&str>) -> Value {
    let mut user = json!({
        "id": id,
        "displayName": name,
        "jobTitle": "Engineer",
        "officeLocation": "HQ",
        "city": "Oslo",
        "country": "Norway",
        "department": "Engineering"
    });
    if let Some(manager_id) = manager {
        user["manager"] = json!({
            "@odata.type": "#microsoft.graph.user",
            "id": manager_id
        });
    }
    user
}

/// A Graph user with only id and name
pub fn sparse_user(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "displayName": name,
        "jobTitle": null,
        "officeLocation": null,
        "city": null,
        "country": null,
        "department": null
    })
}

/// Wrap users in an OData page
pub fn odata_page(users: Vec<Value>, next_link: Option<String>) -> Value {
    let mut page = json!({
        "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users(id,displayName,jobTitle,officeLocation,city,country,department,manager(id))",
        "value": users
    });
    if let Some(link) = next_link {
        page["@odata.nextLink"] = json!(link);
    }
    page
}
