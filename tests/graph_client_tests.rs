//! Integration tests for the Graph client and the users fetch
//!
//! Uses wiremock to simulate paged `/users` responses and verify ordering,
//! token handling and error propagation.

mod common;

use common::*;
use orgmap::error::OrgmapError;
use orgmap::graph::auth::{Credentials, TokenProvider};
use orgmap::graph::users::{fetch_all_users, UserQuery};
use orgmap::graph::GraphClient;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token_client(server: &MockServer, token: &str) -> GraphClient {
    let config = mock_config(server);
    let tokens =
        TokenProvider::from_credentials(Credentials::Token(token.into()), &config).unwrap();
    GraphClient::new(tokens, &config).unwrap()
}

/// Mount `pages` so that page N links to page N+1 through `$skiptoken`
async fn mount_pages(server: &MockServer, pages: Vec<Vec<serde_json::Value>>) {
    let count = pages.len();
    for (idx, users) in pages.into_iter().enumerate() {
        let next = (idx + 1 < count).then(|| {
            format!(
                "{}/v1.0/users?$select=id&$skiptoken=page{}",
                server.uri(),
                idx + 1
            )
        });

        let mock = Mock::given(method("GET")).and(path("/v1.0/users"));
        let mock = if idx == 0 {
            mock.and(query_param_is_missing("$skiptoken"))
        } else {
            mock.and(query_param("$skiptoken", format!("page{}", idx)))
        };

        mock.respond_with(ResponseTemplate::new(200).set_body_json(odata_page(users, next)))
            .expect(1)
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_single_page_with_selected_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param(
            "$select",
            "id,displayName,jobTitle,officeLocation,city,country,department",
        ))
        .and(query_param("$expand", "manager($select=id)"))
        .and(header("Authorization", "Bearer static-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(
            vec![
                graph_user("a", "Ada", None),
                graph_user("b", "Ben", Some("a")),
            ],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = token_client(&server, "static-token");
    let users = fetch_all_users(&client, &UserQuery::default()).await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].display_name, "Ada");
    assert_eq!(users[1].manager_id(), Some("a"));
}

#[tokio::test]
async fn test_follows_next_links_in_order() {
    let server = MockServer::start().await;

    let pages: Vec<Vec<serde_json::Value>> = (0..3)
        .map(|p| {
            (0..4)
                .map(|i| graph_user(&format!("u{}-{}", p, i), &format!("User {}-{}", p, i), None))
                .collect()
        })
        .collect();
    mount_pages(&server, pages).await;

    let client = token_client(&server, "static-token");
    let users = fetch_all_users(&client, &UserQuery::default()).await.unwrap();

    assert_eq!(users.len(), 12);
    let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids[0], "u0-0");
    assert_eq!(ids[4], "u1-0");
    assert_eq!(ids[11], "u2-3");
}

#[tokio::test]
async fn test_empty_page_in_the_middle() {
    let server = MockServer::start().await;

    mount_pages(
        &server,
        vec![
            vec![graph_user("a", "Ada", None)],
            vec![],
            vec![sparse_user("c", "Cy")],
        ],
    )
    .await;

    let client = token_client(&server, "static-token");
    let users = fetch_all_users(&client, &UserQuery::default()).await.unwrap();

    let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert!(users[1].department.is_none());
}

#[tokio::test]
async fn test_empty_directory() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(vec![], None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = token_client(&server, "static-token");
    let users = fetch_all_users(&client, &UserQuery::default()).await.unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_page_size_and_filter_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param("$top", "999"))
        .and(query_param("$filter", "userType eq 'Member'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(vec![], None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = token_client(&server, "static-token");
    let query = UserQuery {
        page_size: Some(999),
        filter: Some("userType eq 'Member'".into()),
    };
    fetch_all_users(&client, &query).await.unwrap();
}

#[tokio::test]
async fn test_forbidden_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {
                "code": "Authorization_RequestDenied",
                "message": "Insufficient privileges to complete the operation."
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = token_client(&server, "static-token");
    let err = fetch_all_users(&client, &UserQuery::default())
        .await
        .unwrap_err();

    match err {
        OrgmapError::GraphApiError(message) => {
            assert!(message.contains("403"));
            assert!(message.contains("Authorization_RequestDenied"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_throttled_page_fails_whole_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param_is_missing("$skiptoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(
            vec![graph_user("a", "Ada", None)],
            Some(format!("{}/v1.0/users?$skiptoken=page1", server.uri())),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .and(query_param("$skiptoken", "page1"))
        .respond_with(
            ResponseTemplate::new(429)
                .append_header("Retry-After", "1")
                .set_body_json(serde_json::json!({
                    "error": {"code": "TooManyRequests", "message": "Too many requests"}
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = token_client(&server, "static-token");
    let result = fetch_all_users(&client, &UserQuery::default()).await;

    assert!(matches!(result, Err(OrgmapError::GraphApiError(_))));
}

#[tokio::test]
async fn test_malformed_page_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let client = token_client(&server, "static-token");
    let result = fetch_all_users(&client, &UserQuery::default()).await;

    assert!(matches!(result, Err(OrgmapError::HttpError(_))));
}
