#![allow(clippy::unwrap_used)]
// Integration tests for `DirectoryClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sitenav_api::types::{WebsiteCreate, WebsiteQuery};
use sitenav_api::{DirectoryClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DirectoryClient) {
    let server = MockServer::start().await;
    let client = DirectoryClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn website_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Rust",
        "url": "https://www.rust-lang.org",
        "description": "A language empowering everyone",
        "category_id": 2,
        "thumbnail": "https://www.rust-lang.org/logo.png",
        "status": status,
        "visits": 12,
        "likes": 4,
        "created_at": "2024-06-15T10:30:00Z"
    })
}

// ── Categories ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_categories_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": 1, "name": "Tools" },
                { "id": 2, "name": "Languages" }
            ]
        })))
        .mount(&server)
        .await;

    let categories = client.list_categories().await.unwrap();

    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].name, "Tools");
    assert_eq!(categories[1].id, 2);
}

#[tokio::test]
async fn test_list_categories_bare_array() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": 7, "name": "News" }])),
        )
        .mount(&server)
        .await;

    let categories = client.list_categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "News");
}

#[tokio::test]
async fn test_list_categories_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database offline"))
        .mount(&server)
        .await;

    let result = client.list_categories().await;
    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "database offline");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── Websites ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_websites_with_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/websites"))
        .and(query_param("status", "pending"))
        .and(query_param("category_id", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": [website_json(9, "pending")] })),
        )
        .mount(&server)
        .await;

    let query = WebsiteQuery {
        status: Some("pending".into()),
        category_id: Some(2),
        search: None,
    };
    let sites = client.list_websites(&query).await.unwrap();

    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].id, 9);
    assert_eq!(sites[0].status, "pending");
    assert_eq!(sites[0].likes, 4);
    assert!(sites[0].created_at.is_some());
}

#[tokio::test]
async fn test_website_category_id_as_string() {
    let (server, client) = setup().await;

    let mut site = website_json(3, "approved");
    site["category_id"] = json!("5");

    Mock::given(method("GET"))
        .and(path("/api/websites/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": site })))
        .mount(&server)
        .await;

    let website = client.get_website(3).await.unwrap();
    assert_eq!(website.category_id, Some(5));
}

#[tokio::test]
async fn test_create_website_posts_form_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/websites"))
        .and(body_json(json!({
            "title": "Rust",
            "url": "https://www.rust-lang.org",
            "description": "A language empowering everyone",
            "category_id": 2,
            "thumbnail": null
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "data": website_json(11, "pending") })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let body = WebsiteCreate {
        title: "Rust".into(),
        url: "https://www.rust-lang.org".into(),
        description: "A language empowering everyone".into(),
        category_id: 2,
        thumbnail: None,
    };
    let created = client.create_website(&body).await.unwrap().unwrap();

    assert_eq!(created.id, 11);
    assert_eq!(created.status, "pending");
}

fn sample_create() -> WebsiteCreate {
    WebsiteCreate {
        title: "Rust".into(),
        url: "https://www.rust-lang.org".into(),
        description: "A language empowering everyone".into(),
        category_id: 2,
        thumbnail: None,
    }
}

#[tokio::test]
async fn test_create_website_accepts_ack_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/websites"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client.create_website(&sample_create()).await.unwrap();
    assert!(created.is_none());
}

#[tokio::test]
async fn test_create_website_accepts_no_content() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/websites"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let created = client.create_website(&sample_create()).await.unwrap();
    assert!(created.is_none());
}

#[tokio::test]
async fn test_create_website_surfaces_body_verbatim() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/websites"))
        .respond_with(ResponseTemplate::new(409).set_body_string("URL already submitted"))
        .mount(&server)
        .await;

    let body = WebsiteCreate {
        title: "Dup".into(),
        url: "https://dup.example".into(),
        description: "dup".into(),
        category_id: 1,
        thumbnail: None,
    };
    let result = client.create_website(&body).await;

    assert!(
        matches!(result, Err(Error::Api { status: 409, ref message }) if message == "URL already submitted"),
        "expected verbatim Api error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_like_website_ignores_response_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/websites/4/like"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .expect(1)
        .mount(&server)
        .await;

    client.like_website(4).await.unwrap();
}

#[tokio::test]
async fn test_update_status_patch() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/websites/8"))
        .and(body_json(json!({ "status": "approved" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.update_status(8, "approved").await.unwrap();
}

#[tokio::test]
async fn test_record_visit() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/websites/8/visit"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.record_visit(8).await.unwrap();
}

// ── Metadata & settings ─────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_metadata_partial() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/metadata"))
        .and(query_param("url", "https://example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "title": "A" })))
        .mount(&server)
        .await;

    let meta = client.fetch_metadata("https://example.com").await.unwrap();

    assert_eq!(meta.title.as_deref(), Some("A"));
    assert!(meta.description.is_none());
    assert!(meta.image.is_none());
}

#[tokio::test]
async fn test_get_settings_camel_case() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/settings"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "allowSubmissions": false } })),
        )
        .mount(&server)
        .await;

    let settings = client.get_settings().await.unwrap();
    assert_eq!(settings.allow_submissions, Some(false));
}

// ── Auth & errors ───────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_header() {
    let server = MockServer::start().await;
    let token: secrecy::SecretString = "s3cret".to_string().into();
    let client =
        DirectoryClient::new(&server.uri(), Some(&token), &TransportConfig::default()).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let categories = client.list_categories().await.unwrap();
    assert!(categories.is_empty());
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/websites/1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.update_status(1, "rejected").await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_json_keeps_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    match client.list_categories().await {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
