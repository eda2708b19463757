//! Error normalization and request shape of the HTTP gateway.

mod common;

use common::can_bind_localhost;
use legalist_client::news::NEWS_FAILED;
use legalist_client::{HttpClient, LegalistClientError, NewsClient};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn signup_sends_camel_case_body_and_surfaces_server_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .and(body_json(json!({
            "firstName": "Alice",
            "lastName": "Liddell",
            "username": "alice",
            "password": "secret1",
        })))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Username already exists" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(server.uri()).expect("client");
    let err = client
        .signup("Alice", "Liddell", "alice", "secret1")
        .await
        .expect_err("signup must fail");

    assert!(matches!(err, LegalistClientError::Rejected { status: 409, .. }));
    assert_eq!(err.message(), "Username already exists");
}

#[tokio::test]
async fn signup_without_message_uses_default() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let client = HttpClient::new(server.uri()).expect("client");
    let err = client
        .signup("A", "B", "ab", "secret1")
        .await
        .expect_err("signup must fail");
    assert_eq!(err.message(), "Registration failed");
}

#[tokio::test]
async fn login_failure_defaults_to_invalid_credentials() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let client = HttpClient::new(server.uri()).expect("client");
    let err = client
        .login("alice", "wrong")
        .await
        .expect_err("login must fail");
    assert_eq!(err.message(), "Invalid credentials");
    assert!(!err.is_unauthorized());
}

#[tokio::test]
async fn profile_401_is_classified_as_unauthorized() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/dashboard"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(server.uri()).expect("client");
    let err = client
        .fetch_profile("stale")
        .await
        .expect_err("profile must fail");
    assert!(err.is_unauthorized());
    assert_eq!(err.message(), "Failed to fetch user data");
}

#[tokio::test]
async fn malformed_posts_payload_is_a_decode_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "posts": "nope" })))
        .mount(&server)
        .await;

    let client = HttpClient::new(server.uri()).expect("client");
    let err = client
        .fetch_posts("tok", None)
        .await
        .expect_err("payload is not a list");
    assert!(matches!(err, LegalistClientError::Decode(_)));
}

#[tokio::test]
async fn user_posts_unwrap_envelope_and_read_error_field() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts/user/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "posts": [{
                "_id": "p1",
                "username": "alice",
                "city": "Pune",
                "state": "MH",
                "description": "Hello",
                "createdAt": "2025-03-05T10:00:00.000Z",
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/posts/user/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "User not found" })))
        .mount(&server)
        .await;

    let client = HttpClient::new(server.uri()).expect("client");
    let posts = client
        .fetch_posts("tok", Some("alice"))
        .await
        .expect("posts must load");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, "p1");

    let err = client
        .fetch_posts("tok", Some("ghost"))
        .await
        .expect_err("unknown user");
    assert_eq!(err.message(), "User not found");
}

#[tokio::test]
async fn create_post_accepts_plain_acknowledgement() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/posts"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({
            "username": "alice",
            "city": "Pune",
            "state": "MH",
            "description": "Hello",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "Post created" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(server.uri()).expect("client");
    let created = client
        .create_post("tok", "alice", "Pune", "MH", "Hello")
        .await
        .expect("ack is a success");
    assert!(created.is_none());
}

#[tokio::test]
async fn delete_account_failure_uses_default_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/auth/delete-account"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = HttpClient::new(server.uri()).expect("client");
    let err = client
        .delete_account("tok")
        .await
        .expect_err("delete must fail");
    assert_eq!(err.message(), "Failed to delete account");
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };

    let client = HttpClient::new(format!("http://127.0.0.1:{port}")).expect("client");
    let err = client
        .login("alice", "secret1")
        .await
        .expect_err("nothing listens there");
    assert!(matches!(err, LegalistClientError::Transport(_)));
    assert_eq!(err.message(), "Network error: backend is unreachable");
}

#[tokio::test]
async fn news_search_sends_keyword_language_and_key() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("keyword", "supreme court"))
        .and(query_param("lr", "hi-IN"))
        .and(header("x-rapidapi-key", "test-key"))
        .and(header("x-rapidapi-host", "news.example"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "title": "Verdict", "publisher": "Daily", "timestamp": "1741168800000" },
                { "title": "Hearing" },
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = NewsClient::new(server.uri(), "news.example", "test-key").expect("client");
    let items = client
        .search("Latest", "Supreme Court", "hi-IN")
        .await
        .expect("news must load");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].publisher.as_deref(), Some("Daily"));
}

#[tokio::test]
async fn news_failures_collapse_into_one_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = NewsClient::new(server.uri(), "news.example", "test-key").expect("client");
    let err = client
        .search("Business", "", "en-US")
        .await
        .expect_err("rate limited");
    assert_eq!(err.message(), NEWS_FAILED);
}
