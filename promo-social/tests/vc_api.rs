use promo_common::PromoError;
use promo_social::PromoFeed;
use promo_social::vc::VcApi;
use promo_social::vc::client::PROMO_HASHTAG;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn api_for(server: &MockServer) -> VcApi {
    VcApi::with_base_url(&format!("{}/v2.31", server.uri()), "t0ken").expect("client")
}

#[tokio::test]
async fn fetch_timeline_matches_wire_contract() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.31/timeline"))
        .and(query_param("sorting", "date"))
        .and(query_param("hashtag", PROMO_HASHTAG))
        .and(header("X-Auth-Token", "t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "items": [
                    { "type": "entry", "data": { "id": 1, "title": "a", "date": 100 } },
                    { "type": "entry", "data": { "id": 2, "title": "b", "date": 200 } }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let entries = api_for(&server).await.fetch_timeline().await.unwrap();

    let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(entries[1].title, "b");
    assert_eq!(entries[1].timestamp, 200);
}

#[tokio::test]
async fn fetch_timeline_non_200_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.31/timeline"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = api_for(&server).await.fetch_timeline().await.unwrap_err();
    assert!(matches!(err, PromoError::Transport { status: Some(500), .. }));
}

#[tokio::test]
async fn fetch_timeline_bad_json_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.31/timeline"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = api_for(&server).await.fetch_timeline().await.unwrap_err();
    assert!(matches!(err, PromoError::Decode(_)));
}

#[tokio::test]
async fn add_comment_posts_form_with_id_and_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.31/comment/add"))
        .and(header("X-Auth-Token", "t0ken"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("id=777&text=Hello%2C+world%21%0A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {}})))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server)
        .await
        .add_comment(777, "Hello, world!\n")
        .await
        .unwrap();
}

#[tokio::test]
async fn add_comment_non_200_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.31/comment/add"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .await
        .add_comment(1, "hi")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));
}
