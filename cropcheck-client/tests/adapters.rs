//! Integration tests for both protocol adapters using wiremock

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cropcheck_client::{ClientError, JobService, ProtocolAdapter, ServiceClient};
use cropcheck_core::domain::job::{JobSnapshot, StatusLabel};
use cropcheck_core::domain::landmarks::{LandmarkSet, Point};
use cropcheck_core::{JobRequest, ProtocolVersion, Region};

fn create_adapter(mock_server: &MockServer, version: ProtocolVersion) -> ProtocolAdapter {
    ProtocolAdapter::new(version, ServiceClient::new(mock_server.uri()))
}

fn create_test_request(version: ProtocolVersion) -> JobRequest {
    JobRequest {
        image: b"image-bytes".to_vec(),
        segmentation_map: b"mask-bytes".to_vec(),
        landmarks: LandmarkSet::new(vec![Point { x: 1.0, y: 2.0 }, Point { x: 3.5, y: 4.5 }]),
        regions: version.includes_regions().then(|| Region::ALL.to_vec()),
    }
}

#[tokio::test]
async fn test_v2_submit_sends_regions_and_returns_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/jobs"))
        .and(body_partial_json(json!({
            "image": STANDARD.encode(b"image-bytes"),
            "segmentation_map": STANDARD.encode(b"mask-bytes"),
            "landmarks": [{"x": 1.0, "y": 2.0}, {"x": 3.5, "y": 4.5}],
            "regions": ["forehead", "nose", "right_undereye", "left_undereye", "low_face"],
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "job-42"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let adapter = create_adapter(&mock_server, ProtocolVersion::V2);
    let job_id = adapter
        .submit(&create_test_request(ProtocolVersion::V2))
        .await
        .unwrap();

    assert_eq!(job_id, "job-42");
}

#[tokio::test]
async fn test_v1_submit_omits_regions() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/frontal/crop/submit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "v1-job"})))
        .mount(&mock_server)
        .await;

    let adapter = create_adapter(&mock_server, ProtocolVersion::V1);
    let job_id = adapter
        .submit(&create_test_request(ProtocolVersion::V1))
        .await
        .unwrap();
    assert_eq!(job_id, "v1-job");

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("regions").is_none());
    assert_eq!(body["landmarks"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_submit_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/jobs"))
        .respond_with(ResponseTemplate::new(422).set_body_string("invalid landmarks"))
        .mount(&mock_server)
        .await;

    let adapter = create_adapter(&mock_server, ProtocolVersion::V2);
    let err = adapter
        .submit(&create_test_request(ProtocolVersion::V2))
        .await
        .unwrap_err();

    match err {
        ClientError::Submission { status, body } => {
            assert_eq!(status, 422);
            assert_eq!(body, "invalid landmarks");
        }
        other => panic!("expected submission error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_submit_response_without_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .mount(&mock_server)
        .await;

    let adapter = create_adapter(&mock_server, ProtocolVersion::V2);
    let err = adapter
        .submit(&create_test_request(ProtocolVersion::V2))
        .await
        .unwrap_err();

    assert!(err.is_protocol());
}

#[tokio::test]
async fn test_poll_status_labels() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/jobs/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "processing"})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/jobs/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "failed"})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/jobs/c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "warming_up"})))
        .mount(&mock_server)
        .await;

    let adapter = create_adapter(&mock_server, ProtocolVersion::V2);

    assert_eq!(
        adapter.poll_once("a").await.unwrap(),
        JobSnapshot::Status(StatusLabel::Processing)
    );
    assert_eq!(
        adapter.poll_once("b").await.unwrap(),
        JobSnapshot::Status(StatusLabel::Failed)
    );
    assert_eq!(
        adapter.poll_once("c").await.unwrap(),
        JobSnapshot::Status(StatusLabel::Unknown("warming_up".to_string()))
    );
}

#[tokio::test]
async fn test_poll_server_error_is_recoverable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/frontal/crop/status/x"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let adapter = create_adapter(&mock_server, ProtocolVersion::V1);
    let err = adapter.poll_once("x").await.unwrap_err();

    assert!(err.is_recoverable());
    assert_eq!(err.http_status(), Some(503));
}

#[tokio::test]
async fn test_poll_unreachable_service_is_recoverable() {
    let uri = {
        let mock_server = MockServer::start().await;
        mock_server.uri()
    };

    let adapter = ProtocolAdapter::new(ProtocolVersion::V2, ServiceClient::new(uri));
    let err = adapter.poll_once("gone").await.unwrap_err();

    assert!(err.is_recoverable());
    assert_eq!(err.http_status(), None);
}

#[tokio::test]
async fn test_poll_garbage_body_is_protocol_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/jobs/z"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let adapter = create_adapter(&mock_server, ProtocolVersion::V2);
    assert!(adapter.poll_once("z").await.unwrap_err().is_protocol());
}

#[tokio::test]
async fn test_both_versions_decode_the_same_result() {
    let mock_server = MockServer::start().await;
    let artifact = b"<svg>crop</svg>".to_vec();
    let done = json!({"status": "completed", "svg": STANDARD.encode(&artifact)});

    Mock::given(method("POST"))
        .and(path("/api/v1/frontal/crop/submit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "same"})))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "same"})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/frontal/crop/status/same"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&done))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/jobs/same"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&done))
        .mount(&mock_server)
        .await;

    let mut results = Vec::new();
    for version in [ProtocolVersion::V1, ProtocolVersion::V2] {
        let adapter = create_adapter(&mock_server, version);
        let job_id = adapter
            .submit(&create_test_request(version))
            .await
            .unwrap();
        results.push(adapter.poll_once(&job_id).await.unwrap());
    }

    assert_eq!(results[0], JobSnapshot::Completed(artifact));
    assert_eq!(results[0], results[1]);
}
