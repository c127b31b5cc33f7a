use rvton::{
    OutputMimeType, StaticCredentials, TryOnParams, VertexClient, VertexConfig, VtonError,
};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread::{self, JoinHandle};

/// Single-shot HTTP stub: accepts one connection, answers with the canned
/// status and body, and hands back the raw request it received.
fn spawn_stub(status_line: &'static str, response_body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = stream.read(&mut chunk).unwrap();
            assert!(n > 0, "connection closed before headers were complete");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = headers
            .lines()
            .find_map(|line| {
                let lower = line.to_ascii_lowercase();
                lower
                    .strip_prefix("content-length:")
                    .map(|v| v.trim().parse::<usize>().unwrap())
            })
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk).unwrap();
            assert!(n > 0, "connection closed before body was complete");
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            response_body.len(),
            response_body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        String::from_utf8_lossy(&buf[..header_end + content_length]).to_string()
    });

    (format!("http://{}", addr), handle)
}

fn stub_client(endpoint_base: &str) -> VertexClient {
    let config = VertexConfig::new()
        .with_project("test-project")
        .with_endpoint_base(endpoint_base);
    VertexClient::with_credentials(config, Box::new(StaticCredentials::new("test-token"))).unwrap()
}

fn write_inputs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let person = dir.join("person.png");
    let product = dir.join("dress.png");
    fs::write(&person, b"person image bytes").unwrap();
    fs::write(&product, b"product image bytes").unwrap();
    (person, product)
}

fn request_body(raw_request: &str) -> serde_json::Value {
    let body = raw_request.split("\r\n\r\n").nth(1).unwrap();
    serde_json::from_str(body).unwrap()
}

#[test]
fn submit_saves_predictions_in_order() {
    let png_bytes = b"fake png payload".to_vec();
    let jpg_bytes = b"fake jpeg payload".to_vec();
    let response = serde_json::json!({
        "predictions": [
            {"bytesBase64Encoded": BASE64.encode(&png_bytes), "mimeType": "image/png"},
            {"bytesBase64Encoded": BASE64.encode(&jpg_bytes), "mimeType": "image/jpeg"},
        ]
    });
    let (base, handle) = spawn_stub("200 OK", response.to_string());

    let dir = tempfile::tempdir().unwrap();
    let (person, product) = write_inputs(dir.path());
    let output_dir = dir.path().join("results");

    let client = stub_client(&base);
    let saved = client
        .try_on()
        .submit(&person, &product, &output_dir, &TryOnParams::new().with_seed(42))
        .unwrap();

    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0], output_dir.join("vton_person_dress_0.png"));
    assert_eq!(saved[1], output_dir.join("vton_person_dress_1.jpg"));
    assert_eq!(fs::read(&saved[0]).unwrap(), png_bytes);
    assert_eq!(fs::read(&saved[1]).unwrap(), jpg_bytes);

    let raw = handle.join().unwrap();
    assert!(
        raw.to_ascii_lowercase().contains("authorization: bearer test-token"),
        "request lacked bearer auth: {}",
        raw
    );
    assert!(raw.starts_with(
        "POST /v1/projects/test-project/locations/us-central1/publishers/google/models/virtual-try-on-preview-08-04:predict"
    ));

    let body = request_body(&raw);
    assert_eq!(
        body["instances"][0]["personImage"]["image"]["bytesBase64Encoded"],
        BASE64.encode(b"person image bytes")
    );
    assert_eq!(
        body["instances"][0]["productImages"][0]["image"]["bytesBase64Encoded"],
        BASE64.encode(b"product image bytes")
    );
    assert_eq!(body["parameters"]["seed"], 42);
    assert_eq!(body["parameters"]["outputOptions"]["mimeType"], "image/png");
    assert!(body["parameters"]["outputOptions"]
        .get("compressionQuality")
        .is_none());
}

#[test]
fn submit_sends_compression_quality_for_jpeg() {
    let (base, handle) = spawn_stub("200 OK", r#"{"predictions": []}"#.to_string());

    let dir = tempfile::tempdir().unwrap();
    let (person, product) = write_inputs(dir.path());

    let params = TryOnParams::new()
        .with_output_mime_type(OutputMimeType::Jpeg)
        .with_compression_quality(85);
    let client = stub_client(&base);
    let saved = client
        .try_on()
        .submit(&person, &product, dir.path().join("results"), &params)
        .unwrap();
    assert!(saved.is_empty());

    let body = request_body(&handle.join().unwrap());
    assert_eq!(body["parameters"]["outputOptions"]["mimeType"], "image/jpeg");
    assert_eq!(body["parameters"]["outputOptions"]["compressionQuality"], 85);
    assert!(body["parameters"].get("seed").is_none());
}

#[test]
fn submit_surfaces_api_error_verbatim() {
    let (base, handle) = spawn_stub("403 Forbidden", r#"{"error":"denied"}"#.to_string());

    let dir = tempfile::tempdir().unwrap();
    let (person, product) = write_inputs(dir.path());
    let output_dir = dir.path().join("results");

    let client = stub_client(&base);
    let err = client
        .try_on()
        .submit(&person, &product, &output_dir, &TryOnParams::new())
        .unwrap_err();

    match err {
        VtonError::ApiError { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, r#"{"error":"denied"}"#);
        }
        other => panic!("expected ApiError, got {}", other),
    }
    // No output is written on failure.
    assert!(!output_dir.exists());

    handle.join().unwrap();
}

#[test]
fn client_requires_a_project_id() {
    let err = VertexClient::with_credentials(
        VertexConfig::new(),
        Box::new(StaticCredentials::new("tok")),
    )
    .err()
    .expect("construction should fail without a project id");
    assert!(matches!(err, VtonError::ConfigError(_)));
}

#[test]
fn client_takes_project_from_credentials() {
    let (base, handle) = spawn_stub("200 OK", r#"{"predictions": []}"#.to_string());

    let dir = tempfile::tempdir().unwrap();
    let (person, product) = write_inputs(dir.path());

    let config = VertexConfig::new().with_endpoint_base(base.as_str());
    let credentials = StaticCredentials::new("tok").with_project("ambient-project");
    let client = VertexClient::with_credentials(config, Box::new(credentials)).unwrap();
    client
        .try_on()
        .submit(&person, &product, dir.path().join("out"), &TryOnParams::new())
        .unwrap();

    let raw = handle.join().unwrap();
    assert!(raw.starts_with("POST /v1/projects/ambient-project/"));
}
