use std::{
    io::{Read, Write},
    net::{TcpListener, TcpStream},
    thread,
};

use movies::{
    build_runtime,
    config::{ServiceConfig, StatusCodeMode},
    transport::{SharedRuntime, serve_http_once_with_listener, shared},
};
use serde_json::Value;

fn round_trip(runtime: &SharedRuntime, request: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let server_runtime = SharedRuntime::clone(runtime);
    let server = thread::spawn(move || serve_http_once_with_listener(&server_runtime, listener));

    let mut stream = TcpStream::connect(addr).expect("connect to server");
    stream
        .write_all(request.as_bytes())
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .expect("read response");

    server
        .join()
        .expect("server thread should not panic")
        .expect("connection should be handled");
    response
}

fn get(target: &str) -> String {
    format!("GET {target} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
}

fn json_request(method: &str, target: &str, body: &str) -> String {
    format!(
        "{method} {target} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn body_json(response: &str) -> Value {
    let (_, body) = response
        .split_once("\r\n\r\n")
        .expect("response should have a body separator");
    serde_json::from_str(body).expect("body should be JSON")
}

#[test]
fn end_to_end_crud_session_over_tcp() {
    let runtime = shared(build_runtime(&ServiceConfig::default()));

    let response = round_trip(&runtime, get("/movies"));
    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert_eq!(body_json(&response).as_array().map(Vec::len), Some(2));

    let created = r#"{"id":3,"title":"Dune","overview":"Spice","year":2021,"rating":8.0,"category":"Sci-Fi"}"#;
    let response = round_trip(&runtime, json_request("POST", "/movies", created));
    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert_eq!(body_json(&response)[2]["title"], "Dune");

    let updated = r#"{"title":"Dune: Part One","overview":"Spice","year":2021,"rating":8.1,"category":"Sci-Fi"}"#;
    let response = round_trip(&runtime, json_request("PUT", "/movies/3", updated));
    assert!(response.starts_with("HTTP/1.1 200 OK"));

    let response = round_trip(&runtime, get("/movies/?category=Sci-Fi"));
    let movie = body_json(&response);
    assert_eq!(movie["id"], 3);
    assert_eq!(movie["title"], "Dune: Part One");
    assert_eq!(movie["rating"], 8.1);

    let response = round_trip(
        &runtime,
        "DELETE /movies/3 HTTP/1.1\r\nHost: localhost\r\n\r\n".to_string(),
    );
    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert_eq!(body_json(&response)["data"].as_array().map(Vec::len), Some(2));

    let response = round_trip(&runtime, get("/movies/3"));
    assert!(response.starts_with("HTTP/1.1 404 Not Found"));
    assert!(response.ends_with("\r\n\r\n[]"));
}

#[test]
fn end_to_end_reference_status_codes_over_tcp() {
    let config = ServiceConfig {
        status_codes: StatusCodeMode::Reference,
        ..ServiceConfig::default()
    };
    let runtime = shared(build_runtime(&config));

    let response = round_trip(&runtime, get("/movies"));
    assert!(response.starts_with("HTTP/1.1 400 Bad Request"));
    assert_eq!(body_json(&response)[0]["title"], "Avatar");

    let body = r#"{"title":"X","overview":"Y","year":2000,"rating":1.0,"category":"Z"}"#;
    let response = round_trip(&runtime, json_request("PUT", "/movies/50", body));
    assert!(response.starts_with("HTTP/1.1 403 Forbidden"));
}

#[test]
fn end_to_end_malformed_request_gets_bad_request() {
    let runtime = shared(build_runtime(&ServiceConfig::default()));
    let response = round_trip(&runtime, "GET /movies HTTP/2\r\n\r\n".to_string());

    assert!(response.starts_with("HTTP/1.1 400 Bad Request"));
    assert!(response.contains("unsupported HTTP version"));
}
