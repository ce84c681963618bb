// Common test utilities for integration tests.

use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

pub type H = HashMap<String, String>;

/// Makes an HTTP request.
pub async fn do_request(
    method: &str,
    url: &str,
    body: Option<&Value>,
) -> Result<reqwest::Response, reqwest::Error> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let mut request = match method {
        "GET" => client.get(url),
        "POST" => client.post(url),
        "DELETE" => client.delete(url),
        _ => panic!("unsupported method: {}", method),
    };

    if let Some(body) = body {
        request = request.json(body);
    }

    request.send().await
}

/// Makes an HTTP request and returns status, headers, raw body and the body
/// parsed as JSON when the response declares it.
pub async fn do_json(
    method: &str,
    url: &str,
    body: Option<&Value>,
) -> Result<(u16, H, Vec<u8>, Option<Value>), reqwest::Error> {
    let resp = do_request(method, url, body).await?;
    let status = resp.status().as_u16();

    let mut header_map = HashMap::new();
    for (k, v) in resp.headers() {
        if let Ok(v_str) = v.to_str() {
            header_map.insert(k.as_str().to_string(), v_str.to_string());
        }
    }

    let body = resp.bytes().await?.to_vec();
    let parsed = if header_map
        .get("content-type")
        .map(|s| s.contains("json"))
        .unwrap_or(false)
        && !body.is_empty()
    {
        serde_json::from_slice(&body).ok()
    } else {
        None
    };

    Ok((status, header_map, body, parsed))
}

/// GET returning status and JSON body; panics on transport errors or non-JSON.
pub async fn get_json(url: &str) -> (u16, Value) {
    let (status, _, body, parsed) = assert_ok(do_json("GET", url, None).await);
    let parsed = parsed.unwrap_or_else(|| {
        panic!(
            "expected JSON from {url}, got {:?}",
            String::from_utf8_lossy(&body)
        )
    });
    (status, parsed)
}

/// Assertions

/// Asserts that an error is None.
pub fn assert_ok<T, E: std::fmt::Display>(result: Result<T, E>) -> T {
    result.unwrap_or_else(|e| panic!("unexpected error: {}", e))
}

/// Asserts that two values are equal.
pub fn assert_equal<T: PartialEq + std::fmt::Debug>(want: T, got: T) {
    if want != got {
        panic!("want={:?} got={:?}", want, got);
    }
}

/// Reads an unsigned integer field.
pub fn u(v: &Value, field: &str) -> u64 {
    v[field]
        .as_u64()
        .unwrap_or_else(|| panic!("field {field} is not an unsigned integer in {v}"))
}
