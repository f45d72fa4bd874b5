// API module entry
// Routing and request plumbing for the HTTP surface

mod handlers;
mod response;
mod types;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::logger::AccessLogEntry;

/// Main entry point for request handling.
///
/// Dispatches on method and path, applies the body-size limit before reading
/// any body, and writes one access log line per request.
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);

    let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), method.to_string(), path.clone());
    entry.query = query.clone();
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header_value(&req, "referer");
    entry.user_agent = header_value(&req, "user-agent");

    let response = route_request(req, &method, &path, query.as_deref(), &state).await;
    let response = finalize(response, &state);

    entry.status = response.status().as_u16();
    entry.body_bytes = body_len(&response);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    if state.config.logging.access_log {
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn route_request(
    req: Request<hyper::body::Incoming>,
    method: &Method,
    path: &str,
    query: Option<&str>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    if *method == Method::OPTIONS {
        return http::build_options_response(state.config.http.enable_cors);
    }

    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return resp;
    }

    match (method, path) {
        (&Method::POST, "/api/upload") => {
            let Ok(collected) = req.collect().await else {
                return response::bad_request("Failed to read request body");
            };
            handlers::upload(state, &collected.to_bytes()).await
        }
        (&Method::GET, "/api/health") => handlers::health(),
        (&Method::GET, "/api/simulations") => handlers::list_simulations(state, query).await,
        (&Method::GET, _) => match sim_id_from_path(path) {
            Some(id) => handlers::serve_simulation(state, id).await,
            None => not_found_for(path),
        },
        (&Method::POST, _) => not_found_for(path),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            http::build_405_response()
        }
    }
}

/// Extract the identifier segment of a `/sim/:id` path.
fn sim_id_from_path(path: &str) -> Option<&str> {
    let id = path.strip_prefix("/sim/")?;
    if id.is_empty() || id.contains('/') {
        return None;
    }
    Some(id)
}

/// JSON 404 under /api, HTML elsewhere (browser-facing paths).
fn not_found_for(path: &str) -> Response<Full<Bytes>> {
    if path.starts_with("/api/") {
        response::not_found()
    } else {
        http::build_404_html_response()
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    req: &Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    let size_str = content_length.to_str().ok()?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
        _ => None,
    }
}

/// Stamp the Server header and, when enabled, the CORS origin header.
fn finalize(mut response: Response<Full<Bytes>>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let headers = response.headers_mut();
    if let Ok(name) = state.config.http.server_name.parse() {
        headers.insert("Server", name);
    }
    if state.config.http.enable_cors && !headers.contains_key("Access-Control-Allow-Origin") {
        headers.insert(
            "Access-Control-Allow-Origin",
            hyper::header::HeaderValue::from_static("*"),
        );
    }
    response
}

fn header_value(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn body_len(response: &Response<Full<Bytes>>) -> usize {
    use hyper::body::Body;
    usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(0)
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

/// Find a key in a raw query string. Subject names are plain ASCII, so no
/// percent-decoding is needed here.
fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then_some(v)
    })
}
