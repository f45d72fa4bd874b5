// Request handlers module
//
// Handlers take the shared state plus already-collected input, so tests can
// drive them directly against the in-memory store.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use uuid::Uuid;

use super::response::{bad_request, json_response, server_error};
use super::types::{HealthResponse, UploadRequest, UploadResponse};
use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::model::{NewSimulation, Subject};
use crate::store::StoreError;

/// `POST /api/upload` — validate and persist a simulation, return its link.
pub async fn upload(state: &AppState, body: &[u8]) -> Response<Full<Bytes>> {
    let request: UploadRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => return bad_request(&format!("Invalid JSON: {e}")),
    };

    let Ok(subject) = request.subject.parse::<Subject>() else {
        return bad_request("Invalid subject");
    };

    if request.chapter.is_empty() || request.html_content.is_empty() {
        return bad_request("Missing chapter or HTML content");
    }

    let sim = NewSimulation {
        subject,
        chapter: request.chapter,
        html_content: request.html_content,
    };

    match state.store.insert(sim).await {
        Ok(id) => {
            let url = format!("{}/sim/{id}", state.config.public_base_url());
            json_response(StatusCode::OK, &UploadResponse { success: true, url })
        }
        Err(e) => {
            logger::log_error(&format!("Failed to save simulation: {e}"));
            server_error("Failed to save simulation")
        }
    }
}

/// `GET /sim/:id` — serve the stored HTML verbatim.
///
/// A malformed id never reached a row, so it gets the same 404 page as an
/// unknown one.
pub async fn serve_simulation(state: &AppState, id: &str) -> Response<Full<Bytes>> {
    let Ok(id) = id.parse::<Uuid>() else {
        return http::build_404_html_response();
    };

    match state.store.fetch_html(id).await {
        Ok(html) => http::build_html_response(html),
        Err(StoreError::NotFound) => http::build_404_html_response(),
        Err(e) => {
            logger::log_error(&format!("Failed to fetch simulation {id}: {e}"));
            http::build_500_html_response()
        }
    }
}

/// `GET /api/simulations?subject=<name>` — summaries for one subject.
pub async fn list_simulations(state: &AppState, query: Option<&str>) -> Response<Full<Bytes>> {
    let Some(subject) = query
        .and_then(|q| super::query_param(q, "subject"))
        .and_then(|s| s.parse::<Subject>().ok())
    else {
        return bad_request("Missing or invalid subject");
    };

    match state.store.list_by_subject(subject).await {
        Ok(summaries) => json_response(StatusCode::OK, &summaries),
        Err(e) => {
            logger::log_error(&format!("Failed to list simulations for {subject}: {e}"));
            server_error("Failed to list simulations")
        }
    }
}

/// `GET /api/health` — liveness only, must not touch storage.
pub fn health() -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &HealthResponse { ok: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::MemoryStore;
    use http_body_util::BodyExt;
    use std::sync::Arc;

    fn test_state() -> (AppState, Arc<MemoryStore>) {
        let mut config = Config::load_from("nonexistent-config").unwrap();
        config.server.public_base_url = "https://sims.example.com".to_string();
        let store = Arc::new(MemoryStore::new());
        (AppState::new(config, store.clone()), store)
    }

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn upload_body(subject: &str, chapter: &str, html: &str) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "subject": subject,
            "chapter": chapter,
            "htmlContent": html,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_upload_rejects_invalid_subject_without_insert() {
        let (state, store) = test_state();
        let body = upload_body("History", "WW2", "<html></html>");

        let response = upload(&state, &body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("Invalid subject"));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_upload_rejects_missing_fields() {
        let (state, store) = test_state();

        let no_chapter = upload_body("Physics", "", "<html></html>");
        let response = upload(&state, &no_chapter).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let no_html = serde_json::to_vec(&serde_json::json!({
            "subject": "Physics",
            "chapter": "Optics",
        }))
        .unwrap();
        let response = upload(&state, &no_html).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response)
            .await
            .contains("Missing chapter or HTML content"));

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_upload_rejects_malformed_json() {
        let (state, _) = test_state();
        let response = upload(&state, b"not json").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_then_fetch_round_trip() {
        let (state, _) = test_state();
        let html = "<html><body>Hi</body></html>";
        let body = upload_body("Physics", "Newton's Laws", html);

        let response = upload(&state, &body).await;
        assert_eq!(response.status(), StatusCode::OK);

        let payload: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(payload["success"], true);
        let url = payload["url"].as_str().unwrap();
        let id = url.rsplit('/').next().unwrap().to_string();
        assert!(url.starts_with("https://sims.example.com/sim/"));

        let fetched = serve_simulation(&state, &id).await;
        assert_eq!(fetched.status(), StatusCode::OK);
        assert_eq!(
            fetched.headers().get("Content-Type").unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(body_string(fetched).await, html);
    }

    #[tokio::test]
    async fn test_fetch_unknown_id_is_404() {
        let (state, _) = test_state();
        let response =
            serve_simulation(&state, "4f1ab6b0-0000-0000-0000-000000000000").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fetch_malformed_id_is_404() {
        let (state, _) = test_state();
        let response = serve_simulation(&state, "not-a-uuid").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_uploads_stay_independent() {
        let (state, store) = test_state();

        let first = upload(&state, &upload_body("Maths", "Algebra", "<p>v1</p>")).await;
        let second = upload(&state, &upload_body("Maths", "Algebra", "<p>v2</p>")).await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(store.len().await, 2);

        let id_of = |json: String| {
            let v: serde_json::Value = serde_json::from_str(&json).unwrap();
            v["url"].as_str().unwrap().rsplit('/').next().unwrap().to_string()
        };
        let first_id = id_of(body_string(first).await);
        let second_id = id_of(body_string(second).await);
        assert_ne!(first_id, second_id);

        let v1 = serve_simulation(&state, &first_id).await;
        let v2 = serve_simulation(&state, &second_id).await;
        assert_eq!(body_string(v1).await, "<p>v1</p>");
        assert_eq!(body_string(v2).await, "<p>v2</p>");
    }

    #[tokio::test]
    async fn test_list_filters_by_subject() {
        let (state, _) = test_state();
        upload(&state, &upload_body("Physics", "Optics", "<p>o</p>")).await;
        upload(&state, &upload_body("Biology", "Cells", "<p>c</p>")).await;

        let response = list_simulations(&state, Some("subject=Physics")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let rows: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 1);
        assert_eq!(rows[0]["chapter"], "Optics");
    }

    #[tokio::test]
    async fn test_list_requires_valid_subject() {
        let (state, _) = test_state();

        let missing = list_simulations(&state, None).await;
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let invalid = list_simulations(&state, Some("subject=Astrology")).await;
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_never_touches_store() {
        let response = health();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"ok":true}"#);
    }
}
