use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/toggle/:date/:index", post(handlers::toggle_form))
        .route("/api/slots", get(handlers::get_slots))
        .route("/api/progress", get(handlers::get_all_progress))
        .route("/api/progress/:date", get(handlers::get_progress))
        .route("/api/progress/:date/:index", post(handlers::toggle_progress))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppData, SlotsResponse, ToggleResponse};
    use crate::slots::TimeSlots;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde::de::DeserializeOwned;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    static NEXT_FILE: AtomicUsize = AtomicUsize::new(0);

    fn test_state(slots: &[&str]) -> AppState {
        let n = NEXT_FILE.fetch_add(1, Ordering::SeqCst);
        let mut path = std::env::temp_dir();
        path.push(format!("squats_router_{}_{n}.json", std::process::id()));
        AppState::new(
            path,
            AppData::default(),
            TimeSlots::new(slots.iter().map(|s| s.to_string()).collect()),
        )
    }

    async fn call(state: &AppState, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router(state.clone())
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn json<T: DeserializeOwned>(body: &[u8]) -> T {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn fresh_day_reads_all_pending() {
        let state = test_state(&["7am", "noon", "6pm"]);
        let (status, body) = call(&state, "GET", "/api/progress/2024-03-05").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json::<Vec<bool>>(&body), vec![false, false, false]);
    }

    #[tokio::test]
    async fn toggle_returns_the_updated_day() {
        let state = test_state(&["7am", "noon", "6pm"]);
        let (status, body) = call(&state, "POST", "/api/progress/2024-03-05/1").await;
        assert_eq!(status, StatusCode::OK);
        let response: ToggleResponse = json(&body);
        assert!(response.success);
        assert_eq!(response.updated, vec![false, true, false]);
        assert!(response.message.is_some());

        let (_, body) = call(&state, "GET", "/api/progress/2024-03-05").await;
        assert_eq!(json::<Vec<bool>>(&body), vec![false, true, false]);

        let (_, body) = call(&state, "GET", "/api/progress").await;
        let all: std::collections::BTreeMap<String, Vec<bool>> = json(&body);
        assert_eq!(all["2024-03-05"], vec![false, true, false]);

        let _ = std::fs::remove_file(&state.data_path);
    }

    #[tokio::test]
    async fn bad_dates_and_indexes_are_rejected() {
        let state = test_state(&["7am"]);
        let (status, _) = call(&state, "GET", "/api/progress/2024-02-30").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = call(&state, "POST", "/api/progress/2024-03-05/1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = call(&state, "POST", "/api/progress/2024-03-05/first").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn failed_write_leaves_the_day_untouched() {
        let n = NEXT_FILE.fetch_add(1, Ordering::SeqCst);
        let mut dir = std::env::temp_dir();
        dir.push(format!("squats_router_dir_{}_{n}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let state = AppState::new(
            dir.clone(),
            AppData::default(),
            TimeSlots::new(vec!["7am".into(), "noon".into()]),
        );

        let (status, _) = call(&state, "POST", "/api/progress/2024-03-05/0").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (_, body) = call(&state, "GET", "/api/progress/2024-03-05").await;
        assert_eq!(json::<Vec<bool>>(&body), vec![false, false]);
        assert!(state.data.lock().await.days.is_empty());

        let _ = std::fs::remove_dir(&dir);
    }

    #[tokio::test]
    async fn slots_are_served_from_config() {
        let state = test_state(&["7am", "noon"]);
        let (_, body) = call(&state, "GET", "/api/slots").await;
        assert_eq!(json::<SlotsResponse>(&body).slots, vec!["7am", "noon"]);
    }

    #[tokio::test]
    async fn form_toggle_redirects_back_to_the_day() {
        let state = test_state(&["7am", "noon"]);
        let response = router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/toggle/2024-03-05/0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/?date=2024-03-05");
        let _ = std::fs::remove_file(&state.data_path);
    }

    #[tokio::test]
    async fn page_renders_one_button_per_slot() {
        let state = test_state(&["7am", "noon", "6pm"]);
        call(&state, "POST", "/api/progress/2024-03-05/0").await;

        let (status, body) = call(&state, "GET", "/?date=2024-03-05").await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert_eq!(html.matches("class=\"slot-form\"").count(), 3);
        assert!(html.contains("Progress: 1/3"));
        assert!(html.contains("March 2024"));

        let (status, _) = call(&state, "GET", "/?date=tomorrow").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let _ = std::fs::remove_file(&state.data_path);
    }
}
