use axum::routing::{delete, get, post};
use axum::Router;

use backend_application::AppState;

use crate::handlers::{
    dashboard_handlers, event_handlers, impact_handlers, ops_handlers, volunteer_handlers,
    waste_handlers,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/events",
            post(event_handlers::create_event).get(event_handlers::list_events),
        )
        .route(
            "/v1/events/:event_id",
            get(event_handlers::get_event)
                .put(event_handlers::update_event)
                .delete(event_handlers::delete_event),
        )
        .route(
            "/v1/events/:event_id/registrations",
            post(event_handlers::register_for_event),
        )
        .route(
            "/v1/events/:event_id/registrations/:volunteer_id",
            delete(event_handlers::unregister_from_event),
        )
        .route("/v1/volunteers", post(volunteer_handlers::create_volunteer))
        .route(
            "/v1/volunteers/:volunteer_id",
            get(volunteer_handlers::get_volunteer),
        )
        .route("/v1/waste", post(waste_handlers::submit_waste))
        .route("/v1/waste/batch", post(waste_handlers::submit_waste_batch))
        .route(
            "/v1/waste/events/:event_id",
            get(waste_handlers::list_event_waste),
        )
        .route(
            "/v1/waste/events/:event_id/stats",
            get(waste_handlers::event_waste_stats),
        )
        .route("/v1/impact/:event_id", get(impact_handlers::get_impact))
        .route(
            "/v1/impact/:event_id/generate",
            post(impact_handlers::generate_impact),
        )
        .route(
            "/v1/dashboard/overall",
            get(dashboard_handlers::overall_dashboard),
        )
        .route(
            "/v1/dashboard/events/:event_id",
            get(dashboard_handlers::event_dashboard),
        )
        .route(
            "/v1/dashboard/volunteers/:volunteer_id",
            get(dashboard_handlers::volunteer_dashboard),
        )
        .route(
            "/v1/dashboard/leaderboard",
            get(dashboard_handlers::leaderboard),
        )
        .route("/v1/ops/health/live", get(ops_handlers::health_live))
        .route("/v1/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/v1/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .route("/v1/ops/jobs", get(ops_handlers::get_job_status))
        .route("/v1/ops/jobs/:job/run", post(ops_handlers::trigger_job))
        .route(
            "/v1/ops/coefficients",
            get(ops_handlers::get_coefficients).put(ops_handlers::update_coefficients),
        )
        .route(
            "/v1/ops/notifications",
            get(ops_handlers::list_notifications),
        )
        .route(
            "/v1/ops/notification-target/check",
            get(ops_handlers::notification_target_check),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tokio::sync::RwLock;
    use tower::ServiceExt;

    use backend_application::{AppState, JobGates, Metrics};
    use backend_domain::{CoefficientTable, JobStatus, RuntimeConfig};
    use backend_infrastructure::{
        CoefficientFileRepository, DefaultHealthService, InMemoryStore,
        WebhookNotificationDispatcher,
    };

    use super::build_router;

    fn test_state(api_token: Option<&str>) -> AppState {
        let store = Arc::new(InMemoryStore::new());
        let config = RuntimeConfig {
            api_token: api_token.map(ToString::to_string),
            coefficients_path: std::env::temp_dir()
                .join(format!("shoreline-http-{}.yaml", uuid::Uuid::new_v4()))
                .to_string_lossy()
                .to_string(),
            ..RuntimeConfig::default()
        };
        let notifier = Arc::new(WebhookNotificationDispatcher::new(&config).expect("notifier"));
        AppState {
            health: Arc::new(DefaultHealthService::new(store.clone(), notifier.clone())),
            config,
            event_repo: store.clone(),
            waste_repo: store.clone(),
            impact_repo: store.clone(),
            volunteer_repo: store,
            coefficient_repo: Arc::new(CoefficientFileRepository::new()),
            notifier,
            coefficients: Arc::new(RwLock::new(CoefficientTable::default())),
            metrics: Arc::new(Metrics::default()),
            job_status: Arc::new(RwLock::new(JobStatus::default())),
            job_gates: Arc::new(JobGates::default()),
        }
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn event_lifecycle_over_http() {
        let router = build_router(test_state(None));

        let created = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/v1/events",
                json!({
                    "name": "Harbour sweep",
                    "date_of_event": "2099-06-01",
                    "start_time": "09:00",
                    "end_time": "12:00",
                    "registration_deadline": "2099-05-30T18:00:00Z",
                    "beach_name": "Harbour Beach"
                }),
            ))
            .await
            .expect("create");
        assert_eq!(created.status(), StatusCode::CREATED);
        let event = body_json(created).await;
        assert_eq!(event["status"], "upcoming");
        let event_id = event["id"].as_str().expect("id").to_string();

        let volunteer = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/v1/volunteers",
                json!({"name": "Noor", "email": "noor@shore.test"}),
            ))
            .await
            .expect("volunteer");
        assert_eq!(volunteer.status(), StatusCode::CREATED);
        let volunteer_id = body_json(volunteer).await["id"]
            .as_str()
            .expect("id")
            .to_string();

        let registered = router
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/v1/events/{}/registrations", event_id),
                json!({ "volunteer_id": volunteer_id }),
            ))
            .await
            .expect("register");
        assert_eq!(registered.status(), StatusCode::OK);
        assert_eq!(body_json(registered).await["volunteer_register_count"], 1);

        let listed = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/v1/events?status=upcoming")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("list");
        assert_eq!(body_json(listed).await.as_array().map(Vec::len), Some(1));

        let impact = router
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/impact/{}", event_id))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("impact");
        assert_eq!(impact.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn event_edit_delete_and_dashboards_over_http() {
        let router = build_router(test_state(None));

        let created = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/v1/events",
                json!({
                    "name": "Cove sweep",
                    "date_of_event": "2099-07-01",
                    "start_time": "9:00",
                    "end_time": "11:00",
                    "registration_deadline": "2099-06-30T18:00:00Z",
                    "beach_name": "Cove"
                }),
            ))
            .await
            .expect("create");
        let event = body_json(created).await;
        assert_eq!(event["start_time"], "09:00");
        let event_id = event["id"].as_str().expect("id").to_string();

        let edited = router
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/v1/events/{}", event_id),
                json!({"end_time": "12:30", "description": "north end"}),
            ))
            .await
            .expect("edit");
        assert_eq!(edited.status(), StatusCode::OK);
        let edited = body_json(edited).await;
        assert_eq!(edited["end_time"], "12:30");
        assert_eq!(edited["name"], "Cove sweep");

        let inverted = router
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/v1/events/{}", event_id),
                json!({"end_time": "08:00"}),
            ))
            .await
            .expect("inverted");
        assert_eq!(inverted.status(), StatusCode::BAD_REQUEST);

        let view = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/dashboard/events/{}", event_id))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("event dashboard");
        assert_eq!(view.status(), StatusCode::OK);
        assert_eq!(body_json(view).await["impact_finalized"], false);

        let board = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/v1/dashboard/leaderboard?limit=5")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("leaderboard");
        assert_eq!(board.status(), StatusCode::OK);
        assert_eq!(body_json(board).await.as_array().map(Vec::len), Some(0));

        let deleted = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/v1/events/{}", event_id))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("delete");
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let gone = router
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/events/{}", event_id))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("get");
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn ops_routes_require_token() {
        let router = build_router(test_state(Some("ops-token")));

        let denied = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/v1/ops/jobs")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("denied");
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

        let ran = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/ops/jobs/status/run")
                    .header("Authorization", "Bearer ops-token")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("run");
        assert_eq!(ran.status(), StatusCode::OK);
        assert_eq!(body_json(ran).await["skipped"], false);

        let unknown = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/ops/jobs/cleanup/run")
                    .header("Authorization", "Bearer ops-token")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("unknown");
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

        let live = router
            .oneshot(
                Request::builder()
                    .uri("/v1/ops/health/ready")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("ready");
        assert_eq!(live.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn waste_batch_rejects_unknown_event() {
        let router = build_router(test_state(None));
        let response = router
            .oneshot(json_request(
                "POST",
                "/v1/waste/batch",
                json!({"records": [{
                    "event_id": uuid::Uuid::new_v4(),
                    "category": "plastic",
                    "type": "bottle",
                    "weight": 1.0
                }]}),
            ))
            .await
            .expect("batch");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
