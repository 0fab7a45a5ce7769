use actix_web::{http::StatusCode, web, HttpResponse, Responder, ResponseError};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::domain::order::{
    CancelOrderRequest, CreateOrderRequest, OrderCommandHandler, OrderError,
};
use crate::metrics::Metrics;

// ============================================================================
// HTTP Handlers
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderCommandHandler>,
    pub metrics: Arc<Metrics>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderResponse {
    ok: bool,
    order_id: Uuid,
}

#[derive(Debug, Serialize)]
struct CancelOrderResponse {
    ok: bool,
}

impl ResponseError for OrderError {
    fn status_code(&self) -> StatusCode {
        match self {
            OrderError::MissingField(_)
            | OrderError::InvalidLocation
            | OrderError::EmptyItems
            | OrderError::InvalidItem { .. }
            | OrderError::InvalidStateTransition(_) => StatusCode::BAD_REQUEST,
            OrderError::Forbidden => StatusCode::FORBIDDEN,
            OrderError::NotFound => StatusCode::NOT_FOUND,
            OrderError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // The Display impl of Internal is already generic; the source only
        // goes to the operator log, never the caller.
        if let OrderError::Internal(source) = self {
            tracing::error!(error = ?source, "Unexpected failure handling order request");
        }

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "ok": false,
            "error": self.to_string(),
        }))
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/createOrderDelivery")
            .route(web::post().to(create_order_delivery))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/cancelOrderDelivery")
            .route(web::post().to(cancel_order_delivery))
            .default_service(web::to(method_not_allowed)),
    )
    .route("/health", web::get().to(health_handler))
    .route("/metrics", web::get().to(metrics_handler));
}

async fn create_order_delivery(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, OrderError> {
    let started = Instant::now();

    let result = state.orders.create_order(body.into_inner()).await;
    state.metrics.observe_request(started.elapsed().as_secs_f64());

    match result {
        Ok(order_id) => {
            state.metrics.record_order_created();
            Ok(HttpResponse::Ok().json(CreateOrderResponse { ok: true, order_id }))
        }
        Err(err) => {
            state.metrics.record_rejection(err.kind());
            Err(err)
        }
    }
}

async fn cancel_order_delivery(
    state: web::Data<AppState>,
    body: web::Json<CancelOrderRequest>,
) -> Result<HttpResponse, OrderError> {
    let started = Instant::now();

    let result = state.orders.cancel_order(body.into_inner()).await;
    state.metrics.observe_request(started.elapsed().as_secs_f64());

    match result {
        Ok(()) => {
            state.metrics.record_order_cancelled();
            Ok(HttpResponse::Ok().json(CancelOrderResponse { ok: true }))
        }
        Err(err) => {
            state.metrics.record_rejection(err.kind());
            Err(err)
        }
    }
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().finish()
}

async fn health_handler() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "orders-delivery"
    }))
}

async fn metrics_handler(state: web::Data<AppState>) -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = state.metrics.registry().gather();

    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use actix_web::{test, App};

    fn test_state() -> AppState {
        let store = Arc::new(MemoryStore::new());
        AppState {
            orders: Arc::new(OrderCommandHandler::new(store, "MXN")),
            metrics: Arc::new(Metrics::new().unwrap()),
        }
    }

    fn intake_body() -> serde_json::Value {
        serde_json::json!({
            "userId": "u1",
            "localId": "L1",
            "zoneId": "Z1",
            "location": {"lat": 19.4, "lng": -99.1},
            "items": [{"productId": "p1", "quantity": 2, "unitPrice": 50}],
        })
    }

    #[actix_web::test]
    async fn test_create_then_cancel_round_trip() {
        let state = test_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(routes),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/createOrderDelivery")
            .set_json(intake_body())
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["ok"], true);
        let order_id = body["orderId"].as_str().unwrap().to_string();

        let request = test::TestRequest::post()
            .uri("/cancelOrderDelivery")
            .set_json(serde_json::json!({
                "userId": "u1",
                "orderId": order_id,
                "reason": "changed mind",
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body, serde_json::json!({"ok": true}));

        assert_eq!(state.metrics.orders_created.get(), 1);
        assert_eq!(state.metrics.orders_cancelled.get(), 1);
    }

    #[actix_web::test]
    async fn test_validation_error_maps_to_400() {
        let state = test_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(routes),
        )
        .await;

        let mut body = intake_body();
        body["items"] = serde_json::json!([]);

        let request = test::TestRequest::post()
            .uri("/createOrderDelivery")
            .set_json(body)
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_foreign_cancel_maps_to_403() {
        let state = test_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(routes),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/createOrderDelivery")
            .set_json(intake_body())
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        let order_id = body["orderId"].as_str().unwrap().to_string();

        let request = test::TestRequest::post()
            .uri("/cancelOrderDelivery")
            .set_json(serde_json::json!({"userId": "intruder", "orderId": order_id}))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_unknown_order_maps_to_404() {
        let state = test_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(routes),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/cancelOrderDelivery")
            .set_json(serde_json::json!({
                "userId": "u1",
                "orderId": Uuid::new_v4(),
            }))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_non_post_method_maps_to_405() {
        let state = test_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(routes),
        )
        .await;

        let request = test::TestRequest::get()
            .uri("/createOrderDelivery")
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[actix_web::test]
    async fn test_health_and_metrics_endpoints() {
        let state = test_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(routes),
        )
        .await;

        let request = test::TestRequest::get().uri("/health").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let request = test::TestRequest::get().uri("/metrics").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
