//! Router configuration and server setup.

use axum::{http::HeaderValue, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

use crate::config::ApiConfig;
use crate::handlers;
use crate::state::AppState;

/// Creates the API router.
///
/// Collection names are data, not routes, so every request goes through the
/// single dispatch handler.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .fallback(handlers::dispatch)
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Starts the API server.
pub async fn serve(config: ApiConfig, state: AppState) -> Result<(), std::io::Error> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("MockAPI listening on {}", addr);
    axum::serve(listener, create_router(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Method, StatusCode};
    use axum_test::TestServer;
    use mockapi_models::{Collection, Dataset, Schema};
    use mockapi_store::{DataStore, StoreSettings};
    use serde_json::{json, Value};
    use std::path::Path;
    use tempfile::tempdir;

    fn shop_schema() -> Dataset {
        Dataset::new()
            .with_collection(
                "customers",
                Collection::new(Schema::new(["firstname", "lastname", "email"]).with_has("orders")),
            )
            .with_collection(
                "orders",
                Collection::new(
                    Schema::new(["customers.id", "orderdate", "ordertotal"])
                        .with_belongs_to("customers"),
                ),
            )
    }

    fn make_state_at(path: &Path) -> AppState {
        let store =
            DataStore::open(StoreSettings::new(path).with_schema(shop_schema())).unwrap();
        AppState::new(ApiConfig::default(), store)
    }

    fn make_test_state() -> AppState {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mockapi.json");
        std::mem::forget(dir);
        make_state_at(&path)
    }

    fn make_server() -> TestServer {
        TestServer::new(create_router(make_test_state())).unwrap()
    }

    async fn create_customer(server: &TestServer, first: &str) -> String {
        let response = server
            .post("/customers")
            .form(&[("firstname", first), ("lastname", "Doe"), ("email", "jd@email.com")])
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        body["id"].as_str().unwrap().to_string()
    }

    async fn create_order(server: &TestServer, customer: &str, total: &str) -> String {
        let response = server
            .post("/orders")
            .form(&[
                ("customers.id", customer),
                ("orderdate", "2015/10/13"),
                ("ordertotal", total),
            ])
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_list_empty_collection() {
        let server = make_server();

        let response = server.get("/customers").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let server = make_server();
        let id = create_customer(&server, "John").await;

        let response = server.get(&format!("/customers/{}", id)).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(
            body,
            json!({
                "firstname": "John",
                "lastname": "Doe",
                "email": "jd@email.com",
                "id": id
            })
        );
    }

    #[tokio::test]
    async fn test_create_drops_unknown_fields() {
        let server = make_server();

        let response = server
            .post("/customers")
            .form(&[("firstname", "Jane"), ("role", "admin")])
            .await;
        response.assert_status(StatusCode::CREATED);
        let id = response.json::<Value>()["id"].as_str().unwrap().to_string();

        let body: Value = server.get(&format!("/customers/{}", id)).await.json();
        assert!(body.get("role").is_none());
        assert_eq!(body["lastname"], Value::Null);
    }

    #[tokio::test]
    async fn test_create_with_json_body() {
        let server = make_server();

        let response = server
            .post("/customers")
            .json(&json!({"firstname": "Ada", "email": "ada@email.com"}))
            .await;
        response.assert_status(StatusCode::CREATED);

        let list: Value = server.get("/customers").await.json();
        assert_eq!(list[0]["firstname"], "Ada");
    }

    #[tokio::test]
    async fn test_post_to_resource_related_creates_in_first_collection() {
        let server = make_server();
        let id = create_customer(&server, "John").await;

        let response = server
            .post(&format!("/customers/{}/orders", id))
            .form(&[("firstname", "Second")])
            .await;
        response.assert_status(StatusCode::CREATED);

        let customers: Value = server.get("/customers").await.json();
        assert_eq!(customers.as_array().unwrap().len(), 2);
        let orders: Value = server.get("/orders").await.json();
        assert!(orders.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_resource() {
        let server = make_server();

        let response = server.get("/customers/nonexistent").await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid resource");
    }

    #[tokio::test]
    async fn test_get_unknown_collection_is_unsupported() {
        let server = make_server();

        let response = server.get("/products").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["message"], "URI pattern not supported");
    }

    #[tokio::test]
    async fn test_get_root_is_unsupported() {
        let server = make_server();
        server.get("/").await.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_customer_with_orders() {
        let server = make_server();
        let c1 = create_customer(&server, "John").await;
        let o1 = create_order(&server, &c1, "325.00").await;
        let c2 = create_customer(&server, "Alex").await;
        create_order(&server, &c2, "25.00").await;

        let response = server.get(&format!("/customers/{}/orders", c1)).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["id"], c1.as_str());
        assert_eq!(
            body["orders"],
            json!([{
                "customers.id": c1,
                "orderdate": "2015/10/13",
                "ordertotal": "325.00",
                "id": o1
            }])
        );
    }

    #[tokio::test]
    async fn test_list_orders_with_customers() {
        let server = make_server();
        let c1 = create_customer(&server, "John").await;
        create_order(&server, &c1, "325.00").await;
        create_order(&server, &c1, "1287.00").await;

        let response = server.get("/orders/customers").await;
        response.assert_status_ok();

        let body: Value = response.json();
        let orders = body.as_array().unwrap();
        assert_eq!(orders.len(), 2);
        for order in orders {
            assert_eq!(order["customers"][0]["firstname"], "John");
        }
    }

    #[tokio::test]
    async fn test_put_updates_resource() {
        let server = make_server();
        let id = create_customer(&server, "John").await;

        let response = server
            .put(&format!("/customers/{}", id))
            .form(&[("firstname", "Johnny"), ("lastname", "Doe")])
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "Ok");

        let list: Value = server.get("/customers").await.json();
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["firstname"], "Johnny");
        assert_eq!(list[0]["email"], Value::Null);
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let server = make_server();
        let c1 = create_customer(&server, "John").await;
        create_order(&server, &c1, "325.00").await;

        let response = server.delete(&format!("/customers/{}", c1)).await;
        response.assert_status(StatusCode::NO_CONTENT);

        let orders: Value = server.get("/orders").await.json();
        assert!(orders.as_array().unwrap().is_empty());
        server
            .get(&format!("/customers/{}", c1))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_missing_resource() {
        let server = make_server();

        let response = server.delete("/customers/nonexistent").await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body["message"], "Resource not found");
    }

    #[tokio::test]
    async fn test_unwritable_data_file_reports_save_failed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mockapi.json");
        let server = TestServer::new(create_router(make_state_at(&path))).unwrap();
        let id = create_customer(&server, "John").await;

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let create = server
            .post("/customers")
            .form(&[("firstname", "Jane")])
            .await;
        let update = server
            .put(&format!("/customers/{}", id))
            .form(&[("firstname", "Jack")])
            .await;
        let delete = server.delete(&format!("/customers/{}", id)).await;

        for response in [create, update, delete] {
            response.assert_status(StatusCode::EXPECTATION_FAILED);
            let body: Value = response.json();
            assert_eq!(body, json!({"message": "Save operation failed"}));
        }

        // the failed writes left the in-memory store untouched
        let body: Value = server.get(&format!("/customers/{}", id)).await.json();
        assert_eq!(body["firstname"], "John");
        let body: Value = server.get("/customers").await.json();
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_query_key_is_json_error() {
        let server = make_server();

        let response = server
            .get("/customers")
            .add_query_param("url", "customers")
            .add_query_param("url", "orders")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.header(header::CONTENT_TYPE), "application/json");
        let body: Value = response.json();
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid query string"));
    }

    #[tokio::test]
    async fn test_unsupported_method_pattern_combinations() {
        let server = make_server();
        let id = create_customer(&server, "John").await;

        server.put("/customers").await.assert_status(StatusCode::BAD_REQUEST);
        server.delete("/customers").await.assert_status(StatusCode::BAD_REQUEST);
        server
            .post(&format!("/customers/{}", id))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .put(&format!("/customers/{}/orders", id))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .delete(&format!("/customers/{}/orders", id))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server.post("/orders/customers").await.assert_status(StatusCode::BAD_REQUEST);
        server.put("/orders/customers").await.assert_status(StatusCode::BAD_REQUEST);
        server.delete("/orders/customers").await.assert_status(StatusCode::BAD_REQUEST);
        server.post("/products").await.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = server.put("/customers").await.json();
        assert_eq!(body["message"], "URI not supported");
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let server = make_server();

        let response = server.method(Method::PATCH, "/customers").await;
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);

        let body: Value = response.json();
        assert_eq!(body["message"], "Method not supported");
    }

    #[tokio::test]
    async fn test_url_query_escape_hatch() {
        let server = make_server();
        let id = create_customer(&server, "John").await;

        let response = server
            .get("/")
            .add_query_param("url", format!("customers/{}/", id))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["firstname"], "John");
    }

    #[tokio::test]
    async fn test_jsonp_callback() {
        let server = make_server();
        create_customer(&server, "John").await;

        let response = server
            .get("/customers")
            .add_query_param("callback", "handleCustomers")
            .await;
        response.assert_status_ok();

        assert_eq!(response.header(header::CONTENT_TYPE), "text/javascript");
        let text = response.text();
        assert!(text.starts_with("handleCustomers(["));
        assert!(text.ends_with("]);"));
    }

    #[tokio::test]
    async fn test_invalid_callback_rejected() {
        let server = make_server();

        let response = server
            .get("/customers")
            .add_query_param("callback", "alert(document.cookie)")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.header(header::CONTENT_TYPE), "application/json");
    }

    #[tokio::test]
    async fn test_range_and_offset_are_ignored() {
        let server = make_server();
        for name in ["A", "B", "C"] {
            create_customer(&server, name).await;
        }

        let response = server
            .get("/customers")
            .add_query_param("range", "1")
            .add_query_param("offset", "2")
            .await;
        let body: Value = response.json();
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_repeated_gets_are_identical() {
        let server = make_server();
        let c1 = create_customer(&server, "John").await;
        create_order(&server, &c1, "325.00").await;

        let first = server.get("/customers/orders").await.text();
        let second = server.get("/customers/orders").await.text();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let server = make_server();

        let response = server
            .get("/customers")
            .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:3000"))
            .await;

        assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), "*");
    }
}
