//! Collection handlers.
//!
//! A single entry point classifies the request path and dispatches to one
//! store operation per method and pattern.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::Response,
};
use serde_json::Value;
use tracing::{debug, trace};

use mockapi_store::{DataStore, QueryOptions};

use crate::error::{ApiError, Result};
use crate::latency::simulate_latency;
use crate::pattern::RoutePattern;
use crate::response::Payload;
use crate::state::AppState;
use crate::types::{parse_fields, CreatedResponse, MessageResponse, RequestQuery};

/// Handles every request: `/collection`, `/collection/id`,
/// `/collection/id/related` and `/collection/related`.
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    query: std::result::Result<Query<RequestQuery>, QueryRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    simulate_latency(state.config.latency_factor).await;

    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            let message = format!("Invalid query string: {}", rejection.body_text());
            return Payload::from(ApiError::BadRequest(message)).render(None);
        }
    };

    let callback = match query.callback() {
        Ok(callback) => callback,
        Err(e) => return Payload::from(e).render(None),
    };
    trace!(range = query.range(), offset = query.offset(), "paging parameters ignored");

    let segments = query.segments(uri.path());
    let payload = handle(&state, &method, &segments, &headers, &body)
        .await
        .unwrap_or_else(Payload::from);

    payload.render(callback)
}

async fn handle(
    state: &AppState,
    method: &Method,
    segments: &[String],
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Payload> {
    match *method {
        Method::GET => {
            let store = state.store.read().await;
            let pattern = RoutePattern::classify(segments, |s| store.collection_exists(s));
            debug!(%method, %pattern, "dispatching");
            read(&store, &pattern)
        }
        Method::POST | Method::PUT | Method::DELETE => {
            let mut store = state.store.write().await;
            let pattern = RoutePattern::classify(segments, |s| store.collection_exists(s));
            debug!(%method, %pattern, "dispatching");
            match *method {
                Method::POST => create(&mut store, &pattern, headers, body),
                Method::PUT => update(&mut store, &pattern, headers, body),
                _ => delete(&mut store, &pattern),
            }
        }
        _ => Err(ApiError::MethodNotAllowed(
            "Method not supported".to_string(),
        )),
    }
}

/// GET: list, get by id, and their related-collection variants.
fn read(store: &DataStore, pattern: &RoutePattern<'_>) -> Result<Payload> {
    let invalid_collection = || ApiError::NotFound("Invalid collection".to_string());
    let invalid_resource = || ApiError::NotFound("Invalid resource".to_string());

    let body = match *pattern {
        RoutePattern::Collection { collection } => store
            .list_resources(collection, &QueryOptions::new())
            .map(views_to_value)
            .ok_or_else(invalid_collection)?,
        RoutePattern::Resource { collection, id } => store
            .get_resource(collection, id, &QueryOptions::new())
            .map(Value::Object)
            .ok_or_else(invalid_resource)?,
        RoutePattern::ResourceRelated {
            collection,
            id,
            related,
        } => store
            .get_resource(collection, id, &QueryOptions::new().with_related(related))
            .map(Value::Object)
            .ok_or_else(invalid_resource)?,
        RoutePattern::CollectionRelated {
            collection,
            related,
        } => store
            .list_resources(collection, &QueryOptions::new().with_related(related))
            .map(views_to_value)
            .ok_or_else(invalid_collection)?,
        RoutePattern::Unsupported(_) => {
            return Err(ApiError::BadRequest(
                "URI pattern not supported".to_string(),
            ))
        }
    };

    Ok(Payload::ok(body))
}

/// POST: create a resource. `/collection/id/related` creates in `collection`.
fn create(
    store: &mut DataStore,
    pattern: &RoutePattern<'_>,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Payload> {
    let collection = match *pattern {
        RoutePattern::Collection { collection }
        | RoutePattern::ResourceRelated { collection, .. } => collection,
        _ => return Err(ApiError::unsupported()),
    };

    let fields = parse_fields(headers, body)?;
    let id = store.save_resource(collection, &fields, None)?;

    Payload::json(
        StatusCode::CREATED,
        &CreatedResponse { id: id.to_string() },
    )
}

/// PUT: replace the resource at `/collection/id`, creating it if absent.
fn update(
    store: &mut DataStore,
    pattern: &RoutePattern<'_>,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Payload> {
    let RoutePattern::Resource { collection, id } = *pattern else {
        return Err(ApiError::unsupported());
    };

    let fields = parse_fields(headers, body)?;
    store.save_resource(collection, &fields, Some(id))?;

    Payload::json(StatusCode::OK, &MessageResponse::new("Ok"))
}

/// DELETE: remove the resource at `/collection/id` and its dependents.
fn delete(store: &mut DataStore, pattern: &RoutePattern<'_>) -> Result<Payload> {
    let RoutePattern::Resource { collection, id } = *pattern else {
        return Err(ApiError::unsupported());
    };

    if store.delete_resource(collection, id, true)? {
        Ok(Payload::no_content())
    } else {
        Err(ApiError::NotFound("Resource not found".to_string()))
    }
}

fn views_to_value(views: Vec<mockapi_models::ResourceView>) -> Value {
    Value::Array(views.into_iter().map(Value::Object).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use mockapi_models::{Collection, Dataset, Schema};
    use mockapi_store::StoreSettings;
    use serde_json::json;
    use tempfile::tempdir;

    fn make_test_state() -> AppState {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mockapi.json");
        std::mem::forget(dir);

        let schema = Dataset::new()
            .with_collection(
                "customers",
                Collection::new(Schema::new(["firstname"]).with_has("orders")),
            )
            .with_collection(
                "orders",
                Collection::new(
                    Schema::new(["customers.id", "ordertotal"]).with_belongs_to("customers"),
                ),
            );
        let store = DataStore::open(StoreSettings::new(path).with_schema(schema)).unwrap();
        AppState::new(ApiConfig::default(), store)
    }

    fn segments(path: &str) -> Vec<String> {
        RequestQuery::default().segments(path)
    }

    async fn call(state: &AppState, method: Method, path: &str, body: &[u8]) -> Result<Payload> {
        handle(state, &method, &segments(path), &HeaderMap::new(), body).await
    }

    #[tokio::test]
    async fn test_create_returns_created_id() {
        let state = make_test_state();

        let payload = call(&state, Method::POST, "/customers", b"firstname=John")
            .await
            .unwrap();

        assert_eq!(payload.status, StatusCode::CREATED);
        let id = payload.body.unwrap()["id"].as_str().unwrap().to_string();
        let store = state.store.read().await;
        assert!(store.get_resource("customers", &id, &QueryOptions::new()).is_some());
    }

    #[tokio::test]
    async fn test_get_list() {
        let state = make_test_state();
        call(&state, Method::POST, "/customers", b"firstname=John")
            .await
            .unwrap();

        let payload = call(&state, Method::GET, "/customers", b"").await.unwrap();
        assert_eq!(payload.status, StatusCode::OK);
        assert_eq!(payload.body.unwrap()[0]["firstname"], json!("John"));
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let state = make_test_state();
        let created = call(&state, Method::POST, "/customers", b"firstname=John")
            .await
            .unwrap();
        let id = created.body.unwrap()["id"].as_str().unwrap().to_string();
        let path = format!("/customers/{}", id);

        let first = call(&state, Method::DELETE, &path, b"").await.unwrap();
        assert_eq!(first, Payload::no_content());

        let second = call(&state, Method::DELETE, &path, b"").await.unwrap_err();
        assert_eq!(second.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unsupported_pattern_for_get() {
        let state = make_test_state();
        let err = call(&state, Method::GET, "/customers/c1/x", b"")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "URI pattern not supported");
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let state = make_test_state();
        let err = call(&state, Method::HEAD, "/customers", b"").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_put_upserts_with_given_id() {
        let state = make_test_state();
        let payload = call(&state, Method::PUT, "/customers/fixed-id", b"firstname=Ann")
            .await
            .unwrap();
        assert_eq!(payload.body, Some(json!({"message": "Ok"})));

        let fetched = call(&state, Method::GET, "/customers/fixed-id", b"")
            .await
            .unwrap();
        assert_eq!(
            fetched.body,
            Some(json!({"firstname": "Ann", "id": "fixed-id"}))
        );
    }
}
