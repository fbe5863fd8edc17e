//! HTTP gateway tests against a local axum server

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch};
use axum::{Json, Router};
use fleet_domain::model::LocationUpdate;
use fleet_domain::repository::VehicleGateway;
use fleet_infra::{GatewayOptions, HttpVehicleGateway};
use fleet_types::TransportError;
use serde_json::{json, Value};

fn vehicle_json(id: &str) -> Value {
    json!({
        "id": id,
        "placa": "ABC-1234",
        "modelo": "Toyota Corolla",
        "tipo": "CARRO",
        "status": "ATIVO",
        "motorista": "João Silva",
        "ultimaAtualizacao": "2023-05-05T10:30:00Z",
        "latitude": -15.7801,
        "longitude": -47.9292,
        "velocidade": 65
    })
}

/// Serve `app` on an ephemeral port and return its base URL
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn gateway(base_url: &str) -> HttpVehicleGateway {
    HttpVehicleGateway::new(&GatewayOptions::new(base_url)).unwrap()
}

#[tokio::test]
async fn test_list_returns_paged_body() {
    let app = Router::new().route(
        "/vehicles/list-with-paginate",
        get(|| async { Json(json!({ "items": [vehicle_json("1")], "page": 1 })) }),
    );
    let base = serve(app).await;

    let body = gateway(&base).list_vehicles().await.unwrap();
    assert_eq!(body["items"][0]["placa"], "ABC-1234");
}

#[tokio::test]
async fn test_list_returns_bare_array() {
    let app = Router::new().route(
        "/vehicles/list-with-paginate",
        get(|| async { Json(json!([vehicle_json("1"), vehicle_json("2")])) }),
    );
    let base = serve(app).await;

    let body = gateway(&base).list_vehicles().await.unwrap();
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let app = Router::new().route(
        "/recruitment/vehicles/list-with-paginate",
        get(|| async { Json(json!([])) }),
    );
    let base = serve(app).await;

    let body = gateway(&format!("{}/recruitment/", base)).list_vehicles().await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_server_error_is_status() {
    let app = Router::new().route(
        "/vehicles/list-with-paginate",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = serve(app).await;

    let err = gateway(&base).list_vehicles().await.unwrap_err();
    assert!(matches!(err, TransportError::Status(500)));
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let app = Router::new().route(
        "/vehicles/list-with-paginate",
        get(|| async { "<html>maintenance</html>" }),
    );
    let base = serve(app).await;

    let err = gateway(&base).list_vehicles().await.unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)));
}

#[tokio::test]
async fn test_authorization_header_is_sent_verbatim() {
    let app = Router::new().route(
        "/vehicles/list-with-paginate",
        get(|headers: HeaderMap| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            let content_type = headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            Json(json!({ "auth": auth, "contentType": content_type }))
        }),
    );
    let base = serve(app).await;

    let options = GatewayOptions::new(&base).with_token("abc123-token");
    let body = HttpVehicleGateway::new(&options)
        .unwrap()
        .list_vehicles()
        .await
        .unwrap();
    assert_eq!(body["auth"], "abc123-token");
    assert_eq!(body["contentType"], "application/json");
}

#[tokio::test]
async fn test_no_token_sends_no_authorization() {
    let app = Router::new().route(
        "/vehicles/list-with-paginate",
        get(|headers: HeaderMap| async move { Json(json!({ "has_auth": headers.contains_key("authorization") })) }),
    );
    let base = serve(app).await;

    let body = gateway(&base).list_vehicles().await.unwrap();
    assert_eq!(body["has_auth"], false);
}

#[tokio::test]
async fn test_get_vehicle_by_id() {
    let app = Router::new().route(
        "/vehicles/{id}",
        get(|Path(id): Path<String>| async move {
            if id == "7" {
                Ok(Json(vehicle_json("7")))
            } else {
                Err(StatusCode::NOT_FOUND)
            }
        }),
    );
    let base = serve(app).await;
    let gateway = gateway(&base);

    let vehicle = gateway.get_vehicle("7").await.unwrap();
    assert_eq!(vehicle.id, "7");

    let err = gateway.get_vehicle("8").await.unwrap_err();
    assert!(matches!(err, TransportError::Status(404)));
}

#[tokio::test]
async fn test_patch_location_body() {
    let app = Router::new().route(
        "/vehicles/{id}/location",
        patch(|Path(id): Path<String>, Json(body): Json<Value>| async move {
            let mut vehicle = vehicle_json(&id);
            vehicle["latitude"] = body["latitude"].clone();
            vehicle["longitude"] = body["longitude"].clone();
            vehicle["velocidade"] = body["velocidade"].clone();
            Json(vehicle)
        }),
    );
    let base = serve(app).await;

    let updated = gateway(&base)
        .update_location("1", &LocationUpdate::new(-15.8, -47.93, 70.0))
        .await
        .unwrap();
    assert_eq!(updated.id, "1");
    assert_eq!(updated.latitude, -15.8);
    assert_eq!(updated.longitude, -47.93);
    assert_eq!(updated.speed, 70.0);
}

#[tokio::test]
async fn test_unreachable_server_is_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = gateway(&format!("http://{}", addr))
        .list_vehicles()
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Request(_)));
}
