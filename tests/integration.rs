use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use upline_dispatch::api::rest::router;
use upline_dispatch::state::AppState;

fn setup() -> axum::Router {
    router(Arc::new(AppState::new(1024)))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn create_elevator(app: &axum::Router, lat: f64, lng: f64) -> String {
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/elevators",
            json!({
                "cliente": "Edifício Copan",
                "endereco": "Av. Ipiranga, 200",
                "location": { "lat": lat, "lng": lng }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    body["id"].as_str().unwrap().to_string()
}

async fn create_technician(app: &axum::Router, name: &str, lat: f64, lng: f64) -> String {
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/technicians",
            json!({
                "nome": name,
                "de_plantao": true,
                "latitude": lat,
                "longitude": lng
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    body["id"].as_str().unwrap().to_string()
}

async fn open_ticket(app: &axum::Router, elevator_id: &str) -> Value {
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/tickets",
            json!({
                "elevador_id": elevator_id,
                "descricao_problema": "Elevador parado entre andares",
                "pessoa_presa": true
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    body_json(res).await
}

#[tokio::test]
async fn health_returns_ok() {
    let app = setup();
    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["technicians"], 0);
    assert_eq!(body["elevators"], 0);
    assert_eq!(body["tickets"], 0);
}

#[tokio::test]
async fn metrics_returns_prometheus_format() {
    let app = setup();
    let response = app.oneshot(get_request("/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.contains("text/plain"));

    let body = body_string(response).await;
    assert!(body.contains("tickets_open"));
}

#[tokio::test]
async fn create_technician_returns_roster_entry() {
    let app = setup();
    let response = app
        .oneshot(json_request(
            "POST",
            "/technicians",
            json!({
                "nome": "Carlos",
                "de_plantao": true,
                "latitude": -23.55,
                "longitude": -46.64
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["nome"], "Carlos");
    assert_eq!(body["de_plantao"], true);
    assert_eq!(body["latitude"], -23.55);
    assert!(body["id"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn create_technician_empty_name_returns_400() {
    let app = setup();
    let response = app
        .oneshot(json_request(
            "POST",
            "/technicians",
            json!({ "nome": "  " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_technician_out_of_range_coordinates_returns_400() {
    let app = setup();
    let response = app
        .oneshot(json_request(
            "POST",
            "/technicians",
            json!({
                "nome": "Rui",
                "latitude": 95.0,
                "longitude": 10.0
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn toggle_technician_duty_status() {
    let app = setup();
    let id = create_technician(&app, "Ana", -23.55, -46.64).await;

    let res = app
        .oneshot(json_request(
            "PUT",
            &format!("/technicians/{id}/status"),
            json!({ "de_plantao": false }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["de_plantao"], false);
}

#[tokio::test]
async fn report_technician_location() {
    let app = setup();
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/technicians",
            json!({ "nome": "Bruno", "de_plantao": true }),
        ))
        .await
        .unwrap();
    let id = body_json(res).await["id"].as_str().unwrap().to_string();

    let res = app
        .oneshot(json_request(
            "PUT",
            &format!("/technicians/{id}/location"),
            json!({ "latitude": -23.5613, "longitude": -46.6565 }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["latitude"], -23.5613);
    assert_eq!(body["longitude"], -46.6565);
}

#[tokio::test]
async fn create_elevator_empty_customer_returns_400() {
    let app = setup();
    let response = app
        .oneshot(json_request(
            "POST",
            "/elevators",
            json!({
                "cliente": "",
                "endereco": "Rua A, 1",
                "location": { "lat": -23.55, "lng": -46.64 }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn open_ticket_for_unknown_elevator_returns_404() {
    let app = setup();
    let response = app
        .oneshot(json_request(
            "POST",
            "/tickets",
            json!({
                "elevador_id": "00000000-0000-0000-0000-000000000000",
                "descricao_problema": "Porta travada"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn open_ticket_empty_description_returns_400() {
    let app = setup();
    let elevator_id = create_elevator(&app, -23.5613, -46.6565).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/tickets",
            json!({
                "elevador_id": elevator_id,
                "descricao_problema": "   "
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// Scenario: empty pool. The ticket still opens, just unassigned.
#[tokio::test]
async fn open_ticket_with_no_technicians_stays_open() {
    let app = setup();
    let elevator_id = create_elevator(&app, -23.5613, -46.6565).await;

    let body = open_ticket(&app, &elevator_id).await;
    assert!(body["tecnico_atribuido"].is_null());
    assert!(body["mensagem"].as_str().unwrap().contains("Nenhum técnico"));
    assert!(body.get("distancia_km").is_none());

    let ticket_id = body["id_chamado"].as_str().unwrap();
    let res = app
        .oneshot(get_request(&format!("/tickets/{ticket_id}")))
        .await
        .unwrap();
    let ticket = body_json(res).await;
    assert_eq!(ticket["status"], "aberto");
    assert!(ticket["tecnico_id"].is_null());
    assert_eq!(ticket["pessoa_presa"], true);
}

// Scenario: nearest of two technicians wins, distance reported in km
// rounded to 2 decimal places.
#[tokio::test]
async fn open_ticket_assigns_nearest_technician() {
    let app = setup();
    let elevator_id = create_elevator(&app, -23.5613, -46.6565).await;

    let near_id = create_technician(&app, "Técnico SP", -23.55, -46.64).await;
    let _far_id = create_technician(&app, "Técnico RJ", -22.98, -43.20).await;

    let body = open_ticket(&app, &elevator_id).await;
    assert_eq!(body["tecnico_atribuido"], "Técnico SP");

    let distance = body["distancia_km"].as_f64().unwrap();
    assert!(distance > 0.5 && distance < 2.5);
    // Rounded to 2 decimal places.
    assert!((distance * 100.0 - (distance * 100.0).round()).abs() < 1e-9);

    let ticket_id = body["id_chamado"].as_str().unwrap();
    let res = app
        .oneshot(get_request(&format!("/tickets/{ticket_id}")))
        .await
        .unwrap();
    let ticket = body_json(res).await;
    assert_eq!(ticket["status"], "atribuido");
    assert_eq!(ticket["tecnico_id"], near_id.as_str());
}

#[tokio::test]
async fn off_duty_technician_is_never_dispatched() {
    let app = setup();
    let elevator_id = create_elevator(&app, -23.5613, -46.6565).await;

    // Nearest technician is off duty; the far one must win.
    let near_id = create_technician(&app, "Perto", -23.55, -46.64).await;
    let far_id = create_technician(&app, "Longe", -22.98, -43.20).await;

    let res = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/technicians/{near_id}/status"),
            json!({ "de_plantao": false }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = open_ticket(&app, &elevator_id).await;
    assert_eq!(body["tecnico_atribuido"], "Longe");

    let ticket_id = body["id_chamado"].as_str().unwrap();
    let res = app
        .oneshot(get_request(&format!("/tickets/{ticket_id}")))
        .await
        .unwrap();
    assert_eq!(body_json(res).await["tecnico_id"], far_id.as_str());
}

// Scenario: reject returns the ticket to the open queue and a later manual
// assignment to another technician succeeds.
#[tokio::test]
async fn reject_then_reassign_flow() {
    let app = setup();
    let elevator_id = create_elevator(&app, -23.5613, -46.6565).await;
    let _t1 = create_technician(&app, "T1", -23.55, -46.64).await;

    let body = open_ticket(&app, &elevator_id).await;
    let ticket_id = body["id_chamado"].as_str().unwrap().to_string();

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/tickets/{ticket_id}/reject"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let rejected = body_json(res).await;
    assert_eq!(rejected["status"], "aberto");
    assert!(rejected["tecnico_id"].is_null());

    let t2 = create_technician(&app, "T2", -22.98, -43.20).await;
    let res = app
        .oneshot(json_request(
            "POST",
            &format!("/tickets/{ticket_id}/assign"),
            json!({ "tecnico_id": t2 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let reassigned = body_json(res).await;
    assert_eq!(reassigned["status"], "atribuido");
    assert_eq!(reassigned["tecnico_id"], t2.as_str());
}

#[tokio::test]
async fn reject_open_ticket_returns_400() {
    let app = setup();
    let elevator_id = create_elevator(&app, -23.5613, -46.6565).await;

    let body = open_ticket(&app, &elevator_id).await;
    let ticket_id = body["id_chamado"].as_str().unwrap();

    let res = app
        .oneshot(json_request(
            "POST",
            &format!("/tickets/{ticket_id}/reject"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn assign_unknown_technician_returns_404() {
    let app = setup();
    let elevator_id = create_elevator(&app, -23.5613, -46.6565).await;

    let body = open_ticket(&app, &elevator_id).await;
    let ticket_id = body["id_chamado"].as_str().unwrap();

    let res = app
        .oneshot(json_request(
            "POST",
            &format!("/tickets/{ticket_id}/assign"),
            json!({ "tecnico_id": "00000000-0000-0000-0000-000000000000" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// Scenario: completion is terminal. Details round-trip verbatim and the
// completion timestamp renders as DD/MM/YYYY HH:MM.
#[tokio::test]
async fn complete_ticket_is_terminal() {
    let app = setup();
    let elevator_id = create_elevator(&app, -23.5613, -46.6565).await;
    let t1 = create_technician(&app, "T1", -23.55, -46.64).await;

    let body = open_ticket(&app, &elevator_id).await;
    let ticket_id = body["id_chamado"].as_str().unwrap().to_string();

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/tickets/{ticket_id}/complete"),
            json!({
                "servicos_realizados": "Regulagem das portas",
                "pecas_trocadas": "Sensor de porta",
                "observacoes": "Cliente avisado"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let completed = body_json(res).await;
    assert_eq!(completed["status"], "finalizado");
    assert_eq!(completed["servicos_realizados"], "Regulagem das portas");
    assert_eq!(completed["pecas_trocadas"], "Sensor de porta");
    assert_eq!(completed["observacoes"], "Cliente avisado");

    let stamp = completed["data_conclusao"].as_str().unwrap();
    assert_eq!(stamp.len(), 16);
    assert_eq!(&stamp[2..3], "/");
    assert_eq!(&stamp[5..6], "/");
    assert_eq!(&stamp[13..14], ":");

    // Every further transition is refused and nothing changes.
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/tickets/{ticket_id}/reject"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/tickets/{ticket_id}/assign"),
            json!({ "tecnico_id": t1 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/tickets/{ticket_id}/complete"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .oneshot(get_request(&format!("/tickets/{ticket_id}")))
        .await
        .unwrap();
    let after = body_json(res).await;
    assert_eq!(after["status"], "finalizado");
    assert_eq!(after["data_conclusao"], stamp);
    assert_eq!(after["tecnico_id"], completed["tecnico_id"]);
}
