//! End-to-end tests driving the full router against an in-memory store.

use std::sync::Arc;

use affectation_store_sqlite::SqliteStore;
use axum::{
  Router,
  body::{Body, to_bytes},
  http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{ServerConfig, router};

const BOUNDARY: &str = "affectation-test-boundary";

fn config() -> ServerConfig {
  ServerConfig {
    host:             "127.0.0.1".to_string(),
    port:             8000,
    store_path:       ":memory:".into(),
    jwt_secret:       "test-secret".to_string(),
    token_ttl_hours:  1,
    max_upload_bytes: 1024 * 1024,
  }
}

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  router(Arc::new(store), &config())
}

async fn read(resp: axum::response::Response) -> (StatusCode, Value) {
  let status = resp.status();
  let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let body = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
  };
  (status, body)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let req = match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  read(app.clone().oneshot(req).await.unwrap()).await
}

fn multipart_request(uri: &str, filename: &str, content_type: &str, content: &[u8]) -> Request<Body> {
  let mut body = Vec::new();
  body.extend_from_slice(
    format!(
      "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
       Content-Type: {content_type}\r\n\r\n"
    )
    .as_bytes(),
  );
  body.extend_from_slice(content);
  body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

  Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
    .body(Body::from(body))
    .unwrap()
}

async fn create_profile(app: &Router, email: &str, skills: &[&str]) -> String {
  let (status, body) = send(
    app,
    "POST",
    "/api/stagiaires",
    Some(json!({ "nom": "Sow", "prenom": "Aminata", "email": email, "competences": skills })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["id"].as_str().unwrap().to_owned()
}

async fn create_offer(app: &Router, title: &str, city: &str, skills: &[&str]) -> String {
  let (status, body) = send(
    app,
    "POST",
    "/api/offres",
    Some(json!({
      "entrepriseNom": "Wave",
      "titre": title,
      "ville": city,
      "description": "Stage de six mois",
      "competences": skills,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["id"].as_str().unwrap().to_owned()
}

async fn apply(app: &Router, profile_id: &str, offer_id: &str) -> (StatusCode, Value) {
  send(
    app,
    "POST",
    "/api/candidater",
    Some(json!({ "stagiaireId": profile_id, "offreId": offer_id })),
  )
  .await
}

// ── Health / CORS ────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_probe() {
  let app = app().await;
  let (status, body) = send(&app, "GET", "/", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "message": "API Stagiaire OK" }));
}

#[tokio::test]
async fn cors_allows_any_origin() {
  let app = app().await;
  let req = Request::builder()
    .uri("/api/offres")
    .header(header::ORIGIN, "http://localhost:5173")
    .body(Body::empty())
    .unwrap();
  let resp = app.oneshot(req).await.unwrap();
  assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

// ── Profiles ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_email_conflicts() {
  let app = app().await;
  create_profile(&app, "aminata@example.com", &[]).await;
  let (status, body) = send(
    &app,
    "POST",
    "/api/stagiaires",
    Some(json!({ "nom": "Autre", "email": "aminata@example.com" })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["detail"], "Email déjà utilisé");

  let (_, list) = send(&app, "GET", "/api/stagiaires", None).await;
  assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_or_malformed_profile_id_is_404() {
  let app = app().await;
  let (status, body) = send(&app, "GET", "/api/stagiaires/pas-un-id", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["detail"], "Stagiaire non trouvé");

  let uri = format!("/api/stagiaires/{}", uuid_like());
  let (status, _) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

fn uuid_like() -> &'static str { "00000000-0000-4000-8000-000000000000" }

#[tokio::test]
async fn partial_update_keeps_other_fields() {
  let app = app().await;
  let id = create_profile(&app, "maj@example.com", &["java"]).await;
  let uri = format!("/api/stagiaires/{id}");

  let (status, body) = send(&app, "PUT", &uri, Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["detail"], "Aucun champ à mettre à jour");

  let (status, body) = send(
    &app,
    "PUT",
    &uri,
    Some(json!({ "ville": "Saint-Louis", "competences": ["rust"] })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["ville"], "Saint-Louis");
  assert_eq!(body["competences"], json!(["rust"]));
  assert_eq!(body["nom"], "Sow");
  assert_eq!(body["prenom"], "Aminata");
}

// ── Résumés ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn png_upload_is_rejected_without_side_effects() {
  let app = app().await;
  let id = create_profile(&app, "png@example.com", &[]).await;
  let uri = format!("/api/stagiaires/{id}/upload-cv");

  let req = multipart_request(&uri, "photo.png", "image/png", b"\x89PNG");
  let (status, body) = read(app.clone().oneshot(req).await.unwrap()).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["detail"], "Format non autorisé");

  let (_, profile) = send(&app, "GET", &format!("/api/stagiaires/{id}"), None).await;
  assert!(profile["cvUrl"].is_null());
  let (status, _) = send(&app, "GET", &format!("/api/stagiaires/{id}/cv"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_upload_is_rejected() {
  let app = app().await;
  let id = create_profile(&app, "vide@example.com", &[]).await;
  let req = multipart_request(
    &format!("/api/stagiaires/{id}/upload-cv"),
    "cv.pdf",
    "application/pdf",
    b"",
  );
  let (status, body) = read(app.clone().oneshot(req).await.unwrap()).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["detail"], "Fichier vide");
}

#[tokio::test]
async fn uploaded_resume_downloads_with_headers() {
  let app = app().await;
  let id = create_profile(&app, "cv@example.com", &[]).await;
  let content = b"%PDF-1.7 contenu du cv";

  let req = multipart_request(
    &format!("/api/stagiaires/{id}/upload-cv"),
    "aminata.pdf",
    "application/pdf",
    content,
  );
  let (status, body) = read(app.clone().oneshot(req).await.unwrap()).await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["message"], "CV uploaded");
  assert_eq!(body["cvFilename"], "aminata.pdf");

  let (_, profile) = send(&app, "GET", &format!("/api/stagiaires/{id}"), None).await;
  assert_eq!(profile["cvUrl"], format!("/api/stagiaires/{id}/cv"));
  assert_eq!(profile["cvFilename"], "aminata.pdf");

  let req = Request::builder()
    .uri(format!("/api/stagiaires/{id}/cv"))
    .body(Body::empty())
    .unwrap();
  let resp = app.clone().oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
  assert_eq!(
    resp.headers()[header::CONTENT_DISPOSITION],
    "attachment; filename=\"aminata.pdf\""
  );
  assert!(resp.headers().contains_key(header::ETAG));
  let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  assert_eq!(&bytes[..], content);
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
  let app = app().await;
  let id = create_profile(&app, "nofile@example.com", &[]).await;
  let body = format!(
    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nx\r\n--{BOUNDARY}--\r\n"
  );
  let req = Request::builder()
    .method("POST")
    .uri(format!("/api/stagiaires/{id}/upload-cv"))
    .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
    .body(Body::from(body))
    .unwrap();
  let (status, _) = read(app.oneshot(req).await.unwrap()).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Offers ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn offers_filter_and_delete() {
  let app = app().await;
  let dakar = create_offer(&app, "Backend", "Dakar", &["rust"]).await;
  create_offer(&app, "Frontend", "Thiès", &["react"]).await;

  let (_, list) = send(&app, "GET", "/api/offres?ville=Dakar", None).await;
  let list = list.as_array().unwrap().clone();
  assert_eq!(list.len(), 1);
  assert_eq!(list[0]["id"], dakar.as_str());
  assert_eq!(list[0]["nbCandidatures"], 0);

  let (_, list) = send(&app, "GET", "/api/offres?competence=react", None).await;
  assert_eq!(list.as_array().unwrap().len(), 1);

  let uri = format!("/api/offres/{dakar}");
  let (status, body) = send(&app, "DELETE", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Offre supprimée");

  let (status, body) = send(&app, "DELETE", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["detail"], "Offre non trouvée");
}

// ── Applications ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_application_conflicts_and_counts_once() {
  let app = app().await;
  let profile = create_profile(&app, "post@example.com", &[]).await;
  let offer = create_offer(&app, "Data", "Dakar", &[]).await;

  let (status, body) = apply(&app, &profile, &offer).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "ok");
  assert!(body["candidatureId"].is_string());

  let (status, body) = send(
    &app,
    "POST",
    "/api/stagiaires/candidater",
    Some(json!({ "stagiaireId": profile, "offreId": offer })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["detail"], "Vous avez déjà postulé à cette offre");

  let (_, offer_body) = send(&app, "GET", &format!("/api/offres/{offer}"), None).await;
  assert_eq!(offer_body["nbCandidatures"], 1);

  let (_, history) = send(&app, "GET", &format!("/api/stagiaires/{profile}/candidatures"), None).await;
  let history = history.as_array().unwrap().clone();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0]["offreTitre"], "Data");
  assert_eq!(history[0]["status"], "submitted");
}

#[tokio::test]
async fn malformed_application_ids_are_400() {
  let app = app().await;
  let (status, body) = apply(&app, "x", "y").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["detail"], "ID stagiaire ou offre invalide");
}

// ── Malformed requests ───────────────────────────────────────────────────────

#[tokio::test]
async fn body_missing_required_field_is_400_with_detail() {
  let app = app().await;
  let (status, body) = send(&app, "POST", "/api/offres", Some(json!({ "entrepriseNom": "E" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["detail"].as_str().unwrap().contains("titre"), "{body}");

  let (_, list) = send(&app, "GET", "/api/offres", None).await;
  assert_eq!(list, json!([]));
}

#[tokio::test]
async fn unparseable_or_untyped_json_is_400_with_detail() {
  let app = app().await;
  let req = Request::builder()
    .method("POST")
    .uri("/api/candidater")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{\"stagiaireId\":"))
    .unwrap();
  let (status, body) = read(app.clone().oneshot(req).await.unwrap()).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["detail"].is_string());

  let req = Request::builder()
    .method("POST")
    .uri("/api/login")
    .body(Body::from("email=a&password=b"))
    .unwrap();
  let (status, body) = read(app.oneshot(req).await.unwrap()).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["detail"].is_string());
}

#[tokio::test]
async fn bad_query_and_multipart_are_400_with_detail() {
  let app = app().await;
  let p = create_profile(&app, "requete@example.com", &["Rust"]).await;

  let (status, body) = send(&app, "GET", &format!("/api/recommandations/{p}?top=beaucoup"), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["detail"].is_string());

  let req = Request::builder()
    .method("POST")
    .uri(format!("/api/stagiaires/{p}/upload-cv"))
    .header(header::CONTENT_TYPE, "text/plain")
    .body(Body::from("pas un formulaire"))
    .unwrap();
  let (status, body) = read(app.oneshot(req).await.unwrap()).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["detail"].is_string());
}

// ── Recommendations ──────────────────────────────────────────────────────────

#[tokio::test]
async fn recommendations_rank_and_are_idempotent() {
  let app = app().await;
  let profile = create_profile(&app, "reco@example.com", &["Python", "SQL"]).await;
  let a = create_offer(&app, "A", "Dakar", &["Python", "Go"]).await;
  let b = create_offer(&app, "B", "Dakar", &["Python", "SQL", "Go"]).await;
  create_offer(&app, "C", "Dakar", &["Java"]).await;

  let uri = format!("/api/recommandations/{profile}");
  let (status, first) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  let ranked = first.as_array().unwrap();
  assert_eq!(ranked.len(), 2);
  assert_eq!(ranked[0]["id"], b.as_str());
  assert_eq!(ranked[0]["score"], 2);
  assert_eq!(ranked[1]["id"], a.as_str());
  assert_eq!(ranked[1]["score"], 1);

  let (_, second) = send(&app, "GET", &uri, None).await;
  assert_eq!(first, second);

  let (_, top1) = send(&app, "GET", &format!("/api/stagiaires/{profile}/recommandations?top=1"), None).await;
  assert_eq!(top1.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn recommendations_fall_back_to_latest_offers() {
  let app = app().await;
  let profile = create_profile(&app, "vierge@example.com", &[]).await;
  for i in 0..4 {
    create_offer(&app, &format!("Offre {i}"), "Dakar", &["Go"]).await;
  }

  let (_, recs) = send(&app, "GET", &format!("/api/recommandations/{profile}?top=3"), None).await;
  let recs = recs.as_array().unwrap();
  assert_eq!(recs.len(), 3);
  assert_eq!(recs[0]["titre"], "Offre 3");
  assert!(recs.iter().all(|r| r["score"].is_null()));
}

// ── Stats ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn global_stats() {
  let app = app().await;
  let p1 = create_profile(&app, "g1@example.com", &[]).await;
  create_profile(&app, "g2@example.com", &[]).await;
  create_profile(&app, "g3@example.com", &[]).await;
  let o1 = create_offer(&app, "O1", "Dakar", &[]).await;
  create_offer(&app, "O2", "Dakar", &[]).await;
  apply(&app, &p1, &o1).await;

  let (status, body) = send(&app, "GET", "/api/stats/global", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "stagiaires": 3, "offres": 2, "candidatures": 1 }));
}

#[tokio::test]
async fn per_profile_stats_group_by_city() {
  let app = app().await;
  let p = create_profile(&app, "villes@example.com", &[]).await;
  let o1 = create_offer(&app, "O1", "Ziguinchor", &[]).await;
  let o2 = create_offer(&app, "O2", "Ziguinchor", &[]).await;
  apply(&app, &p, &o1).await;
  apply(&app, &p, &o2).await;

  let (status, body) = send(&app, "GET", &format!("/api/stats/stagiaire/{p}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["total_candidatures"], 2);
  assert_eq!(body["par_ville"]["Ziguinchor"], 2);
}

#[tokio::test]
async fn stats_for_unknown_profile_are_404() {
  let app = app().await;
  for id in ["abc", uuid_like()] {
    let (status, body) = send(&app, "GET", &format!("/api/stats/stagiaire/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Stagiaire non trouvé");
  }
}

// ── Auth ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_then_me() {
  let app = app().await;
  let (status, created) = send(
    &app,
    "POST",
    "/api/stagiaires?password=motdepasse",
    Some(json!({ "nom": "Ba", "email": "ba@example.com" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert!(created.get("passwordHash").is_none());

  let (status, body) = send(
    &app,
    "POST",
    "/api/login",
    Some(json!({ "email": "ba@example.com", "password": "motdepasse" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["token_type"], "bearer");
  let token = body["access_token"].as_str().unwrap();

  let req = Request::builder()
    .uri("/api/me")
    .header(header::AUTHORIZATION, format!("Bearer {token}"))
    .body(Body::empty())
    .unwrap();
  let (status, me) = read(app.clone().oneshot(req).await.unwrap()).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(me["id"], created["id"]);
}

#[tokio::test]
async fn bad_credentials_and_missing_token_are_401() {
  let app = app().await;
  let (status, _) = send(
    &app,
    "POST",
    "/api/stagiaires",
    Some(json!({ "nom": "Fall", "email": "fall@example.com", "password": "juste" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, body) = send(
    &app,
    "POST",
    "/api/login",
    Some(json!({ "email": "fall@example.com", "password": "faux" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["detail"], "Email ou mot de passe incorrect");

  let (status, _) = send(&app, "GET", "/api/me", None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let req = Request::builder()
    .uri("/api/me")
    .header(header::AUTHORIZATION, "Bearer not-a-token")
    .body(Body::empty())
    .unwrap();
  let (status, _) = read(app.oneshot(req).await.unwrap()).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}
