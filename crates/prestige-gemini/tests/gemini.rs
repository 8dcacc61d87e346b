//! `GeminiClient` against a mock `generateContent` endpoint.

use std::time::Duration;

use prestige_core::{
  model::{ContactInfo, FontFamily, LayoutKind},
  proposal::{BioRequest, DesignBackend, DesignRequest, ProposalService},
};
use prestige_gemini::{Error, GeminiClient, GeminiConfig};
use serde_json::{Value, json};
use wiremock::{
  Mock, MockServer, ResponseTemplate,
  matchers::{body_partial_json, header, method, path},
};

const ENDPOINT: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn client(server: &MockServer) -> GeminiClient {
  GeminiClient::new(GeminiConfig {
    api_key:  "test-key".into(),
    base_url: server.uri(),
    timeout:  Duration::from_secs(5),
    ..GeminiConfig::default()
  })
  .unwrap()
}

fn answer(text: &str) -> Value {
  json!({
    "candidates": [{
      "content": { "role": "model", "parts": [{ "text": text }] },
      "finishReason": "STOP"
    }]
  })
}

fn theme_json(name: &str) -> Value {
  json!({
    "name": name,
    "layoutStyle": "Tech",
    "primaryColor": "#00FFAA",
    "secondaryColor": "#0044FF",
    "backgroundColor": "#0B0F19",
    "textColor": "#E5E7EB",
    "fontFamily": "spacegrotesk",
    "slogan": "Kod, który działa.",
    "accentShape": "line"
  })
}

fn design_request() -> DesignRequest {
  DesignRequest {
    industry:     "Software Development".into(),
    job_title:    "CTO".into(),
    company_name: "Acme".into(),
    style_hint:   None,
    count:        6,
  }
}

fn kowalski() -> ContactInfo {
  ContactInfo {
    full_name: "Jan Kowalski".into(),
    job_title: "CEO".into(),
    company_name: "Acme".into(),
    industry: "Tech".into(),
    email: "jan@acme.com".into(),
    ..ContactInfo::default()
  }
}

#[tokio::test]
async fn designs_are_requested_with_schema_and_parsed() {
  let server = MockServer::start().await;
  let themes = json!([theme_json("Neon Grid"), theme_json("Deep Space")]);

  Mock::given(method("POST"))
    .and(path(ENDPOINT))
    .and(header("x-goog-api-key", "test-key"))
    .and(body_partial_json(json!({
      "generationConfig": {
        "responseMimeType": "application/json",
        "responseSchema": { "type": "ARRAY" }
      }
    })))
    .respond_with(ResponseTemplate::new(200).set_body_json(answer(&themes.to_string())))
    .expect(1)
    .mount(&server)
    .await;

  let drafts = client(&server).generate_designs(design_request()).await.unwrap();
  assert_eq!(drafts.len(), 2);
  assert_eq!(drafts[0].name, "Neon Grid");
  assert_eq!(drafts[0].layout, LayoutKind::Tech);
  assert_eq!(drafts[1].font, FontFamily::SpaceGrotesk);
}

#[tokio::test]
async fn bio_is_plain_text() {
  let server = MockServer::start().await;

  Mock::given(method("POST"))
    .and(path(ENDPOINT))
    .respond_with(
      ResponseTemplate::new(200).set_body_json(answer("  Ekspert od skalowania systemów.\n")),
    )
    .mount(&server)
    .await;

  let bio = client(&server)
    .generate_bio(BioRequest {
      full_name: "Jan Kowalski".into(),
      job_title: "CEO".into(),
      industry:  "Tech".into(),
    })
    .await
    .unwrap();
  assert_eq!(bio, "Ekspert od skalowania systemów.");
}

#[tokio::test]
async fn http_errors_are_reported() {
  let server = MockServer::start().await;

  Mock::given(method("POST"))
    .and(path(ENDPOINT))
    .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
    .mount(&server)
    .await;

  let err = client(&server).generate_designs(design_request()).await.unwrap_err();
  assert!(matches!(err, Error::Status { status: 429, ref body } if body == "quota exceeded"));
}

#[tokio::test]
async fn missing_key_never_hits_the_network() {
  let server = MockServer::start().await;

  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(200))
    .expect(0)
    .mount(&server)
    .await;

  let client = GeminiClient::new(GeminiConfig {
    base_url: server.uri(),
    ..GeminiConfig::default()
  })
  .unwrap();
  let err = client.generate_designs(design_request()).await.unwrap_err();
  assert!(matches!(err, Error::MissingApiKey));
}

#[tokio::test]
async fn service_falls_back_on_schema_violation() {
  let server = MockServer::start().await;
  let mut bad = theme_json("Broken");
  bad["layoutStyle"] = json!("Baroque");

  Mock::given(method("POST"))
    .and(path(ENDPOINT))
    .respond_with(ResponseTemplate::new(200).set_body_json(answer(&json!([bad]).to_string())))
    .mount(&server)
    .await;

  let service = ProposalService::new(client(&server));
  let proposal = service.propose_themes(&kowalski(), None).await;
  assert!(proposal.is_fallback());
  let names: Vec<_> = proposal.into_inner().into_iter().map(|t| t.name).collect();
  assert_eq!(names, vec!["Classic Elegant", "Modern Minimal"]);
}

#[tokio::test]
async fn service_falls_back_on_empty_answer() {
  let server = MockServer::start().await;

  Mock::given(method("POST"))
    .and(path(ENDPOINT))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
    .mount(&server)
    .await;

  let service = ProposalService::new(client(&server));
  assert!(service.propose_bio(&kowalski()).await.is_fallback());
}
