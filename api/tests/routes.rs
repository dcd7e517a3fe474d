//! Route-level tests over in-memory backends (no Postgres, no Ollama).

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use api::{AppState, router};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use contextor::{AnswerEngine, AnswerGenerator, ContextorConfig, ContextorError};
use directory::{ScopeInfo, StaticDirectory};
use futures::future::{self, BoxFuture};
use queue_booking::{MemoryLedger, QueueAllocator};
use rag_store::{Ingestor, Retriever, embed::hashing::HashingEmbedder, store::memory::MemoryStore};
use serde_json::{Value, json};
use tower::ServiceExt;

const DIM: usize = 64;

#[derive(Default)]
struct CannedGenerator {
    calls: AtomicUsize,
}

impl AnswerGenerator for CannedGenerator {
    fn generate<'a>(
        &'a self,
        _system: &'a str,
        _user: &'a str,
    ) -> BoxFuture<'a, Result<String, ContextorError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(future::ready(Ok("โทรแจ้งการประปาที่เบอร์ 1662 ครับ".to_string())))
    }
}

fn water_service() -> ScopeInfo {
    ScopeInfo {
        service_id: 5,
        district_id: 2,
        province_id: 1,
        service_name: "ประปา".into(),
        district_name: "เมืองเชียงใหม่".into(),
        province_name: "เชียงใหม่".into(),
    }
}

fn app() -> (Router, Arc<CannedGenerator>) {
    let embedder = Arc::new(HashingEmbedder::new(DIM));
    let store = Arc::new(MemoryStore::new(DIM));
    let directory = Arc::new(StaticDirectory::new().with_service(water_service()));
    let generator = Arc::new(CannedGenerator::default());

    let ingestor = Ingestor::new(embedder.clone(), store.clone(), directory.clone()).unwrap();
    let retriever = Retriever::new(embedder, store, 1);
    let answers = AnswerEngine::new(retriever, generator.clone(), ContextorConfig::default());
    let queue = Arc::new(QueueAllocator::new(Arc::new(MemoryLedger::new()), directory));

    let state = Arc::new(AppState::new(ingestor, answers, queue));
    (router(state), generator)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-request-id", "test-req")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn multipart(uri: &str, filename: &str, content: &[u8], service_id: &str) -> Request<Body> {
    let boundary = "XBOUNDARYX";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"service_id\"\r\n\r\n\
             {service_id}\r\n--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1_000_000)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn service_info_is_served() {
    let (app, _) = app();
    let (status, json) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert!(json["data"]["version"].is_string());
}

#[tokio::test]
async fn add_text_then_query_returns_grounded_answer() {
    let (app, generator) = app();
    let text = "น้ำประปาไม่ไหลต้องทำอย่างไร";

    let (status, added) = send(
        &app,
        post_json("/add/text", json!({ "text": text, "service_id": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added["data"]["id"], 1);
    assert_eq!(added["data"]["province_name"], "เชียงใหม่");
    assert_eq!(added["data"]["service_id"], 5);

    let (status, qa) = send(&app, post_json("/query", json!({ "question": "น้ำประปา" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!qa["data"]["answer"].as_str().unwrap().is_empty());

    let docs = qa["data"]["relevant_documents"].as_array().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["id"], 1);
    let score = docs[0]["similarity_score"].as_f64().unwrap();
    assert!((0.0..=0.3).contains(&score));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn query_on_empty_corpus_does_not_call_the_model() {
    let (app, generator) = app();
    let (status, qa) = send(&app, post_json("/query", json!({ "question": "น้ำประปา" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(qa["data"]["answer"], contextor::prompt::NO_DOCUMENTS_ANSWER);
    assert_eq!(qa["data"]["relevant_documents"], json!([]));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn validation_and_not_found_errors_are_enveloped() {
    let (app, _) = app();

    let (status, json) = send(
        &app,
        post_json("/add/text", json!({ "text": "   ", "service_id": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "CONTENT_EMPTY");

    let (status, json) = send(
        &app,
        post_json("/add/text", json!({ "text": "hello", "service_id": 404 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "SERVICE_NOT_FOUND");

    let (status, json) = send(&app, post_json("/query", json!({ "question": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "EMPTY_QUESTION");

    let (status, json) = send(&app, get("/documents/77")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "DOCUMENT_NOT_FOUND");
}

#[tokio::test]
async fn malformed_json_is_rewritten_into_the_envelope() {
    let (app, _) = app();
    let (status, json) = send(&app, post_json("/add/text", json!({ "text": "x" }))).await;
    assert!(status.is_client_error());
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["details"][0]["field"], "service_id");
}

#[tokio::test]
async fn uploads_check_file_type_and_encoding() {
    let (app, _) = app();

    let (status, json) = send(
        &app,
        multipart("/upload/text", "hours.txt", "เปิดทำการ 8:30".as_bytes(), "5"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["district_name"], "เมืองเชียงใหม่");

    let (status, json) = send(&app, multipart("/upload/text", "hours.docx", b"x", "5")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "UNSUPPORTED_FILE");

    let (status, json) =
        send(&app, multipart("/upload/text", "bad.txt", &[0xff, 0xfe, 0xfd], "5")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_ENCODING");

    let (status, json) = send(&app, multipart("/upload/pdf", "scan.pdf", b"not a pdf", "5")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "EXTRACTION_FAILED");

    let (status, _) = send(&app, multipart("/upload/text", "a.txt", b"x", "five")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn documents_can_be_listed_counted_fetched_and_deleted() {
    let (app, _) = app();
    for text in ["ใบอนุญาตก่อสร้าง", "ชำระค่าน้ำ", "ทะเบียนบ้าน"] {
        send(&app, post_json("/add/text", json!({ "text": text, "service_id": 5 }))).await;
    }

    let (_, page) = send(&app, get("/documents?limit=2")).await;
    assert_eq!(page["data"]["total"], 3);
    assert_eq!(page["data"]["documents"].as_array().unwrap().len(), 2);
    assert_eq!(page["data"]["documents"][0]["id"], 3);

    let (_, count) = send(&app, get("/documents/count?service_id=5")).await;
    assert_eq!(count["data"]["total_documents"], 3);

    let (status, doc) = send(&app, get("/documents/2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["data"]["content"], "ชำระค่าน้ำ");

    let delete = Request::builder()
        .method("DELETE")
        .uri("/documents/2")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get("/documents/2")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn suggestions_need_two_characters() {
    let (app, _) = app();
    send(
        &app,
        post_json("/add/text", json!({ "text": "Water Bill payment", "service_id": 5 })),
    )
    .await;

    let (_, short) = send(&app, get("/search/suggestions?query=w")).await;
    assert_eq!(short["data"]["suggestions"], json!([]));

    let (_, hits) = send(&app, get("/search/suggestions?query=BILL")).await;
    let first = &hits["data"]["suggestions"][0];
    assert_eq!(first["content_preview"], "Water Bill payment");
    assert_eq!(first["service"], "ประปา");
    assert_eq!(first["province"], "เชียงใหม่");
    assert_eq!(first["service_id"], 5);
    assert!(first.get("service_name").is_none());
}

#[tokio::test]
async fn booking_allocates_sequential_queue_numbers() {
    let (app, _) = app();
    let booking = |name: &str| {
        json!({
            "citizen_name": name,
            "citizen_phone": "0812345678",
            "service_id": 5,
            "booking_date": "2025-06-09",
            "booking_time": "09:30:00"
        })
    };

    let (status, first) = send(&app, post_json("/queue/book", booking("สมชาย"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["data"]["queue_number"], "Q0050609001");
    assert_eq!(first["data"]["status"], "pending");
    assert_eq!(first["data"]["service_name"], "ประปา");

    let (_, second) = send(&app, post_json("/queue/book", booking("สมหญิง"))).await;
    assert_eq!(second["data"]["queue_number"], "Q0050609002");

    let (status, json) = send(&app, post_json("/queue/book", booking(" "))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_BOOKING");
}
