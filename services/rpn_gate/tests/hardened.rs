use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;

async fn setup() -> (String, Client, tokio::task::JoinHandle<()>) {
    let (addr, handle) = rpn_gate::test::spawn().await;
    let base = format!("http://{}", addr);
    let http = Client::new();
    (base, http, handle)
}

async fn create(http: &Client, base: &str, stack: &str) -> u64 {
    let r: Value = http.post(format!("{}/rpn/stack", base))
        .json(&json!({"stack": stack}))
        .send().await.unwrap()
        .json().await.unwrap();
    r["stack_id"].as_u64().unwrap()
}

async fn error_code(resp: reqwest::Response) -> String {
    let body: Value = resp.json().await.unwrap();
    body["code"].as_str().unwrap().to_owned()
}

// ── Apply: error paths ───────────────────────────────────────────

#[tokio::test]
async fn apply_rejects_unknown_operator() {
    let (base, http, _h) = setup().await;
    let id = create(&http, &base, "3 4").await;
    let resp = http.post(format!("{}/rpn/op/%25/stack/{}", base, id))
        .send().await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "invalid_operator");
    assert!(body["message"].as_str().unwrap().contains("+, -, *, /"));
}

#[tokio::test]
async fn apply_checks_operator_before_stack() {
    let (base, http, _h) = setup().await;
    let resp = http.post(format!("{}/rpn/op/x/stack/999", base))
        .send().await.unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn apply_on_missing_stack_is_404() {
    let (base, http, _h) = setup().await;
    let resp = http.post(format!("{}/rpn/op/%2B/stack/999", base))
        .send().await.unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(error_code(resp).await, "stack_not_found");
}

#[tokio::test]
async fn apply_needs_two_operands() {
    let (base, http, _h) = setup().await;
    let id = create(&http, &base, "5").await;
    for op in ["%2B", "-", "*", "%2F"] {
        let resp = http.post(format!("{}/rpn/op/{}/stack/{}", base, op, id))
            .send().await.unwrap();
        assert_eq!(resp.status(), 400, "op {op}");
        assert_eq!(error_code(resp).await, "insufficient_operands");
    }
}

#[tokio::test]
async fn apply_division_by_zero_leaves_stack_untouched() {
    let (base, http, _h) = setup().await;
    let id = create(&http, &base, "5 0").await;
    let resp = http.post(format!("{}/rpn/op/%2F/stack/{}", base, id))
        .send().await.unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(error_code(resp).await, "division_by_zero");

    let stack: Value = http.get(format!("{}/rpn/stack/{}", base, id))
        .send().await.unwrap()
        .json().await.unwrap();
    assert_eq!(stack, json!(["5", "0"]));
}

#[tokio::test]
async fn apply_operator_token_as_operand_is_malformed() {
    let (base, http, _h) = setup().await;
    let id = create(&http, &base, "3 4 +").await;
    let resp = http.post(format!("{}/rpn/op/-/stack/{}", base, id))
        .send().await.unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(error_code(resp).await, "malformed_input");
}

#[tokio::test]
async fn apply_handles_operands_beyond_64_bits() {
    let (base, http, _h) = setup().await;
    let id = create(&http, &base, "9999999999 9999999999").await;
    let resp = http.post(format!("{}/rpn/op/*/stack/{}", base, id))
        .send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"], "99999999980000000001");

    let stack: Value = http.get(format!("{}/rpn/stack/{}", base, id))
        .send().await.unwrap()
        .json().await.unwrap();
    assert_eq!(stack, json!(["99999999980000000001"]));
}

// ── Stack CRUD: error paths ──────────────────────────────────────

#[tokio::test]
async fn get_missing_stack_is_404() {
    let (base, http, _h) = setup().await;
    let resp = http.get(format!("{}/rpn/stack/42", base))
        .send().await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let (base, http, _h) = setup().await;
    let resp = http.get(format!("{}/rpn/stack/abc", base))
        .send().await.unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(error_code(resp).await, "bad_request");
}

#[tokio::test]
async fn create_rejects_missing_stack_field() {
    let (base, http, _h) = setup().await;
    let resp = http.post(format!("{}/rpn/stack", base))
        .json(&json!({"other": "3 4"}))
        .send().await.unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn create_rejects_malformed_json() {
    let (base, http, _h) = setup().await;
    let resp = http.post(format!("{}/rpn/stack", base))
        .header("content-type", "application/json")
        .body("{not json}")
        .send().await.unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn create_rejects_non_json_content_type() {
    let (base, http, _h) = setup().await;
    let resp = http.post(format!("{}/rpn/stack", base))
        .header("content-type", "text/plain")
        .body("3 4 +")
        .send().await.unwrap();
    assert_eq!(resp.status(), 415);
}

#[tokio::test]
async fn update_missing_stack_is_404() {
    let (base, http, _h) = setup().await;
    let resp = http.post(format!("{}/rpn/stack/8", base))
        .json(&json!({"stack": ["1", "2"]}))
        .send().await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn delete_missing_stack_still_returns_id() {
    let (base, http, _h) = setup().await;
    let resp = http.delete(format!("{}/rpn/stack/77", base))
        .send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["deleted_stack"], 77);
}

// ── File-backed store through the gate ───────────────────────────

#[tokio::test]
async fn file_store_keeps_state_across_servers() {
    let dir = tempfile::tempdir().unwrap();
    let kind = rpn_gate::config::StoreKind::File(dir.path().join("stacks.json"));
    let http = Client::new();

    let id = {
        let store = rpn_gate::open_store(&kind).await.unwrap();
        let (addr, handle) = rpn_gate::test::spawn_with(rpn_gate::AppState::new(store)).await;
        let id = create(&http, &format!("http://{addr}"), "6 7").await;
        handle.abort();
        id
    };

    let store = rpn_gate::open_store(&kind).await.unwrap();
    let (addr, _h) = rpn_gate::test::spawn_with(rpn_gate::AppState::new(Arc::clone(&store))).await;
    let r: Value = http.post(format!("http://{addr}/rpn/op/*/stack/{id}"))
        .send().await.unwrap()
        .json().await.unwrap();
    assert_eq!(r["result"], "42");
    assert_eq!(store.get(id).await.unwrap(), Some(vec!["42".to_string()]));
}
