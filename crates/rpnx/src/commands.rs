use colored::Colorize;
use reqwest::StatusCode;
use serde_json::{json, Value};

pub struct Client {
    base: String,
    http: reqwest::blocking::Client,
}

impl Client {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    fn get(&self, path: &str) -> Result<Value, String> {
        let url = format!("{}{}", self.base, path);
        let resp = self.http.get(&url).send().map_err(|e| format!("request failed: {e}"))?;
        read_json(resp)
    }

    fn post(&self, path: &str, body: Option<&Value>) -> Result<Value, String> {
        let url = format!("{}{}", self.base, path);
        let mut req = self.http.post(&url);
        if let Some(body) = body {
            req = req.json(body);
        }
        read_json(req.send().map_err(|e| format!("request failed: {e}"))?)
    }

    fn delete(&self, path: &str) -> Result<Value, String> {
        let url = format!("{}{}", self.base, path);
        let resp = self.http.delete(&url).send().map_err(|e| format!("request failed: {e}"))?;
        read_json(resp)
    }
}

/// Decode a JSON response, turning non-2xx into `HTTP <code>: <message>`.
fn read_json(resp: reqwest::blocking::Response) -> Result<Value, String> {
    let status = resp.status();
    let body = resp.text().map_err(|e| format!("read response: {e}"))?;
    if !status.is_success() {
        return Err(http_error(status, &body));
    }
    serde_json::from_str(&body).map_err(|e| format!("parse response: {e}"))
}

/// The gate answers errors with `{code, message}`, but a proxy or a
/// tower-http layer may send plain text or nothing at all.
fn http_error(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned));
    let detail = match message {
        Some(m) => m,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status.canonical_reason().unwrap_or("unknown error").to_string(),
    };
    format!("HTTP {}: {detail}", status.as_u16())
}

fn render_stack(tokens: &Value) -> String {
    let items: Vec<&str> = tokens
        .as_array()
        .map(|a| a.iter().filter_map(|t| t.as_str()).collect())
        .unwrap_or_default();
    if items.is_empty() {
        "(empty)".dimmed().to_string()
    } else {
        format!("[ {} ]", items.join(" "))
    }
}

// ── ops ─────────────────────────────────────────────────────────

pub fn ops(client: &Client) -> Result<(), String> {
    let json = client.get("/rpn/op")?;
    let ops: Vec<&str> = json
        .as_array()
        .ok_or("expected array")?
        .iter()
        .filter_map(|o| o.as_str())
        .collect();
    println!("{} {}", "Operators:".dimmed(), ops.join(" ").cyan());
    Ok(())
}

// ── create / push ───────────────────────────────────────────────

pub fn create(client: &Client, expr: &str) -> Result<(), String> {
    let json = client.post("/rpn/stack", Some(&json!({ "stack": expr })))?;
    let id = json.get("stack_id").and_then(|i| i.as_u64()).ok_or("missing stack_id")?;
    println!("{} {}", "Created stack".green(), id.to_string().cyan().bold());
    Ok(())
}

pub fn push(client: &Client, id: u64, tokens: &[String]) -> Result<(), String> {
    let json = client.post(&format!("/rpn/stack/{id}"), Some(&json!({ "stack": tokens })))?;
    let stack = json.get("updated_stack").ok_or("missing updated_stack")?;
    println!("{} {}", format!("Stack {id}:").dimmed(), render_stack(stack));
    Ok(())
}

// ── list / show ─────────────────────────────────────────────────

pub fn list(client: &Client) -> Result<(), String> {
    let json = client.get("/rpn/stack")?;
    let stacks = json
        .get("all_stacks_list")
        .and_then(|s| s.as_array())
        .ok_or("missing all_stacks_list")?;
    if stacks.is_empty() {
        println!("{}", "No stacks.".dimmed());
        return Ok(());
    }
    for entry in stacks {
        let id = entry.get("stack_id").and_then(|i| i.as_u64()).unwrap_or(0);
        let stack = entry.get("current_stack").cloned().unwrap_or(Value::Null);
        println!("  {} {}", format!("{id:>4}").cyan(), render_stack(&stack));
    }
    Ok(())
}

pub fn show(client: &Client, id: u64) -> Result<(), String> {
    let json = client.get(&format!("/rpn/stack/{id}"))?;
    println!("{} {}", format!("Stack {id}:").dimmed(), render_stack(&json));
    Ok(())
}

// ── apply ───────────────────────────────────────────────────────

pub fn apply(client: &Client, op: &str, id: u64) -> Result<(), String> {
    let path = format!("/rpn/op/{}/stack/{id}", urlencoding::encode(op));
    let json = client.post(&path, None)?;
    let result = json.get("result").and_then(|r| r.as_str()).unwrap_or("?");
    let stack = json.get("current_stack").cloned().unwrap_or(Value::Null);
    println!("{} {}", "Result:".dimmed(), result.green().bold());
    println!("{} {}", "Stack: ".dimmed(), render_stack(&stack));
    Ok(())
}

// ── delete ──────────────────────────────────────────────────────

pub fn delete(client: &Client, id: u64) -> Result<(), String> {
    client.delete(&format!("/rpn/stack/{id}"))?;
    println!("{} {}", "Deleted stack".yellow(), id.to_string().cyan());
    Ok(())
}

// ── health ──────────────────────────────────────────────────────

pub fn health(client: &Client) -> Result<(), String> {
    let json = client.get("/healthz")?;
    if json.get("ok").and_then(|o| o.as_bool()) == Some(true) {
        println!("{}", "ok".green().bold());
        Ok(())
    } else {
        Err("gate reported unhealthy".into())
    }
}
