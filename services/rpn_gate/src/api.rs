use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use rpn_core::{operators, tokenize, Operator};
use rpn_store::StackEntry;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Request body for create and update: either free-form expression text
/// (`"3 4 +"`) or an explicit token list (`["3", 4, "+"]`).
#[derive(Debug, Deserialize)]
pub struct StackReq {
    pub stack: StackInput,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StackInput {
    Text(String),
    Tokens(Vec<TokenInput>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TokenInput {
    Int(i64),
    Text(String),
}

impl StackInput {
    pub fn into_tokens(self) -> Vec<String> {
        match self {
            StackInput::Text(text) => tokenize(&text),
            StackInput::Tokens(tokens) => tokens
                .into_iter()
                .map(|t| match t {
                    TokenInput::Int(n) => n.to_string(),
                    TokenInput::Text(s) => s.trim().to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplyResp {
    pub result: String,
    pub current_stack: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResp {
    pub all_stacks_list: Vec<StackEntry>,
}

#[derive(Debug, Serialize)]
pub struct CreateResp {
    pub stack_id: u64,
}

#[derive(Debug, Serialize)]
pub struct UpdateResp {
    pub updated_stack: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResp {
    pub deleted_stack: u64,
}

fn parse_id(raw: &str) -> Result<u64, AppError> {
    raw.parse()
        .map_err(|_| AppError::bad_request(format!("invalid stack id '{raw}'")))
}

pub async fn list_operators() -> Json<[&'static str; 4]> {
    Json(operators())
}

/// Apply `op` to the top two values of a stack and persist the result.
///
/// The operator is checked before the stack is fetched, so an unknown
/// operator is a 400 even for an unknown stack.
pub async fn apply_operator(
    State(state): State<AppState>,
    Path((op, id)): Path<(String, String)>,
) -> Result<Json<ApplyResp>, AppError> {
    let stack_id = parse_id(&id)?;
    let operator: Operator = op.parse()?;
    let stack = state
        .store
        .get(stack_id)
        .await?
        .ok_or_else(|| AppError::stack_not_found(stack_id))?;

    let applied = rpn_core::apply(operator.symbol(), stack).map_err(|e| {
        warn!(stack_id, op = %operator, error = %e, "evaluation rejected");
        metrics::counter!("rpn_eval_rejected_total", "op" => operator.symbol()).increment(1);
        e
    })?;

    // the stack may have been deleted since the read
    state
        .store
        .update(stack_id, &applied.updated_stack)
        .await?
        .ok_or_else(|| AppError::stack_not_found(stack_id))?;

    info!(stack_id, op = %operator, result = %applied.result, "applied operator");
    metrics::counter!("rpn_eval_total", "op" => operator.symbol()).increment(1);
    Ok(Json(ApplyResp {
        result: applied.result,
        current_stack: applied.updated_stack,
    }))
}

pub async fn list_stacks(State(state): State<AppState>) -> Result<Json<ListResp>, AppError> {
    let all_stacks_list = state.store.list_all().await?;
    Ok(Json(ListResp { all_stacks_list }))
}

pub async fn create_stack(
    State(state): State<AppState>,
    body: Result<Json<StackReq>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateResp>), AppError> {
    let Json(req) = body?;
    let tokens = req.stack.into_tokens();
    let stack_id = state.store.create(&tokens).await?;
    info!(stack_id, tokens = tokens.len(), "created stack");
    metrics::counter!("rpn_stack_ops_total", "op" => "create").increment(1);
    Ok((StatusCode::CREATED, Json(CreateResp { stack_id })))
}

pub async fn get_stack(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let stack_id = parse_id(&id)?;
    state
        .store
        .get(stack_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::stack_not_found(stack_id))
}

pub async fn update_stack(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<StackReq>, JsonRejection>,
) -> Result<Json<UpdateResp>, AppError> {
    let stack_id = parse_id(&id)?;
    let Json(req) = body?;
    let updated_stack = state
        .store
        .update(stack_id, &req.stack.into_tokens())
        .await?
        .ok_or_else(|| AppError::stack_not_found(stack_id))?;
    info!(stack_id, tokens = updated_stack.len(), "updated stack");
    metrics::counter!("rpn_stack_ops_total", "op" => "update").increment(1);
    Ok(Json(UpdateResp { updated_stack }))
}

pub async fn delete_stack(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResp>, AppError> {
    let stack_id = parse_id(&id)?;
    let deleted_stack = state.store.delete(stack_id).await?;
    info!(stack_id, "deleted stack");
    metrics::counter!("rpn_stack_ops_total", "op" => "delete").increment(1);
    Ok(Json(DeleteResp { deleted_stack }))
}
