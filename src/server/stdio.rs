//! JSON-RPC 2.0 evaluation server over stdio
//!
//! One request per line on stdin, one response per line on stdout.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::models::EssayType;
use crate::nlp::LinguisticFacts;
use crate::pipeline::Evaluator;
use crate::scoring::EvalError;

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

/// Error object returned in place of a result
#[derive(Debug, Clone, PartialEq)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn to_value(&self) -> Value {
        json!({ "code": self.code, "message": self.message })
    }
}

impl From<EvalError> for RpcError {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::MalformedInput(_) => RpcError::new(INVALID_PARAMS, err.to_string()),
            other => RpcError::new(INTERNAL_ERROR, other.to_string()),
        }
    }
}

/// JSON-RPC 2.0 Request
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    /// `None` only when the member is absent; `"id": null` is still a request
    #[serde(default, deserialize_with = "present")]
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
struct EvaluateParams {
    text: String,
    #[serde(default)]
    essay_type: Option<String>,
}

/// Outcome of one input line
struct Handled {
    response: Option<Value>,
    shutdown: bool,
}

impl Handled {
    fn reply(id: Value, error: RpcError) -> Self {
        Self {
            response: Some(error_response(id, &error)),
            shutdown: false,
        }
    }
}

pub struct EvalServer {
    evaluator: Evaluator,
}

impl EvalServer {
    pub fn new(facts: Arc<dyn LinguisticFacts>) -> Self {
        Self {
            evaluator: Evaluator::new(facts),
        }
    }

    /// Serve requests from `reader` until EOF or `shutdown`
    pub fn run<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> Result<()> {
        info!(
            "essay-eval server started (provider: {})",
            self.evaluator.provider()
        );

        for line in reader.lines() {
            let line = line.context("Failed to read request")?;
            if line.trim().is_empty() {
                continue;
            }

            let handled = self.handle_message(&line);
            if let Some(response) = handled.response {
                let response_str = serde_json::to_string(&response)?;
                debug!("Sending: {}", response_str);
                writeln!(writer, "{}", response_str)?;
                writer.flush()?;
            }
            if handled.shutdown {
                info!("Shutdown requested");
                break;
            }
        }

        Ok(())
    }

    fn handle_message(&self, message: &str) -> Handled {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                warn!("Unparsable request: {}", e);
                return Handled::reply(
                    Value::Null,
                    RpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
                );
            }
        };
        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                warn!("Invalid request: {}", e);
                return Handled::reply(
                    id,
                    RpcError::new(INVALID_REQUEST, format!("Invalid JSON-RPC request: {}", e)),
                );
            }
        };
        if request.jsonrpc != "2.0" {
            return Handled::reply(
                id,
                RpcError::new(
                    INVALID_REQUEST,
                    format!("Unsupported jsonrpc version: {}", request.jsonrpc),
                ),
            );
        }

        let span = info_span!("request", id = %Uuid::new_v4(), method = %request.method);
        let _guard = span.enter();

        let shutdown = request.method == "shutdown";
        let result = match request.method.as_str() {
            "evaluate" => self.handle_evaluate(request.params.as_ref()),
            "health" => Ok(json!({ "status": "healthy" })),
            "shutdown" => Ok(Value::Null),
            other => Err(RpcError::new(
                METHOD_NOT_FOUND,
                format!("Unknown method: {}", other),
            )),
        };

        // Requests without an id are notifications
        let response = request.id.map(|id| match result {
            Ok(value) => json!({ "jsonrpc": "2.0", "id": id, "result": value }),
            Err(e) => {
                if e.code == INTERNAL_ERROR {
                    error!("Evaluation failed: {}", e.message);
                }
                error_response(id, &e)
            }
        });

        Handled { response, shutdown }
    }

    fn handle_evaluate(&self, params: Option<&Value>) -> Result<Value, RpcError> {
        let params = params
            .ok_or_else(|| EvalError::MalformedInput("missing params".to_string()))?;
        let params: EvaluateParams = serde_json::from_value(params.clone())
            .map_err(|e| EvalError::MalformedInput(format!("invalid params: {}", e)))?;
        let essay_type = EssayType::from(params.essay_type.as_deref().unwrap_or_default());

        debug!(
            "Evaluating {} chars as {}",
            params.text.chars().count(),
            essay_type
        );
        let result = self.evaluator.evaluate(&params.text, essay_type)?;
        serde_json::to_value(result).map_err(|e| RpcError::new(INTERNAL_ERROR, e.to_string()))
    }
}

fn error_response(id: Value, error: &RpcError) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": error.to_value() })
}

/// Run the server on stdin/stdout
pub fn run_server(facts: Arc<dyn LinguisticFacts>) -> Result<()> {
    let server = EvalServer::new(facts);
    let stdin = std::io::stdin();
    server.run(stdin.lock(), std::io::stdout())
}
