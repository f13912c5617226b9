//! Evaluation server
//!
//! Exposes the evaluator as JSON-RPC 2.0 over stdio, one message per line.
//!
//! # Usage
//!
//! ```bash
//! essay-eval serve --provider-url http://localhost:8010
//! ```
//!
//! # Methods
//!
//! | method     | params                        | result                |
//! |------------|-------------------------------|-----------------------|
//! | `evaluate` | `{text, essay_type?}`         | evaluation result     |
//! | `health`   | none                          | `{"status":"healthy"}`|
//! | `shutdown` | none                          | `null`, then exit     |

mod stdio;

pub use stdio::{
    run_server, EvalServer, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR,
};
