//! Serve command handler

use anyhow::Result;
use std::sync::Arc;

use crate::nlp::LinguisticFacts;

/// Run the JSON-RPC server on stdio
pub fn run(facts: Arc<dyn LinguisticFacts>) -> Result<()> {
    crate::server::run_server(facts)
}
