//! HTTP API for the voice platform and operators
//!
//! - POST /webhook - Voice platform lifecycle/transcript events
//! - POST /sessions - Schedule an interview call
//! - GET /sessions/:call_id - Session status
//! - GET /sessions/:call_id/transcript - Accumulated transcript
//! - GET /sessions/:call_id/analysis - Stored analysis
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
