// ============================================================================
// API Module - HTTP transport for the order service
// ============================================================================
//
// Owns everything transport-shaped: routing, request decoding, the
// error-to-status mapping, and the health/metrics endpoints. Domain results
// pass through unchanged; this layer never implements business rules.
//
// ============================================================================

mod handlers;
mod server;

pub use handlers::AppState;
pub use server::start_http_server;
