//! Pagelens - HTTP service for LLM-backed webpage UI analysis
//!
//! This crate accepts a webpage's HTML (plus optional design specification
//! text, an optional reference design image, and optional third-party audit
//! results), builds a structured prompt, forwards it to a Gemini backend, and
//! validates the model's JSON reply against a fixed schema before returning
//! it to the caller.
//!
//! # Request pipeline
//!
//! 1. **Input validation** ([`validate`]): size limits, media-type checks,
//!    and structural checks on the optional audit-results JSON.
//! 2. **Prompt assembly** ([`prompt`]): a pure, deterministic function that
//!    embeds the output-schema example and the caller's data.
//! 3. **Ephemeral file staging** ([`staging`]): the optional design image is
//!    written to a uniquely named temp file, uploaded, and removed; the
//!    remote handle is deleted on every exit path.
//! 4. **Schema validation** ([`schema`]): the model's raw text is coerced
//!    into [`schema::AnalysisResponse`] with display-name aliasing and
//!    null/empty-collection defaults.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pagelens::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     pagelens::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `POST /webpage-analysis` - Multipart analysis request

pub mod backend;
pub mod config;
pub mod error;
pub mod middleware;
pub mod prompt;
pub mod routes;
pub mod schema;
pub mod server;
pub mod staging;
pub mod state;
pub mod validate;

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use schema::AnalysisResponse;
pub use server::{build_router, start_server};
pub use state::AppState;
