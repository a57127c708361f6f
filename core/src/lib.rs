//! Policy engine for auto-accepting interactive confirmation prompts.
//!
//! The pipeline: an [`interceptor::Interceptor`] detects confirmation-style
//! prompts in the host tool's interactive I/O, builds a
//! [`types::ConfirmationRequest`], and hands it to the
//! [`agent::AutoAcceptAgent`]. The agent enforces per-session quota and
//! timeout, delegates risk classification to the
//! [`security::SecurityChecker`], records the outcome through the
//! [`audit::AuditLogger`], and the interceptor either synthesizes an
//! affirmative answer or falls open to the human.

pub mod agent;
pub mod api;
pub mod audit;
pub mod config;
pub mod errors;
pub mod interceptor;
pub mod security;
pub mod types;
