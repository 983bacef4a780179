//! # ayur-plan
//!
//! Plan orchestration for the AYUSH lifestyle coach: combines retrieved
//! knowledge with the model gateway to produce personalized lifestyle
//! plans, and carries the model-facing interview operations.
//!
//! ## Overview
//!
//! - [`profile`] — [`UserProfile`] (opaque JSON), [`QuestionAnswer`],
//!   [`Questions`]
//! - [`plan`] — [`PlanOrchestrator`]: profile → retrieval query →
//!   context block → gateway call
//! - [`interview`] — [`Interviewer`]: follow-up questions, profile
//!   structuring (with JSON salvage), plan Q&A
//! - [`context`] — [`CoachContext`]: the startup-constructed application
//!   state with idempotent knowledge-base initialization
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ayur_model::InferenceClient;
//! use ayur_plan::{CoachConfig, CoachContext};
//!
//! let backend = Arc::new(InferenceClient::new(std::env::var("MODEL_API_KEY")?)?);
//! let ctx = CoachContext::new(
//!     CoachConfig::new("./knowledge_base", "./data"),
//!     backend,
//! ).await?;
//!
//! if ctx.ensure_initialized().await? {
//!     let plan = ctx.generate_plan(&profile).await?;
//! }
//! ```

pub mod context;
pub mod error;
pub mod interview;
pub mod plan;
pub mod profile;

pub use context::{CoachConfig, CoachContext};
pub use error::{PlanError, Result};
pub use interview::Interviewer;
pub use plan::{PLAN_MAX_OUTPUT_TOKENS, PLAN_TOP_K, PlanOrchestrator};
pub use profile::{QuestionAnswer, Questions, UserProfile};
