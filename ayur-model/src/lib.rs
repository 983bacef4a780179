//! # ayur-model
//!
//! Model gateway for the AYUSH lifestyle coach.
//!
//! ## Overview
//!
//! - [`message`] — [`ConversationMessage`], [`Role`], [`GenerationParams`]
//! - [`backend`] — the [`ChatBackend`] capability ("messages in, text or
//!   classified failure out")
//! - [`client`] — [`InferenceClient`], an OpenAI-compatible
//!   `/chat/completions` client over `reqwest`
//! - [`degraded`] — the local template table used when credentials are
//!   rejected
//! - [`gateway`] — [`ModelGateway`]: remote → fallback model → local
//!   template → apology; always yields text
//! - [`mock`] — [`MockChatBackend`] for tests
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ayur_model::{ConversationMessage, GenerationParams, InferenceClient, ModelGateway, DEFAULT_MODEL};
//!
//! let client = Arc::new(InferenceClient::new(std::env::var("MODEL_API_KEY")?)?);
//! let gateway = ModelGateway::new(client);
//!
//! let answer = gateway
//!     .generate(
//!         &[ConversationMessage::user("How much water should I drink?")],
//!         DEFAULT_MODEL,
//!         GenerationParams::default(),
//!     )
//!     .await;
//! ```

pub mod backend;
pub mod client;
pub mod degraded;
pub mod error;
pub mod gateway;
pub mod message;
pub mod mock;

pub use backend::ChatBackend;
pub use client::{DEFAULT_ENDPOINT, InferenceClient};
pub use degraded::RequestIntent;
pub use error::ModelError;
pub use gateway::{APOLOGY, DEFAULT_MODEL, ModelGateway, PLAN_MODEL};
pub use message::{ConversationMessage, GenerationParams, Role};
pub use mock::MockChatBackend;
