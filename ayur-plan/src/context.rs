//! The application context: one explicit object constructed at startup
//! and passed by reference to every request handler.
//!
//! Replaces the lazily-built global the web layer would otherwise grow:
//! initialization-on-first-use becomes an explicit, idempotent
//! [`ensure_initialized`](CoachContext::ensure_initialized), and an empty
//! knowledge base is remembered as a valid state instead of being
//! re-probed per request.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use ayur_model::{ChatBackend, ConversationMessage, GenerationParams, ModelGateway};
use ayur_rag::{
    EmbeddingProvider, FileVectorStore, HashEmbeddingProvider, Ingestor, KnowledgeIndex,
    RagConfig, RemoteEmbeddingProvider, Retriever, RetrievedContext,
};

use crate::error::{PlanError, Result};
use crate::interview::Interviewer;
use crate::plan::PlanOrchestrator;
use crate::profile::UserProfile;

/// Startup configuration for the coach core.
#[derive(Debug, Clone)]
pub struct CoachConfig {
    /// Directory scanned for knowledge base documents.
    pub knowledge_dir: PathBuf,
    /// Directory holding the persistent vector collections.
    pub data_dir: PathBuf,
    /// Chunking, batching, and query defaults.
    pub rag: RagConfig,
    /// When set, embeddings come from the remote provider instead of the
    /// deterministic local one.
    pub embeddings_api_key: Option<String>,
    /// Endpoint for remote embeddings; defaults to the chat endpoint host.
    pub embeddings_endpoint: Option<String>,
}

impl CoachConfig {
    /// Configuration with default RAG parameters and local embeddings.
    pub fn new(knowledge_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            knowledge_dir: knowledge_dir.into(),
            data_dir: data_dir.into(),
            rag: RagConfig::default(),
            embeddings_api_key: None,
            embeddings_endpoint: None,
        }
    }
}

/// Shared application state: gateway, ingestor, and the lazily built
/// knowledge index.
pub struct CoachContext {
    config: CoachConfig,
    gateway: Arc<ModelGateway>,
    ingestor: Ingestor,
    index: OnceCell<Option<Arc<KnowledgeIndex>>>,
}

impl CoachContext {
    /// Assemble the context: open the durable store, pick the embedding
    /// provider, and wire the gateway over `backend`.
    ///
    /// Does not touch the knowledge directory yet; call
    /// [`ensure_initialized`](Self::ensure_initialized) for that.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Rag`] if the data directory cannot be opened
    /// or the configuration is invalid.
    pub async fn new(config: CoachConfig, backend: Arc<dyn ChatBackend>) -> Result<Self> {
        let store = Arc::new(FileVectorStore::open(&config.data_dir).await?);

        let embedder: Arc<dyn EmbeddingProvider> = match &config.embeddings_api_key {
            Some(key) => {
                let endpoint = config
                    .embeddings_endpoint
                    .clone()
                    .unwrap_or_else(|| ayur_model::DEFAULT_ENDPOINT.to_string());
                Arc::new(RemoteEmbeddingProvider::new(endpoint, key.clone())?)
            }
            None => Arc::new(HashEmbeddingProvider::new()),
        };

        let ingestor = Ingestor::new(config.rag.clone(), embedder, store)?;
        let gateway = Arc::new(ModelGateway::new(backend));

        Ok(Self { config, gateway, ingestor, index: OnceCell::new() })
    }

    /// Build the knowledge index if it has not been built yet.
    ///
    /// Idempotent: the build runs at most once per context, and its
    /// outcome — including "no documents found" — is cached. Returns
    /// whether a knowledge base is available.
    pub async fn ensure_initialized(&self) -> Result<bool> {
        let slot = self
            .index
            .get_or_try_init(|| async {
                let built = self.ingestor.build(&self.config.knowledge_dir).await?;
                if built.is_none() {
                    info!("running without a knowledge base");
                }
                Ok::<_, PlanError>(built.map(Arc::new))
            })
            .await?;
        Ok(slot.is_some())
    }

    /// Retrieve knowledge passages for a query.
    ///
    /// Returns an empty result when no knowledge base is available —
    /// never an error for that case.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedContext>> {
        self.ensure_initialized().await?;
        match self.index.get().and_then(|slot| slot.as_ref()) {
            Some(index) => Ok(index.retrieve(query, k).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Direct gateway passthrough for callers composing their own
    /// prompts. Always yields text.
    pub async fn generate(
        &self,
        messages: &[ConversationMessage],
        model: &str,
        params: GenerationParams,
    ) -> String {
        self.gateway.generate(messages, model, params).await
    }

    /// Generate a personalized lifestyle plan.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NoKnowledgeBase`] when the source directory
    /// held no documents at initialization time.
    pub async fn generate_plan(&self, profile: &UserProfile) -> Result<String> {
        self.ensure_initialized().await?;
        let Some(index) = self.index.get().and_then(|slot| slot.clone()) else {
            return Err(PlanError::NoKnowledgeBase);
        };

        let orchestrator =
            PlanOrchestrator::new(index as Arc<dyn Retriever>, self.gateway.clone());
        orchestrator.generate_plan(profile).await
    }

    /// Interview operations bound to this context's gateway.
    pub fn interviewer(&self) -> Interviewer {
        Interviewer::new(self.gateway.clone())
    }

    /// The model gateway.
    pub fn gateway(&self) -> &Arc<ModelGateway> {
        &self.gateway
    }
}
