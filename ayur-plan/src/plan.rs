//! Retrieval-augmented plan generation.

use std::sync::Arc;

use tracing::{debug, info};

use ayur_model::{ConversationMessage, GenerationParams, ModelGateway, PLAN_MODEL};
use ayur_rag::Retriever;

use crate::error::Result;
use crate::profile::UserProfile;

/// Number of context passages retrieved for a plan.
pub const PLAN_TOP_K: usize = 5;

/// Token budget for a full plan.
pub const PLAN_MAX_OUTPUT_TOKENS: u32 = 4000;

const PLAN_SYSTEM_PROMPT: &str = "You are an expert AYUSH lifestyle coach with deep knowledge of Ayurveda, Yoga, Unani, Siddha, and Homeopathy.
Your task is to create a comprehensive, personalized lifestyle plan based on AYUSH principles.
Analyze the user's profile carefully and match it with the knowledge base information.
Provide specific, actionable recommendations that are tailored to the individual.
Include recommendations for:
1. Daily routine (dinacharya) based on their dosha type
2. Diet plan with specific foods to include/avoid
3. Exercise and yoga practices with specific asanas
4. Stress management techniques
5. Sleep hygiene recommendations
6. Herbal supplements or remedies if appropriate
7. Any specific AYUSH therapies that might benefit them

Your plan should be holistic, addressing mind, body, and spirit, and should be practical for the user to implement.
Cite specific AYUSH principles and practices in your recommendations.";

/// Composes retrieved knowledge and the user profile into one generation
/// request, and returns the generated plan verbatim.
pub struct PlanOrchestrator {
    retriever: Arc<dyn Retriever>,
    gateway: Arc<ModelGateway>,
}

impl PlanOrchestrator {
    /// Create an orchestrator over a retriever and a gateway.
    pub fn new(retriever: Arc<dyn Retriever>, gateway: Arc<ModelGateway>) -> Self {
        Self { retriever, gateway }
    }

    /// Generate a personalized lifestyle plan for `profile`.
    ///
    /// Retrieves the [`PLAN_TOP_K`] most relevant knowledge passages for
    /// the serialized profile, assembles them into a context block, and
    /// calls the gateway with the plan model and a high token budget.
    /// The gateway guarantees a textual result even when the remote
    /// endpoint is down.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Rag`](crate::PlanError) if retrieval itself
    /// fails (for example on an embedding dimension mismatch).
    pub async fn generate_plan(&self, profile: &UserProfile) -> Result<String> {
        let profile_text = profile.to_canonical_text();
        let query = format!(
            "AYUSH lifestyle recommendations for a person with the following profile: \
             {profile_text}"
        );

        let retrieved = self.retriever.retrieve(&query, PLAN_TOP_K).await?;
        debug!(passages = retrieved.len(), "assembled retrieval context for plan");

        let knowledge_context =
            retrieved.iter().map(|r| r.text.as_str()).collect::<Vec<_>>().join("\n\n");

        let user_prompt = format!(
            "USER PROFILE:\n{profile_text}\n\nRELEVANT KNOWLEDGE BASE INFORMATION:\n\
             {knowledge_context}\n\nBased on this information, create a comprehensive, \
             personalized AYUSH lifestyle plan for this individual.\nBe specific, practical, \
             and thorough in your recommendations."
        );

        let plan = self
            .gateway
            .generate(
                &[
                    ConversationMessage::system(PLAN_SYSTEM_PROMPT),
                    ConversationMessage::user(user_prompt),
                ],
                PLAN_MODEL,
                GenerationParams::new(0.7, PLAN_MAX_OUTPUT_TOKENS),
            )
            .await;

        info!(plan_chars = plan.len(), "lifestyle plan generated");
        Ok(plan)
    }
}
