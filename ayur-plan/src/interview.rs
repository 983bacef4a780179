//! Interview helper operations: follow-up question generation, profile
//! structuring, and plan Q&A.
//!
//! These compose the gateway only (no retrieval). The linear question
//! flow itself lives in the web layer; this module is the part of it
//! with model-facing logic.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;
use tracing::{info, warn};

use ayur_model::{ConversationMessage, GenerationParams, ModelGateway};

use crate::error::{PlanError, Result};
use crate::profile::{QuestionAnswer, Questions, UserProfile};

const QUESTIONS_SYSTEM_PROMPT: &str = "You are an expert AYUSH practitioner specializing in Ayurveda, Yoga, Unani, Siddha, and Homeopathy.
Based on the initial user information, generate 8-10 personalized follow-up questions that will help you understand their constitution (prakriti), imbalances (vikriti), and lifestyle factors.
Tailor your questions to their specific health concerns, age, and gender.
Your questions should help gather information about their diet, sleep patterns, stress levels, exercise habits, and any specific AYUSH-related information.
Format your response as a JSON array of questions only.";

const PROFILE_SYSTEM_PROMPT: &str = "You are an expert AYUSH practitioner who can analyze user \
information and create structured profiles based on Ayurvedic, Yoga, Unani, Siddha, and \
Homeopathy principles.";

const ANSWER_SYSTEM_PROMPT: &str = "You are an AYUSH lifestyle coach assistant. Answer questions \
about the user's lifestyle plan based on Ayurveda, Yoga, Unani, Siddha, and Homeopathy principles.";

/// First `{...}` block in a reply that wraps JSON in prose.
static EMBEDDED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Model-facing interview operations over the gateway.
pub struct Interviewer {
    gateway: Arc<ModelGateway>,
}

impl Interviewer {
    /// Create an interviewer over the given gateway.
    pub fn new(gateway: Arc<ModelGateway>) -> Self {
        Self { gateway }
    }

    /// Generate personalized follow-up questions from the user's initial
    /// information.
    ///
    /// Returns [`Questions::List`] when the model's reply parses as a
    /// JSON array, [`Questions::Raw`] otherwise (the caller renders it
    /// as plain text).
    pub async fn follow_up_questions(&self, basic_info: &Value) -> Questions {
        let user_prompt = format!(
            "Initial user information:\n{}\n\nGenerate personalized follow-up questions to \
             better understand this individual from an AYUSH perspective.",
            serde_json::to_string_pretty(basic_info).unwrap_or_else(|_| basic_info.to_string()),
        );

        let reply = self
            .gateway
            .generate(
                &[
                    ConversationMessage::system(QUESTIONS_SYSTEM_PROMPT),
                    ConversationMessage::user(user_prompt),
                ],
                self.gateway.default_model(),
                GenerationParams::new(0.7, 2000),
            )
            .await;

        match serde_json::from_str::<Vec<String>>(&reply) {
            Ok(list) => Questions::List(list),
            Err(_) => {
                warn!("follow-up questions reply was not a JSON array, passing through raw");
                Questions::Raw(reply)
            }
        }
    }

    /// Distill answered interview questions into a structured profile.
    ///
    /// The model is asked for JSON; replies that wrap the object in prose
    /// are salvaged by extracting the first `{...}` block.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::ProfileParse`] carrying the raw reply when no
    /// parseable JSON object can be recovered.
    pub async fn structure_profile(&self, answers: &[QuestionAnswer]) -> Result<UserProfile> {
        let mut prompt = String::from(
            "Based on the following user responses, create a structured profile for AYUSH \
             lifestyle planning:\n\n",
        );
        for qa in answers {
            prompt.push_str(&format!("Question: {}\nAnswer: {}\n\n", qa.question, qa.answer));
        }
        prompt.push_str(
            "Create a detailed JSON structure with relevant fields extracted from these \
             responses, including prakriti assessment, dosha imbalances, and lifestyle factors.",
        );

        let reply = self
            .gateway
            .generate(
                &[
                    ConversationMessage::system(PROFILE_SYSTEM_PROMPT),
                    ConversationMessage::user(prompt),
                ],
                self.gateway.default_model(),
                GenerationParams::new(0.3, 3000),
            )
            .await;

        let candidate = if reply.trim_start().starts_with('{') {
            reply.trim().to_string()
        } else {
            match EMBEDDED_JSON.find(&reply) {
                Some(found) => found.as_str().to_string(),
                None => return Err(PlanError::ProfileParse { raw: reply }),
            }
        };

        match serde_json::from_str::<Value>(&candidate) {
            Ok(value) => {
                info!("structured profile extracted from interview answers");
                Ok(UserProfile::new(value))
            }
            Err(_) => Err(PlanError::ProfileParse { raw: reply }),
        }
    }

    /// Answer a free-form question about an existing plan.
    pub async fn answer_question(
        &self,
        profile: &UserProfile,
        plan: &str,
        question: &str,
    ) -> String {
        let prompt = format!(
            "\nUser Profile: {}\n\nLifestyle Plan: {plan}\n\nUser Question: {question}\n\n\
             Please provide a helpful response to the user's question about their AYUSH \
             lifestyle plan.\n",
            profile.as_value(),
        );

        self.gateway
            .generate(
                &[
                    ConversationMessage::system(ANSWER_SYSTEM_PROMPT),
                    ConversationMessage::user(prompt),
                ],
                self.gateway.default_model(),
                GenerationParams::default(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use ayur_model::{MockChatBackend, ModelError};

    use super::*;

    fn interviewer(backend: MockChatBackend) -> Interviewer {
        Interviewer::new(Arc::new(ModelGateway::new(Arc::new(backend))))
    }

    #[tokio::test]
    async fn follow_up_questions_parse_into_a_list() {
        let backend =
            MockChatBackend::with_responses([r#"["How is your sleep?", "What do you eat?"]"#]);
        let questions = interviewer(backend).follow_up_questions(&json!({"age": 34})).await;
        assert_eq!(
            questions,
            Questions::List(vec!["How is your sleep?".into(), "What do you eat?".into()])
        );
    }

    #[tokio::test]
    async fn unparseable_questions_pass_through_raw() {
        let backend = MockChatBackend::with_responses(["1. How is your sleep?"]);
        let questions = interviewer(backend).follow_up_questions(&json!({})).await;
        assert_eq!(questions, Questions::Raw("1. How is your sleep?".into()));
    }

    #[tokio::test]
    async fn bare_json_profile_parses() {
        let backend =
            MockChatBackend::with_responses([r#"{"prakriti_assessment": {"primary_dosha": "vata"}}"#]);
        let answers = [QuestionAnswer {
            question: "How is your sleep?".into(),
            answer: "Light and short".into(),
        }];
        let profile = interviewer(backend).structure_profile(&answers).await.unwrap();
        assert_eq!(profile.as_value()["prakriti_assessment"]["primary_dosha"], "vata");
    }

    #[tokio::test]
    async fn profile_embedded_in_prose_is_extracted() {
        let backend = MockChatBackend::with_responses([
            "Here is the structured profile you asked for:\n{\"lifestyle_factors\": \
             {\"stress_level\": \"high\"}}\nLet me know if you need more.",
        ]);
        let profile = interviewer(backend).structure_profile(&[]).await.unwrap();
        assert_eq!(profile.as_value()["lifestyle_factors"]["stress_level"], "high");
    }

    #[tokio::test]
    async fn unparseable_profile_carries_raw_text() {
        let backend = MockChatBackend::with_responses(["I could not build a profile, sorry."]);
        let err = interviewer(backend).structure_profile(&[]).await.unwrap_err();
        match err {
            PlanError::ProfileParse { raw } => {
                assert_eq!(raw, "I could not build a profile, sorry.")
            }
            other => panic!("expected ProfileParse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn auth_failure_yields_canned_profile_skeleton() {
        let backend =
            MockChatBackend::always_failing(ModelError::Auth { message: "denied".into() });
        // Degraded mode answers with the canned skeleton, which parses.
        let profile = interviewer(backend).structure_profile(&[]).await.unwrap();
        assert_eq!(profile.as_value()["prakriti_assessment"]["primary_dosha"], "Unknown");
    }
}
