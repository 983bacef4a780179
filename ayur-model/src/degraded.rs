//! Local degraded-mode responses.
//!
//! When the remote endpoint rejects our credentials, the gateway answers
//! from this module instead: the request's user content is classified
//! into a [`RequestIntent`], and each intent maps to one fixed template.
//! An explicit intent → payload table keeps the matching testable, as
//! opposed to a cascade of inline string checks.

use serde_json::json;
use tracing::info;

use crate::message::{ConversationMessage, Role};

/// What an incoming request is asking for, recognized from substrings of
/// its user-role content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestIntent {
    /// Personalized follow-up questions for the intake interview.
    FollowUpQuestions,
    /// A structured profile distilled from interview answers.
    StructuredProfile,
    /// A full personalized lifestyle plan.
    LifestylePlan,
    /// Anything else.
    Unknown,
}

/// Substring (lowercase) → intent, checked in order.
const INTENT_MARKERS: &[(&str, RequestIntent)] = &[
    ("generate personalized follow-up questions", RequestIntent::FollowUpQuestions),
    ("create a structured profile", RequestIntent::StructuredProfile),
    ("create a comprehensive, personalized ayush lifestyle plan", RequestIntent::LifestylePlan),
];

/// Classify a request by the content of its last user message.
pub fn detect_intent(messages: &[ConversationMessage]) -> RequestIntent {
    let Some(user_content) =
        messages.iter().rev().find(|m| m.role == Role::User).map(|m| m.content.to_lowercase())
    else {
        return RequestIntent::Unknown;
    };

    for (marker, intent) in INTENT_MARKERS {
        if user_content.contains(marker) {
            return *intent;
        }
    }
    RequestIntent::Unknown
}

/// The fixed payload for one intent.
pub fn template(intent: RequestIntent) -> String {
    match intent {
        RequestIntent::FollowUpQuestions => json!([
            "What is your typical daily routine (waking time, sleeping time, meal times)?",
            "What is your current diet like? Please describe what you typically eat in a day.",
            "How would you describe your stress levels (low, moderate, high)?",
            "Do you exercise regularly? If yes, what type and how often?",
            "What are your main health goals or areas you'd like to improve?",
            "Have you tried any AYUSH practices before (Ayurveda, Yoga, Unani, Siddha, Homeopathy)?",
            "Do you have any dietary restrictions or preferences?",
            "How is your sleep quality and duration?",
            "What is your water intake per day?",
            "Are you currently taking any medications or supplements?"
        ])
        .to_string(),

        RequestIntent::StructuredProfile => json!({
            "personal_info": {
                "name": "User",
                "age": "Not specified",
                "gender": "Not specified"
            },
            "prakriti_assessment": {
                "primary_dosha": "Unknown",
                "dosha_balance": "Needs professional assessment"
            },
            "lifestyle_factors": {
                "diet": "Based on user input",
                "sleep": "Based on user input",
                "exercise": "Based on user input",
                "stress_level": "Based on user input"
            },
            "health_concerns": "Based on user input",
            "recommendations": "Will be generated based on AYUSH principles"
        })
        .to_string(),

        RequestIntent::LifestylePlan => FALLBACK_PLAN.to_string(),

        RequestIntent::Unknown => OFFLINE_NOTICE.to_string(),
    }
}

/// Classify and answer in one step; this is the gateway's degraded tier.
pub fn respond(messages: &[ConversationMessage]) -> String {
    let intent = detect_intent(messages);
    info!(?intent, "answering from local degraded templates");
    template(intent)
}

/// Canned plan used when no model is reachable.
const FALLBACK_PLAN: &str = "# Personalized AYUSH Lifestyle Plan

## Daily Routine Recommendations
- Wake up early (preferably before sunrise)
- Drink warm water in the morning
- Practice meditation for 10-15 minutes
- Follow regular meal times
- Sleep by 10 PM

## Diet Recommendations
- Focus on fresh, whole foods
- Include seasonal fruits and vegetables
- Avoid processed foods and excess sugar
- Stay hydrated throughout the day

## Exercise Recommendations
- Practice gentle yoga asanas daily
- Include pranayama (breathing exercises)
- Take regular walks in nature
- Maintain consistency rather than intensity

## Stress Management
- Practice mindfulness throughout the day
- Take short breaks during work
- Connect with nature regularly
- Maintain a gratitude journal

## Sleep Recommendations
- Establish a regular sleep schedule
- Avoid electronic devices before bedtime
- Create a calm sleeping environment
- Practice gentle stretching before sleep

This plan is based on general AYUSH principles. For more personalized recommendations, please consult with an AYUSH practitioner.";

/// Generic answer for unrecognized requests while offline.
const OFFLINE_NOTICE: &str = "I'm currently operating in offline mode. I can help with basic \
AYUSH lifestyle recommendations, but for more personalized advice, please check your API \
connection or consult with an AYUSH practitioner.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_follow_up_question_requests() {
        let messages = [
            ConversationMessage::system("You are an expert AYUSH practitioner."),
            ConversationMessage::user(
                "Generate personalized follow-up questions to better understand this individual.",
            ),
        ];
        assert_eq!(detect_intent(&messages), RequestIntent::FollowUpQuestions);
    }

    #[test]
    fn detects_profile_and_plan_requests() {
        let profile = [ConversationMessage::user(
            "Based on the following user responses, create a structured profile for AYUSH \
             lifestyle planning:",
        )];
        assert_eq!(detect_intent(&profile), RequestIntent::StructuredProfile);

        let plan = [ConversationMessage::user(
            "Based on this information, create a comprehensive, personalized AYUSH lifestyle \
             plan for this individual.",
        )];
        assert_eq!(detect_intent(&plan), RequestIntent::LifestylePlan);
    }

    #[test]
    fn unrecognized_content_is_unknown() {
        let messages = [ConversationMessage::user("What is the weather like?")];
        assert_eq!(detect_intent(&messages), RequestIntent::Unknown);
        assert!(respond(&messages).contains("offline mode"));
    }

    #[test]
    fn last_user_message_wins() {
        let messages = [
            ConversationMessage::user("create a structured profile"),
            ConversationMessage::assistant("{}"),
            ConversationMessage::user("generate personalized follow-up questions"),
        ];
        assert_eq!(detect_intent(&messages), RequestIntent::FollowUpQuestions);
    }

    #[test]
    fn follow_up_template_is_a_json_list_of_ten() {
        let parsed: Vec<String> =
            serde_json::from_str(&template(RequestIntent::FollowUpQuestions)).unwrap();
        assert_eq!(parsed.len(), 10);
    }

    #[test]
    fn profile_template_is_a_json_object() {
        let parsed: serde_json::Value =
            serde_json::from_str(&template(RequestIntent::StructuredProfile)).unwrap();
        assert!(parsed.get("prakriti_assessment").is_some());
        assert!(parsed["lifestyle_factors"].get("stress_level").is_some());
    }

    #[test]
    fn plan_template_has_section_markers() {
        let plan = template(RequestIntent::LifestylePlan);
        assert!(plan.starts_with("# Personalized AYUSH Lifestyle Plan"));
        assert!(plan.contains("## Daily Routine Recommendations"));
        assert!(plan.contains("## Sleep Recommendations"));
    }
}
