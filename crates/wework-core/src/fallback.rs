//! Local replies used when the assistant service cannot answer.
//!
//! Keyword rules are checked in table order and the first rule with a
//! trigger contained in the lower-cased input wins. Triggers overlap (for
//! example "hi" inside "this", "ac" inside "access"), so the order of
//! [`KEYWORD_RULES`] is part of the behaviour.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::Mutex;

/// Topic a keyword rule answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackTopic {
    Greeting,
    Booking,
    Wifi,
    Printing,
    Billing,
    Access,
    Cleaning,
    Mail,
    Temperature,
    Noise,
    Help,
}

/// One row of the keyword table.
#[derive(Debug)]
pub struct KeywordRule {
    pub topic: FallbackTopic,
    pub triggers: &'static [&'static str],
    pub reply: &'static str,
}

impl KeywordRule {
    fn matches(&self, lowered: &str) -> bool {
        self.triggers.iter().any(|t| lowered.contains(t))
    }
}

pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        topic: FallbackTopic::Greeting,
        triggers: &["hello", "hi", "hey"],
        reply: "Hello! Welcome to WeWork India. How can I assist you today?",
    },
    KeywordRule {
        topic: FallbackTopic::Booking,
        triggers: &["book", "room", "meeting"],
        reply: "I can help you book a meeting room. Please provide your preferred date, time, and location. You can also use the WeWork app to make bookings directly.",
    },
    KeywordRule {
        topic: FallbackTopic::Wifi,
        triggers: &["wifi", "internet", "network"],
        reply: "I understand you're having Wi-Fi issues. Please try reconnecting to the WeWork network. If the problem persists, I can connect you with our technical support team.",
    },
    KeywordRule {
        topic: FallbackTopic::Printing,
        triggers: &["print", "printer"],
        reply: "For printing issues, please ensure you're connected to the WeWork network and have the printer drivers installed. I can help you troubleshoot or contact our IT support.",
    },
    KeywordRule {
        topic: FallbackTopic::Billing,
        triggers: &["bill", "payment", "billing"],
        reply: "I can help you with billing inquiries. Please provide your membership details, and I'll connect you with our billing support team or help resolve your payment questions.",
    },
    KeywordRule {
        topic: FallbackTopic::Access,
        triggers: &["keycard", "access", "entry"],
        reply: "If you're having issues with your keycard or building access, I can help you troubleshoot or arrange for a replacement. Please provide your membership details.",
    },
    KeywordRule {
        topic: FallbackTopic::Cleaning,
        triggers: &["clean", "housekeeping"],
        reply: "I can help you request cleaning services or report cleanliness issues. Please provide the specific location and details of what needs attention.",
    },
    KeywordRule {
        topic: FallbackTopic::Mail,
        triggers: &["mail", "package", "post"],
        reply: "For mail and package inquiries, I can help you track deliveries or set up mail handling services. Please provide tracking details or specify what assistance you need.",
    },
    KeywordRule {
        topic: FallbackTopic::Temperature,
        triggers: &["temperature", "hot", "cold", "ac"],
        reply: "I understand you're having temperature concerns. I can report this to our facilities team to adjust the climate control in your area. Please specify your location.",
    },
    KeywordRule {
        topic: FallbackTopic::Noise,
        triggers: &["noise", "loud", "quiet"],
        reply: "I can help address noise concerns in the workspace. Please provide details about the location and type of noise issue you're experiencing.",
    },
    KeywordRule {
        topic: FallbackTopic::Help,
        triggers: &["help", "support"],
        reply: "I'm here to help! I can assist with room bookings, technical issues, billing questions, access problems, and general WeWork services. What specifically do you need help with?",
    },
];

/// Generic replies picked at random when no keyword rule matches.
pub const DEFAULT_REPLIES: [&str; 4] = [
    "Thank you for reaching out. I'm here to help with any WeWork-related questions or issues. Could you please provide more details about what you need assistance with?",
    "I understand you need help. As your WeWork India Agent, I can assist with bookings, technical support, billing, and facility issues. How can I help you today?",
    "I'm here to assist you with any WeWork services. Please let me know what specific issue or question you have, and I'll do my best to help.",
    "Thanks for contacting WeWork support. I can help with a wide range of services including room bookings, technical issues, and general inquiries. What would you like assistance with?",
];

/// Returns the first keyword rule whose trigger occurs in `text`.
pub fn match_rule(text: &str) -> Option<&'static KeywordRule> {
    let lowered = text.to_lowercase();
    KEYWORD_RULES.iter().find(|rule| rule.matches(&lowered))
}

/// Computes fallback replies, owning the random source for default picks.
pub struct FallbackResponder {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl FallbackResponder {
    /// Creates a responder seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates a responder drawing default picks from `rng`.
    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Returns the keyword reply for `text`, or a random default reply.
    pub fn reply_for(&self, text: &str) -> &'static str {
        if let Some(rule) = match_rule(text) {
            tracing::debug!(topic = ?rule.topic, "fallback keyword rule matched");
            return rule.reply;
        }

        let mut guard = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let index = guard.gen_range(0..DEFAULT_REPLIES.len());
        DEFAULT_REPLIES[index]
    }
}

impl Default for FallbackResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FallbackResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackResponder").finish_non_exhaustive()
    }
}
