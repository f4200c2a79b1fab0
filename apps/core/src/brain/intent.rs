//! Topic classification using ordered keyword rules.
//!
//! Fast, deterministic detection of the governance topic a board member is
//! asking about. No ML model required - plain substring matching on the
//! lowercased question, first matching rule wins.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Governance topic assigned to a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// PAMco / Texas Residential Property Owners Protection Act
    ProtectionAct,
    /// Use of AI tools in association governance
    AiGovernance,
    /// City of Dallas ordinances and code compliance
    Dallas,
    /// Deed restrictions and restrictive covenants
    RestrictiveCovenants,
    /// Chapter 209 violation letters
    #[serde(rename = "chapter_209_letter")]
    Chapter209Letter,
    /// Emergency and special board meetings
    EmergencyMeeting,
    /// Notice requirements for rule amendments
    NoticeAmendment,
    /// Nothing matched
    Uncategorized,
}

impl Topic {
    /// All topics, in classification priority order.
    pub const ALL: [Topic; 8] = [
        Topic::ProtectionAct,
        Topic::AiGovernance,
        Topic::Dallas,
        Topic::RestrictiveCovenants,
        Topic::Chapter209Letter,
        Topic::EmergencyMeeting,
        Topic::NoticeAmendment,
        Topic::Uncategorized,
    ];

    /// Stable tag used on the wire and in logs
    pub fn tag(&self) -> &'static str {
        match self {
            Topic::ProtectionAct => "protection_act",
            Topic::AiGovernance => "ai_governance",
            Topic::Dallas => "dallas",
            Topic::RestrictiveCovenants => "restrictive_covenants",
            Topic::Chapter209Letter => "chapter_209_letter",
            Topic::EmergencyMeeting => "emergency_meeting",
            Topic::NoticeAmendment => "notice_amendment",
            Topic::Uncategorized => "uncategorized",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Topic::ProtectionAct => "PAMco / Protection Act",
            Topic::AiGovernance => "AI in Governance",
            Topic::Dallas => "Dallas-Specific",
            Topic::RestrictiveCovenants => "Restrictive Covenants",
            Topic::Chapter209Letter => "Chapter 209 Letter",
            Topic::EmergencyMeeting => "Emergency Meeting",
            Topic::NoticeAmendment => "Notice & Amendments",
            Topic::Uncategorized => "General",
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Topic::Uncategorized)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .iter()
            .copied()
            .find(|topic| topic.tag() == s)
            .ok_or_else(|| format!("unknown topic tag: {}", s))
    }
}

/// One classification rule: the topic wins if the question contains any needle.
#[derive(Debug, Clone, Copy)]
pub struct TopicRule {
    pub topic: Topic,
    pub needles: &'static [&'static str],
}

impl TopicRule {
    fn matches(&self, lowered: &str) -> bool {
        self.needles.iter().any(|needle| lowered.contains(needle))
    }
}

/// Rules in priority order. Narrow topics come before the generic
/// notice/meeting rules, which would otherwise shadow them.
pub const TOPIC_RULES: &[TopicRule] = &[
    TopicRule {
        topic: Topic::ProtectionAct,
        needles: &["pamco", "protection act"],
    },
    TopicRule {
        topic: Topic::AiGovernance,
        needles: &[
            "artificial intelligence",
            "ai tool",
            "ai-generated",
            "chatgpt",
            "generative ai",
            "using ai",
        ],
    },
    TopicRule {
        topic: Topic::Dallas,
        needles: &["dallas", "city ordinance", "code compliance"],
    },
    TopicRule {
        topic: Topic::RestrictiveCovenants,
        needles: &["restrictive covenant", "deed restriction", "covenant"],
    },
    TopicRule {
        topic: Topic::Chapter209Letter,
        needles: &["209", "letter"],
    },
    TopicRule {
        topic: Topic::EmergencyMeeting,
        needles: &["emergency", "meeting"],
    },
    TopicRule {
        topic: Topic::NoticeAmendment,
        needles: &["notice", "amend"],
    },
];

/// Topic classifier over an ordered rule table
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: &'static [TopicRule],
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a classifier over the built-in rule table
    pub fn new() -> Self {
        Self::with_rules(TOPIC_RULES)
    }

    pub fn with_rules(rules: &'static [TopicRule]) -> Self {
        Self { rules }
    }

    /// Classify a question. Total: anything unmatched, including the empty
    /// string, is `Topic::Uncategorized`.
    pub fn classify(&self, question: &str) -> Topic {
        let lowered = question.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.topic)
            .unwrap_or(Topic::Uncategorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_questions() {
        let classifier = IntentClassifier::new();

        assert_eq!(
            classifier.classify("What notice is required to amend parking rules?"),
            Topic::NoticeAmendment
        );
        assert_eq!(
            classifier.classify("Can the president call an emergency meeting?"),
            Topic::EmergencyMeeting
        );
        assert_eq!(
            classifier.classify("What are the requirements for a 209 letter?"),
            Topic::Chapter209Letter
        );
        assert_eq!(
            classifier.classify("tell me about dinosaurs"),
            Topic::Uncategorized
        );
    }

    #[test]
    fn test_case_insensitive() {
        let classifier = IntentClassifier::new();

        assert_eq!(classifier.classify("PAMCO duties"), Topic::ProtectionAct);
        assert_eq!(classifier.classify("Dallas permits"), Topic::Dallas);
        assert_eq!(classifier.classify("EMERGENCY"), Topic::EmergencyMeeting);
    }

    #[test]
    fn test_empty_is_uncategorized() {
        let classifier = IntentClassifier::new();

        assert_eq!(classifier.classify(""), Topic::Uncategorized);
        assert_eq!(classifier.classify("   "), Topic::Uncategorized);
    }

    #[test]
    fn test_tag_roundtrip() {
        for topic in Topic::ALL {
            assert_eq!(topic.tag().parse::<Topic>().unwrap(), topic);
        }
        assert!("weather".parse::<Topic>().is_err());
    }

    #[test]
    fn test_wire_name_is_tag() {
        for topic in Topic::ALL {
            assert_eq!(serde_json::to_value(topic).unwrap(), topic.tag());
        }
    }

    #[test]
    fn test_every_rule_has_needles() {
        for rule in TOPIC_RULES {
            assert!(!rule.needles.is_empty(), "{} has no needles", rule.topic);
            assert!(!rule.topic.is_default());
        }
    }
}
