//! Brain Module Tests
//!
//! Classification, composition and source search over the built-in tables.

use crate::brain::answers::{CANNED_ANSWERS, DEFAULT_ANSWER};
use crate::brain::intent::TOPIC_RULES;
use crate::brain::sources::SOURCE_ENTRIES;
use crate::brain::{IntentClassifier, MessageType, ResponseComposer, SourceDirectory, Topic};

#[cfg(test)]
mod intent_classifier_tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "What notice is required to amend parking rules?",
        "Can the president call an emergency meeting?",
        "PAMco wants a new contract",
        "tell me about dinosaurs",
        "ChatGPT drafted our newsletter",
        "ÉMERGENCY MEETING",
    ];

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = IntentClassifier::new();
        for question in SAMPLES {
            let first = classifier.classify(question);
            for _ in 0..5 {
                assert_eq!(classifier.classify(question), first, "'{}'", question);
            }
        }
    }

    #[test]
    fn test_matching_ignores_case() {
        let classifier = IntentClassifier::new();
        assert_eq!(
            classifier.classify("EMERGENCY MEETING tonight"),
            Topic::EmergencyMeeting
        );
        assert_eq!(
            classifier.classify("Our Deed Restriction says no sheds"),
            Topic::RestrictiveCovenants
        );
    }

    #[test]
    fn test_protection_act_beats_emergency_meeting() {
        let classifier = IntentClassifier::new();
        assert_eq!(
            classifier.classify("Can PAMco call an emergency meeting?"),
            Topic::ProtectionAct
        );
    }

    #[test]
    fn test_specific_topics_beat_notice() {
        let classifier = IntentClassifier::new();
        // "notice" alone would be NoticeAmendment
        assert_eq!(
            classifier.classify("What notice does a 209 letter need?"),
            Topic::Chapter209Letter
        );
        assert_eq!(
            classifier.classify("notice for an emergency meeting"),
            Topic::EmergencyMeeting
        );
        assert_eq!(
            classifier.classify("Dallas code compliance notice"),
            Topic::Dallas
        );
    }

    #[test]
    fn test_rule_order_is_declared_priority() {
        let order: Vec<Topic> = TOPIC_RULES.iter().map(|rule| rule.topic).collect();
        assert_eq!(
            order,
            vec![
                Topic::ProtectionAct,
                Topic::AiGovernance,
                Topic::Dallas,
                Topic::RestrictiveCovenants,
                Topic::Chapter209Letter,
                Topic::EmergencyMeeting,
                Topic::NoticeAmendment,
            ]
        );
    }

    #[test]
    fn test_every_rule_needle_classifies_to_its_topic() {
        let classifier = IntentClassifier::new();
        for (index, rule) in TOPIC_RULES.iter().enumerate() {
            for needle in rule.needles {
                assert_eq!(needle.to_lowercase(), *needle, "needle must be lowercase");
                let topic = classifier.classify(needle);
                let winner = TOPIC_RULES
                    .iter()
                    .position(|r| r.topic == topic)
                    .expect("classified to a rule topic");
                assert!(
                    winner <= index,
                    "'{}' classified to a lower-priority topic",
                    needle
                );
            }
        }
    }
}

#[cfg(test)]
mod composer_tests {
    use super::*;

    #[test]
    fn test_every_topic_has_citations() {
        let composer = ResponseComposer::new();
        for topic in Topic::ALL {
            let answer = composer.compose(topic, "anything");
            assert!(!answer.citations.is_empty(), "{} has no citations", topic);
            assert_eq!(answer.topic, topic);
        }
    }

    #[test]
    fn test_every_non_default_topic_has_canned_entry() {
        for topic in Topic::ALL.iter().filter(|t| !t.is_default()) {
            assert!(
                CANNED_ANSWERS.iter().any(|a| a.topic == *topic),
                "missing canned answer for {}",
                topic
            );
        }
        assert_eq!(DEFAULT_ANSWER.topic, Topic::Uncategorized);
    }

    #[test]
    fn test_scenario_209_letter() {
        let answer = ResponseComposer::new().answer("What are the requirements for a 209 letter?");

        assert_eq!(answer.topic, Topic::Chapter209Letter);
        assert!(answer.body.contains("Chapter 209 Letter"));
        assert!(answer
            .citations
            .contains(&"Texas Property Code §209.006".to_string()));
        assert!(answer.citations.contains(&"CC&Rs Section 8.3".to_string()));
    }

    #[test]
    fn test_scenario_emergency_meeting() {
        let answer = ResponseComposer::new().answer("Can the president call an emergency meeting?");

        assert_eq!(answer.topic, Topic::EmergencyMeeting);
        assert_eq!(
            answer.citations,
            vec![
                "Bylaws Section 4.1".to_string(),
                "Texas Property Code §209.0053".to_string()
            ]
        );
        assert!(answer.source_links.is_empty());
    }

    #[test]
    fn test_scenario_default() {
        let answer = ResponseComposer::new().answer("tell me about dinosaurs");

        assert_eq!(answer.topic, Topic::Uncategorized);
        assert_eq!(
            answer.citations,
            vec!["CC&Rs".to_string(), "Texas Property Code Ch. 209".to_string()]
        );
        assert!(answer.source_links.is_empty());
        assert_eq!(answer.message_type, MessageType::Suggestion);
    }

    #[test]
    fn test_default_topic_uses_keyword_search() {
        let answer = ResponseComposer::new().answer("Who signs a resale certificate?");

        assert_eq!(answer.topic, Topic::Uncategorized);
        assert_eq!(answer.source_links.len(), 1);
        assert!(answer.source_links[0].name.contains("207"));
    }

    #[test]
    fn test_citations_use_section_sign() {
        let composer = ResponseComposer::new();
        for topic in Topic::ALL {
            for label in composer.compose(topic, "").citations {
                assert!(!label.contains("ยง"), "mis-encoded label {}", label);
            }
        }
    }
}

#[cfg(test)]
mod source_directory_tests {
    use super::*;

    #[test]
    fn test_search_never_exceeds_limit() {
        let directory = SourceDirectory::new();
        let question = SOURCE_ENTRIES
            .iter()
            .flat_map(|entry| entry.keywords.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");

        for limit in 0..=SOURCE_ENTRIES.len() + 2 {
            let found = directory.search(&question, limit).count();
            assert!(found <= limit);
        }
        assert_eq!(
            directory.search(&question, usize::MAX).count(),
            SOURCE_ENTRIES.len()
        );
    }

    #[test]
    fn test_search_keeps_directory_order() {
        let directory = SourceDirectory::new();
        // Matches HUD (declared late) on two keywords and 209 (declared first) on one
        let found: Vec<_> = directory
            .search("reasonable accommodation for a disability hearing", 3)
            .map(|entry| entry.id)
            .collect();

        let positions: Vec<usize> = found
            .iter()
            .map(|id| SOURCE_ENTRIES.iter().position(|e| e.id == *id).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_search_without_match_is_empty() {
        let directory = SourceDirectory::new();
        assert_eq!(directory.search("tell me about dinosaurs", 3).count(), 0);
        assert_eq!(directory.search("", 3).count(), 0);
    }

    #[test]
    fn test_keywords_are_lowercase_and_non_empty() {
        for entry in SOURCE_ENTRIES {
            assert!(!entry.keywords.is_empty(), "{} has no keywords", entry.id);
            for keyword in entry.keywords {
                assert!(!keyword.is_empty());
                assert_eq!(keyword.to_lowercase(), *keyword);
            }
        }
    }
}
