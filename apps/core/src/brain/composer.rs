//! Response Composer - turns a classified question into a cited answer.
//!
//! Composition is a pure lookup: the topic selects a canned body and
//! citation labels. Source links come from the topic's curated list when it
//! has one, otherwise from a keyword search over the [`SourceDirectory`].

use serde::Serialize;
use tracing::{debug, error};

use super::answers::{CannedAnswer, MessageType, CANNED_ANSWERS, DEFAULT_ANSWER};
use super::intent::{IntentClassifier, Topic};
use super::sources::{SourceDirectory, SourceEntry, SourceLink};

/// Most keyword-search links an answer may carry
pub const MAX_LINK_LIMIT: usize = 3;

/// A composed, immutable answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedAnswer {
    pub topic: Topic,
    pub body: String,
    pub citations: Vec<String>,
    pub source_links: Vec<SourceLink>,
    pub message_type: MessageType,
}

/// Classifies questions and composes canned answers
#[derive(Debug, Clone)]
pub struct ResponseComposer {
    classifier: IntentClassifier,
    directory: SourceDirectory,
    answers: &'static [CannedAnswer],
    link_limit: usize,
}

impl Default for ResponseComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseComposer {
    pub fn new() -> Self {
        Self::with_tables(
            IntentClassifier::new(),
            SourceDirectory::new(),
            CANNED_ANSWERS,
        )
    }

    /// Build a composer over explicit tables
    pub fn with_tables(
        classifier: IntentClassifier,
        directory: SourceDirectory,
        answers: &'static [CannedAnswer],
    ) -> Self {
        Self {
            classifier,
            directory,
            answers,
            link_limit: MAX_LINK_LIMIT,
        }
    }

    /// Lower the fallback link cap. Values above [`MAX_LINK_LIMIT`] are clamped.
    pub fn with_link_limit(mut self, link_limit: usize) -> Self {
        self.link_limit = link_limit.min(MAX_LINK_LIMIT);
        self
    }

    pub fn directory(&self) -> &SourceDirectory {
        &self.directory
    }

    pub fn link_limit(&self) -> usize {
        self.link_limit
    }

    /// Classify then compose
    pub fn answer(&self, question: &str) -> ComposedAnswer {
        let topic = self.classifier.classify(question);
        debug!(topic = %topic, "Classified question");
        self.compose(topic, question)
    }

    /// Compose the answer for an already classified question.
    ///
    /// A non-default topic without a table entry is a programming error:
    /// debug builds panic, release builds log and fall back to the default
    /// answer.
    pub fn compose(&self, topic: Topic, question: &str) -> ComposedAnswer {
        let canned = if topic.is_default() {
            &DEFAULT_ANSWER
        } else {
            match self.answers.iter().find(|answer| answer.topic == topic) {
                Some(answer) => answer,
                None => {
                    if cfg!(debug_assertions) {
                        panic!("no canned answer registered for topic {}", topic);
                    }
                    error!(topic = %topic, "No canned answer for topic, using default");
                    &DEFAULT_ANSWER
                }
            }
        };

        ComposedAnswer {
            topic: canned.topic,
            body: canned.body.to_string(),
            citations: canned.citations.iter().map(|c| c.to_string()).collect(),
            source_links: self.resolve_links(canned, question),
            message_type: canned.message_type,
        }
    }

    fn resolve_links(&self, canned: &CannedAnswer, question: &str) -> Vec<SourceLink> {
        match canned.curated_links {
            Some(curated) => curated.iter().map(SourceEntry::link).collect(),
            None => self.directory.search_links(question, self.link_limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curated_links_take_precedence() {
        let composer = ResponseComposer::new();

        // "dallas" would also hit both Dallas directory entries via search,
        // but the curated list (three links, HUD last) is used verbatim.
        let answer = composer.answer("Dallas weeds ordinance");
        assert_eq!(answer.topic, Topic::Dallas);
        assert_eq!(answer.source_links.len(), 3);
        assert_eq!(answer.source_links[2].name, "HUD Fair Housing and Equal Opportunity");
    }

    #[test]
    fn test_fallback_links_for_uncurated_topic() {
        let composer = ResponseComposer::new();

        let answer = composer.answer("What notice is required to amend parking rules?");
        assert_eq!(answer.topic, Topic::NoticeAmendment);
        assert_eq!(answer.source_links.len(), 1);
        assert!(answer.source_links[0].url.ends_with("PR.209.htm"));
    }

    #[test]
    fn test_link_limit_applies_to_fallback() {
        let composer = ResponseComposer::new().with_link_limit(1);

        let answer = composer.answer("reserve petition agenda quorum");
        assert_eq!(answer.topic, Topic::Uncategorized);
        assert_eq!(answer.source_links.len(), 1);
    }

    #[test]
    fn test_link_limit_never_exceeds_three() {
        let composer = ResponseComposer::new().with_link_limit(10);
        assert_eq!(composer.link_limit(), MAX_LINK_LIMIT);

        // matches five directory entries
        let answer = composer.answer("reserve petition agenda quorum zoning");
        assert_eq!(answer.topic, Topic::Uncategorized);
        assert_eq!(answer.source_links.len(), 3);
    }

    #[test]
    fn test_default_message_type() {
        let composer = ResponseComposer::new();

        assert_eq!(
            composer.answer("tell me about dinosaurs").message_type,
            MessageType::Suggestion
        );
        assert_eq!(
            composer.answer("emergency meeting").message_type,
            MessageType::Answer
        );
    }
}
