//! Source Directory of external reference material.
//!
//! A fixed table of statutes, ordinances and guidance documents, each tagged
//! with lowercase keywords. Search is match/no-match only: results come back
//! in declaration order, never ranked by how many keywords hit.

use serde::Serialize;

/// One external reference document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub url: &'static str,
    #[serde(skip)]
    pub keywords: &'static [&'static str],
}

impl SourceEntry {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }

    pub fn link(&self) -> SourceLink {
        SourceLink::new(self.name, self.url)
    }
}

/// Display name and URL pair attached to an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct SourceLink {
    pub name: String,
    pub url: String,
}

impl SourceLink {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

pub const TEXAS_PROPERTY_CODE_209: SourceEntry = SourceEntry {
    id: "tx-prop-209",
    name: "Texas Property Code Chapter 209 - Residential Property Owners Protection Act",
    url: "https://statutes.capitol.texas.gov/Docs/PR/htm/PR.209.htm",
    keywords: &[
        "chapter 209",
        "209",
        "protection act",
        "dedicatory instrument",
        "amend",
        "rule change",
        "violation",
        "hearing",
    ],
};

pub const TEXAS_PROPERTY_CODE_202: SourceEntry = SourceEntry {
    id: "tx-prop-202",
    name: "Texas Property Code Chapter 202 - Construction and Enforcement of Restrictive Covenants",
    url: "https://statutes.capitol.texas.gov/Docs/PR/htm/PR.202.htm",
    keywords: &[
        "chapter 202",
        "restrictive covenant",
        "deed restriction",
        "covenant",
        "architectural",
        "solar",
        "flag",
    ],
};

pub const TEXAS_PROPERTY_CODE_207: SourceEntry = SourceEntry {
    id: "tx-prop-207",
    name: "Texas Property Code Chapter 207 - Disclosure of Information by Property Owners' Associations",
    url: "https://statutes.capitol.texas.gov/Docs/PR/htm/PR.207.htm",
    keywords: &[
        "chapter 207",
        "resale certificate",
        "management certificate",
        "reserve",
        "disclosure",
    ],
};

pub const TEXAS_PROPERTY_CODE_204: SourceEntry = SourceEntry {
    id: "tx-prop-204",
    name: "Texas Property Code Chapter 204 - Powers of Property Owners' Association",
    url: "https://statutes.capitol.texas.gov/Docs/PR/htm/PR.204.htm",
    keywords: &[
        "chapter 204",
        "extension of restrictions",
        "petition",
        "assessment",
    ],
};

pub const OPEN_BOARD_MEETINGS: SourceEntry = SourceEntry {
    id: "tx-prop-209-0051",
    name: "Texas Property Code §209.0051 - Open Board Meetings",
    url: "https://statutes.capitol.texas.gov/Docs/PR/htm/PR.209.htm#209.0051",
    keywords: &["open meeting", "board meeting", "agenda", "minutes"],
};

pub const NONPROFIT_CORPORATIONS: SourceEntry = SourceEntry {
    id: "tx-boc-22",
    name: "Texas Business Organizations Code Chapter 22 - Nonprofit Corporations",
    url: "https://statutes.capitol.texas.gov/Docs/BO/htm/BO.22.htm",
    keywords: &["nonprofit", "director", "quorum", "proxy", "election"],
};

pub const DALLAS_CITY_CODE: SourceEntry = SourceEntry {
    id: "dallas-city-code",
    name: "Dallas City Code",
    url: "https://codelibrary.amlegal.com/codes/dallas/latest/overview",
    keywords: &["dallas", "city code", "ordinance", "zoning"],
};

pub const DALLAS_CODE_COMPLIANCE: SourceEntry = SourceEntry {
    id: "dallas-code-compliance",
    name: "City of Dallas Code Compliance Services",
    url: "https://dallascityhall.com/departments/codecompliance/Pages/default.aspx",
    keywords: &["code compliance", "dallas", "high weeds", "substandard"],
};

pub const HUD_FAIR_HOUSING: SourceEntry = SourceEntry {
    id: "hud-fair-housing",
    name: "HUD Fair Housing and Equal Opportunity",
    url: "https://www.hud.gov/program_offices/fair_housing_equal_opp",
    keywords: &[
        "fair housing",
        "discrimination",
        "reasonable accommodation",
        "disability",
        "service animal",
    ],
};

pub const NIST_AI_RMF: SourceEntry = SourceEntry {
    id: "nist-ai-rmf",
    name: "NIST AI Risk Management Framework",
    url: "https://www.nist.gov/itl/ai-risk-management-framework",
    keywords: &[
        "artificial intelligence",
        "ai tool",
        "ai-generated",
        "chatgpt",
        "generative",
        "automated decision",
    ],
};

/// Every entry, in declaration order.
pub const SOURCE_ENTRIES: &[SourceEntry] = &[
    TEXAS_PROPERTY_CODE_209,
    TEXAS_PROPERTY_CODE_202,
    TEXAS_PROPERTY_CODE_207,
    TEXAS_PROPERTY_CODE_204,
    OPEN_BOARD_MEETINGS,
    NONPROFIT_CORPORATIONS,
    DALLAS_CITY_CODE,
    DALLAS_CODE_COMPLIANCE,
    HUD_FAIR_HOUSING,
    NIST_AI_RMF,
];

/// Static directory of reference documents
#[derive(Debug, Clone, Copy)]
pub struct SourceDirectory {
    entries: &'static [SourceEntry],
}

impl Default for SourceDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceDirectory {
    pub fn new() -> Self {
        Self::with_entries(SOURCE_ENTRIES)
    }

    pub fn with_entries(entries: &'static [SourceEntry]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [SourceEntry] {
        self.entries
    }

    /// Lazily yields entries whose keywords occur in `question`, in
    /// declaration order, stopping after `limit`.
    pub fn search<'q>(
        &self,
        question: &'q str,
        limit: usize,
    ) -> impl Iterator<Item = &'static SourceEntry> + 'q {
        let lowered = question.to_lowercase();
        self.entries
            .iter()
            .filter(move |entry| entry.matches(&lowered))
            .take(limit)
    }

    /// Convenience wrapper returning display links
    pub fn search_links(&self, question: &str, limit: usize) -> Vec<SourceLink> {
        self.search(question, limit).map(SourceEntry::link).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order_preserved() {
        let directory = SourceDirectory::new();

        // Hits chapter 202 (covenant) and Dallas (dallas) - 202 is declared first.
        let ids: Vec<&str> = directory
            .search("Dallas covenant question", 3)
            .map(|entry| entry.id)
            .collect();

        assert_eq!(ids, vec!["tx-prop-202", "dallas-city-code", "dallas-code-compliance"]);
    }

    #[test]
    fn test_no_ranking_by_hit_count() {
        let directory = SourceDirectory::new();

        // Three 202 keywords vs one 209 keyword: 209 still comes first.
        let ids: Vec<&str> = directory
            .search("209 covenant architectural solar", 2)
            .map(|entry| entry.id)
            .collect();

        assert_eq!(ids, vec!["tx-prop-209", "tx-prop-202"]);
    }

    #[test]
    fn test_limit_respected() {
        let directory = SourceDirectory::new();
        let everything = "209 covenant reserve petition agenda quorum dallas fair housing chatgpt";

        assert_eq!(directory.search(everything, 3).count(), 3);
        assert_eq!(directory.search(everything, 0).count(), 0);
        assert_eq!(directory.search(everything, 100).count(), SOURCE_ENTRIES.len());
    }

    #[test]
    fn test_no_match_is_empty() {
        let directory = SourceDirectory::new();

        assert!(directory.search_links("tell me about dinosaurs", 3).is_empty());
        assert!(directory.search_links("", 3).is_empty());
    }

    #[test]
    fn test_keywords_are_lowercase_and_present() {
        for entry in SOURCE_ENTRIES {
            assert!(!entry.keywords.is_empty(), "{} has no keywords", entry.id);
            for keyword in entry.keywords {
                assert_eq!(*keyword, keyword.to_lowercase(), "{} keyword not lowercase", entry.id);
            }
        }
    }
}
