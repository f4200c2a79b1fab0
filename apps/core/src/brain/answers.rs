//! Canned answer table.
//!
//! Bodies use the small markup vocabulary understood by [`crate::markup`]:
//! `**bold**`, numbered lines, and lines starting with the warning glyph.

use crate::brain::intent::Topic;
use crate::brain::sources::{
    SourceEntry, DALLAS_CITY_CODE, DALLAS_CODE_COMPLIANCE, HUD_FAIR_HOUSING, NIST_AI_RMF,
    TEXAS_PROPERTY_CODE_202, TEXAS_PROPERTY_CODE_204, TEXAS_PROPERTY_CODE_207,
    TEXAS_PROPERTY_CODE_209,
};
use serde::{Deserialize, Serialize};

/// Kind of assistant message, stored alongside the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Answer,
    Warning,
    Suggestion,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Answer => "answer",
            MessageType::Warning => "warning",
            MessageType::Suggestion => "suggestion",
        }
    }
}

impl std::str::FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "answer" => Ok(MessageType::Answer),
            "warning" => Ok(MessageType::Warning),
            "suggestion" => Ok(MessageType::Suggestion),
            other => Err(format!("unknown message type: {}", other)),
        }
    }
}

/// Static answer data for one topic
#[derive(Debug, Clone, Copy)]
pub struct CannedAnswer {
    pub topic: Topic,
    pub body: &'static str,
    pub citations: &'static [&'static str],
    /// Hand-picked links. `None` means fall back to keyword search.
    pub curated_links: Option<&'static [SourceEntry]>,
    pub message_type: MessageType,
}

const NOTICE_AMENDMENT_BODY: &str = "Based on your governing documents and Texas law:

**Your CC&Rs (Section 3.5)** require written notice 30 days before any meeting where rule amendments will be voted upon.

**Texas Property Code §209.0052** requires the association to give written notice of a proposed rule change to each owner before a meeting at which the proposed rule change will be considered.

⚠️ **Key Point:** Your CC&Rs' 30-day requirement is stricter than the state minimum, so the 30-day rule applies.

**Next Steps:**
1. Draft the proposed rule amendment
2. Prepare notice with specific rule text and meeting date
3. Distribute to all owners at least 30 days before meeting
4. Document delivery method for each owner";

const EMERGENCY_MEETING_BODY: &str = "Regarding emergency meetings:

**Your Bylaws (Section 4.1)** state: \"The president may call a special meeting upon 48 hours' notice...\"

**Texas Property Code §209.0053** states: \"Notice of meeting must be provided no less than 72 hours in advance...\"

⚠️ **Potential Conflict:** Your bylaws say 48 hours, but state law requires 72 hours. **State law prevails**.

**Important:** Under Chapter 209.0053, boards can only call emergency meetings every 90 days for true emergencies.

**Recommendation:** Always provide at least 72 hours notice to remain compliant with state law.";

const CHAPTER_209_LETTER_BODY: &str = "A **Chapter 209 Letter** (also called a \"209 Notice\") is required before certain enforcement actions:

**Texas Property Code §209.006** requires:
- Written notice of the violation
- Description of the violation
- Opportunity to cure (typically 30 days)
- Right to request a hearing before the board

**Your CC&Rs (Section 8.3)** supplement this with:
- Notice must be sent via certified mail
- Homeowner has 14 days to request a hearing
- Board must hold hearing within 30 days of request

**Template Elements:**
1. Owner name and property address
2. Specific rule/covenant violated (with citation)
3. Description of the violation
4. Cure period and deadline
5. Hearing request instructions
6. Contact information";

const PROTECTION_ACT_BODY: &str = "The **Texas Residential Property Owners Protection Act** (Property Code Chapter 209) sets the floor for how your association and its management company (PAMco) deal with owners:

**Records access (§209.005):** Owners may request association books and records in writing. The association must respond within 10 business days, either producing the records or stating when they will be available.

**Management company duties:** Your management agreement delegates day-to-day work, but the board remains responsible for compliance. **Section 2.1 of your management agreement** requires the manager to follow association policies and state law.

⚠️ **Key Point:** A management company cannot waive an owner's Chapter 209 rights on the board's behalf.

**Next Steps:**
1. Confirm your records production and retention policy is recorded
2. Review the management agreement for Chapter 209 compliance duties
3. Calendar response deadlines for every written records request";

const AI_GOVERNANCE_BODY: &str = "Using AI tools in association business is permitted, but the board keeps full responsibility for every decision:

**Your Bylaws (Section 5.2)** require board decisions to be made by directors at a properly noticed meeting. An AI tool can help research or draft, but it cannot vote or decide.

**Texas Property Code §209.005** gives owners access to association records. Drafts and summaries produced with AI tools that are used in association business may become association records.

⚠️ **Key Point:** Never paste owner personal information or account balances into public AI tools.

**Recommendations:**
1. Adopt a written policy on acceptable AI use by directors and the manager
2. Have a human review every AI-assisted communication before it is sent
3. Keep AI-assisted drafts with the rest of the association records
4. Consult your HOA attorney before relying on AI output for legal questions";

const DALLAS_BODY: &str = "For associations inside the City of Dallas, city rules apply alongside your governing documents:

**Dallas City Code** covers property maintenance, parking on unimproved surfaces, and high weeds. City standards apply to every lot regardless of what your CC&Rs say.

**Your CC&Rs (Section 6.4)** may impose stricter maintenance standards than the city. Where both apply, owners must meet the stricter one.

⚠️ **Key Point:** The association cannot enforce city ordinances itself. Report code violations to Dallas Code Compliance (311) and enforce only your own covenants.

**Next Steps:**
1. Identify whether the issue is a city violation, a covenant violation, or both
2. File a 311 report for city violations
3. Use the Chapter 209 notice process for covenant violations";

const RESTRICTIVE_COVENANTS_BODY: &str = "Restrictive covenants run with the land and bind every owner in the subdivision:

**Texas Property Code Chapter 202** requires restrictive covenants to be liberally construed to give effect to their purposes and intent.

**Your CC&Rs (Article VI)** list the use restrictions that apply to every lot, including architectural approval requirements.

⚠️ **Key Point:** Chapter 202 limits what covenants can prohibit, including certain solar devices, flags, and rain barrels. A covenant that conflicts with Chapter 202 is unenforceable to that extent.

**Next Steps:**
1. Locate the exact covenant language in your recorded CC&Rs
2. Check Chapter 202 for any statutory limits on that restriction
3. Confirm the restriction was applied consistently to other owners";

const DEFAULT_BODY: &str = "I've reviewed your question against your governing documents and Texas Property Code.

Based on your **CC&Rs** and **Bylaws**, along with relevant sections of **Texas Property Code Chapters 201-209**, here's what I found:

This topic may require specific analysis of your documents. I recommend:
1. Uploading relevant sections of your CC&Rs
2. Specifying the exact situation or scenario
3. Consulting with your HOA attorney for legal interpretation

Would you like me to help you draft a research memo on this topic, or would you prefer to explore a specific document template?";

/// One entry per non-default topic.
pub const CANNED_ANSWERS: &[CannedAnswer] = &[
    CannedAnswer {
        topic: Topic::ProtectionAct,
        body: PROTECTION_ACT_BODY,
        citations: &[
            "Texas Property Code §209.005",
            "Management Agreement Section 2.1",
        ],
        curated_links: Some(&[TEXAS_PROPERTY_CODE_209, TEXAS_PROPERTY_CODE_207]),
        message_type: MessageType::Answer,
    },
    CannedAnswer {
        topic: Topic::AiGovernance,
        body: AI_GOVERNANCE_BODY,
        citations: &["Bylaws Section 5.2", "Texas Property Code §209.005"],
        curated_links: Some(&[NIST_AI_RMF, TEXAS_PROPERTY_CODE_209]),
        message_type: MessageType::Answer,
    },
    CannedAnswer {
        topic: Topic::Dallas,
        body: DALLAS_BODY,
        citations: &["Dallas City Code", "CC&Rs Section 6.4"],
        curated_links: Some(&[DALLAS_CITY_CODE, DALLAS_CODE_COMPLIANCE, HUD_FAIR_HOUSING]),
        message_type: MessageType::Answer,
    },
    CannedAnswer {
        topic: Topic::RestrictiveCovenants,
        body: RESTRICTIVE_COVENANTS_BODY,
        citations: &["Texas Property Code Ch. 202", "CC&Rs Article VI"],
        curated_links: Some(&[TEXAS_PROPERTY_CODE_202, TEXAS_PROPERTY_CODE_204]),
        message_type: MessageType::Answer,
    },
    CannedAnswer {
        topic: Topic::Chapter209Letter,
        body: CHAPTER_209_LETTER_BODY,
        citations: &["Texas Property Code §209.006", "CC&Rs Section 8.3"],
        curated_links: Some(&[TEXAS_PROPERTY_CODE_209]),
        message_type: MessageType::Answer,
    },
    CannedAnswer {
        topic: Topic::EmergencyMeeting,
        body: EMERGENCY_MEETING_BODY,
        citations: &["Bylaws Section 4.1", "Texas Property Code §209.0053"],
        curated_links: None,
        message_type: MessageType::Answer,
    },
    CannedAnswer {
        topic: Topic::NoticeAmendment,
        body: NOTICE_AMENDMENT_BODY,
        citations: &["CC&Rs Section 3.5", "Texas Property Code §209.0052"],
        curated_links: None,
        message_type: MessageType::Answer,
    },
];

/// Generic reply for uncategorized questions. Links always come from the
/// keyword search.
pub const DEFAULT_ANSWER: CannedAnswer = CannedAnswer {
    topic: Topic::Uncategorized,
    body: DEFAULT_BODY,
    citations: &["CC&Rs", "Texas Property Code Ch. 209"],
    curated_links: None,
    message_type: MessageType::Suggestion,
};
