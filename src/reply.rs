//! Engagement replies.
//!
//! A fixed ladder of four stages, each with a few equivalent phrasings. The
//! stage depends only on detection state; the phrasing within a stage is picked
//! from a caller-provided random source, so tests can pin it with a seeded RNG.
//! No phrasing ever mentions detection, warns or confronts.

use rand::Rng;
use serde::Serialize;

use crate::analyze::Confidence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementStage {
    /// Feigned lack of understanding.
    Confusion,
    /// Anxious cooperation.
    UrgencyCompliance,
    /// Ask for procedural detail: which link, which number, which reference.
    Probing,
    /// Personal anecdote plus a request to keep going.
    TrustBuilding,
}

const CONFUSION: &[&str] = &[
    "Hi, I'm a bit confused about this message. Could you explain what it's regarding?",
    "Sorry, I just noticed this message. Which account is this related to?",
    "I'm not sure I understand. Who is this, and what is this about?",
];

const URGENCY_COMPLIANCE: &[&str] = &[
    "That sounds serious. I don't want any account issues. What exactly do I need to do to fix this?",
    "Oh no, I really can't have my account stopped right now. Please tell me what to do.",
    "Okay, I'm listening. I will do whatever is needed, just tell me the steps one by one.",
];

const PROBING: &[&str] = &[
    "I'm getting worried now. I've never faced this before. Can you tell me the exact steps and where I need to verify?",
    "Should I use the link you sent, or is there a direct number or UPI ID I should pay to instead?",
    "Is there a reference number or case ID for this? I always write these things down.",
];

const TRUST_BUILDING: &[&str] = &[
    "Thank you for being so patient with me. Last year my bank helped me like this too. What should I do after this step?",
    "You're very helpful, my nephew usually handles these things for me. Please stay with me while I finish this.",
    "I trust you, I just get nervous with banking apps since my husband passed. Can you walk me through the next part?",
];

impl EngagementStage {
    pub fn phrasings(&self) -> &'static [&'static str] {
        match self {
            EngagementStage::Confusion => CONFUSION,
            EngagementStage::UrgencyCompliance => URGENCY_COMPLIANCE,
            EngagementStage::Probing => PROBING,
            EngagementStage::TrustBuilding => TRUST_BUILDING,
        }
    }
}

/// Map detection state onto the engagement ladder.
pub fn stage_for(
    scam_detected: bool,
    confidence: Confidence,
    has_extracted_entities: bool,
) -> EngagementStage {
    if !scam_detected {
        return EngagementStage::Confusion;
    }
    match confidence {
        Confidence::Low => EngagementStage::Confusion,
        Confidence::Medium => EngagementStage::UrgencyCompliance,
        Confidence::High if has_extracted_entities => EngagementStage::TrustBuilding,
        Confidence::High => EngagementStage::Probing,
    }
}

/// Pick a phrasing of `stage` using `rng`.
pub fn phrase<R: Rng>(stage: EngagementStage, rng: &mut R) -> &'static str {
    let options = stage.phrasings();
    options[rng.random_range(0..options.len())]
}

pub fn select_reply<R: Rng>(
    scam_detected: bool,
    confidence: Confidence,
    has_extracted_entities: bool,
    rng: &mut R,
) -> &'static str {
    phrase(stage_for(scam_detected, confidence, has_extracted_entities), rng)
}

/// Deterministic variant: always the first phrasing of the stage.
pub fn first_reply(
    scam_detected: bool,
    confidence: Confidence,
    has_extracted_entities: bool,
) -> &'static str {
    stage_for(scam_detected, confidence, has_extracted_entities).phrasings()[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ALL: [EngagementStage; 4] = [
        EngagementStage::Confusion,
        EngagementStage::UrgencyCompliance,
        EngagementStage::Probing,
        EngagementStage::TrustBuilding,
    ];

    #[test]
    fn ladder_mapping() {
        use Confidence::*;
        assert_eq!(stage_for(false, High, true), EngagementStage::Confusion);
        assert_eq!(stage_for(true, Low, true), EngagementStage::Confusion);
        assert_eq!(stage_for(true, Medium, false), EngagementStage::UrgencyCompliance);
        assert_eq!(stage_for(true, Medium, true), EngagementStage::UrgencyCompliance);
        assert_eq!(stage_for(true, High, false), EngagementStage::Probing);
        assert_eq!(stage_for(true, High, true), EngagementStage::TrustBuilding);
    }

    #[test]
    fn selected_reply_belongs_to_stage() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let r = select_reply(true, Confidence::High, false, &mut rng);
            assert!(EngagementStage::Probing.phrasings().contains(&r));
        }
    }

    #[test]
    fn same_seed_same_reply() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(
                select_reply(true, Confidence::Medium, false, &mut a),
                select_reply(true, Confidence::Medium, false, &mut b)
            );
        }
    }

    #[test]
    fn first_reply_is_deterministic() {
        assert_eq!(first_reply(false, Confidence::Low, false), CONFUSION[0]);
        assert_eq!(first_reply(true, Confidence::High, true), TRUST_BUILDING[0]);
    }

    #[test]
    fn phrasings_never_disclose_detection() {
        for stage in ALL {
            assert!(!stage.phrasings().is_empty());
            for p in stage.phrasings() {
                assert!(!p.trim().is_empty());
                let lower = p.to_lowercase();
                for banned in ["scam", "fraud", "police", "report", "detected", "honeypot"] {
                    assert!(!lower.contains(banned), "{p:?} contains {banned:?}");
                }
            }
        }
    }
}
