//! Reply text keyed by sentiment.
//!
//! Templates use `{term}` for the top contributing term. Neutral sentiment
//! never drives or decorates a reply, so its pools are empty.

use super::{IntensityTier, Polarity};

/// Templates for a reply driven purely by sentiment.
#[must_use]
pub fn reply_templates(polarity: Polarity) -> &'static [&'static str] {
    match polarity {
        Polarity::Positive => &[
            "I love the positive energy with '{term}'! Keep slaying! ✨",
            "Yes! The '{term}' energy is immaculate! 💯",
            "You're really serving with that '{term}' vibe! 🔥",
            "That positive '{term}' energy hits different! ✨",
        ],
        Polarity::Negative => &[
            "I'm sensing some '{term}' vibes... what's the tea? ☕",
            "Oop, the '{term}' energy is real... you okay bestie? 😬",
            "That '{term}' mood is valid but let's turn it around! 💪",
            "I feel the '{term}' sentiment... wanna talk about it? 👀",
        ],
        Polarity::Neutral => &[],
    }
}

/// Short mood acknowledgements appended to a reply.
#[must_use]
pub fn mood_phrases(polarity: Polarity, tier: IntensityTier) -> &'static [&'static str] {
    match (polarity, tier) {
        (Polarity::Positive, IntensityTier::Strong) => &[
            "I'm picking up major positive vibes! 🔥✨",
            "The energy is off the charts! 🚀",
        ],
        (Polarity::Positive, IntensityTier::Moderate) => &[
            "Love the positive energy! ✨",
            "Those are some good vibes! 💯",
        ],
        (Polarity::Positive, IntensityTier::Mild) => &["Good vibes! 😊"],
        (Polarity::Negative, IntensityTier::Strong) => &[
            "Oof, that's giving rough energy 😬",
            "That sounds really heavy. I'm here for it 💔",
        ],
        (Polarity::Negative, IntensityTier::Moderate) => &[
            "I sense some negative vibes 👀",
            "Sounds like a rough one 😬",
        ],
        (Polarity::Negative, IntensityTier::Mild) => &["Not the best vibes, but I get it 🤷"],
        (Polarity::Neutral, _) => &[],
    }
}

/// Fill a template with the given term.
#[must_use]
pub fn fill(template: &str, term: &str) -> String {
    template.replace("{term}", term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_pools_are_non_empty() {
        for polarity in [Polarity::Positive, Polarity::Negative] {
            assert!(!reply_templates(polarity).is_empty());
            for tier in [IntensityTier::Mild, IntensityTier::Moderate, IntensityTier::Strong] {
                assert!(!mood_phrases(polarity, tier).is_empty());
            }
        }
    }

    #[test]
    fn neutral_pools_are_empty() {
        assert!(reply_templates(Polarity::Neutral).is_empty());
        assert!(mood_phrases(Polarity::Neutral, IntensityTier::Mild).is_empty());
    }

    #[test]
    fn templates_reference_the_term() {
        for template in reply_templates(Polarity::Positive) {
            assert!(fill(template, "slay").contains("'slay'"));
        }
    }
}
