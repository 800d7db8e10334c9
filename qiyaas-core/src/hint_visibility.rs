use qiyaas_types::{PuzzleIdentity, RuleKind};
use tracing::debug;

use crate::hint_rules::parse_hint_text;

/// Second half of a hint toggle, run after the fade delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintPhase {
    FadeIn { clue: usize, generation: u64 },
    Unrender { clue: usize, generation: u64 },
}

impl HintPhase {
    pub fn clue(&self) -> usize {
        match self {
            HintPhase::FadeIn { clue, .. } | HintPhase::Unrender { clue, .. } => *clue,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct HintSlot {
    rendered: bool,
    opaque: bool,
    generation: u64,
}

/// Per-clue hint visibility as a two-flag animation contract.
///
/// Opening renders immediately and turns opaque once the returned
/// `FadeIn` phase is applied; closing drops opacity immediately and
/// un-renders on `Unrender`. A later toggle or reset makes older phases stale.
#[derive(Debug, Clone)]
pub struct HintVisibility {
    slots: Vec<HintSlot>,
    identity: Option<PuzzleIdentity>,
    enabled: bool,
}

impl HintVisibility {
    pub fn new(clue_count: usize) -> Self {
        Self {
            slots: vec![HintSlot::default(); clue_count],
            identity: None,
            enabled: true,
        }
    }

    /// Flip one hint. Returns the deferred phase the caller must schedule.
    pub fn toggle(&mut self, clue: usize) -> Option<HintPhase> {
        if !self.enabled {
            return None;
        }
        let slot = self.slots.get_mut(clue)?;
        slot.generation += 1;
        let generation = slot.generation;

        if slot.rendered {
            slot.opaque = false;
            Some(HintPhase::Unrender { clue, generation })
        } else {
            slot.rendered = true;
            Some(HintPhase::FadeIn { clue, generation })
        }
    }

    /// Apply a deferred phase; stale phases are dropped
    pub fn apply(&mut self, phase: HintPhase) -> bool {
        let Some(slot) = self.slots.get_mut(phase.clue()) else {
            return false;
        };

        match phase {
            HintPhase::FadeIn { generation, .. } if generation == slot.generation => {
                slot.opaque = true;
                true
            }
            HintPhase::Unrender { generation, .. } if generation == slot.generation => {
                slot.rendered = false;
                true
            }
            _ => {
                debug!("Dropping stale hint phase {:?}", phase);
                false
            }
        }
    }

    /// Hide everything when the puzzle identity changes. Returns true on reset.
    pub fn sync_identity(&mut self, identity: &PuzzleIdentity) -> bool {
        if self.identity.as_ref() == Some(identity) {
            return false;
        }
        self.identity = Some(identity.clone());
        self.reset();
        true
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.rendered = false;
            slot.opaque = false;
            slot.generation += 1;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_rendered(&self, clue: usize) -> bool {
        self.slots.get(clue).is_some_and(|slot| slot.rendered)
    }

    pub fn is_opaque(&self, clue: usize) -> bool {
        self.slots.get(clue).is_some_and(|slot| slot.opaque)
    }

    pub fn rendered(&self) -> Vec<bool> {
        self.slots.iter().map(|slot| slot.rendered).collect()
    }

    pub fn opacity(&self) -> Vec<bool> {
        self.slots.iter().map(|slot| slot.opaque).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintPart {
    Alphabet,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedHint {
    pub alphabet_part: String,
    pub number_part: String,
    pub emphasis: Option<HintPart>,
}

impl HighlightedHint {
    /// Plain display form, `"= A , O"`
    pub fn text(&self) -> String {
        format!("= {} , {}", self.alphabet_part, self.number_part)
    }
}

/// Nothing is emphasized until the clue is solved. After that the part
/// matching the clue's rule is; length-rule clues emphasize neither.
pub fn highlight_hint(hint_text: &str, rule: Option<RuleKind>, solved: bool) -> HighlightedHint {
    let (alphabet_part, number_part) = parse_hint_text(hint_text);

    let emphasis = match (solved, rule) {
        (true, Some(RuleKind::AlphabetRule)) => Some(HintPart::Alphabet),
        (true, Some(RuleKind::NumberRule)) => Some(HintPart::Number),
        _ => None,
    };

    HighlightedHint {
        alphabet_part,
        number_part,
        emphasis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(date: &str, numbers: &[u8]) -> PuzzleIdentity {
        PuzzleIdentity {
            date: date.to_string(),
            numbers: numbers.to_vec(),
        }
    }

    #[test]
    fn test_open_then_fade_in() {
        let mut hints = HintVisibility::new(3);

        let phase = hints.toggle(1).unwrap();
        assert!(hints.is_rendered(1));
        assert!(!hints.is_opaque(1));

        assert!(hints.apply(phase));
        assert!(hints.is_opaque(1));
        assert_eq!(hints.rendered(), vec![false, true, false]);
    }

    #[test]
    fn test_close_then_unrender() {
        let mut hints = HintVisibility::new(3);
        let open = hints.toggle(0).unwrap();
        hints.apply(open);

        let close = hints.toggle(0).unwrap();
        assert!(matches!(close, HintPhase::Unrender { clue: 0, .. }));
        assert!(!hints.is_opaque(0));
        assert!(hints.is_rendered(0));

        hints.apply(close);
        assert!(!hints.is_rendered(0));
    }

    #[test]
    fn test_retoggle_before_delay_drops_stale_phase() {
        let mut hints = HintVisibility::new(3);
        let open = hints.toggle(2).unwrap();
        hints.apply(open);

        let close = hints.toggle(2).unwrap();
        // A second toggle before the delay supersedes the first
        let _ = hints.toggle(2);
        assert!(!hints.apply(close));
        assert!(hints.is_rendered(2));
    }

    #[test]
    fn test_identity_change_resets() {
        let mut hints = HintVisibility::new(3);
        assert!(hints.sync_identity(&identity("2025-12-07", &[8, 6, 6])));
        let phase = hints.toggle(0).unwrap();
        hints.apply(phase);

        assert!(!hints.sync_identity(&identity("2025-12-07", &[8, 6, 6])));
        assert!(hints.is_opaque(0));

        assert!(hints.sync_identity(&identity("2025-12-07", &[8, 6, 5])));
        assert_eq!(hints.rendered(), vec![false; 3]);
        assert_eq!(hints.opacity(), vec![false; 3]);
    }

    #[test]
    fn test_disabling_hides_and_blocks_toggles() {
        let mut hints = HintVisibility::new(3);
        let pending = hints.toggle(0).unwrap();

        hints.set_enabled(false);
        assert!(!hints.is_rendered(0));
        assert!(!hints.apply(pending));
        assert!(hints.toggle(0).is_none());

        hints.set_enabled(true);
        assert!(hints.toggle(0).is_some());
        assert!(hints.toggle(7).is_none());
    }

    #[test]
    fn test_unsolved_hint_is_plain() {
        let hint = highlight_hint("= E , F", Some(RuleKind::AlphabetRule), false);
        assert_eq!(hint.emphasis, None);
        assert_eq!(hint.text(), "= E , F");
    }

    #[test]
    fn test_solved_hint_emphasis_follows_rule() {
        assert_eq!(
            highlight_hint("= E , F", Some(RuleKind::AlphabetRule), true).emphasis,
            Some(HintPart::Alphabet)
        );
        assert_eq!(
            highlight_hint("= E , F", Some(RuleKind::NumberRule), true).emphasis,
            Some(HintPart::Number)
        );
        assert_eq!(
            highlight_hint("= E , F", Some(RuleKind::LengthRule), true).emphasis,
            None
        );
        assert_eq!(highlight_hint("= E , F", None, true).emphasis, None);
    }
}
