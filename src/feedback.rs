//! Haptic feedback decisions
//!
//! The engine decides *which* pulses a toggle deserves; the mobile shell
//! owns the actuator and implements [`HapticSink`]. Keeping the decision
//! here means the milestone rule lives next to the streak math instead of
//! being duplicated in every UI layer.

use crate::types::CompletionTransition;

/// Kinds of haptic pulse the shell can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPulse {
    /// Light confirmation when a habit flips to complete
    Success,
    /// Heavier pulse when the new streak is a positive multiple of 7
    Milestone,
}

/// Platform-specific haptic adapters implement this trait.
pub trait HapticSink {
    fn pulse(&self, pulse: HapticPulse);
}

/// Pulses owed for a single completion transition.
///
/// Un-completing a day, or a no-op toggle, earns nothing. Entering
/// completion earns `Success`, plus `Milestone` on a weekly streak.
pub fn pulses_for(transition: &CompletionTransition) -> Vec<HapticPulse> {
    let mut pulses = Vec::new();
    if transition.entered_completion() {
        pulses.push(HapticPulse::Success);
        if transition.is_streak_milestone() {
            pulses.push(HapticPulse::Milestone);
        }
    }
    pulses
}

/// Emit every pulse owed for `transition` into the sink.
pub fn drive(sink: &dyn HapticSink, transition: &CompletionTransition) {
    for pulse in pulses_for(transition) {
        sink.pulse(pulse);
    }
}
