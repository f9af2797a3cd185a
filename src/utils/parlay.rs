use crate::models::ParlayLeg;
use serde::Serialize;

/// The active bet slip. Leg ids are unique; insertion order is display order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParlaySlip {
    legs: Vec<ParlayLeg>,
}

/// Derived totals shown next to the slip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlipSummary {
    pub legs: Vec<ParlayLeg>,
    pub combined_odds: String,
    pub combined_confidence: u8,
}

impl ParlaySlip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a leg. Returns false (and leaves the slip alone) if the id is already present
    /// or the combined odds would no longer be a finite number.
    pub fn add_leg(&mut self, leg: ParlayLeg) -> bool {
        if self.contains(leg.id()) || !(self.combined_odds() * leg.odds()).is_finite() {
            return false;
        }
        self.legs.push(leg);
        true
    }

    /// Remove by id. Returns false if no leg had that id.
    pub fn remove_leg(&mut self, id: &str) -> bool {
        let before = self.legs.len();
        self.legs.retain(|leg| leg.id() != id);
        self.legs.len() != before
    }

    pub fn clear(&mut self) {
        self.legs.clear();
    }

    /// Replace the whole slip, dropping later duplicates of an id
    pub fn replace(&mut self, legs: impl IntoIterator<Item = ParlayLeg>) {
        self.legs.clear();
        for leg in legs {
            self.add_leg(leg);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.legs.iter().any(|leg| leg.id() == id)
    }

    pub fn legs(&self) -> &[ParlayLeg] {
        &self.legs
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Product of every leg's decimal odds; 1.0 for an empty slip
    pub fn combined_odds(&self) -> f64 {
        combined_odds(&self.legs)
    }

    /// Mean leg confidence rounded to a whole percentage; 0 for an empty slip
    pub fn combined_confidence(&self) -> u8 {
        combined_confidence(&self.legs)
    }

    pub fn summary(&self) -> SlipSummary {
        SlipSummary {
            legs: self.legs.clone(),
            combined_odds: format_odds(self.combined_odds()),
            combined_confidence: self.combined_confidence(),
        }
    }
}

pub fn combined_odds(legs: &[ParlayLeg]) -> f64 {
    legs.iter().map(ParlayLeg::odds).product()
}

pub fn combined_confidence(legs: &[ParlayLeg]) -> u8 {
    if legs.is_empty() {
        return 0;
    }
    let total: f64 = legs.iter().map(ParlayLeg::confidence).sum();
    let mean = total / legs.len() as f64;
    mean.round().clamp(0.0, 100.0) as u8
}

/// Decimal odds to two places, the way the slip displays them
pub fn format_odds(odds: f64) -> String {
    format!("{:.2}", odds)
}
