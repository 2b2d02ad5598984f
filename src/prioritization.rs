use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reach x Impact x Confidence / Effort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiceScore {
    pub reach: f64,
    pub impact: f64,
    /// Confidence in percent, 0..=100.
    pub confidence: f64,
    pub effort: f64,
    pub score: f64,
}

impl RiceScore {
    /// `None` when effort is not positive, confidence is above 100, or any
    /// input is negative or not finite.
    pub fn compute(reach: f64, impact: f64, confidence: f64, effort: f64) -> Option<Self> {
        let inputs = [reach, impact, confidence, effort];
        if inputs.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return None;
        }
        if effort <= 0.0 || confidence > 100.0 {
            return None;
        }
        Some(Self {
            reach,
            impact,
            confidence,
            effort,
            score: reach * impact * (confidence / 100.0) / effort,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoscowCategory {
    Must,
    Should,
    Could,
    Wont,
}

impl MoscowCategory {
    pub const ALL: [MoscowCategory; 4] = [
        MoscowCategory::Must,
        MoscowCategory::Should,
        MoscowCategory::Could,
        MoscowCategory::Wont,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoscowCategory::Must => "must",
            MoscowCategory::Should => "should",
            MoscowCategory::Could => "could",
            MoscowCategory::Wont => "wont",
        }
    }
}

impl fmt::Display for MoscowCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoscowCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "must" | "must_have" => Ok(MoscowCategory::Must),
            "should" | "should_have" => Ok(MoscowCategory::Should),
            "could" | "could_have" => Ok(MoscowCategory::Could),
            "wont" | "won't" | "wont_have" => Ok(MoscowCategory::Wont),
            other => Err(format!("unknown MoSCoW category '{other}'")),
        }
    }
}

/// Split `entries` into the four MoSCoW quadrants, always in Must, Should,
/// Could, Won't order. Entries without a category are dropped.
pub fn group_by_moscow<T, F>(entries: Vec<T>, category_of: F) -> Vec<(MoscowCategory, Vec<T>)>
where
    F: Fn(&T) -> Option<MoscowCategory>,
{
    let mut groups: Vec<(MoscowCategory, Vec<T>)> = MoscowCategory::ALL
        .iter()
        .map(|category| (*category, Vec::new()))
        .collect();
    for entry in entries {
        if let Some(category) = category_of(&entry) {
            if let Some((_, bucket)) = groups.iter_mut().find(|(c, _)| *c == category) {
                bucket.push(entry);
            }
        }
    }
    groups
}
