// Accessibility standard value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Standard {
    WCAG2A,
    #[default]
    WCAG2AA,
    WCAG2AAA,
}

impl Standard {
    pub const ALL: [Standard; 3] = [Standard::WCAG2A, Standard::WCAG2AA, Standard::WCAG2AAA];

    pub fn as_str(&self) -> &'static str {
        match self {
            Standard::WCAG2A => "WCAG2A",
            Standard::WCAG2AA => "WCAG2AA",
            Standard::WCAG2AAA => "WCAG2AAA",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "WCAG2A" => Some(Standard::WCAG2A),
            "WCAG2AA" => Some(Standard::WCAG2AA),
            "WCAG2AAA" => Some(Standard::WCAG2AAA),
            _ => None,
        }
    }
}
