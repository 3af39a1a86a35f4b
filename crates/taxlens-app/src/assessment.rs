// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::estimate::round_half_up;
use crate::model::PropertyData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxSituation {
    #[serde(rename = "significant")]
    Significant,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "small")]
    Small,
    #[serde(rename = "exploring")]
    Exploring,
}

impl TaxSituation {
    pub const ALL: [Self; 4] = [
        Self::Significant,
        Self::Moderate,
        Self::Small,
        Self::Exploring,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Significant => "significant",
            Self::Moderate => "moderate",
            Self::Small => "small",
            Self::Exploring => "exploring",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "significant" => Some(Self::Significant),
            "moderate" => Some(Self::Moderate),
            "small" => Some(Self::Small),
            "exploring" => Some(Self::Exploring),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Significant => "Significant tax increase (20%+ this year)",
            Self::Moderate => "Moderate tax increase (10-20% this year)",
            Self::Small => "Small tax increase (5-10% this year)",
            Self::Exploring => "No significant increase, just exploring options",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PropertyUse {
    #[default]
    #[serde(rename = "primary")]
    Primary,
    #[serde(rename = "investment")]
    Investment,
    #[serde(rename = "commercial")]
    Commercial,
    #[serde(rename = "vacation")]
    Vacation,
    #[serde(rename = "rental")]
    Rental,
    #[serde(rename = "other")]
    Other,
}

impl PropertyUse {
    pub const ALL: [Self; 6] = [
        Self::Primary,
        Self::Investment,
        Self::Commercial,
        Self::Vacation,
        Self::Rental,
        Self::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Investment => "investment",
            Self::Commercial => "commercial",
            Self::Vacation => "vacation",
            Self::Rental => "rental",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.as_str() == value)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Primary => "Primary Residence",
            Self::Investment => "Investment Property",
            Self::Commercial => "Commercial Property",
            Self::Vacation => "Vacation Home",
            Self::Rental => "Rental Property",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OwnershipLength {
    #[serde(rename = "under1")]
    UnderOneYear,
    #[default]
    #[serde(rename = "1-3")]
    OneToThreeYears,
    #[serde(rename = "4-7")]
    FourToSevenYears,
    #[serde(rename = "8-15")]
    EightToFifteenYears,
    #[serde(rename = "16-25")]
    SixteenToTwentyFiveYears,
    #[serde(rename = "over25")]
    OverTwentyFiveYears,
}

impl OwnershipLength {
    pub const ALL: [Self; 6] = [
        Self::UnderOneYear,
        Self::OneToThreeYears,
        Self::FourToSevenYears,
        Self::EightToFifteenYears,
        Self::SixteenToTwentyFiveYears,
        Self::OverTwentyFiveYears,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnderOneYear => "under1",
            Self::OneToThreeYears => "1-3",
            Self::FourToSevenYears => "4-7",
            Self::EightToFifteenYears => "8-15",
            Self::SixteenToTwentyFiveYears => "16-25",
            Self::OverTwentyFiveYears => "over25",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.as_str() == value)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UnderOneYear => "Less than 1 year",
            Self::OneToThreeYears => "1-3 years",
            Self::FourToSevenYears => "4-7 years",
            Self::EightToFifteenYears => "8-15 years",
            Self::SixteenToTwentyFiveYears => "16-25 years",
            Self::OverTwentyFiveYears => "More than 25 years",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecentChanges {
    #[serde(rename = "major")]
    Major,
    #[serde(rename = "minor")]
    Minor,
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "damage")]
    Damage,
}

impl RecentChanges {
    pub const ALL: [Self; 4] = [Self::Major, Self::Minor, Self::None, Self::Damage];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::None => "none",
            Self::Damage => "damage",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.as_str() == value)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Major => "Major renovations or additions",
            Self::Minor => "Minor improvements only",
            Self::None => "No recent changes",
            Self::Damage => "Property damage or issues",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentAnswers {
    pub tax_situation: TaxSituation,
    pub property_use: PropertyUse,
    pub ownership_length: OwnershipLength,
    pub recent_changes: RecentChanges,
}

impl AssessmentAnswers {
    pub fn new(tax_situation: TaxSituation) -> Self {
        Self {
            tax_situation,
            property_use: PropertyUse::default(),
            ownership_length: OwnershipLength::default(),
            recent_changes: RecentChanges::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppealPotential {
    High,
    Medium,
    Low,
}

impl AppealPotential {
    pub const fn for_situation(situation: TaxSituation) -> Self {
        match situation {
            TaxSituation::Significant => Self::High,
            TaxSituation::Moderate => Self::Medium,
            TaxSituation::Small | TaxSituation::Exploring => Self::Low,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Share of the current tax bill an appeal is expected to recover.
    pub const fn reduction_rate(self) -> f64 {
        match self {
            Self::High => 0.35,
            Self::Medium => 0.25,
            Self::Low => 0.15,
        }
    }

    pub const fn summary(self) -> &'static str {
        match self {
            Self::High => {
                "Strong indicators for a successful appeal: the significant tax increase and market comparison point the same way."
            }
            Self::Medium => {
                "Good potential for tax savings: the moderate increase gives solid grounds for an appeal."
            }
            Self::Low => {
                "The increase is modest, but a professional review may still find savings."
            }
        }
    }
}

pub fn estimated_savings(data: &PropertyData, answers: &AssessmentAnswers) -> i64 {
    let rate = AppealPotential::for_situation(answers.tax_situation).reduction_rate();
    round_half_up(data.current_tax as f64 * rate) as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealResult {
    pub potential: AppealPotential,
    pub reduction_rate: f64,
    pub estimated_savings: i64,
    pub answers: AssessmentAnswers,
}

impl AppealResult {
    pub fn evaluate(data: &PropertyData, answers: &AssessmentAnswers) -> Self {
        let potential = AppealPotential::for_situation(answers.tax_situation);
        Self {
            potential,
            reduction_rate: potential.reduction_rate(),
            estimated_savings: estimated_savings(data, answers),
            answers: *answers,
        }
    }
}
