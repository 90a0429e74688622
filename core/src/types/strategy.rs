use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Envelope;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StrategyCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub estimated_impact: String,
    #[serde(default)]
    pub implementation_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuccessCase {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub industry: String,
    #[serde(default)]
    pub results: BTreeMap<String, f64>,
    #[serde(default)]
    pub lessons_learned: Vec<String>,
}

pub type StrategyCardsResponse = Envelope<Vec<StrategyCard>>;
pub type SuccessCasesResponse = Envelope<Vec<SuccessCase>>;
