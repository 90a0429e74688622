use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Envelope;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FootTrafficData {
    pub market_code: String,
    pub foot_traffic_change: f64,
    pub trend: String,
    pub period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardSalesData {
    pub market_code: String,
    pub sales_trend: f64,
    pub growth_rate: f64,
    pub period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SameIndustryData {
    pub market_code: String,
    pub same_industry_count: i64,
    pub density: f64,
    pub competition_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BusinessRatesData {
    pub market_code: String,
    pub startup_rate: f64,
    pub closure_rate: f64,
    pub net_growth: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DwellTimeData {
    pub market_code: String,
    pub average_dwell_time: f64,
    pub trend: String,
    pub period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthScoreData {
    pub market_code: String,
    pub health_score: f64,
    #[serde(default)]
    pub factors: BTreeMap<String, f64>,
    #[serde(default)]
    pub recommendation: String,
}

pub type FootTrafficResponse = Envelope<FootTrafficData>;
pub type CardSalesResponse = Envelope<CardSalesData>;
pub type SameIndustryResponse = Envelope<SameIndustryData>;
pub type BusinessRatesResponse = Envelope<BusinessRatesData>;
pub type DwellTimeResponse = Envelope<DwellTimeData>;
pub type HealthScoreResponse = Envelope<HealthScoreData>;

/// Body of `POST /core-diagnosis/health-score/{market_code}`. An absent
/// industry serializes as `{}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthScoreRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

/// Body of `POST /core-diagnosis/comprehensive/{market_code}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComprehensiveDiagnosisRequest {
    pub market_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// The comprehensive diagnosis is the one feature answered without an
/// envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComprehensiveDiagnosisResponse {
    pub market_code: String,
    pub overall_score: f64,
    #[serde(default)]
    pub indicators: BTreeMap<String, f64>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl ComprehensiveDiagnosisResponse {
    /// Overall score clamped to 0..=100 and scaled to 0.0..=1.0 for gauges.
    pub fn normalized_score(&self) -> f64 {
        if self.overall_score.is_nan() {
            return 0.0;
        }
        self.overall_score.clamp(0.0, 100.0) / 100.0
    }
}
