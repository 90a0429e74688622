use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Envelope;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskClassificationData {
    pub market_code: String,
    pub risk_type: String,
    pub risk_level: String,
    pub confidence: f64,
    #[serde(default)]
    pub factors: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskType {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub mitigation_strategies: Vec<String>,
}

pub type RiskClassificationResponse = Envelope<RiskClassificationData>;
pub type RiskTypesResponse = Envelope<Vec<RiskType>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_types_default_missing_strategies() {
        let r: RiskTypesResponse = serde_json::from_str(
            r#"{"data":[{"id":"low_inflow","name":"유입 저조형","description":"유동인구 부족"}]}"#,
        )
        .unwrap();
        let types = r.data.unwrap();
        assert_eq!(types.len(), 1);
        assert!(types[0].mitigation_strategies.is_empty());
    }

    #[test]
    fn classification_requires_risk_level() {
        let result: Result<RiskClassificationResponse, _> = serde_json::from_str(
            r#"{"data":{"market_code":"10438","risk_type":"과포화 경쟁형","confidence":0.8}}"#,
        );
        assert!(result.is_err());
    }
}
