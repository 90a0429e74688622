use serde::{Deserialize, Serialize};

use super::Envelope;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupportCenter {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub services: Vec<String>,
    pub operating_hours: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Expert {
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub experience: String,
    pub availability: String,
    pub contact: String,
}

pub type SupportCentersResponse = Envelope<Vec<SupportCenter>>;
pub type ExpertConsultationResponse = Envelope<Vec<Expert>>;

/// Body of `POST /support-tools/consultation-booking`. The server rejects
/// the booking when any of these fields is missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsultationBookingRequest {
    pub expert_id: String,
    pub consultation_type: String,
    pub preferred_date: String,
    pub preferred_time: String,
    pub user_info: serde_json::Value,
}

/// Body of `POST /support-tools/policy-application`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyApplicationRequest {
    pub policy_id: String,
    pub user_info: serde_json::Value,
    pub business_info: serde_json::Value,
    pub required_documents: Vec<String>,
}
