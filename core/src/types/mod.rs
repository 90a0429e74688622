//! Domain DTOs for the Sodam API.
//!
//! # Design
//! These types mirror the server's JSON (snake_case keys) but are defined
//! independently of the mock-server crate; integration tests catch schema
//! drift. Most endpoints wrap their payload in `{data, message}`, modelled
//! once as `Envelope<T>` with a type alias per feature. Collections default
//! to empty so partial server responses still decode.

mod auth;
mod diagnosis;
mod map;
mod risk;
mod strategy;
mod support;

use serde::{Deserialize, Serialize};

pub use auth::{AuthResponse, LoginRequest, RegisterRequest, User, REGISTERED_MESSAGES};
pub use diagnosis::{
    BusinessRatesData, BusinessRatesResponse, CardSalesData, CardSalesResponse,
    ComprehensiveDiagnosisRequest, ComprehensiveDiagnosisResponse, DwellTimeData,
    DwellTimeResponse, FootTrafficData, FootTrafficResponse, HealthScoreData,
    HealthScoreRequest, HealthScoreResponse, SameIndustryData, SameIndustryResponse,
};
pub use map::{
    MapAnalysisTypesResponse, MapCoordinate, MapHeatmapData, MapHeatmapResponse,
    RadiusAnalysisRequest, RadiusAnalysisType,
};
pub use risk::{RiskClassificationData, RiskClassificationResponse, RiskType, RiskTypesResponse};
pub use strategy::{StrategyCard, StrategyCardsResponse, SuccessCase, SuccessCasesResponse};
pub use support::{
    ConsultationBookingRequest, Expert, ExpertConsultationResponse, PolicyApplicationRequest,
    SupportCenter, SupportCentersResponse,
};

/// The `{data, message}` wrapper most endpoints answer with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
        }
    }

    /// Payload, or `None` when the server sent only a message.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Response for endpoints whose payload shape the client does not pin down.
pub type GenericResponse = Envelope<serde_json::Value>;
