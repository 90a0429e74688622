//! Domain operations over a `Transport`.
//!
//! Each method is one pass-through: build the request, execute it, decode
//! the response as the operation's type. No caching, batching or retries.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::SodamClient;
#[cfg(feature = "blocking")]
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::transport::Transport;
#[cfg(feature = "blocking")]
use crate::transport::UreqTransport;
use crate::types::{
    AuthResponse, BusinessRatesResponse, CardSalesResponse, ComprehensiveDiagnosisResponse,
    ConsultationBookingRequest, DwellTimeResponse, ExpertConsultationResponse,
    FootTrafficResponse, GenericResponse, HealthScoreResponse, LoginRequest,
    MapAnalysisTypesResponse, MapHeatmapResponse, PolicyApplicationRequest,
    RadiusAnalysisRequest, RegisterRequest, RiskClassificationResponse, RiskTypesResponse,
    SameIndustryResponse, StrategyCardsResponse, SuccessCasesResponse, SupportCentersResponse,
};

/// `SodamClient` paired with a transport that executes its requests.
#[derive(Clone)]
pub struct SodamApi<T> {
    client: SodamClient,
    transport: T,
}

impl<T: Transport> SodamApi<T> {
    pub fn new(client: SodamClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &SodamClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute `request` and decode the answer as `R`.
    pub fn call<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ApiError> {
        let response = self.transport.execute(&request)?;
        debug!(url = %request.path, status = response.status, "call finished");
        self.client.parse(response)
    }

    // -- auth ---------------------------------------------------------------

    /// Raw login round-trip. `SessionStore::login` adds validation and the
    /// session transition on top.
    pub fn login(&self, input: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.call(self.client.build_login(input)?)
    }

    pub fn register(&self, input: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.call(self.client.build_register(input)?)
    }

    // -- core diagnosis -----------------------------------------------------

    pub fn foot_traffic(&self, market_code: &str) -> Result<FootTrafficResponse, ApiError> {
        self.call(self.client.build_foot_traffic(market_code)?)
    }

    pub fn card_sales(&self, market_code: &str) -> Result<CardSalesResponse, ApiError> {
        self.call(self.client.build_card_sales(market_code)?)
    }

    pub fn same_industry(&self, market_code: &str) -> Result<SameIndustryResponse, ApiError> {
        self.call(self.client.build_same_industry(market_code)?)
    }

    pub fn business_rates(&self, market_code: &str) -> Result<BusinessRatesResponse, ApiError> {
        self.call(self.client.build_business_rates(market_code)?)
    }

    pub fn dwell_time(&self, market_code: &str) -> Result<DwellTimeResponse, ApiError> {
        self.call(self.client.build_dwell_time(market_code)?)
    }

    pub fn health_score(
        &self,
        market_code: &str,
        industry: Option<&str>,
    ) -> Result<HealthScoreResponse, ApiError> {
        self.call(self.client.build_health_score(market_code, industry)?)
    }

    pub fn comprehensive_diagnosis(
        &self,
        market_code: &str,
        category: Option<&str>,
    ) -> Result<ComprehensiveDiagnosisResponse, ApiError> {
        self.call(self.client.build_comprehensive_diagnosis(market_code, category)?)
    }

    // -- risk classification ------------------------------------------------

    pub fn classify_risk(&self, market_code: &str) -> Result<RiskClassificationResponse, ApiError> {
        self.call(self.client.build_classify_risk(market_code)?)
    }

    pub fn risk_detailed_analysis(
        &self,
        market_code: &str,
        risk_type: Option<&str>,
        industry: Option<&str>,
    ) -> Result<GenericResponse, ApiError> {
        self.call(
            self.client
                .build_risk_detailed_analysis(market_code, risk_type, industry)?,
        )
    }

    pub fn risk_types(&self) -> Result<RiskTypesResponse, ApiError> {
        self.call(self.client.build_risk_types()?)
    }

    pub fn mitigation_strategies(&self) -> Result<GenericResponse, ApiError> {
        self.call(self.client.build_mitigation_strategies()?)
    }

    // -- strategy cards -----------------------------------------------------

    pub fn generate_strategy_cards(&self) -> Result<StrategyCardsResponse, ApiError> {
        self.call(self.client.build_generate_strategy_cards()?)
    }

    pub fn strategy_checklist(&self, strategy_id: &str) -> Result<GenericResponse, ApiError> {
        self.call(self.client.build_strategy_checklist(strategy_id)?)
    }

    pub fn strategy_success_cases(&self) -> Result<SuccessCasesResponse, ApiError> {
        self.call(self.client.build_strategy_success_cases()?)
    }

    pub fn strategy_templates(&self) -> Result<GenericResponse, ApiError> {
        self.call(self.client.build_strategy_templates()?)
    }

    pub fn strategy_categories(&self) -> Result<GenericResponse, ApiError> {
        self.call(self.client.build_strategy_categories()?)
    }

    // -- support tools ------------------------------------------------------

    pub fn support_centers(&self) -> Result<SupportCentersResponse, ApiError> {
        self.call(self.client.build_support_centers()?)
    }

    pub fn expert_consultation(&self) -> Result<ExpertConsultationResponse, ApiError> {
        self.call(self.client.build_expert_consultation()?)
    }

    pub fn policy_recommendations(
        &self,
        profile: &serde_json::Value,
    ) -> Result<GenericResponse, ApiError> {
        self.call(self.client.build_policy_recommendations(profile)?)
    }

    pub fn support_success_cases(&self) -> Result<GenericResponse, ApiError> {
        self.call(self.client.build_support_success_cases()?)
    }

    pub fn book_consultation(
        &self,
        input: &ConsultationBookingRequest,
    ) -> Result<GenericResponse, ApiError> {
        self.call(self.client.build_book_consultation(input)?)
    }

    pub fn apply_policy(&self, input: &PolicyApplicationRequest) -> Result<GenericResponse, ApiError> {
        self.call(self.client.build_apply_policy(input)?)
    }

    // -- map visualization --------------------------------------------------

    pub fn map_heatmap(&self) -> Result<MapHeatmapResponse, ApiError> {
        self.call(self.client.build_map_heatmap()?)
    }

    pub fn map_radius_analysis(
        &self,
        input: &RadiusAnalysisRequest,
    ) -> Result<GenericResponse, ApiError> {
        self.call(self.client.build_map_radius_analysis(input)?)
    }

    pub fn map_cluster_analysis(&self) -> Result<GenericResponse, ApiError> {
        self.call(self.client.build_map_cluster_analysis()?)
    }

    pub fn map_traffic_flow(&self, market_code: &str) -> Result<GenericResponse, ApiError> {
        self.call(self.client.build_map_traffic_flow(market_code)?)
    }

    pub fn map_accessibility(&self, market_code: &str) -> Result<GenericResponse, ApiError> {
        self.call(self.client.build_map_accessibility(market_code)?)
    }

    pub fn map_analysis_types(&self) -> Result<MapAnalysisTypesResponse, ApiError> {
        self.call(self.client.build_map_analysis_types()?)
    }
}

#[cfg(feature = "blocking")]
impl SodamApi<UreqTransport> {
    /// Client and blocking transport from `ClientConfig::load()`.
    pub fn from_env() -> Result<Self, ApiError> {
        let config = ClientConfig::load().map_err(|e| ApiError::InvalidTarget(e.to_string()))?;
        Self::with_ureq(&config)
    }

    pub fn with_ureq(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::new(SodamClient::from_config(config)?, UreqTransport::new()))
    }
}
