//! Stateless HTTP request builder and response parser for the Sodam API.
//!
//! # Design
//! `SodamClient` holds only the base URL and the User-Agent, and carries no
//! mutable state between calls. Each operation has a `build_*` method that
//! produces an `HttpRequest`; every response goes through the one generic
//! `parse::<R>()`, where the call site names the shape it expects. The
//! caller executes the HTTP round-trip in between, keeping the core
//! deterministic and free of I/O.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, APPLICATION_JSON, CONTENT_TYPE, USER_AGENT};
use crate::types::{
    ComprehensiveDiagnosisRequest, ConsultationBookingRequest, HealthScoreRequest, LoginRequest,
    PolicyApplicationRequest, RadiusAnalysisRequest, RegisterRequest,
};

/// User-Agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "SodamProject/1.0";

/// Synchronous, stateless client for the Sodam API.
#[derive(Debug, Clone)]
pub struct SodamClient {
    base_url: Url,
    user_agent: String,
}

impl SodamClient {
    /// Fails with `InvalidTarget` when `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ApiError::InvalidTarget(format!("{base_url}: {e}")))?;
        Ok(Self {
            base_url,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::new(&config.base_url)?.with_user_agent(config.user_agent.clone()))
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Build a request without a body.
    pub fn build(&self, endpoint: Endpoint, param: Option<&str>) -> Result<HttpRequest, ApiError> {
        self.request(endpoint, param, None)
    }

    /// Build a request whose body is `body` serialized as JSON.
    pub fn build_with_body<B: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        param: Option<&str>,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.request(endpoint, param, Some(body))
    }

    fn request(
        &self,
        endpoint: Endpoint,
        param: Option<&str>,
        body: Option<String>,
    ) -> Result<HttpRequest, ApiError> {
        let url = endpoint.url(&self.base_url, param)?;
        debug!(
            operation = endpoint.name(),
            method = endpoint.method().as_str(),
            url = %url,
            has_body = body.is_some(),
            "built request"
        );
        Ok(HttpRequest {
            method: endpoint.method(),
            path: url.into(),
            headers: vec![
                (CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()),
                (USER_AGENT.to_string(), self.user_agent.clone()),
            ],
            body,
        })
    }

    // -- auth ---------------------------------------------------------------

    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest, ApiError> {
        self.build_with_body(Endpoint::AuthLogin, None, input)
    }

    pub fn build_register(&self, input: &RegisterRequest) -> Result<HttpRequest, ApiError> {
        self.build_with_body(Endpoint::AuthRegister, None, input)
    }

    // -- core diagnosis -----------------------------------------------------

    pub fn build_foot_traffic(&self, market_code: &str) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::FootTraffic, Some(market_code))
    }

    pub fn build_card_sales(&self, market_code: &str) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::CardSales, Some(market_code))
    }

    pub fn build_same_industry(&self, market_code: &str) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::SameIndustry, Some(market_code))
    }

    pub fn build_business_rates(&self, market_code: &str) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::BusinessRates, Some(market_code))
    }

    pub fn build_dwell_time(&self, market_code: &str) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::DwellTime, Some(market_code))
    }

    /// A blank industry is left out of the body.
    pub fn build_health_score(
        &self,
        market_code: &str,
        industry: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let body = HealthScoreRequest {
            industry: non_blank(industry),
        };
        self.build_with_body(Endpoint::HealthScore, Some(market_code), &body)
    }

    /// A blank category is left out of the body. The market code is
    /// trimmed once, so path and body carry the same value.
    pub fn build_comprehensive_diagnosis(
        &self,
        market_code: &str,
        category: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let market_code = market_code.trim();
        let body = ComprehensiveDiagnosisRequest {
            market_code: market_code.to_string(),
            category: non_blank(category),
        };
        self.build_with_body(Endpoint::ComprehensiveDiagnosis, Some(market_code), &body)
    }

    // -- risk classification ------------------------------------------------

    pub fn build_classify_risk(&self, market_code: &str) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::RiskClassify, Some(market_code))
    }

    pub fn build_risk_detailed_analysis(
        &self,
        market_code: &str,
        risk_type: Option<&str>,
        industry: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let mut body = serde_json::Map::new();
        if let Some(risk_type) = non_blank(risk_type) {
            body.insert("risk_type".to_string(), risk_type.into());
        }
        if let Some(industry) = non_blank(industry) {
            body.insert("industry".to_string(), industry.into());
        }
        self.build_with_body(Endpoint::RiskDetailedAnalysis, Some(market_code), &body)
    }

    pub fn build_risk_types(&self) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::RiskTypes, None)
    }

    pub fn build_mitigation_strategies(&self) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::MitigationStrategies, None)
    }

    // -- strategy cards -----------------------------------------------------

    pub fn build_generate_strategy_cards(&self) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::StrategyCardsGenerate, None)
    }

    pub fn build_strategy_checklist(&self, strategy_id: &str) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::StrategyCardsChecklist, Some(strategy_id))
    }

    pub fn build_strategy_success_cases(&self) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::StrategyCardsSuccessCases, None)
    }

    pub fn build_strategy_templates(&self) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::StrategyCardsTemplates, None)
    }

    pub fn build_strategy_categories(&self) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::StrategyCardsCategories, None)
    }

    // -- support tools ------------------------------------------------------

    pub fn build_support_centers(&self) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::SupportCenters, None)
    }

    pub fn build_expert_consultation(&self) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::ExpertConsultation, None)
    }

    pub fn build_policy_recommendations(
        &self,
        profile: &serde_json::Value,
    ) -> Result<HttpRequest, ApiError> {
        self.build_with_body(Endpoint::PolicyRecommendations, None, profile)
    }

    pub fn build_support_success_cases(&self) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::SupportSuccessCases, None)
    }

    pub fn build_book_consultation(
        &self,
        input: &ConsultationBookingRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.build_with_body(Endpoint::ConsultationBooking, None, input)
    }

    pub fn build_apply_policy(
        &self,
        input: &PolicyApplicationRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.build_with_body(Endpoint::PolicyApplication, None, input)
    }

    // -- map visualization --------------------------------------------------

    pub fn build_map_heatmap(&self) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::MapHeatmap, None)
    }

    pub fn build_map_radius_analysis(
        &self,
        input: &RadiusAnalysisRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.build_with_body(Endpoint::MapRadiusAnalysis, None, input)
    }

    pub fn build_map_cluster_analysis(&self) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::MapClusterAnalysis, None)
    }

    pub fn build_map_traffic_flow(&self, market_code: &str) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::MapTrafficFlow, Some(market_code))
    }

    pub fn build_map_accessibility(&self, market_code: &str) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::MapAccessibility, Some(market_code))
    }

    pub fn build_map_analysis_types(&self) -> Result<HttpRequest, ApiError> {
        self.build(Endpoint::MapAnalysisTypes, None)
    }

    // -- responses ----------------------------------------------------------

    /// Check the status, then decode the body as `R`.
    ///
    /// Non-2xx responses become `ApiError::Http` without a decode attempt.
    pub fn parse<R: DeserializeOwned>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| {
            debug!(status = response.status, error = %e, "response body did not decode");
            ApiError::Deserialization(e.to_string())
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Map statuses outside 200..=299 to `ApiError::Http`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    debug!(status = response.status, "non-success status");
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::types::{AuthResponse, ComprehensiveDiagnosisResponse, RiskTypesResponse};

    fn client() -> SodamClient {
        SodamClient::new("http://localhost:5001").unwrap()
    }

    fn body_json(req: &HttpRequest) -> serde_json::Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn invalid_base_url_is_invalid_target() {
        let err = SodamClient::new("not a url").unwrap_err();
        assert!(matches!(err, ApiError::InvalidTarget(_)));
    }

    #[test]
    fn every_request_carries_json_and_user_agent_headers() {
        let req = client().build_risk_types().unwrap();
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("user-agent"), Some(DEFAULT_USER_AGENT));
        assert!(req.body.is_none());
    }

    #[test]
    fn user_agent_is_configurable() {
        let req = client()
            .with_user_agent("SodamTest/2.0")
            .build_map_heatmap()
            .unwrap();
        assert_eq!(req.header("user-agent"), Some("SodamTest/2.0"));
    }

    #[test]
    fn build_login_posts_credentials() {
        let req = client()
            .build_login(&LoginRequest {
                username: "daejeon_user".to_string(),
                password: "password123!".to_string(),
            })
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:5001/api/v1/sodam/auth/login");
        let body = body_json(&req);
        assert_eq!(body["username"], "daejeon_user");
        assert_eq!(body["password"], "password123!");
    }

    #[test]
    fn build_foot_traffic_is_get_with_code_in_path() {
        let req = client().build_foot_traffic("10438").unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "http://localhost:5001/api/v1/sodam/core-diagnosis/foot-traffic/10438"
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn build_comprehensive_diagnosis_body() {
        let req = client()
            .build_comprehensive_diagnosis("10438", Some("식음료업"))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            body_json(&req),
            serde_json::json!({"market_code": "10438", "category": "식음료업"})
        );
    }

    #[test]
    fn padded_market_code_matches_in_path_and_body() {
        let req = client()
            .build_comprehensive_diagnosis("  10441 ", None)
            .unwrap();
        assert!(req.path.ends_with("/core-diagnosis/comprehensive/10441"), "{}", req.path);
        assert_eq!(body_json(&req), serde_json::json!({"market_code": "10441"}));
    }

    #[test]
    fn blank_category_and_industry_are_dropped() {
        let req = client()
            .build_comprehensive_diagnosis("10438", Some("  "))
            .unwrap();
        assert_eq!(body_json(&req), serde_json::json!({"market_code": "10438"}));

        let req = client().build_health_score("10438", Some("")).unwrap();
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn building_twice_is_deterministic() {
        let c = client();
        let a = c.build_comprehensive_diagnosis("10438", Some("쇼핑업")).unwrap();
        let b = c.build_comprehensive_diagnosis("10438", Some("쇼핑업")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn build_risk_detailed_analysis_only_sends_given_fields() {
        let req = client()
            .build_risk_detailed_analysis("10438", Some("유입 저조형"), None)
            .unwrap();
        assert_eq!(body_json(&req), serde_json::json!({"risk_type": "유입 저조형"}));
    }

    #[test]
    fn build_with_empty_market_code_fails_before_io() {
        let err = client().build_card_sales("").unwrap_err();
        assert!(matches!(err, ApiError::InvalidTarget(_)));
    }

    #[test]
    fn parse_success_decodes_named_shape() {
        let response = HttpResponse::new(
            200,
            r#"{"market_code":"10438","overall_score":78.0,"indicators":{"foot_traffic":81.5},"strengths":["역세권"],"weaknesses":[],"recommendations":["야간 영업"]}"#,
        );
        let d: ComprehensiveDiagnosisResponse = client().parse(response).unwrap();
        assert_eq!(d.overall_score, 78.0);
        assert_eq!(d.indicators["foot_traffic"], 81.5);
        assert_eq!(d.strengths, vec!["역세권".to_string()]);
    }

    #[test]
    fn parse_non_success_carries_status_and_skips_decode() {
        // Body is valid for the target shape; status alone decides.
        let response = HttpResponse::new(503, r#"{"data":[]}"#);
        let err = client().parse::<RiskTypesResponse>(response).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 503, .. }));
    }

    #[test]
    fn parse_unauthorized_login() {
        let response = HttpResponse::new(401, r#"{"error":"invalid credentials"}"#);
        let err = client().parse::<AuthResponse>(response).unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn parse_malformed_json_is_deserialization_error() {
        let response = HttpResponse::new(200, "<html>gateway</html>");
        let err = client().parse::<AuthResponse>(response).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn trailing_slash_is_absorbed() {
        let client = SodamClient::new("http://localhost:5001/").unwrap();
        let req = client.build_risk_types().unwrap();
        assert_eq!(
            req.path,
            "http://localhost:5001/api/v1/sodam/risk-classification/risk-types"
        );
    }
}
