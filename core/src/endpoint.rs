//! Endpoint registry: logical operation name to method and path template.
//!
//! Templates carry at most one `{placeholder}` segment. `Endpoint::url`
//! substitutes it as a single percent-encoded path segment, so market codes
//! containing spaces or Hangul stay inside their segment.

use url::Url;

use crate::error::ApiError;
use crate::http::HttpMethod;

/// Path prefix shared by every Sodam endpoint.
pub const API_PREFIX: &str = "/api/v1/sodam";

/// Every operation the Sodam API exposes to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    AuthLogin,
    AuthRegister,

    FootTraffic,
    CardSales,
    SameIndustry,
    BusinessRates,
    DwellTime,
    HealthScore,
    ComprehensiveDiagnosis,

    RiskClassify,
    RiskDetailedAnalysis,
    RiskTypes,
    MitigationStrategies,

    StrategyCardsGenerate,
    StrategyCardsChecklist,
    StrategyCardsSuccessCases,
    StrategyCardsTemplates,
    StrategyCardsCategories,

    SupportCenters,
    ExpertConsultation,
    PolicyRecommendations,
    SupportSuccessCases,
    ConsultationBooking,
    PolicyApplication,

    MapHeatmap,
    MapRadiusAnalysis,
    MapClusterAnalysis,
    MapTrafficFlow,
    MapAccessibility,
    MapAnalysisTypes,
}

impl Endpoint {
    pub const ALL: [Endpoint; 30] = [
        Endpoint::AuthLogin,
        Endpoint::AuthRegister,
        Endpoint::FootTraffic,
        Endpoint::CardSales,
        Endpoint::SameIndustry,
        Endpoint::BusinessRates,
        Endpoint::DwellTime,
        Endpoint::HealthScore,
        Endpoint::ComprehensiveDiagnosis,
        Endpoint::RiskClassify,
        Endpoint::RiskDetailedAnalysis,
        Endpoint::RiskTypes,
        Endpoint::MitigationStrategies,
        Endpoint::StrategyCardsGenerate,
        Endpoint::StrategyCardsChecklist,
        Endpoint::StrategyCardsSuccessCases,
        Endpoint::StrategyCardsTemplates,
        Endpoint::StrategyCardsCategories,
        Endpoint::SupportCenters,
        Endpoint::ExpertConsultation,
        Endpoint::PolicyRecommendations,
        Endpoint::SupportSuccessCases,
        Endpoint::ConsultationBooking,
        Endpoint::PolicyApplication,
        Endpoint::MapHeatmap,
        Endpoint::MapRadiusAnalysis,
        Endpoint::MapClusterAnalysis,
        Endpoint::MapTrafficFlow,
        Endpoint::MapAccessibility,
        Endpoint::MapAnalysisTypes,
    ];

    /// Logical operation name, stable across releases.
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::AuthLogin => "login",
            Endpoint::AuthRegister => "register",
            Endpoint::FootTraffic => "foot_traffic",
            Endpoint::CardSales => "card_sales",
            Endpoint::SameIndustry => "same_industry",
            Endpoint::BusinessRates => "business_rates",
            Endpoint::DwellTime => "dwell_time",
            Endpoint::HealthScore => "health_score",
            Endpoint::ComprehensiveDiagnosis => "comprehensive_diagnosis",
            Endpoint::RiskClassify => "classify_risk",
            Endpoint::RiskDetailedAnalysis => "risk_detailed_analysis",
            Endpoint::RiskTypes => "risk_types",
            Endpoint::MitigationStrategies => "mitigation_strategies",
            Endpoint::StrategyCardsGenerate => "generate_strategy_cards",
            Endpoint::StrategyCardsChecklist => "strategy_checklist",
            Endpoint::StrategyCardsSuccessCases => "strategy_success_cases",
            Endpoint::StrategyCardsTemplates => "strategy_templates",
            Endpoint::StrategyCardsCategories => "strategy_categories",
            Endpoint::SupportCenters => "support_centers",
            Endpoint::ExpertConsultation => "expert_consultation",
            Endpoint::PolicyRecommendations => "policy_recommendations",
            Endpoint::SupportSuccessCases => "support_success_cases",
            Endpoint::ConsultationBooking => "book_consultation",
            Endpoint::PolicyApplication => "apply_policy",
            Endpoint::MapHeatmap => "map_heatmap",
            Endpoint::MapRadiusAnalysis => "map_radius_analysis",
            Endpoint::MapClusterAnalysis => "map_cluster_analysis",
            Endpoint::MapTrafficFlow => "map_traffic_flow",
            Endpoint::MapAccessibility => "map_accessibility",
            Endpoint::MapAnalysisTypes => "map_analysis_types",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }

    pub fn method(self) -> HttpMethod {
        match self {
            Endpoint::AuthLogin
            | Endpoint::AuthRegister
            | Endpoint::HealthScore
            | Endpoint::ComprehensiveDiagnosis
            | Endpoint::RiskDetailedAnalysis
            | Endpoint::PolicyRecommendations
            | Endpoint::ConsultationBooking
            | Endpoint::PolicyApplication
            | Endpoint::MapRadiusAnalysis => HttpMethod::Post,
            _ => HttpMethod::Get,
        }
    }

    /// Path template relative to the base URL.
    pub fn template(self) -> &'static str {
        match self {
            Endpoint::AuthLogin => "/api/v1/sodam/auth/login",
            Endpoint::AuthRegister => "/api/v1/sodam/auth/register",

            Endpoint::FootTraffic => "/api/v1/sodam/core-diagnosis/foot-traffic/{market_code}",
            Endpoint::CardSales => "/api/v1/sodam/core-diagnosis/card-sales/{market_code}",
            Endpoint::SameIndustry => "/api/v1/sodam/core-diagnosis/same-industry/{market_code}",
            Endpoint::BusinessRates => "/api/v1/sodam/core-diagnosis/business-rates/{market_code}",
            Endpoint::DwellTime => "/api/v1/sodam/core-diagnosis/dwell-time/{market_code}",
            Endpoint::HealthScore => "/api/v1/sodam/core-diagnosis/health-score/{market_code}",
            Endpoint::ComprehensiveDiagnosis => {
                "/api/v1/sodam/core-diagnosis/comprehensive/{market_code}"
            }

            Endpoint::RiskClassify => "/api/v1/sodam/risk-classification/classify/{market_code}",
            Endpoint::RiskDetailedAnalysis => {
                "/api/v1/sodam/risk-classification/detailed-analysis/{market_code}"
            }
            Endpoint::RiskTypes => "/api/v1/sodam/risk-classification/risk-types",
            Endpoint::MitigationStrategies => {
                "/api/v1/sodam/risk-classification/mitigation-strategies"
            }

            Endpoint::StrategyCardsGenerate => "/api/v1/sodam/strategy-cards/generate",
            Endpoint::StrategyCardsChecklist => {
                "/api/v1/sodam/strategy-cards/checklist/{strategy_id}"
            }
            Endpoint::StrategyCardsSuccessCases => "/api/v1/sodam/strategy-cards/success-cases",
            Endpoint::StrategyCardsTemplates => "/api/v1/sodam/strategy-cards/templates",
            Endpoint::StrategyCardsCategories => "/api/v1/sodam/strategy-cards/categories",

            Endpoint::SupportCenters => "/api/v1/sodam/support-tools/support-centers",
            Endpoint::ExpertConsultation => "/api/v1/sodam/support-tools/expert-consultation",
            Endpoint::PolicyRecommendations => {
                "/api/v1/sodam/support-tools/policy-recommendations"
            }
            Endpoint::SupportSuccessCases => "/api/v1/sodam/support-tools/success-cases",
            Endpoint::ConsultationBooking => "/api/v1/sodam/support-tools/consultation-booking",
            Endpoint::PolicyApplication => "/api/v1/sodam/support-tools/policy-application",

            Endpoint::MapHeatmap => "/api/v1/sodam/map-visualization/heatmap",
            Endpoint::MapRadiusAnalysis => "/api/v1/sodam/map-visualization/radius-analysis",
            Endpoint::MapClusterAnalysis => "/api/v1/sodam/map-visualization/cluster-analysis",
            Endpoint::MapTrafficFlow => {
                "/api/v1/sodam/map-visualization/traffic-flow/{market_code}"
            }
            Endpoint::MapAccessibility => {
                "/api/v1/sodam/map-visualization/accessibility/{market_code}"
            }
            Endpoint::MapAnalysisTypes => "/api/v1/sodam/map-visualization/analysis-types",
        }
    }

    /// Name of the template's path parameter, if it has one.
    pub fn param_name(self) -> Option<&'static str> {
        self.template()
            .rsplit('/')
            .next()
            .and_then(|last| last.strip_prefix('{'))
            .and_then(|last| last.strip_suffix('}'))
    }

    /// Resolve this endpoint against `base`, substituting `param`.
    ///
    /// Fails with `InvalidTarget` when the parameter is missing, blank,
    /// supplied to an endpoint without one, or when `base` cannot carry a
    /// path (e.g. `mailto:`).
    pub fn url(self, base: &Url, param: Option<&str>) -> Result<Url, ApiError> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ApiError::InvalidTarget(format!("base URL cannot carry a path: {base}"))
            })?;
            segments.pop_if_empty();
            for segment in self.template().split('/').filter(|s| !s.is_empty()) {
                if segment.starts_with('{') {
                    let value = param.map(str::trim).filter(|p| !p.is_empty()).ok_or_else(|| {
                        ApiError::InvalidTarget(format!("{} requires {segment}", self.name()))
                    })?;
                    segments.push(value);
                } else {
                    segments.push(segment);
                }
            }
        }
        if param.is_some() && self.param_name().is_none() {
            return Err(ApiError::InvalidTarget(format!(
                "{} takes no path parameter",
                self.name()
            )));
        }
        Ok(url)
    }
}
