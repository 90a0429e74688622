//! In-memory Sodam API.
//!
//! Speaks the same JSON contract the client core expects: enveloped
//! `{data, message}` answers for feature endpoints, a bare object for the
//! comprehensive diagnosis, and `{access_token, user, message}` for auth.
//! Failures use `{"success": false, "error": {"code", "message"}}`.
//! Feature numbers are derived from the market code so they are stable
//! across calls.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};

pub const API_PREFIX: &str = "/api/v1/sodam";

/// Market codes the mock has data for.
pub const KNOWN_MARKETS: &[(&str, &str)] = &[
    ("10435", "대전느리울중학교"),
    ("10436", "유성고속터미널"),
    ("10437", "시청역6번 출구"),
    ("10438", "대전역1번 출구"),
    ("10439", "중앙로역7번 출구"),
    ("10440", "대전 중리전통시장"),
    ("10441", "대전시청"),
];

const STRATEGY_IDS: &[&str] = &["digital_marketing", "customer_experience", "cost_reduction"];

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

pub type Db = Arc<RwLock<HashMap<String, StoredUser>>>;

/// An error answer: status plus the `{success, error}` envelope.
#[derive(Debug)]
pub struct Failure {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl Failure {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn not_found(what: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "DATA_NOT_FOUND",
            format!("{what}에 대한 데이터를 찾을 수 없습니다."),
        )
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    pub fn body(&self) -> Value {
        json!({
            "success": false,
            "error": { "code": self.code, "message": self.message },
        })
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}

type Answer = Result<Json<Value>, Failure>;

fn envelope(data: Value, message: &str) -> Json<Value> {
    Json(json!({ "data": data, "message": message }))
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    let api = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/core-diagnosis/foot-traffic/{market_code}", get(foot_traffic))
        .route("/core-diagnosis/card-sales/{market_code}", get(card_sales))
        .route("/core-diagnosis/same-industry/{market_code}", get(same_industry))
        .route("/core-diagnosis/business-rates/{market_code}", get(business_rates))
        .route("/core-diagnosis/dwell-time/{market_code}", get(dwell_time))
        .route("/core-diagnosis/health-score/{market_code}", post(health_score))
        .route("/core-diagnosis/comprehensive/{market_code}", post(comprehensive))
        .route("/risk-classification/classify/{market_code}", get(classify_risk))
        .route(
            "/risk-classification/detailed-analysis/{market_code}",
            post(detailed_analysis),
        )
        .route("/risk-classification/risk-types", get(risk_types))
        .route(
            "/risk-classification/mitigation-strategies",
            get(mitigation_strategies),
        )
        .route("/strategy-cards/generate", get(strategy_cards))
        .route("/strategy-cards/checklist/{strategy_id}", get(checklist))
        .route("/strategy-cards/success-cases", get(strategy_success_cases))
        .route("/strategy-cards/templates", get(strategy_templates))
        .route("/strategy-cards/categories", get(strategy_categories))
        .route("/support-tools/support-centers", get(support_centers))
        .route("/support-tools/expert-consultation", get(experts))
        .route(
            "/support-tools/policy-recommendations",
            post(policy_recommendations),
        )
        .route("/support-tools/success-cases", get(support_success_cases))
        .route("/support-tools/consultation-booking", post(book_consultation))
        .route("/support-tools/policy-application", post(apply_policy))
        .route("/map-visualization/heatmap", get(heatmap))
        .route("/map-visualization/radius-analysis", post(radius_analysis))
        .route("/map-visualization/cluster-analysis", get(cluster_analysis))
        .route("/map-visualization/traffic-flow/{market_code}", get(traffic_flow))
        .route("/map-visualization/accessibility/{market_code}", get(accessibility))
        .route("/map-visualization/analysis-types", get(analysis_types))
        .with_state(db);
    Router::new().nest(API_PREFIX, api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

/// Stable pseudo-random value in `0..modulo` for a market code.
pub fn seed(market_code: &str, modulo: u32) -> u32 {
    market_code
        .bytes()
        .fold(17u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)))
        % modulo.max(1)
}

fn known_market(market_code: &str) -> Result<&'static str, Failure> {
    KNOWN_MARKETS
        .iter()
        .find(|(code, _)| *code == market_code)
        .map(|(_, name)| *name)
        .ok_or_else(|| Failure::not_found(market_code))
}

// -- auth -------------------------------------------------------------------

fn user_json(user: &StoredUser) -> Value {
    json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
        "name": user.name,
    })
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<Registration>,
) -> Result<(StatusCode, Json<Value>), Failure> {
    let username = input.username.trim();
    let email = input.email.trim().to_lowercase();
    if username.is_empty() || email.is_empty() || input.password.is_empty() || input.name.is_empty()
    {
        return Err(Failure::invalid("아이디, 이메일, 비밀번호, 이름은 필수입니다."));
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Failure::invalid("비밀번호는 8자 이상이어야 합니다."));
    }

    let mut users = db.write().await;
    if users.contains_key(username) {
        warn!(username, "duplicate username");
        return Err(Failure::new(
            StatusCode::CONFLICT,
            "CONFLICT",
            "이미 사용 중인 아이디입니다.",
        ));
    }
    if users.values().any(|u| u.email == email) {
        return Err(Failure::new(
            StatusCode::CONFLICT,
            "CONFLICT",
            "이미 사용 중인 이메일입니다.",
        ));
    }
    let user = StoredUser {
        id: users.len() as i64 + 1,
        username: username.to_string(),
        email,
        name: input.name,
        password: input.password,
    };
    info!(user_id = user.id, username = %user.username, "registered");
    let body = json!({ "message": "registered", "user": user_json(&user) });
    users.insert(user.username.clone(), user);
    Ok((StatusCode::CREATED, Json(body)))
}

async fn login(State(db): State<Db>, Json(input): Json<Credentials>) -> Answer {
    if input.username.is_empty() || input.password.is_empty() {
        return Err(Failure::invalid("아이디와 비밀번호를 입력해주세요."));
    }
    let users = db.read().await;
    match users.get(&input.username) {
        Some(user) if user.password == input.password => {
            info!(user_id = user.id, "login");
            Ok(Json(json!({
                "access_token": format!("mock-token-{}", user.id),
                "message": "Login successful",
                "user": user_json(user),
            })))
        }
        _ => {
            warn!(username = %input.username, "login rejected");
            Err(Failure::new(
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid credentials",
            ))
        }
    }
}

// -- core diagnosis ---------------------------------------------------------

fn trend(market_code: &str) -> &'static str {
    ["increasing", "stable", "decreasing"][seed(market_code, 3) as usize]
}

async fn foot_traffic(Path(market_code): Path<String>) -> Answer {
    known_market(&market_code)?;
    Ok(envelope(
        json!({
            "market_code": market_code,
            "foot_traffic_change": f64::from(seed(&market_code, 40)) - 20.0,
            "trend": trend(&market_code),
            "period": "2024-Q4",
        }),
        "유동인구 변화량 조회 완료",
    ))
}

async fn card_sales(Path(market_code): Path<String>) -> Answer {
    known_market(&market_code)?;
    Ok(envelope(
        json!({
            "market_code": market_code,
            "sales_trend": f64::from(seed(&market_code, 1000)) * 10.0,
            "growth_rate": f64::from(seed(&market_code, 30)) - 10.0,
            "period": "2024-Q4",
        }),
        "카드매출 추이 조회 완료",
    ))
}

async fn same_industry(Path(market_code): Path<String>) -> Answer {
    known_market(&market_code)?;
    let count = seed(&market_code, 50) + 5;
    Ok(envelope(
        json!({
            "market_code": market_code,
            "same_industry_count": count,
            "density": f64::from(count) / 10.0,
            "competition_level": if count > 30 { "high" } else { "medium" },
        }),
        "동일업종 수 조회 완료",
    ))
}

async fn business_rates(Path(market_code): Path<String>) -> Answer {
    known_market(&market_code)?;
    let startup = f64::from(seed(&market_code, 20)) + 5.0;
    let closure = f64::from(seed(&market_code, 15)) + 3.0;
    Ok(envelope(
        json!({
            "market_code": market_code,
            "startup_rate": startup,
            "closure_rate": closure,
            "net_growth": startup - closure,
        }),
        "창업·폐업 비율 조회 완료",
    ))
}

async fn dwell_time(Path(market_code): Path<String>) -> Answer {
    known_market(&market_code)?;
    Ok(envelope(
        json!({
            "market_code": market_code,
            "average_dwell_time": f64::from(seed(&market_code, 60)) + 15.0,
            "trend": trend(&market_code),
            "period": "2024-Q4",
        }),
        "체류시간 조회 완료",
    ))
}

#[derive(Deserialize, Default)]
struct HealthScoreBody {
    industry: Option<String>,
}

async fn health_score(
    Path(market_code): Path<String>,
    Json(body): Json<HealthScoreBody>,
) -> Answer {
    known_market(&market_code)?;
    let score = f64::from(seed(&market_code, 50)) + 45.0;
    let recommendation = match body.industry.as_deref() {
        Some(industry) => format!("{industry} 업종 기준 상권 상태는 보통 이상입니다."),
        None => "상권 상태는 보통 이상입니다.".to_string(),
    };
    Ok(envelope(
        json!({
            "market_code": market_code,
            "health_score": score,
            "factors": {
                "foot_traffic": score * 0.3,
                "card_sales": score * 0.3,
                "business_rates": score * 0.2,
                "dwell_time": score * 0.2,
            },
            "recommendation": recommendation,
        }),
        "건강 점수 계산 완료",
    ))
}

#[derive(Deserialize)]
struct ComprehensiveBody {
    #[serde(default)]
    category: Option<String>,
}

async fn comprehensive(
    Path(market_code): Path<String>,
    Json(body): Json<ComprehensiveBody>,
) -> Answer {
    let place = known_market(&market_code)?;
    let score = f64::from(seed(&market_code, 50)) + 45.0;
    let category = body.category.unwrap_or_else(|| "전체".to_string());
    Ok(Json(json!({
        "market_code": market_code,
        "overall_score": score,
        "indicators": {
            "foot_traffic": f64::from(seed(&market_code, 100)),
            "card_sales": f64::from(seed(&market_code, 90)),
            "competition": f64::from(seed(&market_code, 80)),
        },
        "strengths": [format!("{place} 주변 유동인구가 많습니다.")],
        "weaknesses": [format!("{category} 업종의 경쟁이 치열합니다.")],
        "recommendations": ["온라인 홍보를 강화하세요.", "고객 재방문 혜택을 마련하세요."],
    })))
}

// -- risk classification ----------------------------------------------------

const RISK_TYPES: &[(&str, &str, &str)] = &[
    ("expansion", "확장형", "성장 여력이 큰 상권"),
    ("stagnant", "정체형", "변화가 적은 상권"),
    ("declining", "축소형", "매출과 유동인구가 줄어드는 상권"),
    ("unstable", "불안정형", "창·폐업이 잦은 상권"),
];

async fn classify_risk(Path(market_code): Path<String>) -> Answer {
    known_market(&market_code)?;
    let (id, _, _) = RISK_TYPES[seed(&market_code, RISK_TYPES.len() as u32) as usize];
    Ok(envelope(
        json!({
            "market_code": market_code,
            "risk_type": id,
            "risk_level": if id == "expansion" { "low" } else { "medium" },
            "confidence": 0.8,
            "factors": { "sales_trend": 0.4, "closure_rate": 0.3, "foot_traffic": 0.3 },
        }),
        "위험도 분류 완료",
    ))
}

async fn detailed_analysis(Path(market_code): Path<String>, Json(body): Json<Value>) -> Answer {
    known_market(&market_code)?;
    Ok(envelope(
        json!({
            "market_code": market_code,
            "risk_type": body.get("risk_type").cloned().unwrap_or(Value::Null),
            "industry": body.get("industry").cloned().unwrap_or(Value::Null),
            "analysis": ["매출 변동성이 평균보다 높습니다."],
        }),
        "상세 위험 분석 완료",
    ))
}

async fn risk_types() -> Json<Value> {
    let types: Vec<Value> = RISK_TYPES
        .iter()
        .map(|(id, name, description)| {
            json!({
                "id": id,
                "name": name,
                "description": description,
                "mitigation_strategies": ["비용 구조 점검", "고객층 다변화"],
            })
        })
        .collect();
    envelope(Value::Array(types), "위험 유형 조회 완료")
}

async fn mitigation_strategies() -> Json<Value> {
    envelope(
        json!({
            "declining": ["업종 전환 검토", "고정비 절감"],
            "unstable": ["단골 고객 확보", "운영 시간 조정"],
        }),
        "완화 전략 조회 완료",
    )
}

// -- strategy cards ---------------------------------------------------------

async fn strategy_cards() -> Json<Value> {
    let cards: Vec<Value> = STRATEGY_IDS
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "title": format!("{id} 전략"),
                "description": "상권 특성에 맞춘 실행 전략입니다.",
                "category": "marketing",
                "priority": "high",
                "estimated_impact": "매출 10% 증가",
                "implementation_steps": ["현황 점검", "실행 계획 수립", "성과 측정"],
            })
        })
        .collect();
    envelope(Value::Array(cards), "전략 카드 생성 완료")
}

async fn checklist(Path(strategy_id): Path<String>) -> Answer {
    if !STRATEGY_IDS.contains(&strategy_id.as_str()) {
        return Err(Failure::not_found(&strategy_id));
    }
    Ok(envelope(
        json!({
            "strategy_id": strategy_id,
            "items": [
                { "step": 1, "task": "목표 고객 정의", "done": false },
                { "step": 2, "task": "채널 선정", "done": false },
            ],
        }),
        "체크리스트 조회 완료",
    ))
}

fn success_case(id: &str, industry: &str) -> Value {
    json!({
        "id": id,
        "title": format!("{industry} 성공 사례"),
        "description": "대전 지역 소상공인 사례입니다.",
        "location": "대전 중구",
        "industry": industry,
        "results": { "sales_growth": 25.0 },
        "lessons_learned": ["지역 커뮤니티와 협업"],
    })
}

async fn strategy_success_cases() -> Json<Value> {
    envelope(
        json!([success_case("case_1", "식음료업"), success_case("case_2", "쇼핑업")]),
        "성공 사례 조회 완료",
    )
}

async fn strategy_templates() -> Json<Value> {
    envelope(
        json!([{ "id": "basic", "name": "기본 템플릿" }]),
        "템플릿 조회 완료",
    )
}

async fn strategy_categories() -> Json<Value> {
    envelope(
        json!(["marketing", "operations", "finance"]),
        "카테고리 조회 완료",
    )
}

// -- support tools ----------------------------------------------------------

async fn support_centers() -> Json<Value> {
    envelope(
        json!([{
            "id": "center_1",
            "name": "대전 소상공인지원센터",
            "address": "대전광역시 중구 중앙로 101",
            "phone": "042-000-0000",
            "services": ["창업 상담", "경영 컨설팅"],
            "operating_hours": "09:00-18:00",
        }]),
        "지원센터 조회 완료",
    )
}

async fn experts() -> Json<Value> {
    envelope(
        json!([{
            "id": "expert_1",
            "name": "김상권",
            "specialization": "상권 분석",
            "experience": "10년",
            "availability": "평일",
            "contact": "expert@sodam.kr",
        }]),
        "전문가 조회 완료",
    )
}

async fn policy_recommendations(Json(profile): Json<Value>) -> Json<Value> {
    envelope(
        json!({
            "profile": profile,
            "policies": [{ "id": "policy_1", "name": "소상공인 경영안정자금" }],
        }),
        "정책 추천 완료",
    )
}

async fn support_success_cases() -> Json<Value> {
    envelope(
        json!([success_case("support_case_1", "여가서비스업")]),
        "지원 성공 사례 조회 완료",
    )
}

fn require_fields(body: &Value, fields: &[&str]) -> Result<(), Failure> {
    match fields.iter().find(|f| body.get(**f).map_or(true, Value::is_null)) {
        Some(missing) => Err(Failure::invalid(format!("{missing} 값이 필요합니다."))),
        None => Ok(()),
    }
}

async fn book_consultation(Json(body): Json<Value>) -> Answer {
    require_fields(
        &body,
        &["expert_id", "consultation_type", "preferred_date", "preferred_time", "user_info"],
    )?;
    Ok(envelope(
        json!({ "booking_id": "booking_1", "status": "confirmed", "request": body }),
        "상담 예약 완료",
    ))
}

async fn apply_policy(Json(body): Json<Value>) -> Answer {
    require_fields(&body, &["policy_id", "user_info", "business_info"])?;
    Ok(envelope(
        json!({ "application_id": "application_1", "status": "submitted" }),
        "정책 신청 완료",
    ))
}

// -- map visualization ------------------------------------------------------

async fn heatmap() -> Json<Value> {
    envelope(
        json!({
            "coordinates": [
                { "latitude": 36.3504, "longitude": 127.3845 },
                { "latitude": 36.3326, "longitude": 127.4342 },
            ],
            "intensity_values": [0.8, 0.6],
            "color_scale": { "low": "#2DB400", "high": "#FF3B30" },
        }),
        "히트맵 조회 완료",
    )
}

#[derive(Deserialize)]
struct RadiusBody {
    center_lat: f64,
    center_lng: f64,
    radius_km: f64,
    #[serde(default)]
    analysis_type: Option<String>,
}

async fn radius_analysis(Json(body): Json<RadiusBody>) -> Answer {
    if body.radius_km.is_nan() || body.radius_km <= 0.0 {
        return Err(Failure::invalid("반경은 0보다 커야 합니다."));
    }
    Ok(envelope(
        json!({
            "center": { "latitude": body.center_lat, "longitude": body.center_lng },
            "radius_km": body.radius_km,
            "analysis_type": body.analysis_type.unwrap_or_else(|| "comprehensive".to_string()),
            "markets": KNOWN_MARKETS.iter().map(|(code, _)| code).collect::<Vec<_>>(),
        }),
        "반경 분석 완료",
    ))
}

async fn cluster_analysis() -> Json<Value> {
    envelope(
        json!([{ "cluster_id": 1, "markets": ["10437", "10441"] }]),
        "클러스터 분석 완료",
    )
}

async fn traffic_flow(Path(market_code): Path<String>) -> Answer {
    known_market(&market_code)?;
    Ok(envelope(
        json!({ "market_code": market_code, "peak_hour": 12 + seed(&market_code, 8) }),
        "교통 흐름 조회 완료",
    ))
}

async fn accessibility(Path(market_code): Path<String>) -> Answer {
    known_market(&market_code)?;
    Ok(envelope(
        json!({ "market_code": market_code, "score": f64::from(seed(&market_code, 100)) }),
        "접근성 조회 완료",
    ))
}

async fn analysis_types() -> Json<Value> {
    envelope(
        json!(["heatmap", "radius_analysis", "cluster_analysis", "traffic_flow", "accessibility"]),
        "분석 유형 조회 완료",
    )
}
