//! End-to-end run against the live mock server.
//!
//! Starts the mock server on a random port, then drives the core through
//! `SodamApi<UreqTransport>` and `SessionStore` over real HTTP. Catches
//! drift between the client DTOs and the server's JSON.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sodam_core::market::market_code_for;
use sodam_core::types::{ConsultationBookingRequest, RadiusAnalysisRequest, RadiusAnalysisType};
use sodam_core::validation::SignUpForm;
use sodam_core::{
    ApiError, ClientConfig, HttpMethod, SessionState, SessionStore, SodamApi, SodamClient,
    Transport, UreqTransport,
};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            sodam_mock_server::run(listener).await
        })
        .unwrap();
    });
    addr
}

fn api(addr: SocketAddr) -> SodamApi<UreqTransport> {
    let config = ClientConfig {
        base_url: format!("http://{addr}"),
        ..ClientConfig::default()
    };
    SodamApi::with_ureq(&config).unwrap()
}

#[test]
fn sign_up_login_and_diagnose() {
    let addr = start_server();
    let api = api(addr);
    let session = SessionStore::new();
    let notified = Arc::new(AtomicUsize::new(0));
    let n = Arc::clone(&notified);
    session.subscribe(move |_| {
        n.fetch_add(1, Ordering::SeqCst);
    });

    // Step 1: sign up through the form; the mock answers without a token.
    let form = SignUpForm {
        username: "daejeon_user".to_string(),
        email: "user@daejeon.kr".to_string(),
        password: "password123!".to_string(),
        password_confirm: "password123!".to_string(),
    };
    assert!(form.is_complete());
    let user = session.register(&api, &form.to_register_request()).unwrap();
    assert_eq!(user.username, "daejeon_user");
    assert!(matches!(
        session.state(),
        SessionState::Authenticated { token: None, .. }
    ));

    // Step 2: wrong password is a 401 and leaves the session alone.
    let err = session.login(&api, "daejeon_user", "wrong-password").unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(session.is_authenticated());

    // Step 3: real login carries a token.
    session.logout();
    let user = session.login(&api, "daejeon_user", "password123!").unwrap();
    assert_eq!(user.id, 1);
    match session.state() {
        SessionState::Authenticated { token, .. } => {
            assert_eq!(token.as_deref(), Some("mock-token-1"));
        }
        SessionState::Anonymous => panic!("expected a session"),
    }
    // register, logout, login
    assert_eq!(notified.load(Ordering::SeqCst), 3);

    // Step 4: resolve a place and run the diagnosis screens.
    let code = market_code_for("대전역 앞", "식음료업");
    assert!(code.is_known());
    let code = code.as_str();

    let traffic = api.foot_traffic(code).unwrap().into_data().unwrap();
    assert_eq!(traffic.market_code, code);
    let health = api.health_score(code, Some("식음료업")).unwrap();
    assert_eq!(health.data.unwrap().factors.len(), 4);
    let diagnosis = api.comprehensive_diagnosis(code, Some("식음료업")).unwrap();
    assert_eq!(diagnosis.market_code, code);
    assert!((0.0..=1.0).contains(&diagnosis.normalized_score()));
    let risk = api.classify_risk(code).unwrap().into_data().unwrap();
    assert!(risk.confidence > 0.0);

    api.card_sales(code).unwrap();
    api.same_industry(code).unwrap();
    api.business_rates(code).unwrap();
    api.dwell_time(code).unwrap();
}

#[test]
fn feature_catalogues_decode() {
    let api = api(start_server());

    assert_eq!(api.risk_types().unwrap().into_data().unwrap().len(), 4);
    api.mitigation_strategies().unwrap();
    api.risk_detailed_analysis("10441", Some("declining"), None).unwrap();

    let cards = api.generate_strategy_cards().unwrap().into_data().unwrap();
    assert!(!cards.is_empty());
    api.strategy_checklist(&cards[0].id).unwrap();
    api.strategy_success_cases().unwrap();
    api.strategy_templates().unwrap();
    api.strategy_categories().unwrap();

    api.support_centers().unwrap();
    api.expert_consultation().unwrap();
    api.policy_recommendations(&serde_json::json!({ "industry": "식음료업" }))
        .unwrap();
    api.support_success_cases().unwrap();
    api.book_consultation(&ConsultationBookingRequest {
        expert_id: "expert_1".to_string(),
        consultation_type: "online".to_string(),
        preferred_date: "2024-12-01".to_string(),
        preferred_time: "14:00".to_string(),
        user_info: serde_json::json!({ "name": "홍길동" }),
    })
    .unwrap();

    let heatmap = api.map_heatmap().unwrap().into_data().unwrap();
    assert_eq!(heatmap.points().count(), 2);
    api.map_radius_analysis(&RadiusAnalysisRequest {
        center_lat: 36.3504,
        center_lng: 127.3845,
        radius_km: 1.0,
        analysis_type: RadiusAnalysisType::Competition,
    })
    .unwrap();
    api.map_cluster_analysis().unwrap();
    api.map_traffic_flow("10437").unwrap();
    api.map_accessibility("10437").unwrap();
    assert!(!api.map_analysis_types().unwrap().into_data().unwrap().is_empty());
}

#[test]
fn failures_are_typed() {
    let api = api(start_server());

    // A generated code is unknown to the server.
    let code = market_code_for("강남구", "쇼핑업");
    assert!(!code.is_known());
    let err = api.foot_traffic(code.as_str()).unwrap_err();
    assert_eq!(err.status(), Some(404));

    let err = api.strategy_checklist("no-such-strategy").unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));

    // Empty credentials never leave the process.
    let session = SessionStore::new();
    let err = session.login(&api, "", "password123!").unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[test]
fn host_does_io_round_trip() {
    let addr = start_server();
    let client = SodamClient::new(&format!("http://{addr}")).unwrap();
    let transport = UreqTransport::new();

    let req = client.build_map_analysis_types().unwrap();
    assert_eq!(req.method, HttpMethod::Get);
    let resp = transport.execute(&req).unwrap();
    assert_eq!(resp.status, 200);
    let parsed: sodam_core::types::MapAnalysisTypesResponse = client.parse(resp).unwrap();
    assert!(parsed.data.unwrap().contains(&"heatmap".to_string()));
}

#[test]
fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let err = api(addr).risk_types().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err:?}");
    assert_eq!(err.user_message(), "네트워크 연결을 확인해주세요.");
}
