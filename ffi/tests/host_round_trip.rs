//! Plays the native host: builds requests through the C ABI, executes them
//! with its own HTTP client against the mock server, and hands the answers
//! back for parsing.

use std::ffi::{CStr, CString};
use std::net::SocketAddr;
use std::os::raw::c_char;

use sodam_ffi::types::{FfiErrorCode, FfiHttpMethod, FfiHttpRequest, FfiHttpResponse, FfiEndpoint};
use sodam_ffi::*;

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

fn c_str<'a>(ptr: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap()
}

/// Execute an FFI request the way a host would: read every field, send it,
/// and return status plus body without treating 4xx/5xx as errors.
fn execute(req: *mut FfiHttpRequest) -> (u16, CString) {
    assert!(!req.is_null());
    let r = unsafe { &*req };
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .into();
    let url = c_str(r.path);
    let headers = unsafe { std::slice::from_raw_parts(r.headers, r.headers_len as usize) };

    let mut resp = match r.method {
        FfiHttpMethod::Get => {
            let mut builder = agent.get(url);
            for h in headers {
                builder = builder.header(c_str(h.key), c_str(h.value));
            }
            builder.call().unwrap()
        }
        FfiHttpMethod::Post => {
            let mut builder = agent.post(url);
            for h in headers {
                builder = builder.header(c_str(h.key), c_str(h.value));
            }
            let body = if r.body.is_null() { "" } else { c_str(r.body) };
            builder.send(body).unwrap()
        }
    };
    let status = resp.status().as_u16();
    let body = resp.body_mut().read_to_string().unwrap();
    sodam_free_request(req);
    (status, CString::new(body).unwrap())
}

#[test]
fn register_login_and_diagnose_through_the_c_abi() {
    let addr = start_server();
    let url = CString::new(format!("http://{addr}")).unwrap();
    let client = sodam_client_new(url.as_ptr(), std::ptr::null());
    let session = sodam_session_new();

    let (u, e, p, n) = (
        CString::new("ffi_user").unwrap(),
        CString::new("ffi@daejeon.kr").unwrap(),
        CString::new("password123!").unwrap(),
        CString::new("홍길동").unwrap(),
    );
    let (status, body) = execute(sodam_build_register(
        client,
        u.as_ptr(),
        e.as_ptr(),
        p.as_ptr(),
        n.as_ptr(),
    ));
    assert_eq!(status, 201);
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = sodam_session_apply_auth(session, client, &resp);
    assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::Ok);
    sodam_free_result(result);
    assert!(sodam_session_is_authenticated(session));

    // Wrong password: 401 and the session keeps its user.
    let wrong = CString::new("wrong-password").unwrap();
    let (status, body) = execute(sodam_build_login(client, u.as_ptr(), wrong.as_ptr()));
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = sodam_session_apply_auth(session, client, &resp);
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Http);
    assert_eq!(r.http_status, 401);
    sodam_free_result(result);
    assert!(sodam_session_is_authenticated(session));

    // Resolve a landmark, then run the comprehensive diagnosis.
    let place = CString::new("대전시청").unwrap();
    let code = sodam_resolve_market_code(place.as_ptr(), std::ptr::null());
    assert_eq!(c_str(code), "10441");
    let category = CString::new("식음료업").unwrap();
    let (status, body) = execute(sodam_build_comprehensive_diagnosis(
        client,
        code,
        category.as_ptr(),
    ));
    sodam_free_string(code);
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = sodam_parse_response(client, FfiEndpoint::ComprehensiveDiagnosis, &resp);
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Ok);
    let data: serde_json::Value = serde_json::from_str(c_str(r.data_json)).unwrap();
    assert_eq!(data["market_code"], "10441");
    sodam_free_result(result);

    sodam_session_free(session);
    sodam_client_free(client);
}

#[test]
fn every_parameterless_endpoint_parses() {
    let addr = start_server();
    let url = CString::new(format!("http://{addr}")).unwrap();
    let client = sodam_client_new(url.as_ptr(), std::ptr::null());

    for endpoint in [
        FfiEndpoint::RiskTypes,
        FfiEndpoint::MitigationStrategies,
        FfiEndpoint::GenerateStrategyCards,
        FfiEndpoint::StrategySuccessCases,
        FfiEndpoint::StrategyTemplates,
        FfiEndpoint::StrategyCategories,
        FfiEndpoint::SupportCenters,
        FfiEndpoint::ExpertConsultation,
        FfiEndpoint::SupportSuccessCases,
        FfiEndpoint::MapHeatmap,
        FfiEndpoint::MapClusterAnalysis,
        FfiEndpoint::MapAnalysisTypes,
    ] {
        let (status, body) = execute(sodam_build_request(
            client,
            endpoint,
            std::ptr::null(),
            std::ptr::null(),
        ));
        let resp = FfiHttpResponse {
            status,
            body: body.as_ptr(),
        };
        let result = sodam_parse_response(client, endpoint, &resp);
        assert_eq!(
            unsafe { &*result }.error_code,
            FfiErrorCode::Ok,
            "{endpoint:?}"
        );
        sodam_free_result(result);
    }

    sodam_client_free(client);
}

#[test]
fn unknown_market_surfaces_404() {
    let addr = start_server();
    let url = CString::new(format!("http://{addr}")).unwrap();
    let client = sodam_client_new(url.as_ptr(), std::ptr::null());

    let code = CString::new("99999").unwrap();
    let (status, body) = execute(sodam_build_request(
        client,
        FfiEndpoint::DwellTime,
        code.as_ptr(),
        std::ptr::null(),
    ));
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = sodam_parse_response(client, FfiEndpoint::DwellTime, &resp);
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Http);
    assert_eq!(r.http_status, 404);
    sodam_free_result(result);

    sodam_client_free(client);
}
