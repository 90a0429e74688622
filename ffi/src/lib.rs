//! C-ABI wrapper around `sodam-core`.
//!
//! # Overview
//! Lets a native host (the iOS app) build Sodam API requests, execute them
//! with its own HTTP stack, and hand the responses back for decoding,
//! without linking an async runtime or an HTTP client from Rust.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Dedicated builders exist for the calls with structured inputs; every
//!   other endpoint goes through `sodam_build_request`.
//! - One `sodam_parse_response` decodes any endpoint with its typed shape
//!   and returns the normalized JSON in an `FfiResult`.
//! - The session store is exposed as an opaque handle; observers are C
//!   callbacks with a host context pointer.
//! - The C caller owns all returned pointers and must release them with
//!   the matching `sodam_free_*` function.

pub mod types;

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use sodam_core::error::ApiError;
use sodam_core::http::HttpResponse;
use sodam_core::market::{market_code_for, Category};
use sodam_core::session::{SessionState, SubscriptionId};
use sodam_core::types::{
    AuthResponse, BusinessRatesResponse, CardSalesResponse, ComprehensiveDiagnosisResponse,
    DwellTimeResponse, ExpertConsultationResponse, FootTrafficResponse, GenericResponse,
    HealthScoreResponse, LoginRequest, MapAnalysisTypesResponse, MapHeatmapResponse,
    RegisterRequest, RiskClassificationResponse, RiskTypesResponse, SameIndustryResponse,
    StrategyCardsResponse, SuccessCasesResponse, SupportCentersResponse,
};
use sodam_core::validation::{validate_login, SignUpForm};
use sodam_core::{Endpoint, SessionStore, SodamClient};

use types::*;

/// Borrow a C string. `None` for null or invalid UTF-8.
fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null or
/// non-UTF-8 body reads as empty.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse::new(resp.status, read_str(resp.body).unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a `SodamClient` bound to `base_url`. `user_agent` may be null for
/// the default.
///
/// Returns null if `base_url` is null or not an absolute URL.
/// The caller must free the returned pointer with `sodam_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_client_new(
    base_url: *const c_char,
    user_agent: *const c_char,
) -> *mut FfiSodamClient {
    catch_unwind(|| {
        let Some(url) = read_str(base_url) else {
            return std::ptr::null_mut();
        };
        let mut client = match SodamClient::new(url) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "rejected base URL");
                return std::ptr::null_mut();
            }
        };
        if let Some(ua) = read_str(user_agent).filter(|ua| !ua.is_empty()) {
            client = client.with_user_agent(ua);
        }
        Box::into_raw(Box::new(FfiSodamClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `sodam_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_client_free(client: *mut FfiSodamClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

fn finish_build(
    operation: &str,
    built: Result<sodam_core::HttpRequest, ApiError>,
) -> *mut FfiHttpRequest {
    match built {
        Ok(req) => FfiHttpRequest::from_core(req),
        Err(e) => {
            warn!(operation, error = %e, "request not built");
            std::ptr::null_mut()
        }
    }
}

/// Build `POST /auth/login`.
///
/// Returns null if any argument is null. Field checks are left to
/// `sodam_validate_login`.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_build_login(
    client: *const FfiSodamClient,
    username: *const c_char,
    password: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let (Some(username), Some(password)) = (read_str(username), read_str(password)) else {
            return std::ptr::null_mut();
        };
        let client = unsafe { &*client };
        let input = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        finish_build("login", client.inner.build_login(&input))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build `POST /auth/register`. Returns null if any argument is null.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_build_register(
    client: *const FfiSodamClient,
    username: *const c_char,
    email: *const c_char,
    password: *const c_char,
    name: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let (Some(username), Some(email), Some(password), Some(name)) = (
            read_str(username),
            read_str(email),
            read_str(password),
            read_str(name),
        ) else {
            return std::ptr::null_mut();
        };
        let client = unsafe { &*client };
        let input = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        finish_build("register", client.inner.build_register(&input))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build `POST /core-diagnosis/health-score/{market_code}`. `industry` may
/// be null.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_build_health_score(
    client: *const FfiSodamClient,
    market_code: *const c_char,
    industry: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let Some(code) = read_str(market_code) else {
            return std::ptr::null_mut();
        };
        let client = unsafe { &*client };
        finish_build(
            "health_score",
            client.inner.build_health_score(code, read_str(industry)),
        )
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build `POST /core-diagnosis/comprehensive/{market_code}`. `category` may
/// be null.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_build_comprehensive_diagnosis(
    client: *const FfiSodamClient,
    market_code: *const c_char,
    category: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let Some(code) = read_str(market_code) else {
            return std::ptr::null_mut();
        };
        let client = unsafe { &*client };
        finish_build(
            "comprehensive_diagnosis",
            client
                .inner
                .build_comprehensive_diagnosis(code, read_str(category)),
        )
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request for any endpoint.
///
/// `param` fills the path parameter (market code or strategy id) and must
/// be null for endpoints without one. `body_json`, when not null, must be
/// valid JSON and is sent as the body. Returns null on any invalid input.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_build_request(
    client: *const FfiSodamClient,
    endpoint: FfiEndpoint,
    param: *const c_char,
    body_json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let endpoint = Endpoint::from(endpoint);
        let param = read_str(param);
        let built = if body_json.is_null() {
            client.inner.build(endpoint, param)
        } else {
            let body: serde_json::Value = match read_str(body_json).map(serde_json::from_str::<serde_json::Value>) {
                Some(Ok(v)) => v,
                _ => {
                    warn!(operation = endpoint.name(), "body is not valid JSON");
                    return std::ptr::null_mut();
                }
            };
            client.inner.build_with_body(endpoint, param, &body)
        };
        finish_build(endpoint.name(), built)
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response
// ---------------------------------------------------------------------------

fn normalized<R: DeserializeOwned + Serialize>(
    client: &SodamClient,
    response: HttpResponse,
) -> Result<String, ApiError> {
    let value: R = client.parse(response)?;
    serde_json::to_string(&value).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Decode `response` with the shape `endpoint` answers with, then
/// re-encode it. Missing optional fields come back filled with defaults.
fn parse_for(
    client: &SodamClient,
    endpoint: Endpoint,
    response: HttpResponse,
) -> Result<String, ApiError> {
    match endpoint {
        Endpoint::AuthLogin | Endpoint::AuthRegister => normalized::<AuthResponse>(client, response),
        Endpoint::FootTraffic => normalized::<FootTrafficResponse>(client, response),
        Endpoint::CardSales => normalized::<CardSalesResponse>(client, response),
        Endpoint::SameIndustry => normalized::<SameIndustryResponse>(client, response),
        Endpoint::BusinessRates => normalized::<BusinessRatesResponse>(client, response),
        Endpoint::DwellTime => normalized::<DwellTimeResponse>(client, response),
        Endpoint::HealthScore => normalized::<HealthScoreResponse>(client, response),
        Endpoint::ComprehensiveDiagnosis => {
            normalized::<ComprehensiveDiagnosisResponse>(client, response)
        }
        Endpoint::RiskClassify => normalized::<RiskClassificationResponse>(client, response),
        Endpoint::RiskTypes => normalized::<RiskTypesResponse>(client, response),
        Endpoint::StrategyCardsGenerate => normalized::<StrategyCardsResponse>(client, response),
        Endpoint::StrategyCardsSuccessCases => {
            normalized::<SuccessCasesResponse>(client, response)
        }
        Endpoint::SupportCenters => normalized::<SupportCentersResponse>(client, response),
        Endpoint::ExpertConsultation => normalized::<ExpertConsultationResponse>(client, response),
        Endpoint::MapHeatmap => normalized::<MapHeatmapResponse>(client, response),
        Endpoint::MapAnalysisTypes => normalized::<MapAnalysisTypesResponse>(client, response),
        Endpoint::RiskDetailedAnalysis
        | Endpoint::MitigationStrategies
        | Endpoint::StrategyCardsChecklist
        | Endpoint::StrategyCardsTemplates
        | Endpoint::StrategyCardsCategories
        | Endpoint::PolicyRecommendations
        | Endpoint::SupportSuccessCases
        | Endpoint::ConsultationBooking
        | Endpoint::PolicyApplication
        | Endpoint::MapRadiusAnalysis
        | Endpoint::MapClusterAnalysis
        | Endpoint::MapTrafficFlow
        | Endpoint::MapAccessibility => normalized::<GenericResponse>(client, response),
    }
}

/// Parse the response to a request built for `endpoint`.
///
/// On success `data_json` holds the decoded payload. Login and register
/// answers are returned as-is; use `sodam_session_apply_auth` to update
/// the session.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_parse_response(
    client: *const FfiSodamClient,
    endpoint: FfiEndpoint,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = ffi_response_to_core(unsafe { &*response });
        match parse_for(&client.inner, endpoint.into(), resp) {
            Ok(json) => FfiResult::ok_json(json),
            Err(e) => FfiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in sodam_parse_response"))
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Observer called after every session transition. `user_json` is null
/// when signed out and only valid for the duration of the call. The
/// callback may query the session but must not log in or out from inside
/// it.
pub type SodamSessionCallback =
    Option<extern "C" fn(ctx: *mut c_void, authenticated: bool, user_json: *const c_char)>;

/// Host context pointer handed back to the callback untouched. The host
/// guarantees it may be used from whichever thread triggers a transition.
struct HostContext(*mut c_void);

unsafe impl Send for HostContext {}
unsafe impl Sync for HostContext {}

impl HostContext {
    fn get(&self) -> *mut c_void {
        self.0
    }
}

/// Create an empty (signed-out) session store.
/// The caller must free it with `sodam_session_free`.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_session_new() -> *mut FfiSessionStore {
    catch_unwind(|| {
        Box::into_raw(Box::new(FfiSessionStore {
            inner: SessionStore::new(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a session store. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_session_free(session: *mut FfiSessionStore) {
    if !session.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(session) });
        }));
    }
}

/// Apply a login or register response to the session.
///
/// On success the session becomes authenticated, observers are notified,
/// and `data_json` holds the user. On failure the session is unchanged.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_session_apply_auth(
    session: *const FfiSessionStore,
    client: *const FfiSodamClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return FfiResult::null_arg("session");
        }
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiResult::null_arg("response");
        }
        let session = unsafe { &*session };
        let client = unsafe { &*client };
        let resp = ffi_response_to_core(unsafe { &*response });
        let applied = client
            .inner
            .parse::<AuthResponse>(resp)
            .and_then(|auth| session.inner.apply_auth(auth))
            .and_then(|user| {
                serde_json::to_string(&user).map_err(|e| ApiError::Serialization(e.to_string()))
            });
        match applied {
            Ok(json) => FfiResult::ok_json(json),
            Err(e) => FfiResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in sodam_session_apply_auth"))
}

/// Sign out and notify observers. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_session_logout(session: *const FfiSessionStore) {
    if session.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        unsafe { &*session }.inner.logout();
    }));
}

#[unsafe(no_mangle)]
pub extern "C" fn sodam_session_is_authenticated(session: *const FfiSessionStore) -> bool {
    if session.is_null() {
        return false;
    }
    catch_unwind(AssertUnwindSafe(|| unsafe { &*session }.inner.is_authenticated()))
        .unwrap_or(false)
}

/// Current user as JSON, or null when signed out.
/// Free with `sodam_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_session_user_json(session: *const FfiSessionStore) -> *mut c_char {
    if session.is_null() {
        return std::ptr::null_mut();
    }
    catch_unwind(AssertUnwindSafe(|| {
        unsafe { &*session }
            .inner
            .current_user()
            .and_then(|u| serde_json::to_string(&u).ok())
            .map_or(std::ptr::null_mut(), into_c_string)
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Register `callback` for session transitions. Returns a non-zero id for
/// `sodam_session_unsubscribe`, or 0 if `session` or `callback` is null.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_session_subscribe(
    session: *const FfiSessionStore,
    callback: SodamSessionCallback,
    ctx: *mut c_void,
) -> u64 {
    let Some(callback) = callback else {
        return 0;
    };
    if session.is_null() {
        return 0;
    }
    catch_unwind(AssertUnwindSafe(|| {
        let ctx = HostContext(ctx);
        let id = unsafe { &*session }
            .inner
            .subscribe(move |state: &SessionState| {
                let user_json = state
                    .user()
                    .and_then(|u| serde_json::to_string(u).ok())
                    .and_then(|s| CString::new(s).ok());
                let ptr = user_json.as_ref().map_or(std::ptr::null(), |s| s.as_ptr());
                callback(ctx.get(), state.is_authenticated(), ptr);
            });
        id.as_u64()
    }))
    .unwrap_or(0)
}

/// Remove an observer. Returns false if `id` was not registered.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_session_unsubscribe(session: *const FfiSessionStore, id: u64) -> bool {
    if session.is_null() {
        return false;
    }
    catch_unwind(AssertUnwindSafe(|| {
        unsafe { &*session }
            .inner
            .unsubscribe(SubscriptionId::from_u64(id))
    }))
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Local checks
// ---------------------------------------------------------------------------

/// Check login fields before building a request. `Ok` with no data, or
/// `Validation` with the message to show.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_validate_login(
    username: *const c_char,
    password: *const c_char,
) -> *mut FfiResult {
    catch_unwind(|| {
        if username.is_null() || password.is_null() {
            return FfiResult::null_arg("username/password");
        }
        let (Some(username), Some(password)) = (read_str(username), read_str(password)) else {
            return FfiResult::invalid_arg("username/password");
        };
        match validate_login(username, password) {
            Ok(()) => FfiResult::ok_empty(),
            Err(e) => FfiResult::from_error(e.into()),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in sodam_validate_login"))
}

/// Check the sign-up form. On success `data_json` holds the register
/// payload, with the display name defaulted to the username.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_validate_sign_up(
    username: *const c_char,
    email: *const c_char,
    password: *const c_char,
    password_confirm: *const c_char,
) -> *mut FfiResult {
    catch_unwind(|| {
        if [username, email, password, password_confirm]
            .iter()
            .any(|p| p.is_null())
        {
            return FfiResult::null_arg("sign-up field");
        }
        let (Some(username), Some(email), Some(password), Some(confirm)) = (
            read_str(username),
            read_str(email),
            read_str(password),
            read_str(password_confirm),
        ) else {
            return FfiResult::invalid_arg("sign-up field");
        };
        let form = SignUpForm {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            password_confirm: confirm.to_string(),
        };
        if let Err(e) = form.validate() {
            return FfiResult::from_error(e.into());
        }
        match serde_json::to_string(&form.to_register_request()) {
            Ok(json) => FfiResult::ok_json(json),
            Err(e) => FfiResult::from_error(ApiError::Serialization(e.to_string())),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in sodam_validate_sign_up"))
}

/// Market code for a place name: a known code from the table, otherwise a
/// generated `{location}_{category}_{unix_seconds}` code. `category` may be
/// null for "전체". Returns null if `location` is null.
/// Free with `sodam_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_resolve_market_code(
    location: *const c_char,
    category: *const c_char,
) -> *mut c_char {
    catch_unwind(|| {
        let Some(location) = read_str(location) else {
            return std::ptr::null_mut();
        };
        let category = read_str(category).unwrap_or(Category::All.label());
        into_c_string(market_code_for(location, category).as_str().to_string())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `sodam_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.path.is_null() {
            drop(unsafe { CString::from_raw(req.path) });
        }
        if !req.body.is_null() {
            drop(unsafe { CString::from_raw(req.body) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers: Box<[FfiHeader]> = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiResult`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.data_json.is_null() {
            drop(unsafe { CString::from_raw(result.data_json) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn sodam_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
