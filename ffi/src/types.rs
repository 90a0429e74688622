//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Typed payloads cross the boundary as
//! normalized JSON strings rather than per-feature C structs. Conversion
//! helpers live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use sodam_core::error::ApiError;
use sodam_core::http::HttpMethod;
use sodam_core::Endpoint;

/// Opaque handle to a `SodamClient`. C callers receive a pointer to this
/// and pass it back into every build and parse function.
pub struct FfiSodamClient {
    pub(crate) inner: sodam_core::SodamClient,
}

/// Opaque handle to a `SessionStore`.
pub struct FfiSessionStore {
    pub(crate) inner: sodam_core::SessionStore,
}

/// Copy `s` into a heap C string owned by the caller. Interior NULs cannot
/// occur in URLs or serialized JSON; anything else carrying one comes back
/// empty.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request the host executes itself.
///
/// Built by the `sodam_build_*` functions; `path` is the absolute URL. The
/// host passes the answer back through `sodam_parse_response`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Move a core `HttpRequest` onto the heap as an `FfiHttpRequest`.
    pub(crate) fn from_core(req: sodam_core::HttpRequest) -> *mut Self {
        let path = into_c_string(req.path);
        let body = match req.body {
            Some(b) => into_c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: into_c_string(k),
                    value: into_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response as the host received it.
///
/// The host builds this on its own stack and passes a pointer in. The FFI
/// layer reads but never frees these fields. A null `body` reads as empty.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// Every API operation, for `sodam_build_request` and `sodam_parse_response`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiEndpoint {
    Login = 0,
    Register = 1,
    FootTraffic = 2,
    CardSales = 3,
    SameIndustry = 4,
    BusinessRates = 5,
    DwellTime = 6,
    HealthScore = 7,
    ComprehensiveDiagnosis = 8,
    ClassifyRisk = 9,
    RiskDetailedAnalysis = 10,
    RiskTypes = 11,
    MitigationStrategies = 12,
    GenerateStrategyCards = 13,
    StrategyChecklist = 14,
    StrategySuccessCases = 15,
    StrategyTemplates = 16,
    StrategyCategories = 17,
    SupportCenters = 18,
    ExpertConsultation = 19,
    PolicyRecommendations = 20,
    SupportSuccessCases = 21,
    BookConsultation = 22,
    ApplyPolicy = 23,
    MapHeatmap = 24,
    MapRadiusAnalysis = 25,
    MapClusterAnalysis = 26,
    MapTrafficFlow = 27,
    MapAccessibility = 28,
    MapAnalysisTypes = 29,
}

impl From<FfiEndpoint> for Endpoint {
    fn from(e: FfiEndpoint) -> Self {
        match e {
            FfiEndpoint::Login => Endpoint::AuthLogin,
            FfiEndpoint::Register => Endpoint::AuthRegister,
            FfiEndpoint::FootTraffic => Endpoint::FootTraffic,
            FfiEndpoint::CardSales => Endpoint::CardSales,
            FfiEndpoint::SameIndustry => Endpoint::SameIndustry,
            FfiEndpoint::BusinessRates => Endpoint::BusinessRates,
            FfiEndpoint::DwellTime => Endpoint::DwellTime,
            FfiEndpoint::HealthScore => Endpoint::HealthScore,
            FfiEndpoint::ComprehensiveDiagnosis => Endpoint::ComprehensiveDiagnosis,
            FfiEndpoint::ClassifyRisk => Endpoint::RiskClassify,
            FfiEndpoint::RiskDetailedAnalysis => Endpoint::RiskDetailedAnalysis,
            FfiEndpoint::RiskTypes => Endpoint::RiskTypes,
            FfiEndpoint::MitigationStrategies => Endpoint::MitigationStrategies,
            FfiEndpoint::GenerateStrategyCards => Endpoint::StrategyCardsGenerate,
            FfiEndpoint::StrategyChecklist => Endpoint::StrategyCardsChecklist,
            FfiEndpoint::StrategySuccessCases => Endpoint::StrategyCardsSuccessCases,
            FfiEndpoint::StrategyTemplates => Endpoint::StrategyCardsTemplates,
            FfiEndpoint::StrategyCategories => Endpoint::StrategyCardsCategories,
            FfiEndpoint::SupportCenters => Endpoint::SupportCenters,
            FfiEndpoint::ExpertConsultation => Endpoint::ExpertConsultation,
            FfiEndpoint::PolicyRecommendations => Endpoint::PolicyRecommendations,
            FfiEndpoint::SupportSuccessCases => Endpoint::SupportSuccessCases,
            FfiEndpoint::BookConsultation => Endpoint::ConsultationBooking,
            FfiEndpoint::ApplyPolicy => Endpoint::PolicyApplication,
            FfiEndpoint::MapHeatmap => Endpoint::MapHeatmap,
            FfiEndpoint::MapRadiusAnalysis => Endpoint::MapRadiusAnalysis,
            FfiEndpoint::MapClusterAnalysis => Endpoint::MapClusterAnalysis,
            FfiEndpoint::MapTrafficFlow => Endpoint::MapTrafficFlow,
            FfiEndpoint::MapAccessibility => Endpoint::MapAccessibility,
            FfiEndpoint::MapAnalysisTypes => Endpoint::MapAnalysisTypes,
        }
    }
}

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidTarget = 1,
    Http = 2,
    Deserialization = 3,
    Serialization = 4,
    Panic = 5,
    NullArg = 6,
    InvalidArg = 7,
    Transport = 8,
    InvalidResponse = 9,
    Validation = 10,
    AuthRejected = 11,
}

/// Result envelope for parse, session and validation calls.
///
/// On success `error_code` is `Ok`, `error_message` is null, and
/// `data_json` holds the payload as JSON (null when there is none).
/// On failure `error_code` names the category, `error_message` is the
/// message to show the user, and `data_json` is null. `http_status` is set
/// whenever the server answered outside 2xx.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_json: *mut c_char,
}

impl FfiResult {
    fn boxed(
        error_code: FfiErrorCode,
        message: Option<String>,
        http_status: u16,
        data: Option<String>,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code,
            error_message: message.map_or(std::ptr::null_mut(), into_c_string),
            http_status,
            data_json: data.map_or(std::ptr::null_mut(), into_c_string),
        }))
    }

    pub(crate) fn ok_json(json: String) -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, None, 0, Some(json))
    }

    pub(crate) fn ok_empty() -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, None, 0, None)
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let error_code = match &err {
            ApiError::InvalidTarget(_) => FfiErrorCode::InvalidTarget,
            ApiError::InvalidResponse(_) => FfiErrorCode::InvalidResponse,
            ApiError::Http { .. } => FfiErrorCode::Http,
            ApiError::Transport(_) => FfiErrorCode::Transport,
            ApiError::Deserialization(_) => FfiErrorCode::Deserialization,
            ApiError::Serialization(_) => FfiErrorCode::Serialization,
            ApiError::Validation(_) => FfiErrorCode::Validation,
            ApiError::AuthRejected(_) => FfiErrorCode::AuthRejected,
        };
        tracing::debug!(error = %err, "returning error across FFI");
        Self::boxed(
            error_code,
            Some(err.user_message()),
            err.status().unwrap_or(0),
            None,
        )
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        let msg = format!("null argument: {name}");
        Self::boxed(FfiErrorCode::NullArg, Some(msg), 0, None)
    }

    pub(crate) fn invalid_arg(name: &str) -> *mut Self {
        let msg = format!("invalid argument: {name}");
        Self::boxed(FfiErrorCode::InvalidArg, Some(msg), 0, None)
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, Some(msg.to_string()), 0, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ffi_endpoints_cover_every_core_endpoint() {
        let all = [
            FfiEndpoint::Login,
            FfiEndpoint::Register,
            FfiEndpoint::FootTraffic,
            FfiEndpoint::CardSales,
            FfiEndpoint::SameIndustry,
            FfiEndpoint::BusinessRates,
            FfiEndpoint::DwellTime,
            FfiEndpoint::HealthScore,
            FfiEndpoint::ComprehensiveDiagnosis,
            FfiEndpoint::ClassifyRisk,
            FfiEndpoint::RiskDetailedAnalysis,
            FfiEndpoint::RiskTypes,
            FfiEndpoint::MitigationStrategies,
            FfiEndpoint::GenerateStrategyCards,
            FfiEndpoint::StrategyChecklist,
            FfiEndpoint::StrategySuccessCases,
            FfiEndpoint::StrategyTemplates,
            FfiEndpoint::StrategyCategories,
            FfiEndpoint::SupportCenters,
            FfiEndpoint::ExpertConsultation,
            FfiEndpoint::PolicyRecommendations,
            FfiEndpoint::SupportSuccessCases,
            FfiEndpoint::BookConsultation,
            FfiEndpoint::ApplyPolicy,
            FfiEndpoint::MapHeatmap,
            FfiEndpoint::MapRadiusAnalysis,
            FfiEndpoint::MapClusterAnalysis,
            FfiEndpoint::MapTrafficFlow,
            FfiEndpoint::MapAccessibility,
            FfiEndpoint::MapAnalysisTypes,
        ];
        for (i, e) in all.iter().enumerate() {
            assert_eq!(*e as usize, i);
            assert_eq!(Endpoint::from(*e), Endpoint::ALL[i], "{e:?}");
        }
    }

    #[test]
    fn error_result_carries_status_and_message() {
        let result = FfiResult::from_error(ApiError::Http {
            status: 401,
            body: String::new(),
        });
        let r = unsafe { Box::from_raw(result) };
        assert_eq!(r.error_code, FfiErrorCode::Http);
        assert_eq!(r.http_status, 401);
        assert!(r.data_json.is_null());
        let msg = unsafe { CString::from_raw(r.error_message) };
        assert!(!msg.as_bytes().is_empty());
    }

    #[test]
    fn interior_nul_becomes_empty_string() {
        let ptr = into_c_string("a\0b".to_string());
        let s = unsafe { CString::from_raw(ptr) };
        assert!(s.as_bytes().is_empty());
    }
}
