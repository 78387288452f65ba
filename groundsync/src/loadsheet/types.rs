//! Loadsheet request and result types.

use std::fmt;

/// Which loadsheet to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadsheetKind {
    Preliminary,
    Final,
}

impl LoadsheetKind {
    /// Path segment of the aircraft's loadsheet endpoint.
    pub fn path(self) -> &'static str {
        match self {
            LoadsheetKind::Preliminary => "preliminary",
            LoadsheetKind::Final => "final",
        }
    }
}

impl fmt::Display for LoadsheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Outcome of a single generation attempt.
///
/// | outcome            | success | status_code | error_message | response_body |
/// |--------------------|---------|-------------|---------------|---------------|
/// | accepted           | true    | Some        | None          | maybe         |
/// | HTTP failure       | false   | Some        | Some          | maybe         |
/// | transport failure  | false   | None        | Some          | None          |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadsheetResult {
    pub success: bool,
    pub status_code: Option<u16>,
    pub error_message: Option<String>,
    pub response_body: Option<String>,
}

impl LoadsheetResult {
    pub fn accepted(status_code: u16, body: Option<String>) -> Self {
        Self {
            success: true,
            status_code: Some(status_code),
            error_message: None,
            response_body: body,
        }
    }

    pub fn http_failure(
        status_code: u16,
        message: impl Into<String>,
        body: Option<String>,
    ) -> Self {
        Self {
            success: false,
            status_code: Some(status_code),
            error_message: Some(message.into()),
            response_body: body,
        }
    }

    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: None,
            error_message: Some(message.into()),
            response_body: None,
        }
    }

    /// Operator-facing hint for a failed attempt.
    pub fn guidance(&self) -> Option<&'static str> {
        if self.success {
            return None;
        }
        Some(match self.status_code {
            None => "Aircraft interface unreachable; check that the aircraft is loaded and its bridge is running",
            Some(400) => "Loadsheet request rejected; check that the flight plan has been imported into the EFB",
            Some(401) | Some(403) => "Loadsheet endpoint refused access; check the aircraft interface credentials",
            Some(404) => "Loadsheet endpoint not found; the aircraft version may not support loadsheets",
            Some(409) => "Loadsheet already being generated or flight plan changed; retry shortly",
            Some(code) if code >= 500 => "Aircraft interface internal error; retry after the systems settle",
            Some(_) => "Unexpected loadsheet response; see the response body in the log",
        })
    }
}

/// A finished attempt delivered back to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadsheetOutcome {
    pub kind: LoadsheetKind,
    pub result: LoadsheetResult,
}
