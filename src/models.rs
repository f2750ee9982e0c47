use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::DataError;

/// Service state as reported by statusjson.cgi. The wire codes are the
/// bitmask values Nagios uses for service states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    Warning,
    Critical,
    Unknown,
    Pending,
}

impl StatusCode {
    pub fn from_wire(code: i64) -> Result<Self, DataError> {
        match code {
            2 => Ok(StatusCode::Ok),
            4 => Ok(StatusCode::Warning),
            16 => Ok(StatusCode::Critical),
            8 => Ok(StatusCode::Unknown),
            1 => Ok(StatusCode::Pending),
            other => Err(DataError::UnknownStatusCode(other)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Warning => "Warning",
            StatusCode::Critical => "Critical",
            StatusCode::Unknown => "Unknown",
            StatusCode::Pending => "Pending",
        }
    }

    /// Table cell background color for this state.
    pub fn bgcolor(self) -> &'static str {
        match self {
            StatusCode::Ok => "#2BE043",
            StatusCode::Warning => "#F2ED4E",
            StatusCode::Critical => "#E34040",
            StatusCode::Unknown | StatusCode::Pending => "#000",
        }
    }
}

/// One monitored check on a host. `status` is kept as the raw wire code;
/// it is mapped to a [`StatusCode`] at render time so a bad code fails
/// the whole report rather than the decode of unrelated records.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceRecord {
    pub status: i64,
    /// Milliseconds since the epoch.
    pub last_check: i64,
    pub plugin_output: String,
}

/// Host -> service -> record, in the exact order the server sent them.
/// No sorting is applied; display order follows the payload.
pub type ServiceList = IndexMap<String, IndexMap<String, ServiceRecord>>;

#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub data: StatusData,
}

#[derive(Debug, Deserialize)]
pub struct StatusData {
    pub servicelist: Option<ServiceList>,
}
