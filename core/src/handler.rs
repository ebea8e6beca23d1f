use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::Settings;
use crate::error::SurnameError;
use crate::model::SurnameList;
use crate::query::SurnameQuery;
use crate::store::SurnameSource;

/// The part of an inbound proxy event the endpoint looks at.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SurnameRequest {
    #[serde(default = "default_method")]
    pub http_method: String,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl SurnameRequest {
    pub fn new(http_method: impl Into<String>) -> Self {
        Self {
            http_method: http_method.into(),
            query_string_parameters: None,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<&'static str, &'static str>,
    pub is_base64_encoded: bool,
    pub body: String,
}

impl ApiResponse {
    pub fn preflight() -> Self {
        let headers = BTreeMap::from([
            ("Access-Control-Allow-Origin", "*"),
            ("Access-Control-Allow-Methods", "GET, OPTIONS"),
            ("Access-Control-Allow-Headers", "Content-Type"),
            ("Access-Control-Max-Age", "86400"),
        ]);

        Self {
            status_code: 200,
            headers,
            is_base64_encoded: false,
            body: String::new(),
        }
    }

    pub fn json<T: Serialize>(status_code: u16, body: &T) -> Result<Self, serde_json::Error> {
        let headers = BTreeMap::from([
            ("Content-Type", "application/json"),
            ("Access-Control-Allow-Origin", "*"),
        ]);

        Ok(Self {
            status_code,
            headers,
            is_base64_encoded: false,
            body: serde_json::to_string(body)?,
        })
    }

    /// `{"error": "<message>"}` for errors the endpoint answers itself.
    pub fn from_error(err: &SurnameError) -> Option<Self> {
        let status = err.status()?;
        let body = serde_json::json!({ "error": err.to_string() });
        // A json! value always serializes.
        Self::json(status, &body).ok()
    }
}

/// Answers one request. Method and configuration problems come back as
/// JSON error responses, database faults are returned as `Err`.
pub async fn handle<S>(
    request: &SurnameRequest,
    settings: &Settings,
    source: &S,
) -> Result<ApiResponse, SurnameError>
where
    S: SurnameSource + ?Sized,
{
    match respond(request, settings, source).await {
        Ok(response) => Ok(response),
        Err(err) => match ApiResponse::from_error(&err) {
            Some(response) => {
                info!(method = %request.http_method, status = response.status_code, "{}", err);
                Ok(response)
            }
            None => {
                error!(method = %request.http_method, error = %err, "surname lookup failed");
                Err(err)
            }
        },
    }
}

async fn respond<S>(
    request: &SurnameRequest,
    settings: &Settings,
    source: &S,
) -> Result<ApiResponse, SurnameError>
where
    S: SurnameSource + ?Sized,
{
    match request.http_method.as_str() {
        "OPTIONS" => return Ok(ApiResponse::preflight()),
        "GET" => {}
        _ => return Err(SurnameError::MethodNotAllowed),
    }

    let database_url = settings
        .database_url
        .as_deref()
        .ok_or(SurnameError::DatabaseUrlMissing)?;

    let query = SurnameQuery::from_params(request.query_string_parameters.as_ref());
    info!(kind = query.kind(), "fetching surnames");

    let list = SurnameList::from(source.fetch(database_url, &query).await?);
    Ok(ApiResponse::json(200, &list)?)
}
