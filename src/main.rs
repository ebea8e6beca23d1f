use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use surnames_core::{
    handle, ApiResponse, PgSurnameSource, Settings, SurnameError, SurnameRequest, SurnameSource,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type GenericError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Clone)]
struct AppState {
    settings: Arc<Settings>,
    source: Arc<dyn SurnameSource>,
}

#[tokio::main]
async fn main() -> Result<(), GenericError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let settings = Settings::from_env();
    if settings.database_url.is_none() {
        info!("DATABASE_URL is not set, GET requests will answer 500");
    }

    let state = AppState {
        settings: Arc::new(settings),
        source: Arc::new(PgSurnameSource),
    };

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(get_surnames))
        .route("/surnames", any(get_surnames))
        .with_state(state)
}

async fn get_surnames(
    State(state): State<AppState>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ApiReply, ApiError> {
    let mut request = SurnameRequest::new(method.as_str());
    if !params.is_empty() {
        request.query_string_parameters = Some(params);
    }

    let response = handle(&request, &state.settings, state.source.as_ref()).await?;
    Ok(ApiReply(response))
}

pub struct ApiReply(pub ApiResponse);

impl IntoResponse for ApiReply {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.0.body));
        *response.status_mut() =
            StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let headers = response.headers_mut();
        for (name, value) in self.0.headers {
            if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
                headers.insert(name, HeaderValue::from_static(value));
            }
        }
        response
    }
}

pub struct ApiError(pub SurnameError);

impl From<SurnameError> for ApiError {
    fn from(err: SurnameError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.0.to_string()
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
