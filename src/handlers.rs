use crate::config::Config;
use crate::errors::AppError;
use crate::models::{AddressForm, GeocodeQuery};
use crate::resolver::Resolver;
use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
///
/// Built once at startup; nothing in here is mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Resolver wired to the configured provider and API key.
    pub resolver: Resolver,
}

/// Landing page with the address lookup form.
const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Address Lookup</title>
    <style>
        body { font-family: sans-serif; max-width: 40rem; margin: 3rem auto; }
        label { display: block; margin-top: 1rem; }
        input, select { width: 100%; padding: 0.4rem; }
        button { margin-top: 1.5rem; padding: 0.5rem 1.5rem; }
    </style>
</head>
<body>
    <h1>Address Lookup</h1>
    <form action="/getAddressDetails" method="post">
        <label for="address">Address</label>
        <input type="text" id="address" name="address" required>
        <label for="type_format">Output format</label>
        <select id="type_format" name="type_format">
            <option value="json">JSON</option>
            <option value="xml">XML</option>
        </select>
        <button type="submit">Get details</button>
    </form>
</body>
</html>
"#;

/// GET /
///
/// Serves the static landing page.
pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "geocode-gateway",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /getAddressDetails
///
/// Resolves the submitted address and answers with the rendered document,
/// or with the plain-text error body. Missing form fields are a 400.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `form` - Form body with `address` and `type_format`.
pub async fn get_address_details(
    State(state): State<Arc<AppState>>,
    form: Result<Form<AddressForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return AppError::BadRequest(rejection.body_text()).into_response(),
    };

    let query = GeocodeQuery::from(form);
    tracing::info!(
        "POST /getAddressDetails - address: {}, format: {}",
        query.address,
        query.output_format
    );

    match state
        .resolver
        .resolve(&query)
        .await
        .and_then(|resolved| resolved.render())
    {
        Ok(body) => body.into_response(),
        Err(e) => e.into_response_with(state.config.error_status_mode),
    }
}

/// Any non-POST method on `/getAddressDetails`.
pub async fn method_not_allowed(State(state): State<Arc<AppState>>) -> Response {
    AppError::MethodNotAllowed.into_response_with(state.config.error_status_mode)
}
