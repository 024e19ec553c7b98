// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{http::HeaderName, routing::get, routing::post, Router};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{CreateFundResponse, FundCreateRequest, FundId},
    state::AppState,
};

pub mod funds;
pub mod health;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let routes = Router::new()
        .route("/funds", post(funds::create_fund))
        .route("/funds/{id}", get(funds::get_fund))
        .route("/funds/{id}/investors", get(funds::not_implemented))
        .route("/funds/{id}/capital-accounts", get(funds::not_implemented))
        .route(
            "/funds/{id}/capital-accounts/actions",
            get(funds::not_implemented),
        )
        .route("/funds/{id}/portfolios", get(funds::not_implemented))
        .route(
            "/funds/{id}/portfolios/actions",
            get(funds::not_implemented),
        )
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        funds::create_fund,
        funds::get_fund,
        funds::not_implemented,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            FundId,
            FundCreateRequest,
            CreateFundResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Funds", description = "Fund creation and lookup on the ledger"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
