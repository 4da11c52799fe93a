#[cfg(feature = "server")]
pub mod http {
    use axum::{
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Json},
        routing::{get, post},
        Router,
    };
    use costing::{ElementFormulas, Engine, Estimate, UnknownReference, VariableTable};
    use serde::{Deserialize, Serialize};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;
    use tracing::{error, info};

    type SharedTable = Arc<VariableTable>;

    #[derive(Debug, Deserialize)]
    struct FormulaRequest {
        formula: String,
        /// Overrides the preloaded table for this request
        #[serde(default)]
        variables: Option<VariableTable>,
    }

    #[derive(Debug, Deserialize)]
    struct EstimateRequest {
        elements: Vec<ElementFormulas>,
        #[serde(default)]
        variables: Option<VariableTable>,
    }

    #[derive(Debug, Serialize)]
    struct EvaluateResponse {
        value: f64,
        unknown_references: Vec<UnknownReference>,
    }

    #[derive(Debug, Serialize)]
    struct CheckResponse {
        valid: bool,
        unknown_references: Vec<UnknownReference>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    }

    #[derive(Debug, Serialize)]
    struct FormulaResponse {
        formula: String,
    }

    #[derive(Debug, Serialize)]
    struct ErrorResponse {
        error: String,
    }

    pub fn router(table: VariableTable) -> Router {
        let shared_table = Arc::new(table);

        Router::new()
            .route("/health", get(health_check))
            .route("/evaluate", post(evaluate))
            .route("/check", post(check))
            .route("/display", post(display))
            .route("/storage", post(storage))
            .route("/estimate", post(estimate))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(shared_table)
    }

    pub async fn start_server(table: VariableTable, host: &str, port: u16) -> anyhow::Result<()> {
        let app = router(table);

        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        info!("Costing server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    async fn health_check() -> impl IntoResponse {
        Json(serde_json::json!({
            "status": "ok",
            "service": "costing",
            "version": env!("CARGO_PKG_VERSION")
        }))
    }

    /// The request's own table, or the preloaded one
    fn table_for<'a>(
        shared: &'a SharedTable,
        requested: &'a Option<VariableTable>,
    ) -> &'a VariableTable {
        requested.as_ref().unwrap_or(shared.as_ref())
    }

    async fn evaluate(
        State(shared): State<SharedTable>,
        Json(payload): Json<FormulaRequest>,
    ) -> impl IntoResponse {
        let table = table_for(&shared, &payload.variables);
        let engine = Engine::new();

        let value = engine.evaluate(&payload.formula, table);
        let unknown_references = engine.unknown_references(&payload.formula, table);
        info!(
            "Evaluated formula with {} variable(s): {}",
            table.len(),
            value
        );

        Json(EvaluateResponse {
            value,
            unknown_references,
        })
    }

    async fn check(
        State(shared): State<SharedTable>,
        Json(payload): Json<FormulaRequest>,
    ) -> impl IntoResponse {
        let table = table_for(&shared, &payload.variables);
        let report = Engine::new().check(&payload.formula, table);

        Json(CheckResponse {
            valid: report.is_valid(),
            error: report.error.as_ref().map(|e| e.to_string()),
            unknown_references: report.unknown,
        })
    }

    async fn display(
        State(shared): State<SharedTable>,
        Json(payload): Json<FormulaRequest>,
    ) -> impl IntoResponse {
        let table = table_for(&shared, &payload.variables);
        Json(FormulaResponse {
            formula: costing::to_display_form(&payload.formula, table),
        })
    }

    async fn storage(
        State(shared): State<SharedTable>,
        Json(payload): Json<FormulaRequest>,
    ) -> impl IntoResponse {
        let table = table_for(&shared, &payload.variables);
        Json(FormulaResponse {
            formula: costing::to_storage_form(&payload.formula, table),
        })
    }

    async fn estimate(
        State(shared): State<SharedTable>,
        Json(payload): Json<EstimateRequest>,
    ) -> Result<Json<Estimate>, (StatusCode, Json<ErrorResponse>)> {
        if payload.elements.is_empty() {
            error!("Estimate request without elements");
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Elements cannot be empty".to_string(),
                }),
            ));
        }

        let table = table_for(&shared, &payload.variables);
        let estimate = Engine::new().estimate(&payload.elements, table);
        info!(
            "Estimated {} element(s), total {}",
            estimate.elements.len(),
            estimate.total
        );

        Ok(Json(estimate))
    }

}

#[cfg(not(feature = "server"))]
pub mod http {
    pub async fn start_server(
        _table: costing::VariableTable,
        _host: &str,
        _port: u16,
    ) -> anyhow::Result<()> {
        anyhow::bail!("Server feature not enabled. Recompile with --features server")
    }
}
