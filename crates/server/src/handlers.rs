use axum::Json;
use axum::extract::{Query as QueryParams, State};
use serde::Deserialize;
use serde_json::{Value, json};

use logviewer_engine::{
    FetchReport, LedgerEntry, LedgerRequest, LogsResponse, MergedLogEntry, Query, RecheckStatus,
    SummaryReport,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Query string shared by the log views. Every field is optional on the
/// wire; normalization decides the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogParams {
    pub demand_id: Option<String>,
    pub duration: Option<String>,
    pub unit: Option<String>,
    pub include_ums: Option<String>,
    pub tab: Option<String>,
}

impl LogParams {
    fn to_query(&self) -> Result<Query, ApiError> {
        let include_saas = self.include_ums.as_deref() == Some("true");
        Ok(Query::normalize(
            self.demand_id.as_deref().unwrap_or(""),
            self.duration.as_deref(),
            self.unit.as_deref(),
            include_saas,
            self.tab.as_deref(),
        )?)
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedResponse {
    pub merged_logs: Vec<MergedLogEntry>,
}

/// Recheck accepts a whole ledger entry or just its `request` object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecheckBody {
    Entry { request: LedgerRequest },
    Request(LedgerRequest),
}

impl RecheckBody {
    fn request(&self) -> &LedgerRequest {
        match self {
            RecheckBody::Entry { request } | RecheckBody::Request(request) => request,
        }
    }
}

pub async fn logs(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<LogParams>,
) -> Result<Json<LogsResponse>, ApiError> {
    let query = params.to_query()?;
    let report: FetchReport = state.engine.fetch_all(&query).await?;
    Ok(Json(report.into_response()))
}

pub async fn summary(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<LogParams>,
) -> Result<Json<SummaryReport>, ApiError> {
    let query = params.to_query()?;
    Ok(Json(state.engine.summary(&query).await))
}

pub async fn merged(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<LogParams>,
) -> Result<Json<MergedResponse>, ApiError> {
    let query = params.to_query()?;
    let merged_logs = state.engine.merge(&query).await;
    Ok(Json(MergedResponse { merged_logs }))
}

pub async fn error_logs(State(state): State<AppState>) -> Result<Json<Vec<LedgerEntry>>, ApiError> {
    Ok(Json(state.engine.ledger().list_all().await?))
}

pub async fn recheck(
    State(state): State<AppState>,
    Json(body): Json<RecheckBody>,
) -> Json<RecheckStatus> {
    Json(state.engine.recheck(body.request()).await)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_default_to_mp_hours() {
        let params = LogParams {
            demand_id: Some("D-1".into()),
            ..Default::default()
        };
        let query = params.to_query().unwrap();
        assert_eq!(query.since(), "now-24h");
        assert!(!query.include_saas);
    }

    #[test]
    fn test_include_ums_requires_literal_true() {
        let mut params = LogParams {
            demand_id: Some("D-1".into()),
            include_ums: Some("yes".into()),
            ..Default::default()
        };
        assert!(!params.to_query().unwrap().include_saas);
        params.include_ums = Some("true".into());
        assert!(params.to_query().unwrap().include_saas);
    }

    #[test]
    fn test_missing_demand_id_is_bad_request() {
        let err = LogParams::default().to_query().unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_recheck_body_shapes() {
        let entry: RecheckBody = serde_json::from_value(json!({
            "timestamp": "2024-01-01T00:00:00.000Z",
            "request": {"demandId": "D-1", "duration": "2", "unit": "minutes"},
            "errors": []
        }))
        .unwrap();
        assert_eq!(entry.request().duration, 2);

        let bare: RecheckBody =
            serde_json::from_value(json!({"demandId": "D-2", "duration": 5, "unit": "hours"}))
                .unwrap();
        assert_eq!(bare.request().demand_id, "D-2");
    }
}
