//! Per-request query normalization.

use serde::{Deserialize, Serialize};
use std::fmt;

use logviewer_client::{SearchRequest, SortOrder};
use logviewer_config::constants::DEFAULT_DURATION_VALUE;

use crate::error::{EngineError, Result};
use crate::ledger::LedgerRequest;
use crate::services::ServiceGroup;

/// Unit of the relative time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    #[default]
    Hours,
    Minutes,
}

impl DurationUnit {
    /// Parse a query parameter: `minutes` selects minutes, anything else hours.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("minutes") => DurationUnit::Minutes,
            _ => DurationUnit::Hours,
        }
    }

    /// Date-math suffix.
    pub fn suffix(self) -> &'static str {
        match self {
            DurationUnit::Hours => "h",
            DurationUnit::Minutes => "m",
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationUnit::Hours => write!(f, "hours"),
            DurationUnit::Minutes => write!(f, "minutes"),
        }
    }
}

/// Parse a duration parameter, substituting the default for anything that is
/// not a positive integer.
pub fn parse_duration_value(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_DURATION_VALUE)
}

/// A validated search over one demand ID and a window ending now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub demand_id: String,
    pub duration_value: u32,
    pub duration_unit: DurationUnit,
    /// Add the SaaS group to the grouped view.
    pub include_saas: bool,
    /// Group selected by the merged view.
    pub group: ServiceGroup,
}

impl Query {
    /// Build a query with defaults for everything but the demand ID.
    pub fn new(demand_id: impl Into<String>) -> Result<Self> {
        let demand_id: String = demand_id.into();
        Self::normalize(&demand_id, None, None, false, None)
    }

    /// Normalize raw request parameters.
    ///
    /// Only a blank demand ID is rejected; every other parameter falls back
    /// to its default.
    pub fn normalize(
        demand_id: &str,
        duration: Option<&str>,
        unit: Option<&str>,
        include_saas: bool,
        tab: Option<&str>,
    ) -> Result<Self> {
        let demand_id = demand_id.trim();
        if demand_id.is_empty() {
            return Err(EngineError::MissingDemandId);
        }

        Ok(Self {
            demand_id: demand_id.to_string(),
            duration_value: parse_duration_value(duration),
            duration_unit: DurationUnit::from_param(unit),
            include_saas,
            group: ServiceGroup::from_tab(tab),
        })
    }

    /// Rebuild the grouped-view query a ledger entry recorded.
    pub fn from_ledger(request: &LedgerRequest) -> Result<Self> {
        let mut query = Self::new(request.demand_id.as_str())?;
        query.duration_value = if request.duration > 0 {
            request.duration
        } else {
            DEFAULT_DURATION_VALUE
        };
        query.duration_unit = request.unit;
        Ok(query)
    }

    pub fn with_duration(mut self, value: u32, unit: DurationUnit) -> Self {
        self.duration_value = if value > 0 { value } else { DEFAULT_DURATION_VALUE };
        self.duration_unit = unit;
        self
    }

    pub fn with_saas(mut self, include_saas: bool) -> Self {
        self.include_saas = include_saas;
        self
    }

    pub fn with_group(mut self, group: ServiceGroup) -> Self {
        self.group = group;
        self
    }

    /// Lower time bound in date-math form, e.g. `now-24h`.
    pub fn since(&self) -> String {
        format!("now-{}{}", self.duration_value, self.duration_unit.suffix())
    }

    /// Backend request for this query in the given sort order.
    pub fn search_request(&self, order: SortOrder) -> SearchRequest {
        SearchRequest::new(self.demand_id.clone(), self.since(), order)
    }

    /// The subset of the query recorded in the error ledger.
    pub fn ledger_request(&self) -> LedgerRequest {
        LedgerRequest {
            demand_id: self.demand_id.clone(),
            duration: self.duration_value,
            unit: self.duration_unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = Query::normalize("D-123", None, None, false, None).unwrap();
        assert_eq!(query.duration_value, 24);
        assert_eq!(query.duration_unit, DurationUnit::Hours);
        assert_eq!(query.group, ServiceGroup::Mp);
        assert_eq!(query.since(), "now-24h");
    }

    #[test]
    fn test_minutes() {
        let query = Query::normalize("D-123", Some("15"), Some("minutes"), false, None).unwrap();
        assert_eq!(query.since(), "now-15m");
    }

    #[test]
    fn test_invalid_duration_falls_back() {
        for raw in ["0", "-5", "abc", "", "12abc", "1.5"] {
            assert_eq!(parse_duration_value(Some(raw)), 24, "input {raw:?}");
        }
        assert_eq!(parse_duration_value(Some(" 6 ")), 6);
    }

    #[test]
    fn test_unknown_unit_is_hours() {
        assert_eq!(DurationUnit::from_param(Some("days")), DurationUnit::Hours);
        assert_eq!(DurationUnit::from_param(Some("minutes")), DurationUnit::Minutes);
    }

    #[test]
    fn test_blank_demand_id_rejected() {
        assert!(matches!(
            Query::normalize("   ", None, None, false, None),
            Err(EngineError::MissingDemandId)
        ));
    }

    #[test]
    fn test_demand_id_is_trimmed() {
        let query = Query::new("  D-9 ").unwrap();
        assert_eq!(query.demand_id, "D-9");
    }

    #[test]
    fn test_search_request_carries_window() {
        let query = Query::new("D-1").unwrap().with_duration(1, DurationUnit::Hours);
        let request = query.search_request(SortOrder::Asc);
        assert_eq!(request.keyword, "D-1");
        assert_eq!(request.since, "now-1h");
        assert_eq!(request.order, SortOrder::Asc);
        assert_eq!(request.size, 10_000);
    }

    #[test]
    fn test_ledger_round_trip() {
        let query = Query::normalize("D-7", Some("3"), Some("minutes"), true, Some("saas")).unwrap();
        let rebuilt = Query::from_ledger(&query.ledger_request()).unwrap();
        assert_eq!(rebuilt.demand_id, "D-7");
        assert_eq!(rebuilt.since(), "now-3m");
        // Replays always target the grouped view without SaaS.
        assert!(!rebuilt.include_saas);
    }
}
