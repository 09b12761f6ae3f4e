//! Static table of searchable services.
//!
//! Responsibilities:
//! - Describe every backend log source: short name, response key, index pattern.
//! - Carry group membership and summary role as data on each descriptor.
//!
//! Does NOT handle:
//! - Issuing searches (see `fanout.rs`).
//!
//! Invariants:
//! - Keys are unique; `ServiceRegistry::new` rejects duplicates.
//! - Registry order is the order of every per-service response sequence.

use std::collections::HashSet;

use crate::error::{EngineError, Result};

/// Partition of the service table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceGroup {
    /// Always queried. Fetch failures are surfaced and recorded.
    Mp,
    /// Queried on request. Fetch failures are swallowed.
    Saas,
}

impl ServiceGroup {
    /// Parse the `tab` selector: `saas` selects SaaS, anything else MP.
    pub fn from_tab(tab: Option<&str>) -> Self {
        match tab.map(str::trim) {
            Some(t) if t.eq_ignore_ascii_case("saas") => ServiceGroup::Saas,
            _ => ServiceGroup::Mp,
        }
    }

    /// Whether a failed search in this group is reported to the caller.
    pub fn reports_failures(self) -> bool {
        matches!(self, ServiceGroup::Mp)
    }
}

/// How a service is digested by the summary view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryRole {
    /// The demand workflow service: per-line event and field extraction.
    Workflow,
    /// A neighbour of the workflow: per-pod marker signals.
    Adjacent,
}

/// One backend log source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Short name, used as the `source` tag in the merged view.
    pub name: String,
    /// Response key, e.g. `wfmsLogs`. Stable; ledger entries reference it.
    pub key: String,
    pub index_pattern: String,
    pub group: ServiceGroup,
    pub summary: Option<SummaryRole>,
}

impl ServiceDescriptor {
    /// Describe a service whose key is `<name>Logs`.
    pub fn new(name: &str, index_pattern: &str, group: ServiceGroup) -> Self {
        Self {
            name: name.to_string(),
            key: format!("{name}Logs"),
            index_pattern: index_pattern.to_string(),
            group,
            summary: None,
        }
    }

    /// Attach a summary role.
    pub fn with_summary(mut self, role: SummaryRole) -> Self {
        self.summary = Some(role);
        self
    }
}

/// Ordered, immutable set of services.
#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    services: Vec<ServiceDescriptor>,
}

impl ServiceRegistry {
    /// Build a registry, rejecting duplicate keys.
    pub fn new(services: Vec<ServiceDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for service in &services {
            if !seen.insert(service.key.as_str()) {
                return Err(EngineError::InvalidRegistry(format!(
                    "duplicate service key {}",
                    service.key
                )));
            }
        }
        Ok(Self { services })
    }

    /// The production service table.
    pub fn standard() -> Self {
        use ServiceGroup::{Mp, Saas};

        let services = vec![
            ServiceDescriptor::new("wfms", "app-wfms-*", Mp).with_summary(SummaryRole::Workflow),
            ServiceDescriptor::new("pricing", "app-mp-pricing-*", Mp)
                .with_summary(SummaryRole::Adjacent),
            ServiceDescriptor::new("consigner", "app-consigner-agg-2*", Mp)
                .with_summary(SummaryRole::Adjacent),
            ServiceDescriptor::new("tesseract", "app-tesseract-2*", Mp)
                .with_summary(SummaryRole::Adjacent),
            ServiceDescriptor::new("odin", "app-odin-2*", Mp),
            ServiceDescriptor::new("raven", "app-raven-2*", Mp),
            ServiceDescriptor::new("ums", "app-ums-2*", Saas),
            ServiceDescriptor::new("argus", "app-argus-2*", Saas),
            ServiceDescriptor::new("shield", "app-shield-2*", Saas),
            ServiceDescriptor::new("oms", "app-oms-2*", Saas),
            ServiceDescriptor::new("payment", "app-payment-2*", Saas),
            ServiceDescriptor::new("mjolnir", "app-mjolnir-2*", Saas),
            ServiceDescriptor::new("ocms", "app-ocms-2*", Saas),
        ];

        Self { services }
    }

    /// Every service, in table order.
    pub fn all(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    /// Services queried by the grouped view: MP always, SaaS when requested.
    pub fn active(&self, include_saas: bool) -> Vec<&ServiceDescriptor> {
        self.services
            .iter()
            .filter(|s| include_saas || s.group == ServiceGroup::Mp)
            .collect()
    }

    /// Services of one group, in table order.
    pub fn group(&self, group: ServiceGroup) -> Vec<&ServiceDescriptor> {
        self.services.iter().filter(|s| s.group == group).collect()
    }

    /// Services that take part in the summary view.
    pub fn summary_services(&self) -> Vec<(&ServiceDescriptor, SummaryRole)> {
        self.services
            .iter()
            .filter_map(|s| s.summary.map(|role| (s, role)))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|s| s.key == key)
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(services: &[&ServiceDescriptor]) -> Vec<String> {
        services.iter().map(|s| s.key.clone()).collect()
    }

    #[test]
    fn test_standard_groups() {
        let registry = ServiceRegistry::standard();
        assert_eq!(
            keys(&registry.active(false)),
            vec![
                "wfmsLogs",
                "pricingLogs",
                "consignerLogs",
                "tesseractLogs",
                "odinLogs",
                "ravenLogs"
            ]
        );
        assert_eq!(registry.active(true).len(), 13);
        assert_eq!(registry.group(ServiceGroup::Saas).len(), 7);
        assert_eq!(registry.group(ServiceGroup::Saas)[0].name, "ums");
    }

    #[test]
    fn test_summary_services() {
        let registry = ServiceRegistry::standard();
        let summary: Vec<_> = registry
            .summary_services()
            .into_iter()
            .map(|(s, role)| (s.name.as_str(), role))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("wfms", SummaryRole::Workflow),
                ("pricing", SummaryRole::Adjacent),
                ("consigner", SummaryRole::Adjacent),
                ("tesseract", SummaryRole::Adjacent),
            ]
        );
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let err = ServiceRegistry::new(vec![
            ServiceDescriptor::new("wfms", "app-wfms-*", ServiceGroup::Mp),
            ServiceDescriptor::new("wfms", "app-wfms-2*", ServiceGroup::Saas),
        ])
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRegistry(_)));
    }

    #[test]
    fn test_standard_keys_are_unique() {
        assert!(ServiceRegistry::new(ServiceRegistry::standard().all().to_vec()).is_ok());
    }

    #[test]
    fn test_group_from_tab() {
        assert_eq!(ServiceGroup::from_tab(Some("saas")), ServiceGroup::Saas);
        assert_eq!(ServiceGroup::from_tab(Some("SaaS")), ServiceGroup::Saas);
        assert_eq!(ServiceGroup::from_tab(Some("mp")), ServiceGroup::Mp);
        assert_eq!(ServiceGroup::from_tab(Some("other")), ServiceGroup::Mp);
        assert_eq!(ServiceGroup::from_tab(None), ServiceGroup::Mp);
    }
}
