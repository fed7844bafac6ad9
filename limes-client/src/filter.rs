//! Report filters

use reqwest::Url;

/// Restricts which parts of a report Limes returns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Only these areas
    pub areas: Vec<String>,
    /// Only these service types
    pub services: Vec<String>,
    /// Only these resources (or rates)
    pub resources: Vec<String>,
    /// Include subresources/subcapacities
    pub detail: bool,
}

impl ReportFilter {
    /// Key-value query pairs, e.g. `service=compute&resource=cores`
    ///
    /// The `detail` flag has no value and is only added by
    /// [`ReportFilter::apply_to`].
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = Vec::new();
        pairs.extend(self.areas.iter().map(|a| ("area", a.clone())));
        pairs.extend(self.services.iter().map(|s| ("service", s.clone())));
        pairs.extend(self.resources.iter().map(|r| ("resource", r.clone())));
        pairs
    }

    /// Append the filter to a request URL, with `detail` as a bare key
    pub fn apply_to(&self, url: &mut Url) {
        let pairs = self.query_pairs();
        if pairs.is_empty() && !self.detail {
            return;
        }

        let mut query = url.query_pairs_mut();
        for (key, value) in &pairs {
            query.append_pair(key, value);
        }
        if self.detail {
            query.append_key_only("detail");
        }
    }

    /// Same filter without the resource restriction, for the rates API
    #[must_use]
    pub fn for_rates(&self) -> Self {
        Self {
            resources: Vec::new(),
            detail: false,
            ..self.clone()
        }
    }

    /// Whether a service entry passes the area/service restriction
    ///
    /// Limes applies the filter server-side; this is the equivalent check
    /// for in-memory reports.
    #[must_use]
    pub fn accepts_service(&self, area: &str, service_type: &str) -> bool {
        (self.areas.is_empty() || self.areas.iter().any(|a| a == area))
            && (self.services.is_empty() || self.services.iter().any(|s| s == service_type))
    }

    /// Whether a resource entry passes the resource restriction
    #[must_use]
    pub fn accepts_resource(&self, name: &str) -> bool {
        self.resources.is_empty() || self.resources.iter().any(|r| r == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter() {
        let filter = ReportFilter::default();
        assert!(filter.query_pairs().is_empty());
        assert!(filter.accepts_service("compute", "compute"));
        assert!(filter.accepts_resource("cores"));
    }

    #[test]
    fn query_pairs_repeat_keys() {
        let filter = ReportFilter {
            areas: vec!["storage".to_string()],
            services: vec!["compute".to_string(), "network".to_string()],
            resources: vec!["cores".to_string()],
            detail: true,
        };
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("area", "storage".to_string()),
                ("service", "compute".to_string()),
                ("service", "network".to_string()),
                ("resource", "cores".to_string()),
            ]
        );
        assert!(filter.for_rates().query_pairs().len() == 3);
    }

    #[test]
    fn detail_is_a_bare_key() {
        let filter = ReportFilter {
            services: vec!["compute".to_string()],
            detail: true,
            ..Default::default()
        };
        let mut url = Url::parse("https://limes.example.com/v1/clusters/current").unwrap();
        filter.apply_to(&mut url);
        assert_eq!(url.query(), Some("service=compute&detail"));

        let mut url = Url::parse("https://limes.example.com/v1/domains").unwrap();
        ReportFilter::default().apply_to(&mut url);
        assert_eq!(url.as_str(), "https://limes.example.com/v1/domains");

        let mut url = Url::parse("https://limes.example.com/v1/domains").unwrap();
        filter.for_rates().apply_to(&mut url);
        assert_eq!(url.query(), Some("service=compute"));
    }

    #[test]
    fn in_memory_matching() {
        let filter = ReportFilter {
            services: vec!["compute".to_string()],
            resources: vec!["ram".to_string()],
            ..Default::default()
        };
        assert!(filter.accepts_service("compute", "compute"));
        assert!(!filter.accepts_service("network", "network"));
        assert!(filter.accepts_resource("ram"));
        assert!(!filter.accepts_resource("cores"));
    }
}
