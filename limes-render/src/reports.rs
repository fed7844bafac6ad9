//! Row layouts of the Limes reports
//!
//! Services are ordered by area and type, resources and rates by name, so
//! that output is stable regardless of the order Limes answers in.

use limes_core::reports::{
    ClusterResourceReport, ClusterServiceRates, ClusterServiceReport, DomainResourceReport,
    DomainServiceReport, ProjectResourceReport, ProjectServiceRates, ProjectServiceReport,
    RateReport,
};
use limes_core::{ClusterRatesReport, ClusterReport, DomainReport, ProjectRatesReport, ProjectReport};
use serde::Serialize;

use crate::value::{amount, number, signed_amount, text, timestamp};
use crate::{RenderOptions, Tabular};

/// Something a service entry is ordered by
trait ServiceKey {
    fn key(&self) -> (&str, &str);
}

macro_rules! service_key {
    ($($ty:ty),*) => {
        $(impl ServiceKey for $ty {
            fn key(&self) -> (&str, &str) {
                (self.area.as_str(), self.service_type.as_str())
            }
        })*
    };
}

service_key!(
    ClusterServiceReport,
    DomainServiceReport,
    ProjectServiceReport,
    ClusterServiceRates,
    ProjectServiceRates
);

fn sorted_services<S: ServiceKey>(services: &[S]) -> Vec<&S> {
    let mut sorted: Vec<&S> = services.iter().collect();
    sorted.sort_by(|a, b| a.key().cmp(&b.key()));
    sorted
}

fn sorted_by_name<'a, T>(items: &'a [T], name: impl Fn(&T) -> &str) -> Vec<&'a T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| name(*a).cmp(name(*b)));
    sorted
}

/// One report or a list of them, serialized as-is
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum OneOrMany<'a, T> {
    One(&'a T),
    Many(&'a [T]),
}

impl<T> Clone for OneOrMany<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for OneOrMany<'_, T> {}

impl<'a, T> OneOrMany<'a, T> {
    fn as_slice(self) -> &'a [T] {
        match self {
            Self::One(report) => std::slice::from_ref(report),
            Self::Many(reports) => reports,
        }
    }
}

const CLUSTER_HEADERS: &[&str] = &[
    "cluster id",
    "area",
    "service",
    "category",
    "resource",
    "capacity",
    "domains quota",
    "usage",
    "unit",
];

const SCRAPE_RANGE_HEADERS: &[&str] = &[
    "physical usage",
    "burst usage",
    "min scraped at",
    "max scraped at",
];

fn cluster_row(
    id: &str,
    srv: &ClusterServiceReport,
    res: &ClusterResourceReport,
    options: &RenderOptions,
) -> Vec<String> {
    let display = options.unit_mode.display_unit(
        res.unit,
        &[
            res.capacity,
            res.domains_quota,
            Some(res.usage),
            res.physical_usage,
            res.burst_usage,
        ],
    );

    let mut row = vec![
        id.to_string(),
        srv.area.clone(),
        srv.service_type.clone(),
        text(res.category.as_deref()),
        res.name.clone(),
        amount(res.capacity, res.unit, display),
        amount(res.domains_quota, res.unit, display),
        amount(Some(res.usage), res.unit, display),
        display.as_str().to_string(),
    ];
    if options.long {
        row.extend([
            amount(res.physical_usage, res.unit, display),
            amount(res.burst_usage, res.unit, display),
            timestamp(srv.min_scraped_at, options.format),
            timestamp(srv.max_scraped_at, options.format),
        ]);
    }
    row
}

impl Tabular for ClusterReport {
    fn headers(&self, long: bool) -> Vec<&'static str> {
        let mut headers = CLUSTER_HEADERS.to_vec();
        if long {
            headers.extend_from_slice(SCRAPE_RANGE_HEADERS);
        }
        headers
    }

    fn rows(&self, options: &RenderOptions) -> Vec<Vec<String>> {
        sorted_services(&self.services)
            .into_iter()
            .flat_map(|srv| {
                sorted_by_name(&srv.resources, |r| r.name.as_str())
                    .into_iter()
                    .map(move |res| cluster_row(&self.id, srv, res, options))
            })
            .collect()
    }
}

const DOMAIN_HEADERS: &[&str] = &[
    "domain id",
    "domain name",
    "area",
    "service",
    "category",
    "resource",
    "quota",
    "projects quota",
    "usage",
    "unit",
];

fn domain_row(
    domain: &DomainReport,
    srv: &DomainServiceReport,
    res: &DomainResourceReport,
    options: &RenderOptions,
) -> Vec<String> {
    let display = options.unit_mode.display_unit(
        res.unit,
        &[
            res.quota,
            res.projects_quota,
            Some(res.usage),
            res.physical_usage,
            res.burst_usage,
        ],
    );

    let mut row = vec![
        domain.id.clone(),
        domain.name.clone(),
        srv.area.clone(),
        srv.service_type.clone(),
        text(res.category.as_deref()),
        res.name.clone(),
        amount(res.quota, res.unit, display),
        amount(res.projects_quota, res.unit, display),
        amount(Some(res.usage), res.unit, display),
        display.as_str().to_string(),
    ];
    if options.long {
        row.extend([
            amount(res.physical_usage, res.unit, display),
            amount(res.burst_usage, res.unit, display),
            timestamp(srv.min_scraped_at, options.format),
            timestamp(srv.max_scraped_at, options.format),
        ]);
    }
    row
}

impl Tabular for [DomainReport] {
    fn headers(&self, long: bool) -> Vec<&'static str> {
        let mut headers = DOMAIN_HEADERS.to_vec();
        if long {
            headers.extend_from_slice(SCRAPE_RANGE_HEADERS);
        }
        headers
    }

    fn rows(&self, options: &RenderOptions) -> Vec<Vec<String>> {
        let mut domains: Vec<&DomainReport> = self.iter().collect();
        domains.sort_by(|a, b| a.name.cmp(&b.name));

        let mut rows = Vec::new();
        for domain in domains {
            for srv in sorted_services(&domain.services) {
                for res in sorted_by_name(&srv.resources, |r| r.name.as_str()) {
                    rows.push(domain_row(domain, srv, res, options));
                }
            }
        }
        rows
    }
}

impl Tabular for DomainReport {
    fn headers(&self, long: bool) -> Vec<&'static str> {
        std::slice::from_ref(self).headers(long)
    }

    fn rows(&self, options: &RenderOptions) -> Vec<Vec<String>> {
        std::slice::from_ref(self).rows(options)
    }
}

/// Project reports of one domain
///
/// Project reports do not name their domain, so the domain ID is carried
/// alongside for the `domain id` column. Serializes as the report itself
/// (or the list of reports).
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct ProjectReports<'a> {
    #[serde(skip)]
    domain_id: &'a str,
    reports: OneOrMany<'a, ProjectReport>,
}

impl<'a> ProjectReports<'a> {
    /// A single project
    #[must_use]
    pub const fn one(domain_id: &'a str, report: &'a ProjectReport) -> Self {
        Self {
            domain_id,
            reports: OneOrMany::One(report),
        }
    }

    /// All projects of a domain
    #[must_use]
    pub const fn many(domain_id: &'a str, reports: &'a [ProjectReport]) -> Self {
        Self {
            domain_id,
            reports: OneOrMany::Many(reports),
        }
    }
}

const PROJECT_HEADERS: &[&str] = &[
    "domain id",
    "project id",
    "project name",
    "area",
    "service",
    "category",
    "resource",
    "quota",
    "usage",
    "unit",
];

const PROJECT_LONG_HEADERS: &[&str] = &[
    "usable quota",
    "physical usage",
    "burst usage",
    "backend quota",
    "scraped at",
];

fn project_row(
    domain_id: &str,
    project: &ProjectReport,
    srv: &ProjectServiceReport,
    res: &ProjectResourceReport,
    options: &RenderOptions,
) -> Vec<String> {
    let display = options.unit_mode.display_unit(
        res.unit,
        &[
            res.quota,
            res.usable_quota,
            Some(res.usage),
            res.physical_usage,
            res.burst_usage,
        ],
    );

    let mut row = vec![
        domain_id.to_string(),
        project.id.clone(),
        project.name.clone(),
        srv.area.clone(),
        srv.service_type.clone(),
        text(res.category.as_deref()),
        res.name.clone(),
        amount(res.quota, res.unit, display),
        amount(Some(res.usage), res.unit, display),
        display.as_str().to_string(),
    ];
    if options.long {
        row.extend([
            amount(res.usable_quota, res.unit, display),
            amount(res.physical_usage, res.unit, display),
            amount(res.burst_usage, res.unit, display),
            signed_amount(res.backend_quota, res.unit, display),
            timestamp(srv.scraped_at, options.format),
        ]);
    }
    row
}

impl Tabular for ProjectReports<'_> {
    fn headers(&self, long: bool) -> Vec<&'static str> {
        let mut headers = PROJECT_HEADERS.to_vec();
        if long {
            headers.extend_from_slice(PROJECT_LONG_HEADERS);
        }
        headers
    }

    fn rows(&self, options: &RenderOptions) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        for project in sorted_by_name(self.reports.as_slice(), |p| p.name.as_str()) {
            for srv in sorted_services(&project.services) {
                for res in sorted_by_name(&srv.resources, |r| r.name.as_str()) {
                    rows.push(project_row(self.domain_id, project, srv, res, options));
                }
            }
        }
        rows
    }
}

fn rate_limit(rate: &RateReport) -> String {
    number(rate.limit)
}

impl Tabular for ClusterRatesReport {
    fn headers(&self, long: bool) -> Vec<&'static str> {
        let mut headers = vec!["cluster id", "area", "service", "rate", "limit", "window", "unit"];
        if long {
            headers.extend(["min scraped at", "max scraped at"]);
        }
        headers
    }

    fn rows(&self, options: &RenderOptions) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        for srv in sorted_services(&self.services) {
            for rate in sorted_by_name(&srv.rates, |r| r.name.as_str()) {
                let mut row = vec![
                    self.id.clone(),
                    srv.area.clone(),
                    srv.service_type.clone(),
                    rate.name.clone(),
                    rate_limit(rate),
                    text(rate.window.as_deref()),
                    rate.unit.as_str().to_string(),
                ];
                if options.long {
                    row.push(timestamp(srv.min_scraped_at, options.format));
                    row.push(timestamp(srv.max_scraped_at, options.format));
                }
                rows.push(row);
            }
        }
        rows
    }
}

/// Project rate reports of one domain, see [`ProjectReports`]
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct ProjectRatesReports<'a> {
    #[serde(skip)]
    domain_id: &'a str,
    reports: OneOrMany<'a, ProjectRatesReport>,
}

impl<'a> ProjectRatesReports<'a> {
    /// A single project
    #[must_use]
    pub const fn one(domain_id: &'a str, report: &'a ProjectRatesReport) -> Self {
        Self {
            domain_id,
            reports: OneOrMany::One(report),
        }
    }

    /// All projects of a domain
    #[must_use]
    pub const fn many(domain_id: &'a str, reports: &'a [ProjectRatesReport]) -> Self {
        Self {
            domain_id,
            reports: OneOrMany::Many(reports),
        }
    }
}

impl Tabular for ProjectRatesReports<'_> {
    fn headers(&self, long: bool) -> Vec<&'static str> {
        let mut headers = vec![
            "domain id",
            "project id",
            "project name",
            "area",
            "service",
            "rate",
            "limit",
            "window",
            "usage",
            "unit",
        ];
        if long {
            headers.extend(["default limit", "default window", "scraped at"]);
        }
        headers
    }

    fn rows(&self, options: &RenderOptions) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        for project in sorted_by_name(self.reports.as_slice(), |p| p.name.as_str()) {
            for srv in sorted_services(&project.services) {
                for rate in sorted_by_name(&srv.rates, |r| r.name.as_str()) {
                    let mut row = vec![
                        self.domain_id.to_string(),
                        project.id.clone(),
                        project.name.clone(),
                        srv.area.clone(),
                        srv.service_type.clone(),
                        rate.name.clone(),
                        rate_limit(rate),
                        text(rate.window.as_deref()),
                        text(rate.usage_as_bigint.as_deref()),
                        rate.unit.as_str().to_string(),
                    ];
                    if options.long {
                        row.push(number(rate.default_limit));
                        row.push(text(rate.default_window.as_deref()));
                        row.push(timestamp(srv.scraped_at, options.format));
                    }
                    rows.push(row);
                }
            }
        }
        rows
    }
}
