use limes_core::reports::{ClusterEnvelope, DomainsEnvelope, ProjectEnvelope};
use limes_core::{ClusterRatesReport, ClusterReport, DomainReport, ProjectRatesReport, ProjectReport, Unit};
use limes_render::*;

fn cluster() -> ClusterReport {
    let envelope: ClusterEnvelope<ClusterReport> = serde_json::from_str(
        r#"{"cluster": {"id": "current", "services": [
            {"type": "compute", "area": "compute", "min_scraped_at": 1700000000, "max_scraped_at": 1700000100,
             "resources": [
                {"name": "ram", "unit": "MiB", "capacity": 4194304, "domains_quota": 2097152, "usage": 1536},
                {"name": "cores", "category": "vm", "capacity": 1000, "domains_quota": 600, "usage": 250}
             ]},
            {"type": "block-storage", "area": "storage", "resources": [
                {"name": "capacity", "unit": "GiB", "usage": 0}
            ]}
        ]}}"#,
    )
    .unwrap();
    envelope.cluster
}

fn project() -> ProjectReport {
    let envelope: ProjectEnvelope<ProjectReport> = serde_json::from_str(
        r#"{"project": {"id": "p1", "name": "demo", "services": [
            {"type": "compute", "area": "compute", "scraped_at": 1700000000, "resources": [
                {"name": "ram", "unit": "MiB", "quota": 20480, "usable_quota": 24576, "usage": 1024, "backend_quota": -1},
                {"name": "cores", "quota": 10, "usage": 11, "burst_usage": 1}
            ]}
        ]}}"#,
    )
    .unwrap();
    envelope.project
}

fn render_string<T: Tabular + ?Sized>(report: &T, options: RenderOptions) -> String {
    let mut out = Vec::new();
    render(&mut out, report, &options).unwrap();
    String::from_utf8(out).unwrap()
}

fn csv(long: bool, unit_mode: UnitMode) -> RenderOptions {
    RenderOptions {
        format: OutputFormat::Csv,
        long,
        unit_mode,
    }
}

#[test]
fn test_cluster_csv_is_sorted() {
    let out = render_string(&cluster(), csv(false, UnitMode::Native));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "cluster id,area,service,category,resource,capacity,domains quota,usage,unit",
            "current,compute,compute,vm,cores,1000,600,250,",
            "current,compute,compute,,ram,4194304,2097152,1536,MiB",
            "current,storage,block-storage,,capacity,,,0,GiB",
        ]
    );
}

#[test]
fn test_cluster_long_csv_has_raw_timestamps() {
    let out = render_string(&cluster(), csv(true, UnitMode::Native));
    assert!(out.lines().next().unwrap().ends_with("physical usage,burst usage,min scraped at,max scraped at"));
    assert!(out.contains("current,compute,compute,vm,cores,1000,600,250,,,,1700000000,1700000100"));
}

#[test]
fn test_cluster_table_has_rfc3339_timestamps() {
    let options = RenderOptions {
        format: OutputFormat::Table,
        long: true,
        unit_mode: UnitMode::Native,
    };
    let out = render_string(&cluster(), options);
    assert!(out.contains("2023-11-14T22:13:20Z"));
    assert!(out.contains("domains quota"));
}

#[test]
fn test_humanized_values() {
    let out = render_string(&cluster(), csv(false, UnitMode::Humanize));
    // largest value of the row is 4194304 MiB = 4 TiB
    assert!(out.contains("current,compute,compute,,ram,4,2,0,TiB"));
    assert!(out.contains("current,compute,compute,vm,cores,1000,600,250,"));
}

#[test]
fn test_fixed_unit() {
    let out = render_string(&cluster(), csv(false, UnitMode::Fixed(Unit::Gibibytes)));
    assert!(out.contains("current,compute,compute,,ram,4096,2048,1.5,GiB"));
}

#[test]
fn test_project_rows() {
    let report = project();
    let out = render_string(&ProjectReports::one("d1", &report), csv(true, UnitMode::Native));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines[0],
        "domain id,project id,project name,area,service,category,resource,quota,usage,unit,\
         usable quota,physical usage,burst usage,backend quota,scraped at"
    );
    assert_eq!(lines[1], "d1,p1,demo,compute,compute,,cores,10,11,,,,1,,1700000000");
    assert_eq!(lines[2], "d1,p1,demo,compute,compute,,ram,20480,1024,MiB,24576,,,-1,1700000000");
}

#[test]
fn test_project_json_is_report() {
    let report = project();
    let options = RenderOptions {
        format: OutputFormat::Json,
        ..Default::default()
    };

    let out = render_string(&ProjectReports::one("d1", &report), options);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["id"], "p1");

    let reports = vec![report];
    let out = render_string(&ProjectReports::many("d1", &reports), options);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value[0]["name"], "demo");
}

#[test]
fn test_domain_list() {
    let envelope: DomainsEnvelope = serde_json::from_str(
        r#"{"domains": [
            {"id": "d2", "name": "zeta", "services": [{"type": "compute", "area": "compute", "resources": [{"name": "cores", "quota": 5, "projects_quota": 2, "usage": 1}]}]},
            {"id": "d1", "name": "alpha", "services": [{"type": "compute", "area": "compute", "resources": [{"name": "cores", "quota": 9, "projects_quota": 3, "usage": 2}]}]}
        ]}"#,
    )
    .unwrap();
    let domains: Vec<DomainReport> = envelope.domains;

    let out = render_string(domains.as_slice(), csv(false, UnitMode::Native));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[1], "d1,alpha,compute,compute,,cores,9,3,2,");
    assert_eq!(lines[2], "d2,zeta,compute,compute,,cores,5,2,1,");

    let out = render_string(&domains[0], csv(false, UnitMode::Native));
    assert_eq!(out.lines().count(), 2);
}

#[test]
fn test_rates() {
    let cluster: ClusterRatesReport = serde_json::from_str(
        r#"{"id": "current", "services": [{"type": "object-store", "area": "storage", "rates": [
            {"name": "obj/create", "limit": 1000, "window": "1s"}
        ]}]}"#,
    )
    .unwrap();
    let out = render_string(&cluster, csv(false, UnitMode::Native));
    assert_eq!(out.lines().nth(1).unwrap(), "current,storage,object-store,obj/create,1000,1s,");

    let project: ProjectRatesReport = serde_json::from_str(
        r#"{"id": "p1", "name": "demo", "services": [{"type": "object-store", "area": "storage", "scraped_at": 1700000000, "rates": [
            {"name": "obj/create", "limit": 500, "window": "1m", "default_limit": 1000, "default_window": "1s", "usage_as_bigint": "1234"}
        ]}]}"#,
    )
    .unwrap();
    let out = render_string(&ProjectRatesReports::one("d1", &project), csv(true, UnitMode::Native));
    assert_eq!(
        out.lines().nth(1).unwrap(),
        "d1,p1,demo,storage,object-store,obj/create,500,1m,1234,,1000,1s,1700000000"
    );
}
