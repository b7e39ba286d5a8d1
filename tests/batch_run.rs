//! Integration tests for manifest-driven batch runs.

mod support;
use support::net::mock_server;

use docfetch_core::manifest::parse_manifest;
use docfetch_core::{
    BatchRunner, ClassificationProfile, HttpClient, LayoutKind, ManifestColumns, NamingScheme,
    Pacer, ProcessExit, RunReport, write_report,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PDF_BYTES: &[u8] = b"%PDF-1.4\n%test\n";
const XLS_BYTES: &[u8] = b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1legacy workbook";

async fn mount_fixtures(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/akmola/2021"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PDF_BYTES.to_vec()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/akmola/2022"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(XLS_BYTES.to_vec()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/almaty/2021"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}

fn manifest_csv(base: &str, key_header: &str) -> String {
    format!(
        "Oblast,{key_header},Link\n\
         Akmola,2021,{base}/akmola/2021\n\
         Akmola,2022,{base}/akmola/2022\n\
         Almaty,2021,{base}/almaty/2021\n"
    )
}

#[tokio::test]
async fn test_grouped_layout_writes_per_group_directories() {
    let Some(server) = mock_server().await else {
        return;
    };
    mount_fixtures(&server).await;
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("Data").join("Investments");

    let manifest = parse_manifest(
        manifest_csv(&server.uri(), "Year").as_bytes(),
        &ManifestColumns::default(),
    )
    .unwrap();
    let runner = BatchRunner::new(
        HttpClient::new(),
        Pacer::disabled(),
        NamingScheme::from_layout(LayoutKind::Grouped, Some("Investments".to_string())),
        &output_dir,
    );

    let summary = runner.run(&manifest.rows).await;

    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.failures(), ["Almaty_2021"]);
    assert_eq!(summary.exit_outcome(), ProcessExit::Partial);
    assert_eq!(
        std::fs::read(output_dir.join("Akmola").join("2021_Investments.pdf")).unwrap(),
        PDF_BYTES
    );
    assert!(output_dir.join("Akmola").join("2022_Investments.xls").exists());
    assert!(
        output_dir.join("Almaty").is_dir(),
        "group directory exists even when its download failed"
    );
    assert_eq!(
        std::fs::read_dir(output_dir.join("Almaty")).unwrap().count(),
        0
    );
}

#[tokio::test]
async fn test_flat_layout_with_spreadsheet_profile() {
    let Some(server) = mock_server().await else {
        return;
    };
    mount_fixtures(&server).await;
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("controls");

    let columns = ManifestColumns {
        key: "Type".to_string(),
        ..ManifestColumns::default()
    };
    let manifest = parse_manifest(manifest_csv(&server.uri(), "Type").as_bytes(), &columns).unwrap();
    let runner = BatchRunner::new(
        HttpClient::new().with_profile(ClassificationProfile::spreadsheet()),
        Pacer::disabled(),
        NamingScheme::Flat,
        &output_dir,
    );

    let summary = runner.run(&manifest.rows).await;

    assert_eq!(summary.failures(), ["Almaty - 2021"]);
    // PDF bytes are outside the spreadsheet signature table; octet-stream maps to a workbook.
    assert!(output_dir.join("Akmola_2021.xlsx").exists());
    assert!(output_dir.join("Akmola_2022.xls").exists());

    let report = RunReport::new("CONTROLS DATA DOWNLOAD REPORT", &output_dir, "controls.csv", summary);
    let report_path = write_report(temp_dir.path(), "Controls_download_report", &report).unwrap();
    let text = std::fs::read_to_string(report_path).unwrap();
    assert!(text.contains("Successful downloads: 2"));
    assert!(text.contains(" 1. Almaty - 2021"));
}

#[tokio::test]
async fn test_directory_creation_failure_is_recorded() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("occupied");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let manifest = parse_manifest(
        "Oblast,Year,Link\nAkmola,2021,http://127.0.0.1:9/unused\n".as_bytes(),
        &ManifestColumns::default(),
    )
    .unwrap();
    let runner = BatchRunner::new(
        HttpClient::new(),
        Pacer::disabled(),
        NamingScheme::default(),
        &blocker,
    );

    let summary = runner.run(&manifest.rows).await;

    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.failures(), ["Akmola_2021"]);
    assert_eq!(summary.exit_outcome(), ProcessExit::Failure);
}

#[tokio::test]
async fn test_empty_manifest_is_success() {
    let temp_dir = TempDir::new().unwrap();
    let runner = BatchRunner::new(
        HttpClient::new(),
        Pacer::default(),
        NamingScheme::default(),
        temp_dir.path(),
    );

    let summary = runner.run(&[]).await;

    assert_eq!(summary.total(), 0);
    assert_eq!(summary.exit_outcome(), ProcessExit::Success);
}
