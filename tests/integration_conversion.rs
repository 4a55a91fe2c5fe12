//! End-to-end conversion scenarios through the public API
//!
//! Each test builds a source directory of archives in a temporary location,
//! runs a full batch and inspects the CSV files written to the target.

use hds_converter::app::services::batch_orchestrator::{
    BatchOrchestrator, ChannelReporter, ReportEvent,
};
use hds_converter::app::services::conversion_engine::{ConversionEngine, EngineOptions};
use hds_converter::app::services::variable_database::VariableDatabase;
use hds_converter::app::services::{event_code_table, timestamp_codec};
use hds_converter::Config;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const NOON_2023: i64 = 133_170_480_000_000_000;
const ONE_SECOND: i64 = 10_000_000;

fn write_lines(path: &Path, lines: &[&str]) {
    let mut content = lines.join("\r\n");
    content.push_str("\r\n");
    std::fs::write(path, content).unwrap();
}

fn read_rows(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .split_terminator("\r\n")
        .map(str::to_string)
        .collect()
}

/// Database record with the name in fields 2.. and the level in field 50
fn database_record(prefix: &str, segments: &[&str], level: &str) -> String {
    let mut fields = vec![String::new(); 54];
    fields[0] = prefix.to_string();
    for (offset, segment) in segments.iter().enumerate() {
        fields[2 + offset] = segment.to_string();
    }
    fields[50] = level.to_string();
    fields.join(",")
}

/// Two identical consecutive trend lines produce two rows (the third line is a new second)
#[test]
fn test_trend_scenario_with_duplicate() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let archive = source.path().join("a.dat");
    write_lines(
        &archive,
        &[
            "LB,x,x,T",
            "TR,Temp",
            "20230101T120000.000Z,21.5",
            "20230101T120000.000Z,21.5",
            "20230101T120001.000Z,22.0",
        ],
    );

    let engine = ConversionEngine::new(
        Arc::new(VariableDatabase::new()),
        EngineOptions::new(target.path()),
    );
    assert!(engine.convert_file(&archive).is_converted());

    assert_eq!(
        read_rows(&target.path().join("a.dat_Trends.csv")),
        vec![
            "133170480000000000,Temp,21.5,192".to_string(),
            "133170480010000000,Temp,22.0,192".to_string(),
        ]
    );
    assert!(read_rows(&target.path().join("a.dat_Logs.csv")).is_empty());
}

#[test]
fn test_timestamp_and_event_code_contracts() {
    assert_eq!(
        timestamp_codec::decode("20230101T120000.000Z").unwrap(),
        NOON_2023
    );
    assert_eq!(
        timestamp_codec::decode("20230101T120001.000Z").unwrap() - NOON_2023,
        ONE_SECOND
    );
    assert!(timestamp_codec::decode("2023-01-01 12:00:00").is_err());

    assert_eq!(event_code_table::remap(3), 0);
    assert_eq!(event_code_table::remap_field("not-a-code"), 0);
}

#[tokio::test]
async fn test_batch_with_unwritable_output() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    for name in ["first.dat", "bad.dat", "third.dat"] {
        write_lines(
            &source.path().join(name),
            &["LB,x,x,T", "TR,Flow", "20230101T120000.000Z,5"],
        );
    }
    std::fs::create_dir(target.path().join("bad.dat_Trends.csv")).unwrap();

    let (reporter, mut events) = ChannelReporter::new();
    let config = Config::new(source.path(), target.path())
        .with_overwrite(true)
        .with_max_concurrent_files(3);
    let summary = BatchOrchestrator::new(config, Arc::new(reporter))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.files_found, 3);
    assert_eq!(summary.files_converted, 2);
    assert_eq!(summary.files_failed, 1);

    for name in ["first.dat", "third.dat"] {
        assert_eq!(
            read_rows(&target.path().join(format!("{}_Trends.csv", name))),
            vec![format!("{},Flow,5,192", NOON_2023)]
        );
        assert!(target.path().join(format!("{}_Logs.csv", name)).is_file());
    }
    assert!(!target.path().join("bad.dat_Logs.csv").exists());

    let mut error_traces = 0;
    let mut completed = false;
    let mut last_progress = 0;
    while let Ok(event) = events.try_recv() {
        match event {
            ReportEvent::Trace(line) if line.starts_with("Error converting bad.dat") => {
                error_traces += 1
            }
            ReportEvent::Trace(line) if line == "Conversion completed" => completed = true,
            ReportEvent::Trace(_) => {}
            ReportEvent::Progress(percent) => last_progress = percent,
        }
    }
    assert_eq!(error_traces, 1);
    assert!(completed);
    assert_eq!(last_progress, 100);
}

#[tokio::test]
async fn test_logs_enriched_from_windows_1252_database() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let database_dir = TempDir::new().unwrap();

    write_lines(
        &source.path().join("plant.dat"),
        &[
            "LB,x,x,L,Alarms01",
            "LC,Alarm list",
            "20230101T120000.000Z,EVT,2,x3,x4,Zone.Température,x6,high,ACK,20230101T120001.000Z,x10,Operator note ",
        ],
    );

    let text = [
        database_record("ALA", &["Zone", "Température"], "3"),
        "VAR,ignored".to_string(),
    ]
    .join("\r\n");
    let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(&text);
    let database = database_dir.path().join("variables.txt");
    std::fs::write(&database, bytes).unwrap();

    let (reporter, _events) = ChannelReporter::new();
    let config = Config::new(source.path(), target.path())
        .with_variable_database(&database)
        .with_extra_columns(0, 2);
    let summary = BatchOrchestrator::new(config, Arc::new(reporter))
        .run()
        .await
        .unwrap();
    assert_eq!(summary.variables_loaded, 1);
    assert_eq!(summary.totals.logs_written, 1);

    assert_eq!(
        read_rows(&target.path().join("plant.dat_Logs.csv")),
        vec![format!(
            "{},Alarms01,,2,,Zone.Température,0,high,192,3,ACK,Operatornote,0,0,,,",
            NOON_2023 + ONE_SECOND
        )]
    );
}
