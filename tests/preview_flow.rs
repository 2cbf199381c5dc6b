// End-to-end flows: gate -> pipeline -> preview, plus the chat stub

use std::time::Duration;

use datachat::chat::{ChatBackend, SimulatedBackend};
use datachat::decode::Cell;
use datachat::{
    PipelineError, PreviewLimits, PreviewResult, PreviewState, Previewer, SupportedFormat,
    UploadGate, UploadedFile,
};

const INVENTORY_XLSX: &[u8] = include_bytes!("fixtures/inventory.xlsx");
const TALL_XLSX: &[u8] = include_bytes!("fixtures/tall.xlsx");

#[tokio::test]
async fn csv_upload_previews_first_rows() {
    let gate = UploadGate::new();
    let file = UploadedFile::in_memory("data.csv", "text/csv", "a,b\n1,2\n3,4");
    gate.accept(&file).unwrap();

    let previewer = Previewer::default();
    previewer.select(file).await.unwrap();

    match &*previewer.current().expect("csv should be ready") {
        PreviewResult::DelimitedText { headers, rows } => {
            assert_eq!(headers, &["a", "b"]);
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0]["a"], "1");
            assert_eq!(rows[0]["b"], "2");
            assert_eq!(rows[1]["a"], "3");
            assert_eq!(rows[1]["b"], "4");
        }
        other => panic!("expected delimited preview, got {other:?}"),
    }
}

#[tokio::test]
async fn csv_preview_never_exceeds_ten_rows() {
    let mut content = String::from("id\n");
    for i in 0..40 {
        content.push_str(&format!("{i}\n"));
    }
    let file = UploadedFile::in_memory("big.csv", "text/csv", content);

    let previewer = Previewer::default();
    previewer.select(file).await.unwrap();

    match &*previewer.current().unwrap() {
        PreviewResult::DelimitedText { rows, .. } => {
            assert_eq!(rows.len(), 10);
            assert_eq!(rows[0]["id"], "0");
            assert_eq!(rows[9]["id"], "9");
        }
        other => panic!("expected delimited preview, got {other:?}"),
    }
}

#[tokio::test]
async fn xlsx_upload_previews_rows_in_column_order() {
    let file = UploadedFile::in_memory(
        "inventory.xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        INVENTORY_XLSX,
    );

    let previewer = Previewer::default();
    previewer.select(file).await.unwrap();

    match &*previewer.current().expect("workbook should be ready") {
        PreviewResult::Spreadsheet { rows } => {
            assert_eq!(rows.len(), 4); // min(sheetRowCount, 10)
            assert_eq!(rows[0][0], Cell::Text("item".into()));
            assert_eq!(rows[0][2], Cell::Text("in_stock".into()));
            assert_eq!(rows[1][0], Cell::Text("widget".into()));
            assert_eq!(rows[1][1], Cell::Number(4.0));
            assert_eq!(rows[1][2], Cell::Bool(true));
        }
        other => panic!("expected spreadsheet preview, got {other:?}"),
    }
}

#[tokio::test]
async fn tall_xlsx_preview_keeps_ten_row_arrays() {
    // Fixture has a header row plus 14 data rows.
    let file = UploadedFile::in_memory("tall.xlsx", "", TALL_XLSX);

    let previewer = Previewer::default();
    previewer.select(file).await.unwrap();

    match &*previewer.current().unwrap() {
        PreviewResult::Spreadsheet { rows } => {
            assert_eq!(rows.len(), 10);
            assert_eq!(rows[0][0], Cell::Text("n".into()));
            assert_eq!(rows[9][0], Cell::Number(9.0));
        }
        other => panic!("expected spreadsheet preview, got {other:?}"),
    }
}

#[tokio::test]
async fn txt_upload_is_truncated_to_a_byte_prefix() {
    let content: String = (0..2000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
    let file = UploadedFile::in_memory("log.txt", "text/plain", content.clone());

    let previewer = Previewer::default();
    previewer.select(file).await.unwrap();

    match &*previewer.current().unwrap() {
        PreviewResult::PlainText(text) => {
            assert_eq!(text.len(), 1000);
            assert_eq!(text.as_str(), &content[..1000]);
        }
        other => panic!("expected text preview, got {other:?}"),
    }
}

#[tokio::test]
async fn pdf_swap_releases_the_first_reference() {
    let previewer = Previewer::default();
    previewer
        .select(UploadedFile::in_memory(
            "one.pdf",
            "application/pdf",
            &b"%PDF-1.4 one"[..],
        ))
        .await
        .unwrap();

    let probe = match &*previewer.current().expect("first pdf ready") {
        PreviewResult::BinaryDocument { file_name, blob } => {
            assert_eq!(file_name, "one.pdf");
            blob.probe()
        }
        other => panic!("expected document preview, got {other:?}"),
    };

    previewer
        .select(UploadedFile::in_memory(
            "two.pdf",
            "application/pdf",
            &b"%PDF-1.4 two"[..],
        ))
        .await
        .unwrap();

    assert!(probe.is_revoked());
    match &*previewer.current().expect("second pdf ready") {
        PreviewResult::BinaryDocument { file_name, blob } => {
            assert_eq!(file_name, "two.pdf");
            assert!(!blob.is_revoked());
        }
        other => panic!("expected document preview, got {other:?}"),
    }
}

#[tokio::test]
async fn rejected_upload_leaves_existing_preview_alone() {
    let gate = UploadGate::new();
    let previewer = Previewer::default();

    let good = UploadedFile::in_memory("data.csv", "text/csv", "a\n1");
    gate.accept(&good).unwrap();
    previewer.select(good).await.unwrap();
    assert!(previewer.current().is_some());

    let bad = UploadedFile::in_memory("report.docx", "application/msword", "nope");
    let err = gate.accept(&bad).unwrap_err();
    assert_eq!(err, PipelineError::UnsupportedFormat);
    assert!(err.to_string().contains("CSV, XLSX, TXT, or PDF"));

    // The rejection never reached the pipeline; the csv preview survives.
    match &*previewer.current().expect("prior preview untouched") {
        PreviewResult::DelimitedText { rows, .. } => assert_eq!(rows[0]["a"], "1"),
        other => panic!("expected delimited preview, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_workbook_surfaces_spreadsheet_failure() {
    // An .xlsx name over delimited bytes: no cross-format recovery.
    let file = UploadedFile::in_memory("fake.xlsx", "", "a,b\n1,2");
    let previewer = Previewer::default();
    previewer.select(file).await.unwrap();

    match previewer.state() {
        PreviewState::Failed(PipelineError::Decode { format, message }) => {
            assert_eq!(format, SupportedFormat::Spreadsheet);
            assert!(!message.is_empty());
        }
        other => panic!("expected spreadsheet failure, got {other:?}"),
    }
}

#[tokio::test]
async fn disk_file_flows_through_gate_pipeline_and_chat() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("measurements.csv");
    std::fs::write(&path, "sample,value\nA,0.5\nB,0.7\n").unwrap();

    let file = UploadedFile::from_path(&path).await.unwrap();
    assert_eq!(file.content_type(), "text/csv");

    let gate = UploadGate::new();
    gate.accept(&file).unwrap();

    let previewer = Previewer::new(PreviewLimits::default());
    previewer.select(file.clone()).await.unwrap();
    match &*previewer.current().expect("csv ready") {
        PreviewResult::DelimitedText { headers, rows } => {
            assert_eq!(headers, &["sample", "value"]);
            assert_eq!(rows.len(), 2);
        }
        other => panic!("expected delimited preview, got {other:?}"),
    }

    let backend = SimulatedBackend::new(Duration::ZERO);
    let reply = backend.ask(&file, "which sample is higher?").await.unwrap();
    assert!(reply.contains("measurements.csv"));
    assert!(reply.contains("which sample is higher?"));
}
