use crate::db::Database;
use crate::error::{JournalError, Result};
use crate::io::ImportReport;
use crate::models::{CreateTradeInput, Trade};
use crate::store::create_trade;

/// Renders the trade list as CSV, derived columns included, one header row.
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for trade in trades {
        writer.serialize(trade)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| JournalError::Import(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| JournalError::Import(e.to_string()))
}

/// Reads raw trade inputs from CSV and creates them through the store, so
/// every derived column is recomputed rather than trusted from the file.
/// Unreadable rows are collected as line-numbered errors, not fatal.
pub fn import_trades_csv(db: &Database, csv_content: &str) -> Result<ImportReport> {
    let mut reader = csv::Reader::from_reader(csv_content.as_bytes());
    let mut report = ImportReport::default();

    for (index, record) in reader.deserialize::<CreateTradeInput>().enumerate() {
        // header occupies line 1
        let line = index + 2;
        match record {
            Ok(input) => match create_trade(db, input) {
                Ok(_) => report.imported += 1,
                Err(e) => report.errors.push(format!("line {}: {}", line, e)),
            },
            Err(e) => report.errors.push(format!("line {}: {}", line, e)),
        }
    }

    log::info!(
        "csv import finished: {} imported, {} errors",
        report.imported,
        report.errors.len()
    );
    Ok(report)
}
