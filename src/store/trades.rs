use rusqlite::{params, Connection, OptionalExtension};

use crate::analytics::{
    compute_fees, derive_result_type, derive_targets, derive_win_percentage, FeeBreakdown,
    TargetPrices, FULL_EXIT,
};
use crate::db::Database;
use crate::error::{JournalError, Result};
use crate::models::{CreateTradeInput, ResultType, Trade, UpdateTradeInput};

const TRADE_COLUMNS: &str = "id, side, order_type, margin, leverage, entry_price, exit_price, \
     stop_percentage, win_percentage, result_type, entry_fee, exit_fee, total_cost, date, \
     setup, broker, target1_price, target2_price, target3_price";

fn map_row_to_trade(row: &rusqlite::Row) -> rusqlite::Result<Trade> {
    Ok(Trade {
        id: row.get(0)?,
        side: row.get(1)?,
        order_type: row.get(2)?,
        margin: row.get(3)?,
        leverage: row.get(4)?,
        entry_price: row.get(5)?,
        exit_price: row.get(6)?,
        stop_percentage: row.get(7)?,
        win_percentage: row.get(8)?,
        result_type: row.get(9)?,
        entry_fee: row.get(10)?,
        exit_fee: row.get(11)?,
        total_cost: row.get(12)?,
        date: row.get(13)?,
        setup: row.get(14)?,
        broker: row.get(15)?,
        target1_price: row.get(16)?,
        target2_price: row.get(17)?,
        target3_price: row.get(18)?,
    })
}

// Blank labels are stored as NULL so grouped breakdowns can skip them.
fn normalize_label(label: Option<String>) -> Option<String> {
    label.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

struct DerivedFields {
    win_percentage: f64,
    result_type: ResultType,
    targets: Option<TargetPrices>,
    fees: FeeBreakdown,
}

// Everything downstream of the raw inputs is recomputed here, for creates
// and updates alike, so stored rows can never disagree with their inputs.
fn derive_trade_fields(input: &CreateTradeInput) -> DerivedFields {
    let win_percentage = derive_win_percentage(input.entry_price, input.exit_price, input.side);
    DerivedFields {
        win_percentage,
        result_type: derive_result_type(win_percentage),
        targets: derive_targets(input.entry_price, input.stop_percentage, input.side),
        fees: compute_fees(input.margin, input.leverage, input.order_type, FULL_EXIT),
    }
}

fn fetch_trade(conn: &Connection, id: i64) -> Result<Option<Trade>> {
    let trade = conn
        .query_row(
            &format!("SELECT {} FROM trades WHERE id = ?", TRADE_COLUMNS),
            [id],
            map_row_to_trade,
        )
        .optional()?;
    Ok(trade)
}

/// All trades in insertion order. The filter engine preserves this order, so
/// it is the canonical ordering of every derived view.
pub fn list_trades(db: &Database) -> Result<Vec<Trade>> {
    let conn = db.conn.lock().map_err(|_| JournalError::Lock)?;
    let mut stmt = conn.prepare(&format!("SELECT {} FROM trades ORDER BY id ASC", TRADE_COLUMNS))?;
    let trades = stmt
        .query_map([], map_row_to_trade)?
        .collect::<rusqlite::Result<Vec<Trade>>>()?;
    Ok(trades)
}

pub fn get_trade(db: &Database, id: i64) -> Result<Trade> {
    let conn = db.conn.lock().map_err(|_| JournalError::Lock)?;
    fetch_trade(&conn, id)?.ok_or(JournalError::TradeNotFound(id))
}

pub fn create_trade(db: &Database, input: CreateTradeInput) -> Result<Trade> {
    let mut input = input;
    input.setup = normalize_label(input.setup.take());
    input.broker = normalize_label(input.broker.take());
    let derived = derive_trade_fields(&input);

    let conn = db.conn.lock().map_err(|_| JournalError::Lock)?;
    conn.execute(
        "INSERT INTO trades (
            side, order_type, margin, leverage, entry_price, exit_price, stop_percentage,
            win_percentage, result_type, entry_fee, exit_fee, total_cost, date, setup, broker,
            target1_price, target2_price, target3_price
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            input.side,
            input.order_type,
            input.margin,
            input.leverage,
            input.entry_price,
            input.exit_price,
            input.stop_percentage,
            derived.win_percentage,
            derived.result_type,
            derived.fees.entry_fee,
            derived.fees.exit_fee(),
            derived.fees.total_cost,
            input.date,
            input.setup,
            input.broker,
            derived.targets.map(|t| t.target1),
            derived.targets.map(|t| t.target2),
            derived.targets.map(|t| t.target3),
        ],
    )?;

    let id = conn.last_insert_rowid();
    log::debug!("created trade {}", id);
    fetch_trade(&conn, id)?.ok_or(JournalError::TradeNotFound(id))
}

/// Merges the patch over the stored raw inputs, recomputes every derived
/// field, and writes the whole row back.
pub fn update_trade(db: &Database, id: i64, patch: UpdateTradeInput) -> Result<Trade> {
    let conn = db.conn.lock().map_err(|_| JournalError::Lock)?;
    let existing = fetch_trade(&conn, id)?.ok_or(JournalError::TradeNotFound(id))?;

    let merged = CreateTradeInput {
        side: patch.side.unwrap_or(existing.side),
        order_type: patch.order_type.unwrap_or(existing.order_type),
        margin: patch.margin.unwrap_or(existing.margin),
        leverage: patch.leverage.unwrap_or(existing.leverage),
        entry_price: patch.entry_price.unwrap_or(existing.entry_price),
        exit_price: patch.exit_price.unwrap_or(existing.exit_price),
        stop_percentage: patch.stop_percentage.unwrap_or(existing.stop_percentage),
        date: patch.date.unwrap_or(existing.date),
        setup: match patch.setup {
            Some(setup) => normalize_label(Some(setup)),
            None => existing.setup,
        },
        broker: match patch.broker {
            Some(broker) => normalize_label(Some(broker)),
            None => existing.broker,
        },
    };
    let derived = derive_trade_fields(&merged);

    conn.execute(
        "UPDATE trades SET
            side = ?, order_type = ?, margin = ?, leverage = ?, entry_price = ?, exit_price = ?,
            stop_percentage = ?, win_percentage = ?, result_type = ?, entry_fee = ?, exit_fee = ?,
            total_cost = ?, date = ?, setup = ?, broker = ?, target1_price = ?, target2_price = ?,
            target3_price = ?, updated_at = strftime('%s', 'now')
         WHERE id = ?",
        params![
            merged.side,
            merged.order_type,
            merged.margin,
            merged.leverage,
            merged.entry_price,
            merged.exit_price,
            merged.stop_percentage,
            derived.win_percentage,
            derived.result_type,
            derived.fees.entry_fee,
            derived.fees.exit_fee(),
            derived.fees.total_cost,
            merged.date,
            merged.setup,
            merged.broker,
            derived.targets.map(|t| t.target1),
            derived.targets.map(|t| t.target2),
            derived.targets.map(|t| t.target3),
            id,
        ],
    )?;

    fetch_trade(&conn, id)?.ok_or(JournalError::TradeNotFound(id))
}

/// Deleting an id that is already gone is not an error.
pub fn delete_trade(db: &Database, id: i64) -> Result<()> {
    let conn = db.conn.lock().map_err(|_| JournalError::Lock)?;
    let deleted = conn.execute("DELETE FROM trades WHERE id = ?", [id])?;
    if deleted == 0 {
        log::debug!("delete of missing trade {} ignored", id);
    }
    Ok(())
}
