use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::Result;
use crate::io::ImportReport;
use crate::models::{CreateTradeInput, Goal, Trade, UpdateGoalInput};
use crate::store::{create_trade, list_goals, list_trades, update_goal};

/// Full journal contents as a portable JSON document.
#[derive(Debug, Serialize, Deserialize)]
pub struct JournalArchive {
    pub trades: Vec<Trade>,
    pub goals: Vec<Goal>,
}

pub fn export_archive(db: &Database) -> Result<String> {
    let archive = JournalArchive {
        trades: list_trades(db)?,
        goals: list_goals(db)?,
    };
    Ok(serde_json::to_string_pretty(&archive)?)
}

/// Restores an archive into `db`. Trades go through the store's creation
/// path so ids are reassigned and derived fields recomputed; goal targets
/// are applied onto the seeded goal for the matching period.
pub fn import_archive(db: &Database, json: &str) -> Result<ImportReport> {
    let archive: JournalArchive = serde_json::from_str(json)?;
    let mut report = ImportReport::default();

    for trade in &archive.trades {
        let input = CreateTradeInput {
            side: trade.side,
            order_type: trade.order_type,
            margin: trade.margin,
            leverage: trade.leverage,
            entry_price: trade.entry_price,
            exit_price: trade.exit_price,
            stop_percentage: trade.stop_percentage,
            date: trade.date,
            setup: trade.setup.clone(),
            broker: trade.broker.clone(),
        };
        match create_trade(db, input) {
            Ok(_) => report.imported += 1,
            Err(e) => report.errors.push(format!("trade {}: {}", trade.id, e)),
        }
    }

    let current = list_goals(db)?;
    for goal in &archive.goals {
        let Some(existing) = current.iter().find(|g| g.period == goal.period) else {
            report.errors.push(format!("goal period {} not seeded", goal.period.as_str()));
            continue;
        };
        update_goal(
            db,
            existing.id,
            UpdateGoalInput {
                income_target: Some(goal.income_target),
                account_growth_target: Some(goal.account_growth_target),
                current_progress: Some(goal.current_progress),
            },
        )?;
    }

    log::info!(
        "archive import finished: {} trades, {} errors",
        report.imported,
        report.errors.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalPeriod, OrderType, TradeSide};
    use chrono::NaiveDate;

    fn seed(db: &Database) {
        create_trade(
            db,
            CreateTradeInput {
                side: TradeSide::Short,
                order_type: OrderType::Taker,
                margin: 250.0,
                leverage: 4.0,
                entry_price: 60000.0,
                exit_price: 57000.0,
                stop_percentage: 0.02,
                date: NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
                setup: Some("Reversal".to_string()),
                broker: Some("Bybit".to_string()),
            },
        )
        .unwrap();
        update_goal(
            db,
            6,
            UpdateGoalInput {
                income_target: Some(25000.0),
                account_growth_target: Some(150.0),
                current_progress: Some(40.0),
            },
        )
        .unwrap();
    }

    #[test]
    fn archive_round_trips_trades_and_goal_targets() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        let json = export_archive(&db).unwrap();

        let restored = Database::open_in_memory().unwrap();
        let report = import_archive(&restored, &json).unwrap();
        assert_eq!(report.imported, 1);
        assert!(report.errors.is_empty());

        let trades = list_trades(&restored).unwrap();
        assert_eq!(trades.len(), 1);
        assert!((trades[0].win_percentage - 0.05).abs() < 1e-12);
        assert_eq!(trades[0].broker.as_deref(), Some("Bybit"));

        let annual = list_goals(&restored)
            .unwrap()
            .into_iter()
            .find(|g| g.period == GoalPeriod::Annual)
            .unwrap();
        assert_eq!(annual.income_target, 25000.0);
        assert_eq!(annual.current_progress, 40.0);
    }

    #[test]
    fn malformed_archive_is_a_parse_error() {
        let db = Database::open_in_memory().unwrap();
        assert!(import_archive(&db, "{ not json").is_err());
    }
}
