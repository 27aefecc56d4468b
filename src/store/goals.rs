use rusqlite::{Connection, OptionalExtension};

use crate::db::Database;
use crate::error::{JournalError, Result};
use crate::models::{Goal, UpdateGoalInput};

const GOAL_COLUMNS: &str = "id, period, income_target, account_growth_target, current_progress";

fn map_row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: row.get(0)?,
        period: row.get(1)?,
        income_target: row.get(2)?,
        account_growth_target: row.get(3)?,
        current_progress: row.get(4)?,
    })
}

fn fetch_goal(conn: &Connection, id: i64) -> Result<Option<Goal>> {
    let goal = conn
        .query_row(
            &format!("SELECT {} FROM goals WHERE id = ?", GOAL_COLUMNS),
            [id],
            map_row_to_goal,
        )
        .optional()?;
    Ok(goal)
}

/// All goals in seed order, one per period.
pub fn list_goals(db: &Database) -> Result<Vec<Goal>> {
    let conn = db.conn.lock().map_err(|_| JournalError::Lock)?;
    let mut stmt = conn.prepare(&format!("SELECT {} FROM goals ORDER BY id ASC", GOAL_COLUMNS))?;
    let goals = stmt
        .query_map([], map_row_to_goal)?
        .collect::<rusqlite::Result<Vec<Goal>>>()?;
    Ok(goals)
}

/// Applies the provided target edits. Progress is clamped to [0, 100] on the
/// way in. An unknown id is ignored and reported as `None`.
pub fn update_goal(db: &Database, id: i64, input: UpdateGoalInput) -> Result<Option<Goal>> {
    let conn = db.conn.lock().map_err(|_| JournalError::Lock)?;

    let mut updates = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(income_target) = input.income_target {
        updates.push("income_target = ?");
        values.push(Box::new(income_target));
    }
    if let Some(account_growth_target) = input.account_growth_target {
        updates.push("account_growth_target = ?");
        values.push(Box::new(account_growth_target));
    }
    if let Some(current_progress) = input.current_progress {
        updates.push("current_progress = ?");
        values.push(Box::new(current_progress.clamp(0.0, 100.0)));
    }

    if updates.is_empty() {
        return fetch_goal(&conn, id);
    }

    updates.push("updated_at = strftime('%s', 'now')");
    let query = format!("UPDATE goals SET {} WHERE id = ?", updates.join(", "));
    values.push(Box::new(id));

    let params: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();
    let changed = conn.execute(&query, params.as_slice())?;
    if changed == 0 {
        log::warn!("update of unknown goal {} ignored", id);
        return Ok(None);
    }

    fetch_goal(&conn, id)
}
