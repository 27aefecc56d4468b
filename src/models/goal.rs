use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPeriod {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Biannual,
    Annual,
}

impl GoalPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalPeriod::Daily => "daily",
            GoalPeriod::Weekly => "weekly",
            GoalPeriod::Monthly => "monthly",
            GoalPeriod::Quarterly => "quarterly",
            GoalPeriod::Biannual => "biannual",
            GoalPeriod::Annual => "annual",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(GoalPeriod::Daily),
            "weekly" => Some(GoalPeriod::Weekly),
            "monthly" => Some(GoalPeriod::Monthly),
            "quarterly" => Some(GoalPeriod::Quarterly),
            "biannual" => Some(GoalPeriod::Biannual),
            "annual" => Some(GoalPeriod::Annual),
            _ => None,
        }
    }
}

impl ToSql for GoalPeriod {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for GoalPeriod {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Self::parse(text)
            .ok_or_else(|| FromSqlError::Other(format!("unknown goal period: {}", text).into()))
    }
}

/// A performance target for one period. Progress is an externally supplied
/// number in [0, 100]; it is never derived from trade history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub period: GoalPeriod,
    pub income_target: f64,
    pub account_growth_target: f64,
    pub current_progress: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGoalInput {
    pub income_target: Option<f64>,
    pub account_growth_target: Option<f64>,
    pub current_progress: Option<f64>,
}

/// Mean progress across all goals, 0 when there are none.
pub fn average_progress(goals: &[Goal]) -> f64 {
    if goals.is_empty() {
        return 0.0;
    }
    goals.iter().map(|g| g.current_progress).sum::<f64>() / goals.len() as f64
}

/// First goal that has not reached 100%, in seed order.
pub fn next_milestone(goals: &[Goal]) -> Option<&Goal> {
    goals.iter().find(|g| g.current_progress < 100.0)
}

/// Monthly growth needed to meet the annual target. Display arithmetic only,
/// nothing is persisted beyond the target itself.
pub fn required_monthly_growth(goals: &[Goal]) -> f64 {
    goals
        .iter()
        .find(|g| g.period == GoalPeriod::Annual)
        .map(|g| g.account_growth_target / 12.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(id: i64, period: GoalPeriod, growth: f64, progress: f64) -> Goal {
        Goal {
            id,
            period,
            income_target: 100.0,
            account_growth_target: growth,
            current_progress: progress,
        }
    }

    #[test]
    fn period_round_trips_through_text() {
        for period in [
            GoalPeriod::Daily,
            GoalPeriod::Weekly,
            GoalPeriod::Monthly,
            GoalPeriod::Quarterly,
            GoalPeriod::Biannual,
            GoalPeriod::Annual,
        ] {
            assert_eq!(GoalPeriod::parse(period.as_str()), Some(period));
        }
        assert_eq!(GoalPeriod::parse("decade"), None);
    }

    #[test]
    fn average_progress_handles_empty() {
        assert_eq!(average_progress(&[]), 0.0);

        let goals = vec![
            goal(1, GoalPeriod::Daily, 1.0, 50.0),
            goal(2, GoalPeriod::Weekly, 5.0, 100.0),
        ];
        assert_eq!(average_progress(&goals), 75.0);
    }

    #[test]
    fn next_milestone_skips_completed_goals() {
        let goals = vec![
            goal(1, GoalPeriod::Daily, 1.0, 100.0),
            goal(2, GoalPeriod::Weekly, 5.0, 60.0),
            goal(3, GoalPeriod::Monthly, 15.0, 10.0),
        ];
        assert_eq!(next_milestone(&goals).map(|g| g.id), Some(2));
        assert!(next_milestone(&goals[..1]).is_none());
    }

    #[test]
    fn required_monthly_growth_comes_from_annual_goal() {
        let goals = vec![
            goal(1, GoalPeriod::Monthly, 15.0, 0.0),
            goal(2, GoalPeriod::Annual, 120.0, 0.0),
        ];
        assert_eq!(required_monthly_growth(&goals), 10.0);
        assert_eq!(required_monthly_growth(&goals[..1]), 0.0);
    }
}
