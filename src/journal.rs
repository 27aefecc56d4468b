use serde::Serialize;

use crate::analytics::{
    apply_filter, broker_analysis, compute_metrics, setup_analysis, BrokerBreakdown,
    MetricsSnapshot, SetupBreakdown,
};
use crate::db::Database;
use crate::error::Result;
use crate::models::{
    CreateTradeInput, Goal, Trade, TradeFilters, UpdateGoalInput, UpdateTradeInput,
};
use crate::store;

/// The session's source of truth: the trade collection plus the active
/// filter spec. Every derived view is recomputed from these two on demand,
/// nothing downstream is cached or mutated independently.
pub struct Journal {
    db: Database,
    filters: TradeFilters,
}

/// One consistent read of the journal: the raw trades, the filtered subset,
/// and every view derived from that subset.
#[derive(Debug, Clone, Serialize)]
pub struct JournalSnapshot {
    pub trades: Vec<Trade>,
    pub filtered_trades: Vec<Trade>,
    pub metrics: MetricsSnapshot,
    pub setup_breakdown: Vec<SetupBreakdown>,
    pub broker_breakdown: Vec<BrokerBreakdown>,
    pub goals: Vec<Goal>,
    pub filters: TradeFilters,
}

impl Journal {
    pub fn open(db_path: &str) -> Result<Self> {
        Ok(Self {
            db: Database::new(db_path)?,
            filters: TradeFilters::default(),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            db: Database::open_in_memory()?,
            filters: TradeFilters::default(),
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn filters(&self) -> &TradeFilters {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: TradeFilters) {
        self.filters = filters;
    }

    pub fn reset_filters(&mut self) {
        self.filters = TradeFilters::default();
    }

    pub fn add_trade(&self, input: CreateTradeInput) -> Result<Trade> {
        store::create_trade(&self.db, input)
    }

    pub fn update_trade(&self, id: i64, patch: UpdateTradeInput) -> Result<Trade> {
        store::update_trade(&self.db, id, patch)
    }

    pub fn delete_trade(&self, id: i64) -> Result<()> {
        store::delete_trade(&self.db, id)
    }

    pub fn update_goal(&self, id: i64, input: UpdateGoalInput) -> Result<Option<Goal>> {
        store::update_goal(&self.db, id, input)
    }

    /// Recomputes the full derived state. Two calls without an intervening
    /// write return identical snapshots.
    pub fn snapshot(&self) -> Result<JournalSnapshot> {
        let trades = store::list_trades(&self.db)?;
        let filtered_trades = apply_filter(&trades, &self.filters);

        let metrics = compute_metrics(&filtered_trades);
        let setup_breakdown = setup_analysis(&filtered_trades);
        let broker_breakdown = broker_analysis(&filtered_trades);
        let goals = store::list_goals(&self.db)?;

        Ok(JournalSnapshot {
            trades,
            filtered_trades,
            metrics,
            setup_breakdown,
            broker_breakdown,
            goals,
            filters: self.filters.clone(),
        })
    }
}
