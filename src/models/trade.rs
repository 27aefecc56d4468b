use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Long,
    Short,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Long => "LONG",
            TradeSide::Short => "SHORT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LONG" => Some(TradeSide::Long),
            "SHORT" => Some(TradeSide::Short),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Maker,
    Taker,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Maker => "MAKER",
            OrderType::Taker => "TAKER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MAKER" => Some(OrderType::Maker),
            "TAKER" => Some(OrderType::Taker),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResultType {
    Win,
    Loss,
}

impl ResultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::Win => "WIN",
            ResultType::Loss => "LOSS",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "WIN" => Some(ResultType::Win),
            "LOSS" => Some(ResultType::Loss),
            _ => None,
        }
    }
}

macro_rules! impl_sql_text_enum {
    ($ty:ty, $what:literal) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(self.as_str().into())
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let text = value.as_str()?;
                Self::parse(text).ok_or_else(|| {
                    FromSqlError::Other(format!("unknown {}: {}", $what, text).into())
                })
            }
        }
    };
}

impl_sql_text_enum!(TradeSide, "trade side");
impl_sql_text_enum!(OrderType, "order type");
impl_sql_text_enum!(ResultType, "result type");

/// One closed trade with its derived fields. Rows are immutable by
/// replacement: an update recomputes every derived field from the raw
/// inputs before the row is written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: i64,
    pub side: TradeSide,
    pub order_type: OrderType,
    pub margin: f64,
    pub leverage: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub stop_percentage: f64,
    pub win_percentage: f64,
    pub result_type: ResultType,
    pub entry_fee: f64,
    pub exit_fee: f64,
    pub total_cost: f64,
    pub date: NaiveDate,
    pub setup: Option<String>,
    pub broker: Option<String>,
    pub target1_price: Option<f64>,
    pub target2_price: Option<f64>,
    pub target3_price: Option<f64>,
}

impl Trade {
    /// Notional size of the trade. Always recomputed from margin and
    /// leverage, never stored.
    pub fn position_value(&self) -> f64 {
        self.margin * self.leverage
    }

    /// Signed gross profit in dollars, before fees.
    pub fn profit(&self) -> f64 {
        self.position_value() * self.win_percentage
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTradeInput {
    pub side: TradeSide,
    pub order_type: OrderType,
    pub margin: f64,
    pub leverage: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub stop_percentage: f64,
    pub date: NaiveDate,
    pub setup: Option<String>,
    pub broker: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTradeInput {
    pub side: Option<TradeSide>,
    pub order_type: Option<OrderType>,
    pub margin: Option<f64>,
    pub leverage: Option<f64>,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub stop_percentage: Option<f64>,
    pub date: Option<NaiveDate>,
    // Some("") clears the label
    pub setup: Option<String>,
    pub broker: Option<String>,
}

/// Narrows the trade set before analytics run. `None` on any axis means
/// unconstrained. The date range only applies when both bounds are present;
/// a single bound on its own is treated as unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeFilters {
    pub side: Option<TradeSide>,
    pub order_type: Option<OrderType>,
    pub setup: Option<String>,
    pub broker: Option<String>,
    pub date_range: (Option<NaiveDate>, Option<NaiveDate>),
}

impl TradeFilters {
    pub fn is_unconstrained(&self) -> bool {
        self.side.is_none()
            && self.order_type.is_none()
            && self.setup.is_none()
            && self.broker.is_none()
            && self.date_range.0.is_none()
            && self.date_range.1.is_none()
    }
}
