//! Aggregated views over stored quotes.

mod clients;
mod dashboard;

pub use clients::{aggregate_clients, ClientSummary};
pub use dashboard::{
    dashboard, Dashboard, MonthStats, PeriodStats, StatusStats, Totals, WorkTypeStats,
};
