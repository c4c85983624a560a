pub mod cash_flows;
pub mod metrics;
pub mod simulate;
