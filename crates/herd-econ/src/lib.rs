#![deny(warnings)]

//! Economic helpers for the herd simulator.
//!
//! This module provides validated utilities for:
//! - Valuing heads sold by category at per-head prices
//! - Monthly maintenance cost accrual
//! - Net profit and the annualized replacement rate KPI

use herd_core::Params;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors produced by economic helpers.
#[derive(Debug, Error, PartialEq)]
pub enum EconError {
    /// Unit prices and costs must be non-negative.
    #[error("invalid price for {0}: must be non-negative")]
    InvalidPrice(&'static str),
}

/// Heads that left the farm for money, by price category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesTally {
    /// Breeding cows retired by replacement or at the parity ceiling.
    pub cull_cows: u64,
    /// Females shipped after on-farm finishing.
    pub finished_females: u64,
    /// Males shipped after on-farm finishing.
    pub finished_males: u64,
    /// Calves of either sex sold immediately for lack of space.
    pub calves_sold: u64,
}

/// Revenue per category and its total.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    pub cull_cows: Decimal,
    pub finished_females: Decimal,
    pub finished_males: Decimal,
    pub calves: Decimal,
    pub total: Decimal,
}

/// Value of `heads` animals at `unit_price`, saturating at `Decimal::MAX`.
/// `field` names the price in the error when it is negative.
///
/// Example:
/// let v = head_value(3, Decimal::new(250, 0), "price_calf_sale").unwrap();
/// assert_eq!(v, Decimal::new(750, 0));
pub fn head_value(
    heads: u64,
    unit_price: Decimal,
    field: &'static str,
) -> Result<Decimal, EconError> {
    if unit_price < Decimal::ZERO {
        return Err(EconError::InvalidPrice(field));
    }
    Ok(Decimal::from(heads)
        .checked_mul(unit_price)
        .unwrap_or(Decimal::MAX))
}

/// Cost of keeping `heads` animals for one month. A negative per-head cost
/// is treated as zero.
pub fn monthly_maintenance(heads: u64, cost_per_head: Decimal) -> Decimal {
    Decimal::from(heads)
        .checked_mul(cost_per_head.max(Decimal::ZERO))
        .unwrap_or(Decimal::MAX)
}

/// Revenue of a run's sales at the prices in `p`.
///
/// Consigned males leave without a sale price and are not part of the tally.
pub fn revenue(tally: &SalesTally, p: &Params) -> Result<RevenueBreakdown, EconError> {
    let cull_cows = head_value(tally.cull_cows, p.price_old_cow, "price_old_cow")?;
    let finished_females = head_value(
        tally.finished_females,
        p.price_beef_female,
        "price_beef_female",
    )?;
    let finished_males = head_value(tally.finished_males, p.price_beef_male, "price_beef_male")?;
    let calves = head_value(tally.calves_sold, p.price_calf_sale, "price_calf_sale")?;
    let total = cull_cows
        .saturating_add(finished_females)
        .saturating_add(finished_males)
        .saturating_add(calves);
    debug!(%total, ?tally, "revenue computed");
    Ok(RevenueBreakdown {
        cull_cows,
        finished_females,
        finished_males,
        calves,
        total,
    })
}

/// Net profit as revenue minus cost.
pub fn net_profit(revenue: Decimal, cost: Decimal) -> Decimal {
    revenue.saturating_sub(cost)
}

/// Share of the herd replaced per year, in percent, rounded to 2 dp.
///
/// `quota` heifers enter once per breeding cycle of `cycle_months`. Returns
/// None when the herd or the cycle is empty.
///
/// Example:
/// let r = annual_replacement_rate_pct(3, 100, 12).unwrap();
/// assert_eq!(r, Decimal::new(300, 2));
pub fn annual_replacement_rate_pct(quota: u64, herd: u64, cycle_months: u32) -> Option<Decimal> {
    if herd == 0 || cycle_months == 0 {
        return None;
    }
    let per_year = Decimal::from(quota).checked_mul(Decimal::from(12u32))?
        / Decimal::from(cycle_months);
    let pct = per_year.checked_mul(Decimal::ONE_HUNDRED)? / Decimal::from(herd);
    Some(pct.round_dp(2))
}
