//! Financial-independence projection engine
//!
//! Simulates monthly compounding of wealth and passive income under annual
//! return/growth assumptions and finds the first month where income crosses
//! the target. This is an estimate, not accounting: computations deliberately
//! use `f64` because the annual-to-monthly conversion needs fractional
//! exponents. The engine is a total function; degenerate inputs (zero or
//! negative rates, unreachable targets) produce degenerate trajectories, never
//! errors.

use chrono::{Local, Months, NaiveDate};

/// Implied monthly yield assumed for a zero-capital start (0.7%/month).
///
/// Anchors a brand-new investor's simulation to a plausible FII yield instead
/// of leaving income stuck at zero forever.
pub const DEFAULT_MONTHLY_YIELD: f64 = 0.007;

/// Inputs for one simulation run. All rates are annual fractions (0.06 = 6%).
#[derive(Debug, Clone)]
pub struct ProjectionParams {
    pub start_capital: f64,
    pub current_monthly_income: f64,
    pub monthly_contribution: f64,
    pub target_monthly_income: f64,
    pub yearly_return: f64,
    pub yearly_dividend_growth: f64,
    pub yearly_contribution_growth: f64,
    pub max_years: u32,
}

/// One simulated month, recorded before that month's growth is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionPoint {
    pub date: NaiveDate,
    pub wealth: f64,
    pub monthly_income: f64,
}

/// Full trajectory plus the goal-crossing month, if any.
#[derive(Debug, Clone)]
pub struct Projection {
    pub points: Vec<ProjectionPoint>,
    /// Index of the first point whose income reached the target. Latched on
    /// the first crossing and never cleared, even if income later dips back.
    pub goal_month: Option<usize>,
}

impl Projection {
    /// Goal month expressed as whole years and remaining months.
    pub fn goal_in_years_months(&self) -> Option<(usize, usize)> {
        self.goal_month.map(|m| (m / 12, m % 12))
    }

    pub fn final_point(&self) -> Option<&ProjectionPoint> {
        self.points.last()
    }
}

/// Effective monthly rate for a given annual rate.
fn monthly_rate(annual: f64) -> f64 {
    (1.0 + annual).powf(1.0 / 12.0) - 1.0
}

/// Calendar-month stepping with end-of-month clamping (Jan 31 + 1 month = Feb 28).
fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

/// Run the simulation starting from today.
pub fn simulate(params: &ProjectionParams) -> Projection {
    simulate_from(Local::now().date_naive(), params)
}

/// Run the simulation from an explicit start date.
///
/// The first point equals the literal starting state; each iteration then
/// compounds the implied yield, grows the contribution, and rolls income and
/// wealth forward one month.
pub fn simulate_from(start: NaiveDate, params: &ProjectionParams) -> Projection {
    let r_m = monthly_rate(params.yearly_return);
    let g_div_m = monthly_rate(params.yearly_dividend_growth);
    let g_contrib_m = monthly_rate(params.yearly_contribution_growth);

    let mut monthly_yield = if params.start_capital > 0.0 {
        params.current_monthly_income / params.start_capital
    } else {
        DEFAULT_MONTHLY_YIELD
    };

    let total_months = params.max_years as usize * 12;
    let mut points = Vec::with_capacity(total_months);
    let mut goal_month = None;

    let mut wealth = params.start_capital;
    let mut income = params.current_monthly_income;
    let mut contribution = params.monthly_contribution;

    for month in 0..total_months {
        points.push(ProjectionPoint {
            date: add_months(start, month as u32),
            wealth,
            monthly_income: income,
        });

        if income >= params.target_monthly_income && goal_month.is_none() {
            goal_month = Some(month);
        }

        monthly_yield *= 1.0 + g_div_m;
        contribution *= 1.0 + g_contrib_m;
        income = wealth * monthly_yield;
        wealth = wealth * (1.0 + r_m) + contribution;
    }

    Projection { points, goal_month }
}
