//! Progress charts, trend insights and dashboard aggregates
//!
//! Everything here works on plan snapshots (date, targets, actuals) that the
//! caller has already loaded in ascending date order.

use crate::daily_plan::{DailyPlan, NutrientTotals};
use crate::health_metrics::{round_half_up, DailyTargets};
use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const WEEKLY_WINDOW_DAYS: u64 = 7;
pub const DASHBOARD_WINDOW_DAYS: u64 = 30;
/// Fewer plans than this and no trend is reported
pub const MIN_PLANS_FOR_INSIGHT: usize = 4;
/// Percent change treated as steady
pub const CONSISTENCY_BAND_PCT: f64 = 5.0;

/// Date, targets and actuals of one plan, without its item list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub date: NaiveDate,
    pub targets: DailyTargets,
    pub actuals: NutrientTotals,
}

impl From<&DailyPlan> for PlanSnapshot {
    fn from(plan: &DailyPlan) -> Self {
        Self {
            date: plan.date,
            targets: plan.targets,
            actuals: plan.actuals,
        }
    }
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn days_before(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

// ============================================================================
// Query parameters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    #[default]
    Week,
    Month,
    Year,
}

impl Timeframe {
    pub fn days(&self) -> u64 {
        match self {
            Timeframe::Week => 7,
            Timeframe::Month => 30,
            Timeframe::Year => 365,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::Year => "year",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            "year" => Ok(Timeframe::Year),
            _ => Err(format!("Invalid timeframe '{}'. Must be one of: week, month, year", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Calories,
    Protein,
    Carbs,
    Fats,
    Water,
    Sleep,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Calories => "calories",
            Metric::Protein => "protein",
            Metric::Carbs => "carbs",
            Metric::Fats => "fats",
            Metric::Water => "water",
            Metric::Sleep => "sleep",
        }
    }

    /// Capitalised name used in insight sentences
    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::Calories => "Calories",
            Metric::Protein => "Protein",
            Metric::Carbs => "Carbs",
            Metric::Fats => "Fats",
            Metric::Water => "Water",
            Metric::Sleep => "Sleep",
        }
    }

    pub fn actual(&self, actuals: &NutrientTotals) -> f64 {
        let value = match self {
            Metric::Calories => actuals.calories,
            Metric::Protein => actuals.protein,
            Metric::Carbs => actuals.carbs,
            Metric::Fats => actuals.fats,
            Metric::Water => actuals.water,
            Metric::Sleep => actuals.sleep,
        };
        decimal_to_f64(value)
    }

    pub fn target(&self, targets: &DailyTargets) -> f64 {
        match self {
            Metric::Calories => targets.calories as f64,
            Metric::Protein => targets.protein as f64,
            Metric::Carbs => targets.carbs as f64,
            Metric::Fats => targets.fats as f64,
            Metric::Water => targets.water,
            Metric::Sleep => targets.sleep,
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "calories" => Ok(Metric::Calories),
            "protein" => Ok(Metric::Protein),
            "carbs" => Ok(Metric::Carbs),
            "fats" => Ok(Metric::Fats),
            "water" => Ok(Metric::Water),
            "sleep" => Ok(Metric::Sleep),
            _ => Err(format!(
                "Invalid metric '{}'. Must be one of: calories, protein, carbs, fats, water, sleep",
                s
            )),
        }
    }
}

// ============================================================================
// Weekly view
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayProgress {
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Mon"
    pub day: String,
    pub actuals: NutrientTotals,
    pub targets: DailyTargets,
}

/// Last seven days ending today, zero-filled where no plan exists
pub fn weekly_progress(plans: &[PlanSnapshot], today: NaiveDate) -> Vec<DayProgress> {
    (0..WEEKLY_WINDOW_DAYS)
        .rev()
        .map(|offset| {
            let date = days_before(today, offset);
            let plan = plans.iter().find(|p| p.date == date);
            DayProgress {
                date,
                day: date.format("%a").to_string(),
                actuals: plan.map(|p| p.actuals).unwrap_or_default(),
                targets: plan.map(|p| p.targets).unwrap_or_default(),
            }
        })
        .collect()
}

// ============================================================================
// Filtered chart + insight
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: String,
    pub actual: f64,
    pub target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredProgress {
    pub timeframe: Timeframe,
    pub metric: Metric,
    pub data: Vec<ChartPoint>,
    pub insight: String,
}

/// First day included for a timeframe ending today
pub fn window_start(timeframe: Timeframe, today: NaiveDate) -> NaiveDate {
    days_before(today, timeframe.days())
}

fn month_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

fn day_label(date: NaiveDate) -> String {
    date.format("%m-%d").to_string()
}

/// One point per plan, or per month (averaged, rounded) for the yearly view
pub fn chart_points(plans: &[&PlanSnapshot], timeframe: Timeframe, metric: Metric) -> Vec<ChartPoint> {
    if timeframe != Timeframe::Year {
        return plans
            .iter()
            .map(|p| ChartPoint {
                date: day_label(p.date),
                actual: metric.actual(&p.actuals),
                target: metric.target(&p.targets),
            })
            .collect();
    }

    // (label, actual sum, target sum, count), in first-seen order
    let mut months: Vec<(String, f64, f64, u32)> = Vec::new();
    for plan in plans {
        let label = month_label(plan.date);
        let actual = metric.actual(&plan.actuals);
        let target = metric.target(&plan.targets);
        match months.iter_mut().find(|m| m.0 == label) {
            Some(month) => {
                month.1 += actual;
                month.2 += target;
                month.3 += 1;
            }
            None => months.push((label, actual, target, 1)),
        }
    }

    months
        .into_iter()
        .map(|(date, actual, target, count)| ChartPoint {
            date,
            actual: round_half_up(actual / count as f64),
            target: round_half_up(target / count as f64),
        })
        .collect()
}

/// Compare the average of the first half of the window against the second
pub fn trend_insight(plans: &[&PlanSnapshot], timeframe: Timeframe, metric: Metric) -> String {
    if plans.len() < MIN_PLANS_FOR_INSIGHT {
        return format!(
            "Not enough data to analyze {} trends yet. Keep logging!",
            metric.as_str()
        );
    }

    let (first, second) = plans.split_at(plans.len() / 2);
    let average = |half: &[&PlanSnapshot]| {
        half.iter().map(|p| metric.actual(&p.actuals)).sum::<f64>() / half.len() as f64
    };

    let first_avg = average(first);
    let second_avg = average(second);
    let percent_change = if first_avg > 0.0 {
        (second_avg - first_avg) / first_avg * 100.0
    } else {
        0.0
    };

    let name = metric.display_name();
    if percent_change.abs() <= CONSISTENCY_BAND_PCT {
        format!("Your {} intake has been highly consistent over this {}.", name, timeframe)
    } else if percent_change > CONSISTENCY_BAND_PCT {
        format!(
            "{} intake is trending UP by {}% recently.",
            name,
            round_half_up(percent_change)
        )
    } else {
        format!(
            "{} intake is trending DOWN by {}% recently.",
            name,
            round_half_up(percent_change.abs())
        )
    }
}

/// Chart data and insight for plans dated on or after the window start
pub fn filtered_progress(
    plans: &[PlanSnapshot],
    timeframe: Timeframe,
    metric: Metric,
    today: NaiveDate,
) -> FilteredProgress {
    let start = window_start(timeframe, today);
    let mut in_window: Vec<&PlanSnapshot> = plans.iter().filter(|p| p.date >= start).collect();
    in_window.sort_by_key(|p| p.date);

    FilteredProgress {
        timeframe,
        metric,
        data: chart_points(&in_window, timeframe, metric),
        insight: trend_insight(&in_window, timeframe, metric),
    }
}

// ============================================================================
// Dashboard
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieTotals {
    pub cal_actual: f64,
    pub cal_target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieAverages {
    pub cal_actual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub chart_data: Vec<ChartPoint>,
    pub days_tracked: usize,
    pub totals: CalorieTotals,
    pub averages: CalorieAverages,
    /// Overall calories achieved against target, in whole percent
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub thirty_day: DashboardMetrics,
    pub lifetime: DashboardMetrics,
}

/// Calorie chart and totals over the given plans
pub fn dashboard_metrics<'a, I>(plans: I) -> DashboardMetrics
where
    I: IntoIterator<Item = &'a PlanSnapshot>,
{
    let mut total_actual = Decimal::ZERO;
    let mut total_target: i64 = 0;

    let chart_data: Vec<ChartPoint> = plans
        .into_iter()
        .map(|p| {
            total_actual = total_actual.saturating_add(p.actuals.calories);
            total_target = total_target.saturating_add(i64::from(p.targets.calories));
            ChartPoint {
                date: day_label(p.date),
                actual: decimal_to_f64(p.actuals.calories),
                target: p.targets.calories as f64,
            }
        })
        .collect();

    let days_tracked = chart_data.len();
    let cal_actual = decimal_to_f64(total_actual);
    let cal_target = total_target as f64;

    let percentage = if cal_target > 0.0 {
        round_half_up(cal_actual / cal_target * 100.0)
    } else {
        0.0
    };

    DashboardMetrics {
        chart_data,
        days_tracked,
        totals: CalorieTotals { cal_actual, cal_target },
        averages: CalorieAverages {
            cal_actual: round_half_up(cal_actual / days_tracked.max(1) as f64),
        },
        percentage,
    }
}

/// Thirty-day and lifetime views over plans sorted by date
pub fn full_dashboard(plans: &[PlanSnapshot], today: NaiveDate) -> Dashboard {
    let start = days_before(today, DASHBOARD_WINDOW_DAYS);
    Dashboard {
        thirty_day: dashboard_metrics(plans.iter().filter(|p| p.date >= start)),
        lifetime: dashboard_metrics(plans),
    }
}
