//! Dashboard payloads and the small amount of math the views need.
//!
//! Every field defaults so a partial answer still renders: missing keys,
//! `null` and numbers of the wrong kind all read as zero or empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::Plan;

// =========================================================
// Lenient field readers
// =========================================================

/// `null` reads as the type's default.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Any JSON number, or a numeric string. Everything else is `0.0`.
fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if value.is_finite() { value } else { 0.0 })
}

/// Counts accept floats (`10.0`) and round them; negatives read as zero.
fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.max(0.0).round() as u64)
}

// =========================================================
// Agency dashboard
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgencyKpis {
    #[serde(deserialize_with = "count")]
    pub total_companies: u64,
    #[serde(deserialize_with = "number")]
    pub total_budget: f64,
    #[serde(deserialize_with = "number")]
    pub roi: f64,
    #[serde(deserialize_with = "number")]
    pub avg_cac: f64,
    #[serde(deserialize_with = "count")]
    pub total_conversions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanPerformance {
    #[serde(deserialize_with = "or_default")]
    pub plan: String,
    #[serde(deserialize_with = "count")]
    pub count: u64,
    #[serde(deserialize_with = "number")]
    pub avg_roas: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopCompany {
    #[serde(deserialize_with = "or_default")]
    pub name: String,
    #[serde(deserialize_with = "or_default")]
    pub plan: String,
    #[serde(deserialize_with = "number")]
    pub roas: f64,
    #[serde(deserialize_with = "number")]
    pub revenue: f64,
}

impl TopCompany {
    pub fn plan(&self) -> Option<Plan> {
        Plan::parse(&self.plan)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgencyDashboardData {
    #[serde(deserialize_with = "or_default")]
    pub kpis: AgencyKpis,
    #[serde(deserialize_with = "or_default")]
    pub plans_performance: Vec<PlanPerformance>,
    #[serde(deserialize_with = "or_default")]
    pub top_companies: Vec<TopCompany>,
}

// =========================================================
// Client dashboard
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanySummary {
    #[serde(deserialize_with = "or_default")]
    pub name: String,
    #[serde(deserialize_with = "or_default")]
    pub plan: String,
    #[serde(deserialize_with = "number")]
    pub monthly_budget: f64,
}

impl CompanySummary {
    pub fn plan(&self) -> Option<Plan> {
        Plan::parse(&self.plan)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientKpis {
    #[serde(deserialize_with = "number")]
    pub roi: f64,
    #[serde(deserialize_with = "number")]
    pub cac: f64,
    #[serde(deserialize_with = "number")]
    pub ltv_cac: f64,
    #[serde(deserialize_with = "number")]
    pub conversion_rate: f64,
    #[serde(deserialize_with = "number")]
    pub revenue_attributed: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Campaign {
    #[serde(deserialize_with = "count")]
    pub id: u64,
    #[serde(deserialize_with = "or_default")]
    pub name: String,
    #[serde(deserialize_with = "or_default")]
    pub platform: String,
    #[serde(deserialize_with = "count")]
    pub impressions: u64,
    #[serde(deserialize_with = "count")]
    pub clicks: u64,
    #[serde(deserialize_with = "count")]
    pub conversions: u64,
    #[serde(deserialize_with = "number")]
    pub roas: f64,
    #[serde(deserialize_with = "number")]
    pub spent: f64,
    #[serde(deserialize_with = "number")]
    pub budget: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformStats {
    #[serde(deserialize_with = "number")]
    pub spent: f64,
    #[serde(deserialize_with = "number")]
    pub roas: f64,
    #[serde(deserialize_with = "count")]
    pub conversions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientDashboardData {
    #[serde(deserialize_with = "or_default")]
    pub company: CompanySummary,
    #[serde(deserialize_with = "or_default")]
    pub kpis: ClientKpis,
    #[serde(deserialize_with = "or_default")]
    pub campaigns: Vec<Campaign>,
    #[serde(deserialize_with = "or_default")]
    pub platform_performance: BTreeMap<String, PlatformStats>,
}

impl ClientDashboardData {
    pub fn plan_usage(&self) -> PlanUsage {
        PlanUsage::compute(
            self.company.plan(),
            self.campaigns.len(),
            self.company.monthly_budget,
        )
    }
}

// =========================================================
// Plan usage
// =========================================================

/// How much of the plan a client is using. Percentages are not clamped;
/// use [`PlanUsage::bar_percent`] for progress bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanUsage {
    pub plan: Plan,
    pub campaigns_used: usize,
    pub campaign_percent: f64,
    pub budget_used: f64,
    pub budget_percent: f64,
}

impl PlanUsage {
    /// Unknown plans are measured against Starter limits.
    pub fn compute(plan: Option<Plan>, campaigns: usize, monthly_budget: f64) -> Self {
        let plan = plan.unwrap_or_default();
        let limits = plan.limits();
        Self {
            plan,
            campaigns_used: campaigns,
            campaign_percent: campaigns as f64 / limits.campaigns as f64 * 100.0,
            budget_used: monthly_budget,
            budget_percent: monthly_budget / limits.budget as f64 * 100.0,
        }
    }

    pub fn bar_percent(value: f64) -> f64 {
        value.clamp(0.0, 100.0)
    }
}

// =========================================================
// Trend series (not served by the API)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevenuePoint {
    pub month: &'static str,
    pub revenue: f64,
    pub clients: u32,
}

pub const AGENCY_REVENUE_TREND: [RevenuePoint; 6] = [
    RevenuePoint {
        month: "Jan",
        revenue: 45_000.0,
        clients: 15,
    },
    RevenuePoint {
        month: "Fev",
        revenue: 52_000.0,
        clients: 18,
    },
    RevenuePoint {
        month: "Mar",
        revenue: 48_000.0,
        clients: 16,
    },
    RevenuePoint {
        month: "Abr",
        revenue: 61_000.0,
        clients: 22,
    },
    RevenuePoint {
        month: "Mai",
        revenue: 55_000.0,
        clients: 20,
    },
    RevenuePoint {
        month: "Jun",
        revenue: 67_000.0,
        clients: 25,
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformancePoint {
    pub month: &'static str,
    pub roi: f64,
    pub conversions: u32,
    pub revenue: f64,
}

pub const CLIENT_PERFORMANCE_TREND: [PerformancePoint; 6] = [
    PerformancePoint {
        month: "Jan",
        roi: 280.0,
        conversions: 45,
        revenue: 12_500.0,
    },
    PerformancePoint {
        month: "Fev",
        roi: 320.0,
        conversions: 52,
        revenue: 15_200.0,
    },
    PerformancePoint {
        month: "Mar",
        roi: 290.0,
        conversions: 48,
        revenue: 13_800.0,
    },
    PerformancePoint {
        month: "Abr",
        roi: 350.0,
        conversions: 61,
        revenue: 18_500.0,
    },
    PerformancePoint {
        month: "Mai",
        roi: 380.0,
        conversions: 55,
        revenue: 21_200.0,
    },
    PerformancePoint {
        month: "Jun",
        roi: 420.0,
        conversions: 67,
        revenue: 25_800.0,
    },
];

/// Scales values into `0..=height` against the series maximum.
pub fn scale_series(values: &[f64], height: f64) -> Vec<f64> {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v.max(0.0) / max * height).collect()
}

// =========================================================
// Formatting
// =========================================================

/// pt-BR number formatting: `.` groups thousands, `,` separates up to three
/// fraction digits, trailing zeros dropped (`12500` -> `12.500`).
pub fn format_number_br(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let scaled = (value.abs() * 1000.0).round() as u64;
    let (int_part, frac_part) = (scaled / 1000, scaled % 1000);

    let digits = int_part.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if value < 0.0 && scaled > 0 {
        out.push('-');
    }
    out.push_str(&grouped);
    if frac_part > 0 {
        let frac = format!("{:03}", frac_part);
        out.push(',');
        out.push_str(frac.trim_end_matches('0'));
    }
    out
}

/// `R$ 12.500`
pub fn format_brl(value: f64) -> String {
    format!("R$ {}", format_number_br(value))
}
