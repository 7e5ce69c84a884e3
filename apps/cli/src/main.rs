#![deny(warnings)]

//! Headless CLI for running herd simulations and comparing scenarios.

use anyhow::{ensure, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser};
use herd_core::Params;
use herd_runtime::{
    compare, month_date, run_scenarios, MonthRecord, Scenario, ScenarioSet, SimSummary,
    SummaryDelta,
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_SHA"),
    " ",
    env!("BUILD_DATE"),
    ")"
);

const DEFAULT_MONTHS: u32 = 120;

#[derive(Parser, Debug)]
#[command(name = "herd-sim", version, long_version = LONG_VERSION)]
#[command(about = "Cohort-based breeding and fattening herd simulator")]
struct Cli {
    /// Parameter file (YAML or JSON); missing keys take defaults
    #[arg(long, conflicts_with = "scenarios")]
    params: Option<PathBuf>,

    /// Scenario file (YAML or JSON) listing named parameter sets
    #[arg(long)]
    scenarios: Option<PathBuf>,

    /// Months to simulate [default: 120, or the scenario file's value]
    #[arg(long)]
    months: Option<u32>,

    /// Calendar month of simulated month 1 (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Include the monthly trace
    #[arg(long)]
    trace: bool,

    #[command(flatten)]
    overrides: Overrides,
}

/// Per-field overrides applied on top of every loaded parameter set.
#[derive(Args, Debug, Default)]
struct Overrides {
    /// Initial breeding herd
    #[arg(long)]
    herd_size: Option<u64>,
    /// Conception rate in [0,1]
    #[arg(long)]
    conception_rate: Option<Decimal>,
    /// Female share of births in [0,1]
    #[arg(long)]
    female_ratio: Option<Decimal>,
    /// Replacement heifers swapped in per mating
    #[arg(long)]
    replacements: Option<u64>,
    /// Farm-wide head ceiling
    #[arg(long)]
    capacity: Option<u64>,
    /// Maintenance cost per head per month
    #[arg(long)]
    cost_monthly: Option<Decimal>,
    #[arg(long)]
    price_calf: Option<Decimal>,
    #[arg(long)]
    price_beef_female: Option<Decimal>,
    #[arg(long)]
    price_beef_male: Option<Decimal>,
    #[arg(long)]
    price_old_cow: Option<Decimal>,
}

impl Overrides {
    fn apply(&self, p: &mut Params) {
        if let Some(v) = self.herd_size {
            p.herd_size = v;
        }
        if let Some(v) = self.conception_rate {
            p.conception_rate = v;
        }
        if let Some(v) = self.female_ratio {
            p.female_ratio = v;
        }
        if let Some(v) = self.replacements {
            p.replacement_n_each_mating = v;
        }
        if let Some(v) = self.capacity {
            p.max_total_capacity = v;
        }
        if let Some(v) = self.cost_monthly {
            p.cost_monthly_per_head = v;
        }
        if let Some(v) = self.price_calf {
            p.price_calf_sale = v;
        }
        if let Some(v) = self.price_beef_female {
            p.price_beef_female = v;
        }
        if let Some(v) = self.price_beef_male {
            p.price_beef_male = v;
        }
        if let Some(v) = self.price_old_cow {
            p.price_old_cow = v;
        }
    }
}

#[derive(Serialize)]
struct TraceRow<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    #[serde(flatten)]
    record: &'a MonthRecord,
}

#[derive(Serialize)]
struct Report<'a> {
    name: &'a str,
    summary: &'a SimSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    delta: Option<SummaryDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Vec<TraceRow<'a>>>,
}

fn parse_text<T: DeserializeOwned>(text: &str, json: bool) -> Result<T> {
    if json {
        Ok(serde_json::from_str(text)?)
    } else {
        Ok(serde_yaml::from_str(text)?)
    }
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    parse_text(&text, json).with_context(|| format!("parsing {}", path.display()))
}

fn single_run(params: Option<&Path>) -> Result<ScenarioSet> {
    let (name, params) = match params {
        Some(path) => {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("params")
                .to_string();
            (name, load::<Params>(path)?)
        }
        None => ("default".to_string(), Params::default()),
    };
    Ok(ScenarioSet {
        months: DEFAULT_MONTHS,
        start_date: None,
        scenarios: vec![Scenario { name, params }],
    })
}

/// Whole-unit amount with thousands separators.
fn fmt_amount(d: Decimal) -> String {
    let rounded = d.round_dp(0);
    let digits = rounded.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn print_report(r: &Report) {
    let s = r.summary;
    let h = &s.heads;
    match s.annual_replacement_rate_pct {
        Some(rate) => println!("== {} | replacement rate {}%/yr", r.name, rate),
        None => println!("== {}", r.name),
    }
    let rows: [(&str, u64); 13] = [
        ("months run", u64::from(s.months_run)),
        ("replacements entered", h.replacements_entered),
        ("cows culled for replacement", h.cows_culled_for_replacement),
        ("cows aged out", h.cows_aged_out),
        ("females finished", h.females_finished),
        ("males finished", h.males_finished),
        ("males consigned", h.males_consigned),
        ("calves sold (female)", h.calves_sold_female),
        ("calves sold (male)", h.calves_sold_male),
        ("calves born", h.calves_born),
        ("total shipped", s.total_shipped),
        ("breeding herd", s.breeding_herd),
        ("total head count", s.total_head_count),
    ];
    for (label, value) in rows {
        println!("  {:<28} {:>12}", label, value);
    }
    let parity: Vec<String> = s.cows_by_parity.iter().map(u64::to_string).collect();
    println!("  {:<28} {:>12}", "cows by parity", parity.join(" "));
    for (stage, heads) in &s.stage_heads {
        println!("  {:<28} {:>12}", format!("in {:?}", stage), heads);
    }
    println!("  {:<28} {:>12}", "revenue", fmt_amount(s.revenue.total));
    println!("  {:<28} {:>12}", "maintenance cost", fmt_amount(s.maintenance_cost));
    println!("  {:<28} {:>12}", "net profit", fmt_amount(s.net_profit));
    if let Some(d) = &r.delta {
        println!(
            "  vs baseline: replacements {:+} | revenue {} | cost {} | net profit {}",
            d.extra_replacements,
            fmt_amount(d.revenue),
            fmt_amount(d.maintenance_cost),
            fmt_amount(d.net_profit)
        );
    }
    if let Some(rows) = &r.trace {
        println!("  {:>5} {:>10} {:>8} {:>8} {:>10} {:>14}", "month", "date", "heads", "herd", "phase", "cum cost");
        for row in rows {
            let date = row.date.map(|d| d.format("%Y-%m").to_string()).unwrap_or_default();
            println!(
                "  {:>5} {:>10} {:>8} {:>8} {:>10} {:>14}",
                row.record.month,
                date,
                row.record.total_head_count,
                row.record.breeding_herd,
                format!("{:?}", row.record.phase),
                fmt_amount(row.record.cumulative_cost)
            );
        }
    }
}

fn main() -> Result<()> {
    // Logging setup; stdout is reserved for results
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!(params = ?cli.params, scenarios = ?cli.scenarios, months = ?cli.months, "starting CLI");

    let set = match &cli.scenarios {
        Some(path) => load::<ScenarioSet>(path)?,
        None => single_run(cli.params.as_deref())?,
    };
    ensure!(!set.scenarios.is_empty(), "no scenarios to run");
    let months = cli.months.unwrap_or(set.months);
    let start = cli.start.or(set.start_date);
    let scenarios: Vec<Scenario> = set
        .scenarios
        .into_iter()
        .map(|mut s| {
            cli.overrides.apply(&mut s.params);
            s
        })
        .collect();

    let outcomes = run_scenarios(&scenarios, months).context("invalid simulation input")?;
    let baseline = &outcomes[0].summary;
    let reports: Vec<Report> = outcomes
        .iter()
        .enumerate()
        .map(|(i, o)| Report {
            name: &o.name,
            summary: &o.summary,
            delta: (i > 0).then(|| compare(baseline, &o.summary)),
            trace: cli.trace.then(|| {
                o.trace
                    .iter()
                    .map(|record| TraceRow {
                        date: start.map(|d| month_date(d, record.month)),
                        record,
                    })
                    .collect()
            }),
        })
        .collect();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for r in &reports {
            print_report(r);
        }
    }
    Ok(())
}
