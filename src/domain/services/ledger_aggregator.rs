use std::collections::BTreeMap;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tracing::warn;

use crate::domain::models::ledger::LedgerRecord;
use crate::error::AppError;

/// Rounds to cents, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A record's MKD value in whole cents. Every bucket sums these, so
/// breakdowns always add up to their totals.
fn mkd_cents<R: LedgerRecord>(record: &R, rate: f64) -> i64 {
    (record.currency().to_mkd(record.amount(), rate) * 100.0).round() as i64
}

fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

fn mkd_to_eur(cents: i64, rate: f64) -> f64 {
    if rate > 0.0 { from_cents(cents) / rate } else { 0.0 }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub total_inflows_mkd: f64,
    pub total_inflows_eur: f64,
    pub total_outflows_mkd: f64,
    pub total_outflows_eur: f64,
    pub balance_mkd: f64,
    pub balance_eur: f64,
    pub today_inflows_mkd: f64,
    pub today_outflows_mkd: f64,
    pub month_inflows_mkd: f64,
    pub month_outflows_mkd: f64,
    pub exchange_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotals {
    pub date: String,
    pub inflows: f64,
    pub outflows: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub total_inflows_mkd: f64,
    pub total_outflows_mkd: f64,
    pub balance_mkd: f64,
    pub inflows_by_category: BTreeMap<String, f64>,
    pub outflows_by_category: BTreeMap<String, f64>,
    pub daily_data: Vec<DailyTotals>,
    pub exchange_rate: f64,
}

#[derive(Default)]
struct Buckets {
    total: i64,
    today: i64,
    month: i64,
}

fn bucket<R: LedgerRecord>(records: &[R], rate: f64, day_start: DateTime<Utc>, month_start: DateTime<Utc>) -> Buckets {
    let day_end = day_start + Duration::days(1);
    let mut buckets = Buckets::default();

    for record in records {
        let mkd = mkd_cents(record, rate);
        buckets.total += mkd;

        let Some(at) = record.recorded_at().resolve() else {
            warn!("Skipping unreadable ledger timestamp '{}' in time buckets", record.recorded_at().as_str());
            continue;
        };
        if at >= day_start && at < day_end {
            buckets.today += mkd;
        }
        if at >= month_start {
            buckets.month += mkd;
        }
    }
    buckets
}

/// Dashboard figures over the full ledger, converted at a single `rate`.
pub fn summarize<I: LedgerRecord, O: LedgerRecord>(inflows: &[I], outflows: &[O], rate: f64, as_of: DateTime<Utc>) -> LedgerSummary {
    let day_start = Utc
        .with_ymd_and_hms(as_of.year(), as_of.month(), as_of.day(), 0, 0, 0)
        .single()
        .unwrap_or(as_of);
    let month_start = Utc
        .with_ymd_and_hms(as_of.year(), as_of.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(day_start);

    let ins = bucket(inflows, rate, day_start, month_start);
    let outs = bucket(outflows, rate, day_start, month_start);
    let balance = ins.total - outs.total;

    LedgerSummary {
        total_inflows_mkd: from_cents(ins.total),
        total_inflows_eur: round2(mkd_to_eur(ins.total, rate)),
        total_outflows_mkd: from_cents(outs.total),
        total_outflows_eur: round2(mkd_to_eur(outs.total, rate)),
        balance_mkd: from_cents(balance),
        balance_eur: round2(mkd_to_eur(balance, rate)),
        today_inflows_mkd: from_cents(ins.today),
        today_outflows_mkd: from_cents(outs.today),
        month_inflows_mkd: from_cents(ins.month),
        month_outflows_mkd: from_cents(outs.month),
        exchange_rate: rate,
    }
}

/// `[first of month, first of next month)` in UTC.
pub fn month_window(year: i32, month: u32) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::Validation(format!("Invalid month: {}", month)));
    }
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::Validation(format!("Invalid year: {}", year)))?;
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| AppError::Validation(format!("Invalid year: {}", year)))?;

    let midnight = |d: NaiveDate| d.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    match (midnight(start), midnight(end)) {
        (Some(s), Some(e)) => Ok((s, e)),
        _ => Err(AppError::Internal),
    }
}

struct MonthSide {
    total: i64,
    by_category: BTreeMap<String, i64>,
}

fn collect_month<R: LedgerRecord>(
    records: &[R],
    rate: f64,
    window: (DateTime<Utc>, DateTime<Utc>),
    daily: &mut BTreeMap<String, (i64, i64)>,
    outgoing: bool,
) -> MonthSide {
    let mut side = MonthSide { total: 0, by_category: BTreeMap::new() };

    for record in records {
        let Some(at) = record.recorded_at().resolve() else {
            warn!("Skipping unreadable ledger timestamp '{}' in monthly report", record.recorded_at().as_str());
            continue;
        };
        if at < window.0 || at >= window.1 {
            continue;
        }

        let mkd = mkd_cents(record, rate);
        side.total += mkd;
        *side.by_category.entry(record.category().to_string()).or_insert(0) += mkd;

        let day = daily.entry(at.format("%Y-%m-%d").to_string()).or_insert((0, 0));
        if outgoing { day.1 += mkd } else { day.0 += mkd }
    }
    side
}

pub fn monthly_report<I: LedgerRecord, O: LedgerRecord>(
    inflows: &[I],
    outflows: &[O],
    rate: f64,
    year: i32,
    month: u32,
) -> Result<MonthlyReport, AppError> {
    let window = month_window(year, month)?;
    let mut daily = BTreeMap::new();

    let ins = collect_month(inflows, rate, window, &mut daily, false);
    let outs = collect_month(outflows, rate, window, &mut daily, true);

    let in_mkd = |m: BTreeMap<String, i64>| -> BTreeMap<String, f64> { m.into_iter().map(|(k, v)| (k, from_cents(v))).collect() };

    Ok(MonthlyReport {
        year,
        month,
        total_inflows_mkd: from_cents(ins.total),
        total_outflows_mkd: from_cents(outs.total),
        balance_mkd: from_cents(ins.total - outs.total),
        inflows_by_category: in_mkd(ins.by_category),
        outflows_by_category: in_mkd(outs.by_category),
        daily_data: daily
            .into_iter()
            .filter(|(_, (i, o))| *i > 0 || *o > 0)
            .map(|(date, (i, o))| DailyTotals { date, inflows: from_cents(i), outflows: from_cents(o) })
            .collect(),
        exchange_rate: rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        ledger::{CashInflow, CashOutflow, Currency, InflowDetails, OutflowDetails, PaymentMethod},
        timestamp::StoredTimestamp,
    };

    fn inflow(amount: f64, currency: Currency, category: &str, at: &str) -> CashInflow {
        let mut record = CashInflow::new(
            InflowDetails {
                category: category.into(),
                description: "visit".into(),
                amount,
                currency,
                payment_method: PaymentMethod::Cash,
                patient_id: None,
                invoice_id: None,
            },
            None,
        );
        record.recorded_at = StoredTimestamp::from_raw(at);
        record
    }

    fn outflow(amount: f64, currency: Currency, category: &str, at: &str) -> CashOutflow {
        let mut record = CashOutflow::new(
            OutflowDetails { category: category.into(), description: "supplies".into(), amount, currency },
            None,
        );
        record.recorded_at = StoredTimestamp::from_raw(at);
        record
    }

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_mixed_currency_totals() {
        let inflows = vec![
            inflow(1000.0, Currency::Mkd, "consultation", "2024-03-01T10:00:00Z"),
            inflow(10.0, Currency::Eur, "consultation", "2024-03-02T10:00:00Z"),
        ];
        let stats = summarize(&inflows, &Vec::<CashOutflow>::new(), 61.5, at("2024-03-10T12:00:00Z"));

        assert_eq!(stats.total_inflows_mkd, 1615.00);
        assert_eq!(stats.total_inflows_eur, 26.26);
        assert_eq!(stats.balance_mkd, 1615.00);
        assert_eq!(stats.exchange_rate, 61.5);
    }

    #[test]
    fn test_today_and_month_buckets() {
        let inflows = vec![
            inflow(100.0, Currency::Mkd, "a", "2024-03-10T00:00:00Z"),
            inflow(50.0, Currency::Mkd, "a", "2024-03-09T23:59:59Z"),
            inflow(25.0, Currency::Mkd, "a", "2024-02-29T12:00:00Z"),
        ];
        let outflows = vec![outflow(40.0, Currency::Mkd, "rent", "2024-03-10T08:00:00")];
        let stats = summarize(&inflows, &outflows, 61.5, at("2024-03-10T15:00:00Z"));

        assert_eq!(stats.today_inflows_mkd, 100.0);
        assert_eq!(stats.month_inflows_mkd, 150.0);
        assert_eq!(stats.total_inflows_mkd, 175.0);
        assert_eq!(stats.today_outflows_mkd, 40.0);
        assert_eq!(stats.balance_mkd, 135.0);
    }

    #[test]
    fn test_unreadable_timestamps_count_only_in_totals() {
        let inflows = vec![
            inflow(100.0, Currency::Mkd, "a", "not a timestamp"),
            inflow(10.0, Currency::Mkd, "a", "2024-03-10T09:00:00Z"),
        ];
        let stats = summarize(&inflows, &Vec::<CashOutflow>::new(), 61.5, at("2024-03-10T15:00:00Z"));
        assert_eq!(stats.total_inflows_mkd, 110.0);
        assert_eq!(stats.today_inflows_mkd, 10.0);
        assert_eq!(stats.month_inflows_mkd, 10.0);

        let report = monthly_report(&inflows, &Vec::<CashOutflow>::new(), 61.5, 2024, 3).unwrap();
        assert_eq!(report.total_inflows_mkd, 10.0);
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let inflows = vec![inflow(12.345, Currency::Eur, "a", "2024-03-10T09:00:00Z")];
        let outflows = vec![outflow(3.0, Currency::Eur, "b", "2024-03-01T09:00:00Z")];
        let now = at("2024-03-10T15:00:00Z");
        assert_eq!(summarize(&inflows, &outflows, 61.7, now), summarize(&inflows, &outflows, 61.7, now));
    }

    #[test]
    fn test_single_active_day() {
        let inflows = vec![inflow(500.0, Currency::Mkd, "consultation", "2024-05-05T09:00:00Z")];
        let outflows = vec![outflow(200.0, Currency::Mkd, "supplies", "2024-05-05T17:30:00Z")];
        let report = monthly_report(&inflows, &outflows, 61.5, 2024, 5).unwrap();

        assert_eq!(
            report.daily_data,
            vec![DailyTotals { date: "2024-05-05".into(), inflows: 500.0, outflows: 200.0 }]
        );
        assert_eq!(report.balance_mkd, 300.0);
        assert_eq!(report.inflows_by_category.get("consultation"), Some(&500.0));
        assert_eq!(report.outflows_by_category.get("supplies"), Some(&200.0));
    }

    #[test]
    fn test_next_month_boundary_is_excluded() {
        let inflows = vec![
            inflow(100.0, Currency::Mkd, "a", "2024-12-31T23:59:59.999Z"),
            inflow(900.0, Currency::Mkd, "a", "2025-01-01T00:00:00Z"),
        ];
        let report = monthly_report(&inflows, &Vec::<CashOutflow>::new(), 61.5, 2024, 12).unwrap();
        assert_eq!(report.total_inflows_mkd, 100.0);
        assert_eq!(report.daily_data.len(), 1);
        assert_eq!(report.daily_data[0].date, "2024-12-31");
    }

    #[test]
    fn test_categories_and_days_reconcile_with_totals() {
        let inflows = vec![
            inflow(10.0, Currency::Eur, "x", "2024-06-01T09:00:00Z"),
            inflow(300.0, Currency::Mkd, "y", "2024-06-03T09:00:00Z"),
            inflow(45.5, Currency::Mkd, "x", "2024-06-03T10:00:00Z"),
        ];
        let outflows = vec![outflow(2.0, Currency::Eur, "z", "2024-06-20T09:00:00Z")];
        let report = monthly_report(&inflows, &outflows, 61.5, 2024, 6).unwrap();

        assert_eq!(report.total_inflows_mkd, 960.5);
        assert_eq!(sum_categories(&report.inflows_by_category), report.total_inflows_mkd);
        assert_eq!(sum_daily_inflows(&report), report.total_inflows_mkd);
        assert_eq!(report.total_outflows_mkd, 123.0);

        let dates: Vec<_> = report.daily_data.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-06-01", "2024-06-03", "2024-06-20"]);
    }

    fn sum_categories(categories: &BTreeMap<String, f64>) -> f64 {
        round2(categories.values().sum())
    }

    fn sum_daily_inflows(report: &MonthlyReport) -> f64 {
        round2(report.daily_data.iter().map(|d| d.inflows).sum())
    }

    #[test]
    fn test_sub_cent_amounts_still_reconcile() {
        let inflows = vec![
            inflow(0.004, Currency::Mkd, "a", "2024-06-01T09:00:00Z"),
            inflow(0.004, Currency::Mkd, "b", "2024-06-02T09:00:00Z"),
            inflow(0.006, Currency::Mkd, "a", "2024-06-03T09:00:00Z"),
            inflow(0.3333, Currency::Eur, "b", "2024-06-03T10:00:00Z"),
        ];
        let report = monthly_report(&inflows, &Vec::<CashOutflow>::new(), 61.5, 2024, 6).unwrap();

        // 0 + 0 + 1 + 2050 cents
        assert_eq!(report.total_inflows_mkd, 20.51);
        assert_eq!(sum_categories(&report.inflows_by_category), report.total_inflows_mkd);
        assert_eq!(sum_daily_inflows(&report), report.total_inflows_mkd);
        assert_eq!(report.daily_data.len(), 1);
        assert_eq!(report.daily_data[0].date, "2024-06-03");

        let stats = summarize(&inflows, &Vec::<CashOutflow>::new(), 61.5, at("2024-06-03T15:00:00Z"));
        assert_eq!(stats.total_inflows_mkd, 20.51);
        assert_eq!(stats.month_inflows_mkd, stats.total_inflows_mkd);
        assert_eq!(stats.today_inflows_mkd, 20.51);
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        let empty: Vec<CashInflow> = Vec::new();
        assert!(matches!(monthly_report(&empty, &Vec::<CashOutflow>::new(), 61.5, 2024, 13), Err(AppError::Validation(_))));
        assert!(matches!(monthly_report(&empty, &Vec::<CashOutflow>::new(), 61.5, 2024, 0), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(round2(2.675_000_1), 2.68);
        assert_eq!(round2(-1.005_000_1), -1.01);
        assert_eq!(round2(26.260_162), 26.26);
    }
}
