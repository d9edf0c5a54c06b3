use std::collections::BTreeMap;
use std::str::FromStr;
use serde_json::{json, Map, Value};

use crate::domain::models::{
    invoice::Invoice,
    ledger::{CashInflow, CashOutflow, Currency},
    patient::Patient,
};
use crate::domain::services::ledger_aggregator::round2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("Unsupported export format '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportKind {
    #[default]
    Inflows,
    Outflows,
    Patients,
    Invoices,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Inflows => "inflows",
            ExportKind::Outflows => "outflows",
            ExportKind::Patients => "patients",
            ExportKind::Invoices => "invoices",
        }
    }
}

impl FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inflows" => Ok(ExportKind::Inflows),
            "outflows" => Ok(ExportKind::Outflows),
            "patients" => Ok(ExportKind::Patients),
            "invoices" => Ok(ExportKind::Invoices),
            other => Err(format!("Unsupported export type '{}'", other)),
        }
    }
}

/// A flat, format-independent view of one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    /// Sum of `amount` per original currency, ledger exports only.
    pub totals: Option<BTreeMap<String, f64>>,
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn totals_by_currency(amounts: impl Iterator<Item = (Currency, f64)>) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for (currency, amount) in amounts {
        *totals.entry(currency.to_string()).or_insert(0.0) += amount;
    }
    totals.into_iter().map(|(k, v)| (k, round2(v))).collect()
}

impl ExportTable {
    pub fn inflows(records: &[CashInflow]) -> Self {
        Self {
            headers: vec!["id", "category", "description", "amount", "currency", "payment_method", "date"],
            rows: records
                .iter()
                .map(|r| vec![
                    r.inflow_id.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    r.amount.to_string(),
                    r.currency.to_string(),
                    r.payment_method.as_str().to_string(),
                    r.recorded_at.as_str().to_string(),
                ])
                .collect(),
            totals: Some(totals_by_currency(records.iter().map(|r| (r.currency, r.amount)))),
        }
    }

    pub fn outflows(records: &[CashOutflow]) -> Self {
        Self {
            headers: vec!["id", "category", "description", "amount", "currency", "date"],
            rows: records
                .iter()
                .map(|r| vec![
                    r.outflow_id.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    r.amount.to_string(),
                    r.currency.to_string(),
                    r.recorded_at.as_str().to_string(),
                ])
                .collect(),
            totals: Some(totals_by_currency(records.iter().map(|r| (r.currency, r.amount)))),
        }
    }

    pub fn patients(records: &[Patient]) -> Self {
        Self {
            headers: vec!["id", "first_name", "last_name", "phone", "email", "address"],
            rows: records
                .iter()
                .map(|p| vec![
                    p.patient_id.clone(),
                    p.first_name.clone(),
                    p.last_name.clone(),
                    opt(&p.phone),
                    opt(&p.email),
                    opt(&p.address),
                ])
                .collect(),
            totals: None,
        }
    }

    pub fn invoices(records: &[Invoice]) -> Self {
        Self {
            headers: vec!["id", "invoice_number", "patient", "total_amount", "currency", "status", "issue_date"],
            rows: records
                .iter()
                .map(|i| vec![
                    i.invoice_id.clone(),
                    i.invoice_number.clone(),
                    i.patient_name.clone(),
                    i.total_amount.to_string(),
                    i.currency.to_string(),
                    i.status.as_str().to_string(),
                    i.issue_date.clone(),
                ])
                .collect(),
            totals: None,
        }
    }

    pub fn render(&self, format: ExportFormat) -> String {
        match format {
            ExportFormat::Csv => self.to_csv(),
            ExportFormat::Json => self.to_json().to_string(),
        }
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_csv_line(&mut out, self.headers.iter().copied());
        for row in &self.rows {
            push_csv_line(&mut out, row.iter().map(String::as_str));
        }
        if let Some(totals) = &self.totals {
            for (currency, total) in totals {
                let label = format!("TOTAL {}", currency);
                let amount = total.to_string();
                push_csv_line(&mut out, [label.as_str(), amount.as_str()].into_iter());
            }
        }
        out
    }

    pub fn to_json(&self) -> Value {
        let rows: Vec<Value> = self.rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = self.headers
                    .iter()
                    .zip(row)
                    .map(|(h, v)| (h.to_string(), Value::String(v.clone())))
                    .collect();
                Value::Object(object)
            })
            .collect();

        match &self.totals {
            Some(totals) => json!({ "rows": rows, "totals": totals }),
            None => json!({ "rows": rows }),
        }
    }
}

fn push_csv_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let line: Vec<String> = fields.map(escape_csv).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
