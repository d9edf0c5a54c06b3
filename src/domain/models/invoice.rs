use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::str::FromStr;
use uuid::Uuid;

use super::{ledger::Currency, new_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Pending,
    Sent,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(InvoiceStatus::Draft),
            "pending" => Ok(InvoiceStatus::Pending),
            "sent" => Ok(InvoiceStatus::Sent),
            "paid" => Ok(InvoiceStatus::Paid),
            "cancelled" => Ok(InvoiceStatus::Cancelled),
            other => Err(format!("unknown invoice status '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InvoiceItem {
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub total: f64,
}

fn default_quantity() -> f64 {
    1.0
}

fn default_tax_rate() -> f64 {
    18.0
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Invoice {
    pub invoice_id: String,
    pub invoice_number: String,
    pub patient_id: String,
    pub patient_name: String,
    pub items: Vec<InvoiceItem>,
    pub subtotal: f64,
    pub tax_rate: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
    pub currency: Currency,
    pub status: InvoiceStatus,
    pub issue_date: String,
    pub due_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceDetails {
    pub invoice_number: Option<String>,
    pub patient_id: String,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
    #[serde(default)]
    pub tax_amount: f64,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub notes: Option<String>,
}

pub const UNKNOWN_PATIENT: &str = "Unknown";

impl Invoice {
    pub fn new(details: InvoiceDetails, patient_name: String, created_by: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            invoice_id: new_id("inv"),
            invoice_number: details.invoice_number.unwrap_or_else(|| generate_invoice_number(now)),
            patient_id: details.patient_id,
            patient_name,
            items: details.items,
            subtotal: details.subtotal,
            tax_rate: details.tax_rate,
            tax_amount: details.tax_amount,
            total_amount: details.total_amount,
            currency: details.currency,
            status: details.status,
            issue_date: details.issue_date.unwrap_or_else(|| now.format("%Y-%m-%d").to_string()),
            due_date: details.due_date,
            notes: details.notes,
            created_at: now,
            created_by,
        }
    }

    pub fn apply(&mut self, details: InvoiceDetails, patient_name: String) {
        if let Some(number) = details.invoice_number {
            self.invoice_number = number;
        }
        if let Some(issue_date) = details.issue_date {
            self.issue_date = issue_date;
        }
        self.patient_id = details.patient_id;
        self.patient_name = patient_name;
        self.items = details.items;
        self.subtotal = details.subtotal;
        self.tax_rate = details.tax_rate;
        self.tax_amount = details.tax_amount;
        self.total_amount = details.total_amount;
        self.currency = details.currency;
        self.status = details.status;
        self.due_date = details.due_date;
        self.notes = details.notes;
    }
}

/// `INV-YYYYMM-XXXX` with a random upper-case hex suffix.
pub fn generate_invoice_number(now: DateTime<Utc>) -> String {
    let random_part = Uuid::new_v4().simple().to_string()[..4].to_uppercase();
    format!("INV-{}-{}", now.format("%Y%m"), random_part)
}
