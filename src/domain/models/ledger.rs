use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{new_id, timestamp::StoredTimestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    #[serde(rename = "MKD")]
    Mkd,
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Mkd => "MKD",
            Currency::Eur => "EUR",
        }
    }

    /// Converts into the reporting currency (MKD) at `eur_to_mkd`.
    pub fn to_mkd(&self, amount: f64, eur_to_mkd: f64) -> f64 {
        match self {
            Currency::Mkd => amount,
            Currency::Eur => amount * eur_to_mkd,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MKD" => Ok(Currency::Mkd),
            "EUR" => Ok(Currency::Eur),
            other => Err(format!("unknown currency '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "transfer" => Ok(PaymentMethod::Transfer),
            other => Err(format!("unknown payment method '{}'", other)),
        }
    }
}

/// Anything the ledger aggregator can sum.
pub trait LedgerRecord {
    fn category(&self) -> &str;
    fn amount(&self) -> f64;
    fn currency(&self) -> Currency;
    fn recorded_at(&self) -> &StoredTimestamp;
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CashInflow {
    pub inflow_id: String,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub currency: Currency,
    pub payment_method: PaymentMethod,
    pub patient_id: Option<String>,
    pub invoice_id: Option<String>,
    pub recorded_at: StoredTimestamp,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InflowDetails {
    pub category: String,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub patient_id: Option<String>,
    pub invoice_id: Option<String>,
}

impl CashInflow {
    pub fn new(details: InflowDetails, created_by: Option<String>) -> Self {
        Self {
            inflow_id: new_id("in"),
            category: details.category,
            description: details.description,
            amount: details.amount,
            currency: details.currency,
            payment_method: details.payment_method,
            patient_id: details.patient_id,
            invoice_id: details.invoice_id,
            recorded_at: StoredTimestamp::now(),
            created_by,
        }
    }

    pub fn apply(&mut self, details: InflowDetails) {
        self.category = details.category;
        self.description = details.description;
        self.amount = details.amount;
        self.currency = details.currency;
        self.payment_method = details.payment_method;
        self.patient_id = details.patient_id;
        self.invoice_id = details.invoice_id;
    }
}

impl LedgerRecord for CashInflow {
    fn category(&self) -> &str { &self.category }
    fn amount(&self) -> f64 { self.amount }
    fn currency(&self) -> Currency { self.currency }
    fn recorded_at(&self) -> &StoredTimestamp { &self.recorded_at }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CashOutflow {
    pub outflow_id: String,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub currency: Currency,
    pub recorded_at: StoredTimestamp,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutflowDetails {
    pub category: String,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: Currency,
}

impl CashOutflow {
    pub fn new(details: OutflowDetails, created_by: Option<String>) -> Self {
        Self {
            outflow_id: new_id("out"),
            category: details.category,
            description: details.description,
            amount: details.amount,
            currency: details.currency,
            recorded_at: StoredTimestamp::now(),
            created_by,
        }
    }

    pub fn apply(&mut self, details: OutflowDetails) {
        self.category = details.category;
        self.description = details.description;
        self.amount = details.amount;
        self.currency = details.currency;
    }
}

impl LedgerRecord for CashOutflow {
    fn category(&self) -> &str { &self.category }
    fn amount(&self) -> f64 { self.amount }
    fn currency(&self) -> Currency { self.currency }
    fn recorded_at(&self) -> &StoredTimestamp { &self.recorded_at }
}

pub fn validate_amount(amount: f64) -> Result<(), String> {
    if !amount.is_finite() || amount < 0.0 {
        return Err("Amount must be a non-negative number".to_string());
    }
    Ok(())
}
