//! backend records and their validation into domain loans

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::config::TrackerConfig;
use crate::dates::parse_calendar_date;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::loan::{Loan, Payment};
use crate::types::{LoanId, PaymentId, PaymentMethod};

/// loan as returned by the REST backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    #[serde(default)]
    pub id: Option<LoanId>,
    #[serde(default)]
    pub borrower_name: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub disbursement_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
}

/// payment as returned by the REST backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    #[serde(default)]
    pub id: Option<PaymentId>,
    #[serde(default)]
    pub payment_amount: Option<Decimal>,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl LoanRecord {
    /// validate into a domain loan
    ///
    /// gaps degrade: missing amount leaves the principal unknown, unreadable
    /// dates are dropped, missing ids are generated. negative amounts, amounts
    /// beyond [`Money::MAX_AMOUNT`] and payments without an amount are rejected.
    pub fn into_loan(self, config: &TrackerConfig) -> Result<Loan> {
        let id = self.id.unwrap_or_else(Uuid::new_v4);

        let principal = match self.amount.map(Money::from_decimal) {
            Some(amount) if amount.is_negative() => {
                return Err(LoanError::InvalidPrincipal { amount });
            }
            Some(amount) if !amount.is_within_range() => {
                return Err(LoanError::AmountOutOfRange { amount });
            }
            Some(amount) => Some(amount),
            None => {
                warn!(loan_id = %id, "loan record has no amount");
                None
            }
        };

        let currency = match self.currency.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code.to_ascii_uppercase(),
            _ => config.default_currency.clone(),
        };

        let payments = self
            .payments
            .into_iter()
            .map(|record| record.into_payment(id))
            .collect::<Result<Vec<_>>>()?;

        Ok(Loan {
            id,
            borrower_name: self.borrower_name.filter(|name| !name.trim().is_empty()),
            principal,
            currency,
            disbursement_date: read_date(id, "disbursementDate", self.disbursement_date.as_deref()),
            due_date: read_date(id, "dueDate", self.due_date.as_deref()),
            payments,
        })
    }
}

impl PaymentRecord {
    fn into_payment(self, loan_id: LoanId) -> Result<Payment> {
        let amount = self
            .payment_amount
            .map(Money::from_decimal)
            .ok_or(LoanError::MissingPaymentAmount { loan_id })?;
        if amount.is_negative() {
            return Err(LoanError::InvalidPaymentAmount { amount });
        }
        if !amount.is_within_range() {
            return Err(LoanError::AmountOutOfRange { amount });
        }

        Ok(Payment {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            amount,
            date: read_date(loan_id, "paymentDate", self.payment_date.as_deref()),
            method: self
                .payment_method
                .as_deref()
                .map(PaymentMethod::parse)
                .unwrap_or_default(),
        })
    }
}

impl From<&Loan> for LoanRecord {
    fn from(loan: &Loan) -> Self {
        LoanRecord {
            id: Some(loan.id),
            borrower_name: loan.borrower_name.clone(),
            amount: loan.principal.map(|p| p.as_decimal()),
            currency: Some(loan.currency.clone()),
            disbursement_date: loan.disbursement_date.map(|d| d.to_string()),
            due_date: loan.due_date.map(|d| d.to_string()),
            payments: loan
                .payments
                .iter()
                .map(|p| PaymentRecord {
                    id: Some(p.id),
                    payment_amount: Some(p.amount.as_decimal()),
                    payment_date: p.date.map(|d| d.to_string()),
                    payment_method: Some(p.method.to_string()),
                })
                .collect(),
        }
    }
}

fn read_date(loan_id: LoanId, field: &str, raw: Option<&str>) -> Option<chrono::NaiveDate> {
    let raw = raw?;
    let parsed = parse_calendar_date(raw);
    if parsed.is_none() && !raw.trim().is_empty() {
        warn!(loan_id = %loan_id, field, value = raw, "unreadable date in loan record, ignoring");
    }
    parsed
}

/// parse a json array of loan records
pub fn parse_loans(json: &str, config: &TrackerConfig) -> Result<Vec<Loan>> {
    let records: Vec<LoanRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .map(|record| record.into_loan(config))
        .collect()
}

/// parse a single loan record
pub fn parse_loan(json: &str, config: &TrackerConfig) -> Result<Loan> {
    let record: LoanRecord = serde_json::from_str(json)?;
    record.into_loan(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const BACKEND_LOAN: &str = r#"{
        "id": "7d3c8a52-4f55-4c1e-9a0e-2f1f6e0d9b11",
        "borrowerName": "Amina Njoroge",
        "amount": 5000,
        "currency": "kes",
        "disbursementDate": "2023-10-27T09:00:00.000Z",
        "dueDate": "2024-10-21",
        "payments": [
            { "paymentAmount": 416.67, "paymentDate": "2023-11-26", "paymentMethod": "Mobile Money" },
            { "paymentAmount": "416.67", "paymentDate": "2023-12-26T10:15:00Z", "paymentMethod": "cash" }
        ]
    }"#;

    #[test]
    fn test_parse_backend_loan() {
        let loan = parse_loan(BACKEND_LOAN, &TrackerConfig::default()).unwrap();

        assert_eq!(loan.id.to_string(), "7d3c8a52-4f55-4c1e-9a0e-2f1f6e0d9b11");
        assert_eq!(loan.borrower_name.as_deref(), Some("Amina Njoroge"));
        assert_eq!(loan.principal, Some(Money::from_major(5000)));
        assert_eq!(loan.currency, "KES");
        assert_eq!(loan.disbursement_date, NaiveDate::from_ymd_opt(2023, 10, 27));
        assert_eq!(loan.due_date, NaiveDate::from_ymd_opt(2024, 10, 21));
        assert_eq!(loan.payments.len(), 2);
        assert_eq!(loan.payments[0].amount.as_decimal(), dec!(416.67));
        assert_eq!(loan.payments[0].method, PaymentMethod::MobileMoney);
        assert_eq!(loan.payments[1].amount.as_decimal(), dec!(416.67));
        assert_eq!(loan.payments[1].date, NaiveDate::from_ymd_opt(2023, 12, 26));
    }

    #[test]
    fn test_sparse_record_degrades() {
        let loan = parse_loan(
            r#"{ "dueDate": "someday", "payments": [ { "paymentAmount": 20 } ] }"#,
            &TrackerConfig::default(),
        )
        .unwrap();

        assert_eq!(loan.principal, None);
        assert_eq!(loan.currency, "USD");
        assert_eq!(loan.due_date, None);
        assert_eq!(loan.payments[0].method, PaymentMethod::Unspecified);
        assert_eq!(loan.payments[0].date, None);
    }

    #[test]
    fn test_null_fields_are_absent() {
        let loan = parse_loan(
            r#"{ "amount": null, "currency": null, "dueDate": null, "borrowerName": "  " }"#,
            &TrackerConfig::weekly("UGX"),
        )
        .unwrap();
        assert_eq!(loan.principal, None);
        assert_eq!(loan.currency, "UGX");
        assert_eq!(loan.borrower_name, None);
        assert!(loan.payments.is_empty());
    }

    #[test]
    fn test_rejects_negative_amounts() {
        let config = TrackerConfig::default();

        let err = parse_loan(r#"{ "amount": -1 }"#, &config).unwrap_err();
        assert!(matches!(err, LoanError::InvalidPrincipal { .. }));

        let err = parse_loan(
            r#"{ "amount": 100, "payments": [ { "paymentAmount": -5 } ] }"#,
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, LoanError::InvalidPaymentAmount { .. }));

        let err = parse_loan(r#"{ "amount": 100, "payments": [ {} ] }"#, &config).unwrap_err();
        assert!(matches!(err, LoanError::MissingPaymentAmount { .. }));
    }

    #[test]
    fn test_rejects_amounts_beyond_range() {
        let config = TrackerConfig::default();

        let err = parse_loan(
            r#"{ "amount": 1, "payments": [ { "paymentAmount": "1000000000000000000000000000" } ] }"#,
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, LoanError::AmountOutOfRange { .. }));

        let err = parse_loan(r#"{ "amount": "1000000000000000.01" }"#, &config).unwrap_err();
        assert!(matches!(err, LoanError::AmountOutOfRange { .. }));

        let loan = parse_loan(
            r#"{ "amount": "1000000000000000", "payments": [ { "paymentAmount": "1000000000000000" } ] }"#,
            &config,
        )
        .unwrap();
        assert_eq!(loan.principal, Some(Money::MAX_AMOUNT));
        assert_eq!(loan.payments[0].amount, Money::MAX_AMOUNT);
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_loans("{ not json", &TrackerConfig::default()).unwrap_err();
        assert!(matches!(err, LoanError::MalformedRecord(_)));

        let err = parse_loans(r#"[{ "amount": "lots" }]"#, &TrackerConfig::default()).unwrap_err();
        assert!(matches!(err, LoanError::MalformedRecord(_)));
    }

    #[test]
    fn test_parse_many_and_back() {
        let json = format!("[{}, {{ \"amount\": 250 }}]", BACKEND_LOAN);
        let loans = parse_loans(&json, &TrackerConfig::default()).unwrap();
        assert_eq!(loans.len(), 2);

        let record = LoanRecord::from(&loans[0]);
        assert_eq!(record.due_date.as_deref(), Some("2024-10-21"));
        assert_eq!(record.payments[0].payment_method.as_deref(), Some("Mobile Money"));

        let again = record.into_loan(&TrackerConfig::default()).unwrap();
        assert_eq!(again, loans[0]);
    }
}
