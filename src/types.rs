use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a recorded payment
pub type PaymentId = Uuid;

/// spacing between consecutive installment due dates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepaymentCycle {
    /// every 7 days
    Weekly,
    /// every 14 days
    Biweekly,
    /// every 30 days, not calendar months
    #[default]
    Monthly,
    /// any other number of days
    Custom(u32),
}

impl RepaymentCycle {
    /// cycle length in days
    pub fn days(&self) -> u32 {
        match self {
            RepaymentCycle::Weekly => 7,
            RepaymentCycle::Biweekly => 14,
            RepaymentCycle::Monthly => 30,
            RepaymentCycle::Custom(days) => *days,
        }
    }

    /// map a day count back to a named cycle where one exists
    pub fn from_days(days: u32) -> Self {
        match days {
            7 => RepaymentCycle::Weekly,
            14 => RepaymentCycle::Biweekly,
            30 => RepaymentCycle::Monthly,
            other => RepaymentCycle::Custom(other),
        }
    }

    /// parse a form value: either a cycle name or a day count
    pub fn parse(input: &str) -> Option<Self> {
        let value = input.trim();
        match value.to_ascii_lowercase().as_str() {
            "weekly" => Some(RepaymentCycle::Weekly),
            "biweekly" | "bi-weekly" | "fortnightly" => Some(RepaymentCycle::Biweekly),
            "monthly" => Some(RepaymentCycle::Monthly),
            _ => value.parse::<u32>().ok().map(RepaymentCycle::from_days),
        }
    }
}

/// how a payment was made
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    MobileMoney,
    Card,
    Cheque,
    /// anything the backend sends that we don't recognise
    Other(String),
    #[default]
    Unspecified,
}

impl PaymentMethod {
    /// lenient mapping from the backend's free-form method string
    pub fn parse(input: &str) -> Self {
        let normalized: String = input
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "" => PaymentMethod::Unspecified,
            "cash" => PaymentMethod::Cash,
            "banktransfer" | "bank" | "transfer" | "wire" => PaymentMethod::BankTransfer,
            "mobilemoney" | "mobile" | "mpesa" => PaymentMethod::MobileMoney,
            "card" | "creditcard" | "debitcard" => PaymentMethod::Card,
            "cheque" | "check" => PaymentMethod::Cheque,
            _ => PaymentMethod::Other(input.trim().to_string()),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "Cash"),
            PaymentMethod::BankTransfer => write!(f, "Bank Transfer"),
            PaymentMethod::MobileMoney => write!(f, "Mobile Money"),
            PaymentMethod::Card => write!(f, "Card"),
            PaymentMethod::Cheque => write!(f, "Cheque"),
            PaymentMethod::Other(name) => write!(f, "{}", name),
            PaymentMethod::Unspecified => write!(f, "Unspecified"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_days() {
        assert_eq!(RepaymentCycle::Weekly.days(), 7);
        assert_eq!(RepaymentCycle::Biweekly.days(), 14);
        assert_eq!(RepaymentCycle::Monthly.days(), 30);
        assert_eq!(RepaymentCycle::Custom(10).days(), 10);
        assert_eq!(RepaymentCycle::from_days(14), RepaymentCycle::Biweekly);
    }

    #[test]
    fn test_cycle_parse() {
        assert_eq!(RepaymentCycle::parse(" Monthly "), Some(RepaymentCycle::Monthly));
        assert_eq!(RepaymentCycle::parse("7"), Some(RepaymentCycle::Weekly));
        assert_eq!(RepaymentCycle::parse("0"), Some(RepaymentCycle::Custom(0)));
        assert_eq!(RepaymentCycle::parse("-3"), None);
        assert_eq!(RepaymentCycle::parse("quarterly"), None);
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!(PaymentMethod::parse("Bank Transfer"), PaymentMethod::BankTransfer);
        assert_eq!(PaymentMethod::parse("mobile_money"), PaymentMethod::MobileMoney);
        assert_eq!(PaymentMethod::parse(""), PaymentMethod::Unspecified);
        assert_eq!(
            PaymentMethod::parse("Crypto"),
            PaymentMethod::Other("Crypto".to_string())
        );
    }

    #[test]
    fn test_defaults() {
        assert_eq!(RepaymentCycle::default(), RepaymentCycle::Monthly);
        assert_eq!(PaymentMethod::default(), PaymentMethod::Unspecified);
    }
}
