/// backend records - validate loan json from the API and render views
use loan_tracker_rs::{parse_loans, LoanView, SafeTimeProvider, StatusVocabulary, TimeSource, TrackerConfig};
use chrono::{TimeZone, Utc};

const RESPONSE: &str = r#"[
    {
        "id": "2f6e3b1c-8d1a-4a55-9c8e-0b5f3c6d7e81",
        "borrowerName": "Grace Achieng",
        "amount": 5000,
        "currency": "USD",
        "disbursementDate": "2023-10-27T09:00:00.000Z",
        "dueDate": "2024-05-01",
        "payments": [
            { "paymentAmount": 416.67, "paymentDate": "2023-11-26", "paymentMethod": "Mobile Money" },
            { "paymentAmount": 416.67, "paymentDate": "2023-12-26", "paymentMethod": "Mobile Money" }
        ]
    },
    {
        "borrowerName": "Samuel Mwangi",
        "amount": "1000.00",
        "dueDate": "not set",
        "payments": []
    }
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = TrackerConfig {
        status_vocabulary: StatusVocabulary::Repayment,
        ..TrackerConfig::default()
    };
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    ));

    let loans = parse_loans(RESPONSE, &config)?;
    for loan in &loans {
        let view = LoanView::from_loan(loan, time.now(), &config);
        println!("{}", view.to_json_pretty()?);
    }

    Ok(())
}
