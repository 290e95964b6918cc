/// schedule preview - what the loan request form shows while it is being filled in
use loan_tracker_rs::{InstallmentSchedule, LoanTerms, ScheduleDraft, TrackerConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== schedule preview ===\n");

    let config = TrackerConfig::weekly("KES");

    // the form as the user types into it
    let steps = [
        ScheduleDraft::default(),
        ScheduleDraft {
            principal: "12000".to_string(),
            ..ScheduleDraft::default()
        },
        ScheduleDraft {
            principal: "12000".to_string(),
            installment_count: "7".to_string(),
            ..ScheduleDraft::default()
        },
        ScheduleDraft {
            principal: "12000".to_string(),
            installment_count: "7".to_string(),
            first_due_date: "2024-03-04".to_string(),
            cycle: String::new(),
        },
        ScheduleDraft {
            principal: "12000".to_string(),
            installment_count: "7".to_string(),
            first_due_date: "2024-03-04".to_string(),
            cycle: "biweekly".to_string(),
        },
    ];

    for (step, draft) in steps.iter().enumerate() {
        let terms = LoanTerms::from_draft(draft, &config);
        let schedule = InstallmentSchedule::generate(&terms);

        println!("step {}: {:?}", step + 1, draft);
        if schedule.is_empty() {
            println!("   no schedule yet\n");
            continue;
        }

        for installment in &schedule.installments {
            println!(
                "   #{}  {}  {} {}",
                installment.installment_number,
                installment.due_date,
                installment.amount,
                config.default_currency
            );
        }
        println!(
            "   total {} (rounding {}), final due {}\n",
            schedule.total_scheduled,
            schedule.rounding_remainder,
            schedule.final_due_date().map(|d| d.to_string()).unwrap_or_default()
        );
    }

    Ok(())
}
