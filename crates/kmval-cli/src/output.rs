use colored::Colorize;
use kmval_eval::{PlanOutcome, SuiteOutcome, plan_lines};

pub const SUITE_PASSED: &str = "Manifest validations passed!";
pub const SUITE_FAILED: &str = "Manifest validations failed!";

/// Print a plan as it completes: its id, then its sorted failures.
pub fn print_plan(outcome: &PlanOutcome) {
    let mut lines = plan_lines(outcome).into_iter();
    let Some(header) = lines.next() else {
        return;
    };

    if outcome.passed() {
        println!("{}", header.green());
        return;
    }

    println!();
    println!("{}", header.red());
    for line in lines {
        match line.strip_prefix("FAIL:") {
            Some(rest) => println!("{}:{rest}", "FAIL".red()),
            None => println!("{line}"),
        }
    }
    println!();
}

/// Print the closing summary of a suite run.
pub fn print_summary(outcome: &SuiteOutcome) {
    if outcome.success() {
        println!();
        println!("{}", SUITE_PASSED.green());
        return;
    }

    if !outcome.stopped_early {
        println!();
        for id in outcome.passed() {
            println!("{}", format!("PASSED: {id}").green());
        }

        println!();
        for id in outcome.failed() {
            println!("{}", format!("FAILED: {id}").red());
        }
    }

    println!();
    println!("{}", SUITE_FAILED.red());
}
