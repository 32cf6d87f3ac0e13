use kmval_core::Expectation;

use crate::model::CheckResult;
use crate::tools::NULL_OUTPUT;

/// Compare trimmed query output against an expectation.
pub fn evaluate(expectation: &Expectation, output: &str) -> bool {
    let output = output.trim();
    match expectation {
        Expectation::Presence(expected) => (output != NULL_OUTPUT) == *expected,
        Expectation::ExactString(expected) => output == expected,
        Expectation::Substring(expected) => output.contains(expected.as_str()),
        Expectation::ExactInteger(expected) => output == expected.to_string(),
    }
}

/// Evaluate and describe one query result.
pub fn check(kind: &str, query: &str, expectation: &Expectation, output: &str) -> CheckResult {
    let passed = evaluate(expectation, output);
    let output = output.trim();

    let (expected, actual) = match expectation {
        Expectation::Presence(expected) => (
            expected.to_string(),
            if output == NULL_OUTPUT {
                "undefined".to_string()
            } else {
                "defined".to_string()
            },
        ),
        Expectation::ExactString(expected) => (expected.clone(), output.to_string()),
        Expectation::Substring(expected) => (format!("to contain {expected}"), output.to_string()),
        Expectation::ExactInteger(expected) => (expected.to_string(), output.to_string()),
    };

    CheckResult {
        kind: kind.to_string(),
        query: query.to_string(),
        validation: expectation.kind(),
        expected,
        actual,
        passed,
    }
}
