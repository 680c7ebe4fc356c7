//! Fixture-driven conformance tests of the RDF Algebra evaluator.

mod algebra_evaluator;
pub mod evaluator;
pub mod manifest;
pub mod report;

use crate::evaluator::TestEvaluator;
use crate::manifest::discover_tests;
use anyhow::Result;
use std::path::Path;

#[allow(clippy::panic_in_result_fn)]
pub fn check_testsuite(fixtures: &Path, ignored_tests: &[&str]) -> Result<()> {
    let results = TestEvaluator::new().evaluate(discover_tests(fixtures)?);
    let test_count = results.len();
    assert!(test_count > 0, "No test found in {}", fixtures.display());

    let mut errors = Vec::default();
    for result in results {
        if let Err(error) = &result.outcome {
            if !ignored_tests.contains(&result.test.as_str()) {
                errors.push(format!("{}: failed with error {error:?}", result.test))
            }
        }
    }

    assert!(
        errors.is_empty(),
        "{} tests failing from {} tests:\n{}\n",
        errors.len(),
        test_count,
        errors.join("\n")
    );
    Ok(())
}
