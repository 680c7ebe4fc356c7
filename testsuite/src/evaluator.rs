use crate::algebra_evaluator::{
    evaluate_negative_syntax_test, evaluate_query_test, evaluate_update_test,
};
use crate::manifest::{Test, TestKind};
use crate::report::TestResult;
use anyhow::Result;
use time::OffsetDateTime;

#[derive(Debug, Default)]
pub struct TestEvaluator;

impl TestEvaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, tests: impl IntoIterator<Item = Test>) -> Vec<TestResult> {
        tests
            .into_iter()
            .map(|test| {
                let outcome = handle_test(&test);
                TestResult {
                    test: test.id,
                    kind: test.kind,
                    outcome,
                    date: OffsetDateTime::now_utc(),
                }
            })
            .collect()
    }
}

fn handle_test(test: &Test) -> Result<()> {
    match test.kind {
        TestKind::QueryEvaluation => evaluate_query_test(test),
        TestKind::UpdateEvaluation => evaluate_update_test(test),
        TestKind::NegativeSyntax => evaluate_negative_syntax_test(test),
    }
}
