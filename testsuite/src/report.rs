use crate::manifest::TestKind;
use anyhow::Result;
use rdf_algebra::model::{Dataset, QuadRef};
use std::fmt::Write;
use text_diff::{diff, Difference};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(Debug)]
pub struct TestResult {
    pub test: String,
    pub kind: TestKind,
    pub outcome: Result<()>,
    pub date: OffsetDateTime,
}

/// Renders the results as a plain text report with one line per test and a summary.
pub fn build_report(results: impl IntoIterator<Item = TestResult>) -> String {
    let mut report = String::new();
    let mut passed = 0;
    let mut failed = 0;
    for result in results {
        let date = result
            .date
            .format(&Rfc3339)
            .unwrap_or_else(|_| result.date.to_string());
        match &result.outcome {
            Ok(()) => {
                passed += 1;
                let _ = writeln!(report, "PASS {} ({}) {date}", result.test, result.kind);
            }
            Err(error) => {
                failed += 1;
                let _ = writeln!(
                    report,
                    "FAIL {} ({}) {date}\n{error:?}",
                    result.test, result.kind
                );
            }
        }
    }
    let _ = writeln!(report, "\n{passed} passed, {failed} failed");
    report
}

pub fn dataset_diff(expected: &Dataset, actual: &Dataset) -> String {
    format_diff(
        &normalize_dataset_text(expected),
        &normalize_dataset_text(actual),
        "quads",
    )
}

fn normalize_dataset_text(store: &Dataset) -> String {
    let mut quads: Vec<_> = store.iter().map(|q: QuadRef<'_>| q.to_string()).collect();
    quads.sort();
    quads.join("\n")
}

/// Formats a line based diff. Missing lines are prefixed with `-`, extra lines with `+`.
pub fn format_diff(expected: &str, actual: &str, kind: &str) -> String {
    let (_, changeset) = diff(expected, actual, "\n");
    let mut ret = String::new();
    let _ = writeln!(ret, "Note: missing {kind} are prefixed with - and extra {kind} with +");
    for seq in changeset {
        let _ = match seq {
            Difference::Same(x) => writeln!(ret, "  {x}"),
            Difference::Add(x) => writeln!(ret, "+ {x}"),
            Difference::Rem(x) => writeln!(ret, "- {x}"),
        };
    }
    ret
}
