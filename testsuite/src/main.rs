#![allow(clippy::print_stdout)]
use anyhow::Result;
use clap::Parser;
use rdf_algebra_testsuite::evaluator::TestEvaluator;
use rdf_algebra_testsuite::manifest::discover_tests;
use rdf_algebra_testsuite::report::build_report;
use std::path::PathBuf;

#[derive(Parser)]
/// Runs the fixture tests of the given directories and prints a report
struct Args {
    /// Fixture directories with query/, update/ and negative/ subdirectories
    #[arg(required = true)]
    fixtures: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let evaluator = TestEvaluator::new();
    let mut results = Vec::new();
    for fixtures in &args.fixtures {
        results.extend(evaluator.evaluate(discover_tests(fixtures)?));
    }
    print!("{}", build_report(results));
    Ok(())
}
