#![cfg(test)]

use anyhow::Result;
use rdf_algebra_testsuite::check_testsuite;
use std::path::Path;

#[test]
fn bundled_fixtures() -> Result<()> {
    check_testsuite(&Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures"), &[])
}
