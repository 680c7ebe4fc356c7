//! Discovery of the test fixtures.
//!
//! A fixture directory contains three kinds of tests, told apart by the directory they live in:
//!
//! - `query/**/<name>.sse`: a query in the SSE notation. The expected results are in
//!   `<name>.srj` (SPARQL JSON results) or `<name>.nt` (a graph).
//! - `update/**/<name>.sse`: an update. The expected dataset is in `<name>.result.nq`.
//! - `negative/**/<name>.sse`: a query or update that must be rejected before evaluation.
//!
//! The data of a test is read from `<name>.trig` or `<name>.ttl` next to the test and falls back
//! to `data.trig` or `data.ttl` in the same directory.

use anyhow::{bail, Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    QueryEvaluation,
    UpdateEvaluation,
    NegativeSyntax,
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::QueryEvaluation => "query evaluation",
            Self::UpdateEvaluation => "update evaluation",
            Self::NegativeSyntax => "negative syntax",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Test {
    /// The path of the action relative to the fixture directory, without extension.
    pub id: String,
    pub kind: TestKind,
    pub action: PathBuf,
    pub data: Option<PathBuf>,
    pub result: Option<PathBuf>,
}

/// Returns the tests below `root` in lexicographic order of their ids.
pub fn discover_tests(root: &Path) -> Result<Vec<Test>> {
    let mut tests = Vec::new();
    for (directory, kind) in [
        ("query", TestKind::QueryEvaluation),
        ("update", TestKind::UpdateEvaluation),
        ("negative", TestKind::NegativeSyntax),
    ] {
        let directory = root.join(directory);
        if directory.is_dir() {
            collect_tests(root, &directory, kind, &mut tests)?;
        }
    }
    tests.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(tests)
}

fn collect_tests(
    root: &Path,
    directory: &Path,
    kind: TestKind,
    tests: &mut Vec<Test>,
) -> Result<()> {
    let mut entries = fs::read_dir(directory)
        .with_context(|| format!("Unable to list {}", directory.display()))?
        .map(|entry| Ok(entry?.path()))
        .collect::<Result<Vec<_>>>()?;
    entries.sort();
    for path in entries {
        if path.is_dir() {
            collect_tests(root, &path, kind, tests)?;
        } else if path.extension().is_some_and(|extension| extension == "sse") {
            tests.push(build_test(root, path, kind)?);
        }
    }
    Ok(())
}

fn build_test(root: &Path, action: PathBuf, kind: TestKind) -> Result<Test> {
    let id = action
        .strip_prefix(root)
        .unwrap_or(&action)
        .with_extension("")
        .to_string_lossy()
        .replace('\\', "/");
    let result = match kind {
        TestKind::QueryEvaluation => {
            let candidates = [action.with_extension("srj"), action.with_extension("nt")];
            let Some(result) = candidates.into_iter().find(|path| path.is_file()) else {
                bail!("The query test {id} has no .srj or .nt result file");
            };
            Some(result)
        }
        TestKind::UpdateEvaluation => {
            let result = action.with_extension("result.nq");
            if !result.is_file() {
                bail!("The update test {id} has no .result.nq file");
            }
            Some(result)
        }
        TestKind::NegativeSyntax => None,
    };
    let data = [
        action.with_extension("trig"),
        action.with_extension("ttl"),
        action.with_file_name("data.trig"),
        action.with_file_name("data.ttl"),
    ]
    .into_iter()
    .find(|path| path.is_file());
    Ok(Test {
        id,
        kind,
        action,
        data,
        result,
    })
}
