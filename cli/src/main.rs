#![allow(clippy::print_stderr, clippy::print_stdout)]
use crate::cli::{Args, Command, Data, Input, Language};
use anyhow::{bail, Context};
use clap::Parser;
use rdf_algebra::io::RdfFormat;
use rdf_algebra::logical::{validate_query, validate_update};
use rdf_algebra::model::Iri;
use rdf_algebra::sparql::{QueryOptions, QueryResults, QueryResultsFormat, UpdateOptions};
use rdf_algebra::{QueryLanguage, Store};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, stdout, BufReader, BufWriter, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod cli;

pub fn main() -> anyhow::Result<()> {
    let matches = Args::parse();
    init_tracing(matches.verbose);
    match matches.command {
        Command::Query {
            input,
            data,
            results_format,
            graph_format,
            results_file,
            explain,
            no_optimize,
            union_default_graph,
        } => {
            let results_format = query_results_format_from_name(&results_format)?;
            let graph_format = rdf_format_from_name(&graph_format)?;
            let query = language(input.language)
                .parse_query(&read_input(&input)?, input.base.as_deref())?;
            let mut options = QueryOptions::default();
            if no_optimize {
                options = options.without_optimizations();
            }
            if union_default_graph {
                options = options.with_default_graph_as_union();
            }
            if let Some(base) = &input.base {
                options = options.with_base_iri(parse_base_iri(base)?);
            }

            let store = load_store(&data)?;
            let (results, explanation) = store.explain_query_opt(&query, &options)?;
            if explain {
                eprintln!("Planning time: {:?}", explanation.planning_time);
                eprintln!("Initial algebra:\n{}", explanation.initial_algebra);
                eprintln!("Optimized algebra:\n{}", explanation.optimized_algebra);
            }

            if let Some(results_file) = results_file {
                close_file_writer(write_results(
                    &results,
                    BufWriter::new(File::create(results_file)?),
                    results_format,
                    graph_format,
                )?)?;
            } else {
                write_results(&results, stdout().lock(), results_format, graph_format)?
                    .flush()?;
            }
            Ok(())
        }
        Command::Update {
            input,
            data,
            dump_format,
        } => {
            let dump_format = rdf_format_from_name(&dump_format)?;
            if !dump_format.supports_datasets() {
                bail!("The dump format must support named graphs, {dump_format} found");
            }
            let update = language(input.language)
                .parse_update(&read_input(&input)?, input.base.as_deref())?;
            let mut options = UpdateOptions::default();
            if let Some(base) = &input.base {
                options = options.with_base_iri(parse_base_iri(base)?);
            }

            let store = load_store(&data)?;
            store.update_opt(&update, &options)?;
            store.dump_to_writer(dump_format, stdout().lock())?.flush()?;
            Ok(())
        }
        Command::Validate { input, update } => {
            let text = read_input(&input)?;
            let language = language(input.language);
            if update {
                let update = language.parse_update(&text, input.base.as_deref())?;
                validate_update(&update)?;
                println!("{update}");
            } else {
                let query = language.parse_query(&text, input.base.as_deref())?;
                validate_query(&query)?;
                println!("{query}");
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn language(language: Language) -> QueryLanguage {
    match language {
        Language::Sse => QueryLanguage::Sse,
        Language::Sparql => QueryLanguage::Sparql,
    }
}

fn read_input(input: &Input) -> anyhow::Result<String> {
    match (&input.text, &input.file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(file)) => fs::read_to_string(file)
            .with_context(|| format!("Unable to read {}", file.display())),
        (None, None) => bail!("Either a query text or a --file must be given"),
    }
}

fn load_store(data: &Data) -> anyhow::Result<Store> {
    let store = Store::new();
    for file in &data.data {
        let format = if let Some(format) = &data.data_format {
            rdf_format_from_name(format)?
        } else {
            rdf_format_from_path(file)?
        };
        let reader = BufReader::new(
            File::open(file).with_context(|| format!("Unable to open {}", file.display()))?,
        );
        let count = store
            .load_from_reader(format, reader)
            .with_context(|| format!("Unable to load {}", file.display()))?;
        tracing::info!(file = %file.display(), count, "Loaded data file");
    }
    Ok(store)
}

fn write_results<W: Write>(
    results: &QueryResults,
    writer: W,
    results_format: QueryResultsFormat,
    graph_format: RdfFormat,
) -> anyhow::Result<W> {
    Ok(match results {
        QueryResults::Graph(_) => results.write_graph(writer, graph_format)?,
        QueryResults::Solutions(_) | QueryResults::Boolean(_) => {
            results.write(writer, results_format)?
        }
    })
}

fn parse_base_iri(base: &str) -> anyhow::Result<Iri<String>> {
    Iri::parse(base.to_owned()).with_context(|| format!("Invalid base IRI {base}"))
}

fn format_from_path<T>(
    path: &Path,
    from_extension: impl FnOnce(&str) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    if let Some(ext) = path.extension().and_then(OsStr::to_str) {
        from_extension(ext).map_err(|e| {
            e.context(format!(
                "Not able to guess the file format from file name extension '{ext}'"
            ))
        })
    } else {
        bail!(
            "The path {} has no extension to guess a file format from",
            path.display()
        )
    }
}

fn rdf_format_from_path(path: &Path) -> anyhow::Result<RdfFormat> {
    format_from_path(path, |ext| {
        RdfFormat::from_extension(ext)
            .with_context(|| format!("The file extension '{ext}' is unknown"))
    })
}

fn rdf_format_from_name(name: &str) -> anyhow::Result<RdfFormat> {
    if let Some(t) = RdfFormat::from_extension(name) {
        return Ok(t);
    }
    if let Some(t) = RdfFormat::from_media_type(name) {
        return Ok(t);
    }
    bail!("The file format '{name}' is unknown")
}

fn query_results_format_from_name(name: &str) -> anyhow::Result<QueryResultsFormat> {
    if let Some(t) = QueryResultsFormat::from_extension(name) {
        return Ok(t);
    }
    if let Some(t) = QueryResultsFormat::from_media_type(name) {
        return Ok(t);
    }
    bail!("The query results format '{name}' is unknown")
}

fn close_file_writer(writer: BufWriter<File>) -> io::Result<()> {
    let mut file = writer
        .into_inner()
        .map_err(io::IntoInnerError::into_error)?;
    file.flush()?;
    file.sync_all()
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use anyhow::Result;
    use assert_cmd::Command;
    use assert_fs::prelude::*;
    use assert_fs::NamedTempFile;
    use predicates::prelude::*;

    const DATA: &str = "<http://e/alice> <http://e/knows> <http://e/bob> .
<http://e/bob> <http://e/knows> <http://e/carol> .
";

    fn cli_command() -> Command {
        let mut command = Command::new(env!("CARGO"));
        command
            .arg("run")
            .arg("--quiet")
            .arg("--bin")
            .arg("rdf-algebra")
            .arg("--");
        command
    }

    fn data_file() -> Result<NamedTempFile> {
        let file = NamedTempFile::new("data.nt")?;
        file.write_str(DATA)?;
        Ok(file)
    }

    #[test]
    fn cli_help() {
        cli_command()
            .assert()
            .failure()
            .stdout("")
            .stderr(predicate::str::contains("Usage"));
    }

    #[test]
    fn cli_query_csv() -> Result<()> {
        let data = data_file()?;
        cli_command()
            .arg("query")
            .arg("--data")
            .arg(data.path())
            .arg("--results-format")
            .arg("csv")
            .arg("(project (?o) (path <http://e/alice> (path+ <http://e/knows>) ?o))")
            .assert()
            .success()
            .stdout("o\r\nhttp://e/bob\r\nhttp://e/carol\r\n");
        Ok(())
    }

    #[test]
    fn cli_ask_json() -> Result<()> {
        let data = data_file()?;
        cli_command()
            .arg("query")
            .arg("-d")
            .arg(data.path())
            .arg("(ask (bgp (triple <http://e/bob> <http://e/knows> ?x)))")
            .assert()
            .success()
            .stdout(predicate::str::contains("\"boolean\":true"));
        Ok(())
    }

    #[test]
    fn cli_sparql_construct() -> Result<()> {
        let data = data_file()?;
        cli_command()
            .arg("query")
            .arg("--data")
            .arg(data.path())
            .arg("--language")
            .arg("sparql")
            .arg(
                "CONSTRUCT { ?o <http://e/knownBy> ?s }
                 WHERE { <http://e/alice> ?p ?o . BIND(<http://e/alice> AS ?s) }",
            )
            .assert()
            .success()
            .stdout("<http://e/bob> <http://e/knownBy> <http://e/alice> .\n");
        Ok(())
    }

    #[test]
    fn cli_query_results_file() -> Result<()> {
        let data = data_file()?;
        let query = NamedTempFile::new("query.sse")?;
        query.write_str("(bgp (triple <http://e/alice> <http://e/knows> ?o))")?;
        let results = NamedTempFile::new("results.tsv")?;
        cli_command()
            .arg("query")
            .arg("--data")
            .arg(data.path())
            .arg("--file")
            .arg(query.path())
            .arg("--results-format")
            .arg("tsv")
            .arg("--results-file")
            .arg(results.path())
            .assert()
            .success();
        results.assert("?o\n<http://e/bob>\n");
        Ok(())
    }

    #[test]
    fn cli_explain() -> Result<()> {
        let data = data_file()?;
        cli_command()
            .arg("query")
            .arg("--data")
            .arg(data.path())
            .arg("--explain")
            .arg(
                "(join
                   (bgp (triple ?a <http://e/knows> ?b))
                   (bgp (triple ?b <http://e/knows> ?c)))",
            )
            .assert()
            .success()
            .stderr(predicate::str::contains("Optimized algebra"));
        Ok(())
    }

    #[test]
    fn cli_update_dumps_the_dataset() -> Result<()> {
        let data = data_file()?;
        cli_command()
            .arg("update")
            .arg("--data")
            .arg(data.path())
            .arg("(deleteData (triple <http://e/alice> <http://e/knows> <http://e/bob>))")
            .assert()
            .success()
            .stdout("<http://e/bob> <http://e/knows> <http://e/carol> .\n");
        Ok(())
    }

    #[test]
    fn cli_validate_rejects_shared_non_distinguished_variables() {
        cli_command()
            .arg("validate")
            .arg("(join (bgp (triple ??a <http://e/p> ?x)) (bgp (triple ??a <http://e/q> ?y)))")
            .assert()
            .failure()
            .stderr(predicate::str::contains("non-distinguished"));
    }

    #[test]
    fn cli_validate_prints_sparql_as_sse() {
        cli_command()
            .arg("validate")
            .arg("--language")
            .arg("sparql")
            .arg("ASK { ?s ?p ?o }")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("(ask"));
    }

    #[test]
    fn cli_unknown_results_format() -> Result<()> {
        let data = data_file()?;
        cli_command()
            .arg("query")
            .arg("--data")
            .arg(data.path())
            .arg("--results-format")
            .arg("foo")
            .arg("(bgp)")
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown"));
        Ok(())
    }

    #[test]
    fn clap_debug() {
        use clap::CommandFactory;

        Args::command().debug_assert()
    }
}
