use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "rdf-algebra")]
/// Evaluates SPARQL algebra queries and updates over RDF files
pub struct Args {
    /// Print debug logs of the evaluation to stderr
    ///
    /// Without this flag, the log level is read from the RUST_LOG environment variable.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate a query over the given data files
    Query {
        #[command(flatten)]
        input: Input,
        #[command(flatten)]
        data: Data,
        /// The format of the results of SELECT and ASK queries
        ///
        /// It can be an extension like "json", "xml", "csv" or "tsv" or a MIME type like
        /// "application/sparql-results+json".
        #[arg(long, default_value = "json")]
        results_format: String,
        /// The RDF format of the results of CONSTRUCT and DESCRIBE queries
        ///
        /// It can be an extension like "nt" or a MIME type like "application/n-triples".
        #[arg(long, default_value = "nt")]
        graph_format: String,
        /// File to write the results to
        ///
        /// If no file is given, stdout is written.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        results_file: Option<PathBuf>,
        /// Print the operator tree before and after the optimization to stderr
        #[arg(long)]
        explain: bool,
        /// Evaluate the operator tree as given, without optimizations
        #[arg(long)]
        no_optimize: bool,
        /// If the queries should look for triples in all the dataset graphs by default
        /// (ie. without `GRAPH` operations)
        #[arg(long)]
        union_default_graph: bool,
    },
    /// Apply an update to the given data files and write the resulting dataset
    Update {
        #[command(flatten)]
        input: Input,
        #[command(flatten)]
        data: Data,
        /// The RDF format of the resulting dataset
        ///
        /// The format must support named graphs, e.g. "nq" or "trig".
        #[arg(long, default_value = "nq")]
        dump_format: String,
    },
    /// Check that a query or an update is well formed and print its operator tree
    Validate {
        #[command(flatten)]
        input: Input,
        /// Validate an update instead of a query
        #[arg(long)]
        update: bool,
    },
}

/// The query or update to run.
#[derive(ClapArgs)]
pub struct Input {
    /// The query or update text
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub text: Option<String>,
    /// File to read the query or update from
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,
    /// The notation of the query or update
    #[arg(short, long, value_enum, default_value_t = Language::Sse)]
    pub language: Language,
    /// Base IRI of SPARQL queries and updates
    #[arg(long, value_hint = ValueHint::Url)]
    pub base: Option<String>,
}

/// The RDF files to evaluate against.
#[derive(ClapArgs)]
pub struct Data {
    /// RDF file(s) to load before the evaluation
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub data: Vec<PathBuf>,
    /// The format of the data file(s)
    ///
    /// It can be an extension like "nt" or a MIME type like "application/n-triples".
    ///
    /// By default the format is guessed from the data file extension.
    #[arg(long)]
    pub data_format: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Language {
    /// The SSE notation of the algebra
    Sse,
    /// SPARQL 1.1
    Sparql,
}
