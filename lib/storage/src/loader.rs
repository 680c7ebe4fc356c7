//! Resolves the IRI of a `LOAD` operation to an RDF document.

use oxrdfio::RdfFormat;
use rdf_algebra_common::StorageError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Opens the document identified by `iri` and determines its format.
///
/// `file:` IRIs are read from the local file system and their format is derived from the file
/// extension. `http:` and `https:` IRIs are only supported with the `http-client` feature.
pub(crate) fn open_document(iri: &str) -> Result<(RdfFormat, Box<dyn Read>), StorageError> {
    if let Some(path) = iri.strip_prefix("file://") {
        let path = Path::new(path);
        let format = format_from_path(path)
            .ok_or_else(|| StorageError::UnsupportedFormat(iri.to_owned()))?;
        tracing::debug!(path = %path.display(), format = %format, "Reading local document");
        return Ok((format, Box::new(BufReader::new(File::open(path)?))));
    }
    if iri.starts_with("http://") || iri.starts_with("https://") {
        return fetch(iri);
    }
    Err(StorageError::UnsupportedIri(iri.to_owned()))
}

fn format_from_path(path: &Path) -> Option<RdfFormat> {
    path.extension()
        .and_then(|extension| extension.to_str())
        .and_then(RdfFormat::from_extension)
}

#[cfg(feature = "http-client")]
fn fetch(iri: &str) -> Result<(RdfFormat, Box<dyn Read>), StorageError> {
    use reqwest::header::{ACCEPT, CONTENT_TYPE};

    let response = reqwest::blocking::Client::new()
        .get(iri)
        .header(
            ACCEPT,
            "text/turtle, application/n-triples, application/n-quads, application/trig, application/rdf+xml;q=0.9",
        )
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(StorageError::other)?;
    let format = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(RdfFormat::from_media_type)
        .or_else(|| format_from_path(Path::new(response.url().path())))
        .ok_or_else(|| StorageError::UnsupportedFormat(iri.to_owned()))?;
    tracing::debug!(iri, format = %format, "Fetched remote document");
    Ok((format, Box::new(response)))
}

#[cfg(not(feature = "http-client"))]
fn fetch(iri: &str) -> Result<(RdfFormat, Box<dyn Read>), StorageError> {
    Err(StorageError::UnsupportedIri(iri.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_are_derived_from_extensions() {
        assert_eq!(
            format_from_path(Path::new("/data/people.ttl")),
            Some(RdfFormat::Turtle)
        );
        assert_eq!(
            format_from_path(Path::new("/data/people.nq")),
            Some(RdfFormat::NQuads)
        );
        assert_eq!(format_from_path(Path::new("/data/people")), None);
    }

    #[test]
    fn unknown_schemes_are_rejected() {
        assert!(matches!(
            open_document("urn:example:doc"),
            Err(StorageError::UnsupportedIri(_))
        ));
        assert!(matches!(
            open_document("file:///data/people.unknown"),
            Err(StorageError::UnsupportedFormat(_))
        ));
    }
}
