use thiserror::Error;

/// The only message a user ever sees when a fetch fails.
pub const FAILURE_MESSAGE: &str = "API 요청에 실패했습니다. 잠시 후 다시 시도해주세요.";

/// Diagnostic cause of a failed search cycle.
///
/// Variants are logged, never shown. Transport and status failures become
/// [`FAILURE_MESSAGE`]; the XML variants only end parsing early.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request to search relay failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search relay answered {status} for {url}")]
    Status { status: u16, url: String },

    #[error("search response is not well-formed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute in search response: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("search response ended inside an open <doc> element")]
    UnterminatedDoc,
}
