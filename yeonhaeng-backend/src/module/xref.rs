//! Cross-reference links into the archive's own viewer

use anyhow::{Context, Result};
use regex::Regex;
use std::sync::LazyLock;

const VIEWER_URL: &str = "https://db.itkc.or.kr/dir/item?itemId=GO#dir/node?dataId=";
const VIEWER_SYNC: &str = "&viewSync=TR";

/// Year stripped from record id suffixes. Fixed, not taken from the record.
pub const ID_SUFFIX_YEAR: &str = "2004";

static XML_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"_{}_[0-9]{{3}}_XML$", ID_SUFFIX_YEAR)).expect("valid id suffix pattern")
});
static SEQ_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"_{}_[0-9]{{3}}$", ID_SUFFIX_YEAR)).expect("valid id suffix pattern")
});

/// Strip a trailing `_2004_NNN_XML`, then a trailing `_2004_NNN`.
///
/// Ids without either suffix come back unchanged. The result is not
/// validated.
pub fn clean_record_id(record_id: &str) -> String {
    let stripped = XML_SUFFIX.replace(record_id, "");
    SEQ_SUFFIX.replace(&stripped, "").into_owned()
}

pub fn viewer_url(record_id: &str) -> String {
    format!("{}{}{}", VIEWER_URL, clean_record_id(record_id), VIEWER_SYNC)
}

/// Build the viewer link and, if `launch` is set, hand it to the system browser.
pub fn open_viewer(record_id: &str, launch: bool) -> Result<String> {
    let url = viewer_url(record_id);
    if launch {
        open::that_detached(&url).context(format!("Failed to open browser for {}", url))?;
        tracing::info!("Opened viewer for {}", record_id);
    }
    Ok(url)
}
