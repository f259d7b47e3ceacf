//! Harvested record serialization

use crate::client::http::detail_url;
use crate::client::{ClientError, ResultRecord};
use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};
use url::Url;

/// A captured result with its public page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarvestRecord {
    pub id: String,
    pub title: String,
    pub detail_url: String,
}

impl HarvestRecord {
    /// Record for a result of the site rooted at `root`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` if no detail URL can be formed.
    pub fn from_result(record: &ResultRecord, root: &Url) -> Result<Self, ClientError> {
        Ok(Self {
            id: record.id.to_string(),
            title: record.title.clone(),
            detail_url: detail_url(root, &record.id)?.to_string(),
        })
    }
}

/// File format for harvested records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RecordFormat {
    /// Pretty-printed JSON array
    #[default]
    Json,
    /// Tab-separated `id`, `title`, `detail_url` with a header row
    Tsv,
}

/// Write records as a JSON array
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_json<W: Write>(mut writer: W, records: &[HarvestRecord]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)
}

/// Write records as TSV
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_tsv<W: Write>(writer: W, records: &[HarvestRecord]) -> io::Result<()> {
    let mut tsv = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);
    for record in records {
        tsv.serialize(record)?;
    }
    tsv.flush()
}

/// Write records in `format`
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_records<W: Write>(
    writer: W,
    records: &[HarvestRecord],
    format: RecordFormat,
) -> io::Result<()> {
    match format {
        RecordFormat::Json => write_json(writer, records),
        RecordFormat::Tsv => write_tsv(writer, records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::http::site_root;
    use crate::selection::ItemId;

    fn records() -> Vec<HarvestRecord> {
        let root = site_root("https://example.org/NSLSL/").unwrap();
        [("101", "Bone loss"), ("102", "Muscle\tatrophy")]
            .into_iter()
            .map(|(id, title)| {
                HarvestRecord::from_result(
                    &ResultRecord {
                        id: ItemId::from(id),
                        title: title.to_string(),
                    },
                    &root,
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_detail_url() {
        let records = records();
        assert_eq!(
            records[0].detail_url,
            "https://example.org/NSLSL/Search/DetailsForId/101"
        );
    }

    #[test]
    fn test_write_json() {
        let mut buf = Vec::new();
        write_json(&mut buf, &records()).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed[0]["id"], "101");
        assert_eq!(parsed[1]["title"], "Muscle\tatrophy");
        assert!(parsed[0]["detail_url"].as_str().unwrap().ends_with("/101"));
    }

    #[test]
    fn test_write_tsv() {
        let mut buf = Vec::new();
        write_records(&mut buf, &records(), RecordFormat::Tsv).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "id\ttitle\tdetail_url");
        assert_eq!(
            lines[1],
            "101\tBone loss\thttps://example.org/NSLSL/Search/DetailsForId/101"
        );
        assert!(lines[2].starts_with("102\t\"Muscle\tatrophy\""));
    }

    #[test]
    fn test_empty_tsv_has_no_rows() {
        let mut buf = Vec::new();
        write_tsv(&mut buf, &[]).unwrap();
        assert!(buf.is_empty());
    }
}
