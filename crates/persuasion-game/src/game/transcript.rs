use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{Argument, TonalStyle};

#[derive(Debug)]
pub enum TranscriptImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for TranscriptImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptImportError::Io(err) => write!(f, "failed to read transcript: {}", err),
            TranscriptImportError::Csv(err) => write!(f, "invalid transcript CSV data: {}", err),
        }
    }
}

impl std::error::Error for TranscriptImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranscriptImportError::Io(err) => Some(err),
            TranscriptImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for TranscriptImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for TranscriptImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads argument transcripts with `argument,tone,topic` columns.
pub struct TranscriptImporter;

impl TranscriptImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Argument>, TranscriptImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Argument>, TranscriptImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut arguments = Vec::new();

        for row in csv_reader.deserialize::<TranscriptRow>() {
            let row = row?;
            arguments.push(Argument {
                text: row.argument,
                declared_tone: row
                    .tone
                    .as_deref()
                    .map(TonalStyle::parse_lenient)
                    .unwrap_or_default(),
                topic: row.topic,
            });
        }

        Ok(arguments)
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptRow {
    argument: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    tone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    topic: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
