use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// On-disk key conventions of the narrative and description corpora.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorpusFormat {
    /// `KEY1: body` per line; numbered variants of one key accumulate.
    NumberedLines,
    /// `Name: body` per line; the key is used as written.
    NamedLines,
    /// Blank-line separated `Name: body` blocks; bodies may span lines.
    NamedBlocks,
}

impl CorpusFormat {
    const fn strips_numeric_suffix(self) -> bool {
        matches!(self, Self::NumberedLines)
    }
}

/// Parsed corpus: base key to paragraphs in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusEntries {
    entries: HashMap<String, Vec<String>>,
}

impl CorpusEntries {
    pub fn get(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, key: String, body: String) {
        self.entries.entry(key).or_default().push(body);
    }
}

pub fn parse(text: &str, format: CorpusFormat) -> CorpusEntries {
    let cleaned = text.replace(['\u{feff}', '\r'], "");
    let records: Vec<&str> = match format {
        CorpusFormat::NumberedLines | CorpusFormat::NamedLines => cleaned
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect(),
        CorpusFormat::NamedBlocks => split_blocks(&cleaned),
    };

    let mut entries = CorpusEntries::default();
    for record in records {
        let Some((raw_key, body)) = record.split_once(':') else {
            debug!(record = record.trim(), "skipping corpus record without a key");
            continue;
        };

        let raw_key = raw_key.trim();
        let body = clean_body(body);
        if raw_key.is_empty() || body.is_empty() {
            continue;
        }

        let key = if format.strips_numeric_suffix() {
            base_key(raw_key)
        } else {
            raw_key
        };
        entries.push(key.to_string(), body);
    }

    entries
}

/// `AC-H12` becomes `AC-H`; keys made only of digits are kept whole.
pub fn base_key(raw_key: &str) -> &str {
    let stripped = raw_key.trim_end_matches(|c: char| c.is_ascii_digit());
    if stripped.is_empty() {
        raw_key
    } else {
        stripped
    }
}

fn split_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            if let Some(block_start) = start.take() {
                blocks.push(&text[block_start..end]);
            }
        } else {
            if start.is_none() {
                start = Some(offset);
            }
            end = offset + line.trim_end_matches('\n').len();
        }
        offset += line.len();
    }

    if let Some(block_start) = start {
        blocks.push(&text[block_start..end]);
    }

    blocks
}

fn clean_body(body: &str) -> String {
    body.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
