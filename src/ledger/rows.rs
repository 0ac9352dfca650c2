//! Record-level access to the item ledger CSV
//!
//! Records are located by byte offset so a single row can be replaced
//! without touching the bytes around it. A quoted field may span several
//! physical lines; offsets always refer to whole records.

use crate::ledger::LedgerResult;
use std::io::Write;
use std::ops::Range;

/// One CSV record and where it sits in the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LedgerRecord {
    pub fields: Vec<String>,

    /// Line the record starts on (1-based)
    pub line: u64,

    /// Byte range of the record text, terminator excluded
    pub span: Range<usize>,
}

impl LedgerRecord {
    /// A line with nothing on it
    pub fn is_blank(&self) -> bool {
        matches!(self.fields.as_slice(), [only] if only.is_empty())
    }

    pub fn first_field(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }
}

fn writer_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder.terminator(csv::Terminator::Any(b'\n'));
    builder
}

/// Reads every record of `content`, header included
pub(crate) fn read_records(content: &str) -> LedgerResult<Vec<LedgerRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut starts = Vec::new();
    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record)? {
        let (byte, line) = record
            .position()
            .map(|p| (p.byte() as usize, p.line()))
            .unwrap_or((content.len(), 0));
        starts.push((byte, line, record.iter().map(str::to_string).collect::<Vec<_>>()));
    }

    let mut records = Vec::with_capacity(starts.len());
    for (index, (start, line, fields)) in starts.iter().enumerate() {
        let end = starts
            .get(index + 1)
            .map(|(next, _, _)| *next)
            .unwrap_or(content.len());
        records.push(LedgerRecord {
            fields: fields.clone(),
            line: *line,
            span: record_span(content, *start, end),
        });
    }

    Ok(records)
}

/// Narrows `start..end` to the record text, dropping line terminators and
/// blank lines on either side
fn record_span(content: &str, start: usize, end: usize) -> Range<usize> {
    let slice = &content[start..end];
    let is_terminator = |c: char| c == '\r' || c == '\n';
    let leading = slice.len() - slice.trim_start_matches(is_terminator).len();
    let text = slice.trim_matches(is_terminator);
    start + leading..start + leading + text.len()
}

/// Encodes `fields` as one record, without the trailing terminator
pub(crate) fn encode_row(fields: &[&str]) -> LedgerResult<String> {
    let mut writer = writer_builder().from_writer(Vec::new());
    writer.write_record(fields)?;
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let row = String::from_utf8_lossy(&bytes);
    Ok(row.strip_suffix('\n').unwrap_or(&row[..]).to_string())
}

/// Appends `rows` to `out`, each terminated by `\n`
pub(crate) fn write_rows<W: Write>(out: W, rows: &[[&str; 2]]) -> LedgerResult<()> {
    let mut writer = writer_builder().from_writer(out);
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
