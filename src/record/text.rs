//! Plain-text trace files.
//!
//! One `time intensity` pair per line, separated by a space. A blank line
//! ends a trace, so a single file can hold several.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Terminator, Trim, WriterBuilder};
use log::debug;

use crate::trace::Trace;

use super::RecordError;

/// Write traces, each followed by a blank line
pub fn write_traces<'a, W: Write>(
    mut writer: W,
    traces: impl IntoIterator<Item = &'a Trace>,
) -> Result<(), RecordError> {
    for trace in traces {
        {
            let mut lines = WriterBuilder::new()
                .delimiter(b' ')
                .has_headers(false)
                .terminator(Terminator::CRLF)
                .from_writer(&mut writer);
            for (t, y) in trace.times().iter().zip(trace.intensities()) {
                lines.write_record([t.to_string(), y.to_string()])?;
            }
            lines.flush()?;
        }
        writer.write_all(b"\r\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read every trace in a text trace file
pub fn read_traces<R: Read>(reader: R) -> Result<Vec<Trace>, RecordError> {
    let mut traces = Vec::new();
    let mut block: Vec<String> = Vec::new();
    let mut block_start = 1u64;

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let line_number = index as u64 + 1;
        if line.trim().is_empty() {
            if !block.is_empty() {
                traces.push(parse_block(&block, block_start)?);
                block.clear();
            }
            continue;
        }
        if block.is_empty() {
            block_start = line_number;
        }
        block.push(line);
    }
    if !block.is_empty() {
        traces.push(parse_block(&block, block_start)?);
    }

    debug!("Read {} traces", traces.len());
    Ok(traces)
}

/// Parse one run of non-blank lines; `first_line` is the file line of `lines[0]`.
fn parse_block(lines: &[String], first_line: u64) -> Result<Trace, RecordError> {
    let text = lines.join("\n");
    let mut reader = ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut times = Vec::with_capacity(lines.len());
    let mut intensities = Vec::with_capacity(lines.len());
    for (offset, result) in reader.records().enumerate() {
        let record = result?;
        let line = first_line + offset as u64;
        let fields: Vec<&str> = record.iter().filter(|f| !f.is_empty()).collect();

        let [time, intensity] = fields[..] else {
            return Err(RecordError::InvalidLine {
                line,
                reason: format!("expected 2 values, found {}", fields.len()),
            });
        };
        times.push(parse_value(time, line)?);
        intensities.push(parse_value(intensity, line)?);
    }
    Ok(Trace::new(times, intensities)?)
}

fn parse_value(field: &str, line: u64) -> Result<f64, RecordError> {
    field.parse().map_err(|_| RecordError::InvalidLine {
        line,
        reason: format!("'{}' is not a number", field),
    })
}

/// Export traces to a text file
pub fn export_traces<'a>(
    path: impl AsRef<Path>,
    traces: impl IntoIterator<Item = &'a Trace>,
) -> Result<(), RecordError> {
    write_traces(File::create(path)?, traces)
}

/// Import every trace from a text file
pub fn import_traces(path: impl AsRef<Path>) -> Result<Vec<Trace>, RecordError> {
    read_traces(File::open(path)?)
}
