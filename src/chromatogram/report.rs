use std::fmt;
use std::io::Write;

#[cfg(feature = "colorized_output")]
use console::style;

use super::GasChromatogram;

/// Column headers of the comma-separated peak table
pub const CSV_HEADER: [&str; 3] = ["Retention Time", "Area", "Relative Area"];

const TABLE_HEADER: &str = "Ret. Time (min)         Area          Relative Area";

/// One line of the peak table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakRow {
    /// Apex time in minutes
    pub retention_time: f64,
    /// Scaled peak area
    pub area: f64,
    /// Percentage of the total area
    pub relative_area: f64,
}

/// Peak table of a chromatogram with its acquisition header
#[derive(Debug, Clone, PartialEq)]
pub struct PeakTable {
    /// Operator comment
    pub comment: String,
    /// Acquisition timestamp, RFC 3339
    pub timestamp: String,
    /// Instrument name
    pub instrument_name: String,
    /// One row per peak, in peak order
    pub rows: Vec<PeakRow>,
}

impl PeakTable {
    pub(crate) fn new(chromatogram: &GasChromatogram) -> Self {
        let trace = chromatogram.trace();
        let acquisition = chromatogram.acquisition();
        Self {
            comment: acquisition.comment.clone(),
            timestamp: acquisition.timestamp.to_rfc3339(),
            instrument_name: acquisition.instrument_name.clone(),
            rows: chromatogram
                .peaks()
                .iter()
                .map(|p| PeakRow {
                    retention_time: p.retention_time(trace),
                    area: p.peak_area,
                    relative_area: p.relative_peak_area,
                })
                .collect(),
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no peaks
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn write_heading(&self, f: &mut impl fmt::Write) -> fmt::Result {
        if !self.comment.is_empty() {
            writeln!(f, "{}", self.comment)?;
        }
        writeln!(f, "{}", self.timestamp)?;
        writeln!(f, "Instrument: {}", self.instrument_name)?;
        writeln!(f)?;
        writeln!(f, "{}", TABLE_HEADER)
    }

    /// Text table with areas at 5 decimals
    pub fn to_detailed_string(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_heading(&mut out);
        for row in &self.rows {
            out.push_str(&format!(
                "{:>15.3}{:>20.5}{:>20.5}\n",
                row.retention_time, row.area, row.relative_area
            ));
        }
        out
    }

    /// Write the comma-separated copy table
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(CSV_HEADER)?;
        for row in &self.rows {
            csv_writer.write_record([
                format!("{:.3}", row.retention_time),
                format!("{:.3}", row.area),
                format!("{:.3}", row.relative_area),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// The comma-separated copy table as a string
    pub fn to_csv_string(&self) -> csv::Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Format the table with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();
            if !self.comment.is_empty() {
                output.push_str(&format!("{}\n", style(&self.comment).bold()));
            }
            output.push_str(&format!("{}\n", style(&self.timestamp).dim()));
            output.push_str(&format!(
                "{}: {}\n\n",
                style("Instrument").bold(),
                self.instrument_name
            ));
            output.push_str(&format!("{}\n", style(TABLE_HEADER).bold().cyan()));

            if self.rows.is_empty() {
                output.push_str(&format!("{}\n", style("No peaks").yellow()));
            }
            for row in &self.rows {
                output.push_str(&format!(
                    "{:>15.3}{}{}\n",
                    row.retention_time,
                    style(format!("{:>20.3}", row.area)).green(),
                    style(format!("{:>20.3}", row.relative_area)).green()
                ));
            }
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for PeakTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_heading(f)?;
        for row in &self.rows {
            writeln!(
                f,
                "{:>15.3}{:>20.3}{:>20.3}",
                row.retention_time, row.area, row.relative_area
            )?;
        }
        Ok(())
    }
}
