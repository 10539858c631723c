/// Options shared by the CSV reader and writer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvOptions {
    /// Whether the first (non-skipped) record names the columns.
    ///
    /// Without a header, columns are named `Column_0`, `Column_1`, ...
    pub has_header: bool,
    pub delimiter: u8,
    /// Records discarded before the header (or first data row).
    pub skip_rows: usize,
    /// Cap on data rows read; 0 means unlimited.
    pub max_rows: usize,
    /// Fixed decimal places for floats on write. `None` writes the shortest round-trip text.
    pub float_precision: Option<usize>,
    /// `chrono` format string for timestamps on write.
    pub datetime_format: String,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            skip_rows: 0,
            max_rows: 0,
            float_precision: None,
            datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

impl CsvOptions {
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn with_float_precision(mut self, precision: usize) -> Self {
        self.float_precision = Some(precision);
        self
    }

    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = format.into();
        self
    }
}
