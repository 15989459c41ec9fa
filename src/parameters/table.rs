use calamine::{Data, Range};
use csv::{ReaderBuilder, Trim};

/// Untyped table as exported from a spreadsheet: string headers and string cells.
#[must_use]
#[derive(Debug, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_csv(text: &str) -> Result<Self, csv::Error> {
        let mut reader =
            ReaderBuilder::new().flexible(true).trim(Trim::All).from_reader(text.as_bytes());
        let headers = reader.headers()?.iter().map(str::to_owned).collect();
        let rows = reader
            .records()
            .map(|record| record.map(|record| record.iter().map(str::to_owned).collect()))
            .collect::<Result<_, _>>()?;
        Ok(Self { headers, rows })
    }

    /// Convert a worksheet, whose first row holds the headers.
    ///
    /// Numbers are rendered back to text, so that both sources go through the same validation.
    pub fn from_sheet(range: &Range<Data>) -> Self {
        let mut rows = range.rows().map(|row| {
            row.iter().map(|cell| cell.to_string().trim().to_owned()).collect::<Vec<_>>()
        });
        let headers = rows.next().unwrap_or_default();
        Self { headers, rows: rows.collect() }
    }

    /// Index of the first column whose header contains any of the tokens, ignoring case.
    pub fn find_column(&self, tokens: &[&str], except: Option<usize>) -> Option<usize> {
        self.headers.iter().enumerate().position(|(index, header)| {
            let header = header.to_lowercase();
            Some(index) != except && tokens.iter().any(|token| header.contains(token))
        })
    }

    /// Iterate over the rows along with their line numbers in the source, the header being line 1.
    pub fn numbered_rows(&self) -> impl Iterator<Item = (usize, Row<'_>)> {
        self.rows.iter().enumerate().map(|(index, cells)| (index + 2, Row(cells)))
    }
}

#[derive(Copy, Clone)]
pub struct Row<'a>(&'a [String]);

impl<'a> Row<'a> {
    /// Cell contents, empty if the row is shorter than the header.
    pub fn cell(self, column: usize) -> &'a str {
        self.0.get(column).map_or("", String::as_str).trim()
    }
}

/// Parse a non-negative finite amount, `None` for anything else.
pub fn parse_amount(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|amount| amount.is_finite() && *amount >= 0.0)
}
