use std::io::Cursor;

use calamine::{Reader, Xlsx, open_workbook_from_rs};

use crate::{
    parameters::{Source, table::Table},
    prelude::*,
};

pub const RATES_SHEET: &str = "BaseRates";
pub const MULTIPLIERS_SHEET: &str = "Multipliers";

/// Excel workbook holding the rate table and the multiplier table as named sheets.
pub struct Workbook(Xlsx<Cursor<Vec<u8>>>);

impl Workbook {
    pub fn fetch(source: &Source) -> Result<Self> {
        Self::from_bytes(source.fetch_bytes()?)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let workbook =
            open_workbook_from_rs(Cursor::new(bytes)).context("failed to open the workbook")?;
        Ok(Self(workbook))
    }

    pub fn sheet(&mut self, name: &str) -> Result<Table> {
        let range = self
            .0
            .worksheet_range(name)
            .with_context(|| format!("failed to read the `{name}` sheet"))?;
        debug!(name, height = range.height(), width = range.width(), "read the sheet");
        Ok(Table::from_sheet(&range))
    }
}
