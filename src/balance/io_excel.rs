use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::balance::{io_common::Table, *};

pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> BBalanceResult<Table> {
    let wrange = get_range(path, worksheet_name)?;
    let mut res: Table = Vec::new();
    for (idx, row) in wrange.rows().enumerate() {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        debug!("read_excel_table: {:?} {:?}", idx + 1, cells);
        res.push(cells);
    }
    Ok(res)
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Int(i) => i.to_string(),
        // Counts are stored as floats by most spreadsheet programs.
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => String::new(),
        other => {
            debug!("cell_to_string: ignoring cell {:?}", other);
            String::new()
        }
    }
}

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> BBalanceResult<calamine::Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                name: worksheet_name,
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => Err(EmptyExcelSnafu { path }.build().into()),
            [(worksheet_name, wrange)] => {
                debug!(
                    "get_range: path: {:?} worksheet: {:?}",
                    &path, &worksheet_name
                );
                Ok(wrange.clone())
            }
            _ => Err(AmbiguousWorksheetSnafu { path }.build().into()),
        }
    }
}
