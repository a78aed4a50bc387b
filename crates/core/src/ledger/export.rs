//! CSV export of ledger entries.
//!
//! Semicolon-delimited, header `Data;Descrição;Valor;Tipo`, newest first.
//! Amounts are written exactly as stored.

use std::io::Write;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::EntryKind;

/// Column headers.
pub const HEADER: [&str; 4] = ["Data", "Descrição", "Valor", "Tipo"];

/// One exported entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    /// Bookkeeping date.
    pub entry_date: NaiveDate,
    /// Description.
    pub description: String,
    /// Stored amount.
    pub amount: Decimal,
    /// Income or expense.
    pub kind: EntryKind,
}

/// Writes `rows` as CSV, ordered by entry date descending.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_csv<W: Write>(out: W, mut rows: Vec<ExportRow>) -> Result<(), csv::Error> {
    rows.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));

    let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(out);
    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.write_record([
            row.entry_date.format("%Y-%m-%d").to_string(),
            row.description,
            row.amount.to_string(),
            row.kind.as_str().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Attachment name for an export generated on `date`.
#[must_use]
pub fn export_filename(date: NaiveDate) -> String {
    format!("lancamentos-balanco-certo-{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn row(date: NaiveDate, description: &str, amount: Decimal, kind: EntryKind) -> ExportRow {
        ExportRow {
            entry_date: date,
            description: description.to_string(),
            amount,
            kind,
        }
    }

    fn render(rows: Vec<ExportRow>) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_n_rows_give_n_plus_one_lines() {
        let csv = render(vec![
            row(d(2025, 1, 10), "Aluguel", dec!(1500.00), EntryKind::Despesa),
            row(d(2025, 1, 12), "Venda balcão", dec!(320.50), EntryKind::Receita),
            row(d(2025, 1, 11), "Internet", dec!(99.90), EntryKind::Despesa),
        ]);

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Data;Descrição;Valor;Tipo");
        assert_eq!(lines[1], "2025-01-12;Venda balcão;320.50;receita");
        assert_eq!(lines[2], "2025-01-11;Internet;99.90;despesa");
        assert_eq!(lines[3], "2025-01-10;Aluguel;1500.00;despesa");
    }

    #[test]
    fn test_amount_written_as_stored() {
        let csv = render(vec![row(d(2025, 2, 1), "Taxa", dec!(7), EntryKind::Despesa)]);
        assert!(csv.contains(";7;"));
    }

    #[test]
    fn test_delimiter_in_description_is_quoted() {
        let csv = render(vec![row(d(2025, 2, 1), "Café; lanche", dec!(12.00), EntryKind::Despesa)]);
        assert!(csv.contains("\"Café; lanche\""));
    }

    #[test]
    fn test_empty_export_is_header_only() {
        assert_eq!(render(Vec::new()), "Data;Descrição;Valor;Tipo\n");
    }

    #[test]
    fn test_filename() {
        assert_eq!(
            export_filename(d(2025, 3, 7)),
            "lancamentos-balanco-certo-2025-03-07.csv"
        );
    }
}
