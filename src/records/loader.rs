//! Load and write ledger tables as CSV
//!
//! Column headers are the store's column names (`mes`, `apadrinhamento`,
//! `resultado_op`, ...), so files exported from the hosted tables can be
//! read directly.

use super::MonthlyRecord;
use crate::error::{LedgerError, Result};
use csv::{Reader, Writer};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

/// Load all records of one type from a CSV file, in calendar order
///
/// Rows whose stored totals or results disagree with their own inputs are
/// rejected.
pub fn load_records<R: MonthlyRecord, P: AsRef<Path>>(path: P) -> Result<Vec<R>> {
    let reader = Reader::from_path(path)?;
    collect_monthly(reader)
}

/// Load records from any reader (e.g., string buffer, network stream)
pub fn load_records_from_reader<R: MonthlyRecord, Rd: Read>(reader: Rd) -> Result<Vec<R>> {
    collect_monthly(Reader::from_reader(reader))
}

fn collect_monthly<R: MonthlyRecord, Rd: Read>(mut reader: Reader<Rd>) -> Result<Vec<R>> {
    let mut by_period = BTreeMap::new();

    for result in reader.deserialize() {
        let record: R = result?;
        record.verify()?;
        let period = record.period();
        if by_period.insert(period, record).is_some() {
            return Err(LedgerError::DuplicatePeriod {
                table: R::TABLE,
                period: period.to_string(),
            });
        }
    }

    Ok(by_period.into_values().collect())
}

/// Load rows of a table that is not keyed by period, in file order
pub fn load_rows_from_reader<T: DeserializeOwned, Rd: Read>(reader: Rd) -> Result<Vec<T>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in csv_reader.deserialize() {
        rows.push(result?);
    }

    Ok(rows)
}

/// Write rows with a header line taken from the row type's field names
pub fn write_rows<T: Serialize, W: Write>(writer: W, rows: &[T]) -> Result<()> {
    let mut csv_writer = Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Period;
    use crate::records::{
        CashRecord, ForecastEntry, ForecastKind, GoalKind, InvestmentGoal, ResultRecord,
        RevenueRecord,
    };

    const RESULTS_CSV: &str = "\
mes,receitas,despesas,resultado_op,bolsas,resultado_final,soma_bolsas,fornecedores,contas_a_pagar
fevereiro,1200,300,900,0,900,0,20,-30
janeiro,1000,400,600,100,500,-100,50,-50
";

    #[test]
    fn test_load_results_sorted_by_period() {
        let records: Vec<ResultRecord> = load_records_from_reader(RESULTS_CSV.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].period, Period::January);
        assert_eq!(records[0].operating_result, 600.0);
        assert_eq!(records[0].payables_balance, -50.0);
        assert_eq!(records[1].period, Period::February);
        assert_eq!(records[1].supplier_amount, 20.0);
    }

    const REVENUE_HEADER: &str =
        "mes,apadrinhamento,tvne,doacao_eu,troco_solidario,eventos,chico_rei,total";

    #[test]
    fn test_revenue_total_checked_on_load() {
        let data = format!("{}\njaneiro,10,5,0,0,0,0,15\n", REVENUE_HEADER);
        let records: Vec<RevenueRecord> = load_records_from_reader(data.as_bytes()).unwrap();
        assert_eq!(records[0].total, 15.0);

        let data = format!("{}\njaneiro,10,0,0,0,0,0,999\n", REVENUE_HEADER);
        let err = load_records_from_reader::<RevenueRecord, _>(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::Validation { ref field, .. } if field == "total"));
    }

    #[test]
    fn test_inconsistent_result_rejected() {
        let data = "\
mes,receitas,despesas,resultado_op,bolsas,resultado_final,soma_bolsas,fornecedores,contas_a_pagar
janeiro,1000,400,700,100,500,-100,50,-50
";
        let err = load_records_from_reader::<ResultRecord, _>(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::Validation { ref field, .. } if field == "resultado_op"));
    }

    #[test]
    fn test_duplicate_period_rejected() {
        let data = "mes,saldo_inicial,saldo_final\nmarço,0,10\nmarço,10,20\n";
        let err = load_records_from_reader::<CashRecord, _>(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicatePeriod { table: "caixa", .. }));
    }

    #[test]
    fn test_unknown_month_is_a_csv_error() {
        let data = "mes,saldo_inicial,saldo_final\nsmarch,0,10\n";
        let err = load_records_from_reader::<CashRecord, _>(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::Csv(_)));
    }

    #[test]
    fn test_write_uses_store_columns() {
        let rows = vec![CashRecord {
            period: Period::March,
            opening_balance: 550.0,
            closing_balance: 1450.0,
        }];
        let mut buffer = Vec::new();
        write_rows(&mut buffer, &rows).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("mes,saldo_inicial,saldo_final"));
        assert_eq!(lines.next(), Some("março,550.0,1450.0"));
    }

    #[test]
    fn test_goal_optional_cells() {
        let mut goal = InvestmentGoal::new(GoalKind::RevenueGoal, "TVNE");
        goal.reach = Some("80%".to_string());
        let forecast = ForecastEntry::new(ForecastKind::Expense, "Investimentos");

        let mut buffer = Vec::new();
        write_rows(&mut buffer, &[goal.clone()]).unwrap();
        let loaded: Vec<InvestmentGoal> = load_rows_from_reader(buffer.as_slice()).unwrap();
        assert_eq!(loaded, vec![goal]);

        let mut buffer = Vec::new();
        write_rows(&mut buffer, &[forecast.clone()]).unwrap();
        let loaded: Vec<ForecastEntry> = load_rows_from_reader(buffer.as_slice()).unwrap();
        assert_eq!(loaded, vec![forecast]);
    }
}
