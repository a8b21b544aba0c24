use approx::assert_relative_eq;
use transparency_ledger::{
    records::{ExpenseCategories, LedgerBook, RevenueSources},
    Advisory, CashInputs, CashRecord, DashboardReport, FileStore, MonthlyLedger, Period,
    RecordStore, ResultInputs, ResultRecord, Workbook,
};

fn enter_month(
    ledger: &mut MonthlyLedger<FileStore>,
    period: Period,
    revenue: &[(&str, f64)],
    expenses: &[(&str, f64)],
) {
    let mut sources = RevenueSources::default();
    for (name, amount) in revenue {
        sources.set(name, *amount).expect("revenue source");
    }
    ledger.save_revenue(period, sources).expect("save revenue");

    let mut categories = ExpenseCategories::default();
    for (name, amount) in expenses {
        categories.set(name, *amount).expect("expense category");
    }
    ledger.save_expense(period, categories).expect("save expense");
}

#[test]
fn two_month_chain_through_csv_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut ledger = MonthlyLedger::new(FileStore::open(dir.path()));

    enter_month(
        &mut ledger,
        Period::January,
        &[("apadrinhamento", 700.0), ("eventos", 300.0)],
        &[("salarios", 400.0)],
    );
    let january = ledger.open_result(Period::January).expect("open january");
    let january = ledger
        .save_result(Period::January, ResultInputs {
            scholarship_amount: 100.0,
            supplier_amount: 50.0,
            ..january.record.inputs()
        })
        .expect("save january result");
    assert!(january.is_clean());
    assert_relative_eq!(january.record.final_result, 500.0);
    assert_relative_eq!(january.record.payables_balance, -50.0);

    let cash = ledger
        .save_cash(Period::January, CashInputs::default())
        .expect("save january cash");
    assert_relative_eq!(cash.record.closing_balance, 550.0);

    enter_month(
        &mut ledger,
        Period::February,
        &[("tvne", 1200.0)],
        &[("manutencoes", 300.0)],
    );
    let february = ledger.open_result(Period::February).expect("open february");
    let february = ledger
        .save_result(Period::February, ResultInputs {
            supplier_amount: 20.0,
            ..february.record.inputs()
        })
        .expect("save february result");
    assert_relative_eq!(february.record.operating_result, 900.0);
    assert_relative_eq!(february.record.payables_balance, -30.0);

    let cash = ledger
        .save_cash(Period::February, CashInputs::default())
        .expect("save february cash");
    assert!(cash.is_clean());
    assert_relative_eq!(cash.record.opening_balance, 550.0);
    assert_relative_eq!(cash.record.closing_balance, 1450.0);

    // A fresh store over the same directory sees the persisted chain
    let reopened = FileStore::open(dir.path());
    let results = reopened.fetch_all::<ResultRecord>().expect("fetch results");
    assert_eq!(
        results.iter().map(|r| r.period).collect::<Vec<_>>(),
        vec![Period::January, Period::February]
    );
    let stored_cash = reopened
        .fetch::<CashRecord>(Period::February)
        .expect("fetch cash")
        .expect("february cash");
    assert_relative_eq!(stored_cash.closing_balance, 1450.0);

    let book: LedgerBook = reopened.snapshot().expect("snapshot");
    let report = DashboardReport::build(&book);
    assert_relative_eq!(report.headline.total_revenue, 2200.0);
    assert_relative_eq!(report.headline.total_expenses, 700.0);
    assert_relative_eq!(report.headline.current_balance, 1400.0);
    assert_eq!(report.cash_evolution.len(), 2);

    let workbook = Workbook::from_book(&book).expect("workbook");
    assert_eq!(
        workbook.sheet_names(),
        vec!["Receitas", "Despesas", "Resultados", "Caixa"]
    );
}

#[test]
fn gap_in_chain_is_reported_not_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut ledger = MonthlyLedger::new(FileStore::open(dir.path()));

    let saved = ledger
        .save_result(Period::March, ResultInputs {
            revenue_amount: 500.0,
            expense_amount: 200.0,
            scholarship_amount: 0.0,
            supplier_amount: 10.0,
        })
        .expect("save march result");

    assert!(saved.has(&Advisory::PreviousPeriodMissing {
        period: Period::March,
        previous: Period::February,
    }));
    assert_relative_eq!(saved.record.payables_balance, 10.0);

    let mut strict = MonthlyLedger::new(FileStore::open(dir.path())).strict_advisories(true);
    assert!(strict.save_cash(Period::June, CashInputs::default()).is_err());
    assert!(strict
        .store()
        .fetch::<CashRecord>(Period::June)
        .expect("fetch")
        .is_none());
}
