//! Transparency Ledger CLI
//!
//! Command-line data entry, reports and export over a CSV directory store

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use transparency_ledger::{
    records::{CashInputs, ExpenseCategories, ResultInputs},
    Advisory, DashboardConfig, DashboardReport, ExportFormat, FileStore, MonthlyLedger, Period,
    Workbook,
};

#[derive(Parser, Debug)]
#[command(name = "ledger", version, about = "Monthly financial transparency ledger")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the CSV tables (overrides the configuration)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Refuse to save records whose derivation raised advisories
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every record stored for a month
    Show { month: Period },

    /// Save revenue sources for a month (unspecified sources keep their stored value)
    Revenue {
        month: Period,
        /// Source amount as name=value, e.g. apadrinhamento=1200
        #[arg(short, long = "source", value_parser = parse_pair)]
        sources: Vec<(String, f64)>,
    },

    /// Save expense categories for a month (unspecified categories keep their stored value)
    Expense {
        month: Period,
        /// Category amount as name=value, e.g. salarios=3000
        #[arg(short, long = "category", value_parser = parse_pair)]
        categories: Vec<(String, f64)>,
    },

    /// Derive and save the result record for a month
    Result {
        month: Period,
        /// Revenue amount (defaults to the month's revenue total)
        #[arg(long)]
        revenue: Option<f64>,
        /// Expense amount (defaults to the month's expense total)
        #[arg(long)]
        expenses: Option<f64>,
        /// Scholarships paid in the month
        #[arg(long)]
        scholarships: Option<f64>,
        /// Supplier obligations incurred in the month
        #[arg(long)]
        suppliers: Option<f64>,
    },

    /// Derive and save the cash record for a month
    Cash {
        month: Period,
        /// Opening balance, used only when the previous month has no cash record
        #[arg(long)]
        opening: Option<f64>,
        /// Closing balance, replaces the derived value
        #[arg(long)]
        closing: Option<f64>,
    },

    /// Print the dashboard report
    Report {
        /// Emit JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Export every table to a dated spreadsheet
    Export {
        /// Parent directory (overrides the configuration)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Write a folder of CSV files instead of one .xlsx file
        #[arg(long)]
        csv: bool,
    },
}

fn parse_pair(s: &str) -> std::result::Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid amount '{}': {}", value, e))?;
    Ok((name.trim().to_string(), value))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = DashboardConfig::load_or_default(cli.config.as_deref())
        .context("Unable to read configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if cli.strict {
        config.strict_advisories = true;
    }

    let mut ledger = MonthlyLedger::with_config(FileStore::open(&config.data_dir), &config);

    match cli.command {
        Command::Show { month } => show(&ledger, month)?,

        Command::Revenue { month, sources } => {
            let mut current = ledger.open_revenue(month)?.sources();
            for (name, amount) in &sources {
                current.set(name, *amount)?;
            }
            let saved = ledger.save_revenue(month, current)?;
            println!("Receitas de {}: total {:.2}", month, saved.total);
        }

        Command::Expense { month, categories } => {
            let mut current: ExpenseCategories = ledger.open_expense(month)?.categories();
            for (name, amount) in &categories {
                current.set(name, *amount)?;
            }
            let saved = ledger.save_expense(month, current)?;
            println!("Despesas de {}: total {:.2}", month, saved.total);
        }

        Command::Result { month, revenue, expenses, scholarships, suppliers } => {
            let draft = ledger.open_result(month)?.record.inputs();
            let inputs = ResultInputs {
                revenue_amount: revenue.unwrap_or(draft.revenue_amount),
                expense_amount: expenses.unwrap_or(draft.expense_amount),
                scholarship_amount: scholarships.unwrap_or(draft.scholarship_amount),
                supplier_amount: suppliers.unwrap_or(draft.supplier_amount),
            };
            let saved = ledger.save_result(month, inputs)?;
            let r = &saved.record;
            println!("Resultados de {}:", month);
            println!("  Resultado operacional: {:>12.2}", r.operating_result);
            println!("  Resultado final:       {:>12.2}", r.final_result);
            println!("  Soma bolsas:           {:>12.2}", r.scholarship_accrual);
            println!("  Contas a pagar:        {:>12.2}", r.payables_balance);
            print_advisories(&saved.advisories);
        }

        Command::Cash { month, opening, closing } => {
            let inputs = CashInputs {
                opening_balance: opening,
                closing_balance_override: closing,
            };
            let saved = ledger.save_cash(month, inputs)?;
            println!("Caixa de {}:", month);
            println!("  Saldo inicial: {:>12.2}", saved.record.opening_balance);
            println!("  Saldo final:   {:>12.2}", saved.record.closing_balance);
            print_advisories(&saved.advisories);
        }

        Command::Report { json } => {
            let report = DashboardReport::build(&ledger.snapshot()?);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }

        Command::Export { out, csv } => {
            let parent = out.unwrap_or_else(|| config.export_dir.clone());
            let format = if csv { ExportFormat::CsvDir } else { ExportFormat::Xlsx };
            let workbook = Workbook::from_book(&ledger.snapshot()?)?;
            let written = workbook
                .write_dated(&parent, format)
                .with_context(|| format!("Unable to export to {}", parent.display()))?;
            println!("Exported {} sheets to {}", workbook.sheets.len(), written.display());
        }
    }

    Ok(())
}

fn show(ledger: &MonthlyLedger<FileStore>, month: Period) -> Result<()> {
    println!("{}", month.label());
    println!("{}", "=".repeat(40));

    let revenue = ledger.open_revenue(month)?;
    println!("Receitas (total {:.2})", revenue.total);
    for (name, amount) in revenue.sources().named_amounts() {
        println!("  {:<22} {:>12.2}", name, amount);
    }

    let expense = ledger.open_expense(month)?;
    println!("Despesas (total {:.2})", expense.total);
    for (name, amount) in expense.categories().named_amounts() {
        println!("  {:<22} {:>12.2}", name, amount);
    }

    let result = ledger.open_result(month)?;
    let r = &result.record;
    println!("Resultados");
    println!("  {:<22} {:>12.2}", "receitas", r.revenue_amount);
    println!("  {:<22} {:>12.2}", "despesas", r.expense_amount);
    println!("  {:<22} {:>12.2}", "resultado_op", r.operating_result);
    println!("  {:<22} {:>12.2}", "bolsas", r.scholarship_amount);
    println!("  {:<22} {:>12.2}", "resultado_final", r.final_result);
    println!("  {:<22} {:>12.2}", "soma_bolsas", r.scholarship_accrual);
    println!("  {:<22} {:>12.2}", "fornecedores", r.supplier_amount);
    println!("  {:<22} {:>12.2}", "contas_a_pagar", r.payables_balance);
    print_advisories(&result.advisories);

    let cash = ledger.open_cash(month)?;
    println!("Caixa");
    println!("  {:<22} {:>12.2}", "saldo_inicial", cash.record.opening_balance);
    println!("  {:<22} {:>12.2}", "saldo_final", cash.record.closing_balance);
    print_advisories(&cash.advisories);

    Ok(())
}

fn print_advisories(advisories: &[Advisory]) {
    for advisory in advisories {
        println!("  ! {}", advisory);
    }
}

fn print_report(report: &DashboardReport) {
    println!("{:<10} {:>12} {:>12} {:>12} {:>12}",
        "Mês", "Receitas", "Despesas", "Saldo", "Resultado");
    println!("{}", "-".repeat(62));
    for row in &report.overview {
        println!("{:<10} {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
            row.label, row.revenue, row.expenses, row.balance, row.final_result);
    }

    println!("\nResumo:");
    println!("  Receitas totais: {:.2}", report.headline.total_revenue);
    println!("  Despesas totais: {:.2}", report.headline.total_expenses);
    println!("  Saldo atual:     {:.2}", report.headline.current_balance);

    println!("\nReceitas por fonte:");
    for slice in &report.revenue_by_source {
        println!("  {:<18} {:>12.2}", slice.name, slice.value);
    }

    println!("\nDespesas por grupo:");
    for slice in &report.expenses_by_group {
        println!("  {:<18} {:>12.2}", slice.name, slice.value);
    }

    if !report.cash_evolution.is_empty() {
        println!("\nEvolução do caixa:");
        for point in &report.cash_evolution {
            println!("  {:<10} {:>12.2} {:>12.2}",
                point.period.label(), point.opening_balance, point.closing_balance);
        }
    }

    if !report.goal_attainment.is_empty() {
        println!("\nMetas:");
        for goal in &report.goal_attainment {
            println!("  {:<18} {:>12.2} {:>12.2} {:>7.1}%",
                goal.category, goal.target, goal.raised, goal.percentage);
        }
    }
}
