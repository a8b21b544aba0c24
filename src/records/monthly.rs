//! Monthly record types matching the hosted store's tables
//!
//! Field names are English in Rust and renamed to the store's Portuguese
//! column names on (de)serialization, so CSV exports of the hosted tables
//! load unchanged.

use crate::derivation::{derive_expense_total, derive_revenue_total};
use crate::error::{LedgerError, Result};
use crate::period::Period;
use serde::{Deserialize, Serialize};

/// Relative tolerance when comparing a stored derived value with its recomputation
const STORED_TOLERANCE: f64 = 1e-9;

/// Check a stored derived field against the value recomputed from its inputs
fn check_stored(period: Period, field: &str, stored: f64, derived: f64) -> Result<()> {
    if (stored - derived).abs() <= STORED_TOLERANCE * derived.abs().max(1.0) {
        return Ok(());
    }
    Err(LedgerError::validation(
        field,
        format!("{}: stored {} but its inputs give {}", period, stored, derived),
    ))
}

/// Raw revenue amounts for one month, by source
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueSources {
    pub sponsorship: f64,
    pub tvne: f64,
    pub eu_donation: f64,
    pub solidarity_change: f64,
    pub events: f64,
    pub chico_rei: f64,
}

impl RevenueSources {
    /// Source amounts keyed by store column name, in column order
    pub fn named_amounts(&self) -> [(&'static str, f64); 6] {
        [
            ("apadrinhamento", self.sponsorship),
            ("tvne", self.tvne),
            ("doacao_eu", self.eu_donation),
            ("troco_solidario", self.solidarity_change),
            ("eventos", self.events),
            ("chico_rei", self.chico_rei),
        ]
    }

    /// Set one source by its store column name or English field name
    pub fn set(&mut self, name: &str, amount: f64) -> Result<()> {
        let slot = match name.trim().to_lowercase().as_str() {
            "apadrinhamento" | "sponsorship" => &mut self.sponsorship,
            "tvne" => &mut self.tvne,
            "doacao_eu" | "eu_donation" => &mut self.eu_donation,
            "troco_solidario" | "solidarity_change" => &mut self.solidarity_change,
            "eventos" | "events" => &mut self.events,
            "chico_rei" => &mut self.chico_rei,
            _ => return Err(LedgerError::UnknownField(name.to_string())),
        };
        *slot = amount;
        Ok(())
    }
}

/// Stored revenue row (`receitas`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    #[serde(rename = "mes")]
    pub period: Period,
    #[serde(rename = "apadrinhamento")]
    pub sponsorship: f64,
    pub tvne: f64,
    #[serde(rename = "doacao_eu")]
    pub eu_donation: f64,
    #[serde(rename = "troco_solidario")]
    pub solidarity_change: f64,
    #[serde(rename = "eventos")]
    pub events: f64,
    pub chico_rei: f64,
    pub total: f64,
}

impl RevenueRecord {
    /// Record for `period` with `total` derived from the sources
    pub fn new(period: Period, sources: RevenueSources) -> Self {
        let total = derive_revenue_total(&sources);
        Self {
            period,
            sponsorship: sources.sponsorship,
            tvne: sources.tvne,
            eu_donation: sources.eu_donation,
            solidarity_change: sources.solidarity_change,
            events: sources.events,
            chico_rei: sources.chico_rei,
            total,
        }
    }

    /// All sources zero
    pub fn empty(period: Period) -> Self {
        Self::new(period, RevenueSources::default())
    }

    pub fn sources(&self) -> RevenueSources {
        RevenueSources {
            sponsorship: self.sponsorship,
            tvne: self.tvne,
            eu_donation: self.eu_donation,
            solidarity_change: self.solidarity_change,
            events: self.events,
            chico_rei: self.chico_rei,
        }
    }

    /// Fails when the stored total is not the sum of the sources
    pub fn verify_total(&self) -> Result<()> {
        check_stored(self.period, "total", self.total, derive_revenue_total(&self.sources()))
    }
}

/// Report grouping for expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExpenseGroup {
    Operational,
    Personnel,
    Marketing,
    Other,
}

impl ExpenseGroup {
    pub const ALL: [ExpenseGroup; 4] = [
        ExpenseGroup::Operational,
        ExpenseGroup::Personnel,
        ExpenseGroup::Marketing,
        ExpenseGroup::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExpenseGroup::Operational => "Operacionais",
            ExpenseGroup::Personnel => "Pessoal",
            ExpenseGroup::Marketing => "Marketing",
            ExpenseGroup::Other => "Outros",
        }
    }
}

/// Raw expense amounts for one month, by category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCategories {
    pub bank_fees: f64,
    pub platform_fees: f64,
    pub income_tax: f64,
    pub platform_annuity: f64,
    pub salaries: f64,
    pub website: f64,
    pub marketing: f64,
    pub events: f64,
    pub digital_certificate: f64,
    pub occupational_health: f64,
    pub accounting: f64,
    pub mobile_phone: f64,
    pub maintenance: f64,
    pub notary: f64,
}

impl ExpenseCategories {
    /// Category amounts keyed by store column name, in column order
    pub fn named_amounts(&self) -> [(&'static str, f64); 14] {
        [
            ("tarifas_bancarias", self.bank_fees),
            ("tarifas_plataformas", self.platform_fees),
            ("impostos_rf", self.income_tax),
            ("anuidade_plataformas", self.platform_annuity),
            ("salarios", self.salaries),
            ("site", self.website),
            ("marketing", self.marketing),
            ("eventos", self.events),
            ("certificado_digital", self.digital_certificate),
            ("medicina_trabalho", self.occupational_health),
            ("contabilidade", self.accounting),
            ("celular_claro", self.mobile_phone),
            ("manutencoes", self.maintenance),
            ("cartorio", self.notary),
        ]
    }

    /// Report group of a category, by store column name
    pub fn group_of(column: &str) -> Option<ExpenseGroup> {
        let group = match column {
            "tarifas_bancarias" | "tarifas_plataformas" | "impostos_rf" | "anuidade_plataformas"
            | "certificado_digital" | "contabilidade" => ExpenseGroup::Operational,
            "salarios" | "medicina_trabalho" => ExpenseGroup::Personnel,
            "marketing" | "site" => ExpenseGroup::Marketing,
            "eventos" | "celular_claro" | "manutencoes" | "cartorio" => ExpenseGroup::Other,
            _ => return None,
        };
        Some(group)
    }

    /// Set one category by its store column name or English field name
    pub fn set(&mut self, name: &str, amount: f64) -> Result<()> {
        let slot = match name.trim().to_lowercase().as_str() {
            "tarifas_bancarias" | "bank_fees" => &mut self.bank_fees,
            "tarifas_plataformas" | "platform_fees" => &mut self.platform_fees,
            "impostos_rf" | "income_tax" => &mut self.income_tax,
            "anuidade_plataformas" | "platform_annuity" => &mut self.platform_annuity,
            "salarios" | "salaries" => &mut self.salaries,
            "site" | "website" => &mut self.website,
            "marketing" => &mut self.marketing,
            "eventos" | "events" => &mut self.events,
            "certificado_digital" | "digital_certificate" => &mut self.digital_certificate,
            "medicina_trabalho" | "occupational_health" => &mut self.occupational_health,
            "contabilidade" | "accounting" => &mut self.accounting,
            "celular_claro" | "mobile_phone" => &mut self.mobile_phone,
            "manutencoes" | "maintenance" => &mut self.maintenance,
            "cartorio" | "notary" => &mut self.notary,
            _ => return Err(LedgerError::UnknownField(name.to_string())),
        };
        *slot = amount;
        Ok(())
    }
}

/// Stored expense row (`despesas`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(rename = "mes")]
    pub period: Period,
    #[serde(rename = "tarifas_bancarias")]
    pub bank_fees: f64,
    #[serde(rename = "tarifas_plataformas")]
    pub platform_fees: f64,
    #[serde(rename = "impostos_rf")]
    pub income_tax: f64,
    #[serde(rename = "anuidade_plataformas")]
    pub platform_annuity: f64,
    #[serde(rename = "salarios")]
    pub salaries: f64,
    #[serde(rename = "site")]
    pub website: f64,
    pub marketing: f64,
    #[serde(rename = "eventos")]
    pub events: f64,
    #[serde(rename = "certificado_digital")]
    pub digital_certificate: f64,
    #[serde(rename = "medicina_trabalho")]
    pub occupational_health: f64,
    #[serde(rename = "contabilidade")]
    pub accounting: f64,
    #[serde(rename = "celular_claro")]
    pub mobile_phone: f64,
    #[serde(rename = "manutencoes")]
    pub maintenance: f64,
    #[serde(rename = "cartorio")]
    pub notary: f64,
    pub total: f64,
}

impl ExpenseRecord {
    /// Record for `period` with `total` derived from the categories
    pub fn new(period: Period, categories: ExpenseCategories) -> Self {
        let total = derive_expense_total(&categories);
        Self {
            period,
            bank_fees: categories.bank_fees,
            platform_fees: categories.platform_fees,
            income_tax: categories.income_tax,
            platform_annuity: categories.platform_annuity,
            salaries: categories.salaries,
            website: categories.website,
            marketing: categories.marketing,
            events: categories.events,
            digital_certificate: categories.digital_certificate,
            occupational_health: categories.occupational_health,
            accounting: categories.accounting,
            mobile_phone: categories.mobile_phone,
            maintenance: categories.maintenance,
            notary: categories.notary,
            total,
        }
    }

    /// All categories zero
    pub fn empty(period: Period) -> Self {
        Self::new(period, ExpenseCategories::default())
    }

    pub fn categories(&self) -> ExpenseCategories {
        ExpenseCategories {
            bank_fees: self.bank_fees,
            platform_fees: self.platform_fees,
            income_tax: self.income_tax,
            platform_annuity: self.platform_annuity,
            salaries: self.salaries,
            website: self.website,
            marketing: self.marketing,
            events: self.events,
            digital_certificate: self.digital_certificate,
            occupational_health: self.occupational_health,
            accounting: self.accounting,
            mobile_phone: self.mobile_phone,
            maintenance: self.maintenance,
            notary: self.notary,
        }
    }

    /// Fails when the stored total is not the sum of the categories
    pub fn verify_total(&self) -> Result<()> {
        check_stored(self.period, "total", self.total, derive_expense_total(&self.categories()))
    }
}

/// Raw inputs of the result form
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultInputs {
    pub revenue_amount: f64,
    pub expense_amount: f64,
    /// Scholarships paid in the month (bolsas)
    pub scholarship_amount: f64,
    /// Supplier obligations incurred in the month (fornecedores)
    pub supplier_amount: f64,
}

/// Stored result row (`resultados`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "mes")]
    pub period: Period,
    #[serde(rename = "receitas")]
    pub revenue_amount: f64,
    #[serde(rename = "despesas")]
    pub expense_amount: f64,
    #[serde(rename = "resultado_op")]
    pub operating_result: f64,
    #[serde(rename = "bolsas")]
    pub scholarship_amount: f64,
    #[serde(rename = "resultado_final")]
    pub final_result: f64,
    #[serde(rename = "soma_bolsas")]
    pub scholarship_accrual: f64,
    #[serde(rename = "fornecedores")]
    pub supplier_amount: f64,
    #[serde(rename = "contas_a_pagar")]
    pub payables_balance: f64,
}

impl ResultRecord {
    pub fn inputs(&self) -> ResultInputs {
        ResultInputs {
            revenue_amount: self.revenue_amount,
            expense_amount: self.expense_amount,
            scholarship_amount: self.scholarship_amount,
            supplier_amount: self.supplier_amount,
        }
    }

    /// Fails when a stored in-month result disagrees with the record's inputs
    ///
    /// `payables_balance` depends on the predecessor and is not checked.
    pub fn verify_results(&self) -> Result<()> {
        let operating = self.revenue_amount - self.expense_amount;
        check_stored(self.period, "resultado_op", self.operating_result, operating)?;
        check_stored(self.period, "resultado_final", self.final_result, operating - self.scholarship_amount)?;
        check_stored(self.period, "soma_bolsas", self.scholarship_accrual, -self.scholarship_amount)
    }
}

/// Raw inputs of the cash form
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CashInputs {
    /// Manual opening balance, used only when no previous closing balance exists
    pub opening_balance: Option<f64>,
    /// Replaces the derived closing balance when set
    pub closing_balance_override: Option<f64>,
}

/// Stored cash row (`caixa`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashRecord {
    #[serde(rename = "mes")]
    pub period: Period,
    #[serde(rename = "saldo_inicial")]
    pub opening_balance: f64,
    #[serde(rename = "saldo_final")]
    pub closing_balance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revenue_set_accepts_both_names() {
        let mut sources = RevenueSources::default();
        sources.set("apadrinhamento", 100.0).unwrap();
        sources.set("eu_donation", 25.0).unwrap();
        sources.set("Chico_Rei", 5.0).unwrap();

        assert_eq!(sources.sponsorship, 100.0);
        assert_eq!(sources.eu_donation, 25.0);
        assert_eq!(sources.chico_rei, 5.0);
        assert!(sources.set("rifas", 1.0).is_err());
    }

    #[test]
    fn test_record_keeps_sources() {
        let mut sources = RevenueSources::default();
        sources.set("tvne", 40.0).unwrap();
        let record = RevenueRecord::new(Period::May, sources);

        assert_eq!(record.sources(), sources);
        assert_eq!(record.period, Period::May);
        assert_eq!(record.total, 40.0);
        assert!(record.verify_total().is_ok());
    }

    #[test]
    fn test_edited_total_fails_verification() {
        let sources = RevenueSources {
            tvne: 5.0,
            ..Default::default()
        };
        let mut record = RevenueRecord::new(Period::May, sources);
        assert_eq!(record.total, 5.0);

        record.total = 42.0;
        let err = record.verify_total().unwrap_err();
        assert!(matches!(err, LedgerError::Validation { ref field, .. } if field == "total"));
    }

    #[test]
    fn test_result_verification_skips_payables() {
        let mut record = ResultRecord {
            period: Period::February,
            revenue_amount: 1200.0,
            expense_amount: 300.0,
            operating_result: 900.0,
            scholarship_amount: 0.0,
            final_result: 900.0,
            scholarship_accrual: 0.0,
            supplier_amount: 20.0,
            payables_balance: -30.0,
        };
        assert!(record.verify_results().is_ok());

        record.payables_balance = 123.0;
        assert!(record.verify_results().is_ok());

        record.final_result = 1000.0;
        assert!(record.verify_results().is_err());
    }

    #[test]
    fn test_every_expense_category_has_a_group() {
        let categories = ExpenseCategories::default();
        for (column, _) in categories.named_amounts() {
            assert!(ExpenseCategories::group_of(column).is_some(), "{} has no group", column);
        }
        assert_eq!(ExpenseCategories::group_of("salarios"), Some(ExpenseGroup::Personnel));
        assert_eq!(ExpenseCategories::group_of("unknown"), None);
    }

    #[test]
    fn test_expense_set_and_read_back() {
        let mut categories = ExpenseCategories::default();
        categories.set("cartorio", 12.5).unwrap();
        categories.set("website", 30.0).unwrap();

        let record = ExpenseRecord::new(Period::June, categories);
        assert_eq!(record.total, 42.5);
        assert!(record.verify_total().is_ok());
        assert_eq!(record.categories().notary, 12.5);
        assert_eq!(record.categories().website, 30.0);
        assert!(categories.set("aluguel", 1.0).is_err());
    }
}
