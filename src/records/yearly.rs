//! Yearly tables: revenue/expense forecasts and investment goals
//!
//! Unlike the monthly records these are not keyed by period. The whole table
//! is replaced on every save.

use serde::{Deserialize, Serialize};

/// Side of the budget a forecast row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastKind {
    #[serde(rename = "despesa")]
    Expense,
    #[serde(rename = "receita")]
    Revenue,
}

/// Planned vs realized amount for one budget category (`previsao`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    #[serde(rename = "tipo")]
    pub kind: ForecastKind,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "prevista")]
    pub planned: f64,
    #[serde(rename = "realizada")]
    pub realized: f64,
}

impl ForecastEntry {
    pub fn new(kind: ForecastKind, category: impl Into<String>) -> Self {
        Self {
            kind,
            category: category.into(),
            planned: 0.0,
            realized: 0.0,
        }
    }

    /// Realized minus planned
    pub fn variance(&self) -> f64 {
        self.realized - self.planned
    }
}

/// Rows offered when no forecast has been saved yet
pub fn default_forecasts() -> Vec<ForecastEntry> {
    let expenses = [
        "Tarifas administrativas, bancárias, impostos, contabilidade",
        "Custo operacional",
        "Eventos, site, celular, marketing e manutenção",
        "Bolsas de estudo e RD",
        "Investimentos",
    ];
    let revenues = [
        "Apadrinhamento",
        "TVNE/ Parcerias/Chico Rei",
        "Troco Solidário \"em negociação\"",
        "Eventos, rifas, vendas de produtos",
    ];

    expenses
        .iter()
        .map(|c| ForecastEntry::new(ForecastKind::Expense, *c))
        .chain(revenues.iter().map(|c| ForecastEntry::new(ForecastKind::Revenue, *c)))
        .collect()
}

/// Section of the investments and goals table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalKind {
    /// Fundraising action with a target and amount raised
    #[serde(rename = "acao")]
    Action,
    /// Revenue goal with realized amount
    #[serde(rename = "previsao_receita")]
    RevenueGoal,
    /// Expense ceiling with realized amount
    #[serde(rename = "previsao_despesa")]
    ExpenseGoal,
}

/// One row of `investimentos_metas`
///
/// Which optional fields are meaningful depends on `kind`; unused ones stay
/// `None` and are written as empty cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentGoal {
    #[serde(rename = "tipo")]
    pub kind: GoalKind,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "previsao")]
    pub forecast: Option<f64>,
    #[serde(rename = "acao_meta")]
    pub action: Option<String>,
    #[serde(rename = "meta")]
    pub target: Option<f64>,
    #[serde(rename = "arrecadacao_total")]
    pub total_raised: Option<f64>,
    #[serde(rename = "realizado")]
    pub realized: Option<f64>,
    #[serde(rename = "alcance_meta")]
    pub reach: Option<String>,
    #[serde(rename = "detalhamento_meta")]
    pub detail: Option<String>,
}

impl InvestmentGoal {
    /// Blank row for a section, with the numeric fields that section uses set to zero
    pub fn new(kind: GoalKind, category: impl Into<String>) -> Self {
        let mut goal = Self {
            kind,
            category: category.into(),
            forecast: None,
            action: None,
            target: Some(0.0),
            total_raised: None,
            realized: None,
            reach: None,
            detail: None,
        };
        match kind {
            GoalKind::Action => {
                goal.forecast = Some(0.0);
                goal.total_raised = Some(0.0);
            }
            GoalKind::RevenueGoal | GoalKind::ExpenseGoal => {
                goal.realized = Some(0.0);
            }
        }
        goal
    }

    /// Amount raised as a percentage of the target, 0 without a positive target
    pub fn attainment_pct(&self) -> f64 {
        match (self.target, self.total_raised) {
            (Some(target), Some(raised)) if target > 0.0 => raised / target * 100.0,
            _ => 0.0,
        }
    }
}

/// Rows offered when no goals have been saved yet
pub fn default_goals() -> Vec<InvestmentGoal> {
    let actions = [
        "Apadrinhamento",
        "TVNE",
        "Doação parceiros",
        "Troco solidário",
        "Eventos",
        "Rifas",
    ];
    let expense_goals = [
        "Tarifas",
        "Custo operacional",
        "Eventos",
        "Bolsas de estudo e RD",
        "Investimentos",
    ];

    let mut goals: Vec<InvestmentGoal> = actions
        .iter()
        .map(|c| InvestmentGoal::new(GoalKind::Action, *c))
        .collect();
    goals.extend(actions.iter().map(|c| InvestmentGoal::new(GoalKind::RevenueGoal, *c)));
    goals.extend(expense_goals.iter().map(|c| InvestmentGoal::new(GoalKind::ExpenseGoal, *c)));
    goals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_variance() {
        let mut entry = ForecastEntry::new(ForecastKind::Revenue, "Apadrinhamento");
        entry.planned = 1000.0;
        entry.realized = 850.0;
        assert_eq!(entry.variance(), -150.0);
    }

    #[test]
    fn test_default_forecasts() {
        let rows = default_forecasts();
        assert_eq!(rows.len(), 9);
        assert_eq!(rows.iter().filter(|r| r.kind == ForecastKind::Expense).count(), 5);
        assert!(rows.iter().all(|r| r.planned == 0.0 && r.realized == 0.0));
    }

    #[test]
    fn test_attainment_pct() {
        let mut goal = InvestmentGoal::new(GoalKind::Action, "Rifas");
        assert_eq!(goal.attainment_pct(), 0.0);

        goal.target = Some(2000.0);
        goal.total_raised = Some(500.0);
        assert_eq!(goal.attainment_pct(), 25.0);

        goal.total_raised = None;
        assert_eq!(goal.attainment_pct(), 0.0);
    }

    #[test]
    fn test_default_goals_per_section() {
        let goals = default_goals();
        assert_eq!(goals.iter().filter(|g| g.kind == GoalKind::Action).count(), 6);
        assert_eq!(goals.iter().filter(|g| g.kind == GoalKind::RevenueGoal).count(), 6);
        assert_eq!(goals.iter().filter(|g| g.kind == GoalKind::ExpenseGoal).count(), 5);

        let action = &goals[0];
        assert_eq!(action.forecast, Some(0.0));
        assert_eq!(action.realized, None);
    }
}
