//! Basic types for the analytics engine

use serde::{Deserialize, Serialize};

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money coming in ("Entrada")
    #[serde(rename = "Entrada", alias = "inflow", alias = "Inflow")]
    Inflow,
    /// Money going out ("Saída")
    #[serde(rename = "Saída", alias = "Saida", alias = "outflow", alias = "Outflow")]
    Outflow,
}

impl TransactionType {
    /// Label used by the transaction store
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Inflow => "Entrada",
            TransactionType::Outflow => "Saída",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entrada" | "inflow" => Ok(TransactionType::Inflow),
            "saída" | "saida" | "outflow" => Ok(TransactionType::Outflow),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Vocabulary a category belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryGroup {
    /// Renda fixa
    FixedIncome,
    /// Renda variável
    VariableIncome,
    /// Receitas
    Income,
    /// Despesas
    Expense,
}

impl CategoryGroup {
    /// Fixed and variable income are both investments
    pub fn is_investment(&self) -> bool {
        matches!(self, CategoryGroup::FixedIncome | CategoryGroup::VariableIncome)
    }
}

/// Closed category vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Tesouro Direto")]
    TesouroDireto,
    #[serde(rename = "CDB / RDB")]
    CdbRdb,
    #[serde(rename = "LCI")]
    Lci,
    #[serde(rename = "LCA")]
    Lca,
    #[serde(rename = "Poupança")]
    Poupanca,
    #[serde(rename = "Bolsa de Valores")]
    BolsaDeValores,
    #[serde(rename = "Fundos de investimento")]
    FundosDeInvestimento,
    #[serde(rename = "Previdência Privada")]
    PrevidenciaPrivada,
    #[serde(rename = "ETFs")]
    Etfs,
    #[serde(rename = "Criptomoedas")]
    Criptomoedas,
    #[serde(rename = "FII")]
    Fii,
    #[serde(rename = "Salário")]
    Salario,
    #[serde(rename = "Renda Extra")]
    RendaExtra,
    #[serde(rename = "Alimentação")]
    Alimentacao,
    #[serde(rename = "Transporte")]
    Transporte,
    #[serde(rename = "Saúde")]
    Saude,
    #[serde(rename = "Educação")]
    Educacao,
    #[serde(rename = "Lazer")]
    Lazer,
    #[serde(rename = "Moradia")]
    Moradia,
}

impl Category {
    /// Every category, grouped by vocabulary
    pub const ALL: [Category; 19] = [
        Category::TesouroDireto,
        Category::CdbRdb,
        Category::Lci,
        Category::Lca,
        Category::Poupanca,
        Category::BolsaDeValores,
        Category::FundosDeInvestimento,
        Category::PrevidenciaPrivada,
        Category::Etfs,
        Category::Criptomoedas,
        Category::Fii,
        Category::Salario,
        Category::RendaExtra,
        Category::Alimentacao,
        Category::Transporte,
        Category::Saude,
        Category::Educacao,
        Category::Lazer,
        Category::Moradia,
    ];

    /// Display label, as stored by the transaction store
    pub fn label(&self) -> &'static str {
        match self {
            Category::TesouroDireto => "Tesouro Direto",
            Category::CdbRdb => "CDB / RDB",
            Category::Lci => "LCI",
            Category::Lca => "LCA",
            Category::Poupanca => "Poupança",
            Category::BolsaDeValores => "Bolsa de Valores",
            Category::FundosDeInvestimento => "Fundos de investimento",
            Category::PrevidenciaPrivada => "Previdência Privada",
            Category::Etfs => "ETFs",
            Category::Criptomoedas => "Criptomoedas",
            Category::Fii => "FII",
            Category::Salario => "Salário",
            Category::RendaExtra => "Renda Extra",
            Category::Alimentacao => "Alimentação",
            Category::Transporte => "Transporte",
            Category::Saude => "Saúde",
            Category::Educacao => "Educação",
            Category::Lazer => "Lazer",
            Category::Moradia => "Moradia",
        }
    }

    pub fn group(&self) -> CategoryGroup {
        match self {
            Category::TesouroDireto
            | Category::CdbRdb
            | Category::Lci
            | Category::Lca
            | Category::Poupanca => CategoryGroup::FixedIncome,
            Category::BolsaDeValores
            | Category::FundosDeInvestimento
            | Category::PrevidenciaPrivada
            | Category::Etfs
            | Category::Criptomoedas
            | Category::Fii => CategoryGroup::VariableIncome,
            Category::Salario | Category::RendaExtra => CategoryGroup::Income,
            Category::Alimentacao
            | Category::Transporte
            | Category::Saude
            | Category::Educacao
            | Category::Lazer
            | Category::Moradia => CategoryGroup::Expense,
        }
    }

    pub fn is_investment(&self) -> bool {
        self.group().is_investment()
    }

    /// Chart color used by the dashboard
    pub fn color(&self) -> &'static str {
        match self {
            Category::FundosDeInvestimento => "#2E7DFF",
            Category::TesouroDireto => "#28C76F",
            Category::PrevidenciaPrivada => "#FF4081",
            Category::BolsaDeValores => "#FF9800",
            Category::Criptomoedas => "#AB47BC",
            Category::Fii => "#00BCD4",
            Category::Etfs => "#8BC34A",
            Category::CdbRdb => "#FF5722",
            Category::Lci => "#3F51B5",
            Category::Lca => "#9C27B0",
            Category::Poupanca => "#009688",
            Category::Alimentacao => "#FF6384",
            Category::Transporte => "#36A2EB",
            Category::Saude => "#FFCE56",
            Category::Educacao => "#4CAF50",
            Category::Lazer => "#9C27B0",
            Category::Moradia => "#FF8A65",
            Category::Salario | Category::RendaExtra => "#CCCCCC",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    /// Matches labels ignoring case and surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.label().to_lowercase() == wanted)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
