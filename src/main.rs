//! Investboard main entry point

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use investboard_config::{Config, CurrencyConfig};
use investboard_core::{
    parse_amount, parse_date, Category, CategoryBreakdown, DashboardOptions, DashboardReport, DataQualityWarning,
    FilterForm, MonthKey, RawTransaction, TransactionFilter, TransactionListView, TransactionType,
};
use investboard_store::{JsonFileSource, NewTransaction, SourceRef, TransactionPatch, TransactionStore};
use investboard_utils::{format_currency, format_date, format_percentage};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "investboard")]
#[command(version = "0.1.0")]
#[command(about = "Transaction analytics for an investments dashboard", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    #[command(flatten)]
    Store(StoreCommand),
    /// Print the default configuration
    InitConfig,
}

/// Subcommands that read or write the transaction store
#[derive(Subcommand, Debug, PartialEq)]
enum StoreCommand {
    /// Print the dashboard report
    Report {
        /// Restrict the expense breakdown to a month (1-12)
        #[arg(long)]
        month: Option<MonthKey>,
        #[arg(long)]
        json: bool,
    },
    /// List transactions grouped by month
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        month: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        min: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        max: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Add a transaction
    Add {
        #[arg(long = "type")]
        kind: TransactionType,
        #[arg(long, allow_hyphen_values = true)]
        value: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        file: Option<String>,
    },
    /// Update fields of a transaction; an empty category clears it
    Update {
        id: i64,
        #[arg(long = "type")]
        kind: Option<TransactionType>,
        #[arg(long, allow_hyphen_values = true)]
        value: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        file: Option<String>,
    },
    /// Delete a transaction
    Delete { id: i64 },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let command = match args.command {
        Command::InitConfig => {
            print!("{}", Config::generate_default());
            return Ok(());
        }
        Command::Store(command) => command,
    };

    let config = Config::load_or_default(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();

    log::info!(
        target: "investboard",
        "Config loaded: transactions file={}",
        config.transactions_path().display()
    );

    let source: SourceRef = Arc::new(JsonFileSource::new(config.transactions_path()));
    let rt = Runtime::new()?;
    rt.block_on(run(&config, source, command))
}

async fn run(config: &Config, source: SourceRef, command: StoreCommand) -> Result<()> {
    let mut store = TransactionStore::load_from(source.as_ref()).await?;

    match command {
        StoreCommand::Report { month, json } => {
            let (transactions, ingest) = store.transactions();
            if !ingest.is_clean() {
                log::warn!(target: "investboard", "Ingest report: {:?}", ingest);
            }
            let options = DashboardOptions {
                expense_month: month,
                ..DashboardOptions::from_config(config)
            };
            let report = DashboardReport::build(&transactions, &options);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, &config.currency);
            }
        }
        StoreCommand::List { page, kind, month, min, max, from, to, json } => {
            let form = FilterForm {
                filter_type: kind.unwrap_or_default(),
                filter_month: month.unwrap_or_default(),
                min_value: min.unwrap_or_default(),
                max_value: max.unwrap_or_default(),
                start_date: from.unwrap_or_default(),
                end_date: to.unwrap_or_default(),
            };
            let filter = TransactionFilter::from_form(&form)?;
            let (transactions, _) = store.transactions();
            let options = DashboardOptions::from_config(config);
            let view = TransactionListView::build(&transactions, &filter, options.paginator, page);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_list(&view, &config.currency);
            }
        }
        StoreCommand::Add { kind, value, date, category, file } => {
            let new = NewTransaction {
                kind,
                value: parse_amount(&value)?,
                date: parse_date(&date)?,
                category,
                file,
            };
            let created = store.create(new)?.clone();
            store.save_to(source.as_ref()).await?;
            print_record("Added", &created, &config.currency);
        }
        StoreCommand::Update { id, kind, value, date, category, file } => {
            let patch = TransactionPatch {
                kind,
                value: value.as_deref().map(parse_amount).transpose()?,
                date: date.as_deref().map(parse_date).transpose()?,
                category: category.as_deref().map(parse_category).transpose()?,
                file,
            };
            if patch.is_empty() {
                return Err(anyhow!("Nothing to update for transaction {}", id));
            }
            let updated = store.update(id, &patch)?.clone();
            store.save_to(source.as_ref()).await?;
            print_record("Updated", &updated, &config.currency);
        }
        StoreCommand::Delete { id } => {
            let removed = store.remove(id)?;
            store.save_to(source.as_ref()).await?;
            print_record("Deleted", &removed, &config.currency);
        }
    }

    Ok(())
}

/// Blank clears the category
fn parse_category(label: &str) -> Result<Option<Category>> {
    if label.trim().is_empty() {
        return Ok(None);
    }
    label.parse::<Category>().map(Some).map_err(|e| anyhow!(e))
}

fn print_record(action: &str, record: &RawTransaction, currency: &CurrencyConfig) {
    println!(
        "{} #{}: {} {} {} {}",
        action,
        record.id,
        record.kind,
        format_currency(record.value, currency),
        record.date,
        record.category.as_deref().unwrap_or("-"),
    );
}

fn print_breakdown(title: &str, entries: &[CategoryBreakdown], currency: &CurrencyConfig) {
    println!("{}", title);
    if entries.is_empty() {
        println!("  (sem dados)");
    }
    for entry in entries {
        println!(
            "  {:<20} {:>16} {:>8}",
            entry.category.label(),
            format_currency(entry.amount, currency),
            format_percentage(entry.percentage, currency),
        );
    }
}

fn print_report(report: &DashboardReport, currency: &CurrencyConfig) {
    let summary = &report.summary;
    println!("Saldo: {}", format_currency(report.balance, currency));
    println!("Total investido: {}", format_currency(summary.total_invested, currency));
    println!("  Renda Fixa:       {}", format_currency(summary.fixed_income, currency));
    println!("  Renda Variável:   {}", format_currency(summary.variable_income, currency));
    println!("  Não categorizado: {}", format_currency(summary.uncategorized_remainder, currency));
    if let Some(top) = summary.top_category {
        println!("  Maior categoria:  {}", top);
    }
    for warning in &report.warnings {
        match warning {
            DataQualityWarning::NegativeRemainder { .. } => {
                println!("  Atenção: categorias somam mais que o total investido")
            }
            DataQualityWarning::Overflow { field } => {
                println!("  Atenção: {} excede o limite e foi truncado", field)
            }
        }
    }
    println!();

    print_breakdown("Investimentos por categoria", &report.investment_categories, currency);
    println!();

    println!("Por tipo");
    for total in &report.type_totals {
        println!(
            "  {:<20} {:>16} {:>8}",
            total.kind.label(),
            format_currency(total.total, currency),
            format_percentage(total.percentage, currency),
        );
    }
    println!();

    let expense_title = match report.expense_month {
        Some(month) => format!("Despesas por categoria ({})", month.name()),
        None => "Despesas por categoria".to_string(),
    };
    print_breakdown(&expense_title, &report.expense_categories, currency);
    println!();

    println!("Evolução mensal");
    for point in &report.trend {
        println!(
            "  {}  entradas {:>16}  saídas {:>16}",
            point.label(),
            format_currency(point.inflow_total, currency),
            format_currency(point.outflow_total, currency),
        );
    }
}

fn print_list(view: &TransactionListView, currency: &CurrencyConfig) {
    if view.active_filters > 0 {
        println!("{} filtro(s) ativo(s)", view.active_filters);
    }
    if view.is_empty() {
        println!("Nenhuma transação encontrada");
    }
    for group in &view.groups {
        println!("{}", group.name);
        for tx in &group.transactions {
            let date = tx.date.map(format_date).unwrap_or_else(|| tx.raw_date.clone());
            println!(
                "  #{:<6} {:<10} {:<8} {:>16}  {}",
                tx.id,
                date,
                tx.kind.label(),
                format_currency(tx.value, currency),
                tx.category.as_ref().map(|c| c.label()).unwrap_or("-"),
            );
        }
    }
    println!(
        "Página {} de {} ({} transações)",
        view.page, view.total_pages, view.total_items
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use investboard_store::TransactionSource;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn temp_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.data.path = dir.path().to_path_buf();
        config
    }

    #[test]
    fn test_init_config_needs_no_store() {
        let args = Args::try_parse_from(["investboard", "init-config"]).unwrap();
        assert_eq!(args.command, Command::InitConfig);
    }

    #[test]
    fn test_store_subcommands_parse() {
        let args = Args::try_parse_from(["investboard", "delete", "7"]).unwrap();
        assert_eq!(args.command, Command::Store(StoreCommand::Delete { id: 7 }));

        let args = Args::try_parse_from(["investboard", "report", "--month", "3", "--json"]).unwrap();
        assert_eq!(
            args.command,
            Command::Store(StoreCommand::Report { month: MonthKey::new(3), json: true })
        );
        assert!(Args::try_parse_from(["investboard", "report", "--month", "13"]).is_err());
    }

    #[tokio::test]
    async fn test_add_update_delete_through_source() {
        let dir = TempDir::new().unwrap();
        let config = temp_config(&dir);
        let source: SourceRef = Arc::new(JsonFileSource::new(config.transactions_path()));

        let add = Args::try_parse_from([
            "investboard", "add", "--type", "Saída", "--value", "-50", "--date", "15/03/2024",
            "--category", "Alimentação",
        ])
        .unwrap();
        let Command::Store(add) = add.command else { panic!("add is a store command") };
        run(&config, source.clone(), add).await.unwrap();

        let update = StoreCommand::Update {
            id: 1,
            kind: None,
            value: Some("-75".to_string()),
            date: None,
            category: Some(String::new()),
            file: None,
        };
        run(&config, source.clone(), update).await.unwrap();

        let records = source.load().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, Decimal::from(-75));
        assert_eq!(records[0].category.as_deref(), Some(""));

        run(&config, source.clone(), StoreCommand::Delete { id: 1 }).await.unwrap();
        assert!(source.load().await.unwrap().is_empty());
        assert!(run(&config, source, StoreCommand::Delete { id: 1 }).await.is_err());
    }
}
