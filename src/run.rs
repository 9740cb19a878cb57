use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::db::Database;
use crate::models::Transaction;
use crate::util::{format_amount, truncate};
use crate::{aggregate, limits};

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    match args[1].as_str() {
        "add" => cli_add(&args[2..], db),
        "list" | "ls" => cli_list(&args[2..], db),
        "show" => cli_show(&args[2..], db),
        "edit" => cli_edit(&args[2..], db),
        "delete" | "rm" => cli_delete(&args[2..], db),
        "summary" | "s" => cli_summary(&args[2..], db),
        "limit" => cli_limit(&args[2..], db),
        "alerts" => cli_alerts(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendlog {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

/// Default action with no arguments: current month at a glance.
pub(crate) fn default_summary(db: &mut Database) -> Result<()> {
    cli_summary(&[], db)
}

fn print_usage() {
    println!("spendlog — local-only personal spending tracker");
    println!();
    println!("Usage: spendlog [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Current month summary");
    println!("  add <amount> <description>    Record a transaction (negative = expense)");
    println!("    --date <YYYY-MM-DD>         Date (default: today)");
    println!("    --category <name>           Free-text category");
    println!("    --at <lat>,<lon>            Where it happened");
    println!("  list                          List transactions");
    println!("    --month <YYYY-MM>           Only this month");
    println!("    --search <text>             Filter by description/category");
    println!("    --limit <n>                 At most n rows (default: 50)");
    println!("  show <id>                     Full details of one transaction");
    println!("  edit <id>                     Change fields of a transaction");
    println!("    --amount <n> --description <text> --category <name> --date <YYYY-MM-DD>");
    println!("  delete <id>                   Remove a transaction");
    println!("  summary [YYYY-MM]             Monthly income/expense totals and limit status");
    println!("  limit                         Show the monthly spending limit");
    println!("  limit set <amount>            Set the limit (overwrites)");
    println!("  limit clear                   Remove the limit");
    println!("  alerts                        List limit alerts (marks them seen)");
    println!("  alerts --clear                Delete all alerts");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

// ── Flag parsing helpers ─────────────────────────────────────

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn parse_amount(raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw).map_err(|_| anyhow::anyhow!("Invalid amount: {raw}"))
}

fn parse_date(raw: &str) -> Result<String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| anyhow::anyhow!("Invalid date (expected YYYY-MM-DD): {raw}"))
}

fn parse_coords(raw: &str) -> Result<(f64, f64)> {
    let mut parts = raw.splitn(2, ',');
    let lat = parts.next().unwrap_or("").trim();
    let lon = parts.next().unwrap_or("").trim();
    let lat: f64 = lat
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid latitude: {lat}"))?;
    let lon: f64 = lon
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid longitude: {lon}"))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        anyhow::bail!("Coordinates out of range: {raw}");
    }
    Ok((lat, lon))
}

fn parse_id(args: &[String]) -> Result<i64> {
    let raw = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Missing transaction id"))?;
    raw.parse()
        .map_err(|_| anyhow::anyhow!("Invalid transaction id: {raw}"))
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Re-evaluate the limit after a mutation and surface a fresh breach.
fn report_limit(db: &Database) -> Result<()> {
    let (_, alert) = limits::refresh(db, today())?;
    if let Some(alert) = alert {
        println!("{}: {}", alert.title, alert.message);
    }
    Ok(())
}

// ── Commands ─────────────────────────────────────────────────

fn cli_add(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!(
            "Usage: spendlog add <amount> <description> [--date <YYYY-MM-DD>] [--category <name>] [--at <lat>,<lon>]"
        );
    }

    let amount = parse_amount(&args[0])?;
    let description = args[1].clone();
    let date = match flag_value(args, "--date") {
        Some(raw) => parse_date(raw)?,
        None => today().format("%Y-%m-%d").to_string(),
    };

    let mut txn = Transaction::new(amount, description, date);
    if let Some(category) = flag_value(args, "--category") {
        txn.category = category.to_string();
    }
    if let Some(raw) = flag_value(args, "--at") {
        let (lat, lon) = parse_coords(raw)?;
        txn.latitude = Some(lat);
        txn.longitude = Some(lon);
    }

    let id = db.insert_transaction(&txn)?;
    println!(
        "Added transaction #{id}: {} {}",
        format_amount(txn.amount),
        txn.description
    );
    report_limit(db)
}

fn cli_list(args: &[String], db: &mut Database) -> Result<()> {
    let month = flag_value(args, "--month");
    let search = flag_value(args, "--search");
    let limit: u32 = match flag_value(args, "--limit") {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid --limit: {raw}"))?,
        None => 50,
    };

    let txns = db.get_transactions(Some(limit), None, search, month)?;
    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!(
        "{:<6} {:<12} {:>14} {:<16} {:<30} Loc",
        "ID", "Date", "Amount", "Category", "Description"
    );
    println!("{}", "─".repeat(86));
    for txn in &txns {
        println!(
            "{:<6} {:<12} {:>14} {:<16} {:<30} {}",
            txn.id.unwrap_or(0),
            txn.date,
            format_amount(txn.amount),
            truncate(&txn.category, 16),
            truncate(&txn.description, 30),
            if txn.has_location() { "*" } else { "" },
        );
    }
    Ok(())
}

fn cli_show(args: &[String], db: &mut Database) -> Result<()> {
    let id = parse_id(args)?;
    let txn = db
        .get_transaction_by_id(id)?
        .ok_or_else(|| anyhow::anyhow!("Transaction #{id} not found"))?;

    println!("Transaction #{id}");
    println!("  Amount:      {}", format_amount(txn.amount));
    println!("  Description: {}", txn.description);
    if !txn.category.is_empty() {
        println!("  Category:    {}", txn.category);
    }
    println!("  Date:        {}", txn.date);
    if let Some(loc) = txn.location_display() {
        println!("  Location:    {loc}");
    }
    println!("  Recorded:    {}", txn.created_at);
    Ok(())
}

fn cli_edit(args: &[String], db: &mut Database) -> Result<()> {
    let id = parse_id(args)?;
    let mut txn = db
        .get_transaction_by_id(id)?
        .ok_or_else(|| anyhow::anyhow!("Transaction #{id} not found"))?;

    let mut changed = false;
    if let Some(raw) = flag_value(args, "--amount") {
        txn.amount = parse_amount(raw)?;
        changed = true;
    }
    if let Some(description) = flag_value(args, "--description") {
        txn.description = description.to_string();
        changed = true;
    }
    if let Some(category) = flag_value(args, "--category") {
        txn.category = category.to_string();
        changed = true;
    }
    if let Some(raw) = flag_value(args, "--date") {
        txn.date = parse_date(raw)?;
        changed = true;
    }
    if let Some(raw) = flag_value(args, "--at") {
        let (lat, lon) = parse_coords(raw)?;
        txn.latitude = Some(lat);
        txn.longitude = Some(lon);
        changed = true;
    }

    if !changed {
        anyhow::bail!(
            "Nothing to change. Use --amount, --description, --category, --date or --at"
        );
    }

    db.update_transaction(id, &txn)?;
    println!("Updated transaction #{id}");
    report_limit(db)
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    let id = parse_id(args)?;
    let txn = db
        .get_transaction_by_id(id)?
        .ok_or_else(|| anyhow::anyhow!("Transaction #{id} not found"))?;

    db.delete_transaction(id)?;
    println!("Deleted transaction #{id}: {}", txn.description);
    report_limit(db)
}

fn cli_summary(args: &[String], db: &mut Database) -> Result<()> {
    let now = match args.first().filter(|a| !a.starts_with('-')) {
        Some(raw) => NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
            .map_err(|_| anyhow::anyhow!("Invalid month (expected YYYY-MM): {raw}"))?,
        None => today(),
    };
    let month = now.format("%Y-%m").to_string();

    let txns = db.get_all_transactions()?;
    let (income, expenses) = aggregate::monthly_breakdown(&txns, now);
    let total = aggregate::monthly_total(&txns, now);
    let limit = db.get_spending_limit()?;

    println!("spendlog — {month}");
    println!("{}", "─".repeat(40));
    println!("  Income:     {}", format_amount(income));
    println!("  Expenses:   {}", format_amount(expenses));
    println!("  Net:        {}", format_amount(income - expenses));
    println!("  Activity:   {}", format_amount(total));
    match limit {
        Some(limit) => {
            println!("  Limit:      {}", format_amount(limit));
            if aggregate::is_over_limit(total, Some(limit)) {
                println!("  Status:     OVER LIMIT by {}", format_amount(total - limit));
            } else {
                println!("  Status:     {} remaining", format_amount(limit - total));
            }
        }
        None => println!("  Limit:      not set"),
    }
    Ok(())
}

fn cli_limit(args: &[String], db: &mut Database) -> Result<()> {
    match args.first().map(String::as_str) {
        None => {
            match db.get_spending_limit()? {
                Some(limit) => println!("Monthly spending limit: {}", format_amount(limit)),
                None => println!("No spending limit set"),
            }
            let (status, _) = limits::refresh(db, today())?;
            println!("This month's activity:  {}", format_amount(status.total));
            if status.over {
                println!("Status: over limit");
            }
            Ok(())
        }
        Some("set") => {
            let raw = args
                .get(1)
                .ok_or_else(|| anyhow::anyhow!("Usage: spendlog limit set <amount>"))?;
            let limit = parse_amount(raw)?;
            if limit <= Decimal::ZERO {
                anyhow::bail!("Limit must be positive (use 'limit clear' to remove it)");
            }
            db.set_spending_limit(limit)?;
            println!("Spending limit set to {}", format_amount(limit));
            report_limit(db)
        }
        Some("clear") => {
            db.clear_spending_limit()?;
            println!("Spending limit cleared");
            report_limit(db)
        }
        Some(other) => anyhow::bail!("Unknown limit subcommand: {other}"),
    }
}

fn cli_alerts(args: &[String], db: &mut Database) -> Result<()> {
    if args.first().map(String::as_str) == Some("--clear") {
        let removed = db.clear_alerts()?;
        println!("Cleared {removed} alert(s)");
        return Ok(());
    }

    let alerts = db.get_alerts()?;
    if alerts.is_empty() {
        println!("No alerts");
        return Ok(());
    }

    for alert in &alerts {
        let marker = if alert.seen { " " } else { "•" };
        println!("{marker} [{}] {}", alert.created_at, alert.title);
        println!("    {}", alert.message);
    }
    db.mark_alerts_seen()?;
    Ok(())
}
