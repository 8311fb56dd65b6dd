//! Command-line inspection of the school database.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use school_registry::db::open_read_only;
use school_registry::reports::{self, QueryResult, Report};
use sqlx::SqlitePool;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Inspect and query the school management database (opened read-only)
#[derive(Parser, Debug)]
#[command(name = "school-db")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// SQLite database file
    #[arg(long, short = 'd', env = "DATABASE_PATH", default_value = "school.db", global = true)]
    database: String,

    /// Print results as CSV instead of a text table
    #[arg(long, global = true)]
    csv: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tables
    Tables,
    /// Show every table with its columns and rows
    View,
    /// Run a read-only SQL statement
    Query {
        /// SQL text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        sql: Vec<String>,
    },
    /// Run a canned report, or `all_data` for every table
    Report {
        /// Report name (see `school-db reports`)
        name: String,
    },
    /// List canned reports
    Reports,
    /// Interactive prompt accepting SQL and report names
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let pool = open_read_only(&cli.output.database)
        .await
        .with_context(|| format!("failed to open {}", cli.output.database))?;

    match cli.command {
        Command::Tables => {
            for table in reports::list_tables(&pool).await? {
                println!("{}", table);
            }
        }
        Command::View => view(&pool, cli.output.csv).await?,
        Command::Query { sql } => {
            let sql = sql.join(" ");
            let result = reports::run_query(&pool, &sql).await?;
            print_result(&result, cli.output.csv)?;
        }
        Command::Report { name } => run_named(&pool, &name, cli.output.csv).await?,
        Command::Reports => print_reports(),
        Command::Shell => shell(&pool, cli.output.csv).await?,
    }

    Ok(())
}

async fn view(pool: &SqlitePool, csv: bool) -> anyhow::Result<()> {
    let tables = reports::list_tables(pool).await?;
    println!("{} table(s): {}", tables.len(), tables.join(", "));

    for table in &tables {
        println!("\n== {} ==", table.to_uppercase());
        for column in reports::describe_table(pool, table).await? {
            let mut flags = Vec::new();
            if column.primary_key {
                flags.push("primary key");
            }
            if column.not_null {
                flags.push("not null");
            }
            if flags.is_empty() {
                println!("  {} {}", column.name, column.declared_type);
            } else {
                println!("  {} {} ({})", column.name, column.declared_type, flags.join(", "));
            }
        }
        println!();
        print_result(&reports::dump_table(pool, table).await?, csv)?;
    }
    Ok(())
}

async fn run_named(pool: &SqlitePool, name: &str, csv: bool) -> anyhow::Result<()> {
    if name.trim().eq_ignore_ascii_case("all_data") {
        for table in reports::list_tables(pool).await? {
            println!("== {} ==", table.to_uppercase());
            print_result(&reports::dump_table(pool, &table).await?, csv)?;
        }
        return Ok(());
    }

    let report: Report = name.parse()?;
    print_result(&report.run(pool).await?, csv)
}

async fn shell(pool: &SqlitePool, csv: bool) -> anyhow::Result<()> {
    println!("School database shell. Type `help` for reports, `exit` to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("SQL> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        match input.to_ascii_lowercase().as_str() {
            "" => continue,
            "exit" | "quit" => break,
            "help" => print_reports(),
            lowered => {
                let outcome = if lowered == "all_data" || lowered.parse::<Report>().is_ok() {
                    run_named(pool, lowered, csv).await
                } else {
                    match reports::run_query(pool, input).await {
                        Ok(result) => print_result(&result, csv),
                        Err(e) => Err(e.into()),
                    }
                };
                // Errors are shown and the prompt continues.
                if let Err(e) = outcome {
                    eprintln!("Error: {}", e);
                }
            }
        }
    }
    Ok(())
}

fn print_reports() {
    println!("Reports:");
    for report in Report::ALL {
        println!("  {:<22} {}", report.name(), report.description());
    }
    println!("  {:<22} Every row of every table", "all_data");
}

fn print_result(result: &QueryResult, csv: bool) -> anyhow::Result<()> {
    if csv {
        result.write_csv(std::io::stdout().lock())?;
    } else {
        print!("{}", result.render_table());
    }
    Ok(())
}
