use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rfm_dashboard::{
    build_report, classify_class, load_config, Config, DataQualityEngine, RfmClass, Transaction,
    TransactionLoader,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Customer segmentation analytics (RFM) over a transaction table
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./rfm-dashboard.toml, then built-in settings)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every dashboard section for a transaction file
    Report {
        input: PathBuf,

        /// Emit the full report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Score customers and write the segmentation table
    Segment {
        input: PathBuf,

        /// CSV destination (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Resolve a 3-digit RFM class such as 231 to its profile
    Classify { code: String },
    /// List data quality issues without computing the analytics
    Quality { input: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Report { input, json } => run_report(&config, &input, json),
        Command::Segment { input, output } => run_segment(&config, &input, output.as_deref()),
        Command::Classify { code } => run_classify(&code),
        Command::Quality { input } => run_quality(&config, &input),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();
}

fn load(config: &Config, input: &Path) -> Result<Vec<Transaction>> {
    TransactionLoader::new()
        .with_delimiter(config.delimiter())
        .load_path(input)
        .with_context(|| format!("Failed to load transactions from {}", input.display()))
}

fn run_report(config: &Config, input: &Path, json: bool) -> Result<()> {
    let transactions = load(config, input)?;
    let report = build_report(&transactions, config.analytics.smoothing_window)
        .context("Failed to compute dashboard analytics")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("📂 data");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  # of rows:           {}", report.summary.rows);
    println!("  # of columns:        {}", report.summary.columns);
    println!("  # of missing values: {}", report.summary.missing_values);
    println!("  time period:         {}", report.summary.time_period);

    println!("\n💶 core KPIs");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let kpis = &report.kpis;
    println!("  # unique customers:      {}", kpis.unique_customers);
    println!("  # orders:                {}", kpis.orders);
    println!("  total order value:       {:.2}", kpis.total_order_value);
    println!("  mean order value:        {:.2}", kpis.mean_order_value);
    println!("  order frequency:         {:.2} orders/customer", kpis.order_frequency);
    println!("  customer lifetime value: {:.2}", kpis.customer_lifetime_value);

    println!("\n📈 weekly sales");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for week in &report.weekly_sales {
        println!(
            "  {}  {:>12.2}  (smoothed {:.2})",
            week.week.format("%d/%m/%Y"),
            week.order_value,
            week.order_value_smooth
        );
    }

    println!("\n📊 RFM quantiles");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let t = &report.segmentation.thresholds;
    println!("  {:<14} {:>10} {:>10} {:>10}", "", "0.25", "0.50", "0.75");
    for (name, q) in [
        ("Recency", t.recency),
        ("Frequency", t.frequency),
        ("MonetaryValue", t.monetary_value),
    ] {
        println!("  {:<14} {:>10.2} {:>10.2} {:>10.2}", name, q.p25, q.p50, q.p75);
    }

    println!("\n🏷️  profiles");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for means in &report.profile_means {
        println!(
            "  {:<20} {:>5} customers  R {:>6.0}  F {:>6.0}  M {:>10.0}",
            means.profile.label(),
            means.customers,
            means.mean_recency,
            means.mean_frequency,
            means.mean_monetary_value
        );
    }

    println!("\n🔁 retention");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for point in &report.retention {
        match point.retention_rate {
            Some(rate) => println!(
                "  {}  {:>5} active  {:>5.1}% retained",
                point.month,
                point.active_customers,
                rate * 100.0
            ),
            None => println!("  {}  {:>5} active", point.month, point.active_customers),
        }
    }

    println!("\n💡 insights");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for insight in &report.insights {
        println!("  • {}", insight.message);
    }

    if !report.quality.is_clean() {
        println!("\n⚠️  {}", report.quality.summary());
    }

    Ok(())
}

fn run_segment(config: &Config, input: &Path, output: Option<&Path>) -> Result<()> {
    let transactions = load(config, input)?;
    let segmentation = rfm_dashboard::segment(&transactions).context("Failed to segment customers")?;

    let writer: Box<dyn std::io::Write> = match output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    for customer in &segmentation.customers {
        csv_writer.serialize(customer)?;
    }
    csv_writer.flush()?;

    if let Some(path) = output {
        eprintln!(
            "✓ {} customers written to {}",
            segmentation.customers.len(),
            path.display()
        );
    }

    Ok(())
}

fn run_classify(code: &str) -> Result<()> {
    let class = RfmClass::parse(code)?;
    let result = classify_class(class);

    match result.rule_id {
        Some(rule) => println!("{} → {} (rule {})", class, result.profile, rule),
        None => println!("{} → {} (no rule matched)", class, result.profile),
    }

    Ok(())
}

fn run_quality(config: &Config, input: &Path) -> Result<()> {
    let transactions = load(config, input)?;
    let report = DataQualityEngine::new().validate_batch(&transactions);

    println!("{}", report.summary());
    for issue in &report.issues {
        println!(
            "  [{:?}] {} ({} rows): {}",
            issue.severity,
            issue.rule_name,
            issue.lines.len(),
            issue.issue
        );
    }

    Ok(())
}
