use std::path::{Path, PathBuf};

use alloy::primitives::{Address, U256};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, Context, Result};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use izi_math::fee::{fee_from_net_amount_and_tier, lp_fee_from_gross_trade_amount};
use izi_math::liquidity::{liquidity_to_x_q96, liquidity_to_y_q96};
use izi_math::quote::cost_y_from_x_q96;
use izi_math::{
    ChargePercent, ExactDecimal, FeeTier, MathConfig, PriceGrid, Range, Rounding, SqrtPriceQ96,
};
use izi_pool::{LimitOrderAccessor, RpcPoolReader};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "izi-math")]
#[command(about = "Exact point-grid AMM arithmetic: fees, ranges, conversions and quotes")]
#[command(version)]
struct Cli {
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// JSON file with `rate` and `precision` overrides.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fee owed on a net amount at a fee tier, and its split.
    Fee(FeeArgs),
    /// Fee contained in a gross trade amount (fixed 3/997), and its split.
    GrossFee(GrossFeeArgs),
    /// Token amount held by constant liquidity over `[pl, pr)`.
    Range(RangeArgs),
    /// Token amounts for every range in a JSON file.
    Batch(BatchArgs),
    /// Token X and Y for liquidity at an on-chain sqrtPriceX96.
    Convert(ConvertArgs),
    /// Swap quote: how much X a Y budget buys at one point.
    Quote(QuoteArgs),
    /// Y cost of acquiring X at an on-chain sqrtPriceX96.
    CostY(CostYArgs),
    /// Read the limit-order book at one point of a deployed pool.
    LimitOrder(LimitOrderArgs),
}

#[derive(Args, Debug)]
struct FeeArgs {
    #[arg(long)]
    amount: ExactDecimal,

    /// Fee tier in parts per million (3000 = 0.3%).
    #[arg(long)]
    fee_tier: u32,

    #[arg(long, default_value_t = 50)]
    charge_percent: u32,
}

#[derive(Args, Debug)]
struct GrossFeeArgs {
    #[arg(long)]
    amount: ExactDecimal,

    #[arg(long, default_value_t = 50)]
    charge_percent: u32,
}

#[derive(Args, Debug)]
struct RangeArgs {
    #[arg(long)]
    liquidity: ExactDecimal,

    #[arg(long, allow_hyphen_values = true)]
    pl: i32,

    #[arg(long, allow_hyphen_values = true)]
    pr: i32,

    #[arg(long, value_enum)]
    token: TokenArg,

    #[arg(long, value_enum)]
    round: RoundArg,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// JSON array of `{ "liquidity": "..", "pl": .., "pr": .. }`.
    #[arg(long)]
    ranges: PathBuf,

    #[arg(long, value_enum)]
    token: TokenArg,

    #[arg(long, value_enum)]
    round: RoundArg,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    #[arg(long)]
    liquidity: ExactDecimal,

    /// Decimal or 0x-prefixed hex.
    #[arg(long)]
    sqrt_price_q96: ExactDecimal,

    #[arg(long, value_enum)]
    round: RoundArg,
}

#[derive(Args, Debug)]
struct QuoteArgs {
    #[arg(long, allow_hyphen_values = true)]
    point: i32,

    #[arg(long)]
    desired_y: ExactDecimal,
}

#[derive(Args, Debug)]
struct CostYArgs {
    #[arg(long)]
    sqrt_price_q96: ExactDecimal,

    #[arg(long)]
    acquired_x: ExactDecimal,
}

#[derive(Args, Debug)]
struct LimitOrderArgs {
    #[arg(long)]
    pool: Address,

    #[arg(long, allow_hyphen_values = true)]
    point: i32,

    /// Historical block; latest when omitted.
    #[arg(long)]
    block: Option<u64>,

    /// Overrides `IZI_RPC_URL`.
    #[arg(long)]
    rpc_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TokenArg {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RoundArg {
    Up,
    Down,
}

impl From<RoundArg> for Rounding {
    fn from(value: RoundArg) -> Self {
        match value {
            RoundArg::Up => Rounding::Up,
            RoundArg::Down => Rounding::Down,
        }
    }
}

/// One command's result: table rows plus the same data as JSON.
#[derive(Debug)]
struct Report {
    title: String,
    rows: Vec<(String, String)>,
    json: serde_json::Value,
}

impl Report {
    fn new(title: impl Into<String>, value: &impl Serialize) -> Result<Self> {
        Ok(Self {
            title: title.into(),
            rows: Vec::new(),
            json: serde_json::to_value(value).wrap_err("failed to serialize result")?,
        })
    }

    fn row(mut self, label: impl Into<String>, value: impl ToString) -> Self {
        self.rows.push((label.into(), value.to_string()));
        self
    }

    fn print(&self, output: OutputFormat) -> Result<()> {
        match output {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&self.json)
                    .wrap_err("failed to serialize results to JSON")?;
                println!("{json}");
            }
            OutputFormat::Table => {
                let mut table = Table::new();
                table.load_preset(UTF8_BORDERS_ONLY);
                table.set_header(vec![self.title.as_str(), "Value"]);
                for (label, value) in &self.rows {
                    table.add_row(vec![label.as_str(), value.as_str()]);
                }
                println!("\n{table}\n");
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet)?;

    let config = load_config(cli.config.as_deref())?;
    let grid = config.grid().wrap_err("invalid price grid configuration")?;

    let report = match cli.command {
        Commands::Fee(args) => handle_fee(args)?,
        Commands::GrossFee(args) => handle_gross_fee(args)?,
        Commands::Range(args) => handle_range(&grid, args)?,
        Commands::Batch(args) => handle_batch(&grid, args)?,
        Commands::Convert(args) => handle_convert(args)?,
        Commands::Quote(args) => handle_quote(&grid, args)?,
        Commands::CostY(args) => handle_cost_y(args)?,
        Commands::LimitOrder(args) => handle_limit_order(args).await?,
    };
    report.print(cli.output)
}

fn init_tracing(verbose: u8, quiet: bool) -> Result<()> {
    let level = if quiet {
        Level::WARN
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.as_str()))
        .wrap_err("failed to initialize tracing filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<MathConfig> {
    let Some(path) = path else {
        return Ok(MathConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    let config: MathConfig = serde_json::from_str(&content)
        .wrap_err_with(|| format!("failed to parse config {}", path.display()))?;
    info!(rate = %config.rate, precision = config.precision, "loaded math config");
    Ok(config)
}

fn sqrt_price_q96(value: &ExactDecimal) -> Result<SqrtPriceQ96> {
    let raw: U256 = value.to_u256().ok_or_else(|| {
        eyre!("sqrt-price-q96 must be a non-negative integer below 2^256, got {value}")
    })?;
    Ok(SqrtPriceQ96::new(raw))
}

fn handle_fee(args: FeeArgs) -> Result<Report> {
    let tier = FeeTier::new(args.fee_tier)?;
    let charge = ChargePercent::new(args.charge_percent)?;
    let split = fee_from_net_amount_and_tier(&args.amount, tier, charge)
        .wrap_err("failed to compute fee")?;
    Ok(Report::new("Fee", &split)?
        .row("Net amount", &args.amount)
        .row("Fee tier (ppm)", tier.ppm())
        .row("Fee", &split.fee)
        .row("LP earned", &split.lp_earned)
        .row("Charged", &split.charged))
}

fn handle_gross_fee(args: GrossFeeArgs) -> Result<Report> {
    let charge = ChargePercent::new(args.charge_percent)?;
    let split =
        lp_fee_from_gross_trade_amount(&args.amount, charge).wrap_err("failed to compute fee")?;
    Ok(Report::new("Gross fee", &split)?
        .row("Gross amount", &args.amount)
        .row("Fee", &split.fee)
        .row("LP earned", &split.lp_earned)
        .row("Charged", &split.charged))
}

fn range_amount(
    grid: &PriceGrid,
    range: &Range,
    token: TokenArg,
    round: Rounding,
) -> Result<ExactDecimal> {
    let amount = match token {
        TokenArg::X => grid.token_x_in_range(&range.liquidity, range.pl, range.pr, round),
        TokenArg::Y => grid.token_y_in_range(&range.liquidity, range.pl, range.pr, round),
    };
    amount.wrap_err_with(|| format!("failed to aggregate range [{}, {})", range.pl, range.pr))
}

fn token_label(token: TokenArg) -> &'static str {
    match token {
        TokenArg::X => "Token X",
        TokenArg::Y => "Token Y",
    }
}

fn handle_range(grid: &PriceGrid, args: RangeArgs) -> Result<Report> {
    let range = Range::new(args.liquidity, args.pl, args.pr);
    let amount = range_amount(grid, &range, args.token, args.round.into())?;
    let json = serde_json::json!({ "range": &range, "amount": &amount });
    Ok(Report::new("Range", &json)?
        .row("Liquidity", &range.liquidity)
        .row("Points", format!("[{}, {})", range.pl, range.pr))
        .row(token_label(args.token), &amount))
}

fn handle_batch(grid: &PriceGrid, args: BatchArgs) -> Result<Report> {
    let content = std::fs::read_to_string(&args.ranges)
        .wrap_err_with(|| format!("failed to read {}", args.ranges.display()))?;
    let ranges: Vec<Range> = serde_json::from_str(&content)
        .wrap_err_with(|| format!("failed to parse ranges from {}", args.ranges.display()))?;

    let round = Rounding::from(args.round);
    let results = match args.token {
        TokenArg::X => grid.batch_token_x_in_ranges(&ranges, round).collect::<Vec<_>>(),
        TokenArg::Y => grid.batch_token_y_in_ranges(&ranges, round).collect::<Vec<_>>(),
    };
    let amounts = ranges
        .iter()
        .zip(results)
        .map(|(range, result)| {
            result.wrap_err_with(|| {
                format!("failed to aggregate range [{}, {})", range.pl, range.pr)
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let total = amounts.iter().cloned().sum::<ExactDecimal>();
    info!(ranges = ranges.len(), %total, "batch completed");

    let json = serde_json::json!({ "amounts": &amounts, "total": &total });
    let mut report = Report::new(format!("Batch ({})", token_label(args.token)), &json)?;
    for (range, amount) in ranges.iter().zip(&amounts) {
        report = report.row(format!("[{}, {}) L={}", range.pl, range.pr, range.liquidity), amount);
    }
    Ok(report.row("Total", &total))
}

#[derive(Debug, Serialize)]
struct Conversion {
    amount_x: ExactDecimal,
    amount_y: ExactDecimal,
}

fn handle_convert(args: ConvertArgs) -> Result<Report> {
    let sqrt_price = sqrt_price_q96(&args.sqrt_price_q96)?;
    let round = Rounding::from(args.round);
    let conversion = Conversion {
        amount_x: liquidity_to_x_q96(&args.liquidity, sqrt_price, round)
            .wrap_err("failed to convert liquidity to token X")?,
        amount_y: liquidity_to_y_q96(&args.liquidity, sqrt_price, round)
            .wrap_err("failed to convert liquidity to token Y")?,
    };
    Ok(Report::new("Convert", &conversion)?
        .row("Liquidity", &args.liquidity)
        .row("Token X", &conversion.amount_x)
        .row("Token Y", &conversion.amount_y))
}

fn handle_quote(grid: &PriceGrid, args: QuoteArgs) -> Result<Report> {
    let quote = grid
        .quote_from_desired_y(args.point, &args.desired_y)
        .wrap_err_with(|| format!("failed to quote at point {}", args.point))?;
    Ok(Report::new("Quote", &quote)?
        .row("Point", args.point)
        .row("Desired Y", &args.desired_y)
        .row("Acquired X", &quote.acquired_x)
        .row("Cost Y", &quote.cost_y))
}

fn handle_cost_y(args: CostYArgs) -> Result<Report> {
    let sqrt_price = sqrt_price_q96(&args.sqrt_price_q96)?;
    let cost_y =
        cost_y_from_x_q96(sqrt_price, &args.acquired_x).wrap_err("failed to compute Y cost")?;
    let json = serde_json::json!({ "acquired_x": &args.acquired_x, "cost_y": &cost_y });
    Ok(Report::new("Cost", &json)?
        .row("Acquired X", &args.acquired_x)
        .row("Cost Y", &cost_y))
}

async fn handle_limit_order(args: LimitOrderArgs) -> Result<Report> {
    let rpc_url = args
        .rpc_url
        .or_else(|| std::env::var("IZI_RPC_URL").ok())
        .ok_or_else(|| eyre!("IZI_RPC_URL is required for limit-order command"))?;

    let mut reader = RpcPoolReader::new(rpc_url, args.pool);
    if let Some(block) = args.block {
        reader = reader.at_block(block);
    }
    let accessor = LimitOrderAccessor::new(reader);
    let state = accessor
        .limit_order(args.point)
        .await
        .wrap_err_with(|| format!("failed to read limit order at point {}", args.point))?;

    info!(pool = %args.pool, point = args.point, "limit-order command finished");
    Ok(Report::new("Limit order", &state)?
        .row("Point", args.point)
        .row("Selling X", &state.selling_x)
        .row("Acc earn X", &state.acc_earn_x)
        .row("Selling Y", &state.selling_y)
        .row("Acc earn Y", &state.acc_earn_y)
        .row("Earn X", &state.earn_x)
        .row("Earn Y", &state.earn_y))
}
