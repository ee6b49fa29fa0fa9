use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

pub mod runner;

#[derive(Parser)]
#[command(name = "fiitrack")]
#[command(version, about = "FII portfolio dashboard with income projections")]
#[command(
    long_about = "Track a portfolio of Brazilian real-estate funds (FIIs) with cached market data, estimated passive income, and long-term projections toward a financial-independence target."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse the cached FII universe
    Explore {
        /// Filter by ticker or name substring
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Refresh cached price and dividend-yield data for universe entries
    Refresh {
        /// Only refresh entries matching this ticker or name substring
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Rebuild the universe ticker list from the Brapi listing (or the known-tickers fallback)
    Bootstrap,

    /// Portfolio management and viewing
    Portfolio {
        #[command(subcommand)]
        action: PortfolioCommands,
    },

    /// Project wealth and income toward a passive-income target
    Project {
        /// Monthly contribution (R$)
        #[arg(long, default_value_t = 1000.0)]
        contribution: f64,

        /// Target passive monthly income for independence (R$)
        #[arg(long, default_value_t = 5000.0)]
        target: f64,

        /// Expected yearly appreciation (%)
        #[arg(long = "annual-return", default_value_t = 6.0)]
        annual_return: f64,

        /// Expected yearly dividend growth (%)
        #[arg(long = "dividend-growth", default_value_t = 2.0)]
        dividend_growth: f64,

        /// Yearly contribution growth (%)
        #[arg(long = "contribution-growth", default_value_t = 0.0)]
        contribution_growth: f64,

        /// Simulation horizon in years
        #[arg(long, default_value_t = 30)]
        years: u32,
    },
}

#[derive(Subcommand)]
pub enum PortfolioCommands {
    /// Show positions with current metrics and totals
    Show,

    /// Buy quotas of a fund
    Buy {
        /// Ticker (e.g. HGLG11)
        ticker: String,

        /// Number of quotas
        quantity: i64,

        /// Execution price per quota (R$)
        price: Decimal,
    },

    /// Sell quotas of a fund
    Sell {
        /// Ticker (e.g. HGLG11)
        ticker: String,

        /// Number of quotas
        quantity: i64,

        /// Execution price per quota (R$)
        price: Decimal,
    },
}
