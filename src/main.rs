/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::config::config_file::Config;
use crate::inventory::analytics::DEFAULT_TOP;
use crate::inventory::product::{NewProduct, Pricing};
use crate::inventory::sale::record_sale;
use crate::inventory::weekday::Weekday;
use crate::reports::product_reporter::ProductReporter;
use crate::reports::recovery_reporter::RecoveryReporter;
use crate::reports::style::{title, Style};
use crate::storage::filesystem::Filesystem;
use crate::storage::store::Store;
use crate::util::quant::Quant;
use anyhow::{bail, Context, Error};
use chrono::{Datelike, Local, Utc};
use clap::{Parser, ValueEnum};
use std::str::FromStr;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod inventory;
mod reports;
mod storage;
mod util;

const DEFAULT_OWNER: &str = "default";

#[derive(Parser)]
#[command(
	name = "stockr",
	version = "0.1",
	about = "Inventory and profitability tracker for small sellers"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	/// Product name for add, product id for the other commands
	#[arg(required = false)]
	term: Option<String>,

	// -----------
	// -- FLAGS --
	// -----------
	/// Product store location (default: from config, else the data dir)
	#[arg(short)]
	file: Option<String>,

	/// Custom config file location (default: ~/.config/stockr/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Partition of the store to work in
	#[arg(short, long)]
	owner: Option<String>,

	/// Total amount paid for the lot
	#[arg(short, long)]
	cost: Option<String>,

	/// Units in the lot
	#[arg(short, long)]
	quantity: Option<u64>,

	/// Sale price per unit
	#[arg(short = 's', long = "price")]
	price: Option<String>,

	/// Sale price as a percentage over unit cost
	#[arg(short, long)]
	margin: Option<String>,

	/// Units sold
	#[arg(short, long, default_value_t = 1)]
	amount: u64,

	/// Day of the week the sale happened (default: today)
	#[arg(short, long)]
	day: Option<String>,

	/// How many products each ranking shows
	#[arg(short = 'n', long)]
	top: Option<usize>,

	/// Decimal places to show for amounts
	#[arg(short, long)]
	precision: Option<u32>,

	/// Log what the store is doing to stderr
	#[arg(short, long)]
	verbose: bool,
}

impl Cli {
	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		if let Some(prec) = self.precision {
			if prec > Quant::MAX_PRECISION {
				bail!("Maximum precision is {}", Quant::MAX_PRECISION);
			}
		}

		if self.price.is_some() && self.margin.is_some() {
			bail!("Specify either a sale price or a margin, not both");
		}

		Ok(())
	}

	fn require_term(&self, what: &str) -> Result<&str, Error> {
		match &self.term {
			Some(term) => Ok(term),
			None => bail!("No {} specified", what),
		}
	}
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Directive {
	Add,  // create a product
	Sell, // record a sale
	Rm,   // remove a product

	Ls,   // list products
	Show, // product detail

	Rec,   // recovery of one product or all of them
	Top,   // rankings
	Wk,    // weekly breakdown
	Stats, // sales totals
}

fn main() -> Result<(), Error> {
	let args = Cli::parse();
	args.validate()?;
	init_logging(args.verbose);

	let fs = Filesystem::new();
	let config = fs.get_config(args.config.as_ref())?;
	let path = fs.data_path(args.file.as_ref(), &config)?;
	let owner = args
		.owner
		.as_deref()
		.or(config.owner.as_deref())
		.unwrap_or(DEFAULT_OWNER)
		.to_string();

	debug!(
		command = ?args.command,
		path = %path.display(),
		owner = %owner,
		"starting"
	);

	let mut store = Store::open(fs, path, &owner)?;
	let style = style(&args, &config);

	match args.command {
		Directive::Add => {
			let name = args.require_term("product name")?;
			let draft = NewProduct {
				name: name.to_string(),
				total_cost: parse_quant("cost", args.cost.as_ref())?,
				quantity: args
					.quantity
					.context("No quantity specified (use -q)")?,
				pricing: pricing(&args, &config)?,
			};

			let product = store.insert(draft, Utc::now())?;
			store.save()?;

			let reporter = ProductReporter::new(vec![], style);
			print!("{}", reporter.render_detail(&product));
		},
		Directive::Sell => {
			let id = args.require_term("product id")?;
			let day = match &args.day {
				Some(day) => Weekday::from_str(day)?,
				None => Weekday::from(Local::now().weekday()),
			};

			let product = record_sale(&store.get(id)?, day, args.amount)?;
			store.update(&product)?;
			store.save()?;

			info!(id, amount = args.amount, %day, "sale recorded");
			println!(
				"Sold {} of {} on {}; {} remaining",
				args.amount,
				title(product.name(), product.id()),
				day,
				product.remaining()
			);
		},
		Directive::Rm => {
			let id = args.require_term("product id")?;
			let product = store.remove(id)?;
			store.save()?;

			println!("Removed {}", title(product.name(), product.id()));
		},
		Directive::Ls => {
			let reporter = ProductReporter::new(store.products()?, style);
			print!("{}", reporter.render_list());
		},
		Directive::Show => {
			let product = store.get(args.require_term("product id")?)?;
			let reporter = ProductReporter::new(vec![], style);
			print!("{}", reporter.render_detail(&product));
		},
		Directive::Rec => match &args.term {
			Some(id) => {
				let product = store.get(id)?;
				let reporter = RecoveryReporter::new(vec![], style);
				print!("{}", reporter.render_product(&product));
			},
			None => {
				let reporter = RecoveryReporter::new(store.products()?, style);
				print!("{}", reporter.render_portfolio());
			},
		},
		Directive::Top => {
			let n = args.top.or(config.top()).unwrap_or(DEFAULT_TOP);
			let reporter = ProductReporter::new(store.products()?, style);
			print!("{}", reporter.render_rankings(n));
		},
		Directive::Wk => {
			let product = store.get(args.require_term("product id")?)?;
			let reporter = ProductReporter::new(vec![], style);
			print!("{}", reporter.render_weekly(&product));
		},
		Directive::Stats => {
			let reporter = RecoveryReporter::new(store.products()?, style);
			print!("{}", reporter.render_stats());
		},
	}

	Ok(())
}

/// Logs go to stderr so reports on stdout stay clean. RUST_LOG wins over
/// the verbose flag.
fn init_logging(verbose: bool) {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		EnvFilter::new(if verbose { "debug" } else { "warn" })
	});

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.init();
}

fn style(args: &Cli, config: &Config) -> Style {
	let default = Style::default();
	Style {
		precision: args
			.precision
			.or(config.precision())
			.unwrap_or(default.precision),
		currency_symbol: config
			.currency_symbol()
			.map(str::to_string)
			.unwrap_or(default.currency_symbol),
	}
}

/// An explicit price or margin wins; otherwise the configured default
/// margin applies, and failing that the product starts without a price.
fn pricing(args: &Cli, config: &Config) -> Result<Pricing, Error> {
	if args.price.is_some() {
		let price = parse_quant("sale price", args.price.as_ref())?;
		return Ok(Pricing::Price(price));
	}
	if args.margin.is_some() {
		let margin = parse_quant("margin", args.margin.as_ref())?;
		return Ok(Pricing::Margin(margin));
	}

	Ok(config
		.default_margin()
		.map_or(Pricing::Unset, Pricing::Margin))
}

fn parse_quant(what: &str, value: Option<&String>) -> Result<Quant, Error> {
	let value = match value {
		Some(v) => v,
		None => bail!("No {} specified", what),
	};
	Quant::from_str(value)
		.with_context(|| format!("Invalid {} '{}'", what, value))
}
