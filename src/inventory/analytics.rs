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
use crate::inventory::product::Product;
use crate::inventory::weekday::{DailySales, Weekday};
use crate::util::quant::Quant;

/// Rankings show this many products unless told otherwise.
pub const DEFAULT_TOP: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeeklySummary {
	pub per_day: DailySales,
	pub total_weekly: u64,
	pub best_day: Weekday,
	pub max_day: u64,
}

/// Portfolio-wide totals of what has actually been sold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SalesTotals<'a> {
	pub total_sold: u64,
	pub realized_revenue: Quant,
	pub realized_profit: Quant,
	pub best_seller: Option<&'a Product>,
}

/// Products that sold anything, most units first.
pub fn top_selling(products: &[Product], n: usize) -> Vec<&Product> {
	rank_by(products, n, |p| (p.sold() > 0).then(|| Quant::from(p.sold())))
}

/// Products with a positive margin, ranked by the profit the whole lot
/// would make if every unit sold.
pub fn highest_total_profit(products: &[Product], n: usize) -> Vec<&Product> {
	rank_by(products, n, |p| {
		p.profit().total().filter(|_| positive_per_unit(p))
	})
}

pub fn best_margin(products: &[Product], n: usize) -> Vec<&Product> {
	rank_by(products, n, |p| {
		p.profit().percentage().filter(Quant::is_positive)
	})
}

/// Per-day breakdown and the best day. Ties, including a week with no sales
/// at all, go to the earliest day from Monday.
pub fn weekly_summary(product: &Product) -> WeeklySummary {
	let per_day = *product.daily_sales();

	let (best_day, max_day) = per_day.iter().fold(
		(Weekday::Monday, 0),
		|(best, max), (day, count)| {
			if count > max {
				(day, count)
			} else {
				(best, max)
			}
		},
	);

	WeeklySummary {
		per_day,
		total_weekly: per_day.total(),
		best_day,
		max_day,
	}
}

/// Profit still to be made on unsold stock; zero when profit is unset.
pub fn remaining_profit(product: &Product) -> Quant {
	product
		.profit()
		.per_unit()
		.map(|per_unit| per_unit * product.remaining())
		.unwrap_or_default()
}

pub fn sales_totals(products: &[Product]) -> SalesTotals<'_> {
	let best_seller = products
		.iter()
		.filter(|p| p.sold() > 0)
		.fold(None, |best: Option<&Product>, p| match best {
			Some(b) if b.sold() >= p.sold() => Some(b),
			_ => Some(p),
		});

	SalesTotals {
		total_sold: products.iter().map(Product::sold).sum(),
		realized_revenue: products.iter().map(Product::realized_revenue).sum(),
		realized_profit: products.iter().map(Product::realized_profit).sum(),
		best_seller,
	}
}

/// Default display order: most recently created first. Products created at
/// the same instant keep their relative order.
pub fn newest_first(products: &mut [Product]) {
	products.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
}

/// Keeps products for which `key` yields a value, sorts them by that value
/// descending and takes the first `n`. The sort is stable, so equal keys keep
/// their input order.
fn rank_by<F>(products: &[Product], n: usize, key: F) -> Vec<&Product>
where
	F: Fn(&Product) -> Option<Quant>,
{
	let mut keyed: Vec<(Quant, &Product)> = products
		.iter()
		.filter_map(|p| key(p).map(|k| (k, p)))
		.collect();

	keyed.sort_by(|a, b| b.0.cmp(&a.0));
	keyed.into_iter().take(n).map(|(_, p)| p).collect()
}

fn positive_per_unit(product: &Product) -> bool {
	product
		.profit()
		.per_unit()
		.is_some_and(|per_unit| per_unit.is_positive())
}
