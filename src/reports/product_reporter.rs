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
use crate::inventory::analytics::{
	best_margin, highest_total_profit, remaining_profit, top_selling,
	weekly_summary,
};
use crate::inventory::product::Product;
use crate::reports::style::{field, title, Style};
use crate::reports::table::Table;

/// Renders product listings, details, weekly breakdowns and rankings.
pub struct ProductReporter {
	products: Vec<Product>,
	style: Style,
}

impl ProductReporter {
	/// Products are shown in the order given; the store hands them over
	/// newest first.
	pub fn new(products: Vec<Product>, style: Style) -> Self {
		Self { products, style }
	}

	pub fn render_list(&self) -> String {
		if self.products.is_empty() {
			return "No products\n".to_string();
		}

		let mut table = Table::new(9);
		table.right_align(vec![0, 2, 3, 4, 5, 6, 7, 8]);
		table.add_header(vec![
			"ID",
			"Name",
			"Unit Cost",
			"Sale Price",
			"Profit/Unit",
			"Margin",
			"Qty",
			"Sold",
			"Left",
		]);
		table.add_separator();

		for p in &self.products {
			let profit = p.profit();
			table.add_row(vec![
				p.id().to_string(),
				p.name().to_string(),
				self.style.money(p.unit_cost()),
				self.style.money_or_dash(p.unit_sale_price()),
				self.style.money_or_dash(profit.per_unit()),
				self.style.percent_or_dash(profit.percentage()),
				p.quantity().to_string(),
				p.sold().to_string(),
				p.remaining().to_string(),
			]);
		}

		table.render()
	}

	pub fn render_detail(&self, product: &Product) -> String {
		let s = &self.style;
		let profit = product.profit();

		let mut out = title(product.name(), product.id()) + "\n";
		out += &field("Total cost", s.money(product.total_cost()));
		out += &field("Quantity", product.quantity());
		out += &field("Unit cost", s.money(product.unit_cost()));
		out += &field("Sale price", s.money_or_dash(product.unit_sale_price()));
		out += &field("Profit/unit", s.money_or_dash(profit.per_unit()));
		out += &field("Margin", s.percent_or_dash(profit.percentage()));
		out += &field("Lot profit", s.money_or_dash(profit.total()));
		out += &field("Sold", product.sold());
		out += &field("Remaining", product.remaining());
		out += &field("Remaining profit", s.money(remaining_profit(product)));
		out += &field(
			"Created",
			product.created_at().format("%Y-%m-%d %H:%M UTC"),
		);
		out
	}

	pub fn render_weekly(&self, product: &Product) -> String {
		let summary = weekly_summary(product);

		let mut out = title(product.name(), product.id()) + "\n";
		for (day, count) in summary.per_day.iter() {
			out += &field(&day.to_string(), count);
		}
		out += &field("Total", summary.total_weekly);
		out += &field(
			"Best day",
			format!("{} ({})", summary.best_day, summary.max_day),
		);
		out
	}

	/// The three rankings over all products, `n` entries each.
	pub fn render_rankings(&self, n: usize) -> String {
		let products = &self.products;

		let sections = [
			(
				"Top sellers",
				top_selling(products, n)
					.into_iter()
					.map(|p| (p, format!("{} sold", p.sold())))
					.collect::<Vec<_>>(),
			),
			(
				"Highest lot profit",
				highest_total_profit(products, n)
					.into_iter()
					.map(|p| (p, self.style.money_or_dash(p.profit().total())))
					.collect(),
			),
			(
				"Best margin",
				best_margin(products, n)
					.into_iter()
					.map(|p| {
						(p, self.style.percent_or_dash(p.profit().percentage()))
					})
					.collect(),
			),
		];

		sections
			.iter()
			.map(|(heading, entries)| {
				let mut out = format!("{}\n", heading);
				if entries.is_empty() {
					out += "  none\n";
				}
				for (rank, (p, value)) in entries.iter().enumerate() {
					out += &format!(
						"  {}. {}  {}\n",
						rank + 1,
						title(p.name(), p.id()),
						value
					);
				}
				out
			})
			.collect::<Vec<_>>()
			.join("\n")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::inventory::product::tests::{created, q};
	use crate::inventory::product::{NewProduct, Pricing};
	use crate::inventory::weekday::Weekday;

	fn product(
		id: &str,
		name: &str,
		cost: &str,
		quantity: u64,
		price: Option<&str>,
	) -> Product {
		Product::create(
			id,
			created(),
			NewProduct {
				name: name.to_string(),
				total_cost: q(cost),
				quantity,
				pricing: price.map_or(Pricing::Unset, |p| Pricing::Price(q(p))),
			},
		)
		.unwrap()
	}

	fn sample() -> Vec<Product> {
		let mut soap = product("1", "Soap", "150", 6, Some("30"));
		soap.apply_sale(Weekday::Monday, 2).unwrap();
		soap.apply_sale(Weekday::Friday, 3).unwrap();

		let candles = product("2", "Candles", "100", 10, None);

		let mut mugs = product("3", "Mugs", "80", 4, Some("35"));
		mugs.apply_sale(Weekday::Tuesday, 1).unwrap();

		vec![soap, candles, mugs]
	}

	#[test]
	fn test_list() {
		let reporter = ProductReporter::new(sample(), Style::default());
		let out = reporter.render_list();
		let lines: Vec<&str> = out.lines().collect();

		assert_eq!(lines.len(), 5);
		assert!(lines[0].contains("Unit Cost"));
		assert!(lines[2].starts_with(" 1   Soap"));
		assert!(lines[2].contains("$25.00"));
		assert!(lines[2].contains("20.00%"));
		assert!(lines[3].contains("$10.00"));
		assert!(lines[3].contains(" - "));
	}

	#[test]
	fn test_empty_list() {
		let reporter = ProductReporter::new(vec![], Style::default());
		assert_eq!(reporter.render_list(), "No products\n");
		assert_eq!(
			reporter.render_rankings(5),
			"Top sellers\n  none\n\nHighest lot profit\n  none\n\nBest margin\n  none\n"
		);
	}

	#[test]
	fn test_detail() {
		let products = sample();
		let reporter = ProductReporter::new(products.clone(), Style::default());
		let out = reporter.render_detail(&products[0]);

		assert!(out.starts_with("Soap (#1)\n"));
		assert!(out.contains("Unit cost:        $25.00\n"));
		assert!(out.contains("Margin:           20.00%\n"));
		assert!(out.contains("Lot profit:       $30.00\n"));
		assert!(out.contains("Remaining profit: $5.00\n"));

		let unpriced = reporter.render_detail(&products[1]);
		assert!(unpriced.contains("Sale price:       -\n"));
		assert!(unpriced.contains("Remaining profit: $0.00\n"));
	}

	#[test]
	fn test_weekly() {
		let products = sample();
		let reporter = ProductReporter::new(products.clone(), Style::default());

		assert_eq!(
			reporter.render_weekly(&products[0]),
			"Soap (#1)\n\
			 Monday:           2\n\
			 Tuesday:          0\n\
			 Wednesday:        0\n\
			 Thursday:         0\n\
			 Friday:           3\n\
			 Saturday:         0\n\
			 Sunday:           0\n\
			 Total:            5\n\
			 Best day:         Friday (3)\n"
		);
	}

	#[test]
	fn test_rankings() {
		let reporter = ProductReporter::new(sample(), Style::default());

		assert_eq!(
			reporter.render_rankings(5),
			"Top sellers\n\
			 \x20 1. Soap (#1)  5 sold\n\
			 \x20 2. Mugs (#3)  1 sold\n\
			 \n\
			 Highest lot profit\n\
			 \x20 1. Mugs (#3)  $60.00\n\
			 \x20 2. Soap (#1)  $30.00\n\
			 \n\
			 Best margin\n\
			 \x20 1. Mugs (#3)  75.00%\n\
			 \x20 2. Soap (#1)  20.00%\n"
		);
	}
}
