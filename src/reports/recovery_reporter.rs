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
use crate::inventory::analytics::sales_totals;
use crate::inventory::product::Product;
use crate::inventory::recovery::{
	portfolio_recovery_summary, recovery_status, RecoveryStatus,
};
use crate::reports::style::{field, title, Style};
use crate::reports::table::Table;

/// Renders how much of the money put into stock has come back.
pub struct RecoveryReporter {
	products: Vec<Product>,
	style: Style,
}

impl RecoveryReporter {
	pub fn new(products: Vec<Product>, style: Style) -> Self {
		Self { products, style }
	}

	pub fn render_product(&self, product: &Product) -> String {
		let s = &self.style;
		let status = recovery_status(product);

		let mut out = title(product.name(), product.id()) + "\n";
		out += &field("Total cost", s.money(status.total_cost));
		out += &field("Revenue", s.money(status.total_revenue));
		out += &field("Recovered", s.percent(status.percentage_recovered));
		out += &field("Still needed", s.money(status.amount_needed));
		out += &field("Status", status_label(&status));
		out
	}

	/// One line per product followed by the totals over all of them.
	pub fn render_portfolio(&self) -> String {
		let s = &self.style;
		let summary = portfolio_recovery_summary(&self.products);

		let mut out = String::new();
		if !self.products.is_empty() {
			let mut table = Table::new(7);
			table.right_align(vec![0, 2, 3, 4, 5]);
			table.add_header(vec![
				"ID", "Name", "Cost", "Revenue", "Recovered", "Needed", "Status",
			]);
			table.add_separator();

			for p in &self.products {
				let status = recovery_status(p);
				table.add_row(vec![
					p.id().to_string(),
					p.name().to_string(),
					s.money(status.total_cost),
					s.money(status.total_revenue),
					s.percent(status.percentage_recovered),
					s.money(status.amount_needed),
					status_label(&status).to_string(),
				]);
			}
			out += &table.render();
			out += "\n";
		}

		out += &field("Invested", s.money(summary.total_invested));
		out += &field("Recovered", s.money(summary.total_recovered));
		out += &field(
			"Recovery",
			s.percent(summary.overall_recovery_percentage),
		);
		out += &field("Still needed", s.money(summary.amount_still_needed));
		out += &field(
			"Products",
			format!(
				"{} recovered, {} not",
				summary.products_recovered, summary.products_not_recovered
			),
		);
		out += &field(
			"Status",
			if summary.is_fully_recovered {
				"Fully recovered"
			} else {
				"Not fully recovered"
			},
		);
		out
	}

	/// What has actually been sold across all products.
	pub fn render_stats(&self) -> String {
		let s = &self.style;
		let totals = sales_totals(&self.products);

		let best_seller = totals.best_seller.map_or_else(
			|| "N/A".to_string(),
			|p| format!("{} ({} sold)", title(p.name(), p.id()), p.sold()),
		);

		let mut out = field("Products", self.products.len());
		out += &field("Units sold", totals.total_sold);
		out += &field("Revenue", s.money(totals.realized_revenue));
		out += &field("Profit", s.money(totals.realized_profit));
		out += &field("Best seller", best_seller);
		out
	}
}

fn status_label(status: &RecoveryStatus) -> &'static str {
	if status.is_recovered {
		"Recovered"
	} else {
		"Not recovered"
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
		sold: u64,
	) -> Product {
		let mut product = Product::create(
			id,
			created(),
			NewProduct {
				name: name.to_string(),
				total_cost: q(cost),
				quantity,
				pricing: price.map_or(Pricing::Unset, |p| Pricing::Price(q(p))),
			},
		)
		.unwrap();
		if sold > 0 {
			product.apply_sale(Weekday::Wednesday, sold).unwrap();
		}
		product
	}

	fn sample() -> Vec<Product> {
		vec![
			product("1", "Soap", "150", 6, Some("30"), 5),
			product("2", "Candles", "100", 10, None, 0),
			product("3", "Mugs", "80", 4, Some("35"), 1),
		]
	}

	#[test]
	fn test_product() {
		let products = sample();
		let reporter = RecoveryReporter::new(products.clone(), Style::default());

		assert_eq!(
			reporter.render_product(&products[0]),
			"Soap (#1)\n\
			 Total cost:       $150.00\n\
			 Revenue:          $150.00\n\
			 Recovered:        100.00%\n\
			 Still needed:     $0.00\n\
			 Status:           Recovered\n"
		);

		let mugs = reporter.render_product(&products[2]);
		assert!(mugs.contains("Recovered:        43.75%\n"));
		assert!(mugs.contains("Still needed:     $45.00\n"));
		assert!(mugs.ends_with("Status:           Not recovered\n"));
	}

	#[test]
	fn test_portfolio() {
		let reporter = RecoveryReporter::new(sample(), Style::default());
		let out = reporter.render_portfolio();

		assert!(out.starts_with("ID | "));
		assert!(out.contains("Invested:         $330.00\n"));
		assert!(out.contains("Recovered:        $185.00\n"));
		assert!(out.contains("Recovery:         56.06%\n"));
		assert!(out.contains("Still needed:     $145.00\n"));
		assert!(out.contains("Products:         1 recovered, 2 not\n"));
		assert!(out.ends_with("Status:           Not fully recovered\n"));
	}

	#[test]
	fn test_empty_portfolio() {
		let reporter = RecoveryReporter::new(vec![], Style::default());

		assert_eq!(
			reporter.render_portfolio(),
			"Invested:         $0.00\n\
			 Recovered:        $0.00\n\
			 Recovery:         0.00%\n\
			 Still needed:     $0.00\n\
			 Products:         0 recovered, 0 not\n\
			 Status:           Not fully recovered\n"
		);
	}

	#[test]
	fn test_stats() {
		let reporter = RecoveryReporter::new(sample(), Style::default());

		assert_eq!(
			reporter.render_stats(),
			"Products:         3\n\
			 Units sold:       6\n\
			 Revenue:          $185.00\n\
			 Profit:           $40.00\n\
			 Best seller:      Soap (#1) (5 sold)\n"
		);

		let empty = RecoveryReporter::new(vec![], Style::default());
		assert!(empty.render_stats().ends_with("Best seller:      N/A\n"));
	}
}
