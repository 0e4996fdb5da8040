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
use crate::util::quant::Quant;

/// How far the revenue of sold units has gone towards paying back a lot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoveryStatus {
	pub is_recovered: bool,
	pub percentage_recovered: Quant,
	pub amount_needed: Quant,
	pub total_revenue: Quant,
	pub total_cost: Quant,
}

/// The same measure folded over every product.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortfolioRecovery {
	pub total_invested: Quant,
	pub total_recovered: Quant,
	pub products_recovered: usize,
	pub products_not_recovered: usize,
	pub overall_recovery_percentage: Quant,
	/// Revenue covers everything invested. Unlike the per-product rule, an
	/// empty portfolio is never fully recovered.
	pub is_fully_recovered: bool,
	pub amount_still_needed: Quant,
}

pub fn recovery_status(product: &Product) -> RecoveryStatus {
	let total_revenue = product.realized_revenue();
	let total_cost = product.total_cost();

	RecoveryStatus {
		is_recovered: total_revenue >= total_cost,
		percentage_recovered: total_revenue / total_cost * Quant::hundred(),
		amount_needed: (total_cost - total_revenue).max(Quant::zero()),
		total_revenue,
		total_cost,
	}
}

/// An empty portfolio has nothing invested, so it reports zero recovery and
/// is not considered fully recovered.
pub fn portfolio_recovery_summary(products: &[Product]) -> PortfolioRecovery {
	let mut total_invested = Quant::zero();
	let mut total_recovered = Quant::zero();
	let mut products_recovered = 0;

	for status in products.iter().map(recovery_status) {
		total_invested += status.total_cost;
		total_recovered += status.total_revenue;
		if status.is_recovered {
			products_recovered += 1;
		}
	}

	PortfolioRecovery {
		total_invested,
		total_recovered,
		products_recovered,
		products_not_recovered: products.len() - products_recovered,
		overall_recovery_percentage: total_recovered
			.checked_div(total_invested)
			.map(|ratio| ratio * Quant::hundred())
			.unwrap_or_default(),
		is_fully_recovered: !products.is_empty()
			&& total_recovered >= total_invested,
		amount_still_needed: (total_invested - total_recovered)
			.max(Quant::zero()),
	}
}
