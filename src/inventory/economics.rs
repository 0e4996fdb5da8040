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
use crate::inventory::error::InventoryError;
use crate::util::quant::Quant;

/// Profit figures for one product. A product without a sale price has no
/// profit at all, which is not the same thing as selling at cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profit {
	Unset,
	Computed {
		per_unit: Quant,
		/// Per-unit profit as a percentage of unit cost
		percentage: Quant,
		/// Potential profit if the whole lot sells at the sale price
		total: Quant,
	},
}

impl Profit {
	pub fn per_unit(&self) -> Option<Quant> {
		match self {
			Profit::Unset => None,
			Profit::Computed { per_unit, .. } => Some(*per_unit),
		}
	}

	pub fn percentage(&self) -> Option<Quant> {
		match self {
			Profit::Unset => None,
			Profit::Computed { percentage, .. } => Some(*percentage),
		}
	}

	pub fn total(&self) -> Option<Quant> {
		match self {
			Profit::Unset => None,
			Profit::Computed { total, .. } => Some(*total),
		}
	}
}

/// Cost of one unit of a lot. No rounding is applied; that is left to
/// whatever renders the value.
pub fn derive_unit_cost(
	total_cost: Quant,
	quantity: u64,
) -> Result<Quant, InventoryError> {
	if quantity == 0 {
		return Err(InventoryError::invalid(
			"quantity",
			"must be a positive whole number",
		));
	}
	require_positive("total cost", total_cost)?;

	Ok(total_cost / quantity)
}

pub fn derive_profit(
	unit_cost: Quant,
	unit_sale_price: Option<Quant>,
	quantity: u64,
) -> Profit {
	match unit_sale_price {
		None => Profit::Unset,
		Some(price) => {
			let per_unit = price - unit_cost;
			Profit::Computed {
				per_unit,
				percentage: per_unit / unit_cost * Quant::hundred(),
				total: per_unit * quantity,
			}
		},
	}
}

/// Sale price that yields the given margin over unit cost, so a margin of 20
/// prices a unit costing 25 at 30.
pub fn sale_price_from_margin(
	unit_cost: Quant,
	margin_percent: Quant,
) -> Result<Quant, InventoryError> {
	let price =
		unit_cost * (Quant::from_int(1) + margin_percent / Quant::hundred());
	if !price.is_positive() {
		return Err(InventoryError::invalid(
			"margin",
			format!("{}% leaves no positive sale price", margin_percent),
		));
	}
	Ok(price)
}

pub(crate) fn require_positive(
	field: &'static str,
	value: Quant,
) -> Result<Quant, InventoryError> {
	if value.is_positive() {
		Ok(value)
	} else {
		Err(InventoryError::invalid(
			field,
			format!("must be greater than zero, got {}", value),
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::str::FromStr;

	fn q(s: &str) -> Quant {
		Quant::from_str(s).unwrap()
	}

	mod unit_cost {
		use super::*;

		#[test]
		fn test_divides_cost_by_quantity() {
			assert_eq!(derive_unit_cost(q("150"), 6).unwrap(), q("25"));
			assert_eq!(derive_unit_cost(q("10"), 3).unwrap(), q("10/3"));
		}

		#[test]
		fn test_rejects_zero_quantity() {
			assert!(matches!(
				derive_unit_cost(q("150"), 0),
				Err(InventoryError::InvalidInput {
					field: "quantity",
					..
				})
			));
		}

		#[test]
		fn test_rejects_non_positive_cost() {
			for cost in ["0", "-5"] {
				assert!(matches!(
					derive_unit_cost(q(cost), 3),
					Err(InventoryError::InvalidInput {
						field: "total cost",
						..
					})
				));
			}
		}

		#[test]
		fn test_random_lots_have_positive_unit_cost() {
			use rand::Rng;

			let mut rng = rand::rng();
			for _ in 0..1_000 {
				let cents: i128 = rng.random_range(1..10_000_000);
				let quantity: u64 = rng.random_range(1..5_000);
				let total = Quant::from_frac(cents, 100);

				let unit = derive_unit_cost(total, quantity).unwrap();
				assert!(unit.is_positive());
				assert_eq!(unit * quantity, total);
			}
		}
	}

	mod profit {
		use super::*;

		#[test]
		fn test_unset_without_price() {
			let profit = derive_profit(q("25"), None, 6);
			assert_eq!(profit, Profit::Unset);
			assert_eq!(profit.per_unit(), None);
			assert_eq!(profit.percentage(), None);
			assert_eq!(profit.total(), None);
		}

		#[test]
		fn test_zero_margin_is_computed_not_unset() {
			let profit = derive_profit(q("25"), Some(q("25")), 6);
			assert_eq!(profit.per_unit(), Some(Quant::zero()));
			assert_eq!(profit.percentage(), Some(Quant::zero()));
			assert_eq!(profit.total(), Some(Quant::zero()));
		}

		#[test]
		fn test_gain() {
			let profit = derive_profit(q("25"), Some(q("30")), 6);
			assert_eq!(
				profit,
				Profit::Computed {
					per_unit: q("5"),
					percentage: q("20"),
					total: q("30"),
				}
			);
		}

		#[test]
		fn test_loss_keeps_sign() {
			let profit = derive_profit(q("20"), Some(q("15")), 4);
			assert_eq!(profit.per_unit(), Some(q("-5")));
			assert_eq!(profit.percentage(), Some(q("-25")));
			assert_eq!(profit.total(), Some(q("-20")));
		}
	}

	mod margin {
		use super::*;

		#[test]
		fn test_price_from_margin() {
			assert_eq!(sale_price_from_margin(q("25"), q("20")).unwrap(), q("30"));
			assert_eq!(sale_price_from_margin(q("25"), q("0")).unwrap(), q("25"));
			assert_eq!(
				sale_price_from_margin(q("10"), q("-50")).unwrap(),
				q("5")
			);
		}

		#[test]
		fn test_margin_wiping_out_price_is_rejected() {
			for margin in ["-100", "-150"] {
				assert!(matches!(
					sale_price_from_margin(q("25"), q(margin)),
					Err(InventoryError::InvalidInput { field: "margin", .. })
				));
			}
		}
	}
}
