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
use crate::inventory::economics::{self, Profit};
use crate::inventory::error::InventoryError;
use crate::inventory::weekday::DailySales;
use crate::util::quant::Quant;
use chrono::{DateTime, Utc};

/// How the sale price of a new lot is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pricing {
	/// No sale price yet; revenue falls back to unit cost
	Unset,
	/// Explicit price per unit
	Price(Quant),
	/// Percentage over unit cost
	Margin(Quant),
}

/// The raw fields a user enters for a new lot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProduct {
	pub name: String,
	pub total_cost: Quant,
	pub quantity: u64,
	pub pricing: Pricing,
}

/// One lot of a product, bought at a single total cost and sold off over
/// time. The cost side is fixed at creation; afterwards only the sale
/// recorder moves `sold` and `daily_sales`, and it always moves them
/// together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Product {
	id: String,
	name: String,
	total_cost: Quant,
	quantity: u64,
	unit_cost: Quant,
	unit_sale_price: Option<Quant>,

	pub(super) sold: u64,
	pub(super) daily_sales: DailySales,

	created_at: DateTime<Utc>,
}

impl Product {
	/// Validates the entered fields and derives the unit economics. The id and
	/// timestamp belong to whoever stores the product.
	pub fn create(
		id: impl Into<String>,
		created_at: DateTime<Utc>,
		draft: NewProduct,
	) -> Result<Self, InventoryError> {
		let name = draft.name.trim();
		if name.is_empty() {
			return Err(InventoryError::invalid("name", "must not be empty"));
		}

		let unit_cost =
			economics::derive_unit_cost(draft.total_cost, draft.quantity)?;

		let unit_sale_price = match draft.pricing {
			Pricing::Unset => None,
			Pricing::Price(price) => {
				Some(economics::require_positive("sale price", price)?)
			},
			Pricing::Margin(margin) => {
				Some(economics::sale_price_from_margin(unit_cost, margin)?)
			},
		};

		Ok(Self {
			id: id.into(),
			name: name.to_string(),
			total_cost: draft.total_cost,
			quantity: draft.quantity,
			unit_cost,
			unit_sale_price,
			sold: 0,
			daily_sales: DailySales::default(),
			created_at,
		})
	}

	/// Rebuilds a product that was created earlier and has since recorded
	/// sales. Refuses sale counts that break the stock invariants.
	pub fn restore(
		id: impl Into<String>,
		created_at: DateTime<Utc>,
		draft: NewProduct,
		sold: u64,
		daily_sales: DailySales,
	) -> Result<Self, InventoryError> {
		let mut product = Self::create(id, created_at, draft)?;

		if sold > product.quantity {
			return Err(InventoryError::invalid(
				"sold",
				format!("{} exceeds quantity {}", sold, product.quantity),
			));
		}
		if daily_sales.total() != sold {
			return Err(InventoryError::invalid(
				"daily sales",
				format!(
					"buckets add up to {} but {} were sold",
					daily_sales.total(),
					sold
				),
			));
		}

		product.sold = sold;
		product.daily_sales = daily_sales;
		Ok(product)
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn total_cost(&self) -> Quant {
		self.total_cost
	}

	pub fn quantity(&self) -> u64 {
		self.quantity
	}

	pub fn unit_cost(&self) -> Quant {
		self.unit_cost
	}

	/// The price set by the user, if any.
	pub fn unit_sale_price(&self) -> Option<Quant> {
		self.unit_sale_price
	}

	/// The price revenue is counted at: the sale price, or unit cost when
	/// none was set.
	pub fn effective_sale_price(&self) -> Quant {
		self.unit_sale_price.unwrap_or(self.unit_cost)
	}

	pub fn sold(&self) -> u64 {
		self.sold
	}

	pub fn remaining(&self) -> u64 {
		self.quantity - self.sold
	}

	pub fn daily_sales(&self) -> &DailySales {
		&self.daily_sales
	}

	pub fn created_at(&self) -> DateTime<Utc> {
		self.created_at
	}

	pub fn profit(&self) -> Profit {
		economics::derive_profit(
			self.unit_cost,
			self.unit_sale_price,
			self.quantity,
		)
	}

	/// Revenue from the units sold so far.
	pub fn realized_revenue(&self) -> Quant {
		self.effective_sale_price() * self.sold
	}

	/// Profit from the units sold so far; zero when profit is unset.
	pub fn realized_profit(&self) -> Quant {
		self.profit()
			.per_unit()
			.map(|per_unit| per_unit * self.sold)
			.unwrap_or_default()
	}
}
