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
use crate::inventory::product::Product;
use crate::inventory::weekday::Weekday;

/// Returns a copy of the product with the sale applied. The passed product
/// is never touched, so a rejected sale leaves the caller's state as it was.
pub fn record_sale(
	product: &Product,
	day: Weekday,
	amount: u64,
) -> Result<Product, InventoryError> {
	let mut updated = product.clone();
	updated.apply_sale(day, amount)?;
	Ok(updated)
}

impl Product {
	/// Sells `amount` units on `day`. Overselling is an error rather than a
	/// partial sale: the whole amount goes through or nothing does.
	pub fn apply_sale(
		&mut self,
		day: Weekday,
		amount: u64,
	) -> Result<(), InventoryError> {
		if amount == 0 {
			return Err(InventoryError::invalid(
				"amount",
				"must be a positive whole number",
			));
		}

		let available = self.remaining();
		if amount > available {
			return Err(InventoryError::OverStock {
				requested: amount,
				available,
			});
		}

		self.sold += amount;
		self.daily_sales.add(day, amount);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::inventory::product::tests::{created, draft, q};
	use crate::inventory::product::Pricing;

	fn lot(quantity: u64) -> Product {
		Product::create("1", created(), draft("100", quantity, Pricing::Unset))
			.unwrap()
	}

	#[test]
	fn test_sale_moves_sold_and_bucket_together() {
		let product = lot(10);
		let updated = record_sale(&product, Weekday::Friday, 3).unwrap();

		assert_eq!(updated.sold(), 3);
		assert_eq!(updated.remaining(), 7);
		assert_eq!(updated.daily_sales().get(Weekday::Friday), 3);
		assert_eq!(updated.daily_sales().total(), 3);

		// the input snapshot is untouched
		assert_eq!(product.sold(), 0);
	}

	#[test]
	fn test_selling_exactly_the_remainder() {
		let mut product = lot(4);
		product.apply_sale(Weekday::Monday, 4).unwrap();
		assert_eq!(product.remaining(), 0);
	}

	#[test]
	fn test_overstock_is_rejected_without_change() {
		let mut product = lot(10);
		product.apply_sale(Weekday::Monday, 8).unwrap();
		let before = product.clone();

		let err = product.apply_sale(Weekday::Tuesday, 5).unwrap_err();
		assert_eq!(
			err,
			InventoryError::OverStock {
				requested: 5,
				available: 2
			}
		);
		assert_eq!(product, before);
		assert_eq!(product.sold(), 8);

		assert!(record_sale(&product, Weekday::Tuesday, 3).is_err());
	}

	#[test]
	fn test_zero_amount_is_invalid() {
		let product = lot(10);
		assert!(matches!(
			record_sale(&product, Weekday::Monday, 0),
			Err(InventoryError::InvalidInput { field: "amount", .. })
		));
	}

	#[test]
	fn test_sold_out_rejects_everything() {
		let product = record_sale(&lot(2), Weekday::Sunday, 2).unwrap();
		assert!(matches!(
			record_sale(&product, Weekday::Sunday, 1),
			Err(InventoryError::OverStock { available: 0, .. })
		));
	}

	#[test]
	fn test_random_sale_sequences_keep_invariants() {
		use rand::Rng;

		let mut rng = rand::rng();
		for _ in 0..200 {
			let quantity = rng.random_range(1..60);
			let mut product = lot(quantity);

			for _ in 0..30 {
				let day = Weekday::ALL[rng.random_range(0..7)];
				let amount = rng.random_range(1..15);
				let sold_before = product.sold();

				match product.apply_sale(day, amount) {
					Ok(()) => assert_eq!(product.sold(), sold_before + amount),
					Err(InventoryError::OverStock { .. }) => {
						assert!(sold_before + amount > quantity);
						assert_eq!(product.sold(), sold_before);
					},
					Err(e) => panic!("unexpected error: {}", e),
				}

				assert!(product.sold() <= product.quantity());
				assert_eq!(product.daily_sales().total(), product.sold());
				assert_eq!(product.remaining(), quantity - product.sold());
			}
		}

		// the unit economics never move
		let product = lot(7);
		let sold = record_sale(&product, Weekday::Monday, 3).unwrap();
		assert_eq!(sold.unit_cost(), q("100") / 7u64);
	}
}
