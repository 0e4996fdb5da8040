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
use crate::inventory::product::{NewProduct, Pricing, Product};
use crate::inventory::weekday::DailySales;
use crate::storage::filesystem::Filesystem;
use crate::util::quant::Quant;
use anyhow::{anyhow, bail, Context, Error};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// The persisted shape of one product. Derived values other than
/// `remaining` are not stored; they are recomputed on load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
	pub id: String,
	pub owner: String,
	pub name: String,
	pub total_cost: Quant,
	pub quantity: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub unit_sale_price: Option<Quant>,
	pub sold: u64,
	pub remaining: u64,
	#[serde(default)]
	pub daily_sales: DailySales,
	pub created_at: DateTime<Utc>,
}

impl ProductRecord {
	fn from_product(owner: &str, product: &Product) -> Self {
		Self {
			id: product.id().to_string(),
			owner: owner.to_string(),
			name: product.name().to_string(),
			total_cost: product.total_cost(),
			quantity: product.quantity(),
			unit_sale_price: product.unit_sale_price(),
			sold: product.sold(),
			remaining: product.remaining(),
			daily_sales: *product.daily_sales(),
			created_at: product.created_at(),
		}
	}

	fn to_product(&self) -> Result<Product, Error> {
		if self.sold.checked_add(self.remaining) != Some(self.quantity) {
			bail!(
				"Product {}: remaining {} does not match quantity {} less {} sold",
				self.id,
				self.remaining,
				self.quantity,
				self.sold
			)
		}

		let draft = NewProduct {
			name: self.name.clone(),
			total_cost: self.total_cost,
			quantity: self.quantity,
			pricing: self.unit_sale_price.map_or(Pricing::Unset, Pricing::Price),
		};

		Product::restore(
			self.id.clone(),
			self.created_at,
			draft,
			self.sold,
			self.daily_sales,
		)
		.with_context(|| format!("Product {} is corrupt", self.id))
	}
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreFile {
	/// The last ID number handed out; the next product gets one more
	next_id: u64,
	products: Vec<ProductRecord>,
}

/// A JSON file holding every owner's products. Each Store instance works on
/// one owner's slice of it and leaves the rest untouched.
pub struct Store {
	fs: Filesystem,
	path: PathBuf,
	owner: String,
	state: StoreFile,
}

impl Store {
	/// Loads the store at `path`. A file that does not exist yet is an empty
	/// store.
	pub fn open(
		fs: Filesystem,
		path: PathBuf,
		owner: &str,
	) -> Result<Self, Error> {
		let state = match fs.read_if_exists(&path)? {
			None => StoreFile::default(),
			Some(content) => serde_json::from_str(&content).with_context(|| {
				format!("failed to parse store {}", path.display())
			})?,
		};

		debug!(
			path = %path.display(),
			records = state.products.len(),
			"loaded store"
		);

		Ok(Self {
			fs,
			path,
			owner: owner.to_string(),
			state,
		})
	}

	/// The owner's products, newest first.
	pub fn products(&self) -> Result<Vec<Product>, Error> {
		let mut products = self
			.owned()
			.map(ProductRecord::to_product)
			.collect::<Result<Vec<_>, _>>()?;
		crate::inventory::analytics::newest_first(&mut products);
		Ok(products)
	}

	pub fn get(&self, id: &str) -> Result<Product, Error> {
		self.owned()
			.find(|r| r.id == id)
			.ok_or_else(|| anyhow!("No product with id {}", id))?
			.to_product()
	}

	/// Creates the product under the next free id and keeps it. Nothing is
	/// written until `save`.
	pub fn insert(
		&mut self,
		draft: NewProduct,
		created_at: DateTime<Utc>,
	) -> Result<Product, Error> {
		let id = (self.state.next_id + 1).to_string();
		let product = Product::create(id, created_at, draft)?;

		self.state.next_id += 1;
		self.state
			.products
			.push(ProductRecord::from_product(&self.owner, &product));

		info!(id = product.id(), name = product.name(), "product created");
		Ok(product)
	}

	/// Writes back a product's sale fields after the sale recorder changed
	/// them.
	pub fn update(&mut self, product: &Product) -> Result<(), Error> {
		let owner = self.owner.clone();
		let record = self
			.state
			.products
			.iter_mut()
			.find(|r| r.owner == owner && r.id == product.id())
			.ok_or_else(|| anyhow!("No product with id {}", product.id()))?;

		*record = ProductRecord::from_product(&owner, product);
		Ok(())
	}

	pub fn remove(&mut self, id: &str) -> Result<Product, Error> {
		let product = self.get(id)?;
		let owner = self.owner.clone();
		self.state
			.products
			.retain(|r| !(r.owner == owner && r.id == id));

		info!(id, "product removed");
		Ok(product)
	}

	pub fn save(&self) -> Result<(), Error> {
		let content = serde_json::to_string_pretty(&self.state)?;
		self.fs.write_atomic(&self.path, &content)?;

		debug!(
			path = %self.path.display(),
			records = self.state.products.len(),
			"saved store"
		);
		Ok(())
	}

	fn owned(&self) -> impl Iterator<Item = &ProductRecord> {
		self.state
			.products
			.iter()
			.filter(move |r| r.owner == self.owner)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::inventory::sale::record_sale;
	use crate::inventory::weekday::Weekday;
	use chrono::TimeZone;
	use std::fs;
	use std::str::FromStr;

	fn q(s: &str) -> Quant {
		Quant::from_str(s).unwrap()
	}

	fn scratch(name: &str) -> PathBuf {
		std::env::temp_dir()
			.join(format!("stockr-store-{}-{}.json", std::process::id(), name))
	}

	fn soap() -> NewProduct {
		NewProduct {
			name: "Soap".to_string(),
			total_cost: q("150"),
			quantity: 6,
			pricing: Pricing::Price(q("30")),
		}
	}

	fn at(day: u32) -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2026, 1, day, 10, 0, 0).unwrap()
	}

	#[test]
	fn test_created_product_reads_back_identically() {
		let path = scratch("round-trip");
		let mut store = Store::open(Filesystem::new(), path.clone(), "me").unwrap();
		let created = store.insert(soap(), at(1)).unwrap();
		store.save().unwrap();

		let reopened = Store::open(Filesystem::new(), path.clone(), "me").unwrap();
		let read = reopened.get(created.id()).unwrap();

		assert_eq!(read, created);
		assert_eq!(read.unit_cost(), q("25"));
		assert_eq!(read.profit(), created.profit());
		assert_eq!(read.sold(), 0);

		fs::remove_file(path).unwrap();
	}

	#[test]
	fn test_repeating_unit_cost_survives_storage() {
		let path = scratch("repeating");
		let mut store = Store::open(Filesystem::new(), path.clone(), "me").unwrap();
		let mut draft = soap();
		draft.total_cost = q("100");
		draft.quantity = 3;
		draft.pricing = Pricing::Margin(q("10"));
		let created = store.insert(draft, at(1)).unwrap();
		store.save().unwrap();

		let reopened = Store::open(Filesystem::new(), path.clone(), "me").unwrap();
		let read = reopened.get(created.id()).unwrap();
		assert_eq!(read.unit_sale_price(), Some(q("110/3")));
		assert_eq!(read, created);

		fs::remove_file(path).unwrap();
	}

	#[test]
	fn test_sales_persist() {
		let path = scratch("sales");
		let mut store = Store::open(Filesystem::new(), path.clone(), "me").unwrap();
		let product = store.insert(soap(), at(1)).unwrap();
		let sold = record_sale(&product, Weekday::Friday, 4).unwrap();
		store.update(&sold).unwrap();
		store.save().unwrap();

		let reopened = Store::open(Filesystem::new(), path.clone(), "me").unwrap();
		let read = reopened.get(product.id()).unwrap();
		assert_eq!(read.sold(), 4);
		assert_eq!(read.remaining(), 2);
		assert_eq!(read.daily_sales().get(Weekday::Friday), 4);

		fs::remove_file(path).unwrap();
	}

	#[test]
	fn test_ids_increase_and_listing_is_newest_first() {
		let mut store =
			Store::open(Filesystem::new(), scratch("unsaved-ids"), "me").unwrap();
		let first = store.insert(soap(), at(1)).unwrap();
		let second = store.insert(soap(), at(2)).unwrap();

		assert_eq!(first.id(), "1");
		assert_eq!(second.id(), "2");

		let ids: Vec<String> = store
			.products()
			.unwrap()
			.iter()
			.map(|p| p.id().to_string())
			.collect();
		assert_eq!(ids, vec!["2", "1"]);
	}

	#[test]
	fn test_invalid_product_is_not_stored() {
		let mut store =
			Store::open(Filesystem::new(), scratch("unsaved-invalid"), "me")
				.unwrap();
		let mut draft = soap();
		draft.quantity = 0;

		assert!(store.insert(draft, at(1)).is_err());
		assert!(store.products().unwrap().is_empty());
		assert_eq!(store.insert(soap(), at(1)).unwrap().id(), "1");
	}

	#[test]
	fn test_owners_are_partitioned() {
		let path = scratch("owners");
		let mut mine = Store::open(Filesystem::new(), path.clone(), "me").unwrap();
		mine.insert(soap(), at(1)).unwrap();
		mine.save().unwrap();

		let mut theirs =
			Store::open(Filesystem::new(), path.clone(), "them").unwrap();
		assert!(theirs.products().unwrap().is_empty());
		assert!(theirs.get("1").is_err());
		assert!(theirs.remove("1").is_err());
		theirs.insert(soap(), at(2)).unwrap();
		theirs.save().unwrap();

		let mine = Store::open(Filesystem::new(), path.clone(), "me").unwrap();
		assert_eq!(mine.products().unwrap().len(), 1);

		fs::remove_file(path).unwrap();
	}

	#[test]
	fn test_remove() {
		let mut store =
			Store::open(Filesystem::new(), scratch("unsaved-remove"), "me").unwrap();
		let product = store.insert(soap(), at(1)).unwrap();

		assert_eq!(store.remove(product.id()).unwrap().name(), "Soap");
		assert!(store.get(product.id()).is_err());
		assert!(store.remove(product.id()).is_err());
	}

	#[test]
	fn test_rejects_inconsistent_records() {
		let path = scratch("corrupt");
		fs::write(
			&path,
			r#"{
				"nextId": 1,
				"products": [{
					"id": "1", "owner": "me", "name": "Soap",
					"totalCost": "150", "quantity": 6,
					"sold": 2, "remaining": 3,
					"dailySales": {"monday": 2},
					"createdAt": "2026-01-01T10:00:00Z"
				}]
			}"#,
		)
		.unwrap();

		let store = Store::open(Filesystem::new(), path.clone(), "me").unwrap();
		assert!(store.products().is_err());

		fs::remove_file(path).unwrap();
	}

	#[test]
	fn test_rejects_unbalanced_buckets() {
		let record = ProductRecord {
			id: "1".to_string(),
			owner: "me".to_string(),
			name: "Soap".to_string(),
			total_cost: q("150"),
			quantity: 6,
			unit_sale_price: None,
			sold: 2,
			remaining: 4,
			daily_sales: DailySales::default(),
			created_at: at(1),
		};
		assert!(record.to_product().is_err());
	}
}
