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
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One of the seven fixed sales buckets. Declaration order is the
/// enumeration order used everywhere a tie has to be broken.
#[derive(
	Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
	Monday,
	Tuesday,
	Wednesday,
	Thursday,
	Friday,
	Saturday,
	Sunday,
}

impl Weekday {
	pub const ALL: [Weekday; 7] = [
		Weekday::Monday,
		Weekday::Tuesday,
		Weekday::Wednesday,
		Weekday::Thursday,
		Weekday::Friday,
		Weekday::Saturday,
		Weekday::Sunday,
	];

	/// The storage key, e.g. "monday".
	pub fn key(&self) -> &'static str {
		match self {
			Weekday::Monday => "monday",
			Weekday::Tuesday => "tuesday",
			Weekday::Wednesday => "wednesday",
			Weekday::Thursday => "thursday",
			Weekday::Friday => "friday",
			Weekday::Saturday => "saturday",
			Weekday::Sunday => "sunday",
		}
	}

	fn index(&self) -> usize {
		*self as usize
	}
}

impl From<chrono::Weekday> for Weekday {
	fn from(day: chrono::Weekday) -> Self {
		Weekday::ALL[day.num_days_from_monday() as usize]
	}
}

impl FromStr for Weekday {
	type Err = InventoryError;

	/// Full names and three-letter abbreviations, any case.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let wanted = s.trim().to_lowercase();
		Weekday::ALL
			.into_iter()
			.find(|day| day.key() == wanted || day.key()[..3] == wanted)
			.ok_or_else(|| {
				InventoryError::invalid("day", format!("unknown weekday '{}'", s))
			})
	}
}

impl fmt::Display for Weekday {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let key = self.key();
		write!(f, "{}{}", key[..1].to_uppercase(), &key[1..])
	}
}

impl Serialize for Weekday {
	fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
		s.serialize_str(self.key())
	}
}

/// Units sold per weekday, independent of calendar date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DailySales([u64; 7]);

impl DailySales {
	pub fn get(&self, day: Weekday) -> u64 {
		self.0[day.index()]
	}

	pub fn total(&self) -> u64 {
		self.0.iter().sum()
	}

	/// Buckets in Monday to Sunday order.
	pub fn iter(&self) -> impl Iterator<Item = (Weekday, u64)> + '_ {
		Weekday::ALL.into_iter().map(|day| (day, self.get(day)))
	}

	/// Only the sale recorder may move a bucket, and only together with the
	/// product's sold count.
	pub(crate) fn add(&mut self, day: Weekday, amount: u64) {
		self.0[day.index()] += amount;
	}
}

impl FromIterator<(Weekday, u64)> for DailySales {
	fn from_iter<I: IntoIterator<Item = (Weekday, u64)>>(iter: I) -> Self {
		let mut out = DailySales::default();
		for (day, count) in iter {
			out.add(day, count);
		}
		out
	}
}

impl Serialize for DailySales {
	fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
		let mut map = s.serialize_map(Some(7))?;
		for (day, count) in self.iter() {
			map.serialize_entry(day.key(), &count)?;
		}
		map.end()
	}
}

impl<'de> Deserialize<'de> for DailySales {
	/// Missing days read as zero; unknown keys are rejected.
	fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
		let map = BTreeMap::<Weekday, u64>::deserialize(d)?;
		Ok(map.into_iter().collect())
	}
}
