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
use crate::util::quant::Quant;
use anyhow::{bail, Error};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	/// Where the product store lives. Overridden by -f.
	pub data_file: Option<String>,

	/// Partition of the store to work in. Overridden by -o.
	pub owner: Option<String>,

	pub display: Option<Display>,
	pub pricing: Option<Pricing>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Display {
	pub precision: Option<u32>,
	pub currency_symbol: Option<String>,

	/// How many products each ranking shows
	pub top: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Pricing {
	/// Margin in percent applied by `add` when neither a price nor a margin is
	/// given. Written as a string so it keeps its exact decimal value.
	pub default_margin: Option<Quant>,
}

impl Config {
	/// Extra validations on top of what serde does, matching the checks on
	/// the command line flags the config stands in for.
	pub fn validate(&self) -> Result<(), Error> {
		if let Some(prec) = self.precision() {
			if prec > Quant::MAX_PRECISION {
				bail!(
					"Maximum precision is {} (display.precision is {})",
					Quant::MAX_PRECISION,
					prec
				);
			}
		}

		Ok(())
	}

	pub fn precision(&self) -> Option<u32> {
		self.display.as_ref().and_then(|d| d.precision)
	}

	pub fn currency_symbol(&self) -> Option<&str> {
		self.display
			.as_ref()
			.and_then(|d| d.currency_symbol.as_deref())
	}

	pub fn top(&self) -> Option<usize> {
		self.display.as_ref().and_then(|d| d.top)
	}

	pub fn default_margin(&self) -> Option<Quant> {
		self.pricing.as_ref().and_then(|p| p.default_margin)
	}
}
