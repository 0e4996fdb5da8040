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

/// How amounts are written in reports. Values are rounded only here; the
/// numbers underneath stay exact.
#[derive(Clone, Debug)]
pub struct Style {
	pub precision: u32,
	pub currency_symbol: String,
}

impl Default for Style {
	fn default() -> Self {
		Self {
			precision: 2,
			currency_symbol: "$".to_string(),
		}
	}
}

impl Style {
	/// "$1,234.50", or "-$5.00" for a loss
	pub fn money(&self, value: Quant) -> String {
		let p = self.precision as usize;
		if value.round(self.precision).is_negative() {
			format!("-{}{:.*}", self.currency_symbol, p, value.abs())
		} else {
			format!("{}{:.*}", self.currency_symbol, p, value)
		}
	}

	pub fn percent(&self, value: Quant) -> String {
		format!("{:.*}%", self.precision as usize, value)
	}

	/// Unset values are shown as a dash rather than as zero.
	pub fn money_or_dash(&self, value: Option<Quant>) -> String {
		value.map_or_else(|| "-".to_string(), |v| self.money(v))
	}

	pub fn percent_or_dash(&self, value: Option<Quant>) -> String {
		value.map_or_else(|| "-".to_string(), |v| self.percent(v))
	}
}

/// One "Label:  value" line of a detail report, newline included.
pub fn field(label: &str, value: impl std::fmt::Display) -> String {
	format!("{:<18}{}\n", format!("{}:", label), value)
}

/// How a product is named in report headings and rankings.
pub fn title(name: &str, id: &str) -> String {
	format!("{} (#{})", name, id)
}
