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
use thiserror::Error;

/// Classifies which rule an inventory operation violated. Nothing in the
/// inventory module logs or retries; callers decide what to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
	#[error("Invalid {field}: {reason}")]
	InvalidInput { field: &'static str, reason: String },

	#[error("Cannot sell {requested} units: only {available} remaining")]
	OverStock { requested: u64, available: u64 },
}

impl InventoryError {
	pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
		Self::InvalidInput {
			field,
			reason: reason.into(),
		}
	}
}
