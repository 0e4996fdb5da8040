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
/// Table renderer for reports that list one product per line.
pub struct Table {
	column_count: usize,
	rows: Vec<Row>,
	right_align: Vec<bool>, // indicates columns by index
}

pub enum Row {
	Header(Vec<String>),
	Data(Vec<String>),
	Separator,
}

impl Table {
	pub fn new(column_count: usize) -> Self {
		Self {
			column_count,
			rows: Vec::new(),
			right_align: vec![false; column_count],
		}
	}

	pub fn add_header(&mut self, row: Vec<&str>) {
		self.rows.push(Row::Header(
			row.into_iter().map(|s| s.to_string()).collect(),
		));
	}

	pub fn add_row(&mut self, row: Vec<String>) {
		self.rows.push(Row::Data(row));
	}

	pub fn add_separator(&mut self) {
		self.rows.push(Row::Separator);
	}

	/// Specifies columns that should be right-aligned by index.
	pub fn right_align(&mut self, cols: Vec<usize>) {
		for col in cols {
			self.right_align[col] = true;
		}
	}

	/// Renders every row, with trailing spaces trimmed from each line.
	pub fn render(&self) -> String {
		let mut max_widths = vec![0; self.column_count];

		for row in &self.rows {
			if let Row::Data(cells) | Row::Header(cells) = row {
				for (i, value) in cells.iter().enumerate() {
					max_widths[i] = max_widths[i].max(value.chars().count());
				}
			}
		}

		let mut out = String::new();
		for row in &self.rows {
			let line = match row {
				Row::Header(cells) => self.header_line(&max_widths, cells),
				Row::Data(cells) => self.data_line(&max_widths, cells),
				Row::Separator => {
					let total_width: usize = max_widths.iter().sum::<usize>()
						+ (3 * (self.column_count - 1));
					"-".repeat(total_width)
				},
			};
			out.push_str(line.trim_end());
			out.push('\n');
		}
		out
	}

	fn data_line(&self, max_widths: &[usize], cells: &[String]) -> String {
		cells
			.iter()
			.enumerate()
			.map(|(i, value)| {
				if self.right_align[i] {
					format!("{:>width$}", value, width = max_widths[i])
				} else {
					format!("{:<width$}", value, width = max_widths[i])
				}
			})
			.collect::<Vec<_>>()
			.join("   ")
	}

	fn header_line(&self, max_widths: &[usize], cells: &[String]) -> String {
		cells
			.iter()
			.enumerate()
			.map(|(i, value)| Table::center_align(value, max_widths[i]))
			.collect::<Vec<_>>()
			.join(" | ")
	}

	fn center_align(value: &str, width: usize) -> String {
		let len = value.chars().count();
		if len >= width {
			return value.to_string();
		}
		let total_padding = width - len;
		let left_padding = total_padding / 2;
		let right_padding = total_padding - left_padding;

		format!(
			"{}{}{}",
			" ".repeat(left_padding),
			value,
			" ".repeat(right_padding)
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_render_aligns_columns() {
		let mut table = Table::new(2);
		table.right_align(vec![1]);
		table.add_header(vec!["Name", "Sold"]);
		table.add_separator();
		table.add_row(vec!["Soap".to_string(), "5".to_string()]);
		table.add_row(vec!["Candles".to_string(), "12".to_string()]);

		assert_eq!(
			table.render(),
			" Name   | Sold\n\
			 --------------\n\
			 Soap         5\n\
			 Candles     12\n"
		);
	}

	#[test]
	fn test_counts_characters_not_bytes() {
		let mut table = Table::new(2);
		table.add_row(vec!["Jabón".to_string(), "x".to_string()]);
		table.add_row(vec!["Soap".to_string(), "y".to_string()]);

		assert_eq!(table.render(), "Jabón   x\nSoap    y\n");
	}
}
