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
use anyhow::{anyhow, bail, Error};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

/// An exact signed rational number, used for every amount of money, ratio
/// and percentage the tracker deals with. Dividing a lot's cost by its
/// quantity rarely terminates in decimal, so we keep the fraction and only
/// round when rendering.
///
/// Always held in lowest terms with a positive denominator, which makes the
/// derived equality and hashing agree with numeric equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Quant {
	numerator: i128,
	denominator: i128,
}

impl Quant {
	/// Places rendered by a bare `{}` when the value does not terminate.
	const DEFAULT_RENDER_PRECISION: u32 = 4;

	/// Beyond this, 10^places no longer fits comfortably in an i128 next to
	/// a realistic numerator.
	pub const MAX_PRECISION: u32 = 18;

	pub fn zero() -> Self {
		Self {
			numerator: 0,
			denominator: 1,
		}
	}

	pub fn hundred() -> Self {
		Self::from_int(100)
	}

	pub fn from_int(value: i128) -> Self {
		Self {
			numerator: value,
			denominator: 1,
		}
	}

	pub fn from_frac(numerator: i128, denominator: i128) -> Self {
		if denominator == 0 {
			panic!("Denominator cannot be zero");
		}

		let mut out = Self {
			numerator,
			denominator,
		};
		out.reduce();
		out
	}

	pub fn is_zero(&self) -> bool {
		self.numerator == 0
	}

	pub fn is_positive(&self) -> bool {
		self.numerator > 0
	}

	pub fn is_negative(&self) -> bool {
		self.numerator < 0
	}

	pub fn abs(&self) -> Self {
		Self {
			numerator: self.numerator.abs(),
			..*self
		}
	}

	/// Division that reports a zero divisor instead of panicking.
	pub fn checked_div(self, rhs: Self) -> Option<Self> {
		if rhs.is_zero() {
			None
		} else {
			Some(self / rhs)
		}
	}

	/// Returns the value rounded to the given number of decimal places,
	/// using banker's rounding (to nearest, ties to even). Places beyond
	/// `MAX_PRECISION` are clamped, and a value too large to carry that many
	/// places keeps as many as fit.
	pub fn round(&self, decimal_places: u32) -> Self {
		(0..=decimal_places.min(Self::MAX_PRECISION))
			.rev()
			.find_map(|places| self.checked_round(places))
			.unwrap_or_else(|| {
				Self::from_int(self.numerator / self.denominator)
			})
	}

	/// None when the rounded value does not fit in the given places.
	fn checked_round(&self, decimal_places: u32) -> Option<Self> {
		let scale = 10u128.pow(decimal_places);
		let numerator = self.numerator.unsigned_abs();
		let mut denominator = self.denominator as u128;

		let whole = numerator / denominator;
		let mut remainder = numerator % denominator;

		// Halve the fractional part until it can be scaled. Only reached for
		// denominators far past 10^18; the error stays below the last place.
		while remainder.checked_mul(scale).is_none() {
			remainder >>= 1;
			denominator >>= 1;
		}

		let scaled = remainder * scale;
		let mut fraction = scaled / denominator;
		let twice_remainder = (scaled % denominator) * 2;

		let last_digit = if decimal_places == 0 { whole } else { fraction };
		if twice_remainder > denominator
			|| (twice_remainder == denominator && last_digit % 2 == 1)
		{
			fraction += 1;
		}

		let rounded = whole.checked_mul(scale)?.checked_add(fraction)?;
		let rounded = i128::try_from(rounded).ok()?;
		Some(Self::from_frac(
			if self.is_negative() { -rounded } else { rounded },
			scale as i128,
		))
	}

	/// The number of decimal places needed to write this value exactly, or
	/// None when it repeats forever (the denominator has a prime factor other
	/// than 2 or 5).
	pub fn exact_places(&self) -> Option<u32> {
		let mut rest = self.denominator;
		let mut twos = 0;
		let mut fives = 0;
		while rest % 2 == 0 {
			rest /= 2;
			twos += 1;
		}
		while rest % 5 == 0 {
			rest /= 5;
			fives += 1;
		}

		let places = twos.max(fives);
		if rest == 1 && places <= Self::MAX_PRECISION {
			Some(places)
		} else {
			None
		}
	}

	/// Lossless textual form used for storage: a plain decimal when the value
	/// terminates, else `numerator/denominator`. Parses back through
	/// `from_str` to the identical value.
	pub fn to_exact_string(&self) -> String {
		match self.exact_places() {
			Some(places) => self.render(places, false),
			None => format!("{}/{}", self.numerator, self.denominator),
		}
	}

	/// Writes the value rounded to `decimal_places`, optionally grouping the
	/// integer part with thousands separators.
	fn render(&self, decimal_places: u32, group: bool) -> String {
		let decimal_places = decimal_places.min(Self::MAX_PRECISION);
		let rounded = self.round(decimal_places);
		let scale = 10u128.pow(decimal_places);

		// The rounded denominator always divides the scale
		let numerator = rounded.numerator.unsigned_abs();
		let denominator = rounded.denominator as u128;
		let fraction = (numerator % denominator) * (scale / denominator);

		let mut int_str = (numerator / denominator).to_string();
		if group {
			let mut i = int_str.len() as isize - 3;
			while i > 0 {
				int_str.insert(i as usize, ',');
				i -= 3;
			}
		}

		let body = if decimal_places == 0 {
			int_str
		} else {
			format!(
				"{}.{:0width$}",
				int_str,
				fraction,
				width = decimal_places as usize
			)
		};

		if rounded.is_negative() {
			format!("-{}", body)
		} else {
			body
		}
	}

	/// Reduces the fraction to lowest terms and moves the sign onto the
	/// numerator. Called after every operation to keep values canonical and
	/// to delay overflow.
	fn reduce(&mut self) {
		if self.denominator < 0 {
			self.numerator = -self.numerator;
			self.denominator = -self.denominator;
		}

		let gcd = Self::gcd(
			self.numerator.unsigned_abs(),
			self.denominator.unsigned_abs(),
		) as i128;
		if gcd > 1 {
			self.numerator /= gcd;
			self.denominator /= gcd;
		}

		if self.numerator == 0 {
			self.denominator = 1;
		}
	}

	/// Applies `op` exactly when the result fits in an i128 fraction.
	/// Otherwise both operands are rounded to the most decimal places that
	/// let it fit, so a long sum of unrelated fractions (one unit price per
	/// lot, say) stays accurate to 18 places.
	fn combine<F>(self, rhs: Self, op: F) -> Self
	where
		F: Fn(Self, Self) -> Option<Self>,
	{
		op(self, rhs)
			.or_else(|| {
				(0..=Self::MAX_PRECISION)
					.rev()
					.find_map(|p| op(self.round(p), rhs.round(p)))
			})
			.unwrap_or_else(|| {
				panic!("Quant overflow combining {} and {}", self, rhs)
			})
	}

	fn checked_sum(self, rhs: Self) -> Option<Self> {
		let gcd = Self::gcd(self.denominator as u128, rhs.denominator as u128)
			as i128;
		let lcm = (self.denominator / gcd).checked_mul(rhs.denominator)?;

		let left = self.numerator.checked_mul(lcm / self.denominator)?;
		let right = rhs.numerator.checked_mul(lcm / rhs.denominator)?;
		Some(Self::from_frac(left.checked_add(right)?, lcm))
	}

	fn checked_product(self, rhs: Self) -> Option<Self> {
		// cross-reduce first to delay overflow
		let gcd_a = Self::gcd(
			self.numerator.unsigned_abs(),
			rhs.denominator.unsigned_abs(),
		)
		.max(1) as i128;
		let gcd_b = Self::gcd(
			rhs.numerator.unsigned_abs(),
			self.denominator.unsigned_abs(),
		)
		.max(1) as i128;

		Some(Self::from_frac(
			(self.numerator / gcd_a).checked_mul(rhs.numerator / gcd_b)?,
			(self.denominator / gcd_b).checked_mul(rhs.denominator / gcd_a)?,
		))
	}

	/// Orders two non-negative fractions without multiplying anything, by
	/// comparing whole parts and then the reciprocals of what is left.
	fn cmp_magnitudes(
		mut a: (u128, u128),
		mut b: (u128, u128),
	) -> Ordering {
		loop {
			let (whole_a, rest_a) = (a.0 / a.1, a.0 % a.1);
			let (whole_b, rest_b) = (b.0 / b.1, b.0 % b.1);
			if whole_a != whole_b {
				return whole_a.cmp(&whole_b);
			}

			match (rest_a == 0, rest_b == 0) {
				(true, true) => return Ordering::Equal,
				(true, false) => return Ordering::Less,
				(false, true) => return Ordering::Greater,
				// rest_a/a.1 < rest_b/b.1 exactly when b.1/rest_b < a.1/rest_a
				(false, false) => (a, b) = ((b.1, rest_b), (a.1, rest_a)),
			}
		}
	}

	/// Euclid's algorithm
	fn gcd(mut a: u128, mut b: u128) -> u128 {
		while b != 0 {
			let temp = b;
			b = a % b;
			a = temp;
		}
		a
	}
}

impl Default for Quant {
	fn default() -> Self {
		Self::zero()
	}
}

impl FromStr for Quant {
	type Err = Error;

	/// Accepts plain decimals ("150", "-12.50", ".5", "+3") and the exact
	/// fraction form written by `to_exact_string` ("1/3").
	fn from_str(input: &str) -> Result<Self, Self::Err> {
		let input = input.trim();

		if let Some((num, den)) = input.split_once('/') {
			let numerator = num
				.trim()
				.parse::<i128>()
				.map_err(|_| anyhow!("Invalid number: {}", input))?;
			let denominator = den
				.trim()
				.parse::<i128>()
				.map_err(|_| anyhow!("Invalid number: {}", input))?;
			if denominator == 0 {
				bail!("Invalid number: {} has a zero denominator", input)
			}
			return Ok(Self::from_frac(numerator, denominator));
		}

		let (is_negative, body) = match input.strip_prefix('-') {
			Some(rest) => (true, rest),
			None => (false, input.strip_prefix('+').unwrap_or(input)),
		};

		let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));
		if whole.is_empty() && fraction.is_empty() {
			bail!("Invalid number: '{}'", input)
		}
		if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit())
		{
			bail!("Invalid number: '{}'", input)
		}

		let places = fraction.len() as u32;
		if places > Self::MAX_PRECISION {
			bail!(
				"Invalid number: {} has more than {} decimal places",
				input,
				Self::MAX_PRECISION
			)
		}

		let scale = 10i128.pow(places);
		let whole_value = match whole {
			"" => 0,
			w => w.parse::<i128>()?,
		};
		let fraction_value = match fraction {
			"" => 0,
			f => f.parse::<i128>()?,
		};

		let numerator = whole_value
			.checked_mul(scale)
			.and_then(|w| w.checked_add(fraction_value))
			.ok_or_else(|| anyhow!("Number too large: {}", input))?;

		Ok(Self::from_frac(
			if is_negative { -numerator } else { numerator },
			scale,
		))
	}
}

impl fmt::Display for Quant {
	/// `{:.N}` rounds to N places; a bare `{}` writes the exact decimal when
	/// there is one. Either way the integer part is grouped by thousands.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let places = match f.precision() {
			Some(p) => (p as u32).min(Self::MAX_PRECISION),
			None => self
				.exact_places()
				.unwrap_or(Self::DEFAULT_RENDER_PRECISION),
		};
		write!(f, "{}", self.render(places, true))
	}
}

impl Serialize for Quant {
	fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
		s.serialize_str(&self.to_exact_string())
	}
}

impl<'de> Deserialize<'de> for Quant {
	fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
		d.deserialize_any(QuantVisitor)
	}
}

struct QuantVisitor;

impl Visitor<'_> for QuantVisitor {
	type Value = Quant;

	fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "a decimal string, a fraction string or an integer")
	}

	fn visit_str<E: de::Error>(self, v: &str) -> Result<Quant, E> {
		Quant::from_str(v).map_err(E::custom)
	}

	fn visit_i64<E: de::Error>(self, v: i64) -> Result<Quant, E> {
		Ok(Quant::from(v))
	}

	fn visit_u64<E: de::Error>(self, v: u64) -> Result<Quant, E> {
		Ok(Quant::from(v))
	}
}

// -----------------
// -- BOILERPLATE --
// -----------------

impl From<u64> for Quant {
	fn from(value: u64) -> Self {
		Self::from_int(value as i128)
	}
}

impl From<i64> for Quant {
	fn from(value: i64) -> Self {
		Self::from_int(value as i128)
	}
}

impl Add for Quant {
	type Output = Self;

	fn add(self, rhs: Self) -> Self::Output {
		if self.is_zero() {
			return rhs;
		}
		if rhs.is_zero() {
			return self;
		}

		self.combine(rhs, Self::checked_sum)
	}
}

impl AddAssign for Quant {
	fn add_assign(&mut self, rhs: Self) {
		*self = *self + rhs;
	}
}

impl Sum for Quant {
	fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
		iter.fold(Quant::zero(), |acc, quant| acc + quant)
	}
}

impl Sub for Quant {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self::Output {
		self + (-rhs)
	}
}

impl SubAssign for Quant {
	fn sub_assign(&mut self, rhs: Self) {
		*self = *self - rhs;
	}
}

impl Mul for Quant {
	type Output = Self;

	fn mul(self, rhs: Self) -> Self::Output {
		self.combine(rhs, Self::checked_product)
	}
}

impl Mul<u64> for Quant {
	type Output = Self;

	fn mul(self, rhs: u64) -> Self::Output {
		self * Quant::from(rhs)
	}
}

impl Div for Quant {
	type Output = Self;

	fn div(self, rhs: Self) -> Self::Output {
		if rhs.is_zero() {
			panic!("Attempt to divide by zero");
		}

		self * Self::from_frac(rhs.denominator, rhs.numerator)
	}
}

impl Div<u64> for Quant {
	type Output = Self;

	fn div(self, rhs: u64) -> Self::Output {
		self / Quant::from(rhs)
	}
}

impl Neg for Quant {
	type Output = Self;

	fn neg(self) -> Self::Output {
		Self {
			numerator: -self.numerator,
			..self
		}
	}
}

impl PartialOrd for Quant {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Quant {
	fn cmp(&self, other: &Self) -> Ordering {
		let sign = self.numerator.signum();
		if sign != other.numerator.signum() {
			return sign.cmp(&other.numerator.signum());
		}

		let magnitudes = Self::cmp_magnitudes(
			(self.numerator.unsigned_abs(), self.denominator as u128),
			(other.numerator.unsigned_abs(), other.denominator as u128),
		);
		if sign < 0 {
			magnitudes.reverse()
		} else {
			magnitudes
		}
	}
}
