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
use crate::config::config_file::Config;
use anyhow::{anyhow, Context, Error};
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "stockr";

/// Locates and reads the files the tool works with: the config file and the
/// product store.
pub struct Filesystem {
	config_dir: Option<PathBuf>,
	data_dir: Option<PathBuf>,
}

impl Filesystem {
	pub fn new() -> Self {
		Self {
			config_dir: dirs::home_dir().map(|home| home.join(".config")),
			data_dir: dirs::data_dir(),
		}
	}

	/// Fetches the config from the given path, or the default path if none.
	/// A missing default config is created empty; a missing custom one is an
	/// error.
	pub fn get_config(
		&self,
		custom_config_path: Option<&String>,
	) -> Result<Config, Error> {
		let config_path = match custom_config_path {
			Some(p) => PathBuf::from(p),
			None => self
				.config_dir
				.as_ref()
				.ok_or_else(|| anyhow!("Unable to determine home directory"))?
				.join(APP_DIR)
				.join("config.toml"),
		};

		if !config_path.exists() && custom_config_path.is_none() {
			if let Some(parent) = config_path.parent() {
				fs::create_dir_all(parent)?;
			}
			File::create(&config_path)?;
			debug!(path = %config_path.display(), "created empty config");
		}

		let content = fs::read_to_string(&config_path).with_context(|| {
			format!("failed to read config {}", config_path.display())
		})?;
		let config: Config = toml::from_str(&content)
			.map_err(|e| anyhow!("failed to parse config: {}", e))?;
		config.validate()?;
		Ok(config)
	}

	/// Where the product store is: the command line wins, then the config,
	/// then the platform data directory.
	pub fn data_path(
		&self,
		custom_data_path: Option<&String>,
		config: &Config,
	) -> Result<PathBuf, Error> {
		if let Some(p) = custom_data_path.or(config.data_file.as_ref()) {
			return Ok(PathBuf::from(p));
		}

		self.data_dir
			.as_ref()
			.map(|dir| dir.join(APP_DIR).join("inventory.json"))
			.ok_or_else(|| anyhow!("Unable to determine data directory"))
	}

	/// Reads a whole file, or None if it does not exist yet.
	pub fn read_if_exists(&self, path: &Path) -> Result<Option<String>, Error> {
		if !path.exists() {
			return Ok(None);
		}
		let content = fs::read_to_string(path)
			.with_context(|| format!("failed to read {}", path.display()))?;
		Ok(Some(content))
	}

	/// Writes to a sibling temporary file first and renames it over the
	/// target, so a failed write never leaves a half-written store behind.
	pub fn write_atomic(&self, path: &Path, content: &str) -> Result<(), Error> {
		if let Some(parent) = path.parent() {
			if !parent.as_os_str().is_empty() {
				fs::create_dir_all(parent)?;
			}
		}

		let mut tmp = path.as_os_str().to_owned();
		tmp.push(".tmp");
		let tmp = PathBuf::from(tmp);

		let mut file = File::create(&tmp)
			.with_context(|| format!("failed to write {}", tmp.display()))?;
		file.write_all(content.as_bytes())?;
		file.sync_all()?;
		fs::rename(&tmp, path)
			.with_context(|| format!("failed to replace {}", path.display()))?;
		Ok(())
	}
}
