//! Command-line conventions shared by the Pinmap binaries.

use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects, Style},
};

/// Read when `--config` is not passed on the command line.
pub const CONFIG_ENV: &str = "PINMAP_CONFIG";

/// `<package version>-<git sha>-<target triple>`, stamped by the workspace build script.
pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

const HEADING: Style = AnsiColor::Green.on_default().effects(Effects::BOLD);
const FLAG: Style = AnsiColor::Cyan.on_default().effects(Effects::BOLD);

pub fn styles() -> Styles {
	Styles::styled()
		.header(HEADING)
		.usage(HEADING)
		.literal(FLAG)
		.valid(FLAG)
		.placeholder(AnsiColor::Yellow.on_default())
		.invalid(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
		.error(AnsiColor::Red.on_default().effects(Effects::BOLD))
}
