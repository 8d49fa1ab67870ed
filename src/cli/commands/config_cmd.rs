//! Configuration management commands.

use console::style;

use lexishield::Config;

use crate::cli::icons::dim_arrow;

/// Print the effective configuration.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    let source = config
        .source_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults (no config file found)".to_string());
    eprintln!("{} Source: {}", dim_arrow(), style(source).dim());
    if config.backend.is_default() {
        eprintln!("{} Backend: built-in defaults", dim_arrow());
    }

    print!("{}", config.to_toml()?);
    Ok(())
}
