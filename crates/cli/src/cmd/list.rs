use anyhow::Result;

use wsbuild_lib::BuildConfig;

use crate::output::{OutputFormat, print_json, symbols};

/// Print the registry in build order.
pub fn cmd_list(config: &BuildConfig, format: OutputFormat) -> Result<()> {
  if format.is_json() {
    return print_json(&config.registry);
  }

  for entry in &config.registry {
    println!(
      "{} {} {}",
      config.source_dir.join(&entry.file).display(),
      symbols::ARROW,
      config.output_dir.join(&entry.output).display()
    );
  }
  Ok(())
}
