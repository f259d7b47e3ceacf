//! Config command - show the active configuration

use crate::{NslslError, cli::ConfigCommands, config::NslslConfig, output::OutputWriter};
use std::path::Path;

type Result<T> = std::result::Result<T, NslslError>;

/// Execute a config subcommand
///
/// `path` is the file the configuration was loaded from.
///
/// # Errors
///
/// Returns `NslslError::Config` if the configuration cannot be serialized.
pub fn execute(
    config: &NslslConfig,
    path: &Path,
    command: &ConfigCommands,
    output: &dyn OutputWriter,
) -> Result<()> {
    match command {
        ConfigCommands::Show => output.write(config.to_toml()?.trim_end()),
        ConfigCommands::Path => output.write(&path.display().to_string()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ToastWriter;

    #[test]
    fn test_show_and_path() {
        let out = ToastWriter::new();
        let config = NslslConfig::default();
        let path = Path::new("/tmp/nslsl/config.toml");

        execute(&config, path, &ConfigCommands::Show, &out).unwrap();
        let shown = out.latest_message().unwrap().1;
        let parsed: NslslConfig = toml::from_str(&shown).unwrap();
        assert_eq!(parsed, config);

        execute(&config, path, &ConfigCommands::Path, &out).unwrap();
        assert_eq!(out.latest_message().unwrap().1, "/tmp/nslsl/config.toml");
    }
}
