use crate::config::toml_config::AppConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "uranium-predictor")]
#[command(version)]
#[command(about = "Predict uranium concentration in Punjab groundwater from a location")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Model artifact path (overrides [model] path)
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the prediction form over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Predict a single location
    Predict {
        #[arg(long)]
        district: String,

        #[arg(long, allow_hyphen_values = true)]
        latitude: String,

        #[arg(long, allow_hyphen_values = true)]
        longitude: String,
    },

    /// Predict every row of a district,latitude,longitude CSV file
    Batch {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the known districts
    Districts,
}

impl CliConfig {
    /// 合併設定檔與命令列參數 (命令列優先)
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(model) = &self.model {
            config.model.path = model.clone();
        }
        if self.verbose {
            config.logging.verbose = true;
        }
        if self.log_json {
            config.logging.json = true;
        }
        if let Command::Serve { host, port } = &self.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_predict() {
        let cli = CliConfig::try_parse_from([
            "uranium-predictor",
            "predict",
            "--district",
            "Ludhiana",
            "--latitude",
            "30.9",
            "--longitude",
            "75.85",
        ])
        .unwrap();

        match cli.command {
            Command::Predict {
                district,
                latitude,
                longitude,
            } => {
                assert_eq!(district, "Ludhiana");
                assert_eq!(latitude, "30.9");
                assert_eq!(longitude, "75.85");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            b"[model]\npath = \"from-file.json\"\n[server]\nport = 9000\nhost = \"0.0.0.0\"\n",
        )
        .unwrap();
        let config_path = file.path().to_str().unwrap().to_string();

        let cli = CliConfig::try_parse_from([
            "uranium-predictor",
            "serve",
            "--port",
            "9100",
            "--config",
            config_path.as_str(),
            "--model",
            "from-cli.json",
        ])
        .unwrap();

        let config = cli.resolve().unwrap();
        assert_eq!(config.model.path, PathBuf::from("from-cli.json"));
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_defaults_without_file() {
        let cli = CliConfig::try_parse_from(["uranium-predictor", "-v", "districts"]).unwrap();
        let config = cli.resolve().unwrap();
        assert!(config.logging.verbose);
        assert_eq!(config.model.path, PathBuf::from("models/model.json"));
    }
}
