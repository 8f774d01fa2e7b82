//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "batcha")]
#[command(about = "Declarative AWS Batch Job Definition deployment tool")]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Location of the batcha config file
#[derive(Args, Debug, Clone)]
pub struct ConfigArg {
    /// Path to config YAML file
    #[arg(long, env = "BATCHA_CONFIG")]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate config and job definition from an existing AWS Batch definition
    Init {
        /// Name of the AWS Batch job definition to fetch
        #[arg(long)]
        job_definition_name: String,

        /// AWS region (falls back to AWS_REGION)
        #[arg(long)]
        region: Option<String>,

        /// Output directory for generated files
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },

    /// Register an AWS Batch Job Definition
    Register {
        #[command(flatten)]
        config: ConfigArg,

        /// Render template and print JSON without registering
        #[arg(long)]
        dry_run: bool,
    },

    /// Render and print the job definition template
    Render {
        #[command(flatten)]
        config: ConfigArg,
    },

    /// Show differences between local and remote job definition
    Diff {
        #[command(flatten)]
        config: ConfigArg,
    },

    /// Show the current status of the job definition on AWS
    Status {
        #[command(flatten)]
        config: ConfigArg,
    },

    /// Submit a job using the latest active job definition
    Run {
        #[command(flatten)]
        config: ConfigArg,

        /// AWS Batch job queue name (overrides config)
        #[arg(long)]
        job_queue: Option<String>,

        /// Job name (defaults to job definition name)
        #[arg(long)]
        job_name: Option<String>,

        /// Parameter overrides (key=value, repeatable)
        #[arg(long = "parameter", value_name = "KEY=VALUE", value_parser = parse_parameter)]
        parameters: Vec<(String, String)>,

        /// Wait for the job to complete
        #[arg(long)]
        wait: bool,
    },

    /// Fetch CloudWatch logs for a Batch job
    Logs {
        #[command(flatten)]
        config: ConfigArg,

        /// AWS Batch job ID (if omitted, finds the latest job)
        #[arg(long)]
        job_id: Option<String>,

        /// AWS Batch job queue name (overrides config)
        #[arg(long)]
        job_queue: Option<String>,

        /// Follow logs in real time
        #[arg(long, short)]
        follow: bool,

        /// Show logs since duration (e.g. 1h, 30m)
        #[arg(long, value_parser = humantime::parse_duration)]
        since: Option<Duration>,
    },

    /// Validate the job definition template locally
    Verify {
        #[command(flatten)]
        config: ConfigArg,
    },

    /// Print version
    Version,
}

/// Parse a `key=value` parameter; the value may itself contain `=`
pub fn parse_parameter(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("invalid parameter format {:?}, expected key=value", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_parameter() {
        assert_eq!(
            parse_parameter("inputFile=s3://b/k?x=1").unwrap(),
            ("inputFile".to_string(), "s3://b/k?x=1".to_string())
        );
        assert_eq!(
            parse_parameter("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
        assert!(parse_parameter("novalue").is_err());
    }

    #[test]
    fn test_run_arguments() {
        let cli = Cli::try_parse_from([
            "batcha",
            "run",
            "--config",
            "batcha.yml",
            "--parameter",
            "a=1",
            "--parameter",
            "b=2",
            "--wait",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                config,
                parameters,
                wait,
                job_queue,
                ..
            } => {
                assert_eq!(config.config, PathBuf::from("batcha.yml"));
                assert_eq!(parameters.len(), 2);
                assert_eq!(parameters[1], ("b".to_string(), "2".to_string()));
                assert!(wait);
                assert!(job_queue.is_none());
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_logs_since_and_follow() {
        let cli = Cli::try_parse_from([
            "batcha", "logs", "--config", "c.yml", "-f", "--since", "1h30m",
        ])
        .unwrap();
        match cli.command {
            Commands::Logs { follow, since, .. } => {
                assert!(follow);
                assert_eq!(since, Some(Duration::from_secs(5400)));
            }
            _ => panic!("expected logs"),
        }

        assert!(
            Cli::try_parse_from(["batcha", "logs", "--config", "c.yml", "--since", "soon"])
                .is_err()
        );
    }

    #[test]
    fn test_init_defaults() {
        let cli =
            Cli::try_parse_from(["batcha", "init", "--job-definition-name", "hello"]).unwrap();
        match cli.command {
            Commands::Init {
                job_definition_name,
                region,
                output,
            } => {
                assert_eq!(job_definition_name, "hello");
                assert!(region.is_none());
                assert_eq!(output, PathBuf::from("."));
            }
            _ => panic!("expected init"),
        }
        assert!(Cli::try_parse_from(["batcha", "init"]).is_err());
    }
}
