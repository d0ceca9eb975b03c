use clap::Parser;
use std::time::Duration;

/// Upper bound for the sweep settings (one year)
pub const MAX_SWEEP_SECS: u64 = 365 * 24 * 60 * 60;

/// Sign-in form service
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "SIGNIN_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "SIGNIN_PORT", default_value = "3000")]
    pub port: String,

    /// Seconds the success notification stays visible
    #[arg(long, env = "SIGNIN_NOTIFICATION_TIMEOUT_SECS", default_value = "6")]
    pub notification_timeout_secs: u64,

    /// Seconds without activity before a form instance is torn down
    #[arg(
        long,
        env = "SIGNIN_FORM_IDLE_TIMEOUT_SECS",
        default_value = "1800",
        value_parser = clap::value_parser!(u64).range(1..=MAX_SWEEP_SECS)
    )]
    pub form_idle_timeout_secs: u64,

    /// Idle sweep interval in seconds
    #[arg(
        long,
        env = "SIGNIN_SWEEP_INTERVAL_SECS",
        default_value = "300",
        value_parser = clap::value_parser!(u64).range(1..=MAX_SWEEP_SECS)
    )]
    pub sweep_interval_secs: u64,
}

impl Config {
    /// Get the socket address to listen on
    pub fn get_bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the notification auto-dismiss delay
    pub fn get_notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["signin"]).unwrap();
        assert_eq!(config.get_bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.get_notification_timeout(), Duration::from_secs(6));
        assert_eq!(config.form_idle_timeout_secs, 1800);
        assert_eq!(config.sweep_interval_secs, 300);
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::try_parse_from([
            "signin",
            "--port",
            "8080",
            "--notification-timeout-secs",
            "10",
        ])
        .unwrap();
        assert_eq!(config.get_bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.get_notification_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_rejects_zero_sweep_settings() {
        assert!(Config::try_parse_from(["signin", "--sweep-interval-secs", "0"]).is_err());
        assert!(Config::try_parse_from(["signin", "--form-idle-timeout-secs", "0"]).is_err());
    }

    #[test]
    fn test_rejects_oversized_sweep_settings() {
        let too_long = (MAX_SWEEP_SECS + 1).to_string();
        assert!(
            Config::try_parse_from(["signin", "--sweep-interval-secs", too_long.as_str()]).is_err()
        );
        assert!(
            Config::try_parse_from(["signin", "--form-idle-timeout-secs", "18446744073709551615"])
                .is_err()
        );

        let max = MAX_SWEEP_SECS.to_string();
        let config =
            Config::try_parse_from(["signin", "--form-idle-timeout-secs", max.as_str()]).unwrap();
        assert_eq!(config.form_idle_timeout_secs, MAX_SWEEP_SECS);
    }
}
