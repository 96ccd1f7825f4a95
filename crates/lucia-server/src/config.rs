//! CLI and configuration surface for `luciad`.
//!
//! The listen port comes from the positional argument, the `LUCIA_PORT`
//! environment variable, or the fixed default, in that order. The listen
//! host is fixed.

use clap::Parser;

/// Fixed listen address.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 1337;

/// Shared authentication secret presented by returning users.
/// A single static value; credential hardening is out of scope.
pub const SHARED_SECRET: &str = "lucia";

#[derive(Parser)]
#[command(name = "luciad", version, about = "Lucia direct-message chat server")]
pub struct Cli {
    /// Port to listen on.
    #[arg(env = "LUCIA_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Listen address derived from the fixed host and the resolved port.
    pub fn listen_addr(&self) -> String {
        format!("{DEFAULT_HOST}:{}", self.port)
    }

    /// Tracing filter directive for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info",
            1 => "info,lucia_core=debug,lucia_server=debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port_is_1337() {
        let cli = Cli::parse_from(["luciad"]);
        assert_eq!(cli.port, DEFAULT_PORT);
        assert_eq!(cli.listen_addr(), "127.0.0.1:1337");
    }

    #[test]
    fn positional_port_overrides_default() {
        let cli = Cli::parse_from(["luciad", "4242"]);
        assert_eq!(cli.port, 4242);
    }

    #[test]
    fn verbosity_maps_to_filter() {
        assert_eq!(Cli::parse_from(["luciad"]).log_filter(), "info");
        assert_eq!(Cli::parse_from(["luciad", "-q"]).log_filter(), "error");
        assert_eq!(
            Cli::parse_from(["luciad", "-v"]).log_filter(),
            "info,lucia_core=debug,lucia_server=debug"
        );
        assert_eq!(Cli::parse_from(["luciad", "-vv"]).log_filter(), "trace");
    }
}
