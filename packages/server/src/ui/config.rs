//! Command line configuration.

use std::time::Duration;

use clap::Parser;

/// Real-time staff messaging and presence server
#[derive(Debug, Clone, Parser)]
#[command(name = "staffchat-server", version, about)]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 4001)]
    pub port: u16,

    /// Give up on a socket write after this many milliseconds and drop the connection
    #[arg(long, default_value_t = 10_000)]
    pub write_timeout_ms: u64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Start with an empty chat store instead of the demo roster
    #[arg(long)]
    pub no_demo_seed: bool,
}

impl ServerArgs {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // テスト項目: 引数なしでデフォルト値が使われる
        // when (操作):
        let args = ServerArgs::try_parse_from(["staffchat-server"]).unwrap();

        // then (期待する結果):
        assert_eq!(args.address(), "127.0.0.1:4001");
        assert_eq!(args.write_timeout(), Duration::from_secs(10));
        assert_eq!(args.log_level, "info");
        assert!(!args.no_demo_seed);
    }

    #[test]
    fn test_overrides() {
        // テスト項目: 引数で各値を上書きできる
        // when (操作):
        let args = ServerArgs::try_parse_from([
            "staffchat-server",
            "--host",
            "0.0.0.0",
            "-p",
            "9000",
            "--write-timeout-ms",
            "250",
            "--no-demo-seed",
        ])
        .unwrap();

        // then (期待する結果):
        assert_eq!(args.address(), "0.0.0.0:9000");
        assert_eq!(args.write_timeout(), Duration::from_millis(250));
        assert!(args.no_demo_seed);
    }
}
