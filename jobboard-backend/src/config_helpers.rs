use std::net::{IpAddr, Ipv6Addr, SocketAddr};

use jobboard_db::DbConnectionConfig;

/// Build database connection config from application config.
pub fn database_config_from_config(cfg: &jobboard_config::Config) -> DbConnectionConfig {
    DbConnectionConfig::new(&cfg.database.url).with_max_connections(cfg.database.max_connections)
}

/// Parse host:port into a SocketAddr, with fallback to 0.0.0.0.
pub fn parse_bind_address(host: &str, port: u16) -> SocketAddr {
    if host.eq_ignore_ascii_case("localhost") {
        return SocketAddr::from(([127, 0, 0, 1], port));
    }
    host.parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, port))
        .or_else(|_| host.parse::<SocketAddr>())
        .or_else(|_| {
            host.trim_start_matches('[')
                .trim_end_matches(']')
                .parse::<Ipv6Addr>()
                .map(|ip| SocketAddr::new(IpAddr::V6(ip), port))
        })
        .unwrap_or_else(|_| {
            tracing::warn!(%host, "unparseable bind host, listening on all interfaces");
            SocketAddr::from(([0, 0, 0, 0], port))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_address_forms() {
        assert_eq!(
            parse_bind_address("127.0.0.1", 5000),
            SocketAddr::from(([127, 0, 0, 1], 5000))
        );
        assert_eq!(parse_bind_address("[::1]", 80).to_string(), "[::1]:80");
        assert_eq!(
            parse_bind_address("localhost", 8080),
            SocketAddr::from(([127, 0, 0, 1], 8080))
        );
        assert_eq!(
            parse_bind_address("not a host", 5000),
            SocketAddr::from(([0, 0, 0, 0], 5000))
        );
    }
}
