use anyhow::{anyhow, Result};

pub fn validate_socket_addr(field: &str, value: &str) -> Result<()> {
    value
        .parse::<std::net::SocketAddr>()
        .map(|_| ())
        .map_err(|err| anyhow!("invalid {}: {}", field, err))
}

pub fn validate_http_url(field: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{} must not be empty", field));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(anyhow!("{} must be an http(s) url", field));
    }
    Ok(())
}

pub fn validate_postgres_url(value: &str) -> Result<()> {
    let trimmed = value.trim();
    if !trimmed.starts_with("postgres://") && !trimmed.starts_with("postgresql://") {
        return Err(anyhow!("database_url must start with postgres:// or postgresql://"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_need_a_known_scheme() {
        assert!(validate_http_url("public_base_url", "https://shore.example").is_ok());
        assert!(validate_http_url("public_base_url", "shore.example").is_err());
        assert!(validate_postgres_url("postgres://app@localhost/shoreline").is_ok());
        assert!(validate_postgres_url("mysql://localhost/db").is_err());
        assert!(validate_socket_addr("bind_addr", "0.0.0.0:80").is_ok());
        assert!(validate_socket_addr("bind_addr", "localhost").is_err());
    }
}
