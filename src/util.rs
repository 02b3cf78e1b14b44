use std::path::PathBuf;

/// Expands a leading `~` in a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Joins an endpoint name onto the API base URL with exactly one `/` between them.
pub fn join_endpoint(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_endpoint() {
        assert_eq!(
            join_endpoint("http://localhost:8010/api/", "get_vip_ids"),
            "http://localhost:8010/api/get_vip_ids"
        );
        assert_eq!(
            join_endpoint("http://localhost:8010/api", "/get_vip_ids"),
            "http://localhost:8010/api/get_vip_ids"
        );
    }

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("/etc/rconsole.json"), PathBuf::from("/etc/rconsole.json"));
        assert_eq!(expand_tilde("relative/x.json"), PathBuf::from("relative/x.json"));
    }
}
