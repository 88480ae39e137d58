use url::Url;

const GITHUB_HOSTS: [&str; 2] = ["github.com", "www.github.com"];
const LINKEDIN_HOSTS: [&str; 2] = ["linkedin.com", "www.linkedin.com"];

fn path_segments(raw: &str, hosts: &[&str]) -> Option<Vec<String>> {
    let url = Url::parse(raw.trim()).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    if !hosts.contains(&url.host_str()?) {
        return None;
    }
    Some(
        url.path_segments()?
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// `https://github.com/<user>[/...]` -> `<user>`.
pub fn extract_github_username(github_url: &str) -> Option<String> {
    path_segments(github_url, &GITHUB_HOSTS)?.into_iter().next()
}

/// `https://www.linkedin.com/in/<id>[/...]` -> `<id>`.
pub fn extract_linkedin_username(linkedin_url: &str) -> Option<String> {
    let segments = path_segments(linkedin_url, &LINKEDIN_HOSTS)?;
    match segments.as_slice() {
        [prefix, id, ..] if prefix == "in" => Some(id.clone()),
        _ => None,
    }
}
