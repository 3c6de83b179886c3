use chrono::Local;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\-.]").expect("static regex is valid"));
static DASH_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("static regex is valid"));

/// Builds a filesystem-safe base name for auto-generated output paths
///
/// The name is `<host-without-www>[-<path>]-<YYYYmmdd-HHMMSS>`, where path
/// separators become dashes and any other character outside `[A-Za-z0-9_.-]`
/// is replaced by a dash. Repeated dashes collapse to one.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use web_scraper::url::output_base_name;
///
/// let url = Url::parse("https://www.example.com/docs/intro").unwrap();
/// assert!(output_base_name(&url).starts_with("example.com-docs-intro-"));
/// ```
pub fn output_base_name(url: &Url) -> String {
    let stamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
    format!("{}-{}", slug_for_url(url), stamp)
}

/// The timestamp-free part of [`output_base_name`]
pub fn slug_for_url(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    let path = url.path().trim_matches('/').replace('/', "-");

    let name = if path.is_empty() {
        host.to_string()
    } else {
        format!("{}-{}", host, path)
    };

    let name = UNSAFE_CHARS.replace_all(&name, "-");
    let name = DASH_RUNS.replace_all(&name, "-");
    let name = name.trim_matches('-');

    if name.is_empty() {
        "page".to_string()
    } else {
        name.to_string()
    }
}
