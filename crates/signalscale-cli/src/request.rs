//! Request file loading.

use std::path::Path;

use anyhow::Context;
use signalscale_core::AnalysisRequest;

/// Read an [`AnalysisRequest`] from `path`. `.yaml`/`.yml` files are parsed
/// as YAML, anything else as JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub fn load_request(path: &Path) -> anyhow::Result<AnalysisRequest> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request file {}", path.display()))?;
    parse_request(&raw, is_yaml(path))
        .with_context(|| format!("failed to parse request file {}", path.display()))
}

pub fn parse_request(raw: &str, yaml: bool) -> anyhow::Result<AnalysisRequest> {
    let request = if yaml {
        serde_yaml::from_str(raw)?
    } else {
        serde_json::from_str(raw)?
    };
    Ok(request)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn json_request_gets_defaults() {
        let req = parse_request(r#"{"brand": {"name": "Acme"}}"#, false).unwrap();
        assert_eq!(req.brand.name, "Acme");
        assert_eq!(req.mode, "all");
        assert_eq!(req.window_days, 7);
    }

    #[test]
    fn yaml_request_parses() {
        let raw = "brand:\n  name: Acme\ncompetitors:\n  - name: Beta\nmode: peer_tracker\n";
        let req = parse_request(raw, true).unwrap();
        assert_eq!(req.competitors[0].name, "Beta");
        assert_eq!(req.mode, "peer_tracker");
    }

    #[test]
    fn extension_picks_format() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "brand:\n  name: Acme").unwrap();
        let req = load_request(file.path()).unwrap();
        assert_eq!(req.brand.name, "Acme");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_request(Path::new("/nonexistent/request.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/request.json"));
    }
}
