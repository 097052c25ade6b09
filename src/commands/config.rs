//! Config command handlers: show effective configuration.

use anyhow::Result;

use crate::app_config::LoadedConfig;
use crate::settings::Settings;

pub fn run_config_show_command(settings: &Settings, loaded_config: &LoadedConfig) -> Result<()> {
    for line in render_config_lines(settings, loaded_config) {
        println!("{line}");
    }
    Ok(())
}

fn render_config_lines(settings: &Settings, loaded_config: &LoadedConfig) -> Vec<String> {
    let resolved_path = loaded_config.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    let config_file = if loaded_config.loaded_from_file() {
        "loaded"
    } else {
        "not found (using defaults)"
    };
    let token = if settings.token.is_some() {
        "<redacted>"
    } else {
        "<none>"
    };

    vec![
        format!("config_path = {resolved_path}"),
        format!("config_file = {config_file}"),
        format!("root_url = {}", settings.root_url),
        format!("token = {token}"),
        format!("suffixes = {}", settings.suffixes.join(",")),
        format!("concurrency = {}", settings.concurrency),
        format!("max_retries = {}", settings.max_retries),
        format!("max_depth = {}", settings.max_depth),
        format!("connect_timeout_secs = {}", settings.connect_timeout_secs),
        format!("read_timeout_secs = {}", settings.read_timeout_secs),
        format!("bind = {}", settings.bind),
    ]
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::cli::CrawlArgs;

    #[test]
    fn test_render_config_lines_redacts_token() {
        let args = CrawlArgs {
            token: Some("ghp_supersecret".to_string()),
            ..CrawlArgs::default()
        };
        let settings = Settings::resolve(&args, None).unwrap();
        let lines = render_config_lines(&settings, &LoadedConfig::default());

        assert!(lines.iter().all(|l| !l.contains("ghp_supersecret")));
        assert!(lines.contains(&"token = <redacted>".to_string()));
        assert!(lines.contains(&"config_path = <unresolved>".to_string()));
        assert!(lines.contains(&"config_file = not found (using defaults)".to_string()));
        assert!(lines.contains(&"suffixes = .js,.ts".to_string()));
    }

    #[test]
    fn test_render_config_lines_without_token() {
        let settings = Settings::resolve(&CrawlArgs::default(), None).unwrap();
        let loaded = LoadedConfig {
            path: Some(PathBuf::from("/etc/letterfreq.toml")),
            config: Some(crate::app_config::FileConfig::default()),
        };
        let lines = render_config_lines(&settings, &loaded);

        assert!(lines.contains(&"token = <none>".to_string()));
        assert!(lines.contains(&"config_path = /etc/letterfreq.toml".to_string()));
        assert!(lines.contains(&"config_file = loaded".to_string()));
    }
}
