//! Operator guidance printed after a successful run.

use crate::config::BootstrapConfig;
use crate::ui::UserInterface;

/// Lines of the completion banner.
pub fn completion_lines(config: &BootstrapConfig) -> Vec<String> {
    let tool = &config.tool.executable;
    let ext = &config.models.extension;

    let mut lines = vec![
        "Activate the environment:".to_string(),
        format!("  {} activate {}", tool, config.environment.name),
        String::new(),
        "Place model weights in:".to_string(),
    ];
    for category in &config.models.categories {
        lines.push(format!(
            "  {}/*.{}",
            config.models.root.join(category).display(),
            ext
        ));
    }
    lines.extend([
        String::new(),
        "Start the API server:".to_string(),
        format!("  python {}", config.server.entrypoint),
        String::new(),
        "Check that it is up:".to_string(),
        format!("  curl {}", config.server.health_url()),
        String::new(),
        "Deactivate when done:".to_string(),
        format!("  {} deactivate", tool),
    ]);
    lines
}

/// Print the completion banner.
pub fn show_banner(ui: &mut dyn UserInterface, config: &BootstrapConfig) {
    ui.show_header("Setup complete");
    for line in completion_lines(config) {
        ui.message(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    #[test]
    fn default_banner_contents() {
        let lines = completion_lines(&BootstrapConfig::default());
        assert!(lines.contains(&"  conda activate tree-detection".to_string()));
        assert!(lines.iter().any(|l| l.contains("summer") && l.ends_with("*.pt")));
        assert!(lines.iter().any(|l| l.contains("winter") && l.ends_with("*.pt")));
        assert!(lines.contains(&"  python run.py".to_string()));
        assert!(lines.contains(&"  curl http://localhost:5003/health".to_string()));
        assert!(lines.contains(&"  conda deactivate".to_string()));
    }

    #[test]
    fn banner_follows_configured_tool() {
        let mut config = BootstrapConfig::default();
        config.tool.executable = "mamba".into();
        config.environment.name = "trees-dev".into();
        let lines = completion_lines(&config);
        assert!(lines.contains(&"  mamba activate trees-dev".to_string()));
    }

    #[test]
    fn show_banner_writes_through_ui() {
        let mut ui = MockUI::new();
        show_banner(&mut ui, &BootstrapConfig::default());
        assert_eq!(ui.headers(), ["Setup complete".to_string()]);
        assert!(ui.has_message("python run.py"));
    }
}
