use clap::Parser;
use nixbundle::{BundleError, Cli, NixBundle, OutputFormatter, OutputMode, UserFriendlyError};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let bundle = match NixBundle::from_cli(&cli) {
        Ok(bundle) => bundle,
        Err(e) => {
            print_startup_error(&e);
            return e.exit_code();
        }
    };

    if cli.dry_run {
        return handle_dry_run(&bundle);
    }

    match bundle.export() {
        Ok(report) => {
            bundle.output_formatter().print_export_report(&report);
            0
        }
        Err(e) => {
            bundle.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "nixbundle.toml".to_string());

    match NixBundle::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  nixbundle --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(bundle: &NixBundle) -> i32 {
    let formatter = bundle.output_formatter();
    let config = bundle.config();

    formatter.print_rule("DRY RUN - nothing will be written");
    formatter.info(&format!("Root: {}", config.export.root.display()));
    formatter.info(&format!("Output: {}", config.export.output.display()));
    formatter.info(&format!("Extension: {}", config.export.extension));
    if !config.walk.exclude_dirs.is_empty() {
        formatter.info(&format!(
            "Excluded directories: {}",
            config.walk.exclude_dirs.join(", ")
        ));
    }
    if config.export.output.exists() {
        formatter.warning("Output file exists and would be overwritten");
    }
    formatter.print_rule("");

    match bundle.plan() {
        Ok(files) => {
            formatter.print_plan(&files);
            0
        }
        Err(e) => {
            bundle.handle_error(&e);
            e.exit_code()
        }
    }
}

fn print_startup_error(error: &BundleError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use nixbundle::Config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::try_parse_from([
            "nixbundle",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[export]"));
    }

    #[test]
    fn test_dry_run_mode() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("init.lua"), "return {}\n").unwrap();

        let mut config = Config::default();
        config.export.root = temp_dir.path().to_path_buf();
        config.export.output = temp_dir.path().join("output.lua");
        let bundle = NixBundle::new(config, OutputMode::Plain, 0, true);

        assert_eq!(handle_dry_run(&bundle), 0);
        assert!(!temp_dir.path().join("output.lua").exists());
    }
}
