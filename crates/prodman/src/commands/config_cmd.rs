//! Config subcommand handlers. None of these touch the backend.

use dialoguer::Input;

use prodman_core::DEFAULT_API_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

fn format_config(cfg: &Config) -> String {
    let mut lines = Vec::new();

    if let Some(ref default) = cfg.default_profile {
        lines.push(format!("default_profile = \"{default}\""));
    }
    lines.push(String::new());
    lines.push("[defaults]".into());
    lines.push(format!("output = \"{}\"", cfg.defaults.output));
    lines.push(format!("color = \"{}\"", cfg.defaults.color));
    lines.push(format!("insecure = {}", cfg.defaults.insecure));

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        lines.push(String::new());
        lines.push(format!("[profiles.{name}]"));
        lines.push(format!("api_url = \"{}\"", p.api_url));
        if let Some(ref origin) = p.media_origin {
            lines.push(format!("media_origin = \"{origin}\""));
        }
        if let Some(ref ca) = p.ca_cert {
            lines.push(format!("ca_cert = \"{}\"", ca.display()));
        }
        if let Some(insecure) = p.insecure {
            lines.push(format!("insecure = {insecure}"));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn check_url(field: &str, raw: &str) -> Result<(), CliError> {
    url::Url::parse(raw)
        .map(drop)
        .map_err(|_| CliError::Validation {
            field: field.into(),
            reason: format!("invalid URL: {raw}"),
        })
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => format_config(&cfg),
                _ => output::render_single(&global.output, &cfg, format_config, |_| String::new()),
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init {
            media_origin,
            ca_cert,
            set_default,
        } => {
            let api_url = match global.api_url.clone() {
                Some(url) => url,
                None => Input::new()
                    .with_prompt("Backend API URL")
                    .default(DEFAULT_API_URL.to_owned())
                    .interact_text()
                    .map_err(prompt_err)?,
            };
            check_url("api-url", &api_url)?;
            if let Some(ref origin) = media_origin {
                check_url("media-origin", origin)?;
            }

            let mut cfg = config::load_config_or_default();
            let name = config::active_profile_name(global, &cfg);
            cfg.profiles.insert(
                name.clone(),
                Profile {
                    api_url,
                    media_origin,
                    ca_cert,
                    insecure: global.insecure.then_some(true),
                },
            );
            if set_default || cfg.profiles.len() == 1 {
                cfg.default_profile = Some(name.clone());
            }

            let path = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Profile '{name}' saved to {}", path.display());
            }
            Ok(())
        }
    }
}
