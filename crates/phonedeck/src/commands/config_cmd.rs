//! Config subcommand handlers. None of these touch the record store.

use std::fmt::Write as _;
use std::io::IsTerminal;

use dialoguer::Input;

use phonedeck_core::DEFAULT_STORE_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "server = \"{}\"", p.server);
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Profile name and server for `config init`: prompted on a terminal,
/// otherwise taken from `--profile` / `--server` or the defaults.
fn init_answers(global: &GlobalOpts) -> Result<(String, String), CliError> {
    let name = global.profile.clone().unwrap_or_else(|| "default".into());
    let server = global
        .server
        .clone()
        .unwrap_or_else(|| DEFAULT_STORE_URL.into());

    if global.yes || !std::io::stdin().is_terminal() {
        return Ok((name, server));
    }

    let name: String = Input::new()
        .with_prompt("Profile name")
        .default(name)
        .interact_text()
        .map_err(prompt_err)?;
    let server: String = Input::new()
        .with_prompt("Record store URL")
        .default(server)
        .interact_text()
        .map_err(prompt_err)?;
    Ok((name, server))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let mut cfg = config::load_config_or_default();

            let (name, server) = init_answers(global)?;
            config::parse_server_url(&server)?;

            if cfg.profiles.contains_key(&name)
                && !util::confirm(
                    &format!("Profile '{name}' already exists. Overwrite?"),
                    "config init",
                    global.yes,
                )?
            {
                return Ok(());
            }

            cfg.profiles.insert(
                name.clone(),
                Profile {
                    server,
                    timeout: global.timeout,
                },
            );
            if cfg.profiles.len() == 1 {
                cfg.default_profile = Some(name.clone());
            }
            let written = config::save_config(&cfg)?;

            output::print_status(
                &format!("✓ Profile '{name}' written to {}", written.display()),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            if cfg.profiles.is_empty() {
                output::print_status("No profiles configured. Run: phonedeck config init", global.quiet);
                return Ok(());
            }
            let active = config::active_profile_name(global, &cfg);
            for name in cfg.profiles.keys() {
                let marker = if *name == active { " *" } else { "" };
                output::print_output(&format!("{name}{marker}"), global.quiet);
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                let available: Vec<_> = cfg.profiles.keys().cloned().collect();
                return Err(CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::print_status(&format!("✓ Default profile set to '{name}'"), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_lists_profiles() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                server: "http://10.0.0.5:3001".into(),
                timeout: Some(30),
            },
        );
        let text = format_config(&cfg);
        assert!(text.starts_with("default_profile = \"default\""));
        assert!(text.contains("[profiles.lab]\nserver = \"http://10.0.0.5:3001\"\ntimeout = 30"));
    }
}
