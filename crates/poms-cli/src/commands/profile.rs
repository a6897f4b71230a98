//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::config::{Config, Profile};
use crate::error::Result;
use crate::output::Formatter;

/// Execute the profile command.
pub fn execute_profile(args: ProfileArgs, config: &mut Config, formatter: &Formatter) -> Result<()> {
    match args.action {
        ProfileAction::List => {
            println!("{}", list_profiles(config, formatter));
            Ok(())
        }
        ProfileAction::Show => {
            println!("{}", show_active_profile(config, formatter)?);
            Ok(())
        }
        ProfileAction::Switch { name } => {
            switch_profile(config, name.clone())?;
            println!(
                "{}",
                formatter.success(&format!("Switched to profile '{}'", name))
            );
            Ok(())
        }
    }
}

/// List all profiles, marking the active one.
fn list_profiles(config: &Config, formatter: &Formatter) -> String {
    if config.profiles.is_empty() {
        return formatter.info("No profiles configured");
    }

    let mut lines = vec!["Available profiles:".to_string()];
    for name in config.profile_names() {
        let is_active = name == config.active_profile;
        let marker = if is_active { "* " } else { "  " };
        lines.push(format!(
            "{}{}",
            marker,
            if is_active {
                formatter.success(name)
            } else {
                name.to_string()
            }
        ));
        if let Some(profile) = config.profiles.get(name) {
            lines.extend(describe(profile, "    "));
        }
    }

    lines.join("\n")
}

/// Show the active profile.
fn show_active_profile(config: &Config, formatter: &Formatter) -> Result<String> {
    let profile = config.get_active_profile()?;

    let mut lines = vec![format!(
        "Active profile: {}",
        formatter.success(&config.active_profile)
    )];
    lines.extend(describe(profile, "  "));
    Ok(lines.join("\n"))
}

/// Switch to a different profile and persist the choice.
fn switch_profile(config: &mut Config, name: String) -> Result<()> {
    config.switch_profile(name)?;
    config.save()
}

fn describe(profile: &Profile, indent: &str) -> Vec<String> {
    vec![
        format!("{}Endpoint: {}", indent, profile.endpoint),
        format!("{}Model: {}", indent, profile.model),
        format!("{}API key variable: {}", indent, profile.api_key_env),
        format!("{}Timeout: {}s", indent, profile.timeout_secs),
    ]
}
