//! Interactive entry forms
//!
//! The prompt-driven counterpart of the `--flag` interface used by `new`
//! and `edit`. Every prompt shows the current value as its default, so an
//! edit form can be confirmed field by field.

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use miette::{IntoDiagnostic, Result};

/// A themed prompt session
pub struct Form {
    theme: ColorfulTheme,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Print a form title
    pub fn title(&self, text: &str) {
        println!("{}", style(text).bold().cyan());
        println!();
    }

    /// Required text field
    pub fn text(&self, prompt: &str, default: &str) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .validate_with(|s: &String| -> std::result::Result<(), &str> {
                if s.trim().is_empty() {
                    Err("value is required")
                } else {
                    Ok(())
                }
            });
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        let value = input.interact_text().into_diagnostic()?;
        Ok(value.trim().to_string())
    }

    /// Optional text field, may be left blank
    pub fn optional_text(&self, prompt: &str, default: &str) -> Result<String> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        Ok(value.trim().to_string())
    }

    /// Numeric field; `non_negative` rejects values below zero at the prompt
    pub fn number(&self, prompt: &str, default: f64, non_negative: bool) -> Result<f64> {
        Input::<f64>::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .validate_with(move |v: &f64| -> std::result::Result<(), &str> {
                if !v.is_finite() {
                    Err("enter a number")
                } else if non_negative && *v < 0.0 {
                    Err("value cannot be negative")
                } else {
                    Ok(())
                }
            })
            .interact_text()
            .into_diagnostic()
    }

    /// Optional numeric field; blank input means "not set"
    pub fn optional_number(&self, prompt: &str, default: Option<f64>) -> Result<Option<f64>> {
        let current = default.map(|v| v.to_string()).unwrap_or_default();
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(format!("{} (blank for none)", prompt))
            .default(current)
            .allow_empty(true)
            .validate_with(|s: &String| -> std::result::Result<(), &str> {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(());
                }
                match s.parse::<f64>() {
                    Ok(v) if v.is_finite() && v >= 0.0 => Ok(()),
                    _ => Err("enter a non-negative number or leave blank"),
                }
            })
            .interact_text()
            .into_diagnostic()?;

        let value = value.trim();
        if value.is_empty() {
            Ok(None)
        } else {
            value.parse().map(Some).into_diagnostic()
        }
    }

    /// Pick one of the known names (e.g., a material type)
    pub fn choose(&self, prompt: &str, options: &[String], current: &str) -> Result<String> {
        if options.is_empty() {
            return Err(miette::miette!("nothing to choose for '{}'", prompt));
        }
        let default_idx = options.iter().position(|o| o == current).unwrap_or(0);
        let selection = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(options)
            .default(default_idx)
            .interact()
            .into_diagnostic()?;
        Ok(options[selection].clone())
    }
}

/// Ask before a destructive action unless `--yes` was given
///
/// Without a terminal there is nobody to ask, so the action is refused.
pub fn confirm_delete(what: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !console::user_attended() {
        return Err(miette::miette!(
            help = "pass --yes to delete without confirmation",
            "refusing to delete {} without confirmation",
            what
        ));
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Delete {}?", what))
        .default(false)
        .interact()
        .into_diagnostic()
}
