//! Interactive environment request form

use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use envreq_types::{EnvironmentRequestForm, FrameworkOption, IdeOption, InstanceType};

use crate::error::CliError;

/// Ask for every form field on the terminal.
///
/// Name and purpose may be left blank here; the submission reports them.
pub fn collect_form() -> Result<EnvironmentRequestForm, CliError> {
    let theme = ColorfulTheme::default();
    let mut form = EnvironmentRequestForm::new();

    form.env_name = text(&theme, "Env Name *")?;
    form.env_purpose = text(&theme, "Env Purpose *")?;
    form.use_case = text(&theme, "Use Case")?;
    form.data_domain = text(&theme, "Data Domain")?;

    let sizes: Vec<&str> = InstanceType::ALL.iter().map(|t| t.as_str()).collect();
    let size = Select::with_theme(&theme)
        .with_prompt("Instance Type")
        .items(&sizes[..])
        .default(0)
        .interact()?;
    form.instance_type = InstanceType::ALL[size];

    let ides: Vec<&str> = IdeOption::ALL.iter().map(|o| o.label()).collect();
    let ide = Select::with_theme(&theme)
        .with_prompt("IDE")
        .items(&ides[..])
        .default(0)
        .interact()?;
    form.ide_option = IdeOption::ALL[ide];

    let images: Vec<&str> = FrameworkOption::ALL.iter().map(|o| o.label()).collect();
    let picked = MultiSelect::with_theme(&theme)
        .with_prompt("Container Images (space to toggle)")
        .items(&images[..])
        .interact()?;
    for index in picked {
        form.toggle_framework(FrameworkOption::ALL[index]);
    }

    Ok(form)
}

fn text(theme: &ColorfulTheme, prompt: &str) -> Result<String, CliError> {
    Ok(Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?)
}
