use anyhow::Context;
use clap::{Parser, Subcommand};
use cityweather_core::{
    Config, LookupController, OpenWeatherUnits, ProviderId, UnitPreference, WeatherClient,
    provider::{client_from_config, default_client_from_config},
};
use inquire::{Confirm, InquireError, Password, Select, Text};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather by city, with search history")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "weatherapi".
        provider: String,
    },

    /// Look up one or more cities in order and show the result.
    Show {
        /// City names, looked up left to right.
        #[arg(required = true)]
        cities: Vec<String>,

        /// Provider to use instead of the configured default.
        #[arg(long)]
        provider: Option<String>,

        /// Display unit, "celsius" or "fahrenheit". Defaults to the configured unit.
        #[arg(long)]
        unit: Option<String>,
    },

    /// Prompt for cities until you quit. `:unit` switches units, `:quit` exits.
    Interactive {
        /// Provider to use instead of the configured default.
        #[arg(long)]
        provider: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { cities, provider, unit } => {
                let config = Config::load()?;
                let unit = match unit {
                    Some(name) => UnitPreference::try_from(name.as_str())?,
                    None => config.initial_unit(),
                };

                let mut ctrl =
                    LookupController::new(client(&config, provider.as_deref())?).with_unit(unit);
                for city in &cities {
                    ctrl.submit_query(city).await;
                }

                print!("{}", ctrl.view());
                Ok(())
            }
            Command::Interactive { provider } => {
                let config = Config::load()?;
                let ctrl = LookupController::new(client(&config, provider.as_deref())?)
                    .with_unit(config.initial_unit());
                interactive(ctrl).await
            }
        }
    }
}

fn client(config: &Config, provider: Option<&str>) -> anyhow::Result<Box<dyn WeatherClient>> {
    match provider {
        Some(name) => client_from_config(ProviderId::try_from(name)?, config),
        None => default_client_from_config(config),
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.upsert_provider_api_key(id, api_key);

    if id == ProviderId::OpenWeather {
        let options = OpenWeatherUnits::all().to_vec();
        let units = Select::new("Units to request from OpenWeather:", options)
            .prompt()
            .context("Failed to read units")?;
        config.set_openweather_units(units);
    }

    if config.default_provider_id()? != id {
        let make_default = Confirm::new(&format!("Make {id} the default provider?"))
            .with_default(false)
            .prompt()
            .context("Failed to read answer")?;
        if make_default {
            config.set_default_provider(id);
        }
    }

    config.save()?;
    let path = Config::config_file_path()?;
    tracing::info!(provider = %id, path = %path.display(), "saved configuration");
    println!("Saved configuration to {}", path.display());
    Ok(())
}

/// One line typed at the interactive prompt.
#[derive(Debug, PartialEq, Eq)]
enum PromptInput<'a> {
    Quit,
    ToggleUnit,
    City(&'a str),
}

impl<'a> PromptInput<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            ":quit" | ":q" => PromptInput::Quit,
            ":unit" => PromptInput::ToggleUnit,
            _ => PromptInput::City(line),
        }
    }
}

async fn interactive<C: WeatherClient>(mut ctrl: LookupController<C>) -> anyhow::Result<()> {
    loop {
        let prompt = Text::new("City:").with_help_message(":unit to switch units, :quit to exit");
        let line = match prompt.prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                tracing::debug!("prompt cancelled");
                break;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to read prompt");
                return Err(err).context("Failed to read input");
            }
        };

        match PromptInput::parse(&line) {
            PromptInput::Quit => break,
            PromptInput::ToggleUnit => {
                ctrl.toggle_unit();
                tracing::debug!(unit = ctrl.unit().symbol(), "switched display unit");
            }
            PromptInput::City(city) => {
                ctrl.set_input(city);
                if !ctrl.submit().await {
                    continue;
                }
            }
        }

        println!("{}", ctrl.view());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_accepts_several_cities_and_unit() {
        let cli = Cli::try_parse_from(["cityweather", "show", "Paris", "Tokyo", "--unit", "f"])
            .expect("valid arguments");

        let Command::Show { cities, provider, unit } = cli.command else {
            panic!("expected show");
        };
        assert_eq!(cities, vec!["Paris", "Tokyo"]);
        assert!(provider.is_none());
        assert_eq!(unit.as_deref(), Some("f"));
    }

    #[test]
    fn show_requires_a_city() {
        assert!(Cli::try_parse_from(["cityweather", "show"]).is_err());
    }

    #[test]
    fn prompt_commands_are_recognized() {
        assert_eq!(PromptInput::parse(" :q "), PromptInput::Quit);
        assert_eq!(PromptInput::parse(":quit"), PromptInput::Quit);
        assert_eq!(PromptInput::parse(":unit"), PromptInput::ToggleUnit);
        assert_eq!(PromptInput::parse("Lima"), PromptInput::City("Lima"));
        assert_eq!(PromptInput::parse("   "), PromptInput::City("   "));
    }

    #[test]
    fn interactive_takes_provider_override() {
        let cli = Cli::try_parse_from(["cityweather", "interactive", "--provider", "weatherapi"])
            .expect("valid arguments");

        assert!(matches!(
            cli.command,
            Command::Interactive { provider: Some(ref p) } if p == "weatherapi"
        ));
    }
}
