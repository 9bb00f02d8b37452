use std::path::PathBuf;

use clap::Parser;
use popselect::{
    config::{get_config_dir, get_data_dir},
    popover::Placement,
};

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    /// Tick rate, i.e. number of ticks per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 20.0)]
    pub tick_rate: f64,

    /// Frame rate, i.e. number of frames per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 30.0)]
    pub frame_rate: f64,

    /// JSON or JSON5 file with the options to pick from
    #[arg(short, long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Theme to start with, overriding the configured default
    #[arg(long, value_name = "NAME")]
    pub theme: Option<String>,

    /// Popover placement, overriding the configured one
    #[arg(short, long, value_name = "PLACEMENT")]
    pub placement: Option<Placement>,
}

const VERSION_MESSAGE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "-",
    env!("VERGEN_GIT_DESCRIBE"),
    " (",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

pub fn version() -> String {
    let author = clap::crate_authors!();

    let config_dir_path = get_config_dir().display().to_string();
    let data_dir_path = get_data_dir().display().to_string();

    format!(
        "\
{VERSION_MESSAGE}

Authors: {author}

Config directory: {config_dir_path}
Data directory: {data_dir_path}"
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parses_overrides() {
        let cli = Cli::parse_from([
            "popselect",
            "--options",
            "fish.json5",
            "--theme",
            "paper",
            "--placement",
            "top-end",
        ]);

        assert_eq!(cli.options, Some(PathBuf::from("fish.json5")));
        assert_eq!(cli.theme.as_deref(), Some("paper"));
        assert_eq!(cli.placement, Some(Placement::TopEnd));
        assert_eq!(cli.tick_rate, 20.0);
    }
}
