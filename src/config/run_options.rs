use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
};

use getopts::Options;
use tracing::warn;

use crate::{config::CONFIG_FILE, synthetic::generator::DEFAULT_SEED};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown format '{}'", other)),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum View {
    Series,
    Current,
    Summary,
    MoistureChart,
    TemperatureChart,
    ProfileChart,
    Textures,
    Field,
    Recent,
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "series" => Ok(View::Series),
            "current" => Ok(View::Current),
            "summary" => Ok(View::Summary),
            "moisture-chart" => Ok(View::MoistureChart),
            "temperature-chart" => Ok(View::TemperatureChart),
            "profile-chart" => Ok(View::ProfileChart),
            "textures" => Ok(View::Textures),
            "field" => Ok(View::Field),
            "recent" => Ok(View::Recent),
            other => Err(format!("unknown view '{}'", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Args {
    pub cfg_file: PathBuf,
    // test helper
    pub cfg_str: Option<String>,
    /// None: use `display.days_history`
    pub days: Option<u32>,
    /// None: use `soil.default_texture`
    pub texture: Option<String>,
    pub include_rain_events: bool,
    /// None: unseeded
    pub seed: Option<u64>,
    pub format: OutputFormat,
    pub views: Vec<View>,
    pub show_thresholds: bool,
    pub help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            cfg_file: PathBuf::from(CONFIG_FILE),
            cfg_str: None,
            days: None,
            texture: None,
            include_rain_events: true,
            seed: Some(DEFAULT_SEED),
            format: OutputFormat::Csv,
            views: vec![View::Series],
            show_thresholds: true,
            help: false,
        }
    }
}

impl Args {
    /// True when the run asks for what the dashboard caches: rain on, default seed.
    pub fn uses_default_generation(&self) -> bool {
        self.include_rain_events && self.seed == Some(DEFAULT_SEED)
    }
}

pub fn options() -> Options {
    let mut opts = Options::new();
    opts.optopt("d", "days", "days of hourly history to generate", "N");
    opts.optopt("t", "texture", "soil texture class", "NAME");
    opts.optflag("", "no-rain", "do not simulate rain events");
    opts.optopt("s", "seed", "random seed (default 42)", "N");
    opts.optflag("", "random", "unseeded, non-reproducible run");
    opts.optopt("f", "format", "series output format: csv or json", "FORMAT");
    opts.optmulti(
        "v",
        "view",
        "series, current, summary, moisture-chart, temperature-chart, profile-chart, textures, field, recent",
        "NAME",
    );
    opts.optflag("", "no-thresholds", "omit reference lines from the moisture chart");
    opts.optflag("h", "help", "print this help");
    opts
}

pub fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options] [config_file]", program);
    print!("{}", opts.usage(&brief));
}

pub fn get_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "fta".to_owned());
    let args = parse_args(args.get(1..).unwrap_or_default());
    if args.help {
        print_usage(&program, &options());
    }
    args
}

fn parse_opt<T: FromStr>(value: Option<String>, name: &str) -> Option<T> {
    let value = value?;
    match value.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Invalid value '{}' for --{}. Using default.", value, name);
            None
        }
    }
}

/// Parses command-line arguments (without the program name). Bad input is
/// reported and replaced with defaults.
pub fn parse_args(args: &[String]) -> Args {
    let opts = options();
    let mut parsed = Args { cfg_file: default_cfg_file(), ..Default::default() };

    let matches = match opts.parse(args) {
        Ok(m) => m,
        Err(f) => {
            warn!("Error parsing arguments: {}", f);
            warn!("Proceeding with defaults.");
            return parsed;
        }
    };

    parsed.help = matches.opt_present("h");
    parsed.days = parse_opt::<u32>(matches.opt_str("d"), "days").filter(|d| {
        if *d == 0 {
            warn!("--days must be positive. Using default.");
        }
        *d > 0
    });
    parsed.texture = matches.opt_str("t");
    parsed.include_rain_events = !matches.opt_present("no-rain");
    if matches.opt_present("random") {
        parsed.seed = None;
    } else if let Some(seed) = parse_opt::<u64>(matches.opt_str("s"), "seed") {
        parsed.seed = Some(seed);
    }
    if let Some(format) = parse_opt(matches.opt_str("f"), "format") {
        parsed.format = format;
    }
    let views: Vec<View> =
        matches.opt_strs("v").into_iter().filter_map(|v| parse_opt(Some(v), "view")).collect();
    if !views.is_empty() {
        parsed.views = views;
    }
    parsed.show_thresholds = !matches.opt_present("no-thresholds");

    let Some(config_file_path) = matches.free.first() else {
        return parsed;
    };
    let path = Path::new(config_file_path);
    if !path.exists() {
        warn!("Config file '{}' does not exist. Proceeding with defaults.", config_file_path);
        return parsed;
    }
    parsed.cfg_file = path.to_path_buf();
    parsed
}

pub fn default_cfg_file() -> PathBuf {
    match env::current_dir() {
        Ok(dir) => dir.join(CONFIG_FILE),
        Err(_) => PathBuf::from(CONFIG_FILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults() {
        let a = parse_args(&[]);
        assert_eq!(a.days, None);
        assert_eq!(a.texture, None);
        assert!(a.include_rain_events);
        assert_eq!(a.seed, Some(42));
        assert_eq!(a.format, OutputFormat::Csv);
        assert_eq!(a.views, vec![View::Series]);
        assert!(a.show_thresholds);
        assert!(a.uses_default_generation());
    }

    #[test]
    fn full_set() {
        let a = parse_args(&args(&[
            "-d", "7", "-t", "Clay Loam", "--no-rain", "-s", "9", "-f", "json", "-v", "current", "-v",
            "moisture-chart", "--no-thresholds",
        ]));
        assert_eq!(a.days, Some(7));
        assert_eq!(a.texture.as_deref(), Some("Clay Loam"));
        assert!(!a.include_rain_events);
        assert_eq!(a.seed, Some(9));
        assert_eq!(a.format, OutputFormat::Json);
        assert_eq!(a.views, vec![View::Current, View::MoistureChart]);
        assert!(!a.show_thresholds);
        assert!(!a.uses_default_generation());
    }

    #[test]
    fn field_and_recent_views() {
        let a = parse_args(&args(&["-v", "field", "-v", "RECENT"]));
        assert_eq!(a.views, vec![View::Field, View::Recent]);
    }

    #[test]
    fn random_overrides_seed() {
        let a = parse_args(&args(&["--seed", "5", "--random"]));
        assert_eq!(a.seed, None);
    }

    #[test]
    fn bad_values_fall_back() {
        let a = parse_args(&args(&["-d", "zero", "-f", "xml", "-v", "pie"]));
        assert_eq!(a.days, None);
        assert_eq!(a.format, OutputFormat::Csv);
        assert_eq!(a.views, vec![View::Series]);

        let a = parse_args(&args(&["-d", "0"]));
        assert_eq!(a.days, None);
    }

    #[test]
    fn unknown_flag_yields_defaults() {
        let a = parse_args(&args(&["--bogus", "-d", "3"]));
        assert_eq!(a.days, None);
    }

    #[test]
    fn missing_config_file_keeps_default_path() {
        let a = parse_args(&args(&["/nonexistent/other.toml"]));
        assert_eq!(a.cfg_file, default_cfg_file());
    }
}
