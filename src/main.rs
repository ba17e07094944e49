use fta::cache::SeriesCache;
use fta::charts::{depth_profile_chart, soil_moisture_chart, temperature_chart};
use fta::conditions::{conditions_summary, current_conditions, field_overview, recent_readings, RECENT_ROWS};
use fta::config::run_options::{get_args, Args, OutputFormat, View};
use fta::config::Config;
use fta::synthetic::generator::{GeneratorParams, SeriesGenerator};
use fta::synthetic::series::SensorSeries;
use fta::time::RealTimeProvider;
use fta::utils::start_log;
use serde::Serialize;
use serde_json::json;
use std::io::{self, Write};
use std::{error::Error, sync::Arc};
use tracing::info;

struct Session {
    args: Args,
    config: Arc<Config>,
    generator: SeriesGenerator<RealTimeProvider>,
    cache: SeriesCache,
    direct: Option<Arc<SensorSeries>>,
}

impl Session {
    fn days(&self) -> u32 {
        self.args.days.unwrap_or(self.config.display.days_history)
    }

    fn texture(&self) -> String {
        self.args.texture.clone().unwrap_or_else(|| self.config.soil.default_texture.clone())
    }

    /// Views share one series: cached for default settings, generated once otherwise.
    fn series(&mut self) -> Result<Arc<SensorSeries>, Box<dyn Error>> {
        let (days, texture) = (self.days(), self.texture());
        if self.args.uses_default_generation() {
            return Ok(self.cache.get_or_generate(&self.generator, days, &texture)?);
        }
        if let Some(series) = &self.direct {
            return Ok(series.clone());
        }
        let params = GeneratorParams::new(days, &texture, self.args.include_rain_events, self.args.seed);
        let series = Arc::new(self.generator.generate(&params)?);
        self.direct = Some(series.clone());
        Ok(series)
    }
}

fn write_json<W: Write, S: Serialize>(out: &mut W, value: &S) -> Result<(), Box<dyn Error>> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    start_log::<RealTimeProvider>(None);

    let args = get_args();
    if args.help {
        return Ok(());
    }
    let config = Arc::new(Config::load(&args)?);
    info!("Starting fta: {} view(s)", args.views.len());

    let mut session = Session {
        generator: SeriesGenerator::new(config.clone(), Arc::new(RealTimeProvider)),
        cache: SeriesCache::new(config.display.cache_ttl_secs),
        config,
        args,
        direct: None,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for view in session.args.views.clone() {
        match view {
            View::Textures => {
                let textures: Vec<_> = session
                    .config
                    .soil
                    .textures
                    .iter()
                    .map(|t| {
                        json!({
                            "name": t.name,
                            "field_capacity": t.field_capacity,
                            "wilting_point": t.wilting_point,
                            "total_available_water": t.field_capacity - t.wilting_point,
                        })
                    })
                    .collect();
                write_json(&mut out, &textures)?;
            }
            View::Series => {
                let series = session.series()?;
                match session.args.format {
                    OutputFormat::Csv => series.write_csv(&mut out)?,
                    OutputFormat::Json => write_json(&mut out, series.as_ref())?,
                }
            }
            View::Current => write_json(&mut out, &current_conditions(&*session.series()?)?)?,
            View::Summary => write_json(&mut out, &conditions_summary(&*session.series()?)?)?,
            View::Field => {
                let series = session.series()?;
                write_json(&mut out, &field_overview(&session.config.field, &series))?;
            }
            View::Recent => write_json(&mut out, &recent_readings(&*session.series()?, RECENT_ROWS))?,
            View::MoistureChart => {
                let series = session.series()?;
                let cfg = &session.config;
                let chart = soil_moisture_chart(&series, &cfg.water_balance, &cfg.display, session.args.show_thresholds);
                write_json(&mut out, &chart)?;
            }
            View::TemperatureChart => write_json(&mut out, &temperature_chart(&*session.series()?))?,
            View::ProfileChart => {
                let series = session.series()?;
                write_json(&mut out, &depth_profile_chart(&series, &session.config.display))?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
