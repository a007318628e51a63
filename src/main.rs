use chrono::Utc;
use log::info;

use sunshine::config::Config;
use sunshine::dose::{DoseThresholdTable, Progress, ThresholdCrossingIntegrator};
use sunshine::oracle::{ClearSkyModel, IrradianceOracle, SpectralLut};
use sunshine::sampler::{SolarGeometrySampler, align_to_exposure};
use sunshine::spectrum::ActionSpectrum;

fn format_duration(seconds: f64) -> String {
    let total = seconds.round() as u64;
    format!("{}h {:02}min", total / 3600, (total % 3600) / 60)
}

fn format_time_of_day(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60)
}

fn describe(progress: Progress) -> String {
    match progress {
        Progress::InsufficientLight => "Not enough UV light today".to_string(),
        Progress::Partial(fraction) => format!(
            "Not enough time in the day, {:.0}% of the target",
            fraction * 100.0
        ),
        Progress::Reached(seconds) => format_duration(seconds),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .unwrap_or_else(|| "./data/config/exposure.json".to_string());

    let config = Config::from_file(&config_path)?;
    let params = config.exposure_parameters(Utc::now());
    info!("Loaded configuration from {config_path}: {params:?}");

    let clear_sky = ClearSkyModel::default();
    let lut = args.next().map(SpectralLut::from_file).transpose()?;
    let irradiance: &dyn IrradianceOracle = match &lut {
        Some(lut) => lut,
        None => &clear_sky,
    };

    let thresholds = DoseThresholdTable::thresholds_for(params.skin_phototype)?;
    let integrator = ThresholdCrossingIntegrator::new(irradiance, *config.settings());
    let result = integrator.integrate(&params, thresholds);
    let estimate = integrator.instantaneous_estimate(&params, thresholds);

    println!(
        "Day {} at {:.3}, {:.3}, skin type {}, {}",
        params.day_of_year,
        params.latitude,
        params.longitude,
        params.skin_phototype + 1,
        params.sky_condition
    );
    println!(
        "Exposure starting at {} local time",
        format_time_of_day(params.local_start_seconds())
    );

    match irradiance.sunrise_sunset(
        params.day_of_year,
        params.latitude,
        params.longitude,
        params.altitude_km,
    ) {
        Ok((sunrise, sunset)) => println!(
            "  Sunrise {} UTC, sunset {} UTC",
            format_time_of_day(sunrise),
            format_time_of_day(sunset)
        ),
        Err(e) => println!("  {e}"),
    }

    println!(
        "  {:<11} {}",
        ActionSpectrum::VITAMIN_D.name(),
        describe(result.vitamin_d_progress())
    );
    println!(
        "  {:<11} {}",
        ActionSpectrum::ERYTHEMA.name(),
        describe(result.erythema_progress())
    );
    if estimate.vitamin_d_time_seconds > 0.0 {
        println!(
            "  At the current UV level: vitamin D in {}, sunburn in {}",
            format_duration(estimate.vitamin_d_time_seconds),
            format_duration(estimate.erythema_time_seconds)
        );
    }

    let sampler = SolarGeometrySampler::new(&clear_sky);
    let samples = sampler.sample_day(&params, integrator.settings().sun_samples);
    let aligned: Vec<_> = align_to_exposure(samples, &params, &result).collect();

    if let Some(highest) = aligned
        .iter()
        .max_by(|a, b| a.elevation_deg.total_cmp(&b.elevation_deg))
    {
        println!(
            "  Highest sun {:.1} deg at {} local time",
            highest.elevation_deg,
            format_time_of_day(highest.time_of_day_seconds)
        );
    }
    let exposed = aligned.iter().filter(|s| s.in_exposure).count();
    info!(
        "{} of {} sun samples fall within the exposure",
        exposed,
        aligned.len()
    );

    Ok(())
}
