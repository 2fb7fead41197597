//! CLI command implementations

use clap::{Args, Subcommand};
use memclock_core::hardware::catalog::{CONTROLLER_CATALOG, MODULE_CATALOG};
use memclock_core::hardware::{FrequencyWarning, MemoryClass, MemoryController, MemoryModule};
use memclock_core::stress::{Intensity, StressPreset, StressTestReport, StressTestRequest};
use memclock_core::thermal::{CoolingSolution, Environment, ThermalReading};
use memclock_core::{
    CancellationToken, MemclockConfig, MemclockError, OverclockSession, SafetyApproval,
    TimingUpdate, VoltageRail,
};
use serde::Serialize;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List memory kits and memory controllers
    Catalog,
    /// Apply tuning settings and show the resulting metrics
    Tune {
        #[command(flatten)]
        tune: TuneArgs,
    },
    /// Apply tuning settings, then run a stress test (Ctrl-C aborts)
    Stress {
        #[command(flatten)]
        tune: TuneArgs,
        /// Run a preset program instead of a custom test
        #[arg(long, value_enum, conflicts_with_all = ["duration", "intensity"])]
        preset: Option<StressPreset>,
        /// Custom test length in seconds
        #[arg(long, default_value_t = 30)]
        duration: u32,
        /// Custom test intensity
        #[arg(long, value_enum, default_value_t = Intensity::Medium)]
        intensity: Intensity,
    },
    /// Apply tuning and environment settings, then show the thermal view
    Thermal {
        #[command(flatten)]
        tune: TuneArgs,
        /// Cooling solution (resets ambient to its baseline)
        #[arg(long, value_enum)]
        cooling: Option<CoolingSolution>,
        /// Ambient temperature in °C, clamped to 15-35
        #[arg(long, allow_negative_numbers = true)]
        ambient: Option<f64>,
        /// Number of case fans to add
        #[arg(long, default_value_t = 0)]
        case_fans: u32,
    },
}

/// Tuning flags shared by every session command.
///
/// Applied in order: reset or rated profile, frequency, timings, voltages.
#[derive(Args)]
pub struct TuneArgs {
    /// Memory kit number from `memclock catalog`
    #[arg(long, default_value_t = 1)]
    kit: usize,
    /// Memory controller number from `memclock catalog`
    #[arg(long, default_value_t = 1)]
    controller: usize,
    /// Reset to JEDEC defaults
    #[arg(long)]
    reset: bool,
    /// Load the kit's rated XMP/EXPO profile
    #[arg(long, conflicts_with = "reset")]
    xmp: bool,
    /// Frequency in MHz
    #[arg(long)]
    frequency: Option<u32>,
    /// Primary timings as CL-tRCD-tRP-tRAS, e.g. 16-18-18-36
    #[arg(long, value_delimiter = '-')]
    timings: Option<Vec<u32>>,
    /// DRAM voltage in volts
    #[arg(long)]
    dram_voltage: Option<f64>,
    /// Controller VCCIO voltage in volts
    #[arg(long)]
    vccio: Option<f64>,
    /// Controller VCCSA voltage in volts
    #[arg(long)]
    vccsa: Option<f64>,
    /// Confirm a DRAM voltage above the safety ceiling
    #[arg(long)]
    force: bool,
}

impl TuneArgs {
    /// Builds a session and applies every requested setting.
    ///
    /// # Errors
    /// - `MemclockError::Configuration` - Kit or controller number is zero
    /// - `MemclockError::UnknownCatalogEntry` - Number past the end of a catalog
    /// - `MemclockError::Tuning` - A setting was rejected
    fn open_session(
        &self,
        config: &MemclockConfig,
    ) -> memclock_core::Result<(OverclockSession, Option<FrequencyWarning>)> {
        let mut session = OverclockSession::from_catalog(
            catalog_index(self.kit, "kit")?,
            catalog_index(self.controller, "controller")?,
            config,
        )?;

        if self.reset {
            session.reset_to_defaults();
        }
        if self.xmp {
            session.apply_rated_profile();
        }

        let mut warning = None;
        if let Some(frequency) = self.frequency {
            warning = session.set_frequency(frequency)?.warning;
        }
        if let Some(values) = &self.timings {
            session.set_timings(TimingUpdate::from_values(values)?)?;
        }

        let approval = if self.force {
            SafetyApproval::Confirmed
        } else {
            SafetyApproval::Unconfirmed
        };
        let rails = [
            (VoltageRail::Dram, self.dram_voltage),
            (VoltageRail::Vccio, self.vccio),
            (VoltageRail::Vccsa, self.vccsa),
        ];
        for (rail, voltage) in rails {
            if let Some(voltage) = voltage {
                session.set_voltage(rail, voltage, approval)?;
            }
        }

        Ok((session, warning))
    }
}

fn catalog_index(number: usize, kind: &str) -> memclock_core::Result<usize> {
    number.checked_sub(1).ok_or_else(|| MemclockError::Configuration {
        reason: format!("{kind} numbers start at 1"),
    })
}

#[derive(Serialize)]
struct CatalogListing {
    kits: &'static [memclock_core::hardware::ModuleSpec],
    controllers: &'static [memclock_core::hardware::ControllerSpec],
}

#[derive(Serialize)]
struct TuneSummary<'a> {
    channels: usize,
    module: &'a MemoryModule,
    controller: &'a MemoryController,
    frequency_warning: Option<FrequencyWarning>,
}

#[derive(Serialize)]
struct StressSummary<'a> {
    report: &'a StressTestReport,
    module: &'a MemoryModule,
}

#[derive(Serialize)]
struct ThermalSummary<'a> {
    environment: &'a Environment,
    reading: ThermalReading,
}

/// Handle the CLI command
///
/// # Errors
/// Returns the first rejected setting, or an output failure
pub async fn handle_command(
    command: Commands,
    config: MemclockConfig,
    json: bool,
) -> anyhow::Result<()> {
    match command {
        Commands::Catalog => show_catalog(json),
        Commands::Tune { tune } => show_tuning(&tune, &config, json),
        Commands::Stress {
            tune,
            preset,
            duration,
            intensity,
        } => run_stress(&tune, &config, preset, duration, intensity, json).await,
        Commands::Thermal {
            tune,
            cooling,
            ambient,
            case_fans,
        } => show_thermals(&tune, &config, cooling, ambient, case_fans, json),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn show_catalog(json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&CatalogListing {
            kits: &MODULE_CATALOG,
            controllers: &CONTROLLER_CATALOG,
        });
    }

    println!("Memory kits:");
    for (number, kit) in MODULE_CATALOG.iter().enumerate() {
        println!(
            "  {:>2}. {} ({}, {}) {} MHz {} @ {:.2}V, {} GB",
            number + 1,
            kit.name,
            kit.class,
            kit.ic,
            kit.rated_frequency,
            kit.rated_timings,
            kit.rated_voltage,
            kit.capacity_gb
        );
    }

    println!("\nMemory controllers:");
    for (number, controller) in CONTROLLER_CATALOG.iter().enumerate() {
        println!(
            "  {:>2}. {} (quality {}/10, max {:.2}V)",
            number + 1,
            controller.name,
            controller.imc_quality,
            controller.max_safe_voltage
        );
    }
    Ok(())
}

/// Command rate, plus the gear mode on classes that use one, e.g. "2T, Gear 1".
fn timing_mode(controller: &MemoryController, class: MemoryClass) -> String {
    let command_rate = format!("{}T", controller.command_rate().cycles());
    match controller.effective_gear_mode(class) {
        Some(gear) => format!("{command_rate}, Gear {}", gear.ratio()),
        None => command_rate,
    }
}

fn print_module(session: &OverclockSession) {
    let module = session.module();
    let controller = session.controller();

    println!(
        "{} ({}, {}) x{}",
        module.name(),
        module.class(),
        module.ic(),
        session.channel_count()
    );
    println!("  Frequency:   {} MHz", module.frequency());
    println!("  Timings:     {}", module.timings());
    println!("  DRAM:        {:.3} V", module.voltage());
    println!(
        "  Controller:  {} (VCCIO {:.3} V, VCCSA {:.3} V)",
        controller.name(),
        controller.vccio_voltage(),
        controller.vccsa_voltage()
    );
    println!("  Mode:        {}", timing_mode(controller, module.class()));
    println!("  Stability:   {:.1}%", module.stability());
    println!("  Temperature: {:.1} °C", module.temperature());
    println!("  Errors:      {}", module.error_count());
}

fn show_tuning(tune: &TuneArgs, config: &MemclockConfig, json: bool) -> anyhow::Result<()> {
    let (session, warning) = tune.open_session(config)?;

    if json {
        return print_json(&TuneSummary {
            channels: session.channel_count(),
            module: session.module(),
            controller: session.controller(),
            frequency_warning: warning,
        });
    }

    print_module(&session);
    if let Some(warning) = warning {
        let range = session.module().typical_frequency_range();
        let note = match warning {
            FrequencyWarning::BelowJedec => "below the JEDEC baseline",
            FrequencyWarning::AggressiveOverclock => "an aggressive overclock for this IC",
        };
        println!(
            "\nWarning: {} MHz is {note} (typical {}-{} MHz)",
            session.module().frequency(),
            range.min,
            range.max
        );
    }
    Ok(())
}

async fn run_stress(
    tune: &TuneArgs,
    config: &MemclockConfig,
    preset: Option<StressPreset>,
    duration: u32,
    intensity: Intensity,
    json: bool,
) -> anyhow::Result<()> {
    let (mut session, _) = tune.open_session(config)?;
    let request = match preset {
        Some(preset) => preset.request(),
        None => StressTestRequest::custom(
            duration,
            intensity,
            config.stress.custom_duration_bounds(),
        ),
    };

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    let signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, aborting stress test");
            interrupt.cancel();
        }
    });

    if !json {
        println!(
            "Running {} for {}s at {} intensity",
            request.label, request.duration, request.intensity
        );
    }

    let (session, report) = tokio::task::spawn_blocking(move || {
        let report = session.run_stress_test_with_progress(request, &cancel, |progress| {
            if !json {
                eprint!(
                    "\r  [{:>3.0}%] tick {}/{}, {} errors",
                    progress.percent, progress.tick, progress.duration, progress.errors_so_far
                );
            }
        });
        (session, report)
    })
    .await?;
    signal.abort();

    let report = report.map_err(MemclockError::from)?;
    if json {
        return print_json(&StressSummary {
            report: &report,
            module: session.module(),
        });
    }

    eprintln!();
    println!(
        "{}: {} errors in {}/{} ticks",
        report.outcome, report.errors_injected, report.ticks_completed, report.duration
    );
    println!();
    print_module(&session);
    Ok(())
}

fn show_thermals(
    tune: &TuneArgs,
    config: &MemclockConfig,
    cooling: Option<CoolingSolution>,
    ambient: Option<f64>,
    case_fans: u32,
    json: bool,
) -> anyhow::Result<()> {
    let (mut session, _) = tune.open_session(config)?;

    if let Some(cooling) = cooling {
        session.select_cooling(cooling);
    }
    if let Some(ambient) = ambient {
        session.set_ambient(ambient).map_err(MemclockError::from)?;
    }
    for _ in 0..case_fans {
        session.add_case_fan();
    }
    let reading = session.view_thermals();

    if json {
        return print_json(&ThermalSummary {
            environment: session.environment(),
            reading,
        });
    }

    let environment = session.environment();
    println!(
        "{} with {} case fan(s), ambient {:.1} °C",
        environment.cooling().label(),
        environment.case_fans(),
        reading.ambient
    );
    println!("  Module temperature: {:.1} °C ({})", reading.temperature, reading.status);
    println!("  Sensor reading:     {:.1} °C", session.sensor_reading());
    if reading.stability_penalty > 0.0 {
        println!("  Throttling would cost {:.1} stability points", reading.stability_penalty);
    }
    Ok(())
}
