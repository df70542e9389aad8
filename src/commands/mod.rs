// Command handlers module
pub mod container_logs;
pub mod report;
pub mod watch;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::core::config::Config;
use crate::ui::{disable_colors, Dashboard, DisplayOptions, SectionSelection};

/// (flag, help) for every section switch
const SECTION_FLAGS: &[(&str, &str)] = &[
    ("sys", "Display detailed system information"),
    ("cpu", "Display CPU information"),
    ("mem", "Display memory information"),
    ("disk", "Display disk information"),
    ("net", "Display network information"),
    ("nettraffic", "Display network traffic information"),
    ("proc", "Display process information"),
    ("docker", "Display Docker container information"),
    ("temp", "Display temperature information"),
    ("battery", "Display battery information"),
    ("logs", "Display system logs"),
    ("history", "Show resource usage history"),
    ("alerts", "Display and enable resource alerts"),
    ("all", "Display all system information (alerts stay opt-in)"),
];

const THRESHOLD_FLAGS: &[(&str, &str)] = &[
    ("cpu-warning", "CPU warning threshold (%)"),
    ("cpu-critical", "CPU critical threshold (%)"),
    ("memory-warning", "Memory warning threshold (%)"),
    ("memory-critical", "Memory critical threshold (%)"),
    ("disk-warning", "Disk warning threshold (%)"),
    ("disk-critical", "Disk critical threshold (%)"),
];

/// Everything a run needs besides the config file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    pub selection: SectionSelection,
    pub display: DisplayOptions,
    pub json: bool,
    pub watch: bool,
    pub refresh_secs: u64,
    pub ack_alerts: bool,
}

fn flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .action(ArgAction::SetTrue)
}

pub fn build_cli() -> Command {
    let mut cmd = Command::new("sysglance")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Live terminal dashboard for system and container resources");

    for &(name, help) in SECTION_FLAGS {
        cmd = cmd.arg(flag(name, help));
    }

    cmd = cmd
        .arg(flag("json", "Output in JSON format"))
        .arg(flag("watch", "Enable watch mode for continuous monitoring"))
        .arg(
            Arg::new("refresh")
                .long("refresh")
                .value_name("SECS")
                .help("Refresh rate in seconds for watch mode (minimum 1)")
                .value_parser(value_parser!(u64)),
        )
        .arg(flag("verbose", "Show more detailed information"))
        .arg(flag("no-color", "Disable colorized output"))
        .arg(flag("ack-alerts", "Acknowledge alerts once they have been shown"))
        .arg(
            Arg::new("container-logs")
                .long("container-logs")
                .value_name("ID")
                .help("Show logs for the container with this ID or name"),
        )
        .arg(
            Arg::new("logs-limit")
                .long("logs-limit")
                .value_name("N")
                .help("Number of container log lines to show (0 for all)")
                .value_parser(value_parser!(usize))
                .default_value("50"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Read settings from this file instead of the default location")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(flag("print-config", "Print the effective configuration as JSON"));

    for &(name, help) in THRESHOLD_FLAGS {
        cmd = cmd.arg(
            Arg::new(name)
                .long(name)
                .value_name("PERCENT")
                .help(help)
                .value_parser(value_parser!(f64)),
        );
    }

    cmd
}

pub fn selection_from(matches: &ArgMatches) -> SectionSelection {
    let base = if matches.get_flag("all") {
        SectionSelection::all()
    } else {
        SectionSelection::default()
    };

    SectionSelection {
        system: base.system || matches.get_flag("sys"),
        cpu: base.cpu || matches.get_flag("cpu"),
        memory: base.memory || matches.get_flag("mem"),
        disk: base.disk || matches.get_flag("disk"),
        network: base.network || matches.get_flag("net"),
        traffic: base.traffic || matches.get_flag("nettraffic"),
        processes: base.processes || matches.get_flag("proc"),
        docker: base.docker || matches.get_flag("docker"),
        temperature: base.temperature || matches.get_flag("temp"),
        battery: base.battery || matches.get_flag("battery"),
        logs: base.logs || matches.get_flag("logs"),
        history: base.history || matches.get_flag("history"),
        alerts: matches.get_flag("alerts"),
    }
}

/// Load the config file, then apply command-line overrides
pub fn config_from(matches: &ArgMatches) -> Result<Config> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load()?,
    };

    if let Some(&secs) = matches.get_one::<u64>("refresh") {
        config.refresh_secs = secs;
    }

    let t = &mut config.thresholds;
    let overrides: [(&str, &mut f64); 6] = [
        ("cpu-warning", &mut t.cpu_warning),
        ("cpu-critical", &mut t.cpu_critical),
        ("memory-warning", &mut t.memory_warning),
        ("memory-critical", &mut t.memory_critical),
        ("disk-warning", &mut t.disk_warning),
        ("disk-critical", &mut t.disk_critical),
    ];
    for (name, slot) in overrides {
        if let Some(&value) = matches.get_one::<f64>(name) {
            *slot = value;
        }
    }

    config.normalize();
    Ok(config)
}

pub fn options_from(matches: &ArgMatches, config: &Config) -> RunOptions {
    let watch = matches.get_flag("watch");
    RunOptions {
        selection: selection_from(matches),
        display: DisplayOptions {
            verbose: matches.get_flag("verbose"),
            compact: watch,
        },
        json: matches.get_flag("json"),
        watch,
        refresh_secs: watch::clamp_refresh(config.refresh_secs),
        ack_alerts: matches.get_flag("ack-alerts"),
    }
}

/// True when the invocation asks for anything at all
pub fn has_work(matches: &ArgMatches) -> bool {
    matches.get_flag("print-config")
        || matches.contains_id("container-logs")
        || !selection_from(matches).is_empty()
}

pub fn execute(matches: &ArgMatches) -> Result<()> {
    if matches.get_flag("no-color") {
        disable_colors();
    }

    let config = config_from(matches)?;
    if matches.get_flag("print-config") {
        println!(
            "{}",
            serde_json::to_string_pretty(&config).context("Failed to encode config")?
        );
        return Ok(());
    }

    let options = options_from(matches, &config);
    let mut dashboard = Dashboard::new(&config);

    if let Some(id) = matches.get_one::<String>("container-logs") {
        let tail = matches
            .get_one::<usize>("logs-limit")
            .copied()
            .unwrap_or(container_logs::DEFAULT_TAIL);
        return container_logs::execute(&dashboard, id, tail, options.json);
    }

    watch::validate_modes(options.json, options.watch)?;
    if options.watch {
        watch::execute(&mut dashboard, &options)
    } else {
        report::execute(&mut dashboard, &options)
    }
}
