//! Battery sampling through the `battery` crate.

use battery::units::energy::watt_hour;
use battery::units::power::watt;
use battery::units::ratio::percent;
use battery::units::time::second;
use battery::{State, Technology};

use crate::error::{MonitorError, Result};

use super::metrics::BatteryInfo;

/// Wear label from full-charge vs design capacity
pub fn health_label(wear_percent: f64) -> &'static str {
    if wear_percent >= 80.0 {
        "Good"
    } else if wear_percent >= 60.0 {
        "Fair"
    } else if wear_percent >= 40.0 {
        "Poor"
    } else {
        "Bad"
    }
}

/// `Hh Mm`
pub fn format_time_remaining(secs: u64) -> String {
    format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
}

fn state_label(state: State) -> &'static str {
    match state {
        State::Charging => "Charging",
        State::Discharging => "Discharging",
        State::Full => "Full",
        State::Empty => "Empty",
        _ => "Unknown",
    }
}

fn unavailable(e: battery::Error) -> MonitorError {
    MonitorError::collector_unavailable(format!("battery: {}", e))
}

/// First battery reported by the OS; hosts without one get
/// [`BatteryInfo::absent`].
pub fn collect_battery() -> Result<BatteryInfo> {
    let manager = battery::Manager::new().map_err(unavailable)?;
    let mut batteries = manager.batteries().map_err(unavailable)?;
    let battery = match batteries.next() {
        Some(found) => found.map_err(unavailable)?,
        None => return Ok(BatteryInfo::absent()),
    };

    let state = battery.state();
    let remaining = match state {
        State::Charging => battery.time_to_full(),
        State::Discharging => battery.time_to_empty(),
        _ => None,
    };
    let technology = match battery.technology() {
        Technology::Unknown => None,
        other => Some(other.to_string()),
    };

    let mut info = BatteryInfo {
        present: true,
        status: state_label(state).to_string(),
        percentage: f64::from(battery.state_of_charge().get::<percent>()),
        time_remaining: remaining
            .map(|t| format_time_remaining(t.get::<second>().max(0.0) as u64)),
        health: None,
        power_draw_watts: f64::from(battery.energy_rate().get::<watt>()),
        cycle_count: battery.cycle_count(),
        technology,
        full_capacity_wh: f64::from(battery.energy_full().get::<watt_hour>()),
        design_capacity_wh: f64::from(battery.energy_full_design().get::<watt_hour>()),
    };
    info.health = info.wear_percent().map(|w| health_label(w).to_string());

    log::debug!("battery {} at {:.1}%", info.status, info.percentage);
    Ok(info)
}
