use std::fmt;

use tracing::info;

use crate::measurement::MeasurementResult;

impl fmt::Display for MeasurementResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.model, self.address)?;
        if let Some(v) = self.temperature {
            write!(f, " temperature={v:.1}°C")?;
        }
        if let Some(v) = self.humidity {
            write!(f, " humidity={v:.1}%")?;
        }
        if let Some(v) = self.battery_level {
            write!(f, " battery={v}%")?;
        }
        if let Some(v) = self.conductivity {
            write!(f, " conductivity={v}µS/cm")?;
        }
        if let Some(v) = self.illuminance {
            write!(f, " illuminance={v}lx")?;
        }
        if let Some(v) = self.moisture {
            write!(f, " moisture={v}%")?;
        }
        if let Some(v) = self.formaldehyde {
            write!(f, " formaldehyde={v:.2}mg/m³")?;
        }
        if let Some(v) = self.motion {
            write!(f, " motion={v}")?;
        }
        if let Some(v) = self.is_active {
            write!(f, " active={v}")?;
        }
        if let Some(v) = self.tablet {
            write!(f, " tablet={v}%")?;
        }
        if let Some(v) = self.idle_time {
            write!(f, " idle={v}s")?;
        }
        Ok(())
    }
}

/// Log one line per populated field of a decoded result.
pub fn report(result: &MeasurementResult) {
    info!("Got {} ({}):", result.model, result.address);
    if let Some(v) = result.temperature {
        info!("  Temperature: {:.1}°C", v);
    }
    if let Some(v) = result.humidity {
        info!("  Humidity: {:.1}%", v);
    }
    if let Some(v) = result.battery_level {
        info!("  Battery Level: {}%", v);
    }
    if let Some(v) = result.conductivity {
        info!("  Conductivity: {}µS/cm", v);
    }
    if let Some(v) = result.illuminance {
        info!("  Illuminance: {}lx", v);
    }
    if let Some(v) = result.moisture {
        info!("  Moisture: {}%", v);
    }
    if let Some(v) = result.formaldehyde {
        info!("  Formaldehyde: {:.2}mg/m³", v);
    }
    if let Some(v) = result.motion {
        info!("  Motion: {}", v);
    }
    if let Some(v) = result.is_active {
        info!("  Active: {}", v);
    }
    if let Some(v) = result.tablet {
        info!("  Mosquito tablet: {}%", v);
    }
    if let Some(v) = result.idle_time {
        info!("  Idle time: {}s", v);
    }
}
