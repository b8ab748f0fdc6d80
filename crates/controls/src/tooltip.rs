use scene::FlightInfo;

/// Pixel offset between the pointer and the tooltip's top-left corner.
pub const TOOLTIP_OFFSET_PX: f64 = 10.0;

/// Request to the UI layer that owns the tooltip element.
#[derive(Debug, Clone, PartialEq)]
pub enum TooltipCommand {
    Show { x: f64, y: f64, text: String },
    Hide,
}

impl TooltipCommand {
    /// Show `info` next to a pointer at `pos_px`.
    pub fn show(pos_px: [f64; 2], info: &FlightInfo) -> Self {
        TooltipCommand::Show {
            x: pos_px[0] + TOOLTIP_OFFSET_PX,
            y: pos_px[1] + TOOLTIP_OFFSET_PX,
            text: tooltip_text(info),
        }
    }
}

/// One line per field: callsign, altitude in meters, velocity in m/s.
pub fn tooltip_text(info: &FlightInfo) -> String {
    format!(
        "Callsign: {}\nAltitude: {}\nVelocity: {}",
        info.callsign,
        with_unit(info.altitude, "m"),
        with_unit(info.velocity, "m/s"),
    )
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v}{unit}"),
        None => "N/A".to_string(),
    }
}
