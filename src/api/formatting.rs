//! Entity state output formatting and serialization
//!
//! Snapshots are plain values taken from live entities, so they can be logged,
//! written to files or shipped to another process without borrowing the
//! simulation.

pub use crate::simulation::entity::EntitySnapshot;

/// Text formatter for human-readable output
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    /// One line per entity instead of a block
    pub compact: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact() -> Self {
        Self { compact: true }
    }

    pub fn format_text(&self, snapshot: &EntitySnapshot) -> String {
        let side = if snapshot.hostile { "hostile" } else { "friendly" };

        if self.compact {
            return format!(
                "{} [{}] {:.6}°N, {:.6}°E hdg {:.1}° {:.1}%{}",
                snapshot.id,
                side,
                snapshot.position.lat,
                snapshot.position.lon,
                snapshot.heading_deg,
                snapshot.progress * 100.0,
                if snapshot.arrived { " arrived" } else { "" }
            );
        }

        let mut output = String::new();
        output.push_str(&format!("{} \"{}\" ({})\n", snapshot.id, snapshot.label, side));
        output.push_str(&format!("  Latitude:  {:.6}°\n", snapshot.position.lat));
        output.push_str(&format!("  Longitude: {:.6}°\n", snapshot.position.lon));
        output.push_str(&format!("  Heading:   {:.1}°\n", snapshot.heading_deg));
        output.push_str(&format!(
            "  Progress:  {:.1}% ({:.1} / {:.1} s)\n",
            snapshot.progress * 100.0,
            snapshot.elapsed_s,
            snapshot.duration_s
        ));
        output.push_str(&format!("  Distance:  {:.1} km\n", snapshot.distance_m / 1000.0));
        if snapshot.arrived {
            output.push_str("  Arrived\n");
        }
        output
    }
}

/// JSON formatter for machine-readable output
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format_json(&self, snapshot: &EntitySnapshot) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(snapshot)
        } else {
            serde_json::to_string(snapshot)
        }
    }

    pub fn format_all(&self, snapshots: &[EntitySnapshot]) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(snapshots)
        } else {
            serde_json::to_string(snapshots)
        }
    }
}

/// CSV formatter for data logging
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    pub include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self { include_header: true }
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> String {
        "id,label,hostile,latitude,longitude,heading_deg,progress,elapsed_s,duration_s,distance_m,arrived"
            .to_string()
    }

    pub fn format_csv(&self, snapshot: &EntitySnapshot) -> String {
        format!(
            "{},{},{},{:.6},{:.6},{:.2},{:.4},{:.3},{:.3},{:.1},{}",
            snapshot.id.raw(),
            escape_csv(&snapshot.label),
            snapshot.hostile,
            snapshot.position.lat,
            snapshot.position.lon,
            snapshot.heading_deg,
            snapshot.progress,
            snapshot.elapsed_s,
            snapshot.duration_s,
            snapshot.distance_m,
            snapshot.arrived
        )
    }

    /// Rows for every snapshot, preceded by the header when enabled
    pub fn format_all(&self, snapshots: &[EntitySnapshot]) -> String {
        let mut lines = Vec::with_capacity(snapshots.len() + 1);
        if self.include_header {
            lines.push(self.header());
        }
        lines.extend(snapshots.iter().map(|snapshot| self.format_csv(snapshot)));
        lines.join("\n")
    }
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
