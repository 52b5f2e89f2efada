//! Network map: located devices drawn on a character canvas.

use owo_colors::OwoColorize;
use tabled::Tabled;

use oltnms_core::map::{self, PointKind, Projected};

use super::Ctx;
use crate::cli::{MapArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct LegendRow {
    #[tabled(rename = "#")]
    mark: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Name")]
    label: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Lat")]
    latitude: String,
    #[tabled(rename = "Lng")]
    longitude: String,
}

fn glyph(kind: PointKind) -> char {
    match kind {
        PointKind::Olt => 'O',
        PointKind::Onu => 'o',
    }
}

fn paint(c: char, status: &str, color: bool) -> String {
    if !color {
        return c.to_string();
    }
    match status {
        "online" => c.green().to_string(),
        "offline" | "los" | "dying_gasp" => c.red().to_string(),
        _ => c.yellow().to_string(),
    }
}

/// Rasterise projected points. A cell holding more than one device shows
/// `*`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
fn canvas(points: &[Projected], width: usize, height: usize, color: bool) -> String {
    let mut cells: Vec<Vec<Option<(char, &str)>>> = vec![vec![None; width]; height];
    let mut counts = vec![vec![0u32; width]; height];

    for p in points {
        let col = (p.x.max(0.0) as usize).min(width.saturating_sub(1));
        let row = (p.y.max(0.0) as usize).min(height.saturating_sub(1));
        counts[row][col] += 1;
        cells[row][col] = Some((glyph(p.point.kind), p.point.status.as_str()));
    }

    let border = format!("+{}+", "-".repeat(width));
    let mut lines = vec![border.clone()];
    for (row, count_row) in cells.iter().zip(&counts) {
        let mut line = String::from("|");
        for (cell, count) in row.iter().zip(count_row) {
            match cell {
                Some(_) if *count > 1 => line.push('*'),
                Some((c, status)) => line.push_str(&paint(*c, status, color)),
                None => line.push(' '),
            }
        }
        line.push('|');
        lines.push(line);
    }
    lines.push(border);
    lines.join("\n")
}

pub async fn handle(ctx: &Ctx<'_>, args: MapArgs) -> Result<(), CliError> {
    let global = ctx.global;
    let points = ctx.nms.map_points(args.onus).await?;
    let width = args.width.max(1);
    let height = args.height.max(1);
    // Keep the right and bottom edges inside the canvas.
    let projected = map::project(&points, f64::from(width - 1), f64::from(height - 1));

    let legend = output::render_list(
        global.output,
        &projected,
        |p: &Projected| LegendRow::from(p),
        |p| format!("{}:{}", p.point.kind, p.point.id),
    )?;
    if global.output != OutputFormat::Table {
        output::print_output(&legend, global.quiet);
        return Ok(());
    }

    if projected.is_empty() {
        if !global.quiet {
            eprintln!("No devices have coordinates set.");
        }
        return Ok(());
    }

    let color = output::should_color(global.color, &std::io::stdout());
    let drawn = canvas(&projected, usize::from(width), usize::from(height), color);
    output::print_output(&format!("{drawn}\n\n{legend}"), global.quiet);
    Ok(())
}

impl From<&Projected> for LegendRow {
    fn from(p: &Projected) -> Self {
        Self {
            mark: glyph(p.point.kind).to_string(),
            kind: p.point.kind.to_string(),
            label: p.point.label.clone(),
            status: p.point.status.clone(),
            latitude: format!("{:.5}", p.point.latitude),
            longitude: format!("{:.5}", p.point.longitude),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use oltnms_core::MapPoint;

    use super::*;

    fn point(kind: PointKind, id: i64, lat: f64, lng: f64) -> MapPoint {
        MapPoint {
            kind,
            id,
            label: format!("dev-{id}"),
            status: "online".into(),
            latitude: lat,
            longitude: lng,
        }
    }

    #[test]
    fn corners_land_inside_the_border() {
        let points = vec![
            point(PointKind::Olt, 1, -6.0, 106.0),
            point(PointKind::Onu, 2, -7.0, 107.0),
        ];
        let projected = map::project(&points, 9.0, 4.0);
        let drawn = canvas(&projected, 10, 5, false);
        let lines: Vec<&str> = drawn.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[1], "|O         |");
        assert_eq!(lines[5], "|         o|");
    }

    #[test]
    fn shared_cells_are_starred() {
        let points = vec![
            point(PointKind::Olt, 1, -6.0, 106.0),
            point(PointKind::Onu, 2, -6.0, 106.0),
        ];
        let projected = map::project(&points, 2.0, 2.0);
        let drawn = canvas(&projected, 3, 3, false);
        assert!(drawn.contains('*'));
        assert!(!drawn.contains('O'));
    }
}
