//! Terminal rendering of waypoint pages and search results

use crate::catalog::Waypoint;
use crate::search::strip_markup;
use crate::server::protocol::ViewResponse;
use crate::session::SortMode;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print one page of a browsing session
pub fn print_view(view: &ViewResponse, color: bool) -> io::Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    let sort_label = match view.sort {
        SortMode::Alphabetical => "A-Z",
        SortMode::Distance => "distance",
    };

    stdout.set_color(ColorSpec::new().set_bold(true))?;
    if view.total_pages == 0 {
        writeln!(stdout, "No waypoints")?;
        stdout.reset()?;
        return Ok(());
    }
    writeln!(
        stdout,
        "Page {}/{} - {} waypoints, sorted by {}",
        view.page + 1,
        view.total_pages,
        view.total_results,
        sort_label
    )?;
    stdout.reset()?;
    writeln!(stdout)?;

    for entry in &view.entries {
        // Waypoint name
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(stdout, "{}", entry.name)?;
        stdout.reset()?;

        // Destination id
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(stdout, "  ({})", entry.destination_id)?;
        stdout.reset()?;

        // Distance, when ranked
        if let Some(distance) = &entry.distance {
            stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            write!(stdout, "  {distance}")?;
            stdout.reset()?;
        }
        writeln!(stdout)?;

        // Display name, if it differs from the raw name
        let display = strip_markup(&entry.display_name);
        if display != entry.name {
            writeln!(stdout, "    {display}")?;
        }

        // Lore lines
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        for line in &entry.lore {
            writeln!(stdout, "    {}", strip_markup(line))?;
        }
        stdout.reset()?;
    }

    Ok(())
}

/// Print a flat search result list
pub fn print_results(results: &[Waypoint], query: &str, color: bool) -> io::Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    if results.is_empty() {
        writeln!(stdout, "No waypoints match \"{query}\"")?;
        return Ok(());
    }

    for waypoint in results {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(stdout, "{}", waypoint.name)?;
        stdout.reset()?;

        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        writeln!(stdout, "  ({})", waypoint.destination_id)?;
        stdout.reset()?;

        for line in &waypoint.lore {
            writeln!(stdout, "    {}", strip_markup(line))?;
        }
    }

    stdout.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(stdout, "\n{} waypoints", results.len())?;
    stdout.reset()?;

    Ok(())
}
