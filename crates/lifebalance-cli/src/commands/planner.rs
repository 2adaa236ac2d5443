use clap::Subcommand;
use lifebalance_core::planner::{positions, DAYS, EXPORT_FILENAME, EXPORT_MIME, SLOTS};
use lifebalance_core::{CellPos, PlannerGrid, SqliteStore};
use std::path::PathBuf;

use super::confirm;

#[derive(Subcommand)]
pub enum PlannerAction {
    /// Print the whole week
    Show,
    /// Write one cell
    Set {
        /// Slot index (0-2) or name (Morning, Afternoon, Evening)
        slot: String,
        /// Day index (0-6) or name (Mon..Sun)
        day: String,
        text: String,
    },
    /// Read one cell
    Get { slot: String, day: String },
    /// Erase every cell on this device
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Write all cells to a JSON file
    Export {
        #[arg(long, default_value = EXPORT_FILENAME)]
        out: PathBuf,
    },
}

fn parse_index(raw: &str, names: &[&str], what: &str) -> Result<usize, String> {
    if let Ok(i) = raw.parse::<usize>() {
        return Ok(i);
    }
    names
        .iter()
        .position(|n| n.eq_ignore_ascii_case(raw))
        .ok_or_else(|| format!("unknown {what}: {raw}"))
}

fn parse_pos(slot: &str, day: &str) -> Result<CellPos, Box<dyn std::error::Error>> {
    let slot = parse_index(slot, &SLOTS, "slot")?;
    let day = parse_index(day, &DAYS, "day")?;
    Ok(CellPos::new(slot, day)?)
}

pub fn run(action: PlannerAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    let mut grid = PlannerGrid::new(store);

    match action {
        PlannerAction::Show => {
            let cells: Vec<_> = positions().map(|p| grid.get_cell(p)).collect();
            println!("{:<10} {}", "", DAYS.join(" | "));
            for (slot, row) in SLOTS.iter().zip(cells.chunks(DAYS.len())) {
                println!("{slot:<10} {}", row.join(" | "));
            }
        }
        PlannerAction::Set { slot, day, text } => {
            grid.set_cell(parse_pos(&slot, &day)?, &text)?;
            println!("ok");
        }
        PlannerAction::Get { slot, day } => {
            println!("{}", grid.get_cell(parse_pos(&slot, &day)?));
        }
        PlannerAction::Clear { yes } => {
            if !yes && !confirm("Clear all planner data for this device?")? {
                println!("cancelled");
                return Ok(());
            }
            grid.clear_all()?;
            println!("planner cleared");
        }
        PlannerAction::Export { out } => {
            std::fs::write(&out, grid.export_json()?)?;
            println!("exported to {} ({EXPORT_MIME})", out.display());
        }
    }
    Ok(())
}
