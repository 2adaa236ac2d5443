use clap::Subcommand;
use lifebalance_core::habits::HABIT_KEY_PREFIX;
use lifebalance_core::{Config, HabitDay, KeyValueStore, SqliteStore};

use super::confirm;

#[derive(Subcommand)]
pub enum HabitsAction {
    /// Print today's checklist, mood and progress
    Show,
    /// Check or uncheck a habit by its number
    Toggle { number: usize },
    /// Set today's mood (-2 to 2)
    Mood {
        #[arg(allow_hyphen_values = true)]
        value: i64,
    },
    /// Forget today's record
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// List the days that have a record
    Days,
}

fn print_day<S: KeyValueStore>(habits: &HabitDay<S>) {
    println!("{}", habits.date().format("%Y-%m-%d"));
    for (i, (name, done)) in habits
        .templates()
        .iter()
        .zip(&habits.record().checks)
        .enumerate()
    {
        let mark = if *done { "x" } else { " " };
        println!("  {}. [{mark}] {name}", i + 1);
    }
    println!("mood: {} ({})", habits.mood().face(), habits.mood().value());
    println!("progress: {}%", habits.progress_percent());
}

pub fn run(action: HabitsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let store = SqliteStore::open()?;

    if let HabitsAction::Days = action {
        for key in store.keys_with_prefix(HABIT_KEY_PREFIX)? {
            println!("{}", key.trim_start_matches(HABIT_KEY_PREFIX));
        }
        return Ok(());
    }

    let mut habits = HabitDay::today(store, config.habits.templates);

    match action {
        HabitsAction::Show | HabitsAction::Days => {}
        HabitsAction::Toggle { number } => {
            let index = number
                .checked_sub(1)
                .ok_or("habit numbers start at 1")?;
            habits.toggle(index)?;
        }
        HabitsAction::Mood { value } => habits.set_mood(value)?,
        HabitsAction::Reset { yes } => {
            if !yes && !confirm("Reset today's habit checks?")? {
                println!("cancelled");
                return Ok(());
            }
            habits.reset_today()?;
        }
    }

    print_day(&habits);
    Ok(())
}
