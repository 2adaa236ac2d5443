use clap::Subcommand;
use lifebalance_core::{BalanceInputs, BalanceModel, BalanceSlider, SqliteStore};

#[derive(Subcommand)]
pub enum BalanceAction {
    /// Print the sliders and the derived score as JSON
    Show,
    /// Set one slider (work, study, health, fun)
    Set {
        slider: BalanceSlider,
        #[arg(allow_hyphen_values = true)]
        value: i64,
    },
}

pub fn run(action: BalanceAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    let mut model = BalanceModel::load(store);

    if let BalanceAction::Set { slider, value } = action {
        model.set_input(slider, value)?;
    }

    let report = serde_json::json!({
        "inputs": slider_values(&model.inputs()),
        "score": model.score(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn slider_values(inputs: &BalanceInputs) -> serde_json::Map<String, serde_json::Value> {
    BalanceSlider::ALL
        .into_iter()
        .map(|slider| (slider.name().to_string(), inputs.get(slider).into()))
        .collect()
}
