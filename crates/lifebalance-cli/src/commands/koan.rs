use lifebalance_core::{Config, KoanPicker};

pub fn run(all: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut picker = KoanPicker::new(&config.koans.extra);
    if all {
        for koan in picker.koans() {
            println!("{koan}");
        }
    } else {
        println!("{}", picker.next_koan());
    }
    Ok(())
}
