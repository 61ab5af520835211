pub const REFINER_SYSTEM: &str = include_str!("../data/prompts/refiner_system.txt");
