use metrogen_core::{Assembly, ReportPair};
use schemars::schema_for;

fn main() {
    let target = std::env::args().nth(1).unwrap_or_else(|| "report".to_string());
    let schema = match target.as_str() {
        "pair" => schema_for!(ReportPair),
        "assembly" => schema_for!(Assembly),
        _ => schema_for!(metrogen_core::Report),
    };
    let json = serde_json::to_string_pretty(&schema).expect("serialize json schema");
    println!("{json}");
}
