use schemars::schema_for;
use tracefixture_core::FixtureConfig;

fn main() {
    let schema = schema_for!(FixtureConfig);
    let json = serde_json::to_string_pretty(&schema).expect("serialize json schema");
    println!("{json}");
}
