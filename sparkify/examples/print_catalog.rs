use sparkify::config::{read_config, CONFIG_FILE_PATH};
use sparkify::pipeline::stage::{Catalog, Stage};
use std::env;
use std::path::PathBuf;

fn main() {
    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_PATH));
    let config = read_config(&path).unwrap();
    let catalog = Catalog::new(&config);

    for stage in Stage::PROVISION.iter().chain(Stage::ETL.iter()) {
        for (position, request) in catalog.requests(*stage).iter().enumerate() {
            println!("-- {} {}", stage, position + 1);
            println!("{}", request.trim());
        }
    }
}
