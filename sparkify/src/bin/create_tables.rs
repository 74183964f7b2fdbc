use sparkify::config::CONFIG_FILE_PATH;
use sparkify::create_tables;
use std::path::Path;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match create_tables(Path::new(CONFIG_FILE_PATH)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("create_tables failed: {e}");
            if let Some((stage, index)) = e.failed_statement() {
                eprintln!("statements before {stage} statement {index} stay committed");
                eprintln!("run create_tables before retrying");
            }
            ExitCode::FAILURE
        }
    }
}
