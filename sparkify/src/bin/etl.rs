use sparkify::config::CONFIG_FILE_PATH;
use sparkify::run_etl;
use std::path::Path;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match run_etl(Path::new(CONFIG_FILE_PATH)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("etl failed: {e}");
            if let Some((stage, index)) = e.failed_statement() {
                eprintln!("statements before {stage} statement {index} stay committed");
                eprintln!("run create_tables before retrying");
            }
            ExitCode::FAILURE
        }
    }
}
