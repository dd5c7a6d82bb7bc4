use build_matrix::cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli_args = cli::parse_args();

    // The run command hands back the matrix verdict; anything else that
    // escapes is an environment or configuration error.
    match cli::process_command(cli_args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
