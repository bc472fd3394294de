use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match group_editor_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("group-editor: {e}");
            ExitCode::FAILURE
        }
    }
}
