use std::process::ExitCode;

mod watch;

fn main() -> ExitCode {
    env_logger::init();

    match watch::run() {
        Ok(watch::RunOutcome::FirstRun) => ExitCode::SUCCESS,
        Ok(watch::RunOutcome::Completed(summary)) => {
            log::debug!(
                "run complete: {} sent, {} failed",
                summary.sent(),
                summary.failed()
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("wikiwatch: {error}");
            ExitCode::FAILURE
        }
    }
}
