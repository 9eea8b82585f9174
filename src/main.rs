// src/main.rs

use reconflow::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        let task_errors = reconflow::task_errors(&err);
        if task_errors.is_empty() {
            eprintln!("reconflow error: {err:?}");
        } else {
            eprintln!("reconflow error: {} task(s) failed", task_errors.len());
            for task_err in task_errors {
                eprintln!("  - {task_err}");
            }
        }
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
