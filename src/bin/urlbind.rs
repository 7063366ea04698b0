use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    urlbind::logging::try_init();
    urlbind::cli::run_cli()
}
