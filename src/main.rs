use libvirt_nethook::command::SystemRunner;
use libvirt_nethook::logging::{self, LogContext, LogSettings};
use libvirt_nethook::{HookExit, SYSLOG_IDENT, cli, config};
use std::ffi::OsString;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    // Variables already set in the environment take precedence
    config::load_env_file(Path::new(config::DEFAULT_ENV_FILE));

    let _guard = logging::init(&LogSettings::from_env(SYSLOG_IDENT));
    let log = LogContext::detect(SYSLOG_IDENT);
    let argv: Vec<OsString> = std::env::args_os().collect();

    let exit = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut stdin = io::stdin().lock();
        let mut stderr = io::stderr();
        cli::run(&argv, &mut stdin, &mut stderr, &SystemRunner, &log)
    }))
    .unwrap_or_else(|_| {
        if log.is_unattended() {
            error!(hook = log.ident(), "unhandled panic in hook");
        }
        HookExit::InternalFailure
    });

    ExitCode::from(exit.code())
}
