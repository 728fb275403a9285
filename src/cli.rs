//! Command line surface of the hook binary.

use crate::command::CommandRunner;
use crate::config::{
    DEFAULT_IP_COMMAND, DEFAULT_IP6TABLES_COMMAND, DEFAULT_IPTABLES_COMMAND, DEFAULT_ROUTING_FILE,
    Settings, ToolPaths,
};
use crate::handlers::{Dispatcher, HookExit};
use crate::libvirt::{NetworkEvent, identity_from_path};
use crate::logging::LogContext;
use clap::Parser;
use clap::error::ErrorKind;
use std::error::Error as _;
use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::error;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "libvirt network hook maintaining routes and FORWARD rules for routed guest IPs",
    long_about = None
)]
pub struct Args {
    /// libvirt network name
    pub network: String,

    /// Hook action, e.g. started, plugged, stopped
    pub action: String,

    /// Hook state, begin or end
    pub state: String,

    /// Network XML, or "-" to read it from stdin
    #[arg(allow_hyphen_values = true)]
    pub payload: String,

    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,

    /// File mapping routed addresses to network names
    #[arg(long, env = "NETHOOK_ROUTING_FILE", default_value = DEFAULT_ROUTING_FILE)]
    pub routing_file: PathBuf,

    #[arg(long, env = "NETHOOK_IP", default_value = DEFAULT_IP_COMMAND)]
    pub ip_command: PathBuf,

    #[arg(long, env = "NETHOOK_IPTABLES", default_value = DEFAULT_IPTABLES_COMMAND)]
    pub iptables_command: PathBuf,

    #[arg(long, env = "NETHOOK_IP6TABLES", default_value = DEFAULT_IP6TABLES_COMMAND)]
    pub ip6tables_command: PathBuf,

    /// Hook identity; defaults to the file name the hook was invoked as
    #[arg(long, env = "NETHOOK_IDENTITY")]
    pub hook_identity: Option<String>,
}

impl Args {
    pub fn settings(&self) -> Settings {
        Settings::builder()
            .routing_file(self.routing_file.clone())
            .tools(
                ToolPaths::builder()
                    .ip(self.ip_command.clone())
                    .iptables(self.iptables_command.clone())
                    .ip6tables(self.ip6tables_command.clone())
                    .build(),
            )
            .build()
    }

    pub fn event(&self, program: &str) -> NetworkEvent {
        let identity = self
            .hook_identity
            .clone()
            .unwrap_or_else(|| identity_from_path(program));
        NetworkEvent::new(
            identity,
            self.network.clone(),
            &self.action,
            &self.state,
            &self.payload,
        )
    }
}

/// Parse `argv`, dispatch the event and map every outcome to an exit status
pub fn run<R: CommandRunner>(
    argv: &[OsString],
    stdin: &mut dyn Read,
    stderr: &mut dyn Write,
    runner: &R,
    log: &LogContext,
) -> HookExit {
    let program = argv
        .first()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "network".to_string());

    let args = match Args::try_parse_from(argv) {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            // Help and version go to stdout
            let _ = e.print();
            return HookExit::Handled;
        }
        Err(_) => return usage_error(&program, argv, stderr, log),
    };

    let settings = args.settings();
    let event = args.event(&program);

    match Dispatcher::new(&settings, runner, log).dispatch(&event, stdin, stderr) {
        Ok(exit) => exit,
        Err(e) => {
            let mut message = e.to_string();
            let mut source = e.source();
            while let Some(cause) = source {
                message.push_str(&format!(": {}", cause));
                source = cause.source();
            }
            if log.is_unattended() {
                error!(hook = log.ident(), "unhandled error in hook: {}", message);
            } else {
                let _ = writeln!(stderr, "error: {}", message);
            }
            HookExit::InternalFailure
        }
    }
}

fn usage_error(
    program: &str,
    argv: &[OsString],
    stderr: &mut dyn Write,
    log: &LogContext,
) -> HookExit {
    let _ = writeln!(stderr, "usage: {} NETWORK_NAME ACTION STATUS -", program);
    if log.is_unattended() {
        let call: Vec<String> = argv
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        error!(hook = log.ident(), "bad call to {}: {}", program, call.join(" "));
    }
    HookExit::Usage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandOutput, PlannedCommand};
    use std::cell::RefCell;
    use std::io;

    #[derive(Default)]
    struct RecordingRunner {
        calls: RefCell<Vec<String>>,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, command: &PlannedCommand) -> io::Result<CommandOutput> {
            self.calls.borrow_mut().push(command.to_string());
            Ok(CommandOutput {
                success: true,
                exit_code: Some(0),
                ..Default::default()
            })
        }
    }

    fn argv(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    fn run_with(args: &[&str]) -> (HookExit, String, Vec<String>) {
        let runner = RecordingRunner::default();
        let log = LogContext::new("libvirt-nethook-helper", true);
        let mut stderr = Vec::new();
        let exit = run(&argv(args), &mut io::empty(), &mut stderr, &runner, &log);
        (
            exit,
            String::from_utf8(stderr).unwrap(),
            runner.calls.into_inner(),
        )
    }

    #[test]
    fn test_too_few_arguments_is_usage_error() {
        let (exit, stderr, calls) = run_with(&["/etc/libvirt/hooks/network", "net-a", "started"]);
        assert_eq!(exit, HookExit::Usage);
        assert_eq!(
            stderr,
            "usage: /etc/libvirt/hooks/network NETWORK_NAME ACTION STATUS -\n"
        );
        assert!(calls.is_empty());
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let (exit, stderr, _) = run_with(&["network", "net-a", "updated", "begin", "-", "extra"]);
        assert_eq!(exit, HookExit::Handled);
        assert!(stderr.is_empty());
    }

    #[test]
    fn test_unhandled_combination_exit() {
        let (exit, stderr, _) = run_with(&["network", "net-a", "started", "end", "-"]);
        assert_eq!(exit, HookExit::UnhandledCombination);
        assert_eq!(stderr, "unhandled combination: started end\n");
    }

    #[test]
    fn test_internal_failure_exit() {
        let (exit, stderr, calls) = run_with(&["network", "net-a", "started", "begin", "<network"]);
        assert_eq!(exit, HookExit::InternalFailure);
        assert!(stderr.starts_with("error: Malformed libvirt XML payload"));
        assert!(calls.is_empty());
    }

    #[test]
    fn test_identity_from_argv_and_override() {
        let args = Args::try_parse_from(argv(&[
            "/etc/libvirt/hooks/network-routes",
            "net-a",
            "stopped",
            "end",
            "-",
        ]))
        .unwrap();
        assert_eq!(args.event("/etc/libvirt/hooks/network-routes").identity, "network-routes");

        let args = Args::try_parse_from(argv(&[
            "/usr/local/bin/libvirt-nethook",
            "--hook-identity",
            "network",
            "net-a",
            "stopped",
            "end",
            "-",
        ]))
        .unwrap();
        assert_eq!(args.event("/usr/local/bin/libvirt-nethook").identity, "network");
    }

    #[test]
    fn test_settings_from_options() {
        let args = Args::try_parse_from(argv(&[
            "network",
            "--routing-file",
            "/tmp/routed-ips",
            "--ip-command",
            "/usr/sbin/ip",
            "net-a",
            "started",
            "begin",
            "-",
        ]))
        .unwrap();
        let settings = args.settings();
        assert_eq!(settings.routing_file, PathBuf::from("/tmp/routed-ips"));
        assert_eq!(settings.tools.ip, PathBuf::from("/usr/sbin/ip"));
    }
}
