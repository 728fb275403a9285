use assert_cmd::Command;
use bon::bon;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::fixtures::EMPTY_FORWARD_CHAIN;

/// Temporary routing file plus fake `ip`/`iptables`/`ip6tables` scripts.
///
/// Every fake tool appends `<tool> <args>` to a shared calls file.
pub struct HookEnvironment {
    temp_dir: TempDir,
    routing_file: PathBuf,
    calls_file: PathBuf,
}

#[bon]
impl HookEnvironment {
    #[builder]
    pub fn new(
        #[builder(default)] routing: &str,
        #[builder(default = EMPTY_FORWARD_CHAIN)] iptables_listing: &str,
        #[builder(default = EMPTY_FORWARD_CHAIN)] ip6tables_listing: &str,
        #[builder(default = 0)] ip_exit_code: i32,
    ) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let routing_file = temp_dir.path().join("routed-ips");
        let calls_file = temp_dir.path().join("calls");
        fs::write(&routing_file, routing).unwrap();
        fs::write(&calls_file, "").unwrap();

        let env = Self {
            temp_dir,
            routing_file,
            calls_file,
        };
        env.fake_tool("ip", "", ip_exit_code);
        env.fake_tool("iptables", iptables_listing, 0);
        env.fake_tool("ip6tables", ip6tables_listing, 0);
        env
    }
}

impl HookEnvironment {
    pub fn tool(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Script that records its call, prints `listing` for `-L` and exits with `exit_code`
    fn fake_tool(&self, name: &str, listing: &str, exit_code: i32) {
        let script = format!(
            "#!/bin/sh\n\
             echo \"{name} $*\" >> '{calls}'\n\
             if [ \"$1\" = \"-L\" ]; then\n\
             cat <<'LISTING'\n{listing}\nLISTING\n\
             exit 0\n\
             fi\n\
             exit {exit_code}\n",
            name = name,
            calls = self.calls_file.display(),
            listing = listing,
            exit_code = exit_code,
        );
        let path = self.tool(name);
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    pub fn routing_file(&self) -> &Path {
        &self.routing_file
    }

    /// Hook binary wired to this environment, logging to stderr
    pub fn hook(&self) -> Command {
        let mut cmd = Command::cargo_bin("libvirt-nethook").unwrap();
        cmd.env_remove("RUST_LOG")
            .env("NETHOOK_LOG_TARGET", "stderr")
            .env("NETHOOK_IDENTITY", "network")
            .env("NETHOOK_ROUTING_FILE", &self.routing_file)
            .env("NETHOOK_IP", self.tool("ip"))
            .env("NETHOOK_IPTABLES", self.tool("iptables"))
            .env("NETHOOK_IP6TABLES", self.tool("ip6tables"));
        cmd
    }

    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.calls_file)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.contains(" -L "))
            .collect()
    }
}
