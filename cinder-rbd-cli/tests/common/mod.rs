#![allow(dead_code)]

use assert_cmd::Command;
use cinder_rbd::constants::envs;
use cinder_test_utils::{FakeTools, FakeToolsBuilder};
use std::time::Duration;

pub struct TestContext {
    pub cmd: Command,
    pub tools: FakeTools,
}

impl TestContext {
    /// Another command sharing the same fake tools
    pub fn new_cmd(&self) -> Command {
        command(&self.tools)
    }
}

fn command(tools: &FakeTools) -> Command {
    let bin_path = env!("CARGO_BIN_EXE_cinder-rbd");
    let mut cmd = Command::new(bin_path);
    // You can override this with .timeout(Duration::from_secs(N))
    cmd.timeout(Duration::from_secs(30));
    cmd.env("PATH", tools.search_path());
    cmd.env_remove(envs::SEARCH_PATH);
    cmd.env_remove(envs::CONFIG);
    cmd.env_remove("RUST_LOG");
    // Keep a host options file from leaking into the tests
    cmd.env("XDG_CONFIG_HOME", tools.bin_dir());
    cmd
}

pub fn cinder_rbd() -> TestContext {
    with_tools(FakeTools::builder())
}

pub fn with_tools(builder: FakeToolsBuilder) -> TestContext {
    let tools = builder.build();
    TestContext {
        cmd: command(&tools),
        tools,
    }
}
