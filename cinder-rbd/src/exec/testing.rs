//! In-process fakes for driver unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use cinder_shared::CommandError;
use parking_lot::Mutex;

use super::{CommandRunner, ToolLocator};

/// Locator that knows a fixed set of tools under `/fake/bin`.
pub(crate) struct FakeLocator {
    tools: HashSet<String>,
}

impl FakeLocator {
    pub(crate) fn with(tools: &[&str]) -> Self {
        Self {
            tools: tools.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl ToolLocator for FakeLocator {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        self.tools
            .contains(tool)
            .then(|| Path::new("/fake/bin").join(tool))
    }
}

/// Scripted outcome of one invocation.
#[derive(Clone)]
pub(crate) enum Reply {
    Ok(String),
    Exit(i32, String),
}

/// Runner replaying scripted replies and recording every invocation.
///
/// Replies are keyed by `"<tool> <first arg>"` (e.g. `"rbd map"`) or by the
/// bare tool name. Unscripted invocations succeed with empty output.
#[derive(Default)]
pub(crate) struct FakeRunner {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue a reply; the last queued reply for a key repeats.
    pub(crate) fn reply(self, key: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .entry(key.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// All invocations so far as `"<tool> <args...>"`.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Number of invocations starting with `prefix`.
    pub(crate) fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn next_reply(&self, key: &str) -> Option<Reply> {
        let mut replies = self.replies.lock();
        let queue = replies.get_mut(key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Result<String, CommandError> {
        let tool = program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut call = tool.clone();
        for arg in args {
            call.push(' ');
            call.push_str(arg);
        }
        self.calls.lock().push(call);

        let keyed = args.first().map(|first| format!("{} {}", tool, first));
        let reply = keyed
            .and_then(|key| self.next_reply(&key))
            .or_else(|| self.next_reply(&tool));

        match reply {
            None => Ok(String::new()),
            Some(Reply::Ok(output)) => Ok(output),
            Some(Reply::Exit(code, output)) => Err(CommandError::Exit {
                program: program.display().to_string(),
                args: args.iter().map(|a| a.to_string()).collect(),
                code: Some(code),
                output,
            }),
        }
    }
}
