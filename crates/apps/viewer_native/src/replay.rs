use std::collections::VecDeque;
use std::path::Path;

use anyhow::Context;
use controls::{InteractionController, TimedInput, TooltipCommand};
use foundation::time::Millis;
use scene::MarkerSnapshot;
use streaming::MarkerFeed;
use tokio::time::Instant;

/// Scripted input, dispatched to the controller as its timestamps come due.
#[derive(Debug, Default)]
pub struct InputReplay {
    pending: VecDeque<TimedInput>,
}

impl InputReplay {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading input script {}", path.display()))?;
        let events: Vec<TimedInput> = serde_json::from_str(&text)
            .with_context(|| format!("parsing input script {}", path.display()))?;
        Ok(Self::from_events(events))
    }

    pub fn from_events(mut events: Vec<TimedInput>) -> Self {
        // Stable: same-timestamp events keep script order.
        events.sort_by_key(|e| e.at_ms);
        Self {
            pending: events.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }

    /// Feed every event stamped at or before `elapsed` to `ctrl`.
    ///
    /// Events carry their own timestamp as the controller's clock, so a
    /// replay is independent of how late the frame that dispatches it runs.
    pub fn dispatch_due(
        &mut self,
        elapsed: Millis,
        ctrl: &mut InteractionController,
        markers: &MarkerSnapshot,
    ) -> Vec<TooltipCommand> {
        let mut out = Vec::new();
        while let Some(next) = self.pending.front() {
            if next.at_ms > elapsed.0 {
                break;
            }
            let Some(input) = self.pending.pop_front() else {
                break;
            };
            if let Some(cmd) = ctrl.handle(&input.event, Millis(input.at_ms), markers) {
                out.push(cmd);
            }
        }
        out
    }
}

/// Wait for the feed's first published snapshot.
///
/// Returns `false` if `deadline` passes first or the feed loop has ended.
/// Without a deadline this waits for as long as the loop keeps running.
pub async fn wait_for_markers(markers: &mut MarkerFeed, deadline: Option<Instant>) -> bool {
    let expired = async {
        match deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::select! {
        published = markers.changed() => published,
        _ = expired => false,
    }
}
