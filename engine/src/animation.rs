//! Background task that plays the terminal intro on the tokio timer.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use anora_types::{AnimationConfig, TerminalView};

use crate::sequencer::{Jitter, Sequencer};

/// Handle to the running animation.
///
/// The loop never ends on its own. It stops when [`AnimationTask::cancel`] is called,
/// when the handle is dropped, or when every view receiver is gone.
#[derive(Debug)]
pub struct AnimationTask {
    handle: JoinHandle<()>,
    views: watch::Receiver<TerminalView>,
}

impl AnimationTask {
    /// Start the animation after `config.start_delay`. Must be called inside a tokio
    /// runtime.
    pub fn spawn(config: AnimationConfig, jitter: impl Jitter + 'static) -> Self {
        let (tx, views) = watch::channel(TerminalView::default());
        let start_delay = config.start_delay;
        let sequencer = Sequencer::new(config, jitter);
        let handle = tokio::spawn(run(sequencer, start_delay, tx));
        Self { handle, views }
    }

    /// A receiver that observes every published view.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TerminalView> {
        self.views.clone()
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for AnimationTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(
    mut sequencer: Sequencer,
    start_delay: Duration,
    views: watch::Sender<TerminalView>,
) {
    tokio::time::sleep(start_delay).await;
    loop {
        let wait = sequencer.step();
        if views.send(sequencer.view().clone()).is_err() {
            tracing::debug!("Animation stopped: no view receivers left");
            return;
        }
        tokio::time::sleep(wait).await;
    }
}
