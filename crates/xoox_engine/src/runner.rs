//! Async driver for a [`MatchController`].
//!
//! The runner task is the only owner of the controller. Hosts talk to it
//! through a [`MatchHandle`] and observe it through a stream of
//! [`MatchEvent`]s. The AI's delayed reply and the clock are
//! [`TimerHandle`]s that post epoch-tagged commands back into the runner's
//! queue; anything tagged with an older epoch is dropped on arrival.

use crate::board::Board;
use crate::config::MatchTiming;
use crate::controller::{MatchController, MatchPhase, MatchState, Transition};
use crate::timer::TimerHandle;
use crate::types::{MatchResult, Turn};
use derive_more::{Display, Error};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// Notification published by the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    /// A fresh match is ready for the human's first move.
    Started(MatchState),
    /// A mark was placed.
    MoveApplied {
        /// Side that moved.
        mover: Turn,
        /// Cell that was marked.
        index: usize,
        /// Board after the move.
        board: Board,
    },
    /// The AI's reply is scheduled.
    AiThinking,
    /// The clock advanced.
    Tick {
        /// Seconds elapsed so far.
        elapsed_seconds: u32,
    },
    /// The match ended.
    Finished {
        /// Terminal result.
        result: MatchResult,
        /// Final clock value.
        elapsed_seconds: u32,
    },
    /// The match was reset to its initial state.
    Reset(MatchState),
}

/// Error talking to a runner that has already stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum RunnerError {
    /// The runner task is gone.
    #[display("Match runner has stopped")]
    Stopped,
}

#[derive(Debug)]
enum Command {
    HumanMove(usize),
    Reset,
    Snapshot(oneshot::Sender<MatchState>),
    Shutdown,
    AiMove { epoch: u64 },
    Tick { epoch: u64 },
}

/// Front door to a running match.
#[derive(Debug)]
pub struct MatchHandle {
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl MatchHandle {
    /// Submits the human's move. Illegal or untimely moves are ignored by the runner.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Stopped`] if the runner has exited.
    pub fn submit_move(&self, index: usize) -> Result<(), RunnerError> {
        self.send(Command::HumanMove(index))
    }

    /// Resets the match, cancelling any pending AI move.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Stopped`] if the runner has exited.
    pub fn reset(&self) -> Result<(), RunnerError> {
        self.send(Command::Reset)
    }

    /// Returns a copy of the current match state.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Stopped`] if the runner has exited.
    pub async fn snapshot(&self) -> Result<MatchState, RunnerError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx))?;
        rx.await.map_err(|_| RunnerError::Stopped)
    }

    /// Stops the runner and waits for it to exit. Pending timers are cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Stopped`] if the runner task panicked.
    pub async fn shutdown(self) -> Result<(), RunnerError> {
        // The runner may already be gone; joining below still succeeds.
        let _ = self.commands.send(Command::Shutdown);
        self.task.await.map_err(|_| RunnerError::Stopped)
    }

    fn send(&self, command: Command) -> Result<(), RunnerError> {
        self.commands.send(command).map_err(|_| RunnerError::Stopped)
    }
}

/// Owns a controller and schedules its AI moves and clock ticks.
#[derive(Debug)]
pub struct MatchRunner {
    controller: MatchController,
    timing: MatchTiming,
    commands: mpsc::UnboundedReceiver<Command>,
    // Weak so the queue closes once every MatchHandle is gone.
    timer_tx: mpsc::WeakUnboundedSender<Command>,
    events: mpsc::UnboundedSender<MatchEvent>,
    clock: Option<TimerHandle>,
    pending_ai: Option<TimerHandle>,
}

impl MatchRunner {
    /// Spawns the runner on the current tokio runtime.
    ///
    /// Returns the handle and the event stream. The first event is
    /// [`MatchEvent::Started`].
    #[instrument(skip_all, fields(name = %controller.config().name()))]
    pub fn spawn(
        controller: MatchController,
        timing: MatchTiming,
    ) -> (MatchHandle, mpsc::UnboundedReceiver<MatchEvent>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let runner = Self {
            controller,
            timing,
            commands: command_rx,
            timer_tx: command_tx.downgrade(),
            events: event_tx,
            clock: None,
            pending_ai: None,
        };
        let task = tokio::spawn(runner.run());

        let handle = MatchHandle {
            commands: command_tx,
            task,
        };
        (handle, event_rx)
    }

    async fn run(mut self) {
        info!("Match runner started");
        self.start_clock();
        self.emit(MatchEvent::Started(self.controller.state().clone()));

        while let Some(command) = self.commands.recv().await {
            match command {
                Command::HumanMove(index) => {
                    let transition = self.controller.submit_human_move(index);
                    self.after(transition);
                }
                Command::AiMove { epoch } => {
                    if epoch != self.controller.epoch() {
                        debug!(epoch, "Stale AI move dropped");
                        continue;
                    }
                    self.pending_ai = None;
                    let transition = self.controller.run_ai_turn();
                    let still_due = transition == Transition::Ignored
                        && self.controller.phase() == MatchPhase::Ongoing
                        && *self.controller.state().turn() == Turn::Ai;
                    self.after(transition);
                    if still_due {
                        debug!("AI move discarded, asking the strategy again");
                        self.schedule_ai();
                    }
                }
                Command::Tick { epoch } => {
                    if epoch == self.controller.epoch() && self.controller.tick() {
                        self.emit(MatchEvent::Tick {
                            elapsed_seconds: *self.controller.state().elapsed_seconds(),
                        });
                    }
                }
                Command::Reset => {
                    self.cancel_timers();
                    self.controller.reset();
                    self.start_clock();
                    self.emit(MatchEvent::Reset(self.controller.state().clone()));
                }
                Command::Snapshot(reply) => {
                    let _ = reply.send(self.controller.state().clone());
                }
                Command::Shutdown => break,
            }
        }

        self.cancel_timers();
        info!("Match runner stopped");
    }

    fn after(&mut self, transition: Transition) {
        match transition {
            Transition::Ignored => {}
            Transition::Continued { mover, index } => {
                self.emit_move(mover, index);
                if mover.next() == Turn::Ai {
                    self.schedule_ai();
                }
            }
            Transition::Finished {
                mover,
                index,
                result,
            } => {
                self.cancel_timers();
                self.emit_move(mover, index);
                self.emit(MatchEvent::Finished {
                    result,
                    elapsed_seconds: *self.controller.state().elapsed_seconds(),
                });
            }
        }
    }

    fn schedule_ai(&mut self) {
        let epoch = self.controller.epoch();
        let tx = self.timer_tx.clone();
        self.pending_ai = Some(TimerHandle::after(*self.timing.ai_delay(), move || {
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(Command::AiMove { epoch });
            }
        }));
        self.emit(MatchEvent::AiThinking);
    }

    fn start_clock(&mut self) {
        let epoch = self.controller.epoch();
        let tx = self.timer_tx.clone();
        self.clock = Some(TimerHandle::every(*self.timing.tick(), move || {
            tx.upgrade()
                .is_some_and(|tx| tx.send(Command::Tick { epoch }).is_ok())
        }));
    }

    fn cancel_timers(&mut self) {
        if let Some(timer) = self.pending_ai.take() {
            debug!("Pending AI move cancelled");
            timer.cancel();
        }
        if let Some(timer) = self.clock.take() {
            timer.cancel();
        }
    }

    fn emit_move(&self, mover: Turn, index: usize) {
        self.emit(MatchEvent::MoveApplied {
            mover,
            index,
            board: *self.controller.state().board(),
        });
    }

    fn emit(&self, event: MatchEvent) {
        if self.events.send(event).is_err() {
            debug!("No match observer listening, event dropped");
        }
    }
}
