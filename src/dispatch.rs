//! Drives one invocation from parsed command to stage handlers.
//!
//! `Idle → Parsed → Validated → LoggingReady → Dispatched → Done | Failed`
//!
//! Validation failures go straight to `Failed` with no side effects. `mle`
//! skips `LoggingReady`. `run` stops at the first failing stage.

use crate::cli::Command;
use crate::config::{Invocation, normalize};
use crate::error::{Error, Result};
use crate::logging::{LogInstaller, LogPlan};
use crate::stages::{Stage, StageHandler, StageRegistry};
use tracing::{error, info};

/// Dispatcher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Nothing has happened yet.
    Idle,
    /// The command line was parsed.
    Parsed,
    /// Every option passed validation.
    Validated,
    /// Shared logging is set up.
    LoggingReady,
    /// Handlers are being invoked.
    Dispatched,
    /// Every handler returned normally.
    Done,
    /// Something failed; see [`DispatchReport::error`].
    Failed,
}

/// What happened during one dispatch.
#[derive(Debug)]
pub struct DispatchReport {
    history: Vec<DispatchState>,
    invoked: Vec<Stage>,
    error: Option<Error>,
}

impl DispatchReport {
    fn parsed() -> Self {
        Self {
            history: vec![DispatchState::Idle, DispatchState::Parsed],
            invoked: Vec::new(),
            error: None,
        }
    }

    fn enter(&mut self, state: DispatchState) {
        self.history.push(state);
    }

    fn fail(mut self, error: Error) -> Self {
        self.history.push(DispatchState::Failed);
        self.error = Some(error);
        self
    }

    fn done(mut self) -> Self {
        self.history.push(DispatchState::Done);
        self
    }

    /// Every state visited, in order.
    pub fn history(&self) -> &[DispatchState] {
        &self.history
    }

    /// Terminal state.
    pub fn state(&self) -> DispatchState {
        self.history.last().copied().unwrap_or(DispatchState::Idle)
    }

    /// Stages whose handler was called, in call order.
    pub fn invoked(&self) -> &[Stage] {
        &self.invoked
    }

    /// Error that ended the dispatch, if any.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// `Ok` when the dispatch reached `Done`.
    pub fn into_result(self) -> Result<()> {
        self.error.map_or(Ok(()), Err)
    }
}

/// Validates a parsed command, sets up logging and calls stage handlers.
#[derive(Debug)]
pub struct Dispatcher<L> {
    registry: StageRegistry,
    installer: L,
}

impl<L: LogInstaller> Dispatcher<L> {
    /// Dispatcher over `registry`, setting up logging with `installer`.
    pub fn new(registry: StageRegistry, installer: L) -> Self {
        Self {
            registry,
            installer,
        }
    }

    /// Dispatch `command`; `argv` is the full command line, program name
    /// first, recorded as the first log entry.
    pub fn dispatch(&self, command: Command, argv: &[String]) -> DispatchReport {
        let mut report = DispatchReport::parsed();

        let invocation = match normalize(command) {
            Ok(invocation) => invocation,
            Err(e) => return report.fail(e),
        };
        report.enter(DispatchState::Validated);

        if invocation.subcommand().uses_shared_logging() {
            let plan = LogPlan::new(&invocation, argv);
            if let Err(e) = self.installer.install(&plan) {
                return report.fail(e);
            }
            report.enter(DispatchState::LoggingReady);
        }

        let handlers = match self.resolve_handlers(&invocation) {
            Ok(handlers) => handlers,
            Err(e) => {
                error!("{e}");
                return report.fail(e);
            }
        };

        report.enter(DispatchState::Dispatched);
        for (config, handler) in invocation.stages().iter().zip(handlers) {
            let stage = config.stage();
            report.invoked.push(stage);
            info!("Running {stage}");
            if let Err(source) = handler.handle(config) {
                error!("{stage} failed: {}: {source}", source.kind());
                return report.fail(Error::StageExecution { stage, source });
            }
        }

        info!("Done: {}", invocation.subcommand());
        report.done()
    }

    /// Handlers for every stage of `invocation`, looked up before any runs.
    fn resolve_handlers(&self, invocation: &Invocation) -> Result<Vec<&dyn StageHandler>> {
        invocation
            .stages()
            .iter()
            .map(|config| self.registry.handler(config.stage()))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::{Parsed, parse_args};
    use crate::config::StageConfig;
    use crate::logging::LogMode;
    use crate::stages::StageError;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    #[derive(Default)]
    struct RecordingInstaller {
        plans: RefCell<Vec<(PathBuf, LogMode)>>,
        fail: bool,
    }

    impl LogInstaller for &RecordingInstaller {
        fn install(&self, plan: &LogPlan) -> Result<()> {
            if self.fail {
                return Err(Error::LoggingInit {
                    path: plan.path().to_path_buf(),
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                });
            }
            self.plans
                .borrow_mut()
                .push((plan.path().to_path_buf(), plan.mode()));
            Ok(())
        }
    }

    type Calls = Rc<RefCell<Vec<Stage>>>;

    fn registry(calls: &Calls, failing: Option<Stage>) -> StageRegistry {
        let mut registry = StageRegistry::new();
        for stage in Stage::ALL {
            let calls = Rc::clone(calls);
            registry
                .register(stage, move |config: &StageConfig| {
                    calls.borrow_mut().push(config.stage());
                    if failing == Some(config.stage()) {
                        return Err(StageError::Failed {
                            message: "no fastq files found".to_string(),
                        });
                    }
                    Ok(())
                })
                .unwrap();
        }
        registry
    }

    fn command(args: &[&str]) -> (Command, Vec<String>) {
        let mut argv = vec!["barcode-processor"];
        argv.extend_from_slice(args);
        let Parsed::Command(command) = parse_args(&argv).unwrap() else {
            panic!("expected a command");
        };
        (command, argv.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn test_run_invokes_count_then_test() {
        let calls = Calls::default();
        let installer = RecordingInstaller::default();
        let dispatcher = Dispatcher::new(registry(&calls, None), &installer);
        let (cmd, argv) = command(&["run", "-c", "c1", "-t", "t1", "-o", "screen"]);

        let report = dispatcher.dispatch(cmd, &argv);

        assert_eq!(report.state(), DispatchState::Done);
        assert_eq!(report.invoked(), &[Stage::Count, Stage::Test]);
        assert_eq!(*calls.borrow(), vec![Stage::Count, Stage::Test]);
        assert_eq!(
            *installer.plans.borrow(),
            vec![(PathBuf::from("screen.log"), LogMode::Truncate)]
        );
        assert_eq!(
            report.history(),
            &[
                DispatchState::Idle,
                DispatchState::Parsed,
                DispatchState::Validated,
                DispatchState::LoggingReady,
                DispatchState::Dispatched,
                DispatchState::Done,
            ]
        );
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_failed_count_skips_test() {
        let calls = Calls::default();
        let installer = RecordingInstaller::default();
        let dispatcher = Dispatcher::new(registry(&calls, Some(Stage::Count)), &installer);
        let (cmd, argv) = command(&["run", "-c", "c1", "-t", "t1"]);

        let report = dispatcher.dispatch(cmd, &argv);

        assert_eq!(report.state(), DispatchState::Failed);
        assert_eq!(*calls.borrow(), vec![Stage::Count]);
        let err = report.into_result().unwrap_err();
        assert!(matches!(
            err,
            Error::StageExecution {
                stage: Stage::Count,
                ..
            }
        ));
        assert!(err.to_string().contains("count"));
    }

    #[test]
    fn test_mle_skips_shared_logging() {
        let calls = Calls::default();
        let installer = RecordingInstaller::default();
        let dispatcher = Dispatcher::new(registry(&calls, None), &installer);
        let (cmd, argv) = command(&["mle", "-k", "t.txt", "-d", "1,1;1,0"]);

        let report = dispatcher.dispatch(cmd, &argv);

        assert_eq!(report.state(), DispatchState::Done);
        assert!(installer.plans.borrow().is_empty());
        assert!(!report.history().contains(&DispatchState::LoggingReady));
        assert_eq!(*calls.borrow(), vec![Stage::Mle]);
    }

    #[test]
    fn test_pathway_logs_in_append_mode() {
        let calls = Calls::default();
        let installer = RecordingInstaller::default();
        let dispatcher = Dispatcher::new(registry(&calls, None), &installer);
        let (cmd, argv) = command(&["pathway", "--gene-ranking", "g.txt", "--gmt-file", "p.gmt"]);

        dispatcher.dispatch(cmd, &argv).into_result().unwrap();

        assert_eq!(
            *installer.plans.borrow(),
            vec![(PathBuf::from("sample1.log"), LogMode::Append)]
        );
    }

    #[test]
    fn test_validation_failure_has_no_side_effects() {
        let calls = Calls::default();
        let installer = RecordingInstaller::default();
        let dispatcher = Dispatcher::new(registry(&calls, None), &installer);
        let (cmd, argv) = command(&["filter", "--percent", "abc"]);

        let report = dispatcher.dispatch(cmd, &argv);

        assert_eq!(
            report.history(),
            &[
                DispatchState::Idle,
                DispatchState::Parsed,
                DispatchState::Failed
            ]
        );
        assert!(installer.plans.borrow().is_empty());
        assert!(calls.borrow().is_empty());
        assert!(matches!(
            report.error(),
            Some(Error::Validation {
                flag: "percent",
                ..
            })
        ));
    }

    #[test]
    fn test_logging_failure_stops_before_handlers() {
        let calls = Calls::default();
        let installer = RecordingInstaller {
            fail: true,
            ..RecordingInstaller::default()
        };
        let dispatcher = Dispatcher::new(registry(&calls, None), &installer);
        let (cmd, argv) = command(&["count"]);

        let report = dispatcher.dispatch(cmd, &argv);

        assert!(matches!(report.error(), Some(Error::LoggingInit { .. })));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_handler_invokes_nothing() {
        let calls = Calls::default();
        let mut partial = StageRegistry::new();
        let count_calls = Rc::clone(&calls);
        partial
            .register(Stage::Count, move |config: &StageConfig| {
                count_calls.borrow_mut().push(config.stage());
                Ok(())
            })
            .unwrap();
        let installer = RecordingInstaller::default();
        let dispatcher = Dispatcher::new(partial, &installer);
        let (cmd, argv) = command(&["run", "-c", "c1", "-t", "t1"]);

        let report = dispatcher.dispatch(cmd, &argv);

        assert!(matches!(
            report.error(),
            Some(Error::HandlerMissing { stage: Stage::Test })
        ));
        assert!(report.invoked().is_empty());
        assert!(calls.borrow().is_empty());
    }
}
