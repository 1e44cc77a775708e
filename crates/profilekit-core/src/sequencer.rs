//! Profile update followed by the refresh or session handoff it triggers.
//!
//! One submission runs `Idle → Submitting → {SuccessSignup | SuccessRefreshing}
//! → Idle`, dropping straight back to `Idle` when a stage fails. Stages are
//! awaited in order and the first failure short-circuits the rest.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::api::{AccountResponse, AuthApi};
use crate::error::{Error, Result};
use crate::models::{ProfileUpdate, UserRecord};
use crate::notify::{FailureKind, Notice, Notifier};
use crate::store::{UserAction, UserStore};
use crate::util::until_cancelled;

/// Flow the screen was opened from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryContext {
    /// Last step of signup; a successful save hands back to login.
    SignupProcess,
    #[default]
    InappProcess,
}

impl EntryContext {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignupProcess => "signup_process",
            Self::InappProcess => "inapp_process",
        }
    }
}

impl fmt::Display for EntryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryContext {
    type Err = std::convert::Infallible;

    /// Only `signup_process` selects the signup flow.
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Ok(if value.trim() == Self::SignupProcess.as_str() {
            Self::SignupProcess
        } else {
            Self::InappProcess
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
    SuccessSignup,
    SuccessRefreshing,
}

impl SubmissionPhase {
    /// True while the update or the refresh call is outstanding.
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Submitting | Self::SuccessRefreshing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Signup step finished; the session was reset to logged out.
    SignedOut,
    /// Update accepted and the canonical record re-fetched into the store.
    Refreshed(UserRecord),
}

pub struct UpdateSequencer {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
    context: EntryContext,
    phase: watch::Sender<SubmissionPhase>,
    cancel: CancellationToken,
}

impl fmt::Debug for UpdateSequencer {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("UpdateSequencer")
            .field("context", &self.context)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

/// Returns the phase to `Idle` however the submission ends, including when
/// its future is dropped.
struct IdleOnDrop<'a>(&'a watch::Sender<SubmissionPhase>);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.send_replace(SubmissionPhase::Idle);
    }
}

impl UpdateSequencer {
    pub fn new(
        api: Arc<dyn AuthApi>,
        store: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
        context: EntryContext,
        cancel: CancellationToken,
    ) -> Self {
        let (phase, _) = watch::channel(SubmissionPhase::Idle);
        Self {
            api,
            store,
            notifier,
            context,
            phase,
            cancel,
        }
    }

    pub const fn context(&self) -> EntryContext {
        self.context
    }

    pub fn phase(&self) -> SubmissionPhase {
        *self.phase.borrow()
    }

    pub fn is_loading(&self) -> bool {
        self.phase().is_loading()
    }

    pub fn watch_phase(&self) -> watch::Receiver<SubmissionPhase> {
        self.phase.subscribe()
    }

    /// Send `payload` to the update endpoint, then hand off or refresh.
    ///
    /// Rejected with [`Error::Busy`] while another submission is running.
    pub async fn submit(&self, payload: ProfileUpdate) -> Result<SubmitOutcome> {
        let _idle = self.begin().inspect_err(|error| self.report(FailureKind::Update, error))?;
        self.run(&payload).await
    }

    /// Like [`UpdateSequencer::submit`], but waits for a running submission
    /// to finish instead of failing with [`Error::Busy`].
    pub async fn submit_when_idle(&self, payload: ProfileUpdate) -> Result<SubmitOutcome> {
        let _idle = self
            .wait_for_turn()
            .await
            .inspect_err(|error| self.report(FailureKind::Update, error))?;
        self.run(&payload).await
    }

    async fn run(&self, payload: &ProfileUpdate) -> Result<SubmitOutcome> {
        self.send_update(payload)
            .await
            .inspect_err(|error| self.report(FailureKind::Update, error))?;
        self.ensure_mounted()?;

        match self.context {
            EntryContext::SignupProcess => {
                self.phase.send_replace(SubmissionPhase::SuccessSignup);
                tracing::info!("signup profile saved, resetting session");
                self.store.dispatch(UserAction::logged_out());
                Ok(SubmitOutcome::SignedOut)
            }
            EntryContext::InappProcess => {
                self.phase.send_replace(SubmissionPhase::SuccessRefreshing);
                let user = self
                    .refetch()
                    .await
                    .inspect_err(|error| self.report(FailureKind::Refresh, error))?;
                self.ensure_mounted()?;
                self.store.dispatch(UserAction::UpdateUser { data: user.clone() });
                tracing::info!("profile saved and refreshed");
                Ok(SubmitOutcome::Refreshed(user))
            }
        }
    }

    fn begin(&self) -> Result<IdleOnDrop<'_>> {
        let acquired = self.phase.send_if_modified(|phase| {
            if *phase == SubmissionPhase::Idle {
                *phase = SubmissionPhase::Submitting;
                true
            } else {
                false
            }
        });
        if acquired {
            Ok(IdleOnDrop(&self.phase))
        } else {
            Err(Error::Busy("profile update"))
        }
    }

    async fn wait_for_turn(&self) -> Result<IdleOnDrop<'_>> {
        let mut phase = self.phase.subscribe();
        loop {
            if let Ok(idle) = self.begin() {
                return Ok(idle);
            }
            tracing::debug!("waiting for the running submission to finish");
            until_cancelled(&self.cancel, async {
                phase
                    .wait_for(|phase| *phase == SubmissionPhase::Idle)
                    .await
                    .map(|_| ())
                    .map_err(|_| Error::Cancelled)
            })
            .await?;
        }
    }

    async fn send_update(&self, payload: &ProfileUpdate) -> Result<()> {
        tracing::debug!(context = %self.context, fields = payload.len(), "submitting profile update");
        let response =
            until_cancelled(&self.cancel, self.api.update_personal_account(payload)).await?;
        if response.status {
            Ok(())
        } else {
            Err(Error::Api(response.message.unwrap_or_else(|| {
                "profile update was not accepted".to_string()
            })))
        }
    }

    async fn refetch(&self) -> Result<UserRecord> {
        tracing::debug!("re-fetching personal account");
        let response = until_cancelled(&self.cancel, self.api.fetch_personal_account()).await?;
        match response {
            AccountResponse {
                status: true,
                data: Some(user),
                ..
            } => Ok(user),
            AccountResponse { message, .. } => Err(Error::Api(
                message.unwrap_or_else(|| "account refresh returned no data".to_string()),
            )),
        }
    }

    fn ensure_mounted(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }

    fn report(&self, kind: FailureKind, error: &Error) {
        if matches!(error, Error::Cancelled) {
            tracing::debug!(?kind, "submission abandoned after unmount");
            return;
        }
        tracing::warn!(?kind, context = %self.context, "profile submission failed: {error}");
        self.notifier.notify(Notice {
            kind,
            detail: error.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::StatusResponse;
    use crate::models::ProfileField;
    use crate::store::AuthState;
    use crate::testing::{account, wait_until, FakeAuthApi, RecordingNotifier, RecordingStore};

    struct Harness {
        api: Arc<FakeAuthApi>,
        store: Arc<RecordingStore>,
        notifier: Arc<RecordingNotifier>,
        cancel: CancellationToken,
        sequencer: UpdateSequencer,
    }

    fn harness(api: FakeAuthApi, context: EntryContext) -> Harness {
        let api = Arc::new(api);
        let store = Arc::new(RecordingStore::new(AuthState::with_session(
            UserRecord::new().with(ProfileField::FirstName, "Ada"),
            "token",
        )));
        let notifier = Arc::new(RecordingNotifier::default());
        let cancel = CancellationToken::new();
        let sequencer = UpdateSequencer::new(
            api.clone(),
            store.clone(),
            notifier.clone(),
            context,
            cancel.clone(),
        );
        Harness {
            api,
            store,
            notifier,
            cancel,
            sequencer,
        }
    }

    fn payload() -> ProfileUpdate {
        ProfileUpdate::photo(crate::models::ImageSlot::Profile, "https://x/p.png")
    }

    #[test]
    fn entry_context_only_matches_exact_signup_route() {
        assert_eq!(
            "signup_process".parse::<EntryContext>().unwrap(),
            EntryContext::SignupProcess
        );
        assert_eq!(
            "signup".parse::<EntryContext>().unwrap(),
            EntryContext::InappProcess
        );
        assert_eq!("".parse::<EntryContext>().unwrap(), EntryContext::InappProcess);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn signup_success_dispatches_logged_out_without_refetch() {
        let h = harness(FakeAuthApi::new(), EntryContext::SignupProcess);

        let outcome = h.sequencer.submit(payload()).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::SignedOut);
        assert_eq!(h.store.actions(), vec![UserAction::logged_out()]);
        assert_eq!(h.api.fetch_count(), 0);
        assert_eq!(h.store.current().access_token, None);
        assert_eq!(h.sequencer.phase(), SubmissionPhase::Idle);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn inapp_success_refetches_once_and_updates_store() {
        let fetched = UserRecord::new()
            .with(ProfileField::FirstName, "Grace")
            .with(ProfileField::ProfilePhoto, "https://x/p.png");
        let h = harness(
            FakeAuthApi::new().with_fetch(Ok(account(fetched.clone()))),
            EntryContext::InappProcess,
        );

        let outcome = h.sequencer.submit(payload()).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Refreshed(fetched.clone()));
        assert_eq!(h.api.fetch_count(), 1);
        assert_eq!(
            h.store.actions(),
            vec![UserAction::UpdateUser { data: fetched }]
        );
        let user = h.store.current().user.unwrap();
        assert_eq!(user.field(ProfileField::FirstName).as_deref(), Some("Grace"));
        assert_eq!(
            user.field(ProfileField::ProfilePhoto).as_deref(),
            Some("https://x/p.png")
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn rejected_update_notifies_and_skips_refresh() {
        let h = harness(
            FakeAuthApi::new().with_update(Ok(StatusResponse {
                status: false,
                message: None,
            })),
            EntryContext::InappProcess,
        );

        let error = h.sequencer.submit(payload()).await.unwrap_err();

        assert!(matches!(error, Error::Api(_)));
        assert_eq!(h.api.fetch_count(), 0);
        assert!(h.store.actions().is_empty());
        assert_eq!(h.notifier.notices()[0].kind, FailureKind::Update);
        assert!(!h.sequencer.is_loading());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn refresh_without_data_leaves_store_untouched() {
        let h = harness(
            FakeAuthApi::new().with_fetch(Ok(AccountResponse {
                status: true,
                data: None,
                message: None,
            })),
            EntryContext::InappProcess,
        );

        assert!(h.sequencer.submit(payload()).await.is_err());
        assert!(h.store.actions().is_empty());
        assert_eq!(h.notifier.notices()[0].kind, FailureKind::Refresh);
        assert_eq!(h.sequencer.phase(), SubmissionPhase::Idle);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn is_loading_spans_update_and_refetch() {
        let mut api = FakeAuthApi::new().with_fetch(Ok(account(UserRecord::new())));
        let update_gate = api.gate_update();
        let fetch_gate = api.gate_fetch();
        let h = harness(api, EntryContext::InappProcess);
        assert!(!h.sequencer.is_loading());

        let probe = async {
            wait_until(|| h.api.update_calls().len() == 1).await;
            assert_eq!(h.sequencer.phase(), SubmissionPhase::Submitting);
            assert!(h.sequencer.is_loading());
            update_gate.add_permits(1);

            wait_until(|| h.api.fetch_count() == 1).await;
            assert_eq!(h.sequencer.phase(), SubmissionPhase::SuccessRefreshing);
            assert!(h.sequencer.is_loading());
            fetch_gate.add_permits(1);
        };
        let (outcome, ()) = tokio::join!(h.sequencer.submit(payload()), probe);

        assert!(outcome.is_ok());
        assert!(!h.sequencer.is_loading());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn second_submit_while_loading_is_rejected() {
        let mut api = FakeAuthApi::new();
        let update_gate = api.gate_update();
        let h = harness(api, EntryContext::SignupProcess);

        let second = async {
            wait_until(|| h.sequencer.is_loading()).await;
            let result = h.sequencer.submit(payload()).await;
            update_gate.add_permits(1);
            result
        };
        let (first, second) = tokio::join!(h.sequencer.submit(payload()), second);

        assert!(first.is_ok());
        assert!(matches!(second, Err(Error::Busy(_))));
        assert_eq!(h.api.update_calls().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn queued_submit_runs_after_the_running_one() {
        let mut api = FakeAuthApi::new()
            .with_fetch(Ok(account(UserRecord::new())))
            .with_fetch(Ok(account(UserRecord::new())));
        let update_gate = api.gate_update();
        let h = harness(api, EntryContext::InappProcess);
        let cover = ProfileUpdate::photo(crate::models::ImageSlot::Cover, "https://x/c.png");

        let queued = async {
            wait_until(|| h.api.update_calls().len() == 1).await;
            let queued = h.sequencer.submit_when_idle(cover.clone());
            let release = async {
                tokio::task::yield_now().await;
                assert_eq!(h.api.update_calls().len(), 1);
                update_gate.add_permits(2);
            };
            tokio::join!(queued, release).0
        };
        let (first, second) = tokio::join!(h.sequencer.submit(payload()), queued);

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(h.api.update_calls(), vec![payload(), cover]);
        assert_eq!(h.api.fetch_count(), 2);
        assert!(h.notifier.notices().is_empty());
        assert!(!h.sequencer.is_loading());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn queued_submit_gives_up_on_unmount() {
        let mut api = FakeAuthApi::new();
        let update_gate = api.gate_update();
        let h = harness(api, EntryContext::InappProcess);

        let queued = async {
            wait_until(|| h.api.update_calls().len() == 1).await;
            let queued = h.sequencer.submit_when_idle(payload());
            let unmount = async {
                tokio::task::yield_now().await;
                h.cancel.cancel();
                update_gate.add_permits(1);
            };
            tokio::join!(queued, unmount).0
        };
        let (first, second) = tokio::join!(h.sequencer.submit(payload()), queued);

        assert!(matches!(first, Err(Error::Cancelled)));
        assert!(matches!(second, Err(Error::Cancelled)));
        assert_eq!(h.api.update_calls().len(), 1);
        assert!(h.notifier.notices().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn cancellation_discards_pending_update() {
        let mut api = FakeAuthApi::new();
        let update_gate = api.gate_update();
        let h = harness(api, EntryContext::SignupProcess);

        let unmount = async {
            wait_until(|| h.api.update_calls().len() == 1).await;
            h.cancel.cancel();
            update_gate.add_permits(1);
        };
        let (result, ()) = tokio::join!(h.sequencer.submit(payload()), unmount);

        assert!(matches!(result, Err(Error::Cancelled)));
        assert!(h.store.actions().is_empty());
        assert!(h.notifier.notices().is_empty());
        assert!(!h.sequencer.is_loading());
    }
}
