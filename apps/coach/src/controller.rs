//! Orchestrates the interview session: network calls through `CoachingApi`,
//! state changes through the reducer, persistence after every mutation.

use thiserror::Error;
use tracing::debug;

use crate::api::{ApiClientError, CoachReportBody, CoachingApi, SessionContext};
use crate::session::{
    self, reduce, Feedback, ScoreBand, Session, SessionAction, QUESTION_COUNT,
};
use crate::store::SessionStore;

/// Which flavor of feedback refresh the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackVariation {
    /// Re-issues the coaching call with the same stored answer and question.
    Regenerate,
    /// Local transform: truncate the improved answer to two sentences.
    Shorten,
    /// Local transform: append the fixed metrics sentence.
    AddMetrics,
}

/// Controller-level failures. Messages are user-facing; the wrapped source
/// carries the cause for the log.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Please complete all required fields before starting")]
    MissingSetupFields,

    #[error("Something went wrong while generating questions. Please try again.")]
    QuestionGeneration(#[source] ApiClientError),

    #[error("Something went wrong while coaching your answer. Please try again.")]
    AnswerCoaching(#[source] ApiClientError),

    #[error("Something went wrong while regenerating feedback. Please try again.")]
    FeedbackRegeneration(#[source] ApiClientError),

    #[error("Answer cannot be empty")]
    EmptyAnswer,

    #[error("No question is active")]
    NoActiveQuestion,

    #[error("No feedback to revise for the current question")]
    NoFeedback,

    #[error("Clearing the session requires confirmation")]
    ClearNotConfirmed,

    #[error("failed to persist session: {0}")]
    Persistence(anyhow::Error),
}

impl From<anyhow::Error> for ControllerError {
    fn from(e: anyhow::Error) -> Self {
        ControllerError::Persistence(e)
    }
}

fn feedback_from_report(report: CoachReportBody) -> Feedback {
    Feedback {
        score: ScoreBand::from_rating(report.score),
        verdict: report.summary,
        improved_answer: report.improved_answer,
        improvements: report.watchouts,
    }
}

pub struct SessionController<A: CoachingApi> {
    session: Session,
    store: SessionStore,
    api: A,
}

impl<A: CoachingApi> SessionController<A> {
    /// Seeds the in-memory session from the persisted record when one exists.
    pub fn new(api: A, store: SessionStore) -> Self {
        let session = store.load().unwrap_or_default();
        Self {
            session,
            store,
            api,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs one action through the reducer and persists the result.
    fn apply(&mut self, action: SessionAction) -> Result<(), ControllerError> {
        self.session = reduce(std::mem::take(&mut self.session), action);
        self.store.save(&self.session)?;
        Ok(())
    }

    fn context(&self) -> Result<SessionContext, ControllerError> {
        let role = self.session.role.ok_or(ControllerError::MissingSetupFields)?;
        Ok(SessionContext {
            role,
            resume: self.session.resume.clone(),
            blurb: self.session.short_blurb.clone(),
            job_description: self.session.job_description.clone(),
        })
    }

    pub fn set_role(&mut self, role: session::Role) -> Result<(), ControllerError> {
        self.apply(SessionAction::SetRole(role))
    }

    pub fn set_resume(&mut self, text: String) -> Result<(), ControllerError> {
        self.apply(SessionAction::SetResume(text))
    }

    pub fn set_short_blurb(&mut self, text: String) -> Result<(), ControllerError> {
        self.apply(SessionAction::SetShortBlurb(text))
    }

    pub fn set_job_description(&mut self, text: String) -> Result<(), ControllerError> {
        self.apply(SessionAction::SetJobDescription(text))
    }

    /// Generates the five questions sequentially, each appended before the
    /// next call begins. Any failure aborts the whole transition: nothing is
    /// committed and the session stays in `Setup`. No call is issued at all
    /// when the required setup fields are missing.
    pub async fn start_interview(&mut self) -> Result<(), ControllerError> {
        if !self.session.ready_to_start() {
            return Err(ControllerError::MissingSetupFields);
        }
        let ctx = self.context()?;

        let mut questions = Vec::with_capacity(QUESTION_COUNT);
        for n in 0..QUESTION_COUNT {
            let question = self
                .api
                .generate_question(&ctx)
                .await
                .map_err(ControllerError::QuestionGeneration)?;
            debug!("generated question {}/{}", n + 1, QUESTION_COUNT);
            questions.push(question);
        }

        self.apply(SessionAction::StartInterview { questions })
    }

    /// Coaches the current question's answer and records both on success.
    /// On failure the session is unchanged.
    pub async fn submit_answer(&mut self, text: &str) -> Result<(), ControllerError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ControllerError::EmptyAnswer);
        }
        let question = self
            .session
            .current_question_text()
            .ok_or(ControllerError::NoActiveQuestion)?
            .to_string();
        let ctx = self.context()?;

        let report = self
            .api
            .coach_answer(&ctx, &question, text)
            .await
            .map_err(ControllerError::AnswerCoaching)?;

        self.apply(SessionAction::RecordAnswer {
            index: self.session.current_question,
            text: text.to_string(),
            feedback: feedback_from_report(report),
        })
    }

    pub fn next_question(&mut self) -> Result<(), ControllerError> {
        self.apply(SessionAction::NextQuestion)
    }

    pub fn previous_question(&mut self) -> Result<(), ControllerError> {
        self.apply(SessionAction::PreviousQuestion)
    }

    /// Operates only on the current index's existing feedback. `Regenerate`
    /// replaces it wholesale via a fresh coaching call (prior feedback is
    /// untouched on failure); the other two variations are local transforms.
    pub async fn regenerate_feedback(
        &mut self,
        variation: FeedbackVariation,
    ) -> Result<(), ControllerError> {
        let index = self.session.current_question;
        let record = self
            .session
            .answers
            .get(index)
            .and_then(|record| record.as_ref())
            .ok_or(ControllerError::NoFeedback)?;
        let feedback = record
            .feedback
            .as_ref()
            .ok_or(ControllerError::NoFeedback)?;

        match variation {
            FeedbackVariation::Regenerate => {
                let question = self
                    .session
                    .current_question_text()
                    .ok_or(ControllerError::NoActiveQuestion)?
                    .to_string();
                let answer = record.text.clone();
                let ctx = self.context()?;
                let report = self
                    .api
                    .coach_answer(&ctx, &question, &answer)
                    .await
                    .map_err(ControllerError::FeedbackRegeneration)?;
                self.apply(SessionAction::ReplaceFeedback {
                    index,
                    feedback: feedback_from_report(report),
                })
            }
            FeedbackVariation::Shorten => {
                let improved_answer = session::shorten(&feedback.improved_answer);
                self.apply(SessionAction::ReviseImprovedAnswer {
                    index,
                    improved_answer,
                })
            }
            FeedbackVariation::AddMetrics => {
                let improved_answer = session::add_metrics(&feedback.improved_answer);
                self.apply(SessionAction::ReviseImprovedAnswer {
                    index,
                    improved_answer,
                })
            }
        }
    }

    /// Erases all persisted and in-memory session data. Refuses without
    /// explicit confirmation.
    pub fn clear(&mut self, confirmed: bool) -> Result<(), ControllerError> {
        if !confirmed {
            return Err(ControllerError::ClearNotConfirmed);
        }
        self.store.clear()?;
        self.session = reduce(std::mem::take(&mut self.session), SessionAction::Clear);
        Ok(())
    }
}
