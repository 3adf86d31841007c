//! Session state machine: data model, reducer, and local feedback transforms.
//!
//! Every mutation flows through `reduce(Session, SessionAction) -> Session`.
//! The interview phase is computed from the data, never stored.

use serde::{Deserialize, Serialize};

/// Questions generated per interview. The question list is committed exactly
/// once per session and is immutable afterwards.
pub const QUESTION_COUNT: usize = 5;

/// Sentence appended (with a separating space) by the add-metrics transform.
/// Reapplying appends again; idempotence is deliberately not guaranteed.
pub const METRICS_SENTENCE: &str = "I also quantified the impact by tying outcomes to metrics \
    like activation, velocity, and adoption so stakeholders saw clear results.";

/// The fixed set of coachable roles, mirrored on the server side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    AiPm,
    EngManager,
    Designer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::AiPm, Role::EngManager, Role::Designer];

    /// Wire-format code sent to the coaching endpoints.
    pub fn code(&self) -> &'static str {
        match self {
            Role::AiPm => "ai_pm",
            Role::EngManager => "eng_manager",
            Role::Designer => "designer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::AiPm => "AI Product Manager",
            Role::EngManager => "Engineering Manager",
            Role::Designer => "Product Designer",
        }
    }
}

/// Categorical score shown to the user, derived from the numeric 1-5 rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreBand {
    Strong,
    Good,
    NeedsWork,
}

impl ScoreBand {
    /// >= 4 is strong, >= 3 is good, everything else needs work.
    /// Out-of-range ratings are banded as-is; the server does not clamp them.
    pub fn from_rating(rating: f64) -> Self {
        if rating >= 4.0 {
            ScoreBand::Strong
        } else if rating >= 3.0 {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsWork
        }
    }
}

/// Coaching result attached to exactly one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub score: ScoreBand,
    pub verdict: String,
    pub improved_answer: String,
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub text: String,
    pub feedback: Option<Feedback>,
}

/// The whole interview session. One per data directory, serialized wholesale
/// after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub role: Option<Role>,
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub short_blurb: String,
    #[serde(default)]
    pub job_description: String,
    pub questions: Option<Vec<String>>,
    #[serde(default)]
    pub current_question: usize,
    #[serde(default)]
    pub answers: Vec<Option<AnswerRecord>>,
}

/// Computed interview phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Interviewing,
    Completed,
}

impl Session {
    /// Setup is done when role, resume, and job description are all present
    /// and the interview has not started yet.
    pub fn ready_to_start(&self) -> bool {
        self.role.is_some()
            && !self.resume.trim().is_empty()
            && !self.job_description.trim().is_empty()
            && self.questions.is_none()
    }

    /// Completed exactly when every question index has feedback, in any order.
    pub fn phase(&self) -> Phase {
        let questions = match &self.questions {
            Some(questions) => questions,
            None => return Phase::Setup,
        };

        let all_answered = !questions.is_empty()
            && (0..questions.len()).all(|i| {
                self.answers
                    .get(i)
                    .and_then(|record| record.as_ref())
                    .map_or(false, |record| record.feedback.is_some())
            });

        if all_answered {
            Phase::Completed
        } else {
            Phase::Interviewing
        }
    }

    pub fn current_question_text(&self) -> Option<&str> {
        self.questions
            .as_ref()?
            .get(self.current_question)
            .map(String::as_str)
    }

    pub fn current_answer(&self) -> Option<&AnswerRecord> {
        self.answers.get(self.current_question)?.as_ref()
    }
}

/// Every way the session can change. Anything not listed here cannot happen.
#[derive(Debug, Clone)]
pub enum SessionAction {
    SetRole(Role),
    SetResume(String),
    SetShortBlurb(String),
    SetJobDescription(String),
    /// Commits the full question list at once. A partial list is never stored.
    StartInterview { questions: Vec<String> },
    RecordAnswer {
        index: usize,
        text: String,
        feedback: Feedback,
    },
    ReplaceFeedback { index: usize, feedback: Feedback },
    ReviseImprovedAnswer {
        index: usize,
        improved_answer: String,
    },
    NextQuestion,
    PreviousQuestion,
    Clear,
}

/// Pure transition function. Invalid actions for the current state are no-ops.
pub fn reduce(state: Session, action: SessionAction) -> Session {
    let mut next = state;
    match action {
        SessionAction::SetRole(role) => {
            // Setup fields are immutable once the interview starts.
            if next.questions.is_none() {
                next.role = Some(role);
            }
        }
        SessionAction::SetResume(text) => {
            if next.questions.is_none() {
                next.resume = text;
            }
        }
        SessionAction::SetShortBlurb(text) => {
            if next.questions.is_none() {
                next.short_blurb = text;
            }
        }
        SessionAction::SetJobDescription(text) => {
            if next.questions.is_none() {
                next.job_description = text;
            }
        }
        SessionAction::StartInterview { questions } => {
            if next.questions.is_none() && questions.len() == QUESTION_COUNT {
                next.answers = vec![None; questions.len()];
                next.current_question = 0;
                next.questions = Some(questions);
            }
        }
        SessionAction::RecordAnswer {
            index,
            text,
            feedback,
        } => {
            let len = next.questions.as_ref().map_or(0, Vec::len);
            if index < len {
                if next.answers.len() < len {
                    next.answers.resize(len, None);
                }
                next.answers[index] = Some(AnswerRecord {
                    text,
                    feedback: Some(feedback),
                });
            }
        }
        SessionAction::ReplaceFeedback { index, feedback } => {
            if let Some(Some(record)) = next.answers.get_mut(index) {
                if record.feedback.is_some() {
                    record.feedback = Some(feedback);
                }
            }
        }
        SessionAction::ReviseImprovedAnswer {
            index,
            improved_answer,
        } => {
            if let Some(Some(record)) = next.answers.get_mut(index) {
                if let Some(feedback) = &mut record.feedback {
                    feedback.improved_answer = improved_answer;
                }
            }
        }
        SessionAction::NextQuestion => {
            if let Some(questions) = &next.questions {
                if next.current_question + 1 < questions.len() {
                    next.current_question += 1;
                }
            }
        }
        SessionAction::PreviousQuestion => {
            if next.questions.is_some() && next.current_question > 0 {
                next.current_question -= 1;
            }
        }
        SessionAction::Clear => {
            next = Session::default();
        }
    }
    next
}

/// Truncates an improved answer to its first two sentence segments,
/// re-appending the trailing period when missing.
pub fn shorten(improved_answer: &str) -> String {
    let mut shortened = improved_answer
        .split('.')
        .take(2)
        .collect::<Vec<_>>()
        .join(".")
        .trim()
        .to_string();
    if !shortened.ends_with('.') {
        shortened.push('.');
    }
    shortened
}

/// Appends the fixed metrics sentence. Purely local, no network call.
pub fn add_metrics(improved_answer: &str) -> String {
    format!("{improved_answer} {METRICS_SENTENCE}")
}
