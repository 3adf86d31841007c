// All LLM prompt constants for the coaching endpoints.

use crate::models::role::Role;

/// System prompt for question generation — output is the bare question text.
pub const QUESTION_SYSTEM: &str = "You are an interview prep coach for tech roles. \
    The user will give you a target role, resume text, short blurb, and job description. \
    Output ONE high-signal interview question that is relevant to the role, \
    aligns with the job description, and is behavioral or scenario-based. \
    Respond with only the question text.";

/// Moderate randomness so five sequential calls produce varied questions.
pub const QUESTION_TEMPERATURE: f32 = 0.7;

/// System prompt for answer coaching — demands a strict JSON object.
pub const COACH_SYSTEM: &str = "You are an expert interview coach for tech roles. \
    You will receive a role, candidate resume text, blurb, job description, \
    interview question, and the candidate's answer. \
    Respond ONLY with valid JSON: \
    { \"score\": <integer 1-5>, \"summary\": \"<1-2 sentence verdict>\", \
    \"improvedAnswer\": \"<rewritten answer>\", \
    \"watchouts\": [\"<short bullet about what to improve or avoid>\", ...] }.";

/// Lower randomness favoring consistent scoring.
pub const COACH_TEMPERATURE: f32 = 0.4;

/// User message for question generation.
pub fn question_user_prompt(role: Role, resume: &str, blurb: &str, job_description: &str) -> String {
    format!(
        "Role: {}\nResume: {}\nBlurb: {}\nJob Description: {}",
        role.label(),
        resume,
        blurb,
        job_description
    )
}

/// User message for answer coaching. Same context block as question
/// generation, with the question and answer appended.
pub fn coach_user_prompt(
    role: Role,
    resume: &str,
    blurb: &str,
    job_description: &str,
    question: &str,
    answer: &str,
) -> String {
    format!(
        "Role: {}\nResume: {}\nBlurb: {}\nJob Description: {}\nQuestion: {}\nAnswer: {}",
        role.label(),
        resume,
        blurb,
        job_description,
        question,
        answer
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_prompt_carries_role_label_and_context() {
        let prompt = question_user_prompt(Role::EngManager, "resume text", "blurb text", "jd text");
        assert!(prompt.starts_with("Role: Engineering Manager\n"));
        assert!(prompt.contains("Resume: resume text"));
        assert!(prompt.contains("Blurb: blurb text"));
        assert!(prompt.ends_with("Job Description: jd text"));
    }

    #[test]
    fn test_coach_prompt_appends_question_and_answer() {
        let prompt = coach_user_prompt(Role::AiPm, "r", "b", "jd", "Q?", "A.");
        assert!(prompt.starts_with("Role: AI Product Manager\n"));
        assert!(prompt.contains("Question: Q?\n"));
        assert!(prompt.ends_with("Answer: A."));
    }

    #[test]
    fn test_coach_system_demands_json_shape() {
        assert!(COACH_SYSTEM.contains("\"score\""));
        assert!(COACH_SYSTEM.contains("\"improvedAnswer\""));
        assert!(COACH_SYSTEM.contains("\"watchouts\""));
    }
}
