//! Terminal front for the session controller: setup, the five-question loop,
//! and the feedback commands. All state lives in the library; this file only
//! reads lines and prints.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use coach::api::{CoachingApi, HttpCoachingApi};
use coach::controller::{FeedbackVariation, SessionController};
use coach::session::{Feedback, Phase, Role, ScoreBand, QUESTION_COUNT};
use coach::store::SessionStore;

#[derive(Debug, Parser)]
#[command(name = "coach", about = "Practice interviews from the terminal")]
struct Args {
    /// Base URL of the prep coach API
    #[arg(long, default_value = "http://localhost:8080")]
    server_url: String,

    /// Directory holding the persisted session record
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coach=info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api = HttpCoachingApi::new(args.server_url);
    let store = SessionStore::new(&args.data_dir);
    let mut controller = SessionController::new(api, store);

    println!("Interview Prep Coach");

    loop {
        let keep_going = match controller.session().phase() {
            Phase::Setup => run_setup(&mut controller).await?,
            Phase::Interviewing | Phase::Completed => run_interview(&mut controller).await?,
        };
        if !keep_going {
            break;
        }
    }

    Ok(())
}

/// Collects missing setup fields, then starts the interview.
/// Returns false when the user is done (EOF).
async fn run_setup<A: CoachingApi>(controller: &mut SessionController<A>) -> Result<bool> {
    if controller.session().role.is_none() {
        println!("\nPick a role:");
        for (i, role) in Role::ALL.iter().enumerate() {
            println!("  {}. {}", i + 1, role.label());
        }
        let Some(choice) = prompt("role [1-3]> ")? else {
            return Ok(false);
        };
        match choice
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=Role::ALL.len()).contains(n))
        {
            Some(n) => controller.set_role(Role::ALL[n - 1])?,
            None => {
                println!("Unrecognized choice.");
                return Ok(true);
            }
        }
    }

    if controller.session().resume.trim().is_empty() {
        let Some(resume) = read_block("Paste your resume")? else {
            return Ok(false);
        };
        controller.set_resume(resume)?;
    }

    if controller.session().short_blurb.trim().is_empty() {
        let Some(blurb) = prompt("Short blurb (optional)> ")? else {
            return Ok(false);
        };
        controller.set_short_blurb(blurb.trim().to_string())?;
    }

    if controller.session().job_description.trim().is_empty() {
        let Some(job_description) = read_block("Paste the job description")? else {
            return Ok(false);
        };
        controller.set_job_description(job_description)?;
    }

    println!("Generating {QUESTION_COUNT} questions...");
    if let Err(e) = controller.start_interview().await {
        println!("{e}");
    }
    Ok(true)
}

/// One round of the interview loop: show the current question and feedback,
/// read a command, act on it. Returns false when the user quits.
async fn run_interview<A: CoachingApi>(controller: &mut SessionController<A>) -> Result<bool> {
    let session = controller.session();
    let total = session.questions.as_ref().map_or(0, Vec::len);

    if session.phase() == Phase::Completed {
        println!("\nAll {total} questions have feedback. Review with n/p, or c to start over.");
    }
    println!("\nQuestion {} of {}:", session.current_question + 1, total);
    println!("  {}", session.current_question_text().unwrap_or(""));

    if let Some(record) = session.current_answer() {
        println!("\nYour answer:\n  {}", record.text);
        if let Some(feedback) = &record.feedback {
            print_feedback(feedback);
        }
    }

    println!("\n[a]nswer  [n]ext  [p]rev  [r]egenerate  [s]horten  [m]etrics  [c]lear  [q]uit");
    let Some(command) = prompt("> ")? else {
        return Ok(false);
    };

    match command.trim() {
        "a" => {
            let Some(answer) = read_block("Your answer")? else {
                return Ok(false);
            };
            if let Err(e) = controller.submit_answer(&answer).await {
                println!("{e}");
            }
        }
        "n" => controller.next_question()?,
        "p" => controller.previous_question()?,
        "r" => {
            if let Err(e) = controller
                .regenerate_feedback(FeedbackVariation::Regenerate)
                .await
            {
                println!("{e}");
            }
        }
        "s" => {
            if let Err(e) = controller
                .regenerate_feedback(FeedbackVariation::Shorten)
                .await
            {
                println!("{e}");
            }
        }
        "m" => {
            if let Err(e) = controller
                .regenerate_feedback(FeedbackVariation::AddMetrics)
                .await
            {
                println!("{e}");
            }
        }
        "c" => {
            let confirmed = prompt("Clear all progress and start over? [y/N]> ")?
                .map_or(false, |reply| reply.trim().eq_ignore_ascii_case("y"));
            match controller.clear(confirmed) {
                Ok(()) => println!("Session cleared."),
                Err(e) => println!("{e}"),
            }
        }
        "q" => return Ok(false),
        other => println!("Unknown command: {other}"),
    }

    Ok(true)
}

fn print_feedback(feedback: &Feedback) {
    let band = match feedback.score {
        ScoreBand::Strong => "strong",
        ScoreBand::Good => "good",
        ScoreBand::NeedsWork => "needs work",
    };
    println!("\nScore: {band}");
    println!("Verdict: {}", feedback.verdict);
    println!("Improved answer:\n  {}", feedback.improved_answer);
    if !feedback.improvements.is_empty() {
        println!("Watch out for:");
        for item in &feedback.improvements {
            println!("  - {item}");
        }
    }
}

/// Reads one line. None means EOF.
fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

/// Reads lines until an empty one. None means EOF before any input.
fn read_block(label: &str) -> io::Result<Option<String>> {
    println!("{label} (finish with an empty line):");
    let mut lines: Vec<String> = Vec::new();
    loop {
        match prompt("")? {
            Some(line) if !line.trim().is_empty() => lines.push(line),
            Some(_) => break,
            None if lines.is_empty() => return Ok(None),
            None => break,
        }
    }
    Ok(Some(lines.join("\n")))
}
